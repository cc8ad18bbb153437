//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `http` - reqwest client against the Survey Sensei REST backend
//! - `mock` - configurable in-memory services for tests and offline hosts

pub mod http;
pub mod mock;

pub use http::{SurveyApiClient, SurveyApiConfig};
pub use mock::{MockReviewService, MockSurveyService, RecordedCall, RecordedReviewCall};
