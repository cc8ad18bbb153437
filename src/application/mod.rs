//! Application layer - session-scoped controllers over the service ports.
//!
//! One `SessionStore` exists per conversation; the session's
//! `FlowController` and `ReviewGate` share it, along with the busy gate
//! that serializes their operations.

pub mod errors;
pub mod flow_controller;
pub mod review_gate;
pub mod session_store;

pub use errors::{FlowError, ReviewError};
pub use flow_controller::{FlowController, StepOutcome};
pub use review_gate::ReviewGate;
pub use session_store::SessionStore;
