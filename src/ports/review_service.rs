//! Review Service Port - review generation and submission.

use async_trait::async_trait;

use super::ServiceError;
use crate::domain::foundation::SessionId;
use crate::domain::review::{ReviewOption, SentimentBand};

/// Reply to generate/regenerate: the candidate reviews plus the coarse
/// sentiment classification of the survey responses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewReply {
    pub options: Vec<ReviewOption>,
    pub sentiment_band: SentimentBand,
}

/// Port for review generation and submission.
#[async_trait]
pub trait ReviewService: Send + Sync {
    /// Generates review options from the session's survey responses.
    async fn generate(&self, session_id: SessionId) -> Result<ReviewReply, ServiceError>;

    /// Requests a fresh batch of options for the same session. The
    /// sentiment band stays in the same family; the variations differ.
    async fn regenerate(&self, session_id: SessionId) -> Result<ReviewReply, ServiceError>;

    /// Submits the chosen option by index into the last generated batch.
    async fn submit(&self, session_id: SessionId, index: usize) -> Result<(), ServiceError>;
}
