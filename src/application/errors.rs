//! Error types for the flow controller and review gate operations.
//!
//! Every failure is caught at the operation boundary and surfaced as one of
//! these; the session snapshot is only ever advanced by a successful service
//! reply. Retries are always user-initiated and reissue the same intent.

use thiserror::Error;

use crate::domain::foundation::{SurveyStatus, ValidationError};
use crate::domain::survey::DuplicateAnswer;
use crate::ports::ServiceError;

/// Errors surfaced by [`FlowController`](super::FlowController) operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FlowError {
    /// The session could not be created. Fatal to the session; retry
    /// reissues `start`.
    #[error("Could not start the survey: {0}")]
    StartFailed(#[source] ServiceError),

    /// A step operation (answer/skip/edit) failed; the snapshot is
    /// unchanged and retrying reissues the identical intent.
    #[error("Survey step failed: {0}")]
    Step(#[source] ServiceError),

    /// The server declined the skip. Soft: the message is user-facing and
    /// nothing changed.
    #[error("{message}")]
    SkipLimitExceeded { message: String },

    /// The edited answer matches the recorded one; nothing was sent.
    #[error(transparent)]
    Duplicate(#[from] DuplicateAnswer),

    /// Another operation on this session is still outstanding.
    #[error("Another operation is already in flight for this session")]
    Busy,

    #[error("No active survey session")]
    NoSession,

    #[error("No question is currently displayed")]
    NoQuestionDisplayed,

    #[error("The survey is not accepting answers in status {status}")]
    NotInProgress { status: SurveyStatus },

    #[error("Cannot skip while editing an earlier answer")]
    SkipWhileEditing,

    #[error("Editing is locked in status {status}")]
    EditRefused { status: SurveyStatus },

    #[error("Question {question_number} has no recorded response to edit")]
    InvalidQuestionNumber { question_number: u32 },

    #[error("No edit in progress")]
    NotEditing,

    /// The raw selection could not be resolved into an answer.
    #[error("Invalid selection: {0}")]
    Selection(#[source] ValidationError),
}

/// Errors surfaced by [`ReviewGate`](super::ReviewGate) operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReviewError {
    /// Review generation is gated on survey completion.
    #[error("Reviews cannot be generated in status {status}")]
    NotReadyForReviews { status: SurveyStatus },

    /// Regeneration and submission require a generated batch.
    #[error("No review options have been generated in status {status}")]
    NotGenerated { status: SurveyStatus },

    /// The session is terminal; the chosen review was already submitted.
    #[error("A review was already submitted for this session")]
    AlreadySubmitted,

    /// Generation or regeneration failed; retry re-invokes it.
    #[error("Review generation failed: {0}")]
    Generation(#[source] ServiceError),

    /// Submission failed; the selection is preserved for retry.
    #[error("Review submission failed: {0}")]
    Submit(#[source] ServiceError),

    #[error("No review options are held")]
    NoOptions,

    #[error("Review option index {index} is out of range")]
    InvalidIndex { index: usize },

    #[error("Another operation is already in flight for this session")]
    Busy,

    #[error("No active survey session")]
    NoSession,
}
