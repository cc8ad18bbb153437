//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `SurveyService` - Conversational survey operations (start/answer/skip/edit)
//! - `ReviewService` - Review generation and submission

mod review_service;
mod survey_service;

pub use review_service::{ReviewReply, ReviewService};
pub use survey_service::{StartReply, StepReply, StepStatus, SurveyService, SurveySubject};

use thiserror::Error;

/// Errors surfaced by the content/session service ports.
///
/// Everything here except [`ServiceError::SkipLimit`] is a hard failure:
/// the operation did not happen and the session snapshot must be left
/// untouched. The skip limit is a distinguished soft rejection carrying a
/// user-facing message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    #[error("Content service unavailable: {message}")]
    Unavailable { message: String },

    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u32 },

    #[error("Not authorized to use the content service")]
    Unauthorized,

    #[error("Session not found on the content service")]
    SessionNotFound,

    #[error("Content service returned HTTP {status}: {message}")]
    Http { status: u16, message: String },

    #[error("Malformed service reply: {reason}")]
    InvalidReply { reason: String },

    /// The server declined the skip. Expected behavior, not an error path:
    /// the message is shown to the user verbatim.
    #[error("{message}")]
    SkipLimit { message: String },
}

impl ServiceError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        ServiceError::Unavailable { message: message.into() }
    }

    pub fn invalid_reply(reason: impl Into<String>) -> Self {
        ServiceError::InvalidReply { reason: reason.into() }
    }

    pub fn skip_limit(message: impl Into<String>) -> Self {
        ServiceError::SkipLimit { message: message.into() }
    }

    /// Returns true for the soft skip-limit rejection.
    pub fn is_soft(&self) -> bool {
        matches!(self, ServiceError::SkipLimit { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skip_limit_is_the_only_soft_error() {
        assert!(ServiceError::skip_limit("You can only skip 3 questions").is_soft());
        assert!(!ServiceError::unavailable("connection refused").is_soft());
        assert!(!ServiceError::Unauthorized.is_soft());
        assert!(!ServiceError::invalid_reply("missing question").is_soft());
    }

    #[test]
    fn skip_limit_displays_the_message_verbatim() {
        let err = ServiceError::skip_limit("Skip limit reached (3 of 3)");
        assert_eq!(format!("{}", err), "Skip limit reached (3 of 3)");
    }
}
