//! Survey Service Port - conversational survey operations.
//!
//! The content service owns question authoring and session persistence;
//! this port is the narrow request/response contract the flow controller
//! consumes. There is no push channel: every operation is driven by an
//! explicit user action.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::ServiceError;
use crate::domain::foundation::{ItemId, SessionId, UserId};
use crate::domain::survey::{AnswerValue, SurveyQuestion};

/// The (user, item, form-context) tuple a survey is started for.
///
/// The form context is the intake payload, opaque to the flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurveySubject {
    pub user_id: UserId,
    pub item_id: ItemId,
    pub form_context: Value,
}

/// Reply to a successful `start`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartReply {
    pub session_id: SessionId,
    pub question: SurveyQuestion,
    pub question_number: u32,
    pub total_questions: u32,
    pub answered_questions_count: u32,
}

/// Whether the conversation continues or the survey is complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    Continue,
    SurveyCompleted,
}

/// Reply to answer/skip/edit operations.
///
/// On `Continue` the question fields are present; on `SurveyCompleted`
/// they are absent. Counter fields are optional server-side bookkeeping
/// that overrides local tallies when present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepReply {
    pub status: StepStatus,
    pub question: Option<SurveyQuestion>,
    pub question_number: Option<u32>,
    pub total_questions: Option<u32>,
    pub answered_questions_count: Option<u32>,
    pub skipped_count: Option<u32>,
    pub consecutive_skips: Option<u32>,
}

impl StepReply {
    /// A continue reply carrying the next question.
    pub fn next_question(
        question: SurveyQuestion,
        question_number: u32,
        total_questions: u32,
    ) -> Self {
        Self {
            status: StepStatus::Continue,
            question: Some(question),
            question_number: Some(question_number),
            total_questions: Some(total_questions),
            answered_questions_count: None,
            skipped_count: None,
            consecutive_skips: None,
        }
    }

    /// A survey-completed reply.
    pub fn survey_completed() -> Self {
        Self {
            status: StepStatus::SurveyCompleted,
            question: None,
            question_number: None,
            total_questions: None,
            answered_questions_count: None,
            skipped_count: None,
            consecutive_skips: None,
        }
    }

    /// Attaches server skip bookkeeping.
    pub fn with_skip_counters(mut self, skipped_count: u32, consecutive_skips: u32) -> Self {
        self.skipped_count = Some(skipped_count);
        self.consecutive_skips = Some(consecutive_skips);
        self
    }
}

/// Port for the conversational survey operations.
#[async_trait]
pub trait SurveyService: Send + Sync {
    /// Starts a new survey session and returns the first question.
    ///
    /// # Errors
    /// Returns `ServiceError` if the service is unreachable or refuses the
    /// subject; there is no session to salvage in that case.
    async fn start(&self, subject: &SurveySubject) -> Result<StartReply, ServiceError>;

    /// Submits the answer for the currently displayed question.
    async fn answer(
        &self,
        session_id: SessionId,
        answer: &AnswerValue,
    ) -> Result<StepReply, ServiceError>;

    /// Skips the currently displayed question.
    ///
    /// # Errors
    /// Returns `ServiceError::SkipLimit` when the server declines the skip;
    /// the carried message is user-facing.
    async fn skip(&self, session_id: SessionId) -> Result<StepReply, ServiceError>;

    /// Submits an edited answer for an earlier question. The server is
    /// authoritative for what happens downstream of the branch point.
    async fn edit(
        &self,
        session_id: SessionId,
        question_number: u32,
        answer: &AnswerValue,
    ) -> Result<StepReply, ServiceError>;

    /// Fetches a fresh copy of a question for editing. Never served from
    /// history: option sets may have been regenerated server-side.
    async fn question_for_edit(
        &self,
        session_id: SessionId,
        question_number: u32,
    ) -> Result<SurveyQuestion, ServiceError>;
}
