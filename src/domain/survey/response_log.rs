//! Append-only response history with ordering invariants.
//!
//! The log is the single source of truth for what the user has answered.
//! Entries are keyed by `question_number`, strictly increasing and
//! contiguous from 1, with exactly one entry per number. Edits truncate the
//! log at the branch point and append the replacement; they never produce a
//! second entry for the same number.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::AnswerValue;
use crate::domain::foundation::ValidationError;

/// Answer text recorded for a skipped question.
pub const SKIPPED_ANSWER: &str = "SKIPPED";

/// One recorded answer, with a snapshot of the question text it answered.
///
/// The text is snapshotted because questions are regenerated server-side
/// and the displayed wording may no longer be retrievable later.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    pub question_number: u32,
    pub question_text: String,
    pub answer: AnswerValue,
    pub is_skipped: bool,
    pub answered_at: DateTime<Utc>,
}

impl Response {
    /// Creates a response for an answered question.
    pub fn answered(
        question_number: u32,
        question_text: impl Into<String>,
        answer: AnswerValue,
    ) -> Self {
        Self {
            question_number,
            question_text: question_text.into(),
            answer,
            is_skipped: false,
            answered_at: Utc::now(),
        }
    }

    /// Creates a response for a skipped question.
    pub fn skipped(question_number: u32, question_text: impl Into<String>) -> Self {
        Self {
            question_number,
            question_text: question_text.into(),
            answer: AnswerValue::single(SKIPPED_ANSWER),
            is_skipped: true,
            answered_at: Utc::now(),
        }
    }
}

/// The ordered response history of one session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseLog {
    entries: Vec<Response>,
}

impl ResponseLog {
    /// Creates an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All entries in question order.
    pub fn entries(&self) -> &[Response] {
        &self.entries
    }

    /// The entry for a question number, if recorded.
    pub fn get(&self, question_number: u32) -> Option<&Response> {
        self.entries
            .iter()
            .find(|r| r.question_number == question_number)
    }

    pub fn contains(&self, question_number: u32) -> bool {
        self.get(question_number).is_some()
    }

    /// The question number the next appended response must carry.
    pub fn next_question_number(&self) -> u32 {
        self.entries.len() as u32 + 1
    }

    /// Appends a response.
    ///
    /// The response must be for the next question number; anything else
    /// would break the strictly-increasing, one-entry-per-number invariant
    /// and is rejected without mutation.
    pub fn record(&mut self, response: Response) -> Result<(), ValidationError> {
        let expected = self.next_question_number();
        if response.question_number != expected {
            return Err(ValidationError::invalid_format(
                "question_number",
                format!(
                    "expected response for question {}, got {}",
                    expected, response.question_number
                ),
            ));
        }
        self.entries.push(response);
        Ok(())
    }

    /// Discards every entry at or after the branch point.
    ///
    /// Used by the edit protocol: the continuation recorded after an edited
    /// question is invalidated and not recoverable.
    pub fn truncate_from(&mut self, question_number: u32) {
        self.entries.retain(|r| r.question_number < question_number);
    }
}
