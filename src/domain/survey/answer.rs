//! Canonical answer values.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A resolved answer: one value for single-choice questions, an ordered
/// set of values for multi-select questions.
///
/// Equality is structural: a multi-select answer equals another only if it
/// holds the same values in the same order. This is deliberately not a
/// comparison of the rendered display text, so option labels containing the
/// display delimiter cannot collide.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
    Single(String),
    Multiple(Vec<String>),
}

impl AnswerValue {
    /// Creates a single-choice answer.
    pub fn single(value: impl Into<String>) -> Self {
        AnswerValue::Single(value.into())
    }

    /// Creates a multi-select answer from an ordered set of values.
    pub fn multiple(values: impl IntoIterator<Item = impl Into<String>>) -> Self {
        AnswerValue::Multiple(values.into_iter().map(Into::into).collect())
    }

    /// Returns true if the answer carries no value.
    pub fn is_empty(&self) -> bool {
        match self {
            AnswerValue::Single(value) => value.trim().is_empty(),
            AnswerValue::Multiple(values) => values.is_empty(),
        }
    }

    /// Renders the answer for display and conversation history.
    ///
    /// Multi-select values are joined with ", "; this text is presentation
    /// only and never used for equality.
    pub fn display_text(&self) -> String {
        match self {
            AnswerValue::Single(value) => value.clone(),
            AnswerValue::Multiple(values) => values.join(", "),
        }
    }
}

impl fmt::Display for AnswerValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_text())
    }
}
