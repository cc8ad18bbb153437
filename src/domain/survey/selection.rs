//! Resolution of raw UI selections into canonical answer values.
//!
//! Two option labels are special and change multi-select behavior:
//! `"All of the above"` is an exclusive-group option that displaces normal
//! selections, and `"Other"` is a free-text-augmenting option that coexists
//! with everything. Modeling these as roles keeps the tie-break rules in one
//! place instead of scattering membership filtering across the UI layer.

use thiserror::Error;

use super::{AnswerValue, ResponseLog, SurveyQuestion};
use crate::domain::foundation::ValidationError;

/// Literal label of the exclusive-group option.
pub const OPTION_ALL_OF_THE_ABOVE: &str = "All of the above";

/// Literal label of the free-text-augmenting option.
pub const OPTION_OTHER: &str = "Other";

/// Behavioral role of an option label within a multi-select question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionRole {
    /// Ordinary option, plain toggle semantics.
    Normal,
    /// Free-text option; toggles without disturbing the exclusive group.
    Other,
    /// Exclusive-group option; displaces normal selections.
    AllOfTheAbove,
}

impl OptionRole {
    /// Classifies an option label by exact match.
    pub fn of(label: &str) -> Self {
        if label == OPTION_ALL_OF_THE_ABOVE {
            OptionRole::AllOfTheAbove
        } else if label == OPTION_OTHER {
            OptionRole::Other
        } else {
            OptionRole::Normal
        }
    }
}

/// Ordered multi-select state with the tie-break rules applied on toggle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MultiSelection {
    selected: Vec<String>,
}

impl MultiSelection {
    /// Creates an empty selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Currently selected labels, in selection order.
    pub fn selected(&self) -> &[String] {
        &self.selected
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn contains(&self, label: &str) -> bool {
        self.selected.iter().any(|s| s == label)
    }

    /// Clears the selection entirely.
    pub fn clear(&mut self) {
        self.selected.clear();
    }

    /// Toggles an option, applying the tie-break rules:
    ///
    /// - Selecting "All of the above" collapses the set to it plus any
    ///   already-selected "Other"; deselecting it clears back to empty.
    /// - "Other" toggles membership without disturbing "All of the above".
    /// - Selecting a normal option while "All of the above" is active
    ///   replaces the set with the new option plus any selected "Other".
    pub fn toggle(&mut self, label: &str) {
        match OptionRole::of(label) {
            OptionRole::AllOfTheAbove => {
                if self.contains(OPTION_ALL_OF_THE_ABOVE) {
                    self.clear();
                } else {
                    let keep_other = self.contains(OPTION_OTHER);
                    self.selected.clear();
                    self.selected.push(OPTION_ALL_OF_THE_ABOVE.to_string());
                    if keep_other {
                        self.selected.push(OPTION_OTHER.to_string());
                    }
                }
            }
            OptionRole::Other => {
                if let Some(pos) = self.selected.iter().position(|s| s == OPTION_OTHER) {
                    self.selected.remove(pos);
                } else {
                    self.selected.push(OPTION_OTHER.to_string());
                }
            }
            OptionRole::Normal => {
                if self.contains(OPTION_ALL_OF_THE_ABOVE) {
                    let keep_other = self.contains(OPTION_OTHER);
                    self.selected.clear();
                    self.selected.push(label.to_string());
                    if keep_other {
                        self.selected.push(OPTION_OTHER.to_string());
                    }
                } else if let Some(pos) = self.selected.iter().position(|s| s == label) {
                    self.selected.remove(pos);
                } else {
                    self.selected.push(label.to_string());
                }
            }
        }
    }
}

/// Resolves a raw UI selection into a canonical answer value.
///
/// Every selected label must be an option of the displayed question. The
/// "Other" label resolves to `"Other: " + free_text`.
pub fn resolve_selection(
    selected: &[String],
    free_text: &str,
    question: &SurveyQuestion,
) -> Result<AnswerValue, ValidationError> {
    if selected.is_empty() {
        return Err(ValidationError::empty_field("selection"));
    }
    for label in selected {
        if !question.has_option(label) {
            return Err(ValidationError::invalid_format(
                "selection",
                format!("{:?} is not an option of the displayed question", label),
            ));
        }
    }

    let resolve_label = |label: &str| -> String {
        match OptionRole::of(label) {
            OptionRole::Other => format!("{}: {}", OPTION_OTHER, free_text.trim()),
            _ => label.to_string(),
        }
    };

    if question.allow_multiple {
        Ok(AnswerValue::Multiple(
            selected.iter().map(|label| resolve_label(label)).collect(),
        ))
    } else {
        if selected.len() > 1 {
            return Err(ValidationError::invalid_format(
                "selection",
                format!(
                    "single-choice question received {} selections",
                    selected.len()
                ),
            ));
        }
        Ok(AnswerValue::Single(resolve_label(&selected[0])))
    }
}

/// Raised when an edited answer matches the recorded answer verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Edited answer for question {question_number} is identical to the recorded answer")]
pub struct DuplicateAnswer {
    pub question_number: u32,
}

/// Compares a candidate edit against the recorded response for the same
/// question number.
///
/// The comparison is structural equality on [`AnswerValue`] (order-sensitive
/// for multi-select), never a comparison of joined display strings. Skipped
/// responses never count as duplicates: re-answering a skipped question with
/// any value is a real edit.
pub fn detect_duplicate(
    question_number: u32,
    candidate: &AnswerValue,
    responses: &ResponseLog,
) -> Result<(), DuplicateAnswer> {
    if let Some(existing) = responses.get(question_number) {
        if !existing.is_skipped && existing.answer == *candidate {
            return Err(DuplicateAnswer { question_number });
        }
    }
    Ok(())
}
