//! Survey question payload.
//!
//! Questions are authored by the content service and treated as opaque
//! content here; this type only validates the structure the flow depends
//! on (ordered, unique options).

use serde::{Deserialize, Serialize};

use crate::domain::foundation::ValidationError;

/// A single multiple-choice question presented to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurveyQuestion {
    /// The question to ask the user.
    pub question_text: String,
    /// Ordered, unique answer options.
    pub options: Vec<String>,
    /// True if multiple options can be selected together.
    pub allow_multiple: bool,
    /// Why the content service considered this question relevant.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<String>,
}

impl SurveyQuestion {
    /// Creates a validated question.
    ///
    /// Requires non-empty text and at least two distinct, non-empty options.
    pub fn new(
        question_text: impl Into<String>,
        options: Vec<String>,
        allow_multiple: bool,
        reasoning: Option<String>,
    ) -> Result<Self, ValidationError> {
        let question_text = question_text.into();
        if question_text.trim().is_empty() {
            return Err(ValidationError::empty_field("question_text"));
        }
        if options.len() < 2 {
            return Err(ValidationError::invalid_format(
                "options",
                format!("expected at least 2 options, got {}", options.len()),
            ));
        }
        for (i, option) in options.iter().enumerate() {
            if option.trim().is_empty() {
                return Err(ValidationError::empty_field(format!("options[{}]", i)));
            }
            if options[..i].contains(option) {
                return Err(ValidationError::invalid_format(
                    "options",
                    format!("duplicate option label: {:?}", option),
                ));
            }
        }

        Ok(Self {
            question_text,
            options,
            allow_multiple,
            reasoning,
        })
    }

    /// Returns true if the given label is one of this question's options.
    pub fn has_option(&self, label: &str) -> bool {
        self.options.iter().any(|o| o == label)
    }
}
