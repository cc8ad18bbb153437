//! Flow behavior configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Flow behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct FlowConfig {
    /// How long the duplicate-answer warning stays visible, in
    /// milliseconds, before the edit is restored
    #[serde(default = "default_duplicate_warning_ms")]
    pub duplicate_warning_ms: u64,

    /// How many review options the host expects per batch
    #[serde(default = "default_review_options_count")]
    pub review_options_count: u32,
}

impl FlowConfig {
    /// Get the duplicate warning duration as Duration
    pub fn duplicate_warning(&self) -> Duration {
        Duration::from_millis(self.duplicate_warning_ms)
    }

    /// Validate flow configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !(100..=10_000).contains(&self.duplicate_warning_ms) {
            return Err(ValidationError::InvalidWarningDuration);
        }
        if !(1..=10).contains(&self.review_options_count) {
            return Err(ValidationError::InvalidReviewOptionCount);
        }
        Ok(())
    }
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self {
            duplicate_warning_ms: default_duplicate_warning_ms(),
            review_options_count: default_review_options_count(),
        }
    }
}

fn default_duplicate_warning_ms() -> u64 {
    2000
}

fn default_review_options_count() -> u32 {
    3
}
