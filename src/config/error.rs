//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Service base URL must start with http:// or https://")]
    InvalidServiceUrl,

    #[error("Request timeout must be between 1 and 300 seconds")]
    InvalidTimeout,

    #[error("Duplicate warning duration must be between 100 and 10000 ms")]
    InvalidWarningDuration,

    #[error("Review option count must be between 1 and 10")]
    InvalidReviewOptionCount,
}
