//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment
//! variables using the `config` and `dotenvy` crates. Configuration is
//! loaded with the `SURVEY_SENSEI` prefix and nested values use double
//! underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use survey_sensei::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Talking to {}", config.service.base_url);
//! ```

mod error;
mod flow;
mod service;

pub use error::{ConfigError, ValidationError};
pub use flow::FlowConfig;
pub use service::ServiceConfig;

use serde::Deserialize;

/// Root application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Content service configuration (base URL, token, timeout)
    #[serde(default)]
    pub service: ServiceConfig,

    /// Flow behavior configuration (warning durations, option counts)
    #[serde(default)]
    pub flow: FlowConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with the `SURVEY_SENSEI` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    ///
    /// # Environment Variable Format
    ///
    /// - `SURVEY_SENSEI__SERVICE__BASE_URL=...` -> `service.base_url = ...`
    /// - `SURVEY_SENSEI__FLOW__DUPLICATE_WARNING_MS=1500` -> `flow.duplicate_warning_ms = 1500`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into the expected
    /// types.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("SURVEY_SENSEI")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.service.validate()?;
        self.flow.validate()?;
        Ok(())
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            service: ServiceConfig::default(),
            flow: FlowConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    // Mutex to ensure tests don't run in parallel (env vars are global)
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    fn clear_env() {
        env::remove_var("SURVEY_SENSEI__SERVICE__BASE_URL");
        env::remove_var("SURVEY_SENSEI__SERVICE__TIMEOUT_SECS");
        env::remove_var("SURVEY_SENSEI__SERVICE__API_TOKEN");
        env::remove_var("SURVEY_SENSEI__FLOW__DUPLICATE_WARNING_MS");
        env::remove_var("SURVEY_SENSEI__FLOW__REVIEW_OPTIONS_COUNT");
    }

    #[test]
    fn test_load_with_defaults() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        let config = AppConfig::load().unwrap();

        assert_eq!(config.service.base_url, "http://localhost:8000");
        assert_eq!(config.flow.review_options_count, 3);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_overrides_from_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        env::set_var(
            "SURVEY_SENSEI__SERVICE__BASE_URL",
            "https://api.example.com",
        );
        env::set_var("SURVEY_SENSEI__FLOW__DUPLICATE_WARNING_MS", "1500");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.service.base_url, "https://api.example.com");
        assert_eq!(config.flow.duplicate_warning_ms, 1500);
    }

    #[test]
    fn test_validate_full_default_config() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
    }
}
