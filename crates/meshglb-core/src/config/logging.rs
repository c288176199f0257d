//! Logging configuration.

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// Logging and tracing configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoggingConfig {
    /// Log level: `"trace"`, `"debug"`, `"info"`, `"warn"`, `"error"`.
    #[serde(default = "default_level")]
    #[validate(custom(function = "validate_level"))]
    pub level: String,
    /// Log format: `"json"` or `"pretty"`.
    #[serde(default = "default_format")]
    #[validate(custom(function = "validate_format"))]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            format: default_format(),
        }
    }
}

fn default_level() -> String {
    "warn".to_string()
}

fn default_format() -> String {
    "pretty".to_string()
}

fn validate_level(level: &str) -> Result<(), ValidationError> {
    match level.to_ascii_lowercase().as_str() {
        "trace" | "debug" | "info" | "warn" | "error" | "off" => Ok(()),
        _ => Err(ValidationError::new("unknown_log_level")),
    }
}

fn validate_format(format: &str) -> Result<(), ValidationError> {
    match format {
        "json" | "pretty" => Ok(()),
        _ => Err(ValidationError::new("unknown_log_format")),
    }
}
