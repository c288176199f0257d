//! Application configuration schemas.
//!
//! Configuration is deserialized via the `config` crate from an optional
//! TOML file overlaid with `MESHGLB__`-prefixed environment variables. Each
//! sub-module represents a logical configuration section.

pub mod conversion;
pub mod host;
pub mod logging;

use std::path::Path;

use serde::{Deserialize, Serialize};
use validator::Validate;

pub use self::conversion::ConversionConfig;
pub use self::host::HostConfig;
pub use self::logging::LoggingConfig;

use crate::error::AppError;

/// Config file looked up in the working directory when none is given.
pub const DEFAULT_CONFIG_NAME: &str = "meshglb";

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct AppConfig {
    /// Logging settings.
    #[serde(default)]
    #[validate(nested)]
    pub logging: LoggingConfig,
    /// Pipeline settings.
    #[serde(default)]
    #[validate(nested)]
    pub conversion: ConversionConfig,
    /// Native host settings.
    #[serde(default)]
    #[validate(nested)]
    pub host: HostConfig,
}

impl AppConfig {
    /// Load configuration.
    ///
    /// An explicit `path` must exist; otherwise `meshglb.toml` in the working
    /// directory is used when present. Environment variables prefixed with
    /// `MESHGLB__` override file values (e.g. `MESHGLB__LOGGING__LEVEL`).
    pub fn load(path: Option<&Path>) -> Result<Self, AppError> {
        let file_source = match path {
            Some(p) => config::File::from(p).required(true),
            None => config::File::with_name(DEFAULT_CONFIG_NAME).required(false),
        };

        let config = config::Config::builder()
            .add_source(file_source)
            .add_source(
                config::Environment::with_prefix("MESHGLB")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        let app: AppConfig = config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))?;

        app.validate()
            .map_err(|e| AppError::configuration(format!("Invalid config: {e}")))?;

        Ok(app)
    }

    /// Replace the configured log level, keeping the configuration valid.
    pub fn override_log_level(&mut self, level: &str) -> Result<(), AppError> {
        let previous = std::mem::replace(&mut self.logging.level, level.to_string());
        if let Err(e) = self.validate() {
            self.logging.level = previous;
            return Err(AppError::configuration(format!("Invalid log level '{level}': {e}")));
        }
        Ok(())
    }
}
