//! Input format dispatch.

pub mod mapping;

use std::path::Path;

use tracing::debug;

use crate::error::ConversionError;
use crate::models::dotted_extension;

pub use mapping::{FormatStrategy, OBJ_STRATEGY, PLY_STRATEGY, STRATEGIES, USD_STRATEGY};

/// Selects the import strategy for an input path.
#[derive(Debug, Clone, Copy, Default)]
pub struct FormatDispatcher;

impl FormatDispatcher {
    /// Strategy for `path`, chosen by its extension (case-insensitive).
    pub fn select(path: &Path) -> Result<&'static FormatStrategy, ConversionError> {
        let extension = dotted_extension(path);
        let strategy = extension
            .strip_prefix('.')
            .and_then(mapping::lookup)
            .ok_or_else(|| ConversionError::UnsupportedExtension {
                extension: extension.clone(),
            })?;
        debug!(extension = %extension, family = %strategy.family, "Selected import strategy");
        Ok(strategy)
    }
}
