//! Conversion pipeline configuration.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Settings of the conversion pipeline itself.
///
/// Export options are deliberately absent: the output is always binary
/// glTF, Y-up, with transforms applied.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ConversionConfig {
    /// Minimum size in bytes of the exported file to count as written.
    #[serde(default = "default_min_output_bytes")]
    #[validate(range(min = 12, max = 1_048_576))]
    pub min_output_bytes: u64,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            min_output_bytes: default_min_output_bytes(),
        }
    }
}

/// A GLB header alone is 12 bytes.
fn default_min_output_bytes() -> u64 {
    12
}
