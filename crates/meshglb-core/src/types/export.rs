//! Export settings handed to the host's glTF exporter.

use serde::{Deserialize, Serialize};

/// Container format written by the glTF exporter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExportFormat {
    /// Single-file binary glTF.
    Glb,
}

/// glTF export options.
///
/// The pipeline only ever uses [`ExportSettings::CANONICAL`]; the struct
/// exists so hosts can assert what they were asked to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportSettings {
    /// Container format.
    pub format: ExportFormat,
    /// Convert the host's Z-up convention to glTF's Y-up.
    pub y_up: bool,
    /// Bake object transforms and modifiers into vertex data.
    pub apply_transforms: bool,
}

impl ExportSettings {
    /// Binary glTF, Y-up, transforms applied.
    pub const CANONICAL: ExportSettings = ExportSettings {
        format: ExportFormat::Glb,
        y_up: true,
        apply_transforms: true,
    };
}
