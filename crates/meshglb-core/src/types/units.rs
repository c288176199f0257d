//! Scene unit settings.

use serde::{Deserialize, Serialize};

/// Measurement system of a scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UnitSystem {
    /// No unit system; values are plain numbers.
    #[default]
    None,
    /// Meters and derived units.
    Metric,
    /// Feet, inches and derived units.
    Imperial,
}

/// Unit system plus the length scale applied to scene values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UnitSettings {
    /// Measurement system.
    pub system: UnitSystem,
    /// Meters per scene unit.
    pub scale_length: f64,
}

impl UnitSettings {
    /// The canonical settings every exported file is normalized to.
    pub const CANONICAL: UnitSettings = UnitSettings {
        system: UnitSystem::Metric,
        scale_length: 1.0,
    };

    /// Returns `true` if these settings equal [`UnitSettings::CANONICAL`].
    pub fn is_canonical(&self) -> bool {
        self.system == UnitSystem::Metric && self.scale_length == 1.0
    }
}

impl Default for UnitSettings {
    fn default() -> Self {
        Self::CANONICAL
    }
}
