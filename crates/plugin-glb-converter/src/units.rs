//! Scene unit normalization.

use tracing::debug;

use meshglb_core::traits::SceneHost;
use meshglb_core::types::UnitSettings;

/// Forces metric units at scale 1.0.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnitNormalizer;

impl UnitNormalizer {
    /// Apply the canonical unit settings. Returns what the scene had before.
    pub fn normalize<H: SceneHost + ?Sized>(host: &mut H) -> UnitSettings {
        let previous = host.unit_settings();
        host.set_unit_system(UnitSettings::CANONICAL.system);
        host.set_unit_scale(UnitSettings::CANONICAL.scale_length);
        if !previous.is_canonical() {
            debug!(
                system = ?previous.system,
                scale_length = previous.scale_length,
                "Normalized scene units to metric 1.0"
            );
        }
        previous
    }
}
