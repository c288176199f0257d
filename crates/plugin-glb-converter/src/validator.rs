//! Post-import scene check.

use tracing::{debug, warn};

use meshglb_core::traits::SceneHost;

use crate::error::ConversionError;

/// Requires at least one object of an accepted kind.
#[derive(Debug, Clone, Copy, Default)]
pub struct SceneValidator;

impl SceneValidator {
    /// Number of accepted objects, or [`ConversionError::SceneEmpty`].
    pub fn validate<H: SceneHost + ?Sized>(host: &H) -> Result<usize, ConversionError> {
        let objects = host.objects();
        let accepted = objects.iter().filter(|o| o.kind.is_accepted()).count();
        debug!(total = objects.len(), accepted, "Scene contents after import");

        if accepted == 0 {
            let kinds: Vec<_> = objects.iter().map(|o| o.kind.tag()).collect();
            warn!(kinds = ?kinds, "No usable objects after import");
            return Err(ConversionError::SceneEmpty);
        }
        Ok(accepted)
    }
}
