//! GLB export stage.

use std::fs;
use std::path::Path;

use tracing::{debug, error};

use meshglb_core::traits::SceneHost;
use meshglb_core::types::ExportSettings;

use crate::error::ConversionError;

/// Runs the fixed-configuration export and checks the result on disk.
#[derive(Debug, Clone, Copy)]
pub struct GlbExporter {
    min_output_bytes: u64,
}

impl GlbExporter {
    /// Exporter requiring at least `min_output_bytes` in the written file.
    pub fn new(min_output_bytes: u64) -> Self {
        Self { min_output_bytes }
    }

    /// Export the scene to `output`. Returns the written size.
    pub fn export<H: SceneHost + ?Sized>(
        &self,
        host: &mut H,
        output: &Path,
    ) -> Result<u64, ConversionError> {
        let settings = ExportSettings::CANONICAL;
        debug!(path = %output.display(), ?settings, "Exporting GLB");

        host.export_glb(output, &settings).map_err(|source| {
            error!(path = %output.display(), error = %source, "Exporter raised");
            ConversionError::ExportFailed { source }
        })?;

        let size = fs::metadata(output)
            .map(|m| m.len())
            .map_err(|_| ConversionError::OutputNotCreated {
                path: output.to_path_buf(),
            })?;

        if size < self.min_output_bytes {
            return Err(ConversionError::OutputTooSmall {
                path: output.to_path_buf(),
                size,
                min: self.min_output_bytes,
            });
        }
        Ok(size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::ScriptedHost;

    #[test]
    fn test_uses_canonical_settings() {
        let temp = tempfile::tempdir().expect("tempdir");
        let out = temp.path().join("out.glb");
        let mut host = ScriptedHost::new();

        let size = GlbExporter::new(12).export(&mut host, &out).expect("export");
        assert_eq!(size, ScriptedHost::EXPORT_BYTES as u64);
        assert_eq!(host.export_settings(), Some(ExportSettings::CANONICAL));
    }

    #[test]
    fn test_exporter_error_exits_six() {
        let temp = tempfile::tempdir().expect("tempdir");
        let mut host = ScriptedHost::new().fail_export("disk full");
        let err = GlbExporter::new(12)
            .export(&mut host, &temp.path().join("out.glb"))
            .expect_err("fail");
        assert_eq!(err.exit_code(), 6);
        assert_eq!(err.to_string(), "Export failed: disk full");
    }

    #[test]
    fn test_silent_exporter_is_caught() {
        let temp = tempfile::tempdir().expect("tempdir");
        let mut host = ScriptedHost::new().skip_export_write();
        let err = GlbExporter::new(12)
            .export(&mut host, &temp.path().join("out.glb"))
            .expect_err("fail");
        assert!(matches!(err, ConversionError::OutputNotCreated { .. }));
    }

    #[test]
    fn test_undersized_output_is_caught() {
        let temp = tempfile::tempdir().expect("tempdir");
        let mut host = ScriptedHost::new();
        let err = GlbExporter::new(1024)
            .export(&mut host, &temp.path().join("out.glb"))
            .expect_err("fail");
        assert!(matches!(err, ConversionError::OutputTooSmall { min: 1024, .. }));
    }
}
