//! Conversion processor: runs the pipeline stages in order.

use std::time::Instant;

use tracing::{info, instrument};

use meshglb_core::config::ConversionConfig;
use meshglb_core::traits::SceneHost;

use crate::error::ConversionError;
use crate::executor::ImportExecutor;
use crate::exporter::GlbExporter;
use crate::formats::FormatDispatcher;
use crate::models::{ConversionReport, ConversionRequest};
use crate::reporter::StatusReporter;
use crate::units::UnitNormalizer;
use crate::validator::SceneValidator;

/// The main conversion processor.
#[derive(Debug, Clone)]
pub struct ConversionProcessor {
    config: ConversionConfig,
}

impl ConversionProcessor {
    /// Create a processor with the given pipeline settings.
    pub fn new(config: ConversionConfig) -> Self {
        Self { config }
    }

    /// Convert one file. The host serves this single request.
    #[instrument(
        skip_all,
        fields(
            input = %request.input_path.display(),
            output = %request.output_path.display(),
            host = host.host_name(),
        )
    )]
    pub fn run<H: SceneHost + ?Sized>(
        &self,
        host: &mut H,
        request: &ConversionRequest,
        reporter: &mut dyn StatusReporter,
    ) -> Result<ConversionReport, ConversionError> {
        let start = Instant::now();

        // Stage 1: fresh scene
        host.reset()
            .map_err(|source| ConversionError::SceneReset { source })?;

        // Stage 2: strategy
        let strategy = FormatDispatcher::select(&request.input_path)?;

        // Stage 3: import
        let warnings = ImportExecutor::enable_capabilities(host, strategy, reporter);
        let operation = ImportExecutor::run(host, strategy, &request.input_path)?;

        // Stage 4: validate
        let accepted_count = SceneValidator::validate(host)?;
        let object_count = host.objects().len();

        // Stage 5: units
        UnitNormalizer::normalize(host);

        // Stage 6: export
        let output_bytes =
            GlbExporter::new(self.config.min_output_bytes).export(host, &request.output_path)?;

        let report = ConversionReport {
            input_path: request.input_path.clone(),
            output_path: request.output_path.clone(),
            family: strategy.family,
            operator: operation.operator_id().to_string(),
            object_count,
            accepted_count,
            output_bytes,
            warnings,
            duration_ms: start.elapsed().as_millis() as u64,
        };
        info!(
            family = %report.family,
            operator = %report.operator,
            objects = report.object_count,
            bytes = report.output_bytes,
            duration_ms = report.duration_ms,
            "Conversion completed"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::ScriptedHost;
    use meshglb_core::types::{ImportOperation, ObjectKind, UnitSettings, UnitSystem};

    fn processor() -> ConversionProcessor {
        ConversionProcessor::new(ConversionConfig::default())
    }

    fn request(dir: &tempfile::TempDir, input: &str) -> ConversionRequest {
        ConversionRequest::new(dir.path().join(input), dir.path().join("out.glb")).expect("request")
    }

    #[test]
    fn test_obj_success_path() {
        let temp = tempfile::tempdir().expect("tempdir");
        let mut host = ScriptedHost::new()
            .succeed_import(ImportOperation::ObjLegacy, &[ObjectKind::Mesh])
            .import_units(UnitSettings {
                system: UnitSystem::Imperial,
                scale_length: 0.3048,
            });
        let mut warnings: Vec<String> = Vec::new();

        let report = processor()
            .run(&mut host, &request(&temp, "model.obj"), &mut warnings)
            .expect("convert");

        assert_eq!(report.operator, "import_scene.obj");
        assert_eq!(report.accepted_count, 1);
        assert!(warnings.is_empty());
        assert!(host.unit_settings().is_canonical());
        assert_eq!(
            host.calls(),
            &["reset", "enable io_scene_obj", "import import_scene.obj", "export"]
        );
    }

    #[test]
    fn test_unsupported_extension_touches_nothing_but_reset() {
        let temp = tempfile::tempdir().expect("tempdir");
        let mut host = ScriptedHost::new();
        let err = processor()
            .run(&mut host, &request(&temp, "weird.fbx"), &mut Vec::new())
            .expect_err("unsupported");
        assert_eq!(err.exit_code(), 3);
        assert_eq!(host.calls(), &["reset"]);
    }

    #[test]
    fn test_usd_failure_skips_validation_and_export() {
        let temp = tempfile::tempdir().expect("tempdir");
        let mut host = ScriptedHost::new().fail_import(ImportOperation::UsdModern, "bad layer");
        let err = processor()
            .run(&mut host, &request(&temp, "scan.usdz"), &mut Vec::new())
            .expect_err("usd failure");
        assert_eq!(err.exit_code(), 2);
        assert!(err.to_string().starts_with("USD import failed"));
        assert_eq!(host.import_calls(), vec!["wm.usd_import", "usd.import_"]);
        assert!(!host.calls().iter().any(|c| c == "export"));
    }

    #[test]
    fn test_empty_import_exits_five() {
        let temp = tempfile::tempdir().expect("tempdir");
        let mut host = ScriptedHost::new().succeed_import(ImportOperation::PlyLegacy, &[]);
        let err = processor()
            .run(&mut host, &request(&temp, "empty.ply"), &mut Vec::new())
            .expect_err("empty");
        assert_eq!(err.exit_code(), 5);
        assert_eq!(err.to_string(), "Scene empty after import");
    }

    #[test]
    fn test_capability_warning_does_not_stop_pipeline() {
        let temp = tempfile::tempdir().expect("tempdir");
        let mut host = ScriptedHost::new()
            .fail_capability("io_mesh_ply")
            .succeed_import(ImportOperation::PlyModern, &[ObjectKind::Mesh]);
        let mut warnings: Vec<String> = Vec::new();
        let report = processor()
            .run(&mut host, &request(&temp, "scan.ply"), &mut warnings)
            .expect("convert");
        assert_eq!(warnings.len(), 1);
        assert_eq!(report.warnings, warnings);
        assert_eq!(report.operator, "wm.ply_import");
    }

    #[test]
    fn test_partial_objects_from_failed_attempt_survive() {
        let temp = tempfile::tempdir().expect("tempdir");
        let mut host = ScriptedHost::new()
            .fail_import_partially(ImportOperation::ObjLegacy, &[ObjectKind::Empty], "half done")
            .succeed_import(ImportOperation::ObjModern, &[ObjectKind::Mesh]);
        let report = processor()
            .run(&mut host, &request(&temp, "model.obj"), &mut Vec::new())
            .expect("convert");
        assert_eq!(report.object_count, 2);
    }

    #[test]
    fn test_reset_failure_exits_one() {
        let temp = tempfile::tempdir().expect("tempdir");
        let mut host = ScriptedHost::new().fail_reset("context lost");
        let err = processor()
            .run(&mut host, &request(&temp, "model.obj"), &mut Vec::new())
            .expect_err("reset");
        assert_eq!(err.exit_code(), 1);
        assert_eq!(host.calls(), &["reset"]);
    }

    #[test]
    fn test_export_failure_exits_six() {
        let temp = tempfile::tempdir().expect("tempdir");
        let mut host = ScriptedHost::new()
            .succeed_import(ImportOperation::UsdModern, &[ObjectKind::Volume])
            .fail_export("writer crashed");
        let err = processor()
            .run(&mut host, &request(&temp, "cloud.usda"), &mut Vec::new())
            .expect_err("export");
        assert_eq!(err.exit_code(), 6);
    }
}
