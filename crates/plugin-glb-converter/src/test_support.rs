//! Scripted [`SceneHost`] double for pipeline tests.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use meshglb_core::error::AppError;
use meshglb_core::result::AppResult;
use meshglb_core::traits::{SceneHost, SceneObjectInfo};
use meshglb_core::types::{
    Capability, ExportSettings, ImportOperation, ObjectKind, UnitSettings, UnitSystem,
};

/// What one import operator does when called.
#[derive(Debug, Clone)]
struct ImportScript {
    adds: Vec<ObjectKind>,
    error: Option<String>,
}

/// Host whose every answer is scripted up front. Records the calls it
/// receives in order.
#[derive(Debug, Default)]
pub struct ScriptedHost {
    objects: Vec<ObjectKind>,
    units: UnitSettings,
    imports: HashMap<ImportOperation, ImportScript>,
    import_units: Option<UnitSettings>,
    failing_capabilities: Vec<&'static str>,
    reset_error: Option<String>,
    export_error: Option<String>,
    skip_write: bool,
    last_export: Option<ExportSettings>,
    calls: Vec<String>,
}

impl ScriptedHost {
    /// Bytes written by a successful export.
    pub const EXPORT_BYTES: usize = 64;

    pub fn new() -> Self {
        Self::default()
    }

    /// Host whose scene already holds `kinds` (no reset involved).
    pub fn with_objects(kinds: &[ObjectKind]) -> Self {
        Self {
            objects: kinds.to_vec(),
            ..Self::default()
        }
    }

    pub fn succeed_import(mut self, op: ImportOperation, adds: &[ObjectKind]) -> Self {
        self.imports.insert(
            op,
            ImportScript {
                adds: adds.to_vec(),
                error: None,
            },
        );
        self
    }

    pub fn fail_import(self, op: ImportOperation, message: &str) -> Self {
        self.fail_import_partially(op, &[], message)
    }

    /// Failing operator that still leaves `adds` in the scene.
    pub fn fail_import_partially(mut self, op: ImportOperation, adds: &[ObjectKind], message: &str) -> Self {
        self.imports.insert(
            op,
            ImportScript {
                adds: adds.to_vec(),
                error: Some(message.to_string()),
            },
        );
        self
    }

    /// Units a successful import leaves behind.
    pub fn import_units(mut self, units: UnitSettings) -> Self {
        self.import_units = Some(units);
        self
    }

    pub fn fail_capability(mut self, id: &'static str) -> Self {
        self.failing_capabilities.push(id);
        self
    }

    pub fn fail_reset(mut self, message: &str) -> Self {
        self.reset_error = Some(message.to_string());
        self
    }

    pub fn fail_export(mut self, message: &str) -> Self {
        self.export_error = Some(message.to_string());
        self
    }

    /// Export reports success without writing anything.
    pub fn skip_export_write(mut self) -> Self {
        self.skip_write = true;
        self
    }

    /// Every call received, e.g. `reset`, `enable io_scene_obj`,
    /// `import wm.obj_import`, `export`.
    pub fn calls(&self) -> &[String] {
        &self.calls
    }

    /// Operator ids passed to `import`, in order.
    pub fn import_calls(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|c| c.strip_prefix("import "))
            .collect()
    }

    /// Settings of the last export call.
    pub fn export_settings(&self) -> Option<ExportSettings> {
        self.last_export
    }
}

impl SceneHost for ScriptedHost {
    fn host_name(&self) -> &str {
        "scripted"
    }

    fn reset(&mut self) -> AppResult<()> {
        self.calls.push("reset".into());
        if let Some(message) = &self.reset_error {
            return Err(AppError::internal(message.clone()));
        }
        self.objects.clear();
        self.units = UnitSettings {
            system: UnitSystem::None,
            scale_length: 1.0,
        };
        Ok(())
    }

    fn enable_capability(&mut self, capability: Capability) -> AppResult<()> {
        self.calls.push(format!("enable {capability}"));
        if self.failing_capabilities.contains(&capability.id()) {
            return Err(AppError::capability(format!("No module named '{capability}'")));
        }
        Ok(())
    }

    fn import(&mut self, operation: ImportOperation, _path: &Path) -> AppResult<()> {
        self.calls.push(format!("import {}", operation.operator_id()));
        let script = self
            .imports
            .get(&operation)
            .cloned()
            .ok_or_else(|| AppError::operator_not_found(operation.operator_id()))?;
        self.objects.extend(script.adds);
        match script.error {
            Some(message) => Err(AppError::import(message)),
            None => {
                if let Some(units) = self.import_units {
                    self.units = units;
                }
                Ok(())
            }
        }
    }

    fn objects(&self) -> Vec<SceneObjectInfo> {
        self.objects
            .iter()
            .enumerate()
            .map(|(i, kind)| SceneObjectInfo::new(format!("obj{i}"), *kind))
            .collect()
    }

    fn unit_settings(&self) -> UnitSettings {
        self.units
    }

    fn set_unit_system(&mut self, system: UnitSystem) {
        self.units.system = system;
    }

    fn set_unit_scale(&mut self, scale_length: f64) {
        self.units.scale_length = scale_length;
    }

    fn export_glb(&mut self, path: &Path, settings: &ExportSettings) -> AppResult<()> {
        self.calls.push("export".into());
        self.last_export = Some(*settings);
        if let Some(message) = &self.export_error {
            return Err(AppError::export(message.clone()));
        }
        if !self.skip_write {
            let mut bytes = b"glTF".to_vec();
            bytes.resize(Self::EXPORT_BYTES, 0);
            fs::write(path, bytes)?;
        }
        Ok(())
    }
}
