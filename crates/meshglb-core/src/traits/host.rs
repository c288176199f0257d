//! The scene host collaborator.
//!
//! A host owns the scene graph, the importer and exporter implementations,
//! and the unit system. The conversion pipeline only talks to it through
//! [`SceneHost`]; the native implementation lives in `meshglb-host`.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::result::AppResult;
use crate::types::{Capability, ExportSettings, ImportOperation, ObjectKind, UnitSettings, UnitSystem};

/// Name and kind of one object currently in the scene.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneObjectInfo {
    /// Object name as assigned by the importer.
    pub name: String,
    /// Object kind.
    pub kind: ObjectKind,
}

impl SceneObjectInfo {
    /// Create a new object description.
    pub fn new(name: impl Into<String>, kind: ObjectKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

/// Trait for 3D-content hosts driven by the conversion pipeline.
///
/// Every operation is synchronous and either completes or returns an error.
/// A host handle is exclusively borrowed for the duration of one conversion.
pub trait SceneHost {
    /// Short name of the host implementation, used in logs.
    fn host_name(&self) -> &str;

    /// Discard all scene content and return to an empty scene.
    fn reset(&mut self) -> AppResult<()>;

    /// Activate an optional add-on. Failures are non-fatal to callers that
    /// treat activation as best-effort.
    fn enable_capability(&mut self, capability: Capability) -> AppResult<()>;

    /// Run one import operation against `path`, adding objects to the scene.
    fn import(&mut self, operation: ImportOperation, path: &Path) -> AppResult<()>;

    /// List the objects currently in the scene.
    fn objects(&self) -> Vec<SceneObjectInfo>;

    /// Current unit settings of the scene.
    fn unit_settings(&self) -> UnitSettings;

    /// Set the scene's measurement system.
    fn set_unit_system(&mut self, system: UnitSystem);

    /// Set the scene's length scale (meters per unit).
    fn set_unit_scale(&mut self, scale_length: f64);

    /// Write the scene as glTF to `path` using `settings`.
    fn export_glb(&mut self, path: &Path, settings: &ExportSettings) -> AppResult<()>;
}
