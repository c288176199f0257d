//! The native scene host.

use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};
use uuid::Uuid;

use meshglb_core::config::HostConfig;
use meshglb_core::error::{AppError, ErrorKind};
use meshglb_core::result::AppResult;
use meshglb_core::traits::{SceneHost, SceneObjectInfo};
use meshglb_core::types::{Capability, ExportSettings, ImportOperation, UnitSettings, UnitSystem};

use crate::addons::{AddonInfo, AddonRegistry};
use crate::gltf::GltfWriter;
use crate::importers::{Importer, ObjImporter, PlyImporter, PlyMode, UsdImporter};
use crate::scene::SceneGraph;

/// In-process [`SceneHost`].
///
/// Core operators are always registered; add-on operators appear once
/// their add-on is enabled and disappear again on [`SceneHost::reset`],
/// which restores factory state.
#[derive(Debug)]
pub struct NativeHost {
    scene: SceneGraph,
    addons: AddonRegistry,
    operators: HashMap<ImportOperation, Box<dyn Importer>>,
    enabled: BTreeSet<&'static str>,
}

impl NativeHost {
    /// Host with every bundled add-on available.
    pub fn new() -> Self {
        Self::from_config(&HostConfig::default())
    }

    /// Host honouring `host.disabled_addons`.
    pub fn from_config(config: &HostConfig) -> Self {
        if !config.disabled_addons.is_empty() {
            info!(disabled = ?config.disabled_addons, "Add-ons disabled by configuration");
        }
        let mut host = Self {
            scene: SceneGraph::new(),
            addons: AddonRegistry::new(&config.disabled_addons),
            operators: HashMap::new(),
            enabled: BTreeSet::new(),
        };
        host.register_core_operators();
        host
    }

    fn register_core_operators(&mut self) {
        self.operators
            .insert(ImportOperation::ObjModern, Box::new(ObjImporter));
        self.operators.insert(
            ImportOperation::PlyModern,
            Box::new(PlyImporter::new(PlyMode::Lenient)),
        );
        self.operators
            .insert(ImportOperation::UsdModern, Box::new(UsdImporter));
    }

    /// Read-only access to the scene graph.
    pub fn scene(&self) -> &SceneGraph {
        &self.scene
    }

    /// Add-ons this host could enable.
    pub fn available_addons(&self) -> Vec<AddonInfo> {
        self.addons.list()
    }

    /// Whether `operation` currently resolves to an importer.
    pub fn has_operator(&self, operation: ImportOperation) -> bool {
        self.operators.contains_key(&operation)
    }

    /// Write `bytes` to `path` through a temporary sibling so readers never
    /// observe a partial file.
    fn write_atomic(path: &Path, bytes: &[u8]) -> AppResult<()> {
        let parent = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&parent).map_err(|e| {
            AppError::with_source(
                ErrorKind::Export,
                format!("Cannot create output directory '{}'", parent.display()),
                e,
            )
        })?;

        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("export");
        let temp = parent.join(format!(".{stem}__{}.tmp", Uuid::now_v7().simple()));

        if let Err(e) = fs::write(&temp, bytes) {
            let _ = fs::remove_file(&temp);
            return Err(AppError::with_source(
                ErrorKind::Export,
                format!("Cannot write '{}'", temp.display()),
                e,
            ));
        }
        if let Err(e) = fs::rename(&temp, path) {
            let _ = fs::remove_file(&temp);
            return Err(AppError::with_source(
                ErrorKind::Export,
                format!("Cannot move export into '{}'", path.display()),
                e,
            ));
        }
        Ok(())
    }
}

impl Default for NativeHost {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneHost for NativeHost {
    fn host_name(&self) -> &str {
        "native"
    }

    fn reset(&mut self) -> AppResult<()> {
        self.scene.clear();
        for module in std::mem::take(&mut self.enabled) {
            debug!(addon = module, "Unloading add-on");
        }
        self.operators.clear();
        self.register_core_operators();
        debug!("Scene reset to factory state");
        Ok(())
    }

    fn enable_capability(&mut self, capability: Capability) -> AppResult<()> {
        if self.enabled.contains(capability.id()) {
            return Ok(());
        }
        let addon = *self.addons.find(capability)?;
        for (operation, importer) in addon.install() {
            debug!(addon = addon.module(), operator = %operation, "Registering operator");
            self.operators.insert(operation, importer);
        }
        self.enabled.insert(addon.module());
        info!(addon = addon.module(), "Add-on enabled");
        Ok(())
    }

    fn import(&mut self, operation: ImportOperation, path: &Path) -> AppResult<()> {
        let importer = self
            .operators
            .get(&operation)
            .ok_or_else(|| AppError::operator_not_found(operation.operator_id()))?;

        if !path.is_file() {
            return Err(AppError::import(format!(
                "Cannot open file '{}'",
                path.display()
            )));
        }

        debug!(operator = %operation, importer = importer.label(), path = %path.display(), "Running import operator");
        let imported = importer.read(path)?;

        let count = imported.objects.len();
        for object in imported.objects {
            self.scene.add(object);
        }
        if let Some(units) = imported.units {
            *self.scene.units_mut() = units;
        }
        info!(operator = %operation, objects = count, "Import finished");
        Ok(())
    }

    fn objects(&self) -> Vec<SceneObjectInfo> {
        self.scene.object_infos()
    }

    fn unit_settings(&self) -> UnitSettings {
        self.scene.units()
    }

    fn set_unit_system(&mut self, system: UnitSystem) {
        self.scene.units_mut().system = system;
    }

    fn set_unit_scale(&mut self, scale_length: f64) {
        self.scene.units_mut().scale_length = scale_length;
    }

    fn export_glb(&mut self, path: &Path, settings: &ExportSettings) -> AppResult<()> {
        let container = GltfWriter::new(*settings).build(&self.scene)?;
        let bytes = container.to_bytes()?;
        if self.scene.objects().is_empty() {
            warn!("Exporting a scene without objects");
        }
        Self::write_atomic(path, &bytes)?;
        info!(path = %path.display(), bytes = bytes.len(), "GLB written");
        Ok(())
    }
}
