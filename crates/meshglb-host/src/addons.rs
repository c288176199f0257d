//! Bundled add-ons.
//!
//! An add-on contributes extra import operators when enabled. The host
//! ships the legacy OBJ and PLY importers this way; deployments can pretend
//! an add-on is absent through `host.disabled_addons`.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::info;

use meshglb_core::error::AppError;
use meshglb_core::result::AppResult;
use meshglb_core::types::{Capability, ImportOperation};

use crate::importers::{Importer, PlyImporter, PlyMode, StrictObjImporter};

/// Metadata about a bundled add-on.
#[derive(Debug, Clone, Serialize)]
pub struct AddonInfo {
    /// Module id used to enable the add-on.
    pub module: &'static str,
    /// Human-readable name.
    pub name: &'static str,
    /// Operator ids registered on enable.
    pub operators: Vec<&'static str>,
}

/// An add-on the host knows how to load.
#[derive(Debug, Clone, Copy)]
pub struct BundledAddon {
    module: &'static str,
    name: &'static str,
    install: fn() -> Vec<(ImportOperation, Box<dyn Importer>)>,
}

impl BundledAddon {
    /// Module id.
    pub fn module(&self) -> &'static str {
        self.module
    }

    /// Build the operators this add-on registers.
    pub fn install(&self) -> Vec<(ImportOperation, Box<dyn Importer>)> {
        (self.install)()
    }

    /// Describe the add-on.
    pub fn info(&self) -> AddonInfo {
        AddonInfo {
            module: self.module,
            name: self.name,
            operators: self
                .install()
                .into_iter()
                .map(|(op, _)| op.operator_id())
                .collect(),
        }
    }
}

fn install_obj() -> Vec<(ImportOperation, Box<dyn Importer>)> {
    vec![(
        ImportOperation::ObjLegacy,
        Box::new(StrictObjImporter) as Box<dyn Importer>,
    )]
}

fn install_ply() -> Vec<(ImportOperation, Box<dyn Importer>)> {
    vec![(
        ImportOperation::PlyLegacy,
        Box::new(PlyImporter::new(PlyMode::Strict)) as Box<dyn Importer>,
    )]
}

/// Every add-on shipped with the host.
pub const BUNDLED: [BundledAddon; 2] = [
    BundledAddon {
        module: Capability::OBJ_IMPORTER.id(),
        name: "Wavefront OBJ format (legacy)",
        install: install_obj,
    },
    BundledAddon {
        module: Capability::PLY_IMPORTER.id(),
        name: "Stanford PLY format (legacy)",
        install: install_ply,
    },
];

/// Add-ons available to one host instance.
#[derive(Debug, Clone)]
pub struct AddonRegistry {
    available: BTreeMap<&'static str, BundledAddon>,
}

impl AddonRegistry {
    /// All bundled add-ons except those listed in `disabled`.
    pub fn new(disabled: &[String]) -> Self {
        let available = BUNDLED
            .iter()
            .filter(|addon| !disabled.iter().any(|d| d == addon.module))
            .map(|addon| (addon.module, *addon))
            .collect();
        Self { available }
    }

    /// Look up an add-on to enable.
    pub fn find(&self, capability: Capability) -> AppResult<&BundledAddon> {
        let addon = self.available.get(capability.id()).ok_or_else(|| {
            AppError::capability(format!("Add-on not loaded: '{}'", capability.id()))
        })?;
        info!(addon = addon.module, "Resolved add-on");
        Ok(addon)
    }

    /// Metadata of the available add-ons, ordered by module id.
    pub fn list(&self) -> Vec<AddonInfo> {
        self.available.values().map(BundledAddon::info).collect()
    }
}

impl Default for AddonRegistry {
    fn default() -> Self {
        Self::new(&[])
    }
}
