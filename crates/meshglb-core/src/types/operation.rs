//! Import operations a host may expose.

use std::fmt;

/// One concrete import entry point of the host.
///
/// Different host versions expose the same importer under different
/// operator names; strategies list several of these and try them in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImportOperation {
    /// `import_scene.obj`, provided by the `io_scene_obj` add-on.
    ObjLegacy,
    /// `wm.obj_import`, built into newer hosts.
    ObjModern,
    /// `import_mesh.ply`, provided by the `io_mesh_ply` add-on.
    PlyLegacy,
    /// `wm.ply_import`, built into newer hosts.
    PlyModern,
    /// `wm.usd_import`.
    UsdModern,
    /// `usd.import_`, only present in older hosts.
    UsdLegacy,
}

impl ImportOperation {
    /// Host operator identifier for this operation.
    pub fn operator_id(&self) -> &'static str {
        match self {
            Self::ObjLegacy => "import_scene.obj",
            Self::ObjModern => "wm.obj_import",
            Self::PlyLegacy => "import_mesh.ply",
            Self::PlyModern => "wm.ply_import",
            Self::UsdModern => "wm.usd_import",
            Self::UsdLegacy => "usd.import_",
        }
    }
}

impl fmt::Display for ImportOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.operator_id())
    }
}
