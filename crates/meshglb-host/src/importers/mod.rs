//! File importers.
//!
//! Each importer reads a whole file into an [`ImportedScene`]; the host only
//! merges the result into its scene graph when the read succeeded.

pub mod obj;
pub mod obj_strict;
pub mod ply;
pub mod usd;

use std::fmt;
use std::path::Path;

use glam::{Mat4, Vec3, Vec4};

use meshglb_core::result::AppResult;
use meshglb_core::types::UnitSettings;

use crate::scene::SceneObject;

pub use obj::ObjImporter;
pub use obj_strict::StrictObjImporter;
pub use ply::{PlyImporter, PlyMode};
pub use usd::UsdImporter;

/// Objects read from one file.
#[derive(Debug, Default)]
pub struct ImportedScene {
    /// Objects in file order, already in the host's Z-up convention.
    pub objects: Vec<SceneObject>,
    /// Unit settings declared by the source, if any.
    pub units: Option<UnitSettings>,
}

/// A reader for one source format.
pub trait Importer: fmt::Debug + Send + Sync {
    /// Short label used in logs.
    fn label(&self) -> &'static str;

    /// Read `path` completely.
    fn read(&self, path: &Path) -> AppResult<ImportedScene>;
}

/// Rotation taking Y-up source data into the host's Z-up frame:
/// `(x, y, z) -> (x, -z, y)`.
pub fn y_up_to_z_up() -> Mat4 {
    Mat4::from_cols(
        Vec4::new(1.0, 0.0, 0.0, 0.0),
        Vec4::new(0.0, 0.0, 1.0, 0.0),
        Vec4::new(0.0, -1.0, 0.0, 0.0),
        Vec4::W,
    )
}

/// Apply [`y_up_to_z_up`] to a single vector.
pub fn y_up_vec_to_z_up(v: Vec3) -> Vec3 {
    Vec3::new(v.x, -v.z, v.y)
}

/// Split a polygon into a triangle fan. Polygons with fewer than three
/// corners yield nothing.
pub fn fan_triangulate(corners: &[u32], out: &mut Vec<[u32; 3]>) {
    if corners.len() < 3 {
        return;
    }
    for i in 1..corners.len() - 1 {
        out.push([corners[0], corners[i], corners[i + 1]]);
    }
}

/// Object name derived from a file stem.
pub fn stem_name(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .unwrap_or("Mesh")
        .to_string()
}
