//! Strict Wavefront OBJ importer backed by `tobj`.
//!
//! Registered as `import_scene.obj` by the `io_scene_obj` add-on. Any parse
//! error aborts the import, which lets the lenient core importer take over.

use std::path::Path;

use glam::{Vec2, Vec3, Vec4};
use tracing::debug;

use meshglb_core::error::{AppError, ErrorKind};
use meshglb_core::result::AppResult;

use super::{ImportedScene, Importer, y_up_vec_to_z_up};
use crate::scene::{MeshData, ObjectData, SceneObject};

/// OBJ importer with strict parsing.
#[derive(Debug, Default)]
pub struct StrictObjImporter;

impl StrictObjImporter {
    fn load_options() -> tobj::LoadOptions {
        tobj::LoadOptions {
            single_index: true,
            triangulate: true,
            ignore_points: true,
            ignore_lines: true,
            ..Default::default()
        }
    }

    fn model_to_mesh(mesh: &tobj::Mesh) -> MeshData {
        let positions: Vec<Vec3> = mesh
            .positions
            .chunks_exact(3)
            .map(|p| y_up_vec_to_z_up(Vec3::new(p[0], p[1], p[2])))
            .collect();
        let n = positions.len();

        let normals = if mesh.normals.len() == n * 3 {
            mesh.normals
                .chunks_exact(3)
                .map(|v| y_up_vec_to_z_up(Vec3::new(v[0], v[1], v[2])))
                .collect()
        } else {
            Vec::new()
        };

        let uvs = if mesh.texcoords.len() == n * 2 {
            mesh.texcoords
                .chunks_exact(2)
                .map(|t| Vec2::new(t[0], t[1]))
                .collect()
        } else {
            Vec::new()
        };

        let colors = if mesh.vertex_color.len() == n * 3 {
            mesh.vertex_color
                .chunks_exact(3)
                .map(|c| Vec4::new(c[0], c[1], c[2], 1.0))
                .collect()
        } else {
            Vec::new()
        };

        let triangles = mesh
            .indices
            .chunks_exact(3)
            .map(|t| [t[0], t[1], t[2]])
            .collect();

        MeshData {
            positions,
            normals,
            uvs,
            colors,
            triangles,
        }
    }
}

impl Importer for StrictObjImporter {
    fn label(&self) -> &'static str {
        "obj-strict"
    }

    fn read(&self, path: &Path) -> AppResult<ImportedScene> {
        let (models, materials) = tobj::load_obj(path, &Self::load_options()).map_err(|e| {
            AppError::with_source(
                ErrorKind::Import,
                format!("Failed to load OBJ '{}': {e}", path.display()),
                e,
            )
        })?;

        if let Err(e) = materials {
            debug!(path = %path.display(), error = %e, "Material library not loaded");
        }

        let mut scene = ImportedScene::default();
        for model in &models {
            let mesh = Self::model_to_mesh(&model.mesh);
            if mesh.triangles.is_empty() {
                debug!(model = %model.name, "Skipping OBJ model without faces");
                continue;
            }
            mesh.validate()?;
            let name = if model.name.is_empty() {
                super::stem_name(path)
            } else {
                model.name.clone()
            };
            scene
                .objects
                .push(SceneObject::new(name, ObjectData::Mesh(mesh)));
        }

        debug!(path = %path.display(), objects = scene.objects.len(), "Strict OBJ import finished");
        Ok(scene)
    }
}
