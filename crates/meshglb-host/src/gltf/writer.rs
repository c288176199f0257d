//! Scene graph to glTF document.

use glam::{Mat3, Mat4, Vec2, Vec3, Vec4};
use serde_json::{Map, Value, json};
use tracing::debug;

use meshglb_core::error::AppError;
use meshglb_core::result::AppResult;
use meshglb_core::types::{ExportFormat, ExportSettings};

use super::{
    ARRAY_BUFFER, ELEMENT_ARRAY_BUFFER, FLOAT, GlbContainer, MODE_LINES, MODE_POINTS,
    MODE_TRIANGLES, UNSIGNED_INT,
};
use crate::scene::{CurveData, MeshData, ObjectData, SceneGraph, SceneObject};

const GENERATOR: &str = concat!("meshglb ", env!("CARGO_PKG_VERSION"));

/// Host Z-up to glTF Y-up: `(x, y, z) -> (x, z, -y)`.
fn z_up_to_y_up() -> Mat4 {
    Mat4::from_cols(
        Vec4::new(1.0, 0.0, 0.0, 0.0),
        Vec4::new(0.0, 0.0, -1.0, 0.0),
        Vec4::new(0.0, 1.0, 0.0, 0.0),
        Vec4::W,
    )
}

/// Builds glTF documents from a scene.
#[derive(Debug, Clone, Copy)]
pub struct GltfWriter {
    settings: ExportSettings,
}

impl GltfWriter {
    /// Create a writer with the given export settings.
    pub fn new(settings: ExportSettings) -> Self {
        Self { settings }
    }

    /// Convert `scene` into a GLB container.
    pub fn build(&self, scene: &SceneGraph) -> AppResult<GlbContainer> {
        let ExportFormat::Glb = self.settings.format;

        let axis = if self.settings.y_up {
            z_up_to_y_up()
        } else {
            Mat4::IDENTITY
        };
        let unit_scale = Mat4::from_scale(Vec3::splat(scene.units().scale_length as f32));

        let mut doc = DocumentBuilder::default();
        for object in scene.objects() {
            let world = unit_scale * object.transform;
            // Baked: geometry carries `axis * world`, node stays identity.
            // Unbaked: geometry carries `axis`, node carries the conjugated
            // world matrix so the product is the same.
            let (geometry, node) = if self.settings.apply_transforms {
                (axis * world, Mat4::IDENTITY)
            } else {
                (axis, axis * world * axis.inverse())
            };

            let mesh = match &object.data {
                ObjectData::Mesh(mesh) => doc.add_mesh(&object.name, mesh, geometry)?,
                ObjectData::Curve(curve) => doc.add_curve(&object.name, curve, geometry)?,
                ObjectData::Empty => None,
                ObjectData::Volume | ObjectData::Camera | ObjectData::Light => {
                    debug!(object = %object.name, kind = %object.kind(), "Not exported");
                    continue;
                }
            };

            // Empties have no geometry to bake their placement into.
            let node_matrix = match (&object.data, self.settings.apply_transforms) {
                (ObjectData::Empty, true) => axis * world * axis.inverse(),
                _ => node,
            };
            doc.add_node(object, mesh, node_matrix);
        }

        Ok(doc.finish())
    }
}

/// Accumulates buffer views, accessors, meshes and nodes.
#[derive(Default)]
struct DocumentBuilder {
    bin: Vec<u8>,
    views: Vec<Value>,
    accessors: Vec<Value>,
    meshes: Vec<Value>,
    nodes: Vec<Value>,
}

impl DocumentBuilder {
    fn push_view(&mut self, bytes: &[u8], target: u32) -> usize {
        while self.bin.len() % 4 != 0 {
            self.bin.push(0);
        }
        let offset = self.bin.len();
        self.bin.extend_from_slice(bytes);
        self.views.push(json!({
            "buffer": 0,
            "byteOffset": offset,
            "byteLength": bytes.len(),
            "target": target,
        }));
        self.views.len() - 1
    }

    fn push_floats(&mut self, data: &[f32], count: usize, kind: &str, bounds: Option<(Vec3, Vec3)>) -> usize {
        let view = self.push_view(&floats_to_bytes(data), ARRAY_BUFFER);
        let mut accessor = json!({
            "bufferView": view,
            "componentType": FLOAT,
            "count": count,
            "type": kind,
        });
        if let Some((min, max)) = bounds {
            accessor["min"] = json!([min.x, min.y, min.z]);
            accessor["max"] = json!([max.x, max.y, max.z]);
        }
        self.accessors.push(accessor);
        self.accessors.len() - 1
    }

    fn push_positions(&mut self, positions: &[Vec3]) -> usize {
        let (min, max) = positions.iter().fold(
            (Vec3::splat(f32::MAX), Vec3::splat(f32::MIN)),
            |(lo, hi), p| (lo.min(*p), hi.max(*p)),
        );
        let flat: Vec<f32> = positions.iter().flat_map(|p| p.to_array()).collect();
        self.push_floats(&flat, positions.len(), "VEC3", Some((min, max)))
    }

    fn push_vec3(&mut self, values: &[Vec3]) -> usize {
        let flat: Vec<f32> = values.iter().flat_map(|v| v.to_array()).collect();
        self.push_floats(&flat, values.len(), "VEC3", None)
    }

    fn push_vec2(&mut self, values: &[Vec2]) -> usize {
        let flat: Vec<f32> = values.iter().flat_map(|v| v.to_array()).collect();
        self.push_floats(&flat, values.len(), "VEC2", None)
    }

    fn push_vec4(&mut self, values: &[Vec4]) -> usize {
        let flat: Vec<f32> = values.iter().flat_map(|v| v.to_array()).collect();
        self.push_floats(&flat, values.len(), "VEC4", None)
    }

    fn push_indices(&mut self, indices: &[u32]) -> usize {
        let mut bytes = Vec::with_capacity(indices.len() * 4);
        for i in indices {
            bytes.extend_from_slice(&i.to_le_bytes());
        }
        let view = self.push_view(&bytes, ELEMENT_ARRAY_BUFFER);
        self.accessors.push(json!({
            "bufferView": view,
            "componentType": UNSIGNED_INT,
            "count": indices.len(),
            "type": "SCALAR",
        }));
        self.accessors.len() - 1
    }

    fn add_mesh(&mut self, name: &str, mesh: &MeshData, matrix: Mat4) -> AppResult<Option<usize>> {
        if mesh.positions.is_empty() {
            return Ok(None);
        }
        mesh.validate()?;

        let positions: Vec<Vec3> = mesh
            .positions
            .iter()
            .map(|p| matrix.transform_point3(*p))
            .collect();
        check_finite(name, &positions)?;

        let normal_matrix = Mat3::from_mat4(matrix).inverse().transpose();
        let source_normals = if mesh.normals.is_empty() && !mesh.triangles.is_empty() {
            smooth_normals(mesh)
        } else {
            mesh.normals.clone()
        };
        let normals: Vec<Vec3> = source_normals
            .iter()
            .map(|n| (normal_matrix * *n).normalize_or(Vec3::Z))
            .collect();

        let mirrored = matrix.determinant() < 0.0;
        let indices: Vec<u32> = mesh
            .triangles
            .iter()
            .flat_map(|&[a, b, c]| if mirrored { [a, c, b] } else { [a, b, c] })
            .collect();

        let mut attributes = Map::new();
        attributes.insert("POSITION".into(), json!(self.push_positions(&positions)));
        if !normals.is_empty() {
            attributes.insert("NORMAL".into(), json!(self.push_vec3(&normals)));
        }
        if !mesh.uvs.is_empty() {
            let flipped: Vec<Vec2> = mesh.uvs.iter().map(|uv| Vec2::new(uv.x, 1.0 - uv.y)).collect();
            attributes.insert("TEXCOORD_0".into(), json!(self.push_vec2(&flipped)));
        }
        if !mesh.colors.is_empty() {
            attributes.insert("COLOR_0".into(), json!(self.push_vec4(&mesh.colors)));
        }

        let mut primitive = json!({ "attributes": attributes });
        if indices.is_empty() {
            primitive["mode"] = json!(MODE_POINTS);
        } else {
            primitive["indices"] = json!(self.push_indices(&indices));
            primitive["mode"] = json!(MODE_TRIANGLES);
        }

        self.meshes.push(json!({ "name": name, "primitives": [primitive] }));
        Ok(Some(self.meshes.len() - 1))
    }

    fn add_curve(&mut self, name: &str, curve: &CurveData, matrix: Mat4) -> AppResult<Option<usize>> {
        if curve.points.is_empty() {
            return Ok(None);
        }
        let n = curve.points.len() as u32;
        if let Some(bad) = curve.segments.iter().flatten().find(|&&i| i >= n) {
            return Err(AppError::export(format!(
                "curve '{name}' references point {bad} of {n}"
            )));
        }

        let points: Vec<Vec3> = curve
            .points
            .iter()
            .map(|p| matrix.transform_point3(*p))
            .collect();
        check_finite(name, &points)?;

        let position = self.push_positions(&points);
        let mut primitive = json!({ "attributes": { "POSITION": position } });
        if curve.segments.is_empty() {
            primitive["mode"] = json!(MODE_POINTS);
        } else {
            let indices: Vec<u32> = curve.segments.iter().flatten().copied().collect();
            primitive["indices"] = json!(self.push_indices(&indices));
            primitive["mode"] = json!(MODE_LINES);
        }

        self.meshes.push(json!({ "name": name, "primitives": [primitive] }));
        Ok(Some(self.meshes.len() - 1))
    }

    fn add_node(&mut self, object: &SceneObject, mesh: Option<usize>, matrix: Mat4) {
        let mut node = json!({ "name": object.name });
        if let Some(mesh) = mesh {
            node["mesh"] = json!(mesh);
        }
        if !matrix.abs_diff_eq(Mat4::IDENTITY, 1e-7) {
            node["matrix"] = json!(matrix.to_cols_array());
        }
        self.nodes.push(node);
    }

    /// Assemble the document. Empty top-level arrays are left out, as glTF
    /// requires at least one element where an array is present.
    fn finish(self) -> GlbContainer {
        let mut root = Map::new();
        root.insert(
            "asset".into(),
            json!({ "version": "2.0", "generator": GENERATOR }),
        );
        root.insert("scene".into(), json!(0));

        let mut scene = json!({ "name": "Scene" });
        if !self.nodes.is_empty() {
            scene["nodes"] = json!((0..self.nodes.len()).collect::<Vec<_>>());
        }
        root.insert("scenes".into(), json!([scene]));

        for (key, items) in [
            ("nodes", self.nodes),
            ("meshes", self.meshes),
            ("accessors", self.accessors),
            ("bufferViews", self.views),
        ] {
            if !items.is_empty() {
                root.insert(key.into(), Value::Array(items));
            }
        }

        let bin = if self.bin.is_empty() {
            None
        } else {
            root.insert("buffers".into(), json!([{ "byteLength": self.bin.len() }]));
            Some(self.bin)
        };

        GlbContainer {
            json: Value::Object(root),
            bin,
        }
    }
}

/// Area-weighted vertex normals.
fn smooth_normals(mesh: &MeshData) -> Vec<Vec3> {
    let mut normals = vec![Vec3::ZERO; mesh.positions.len()];
    for &[a, b, c] in &mesh.triangles {
        let (pa, pb, pc) = (
            mesh.positions[a as usize],
            mesh.positions[b as usize],
            mesh.positions[c as usize],
        );
        let face = (pb - pa).cross(pc - pa);
        for i in [a, b, c] {
            normals[i as usize] += face;
        }
    }
    normals
        .into_iter()
        .map(|n| n.normalize_or(Vec3::Z))
        .collect()
}

fn check_finite(name: &str, points: &[Vec3]) -> AppResult<()> {
    if points.iter().all(|p| p.is_finite()) {
        Ok(())
    } else {
        Err(AppError::export(format!(
            "object '{name}' has non-finite coordinates"
        )))
    }
}

fn floats_to_bytes(data: &[f32]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(data.len() * 4);
    for f in data {
        bytes.extend_from_slice(&f.to_le_bytes());
    }
    bytes
}
