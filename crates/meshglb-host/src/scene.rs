//! The host's scene graph.
//!
//! Coordinates are Z-up, right-handed. Importers convert their source
//! convention on the way in; the glTF writer converts to Y-up on the way
//! out.

use glam::{Mat4, Vec2, Vec3, Vec4};

use meshglb_core::error::AppError;
use meshglb_core::result::AppResult;
use meshglb_core::traits::SceneObjectInfo;
use meshglb_core::types::{ObjectKind, UnitSettings};

/// Triangle mesh or point cloud.
///
/// Per-vertex attribute vectors are either empty or exactly as long as
/// `positions`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshData {
    /// Vertex positions.
    pub positions: Vec<Vec3>,
    /// Vertex normals.
    pub normals: Vec<Vec3>,
    /// Texture coordinates, V pointing up.
    pub uvs: Vec<Vec2>,
    /// Linear RGBA vertex colors.
    pub colors: Vec<Vec4>,
    /// Counter-clockwise triangles. Empty for point clouds.
    pub triangles: Vec<[u32; 3]>,
}

impl MeshData {
    /// Number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Returns `true` if the mesh has vertices but no faces.
    pub fn is_point_cloud(&self) -> bool {
        self.triangles.is_empty() && !self.positions.is_empty()
    }

    /// Check attribute lengths and index bounds.
    pub fn validate(&self) -> AppResult<()> {
        let n = self.positions.len();
        for (name, len) in [
            ("normals", self.normals.len()),
            ("uvs", self.uvs.len()),
            ("colors", self.colors.len()),
        ] {
            if len != 0 && len != n {
                return Err(AppError::internal(format!(
                    "mesh has {len} {name} for {n} vertices"
                )));
            }
        }
        if let Some(bad) = self
            .triangles
            .iter()
            .flatten()
            .find(|&&i| i as usize >= n)
        {
            return Err(AppError::internal(format!(
                "triangle index {bad} out of range for {n} vertices"
            )));
        }
        Ok(())
    }
}

/// Polyline set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CurveData {
    /// Control points.
    pub points: Vec<Vec3>,
    /// Line segments as index pairs into `points`.
    pub segments: Vec<[u32; 2]>,
}

/// Payload of a scene object.
#[derive(Debug, Clone, PartialEq)]
pub enum ObjectData {
    /// Mesh geometry.
    Mesh(MeshData),
    /// Curve geometry.
    Curve(CurveData),
    /// Transform only.
    Empty,
    /// Volume placeholder; grids are not loaded.
    Volume,
    /// Camera.
    Camera,
    /// Light.
    Light,
}

impl ObjectData {
    /// Object kind this payload represents.
    pub fn kind(&self) -> ObjectKind {
        match self {
            Self::Mesh(_) => ObjectKind::Mesh,
            Self::Curve(_) => ObjectKind::Curve,
            Self::Empty => ObjectKind::Empty,
            Self::Volume => ObjectKind::Volume,
            Self::Camera => ObjectKind::Camera,
            Self::Light => ObjectKind::Light,
        }
    }
}

/// One object in the scene.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneObject {
    /// Unique object name.
    pub name: String,
    /// Object-to-world transform.
    pub transform: Mat4,
    /// Geometry or marker payload.
    pub data: ObjectData,
}

impl SceneObject {
    /// Create an object with an identity transform.
    pub fn new(name: impl Into<String>, data: ObjectData) -> Self {
        Self {
            name: name.into(),
            transform: Mat4::IDENTITY,
            data,
        }
    }

    /// Set the object-to-world transform.
    pub fn with_transform(mut self, transform: Mat4) -> Self {
        self.transform = transform;
        self
    }

    /// Object kind.
    pub fn kind(&self) -> ObjectKind {
        self.data.kind()
    }
}

/// Scene content plus unit settings.
#[derive(Debug, Clone, Default)]
pub struct SceneGraph {
    objects: Vec<SceneObject>,
    units: UnitSettings,
}

impl SceneGraph {
    /// Create an empty scene with canonical units.
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove every object and restore canonical units.
    pub fn clear(&mut self) {
        self.objects.clear();
        self.units = UnitSettings::CANONICAL;
    }

    /// Add an object, renaming it `name.001`, `name.002`, ... on collision.
    /// Returns the final name.
    pub fn add(&mut self, mut object: SceneObject) -> String {
        if object.name.is_empty() {
            object.name = object.kind().tag().to_ascii_lowercase();
        }
        if self.contains(&object.name) {
            let base = object.name.clone();
            let mut n = 1;
            while self.contains(&format!("{base}.{n:03}")) {
                n += 1;
            }
            object.name = format!("{base}.{n:03}");
        }
        let name = object.name.clone();
        self.objects.push(object);
        name
    }

    fn contains(&self, name: &str) -> bool {
        self.objects.iter().any(|o| o.name == name)
    }

    /// Objects in insertion order.
    pub fn objects(&self) -> &[SceneObject] {
        &self.objects
    }

    /// Name and kind of each object.
    pub fn object_infos(&self) -> Vec<SceneObjectInfo> {
        self.objects
            .iter()
            .map(|o| SceneObjectInfo::new(o.name.clone(), o.kind()))
            .collect()
    }

    /// Current unit settings.
    pub fn units(&self) -> UnitSettings {
        self.units
    }

    /// Mutable access to unit settings.
    pub fn units_mut(&mut self) -> &mut UnitSettings {
        &mut self.units
    }
}
