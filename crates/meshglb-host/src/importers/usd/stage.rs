//! Turns a parsed layer into scene objects.
//!
//! Prims are flattened: each object carries its composed world transform,
//! premultiplied by the layer's up-axis correction. Geometry stays in prim
//! local space.

use glam::{Mat4, Quat, Vec2, Vec3, Vec4};
use tracing::debug;

use meshglb_core::error::AppError;
use meshglb_core::result::AppResult;
use meshglb_core::types::{UnitSettings, UnitSystem};

use super::parser::{Layer, Prim, Property, Specifier, Value};
use crate::importers::{ImportedScene, fan_triangulate, y_up_to_z_up};
use crate::scene::{CurveData, MeshData, ObjectData, SceneObject};

/// Prim types whose whole subtree carries no scene objects.
const SKIPPED_SUBTREES: [&str; 5] = ["Material", "Shader", "NodeGraph", "GeomSubset", "Skeleton"];

const LIGHT_TYPES: [&str; 7] = [
    "DistantLight",
    "SphereLight",
    "RectLight",
    "DiskLight",
    "DomeLight",
    "CylinderLight",
    "PortalLight",
];

/// Compose every `def` prim of `layer` into objects.
pub fn compose(layer: &Layer) -> AppResult<ImportedScene> {
    let axis = match layer.meta("upAxis").and_then(Value::as_str) {
        Some("Z") => Mat4::IDENTITY,
        Some("Y") | None => y_up_to_z_up(),
        Some(other) => {
            return Err(AppError::parse(format!("unsupported upAxis '{other}'")));
        }
    };

    let units = layer
        .meta("metersPerUnit")
        .and_then(Value::as_f64)
        .filter(|m| m.is_finite() && *m > 0.0)
        .map(|scale_length| UnitSettings {
            system: UnitSystem::Metric,
            scale_length,
        });

    let mut scene = ImportedScene {
        objects: Vec::new(),
        units,
    };
    for prim in &layer.prims {
        visit(prim, Mat4::IDENTITY, axis, &mut scene.objects)?;
    }
    Ok(scene)
}

fn visit(prim: &Prim, parent: Mat4, axis: Mat4, out: &mut Vec<SceneObject>) -> AppResult<()> {
    if prim.specifier == Specifier::Class {
        return Ok(());
    }
    let type_name = prim.type_name.as_deref().unwrap_or("");
    if SKIPPED_SUBTREES.contains(&type_name) {
        return Ok(());
    }

    let (local, resets) = local_transform(prim)?;
    let world = if resets { local } else { parent * local };

    let data = match type_name {
        "Mesh" => Some(ObjectData::Mesh(build_mesh(prim)?)),
        "Points" => Some(ObjectData::Mesh(build_points(prim)?)),
        "Cube" => Some(ObjectData::Mesh(build_cube(prim)?)),
        "BasisCurves" => Some(ObjectData::Curve(build_curves(prim)?)),
        "Xform" => Some(ObjectData::Empty),
        "Camera" => Some(ObjectData::Camera),
        "Volume" => Some(ObjectData::Volume),
        t if LIGHT_TYPES.contains(&t) => Some(ObjectData::Light),
        other => {
            if !other.is_empty() && other != "Scope" {
                debug!(prim = %prim.name, prim_type = other, "Ignoring unsupported USD prim type");
            }
            None
        }
    };

    if let Some(data) = data
        && prim.specifier == Specifier::Def
    {
        out.push(SceneObject::new(prim.name.clone(), data).with_transform(axis * world));
    }

    for child in &prim.children {
        visit(child, world, axis, out)?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Transforms
// ---------------------------------------------------------------------------

/// Local matrix from `xformOpOrder`; the flag reports `!resetXformStack!`.
fn local_transform(prim: &Prim) -> AppResult<(Mat4, bool)> {
    let Some(order) = prim.attribute("xformOpOrder") else {
        return Ok((Mat4::IDENTITY, false));
    };
    let entries = order
        .as_array()
        .ok_or_else(|| AppError::parse(format!("{}: xformOpOrder is not an array", prim.name)))?;

    let mut local = Mat4::IDENTITY;
    let mut resets = false;
    for entry in entries {
        let op = entry
            .as_str()
            .ok_or_else(|| AppError::parse(format!("{}: bad xformOpOrder entry", prim.name)))?;
        if op == "!resetXformStack!" {
            resets = true;
            local = Mat4::IDENTITY;
            continue;
        }
        let (inverse, attr) = match op.strip_prefix("!invert!") {
            Some(rest) => (true, rest),
            None => (false, op),
        };
        let kind = attr
            .strip_prefix("xformOp:")
            .and_then(|rest| rest.split(':').next())
            .ok_or_else(|| AppError::parse(format!("{}: bad xform op '{op}'", prim.name)))?;
        let value = prim
            .attribute(attr)
            .ok_or_else(|| AppError::parse(format!("{}: xform op '{attr}' has no value", prim.name)))?;

        let matrix = op_matrix(kind, value)?;
        local *= if inverse { matrix.inverse() } else { matrix };
    }
    Ok((local, resets))
}

fn op_matrix(kind: &str, value: &Value) -> AppResult<Mat4> {
    match kind {
        "translate" => Ok(Mat4::from_translation(to_vec3(value)?)),
        "scale" => match value.as_f64() {
            Some(s) => Ok(Mat4::from_scale(Vec3::splat(s as f32))),
            None => Ok(Mat4::from_scale(to_vec3(value)?)),
        },
        "orient" => {
            let q = value
                .as_tuple_f64()
                .filter(|q| q.len() == 4)
                .ok_or_else(|| AppError::parse("orient expects a quaternion"))?;
            // USD stores (real, i, j, k).
            let quat = Quat::from_xyzw(q[1] as f32, q[2] as f32, q[3] as f32, q[0] as f32);
            Ok(Mat4::from_quat(quat.normalize()))
        }
        "transform" => to_matrix(value),
        k if k.starts_with("rotate") => {
            let axes = &k["rotate".len()..];
            if axes.len() == 1 {
                let angle = value
                    .as_f64()
                    .ok_or_else(|| AppError::parse(format!("{k} expects a scalar")))?;
                return axis_rotation(axes.as_bytes()[0], angle as f32);
            }
            let angles = to_vec3(value)?;
            let mut matrix = Mat4::IDENTITY;
            for axis in axes.bytes() {
                let angle = match axis {
                    b'X' => angles.x,
                    b'Y' => angles.y,
                    b'Z' => angles.z,
                    _ => return Err(AppError::parse(format!("bad rotation op '{k}'"))),
                };
                matrix = axis_rotation(axis, angle)? * matrix;
            }
            Ok(matrix)
        }
        other => Err(AppError::unsupported(format!("xform op type '{other}'"))),
    }
}

fn axis_rotation(axis: u8, degrees: f32) -> AppResult<Mat4> {
    let radians = degrees.to_radians();
    match axis {
        b'X' => Ok(Mat4::from_rotation_x(radians)),
        b'Y' => Ok(Mat4::from_rotation_y(radians)),
        b'Z' => Ok(Mat4::from_rotation_z(radians)),
        other => Err(AppError::parse(format!("bad rotation axis '{}'", other as char))),
    }
}

/// USD matrices are row-major with row vectors, which is exactly glam's
/// column layout.
fn to_matrix(value: &Value) -> AppResult<Mat4> {
    let Value::Tuple(rows) = value else {
        return Err(AppError::parse("matrix expects a tuple of rows"));
    };
    if rows.len() != 4 {
        return Err(AppError::parse("matrix expects four rows"));
    }
    let mut cols = [[0.0f32; 4]; 4];
    for (i, row) in rows.iter().enumerate() {
        let row = row
            .as_tuple_f64()
            .filter(|r| r.len() == 4)
            .ok_or_else(|| AppError::parse("matrix row expects four numbers"))?;
        for (j, v) in row.iter().enumerate() {
            cols[i][j] = *v as f32;
        }
    }
    Ok(Mat4::from_cols_array_2d(&cols))
}

// ---------------------------------------------------------------------------
// Value conversion
// ---------------------------------------------------------------------------

fn to_vec3(value: &Value) -> AppResult<Vec3> {
    let t = value
        .as_tuple_f64()
        .filter(|t| t.len() == 3)
        .ok_or_else(|| AppError::parse(format!("expected 3-tuple, found {value:?}")))?;
    Ok(Vec3::new(t[0] as f32, t[1] as f32, t[2] as f32))
}

fn to_vec2(value: &Value) -> AppResult<Vec2> {
    let t = value
        .as_tuple_f64()
        .filter(|t| t.len() == 2)
        .ok_or_else(|| AppError::parse(format!("expected 2-tuple, found {value:?}")))?;
    Ok(Vec2::new(t[0] as f32, t[1] as f32))
}

fn to_index(value: &Value) -> AppResult<usize> {
    match value.as_f64() {
        Some(n) if n >= 0.0 && n.fract() == 0.0 && n <= u32::MAX as f64 => Ok(n as usize),
        _ => Err(AppError::parse(format!("expected non-negative integer, found {value:?}"))),
    }
}

/// Sum of `counts`, which must not exceed `limit` elements.
fn counted_total(prim: &Prim, name: &str, counts: &[usize], limit: usize) -> AppResult<usize> {
    counts
        .iter()
        .try_fold(0usize, |acc, &n| acc.checked_add(n).filter(|&t| t <= limit))
        .ok_or_else(|| {
            AppError::parse(format!(
                "{}: {name} need more than the {limit} elements given",
                prim.name
            ))
        })
}

fn array_of<T>(prim: &Prim, name: &str, convert: fn(&Value) -> AppResult<T>) -> AppResult<Vec<T>> {
    match prim.attribute(name) {
        None => Ok(Vec::new()),
        Some(value) => value
            .as_array()
            .ok_or_else(|| AppError::parse(format!("{}: '{name}' is not an array", prim.name)))?
            .iter()
            .map(convert)
            .collect(),
    }
}

// ---------------------------------------------------------------------------
// Primvars
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Interpolation {
    Constant,
    Uniform,
    Vertex,
    FaceVarying,
}

impl Interpolation {
    fn of(property: Option<&Property>) -> Self {
        match property
            .and_then(|p| p.meta("interpolation"))
            .and_then(Value::as_str)
        {
            Some("constant") => Self::Constant,
            Some("uniform") => Self::Uniform,
            Some("faceVarying") => Self::FaceVarying,
            _ => Self::Vertex,
        }
    }

    fn per_corner(self) -> bool {
        matches!(self, Self::Uniform | Self::FaceVarying)
    }
}

/// Where a welded or split vertex came from.
#[derive(Debug, Clone, Copy)]
struct CornerKey {
    face: usize,
    corner: usize,
    point: usize,
}

#[derive(Debug)]
struct Primvar<T> {
    name: String,
    values: Vec<T>,
    indices: Option<Vec<usize>>,
    interpolation: Interpolation,
}

impl<T: Copy> Primvar<T> {
    /// First authored candidate among `names`.
    fn read(prim: &Prim, names: &[&str], convert: fn(&Value) -> AppResult<T>) -> AppResult<Option<Self>> {
        for name in names {
            if prim.attribute(name).is_none() {
                continue;
            }
            let values = array_of(prim, name, convert)?;
            let indices_name = format!("{name}:indices");
            let indices = match prim.attribute(&indices_name) {
                Some(_) => Some(array_of(prim, &indices_name, to_index)?),
                None => None,
            };
            let property = prim
                .property(name)
                .or_else(|| prim.property(&format!("{name}.timeSamples")));
            return Ok(Some(Self {
                name: (*name).to_string(),
                values,
                indices,
                interpolation: Interpolation::of(property),
            }));
        }
        Ok(None)
    }

    fn lookup(&self, key: CornerKey) -> Option<T> {
        let slot = match self.interpolation {
            Interpolation::Constant => 0,
            Interpolation::Uniform => key.face,
            Interpolation::Vertex => key.point,
            Interpolation::FaceVarying => key.corner,
        };
        let slot = match &self.indices {
            Some(indices) => *indices.get(slot)?,
            None => slot,
        };
        self.values.get(slot).copied()
    }

    /// Values for every vertex, or nothing when the primvar does not cover
    /// them.
    fn gather(&self, keys: &[CornerKey]) -> Vec<T> {
        match keys.iter().map(|k| self.lookup(*k)).collect::<Option<Vec<T>>>() {
            Some(values) => values,
            None => {
                debug!(primvar = %self.name, "Dropping primvar with too few values");
                Vec::new()
            }
        }
    }
}

fn gather<T: Copy>(primvar: Option<&Primvar<T>>, keys: &[CornerKey]) -> Vec<T> {
    primvar.map(|p| p.gather(keys)).unwrap_or_default()
}

fn rgb(c: Vec3) -> Vec4 {
    c.extend(1.0)
}

// ---------------------------------------------------------------------------
// Geometry
// ---------------------------------------------------------------------------

fn build_mesh(prim: &Prim) -> AppResult<MeshData> {
    let points = array_of(prim, "points", to_vec3)?;
    let counts = array_of(prim, "faceVertexCounts", to_index)?;
    let indices = array_of(prim, "faceVertexIndices", to_index)?;

    let expected = counted_total(prim, "faceVertexCounts", &counts, indices.len())?;
    if expected != indices.len() {
        return Err(AppError::parse(format!(
            "{}: faceVertexCounts sum to {expected} but {} indices were given",
            prim.name,
            indices.len()
        )));
    }
    if let Some(bad) = indices.iter().find(|&&i| i >= points.len()) {
        return Err(AppError::parse(format!(
            "{}: face index {bad} out of range for {} points",
            prim.name,
            points.len()
        )));
    }

    let left_handed =
        prim.attribute("orientation").and_then(Value::as_str) == Some("leftHanded");
    let normals = Primvar::read(prim, &["primvars:normals", "normals"], to_vec3)?;
    let uvs = Primvar::read(prim, &["primvars:st", "primvars:st0", "primvars:UVMap"], to_vec2)?;
    let colors = Primvar::read(prim, &["primvars:displayColor"], to_vec3)?;

    let split = [
        normals.as_ref().map(|p| p.interpolation),
        uvs.as_ref().map(|p| p.interpolation),
        colors.as_ref().map(|p| p.interpolation),
    ]
    .into_iter()
    .flatten()
    .any(Interpolation::per_corner);

    let mut keys = Vec::new();
    let mut triangles = Vec::new();
    let mut corner = 0;
    for (face, &count) in counts.iter().enumerate() {
        let mut ring: Vec<u32> = Vec::with_capacity(count);
        for _ in 0..count {
            let point = indices[corner];
            if split {
                ring.push(keys.len() as u32);
                keys.push(CornerKey { face, corner, point });
            } else {
                ring.push(point as u32);
            }
            corner += 1;
        }
        if left_handed {
            ring.reverse();
        }
        fan_triangulate(&ring, &mut triangles);
    }
    if !split {
        keys = (0..points.len())
            .map(|point| CornerKey {
                face: 0,
                corner: 0,
                point,
            })
            .collect();
    }

    let mut mesh = MeshData {
        positions: keys.iter().map(|k| points[k.point]).collect(),
        normals: gather(normals.as_ref(), &keys),
        uvs: gather(uvs.as_ref(), &keys),
        colors: gather(colors.as_ref(), &keys).into_iter().map(rgb).collect(),
        triangles,
    };
    if left_handed {
        for n in &mut mesh.normals {
            *n = -*n;
        }
    }
    mesh.validate()?;
    Ok(mesh)
}

fn build_points(prim: &Prim) -> AppResult<MeshData> {
    let points = array_of(prim, "points", to_vec3)?;
    let keys: Vec<CornerKey> = (0..points.len())
        .map(|point| CornerKey {
            face: 0,
            corner: point,
            point,
        })
        .collect();
    let normals = Primvar::read(prim, &["primvars:normals", "normals"], to_vec3)?;
    let colors = Primvar::read(prim, &["primvars:displayColor"], to_vec3)?;
    let mesh = MeshData {
        positions: points,
        normals: gather(normals.as_ref(), &keys),
        uvs: Vec::new(),
        colors: gather(colors.as_ref(), &keys).into_iter().map(rgb).collect(),
        triangles: Vec::new(),
    };
    mesh.validate()?;
    Ok(mesh)
}

fn build_curves(prim: &Prim) -> AppResult<CurveData> {
    let points = array_of(prim, "points", to_vec3)?;
    let mut counts = array_of(prim, "curveVertexCounts", to_index)?;
    if counts.is_empty() && !points.is_empty() {
        counts.push(points.len());
    }
    counted_total(prim, "curveVertexCounts", &counts, points.len())?;
    let periodic = prim.attribute("wrap").and_then(Value::as_str) == Some("periodic");

    let mut segments = Vec::new();
    let mut start = 0u32;
    for count in counts {
        let count = count as u32;
        for i in 1..count {
            segments.push([start + i - 1, start + i]);
        }
        if periodic && count > 2 {
            segments.push([start + count - 1, start]);
        }
        start += count;
    }
    Ok(CurveData { points, segments })
}

/// Axis-aligned cube of edge `size` (default 2) with flat normals.
fn build_cube(prim: &Prim) -> AppResult<MeshData> {
    let size = match prim.attribute("size") {
        Some(v) => v
            .as_f64()
            .ok_or_else(|| AppError::parse(format!("{}: size is not a number", prim.name)))?,
        None => 2.0,
    };
    let h = (size / 2.0) as f32;

    let mut mesh = MeshData::default();
    for normal in [Vec3::X, Vec3::NEG_X, Vec3::Y, Vec3::NEG_Y, Vec3::Z, Vec3::NEG_Z] {
        // Two tangents forming a right-handed frame with the face normal.
        let u = normal.any_orthonormal_vector();
        let v = normal.cross(u);
        let base = mesh.positions.len() as u32;
        for (a, b) in [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)] {
            mesh.positions.push((normal + u * a + v * b) * h);
            mesh.normals.push(normal);
        }
        mesh.triangles.push([base, base + 1, base + 2]);
        mesh.triangles.push([base, base + 2, base + 3]);
    }
    Ok(mesh)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::importers::usd::lexer::tokenize;
    use crate::importers::usd::parser::Parser;
    use meshglb_core::error::ErrorKind;

    fn stage(src: &str) -> ImportedScene {
        let layer = Parser::new(tokenize(src).expect("lex"))
            .parse_layer()
            .expect("parse");
        compose(&layer).expect("compose")
    }

    fn mesh(object: &SceneObject) -> &MeshData {
        match &object.data {
            ObjectData::Mesh(m) => m,
            other => panic!("expected mesh, got {other:?}"),
        }
    }

    #[test]
    fn test_z_up_quad_with_vertex_normals() {
        let scene = stage(
            r#"( upAxis = "Z" metersPerUnit = 1 )
            def Mesh "Quad" {
                int[] faceVertexCounts = [4]
                int[] faceVertexIndices = [0, 1, 2, 3]
                point3f[] points = [(0,0,0), (1,0,0), (1,1,0), (0,1,0)]
                normal3f[] normals = [(0,0,1), (0,0,1), (0,0,1), (0,0,1)] (interpolation = "vertex")
            }"#,
        );
        assert_eq!(scene.objects.len(), 1);
        let m = mesh(&scene.objects[0]);
        assert_eq!(m.vertex_count(), 4);
        assert_eq!(m.triangles, vec![[0, 1, 2], [0, 2, 3]]);
        assert_eq!(m.normals.len(), 4);
        assert_eq!(scene.objects[0].transform, Mat4::IDENTITY);
        assert_eq!(scene.units.map(|u| u.scale_length), Some(1.0));
    }

    #[test]
    fn test_face_varying_uvs_split_vertices() {
        let scene = stage(
            r#"( upAxis = "Z" )
            def Mesh "Tris" {
                int[] faceVertexCounts = [3, 3]
                int[] faceVertexIndices = [0, 1, 2, 0, 2, 3]
                point3f[] points = [(0,0,0), (1,0,0), (1,1,0), (0,1,0)]
                texCoord2f[] primvars:st = [(0,0), (1,1)] (interpolation = "faceVarying")
                int[] primvars:st:indices = [0, 1, 1, 0, 1, 0]
            }"#,
        );
        let m = mesh(&scene.objects[0]);
        assert_eq!(m.vertex_count(), 6);
        assert_eq!(m.uvs.len(), 6);
        assert_eq!(m.uvs[1], Vec2::ONE);
        assert_eq!(m.triangles, vec![[0, 1, 2], [3, 4, 5]]);
    }

    #[test]
    fn test_left_handed_flips_winding() {
        let scene = stage(
            r#"( upAxis = "Z" )
            def Mesh "M" {
                uniform token orientation = "leftHanded"
                int[] faceVertexCounts = [3]
                int[] faceVertexIndices = [0, 1, 2]
                point3f[] points = [(0,0,0), (1,0,0), (0,1,0)]
            }"#,
        );
        assert_eq!(mesh(&scene.objects[0]).triangles, vec![[2, 1, 0]]);
    }

    #[test]
    fn test_y_up_hierarchy_composes_transforms() {
        let scene = stage(
            r#"( upAxis = "Y" )
            def Xform "Root" {
                double3 xformOp:translate = (0, 5, 0)
                uniform token[] xformOpOrder = ["xformOp:translate"]
                def Xform "Child" {
                    float xformOp:rotateY = 90
                    double3 xformOp:scale = (2, 2, 2)
                    uniform token[] xformOpOrder = ["xformOp:rotateY", "xformOp:scale"]
                }
            }"#,
        );
        assert_eq!(scene.objects.len(), 2);
        assert!(scene.units.is_none());
        let root = scene.objects[0].transform;
        // Y-up (0,5,0) becomes Z-up (0,0,5).
        assert!(root.transform_point3(Vec3::ZERO).abs_diff_eq(Vec3::new(0.0, 0.0, 5.0), 1e-5));
        let child = scene.objects[1].transform;
        let p = child.transform_point3(Vec3::X);
        // Scale 2, rotate +90 about Y: X -> -Z (Y-up), then lift by 5; in Z-up that is (0, 2, 5).
        assert!(p.abs_diff_eq(Vec3::new(0.0, 2.0, 5.0), 1e-4), "got {p}");
    }

    #[test]
    fn test_reset_xform_stack_and_invert() {
        let scene = stage(
            r#"( upAxis = "Z" )
            def Xform "Parent" {
                double3 xformOp:translate = (10, 0, 0)
                uniform token[] xformOpOrder = ["xformOp:translate"]
                def Xform "Detached" {
                    double3 xformOp:translate:pivot = (1, 0, 0)
                    uniform token[] xformOpOrder = ["!resetXformStack!", "!invert!xformOp:translate:pivot"]
                }
            }"#,
        );
        let p = scene.objects[1].transform.transform_point3(Vec3::ZERO);
        assert!(p.abs_diff_eq(Vec3::new(-1.0, 0.0, 0.0), 1e-6));
    }

    #[test]
    fn test_matrix_op_uses_row_vectors() {
        let scene = stage(
            r#"( upAxis = "Z" )
            def Xform "X" {
                matrix4d xformOp:transform = ( (1,0,0,0), (0,1,0,0), (0,0,1,0), (3,4,5,1) )
                uniform token[] xformOpOrder = ["xformOp:transform"]
            }"#,
        );
        let p = scene.objects[0].transform.transform_point3(Vec3::ZERO);
        assert_eq!(p, Vec3::new(3.0, 4.0, 5.0));
    }

    #[test]
    fn test_object_kinds_and_skipped_subtrees() {
        let scene = stage(
            r#"( upAxis = "Z" )
            def Scope "Looks" {
                def Material "Red" { def Shader "S" {} }
            }
            def Camera "Cam" {}
            def SphereLight "Key" {}
            def Volume "Smoke" {}
            def Cube "Box" { double size = 1 }
            def BasisCurves "Hair" {
                int[] curveVertexCounts = [3]
                point3f[] points = [(0,0,0), (1,0,0), (1,1,0)]
            }
            class "Proto" { def Mesh "Hidden" {} }
            def Points "Cloud" { point3f[] points = [(0,0,0), (1,1,1)] }"#,
        );
        let kinds: Vec<_> = scene.objects.iter().map(|o| o.name.as_str()).collect();
        assert_eq!(kinds, vec!["Cam", "Key", "Smoke", "Box", "Hair", "Cloud"]);

        let cube = mesh(&scene.objects[3]);
        assert_eq!(cube.vertex_count(), 24);
        assert_eq!(cube.triangles.len(), 12);
        assert!(cube.positions.iter().all(|p| p.abs().max_element() <= 0.5 + 1e-6));

        match &scene.objects[4].data {
            ObjectData::Curve(c) => assert_eq!(c.segments, vec![[0, 1], [1, 2]]),
            other => panic!("expected curve, got {other:?}"),
        }
        assert!(mesh(&scene.objects[5]).is_point_cloud());
    }

    #[test]
    fn test_face_index_out_of_range_fails() {
        let layer = Parser::new(
            tokenize(
                r#"def Mesh "M" {
                    int[] faceVertexCounts = [3]
                    int[] faceVertexIndices = [0, 1, 7]
                    point3f[] points = [(0,0,0), (1,0,0), (0,1,0)]
                }"#,
            )
            .expect("lex"),
        )
        .parse_layer()
        .expect("parse");
        assert!(compose(&layer).is_err());
    }

    fn compose_err(src: &str) -> AppError {
        let layer = Parser::new(tokenize(src).expect("lex"))
            .parse_layer()
            .expect("parse");
        compose(&layer).expect_err("must fail")
    }

    #[test]
    fn test_huge_face_counts_fail_cleanly() {
        let err = compose_err(
            r#"def Mesh "M" {
                int[] faceVertexCounts = [4294967295, 4294967295, 1]
                int[] faceVertexIndices = []
                point3f[] points = [(0,0,0)]
            }"#,
        );
        assert_eq!(err.kind, ErrorKind::Parse);

        let err = compose_err(
            r#"def Mesh "M" {
                int[] faceVertexCounts = [18446744073709551615, 1]
                int[] faceVertexIndices = []
                point3f[] points = []
            }"#,
        );
        assert_eq!(err.kind, ErrorKind::Parse);
    }

    #[test]
    fn test_huge_curve_counts_fail_cleanly() {
        let err = compose_err(
            r#"def BasisCurves "C" {
                int[] curveVertexCounts = [4294967295, 2]
                point3f[] points = [(0,0,0), (1,0,0)]
            }"#,
        );
        assert_eq!(err.kind, ErrorKind::Parse);
    }
}
