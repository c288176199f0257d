//! Lenient Wavefront OBJ importer built into the host core (`wm.obj_import`).
//!
//! Unknown statements, malformed lines and out-of-range references are
//! skipped instead of failing the import. `o` starts a new object; an object
//! made only of `l` statements becomes a curve.

use std::collections::HashMap;
use std::path::Path;

use glam::{Vec2, Vec3, Vec4};
use tracing::debug;

use meshglb_core::result::AppResult;

use super::{ImportedScene, Importer, fan_triangulate, stem_name, y_up_vec_to_z_up};
use crate::scene::{CurveData, MeshData, ObjectData, SceneObject};

/// OBJ importer that tolerates malformed input.
#[derive(Debug, Default)]
pub struct ObjImporter;

/// A face corner: position, texture and normal indices (0-based).
type Corner = (usize, Option<usize>, Option<usize>);

#[derive(Debug, Default)]
struct ObjectBuilder {
    name: String,
    faces: Vec<Vec<Corner>>,
    lines: Vec<Vec<usize>>,
}

#[derive(Debug, Default)]
struct ObjState {
    positions: Vec<Vec3>,
    colors: Vec<Option<Vec4>>,
    texcoords: Vec<Vec2>,
    normals: Vec<Vec3>,
    objects: Vec<ObjectBuilder>,
    skipped_lines: usize,
}

impl ObjState {
    fn current(&mut self) -> &mut ObjectBuilder {
        if self.objects.is_empty() {
            self.objects.push(ObjectBuilder::default());
        }
        let last = self.objects.len() - 1;
        &mut self.objects[last]
    }

    fn parse_line(&mut self, line: &str) {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return;
        }
        let mut parts = line.split_whitespace();
        let Some(keyword) = parts.next() else {
            return;
        };
        let args: Vec<&str> = parts.collect();
        let ok = match keyword {
            "v" => self.parse_vertex(&args),
            "vt" => match parse_floats(&args) {
                Some(f) if !f.is_empty() => {
                    self.texcoords
                        .push(Vec2::new(f[0], f.get(1).copied().unwrap_or(0.0)));
                    true
                }
                _ => false,
            },
            "vn" => match parse_floats(&args) {
                Some(f) if f.len() >= 3 => {
                    self.normals.push(Vec3::new(f[0], f[1], f[2]));
                    true
                }
                _ => false,
            },
            "f" => self.parse_face(&args),
            "l" => self.parse_line_element(&args),
            "o" => {
                self.objects.push(ObjectBuilder {
                    name: args.join(" "),
                    ..Default::default()
                });
                true
            }
            // Groups, materials, smoothing and free-form geometry carry no
            // mesh data this importer keeps.
            _ => true,
        };
        if !ok {
            self.skipped_lines += 1;
            debug!(line, "Skipping malformed OBJ statement");
        }
    }

    fn parse_vertex(&mut self, args: &[&str]) -> bool {
        match parse_floats(args) {
            Some(f) if f.len() >= 6 => {
                self.positions.push(Vec3::new(f[0], f[1], f[2]));
                self.colors.push(Some(Vec4::new(f[3], f[4], f[5], 1.0)));
                true
            }
            Some(f) if f.len() >= 3 => {
                self.positions.push(Vec3::new(f[0], f[1], f[2]));
                self.colors.push(None);
                true
            }
            _ => false,
        }
    }

    fn parse_face(&mut self, args: &[&str]) -> bool {
        let mut corners = Vec::with_capacity(args.len());
        for arg in args {
            let mut refs = arg.split('/');
            let v = refs
                .next()
                .and_then(|s| resolve_index(s, self.positions.len()));
            let vt = refs
                .next()
                .and_then(|s| resolve_index(s, self.texcoords.len()));
            let vn = refs
                .next()
                .and_then(|s| resolve_index(s, self.normals.len()));
            match v {
                Some(v) => corners.push((v, vt, vn)),
                None => return false,
            }
        }
        if corners.len() < 3 {
            return false;
        }
        self.current().faces.push(corners);
        true
    }

    fn parse_line_element(&mut self, args: &[&str]) -> bool {
        let mut points = Vec::with_capacity(args.len());
        for arg in args {
            let first = arg.split('/').next().unwrap_or_default();
            match resolve_index(first, self.positions.len()) {
                Some(v) => points.push(v),
                None => return false,
            }
        }
        if points.len() < 2 {
            return false;
        }
        self.current().lines.push(points);
        true
    }

    fn build(self, fallback_name: &str) -> Vec<SceneObject> {
        let has_colors = self.colors.iter().any(Option::is_some);
        let mut out = Vec::new();

        for builder in &self.objects {
            let name = if builder.name.is_empty() {
                fallback_name.to_string()
            } else {
                builder.name.clone()
            };

            if !builder.faces.is_empty() {
                let mesh = self.build_mesh(builder, has_colors);
                out.push(SceneObject::new(name, ObjectData::Mesh(mesh)));
            } else if !builder.lines.is_empty() {
                let curve = self.build_curve(builder);
                out.push(SceneObject::new(name, ObjectData::Curve(curve)));
            }
        }
        out
    }

    fn build_mesh(&self, builder: &ObjectBuilder, has_colors: bool) -> MeshData {
        let corners = builder.faces.iter().flatten();
        let all_normals = corners.clone().all(|c| c.2.is_some());
        let any_uvs = corners.clone().any(|c| c.1.is_some());

        let mut mesh = MeshData::default();
        let mut remap: HashMap<Corner, u32> = HashMap::new();

        for face in &builder.faces {
            let mut indices = Vec::with_capacity(face.len());
            for &corner in face {
                let key = (
                    corner.0,
                    corner.1.filter(|_| any_uvs),
                    corner.2.filter(|_| all_normals),
                );
                let index = *remap.entry(key).or_insert_with(|| {
                    let (v, vt, vn) = key;
                    mesh.positions.push(y_up_vec_to_z_up(self.positions[v]));
                    if has_colors {
                        mesh.colors.push(self.colors[v].unwrap_or(Vec4::ONE));
                    }
                    if any_uvs {
                        mesh.uvs
                            .push(vt.map(|t| self.texcoords[t]).unwrap_or(Vec2::ZERO));
                    }
                    if let Some(n) = vn {
                        mesh.normals.push(y_up_vec_to_z_up(self.normals[n]));
                    }
                    (mesh.positions.len() - 1) as u32
                });
                indices.push(index);
            }
            fan_triangulate(&indices, &mut mesh.triangles);
        }
        mesh
    }

    fn build_curve(&self, builder: &ObjectBuilder) -> CurveData {
        let mut curve = CurveData::default();
        let mut remap: HashMap<usize, u32> = HashMap::new();
        for line in &builder.lines {
            let indices: Vec<u32> = line
                .iter()
                .map(|&v| {
                    *remap.entry(v).or_insert_with(|| {
                        curve.points.push(y_up_vec_to_z_up(self.positions[v]));
                        (curve.points.len() - 1) as u32
                    })
                })
                .collect();
            for pair in indices.windows(2) {
                curve.segments.push([pair[0], pair[1]]);
            }
        }
        curve
    }
}

/// Resolve a 1-based (or negative, relative) OBJ index against `len`
/// elements defined so far.
fn resolve_index(raw: &str, len: usize) -> Option<usize> {
    if raw.is_empty() {
        return None;
    }
    let i: i64 = raw.parse().ok()?;
    let resolved = if i > 0 {
        i - 1
    } else if i < 0 {
        len as i64 + i
    } else {
        return None;
    };
    (0..len as i64).contains(&resolved).then_some(resolved as usize)
}

fn parse_floats(args: &[&str]) -> Option<Vec<f32>> {
    args.iter().map(|a| a.parse::<f32>().ok()).collect()
}

/// Join lines ending in a backslash with the following line.
fn logical_lines(text: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut pending = String::new();
    for line in text.lines() {
        if let Some(stripped) = line.strip_suffix('\\') {
            pending.push_str(stripped);
            pending.push(' ');
        } else {
            pending.push_str(line);
            out.push(std::mem::take(&mut pending));
        }
    }
    if !pending.is_empty() {
        out.push(pending);
    }
    out
}

impl Importer for ObjImporter {
    fn label(&self) -> &'static str {
        "obj"
    }

    fn read(&self, path: &Path) -> AppResult<ImportedScene> {
        let bytes = std::fs::read(path)?;
        let text = String::from_utf8_lossy(&bytes);

        let mut state = ObjState::default();
        for line in logical_lines(&text) {
            state.parse_line(&line);
        }

        let skipped = state.skipped_lines;
        let objects = state.build(&stem_name(path));
        debug!(
            path = %path.display(),
            objects = objects.len(),
            skipped_lines = skipped,
            "OBJ import finished"
        );

        Ok(ImportedScene {
            objects,
            units: None,
        })
    }
}
