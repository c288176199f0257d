//! Stanford PLY importer.
//!
//! Two modes share one reader:
//!
//! * [`PlyMode::Strict`] backs the `io_mesh_ply` add-on (`import_mesh.ply`).
//!   It only loads polygon meshes: the file must declare `vertex` and `face`
//!   elements and nothing else.
//! * [`PlyMode::Lenient`] backs the core `wm.ply_import` operator. Unknown
//!   elements are skipped and vertex-only files load as point clouds.
//!
//! Both accept `ascii`, `binary_little_endian` and `binary_big_endian`
//! bodies. PLY data is taken as Z-up, so no axis conversion is applied.

use std::path::Path;

use glam::{Vec2, Vec3, Vec4};
use tracing::debug;

use meshglb_core::error::AppError;
use meshglb_core::result::AppResult;

use super::{ImportedScene, Importer, fan_triangulate, stem_name};
use crate::scene::{MeshData, ObjectData, SceneObject};

/// Which flavor of PLY importer to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlyMode {
    /// Polygon meshes only, no unknown elements.
    Strict,
    /// Point clouds allowed, unknown elements skipped.
    Lenient,
}

/// PLY importer.
#[derive(Debug)]
pub struct PlyImporter {
    mode: PlyMode,
}

impl PlyImporter {
    /// Create an importer running in `mode`.
    pub fn new(mode: PlyMode) -> Self {
        Self { mode }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Encoding {
    Ascii,
    BinaryLittleEndian,
    BinaryBigEndian,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scalar {
    I8,
    U8,
    I16,
    U16,
    I32,
    U32,
    F32,
    F64,
}

impl Scalar {
    fn parse(name: &str) -> AppResult<Self> {
        Ok(match name {
            "char" | "int8" => Self::I8,
            "uchar" | "uint8" => Self::U8,
            "short" | "int16" => Self::I16,
            "ushort" | "uint16" => Self::U16,
            "int" | "int32" => Self::I32,
            "uint" | "uint32" => Self::U32,
            "float" | "float32" => Self::F32,
            "double" | "float64" => Self::F64,
            other => return Err(AppError::parse(format!("unknown PLY scalar type '{other}'"))),
        })
    }

    /// Divisor turning an integer color channel into `0.0..=1.0`.
    fn color_range(&self) -> f64 {
        match self {
            Self::U8 | Self::I8 => 255.0,
            Self::U16 | Self::I16 => 65535.0,
            Self::U32 | Self::I32 => u32::MAX as f64,
            Self::F32 | Self::F64 => 1.0,
        }
    }
}

#[derive(Debug, Clone)]
enum Property {
    Scalar { name: String, ty: Scalar },
    List { name: String, count: Scalar, item: Scalar },
}

impl Property {
    fn name(&self) -> &str {
        match self {
            Self::Scalar { name, .. } | Self::List { name, .. } => name,
        }
    }
}

#[derive(Debug, Clone)]
struct Element {
    name: String,
    count: usize,
    properties: Vec<Property>,
}

#[derive(Debug)]
struct Header {
    encoding: Encoding,
    elements: Vec<Element>,
    body_offset: usize,
}

fn parse_header(bytes: &[u8]) -> AppResult<Header> {
    let mut offset = 0;
    let mut lines = Vec::new();
    loop {
        let rest = &bytes[offset..];
        let Some(nl) = rest.iter().position(|&b| b == b'\n') else {
            return Err(AppError::parse("PLY header is not terminated by end_header"));
        };
        let line = String::from_utf8_lossy(&rest[..nl]).trim().to_string();
        offset += nl + 1;
        if line == "end_header" {
            break;
        }
        lines.push(line);
    }

    let mut iter = lines.into_iter();
    if iter.next().as_deref() != Some("ply") {
        return Err(AppError::parse("missing 'ply' magic"));
    }

    let mut encoding = None;
    let mut elements: Vec<Element> = Vec::new();
    for line in iter {
        let words: Vec<&str> = line.split_whitespace().collect();
        match words.as_slice() {
            ["format", fmt, _version] => {
                encoding = Some(match *fmt {
                    "ascii" => Encoding::Ascii,
                    "binary_little_endian" => Encoding::BinaryLittleEndian,
                    "binary_big_endian" => Encoding::BinaryBigEndian,
                    other => {
                        return Err(AppError::parse(format!("unknown PLY format '{other}'")));
                    }
                });
            }
            ["comment", ..] | ["obj_info", ..] | [] => {}
            ["element", name, count] => {
                let count = count
                    .parse()
                    .map_err(|_| AppError::parse(format!("bad element count '{count}'")))?;
                elements.push(Element {
                    name: name.to_string(),
                    count,
                    properties: Vec::new(),
                });
            }
            ["property", "list", count, item, name] => {
                let element = elements
                    .last_mut()
                    .ok_or_else(|| AppError::parse("property declared before any element"))?;
                element.properties.push(Property::List {
                    name: name.to_string(),
                    count: Scalar::parse(count)?,
                    item: Scalar::parse(item)?,
                });
            }
            ["property", ty, name] => {
                let element = elements
                    .last_mut()
                    .ok_or_else(|| AppError::parse("property declared before any element"))?;
                element.properties.push(Property::Scalar {
                    name: name.to_string(),
                    ty: Scalar::parse(ty)?,
                });
            }
            _ => return Err(AppError::parse(format!("unrecognized PLY header line '{line}'"))),
        }
    }

    Ok(Header {
        encoding: encoding.ok_or_else(|| AppError::parse("PLY header has no format line"))?,
        elements,
        body_offset: offset,
    })
}

/// Sequential reader over the PLY body.
trait ValueReader {
    fn read(&mut self, ty: Scalar) -> AppResult<f64>;
}

struct AsciiReader<'a> {
    tokens: std::str::SplitAsciiWhitespace<'a>,
}

impl ValueReader for AsciiReader<'_> {
    fn read(&mut self, _ty: Scalar) -> AppResult<f64> {
        let token = self
            .tokens
            .next()
            .ok_or_else(|| AppError::parse("unexpected end of PLY data"))?;
        token
            .parse()
            .map_err(|_| AppError::parse(format!("bad PLY value '{token}'")))
    }
}

struct BinaryReader<'a> {
    bytes: &'a [u8],
    pos: usize,
    big_endian: bool,
}

impl BinaryReader<'_> {
    fn take<const N: usize>(&mut self) -> AppResult<[u8; N]> {
        let end = self.pos + N;
        let slice = self
            .bytes
            .get(self.pos..end)
            .ok_or_else(|| AppError::parse("unexpected end of PLY data"))?;
        self.pos = end;
        let mut buf = [0u8; N];
        buf.copy_from_slice(slice);
        if self.big_endian {
            buf.reverse();
        }
        Ok(buf)
    }
}

impl ValueReader for BinaryReader<'_> {
    fn read(&mut self, ty: Scalar) -> AppResult<f64> {
        Ok(match ty {
            Scalar::I8 => i8::from_le_bytes(self.take::<1>()?) as f64,
            Scalar::U8 => u8::from_le_bytes(self.take::<1>()?) as f64,
            Scalar::I16 => i16::from_le_bytes(self.take::<2>()?) as f64,
            Scalar::U16 => u16::from_le_bytes(self.take::<2>()?) as f64,
            Scalar::I32 => i32::from_le_bytes(self.take::<4>()?) as f64,
            Scalar::U32 => u32::from_le_bytes(self.take::<4>()?) as f64,
            Scalar::F32 => f32::from_le_bytes(self.take::<4>()?) as f64,
            Scalar::F64 => f64::from_le_bytes(self.take::<8>()?),
        })
    }
}

/// Column positions of the vertex properties we understand.
#[derive(Debug, Default)]
struct VertexLayout {
    position: [Option<usize>; 3],
    normal: [Option<usize>; 3],
    uv: [Option<usize>; 2],
    color: [Option<usize>; 4],
}

impl VertexLayout {
    fn from_element(element: &Element) -> Self {
        let mut layout = Self::default();
        for (i, prop) in element.properties.iter().enumerate() {
            let slot = match prop.name() {
                "x" => &mut layout.position[0],
                "y" => &mut layout.position[1],
                "z" => &mut layout.position[2],
                "nx" => &mut layout.normal[0],
                "ny" => &mut layout.normal[1],
                "nz" => &mut layout.normal[2],
                "u" | "s" | "texture_u" | "texture_s" => &mut layout.uv[0],
                "v" | "t" | "texture_v" | "texture_t" => &mut layout.uv[1],
                "red" | "r" | "diffuse_red" => &mut layout.color[0],
                "green" | "g" | "diffuse_green" => &mut layout.color[1],
                "blue" | "b" | "diffuse_blue" => &mut layout.color[2],
                "alpha" | "a" => &mut layout.color[3],
                _ => continue,
            };
            *slot = Some(i);
        }
        layout
    }
}

fn read_body(header: &Header, bytes: &[u8], mode: PlyMode) -> AppResult<MeshData> {
    let body = &bytes[header.body_offset..];
    let text;
    let mut reader: Box<dyn ValueReader + '_> = match header.encoding {
        Encoding::Ascii => {
            text = String::from_utf8_lossy(body);
            Box::new(AsciiReader {
                tokens: text.split_ascii_whitespace(),
            })
        }
        Encoding::BinaryLittleEndian | Encoding::BinaryBigEndian => Box::new(BinaryReader {
            bytes: body,
            pos: 0,
            big_endian: header.encoding == Encoding::BinaryBigEndian,
        }),
    };

    let mut mesh = MeshData::default();
    let mut has_face_element = false;

    for element in &header.elements {
        match element.name.as_str() {
            "vertex" => read_vertices(element, reader.as_mut(), &mut mesh)?,
            "face" => {
                has_face_element = true;
                read_faces(element, reader.as_mut(), &mut mesh)?;
            }
            other if mode == PlyMode::Strict => {
                return Err(AppError::unsupported(format!(
                    "element '{other}' is not supported by the strict PLY importer"
                )));
            }
            other => {
                debug!(element = other, count = element.count, "Skipping PLY element");
                skip_element(element, reader.as_mut())?;
            }
        }
    }

    if mode == PlyMode::Strict && !has_face_element {
        return Err(AppError::unsupported(
            "strict PLY importer requires a face element",
        ));
    }
    Ok(mesh)
}

fn read_vertices(
    element: &Element,
    reader: &mut dyn ValueReader,
    mesh: &mut MeshData,
) -> AppResult<()> {
    let layout = VertexLayout::from_element(element);
    if layout.position.iter().any(Option::is_none) {
        return Err(AppError::parse("vertex element lacks x/y/z properties"));
    }
    let has_normals = layout.normal.iter().all(Option::is_some);
    let has_uvs = layout.uv.iter().all(Option::is_some);
    let has_colors = layout.color[..3].iter().all(Option::is_some);

    let mut row = vec![0.0f64; element.properties.len()];
    let mut color_ranges = [1.0f64; 4];
    for (slot, range) in layout.color.iter().zip(color_ranges.iter_mut()) {
        if let Some(Property::Scalar { ty, .. }) = slot.map(|i| &element.properties[i]) {
            *range = ty.color_range();
        }
    }

    for _ in 0..element.count {
        for (value, prop) in row.iter_mut().zip(&element.properties) {
            *value = match prop {
                Property::Scalar { ty, .. } => reader.read(*ty)?,
                Property::List { count, item, .. } => {
                    let n = reader.read(*count)? as usize;
                    for _ in 0..n {
                        reader.read(*item)?;
                    }
                    0.0
                }
            };
        }
        mesh.positions.push(Vec3::new(
            at(&row, layout.position[0]),
            at(&row, layout.position[1]),
            at(&row, layout.position[2]),
        ));
        if has_normals {
            mesh.normals.push(Vec3::new(
                at(&row, layout.normal[0]),
                at(&row, layout.normal[1]),
                at(&row, layout.normal[2]),
            ));
        }
        if has_uvs {
            mesh.uvs
                .push(Vec2::new(at(&row, layout.uv[0]), at(&row, layout.uv[1])));
        }
        if has_colors {
            let channel = |c: usize| match layout.color[c] {
                Some(i) => (row[i] / color_ranges[c]) as f32,
                None => 1.0,
            };
            mesh.colors
                .push(Vec4::new(channel(0), channel(1), channel(2), channel(3)));
        }
    }
    Ok(())
}

fn at(row: &[f64], slot: Option<usize>) -> f32 {
    slot.map(|i| row[i] as f32).unwrap_or(0.0)
}

fn read_faces(element: &Element, reader: &mut dyn ValueReader, mesh: &mut MeshData) -> AppResult<()> {
    let index_prop = element
        .properties
        .iter()
        .position(|p| {
            matches!(p, Property::List { name, .. } if name == "vertex_indices" || name == "vertex_index")
        })
        .ok_or_else(|| AppError::parse("face element lacks a vertex_indices list"))?;

    let vertex_count = mesh.positions.len();
    let mut corners = Vec::new();
    for _ in 0..element.count {
        for (i, prop) in element.properties.iter().enumerate() {
            match prop {
                Property::Scalar { ty, .. } => {
                    reader.read(*ty)?;
                }
                Property::List { count, item, .. } => {
                    let n = reader.read(*count)? as usize;
                    corners.clear();
                    for _ in 0..n {
                        let v = reader.read(*item)?;
                        if i == index_prop {
                            if v < 0.0 || v as usize >= vertex_count {
                                return Err(AppError::parse(format!(
                                    "face references vertex {v} of {vertex_count}"
                                )));
                            }
                            corners.push(v as u32);
                        }
                    }
                    if i == index_prop {
                        fan_triangulate(&corners, &mut mesh.triangles);
                    }
                }
            }
        }
    }
    Ok(())
}

fn skip_element(element: &Element, reader: &mut dyn ValueReader) -> AppResult<()> {
    for _ in 0..element.count {
        for prop in &element.properties {
            match prop {
                Property::Scalar { ty, .. } => {
                    reader.read(*ty)?;
                }
                Property::List { count, item, .. } => {
                    let n = reader.read(*count)? as usize;
                    for _ in 0..n {
                        reader.read(*item)?;
                    }
                }
            }
        }
    }
    Ok(())
}

impl Importer for PlyImporter {
    fn label(&self) -> &'static str {
        match self.mode {
            PlyMode::Strict => "ply-strict",
            PlyMode::Lenient => "ply",
        }
    }

    fn read(&self, path: &Path) -> AppResult<ImportedScene> {
        let bytes = std::fs::read(path)?;
        let header = parse_header(&bytes)?;
        let mesh = read_body(&header, &bytes, self.mode)?;
        mesh.validate()?;

        let mut scene = ImportedScene::default();
        if mesh.positions.is_empty() {
            debug!(path = %path.display(), "PLY file holds no vertices");
            return Ok(scene);
        }

        debug!(
            path = %path.display(),
            vertices = mesh.vertex_count(),
            triangles = mesh.triangles.len(),
            "PLY import finished"
        );
        scene
            .objects
            .push(SceneObject::new(stem_name(path), ObjectData::Mesh(mesh)));
        Ok(scene)
    }
}
