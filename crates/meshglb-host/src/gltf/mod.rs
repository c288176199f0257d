//! Binary glTF 2.0 output.
//!
//! [`GltfWriter`] turns the scene graph into a JSON document plus a binary
//! buffer; [`GlbContainer`] packs and unpacks the GLB framing.

mod glb;
mod writer;

pub use glb::GlbContainer;
pub use writer::GltfWriter;

/// GLB magic number: "glTF".
pub const GLB_MAGIC: u32 = 0x4654_6C67;
/// GLB container version.
pub const GLB_VERSION: u32 = 2;
/// JSON chunk type.
pub const CHUNK_TYPE_JSON: u32 = 0x4E4F_534A;
/// BIN chunk type.
pub const CHUNK_TYPE_BIN: u32 = 0x004E_4942;
/// Size of the GLB file header in bytes.
pub const GLB_HEADER_LEN: usize = 12;

/// Accessor component types.
pub(crate) const FLOAT: u32 = 5126;
pub(crate) const UNSIGNED_INT: u32 = 5125;

/// Buffer view targets.
pub(crate) const ARRAY_BUFFER: u32 = 34962;
pub(crate) const ELEMENT_ARRAY_BUFFER: u32 = 34963;

/// Primitive modes.
pub(crate) const MODE_POINTS: u32 = 0;
pub(crate) const MODE_LINES: u32 = 1;
pub(crate) const MODE_TRIANGLES: u32 = 4;
