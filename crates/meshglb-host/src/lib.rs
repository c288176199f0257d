//! # meshglb-host
//!
//! An in-process implementation of [`SceneHost`](meshglb_core::traits::SceneHost).
//!
//! The host keeps a Z-up scene graph, an operator registry that maps
//! [`ImportOperation`](meshglb_core::types::ImportOperation)s to importers,
//! and a set of bundled add-ons that register the legacy importers when
//! enabled. Export goes through a deterministic binary glTF writer.
//!
//! ## Operators
//!
//! | operator | provided by | importer |
//! |---|---|---|
//! | `import_scene.obj` | add-on `io_scene_obj` | strict OBJ (`tobj`) |
//! | `wm.obj_import` | host core | lenient OBJ |
//! | `import_mesh.ply` | add-on `io_mesh_ply` | strict PLY |
//! | `wm.ply_import` | host core | lenient PLY |
//! | `wm.usd_import` | host core | USDA text / USDZ |
//! | `usd.import_` | nobody | always fails |

pub mod addons;
pub mod gltf;
pub mod host;
pub mod importers;
pub mod scene;

pub use gltf::GlbContainer;
pub use host::NativeHost;
pub use scene::{CurveData, MeshData, ObjectData, SceneGraph, SceneObject};
