//! Core traits defined in `meshglb-core` and implemented by other crates.

pub mod host;

pub use host::{SceneHost, SceneObjectInfo};
