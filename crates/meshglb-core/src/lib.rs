//! # meshglb-core
//!
//! Core crate for meshglb. Contains the [`SceneHost`](traits::SceneHost)
//! collaborator trait, configuration schemas, the shared scene vocabulary
//! (object kinds, unit settings, capabilities, import operations, export
//! settings), and the unified error system.
//!
//! This crate has **no** internal dependencies on other meshglb crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
