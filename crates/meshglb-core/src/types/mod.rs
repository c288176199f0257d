//! Core type definitions shared by the host, the pipeline, and the binary.

pub mod capability;
pub mod export;
pub mod object;
pub mod operation;
pub mod units;

pub use capability::Capability;
pub use export::{ExportFormat, ExportSettings};
pub use object::ObjectKind;
pub use operation::ImportOperation;
pub use units::{UnitSettings, UnitSystem};
