//! # Plugin GLB Converter
//!
//! The conversion pipeline that turns one OBJ, PLY or USD file into a
//! normalized binary glTF file by driving a [`SceneHost`].
//!
//! Stages run strictly in order and stop at the first terminal failure:
//!
//! 1. reset the host scene
//! 2. pick a [`FormatStrategy`] by input extension
//! 3. enable the strategy's add-ons (best effort) and run its import
//!    attempts until one succeeds
//! 4. require at least one usable object
//! 5. force metric units at scale 1.0
//! 6. export GLB with fixed settings and verify the output file
//!
//! Every terminal failure is a [`ConversionError`] carrying the process
//! exit code.
//!
//! [`SceneHost`]: meshglb_core::traits::SceneHost

pub mod error;
pub mod executor;
pub mod exporter;
pub mod formats;
pub mod models;
pub mod processor;
pub mod reporter;
pub mod units;
pub mod validator;

#[cfg(test)]
pub(crate) mod test_support;

pub use error::ConversionError;
pub use formats::{FormatDispatcher, FormatStrategy};
pub use models::{ConversionReport, ConversionRequest, ExitOutcome, FormatFamily};
pub use processor::ConversionProcessor;
pub use reporter::StatusReporter;
