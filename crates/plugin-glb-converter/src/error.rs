//! Terminal failures of the conversion pipeline.
//!
//! Each variant maps to exactly one process exit code. Host errors are kept
//! as the `source` so the binary can print the full cause chain.

use std::path::PathBuf;

use meshglb_core::error::{AppError, ErrorKind};
use thiserror::Error;

/// Unified error type for all conversion stages.
#[derive(Debug, Error)]
pub enum ConversionError {
    // --- Usage ---
    /// Input or output path missing or empty.
    #[error("Missing args. Use: meshglb [OPTIONS] -- INPUT OUTPUT.glb")]
    MissingArgs,

    /// The host could not return to an empty scene.
    #[error("Scene reset failed: {}", source.message)]
    SceneReset {
        /// Host error.
        #[source]
        source: AppError,
    },

    // --- Dispatch ---
    /// No strategy handles the input extension.
    #[error("Unsupported input extension: {extension}")]
    UnsupportedExtension {
        /// Lowercased extension including the leading dot, or empty.
        extension: String,
    },

    // --- Import ---
    /// Every USD import attempt failed.
    #[error("USD import failed: {}", source.message)]
    UsdImportFailed {
        /// Error of the last attempt.
        #[source]
        source: AppError,
    },

    /// Every OBJ or PLY import attempt failed.
    #[error("Import failed: {}", source.message)]
    ImportFailed {
        /// Error of the last attempt.
        #[source]
        source: AppError,
    },

    // --- Validation ---
    /// Import produced no object of an accepted kind.
    #[error("Scene empty after import")]
    SceneEmpty,

    // --- Export ---
    /// The host exporter raised.
    #[error("Export failed: {}", source.message)]
    ExportFailed {
        /// Host error.
        #[source]
        source: AppError,
    },

    /// The exporter returned but no file exists at the output path.
    #[error("Export failed: output file not created: {}", path.display())]
    OutputNotCreated {
        /// Expected output path.
        path: PathBuf,
    },

    /// The output file is smaller than a GLB header.
    #[error("Export failed: output file {} is {size} bytes, expected at least {min}", path.display())]
    OutputTooSmall {
        /// Output path.
        path: PathBuf,
        /// Actual size.
        size: u64,
        /// Configured minimum.
        min: u64,
    },
}

impl ConversionError {
    /// Process exit code for this failure.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::MissingArgs | Self::SceneReset { .. } => 1,
            Self::UsdImportFailed { .. } => 2,
            Self::UnsupportedExtension { .. } => 3,
            Self::ImportFailed { .. } => 4,
            Self::SceneEmpty => 5,
            Self::ExportFailed { .. } | Self::OutputNotCreated { .. } | Self::OutputTooSmall { .. } => 6,
        }
    }

    /// Whether the failure came out of the host and has a cause chain worth
    /// printing in full.
    pub fn has_host_cause(&self) -> bool {
        matches!(
            self,
            Self::SceneReset { .. }
                | Self::UsdImportFailed { .. }
                | Self::ImportFailed { .. }
                | Self::ExportFailed { .. }
        )
    }
}

impl From<ConversionError> for AppError {
    fn from(err: ConversionError) -> Self {
        let kind = match &err {
            ConversionError::MissingArgs => ErrorKind::Usage,
            ConversionError::UnsupportedExtension { .. } => ErrorKind::Unsupported,
            ConversionError::UsdImportFailed { .. }
            | ConversionError::ImportFailed { .. }
            | ConversionError::SceneEmpty => ErrorKind::Import,
            ConversionError::ExportFailed { .. }
            | ConversionError::OutputNotCreated { .. }
            | ConversionError::OutputTooSmall { .. } => ErrorKind::Export,
            ConversionError::SceneReset { .. } => ErrorKind::Internal,
        };
        AppError::with_source(kind, err.to_string(), err)
    }
}
