//! Domain models: requests, format families, outcomes, reports.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConversionError;

/// One conversion job, built from the process arguments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionRequest {
    /// Source asset.
    pub input_path: PathBuf,
    /// Destination GLB, as given by the caller.
    pub output_path: PathBuf,
}

impl ConversionRequest {
    /// Build a request; both paths must be non-empty.
    pub fn new(
        input_path: impl Into<PathBuf>,
        output_path: impl Into<PathBuf>,
    ) -> Result<Self, ConversionError> {
        let input_path = input_path.into();
        let output_path = output_path.into();
        if input_path.as_os_str().is_empty() || output_path.as_os_str().is_empty() {
            return Err(ConversionError::MissingArgs);
        }
        Ok(Self {
            input_path,
            output_path,
        })
    }

    /// Build a request from the arguments after `--`: exactly an input and
    /// an output path.
    pub fn from_args<S: AsRef<str>>(args: &[S]) -> Result<Self, ConversionError> {
        match args {
            [input, output] => Self::new(input.as_ref(), output.as_ref()),
            _ => Err(ConversionError::MissingArgs),
        }
    }

    /// Lowercased input extension with its leading dot, or `""`.
    pub fn dotted_extension(&self) -> String {
        dotted_extension(&self.input_path)
    }
}

/// Lowercased extension of `path` with its leading dot, or `""`.
pub fn dotted_extension(path: &Path) -> String {
    path.extension()
        .map(|e| format!(".{}", e.to_string_lossy().to_ascii_lowercase()))
        .unwrap_or_default()
}

/// Input format families with their own import strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormatFamily {
    /// Wavefront OBJ.
    Obj,
    /// Stanford PLY.
    Ply,
    /// Universal Scene Description.
    Usd,
}

impl FormatFamily {
    /// Human-readable name.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Obj => "Wavefront OBJ",
            Self::Ply => "Stanford PLY",
            Self::Usd => "Universal Scene Description",
        }
    }
}

impl fmt::Display for FormatFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Final status of one invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExitOutcome {
    /// Process exit code.
    pub code: i32,
    /// Status line text without its `[OK]`/`[ERROR]` tag.
    pub message: String,
}

impl ExitOutcome {
    /// Successful export to `output` (printed as given).
    pub fn success(output: &Path) -> Self {
        Self {
            code: 0,
            message: format!("Exported: {}", output.display()),
        }
    }
}

impl From<&ConversionError> for ExitOutcome {
    fn from(err: &ConversionError) -> Self {
        Self {
            code: err.exit_code(),
            message: err.to_string(),
        }
    }
}

/// Summary of a successful conversion, logged at the end of a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionReport {
    /// Source asset.
    pub input_path: PathBuf,
    /// Written GLB.
    pub output_path: PathBuf,
    /// Format family that handled the input.
    pub family: FormatFamily,
    /// Operator id of the import attempt that succeeded.
    pub operator: String,
    /// Objects in the scene after import.
    pub object_count: usize,
    /// Objects of an accepted kind.
    pub accepted_count: usize,
    /// Size of the written file.
    pub output_bytes: u64,
    /// Warnings raised along the way.
    pub warnings: Vec<String>,
    /// Wall-clock time of the whole pipeline.
    pub duration_ms: u64,
}
