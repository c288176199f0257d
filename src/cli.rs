//! Command-line arguments.

use std::path::PathBuf;

use clap::Parser;

use plugin_glb_converter::{ConversionError, ConversionRequest};

/// meshglb: convert one OBJ, PLY or USD asset into a normalized GLB
#[derive(Debug, Parser)]
#[command(
    name = "meshglb",
    version,
    about,
    override_usage = "meshglb [OPTIONS] -- <INPUT> <OUTPUT>"
)]
pub struct Cli {
    /// Configuration file (TOML). Defaults to ./meshglb.toml when present
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Log level override (trace, debug, info, warn, error, off)
    #[arg(long, value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Source asset (.obj, .ply, .usd, .usda, .usdz) and destination .glb,
    /// only accepted after `--`
    #[arg(last = true, value_name = "INPUT OUTPUT")]
    pub paths: Vec<String>,
}

impl Cli {
    /// Build the conversion request from the arguments after `--`.
    pub fn request(&self) -> Result<ConversionRequest, ConversionError> {
        ConversionRequest::from_args(&self.paths)
    }
}
