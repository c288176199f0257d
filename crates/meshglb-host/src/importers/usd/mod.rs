//! Universal Scene Description importer.
//!
//! Reads text layers (`.usda`, or `.usd` files carrying a `#usda` header)
//! and USDZ packages whose root layer is text. Binary crate layers are
//! reported as unsupported.

mod lexer;
mod parser;
mod stage;

use std::fs::{self, File};
use std::io::Read;
use std::path::Path;

use tracing::debug;
use zip::ZipArchive;

use meshglb_core::error::{AppError, ErrorKind};
use meshglb_core::result::AppResult;

use super::{ImportedScene, Importer};

const TEXT_MAGIC: &[u8] = b"#usda";
const CRATE_MAGIC: &[u8] = b"PXR-USDC";
const LAYER_EXTENSIONS: [&str; 3] = ["usda", "usdc", "usd"];

/// USD importer for text layers and USDZ packages.
#[derive(Debug, Default)]
pub struct UsdImporter;

impl UsdImporter {
    /// Parse and compose a layer from raw bytes.
    fn read_layer(bytes: &[u8], origin: &str) -> AppResult<ImportedScene> {
        if bytes.starts_with(CRATE_MAGIC) {
            return Err(AppError::unsupported(format!(
                "{origin}: binary USD crate layers are not supported"
            )));
        }
        if !bytes.starts_with(TEXT_MAGIC) {
            return Err(AppError::parse(format!("{origin}: missing #usda header")));
        }
        let text = std::str::from_utf8(bytes).map_err(|e| {
            AppError::with_source(ErrorKind::Parse, format!("{origin}: layer is not UTF-8"), e)
        })?;

        let tokens = lexer::tokenize(text)?;
        let layer = parser::Parser::new(tokens).parse_layer()?;
        stage::compose(&layer)
    }

    /// Root layer bytes of a USDZ package: the first layer entry.
    fn read_package(path: &Path) -> AppResult<(Vec<u8>, String)> {
        let mut archive = ZipArchive::new(File::open(path)?)?;
        for i in 0..archive.len() {
            let mut entry = archive.by_index(i)?;
            let name = entry.name().to_string();
            let is_layer = Path::new(&name)
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| LAYER_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()));
            if !is_layer {
                continue;
            }
            let mut bytes = Vec::new();
            entry.read_to_end(&mut bytes)?;
            debug!(package = %path.display(), layer = %name, "Using USDZ root layer");
            return Ok((bytes, name));
        }
        Err(AppError::import(format!(
            "{}: package contains no USD layer",
            path.display()
        )))
    }
}

impl Importer for UsdImporter {
    fn label(&self) -> &'static str {
        "usd"
    }

    fn read(&self, path: &Path) -> AppResult<ImportedScene> {
        let is_package = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("usdz"));

        let scene = if is_package {
            let (bytes, layer) = Self::read_package(path)?;
            Self::read_layer(&bytes, &format!("{}[{layer}]", path.display()))?
        } else {
            let bytes = fs::read(path)?;
            Self::read_layer(&bytes, &path.display().to_string())?
        };

        debug!(
            path = %path.display(),
            objects = scene.objects.len(),
            "USD import finished"
        );
        Ok(scene)
    }
}
