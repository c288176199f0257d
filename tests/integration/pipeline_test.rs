//! Pipeline tests against the native host, without the binary.

use meshglb_core::config::ConversionConfig;
use meshglb_core::traits::SceneHost;
use meshglb_core::types::UnitSettings;
use meshglb_host::NativeHost;
use plugin_glb_converter::{ConversionProcessor, ConversionRequest, FormatFamily};

use crate::helpers::{self, TestDir};

fn convert(
    dir: &TestDir,
    input: &str,
) -> (NativeHost, Result<plugin_glb_converter::ConversionReport, plugin_glb_converter::ConversionError>) {
    let mut host = NativeHost::new();
    let request = ConversionRequest::new(dir.path(input), dir.path("out.glb")).expect("request");
    let mut warnings: Vec<String> = Vec::new();
    let result = ConversionProcessor::new(ConversionConfig::default()).run(&mut host, &request, &mut warnings);
    (host, result)
}

#[test]
fn test_obj_keeps_y_up_coordinates() {
    let dir = TestDir::new();
    dir.write("tri.obj", helpers::TRIANGLE_OBJ);

    let (host, result) = convert(&dir, "tri.obj");
    let report = result.expect("convert");
    assert_eq!(report.family, FormatFamily::Obj);
    assert_eq!(report.operator, "import_scene.obj");
    assert_eq!(host.unit_settings(), UnitSettings::CANONICAL);

    let glb = helpers::read_glb(&dir.path("out.glb"));
    let (min, max) = helpers::position_bounds(&glb, 0);
    helpers::assert_close(min, [0.0, 0.0, 0.0]);
    helpers::assert_close(max, [1.0, 1.0, 0.0]);
}

#[test]
fn test_ply_imports_with_colors() {
    let dir = TestDir::new();
    dir.write("quad.ply", helpers::QUAD_PLY);

    let (_host, result) = convert(&dir, "quad.ply");
    let report = result.expect("convert");
    assert_eq!(report.operator, "import_mesh.ply");
    assert!(report.warnings.is_empty());

    let glb = helpers::read_glb(&dir.path("out.glb"));
    let attributes = &glb.json["meshes"][0]["primitives"][0]["attributes"];
    assert!(attributes.get("COLOR_0").is_some());
    let (min, max) = helpers::position_bounds(&glb, 0);
    helpers::assert_close(min, [0.0, 0.0, -1.0]);
    helpers::assert_close(max, [1.0, 0.0, 0.0]);
}

#[test]
fn test_usda_transforms_are_baked() {
    let dir = TestDir::new();
    dir.write("nested.usda", helpers::NESTED_USDA);

    let (_host, result) = convert(&dir, "nested.usda");
    let report = result.expect("convert");
    assert_eq!(report.operator, "wm.usd_import");
    assert_eq!(report.object_count, 2);
    assert_eq!(report.accepted_count, 2);

    let glb = helpers::read_glb(&dir.path("out.glb"));
    let (min, max) = helpers::position_bounds(&glb, 0);
    helpers::assert_close(min, [0.0, 100.0, 0.0]);
    helpers::assert_close(max, [100.0, 200.0, 0.0]);
}

#[test]
fn test_usdz_text_layer_imports() {
    let dir = TestDir::new();
    dir.write_usdz("pkg.usdz", "root.usda", helpers::NESTED_USDA.as_bytes());

    let (_host, result) = convert(&dir, "pkg.usdz");
    assert_eq!(result.expect("convert").family, FormatFamily::Usd);
}

#[test]
fn test_usdz_crate_layer_is_usd_failure() {
    let dir = TestDir::new();
    dir.write_usdz("pkg.usdz", "root.usdc", b"PXR-USDC\0\0\0\0\0\0\0\0");

    let (_host, result) = convert(&dir, "pkg.usdz");
    let err = result.expect_err("crate layer");
    assert_eq!(err.exit_code(), 2);
    assert!(err.has_host_cause());
}

#[test]
fn test_empty_ply_is_scene_empty() {
    let dir = TestDir::new();
    dir.write("empty.ply", helpers::EMPTY_PLY);

    let (host, result) = convert(&dir, "empty.ply");
    assert_eq!(result.map_err(|e| e.exit_code()).err(), Some(5));
    assert!(host.objects().is_empty());
    assert!(!dir.path("out.glb").exists());
}

#[test]
fn test_glb_framing_is_aligned() {
    let dir = TestDir::new();
    dir.write("tri.obj", helpers::TRIANGLE_OBJ);
    convert(&dir, "tri.obj").1.expect("convert");

    let bytes = std::fs::read(dir.path("out.glb")).expect("read");
    assert_eq!(&bytes[0..4], b"glTF");
    assert_eq!(u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]), 2);
    assert_eq!(
        u32::from_le_bytes([bytes[8], bytes[9], bytes[10], bytes[11]]) as usize,
        bytes.len()
    );
    let json_len = u32::from_le_bytes([bytes[12], bytes[13], bytes[14], bytes[15]]);
    assert_eq!(json_len % 4, 0);
    assert_eq!(bytes.len() % 4, 0);
}
