//! End-to-end tests driving the meshglb binary.

use std::fs;

use crate::helpers::{self, TestDir};

#[test]
fn test_obj_converts_and_reports_ok() {
    let dir = TestDir::new();
    dir.write("model.obj", helpers::TRIANGLE_OBJ);

    let result = dir.run(&["--", "model.obj", "model.glb"]);

    assert_eq!(result.code, 0, "stderr: {}", result.stderr);
    assert_eq!(result.stdout.trim_end(), "[OK] Exported: model.glb");
    let glb = helpers::read_glb(&dir.path("model.glb"));
    assert_eq!(glb.json["asset"]["version"], "2.0");
}

#[test]
fn test_usdz_with_crate_layer_exits_two() {
    let dir = TestDir::new();
    dir.write_usdz("scan.usdz", "scan.usdc", b"PXR-USDC\0\0\0\0\0\0\0\0");

    let result = dir.run(&["--", "scan.usdz", "scan.glb"]);

    assert_eq!(result.code, 2);
    assert!(result.stdout.starts_with("[ERROR] USD import failed"), "{}", result.stdout);
    assert!(result.stderr.contains("Caused by"), "{}", result.stderr);
    assert!(!dir.path("scan.glb").exists());
}

#[test]
fn test_empty_ply_exits_five() {
    let dir = TestDir::new();
    dir.write("empty.ply", helpers::EMPTY_PLY);

    let result = dir.run(&["--", "empty.ply", "empty.glb"]);

    assert_eq!(result.code, 5);
    assert!(result.stdout.contains("Scene empty after import"));
    assert!(!dir.path("empty.glb").exists());
}

#[test]
fn test_unsupported_extension_exits_three() {
    let dir = TestDir::new();
    dir.write("weird.fbx", "not a mesh");

    let result = dir.run(&["--", "weird.fbx", "weird.glb"]);

    assert_eq!(result.code, 3);
    assert_eq!(result.stdout.trim_end(), "[ERROR] Unsupported input extension: .fbx");
    assert!(!result.stdout.contains("[WARN]"));
}

#[test]
fn test_missing_file_exits_four() {
    let dir = TestDir::new();

    let result = dir.run(&["--", "absent.obj", "absent.glb"]);

    assert_eq!(result.code, 4);
    assert!(result.stdout.starts_with("[ERROR] Import failed"));
}

#[test]
fn test_missing_args_exit_one() {
    let dir = TestDir::new();

    let result = dir.run(&["--", "model.obj"]);

    assert_eq!(result.code, 1);
    assert!(result.stdout.starts_with("[ERROR] Missing args. Use:"));
    assert!(result.stdout.contains("INPUT OUTPUT.glb"));
}

#[test]
fn test_paths_need_separator() {
    let dir = TestDir::new();
    dir.write("model.obj", helpers::TRIANGLE_OBJ);

    let result = dir.run(&["model.obj", "model.glb"]);

    assert_eq!(result.code, 1);
    assert!(result.stdout.starts_with("[ERROR] Missing args. Use:"));
    assert!(!dir.path("model.glb").exists());
}

#[test]
fn test_unknown_log_level_exits_one() {
    let dir = TestDir::new();
    dir.write("model.obj", helpers::TRIANGLE_OBJ);

    let result = dir.run(&["--log-level", "bogus", "--", "model.obj", "model.glb"]);

    assert_eq!(result.code, 1);
    assert!(result.stdout.starts_with("[ERROR] Configuration error"));
    assert!(!dir.path("model.glb").exists());
}

#[test]
fn test_no_args_exit_one() {
    let result = TestDir::new().run(&[]);
    assert_eq!(result.code, 1);
}

#[test]
fn test_help_and_version_exit_zero() {
    let dir = TestDir::new();
    let help = dir.run(&["--help"]);
    assert_eq!(help.code, 0);
    assert!(help.stdout.contains("--config"));

    let version = dir.run(&["--version"]);
    assert_eq!(version.code, 0);
    assert!(version.stdout.contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_bad_config_exits_one() {
    let dir = TestDir::new();
    dir.write("model.obj", helpers::TRIANGLE_OBJ);
    dir.write("bad.toml", "[conversion]\nmin_output_bytes = 0\n");

    let result = dir.run(&["-c", "bad.toml", "--", "model.obj", "model.glb"]);

    assert_eq!(result.code, 1);
    assert!(result.stdout.starts_with("[ERROR] Configuration error"));
    assert!(!dir.path("model.glb").exists());
}

#[test]
fn test_disabled_addon_warns_and_falls_back() {
    let dir = TestDir::new();
    dir.write("quad.ply", helpers::QUAD_PLY);
    dir.write("meshglb.toml", "[host]\ndisabled_addons = [\"io_mesh_ply\"]\n");

    let result = dir.run(&["--", "quad.ply", "quad.glb"]);

    assert_eq!(result.code, 0, "stderr: {}", result.stderr);
    let lines: Vec<&str> = result.stdout.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("[WARN] Cannot enable addon io_mesh_ply: "));
    assert_eq!(lines[1], "[OK] Exported: quad.glb");
}

#[test]
fn test_repeated_runs_are_byte_identical() {
    let dir = TestDir::new();
    dir.write("model.obj", helpers::TRIANGLE_OBJ);

    assert_eq!(dir.run(&["--", "model.obj", "a.glb"]).code, 0);
    assert_eq!(dir.run(&["--", "model.obj", "b.glb"]).code, 0);

    let a = fs::read(dir.path("a.glb")).expect("read a");
    let b = fs::read(dir.path("b.glb")).expect("read b");
    assert_eq!(a, b);
}

#[test]
fn test_logs_stay_off_stdout() {
    let dir = TestDir::new();
    dir.write("model.obj", helpers::TRIANGLE_OBJ);

    let result = dir.run(&["--log-level", "debug", "--", "model.obj", "model.glb"]);

    assert_eq!(result.code, 0);
    assert_eq!(result.stdout.lines().count(), 1);
    assert!(result.stderr.contains("Conversion completed"));
}
