//! Shared test helpers for integration tests.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

use meshglb_host::GlbContainer;

/// Unit triangle authored Y-up, apex on +Y.
pub const TRIANGLE_OBJ: &str = "o Tri\nv 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n";

/// Unit quad with vertex colors.
pub const QUAD_PLY: &str = "ply\nformat ascii 1.0\nelement vertex 4\nproperty float x\nproperty float y\nproperty float z\nproperty uchar red\nproperty uchar green\nproperty uchar blue\nelement face 1\nproperty list uchar int vertex_indices\nend_header\n0 0 0 255 0 0\n1 0 0 0 255 0\n1 1 0 0 0 255\n0 1 0 255 255 255\n4 0 1 2 3\n";

/// Header-only PLY.
pub const EMPTY_PLY: &str = "ply\nformat ascii 1.0\nelement vertex 0\nproperty float x\nproperty float y\nproperty float z\nelement face 0\nproperty list uchar int vertex_indices\nend_header\n";

/// Y-up layer in centimeters with a translated parent.
pub const NESTED_USDA: &str = r#"#usda 1.0
(
    upAxis = "Y"
    metersPerUnit = 0.01
)

def Xform "Root"
{
    double3 xformOp:translate = (0, 100, 0)
    uniform token[] xformOpOrder = ["xformOp:translate"]

    def Mesh "Tri"
    {
        int[] faceVertexCounts = [3]
        int[] faceVertexIndices = [0, 1, 2]
        point3f[] points = [(0, 0, 0), (100, 0, 0), (0, 100, 0)]
    }
}
"#;

/// Scratch directory the binary runs in.
pub struct TestDir {
    temp: TempDir,
}

impl TestDir {
    /// Create an empty scratch directory
    pub fn new() -> Self {
        Self {
            temp: tempfile::tempdir().expect("Failed to create temp dir"),
        }
    }

    /// Absolute path of `name` inside the directory
    pub fn path(&self, name: &str) -> PathBuf {
        self.temp.path().join(name)
    }

    /// Write a text file and return its path
    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.path(name);
        fs::write(&path, contents).expect("Failed to write fixture");
        path
    }

    /// Write a USDZ package holding one entry
    pub fn write_usdz(&self, name: &str, entry: &str, contents: &[u8]) -> PathBuf {
        let path = self.path(name);
        let file = File::create(&path).expect("Failed to create usdz");
        let mut writer = zip::ZipWriter::new(file);
        let options = zip::write::SimpleFileOptions::default()
            .compression_method(zip::CompressionMethod::Stored);
        writer.start_file(entry, options).expect("Failed to start entry");
        writer.write_all(contents).expect("Failed to write entry");
        writer.finish().expect("Failed to finish usdz");
        path
    }

    /// Run the binary inside this directory
    pub fn run(&self, args: &[&str]) -> RunResult {
        let output = Command::new(env!("CARGO_BIN_EXE_meshglb"))
            .args(args)
            .current_dir(self.temp.path())
            .env_remove("RUST_LOG")
            .output()
            .expect("Failed to run meshglb");
        RunResult::from(output)
    }
}

/// Captured process result
pub struct RunResult {
    pub code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl From<Output> for RunResult {
    fn from(output: Output) -> Self {
        Self {
            code: output.status.code().expect("Process killed by signal"),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        }
    }
}

/// Parse a GLB file from disk
pub fn read_glb(path: &Path) -> GlbContainer {
    let bytes = fs::read(path).expect("Failed to read GLB");
    GlbContainer::from_bytes(&bytes).expect("Invalid GLB")
}

/// `[min, max]` of the POSITION accessor of the first primitive of mesh `mesh`
pub fn position_bounds(glb: &GlbContainer, mesh: usize) -> ([f64; 3], [f64; 3]) {
    let accessor = glb.json["meshes"][mesh]["primitives"][0]["attributes"]["POSITION"]
        .as_u64()
        .expect("POSITION accessor") as usize;
    let acc = &glb.json["accessors"][accessor];
    let read = |key: &str| {
        let v = acc[key].as_array().expect("bounds");
        [
            v[0].as_f64().expect("x"),
            v[1].as_f64().expect("y"),
            v[2].as_f64().expect("z"),
        ]
    };
    (read("min"), read("max"))
}

/// Assert two vectors agree to within `1e-5`
pub fn assert_close(actual: [f64; 3], expected: [f64; 3]) {
    for (a, e) in actual.iter().zip(expected.iter()) {
        assert!((a - e).abs() < 1e-5, "{actual:?} != {expected:?}");
    }
}
