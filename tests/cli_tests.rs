//! Integration tests for the lumptex CLI
//!
//! These tests run the built binary against resource directories written to
//! temporary folders and check exit codes and the PNGs produced.

mod common;

use common::{solid_patch, striped_patch};
use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

fn lumptex(cwd: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_lumptex"))
        .current_dir(cwd)
        .args(args)
        .output()
        .expect("Failed to execute lumptex")
}

/// A project with a `lumps/` directory holding a few resources.
fn project() -> TempDir {
    let dir = TempDir::new().unwrap();
    let lumps = dir.path().join("lumps");
    fs::create_dir(&lumps).unwrap();

    fs::write(lumps.join("STRIPES.lmp"), striped_patch(4, 3)).unwrap();
    fs::write(lumps.join("SOLID.lmp"), solid_patch(2, 2, 9)).unwrap();
    fs::write(lumps.join("FLOOR.lmp"), vec![5u8; 64 * 64]).unwrap();
    fs::write(lumps.join("BROKEN.lmp"), vec![0xFFu8; 16]).unwrap();

    let mut playpal = vec![0u8; 768];
    playpal[9 * 3..9 * 3 + 3].copy_from_slice(&[255, 0, 0]);
    fs::write(lumps.join("PLAYPAL.lmp"), playpal).unwrap();
    dir
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn test_render_patch() {
    let dir = project();
    let output = lumptex(dir.path(), &["render", "stripes"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let image = image::open(dir.path().join("build/stripes.png")).unwrap().to_rgba8();
    assert_eq!(image.dimensions(), (4, 3));
    // Grayscale palette: column x holds index x + 1
    assert_eq!(image.get_pixel(2, 1).0, [3, 3, 3, 255]);
}

#[test]
fn test_render_flat_with_palette_and_scale() {
    let dir = project();
    let output = lumptex(
        dir.path(),
        &["render", "FLOOR", "--format", "flat", "--scale", "2", "-o", "out.png"],
    );
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let image = image::open(dir.path().join("out.png")).unwrap().to_rgba8();
    assert_eq!(image.dimensions(), (128, 128));
    assert_eq!(image.get_pixel(0, 0).0, [5, 5, 5, 255]);

    let output = lumptex(
        dir.path(),
        &["render", "SOLID", "--palette", "PLAYPAL", "-o", "red.png"],
    );
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let image = image::open(dir.path().join("red.png")).unwrap().to_rgba8();
    assert_eq!(image.get_pixel(1, 1).0, [255, 0, 0, 255]);
}

#[test]
fn test_render_invalid_patch_warns() {
    let dir = project();
    let output = lumptex(dir.path(), &["render", "BROKEN"]);
    assert!(output.status.success());
    assert!(stderr(&output).contains("Warning"));

    let output = lumptex(dir.path(), &["render", "BROKEN", "--strict"]);
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_render_unknown_resource() {
    let dir = project();
    let output = lumptex(dir.path(), &["render", "NOPE"]);
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("not found"));
}

#[test]
fn test_render_row_major_requires_size() {
    let dir = project();
    let output = lumptex(dir.path(), &["render", "FLOOR", "--format", "row-major"]);
    assert_eq!(output.status.code(), Some(2));

    let output = lumptex(
        dir.path(),
        &["render", "FLOOR", "--format", "row-major", "--width", "32", "--height", "128"],
    );
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let image = image::open(dir.path().join("build/floor.png")).unwrap().to_rgba8();
    assert_eq!(image.dimensions(), (32, 128));
}

#[test]
fn test_composite_from_config() {
    let dir = project();
    fs::write(
        dir.path().join("lumptex.toml"),
        r#"
[output]
dir = "png"
transparent = false

[textures.WALL]
width = 6
height = 3
patches = [
  { patch = "STRIPES", x = -2, y = 0 },
  { x = 0, y = 0 },
  { patch = "SOLID", x = 4, y = 1 },
]

[textures.OTHER]
width = 2
height = 2
patches = [{ patch = "SOLID" }]
"#,
    )
    .unwrap();

    let output = lumptex(dir.path(), &["composite"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let wall = image::open(dir.path().join("png/wall.png")).unwrap().to_rgba8();
    assert_eq!(wall.dimensions(), (6, 3));
    // STRIPES columns 2 and 3 (values 3, 4) land at x = 0, 1
    assert_eq!(wall.get_pixel(0, 0).0, [3, 3, 3, 255]);
    assert_eq!(wall.get_pixel(1, 2).0, [4, 4, 4, 255]);
    assert_eq!(wall.get_pixel(2, 0).0, [0, 0, 0, 255]);
    // SOLID clipped at the bottom
    assert_eq!(wall.get_pixel(5, 2).0, [9, 9, 9, 255]);
    assert_eq!(wall.get_pixel(5, 0).0, [0, 0, 0, 255]);

    assert!(dir.path().join("png/other.png").exists());
}

#[test]
fn test_composite_missing_patch_is_warning() {
    let dir = project();
    fs::write(
        dir.path().join("lumptex.toml"),
        "[textures.GAP]\nwidth = 4\nheight = 4\npatches = [{ patch = \"MISSING\" }]\n",
    )
    .unwrap();

    let output = lumptex(dir.path(), &["composite", "gap"]);
    assert!(output.status.success());
    assert!(stderr(&output).contains("MISSING"));

    let output = lumptex(dir.path(), &["composite", "gap", "--strict"]);
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_composite_bad_config() {
    let dir = project();
    fs::write(
        dir.path().join("lumptex.toml"),
        "[textures.BAD]\nwidth = 0\nheight = 4\n",
    )
    .unwrap();
    let output = lumptex(dir.path(), &["composite"]);
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("textures.BAD"));
}

#[test]
fn test_inspect_json() {
    let dir = project();
    let output = lumptex(dir.path(), &["inspect", "STRIPES", "--json"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["valid"], true);
    assert_eq!(report["posts"], 4);
    assert_eq!(report["header"]["width"], 4);
}

#[test]
fn test_inspect_invalid() {
    let dir = project();
    let output = lumptex(dir.path(), &["inspect", "BROKEN"]);
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("valid:   no"));
}
