//! CLI integration tests for `pxscale`
//!
//! These tests run the binary against images in temporary directories and
//! check exit codes and output dimensions.

use image::{ImageBuffer, Rgba, RgbaImage};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

fn pxscale() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_pxscale"));
    // Keep a developer's own config out of the way.
    cmd.env("XDG_CONFIG_HOME", "/nonexistent").env_remove("RUST_LOG");
    cmd
}

/// Write a small two-color sprite and return its path
fn write_sprite(dir: &Path, name: &str, width: u32, height: u32) -> PathBuf {
    let img: RgbaImage = ImageBuffer::from_fn(width, height, |x, y| {
        if x == y {
            Rgba([0, 0, 0, 255])
        } else {
            Rgba([240, 200, 40, 255])
        }
    });
    let path = dir.join(name);
    img.save(&path).expect("should write sprite");
    path
}

fn dimensions(path: &Path) -> (u32, u32) {
    let img = image::open(path).expect("Failed to open output image");
    (img.width(), img.height())
}

fn run(cmd: &mut Command, dir: &Path) -> Output {
    cmd.current_dir(dir).output().expect("Failed to execute pxscale")
}

#[test]
fn test_scale_with_factor() {
    let temp = TempDir::new().unwrap();
    let input = write_sprite(temp.path(), "in.png", 8, 6);
    let output = temp.path().join("out.png");

    let result = run(
        pxscale().args(["scale"]).arg(&input).arg("-o").arg(&output).args(["-a", "hq", "-f", "3"]),
        temp.path(),
    );

    assert!(result.status.success(), "scale failed: {}", String::from_utf8_lossy(&result.stderr));
    assert_eq!(dimensions(&output), (24, 18));
}

#[test]
fn test_scale_with_size_infers_factor() {
    let temp = TempDir::new().unwrap();
    let input = write_sprite(temp.path(), "in.png", 8, 8);
    let output = temp.path().join("out.png");

    let result = run(
        pxscale()
            .args(["scale"])
            .arg(&input)
            .arg("-o")
            .arg(&output)
            .args(["-a", "scale", "--size", "32x32", "--backend", "raster"]),
        temp.path(),
    );

    assert!(result.status.success(), "scale failed: {}", String::from_utf8_lossy(&result.stderr));
    assert_eq!(dimensions(&output), (32, 32));
}

#[test]
fn test_unsupported_factor_exits_with_error() {
    let temp = TempDir::new().unwrap();
    let input = write_sprite(temp.path(), "in.png", 4, 4);
    let output = temp.path().join("out.png");

    let result = run(
        pxscale().args(["scale"]).arg(&input).arg("-o").arg(&output).args(["-a", "epx", "-f", "3"]),
        temp.path(),
    );

    assert_eq!(result.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&result.stderr);
    assert!(stderr.contains("EPX algorithm doesn't support 3x scaling"), "stderr: {}", stderr);
    assert!(!output.exists());
}

#[test]
fn test_unknown_algorithm_is_invalid_args() {
    let temp = TempDir::new().unwrap();
    let input = write_sprite(temp.path(), "in.png", 4, 4);

    let result = run(
        pxscale().args(["scale"]).arg(&input).args(["-o", "out.png", "-a", "hq9x"]),
        temp.path(),
    );
    assert_eq!(result.status.code(), Some(2));
}

#[test]
fn test_bad_size_is_invalid_args() {
    let temp = TempDir::new().unwrap();
    let input = write_sprite(temp.path(), "in.png", 4, 4);

    let result = run(
        pxscale().args(["scale"]).arg(&input).args(["-o", "out.png", "--size", "big"]),
        temp.path(),
    );
    assert_eq!(result.status.code(), Some(2));
}

#[test]
fn test_missing_input_is_error() {
    let temp = TempDir::new().unwrap();
    let result = run(pxscale().args(["scale", "nope.png", "-o", "out.png"]), temp.path());
    assert_eq!(result.status.code(), Some(1));
}

#[test]
fn test_config_defaults_are_used() {
    let temp = TempDir::new().unwrap();
    fs::write(
        temp.path().join("pxscale.toml"),
        "[defaults]\nalgorithm = \"omniscale\"\nfactor = 2.5\n",
    )
    .unwrap();
    let input = write_sprite(temp.path(), "in.png", 8, 4);

    let result = run(pxscale().args(["scale", "in.png", "-o", "out.png"]), temp.path());

    assert!(result.status.success(), "scale failed: {}", String::from_utf8_lossy(&result.stderr));
    assert!(input.exists());
    assert_eq!(dimensions(&temp.path().join("out.png")), (20, 10));
}

#[test]
fn test_invalid_config_is_error() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("pxscale.toml"), "[engine]\nband_rows = 0\n").unwrap();
    write_sprite(temp.path(), "in.png", 4, 4);

    let result = run(pxscale().args(["scale", "in.png", "-o", "out.png"]), temp.path());
    assert_eq!(result.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&result.stderr).contains("engine.band_rows"));
}

#[test]
fn test_glob_input_writes_directory() {
    let temp = TempDir::new().unwrap();
    write_sprite(temp.path(), "a.png", 4, 4);
    write_sprite(temp.path(), "b.png", 5, 3);

    let result = run(pxscale().args(["scale", "*.png", "-o", "big", "-a", "xbr", "-f", "4"]), temp.path());
    assert!(result.status.success(), "scale failed: {}", String::from_utf8_lossy(&result.stderr));
    assert_eq!(dimensions(&temp.path().join("big").join("a.png")), (16, 16));
    assert_eq!(dimensions(&temp.path().join("big").join("b.png")), (20, 12));
}

#[test]
fn test_list_json() {
    let temp = TempDir::new().unwrap();
    let result = run(pxscale().args(["list", "--scale", "3", "--backend", "raster", "--json"]), temp.path());

    assert!(result.status.success());
    let value: serde_json::Value = serde_json::from_slice(&result.stdout).expect("valid JSON");
    let ids: Vec<&str> = value
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["nearest", "bilinear", "scale", "scale-sfx", "omniscale"]);
}

#[test]
fn test_info_accepts_display_name() {
    let temp = TempDir::new().unwrap();
    let result = run(pxscale().args(["info", "ScaleSFX"]), temp.path());

    assert!(result.status.success());
    let stdout = String::from_utf8_lossy(&result.stdout);
    assert!(stdout.starts_with("ScaleSFX (scale-sfx)"), "stdout: {}", stdout);
    assert!(stdout.contains("2x, 3x"));
}

#[test]
fn test_info_unknown_algorithm() {
    let temp = TempDir::new().unwrap();
    let result = run(pxscale().args(["info", "hq9x"]), temp.path());
    assert_eq!(result.status.code(), Some(2));
}
