use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use tempfile::tempdir;

fn shaderlines(config_dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_shaderlines"))
        .args(args)
        .env("SHADERLINES_CONFIG_DIR", config_dir)
        .env("RUST_LOG", "warn")
        .output()
        .expect("failed to spawn shaderlines")
}

#[test]
fn config_prints_defaults_without_a_file() {
    let dir = tempdir().unwrap();
    let output = shaderlines(dir.path(), &["config"]);
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("width = 1280"));
    assert!(stdout.contains("mode = \"frame-step\""));
    assert!(stdout.contains("step = 0.05"));
}

#[test]
fn config_reads_file_from_config_dir() {
    let dir = tempdir().unwrap();
    fs::write(
        dir.path().join("shaderlines.toml"),
        "[window]\nwidth = 320\nheight = 200\n\n[animation]\nstep = 0.25\n",
    )
    .unwrap();

    let output = shaderlines(dir.path(), &["config"]);
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("width = 320"));
    assert!(stdout.contains("height = 200"));
    assert!(stdout.contains("step = 0.25"));
}

#[test]
fn command_line_overrides_file_values() {
    let dir = tempdir().unwrap();
    fs::write(
        dir.path().join("shaderlines.toml"),
        "[window]\nwidth = 320\nheight = 200\n",
    )
    .unwrap();

    let output = shaderlines(
        dir.path(),
        &["--size", "800x600", "--wall-clock", "--no-vsync", "config"],
    );
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("width = 800"));
    assert!(stdout.contains("height = 600"));
    assert!(stdout.contains("mode = \"wall-clock\""));
    assert!(stdout.contains("vsync = false"));
}

#[test]
fn invalid_config_exits_with_error() {
    let dir = tempdir().unwrap();
    fs::write(
        dir.path().join("shaderlines.toml"),
        "[animation]\nstep = -1.0\n",
    )
    .unwrap();

    let output = shaderlines(dir.path(), &["config"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("animation step"), "stderr: {stderr}");
}

#[test]
fn explicit_config_path_must_exist() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("missing.toml");
    let output = shaderlines(
        dir.path(),
        &["--config", missing.to_str().unwrap(), "config"],
    );
    assert!(!output.status.success());
}

#[test]
fn check_validates_builtin_shaders() {
    let dir = tempdir().unwrap();
    let output = shaderlines(dir.path(), &["check"]);
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("vertex   ok"));
    assert!(stdout.contains("fragment ok"));
}
