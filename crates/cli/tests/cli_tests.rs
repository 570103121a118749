//! Runs the real `generate` and `update-manifest` binaries.
//!
//! None of these cases reach the browser: they exercise input handling, the
//! skip path and the exit codes.

use std::path::Path;
use std::process::{Command, Output};

use serde_json::Value;
use tempfile::TempDir;

fn run(binary: &str, dir: &Path, args: &[&str]) -> Output {
    Command::new(binary)
        .args(args)
        .current_dir(dir)
        .env_remove("STROKEGIF_CONFIG")
        .env("STROKEGIF_OUTPUT__DIR", dir.join("output"))
        .env("STROKEGIF_OUTPUT__TEMP_DIR", dir.join("temp"))
        .env("RUST_LOG", "error")
        .output()
        .expect("Failed to run binary")
}

fn generate(dir: &Path, args: &[&str]) -> Output {
    run(env!("CARGO_BIN_EXE_generate"), dir, args)
}

fn update_manifest(dir: &Path) -> Output {
    run(env!("CARGO_BIN_EXE_update-manifest"), dir, &[])
}

fn write_gif(dir: &Path, name: &str) {
    let output = dir.join("output");
    std::fs::create_dir_all(&output).unwrap();
    std::fs::write(output.join(name), b"GIF89a").unwrap();
}

#[test]
fn test_generate_empty_list_exits_1() {
    let temp = TempDir::new().unwrap();
    std::fs::write(temp.path().join("chars.json"), "[]").unwrap();

    let out = generate(temp.path(), &["chars.json"]);

    assert_eq!(out.status.code(), Some(1));
}

#[test]
fn test_generate_unknown_shape_exits_1() {
    let temp = TempDir::new().unwrap();
    std::fs::write(temp.path().join("chars.json"), r#"{"words": ["中"]}"#).unwrap();

    let out = generate(temp.path(), &["chars.json"]);

    assert_eq!(out.status.code(), Some(1));
}

#[test]
fn test_generate_malformed_json_exits_1() {
    let temp = TempDir::new().unwrap();
    std::fs::write(temp.path().join("chars.json"), "[\"中\",").unwrap();

    let out = generate(temp.path(), &["chars.json"]);

    assert_eq!(out.status.code(), Some(1));
}

#[test]
fn test_generate_missing_list_exits_1() {
    let temp = TempDir::new().unwrap();

    let out = generate(temp.path(), &["missing.json"]);

    assert_eq!(out.status.code(), Some(1));
}

#[test]
fn test_generate_zero_concurrency_is_rejected() {
    let temp = TempDir::new().unwrap();

    let out = generate(temp.path(), &["中", "0"]);

    assert_eq!(out.status.code(), Some(1));
}

#[test]
fn test_generate_skips_existing_outputs() {
    let temp = TempDir::new().unwrap();
    write_gif(temp.path(), "中.gif");
    write_gif(temp.path(), "文.gif");
    std::fs::write(temp.path().join("chars.json"), r#"["中", "文", "中"]"#).unwrap();

    let out = generate(temp.path(), &["chars.json", "2"]);

    assert_eq!(out.status.code(), Some(0));
    assert!(!temp.path().join("temp").exists());
}

#[test]
fn test_generate_single_character_skip() {
    let temp = TempDir::new().unwrap();
    write_gif(temp.path(), "永.gif");

    let out = generate(temp.path(), &["永"]);

    assert_eq!(out.status.code(), Some(0));
}

#[test]
fn test_generate_dash_character_after_separator() {
    let temp = TempDir::new().unwrap();
    write_gif(temp.path(), "-V.gif");
    write_gif(temp.path(), "-c.gif");

    for character in ["-V", "-c"] {
        let out = generate(temp.path(), &["--", character]);

        assert_eq!(out.status.code(), Some(0), "character {}", character);
        assert!(!String::from_utf8_lossy(&out.stdout).contains("strokegif-cli"));
    }
}

#[test]
fn test_generate_invalid_character_exits_2() {
    let temp = TempDir::new().unwrap();

    let out = generate(temp.path(), &["a/b"]);

    assert_eq!(out.status.code(), Some(2));
}

#[test]
fn test_generate_help_exits_0() {
    let temp = TempDir::new().unwrap();

    let out = generate(temp.path(), &["--help"]);

    assert_eq!(out.status.code(), Some(0));
    assert!(String::from_utf8_lossy(&out.stdout)
        .to_lowercase()
        .contains("concurrency"));
}

#[test]
fn test_update_manifest_writes_data_json() {
    let temp = TempDir::new().unwrap();
    write_gif(temp.path(), "中.gif");
    write_gif(temp.path(), "文.gif");
    write_gif(temp.path(), "notes.txt");

    let out = update_manifest(temp.path());
    assert_eq!(out.status.code(), Some(0));

    let content = std::fs::read_to_string(temp.path().join("output/data.json")).unwrap();
    let entries: Vec<Value> = serde_json::from_str(&content).unwrap();
    assert_eq!(entries.len(), 2);
    for entry in &entries {
        let name = entry["name"].as_str().unwrap();
        assert_eq!(entry["url"], format!("output/{}", name));
        assert!(entry["mtime"].is_string());
    }
}

#[test]
fn test_update_manifest_without_output_dir() {
    let temp = TempDir::new().unwrap();

    let out = update_manifest(temp.path());

    assert_eq!(out.status.code(), Some(0));
    assert!(!temp.path().join("output").exists());
}
