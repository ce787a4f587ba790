use anyhow::Result;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

/// Helper to run pattern-base64 inside `dir` and capture output
fn run_pattern_base64(dir: &Path, args: &[&str]) -> Result<(String, String, bool)> {
    let exe_path = PathBuf::from(env!("CARGO_BIN_EXE_pattern-base64"));
    let output = Command::new(exe_path)
        .args(args)
        .current_dir(dir)
        .env_remove("PATTERN_BASE64_MANIFEST")
        .output()?;

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();

    Ok((stdout, stderr, output.status.success()))
}

#[test]
fn test_manifest_init_creates_default_manifest() -> Result<()> {
    let temp_dir = TempDir::new()?;

    let (stdout, _stderr, success) = run_pattern_base64(temp_dir.path(), &["manifest", "init"])?;

    assert!(success);
    assert!(stdout.contains("Created manifest file at:"));

    let content = std::fs::read_to_string(temp_dir.path().join("patterns.json"))?;
    let manifest: serde_json::Value = serde_json::from_str(&content)?;
    assert_eq!(manifest["version"], "0.1.0");
    assert_eq!(manifest["outputFile"], "patterns_output.txt");
    assert_eq!(manifest["images"].as_array().unwrap().len(), 6);
    assert_eq!(manifest["images"][0]["id"], "pattern-17");

    Ok(())
}

#[test]
fn test_manifest_init_with_existing_file() -> Result<()> {
    let temp_dir = TempDir::new()?;
    std::fs::write(temp_dir.path().join("patterns.json"), "{}")?;

    let (stdout, _stderr, success) = run_pattern_base64(temp_dir.path(), &["manifest", "init"])?;

    assert!(success);
    assert!(stdout.contains("Manifest file already exists"));
    assert!(stdout.contains("Use --force to overwrite"));
    assert_eq!(
        std::fs::read_to_string(temp_dir.path().join("patterns.json"))?,
        "{}"
    );

    Ok(())
}

#[test]
fn test_manifest_init_force_overwrites() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let manifest_path = temp_dir.path().join("custom.json");
    std::fs::write(&manifest_path, r#"{"version": "old"}"#)?;

    let (stdout, _stderr, success) = run_pattern_base64(
        temp_dir.path(),
        &[
            "manifest",
            "init",
            "--force",
            "--path",
            manifest_path.to_str().unwrap(),
        ],
    )?;

    assert!(success);
    assert!(stdout.contains("Created manifest file at:"));

    let content = std::fs::read_to_string(&manifest_path)?;
    let manifest: serde_json::Value = serde_json::from_str(&content)?;
    assert_eq!(manifest["version"], "0.1.0");

    Ok(())
}

#[test]
fn test_manifest_show_json_format() -> Result<()> {
    let temp_dir = TempDir::new()?;

    let (stdout, _stderr, success) =
        run_pattern_base64(temp_dir.path(), &["manifest", "show", "--json"])?;

    assert!(success);
    let manifest: serde_json::Value = serde_json::from_str(&stdout)?;
    assert_eq!(manifest["images"][5]["name"], "Vertical Empty");

    Ok(())
}

#[test]
fn test_manifest_show_pretty_format() -> Result<()> {
    let temp_dir = TempDir::new()?;

    let (stdout, _stderr, success) = run_pattern_base64(temp_dir.path(), &["manifest", "show"])?;

    assert!(success);
    assert!(stdout.contains("Pattern Manifest"));
    assert!(stdout.contains("Source: built-in"));
    assert!(stdout.contains("Images (6):"));
    assert!(stdout.contains("pattern-19  Bottom-Left Empty  (Figure/Bottom Left.png)"));

    Ok(())
}

#[test]
fn test_manifest_validate_valid_manifest() -> Result<()> {
    let temp_dir = TempDir::new()?;
    run_pattern_base64(temp_dir.path(), &["manifest", "init"])?;

    let (stdout, _stderr, success) = run_pattern_base64(
        temp_dir.path(),
        &["--manifest", "patterns.json", "manifest", "validate"],
    )?;

    assert!(success);
    assert!(stdout.contains("Manifest file is valid!"));
    assert!(stdout.contains("Resolved image paths:"));
    assert!(stdout.contains("pattern-20: Figure/Bottom Right.png (missing)"));

    Ok(())
}

#[test]
fn test_manifest_validate_invalid_manifest() -> Result<()> {
    let temp_dir = TempDir::new()?;
    std::fs::write(
        temp_dir.path().join("patterns.json"),
        r#"{
            "version": "0.1.0",
            "outputFile": "",
            "images": []
        }"#,
    )?;

    let (stdout, _stderr, success) = run_pattern_base64(
        temp_dir.path(),
        &["--manifest", "patterns.json", "manifest", "validate"],
    )?;

    assert!(!success);
    assert!(stdout.contains("Manifest file validation failed"));
    assert!(stdout.contains("outputFile cannot be empty"));

    Ok(())
}

#[test]
fn test_manifest_validate_reports_record_warnings() -> Result<()> {
    let temp_dir = TempDir::new()?;
    std::fs::write(
        temp_dir.path().join("patterns.json"),
        r#"{
            "version": "0.1.0",
            "outputFile": "out.txt",
            "images": [
                { "path": "a.png", "id": "dup", "name": "A" },
                { "path": "b.png", "id": "dup", "name": "Queen's" }
            ]
        }"#,
    )?;

    let (stdout, _stderr, success) = run_pattern_base64(
        temp_dir.path(),
        &["--manifest", "patterns.json", "manifest", "validate"],
    )?;

    assert!(success);
    assert!(stdout.contains("Manifest file is valid!"));
    assert!(stdout.contains("Warnings (records are still converted as written):"));
    assert!(stdout.contains("Duplicate image id: dup"));
    assert!(stdout.contains("images[1].name contains a quote or line break"));
    assert!(stdout.contains("dup: a.png (missing)"));

    Ok(())
}

#[test]
fn test_manifest_custom_path_not_found() -> Result<()> {
    let temp_dir = TempDir::new()?;

    let (_stdout, stderr, success) =
        run_pattern_base64(temp_dir.path(), &["--manifest", "nonexistent.json"])?;

    assert!(!success);
    assert!(stderr.contains("Manifest file not found at specified path"));

    Ok(())
}
