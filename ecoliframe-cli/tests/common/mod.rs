#![allow(dead_code)]

use std::fs;
use std::path::Path;

use assert_cmd::Command;

/// Runs the ecoliframe CLI with a fixed seed and a short run, writing into
/// `output_dir`. Extra arguments are appended as given.
pub fn run_ecoliframe(output_dir: &Path, extra: &[&str]) -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::cargo_bin("ecoliframe")?;
    cmd.arg("-q")
        .arg("-n")
        .arg("200")
        .arg("--seed")
        .arg("11")
        .arg("-o")
        .arg(output_dir)
        .args(extra);

    cmd.assert().success();
    Ok(())
}

/// Parses a JSON artifact written by the CLI.
pub fn read_json(path: &Path) -> serde_json::Value {
    let text = fs::read_to_string(path).unwrap();
    serde_json::from_str(&text).unwrap()
}
