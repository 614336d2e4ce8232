// CLASSIFICATION: COMMUNITY
// Filename: cli_usage.rs v0.1
// Author: Lukas Bower
// Date Modified: 2026-10-19

use std::process::Command;

fn driver_apis() -> Command {
    Command::new(env!("CARGO_BIN_EXE_driver_apis"))
}

#[test]
fn no_module_path_is_usage_error() {
    let output = driver_apis().output().expect("run driver_apis");
    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    assert!(!output.stderr.is_empty());
}

#[test]
fn two_module_paths_is_usage_error() {
    let output = driver_apis()
        .args(["a.fatbin", "b.fatbin"])
        .output()
        .expect("run driver_apis");
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!stderr.contains("Operation"));
}

#[test]
fn missing_module_fails() {
    let dir = tempfile::tempdir().unwrap();
    let output = driver_apis()
        .arg(dir.path().join("missing.fatbin"))
        .output()
        .expect("run driver_apis");
    assert_ne!(output.status.code(), Some(0));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!stderr.contains("Success"));
}

#[test]
fn dashed_argument_is_loaded_as_module() {
    let output = driver_apis()
        .arg("--help")
        .output()
        .expect("run driver_apis");
    assert_ne!(output.status.code(), Some(0));
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!stderr.contains("Usage:"));
}
