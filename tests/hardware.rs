// CLASSIFICATION: COMMUNITY
// Filename: hardware.rs v0.1
// Author: Lukas Bower
// Date Modified: 2026-10-19

//! Runs against a real device. Needs `--features cuda`, nvcc at build time and
//! a GPU at test time; otherwise each test returns early.

#![cfg(feature = "cuda")]

use driver_probe::driver::libcuda::LibCuda;
use driver_probe::geometry::DATA_LENGTH;
use driver_probe::{Harness, Stage};
use serial_test::serial;
use std::io::Write;
use std::path::Path;
use std::process::Command;

fn fixture() -> Option<&'static Path> {
    option_env!("DRIVER_PROBE_FATBIN").map(Path::new)
}

#[test]
#[serial]
fn fixture_kernel_verifies() {
    let (Some(path), Ok(driver)) = (fixture(), LibCuda::open()) else {
        return;
    };
    let mut harness = Harness::new(driver);
    let report = match harness.run(path) {
        Ok(report) => report,
        // No usable device on this host.
        Err(err) if err.exit_code() == 100 => return,
        Err(err) => panic!("{err}"),
    };
    assert_eq!(report.stage, Stage::Validated);
    assert_eq!(report.verified, DATA_LENGTH);
}

#[test]
#[serial]
fn binary_is_deterministic() {
    let (Some(path), Ok(_)) = (fixture(), LibCuda::open()) else {
        return;
    };
    let mut outputs = Vec::new();
    for _ in 0..3 {
        let output = Command::new(env!("CARGO_BIN_EXE_driver_apis"))
            .arg(path)
            .env_remove("RUST_LOG")
            .output()
            .expect("run driver_apis");
        if output.status.code() == Some(100) {
            return;
        }
        assert_eq!(output.status.code(), Some(0));
        outputs.push(output.stderr);
    }
    assert_eq!(String::from_utf8_lossy(&outputs[0]), "Success\n");
    assert!(outputs.windows(2).all(|w| w[0] == w[1]));
}

#[test]
#[serial]
fn invalid_image_returns_driver_code() {
    let Ok(_) = LibCuda::open() else {
        return;
    };
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(b"not a device binary").unwrap();
    let output = Command::new(env!("CARGO_BIN_EXE_driver_apis"))
        .arg(file.path())
        .output()
        .expect("run driver_apis");
    let code = output.status.code().unwrap_or_default();
    assert!(code != 0 && code != 1, "expected a driver status, got {code}");
}
