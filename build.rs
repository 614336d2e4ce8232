// CLASSIFICATION: COMMUNITY
// Filename: build.rs v0.6
// Author: Lukas Bower
// Date Modified: 2026-10-19

fn main() {
    use std::{env, path::PathBuf, process::Command};

    println!("cargo:rerun-if-changed=fixtures/kernel.cu");

    let cuda_feature = env::var("CARGO_FEATURE_CUDA").is_ok();
    if !cuda_feature {
        return;
    }

    let nvcc = match which::which("nvcc") {
        Ok(path) => path,
        Err(_) => {
            println!("cargo:warning=nvcc missing; hardware fixture not built");
            return;
        }
    };

    let out_dir = match env::var("OUT_DIR") {
        Ok(dir) => PathBuf::from(dir),
        Err(_) => return,
    };
    let fatbin = out_dir.join("kernel.fatbin");

    let status = Command::new(nvcc)
        .arg("-fatbin")
        .arg("fixtures/kernel.cu")
        .arg("-o")
        .arg(&fatbin)
        .status();
    match status {
        Ok(s) if s.success() => {
            println!("cargo:rustc-env=DRIVER_PROBE_FATBIN={}", fatbin.display());
        }
        _ => println!("cargo:warning=nvcc failed; hardware fixture not built"),
    }
}
