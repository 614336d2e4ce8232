// CLASSIFICATION: COMMUNITY
// Filename: main.rs v0.1
// Date Modified: 2026-10-19
// Author: Lukas Bower

//! Entry point for the `driver_apis` fixture binary.

use driver_probe::args::Args;
use driver_probe::{pipeline, HarnessError, SUCCESS_MARKER};
use std::process;

fn run() -> Result<(), HarnessError> {
    let args = Args::from_argv(std::env::args_os())?;
    pipeline::run(&args.module)?;
    eprintln!("{SUCCESS_MARKER}");
    Ok(())
}

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        err.report();
        process::exit(err.exit_code());
    }
}
