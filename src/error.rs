// CLASSIFICATION: COMMUNITY
// Filename: error.rs v0.1
// Author: Lukas Bower
// Date Modified: 2026-10-19

use crate::driver::libcuda::LoadError;
use crate::driver::DriverError;
use std::path::PathBuf;
use thiserror::Error;

/// Exit code for usage, I/O and validation failures.
pub const FAILURE_EXIT_CODE: i32 = 1;

/// Every way a run can end early. None of them is recovered from; `main`
/// reports the error and exits with [`HarnessError::exit_code`].
#[derive(Error, Debug)]
pub enum HarnessError {
    #[error("{0}")]
    Usage(#[from] clap::Error),
    #[error("Cannot read module image \"{}\": {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Compute driver unavailable: {0}")]
    DriverUnavailable(#[from] LoadError),
    #[error(transparent)]
    Driver(#[from] DriverError),
    #[error("h_results[{index}] is {actual}")]
    Mismatch { index: usize, actual: u32 },
}

impl HarnessError {
    /// Process exit code: the raw status for driver failures, 1 otherwise.
    pub fn exit_code(&self) -> i32 {
        match self {
            HarnessError::Driver(err) => err.exit_code(),
            _ => FAILURE_EXIT_CODE,
        }
    }

    /// Write the diagnostic for this error to stderr.
    pub fn report(&self) {
        eprintln!("{self}");
    }
}
