// CLASSIFICATION: COMMUNITY
// Filename: lib.rs v0.1
// Date Modified: 2026-10-19
// Author: Lukas Bower

//! Driver-API kernel verification harness.
//!
//! Initializes the compute driver on device 0, loads a precompiled device
//! binary, launches its `kernel` entry point over 4 blocks of 32 threads and
//! checks that every one of the 128 output slots holds its own index. Any
//! failure ends the run; see [`error::HarnessError::exit_code`].

/// Command-line parsing
pub mod args;

/// Driver trait, status codes and the native and mock backends
pub mod driver;

/// Error type and exit codes
pub mod error;

/// Launch geometry constants
pub mod geometry;

/// Stage sequencing and the run state machine
pub mod pipeline;

/// Initializer, loader, allocator, launcher and validator
pub mod stages;

pub use error::HarnessError;
pub use pipeline::{Harness, RunReport, Stage};

/// Marker written to stderr after a verified run.
pub const SUCCESS_MARKER: &str = "Success";
