// CLASSIFICATION: COMMUNITY
// Filename: pipeline.rs v0.1
// Author: Lukas Bower
// Date Modified: 2026-10-19

//! Ordered walk through the five stages.
//!
//! Each stage consumes the previous one's output and the first error ends the
//! run. Nothing acquired before a failure is released: the process exits right
//! after and the driver reclaims the context with it.

use crate::driver::libcuda::LibCuda;
use crate::driver::Driver;
use crate::error::HarnessError;
use crate::geometry::LaunchGrid;
use crate::stages::{init, launch, loader, memory, validate};
use log::{debug, info};
use std::path::Path;

/// Where a run currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Stage {
    Uninitialized,
    DriverReady,
    ContextActive,
    ModuleLoaded,
    BufferAllocated,
    Launched,
    Copied,
    /// Every element matched.
    Validated,
    /// An element did not match.
    Rejected,
    /// A driver or I/O error ended the run.
    Aborted,
}

impl Stage {
    pub fn is_terminal(self) -> bool {
        matches!(self, Stage::Validated | Stage::Rejected | Stage::Aborted)
    }
}

/// Outcome of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub stage: Stage,
    pub launch: LaunchGrid,
    /// Number of output elements that matched their index.
    pub verified: usize,
}

pub struct Harness<D> {
    driver: D,
    stage: Stage,
}

impl<D: Driver> Harness<D> {
    pub fn new(driver: D) -> Self {
        Self {
            driver,
            stage: Stage::Uninitialized,
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    pub fn into_driver(self) -> D {
        self.driver
    }

    fn advance(&mut self, next: Stage) {
        debug!("{:?} -> {:?}", self.stage, next);
        self.stage = next;
    }

    /// Run the pipeline once against the module at `module_path`.
    pub fn run(&mut self, module_path: &Path) -> Result<RunReport, HarnessError> {
        let outcome = self.walk(module_path);
        if let Err(err) = &outcome {
            let terminal = match err {
                HarnessError::Mismatch { .. } => Stage::Rejected,
                _ => Stage::Aborted,
            };
            self.advance(terminal);
        }
        outcome
    }

    fn walk(&mut self, module_path: &Path) -> Result<RunReport, HarnessError> {
        init::start_driver(&mut self.driver)?;
        self.advance(Stage::DriverReady);

        let active = init::create_context(&mut self.driver)?;
        self.advance(Stage::ContextActive);

        let kernel = loader::load_kernel(&mut self.driver, module_path)?;
        self.advance(Stage::ModuleLoaded);

        let output = memory::allocate_results(&mut self.driver)?;
        self.advance(Stage::BufferAllocated);

        let launch = launch::launch_kernel(&mut self.driver, &kernel.function, output)?;
        self.advance(Stage::Launched);

        let results = validate::copy_results(&mut self.driver, output)?;
        self.advance(Stage::Copied);

        validate::verify(&results)?;
        self.advance(Stage::Validated);
        let verified = results.len();
        info!("all {verified} elements verified");

        // Host buffer goes first, then the device buffer, then the context.
        drop(results);
        memory::release_results(&mut self.driver, output)?;
        init::destroy_context(&mut self.driver, active)?;

        Ok(RunReport {
            stage: self.stage,
            launch,
            verified,
        })
    }
}

/// Bind the native driver and run the pipeline against `module_path`.
pub fn run(module_path: &Path) -> Result<RunReport, HarnessError> {
    let driver = LibCuda::open()?;
    Harness::new(driver).run(module_path)
}
