// CLASSIFICATION: COMMUNITY
// Filename: launch.rs v0.1
// Author: Lukas Bower
// Date Modified: 2026-10-19

//! Kernel launch.
//!
//! The launch goes to the default stream and is not synchronized explicitly:
//! the blocking device-to-host copy that follows is ordered after it.

use crate::driver::{Checked, DevicePtr, Driver};
use crate::error::HarnessError;
use crate::geometry::LaunchGrid;
use log::debug;

/// Launch `function` over the full result grid with `output` as its only
/// argument.
pub fn launch_kernel<D: Driver>(
    driver: &mut D,
    function: &D::Function,
    output: DevicePtr,
) -> Result<LaunchGrid, HarnessError> {
    let launch = LaunchGrid::for_results();
    debug!(
        "launching {}x{}x{} blocks of {}x{}x{} threads",
        launch.grid.x, launch.grid.y, launch.grid.z, launch.block.x, launch.block.y, launch.block.z
    );
    driver
        .launch_kernel(function, launch, &[output])
        .checked("cuLaunchKernel")?;
    Ok(launch)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::mock::{MockDriver, Op};
    use crate::driver::Status;
    use crate::geometry::{Dim3, DATA_LENGTH};
    use crate::stages::test_support::fatbin_file;
    use crate::stages::{init, loader, memory};

    #[test]
    fn launches_four_blocks_of_thirty_two() {
        let file = fatbin_file();
        let mut drv = MockDriver::new();
        init::start_driver(&mut drv).unwrap();
        init::create_context(&mut drv).unwrap();
        let kernel = loader::load_kernel(&mut drv, file.path()).unwrap();
        let output = memory::allocate_results(&mut drv).unwrap();
        let launch = launch_kernel(&mut drv, &kernel.function, output).unwrap();
        assert_eq!(launch.grid, Dim3::linear(4));
        assert_eq!(launch.block, Dim3::linear(32));
        assert_eq!(drv.launches(), &[launch]);
        assert_eq!(launch.thread_count(), DATA_LENGTH);
    }

    #[test]
    fn launch_failure_is_fatal() {
        let file = fatbin_file();
        let mut drv = MockDriver::new().fail(Op::LaunchKernel, Status::LAUNCH_FAILED);
        init::start_driver(&mut drv).unwrap();
        init::create_context(&mut drv).unwrap();
        let kernel = loader::load_kernel(&mut drv, file.path()).unwrap();
        let output = memory::allocate_results(&mut drv).unwrap();
        let err = launch_kernel(&mut drv, &kernel.function, output).unwrap_err();
        assert_eq!(err.exit_code(), 719);
        assert!(drv.launches().is_empty());
    }
}
