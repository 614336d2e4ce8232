// CLASSIFICATION: COMMUNITY
// Filename: memory.rs v0.1
// Author: Lukas Bower
// Date Modified: 2026-10-19

use crate::driver::{Checked, DevicePtr, Driver};
use crate::error::HarnessError;
use crate::geometry::BUFFER_BYTES;
use log::trace;

/// Reserve the kernel's output buffer. It is the only device allocation.
pub fn allocate_results<D: Driver>(driver: &mut D) -> Result<DevicePtr, HarnessError> {
    let buffer = driver.mem_alloc(BUFFER_BYTES).checked("cuMemAlloc")?;
    trace!("allocated {BUFFER_BYTES} bytes at {:#x}", buffer.0);
    Ok(buffer)
}

pub fn release_results<D: Driver>(driver: &mut D, buffer: DevicePtr) -> Result<(), HarnessError> {
    driver.mem_free(buffer).checked("cuMemFree")?;
    trace!("freed {:#x}", buffer.0);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::mock::{MockDriver, Op};
    use crate::driver::Status;
    use crate::stages::init;

    #[test]
    fn allocate_then_release() {
        let mut drv = MockDriver::new();
        init::start_driver(&mut drv).unwrap();
        init::create_context(&mut drv).unwrap();
        let buffer = allocate_results(&mut drv).unwrap();
        assert_eq!(drv.live_allocations(), 1);
        release_results(&mut drv, buffer).unwrap();
        assert_eq!(drv.live_allocations(), 0);
    }

    #[test]
    fn out_of_memory_is_fatal() {
        let mut drv = MockDriver::new().fail(Op::MemAlloc, Status::OUT_OF_MEMORY);
        init::start_driver(&mut drv).unwrap();
        init::create_context(&mut drv).unwrap();
        let err = allocate_results(&mut drv).unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert_eq!(drv.live_allocations(), 0);
    }
}
