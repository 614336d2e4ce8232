// CLASSIFICATION: COMMUNITY
// Filename: validate.rs v0.1
// Author: Lukas Bower
// Date Modified: 2026-10-19

//! Result copy-back and verification.

use crate::driver::{Checked, DevicePtr, Driver};
use crate::error::HarnessError;
use crate::geometry::DATA_LENGTH;
use log::debug;

/// Value thread `index` must have written.
pub fn expected(index: usize) -> u32 {
    index as u32
}

/// First element that does not hold its expected value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mismatch {
    pub index: usize,
    pub actual: u32,
}

impl From<Mismatch> for HarnessError {
    fn from(m: Mismatch) -> Self {
        HarnessError::Mismatch {
            index: m.index,
            actual: m.actual,
        }
    }
}

/// Copy the device buffer into a fresh host buffer. Blocks until the launch
/// before it has finished.
pub fn copy_results<D: Driver>(driver: &mut D, source: DevicePtr) -> Result<Vec<u32>, HarnessError> {
    let mut host = vec![0u32; DATA_LENGTH];
    driver.memcpy_dtoh(&mut host, source).checked("cuMemcpyDtoH")?;
    debug!("copied {} elements back", host.len());
    Ok(host)
}

/// Check every element against its index and return the first failure.
pub fn verify(results: &[u32]) -> Result<(), Mismatch> {
    match results
        .iter()
        .enumerate()
        .find(|(index, actual)| **actual != expected(*index))
    {
        Some((index, &actual)) => Err(Mismatch { index, actual }),
        None => Ok(()),
    }
}
