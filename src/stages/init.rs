// CLASSIFICATION: COMMUNITY
// Filename: init.rs v0.1
// Author: Lukas Bower
// Date Modified: 2026-10-19

//! Device and context initialization.

use crate::driver::{Checked, Device, Driver};
use crate::error::HarnessError;
use crate::geometry::DEVICE_ORDINAL;
use log::debug;

/// `cuInit` takes no flags.
const INIT_FLAGS: u32 = 0;
/// Default scheduling, no host mapping.
const CONTEXT_FLAGS: u32 = 0;

/// A context bound to the selected device. Owns every resource created after
/// it; destroyed once on the success path.
#[derive(Debug)]
pub struct ActiveContext<C> {
    pub device: Device,
    pub context: C,
}

/// Bring the driver up.
pub fn start_driver<D: Driver>(driver: &mut D) -> Result<(), HarnessError> {
    driver.init(INIT_FLAGS).checked("cuInit")?;
    debug!("driver initialized");
    Ok(())
}

/// Select device 0 and create a context on it.
pub fn create_context<D: Driver>(driver: &mut D) -> Result<ActiveContext<D::Context>, HarnessError> {
    let device = driver.device_get(DEVICE_ORDINAL).checked("cuDeviceGet")?;
    let context = driver.ctx_create(CONTEXT_FLAGS, device).checked("cuCtxCreate")?;
    debug!("context created on device {}", device.0);
    Ok(ActiveContext { device, context })
}

pub fn destroy_context<D: Driver>(
    driver: &mut D,
    active: ActiveContext<D::Context>,
) -> Result<(), HarnessError> {
    driver.ctx_destroy(active.context).checked("cuCtxDestroy")?;
    debug!("context on device {} destroyed", active.device.0);
    Ok(())
}
