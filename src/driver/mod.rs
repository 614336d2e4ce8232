// CLASSIFICATION: COMMUNITY
// Filename: mod.rs v0.1
// Author: Lukas Bower
// Date Modified: 2026-10-19

//! Seam between the pipeline and the compute driver.
//!
//! The pipeline only ever talks to a [`Driver`]. [`libcuda::LibCuda`] binds the
//! vendor driver library at runtime; [`mock::MockDriver`] reproduces the same
//! contract on the host so the pipeline can be exercised without a GPU.

pub mod libcuda;
pub mod mock;
mod status;

pub use status::{Checked, DriverError, Status};

use crate::geometry::LaunchGrid;

/// Device ordinal as handed out by `cuDeviceGet`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Device(pub i32);

/// Device-addressable memory (`CUdeviceptr`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DevicePtr(pub u64);

/// Raw module blob as read from disk.
///
/// The bytes are handed to the driver verbatim. A NUL is kept after the last
/// byte because `cuModuleLoadData` also accepts NUL-terminated PTX text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleImage {
    bytes: Vec<u8>,
}

impl ModuleImage {
    pub fn new(mut bytes: Vec<u8>) -> Self {
        bytes.push(0);
        Self { bytes }
    }

    /// Image contents without the terminator.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes[..self.bytes.len() - 1]
    }

    /// Image contents including the terminator.
    pub fn as_bytes_with_nul(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// The driver entry points the pipeline uses, in call order.
///
/// Methods mirror the driver API one-to-one and return the raw [`Status`] on
/// failure; callers attach context with [`Checked::checked`].
pub trait Driver {
    type Context;
    type Module;
    type Function;

    /// `cuInit`
    fn init(&mut self, flags: u32) -> Result<(), Status>;
    /// `cuDeviceGet`
    fn device_get(&mut self, ordinal: i32) -> Result<Device, Status>;
    /// `cuCtxCreate`
    fn ctx_create(&mut self, flags: u32, device: Device) -> Result<Self::Context, Status>;
    /// `cuModuleLoadData`
    fn module_load_data(&mut self, image: &ModuleImage) -> Result<Self::Module, Status>;
    /// `cuModuleGetFunction`
    fn module_get_function(
        &mut self,
        module: &Self::Module,
        name: &str,
    ) -> Result<Self::Function, Status>;
    /// `cuMemAlloc`
    fn mem_alloc(&mut self, bytes: usize) -> Result<DevicePtr, Status>;
    /// `cuLaunchKernel` on the default stream; `params` are passed by value.
    fn launch_kernel(
        &mut self,
        function: &Self::Function,
        launch: LaunchGrid,
        params: &[DevicePtr],
    ) -> Result<(), Status>;
    /// `cuMemcpyDtoH`; copies `dst.len()` elements. Blocks until preceding
    /// work on the default stream has completed.
    fn memcpy_dtoh(&mut self, dst: &mut [u32], src: DevicePtr) -> Result<(), Status>;
    /// `cuMemFree`
    fn mem_free(&mut self, ptr: DevicePtr) -> Result<(), Status>;
    /// `cuCtxDestroy`
    fn ctx_destroy(&mut self, context: Self::Context) -> Result<(), Status>;
}
