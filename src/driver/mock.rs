// CLASSIFICATION: COMMUNITY
// Filename: mock.rs v0.1
// Author: Lukas Bower
// Date Modified: 2026-10-19

//! Host-side driver that honours the same contract as the native backend.
//!
//! The mock enforces call preconditions with the status codes the real driver
//! returns, runs the fixture kernel on the host (every thread writes its global
//! linear index), and supports fault injection so each failure path of the
//! pipeline can be driven from tests.

use super::{Device, DevicePtr, Driver, ModuleImage, Status};
use crate::geometry::{LaunchGrid, DEVICE_ORDINAL, KERNEL_NAME};
use log::trace;
use std::collections::HashMap;

/// Leading bytes of a fatbin container (`0xBA55ED50`, little endian).
pub const FATBIN_MAGIC: [u8; 4] = [0x50, 0xed, 0x55, 0xba];
/// Leading bytes of a cubin.
pub const ELF_MAGIC: [u8; 4] = [0x7f, b'E', b'L', b'F'];

/// Fill pattern of freshly allocated device memory.
pub const UNINITIALIZED_WORD: u32 = 0xffff_ffff;

const DEVICE_BASE: u64 = 0x7f00_0000_0000;

/// Driver entry points, used to record calls and target injected faults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    Init,
    DeviceGet,
    CtxCreate,
    ModuleLoadData,
    ModuleGetFunction,
    MemAlloc,
    LaunchKernel,
    MemcpyDtoH,
    MemFree,
    CtxDestroy,
}

impl Op {
    pub const ALL: [Op; 10] = [
        Op::Init,
        Op::DeviceGet,
        Op::CtxCreate,
        Op::ModuleLoadData,
        Op::ModuleGetFunction,
        Op::MemAlloc,
        Op::LaunchKernel,
        Op::MemcpyDtoH,
        Op::MemFree,
        Op::CtxDestroy,
    ];
}

#[derive(Debug)]
pub struct MockContext(u32);

#[derive(Debug)]
pub struct MockModule {
    context: u32,
    exports: Vec<String>,
}

#[derive(Debug)]
pub struct MockFunction {
    context: u32,
    name: String,
}

#[derive(Debug)]
pub struct MockDriver {
    initialized: bool,
    context: Option<u32>,
    contexts_created: u32,
    next_ptr: u64,
    allocations: HashMap<u64, Vec<u32>>,
    exports: Vec<String>,
    failures: HashMap<Op, Status>,
    corruption: Option<(usize, u32)>,
    calls: Vec<Op>,
    launches: Vec<LaunchGrid>,
}

impl Default for MockDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl MockDriver {
    /// A healthy device whose modules export the fixture kernel.
    pub fn new() -> Self {
        Self {
            initialized: false,
            context: None,
            contexts_created: 0,
            next_ptr: DEVICE_BASE,
            allocations: HashMap::new(),
            exports: vec![KERNEL_NAME.to_owned()],
            failures: HashMap::new(),
            corruption: None,
            calls: Vec::new(),
            launches: Vec::new(),
        }
    }

    /// Replace the function names every loaded module exports.
    pub fn with_exports<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exports = names.into_iter().map(Into::into).collect();
        self
    }

    /// Make `op` fail with `status` every time it is called.
    pub fn fail(mut self, op: Op, status: Status) -> Self {
        self.failures.insert(op, status);
        self
    }

    /// After each launch, overwrite element `index` of the output with `value`.
    pub fn corrupt(mut self, index: usize, value: u32) -> Self {
        self.corruption = Some((index, value));
        self
    }

    /// Every entry point invoked so far, in order.
    pub fn calls(&self) -> &[Op] {
        &self.calls
    }

    pub fn launches(&self) -> &[LaunchGrid] {
        &self.launches
    }

    pub fn live_allocations(&self) -> usize {
        self.allocations.len()
    }

    pub fn has_context(&self) -> bool {
        self.context.is_some()
    }

    fn enter(&mut self, op: Op) -> Result<(), Status> {
        trace!("mock driver call {op:?}");
        self.calls.push(op);
        if let Some(status) = self.failures.get(&op) {
            return Err(*status);
        }
        if op != Op::Init && !self.initialized {
            return Err(Status::NOT_INITIALIZED);
        }
        Ok(())
    }

    fn current_context(&self) -> Result<u32, Status> {
        self.context.ok_or(Status::INVALID_CONTEXT)
    }

    fn looks_loadable(image: &[u8]) -> bool {
        image.starts_with(&FATBIN_MAGIC)
            || image.starts_with(&ELF_MAGIC)
            || image.windows(b".version".len()).any(|w| w == b".version")
    }
}

impl Driver for MockDriver {
    type Context = MockContext;
    type Module = MockModule;
    type Function = MockFunction;

    fn init(&mut self, flags: u32) -> Result<(), Status> {
        self.enter(Op::Init)?;
        if flags != 0 {
            return Err(Status::INVALID_VALUE);
        }
        self.initialized = true;
        Ok(())
    }

    fn device_get(&mut self, ordinal: i32) -> Result<Device, Status> {
        self.enter(Op::DeviceGet)?;
        if ordinal != DEVICE_ORDINAL {
            return Err(Status::INVALID_DEVICE);
        }
        Ok(Device(ordinal))
    }

    fn ctx_create(&mut self, _flags: u32, device: Device) -> Result<MockContext, Status> {
        self.enter(Op::CtxCreate)?;
        if device.0 != DEVICE_ORDINAL {
            return Err(Status::INVALID_DEVICE);
        }
        self.contexts_created += 1;
        let id = self.contexts_created;
        self.context = Some(id);
        Ok(MockContext(id))
    }

    fn module_load_data(&mut self, image: &ModuleImage) -> Result<MockModule, Status> {
        self.enter(Op::ModuleLoadData)?;
        let context = self.current_context()?;
        if !Self::looks_loadable(image.bytes()) {
            return Err(Status::INVALID_IMAGE);
        }
        Ok(MockModule {
            context,
            exports: self.exports.clone(),
        })
    }

    fn module_get_function(&mut self, module: &MockModule, name: &str) -> Result<MockFunction, Status> {
        self.enter(Op::ModuleGetFunction)?;
        if self.current_context()? != module.context {
            return Err(Status::INVALID_HANDLE);
        }
        if !module.exports.iter().any(|export| export == name) {
            return Err(Status::NOT_FOUND);
        }
        Ok(MockFunction {
            context: module.context,
            name: name.to_owned(),
        })
    }

    fn mem_alloc(&mut self, bytes: usize) -> Result<DevicePtr, Status> {
        self.enter(Op::MemAlloc)?;
        self.current_context()?;
        if bytes == 0 || bytes % std::mem::size_of::<u32>() != 0 {
            return Err(Status::INVALID_VALUE);
        }
        let address = self.next_ptr;
        self.next_ptr += bytes as u64;
        let words = bytes / std::mem::size_of::<u32>();
        self.allocations.insert(address, vec![UNINITIALIZED_WORD; words]);
        Ok(DevicePtr(address))
    }

    fn launch_kernel(
        &mut self,
        function: &MockFunction,
        launch: LaunchGrid,
        params: &[DevicePtr],
    ) -> Result<(), Status> {
        self.enter(Op::LaunchKernel)?;
        if self.current_context()? != function.context {
            return Err(Status::INVALID_HANDLE);
        }
        let [output] = params else {
            return Err(Status::INVALID_VALUE);
        };
        let buffer = self
            .allocations
            .get_mut(&output.0)
            .ok_or(Status::INVALID_VALUE)?;
        trace!("running {} on {} threads", function.name, launch.thread_count());
        let threads_per_block = launch.block.volume();
        for block in 0..launch.grid.volume() {
            for thread in 0..threads_per_block {
                let index = block * threads_per_block + thread;
                let slot = buffer.get_mut(index).ok_or(Status::ILLEGAL_ADDRESS)?;
                *slot = index as u32;
            }
        }
        if let Some((index, value)) = self.corruption {
            if let Some(slot) = buffer.get_mut(index) {
                *slot = value;
            }
        }
        self.launches.push(launch);
        Ok(())
    }

    fn memcpy_dtoh(&mut self, dst: &mut [u32], src: DevicePtr) -> Result<(), Status> {
        self.enter(Op::MemcpyDtoH)?;
        self.current_context()?;
        let buffer = self.allocations.get(&src.0).ok_or(Status::INVALID_VALUE)?;
        if dst.len() > buffer.len() {
            return Err(Status::INVALID_VALUE);
        }
        dst.copy_from_slice(&buffer[..dst.len()]);
        Ok(())
    }

    fn mem_free(&mut self, dptr: DevicePtr) -> Result<(), Status> {
        self.enter(Op::MemFree)?;
        self.current_context()?;
        self.allocations
            .remove(&dptr.0)
            .map(|_| ())
            .ok_or(Status::INVALID_VALUE)
    }

    fn ctx_destroy(&mut self, context: MockContext) -> Result<(), Status> {
        self.enter(Op::CtxDestroy)?;
        if self.context != Some(context.0) {
            return Err(Status::INVALID_CONTEXT);
        }
        self.context = None;
        self.allocations.clear();
        Ok(())
    }
}
