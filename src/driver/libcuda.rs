// CLASSIFICATION: COMMUNITY
// Filename: libcuda.rs v0.1
// Author: Lukas Bower
// Date Modified: 2026-10-19

//! Native backend: the vendor driver library bound at runtime with
//! `libloading`, so the crate builds on hosts without a CUDA toolkit.

use super::{Device, DevicePtr, Driver, ModuleImage, Status};
use crate::geometry::LaunchGrid;
use libloading::{Library, Symbol};
use log::{debug, trace};
use std::ffi::{c_char, c_int, c_uint, c_void, CString};
use std::{mem, ptr};
use thiserror::Error;

type CUresult = c_int;
type CUdevice = c_int;
type CUcontext = *mut c_void;
type CUmodule = *mut c_void;
type CUfunction = *mut c_void;
type CUstream = *mut c_void;
type CUdeviceptr = u64;

type FnCuInit = unsafe extern "C" fn(flags: c_uint) -> CUresult;
type FnCuDeviceGet = unsafe extern "C" fn(device: *mut CUdevice, ordinal: c_int) -> CUresult;
type FnCuCtxCreate =
    unsafe extern "C" fn(pctx: *mut CUcontext, flags: c_uint, dev: CUdevice) -> CUresult;
type FnCuModuleLoadData =
    unsafe extern "C" fn(module: *mut CUmodule, image: *const c_void) -> CUresult;
type FnCuModuleGetFunction =
    unsafe extern "C" fn(hfunc: *mut CUfunction, hmod: CUmodule, name: *const c_char) -> CUresult;
type FnCuMemAlloc = unsafe extern "C" fn(dptr: *mut CUdeviceptr, bytesize: usize) -> CUresult;
type FnCuLaunchKernel = unsafe extern "C" fn(
    f: CUfunction,
    grid_dim_x: c_uint,
    grid_dim_y: c_uint,
    grid_dim_z: c_uint,
    block_dim_x: c_uint,
    block_dim_y: c_uint,
    block_dim_z: c_uint,
    shared_mem_bytes: c_uint,
    hstream: CUstream,
    kernel_params: *mut *mut c_void,
    extra: *mut *mut c_void,
) -> CUresult;
type FnCuMemcpyDtoH =
    unsafe extern "C" fn(dst: *mut c_void, src: CUdeviceptr, byte_count: usize) -> CUresult;
type FnCuMemFree = unsafe extern "C" fn(dptr: CUdeviceptr) -> CUresult;
type FnCuCtxDestroy = unsafe extern "C" fn(ctx: CUcontext) -> CUresult;

#[cfg(windows)]
const LIBRARY_CANDIDATES: &[&str] = &["nvcuda.dll"];
#[cfg(not(windows))]
const LIBRARY_CANDIDATES: &[&str] = &["libcuda.so.1", "libcuda.so"];

/// Every symbol this backend is allowed to resolve.
pub static DRIVER_SYMBOLS: &[&str] = &[
    "cuInit",
    "cuDeviceGet",
    "cuCtxCreate_v2",
    "cuModuleLoadData",
    "cuModuleGetFunction",
    "cuMemAlloc_v2",
    "cuLaunchKernel",
    "cuMemcpyDtoH_v2",
    "cuMemFree_v2",
    "cuCtxDestroy_v2",
];

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("driver library not found (tried {tried}): {source}")]
    Library {
        tried: String,
        #[source]
        source: libloading::Error,
    },
    #[error("driver library has no symbol {symbol}: {source}")]
    Symbol {
        symbol: &'static str,
        #[source]
        source: libloading::Error,
    },
    #[error("symbol {0} is not in the driver allowlist")]
    NotAllowed(&'static str),
}

pub struct CuContext(CUcontext);
pub struct CuModule(CUmodule);
pub struct CuFunction(CUfunction);

/// Resolved driver entry points. The function pointers are only valid while
/// `_lib` stays loaded.
pub struct LibCuda {
    _lib: Library,
    cu_init: FnCuInit,
    cu_device_get: FnCuDeviceGet,
    cu_ctx_create: FnCuCtxCreate,
    cu_module_load_data: FnCuModuleLoadData,
    cu_module_get_function: FnCuModuleGetFunction,
    cu_mem_alloc: FnCuMemAlloc,
    cu_launch_kernel: FnCuLaunchKernel,
    cu_memcpy_dtoh: FnCuMemcpyDtoH,
    cu_mem_free: FnCuMemFree,
    cu_ctx_destroy: FnCuCtxDestroy,
}

impl LibCuda {
    /// Load the driver library and resolve the allowlisted symbols. No driver
    /// call is issued.
    pub fn open() -> Result<Self, LoadError> {
        let mut attempt = unsafe { Library::new(LIBRARY_CANDIDATES[0]) };
        for name in &LIBRARY_CANDIDATES[1..] {
            if attempt.is_ok() {
                break;
            }
            trace!("retrying driver library as {name}");
            attempt = unsafe { Library::new(name) };
        }
        let lib = attempt.map_err(|source| LoadError::Library {
            tried: LIBRARY_CANDIDATES.join(", "),
            source,
        })?;
        debug!("driver library loaded");

        unsafe {
            Ok(Self {
                cu_init: symbol(&lib, "cuInit")?,
                cu_device_get: symbol(&lib, "cuDeviceGet")?,
                cu_ctx_create: symbol(&lib, "cuCtxCreate_v2")?,
                cu_module_load_data: symbol(&lib, "cuModuleLoadData")?,
                cu_module_get_function: symbol(&lib, "cuModuleGetFunction")?,
                cu_mem_alloc: symbol(&lib, "cuMemAlloc_v2")?,
                cu_launch_kernel: symbol(&lib, "cuLaunchKernel")?,
                cu_memcpy_dtoh: symbol(&lib, "cuMemcpyDtoH_v2")?,
                cu_mem_free: symbol(&lib, "cuMemFree_v2")?,
                cu_ctx_destroy: symbol(&lib, "cuCtxDestroy_v2")?,
                _lib: lib,
            })
        }
    }
}

/// Resolve one allowlisted symbol as a function pointer.
///
/// # Safety
/// `T` must match the C signature of `name`.
unsafe fn symbol<T: Copy>(lib: &Library, name: &'static str) -> Result<T, LoadError> {
    if !DRIVER_SYMBOLS.contains(&name) {
        return Err(LoadError::NotAllowed(name));
    }
    let sym: Symbol<T> = lib
        .get(name.as_bytes())
        .map_err(|source| LoadError::Symbol { symbol: name, source })?;
    Ok(*sym)
}

impl Driver for LibCuda {
    type Context = CuContext;
    type Module = CuModule;
    type Function = CuFunction;

    fn init(&mut self, flags: u32) -> Result<(), Status> {
        Status(unsafe { (self.cu_init)(flags) }).into_result()
    }

    fn device_get(&mut self, ordinal: i32) -> Result<Device, Status> {
        let mut device: CUdevice = 0;
        Status(unsafe { (self.cu_device_get)(&mut device, ordinal) }).into_result()?;
        Ok(Device(device))
    }

    fn ctx_create(&mut self, flags: u32, device: Device) -> Result<CuContext, Status> {
        let mut context: CUcontext = ptr::null_mut();
        Status(unsafe { (self.cu_ctx_create)(&mut context, flags, device.0) }).into_result()?;
        Ok(CuContext(context))
    }

    fn module_load_data(&mut self, image: &ModuleImage) -> Result<CuModule, Status> {
        let mut module: CUmodule = ptr::null_mut();
        let data = image.as_bytes_with_nul().as_ptr().cast::<c_void>();
        Status(unsafe { (self.cu_module_load_data)(&mut module, data) }).into_result()?;
        Ok(CuModule(module))
    }

    fn module_get_function(&mut self, module: &CuModule, name: &str) -> Result<CuFunction, Status> {
        let name = CString::new(name).map_err(|_| Status::INVALID_VALUE)?;
        let mut function: CUfunction = ptr::null_mut();
        Status(unsafe { (self.cu_module_get_function)(&mut function, module.0, name.as_ptr()) })
            .into_result()?;
        Ok(CuFunction(function))
    }

    fn mem_alloc(&mut self, bytes: usize) -> Result<DevicePtr, Status> {
        let mut dptr: CUdeviceptr = 0;
        Status(unsafe { (self.cu_mem_alloc)(&mut dptr, bytes) }).into_result()?;
        Ok(DevicePtr(dptr))
    }

    fn launch_kernel(
        &mut self,
        function: &CuFunction,
        launch: LaunchGrid,
        params: &[DevicePtr],
    ) -> Result<(), Status> {
        // The driver reads each parameter through a pointer to its value.
        let mut values: Vec<CUdeviceptr> = params.iter().map(|p| p.0).collect();
        let mut args: Vec<*mut c_void> = values
            .iter_mut()
            .map(|v| (v as *mut CUdeviceptr).cast::<c_void>())
            .collect();
        let (grid, block) = (launch.grid, launch.block);
        Status(unsafe {
            (self.cu_launch_kernel)(
                function.0,
                grid.x,
                grid.y,
                grid.z,
                block.x,
                block.y,
                block.z,
                0,
                ptr::null_mut(),
                args.as_mut_ptr(),
                ptr::null_mut(),
            )
        })
        .into_result()
    }

    fn memcpy_dtoh(&mut self, dst: &mut [u32], src: DevicePtr) -> Result<(), Status> {
        let bytes = mem::size_of_val(dst);
        Status(unsafe { (self.cu_memcpy_dtoh)(dst.as_mut_ptr().cast::<c_void>(), src.0, bytes) })
            .into_result()
    }

    fn mem_free(&mut self, dptr: DevicePtr) -> Result<(), Status> {
        Status(unsafe { (self.cu_mem_free)(dptr.0) }).into_result()
    }

    fn ctx_destroy(&mut self, context: CuContext) -> Result<(), Status> {
        Status(unsafe { (self.cu_ctx_destroy)(context.0) }).into_result()
    }
}
