// CLASSIFICATION: COMMUNITY
// Filename: status.rs v0.1
// Author: Lukas Bower
// Date Modified: 2026-10-19

//! Driver status codes and the check helper every driver call goes through.

use std::fmt;
use std::panic::Location;
use thiserror::Error;

/// Raw `CUresult` returned by a driver entry point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Status(pub i32);

impl Status {
    pub const SUCCESS: Status = Status(0);
    pub const INVALID_VALUE: Status = Status(1);
    pub const OUT_OF_MEMORY: Status = Status(2);
    pub const NOT_INITIALIZED: Status = Status(3);
    pub const NO_DEVICE: Status = Status(100);
    pub const INVALID_DEVICE: Status = Status(101);
    pub const INVALID_IMAGE: Status = Status(200);
    pub const INVALID_CONTEXT: Status = Status(201);
    pub const FILE_NOT_FOUND: Status = Status(301);
    pub const INVALID_HANDLE: Status = Status(400);
    pub const NOT_FOUND: Status = Status(500);
    pub const ILLEGAL_ADDRESS: Status = Status(700);
    pub const LAUNCH_FAILED: Status = Status(719);
    pub const UNKNOWN: Status = Status(999);

    pub fn code(self) -> i32 {
        self.0
    }

    pub fn is_success(self) -> bool {
        self == Self::SUCCESS
    }

    /// Symbolic driver name, if the code is one we know.
    pub fn name(self) -> Option<&'static str> {
        let name = match self.0 {
            0 => "CUDA_SUCCESS",
            1 => "CUDA_ERROR_INVALID_VALUE",
            2 => "CUDA_ERROR_OUT_OF_MEMORY",
            3 => "CUDA_ERROR_NOT_INITIALIZED",
            4 => "CUDA_ERROR_DEINITIALIZED",
            100 => "CUDA_ERROR_NO_DEVICE",
            101 => "CUDA_ERROR_INVALID_DEVICE",
            200 => "CUDA_ERROR_INVALID_IMAGE",
            201 => "CUDA_ERROR_INVALID_CONTEXT",
            209 => "CUDA_ERROR_NO_BINARY_FOR_GPU",
            218 => "CUDA_ERROR_INVALID_PTX",
            222 => "CUDA_ERROR_UNSUPPORTED_PTX_VERSION",
            301 => "CUDA_ERROR_FILE_NOT_FOUND",
            400 => "CUDA_ERROR_INVALID_HANDLE",
            500 => "CUDA_ERROR_NOT_FOUND",
            700 => "CUDA_ERROR_ILLEGAL_ADDRESS",
            701 => "CUDA_ERROR_LAUNCH_OUT_OF_RESOURCES",
            702 => "CUDA_ERROR_LAUNCH_TIMEOUT",
            719 => "CUDA_ERROR_LAUNCH_FAILED",
            999 => "CUDA_ERROR_UNKNOWN",
            _ => return None,
        };
        Some(name)
    }

    /// `Ok(())` for `CUDA_SUCCESS`, the status itself otherwise.
    pub fn into_result(self) -> Result<(), Status> {
        if self.is_success() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:x}", self.0)?;
        if let Some(name) = self.name() {
            write!(f, " ({name})")?;
        }
        Ok(())
    }
}

/// A failed driver call: which operation, what it returned, and where the
/// pipeline issued it.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("Operation \"{op}\" failed with error code {status}. ({}:{})", .location.file(), .location.line())]
pub struct DriverError {
    pub op: &'static str,
    pub status: Status,
    pub location: &'static Location<'static>,
}

impl DriverError {
    pub fn exit_code(&self) -> i32 {
        self.status.code()
    }
}

/// Check-or-abort: attach the operation name and call site to a driver
/// status so the failure can be reported and turned into an exit code.
pub trait Checked<T> {
    fn checked(self, op: &'static str) -> Result<T, DriverError>;
}

impl<T> Checked<T> for Result<T, Status> {
    #[track_caller]
    fn checked(self, op: &'static str) -> Result<T, DriverError> {
        let location = Location::caller();
        self.map_err(|status| {
            log::debug!("{op} returned {status}");
            DriverError {
                op,
                status,
                location,
            }
        })
    }
}
