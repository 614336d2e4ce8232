// CLASSIFICATION: COMMUNITY
// Filename: geometry.rs v0.1
// Author: Lukas Bower
// Date Modified: 2026-10-19

//! Launch geometry shared by the allocator, the launcher and the validator.
//!
//! Buffer length and grid size are both derived from the two log2 constants
//! below, so every element of the output buffer is owned by exactly one
//! device thread.

use std::mem::size_of;

/// log2 of the number of threads in one block.
pub const LOG_THREADS_PER_BLOCK: u32 = 5;
/// log2 of the number of `u32` elements in the output buffer.
pub const LOG_DATA_LENGTH: u32 = 7;

pub const THREADS_PER_BLOCK: u32 = 1 << LOG_THREADS_PER_BLOCK;
pub const DATA_LENGTH: usize = 1 << LOG_DATA_LENGTH;
pub const BLOCKS: u32 = 1 << (LOG_DATA_LENGTH - LOG_THREADS_PER_BLOCK);
/// Size of the device and host result buffers in bytes.
pub const BUFFER_BYTES: usize = size_of::<u32>() << LOG_DATA_LENGTH;

/// Only device 0 is ever used.
pub const DEVICE_ORDINAL: i32 = 0;
/// Entry point compiled into the fatbin.
pub const KERNEL_NAME: &str = "kernel";

/// Grid or block extent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dim3 {
    pub x: u32,
    pub y: u32,
    pub z: u32,
}

impl Dim3 {
    /// One-dimensional extent; `y` and `z` are fixed at 1.
    pub const fn linear(x: u32) -> Self {
        Self { x, y: 1, z: 1 }
    }

    pub const fn volume(&self) -> usize {
        self.x as usize * self.y as usize * self.z as usize
    }
}

/// Grid and block dimensions for one kernel launch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LaunchGrid {
    pub grid: Dim3,
    pub block: Dim3,
}

impl LaunchGrid {
    /// Grid covering the whole result buffer.
    pub const fn for_results() -> Self {
        Self {
            grid: Dim3::linear(BLOCKS),
            block: Dim3::linear(THREADS_PER_BLOCK),
        }
    }

    pub const fn thread_count(&self) -> usize {
        self.grid.volume() * self.block.volume()
    }
}

const _: () = assert!(LaunchGrid::for_results().thread_count() == DATA_LENGTH);
const _: () = assert!(BUFFER_BYTES == DATA_LENGTH * size_of::<u32>());

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derived_constants() {
        assert_eq!(THREADS_PER_BLOCK, 32);
        assert_eq!(DATA_LENGTH, 128);
        assert_eq!(BLOCKS, 4);
        assert_eq!(BUFFER_BYTES, 512);
    }

    #[test]
    fn grid_is_one_dimensional() {
        let launch = LaunchGrid::for_results();
        assert_eq!(launch.grid, Dim3 { x: 4, y: 1, z: 1 });
        assert_eq!(launch.block, Dim3 { x: 32, y: 1, z: 1 });
        assert_eq!(launch.thread_count(), DATA_LENGTH);
    }
}
