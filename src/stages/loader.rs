// CLASSIFICATION: COMMUNITY
// Filename: loader.rs v0.1
// Author: Lukas Bower
// Date Modified: 2026-10-19

//! Binary module loading.

use crate::driver::{Checked, Driver, ModuleImage};
use crate::error::HarnessError;
use crate::geometry::KERNEL_NAME;
use log::debug;
use std::fs;
use std::path::Path;

/// Loaded module and its entry point. The module is never unloaded
/// explicitly; it goes away with the context.
#[derive(Debug)]
pub struct LoadedKernel<M, F> {
    pub module: M,
    pub function: F,
}

/// Read the whole file into memory. The contents are not interpreted.
pub fn read_image(path: &Path) -> Result<ModuleImage, HarnessError> {
    let bytes = fs::read(path).map_err(|source| HarnessError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    debug!("read {} bytes from {}", bytes.len(), path.display());
    Ok(ModuleImage::new(bytes))
}

/// Load the image at `path` into the current context and resolve the kernel.
pub fn load_kernel<D: Driver>(
    driver: &mut D,
    path: &Path,
) -> Result<LoadedKernel<D::Module, D::Function>, HarnessError> {
    let image = read_image(path)?;
    let module = driver.module_load_data(&image).checked("cuModuleLoadData")?;
    // The driver keeps its own copy of the image.
    drop(image);
    let function = driver
        .module_get_function(&module, KERNEL_NAME)
        .checked("cuModuleGetFunction")?;
    debug!("resolved entry point {KERNEL_NAME}");
    Ok(LoadedKernel { module, function })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::mock::{MockDriver, Op};
    use crate::stages::init;
    use crate::stages::test_support::{blob_file, fatbin_file};

    fn ready_driver() -> MockDriver {
        let mut drv = MockDriver::new();
        init::start_driver(&mut drv).unwrap();
        init::create_context(&mut drv).unwrap();
        drv
    }

    #[test]
    fn image_is_read_verbatim() {
        let file = blob_file(&[1, 0, 2, 0, 3]);
        let image = read_image(file.path()).unwrap();
        assert_eq!(image.bytes(), &[1, 0, 2, 0, 3]);
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_image(&dir.path().join("absent.fatbin")).unwrap_err();
        assert!(matches!(err, HarnessError::Io { .. }));
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn resolves_kernel() {
        let file = fatbin_file();
        let mut drv = ready_driver();
        load_kernel(&mut drv, file.path()).unwrap();
        assert_eq!(&drv.calls()[3..], &[Op::ModuleLoadData, Op::ModuleGetFunction]);
    }

    #[test]
    fn invalid_image_reports_load_code() {
        let file = blob_file(b"definitely not device code");
        let mut drv = ready_driver();
        let err = load_kernel(&mut drv, file.path()).unwrap_err();
        assert_eq!(err.exit_code(), 200);
        assert_eq!(drv.calls().last(), Some(&Op::ModuleLoadData));
    }

    #[test]
    fn missing_symbol_reports_not_found() {
        let file = fatbin_file();
        let mut drv = MockDriver::new().with_exports(["other_kernel"]);
        init::start_driver(&mut drv).unwrap();
        init::create_context(&mut drv).unwrap();
        let err = load_kernel(&mut drv, file.path()).unwrap_err();
        assert_eq!(err.exit_code(), 500);
    }
}
