// CLASSIFICATION: COMMUNITY
// Filename: mod.rs v0.1
// Author: Lukas Bower
// Date Modified: 2026-10-19

//! The five pipeline stages, each a function over a [`crate::driver::Driver`].

pub mod init;
pub mod launch;
pub mod loader;
pub mod memory;
pub mod validate;

#[cfg(test)]
pub(crate) mod test_support {
    use crate::driver::mock::FATBIN_MAGIC;
    use std::io::Write;
    use tempfile::NamedTempFile;

    /// Temporary file holding a blob the mock driver accepts as a fatbin.
    pub fn fatbin_file() -> NamedTempFile {
        blob_file(&[&FATBIN_MAGIC[..], &[0u8; 60][..]].concat())
    }

    pub fn blob_file(bytes: &[u8]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(bytes).unwrap();
        file.flush().unwrap();
        file
    }
}
