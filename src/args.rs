// CLASSIFICATION: COMMUNITY
// Filename: args.rs v0.1
// Author: Lukas Bower
// Date Modified: 2026-10-19

use crate::error::HarnessError;
use clap::Parser;
use std::ffi::OsString;
use std::path::PathBuf;

/// Command line of `driver_apis`: exactly one module path.
#[derive(Debug, Parser)]
#[command(
    name = "driver_apis",
    about = "Load a device binary through the driver API, run its kernel and verify the output",
    disable_help_flag = true,
    disable_version_flag = true
)]
pub struct Args {
    /// Precompiled device binary (fatbin) exporting `kernel`. Taken verbatim,
    /// even when it starts with `-`.
    #[arg(value_name = "MODULE", allow_hyphen_values = true)]
    pub module: PathBuf,
}

impl Args {
    /// Parse `argv`, program name first. Never exits the process.
    pub fn from_argv<I, T>(argv: I) -> Result<Self, HarnessError>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        Ok(<Self as Parser>::try_parse_from(argv)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_path() {
        let args = Args::from_argv(["driver_apis", "kernel.fatbin"]).unwrap();
        assert_eq!(args.module, PathBuf::from("kernel.fatbin"));
    }

    #[test]
    fn no_path_is_usage_error() {
        let err = Args::from_argv(["driver_apis"]).unwrap_err();
        assert!(matches!(err, HarnessError::Usage(_)));
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn two_paths_is_usage_error() {
        let err = Args::from_argv(["driver_apis", "a.fatbin", "b.fatbin"]).unwrap_err();
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn leading_dash_is_a_path() {
        let args = Args::from_argv(["driver_apis", "-k.fatbin"]).unwrap();
        assert_eq!(args.module, PathBuf::from("-k.fatbin"));
        let args = Args::from_argv(["driver_apis", "--help"]).unwrap();
        assert_eq!(args.module, PathBuf::from("--help"));
    }

    #[test]
    fn usage_errors_go_to_stderr() {
        let err = Args::from_argv(["driver_apis"]).unwrap_err();
        let HarnessError::Usage(inner) = &err else {
            panic!("expected usage error, got {err}");
        };
        assert!(inner.use_stderr());
        assert_eq!(err.exit_code(), 1);
    }
}
