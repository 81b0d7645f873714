//! # The Forge: Windows Packaging
//!
//! Drives one packaging run from validated options to a native build:
//!
//! 1. [`preflight`] gates on platform, OS version, Visual Studio and SDK.
//! 2. `vault` resolves the signing credential and application GUID.
//! 3. [`values`] collects the project template substitutions.
//! 4. [`config_file`] merges the options into `config.json`.
//! 5. [`msbuild`] hands the solution to MSBuild.
//!
//! [`package::package`] runs the steps in that order and stops at the first
//! failure.

pub mod config_file;
pub mod msbuild;
pub mod package;
pub mod preflight;
pub mod sdk;
pub mod values;

pub use msbuild::{BuildInvoker, MsBuild};
pub use package::{package, PackageReport};
pub use preflight::{HostInfo, PreflightError};
pub use sdk::SdkConfig;
pub use values::ProjectValues;

use common::process::ProcessError;
use vault::VaultError;

/// Errors from a packaging run.
#[derive(Debug, thiserror::Error)]
pub enum ForgeError {
    #[error(transparent)]
    Preflight(#[from] PreflightError),
    #[error(transparent)]
    Vault(#[from] VaultError),
    #[error("msbuild failed: {0}")]
    Build(ProcessError),
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
