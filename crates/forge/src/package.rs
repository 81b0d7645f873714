//! The `package` command: preflight, credentials, identity, config, build.

use crate::config_file;
use crate::msbuild::BuildInvoker;
use crate::preflight::{self, HostInfo};
use crate::sdk::SdkConfig;
use crate::values::ProjectValues;
use crate::ForgeError;
use common::{BuildLayout, PackageOptions, ToolHome};
use std::path::PathBuf;
use tracing::{info, warn};
use vault::{
    ensure_credential, get_or_create_guid, BuildIdentity, ProvisionRequest, SigningCredential,
    SigningToolchain,
};

/// Outcome of a successful packaging run.
#[derive(Debug, Clone)]
pub struct PackageReport {
    pub sdk: &'static SdkConfig,
    pub credential: SigningCredential,
    pub identity: BuildIdentity,
    pub values: ProjectValues,
    pub solution: PathBuf,
}

/// Packages `options.name` into `options.dest`.
///
/// Preflight failures abort before anything is written. The signing
/// credential is resolved before the GUID; the build runs last.
pub async fn package(
    host: &HostInfo,
    options: &PackageOptions,
    home: &ToolHome,
    signer: &dyn SigningToolchain,
    builder: &dyn BuildInvoker,
) -> Result<PackageReport, ForgeError> {
    let sdk = preflight::check(host, &options.sdk)?;
    let layout = BuildLayout::from_options(options);
    info!("Packaging {} into {}", options.name, layout.vsstudio_dir.display());

    let mut request = ProvisionRequest::new(layout.clone(), home.clone());
    request.user_pfx = options.pfx.clone();
    request.subject = options.publisher.clone();
    let credential = ensure_credential(&request, signer).await?;
    info!("Signing with {}", credential.path.display());

    let identity = get_or_create_guid(&layout.app_dir, &options.name).await?;
    let values = ProjectValues::new(options, &identity, home, &credential.path);

    config_file::merge_options(&layout.config_file(), options)?;

    let jsc_dir = home.jsc_dir(&options.sdk);
    if !jsc_dir.is_dir() {
        warn!(
            "JavaScriptCore library not found at {} (expected from {})",
            jsc_dir.display(),
            sdk.library_url()
        );
    }

    let solution = layout.solution_file();
    builder
        .build(&solution, &options.platform)
        .await
        .map_err(ForgeError::Build)?;

    Ok(PackageReport {
        sdk,
        credential,
        identity,
        values,
        solution,
    })
}
