//! Certificate provisioning state machine.
//!
//! ```text
//!  UserPfxSupplied ──────────────────────────────────────────┐
//!                                                            v
//!  CheckLocalCache ──hit──────────────────────────────────> Done
//!        │ miss                                              ^
//!        v                                                   │
//!  CheckGlobalCache ──hit (copy into app dir)────────────────┘
//!        │ miss
//!        v
//!  Generate (makecert, pvk2pfx, copy to global cache) ──> CheckLocalCache
//! ```
//!
//! `Done` is only reached from a fresh read of the credential file, never
//! from the exit status of the generation step. The local-cache check may be
//! entered at most [`MAX_GENERATION_ATTEMPTS`] times.

use crate::toolchain::{CertPolicy, MakeCertRequest, PfxRequest, SigningToolchain};
use crate::VaultError;
use common::{is_nonempty_file, BuildLayout, ToolHome};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info, warn};

/// Upper bound on `CheckLocalCache → Generate` cycles.
pub const MAX_GENERATION_ATTEMPTS: u32 = 3;

/// Where the resolved credential came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialSource {
    /// Supplied explicitly by the user.
    UserProvided,
    /// Reused from the per-application or the shared user-scoped cache.
    CachedTest,
    /// Generated by the signing toolchain during this call.
    FreshlyGenerated,
}

/// A signing credential resolved for one build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SigningCredential {
    pub path: PathBuf,
    pub source: CredentialSource,
}

impl SigningCredential {
    /// `true` iff the backing file exists and is non-empty.
    pub fn is_valid(&self) -> bool {
        is_nonempty_file(&self.path)
    }
}

/// Inputs of [`ensure_credential`].
#[derive(Debug, Clone)]
pub struct ProvisionRequest {
    pub layout: BuildLayout,
    pub home: ToolHome,
    /// Explicit credential; skips the caches and generation entirely.
    pub user_pfx: Option<PathBuf>,
    /// Subject common name for generated certificates.
    pub subject: Option<String>,
    pub policy: CertPolicy,
}

impl ProvisionRequest {
    pub fn new(layout: BuildLayout, home: ToolHome) -> Self {
        Self {
            layout,
            home,
            user_pfx: None,
            subject: None,
            policy: CertPolicy::default(),
        }
    }
}

#[derive(Debug)]
enum State {
    UserPfxSupplied(PathBuf),
    CheckLocalCache,
    CheckGlobalCache,
    Generate,
    Done(SigningCredential),
}

/// Resolves a valid signing credential for the build described by `request`.
///
/// # Errors
/// - `VaultError::Config` if an explicit credential path is missing or empty.
/// - `VaultError::ExternalTool` if `makecert` or `pvk2pfx` fails.
/// - `VaultError::ProvisioningExhausted` if the toolchain keeps reporting
///   success without producing a usable file.
/// - `VaultError::IoError` on file-system failures.
pub async fn ensure_credential(
    request: &ProvisionRequest,
    toolchain: &dyn SigningToolchain,
) -> Result<SigningCredential, VaultError> {
    let local_pfx = request.layout.pfx_file();
    let global_pfx = request.home.global_test_pfx();

    let mut state = match &request.user_pfx {
        Some(path) => State::UserPfxSupplied(path.clone()),
        None => State::CheckLocalCache,
    };
    let mut attempts = 0u32;
    let mut generated = false;

    loop {
        debug!("provisioning state: {:?}", state);
        state = match state {
            State::UserPfxSupplied(supplied) => adopt_user_pfx(&supplied, &request.layout).await?,

            State::CheckLocalCache => {
                if attempts >= MAX_GENERATION_ATTEMPTS {
                    return Err(VaultError::ProvisioningExhausted { attempts });
                }
                attempts += 1;

                if is_nonempty_file(&local_pfx) {
                    debug!("using {}", local_pfx.display());
                    let source = if generated {
                        CredentialSource::FreshlyGenerated
                    } else {
                        CredentialSource::CachedTest
                    };
                    State::Done(SigningCredential {
                        path: local_pfx.clone(),
                        source,
                    })
                } else {
                    State::CheckGlobalCache
                }
            }

            State::CheckGlobalCache => {
                if is_nonempty_file(&global_pfx) {
                    warn!("Using test certificate at {}!", global_pfx.display());
                    fs::create_dir_all(&request.layout.app_dir).await?;
                    fs::copy(&global_pfx, &local_pfx).await?;
                    State::Done(SigningCredential {
                        path: local_pfx.clone(),
                        source: CredentialSource::CachedTest,
                    })
                } else {
                    State::Generate
                }
            }

            State::Generate => {
                generate(request, toolchain, &local_pfx, &global_pfx).await?;
                generated = true;
                State::CheckLocalCache
            }

            State::Done(credential) => return Ok(credential),
        };
    }
}

/// Copies an explicit credential into the application directory under its
/// own file name, never onto the test credential path.
async fn adopt_user_pfx(supplied: &Path, layout: &BuildLayout) -> Result<State, VaultError> {
    if !fs::try_exists(supplied).await? {
        return Err(VaultError::Config(format!(
            "No pfx file exists at {}. Hint: omit --pfx to use a test certificate.",
            supplied.display()
        )));
    }
    if !is_nonempty_file(supplied) {
        return Err(VaultError::Config(format!(
            "The pfx file at {} is empty.",
            supplied.display()
        )));
    }

    let file_name = supplied.file_name().ok_or_else(|| {
        VaultError::Config(format!("{} does not name a pfx file.", supplied.display()))
    })?;
    let target = layout.app_dir.join(file_name);
    if target == layout.pfx_file() {
        return Err(VaultError::Config(format!(
            "{} collides with the test certificate name; rename the pfx file.",
            supplied.display()
        )));
    }

    if supplied != target && !is_nonempty_file(&target) {
        fs::create_dir_all(&layout.app_dir).await?;
        fs::copy(supplied, &target).await?;
        debug!("copied {} -> {}", supplied.display(), target.display());
    }

    Ok(State::Done(SigningCredential {
        path: target,
        source: CredentialSource::UserProvided,
    }))
}

async fn generate(
    request: &ProvisionRequest,
    toolchain: &dyn SigningToolchain,
    local_pfx: &Path,
    global_pfx: &Path,
) -> Result<(), VaultError> {
    // Stale or corrupt leftovers at either location.
    remove_if_exists(local_pfx).await?;
    remove_if_exists(global_pfx).await?;

    fs::create_dir_all(&request.layout.app_dir).await?;
    fs::create_dir_all(request.home.root()).await?;

    let pvk = request.layout.pvk_file();
    let cer = request.layout.cer_file();

    info!("Creating a temporary certificate for you.");
    info!("If asked for a password, please choose \"None\" (do not specify a password).");
    let make = MakeCertRequest {
        pvk: pvk.clone(),
        cer: cer.clone(),
        subject: request.subject.clone(),
        policy: request.policy.clone(),
    };
    toolchain
        .make_cert(&make)
        .await
        .map_err(|e| VaultError::ExternalTool {
            tool: toolchain.make_cert_tool().to_string(),
            message: e.to_string(),
        })?;

    info!("Converting the certificate for app signing...");
    let convert = PfxRequest {
        pvk,
        cer,
        pfx: local_pfx.to_path_buf(),
    };
    toolchain
        .convert_to_pfx(&convert)
        .await
        .map_err(|e| VaultError::ExternalTool {
            tool: toolchain.convert_tool().to_string(),
            message: e.to_string(),
        })?;

    if is_nonempty_file(local_pfx) {
        info!("Certificate created at {}!", local_pfx.display());
        fs::copy(local_pfx, global_pfx).await?;
    } else {
        warn!(
            "{} reported success but {} is missing or empty",
            toolchain.convert_tool(),
            local_pfx.display()
        );
    }
    Ok(())
}

async fn remove_if_exists(path: &Path) -> std::io::Result<()> {
    match fs::remove_file(path).await {
        Err(e) if e.kind() != std::io::ErrorKind::NotFound => Err(e),
        _ => Ok(()),
    }
}
