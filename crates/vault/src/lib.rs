//! # The Vault: Signing Credentials & Application Identity
//!
//! Owns the two pieces of per-application state that must survive between
//! builds:
//!
//! - [`guid`]: the application GUID, generated once and persisted in the
//!   build directory.
//! - [`provision`]: the PFX used to sign the package, resolved from a
//!   user-supplied file, the per-application cache, the shared user-scoped
//!   test credential, or generated through the [`toolchain`].

pub mod guid;
pub mod provision;
pub mod toolchain;

pub use guid::{get_or_create_guid, BuildIdentity};
pub use provision::{
    ensure_credential, CredentialSource, ProvisionRequest, SigningCredential,
    MAX_GENERATION_ATTEMPTS,
};
pub use toolchain::{CertPolicy, MakeCertRequest, PfxRequest, SdkToolchain, SigningToolchain};

/// Errors from identity and credential operations.
#[derive(Debug, thiserror::Error)]
pub enum VaultError {
    /// Bad or missing user-supplied path or option.
    #[error("Configuration error: {0}")]
    Config(String),
    /// An external signing tool reported failure.
    #[error("{tool} failed: {message}")]
    ExternalTool { tool: String, message: String },
    /// The generate/verify cycle ran out of attempts.
    #[error("Unable to create a valid test certificate after {attempts} attempts")]
    ProvisioningExhausted { attempts: u32 },
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}
