//! Host environment checks run before any packaging work.
//!
//! Every check is a hard gate: the first unmet requirement aborts the run
//! with a message naming it. Nothing is written to disk before these pass.

use crate::sdk::{self, SdkConfig};
use common::process::ToolCommand;
use tracing::debug;

/// Oldest supported OS release (Windows 8 kernel).
pub const MIN_OS_VERSION: (u32, u32) = (6, 2);

/// Oldest supported Visual Studio tools version (`VS110COMNTOOLS`, VS 2012).
pub const MIN_VISUAL_STUDIO: u32 = 110;

/// Unmet packaging prerequisites.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PreflightError {
    #[error("Packaging a Windows app requires being run on Windows (found {0}).")]
    UnsupportedPlatform(String),
    #[error("Packaging a Windows app requires Windows 8.1 or higher (found {0}).")]
    OsTooOld(String),
    #[error("Unable to determine the Windows version.")]
    UnknownOsVersion,
    #[error("Packaging a Windows app requires Visual Studio 2012 or higher.")]
    MissingVisualStudio,
    #[error("Please specify a --sdk of {supported}.")]
    UnsupportedSdk { requested: String, supported: String },
}

/// Facts about the machine the packager runs on.
#[derive(Debug, Clone, Default)]
pub struct HostInfo {
    /// `std::env::consts::OS` value, e.g. `windows`.
    pub platform: String,
    /// Kernel release string, e.g. `6.3.9600` or `10.0.19045.3803`.
    pub os_release: Option<String>,
    /// Environment variables visible to the process.
    pub env: Vec<(String, String)>,
}

impl HostInfo {
    /// Inspects the current process and OS.
    pub async fn detect() -> Self {
        let platform = std::env::consts::OS.to_string();
        let os_release = detect_os_release().await;
        debug!("host: {} {:?}", platform, os_release);
        Self {
            platform,
            os_release,
            env: std::env::vars().collect(),
        }
    }
}

#[cfg(windows)]
async fn detect_os_release() -> Option<String> {
    // "Microsoft Windows [Version 10.0.19045.3803]"
    let out = ToolCommand::new("cmd").args(["/C", "ver"]).run().await.ok()?;
    let start = out.stdout.find("Version ")? + "Version ".len();
    let rest = &out.stdout[start..];
    let end = rest.find(']').unwrap_or(rest.len());
    Some(rest[..end].trim().to_string())
}

#[cfg(not(windows))]
async fn detect_os_release() -> Option<String> {
    let out = ToolCommand::new("uname").arg("-r").run().await.ok()?;
    Some(out.stdout.trim().to_string())
}

/// Parses the leading `major.minor` of a release string.
pub fn parse_os_version(release: &str) -> Option<(u32, u32)> {
    let mut parts = release.trim().split('.');
    let major = parts.next()?.parse().ok()?;
    let minor = parts
        .next()
        .map(|m| {
            m.chars()
                .take_while(char::is_ascii_digit)
                .collect::<String>()
        })
        .and_then(|m| m.parse().ok())
        .unwrap_or(0);
    Some((major, minor))
}

/// Highest Visual Studio tools version advertised through `VS<nnn>COMNTOOLS`.
pub fn visual_studio_version(env: &[(String, String)]) -> Option<u32> {
    env.iter()
        .filter_map(|(key, _)| {
            let upper = key.to_ascii_uppercase();
            let digits = upper.strip_prefix("VS")?.strip_suffix("COMNTOOLS")?;
            if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            digits.parse::<u32>().ok()
        })
        .max()
}

/// Runs every check in order and returns the selected SDK configuration.
pub fn check(host: &HostInfo, sdk_key: &str) -> Result<&'static SdkConfig, PreflightError> {
    if host.platform != "windows" {
        return Err(PreflightError::UnsupportedPlatform(host.platform.clone()));
    }

    let release = host
        .os_release
        .as_deref()
        .ok_or(PreflightError::UnknownOsVersion)?;
    let version = parse_os_version(release).ok_or(PreflightError::UnknownOsVersion)?;
    if version < MIN_OS_VERSION {
        return Err(PreflightError::OsTooOld(release.to_string()));
    }

    match visual_studio_version(&host.env) {
        Some(v) if v >= MIN_VISUAL_STUDIO => debug!("found Visual Studio tools {}", v),
        _ => return Err(PreflightError::MissingVisualStudio),
    }

    sdk::lookup(sdk_key).ok_or_else(|| PreflightError::UnsupportedSdk {
        requested: sdk_key.to_string(),
        supported: sdk::supported_keys(),
    })
}
