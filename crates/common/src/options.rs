//! Build options for one packaging run.
//!
//! The same structure is filled from CLI flags and serialized into the
//! `options` key of `config.json` so later build steps can see what the
//! previous run was configured with.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Prefix of the package identity name when no explicit one is supplied.
pub const DEFAULT_IDENTITY_PREFIX: &str = "winpacktest.";

/// Platform handed to MSBuild when none is configured.
pub const DEFAULT_PLATFORM: &str = "Win32";

fn default_platform() -> String {
    DEFAULT_PLATFORM.to_string()
}

fn default_src() -> PathBuf {
    PathBuf::from(".")
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct PackageOptions {
    /// Application identifier; also names the per-application build directory.
    pub name: String,
    /// Output directory root.
    pub dest: PathBuf,
    /// Application source directory.
    #[serde(default = "default_src")]
    pub src: PathBuf,
    /// Target SDK version key (validated against the whitelist before packaging).
    pub sdk: String,
    /// Pre-existing signing credential. `None` selects a test certificate.
    #[serde(default)]
    pub pfx: Option<PathBuf>,
    /// Override for the package identity string.
    #[serde(default)]
    pub identity_name: Option<String>,
    #[serde(default)]
    pub certname: Option<String>,
    #[serde(default)]
    pub publisher: Option<String>,
    #[serde(default = "default_platform")]
    pub platform: String,
    /// Upper bound on each external tool invocation, in seconds.
    #[serde(default, rename = "tool-timeout")]
    pub tool_timeout_secs: Option<u64>,
}

impl PackageOptions {
    /// Creates options with defaults for everything but the required fields.
    pub fn new(name: impl Into<String>, dest: impl Into<PathBuf>, sdk: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            dest: dest.into(),
            src: default_src(),
            sdk: sdk.into(),
            pfx: None,
            identity_name: None,
            certname: None,
            publisher: None,
            platform: default_platform(),
            tool_timeout_secs: None,
        }
    }

    /// Package identity: the explicit override or `winpacktest.<name>`.
    pub fn identity_name(&self) -> String {
        self.identity_name
            .clone()
            .unwrap_or_else(|| format!("{DEFAULT_IDENTITY_PREFIX}{}", self.name))
    }

    pub fn tool_timeout(&self) -> Option<Duration> {
        self.tool_timeout_secs.map(Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_name_default_and_override() {
        let mut opts = PackageOptions::new("App1", "build", "8.1");
        assert_eq!(opts.identity_name(), "winpacktest.App1");

        opts.identity_name = Some("Contoso.App1".into());
        assert_eq!(opts.identity_name(), "Contoso.App1");
    }

    #[test]
    fn test_serde_kebab_case_and_defaults() {
        let opts: PackageOptions = serde_json::from_str(
            r#"{ "name": "App1", "dest": "out", "sdk": "8.1", "identity-name": "X.App1" }"#,
        )
        .unwrap();
        assert_eq!(opts.platform, "Win32");
        assert_eq!(opts.src, PathBuf::from("."));
        assert_eq!(opts.identity_name.as_deref(), Some("X.App1"));
        assert!(opts.pfx.is_none());
        assert!(opts.tool_timeout().is_none());

        let json = serde_json::to_value(&opts).unwrap();
        assert_eq!(json["identity-name"], "X.App1");
        assert!(json.get("tool-timeout").is_some());
        assert!(json.get("tool-timeout-secs").is_none());

        let opts: PackageOptions = serde_json::from_str(
            r#"{ "name": "App1", "dest": "out", "sdk": "8.1", "tool-timeout": 30 }"#,
        )
        .unwrap();
        assert_eq!(opts.tool_timeout(), Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_tool_timeout() {
        let mut opts = PackageOptions::new("App1", "build", "8.1");
        opts.tool_timeout_secs = Some(90);
        assert_eq!(opts.tool_timeout(), Some(Duration::from_secs(90)));
    }
}
