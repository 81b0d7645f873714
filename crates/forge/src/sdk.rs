//! Whitelist of supported target SDKs.

/// Location of prebuilt JavaScriptCore archives, one per SDK and library version.
pub const LIBRARY_URL_BASE: &str = "http://timobile.appcelerator.com.s3.amazonaws.com/jscore";

/// Library build matching one target SDK.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SdkConfig {
    /// Value of `--sdk`.
    pub key: &'static str,
    /// JavaScriptCore library version built for this SDK.
    pub version: &'static str,
    /// SHA-1 of the library archive.
    pub checksum: &'static str,
}

impl SdkConfig {
    /// Download URL of the library archive for this SDK.
    pub fn library_url(&self) -> String {
        format!(
            "{LIBRARY_URL_BASE}/JavaScriptCore-windows-sdk{}-v{}.zip",
            self.key, self.version
        )
    }
}

pub const SDK_CONFIGS: &[SdkConfig] = &[SdkConfig {
    key: "8.1",
    version: "3",
    checksum: "ff61004236fc1141fdcf1a133c300f3deb70fdc1",
}];

pub fn lookup(key: &str) -> Option<&'static SdkConfig> {
    SDK_CONFIGS.iter().find(|c| c.key == key)
}

/// Supported keys joined for messages, e.g. `8.1`.
pub fn supported_keys() -> String {
    SDK_CONFIGS
        .iter()
        .map(|c| c.key)
        .collect::<Vec<_>>()
        .join(", ")
}
