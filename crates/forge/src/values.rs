//! Substitutions handed to the Visual Studio project templates.

use common::layout::windows_path;
use common::{PackageOptions, ToolHome};
use std::path::Path;
use vault::BuildIdentity;

/// Template values for one application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectValues {
    pub app_name: String,
    pub app_guid: String,
    pub lib_dir: String,
    pub include_dir: String,
    pub cert_name: String,
    pub pfx: String,
    pub publisher_name: String,
    pub identity_name: String,
}

impl ProjectValues {
    pub fn new(
        options: &PackageOptions,
        identity: &BuildIdentity,
        home: &ToolHome,
        pfx: &Path,
    ) -> Self {
        let jsc_dir = home.jsc_dir(&options.sdk);
        Self {
            app_name: identity.application_name.clone(),
            app_guid: identity.guid.clone(),
            lib_dir: windows_path(&jsc_dir),
            include_dir: windows_path(&jsc_dir.join("include")),
            cert_name: options.certname.clone().unwrap_or_default(),
            pfx: windows_path(pfx),
            publisher_name: options.publisher.clone().unwrap_or_default(),
            identity_name: options.identity_name(),
        }
    }

    /// `(PLACEHOLDER, value)` pairs in template order.
    pub fn to_pairs(&self) -> Vec<(&'static str, &str)> {
        vec![
            ("APPNAME", &self.app_name),
            ("APPGUID", &self.app_guid),
            ("LIBDIR", &self.lib_dir),
            ("INCLUDEDIR", &self.include_dir),
            ("CERTNAME", &self.cert_name),
            ("PFX", &self.pfx),
            ("PUBLISHERNAME", &self.publisher_name),
            ("IDENTITY_NAME", &self.identity_name),
        ]
    }
}
