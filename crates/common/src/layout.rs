//! On-disk layout of a packaging run.
//!
//! ```text
//! {dest}/vsstudio/
//!     config.json             merged build options
//!     {name}.sln              solution handed to MSBuild
//!     {name}/
//!         guid                application GUID (plain text)
//!         {name}.vcxproj
//!         {name}_Key.pvk      intermediate signing artifacts
//!         {name}_Key.cer
//!         {name}_Key.pfx      final credential
//!
//! {home}/                     user-scoped, shared by every application
//!     DevelopmentKey.pfx      cached test credential
//!     JavaScriptCore{sdk}/    SDK library tree (+ include/)
//! ```

use crate::PackageOptions;
use std::path::{Path, PathBuf};

/// Environment variable overriding the user-scoped home directory.
pub const HOME_ENV: &str = "WINPACK_HOME";

/// Name of the directory under `dest` holding all Visual Studio artifacts.
const VSSTUDIO_DIR: &str = "vsstudio";

/// File name of the shared test credential inside the user-scoped home.
pub const GLOBAL_TEST_PFX: &str = "DevelopmentKey.pfx";

/// Per-application paths derived from [`PackageOptions`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildLayout {
    pub name: String,
    pub vsstudio_dir: PathBuf,
    pub app_dir: PathBuf,
}

impl BuildLayout {
    pub fn new(dest: &Path, name: &str) -> Self {
        let vsstudio_dir = dest.join(VSSTUDIO_DIR);
        let app_dir = vsstudio_dir.join(name);
        Self {
            name: name.to_string(),
            vsstudio_dir,
            app_dir,
        }
    }

    pub fn from_options(options: &PackageOptions) -> Self {
        Self::new(&options.dest, &options.name)
    }

    pub fn guid_file(&self) -> PathBuf {
        self.app_dir.join("guid")
    }

    pub fn pvk_file(&self) -> PathBuf {
        self.app_dir.join(format!("{}_Key.pvk", self.name))
    }

    pub fn cer_file(&self) -> PathBuf {
        self.app_dir.join(format!("{}_Key.cer", self.name))
    }

    pub fn pfx_file(&self) -> PathBuf {
        self.app_dir.join(format!("{}_Key.pfx", self.name))
    }

    pub fn solution_file(&self) -> PathBuf {
        self.vsstudio_dir.join(format!("{}.sln", self.name))
    }

    pub fn project_file(&self) -> PathBuf {
        self.app_dir.join(format!("{}.vcxproj", self.name))
    }

    pub fn config_file(&self) -> PathBuf {
        self.vsstudio_dir.join("config.json")
    }
}

/// User-scoped home directory holding state shared across applications.
///
/// Single-writer: nothing guards concurrent packaging runs that share it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolHome {
    root: PathBuf,
}

impl ToolHome {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Resolves the home from `WINPACK_HOME`, falling back to `~/.winpack`.
    ///
    /// Returns `None` when neither is available (no home directory for the
    /// current user).
    pub fn resolve() -> Option<Self> {
        if let Some(dir) = std::env::var_os(HOME_ENV).filter(|v| !v.is_empty()) {
            return Some(Self::new(dir));
        }
        dirs::home_dir().map(|home| Self::new(home.join(".winpack")))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the shared cached test credential.
    pub fn global_test_pfx(&self) -> PathBuf {
        self.root.join(GLOBAL_TEST_PFX)
    }

    /// Library tree for an SDK version key, e.g. `JavaScriptCore8.1`.
    pub fn jsc_dir(&self, sdk: &str) -> PathBuf {
        self.root.join(format!("JavaScriptCore{sdk}"))
    }
}

/// Renders a path in Windows form (backslash separators) for project templates.
pub fn windows_path(path: &Path) -> String {
    let absolute = dunce::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
    absolute.to_string_lossy().replace('/', "\\")
}
