pub mod layout;
pub mod metabase;
pub mod options;
pub mod process;

pub use layout::{BuildLayout, ToolHome};
pub use metabase::{ClassEntry, MetadataCatalog, MethodInfo, ParamInfo, PropertyInfo};
pub use options::PackageOptions;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Position of a construct in a source file (1-indexed line and column).
///
/// Carried by call sites and symbol descriptors so diagnostics can point at
/// the offending expression the way a compiler would.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct SourceLocation {
    pub file: String,
    pub line: u32,
    pub column: u32,
}

impl SourceLocation {
    pub fn new(file: impl Into<String>, line: u32, column: u32) -> Self {
        Self {
            file: file.into(),
            line,
            column,
        }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line, self.column)
    }
}

/// Returns `true` iff `path` names an existing regular file with non-zero size.
///
/// Zero-length artifacts left behind by an interrupted tool run are never
/// considered usable.
pub fn is_nonempty_file(path: &std::path::Path) -> bool {
    std::fs::metadata(path)
        .map(|m| m.is_file() && m.len() > 0)
        .unwrap_or(false)
}
