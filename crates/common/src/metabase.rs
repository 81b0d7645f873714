//! # Metabase: Class/Method Metadata Catalog
//!
//! Read-only description of the native classes, methods and properties that
//! translated source may reference. The catalog is produced by an external
//! introspection step and loaded here from its JSON form.
//!
//! ```json
//! { "classes": { "Windows.UI.Popups.MessageDialog": {
//!     "properties": { "title": { "type": "string" } },
//!     "methods": { "showAsync": { "args": [], "returnType": "IAsyncOperation" } }
//! } } }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Errors from loading a metabase document.
#[derive(Debug, thiserror::Error)]
pub enum MetabaseError {
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Malformed metabase: {0}")]
    ParseError(#[from] serde_json::Error),
}

/// One declared parameter of a method.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ParamInfo {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default)]
    pub ty: String,
}

/// Signature metadata for a method.
///
/// `args` is `None` when the metabase does not declare a fixed parameter
/// list (the arity check is skipped for such methods).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MethodInfo {
    #[serde(default)]
    pub args: Option<Vec<ParamInfo>>,
    #[serde(rename = "returnType", default)]
    pub return_type: Option<String>,
}

impl MethodInfo {
    /// Declared parameter count, if the parameter list is fixed.
    pub fn arity(&self) -> Option<usize> {
        self.args.as_ref().map(Vec::len)
    }
}

/// Type metadata for a property.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PropertyInfo {
    #[serde(rename = "type", default)]
    pub ty: String,
}

/// Members of one class.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ClassEntry {
    #[serde(default)]
    pub properties: HashMap<String, PropertyInfo>,
    #[serde(default)]
    pub methods: HashMap<String, MethodInfo>,
}

/// The full catalog, keyed by class name.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MetadataCatalog {
    #[serde(default)]
    pub classes: HashMap<String, ClassEntry>,
}

impl MetadataCatalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a catalog from its JSON text.
    pub fn from_json(text: &str) -> Result<Self, MetabaseError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Loads a catalog from a JSON file.
    pub fn load(path: &Path) -> Result<Self, MetabaseError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Inserts (or replaces) a class entry.
    pub fn insert_class(&mut self, name: impl Into<String>, entry: ClassEntry) {
        self.classes.insert(name.into(), entry);
    }

    pub fn class(&self, name: &str) -> Option<&ClassEntry> {
        self.classes.get(name)
    }

    /// Looks up `class_name.method_name`.
    pub fn method(&self, class_name: &str, method_name: &str) -> Option<&MethodInfo> {
        self.class(class_name)?.methods.get(method_name)
    }

    /// Looks up `class_name.property_name`.
    pub fn property(&self, class_name: &str, property_name: &str) -> Option<&PropertyInfo> {
        self.class(class_name)?.properties.get(property_name)
    }

    /// Returns the number of classes.
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    /// Returns `true` if the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}
