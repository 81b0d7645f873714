//! Symbol descriptors produced during source translation.

use common::{MethodInfo, SourceLocation};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Internal symbol name → descriptor, for one translated file.
pub type SymbolTable = HashMap<String, SymbolDescriptor>;

/// Arguments observed at a call expression.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CallSite {
    pub location: SourceLocation,
    /// Argument expressions as written in the source.
    #[serde(default)]
    pub args: Vec<String>,
}

impl CallSite {
    pub fn new(location: SourceLocation, args: Vec<String>) -> Self {
        Self { location, args }
    }

    pub fn arg_count(&self) -> usize {
        self.args.len()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MethodKind {
    Instance,
    Static,
}

/// A resolved method call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodSymbol {
    pub symbol_name: String,
    pub kind: MethodKind,
    /// Receiver variable; `None` for static calls.
    #[serde(default)]
    pub instance: Option<String>,
    pub class_name: String,
    pub method_name: String,
    pub location: SourceLocation,
    /// Call-site arity.
    pub arg_count: usize,
    /// Catalog metadata captured at resolution time.
    #[serde(default)]
    pub method_info: Option<MethodInfo>,
    #[serde(default)]
    pub return_type: Option<String>,
}

/// Every kind of symbol the translator records.
///
/// Only `Method` is checked by the validator; the other kinds are accepted
/// as-is until their checks exist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SymbolDescriptor {
    Function {
        symbol_name: String,
        name: String,
        location: SourceLocation,
    },
    Constructor {
        symbol_name: String,
        class_name: String,
        location: SourceLocation,
        arg_count: usize,
    },
    /// Property getters and setters.
    Statement {
        symbol_name: String,
        class_name: String,
        name: String,
        #[serde(default)]
        instance: Option<String>,
        location: SourceLocation,
    },
    Method(MethodSymbol),
}

impl SymbolDescriptor {
    pub fn symbol_name(&self) -> &str {
        match self {
            Self::Function { symbol_name, .. }
            | Self::Constructor { symbol_name, .. }
            | Self::Statement { symbol_name, .. } => symbol_name,
            Self::Method(m) => &m.symbol_name,
        }
    }

    pub fn location(&self) -> &SourceLocation {
        match self {
            Self::Function { location, .. }
            | Self::Constructor { location, .. }
            | Self::Statement { location, .. } => location,
            Self::Method(m) => &m.location,
        }
    }

    pub fn as_method(&self) -> Option<&MethodSymbol> {
        match self {
            Self::Method(m) => Some(m),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_json_shape() {
        let json = r#"{
            "type": "method",
            "symbol_name": "sym_0",
            "kind": "static",
            "class_name": "Launcher",
            "method_name": "launchUriAsync",
            "location": { "file": "app.js", "line": 3, "column": 1 },
            "arg_count": 2
        }"#;
        let desc: SymbolDescriptor = serde_json::from_str(json).unwrap();
        let m = desc.as_method().unwrap();
        assert_eq!(m.kind, MethodKind::Static);
        assert!(m.instance.is_none());
        assert!(m.method_info.is_none());
        assert_eq!(desc.symbol_name(), "sym_0");
        assert_eq!(desc.location().line, 3);
    }

    #[test]
    fn test_placeholder_kinds_parse() {
        let json = r#"{
            "type": "statement",
            "symbol_name": "sym_1",
            "class_name": "MessageDialog",
            "name": "title",
            "location": { "file": "app.js", "line": 9, "column": 5 }
        }"#;
        let desc: SymbolDescriptor = serde_json::from_str(json).unwrap();
        assert!(desc.as_method().is_none());
        assert_eq!(desc.symbol_name(), "sym_1");
    }

    #[test]
    fn test_call_site_arity() {
        let site = CallSite::new(SourceLocation::new("a.js", 1, 1), vec!["x".into(), "y".into()]);
        assert_eq!(site.arg_count(), 2);
    }
}
