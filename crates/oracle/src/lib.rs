//! # The Oracle: Symbol Resolution & Arity Validation
//!
//! Bridges the translator's view of the source (class, member, call site) to
//! the metabase:
//!
//! - [`resolve`]: looks up classes and methods and builds [`SymbolDescriptor`]s.
//! - [`validate`]: compares recorded call-site arity with declared signatures.
//! - [`session`]: per-compile state tying the two together.
//!
//! Errors carry the call-site [`SourceLocation`] so callers can render a
//! compiler-style diagnostic. None of them are retried; they point at a real
//! mismatch between source and metadata.

pub mod descriptor;
pub mod resolve;
pub mod session;
pub mod validate;

pub use descriptor::{CallSite, MethodKind, MethodSymbol, SymbolDescriptor, SymbolTable};
pub use resolve::{
    find_method, find_property, is_valid_symbol, resolve_instance_method, resolve_static_method,
};
pub use session::CompileSession;
pub use validate::{collect_violations, validate, validate_strict};

use common::SourceLocation;

/// Errors from symbol resolution and validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SymbolError {
    #[error("{location}: couldn't find method: {method_name} for class: {class_name}")]
    Unresolved {
        class_name: String,
        method_name: String,
        location: SourceLocation,
    },
    #[error("{location}: wrong number of arguments passed to {method_name} (expected {expected}, got {actual})")]
    ArityMismatch {
        method_name: String,
        expected: usize,
        actual: usize,
        location: SourceLocation,
    },
    /// Caller-contract violation, e.g. an empty name.
    #[error("Invalid argument: {0}")]
    Argument(String),
    #[error("{location}: {construct} is not supported")]
    Unsupported {
        construct: String,
        location: SourceLocation,
    },
}

impl SymbolError {
    /// Source location of the diagnostic, if it has one.
    pub fn location(&self) -> Option<&SourceLocation> {
        match self {
            Self::Unresolved { location, .. }
            | Self::ArityMismatch { location, .. }
            | Self::Unsupported { location, .. } => Some(location),
            Self::Argument(_) => None,
        }
    }
}
