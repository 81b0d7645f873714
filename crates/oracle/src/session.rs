//! Per-compile state shared by the resolver and validator.

use crate::descriptor::{CallSite, SymbolDescriptor, SymbolTable};
use crate::{resolve, validate, SymbolError};
use common::{MetadataCatalog, SourceLocation};
use std::sync::Arc;
use tracing::debug;

/// Holds the read-only catalog for a whole compile and the symbol table of
/// the file currently being translated.
#[derive(Debug, Clone)]
pub struct CompileSession {
    catalog: Arc<MetadataCatalog>,
    symbols: SymbolTable,
    file: Option<String>,
}

impl CompileSession {
    pub fn new(catalog: Arc<MetadataCatalog>) -> Self {
        Self {
            catalog,
            symbols: SymbolTable::new(),
            file: None,
        }
    }

    pub fn catalog(&self) -> &MetadataCatalog {
        &self.catalog
    }

    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    /// File passed to the last [`begin_file`](Self::begin_file).
    pub fn current_file(&self) -> Option<&str> {
        self.file.as_deref()
    }

    /// Starts a new file; symbols from the previous file are discarded.
    pub fn begin_file(&mut self, file: impl Into<String>) {
        let file = file.into();
        debug!("begin {}", file);
        self.symbols.clear();
        self.file = Some(file);
    }

    /// Records a descriptor under its symbol name, replacing any previous one.
    pub fn record(&mut self, descriptor: SymbolDescriptor) {
        self.insert(descriptor);
    }

    /// Records a descriptor under an explicit table key.
    ///
    /// Tables loaded from disk are keyed independently of the descriptors'
    /// own `symbol_name`, so the key must be kept as found.
    pub fn record_as(&mut self, key: impl Into<String>, descriptor: SymbolDescriptor) {
        self.symbols.insert(key.into(), descriptor);
    }

    pub fn is_valid_symbol(&self, name: &str) -> Result<bool, SymbolError> {
        resolve::is_valid_symbol(&self.catalog, name)
    }

    /// Resolves an instance call and records it.
    pub fn instance_call(
        &mut self,
        class_name: &str,
        method_name: &str,
        instance_var: &str,
        symbol_name: &str,
        call_site: &CallSite,
    ) -> Result<&SymbolDescriptor, SymbolError> {
        let descriptor = resolve::resolve_instance_method(
            &self.catalog,
            class_name,
            method_name,
            instance_var,
            symbol_name,
            call_site,
        )?;
        Ok(self.insert(descriptor))
    }

    /// Resolves a static call and records it.
    pub fn static_call(
        &mut self,
        class_name: &str,
        method_name: &str,
        symbol_name: &str,
        call_site: &CallSite,
    ) -> Result<&SymbolDescriptor, SymbolError> {
        let descriptor = resolve::resolve_static_method(
            &self.catalog,
            class_name,
            method_name,
            symbol_name,
            call_site,
        )?;
        Ok(self.insert(descriptor))
    }

    /// Class definitions in translated source are not supported.
    pub fn define_class(&self, location: &SourceLocation) -> Result<(), SymbolError> {
        Err(SymbolError::Unsupported {
            construct: "defineClass".into(),
            location: location.clone(),
        })
    }

    /// Validates the current file's symbols, failing on the first violation.
    pub fn finish_file(&self) -> Result<(), SymbolError> {
        validate::validate_strict(&self.catalog, &self.symbols)
    }

    fn insert(&mut self, descriptor: SymbolDescriptor) -> &SymbolDescriptor {
        let key = descriptor.symbol_name().to_string();
        self.symbols.insert(key.clone(), descriptor);
        &self.symbols[&key]
    }
}
