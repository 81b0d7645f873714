//! Arity validation of resolved symbols.
//!
//! Violations are handed to a caller-supplied callback. Returning `Err` from
//! the callback aborts the pass with that error; returning `Ok(())` keeps
//! going, so the caller chooses between fail-fast and collect-all.

use crate::descriptor::{SymbolDescriptor, SymbolTable};
use crate::SymbolError;
use common::{MetadataCatalog, MethodInfo};
use tracing::debug;

/// Walks `symbols` and reports every `Method` whose call-site arity differs
/// from its declared parameter count.
///
/// Metadata comes from the descriptor, falling back to `catalog` for
/// descriptors recorded without it. Methods without a fixed parameter list
/// and the other descriptor kinds are not checked.
pub fn validate<F>(
    catalog: &MetadataCatalog,
    symbols: &SymbolTable,
    mut on_violation: F,
) -> Result<(), SymbolError>
where
    F: FnMut(SymbolError) -> Result<(), SymbolError>,
{
    for (key, entry) in symbols {
        match entry {
            SymbolDescriptor::Function { .. }
            | SymbolDescriptor::Constructor { .. }
            | SymbolDescriptor::Statement { .. } => {}
            SymbolDescriptor::Method(method) => {
                let info: Option<&MethodInfo> = method
                    .method_info
                    .as_ref()
                    .or_else(|| catalog.method(&method.class_name, &method.method_name));

                let Some(expected) = info.and_then(MethodInfo::arity) else {
                    debug!("{}: no fixed signature for {}", key, method.method_name);
                    continue;
                };

                if expected != method.arg_count {
                    on_violation(SymbolError::ArityMismatch {
                        method_name: method.method_name.clone(),
                        expected,
                        actual: method.arg_count,
                        location: method.location.clone(),
                    })?;
                }
            }
        }
    }
    Ok(())
}

/// Fails on the first violation.
pub fn validate_strict(catalog: &MetadataCatalog, symbols: &SymbolTable) -> Result<(), SymbolError> {
    validate(catalog, symbols, Err)
}

/// Returns every violation, ordered by source location.
pub fn collect_violations(catalog: &MetadataCatalog, symbols: &SymbolTable) -> Vec<SymbolError> {
    let mut violations = Vec::new();
    let pass = validate(catalog, symbols, |violation| {
        violations.push(violation);
        Ok(())
    });
    debug_assert!(pass.is_ok(), "accumulating pass cannot fail");
    violations.sort_by(|a, b| {
        let key = |e: &SymbolError| e.location().map(|l| (l.file.clone(), l.line, l.column));
        key(a).cmp(&key(b))
    });
    violations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{MethodKind, MethodSymbol};
    use common::{ClassEntry, ParamInfo, SourceLocation};

    fn params(n: usize) -> Option<Vec<ParamInfo>> {
        Some(
            (0..n)
                .map(|i| ParamInfo {
                    name: format!("p{i}"),
                    ty: "any".into(),
                })
                .collect(),
        )
    }

    fn method(symbol: &str, declared: Option<usize>, actual: usize, line: u32) -> SymbolDescriptor {
        SymbolDescriptor::Method(MethodSymbol {
            symbol_name: symbol.into(),
            kind: MethodKind::Instance,
            instance: Some("obj".into()),
            class_name: "Widget".into(),
            method_name: format!("{symbol}_call"),
            location: SourceLocation::new("app.js", line, 1),
            arg_count: actual,
            method_info: declared.map(|n| MethodInfo {
                args: params(n),
                return_type: None,
            }),
            return_type: None,
        })
    }

    fn table(entries: Vec<SymbolDescriptor>) -> SymbolTable {
        entries
            .into_iter()
            .map(|d| (d.symbol_name().to_string(), d))
            .collect()
    }

    #[test]
    fn test_arity_mismatch_reported() {
        let symbols = table(vec![method("a", Some(1), 2, 4)]);
        let err = validate_strict(&MetadataCatalog::new(), &symbols).unwrap_err();
        match err {
            SymbolError::ArityMismatch {
                method_name,
                expected,
                actual,
                location,
            } => {
                assert_eq!(method_name, "a_call");
                assert_eq!(expected, 1);
                assert_eq!(actual, 2);
                assert_eq!(location.line, 4);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_matching_arity_passes() {
        let symbols = table(vec![method("a", Some(2), 2, 1), method("b", Some(0), 0, 2)]);
        assert!(validate_strict(&MetadataCatalog::new(), &symbols).is_ok());
    }

    #[test]
    fn test_unfixed_signature_skipped() {
        let mut catalog = MetadataCatalog::new();
        let mut entry = ClassEntry::default();
        entry.methods.insert("a_call".into(), MethodInfo::default());
        catalog.insert_class("Widget", entry);

        // No metadata on the descriptor, and the catalog declares no args.
        let symbols = table(vec![method("a", None, 5, 1)]);
        assert!(validate_strict(&catalog, &symbols).is_ok());
    }

    #[test]
    fn test_catalog_fallback() {
        let mut catalog = MetadataCatalog::new();
        let mut entry = ClassEntry::default();
        entry.methods.insert(
            "a_call".into(),
            MethodInfo {
                args: params(3),
                return_type: None,
            },
        );
        catalog.insert_class("Widget", entry);

        let symbols = table(vec![method("a", None, 1, 1)]);
        let err = validate_strict(&catalog, &symbols).unwrap_err();
        assert!(matches!(
            err,
            SymbolError::ArityMismatch {
                expected: 3,
                actual: 1,
                ..
            }
        ));
    }

    #[test]
    fn test_placeholder_kinds_unchecked() {
        let loc = SourceLocation::new("app.js", 1, 1);
        let symbols = table(vec![
            SymbolDescriptor::Function {
                symbol_name: "f".into(),
                name: "alert".into(),
                location: loc.clone(),
            },
            SymbolDescriptor::Constructor {
                symbol_name: "c".into(),
                class_name: "Widget".into(),
                location: loc.clone(),
                arg_count: 99,
            },
            SymbolDescriptor::Statement {
                symbol_name: "s".into(),
                class_name: "Widget".into(),
                name: "title".into(),
                instance: None,
                location: loc,
            },
        ]);
        assert!(validate_strict(&MetadataCatalog::new(), &symbols).is_ok());
    }

    #[test]
    fn test_fail_fast_stops_at_first() {
        let symbols = table(vec![method("a", Some(1), 2, 1), method("b", Some(1), 3, 2)]);
        let mut seen = 0;
        let result = validate(&MetadataCatalog::new(), &symbols, |e| {
            seen += 1;
            Err(e)
        });
        assert!(result.is_err());
        assert_eq!(seen, 1);
    }

    #[test]
    fn test_collect_all_violations() {
        let symbols = table(vec![
            method("a", Some(1), 2, 9),
            method("b", Some(1), 1, 5),
            method("c", Some(0), 1, 3),
        ]);
        let violations = collect_violations(&MetadataCatalog::new(), &symbols);
        assert_eq!(violations.len(), 2);
        assert_eq!(violations[0].location().unwrap().line, 3);
        assert_eq!(violations[1].location().unwrap().line, 9);
    }
}
