//! Symbol resolution against the metabase.
//!
//! Resolution only checks that the class and member exist. Call-site arity is
//! recorded but not compared with the declared signature; that is the
//! validator's job, so partially parsed sources can still be resolved.

use crate::descriptor::{CallSite, MethodKind, MethodSymbol, SymbolDescriptor};
use crate::SymbolError;
use common::{MetadataCatalog, MethodInfo, PropertyInfo};
use tracing::trace;

/// Returns whether `name` is a class in the catalog.
///
/// # Errors
/// `SymbolError::Argument` if `name` is empty.
pub fn is_valid_symbol(catalog: &MetadataCatalog, name: &str) -> Result<bool, SymbolError> {
    if name.is_empty() {
        return Err(SymbolError::Argument("name required".into()));
    }
    Ok(catalog.class(name).is_some())
}

pub fn find_method<'a>(
    catalog: &'a MetadataCatalog,
    class_name: &str,
    method_name: &str,
) -> Option<&'a MethodInfo> {
    catalog.method(class_name, method_name)
}

pub fn find_property<'a>(
    catalog: &'a MetadataCatalog,
    class_name: &str,
    property_name: &str,
) -> Option<&'a PropertyInfo> {
    catalog.property(class_name, property_name)
}

/// Resolves `receiver.method(...)` where `receiver` is an instance of `class_name`.
pub fn resolve_instance_method(
    catalog: &MetadataCatalog,
    class_name: &str,
    method_name: &str,
    instance_var: &str,
    symbol_name: &str,
    call_site: &CallSite,
) -> Result<SymbolDescriptor, SymbolError> {
    resolve_method(
        catalog,
        MethodKind::Instance,
        class_name,
        method_name,
        Some(instance_var),
        symbol_name,
        call_site,
    )
}

/// Resolves `ClassName.method(...)`.
pub fn resolve_static_method(
    catalog: &MetadataCatalog,
    class_name: &str,
    method_name: &str,
    symbol_name: &str,
    call_site: &CallSite,
) -> Result<SymbolDescriptor, SymbolError> {
    resolve_method(
        catalog,
        MethodKind::Static,
        class_name,
        method_name,
        None,
        symbol_name,
        call_site,
    )
}

fn resolve_method(
    catalog: &MetadataCatalog,
    kind: MethodKind,
    class_name: &str,
    method_name: &str,
    instance_var: Option<&str>,
    symbol_name: &str,
    call_site: &CallSite,
) -> Result<SymbolDescriptor, SymbolError> {
    let info = find_method(catalog, class_name, method_name).ok_or_else(|| {
        SymbolError::Unresolved {
            class_name: class_name.to_string(),
            method_name: method_name.to_string(),
            location: call_site.location.clone(),
        }
    })?;

    trace!(
        "resolved {:?} {}.{} as {}",
        kind,
        class_name,
        method_name,
        symbol_name
    );

    Ok(SymbolDescriptor::Method(MethodSymbol {
        symbol_name: symbol_name.to_string(),
        kind,
        instance: instance_var.map(str::to_string),
        class_name: class_name.to_string(),
        method_name: method_name.to_string(),
        location: call_site.location.clone(),
        arg_count: call_site.arg_count(),
        method_info: Some(info.clone()),
        return_type: info.return_type.clone(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::{ClassEntry, ParamInfo, SourceLocation};

    fn catalog() -> MetadataCatalog {
        let mut entry = ClassEntry::default();
        entry.methods.insert(
            "setContent".into(),
            MethodInfo {
                args: Some(vec![ParamInfo {
                    name: "content".into(),
                    ty: "string".into(),
                }]),
                return_type: Some("void".into()),
            },
        );
        entry.properties.insert(
            "title".into(),
            PropertyInfo {
                ty: "string".into(),
            },
        );
        let mut catalog = MetadataCatalog::new();
        catalog.insert_class("MessageDialog", entry);
        catalog
    }

    fn site(args: &[&str]) -> CallSite {
        CallSite::new(
            SourceLocation::new("app.js", 7, 12),
            args.iter().map(|a| a.to_string()).collect(),
        )
    }

    #[test]
    fn test_is_valid_symbol() {
        let catalog = catalog();
        assert!(is_valid_symbol(&catalog, "MessageDialog").unwrap());
        assert!(!is_valid_symbol(&catalog, "Popup").unwrap());
        assert!(matches!(
            is_valid_symbol(&catalog, ""),
            Err(SymbolError::Argument(_))
        ));
    }

    #[test]
    fn test_resolve_instance_method() {
        let desc = resolve_instance_method(
            &catalog(),
            "MessageDialog",
            "setContent",
            "dialog",
            "sym_3",
            &site(&["a", "b"]),
        )
        .unwrap();
        let m = desc.as_method().unwrap();
        assert_eq!(m.kind, MethodKind::Instance);
        assert_eq!(m.instance.as_deref(), Some("dialog"));
        // Arity is recorded, not checked.
        assert_eq!(m.arg_count, 2);
        assert_eq!(m.method_info.as_ref().unwrap().arity(), Some(1));
        assert_eq!(m.return_type.as_deref(), Some("void"));
        assert_eq!(m.location, SourceLocation::new("app.js", 7, 12));
    }

    #[test]
    fn test_resolve_static_method_has_no_receiver() {
        let desc = resolve_static_method(
            &catalog(),
            "MessageDialog",
            "setContent",
            "sym_4",
            &site(&["'hi'"]),
        )
        .unwrap();
        let m = desc.as_method().unwrap();
        assert_eq!(m.kind, MethodKind::Static);
        assert!(m.instance.is_none());
    }

    #[test]
    fn test_unknown_class() {
        let err = resolve_static_method(&catalog(), "Popup", "show", "sym_5", &site(&[]))
            .unwrap_err();
        match err {
            SymbolError::Unresolved {
                class_name,
                method_name,
                location,
            } => {
                assert_eq!(class_name, "Popup");
                assert_eq!(method_name, "show");
                assert_eq!(location.line, 7);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_unknown_method() {
        let err = resolve_instance_method(
            &catalog(),
            "MessageDialog",
            "close",
            "dialog",
            "sym_6",
            &site(&[]),
        )
        .unwrap_err();
        assert!(err.to_string().contains("close"));
        assert!(err.to_string().contains("app.js:7:12"));
    }

    #[test]
    fn test_find_property() {
        let catalog = catalog();
        assert_eq!(
            find_property(&catalog, "MessageDialog", "title").unwrap().ty,
            "string"
        );
        assert!(find_property(&catalog, "MessageDialog", "body").is_none());
    }
}
