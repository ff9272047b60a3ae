//! Import statement rewriting.
//!
//! Imports never stay where they were written. Each one becomes hoisted
//! `var` bindings (or a bare `require` for side-effect imports) that final
//! assembly prepends to the module.

use crate::templates::{
    export_name, ident_expr, member, require_call, require_default, str_value, var_binding_at,
};
use crate::RewriteContext;
use swc_common::DUMMY_SP;
use swc_ecma_ast::*;

pub(crate) fn rewrite_import(import: ImportDecl, cx: &mut RewriteContext) {
    let source = str_value(&import.src);
    if import.type_only {
        log::debug!("dropping type-only import of {:?}", source);
        return;
    }

    let had_specifiers = !import.specifiers.is_empty();
    let specifiers: Vec<ImportSpecifier> = import
        .specifiers
        .into_iter()
        .filter(|s| !matches!(s, ImportSpecifier::Named(named) if named.is_type_only))
        .collect();

    if specifiers.is_empty() {
        if had_specifiers {
            log::debug!("dropping import of {:?} with only type specifiers", source);
        } else {
            log::debug!("side-effect import of {:?}", source);
            cx.sources.add_side_effect(&import.src);
        }
        return;
    }

    let normalized = cx.policy.is_normalized(&source);

    // `import x from "a"` binds the require result directly
    if let [ImportSpecifier::Default(default)] = specifiers.as_slice() {
        log::debug!("default import of {:?} (normalized: {})", source, normalized);
        let init = if normalized {
            require_default(&import.src)
        } else {
            require_call(&import.src)
        };
        cx.sources
            .push_binding(var_binding_at(DUMMY_SP, default.local.clone(), init));
        return;
    }

    let binding = cx.sources.add_source(&import.src, &mut cx.uids);
    log::debug!("import of {:?} through {}", source, binding);
    for specifier in specifiers {
        let (local, imported) = match specifier {
            ImportSpecifier::Default(default) => (default.local, None),
            ImportSpecifier::Namespace(namespace) => (namespace.local, None),
            ImportSpecifier::Named(named) => {
                let imported = match &named.imported {
                    Some(name) => export_name(name),
                    None => named.local.sym.to_string(),
                };
                (named.local, Some(imported))
            }
        };

        // Normalized sources keep `default` as a real member
        let init = match imported {
            Some(name) if normalized || name != "default" => member(ident_expr(&binding), &name),
            _ => ident_expr(&binding),
        };
        cx.sources.push_binding(var_binding_at(DUMMY_SP, local, init));
    }
}
