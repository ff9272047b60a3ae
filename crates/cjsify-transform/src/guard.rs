//! Reserved-name guard.
//!
//! The emitted code refers to `module`, `exports` and `require` as free
//! variables. A module that declares one of those names at the top level
//! gets the binding renamed first, so every reference the rewriter emits
//! means the CommonJS binding.

use crate::scope::{decl_names, BindingKind, ScopeTable};
use crate::templates::ident;
use crate::uid::UidGenerator;
use crate::walk::{walk_module, IdentVisitor};
use serde::Serialize;
use std::collections::HashMap;
use swc_common::{Span, DUMMY_SP};
use swc_ecma_ast::*;

pub const RESERVED_NAMES: [&str; 3] = ["module", "exports", "require"];

/// A top-level binding renamed away from a reserved name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenamedBinding {
    pub original: String,
    pub renamed: String,
    pub kind: BindingKind,
    /// First occurrence of the binding in the source
    #[serde(skip)]
    pub span: Span,
}

/// Decide the new name of every reserved top-level binding.
pub(crate) fn plan_renames(table: &ScopeTable, uids: &mut UidGenerator) -> Vec<(String, String)> {
    RESERVED_NAMES
        .iter()
        .filter(|name| table.contains(name))
        .map(|name| (name.to_string(), uids.generate(name)))
        .collect()
}

/// Rename reserved top-level bindings throughout `module`.
pub(crate) fn guard_reserved_names(module: &mut Module, uids: &mut UidGenerator) -> Vec<RenamedBinding> {
    let table = ScopeTable::from_module(module);
    let renames = plan_renames(&table, uids);
    if renames.is_empty() {
        return Vec::new();
    }

    let renames: HashMap<String, String> = renames.into_iter().collect();
    split_renamed_exports(module, &table, &renames);

    let mut renamer = Renamer {
        renames: &renames,
        shadowed: Vec::new(),
        first_seen: HashMap::new(),
    };
    walk_module(module, &mut renamer);

    let mut renamed: Vec<RenamedBinding> = RESERVED_NAMES
        .iter()
        .filter_map(|name| {
            let new_name = renames.get(*name)?;
            let binding = table.get(name)?;
            Some(RenamedBinding {
                original: name.to_string(),
                renamed: new_name.clone(),
                kind: binding.kind,
                span: renamer.first_seen.get(*name).copied().unwrap_or(DUMMY_SP),
            })
        })
        .collect();
    renamed.sort_by_key(|binding| binding.span.lo);

    for binding in &renamed {
        log::debug!("renamed top-level binding {} to {}", binding.original, binding.renamed);
    }
    renamed
}

/// `export const module = 1` would change its public name once the binding
/// is renamed. Split such declarations into the declaration itself plus an
/// `export { module }` that the renamer turns into `export { _module as module }`.
fn split_renamed_exports(module: &mut Module, table: &ScopeTable, renames: &HashMap<String, String>) {
    let exported: Vec<&str> = renames
        .keys()
        .map(String::as_str)
        .filter(|name| table.get(name).is_some_and(|binding| binding.exported))
        .collect();
    if exported.is_empty() {
        return;
    }

    let body = std::mem::take(&mut module.body);
    for item in body {
        match item {
            ModuleItem::ModuleDecl(ModuleDecl::ExportDecl(export))
                if decl_names(&export.decl)
                    .iter()
                    .any(|name| exported.contains(&name.as_str())) =>
            {
                let names = decl_names(&export.decl);
                module.body.push(ModuleItem::Stmt(Stmt::Decl(export.decl)));
                module.body.push(export_names(export.span, &names));
            }
            ModuleItem::ModuleDecl(ModuleDecl::TsImportEquals(mut import))
                if import.is_export && exported.contains(&&*import.id.sym) =>
            {
                let name = import.id.sym.to_string();
                let span = import.span;
                import.is_export = false;
                module.body.push(ModuleItem::ModuleDecl(ModuleDecl::TsImportEquals(import)));
                module.body.push(export_names(span, &[name]));
            }
            item => module.body.push(item),
        }
    }
}

fn export_names(span: Span, names: &[String]) -> ModuleItem {
    ModuleItem::ModuleDecl(ModuleDecl::ExportNamed(NamedExport {
        span,
        specifiers: names
            .iter()
            .map(|name| {
                ExportSpecifier::Named(ExportNamedSpecifier {
                    span: DUMMY_SP,
                    orig: ModuleExportName::Ident(ident(name)),
                    exported: None,
                    is_type_only: false,
                })
            })
            .collect(),
        src: None,
        type_only: false,
        with: None,
    }))
}

/// Renames top-level bindings, skipping nested scopes that redeclare them.
struct Renamer<'a> {
    renames: &'a HashMap<String, String>,
    shadowed: Vec<Vec<String>>,
    first_seen: HashMap<String, Span>,
}

impl IdentVisitor for Renamer<'_> {
    fn ident(&mut self, ident: &mut Ident) {
        let Some(new_name) = self.renames.get(&*ident.sym) else {
            return;
        };
        if self
            .shadowed
            .iter()
            .any(|scope| scope.iter().any(|name| *name == *ident.sym))
        {
            return;
        }

        self.first_seen
            .entry(ident.sym.to_string())
            .or_insert(ident.span);
        ident.sym = new_name.as_str().into();
    }

    fn enter_scope(&mut self, declared: &[String]) {
        self.shadowed.push(
            declared
                .iter()
                .filter(|name| self.renames.contains_key(*name))
                .cloned()
                .collect(),
        );
    }

    fn exit_scope(&mut self) {
        self.shadowed.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::walk::collect_identifiers;
    use cjsify_parser::parse_module;
    use swc_common::EqIgnoreSpan;

    fn guard(input: &str) -> (Module, Vec<RenamedBinding>) {
        let mut module = parse_module(input, "input.js").unwrap();
        let mut uids = UidGenerator::new(collect_identifiers(&mut module));
        let renamed = guard_reserved_names(&mut module, &mut uids);
        (module, renamed)
    }

    fn assert_guarded(input: &str, expected: &str) {
        let (actual, _) = guard(input);
        let expected = parse_module(expected, "expected.js").unwrap();
        assert!(
            actual.body.eq_ignore_span(&expected.body),
            "guard mismatch\nactual: {:#?}\nexpected: {:#?}",
            actual.body,
            expected.body
        );
    }

    #[test]
    fn test_no_collision_is_noop() {
        let (_, renamed) = guard("var a = module.exports; require('x');");
        assert!(renamed.is_empty());
        assert_guarded("var a = module.exports;", "var a = module.exports;");
    }

    #[test]
    fn test_renames_top_level_bindings() {
        assert_guarded(
            "var module = 1; function f() { return module + exports; }",
            "var _module = 1; function f() { return _module + exports; }",
        );
        assert_guarded(
            "function require(x) { return x; } require(1);",
            "function _require(x) { return x; } _require(1);",
        );
        assert_guarded("import exports from 'x'; exports();", "import _exports from 'x'; _exports();");
    }

    #[test]
    fn test_shadowing_scopes_are_left_alone() {
        assert_guarded(
            "var module = 1; function f(module) { return module; } { let module = 2; module; }",
            "var _module = 1; function f(module) { return module; } { let module = 2; module; }",
        );
    }

    #[test]
    fn test_parameter_defaults_do_not_see_body_declarations() {
        assert_guarded(
            "var module = 1; function f(x = module) { var module; return x; }",
            "var _module = 1; function f(x = _module) { var module; return x; }",
        );
        assert_guarded(
            "var module = 1; var g = (x = module) => { let module = 2; return x + module; };",
            "var _module = 1; var g = (x = _module) => { let module = 2; return x + module; };",
        );
        // a parameter of the same name still shadows
        assert_guarded(
            "var module = 1; function h(module, y = module) { return y; }",
            "var _module = 1; function h(module, y = module) { return y; }",
        );
    }

    #[test]
    fn test_generated_name_avoids_existing_identifiers() {
        assert_guarded(
            "var module = 1; var _module = 2;",
            "var _module2 = 1; var _module = 2;",
        );
    }

    #[test]
    fn test_exported_declaration_keeps_public_name() {
        assert_guarded(
            "export const module = 1, other = 2;",
            "const _module = 1, other = 2; export { _module as module, other };",
        );
        assert_guarded(
            "export function exports() {}",
            "function _exports() {} export { _exports as exports };",
        );
    }

    #[test]
    fn test_report_lists_renames_in_source_order() {
        let (_, renamed) = guard("let require = 1;\nvar module = 2;");
        let pairs: Vec<(&str, &str)> = renamed
            .iter()
            .map(|b| (b.original.as_str(), b.renamed.as_str()))
            .collect();
        assert_eq!(pairs, vec![("require", "_require"), ("module", "_module")]);
        assert_eq!(renamed[0].kind, BindingKind::Let);
        assert_eq!(renamed[1].kind, BindingKind::Var);
    }

    #[test]
    fn test_only_exported_bindings_are_split() {
        // `other` is exported but not renamed, so its declaration stays put
        assert_guarded(
            "export const other = 1; var module = 2;",
            "export const other = 1; var _module = 2;",
        );
        let (_, renamed) = guard("export class exports {}");
        assert_eq!(renamed[0].kind, BindingKind::Class);
    }
}
