//! Export statement rewriting.
//!
//! Every export form becomes plain statements in place of the original:
//! declarations are kept and followed by `exports.<name> = <name>`, variable
//! initializers are wrapped in `exports.<name> = ...`, default exports assign
//! `module.exports`, and `export *` copies keys at runtime.

use crate::error::RewriteError;
use crate::scope::{decl_names, pat_names};
use crate::templates::{
    export_all_loop, export_name, ident_expr, member, module_exports, named_export,
    named_export_expr, require_call, str_value, undefined, var_binding_at,
};
use crate::RewriteContext;
use serde::Serialize;
use swc_common::{Span, DUMMY_SP};
use swc_ecma_ast::*;

/// Which export style a module used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportShape {
    None,
    Default,
    Named,
}

impl std::fmt::Display for ExportShape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportShape::None => write!(f, "none"),
            ExportShape::Default => write!(f, "default (module.exports)"),
            ExportShape::Named => write!(f, "named (exports.*)"),
        }
    }
}

/// Export style bookkeeping across one module.
///
/// A module may assign `module.exports` or `exports.<name>`, never both:
/// the whole-module assignment would discard every named export.
#[derive(Debug, Default)]
pub(crate) struct ExportState {
    default_span: Option<Span>,
    named_span: Option<Span>,
    last_export: Option<Span>,
}

impl ExportState {
    fn visit(&mut self, span: Span) {
        self.last_export = Some(span);
    }

    fn mark_default(&mut self, span: Span) {
        self.default_span.get_or_insert(span);
    }

    fn mark_named(&mut self, span: Span) {
        self.named_span.get_or_insert(span);
    }

    pub fn finish(&self) -> Result<ExportShape, RewriteError> {
        match (self.default_span, self.named_span) {
            (Some(default_span), Some(named_span)) => Err(RewriteError::ExportConflict {
                span: self.last_export.unwrap_or(named_span),
                default_span,
                named_span,
            }),
            (Some(_), None) => Ok(ExportShape::Default),
            (None, Some(_)) => Ok(ExportShape::Named),
            (None, None) => Ok(ExportShape::None),
        }
    }
}

fn stmt(stmt: Stmt) -> ModuleItem {
    ModuleItem::Stmt(stmt)
}

fn decl(decl: Decl) -> ModuleItem {
    ModuleItem::Stmt(Stmt::Decl(decl))
}

/// `export default function f() {}`, `export default class {}`, ...
pub(crate) fn rewrite_export_default_decl(
    export: ExportDefaultDecl,
    cx: &mut RewriteContext,
) -> Vec<ModuleItem> {
    let span = export.span;
    match export.decl {
        DefaultDecl::Fn(FnExpr {
            ident: Some(ident),
            function,
        }) => {
            log::debug!("export default function {}", ident.sym);
            cx.exports.visit(span);
            cx.exports.mark_default(span);
            let name = ident.sym.to_string();
            vec![
                decl(Decl::Fn(FnDecl {
                    ident,
                    declare: false,
                    function,
                })),
                stmt(module_exports(span, ident_expr(&name))),
            ]
        }
        DefaultDecl::Fn(function) => {
            log::debug!("export default anonymous function");
            cx.exports.visit(span);
            cx.exports.mark_default(span);
            vec![stmt(module_exports(span, Box::new(Expr::Fn(function))))]
        }
        DefaultDecl::Class(class) => {
            log::debug!("export default class");
            cx.exports.visit(span);
            cx.exports.mark_default(span);
            vec![stmt(module_exports(span, Box::new(Expr::Class(class))))]
        }
        // Interfaces have no runtime value
        DefaultDecl::TsInterfaceDecl(interface) => vec![decl(Decl::TsInterface(interface))],
    }
}

/// `export default <expr>` and TypeScript's `export = <expr>`.
pub(crate) fn rewrite_export_default_expr(
    span: Span,
    expr: Box<Expr>,
    cx: &mut RewriteContext,
) -> Vec<ModuleItem> {
    log::debug!("export default expression");
    cx.exports.visit(span);
    cx.exports.mark_default(span);
    vec![stmt(module_exports(span, expr))]
}

/// `export function f() {}`, `export const a = 1`, `export enum E {}`, ...
pub(crate) fn rewrite_export_decl(export: ExportDecl, cx: &mut RewriteContext) -> Vec<ModuleItem> {
    let span = export.span;
    let declared = match &export.decl {
        Decl::Fn(f) => f.declare,
        Decl::Class(c) => c.declare,
        Decl::Var(var) => var.declare,
        Decl::TsEnum(e) => e.declare,
        Decl::TsModule(m) => m.declare,
        Decl::Using(_) => false,
        Decl::TsInterface(_) | Decl::TsTypeAlias(_) => true,
    };
    // Ambient and type-only declarations produce no runtime binding
    if declared {
        return vec![decl(export.decl)];
    }

    cx.exports.visit(span);
    match export.decl {
        Decl::Var(mut var) => {
            log::debug!("export {:?} declaration", var.kind);
            cx.exports.mark_named(span);
            let mut destructured = Vec::new();
            for declarator in &mut var.decls {
                match &declarator.name {
                    Pat::Ident(binding) => {
                        let name = binding.id.sym.to_string();
                        let init = declarator.init.take().unwrap_or_else(undefined);
                        declarator.init = Some(named_export_expr(&name, init));
                    }
                    pattern => pat_names(pattern, &mut destructured),
                }
            }

            let mut items = vec![decl(Decl::Var(var))];
            items.extend(
                destructured
                    .iter()
                    .map(|name| stmt(named_export(span, name, ident_expr(name)))),
            );
            items
        }
        other => {
            let names = decl_names(&other);
            log::debug!("export declaration of {}", names.join(", "));
            if !names.is_empty() {
                cx.exports.mark_named(span);
            }
            let mut items = vec![decl(other)];
            items.extend(
                names
                    .iter()
                    .map(|name| stmt(named_export(span, name, ident_expr(name)))),
            );
            items
        }
    }
}

/// `export { a, b as c }`, `export { a } from "x"`, `export * as ns from "x"`
/// and `export v from "x"`.
pub(crate) fn rewrite_named_export(export: NamedExport, cx: &mut RewriteContext) -> Vec<ModuleItem> {
    let span = export.span;
    if export.type_only {
        return Vec::new();
    }

    cx.exports.visit(span);
    let had_specifiers = !export.specifiers.is_empty();
    let specifiers: Vec<ExportSpecifier> = export
        .specifiers
        .into_iter()
        .filter(|s| !matches!(s, ExportSpecifier::Named(named) if named.is_type_only))
        .collect();

    if specifiers.is_empty() {
        // `export {} from "x"` still evaluates "x"
        if let (false, Some(src)) = (had_specifiers, &export.src) {
            cx.sources.add_side_effect(src);
        }
        return Vec::new();
    }

    let binding = export
        .src
        .as_deref()
        .map(|src| cx.sources.add_source(src, &mut cx.uids));
    if let Some(src) = &export.src {
        log::debug!("re-export from {:?}", str_value(src));
    }

    let mut items = Vec::with_capacity(specifiers.len());
    for specifier in specifiers {
        let (value, exported) = match (specifier, &binding) {
            (ExportSpecifier::Named(named), Some(binding)) => {
                let orig = export_name(&named.orig);
                let exported = named.exported.as_ref().map(export_name).unwrap_or_else(|| orig.clone());
                let value = if orig == "default" {
                    ident_expr(binding)
                } else {
                    member(ident_expr(binding), &orig)
                };
                (value, exported)
            }
            (ExportSpecifier::Named(named), None) => {
                let exported = named
                    .exported
                    .as_ref()
                    .map(export_name)
                    .unwrap_or_else(|| export_name(&named.orig));
                let value = match named.orig {
                    ModuleExportName::Ident(ident) => Box::new(Expr::Ident(ident)),
                    ModuleExportName::Str(s) => ident_expr(&str_value(&s)),
                };
                (value, exported)
            }
            (ExportSpecifier::Namespace(namespace), Some(binding)) => {
                (ident_expr(binding), export_name(&namespace.name))
            }
            (ExportSpecifier::Default(default), Some(binding)) => {
                (ident_expr(binding), default.exported.sym.to_string())
            }
            // Namespace and default specifiers only parse with a source
            (_, None) => continue,
        };

        if exported == "default" {
            cx.exports.mark_default(span);
            items.push(stmt(module_exports(span, value)));
        } else {
            cx.exports.mark_named(span);
            items.push(stmt(named_export(span, &exported, value)));
        }
    }
    items
}

/// `export * from "x"`
pub(crate) fn rewrite_export_all(export: ExportAll, cx: &mut RewriteContext) -> Vec<ModuleItem> {
    if export.type_only {
        return Vec::new();
    }

    let binding = cx.sources.add_source(&export.src, &mut cx.uids);
    let key = cx.uids.generate(&format!("{}_key", binding));
    log::debug!("export * from {:?} via {}", str_value(&export.src), binding);
    vec![stmt(export_all_loop(export.span, &binding, &key))]
}

/// `import x = require("a")`, `import x = A.B` and their `export` forms.
pub(crate) fn rewrite_import_equals(
    import: TsImportEqualsDecl,
    cx: &mut RewriteContext,
) -> Vec<ModuleItem> {
    if import.is_type_only {
        return Vec::new();
    }

    let init = match &import.module_ref {
        TsModuleRef::TsExternalModuleRef(external) => require_call(&external.expr),
        TsModuleRef::TsEntityName(name) => entity_to_expr(name),
    };
    let name = import.id.sym.to_string();
    let mut items = vec![stmt(var_binding_at(import.span, import.id, init))];

    if import.is_export {
        cx.exports.visit(import.span);
        cx.exports.mark_named(import.span);
        items.push(stmt(named_export(import.span, &name, ident_expr(&name))));
    }
    items
}

fn entity_to_expr(name: &TsEntityName) -> Box<Expr> {
    match name {
        TsEntityName::Ident(ident) => Box::new(Expr::Ident(ident.clone())),
        TsEntityName::TsQualifiedName(qualified) => Box::new(Expr::Member(MemberExpr {
            span: DUMMY_SP,
            obj: entity_to_expr(&qualified.left),
            prop: MemberProp::Ident(qualified.right.clone()),
        })),
    }
}
