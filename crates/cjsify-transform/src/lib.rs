//! ES module to CommonJS rewriting for cjsify
//!
//! The rewrite runs once over a module's top-level statement list:
//! - Reserved names: user bindings called `module`, `exports` or `require`
//!   are renamed so the emitted code can refer to the CommonJS globals
//! - Imports become hoisted `var` bindings, one shared `require` per source
//! - Exports become assignments to `exports.<name>` or `module.exports`
//! - Mixing default and named exports is rejected
//!
//! ```
//! use cjsify_transform::{ExportShape, ModuleRewriter, RewriteOptions};
//!
//! let mut module = cjsify_parser::parse_module(
//!     "import { a } from 'x'; export const b = a;",
//!     "index.js",
//! )
//! .unwrap();
//! let rewriter = ModuleRewriter::new(RewriteOptions::default()).unwrap();
//! let report = rewriter.rewrite(&mut module).unwrap();
//!
//! assert_eq!(report.sources[0].binding, "_x");
//! assert_eq!(report.export_shape, ExportShape::Named);
//! ```

mod error;
mod exports;
mod guard;
mod imports;
mod options;
mod scope;
mod sources;
mod templates;
mod uid;
mod walk;

pub use error::{ConfigError, RewriteError};
pub use exports::ExportShape;
pub use guard::{RenamedBinding, RESERVED_NAMES};
pub use options::{InteropPolicy, RewriteOptions, BABEL_RUNTIME_PATTERN};
pub use scope::{BindingInfo, BindingKind, ScopeTable};
pub use sources::SourceRecord;
pub use uid::UidGenerator;

use exports::ExportState;
use serde::Serialize;
use sources::SourceCollector;
use swc_ecma_ast::{Expr, ExprStmt, Lit, Module, ModuleDecl, ModuleItem, Stmt};

/// What a rewrite did to one module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RewriteReport {
    /// Shared per-source bindings, in first-reference order
    pub sources: Vec<SourceRecord>,
    /// Side-effect-only imports, in declaration order
    pub side_effect_sources: Vec<String>,
    pub export_shape: ExportShape,
    pub renamed: Vec<RenamedBinding>,
}

/// Per-module state threaded through the statement rewrites.
pub(crate) struct RewriteContext<'a> {
    pub policy: &'a InteropPolicy,
    pub uids: UidGenerator,
    pub sources: SourceCollector,
    pub exports: ExportState,
}

/// Rewrites modules according to one set of [`RewriteOptions`].
///
/// A rewriter holds no per-module state, so one instance can serve any
/// number of files, including from several threads.
#[derive(Debug, Clone)]
pub struct ModuleRewriter {
    options: RewriteOptions,
    policy: InteropPolicy,
}

impl ModuleRewriter {
    pub fn new(options: RewriteOptions) -> Result<Self, ConfigError> {
        let policy = options.compile()?;
        Ok(Self { options, policy })
    }

    pub fn options(&self) -> &RewriteOptions {
        &self.options
    }

    /// Rewrite `module` in place.
    ///
    /// On [`RewriteError`] the module is left partially rewritten and should
    /// be discarded.
    pub fn rewrite(&self, module: &mut Module) -> Result<RewriteReport, RewriteError> {
        let mut uids = UidGenerator::new(walk::collect_identifiers(module));

        let renamed = if self.options.rename_reserved {
            guard::guard_reserved_names(module, &mut uids)
        } else {
            Vec::new()
        };

        let mut cx = RewriteContext {
            policy: &self.policy,
            uids,
            sources: SourceCollector::default(),
            exports: ExportState::default(),
        };

        let body = std::mem::take(&mut module.body);
        // Directive prologue of the input; rewriting never adds or removes
        // items before its end
        let prologue = body.iter().take_while(|item| is_directive(item)).count();
        let mut rewritten = Vec::with_capacity(body.len());
        for item in body {
            match item {
                ModuleItem::ModuleDecl(decl) => rewritten.extend(rewrite_module_decl(decl, &mut cx)),
                stmt => rewritten.push(stmt),
            }
        }
        module.body = rewritten;

        let export_shape = cx.exports.finish()?;

        let sources = cx.sources.records().to_vec();
        let side_effect_sources = cx.sources.side_effect_sources().to_vec();
        let prelude = cx.sources.into_prelude();
        log::debug!(
            "hoisting {} statements ({} sources, {} side-effect imports)",
            prelude.len(),
            sources.len(),
            side_effect_sources.len()
        );

        // Directives such as "use strict" must stay first
        module
            .body
            .splice(prologue..prologue, prelude.into_iter().map(ModuleItem::Stmt));

        Ok(RewriteReport {
            sources,
            side_effect_sources,
            export_shape,
            renamed,
        })
    }
}

fn rewrite_module_decl(decl: ModuleDecl, cx: &mut RewriteContext) -> Vec<ModuleItem> {
    match decl {
        ModuleDecl::Import(import) => {
            imports::rewrite_import(import, cx);
            Vec::new()
        }
        ModuleDecl::ExportDecl(export) => exports::rewrite_export_decl(export, cx),
        ModuleDecl::ExportNamed(export) => exports::rewrite_named_export(export, cx),
        ModuleDecl::ExportDefaultDecl(export) => exports::rewrite_export_default_decl(export, cx),
        ModuleDecl::ExportDefaultExpr(export) => {
            exports::rewrite_export_default_expr(export.span, export.expr, cx)
        }
        ModuleDecl::ExportAll(export) => exports::rewrite_export_all(export, cx),
        ModuleDecl::TsImportEquals(import) => exports::rewrite_import_equals(*import, cx),
        ModuleDecl::TsExportAssignment(export) => {
            exports::rewrite_export_default_expr(export.span, export.expr, cx)
        }
        ModuleDecl::TsNamespaceExport(export) => {
            log::debug!("dropping `export as namespace {}`", export.id.sym);
            Vec::new()
        }
    }
}

fn is_directive(item: &ModuleItem) -> bool {
    match item {
        ModuleItem::Stmt(Stmt::Expr(ExprStmt { expr, .. })) => {
            matches!(&**expr, Expr::Lit(Lit::Str(_)))
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cjsify_parser::{parse_module, Spanned};
    use swc_common::EqIgnoreSpan;

    fn rewriter() -> ModuleRewriter {
        ModuleRewriter::new(RewriteOptions::default()).unwrap()
    }

    fn assert_same_body(actual: &Module, expected: &Module) {
        assert!(
            actual.body.eq_ignore_span(&expected.body),
            "rewrite mismatch\nactual: {:#?}\nexpected: {:#?}",
            actual.body,
            expected.body
        );
    }

    fn assert_rewrite_with(
        rewriter: &ModuleRewriter,
        filename: &str,
        input: &str,
        expected: &str,
    ) -> RewriteReport {
        let mut actual = parse_module(input, filename).unwrap();
        let expected = parse_module(expected, filename).unwrap();
        let report = rewriter.rewrite(&mut actual).unwrap();
        assert_same_body(&actual, &expected);
        assert!(
            actual
                .body
                .iter()
                .all(|item| matches!(item, ModuleItem::Stmt(_))),
            "module syntax left after rewrite"
        );
        report
    }

    fn assert_rewrite(input: &str, expected: &str) -> RewriteReport {
        assert_rewrite_with(&rewriter(), "input.js", input, expected)
    }

    fn assert_rewrite_ts(input: &str, expected: &str) -> RewriteReport {
        assert_rewrite_with(&rewriter(), "input.ts", input, expected)
    }

    fn rewrite_err(input: &str) -> (Module, RewriteError) {
        let mut module = parse_module(input, "input.js").unwrap();
        let original = module.clone();
        let err = rewriter().rewrite(&mut module).unwrap_err();
        (original, err)
    }

    #[test]
    fn test_default_import_and_default_export() {
        let report = assert_rewrite(
            "import x from 'a'; export default x;",
            r#"var x = require("a"); module.exports = x;"#,
        );
        assert!(report.sources.is_empty());
        assert_eq!(report.export_shape, ExportShape::Default);
    }

    #[test]
    fn test_export_all() {
        let report = assert_rewrite(
            "export * from 'a';",
            r#"
            var _a = require("a");
            for (var _a_key in _a) { if (_a_key !== "default") { exports[_a_key] = _a[_a_key]; } }
            "#,
        );
        assert_eq!(report.export_shape, ExportShape::None);
        assert_eq!(report.sources.len(), 1);
    }

    #[test]
    fn test_export_const_wraps_initializers() {
        assert_rewrite(
            "export const a = 1; export const b = 2;",
            "const a = exports.a = 1; const b = exports.b = 2;",
        );
        assert_rewrite(
            "export let a, b = 2;",
            "let a = exports.a = undefined, b = exports.b = 2;",
        );
    }

    #[test]
    fn test_named_imports_share_one_require_per_source() {
        let report = assert_rewrite(
            r#"
            import { a } from 'x';
            import { b as c } from 'x';
            import d, * as ns from 'y';
            foo(a, c, d, ns);
            "#,
            r#"
            var _x = require("x");
            var a = _x.a;
            var c = _x.b;
            var _y = require("y");
            var d = _y;
            var ns = _y;
            foo(a, c, d, ns);
            "#,
        );
        let sources: Vec<(&str, &str)> = report
            .sources
            .iter()
            .map(|s| (s.source.as_str(), s.binding.as_str()))
            .collect();
        assert_eq!(sources, vec![("x", "_x"), ("y", "_y")]);
    }

    #[test]
    fn test_side_effect_imports_follow_bindings() {
        let report = assert_rewrite(
            "import 'p'; import { a } from 'x'; import 'p'; a();",
            r#"var _x = require("x"); var a = _x.a; require("p"); require("p"); a();"#,
        );
        assert_eq!(report.side_effect_sources, vec!["p", "p"]);
    }

    #[test]
    fn test_default_member_import() {
        assert_rewrite(
            "import { default as d } from 'q'; d;",
            r#"var _q = require("q"); var d = _q; d;"#,
        );
    }

    #[test]
    fn test_normalized_sources_unwrap_default() {
        assert_rewrite(
            r#"
            import _extends from '@babel/runtime/helpers/extends';
            import { default as d } from '@babel/runtime/helpers/z';
            import e, { f } from '@babel/runtime/helpers/y';
            "#,
            r#"
            var _extends = require("@babel/runtime/helpers/extends").default;
            var _babelRuntimeHelpersZ = require("@babel/runtime/helpers/z");
            var d = _babelRuntimeHelpersZ.default;
            var _babelRuntimeHelpersY = require("@babel/runtime/helpers/y");
            var e = _babelRuntimeHelpersY;
            var f = _babelRuntimeHelpersY.f;
            "#,
        );
    }

    #[test]
    fn test_custom_interop_patterns() {
        let rewriter = ModuleRewriter::new(RewriteOptions {
            interop_default_patterns: vec!["^@acme/".to_string()],
            ..Default::default()
        })
        .unwrap();
        assert_rewrite_with(
            &rewriter,
            "input.js",
            "import a from '@acme/a'; import b from '@babel/runtime/helpers/b';",
            r#"var a = require("@acme/a").default; var b = require("@babel/runtime/helpers/b");"#,
        );
    }

    #[test]
    fn test_export_default_forms() {
        assert_rewrite(
            "export default function f() {}",
            "function f() {} module.exports = f;",
        );
        assert_rewrite(
            "export default function () {}",
            "module.exports = function () {};",
        );
        assert_rewrite("export default class A {}", "module.exports = class A {};");
        assert_rewrite("export default 1 + 2;", "module.exports = 1 + 2;");
        assert_rewrite("export default class {}", "module.exports = class {};");
    }

    #[test]
    fn test_default_reexports() {
        let report = assert_rewrite(
            "export * as default from 'm';",
            r#"var _m = require("m"); module.exports = _m;"#,
        );
        assert_eq!(report.export_shape, ExportShape::Default);

        let report = assert_rewrite(
            "export { default } from 'm';",
            r#"var _m = require("m"); module.exports = _m;"#,
        );
        assert_eq!(report.export_shape, ExportShape::Default);
    }

    #[test]
    fn test_export_declarations() {
        assert_rewrite(
            "export function f() {} export class C {}",
            "function f() {} exports.f = f; class C {} exports.C = C;",
        );
        assert_rewrite(
            "export const { a, b: [c] } = obj;",
            "const { a, b: [c] } = obj; exports.a = a; exports.c = c;",
        );
    }

    #[test]
    fn test_export_specifiers() {
        assert_rewrite(
            "const a = 1, b = 2; export { a, b as c };",
            "const a = 1, b = 2; exports.a = a; exports.c = b;",
        );
        assert_rewrite("const a = 1; export { a as default };", "const a = 1; module.exports = a;");
        assert_rewrite(
            r#"const a = 1; export { a as "a-b" };"#,
            r#"const a = 1; exports["a-b"] = a;"#,
        );
        assert_rewrite("export {};", "");
    }

    #[test]
    fn test_reexports_share_source_binding() {
        let report = assert_rewrite(
            r#"
            export { x, y as z } from 'm';
            export { default as w } from 'm';
            export * as ns from 'm';
            export v from 'm';
            "#,
            r#"
            var _m = require("m");
            exports.x = _m.x;
            exports.z = _m.y;
            exports.w = _m;
            exports.ns = _m;
            exports.v = _m;
            "#,
        );
        assert_eq!(report.sources.len(), 1);
        assert_eq!(report.export_shape, ExportShape::Named);
    }

    #[test]
    fn test_empty_reexport_keeps_side_effect() {
        assert_rewrite("export {} from 'm';", r#"require("m");"#);
    }

    #[test]
    fn test_import_and_reexport_same_source() {
        assert_rewrite(
            "import { a } from 'm'; export { b } from 'm'; a;",
            r#"var _m = require("m"); var a = _m.a; exports.b = _m.b; a;"#,
        );
    }

    #[test]
    fn test_string_import_names() {
        assert_rewrite(
            r#"import { "a-b" as x, y } from 'm'; x;"#,
            r#"var _m = require("m"); var x = _m["a-b"]; var y = _m.y; x;"#,
        );
    }

    #[test]
    fn test_generated_names_avoid_user_identifiers() {
        assert_rewrite(
            "var _a = 1; import { b } from 'a'; export * from 'c'; var _c_key;",
            r#"
            var _a2 = require("a");
            var b = _a2.b;
            var _c = require("c");
            var _a = 1;
            for (var _c_key2 in _c) { if (_c_key2 !== "default") { exports[_c_key2] = _c[_c_key2]; } }
            var _c_key;
            "#,
        );
    }

    #[test]
    fn test_conflict_default_then_named() {
        let (original, err) = rewrite_err("export default 1;\nexport const a = 2;");
        let RewriteError::ExportConflict {
            span,
            default_span,
            named_span,
        } = err;
        assert_eq!(span, original.body[1].span());
        assert_eq!(default_span, original.body[0].span());
        assert_eq!(named_span, original.body[1].span());

        let (_, err) = rewrite_err("export const a = 1; export default a;");
        assert!(err.to_string().contains("module.exports"));
    }

    #[test]
    fn test_conflict_within_one_statement() {
        let (original, err) = rewrite_err("const a = 1; export { a, a as default };");
        assert_eq!(err.span(), original.body[1].span());
    }

    #[test]
    fn test_conflict_reported_at_last_export() {
        let (original, err) = rewrite_err(
            "export const a = 1;\nexport default a;\nexport function f() {}\nf();",
        );
        assert_eq!(err.span(), original.body[2].span());
    }

    #[test]
    fn test_export_all_does_not_conflict() {
        let report = assert_rewrite(
            "export * from 'a'; export default 1;",
            r#"
            var _a = require("a");
            for (var _a_key in _a) { if (_a_key !== "default") { exports[_a_key] = _a[_a_key]; } }
            module.exports = 1;
            "#,
        );
        assert_eq!(report.export_shape, ExportShape::Default);
    }

    #[test]
    fn test_reserved_bindings_are_renamed() {
        let report = assert_rewrite(
            "var exports = {}; export const a = 1; exports.a = 2;",
            "var _exports = {}; const a = exports.a = 1; _exports.a = 2;",
        );
        assert_eq!(report.renamed.len(), 1);
        assert_eq!(report.renamed[0].original, "exports");
        assert_eq!(report.renamed[0].renamed, "_exports");

        assert_rewrite(
            "import require from 'r'; export default require;",
            r#"var _require = require("r"); module.exports = _require;"#,
        );
    }

    #[test]
    fn test_reserved_export_keeps_public_name() {
        assert_rewrite(
            "export function module() {}",
            "function _module() {} exports.module = _module;",
        );
    }

    #[test]
    fn test_rename_can_be_disabled() {
        let rewriter = ModuleRewriter::new(RewriteOptions {
            rename_reserved: false,
            ..Default::default()
        })
        .unwrap();
        let report = assert_rewrite_with(
            &rewriter,
            "input.js",
            "var module = 1; module;",
            "var module = 1; module;",
        );
        assert!(report.renamed.is_empty());
    }

    #[test]
    fn test_directives_stay_first() {
        assert_rewrite(
            "'use strict'; import a from 'a'; a();",
            r#"'use strict'; var a = require("a"); a();"#,
        );
    }

    #[test]
    fn test_string_after_import_is_not_a_directive() {
        assert_rewrite(
            "import a from 'a'; 'x'; a();",
            r#"var a = require("a"); 'x'; a();"#,
        );
        assert_rewrite(
            "'use strict'; import 'p'; 'x';",
            r#"'use strict'; require("p"); 'x';"#,
        );
    }

    #[test]
    fn test_plain_script_is_unchanged() {
        let source = "function f() { return 1; } var o = { f }; f();";
        let report = assert_rewrite(source, source);
        assert_eq!(
            report,
            RewriteReport {
                sources: Vec::new(),
                side_effect_sources: Vec::new(),
                export_shape: ExportShape::None,
                renamed: Vec::new(),
            }
        );
    }

    #[test]
    fn test_second_rewrite_is_noop() {
        let mut module = parse_module(
            "import { a } from 'x'; import 'y'; export * from 'z'; export const b = a;",
            "input.js",
        )
        .unwrap();
        rewriter().rewrite(&mut module).unwrap();
        let once = module.clone();

        let report = rewriter().rewrite(&mut module).unwrap();
        assert_same_body(&module, &once);
        assert!(report.sources.is_empty());
        assert!(report.renamed.is_empty());
        assert_eq!(report.export_shape, ExportShape::None);
    }

    #[test]
    fn test_typescript_type_only_syntax() {
        assert_rewrite_ts(
            r#"
            import type { T } from 't';
            import { type U, v } from 'u';
            import { type W } from 'w';
            export interface I {}
            export type X = number;
            export declare const y: number;
            export enum E { A }
            v;
            "#,
            r#"
            var _u = require("u");
            var v = _u.v;
            interface I {}
            type X = number;
            declare const y: number;
            enum E { A }
            exports.E = E;
            v;
            "#,
        );
    }

    #[test]
    fn test_typescript_import_equals() {
        assert_rewrite_ts(
            r#"import fs = require("fs"); export import path = require("path"); fs;"#,
            r#"var fs = require("fs"); var path = require("path"); exports.path = path; fs;"#,
        );
    }

    #[test]
    fn test_typescript_export_assignment() {
        let report = assert_rewrite_ts("export = foo;", "module.exports = foo;");
        assert_eq!(report.export_shape, ExportShape::Default);
    }
}
