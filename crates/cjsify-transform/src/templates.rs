//! Builders for the CommonJS statements the rewriter emits.
//!
//! ```text
//! var <binding> = require(<source>);
//! var <local> = require(<source>).default;
//! module.exports = <expr>;
//! exports.<name> = <expr>;
//! for (var <key> in <binding>) { if (<key> !== "default") { exports[<key>] = <binding>[<key>]; } }
//! ```

use swc_common::{Span, SyntaxContext, DUMMY_SP};
use swc_ecma_ast::*;

pub(crate) fn str_value(s: &Str) -> String {
    s.value.as_str().unwrap_or("").to_string()
}

/// Text of an import/export specifier name.
pub(crate) fn export_name(name: &ModuleExportName) -> String {
    match name {
        ModuleExportName::Ident(ident) => ident.sym.to_string(),
        ModuleExportName::Str(s) => str_value(s),
    }
}

pub(crate) fn ident(name: &str) -> Ident {
    Ident::new(name.into(), DUMMY_SP, SyntaxContext::empty())
}

pub(crate) fn ident_expr(name: &str) -> Box<Expr> {
    Box::new(Expr::Ident(ident(name)))
}

fn str_lit(value: &str) -> Box<Expr> {
    Box::new(Expr::Lit(Lit::Str(Str {
        span: DUMMY_SP,
        value: value.into(),
        raw: None,
    })))
}

pub(crate) fn is_identifier_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c == '_' || c == '$' || c.is_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c == '_' || c == '$' || c.is_alphanumeric())
}

/// `<obj>.<name>`, or `<obj>["<name>"]` when `name` is not an identifier.
pub(crate) fn member(obj: Box<Expr>, name: &str) -> Box<Expr> {
    Box::new(Expr::Member(member_expr(obj, name)))
}

fn member_expr(obj: Box<Expr>, name: &str) -> MemberExpr {
    let prop = if is_identifier_name(name) {
        MemberProp::Ident(IdentName::new(name.into(), DUMMY_SP))
    } else {
        MemberProp::Computed(ComputedPropName {
            span: DUMMY_SP,
            expr: str_lit(name),
        })
    };
    MemberExpr {
        span: DUMMY_SP,
        obj,
        prop,
    }
}

fn computed_member(obj: &str, key: &str) -> MemberExpr {
    MemberExpr {
        span: DUMMY_SP,
        obj: ident_expr(obj),
        prop: MemberProp::Computed(ComputedPropName {
            span: DUMMY_SP,
            expr: ident_expr(key),
        }),
    }
}

pub(crate) fn undefined() -> Box<Expr> {
    ident_expr("undefined")
}

/// `require(<source>)`; the source literal keeps its original quoting.
pub(crate) fn require_call(source: &Str) -> Box<Expr> {
    Box::new(Expr::Call(CallExpr {
        span: DUMMY_SP,
        ctxt: SyntaxContext::empty(),
        callee: Callee::Expr(ident_expr("require")),
        args: vec![ExprOrSpread {
            spread: None,
            expr: Box::new(Expr::Lit(Lit::Str(source.clone()))),
        }],
        type_args: None,
    }))
}

/// `require(<source>).default`
pub(crate) fn require_default(source: &Str) -> Box<Expr> {
    member(require_call(source), "default")
}

/// `var <name> = <init>;`
pub(crate) fn var_binding(name: &str, init: Box<Expr>) -> Stmt {
    var_binding_at(DUMMY_SP, ident(name), init)
}

pub(crate) fn var_binding_at(span: Span, name: Ident, init: Box<Expr>) -> Stmt {
    Stmt::Decl(Decl::Var(Box::new(VarDecl {
        span,
        ctxt: SyntaxContext::empty(),
        kind: VarDeclKind::Var,
        declare: false,
        decls: vec![VarDeclarator {
            span: DUMMY_SP,
            name: Pat::Ident(BindingIdent {
                id: name,
                type_ann: None,
            }),
            init: Some(init),
            definite: false,
        }],
    })))
}

/// `require(<source>);`
pub(crate) fn require_stmt(source: &Str) -> Stmt {
    expr_stmt(DUMMY_SP, require_call(source))
}

fn expr_stmt(span: Span, expr: Box<Expr>) -> Stmt {
    Stmt::Expr(ExprStmt { span, expr })
}

fn assign(target: MemberExpr, value: Box<Expr>) -> Box<Expr> {
    Box::new(Expr::Assign(AssignExpr {
        span: DUMMY_SP,
        op: AssignOp::Assign,
        left: AssignTarget::Simple(SimpleAssignTarget::Member(target)),
        right: value,
    }))
}

/// `exports.<name> = <value>` as an expression.
pub(crate) fn named_export_expr(name: &str, value: Box<Expr>) -> Box<Expr> {
    assign(member_expr(ident_expr("exports"), name), value)
}

/// `exports.<name> = <value>;`
pub(crate) fn named_export(span: Span, name: &str, value: Box<Expr>) -> Stmt {
    expr_stmt(span, named_export_expr(name, value))
}

/// `module.exports = <value>;`
pub(crate) fn module_exports(span: Span, value: Box<Expr>) -> Stmt {
    expr_stmt(span, assign(member_expr(ident_expr("module"), "exports"), value))
}

/// Copy every key of `binding` except `"default"` onto `exports`.
pub(crate) fn export_all_loop(span: Span, binding: &str, key: &str) -> Stmt {
    let copy = expr_stmt(
        DUMMY_SP,
        assign(computed_member("exports", key), Box::new(Expr::Member(computed_member(binding, key)))),
    );
    let guard = Stmt::If(IfStmt {
        span: DUMMY_SP,
        test: Box::new(Expr::Bin(BinExpr {
            span: DUMMY_SP,
            op: BinaryOp::NotEqEq,
            left: ident_expr(key),
            right: str_lit("default"),
        })),
        cons: Box::new(block(vec![copy])),
        alt: None,
    });

    Stmt::ForIn(ForInStmt {
        span,
        left: ForHead::VarDecl(Box::new(VarDecl {
            span: DUMMY_SP,
            ctxt: SyntaxContext::empty(),
            kind: VarDeclKind::Var,
            declare: false,
            decls: vec![VarDeclarator {
                span: DUMMY_SP,
                name: Pat::Ident(BindingIdent {
                    id: ident(key),
                    type_ann: None,
                }),
                init: None,
                definite: false,
            }],
        })),
        right: ident_expr(binding),
        body: Box::new(block(vec![guard])),
    })
}

fn block(stmts: Vec<Stmt>) -> Stmt {
    Stmt::Block(BlockStmt {
        span: DUMMY_SP,
        ctxt: SyntaxContext::empty(),
        stmts,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use cjsify_parser::parse_module;
    use swc_common::EqIgnoreSpan;

    fn parse_stmt(source: &str) -> Stmt {
        let module = parse_module(source, "expected.js").unwrap();
        match module.body.into_iter().next() {
            Some(ModuleItem::Stmt(stmt)) => stmt,
            other => panic!("expected a statement, got {:?}", other),
        }
    }

    fn source(value: &str) -> Str {
        Str {
            span: DUMMY_SP,
            value: value.into(),
            raw: None,
        }
    }

    fn assert_stmt(actual: Stmt, expected: &str) {
        let expected = parse_stmt(expected);
        assert!(
            actual.eq_ignore_span(&expected),
            "statement mismatch\nactual: {:#?}\nexpected: {:#?}",
            actual,
            expected
        );
    }

    #[test]
    fn test_is_identifier_name() {
        assert!(is_identifier_name("a"));
        assert!(is_identifier_name("_a$1"));
        assert!(!is_identifier_name("1a"));
        assert!(!is_identifier_name("a-b"));
        assert!(!is_identifier_name(""));
    }

    #[test]
    fn test_require_bindings() {
        assert_stmt(
            var_binding("_a", require_call(&source("a"))),
            r#"var _a = require("a");"#,
        );
        assert_stmt(
            var_binding("x", require_default(&source("@babel/runtime/helpers/x"))),
            r#"var x = require("@babel/runtime/helpers/x").default;"#,
        );
        assert_stmt(require_stmt(&source("./polyfill")), r#"require("./polyfill");"#);
    }

    #[test]
    fn test_export_assignments() {
        assert_stmt(module_exports(DUMMY_SP, ident_expr("x")), "module.exports = x;");
        assert_stmt(named_export(DUMMY_SP, "a", ident_expr("a")), "exports.a = a;");
        assert_stmt(
            named_export(DUMMY_SP, "a-b", member(ident_expr("_x"), "c d")),
            r#"exports["a-b"] = _x["c d"];"#,
        );
    }

    #[test]
    fn test_export_all_loop() {
        assert_stmt(
            export_all_loop(DUMMY_SP, "_a", "_a_key"),
            r#"for (var _a_key in _a) { if (_a_key !== "default") { exports[_a_key] = _a[_a_key]; } }"#,
        );
    }
}
