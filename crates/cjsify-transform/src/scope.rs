//! Binding tables.
//!
//! The rewriter never asks an ambient scope service which names exist; it
//! builds a [`ScopeTable`] of the module's top-level bindings up front and
//! uses the helpers below to find what each nested scope declares.

use serde::Serialize;
use std::collections::HashMap;
use swc_ecma_ast::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BindingKind {
    Var,
    Let,
    Const,
    Function,
    Class,
    Import,
    /// `enum`, `namespace` and `import x = ...` declarations
    TypeScript,
}

impl BindingKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BindingKind::Var => "var",
            BindingKind::Let => "let",
            BindingKind::Const => "const",
            BindingKind::Function => "function",
            BindingKind::Class => "class",
            BindingKind::Import => "import",
            BindingKind::TypeScript => "typescript",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BindingInfo {
    pub kind: BindingKind,
    /// Whether the binding is declared by an `export` statement
    pub exported: bool,
}

/// Top-level bindings of one module, keyed by name.
#[derive(Debug, Clone, Default)]
pub struct ScopeTable {
    bindings: HashMap<String, BindingInfo>,
}

impl ScopeTable {
    pub fn from_module(module: &Module) -> Self {
        let mut table = ScopeTable::default();

        for item in &module.body {
            match item {
                ModuleItem::Stmt(Stmt::Decl(decl)) => table.add_decl(decl, false),
                ModuleItem::Stmt(_) => {}
                ModuleItem::ModuleDecl(ModuleDecl::Import(import)) => {
                    for specifier in &import.specifiers {
                        let local = match specifier {
                            ImportSpecifier::Named(s) => &s.local,
                            ImportSpecifier::Default(s) => &s.local,
                            ImportSpecifier::Namespace(s) => &s.local,
                        };
                        table.insert(&local.sym, BindingKind::Import, false);
                    }
                }
                ModuleItem::ModuleDecl(ModuleDecl::ExportDecl(export)) => {
                    table.add_decl(&export.decl, true)
                }
                ModuleItem::ModuleDecl(ModuleDecl::ExportDefaultDecl(export)) => {
                    match &export.decl {
                        DefaultDecl::Fn(FnExpr { ident: Some(id), .. }) => {
                            table.insert(&id.sym, BindingKind::Function, true)
                        }
                        DefaultDecl::Class(ClassExpr { ident: Some(id), .. }) => {
                            table.insert(&id.sym, BindingKind::Class, true)
                        }
                        _ => {}
                    }
                }
                ModuleItem::ModuleDecl(ModuleDecl::TsImportEquals(import)) => {
                    table.insert(&import.id.sym, BindingKind::TypeScript, import.is_export)
                }
                ModuleItem::ModuleDecl(_) => {}
            }
        }

        // `var` inside top-level blocks, loops and try statements still
        // declares a module-scope binding
        let stmts: Vec<&Stmt> = module
            .body
            .iter()
            .filter_map(|item| match item {
                ModuleItem::Stmt(stmt) => Some(stmt),
                _ => None,
            })
            .collect();
        let mut hoisted = Vec::new();
        for stmt in stmts {
            if !matches!(stmt, Stmt::Decl(_)) {
                collect_var_hoisted(stmt, &mut hoisted);
            }
        }
        for name in hoisted {
            table.insert(&name, BindingKind::Var, false);
        }

        table
    }

    fn add_decl(&mut self, decl: &Decl, exported: bool) {
        let kind = match decl {
            Decl::Var(var) => match var.kind {
                VarDeclKind::Var => BindingKind::Var,
                VarDeclKind::Let => BindingKind::Let,
                VarDeclKind::Const => BindingKind::Const,
            },
            Decl::Fn(_) => BindingKind::Function,
            Decl::Class(_) => BindingKind::Class,
            Decl::Using(_) => BindingKind::Const,
            Decl::TsEnum(_) | Decl::TsModule(_) => BindingKind::TypeScript,
            Decl::TsInterface(_) | Decl::TsTypeAlias(_) => return,
        };
        for name in decl_names(decl) {
            self.insert(&name, kind, exported);
        }
    }

    fn insert(&mut self, name: &str, kind: BindingKind, exported: bool) {
        self.bindings
            .entry(name.to_string())
            .or_insert(BindingInfo { kind, exported });
    }

    pub fn get(&self, name: &str) -> Option<&BindingInfo> {
        self.bindings.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }
}

/// Names bound by a pattern, in source order.
pub(crate) fn pat_names(pat: &Pat, out: &mut Vec<String>) {
    match pat {
        Pat::Ident(binding) => out.push(binding.id.sym.to_string()),
        Pat::Array(array) => {
            for elem in array.elems.iter().flatten() {
                pat_names(elem, out);
            }
        }
        Pat::Rest(rest) => pat_names(&rest.arg, out),
        Pat::Object(object) => {
            for prop in &object.props {
                match prop {
                    ObjectPatProp::KeyValue(kv) => pat_names(&kv.value, out),
                    ObjectPatProp::Assign(assign) => out.push(assign.key.id.sym.to_string()),
                    ObjectPatProp::Rest(rest) => pat_names(&rest.arg, out),
                }
            }
        }
        Pat::Assign(assign) => pat_names(&assign.left, out),
        Pat::Expr(_) | Pat::Invalid(_) => {}
    }
}

/// Names a declaration introduces into its enclosing scope.
pub(crate) fn decl_names(decl: &Decl) -> Vec<String> {
    let mut names = Vec::new();
    match decl {
        Decl::Var(var) => {
            for declarator in &var.decls {
                pat_names(&declarator.name, &mut names);
            }
        }
        Decl::Using(using) => {
            for declarator in &using.decls {
                pat_names(&declarator.name, &mut names);
            }
        }
        Decl::Fn(f) => names.push(f.ident.sym.to_string()),
        Decl::Class(c) => names.push(c.ident.sym.to_string()),
        Decl::TsEnum(e) => names.push(e.id.sym.to_string()),
        Decl::TsModule(m) => {
            if let TsModuleName::Ident(id) = &m.id {
                names.push(id.sym.to_string());
            }
        }
        Decl::TsInterface(_) | Decl::TsTypeAlias(_) => {}
    }
    names
}

/// `var` names declared by `stmt` or anything nested in it, without
/// descending into functions.
pub(crate) fn collect_var_hoisted(stmt: &Stmt, out: &mut Vec<String>) {
    match stmt {
        Stmt::Decl(Decl::Var(var)) if var.kind == VarDeclKind::Var => {
            for declarator in &var.decls {
                pat_names(&declarator.name, out);
            }
        }
        Stmt::Block(block) => {
            for stmt in &block.stmts {
                collect_var_hoisted(stmt, out);
            }
        }
        Stmt::If(s) => {
            collect_var_hoisted(&s.cons, out);
            if let Some(alt) = &s.alt {
                collect_var_hoisted(alt, out);
            }
        }
        Stmt::While(s) => collect_var_hoisted(&s.body, out),
        Stmt::DoWhile(s) => collect_var_hoisted(&s.body, out),
        Stmt::Labeled(s) => collect_var_hoisted(&s.body, out),
        Stmt::With(s) => collect_var_hoisted(&s.body, out),
        Stmt::For(s) => {
            if let Some(VarDeclOrExpr::VarDecl(var)) = &s.init {
                if var.kind == VarDeclKind::Var {
                    for declarator in &var.decls {
                        pat_names(&declarator.name, out);
                    }
                }
            }
            collect_var_hoisted(&s.body, out);
        }
        Stmt::ForIn(s) => {
            for_head_var_names(&s.left, out);
            collect_var_hoisted(&s.body, out);
        }
        Stmt::ForOf(s) => {
            for_head_var_names(&s.left, out);
            collect_var_hoisted(&s.body, out);
        }
        Stmt::Switch(s) => {
            for case in &s.cases {
                for stmt in &case.cons {
                    collect_var_hoisted(stmt, out);
                }
            }
        }
        Stmt::Try(s) => {
            for stmt in &s.block.stmts {
                collect_var_hoisted(stmt, out);
            }
            if let Some(handler) = &s.handler {
                for stmt in &handler.body.stmts {
                    collect_var_hoisted(stmt, out);
                }
            }
            if let Some(finalizer) = &s.finalizer {
                for stmt in &finalizer.stmts {
                    collect_var_hoisted(stmt, out);
                }
            }
        }
        _ => {}
    }
}

fn for_head_var_names(head: &ForHead, out: &mut Vec<String>) {
    if let ForHead::VarDecl(var) = head {
        if var.kind == VarDeclKind::Var {
            for declarator in &var.decls {
                pat_names(&declarator.name, out);
            }
        }
    }
}

/// Block-scoped names (`let`, `const`, `class`, `function`) declared
/// directly in a statement list.
pub(crate) fn lexical_names(stmts: &[Stmt], out: &mut Vec<String>) {
    for stmt in stmts {
        match stmt {
            Stmt::Decl(Decl::Var(var)) if var.kind == VarDeclKind::Var => {}
            Stmt::Decl(decl) => out.extend(decl_names(decl)),
            _ => {}
        }
    }
}

/// Everything a function body declares: hoisted `var`s and its top-level
/// lexical declarations. Parameters form a separate, enclosing scope.
pub(crate) fn body_scope_names(body: &[Stmt]) -> Vec<String> {
    let mut names = Vec::new();
    for stmt in body {
        collect_var_hoisted(stmt, &mut names);
    }
    lexical_names(body, &mut names);
    names
}
