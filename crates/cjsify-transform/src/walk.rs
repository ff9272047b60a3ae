//! Scope-aware identifier walk over a module tree.
//!
//! The walk visits every identifier that names a variable (bindings and
//! references alike) and tells the visitor whenever it enters or leaves a
//! scope, together with the names that scope declares. Property names,
//! labels and type annotations are never reported.
//!
//! When a visitor changes an identifier, shorthand forms that would change
//! meaning are expanded: `{ a }` becomes `{ a: _a }`, `import { a }`
//! becomes `import { a as _a }` and `export { a }` becomes
//! `export { _a as a }`.

use crate::scope::{body_scope_names, decl_names, lexical_names, pat_names};
use std::collections::HashSet;
use swc_ecma_ast::*;

pub(crate) trait IdentVisitor {
    fn ident(&mut self, ident: &mut Ident);

    fn enter_scope(&mut self, _declared: &[String]) {}

    fn exit_scope(&mut self) {}
}

/// Every identifier name mentioned anywhere in the module.
pub(crate) fn collect_identifiers(module: &mut Module) -> HashSet<String> {
    struct Collector(HashSet<String>);

    impl IdentVisitor for Collector {
        fn ident(&mut self, ident: &mut Ident) {
            if !self.0.contains(&*ident.sym) {
                self.0.insert(ident.sym.to_string());
            }
        }
    }

    let mut collector = Collector(HashSet::new());
    walk_module(module, &mut collector);
    collector.0
}

pub(crate) fn walk_module<V: IdentVisitor>(module: &mut Module, v: &mut V) {
    for item in &mut module.body {
        walk_module_item(item, v);
    }
}

fn walk_module_item<V: IdentVisitor>(item: &mut ModuleItem, v: &mut V) {
    match item {
        ModuleItem::Stmt(stmt) => walk_stmt(stmt, v),
        ModuleItem::ModuleDecl(decl) => walk_module_decl(decl, v),
    }
}

fn walk_module_decl<V: IdentVisitor>(decl: &mut ModuleDecl, v: &mut V) {
    match decl {
        ModuleDecl::Import(import) => {
            for specifier in &mut import.specifiers {
                match specifier {
                    ImportSpecifier::Named(named) => {
                        let original = named.local.clone();
                        v.ident(&mut named.local);
                        if named.imported.is_none() && named.local.sym != original.sym {
                            named.imported = Some(ModuleExportName::Ident(original));
                        }
                    }
                    ImportSpecifier::Default(default) => v.ident(&mut default.local),
                    ImportSpecifier::Namespace(namespace) => v.ident(&mut namespace.local),
                }
            }
        }
        ModuleDecl::ExportDecl(export) => walk_decl(&mut export.decl, v),
        ModuleDecl::ExportNamed(export) => {
            // Names re-exported from another module are not local bindings
            if export.src.is_some() {
                return;
            }
            for specifier in &mut export.specifiers {
                if let ExportSpecifier::Named(named) = specifier {
                    if let ModuleExportName::Ident(orig) = &mut named.orig {
                        let original = orig.clone();
                        v.ident(orig);
                        if named.exported.is_none() && orig.sym != original.sym {
                            named.exported = Some(ModuleExportName::Ident(original));
                        }
                    }
                }
            }
        }
        ModuleDecl::ExportDefaultDecl(export) => match &mut export.decl {
            DefaultDecl::Fn(f) => {
                if let Some(ident) = &mut f.ident {
                    v.ident(ident);
                }
                walk_function(&mut f.function, None, v);
            }
            DefaultDecl::Class(c) => {
                if let Some(ident) = &mut c.ident {
                    v.ident(ident);
                }
                walk_class(&mut c.class, v);
            }
            DefaultDecl::TsInterfaceDecl(_) => {}
        },
        ModuleDecl::ExportDefaultExpr(export) => walk_expr(&mut export.expr, v),
        ModuleDecl::TsImportEquals(import) => {
            v.ident(&mut import.id);
            if let TsModuleRef::TsEntityName(name) = &mut import.module_ref {
                walk_entity_name(name, v);
            }
        }
        ModuleDecl::TsExportAssignment(export) => walk_expr(&mut export.expr, v),
        ModuleDecl::ExportAll(_) | ModuleDecl::TsNamespaceExport(_) => {}
    }
}

fn walk_entity_name<V: IdentVisitor>(name: &mut TsEntityName, v: &mut V) {
    match name {
        TsEntityName::Ident(ident) => v.ident(ident),
        TsEntityName::TsQualifiedName(qualified) => walk_entity_name(&mut qualified.left, v),
    }
}

fn walk_stmts<V: IdentVisitor>(stmts: &mut [Stmt], v: &mut V) {
    for stmt in stmts {
        walk_stmt(stmt, v);
    }
}

fn walk_block<V: IdentVisitor>(block: &mut BlockStmt, v: &mut V) {
    let mut declared = Vec::new();
    lexical_names(&block.stmts, &mut declared);
    v.enter_scope(&declared);
    walk_stmts(&mut block.stmts, v);
    v.exit_scope();
}

fn walk_stmt<V: IdentVisitor>(stmt: &mut Stmt, v: &mut V) {
    match stmt {
        Stmt::Block(block) => walk_block(block, v),
        Stmt::With(s) => {
            walk_expr(&mut s.obj, v);
            walk_stmt(&mut s.body, v);
        }
        Stmt::Return(s) => {
            if let Some(arg) = &mut s.arg {
                walk_expr(arg, v);
            }
        }
        Stmt::Labeled(s) => walk_stmt(&mut s.body, v),
        Stmt::If(s) => {
            walk_expr(&mut s.test, v);
            walk_stmt(&mut s.cons, v);
            if let Some(alt) = &mut s.alt {
                walk_stmt(alt, v);
            }
        }
        Stmt::Switch(s) => {
            walk_expr(&mut s.discriminant, v);
            let mut declared = Vec::new();
            for case in &s.cases {
                lexical_names(&case.cons, &mut declared);
            }
            v.enter_scope(&declared);
            for case in &mut s.cases {
                if let Some(test) = &mut case.test {
                    walk_expr(test, v);
                }
                walk_stmts(&mut case.cons, v);
            }
            v.exit_scope();
        }
        Stmt::Throw(s) => walk_expr(&mut s.arg, v),
        Stmt::Try(s) => {
            walk_block(&mut s.block, v);
            if let Some(handler) = &mut s.handler {
                let mut declared = Vec::new();
                if let Some(param) = &handler.param {
                    pat_names(param, &mut declared);
                }
                lexical_names(&handler.body.stmts, &mut declared);
                v.enter_scope(&declared);
                if let Some(param) = &mut handler.param {
                    walk_pat(param, v);
                }
                walk_stmts(&mut handler.body.stmts, v);
                v.exit_scope();
            }
            if let Some(finalizer) = &mut s.finalizer {
                walk_block(finalizer, v);
            }
        }
        Stmt::While(s) => {
            walk_expr(&mut s.test, v);
            walk_stmt(&mut s.body, v);
        }
        Stmt::DoWhile(s) => {
            walk_stmt(&mut s.body, v);
            walk_expr(&mut s.test, v);
        }
        Stmt::For(s) => {
            let mut declared = Vec::new();
            if let Some(VarDeclOrExpr::VarDecl(var)) = &s.init {
                if var.kind != VarDeclKind::Var {
                    for declarator in &var.decls {
                        pat_names(&declarator.name, &mut declared);
                    }
                }
            }
            v.enter_scope(&declared);
            match &mut s.init {
                Some(VarDeclOrExpr::VarDecl(var)) => walk_var_decl(var, v),
                Some(VarDeclOrExpr::Expr(expr)) => walk_expr(expr, v),
                None => {}
            }
            if let Some(test) = &mut s.test {
                walk_expr(test, v);
            }
            if let Some(update) = &mut s.update {
                walk_expr(update, v);
            }
            walk_stmt(&mut s.body, v);
            v.exit_scope();
        }
        Stmt::ForIn(s) => {
            v.enter_scope(&for_head_lexical_names(&s.left));
            walk_for_head(&mut s.left, v);
            walk_expr(&mut s.right, v);
            walk_stmt(&mut s.body, v);
            v.exit_scope();
        }
        Stmt::ForOf(s) => {
            v.enter_scope(&for_head_lexical_names(&s.left));
            walk_for_head(&mut s.left, v);
            walk_expr(&mut s.right, v);
            walk_stmt(&mut s.body, v);
            v.exit_scope();
        }
        Stmt::Decl(decl) => walk_decl(decl, v),
        Stmt::Expr(s) => walk_expr(&mut s.expr, v),
        _ => {}
    }
}

fn for_head_lexical_names(head: &ForHead) -> Vec<String> {
    let mut names = Vec::new();
    match head {
        ForHead::VarDecl(var) if var.kind != VarDeclKind::Var => {
            for declarator in &var.decls {
                pat_names(&declarator.name, &mut names);
            }
        }
        ForHead::UsingDecl(using) => {
            for declarator in &using.decls {
                pat_names(&declarator.name, &mut names);
            }
        }
        _ => {}
    }
    names
}

fn walk_for_head<V: IdentVisitor>(head: &mut ForHead, v: &mut V) {
    match head {
        ForHead::VarDecl(var) => walk_var_decl(var, v),
        ForHead::UsingDecl(using) => {
            for declarator in &mut using.decls {
                walk_var_declarator(declarator, v);
            }
        }
        ForHead::Pat(pat) => walk_pat(pat, v),
    }
}

fn walk_decl<V: IdentVisitor>(decl: &mut Decl, v: &mut V) {
    match decl {
        Decl::Class(c) => {
            v.ident(&mut c.ident);
            walk_class(&mut c.class, v);
        }
        Decl::Fn(f) => {
            v.ident(&mut f.ident);
            walk_function(&mut f.function, None, v);
        }
        Decl::Var(var) => walk_var_decl(var, v),
        Decl::Using(using) => {
            for declarator in &mut using.decls {
                walk_var_declarator(declarator, v);
            }
        }
        Decl::TsEnum(e) => {
            v.ident(&mut e.id);
            for member in &mut e.members {
                if let Some(init) = &mut member.init {
                    walk_expr(init, v);
                }
            }
        }
        Decl::TsModule(m) => {
            if let TsModuleName::Ident(id) = &mut m.id {
                v.ident(id);
            }
            if let Some(body) = &mut m.body {
                walk_namespace_body(body, v);
            }
        }
        Decl::TsInterface(_) | Decl::TsTypeAlias(_) => {}
    }
}

fn walk_namespace_body<V: IdentVisitor>(body: &mut TsNamespaceBody, v: &mut V) {
    match body {
        TsNamespaceBody::TsModuleBlock(block) => {
            let mut declared = Vec::new();
            for item in &block.body {
                match item {
                    ModuleItem::Stmt(Stmt::Decl(decl)) => declared.extend(decl_names(decl)),
                    ModuleItem::ModuleDecl(ModuleDecl::ExportDecl(export)) => {
                        declared.extend(decl_names(&export.decl))
                    }
                    _ => {}
                }
            }
            v.enter_scope(&declared);
            for item in &mut block.body {
                walk_module_item(item, v);
            }
            v.exit_scope();
        }
        TsNamespaceBody::TsNamespaceDecl(nested) => walk_namespace_body(&mut nested.body, v),
    }
}

fn walk_var_decl<V: IdentVisitor>(var: &mut VarDecl, v: &mut V) {
    for declarator in &mut var.decls {
        walk_var_declarator(declarator, v);
    }
}

fn walk_var_declarator<V: IdentVisitor>(declarator: &mut VarDeclarator, v: &mut V) {
    walk_pat(&mut declarator.name, v);
    if let Some(init) = &mut declarator.init {
        walk_expr(init, v);
    }
}

/// Parameters get their own scope around the body's: default values cannot
/// see the body's declarations.
fn function_body_names(body: Option<&BlockStmt>) -> Vec<String> {
    body.map(|body| body_scope_names(&body.stmts)).unwrap_or_default()
}

/// `own_name` is the name of a function expression, which is only visible
/// inside the function itself.
fn walk_function<V: IdentVisitor>(function: &mut Function, own_name: Option<&mut Ident>, v: &mut V) {
    for decorator in &mut function.decorators {
        walk_expr(&mut decorator.expr, v);
    }

    let mut params = Vec::new();
    for param in &function.params {
        pat_names(&param.pat, &mut params);
    }
    if let Some(name) = &own_name {
        params.push(name.sym.to_string());
    }
    let body_names = function_body_names(function.body.as_ref());

    v.enter_scope(&params);
    if let Some(name) = own_name {
        v.ident(name);
    }
    for param in &mut function.params {
        for decorator in &mut param.decorators {
            walk_expr(&mut decorator.expr, v);
        }
        walk_pat(&mut param.pat, v);
    }
    v.enter_scope(&body_names);
    if let Some(body) = &mut function.body {
        walk_stmts(&mut body.stmts, v);
    }
    v.exit_scope();
    v.exit_scope();
}

fn walk_arrow<V: IdentVisitor>(arrow: &mut ArrowExpr, v: &mut V) {
    let mut params = Vec::new();
    for param in &arrow.params {
        pat_names(param, &mut params);
    }
    let body_names = match &*arrow.body {
        BlockStmtOrExpr::BlockStmt(block) => body_scope_names(&block.stmts),
        BlockStmtOrExpr::Expr(_) => Vec::new(),
    };

    v.enter_scope(&params);
    for param in &mut arrow.params {
        walk_pat(param, v);
    }
    v.enter_scope(&body_names);
    match &mut *arrow.body {
        BlockStmtOrExpr::BlockStmt(block) => walk_stmts(&mut block.stmts, v),
        BlockStmtOrExpr::Expr(expr) => walk_expr(expr, v),
    }
    v.exit_scope();
    v.exit_scope();
}

fn walk_class<V: IdentVisitor>(class: &mut Class, v: &mut V) {
    for decorator in &mut class.decorators {
        walk_expr(&mut decorator.expr, v);
    }
    if let Some(super_class) = &mut class.super_class {
        walk_expr(super_class, v);
    }

    for member in &mut class.body {
        match member {
            ClassMember::Constructor(constructor) => walk_constructor(constructor, v),
            ClassMember::Method(method) => {
                walk_prop_name(&mut method.key, v);
                walk_function(&mut method.function, None, v);
            }
            ClassMember::PrivateMethod(method) => walk_function(&mut method.function, None, v),
            ClassMember::ClassProp(prop) => {
                for decorator in &mut prop.decorators {
                    walk_expr(&mut decorator.expr, v);
                }
                walk_prop_name(&mut prop.key, v);
                if let Some(value) = &mut prop.value {
                    walk_expr(value, v);
                }
            }
            ClassMember::PrivateProp(prop) => {
                if let Some(value) = &mut prop.value {
                    walk_expr(value, v);
                }
            }
            ClassMember::AutoAccessor(accessor) => {
                if let Some(value) = &mut accessor.value {
                    walk_expr(value, v);
                }
            }
            ClassMember::StaticBlock(block) => walk_block(&mut block.body, v),
            _ => {}
        }
    }
}

fn walk_class_expr<V: IdentVisitor>(class: &mut ClassExpr, v: &mut V) {
    match &mut class.ident {
        Some(ident) => {
            v.enter_scope(&[ident.sym.to_string()]);
            v.ident(ident);
            walk_class(&mut class.class, v);
            v.exit_scope();
        }
        None => walk_class(&mut class.class, v),
    }
}

fn walk_constructor<V: IdentVisitor>(constructor: &mut Constructor, v: &mut V) {
    walk_prop_name(&mut constructor.key, v);

    let mut declared = Vec::new();
    for param in &constructor.params {
        match param {
            ParamOrTsParamProp::Param(param) => pat_names(&param.pat, &mut declared),
            ParamOrTsParamProp::TsParamProp(prop) => match &prop.param {
                TsParamPropParam::Ident(binding) => declared.push(binding.id.sym.to_string()),
                TsParamPropParam::Assign(assign) => pat_names(&assign.left, &mut declared),
            },
        }
    }
    let body_names = function_body_names(constructor.body.as_ref());

    v.enter_scope(&declared);
    for param in &mut constructor.params {
        match param {
            ParamOrTsParamProp::Param(param) => walk_pat(&mut param.pat, v),
            ParamOrTsParamProp::TsParamProp(prop) => match &mut prop.param {
                TsParamPropParam::Ident(binding) => v.ident(&mut binding.id),
                TsParamPropParam::Assign(assign) => {
                    walk_pat(&mut assign.left, v);
                    walk_expr(&mut assign.right, v);
                }
            },
        }
    }
    v.enter_scope(&body_names);
    if let Some(body) = &mut constructor.body {
        walk_stmts(&mut body.stmts, v);
    }
    v.exit_scope();
    v.exit_scope();
}

fn walk_prop_name<V: IdentVisitor>(name: &mut PropName, v: &mut V) {
    if let PropName::Computed(computed) = name {
        walk_expr(&mut computed.expr, v);
    }
}

fn walk_pat<V: IdentVisitor>(pat: &mut Pat, v: &mut V) {
    match pat {
        Pat::Ident(binding) => v.ident(&mut binding.id),
        Pat::Array(array) => {
            for elem in array.elems.iter_mut().flatten() {
                walk_pat(elem, v);
            }
        }
        Pat::Rest(rest) => walk_pat(&mut rest.arg, v),
        Pat::Object(object) => {
            for prop in &mut object.props {
                walk_object_pat_prop(prop, v);
            }
        }
        Pat::Assign(assign) => {
            walk_pat(&mut assign.left, v);
            walk_expr(&mut assign.right, v);
        }
        Pat::Expr(expr) => walk_expr(expr, v),
        Pat::Invalid(_) => {}
    }
}

fn walk_object_pat_prop<V: IdentVisitor>(prop: &mut ObjectPatProp, v: &mut V) {
    let expanded = match prop {
        ObjectPatProp::KeyValue(kv) => {
            walk_prop_name(&mut kv.key, v);
            walk_pat(&mut kv.value, v);
            None
        }
        ObjectPatProp::Rest(rest) => {
            walk_pat(&mut rest.arg, v);
            None
        }
        ObjectPatProp::Assign(assign) => {
            let original = assign.key.id.clone();
            v.ident(&mut assign.key.id);
            if let Some(value) = &mut assign.value {
                walk_expr(value, v);
            }

            // `{ a = 1 }` renamed to `_a` has to become `{ a: _a = 1 }`
            (assign.key.id.sym != original.sym).then(|| {
                let binding = Pat::Ident(assign.key.clone());
                let value = match assign.value.take() {
                    Some(default) => Pat::Assign(AssignPat {
                        span: assign.span,
                        left: Box::new(binding),
                        right: default,
                    }),
                    None => binding,
                };
                ObjectPatProp::KeyValue(KeyValuePatProp {
                    key: PropName::Ident(IdentName::new(original.sym, original.span)),
                    value: Box::new(value),
                })
            })
        }
    };

    if let Some(expanded) = expanded {
        *prop = expanded;
    }
}

fn walk_assign_target<V: IdentVisitor>(target: &mut AssignTarget, v: &mut V) {
    match target {
        AssignTarget::Simple(simple) => match simple {
            SimpleAssignTarget::Ident(binding) => v.ident(&mut binding.id),
            SimpleAssignTarget::Member(member) => walk_member(member, v),
            SimpleAssignTarget::SuperProp(prop) => {
                if let SuperProp::Computed(computed) = &mut prop.prop {
                    walk_expr(&mut computed.expr, v);
                }
            }
            SimpleAssignTarget::Paren(paren) => walk_expr(&mut paren.expr, v),
            SimpleAssignTarget::TsAs(e) => walk_expr(&mut e.expr, v),
            SimpleAssignTarget::TsSatisfies(e) => walk_expr(&mut e.expr, v),
            SimpleAssignTarget::TsNonNull(e) => walk_expr(&mut e.expr, v),
            SimpleAssignTarget::TsTypeAssertion(e) => walk_expr(&mut e.expr, v),
            _ => {}
        },
        AssignTarget::Pat(pat) => match pat {
            AssignTargetPat::Array(array) => {
                for elem in array.elems.iter_mut().flatten() {
                    walk_pat(elem, v);
                }
            }
            AssignTargetPat::Object(object) => {
                for prop in &mut object.props {
                    walk_object_pat_prop(prop, v);
                }
            }
            AssignTargetPat::Invalid(_) => {}
        },
    }
}

fn walk_member<V: IdentVisitor>(member: &mut MemberExpr, v: &mut V) {
    walk_expr(&mut member.obj, v);
    if let MemberProp::Computed(computed) = &mut member.prop {
        walk_expr(&mut computed.expr, v);
    }
}

fn walk_args<V: IdentVisitor>(args: &mut [ExprOrSpread], v: &mut V) {
    for arg in args {
        walk_expr(&mut arg.expr, v);
    }
}

fn walk_prop<V: IdentVisitor>(prop: &mut Prop, v: &mut V) {
    let expanded = match prop {
        Prop::Shorthand(ident) => {
            let original = ident.clone();
            v.ident(ident);
            (ident.sym != original.sym).then(|| {
                Prop::KeyValue(KeyValueProp {
                    key: PropName::Ident(IdentName::new(original.sym, original.span)),
                    value: Box::new(Expr::Ident(ident.clone())),
                })
            })
        }
        Prop::KeyValue(kv) => {
            walk_prop_name(&mut kv.key, v);
            walk_expr(&mut kv.value, v);
            None
        }
        Prop::Assign(assign) => {
            v.ident(&mut assign.key);
            walk_expr(&mut assign.value, v);
            None
        }
        Prop::Getter(getter) => {
            walk_prop_name(&mut getter.key, v);
            if let Some(body) = &mut getter.body {
                v.enter_scope(&body_scope_names(&body.stmts));
                walk_stmts(&mut body.stmts, v);
                v.exit_scope();
            }
            None
        }
        Prop::Setter(setter) => {
            walk_prop_name(&mut setter.key, v);
            let mut params = Vec::new();
            pat_names(&setter.param, &mut params);
            let body_names = function_body_names(setter.body.as_ref());

            v.enter_scope(&params);
            walk_pat(&mut setter.param, v);
            v.enter_scope(&body_names);
            if let Some(body) = &mut setter.body {
                walk_stmts(&mut body.stmts, v);
            }
            v.exit_scope();
            v.exit_scope();
            None
        }
        Prop::Method(method) => {
            walk_prop_name(&mut method.key, v);
            walk_function(&mut method.function, None, v);
            None
        }
    };

    if let Some(expanded) = expanded {
        *prop = expanded;
    }
}

fn walk_expr<V: IdentVisitor>(expr: &mut Expr, v: &mut V) {
    match expr {
        Expr::Ident(ident) => v.ident(ident),
        Expr::Array(array) => {
            for elem in array.elems.iter_mut().flatten() {
                walk_expr(&mut elem.expr, v);
            }
        }
        Expr::Object(object) => {
            for prop in &mut object.props {
                match prop {
                    PropOrSpread::Spread(spread) => walk_expr(&mut spread.expr, v),
                    PropOrSpread::Prop(prop) => walk_prop(prop, v),
                }
            }
        }
        Expr::Fn(f) => walk_function(&mut f.function, f.ident.as_mut(), v),
        Expr::Arrow(arrow) => walk_arrow(arrow, v),
        Expr::Class(class) => walk_class_expr(class, v),
        Expr::Unary(e) => walk_expr(&mut e.arg, v),
        Expr::Update(e) => walk_expr(&mut e.arg, v),
        Expr::Bin(e) => {
            walk_expr(&mut e.left, v);
            walk_expr(&mut e.right, v);
        }
        Expr::Assign(e) => {
            walk_assign_target(&mut e.left, v);
            walk_expr(&mut e.right, v);
        }
        Expr::Member(member) => walk_member(member, v),
        Expr::SuperProp(e) => {
            if let SuperProp::Computed(computed) = &mut e.prop {
                walk_expr(&mut computed.expr, v);
            }
        }
        Expr::Cond(e) => {
            walk_expr(&mut e.test, v);
            walk_expr(&mut e.cons, v);
            walk_expr(&mut e.alt, v);
        }
        Expr::Call(call) => {
            if let Callee::Expr(callee) = &mut call.callee {
                walk_expr(callee, v);
            }
            walk_args(&mut call.args, v);
        }
        Expr::New(new) => {
            walk_expr(&mut new.callee, v);
            if let Some(args) = &mut new.args {
                walk_args(args, v);
            }
        }
        Expr::Seq(seq) => {
            for expr in &mut seq.exprs {
                walk_expr(expr, v);
            }
        }
        Expr::Tpl(tpl) => {
            for expr in &mut tpl.exprs {
                walk_expr(expr, v);
            }
        }
        Expr::TaggedTpl(tagged) => {
            walk_expr(&mut tagged.tag, v);
            for expr in &mut tagged.tpl.exprs {
                walk_expr(expr, v);
            }
        }
        Expr::Yield(e) => {
            if let Some(arg) = &mut e.arg {
                walk_expr(arg, v);
            }
        }
        Expr::Await(e) => walk_expr(&mut e.arg, v),
        Expr::Paren(e) => walk_expr(&mut e.expr, v),
        Expr::OptChain(chain) => match &mut *chain.base {
            OptChainBase::Member(member) => walk_member(member, v),
            OptChainBase::Call(call) => {
                walk_expr(&mut call.callee, v);
                walk_args(&mut call.args, v);
            }
        },
        Expr::JSXElement(element) => walk_jsx_element(element, v),
        Expr::JSXFragment(fragment) => walk_jsx_children(&mut fragment.children, v),
        Expr::JSXMember(member) => walk_jsx_object(&mut member.obj, v),
        Expr::TsTypeAssertion(e) => walk_expr(&mut e.expr, v),
        Expr::TsConstAssertion(e) => walk_expr(&mut e.expr, v),
        Expr::TsNonNull(e) => walk_expr(&mut e.expr, v),
        Expr::TsAs(e) => walk_expr(&mut e.expr, v),
        Expr::TsInstantiation(e) => walk_expr(&mut e.expr, v),
        Expr::TsSatisfies(e) => walk_expr(&mut e.expr, v),
        _ => {}
    }
}

fn walk_jsx_element<V: IdentVisitor>(element: &mut JSXElement, v: &mut V) {
    walk_jsx_name(&mut element.opening.name, v);
    for attr in &mut element.opening.attrs {
        match attr {
            JSXAttrOrSpread::SpreadElement(spread) => walk_expr(&mut spread.expr, v),
            JSXAttrOrSpread::JSXAttr(attr) => match &mut attr.value {
                Some(JSXAttrValue::JSXExprContainer(container)) => {
                    walk_jsx_expr(&mut container.expr, v)
                }
                Some(JSXAttrValue::JSXElement(element)) => walk_jsx_element(element, v),
                Some(JSXAttrValue::JSXFragment(fragment)) => {
                    walk_jsx_children(&mut fragment.children, v)
                }
                _ => {}
            },
        }
    }
    walk_jsx_children(&mut element.children, v);
    if let Some(closing) = &mut element.closing {
        walk_jsx_name(&mut closing.name, v);
    }
}

fn walk_jsx_name<V: IdentVisitor>(name: &mut JSXElementName, v: &mut V) {
    match name {
        // Lower-case tags are intrinsic elements, not references
        JSXElementName::Ident(ident) => {
            if ident.sym.starts_with(|c: char| c.is_ascii_uppercase()) {
                v.ident(ident);
            }
        }
        JSXElementName::JSXMemberExpr(member) => walk_jsx_object(&mut member.obj, v),
        JSXElementName::JSXNamespacedName(_) => {}
    }
}

fn walk_jsx_object<V: IdentVisitor>(object: &mut JSXObject, v: &mut V) {
    match object {
        JSXObject::Ident(ident) => v.ident(ident),
        JSXObject::JSXMemberExpr(member) => walk_jsx_object(&mut member.obj, v),
    }
}

fn walk_jsx_children<V: IdentVisitor>(children: &mut [JSXElementChild], v: &mut V) {
    for child in children {
        match child {
            JSXElementChild::JSXExprContainer(container) => walk_jsx_expr(&mut container.expr, v),
            JSXElementChild::JSXSpreadChild(spread) => walk_expr(&mut spread.expr, v),
            JSXElementChild::JSXElement(element) => walk_jsx_element(element, v),
            JSXElementChild::JSXFragment(fragment) => walk_jsx_children(&mut fragment.children, v),
            _ => {}
        }
    }
}

fn walk_jsx_expr<V: IdentVisitor>(expr: &mut JSXExpr, v: &mut V) {
    if let JSXExpr::Expr(expr) = expr {
        walk_expr(expr, v);
    }
}
