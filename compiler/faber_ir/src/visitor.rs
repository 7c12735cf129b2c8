//! Read-only syntax tree traversal.
//!
//! Default `visit_*` implementations call the matching `walk_*` function,
//! which visits children in source order. Override a `visit_*` method to
//! act on a node, and call `walk_*` from it to keep descending. Skipping
//! the `walk_*` call prunes that subtree.
//!
//! # Example
//!
//! ```text
//! struct CountRaises {
//!     count: usize,
//! }
//!
//! impl<'ast> Visitor<'ast> for CountRaises {
//!     fn visit_stmt(&mut self, stmt: &'ast Stmt) {
//!         if let StmtKind::Raise { .. } = stmt.kind {
//!             self.count += 1;
//!         }
//!         walk_stmt(self, stmt);
//!     }
//! }
//! ```

use crate::ast::{
    Block, ClassDecl, ComptimeBody, ElseBranch, Expr, ExprKind, FunctionDecl, IfStmt, Lambda,
    LambdaBody, NewInit, ObjectEntry, Param, Program, ResourceKind, Stmt, StmtKind, TemplatePart,
};

/// Syntax tree visitor.
///
/// The visitor may mutate its own state; the tree is never mutated.
pub trait Visitor<'ast> {
    fn visit_program(&mut self, program: &'ast Program) {
        walk_program(self, program);
    }

    fn visit_stmt(&mut self, stmt: &'ast Stmt) {
        walk_stmt(self, stmt);
    }

    fn visit_block(&mut self, block: &'ast Block) {
        walk_block(self, block);
    }

    fn visit_expr(&mut self, expr: &'ast Expr) {
        walk_expr(self, expr);
    }

    fn visit_function(&mut self, function: &'ast FunctionDecl) {
        walk_function(self, function);
    }

    fn visit_class(&mut self, class: &'ast ClassDecl) {
        walk_class(self, class);
    }

    fn visit_lambda(&mut self, lambda: &'ast Lambda) {
        walk_lambda(self, lambda);
    }

    fn visit_param(&mut self, param: &'ast Param) {
        if let Some(default) = &param.default {
            self.visit_expr(default);
        }
    }
}

pub fn walk_program<'ast, V: Visitor<'ast> + ?Sized>(visitor: &mut V, program: &'ast Program) {
    for stmt in &program.body {
        visitor.visit_stmt(stmt);
    }
}

pub fn walk_block<'ast, V: Visitor<'ast> + ?Sized>(visitor: &mut V, block: &'ast Block) {
    for stmt in &block.stmts {
        visitor.visit_stmt(stmt);
    }
}

pub fn walk_function<'ast, V: Visitor<'ast> + ?Sized>(
    visitor: &mut V,
    function: &'ast FunctionDecl,
) {
    for param in &function.params {
        visitor.visit_param(param);
    }
    if let Some(body) = &function.body {
        visitor.visit_block(body);
    }
}

pub fn walk_class<'ast, V: Visitor<'ast> + ?Sized>(visitor: &mut V, class: &'ast ClassDecl) {
    for field in &class.fields {
        if let Some(init) = &field.init {
            visitor.visit_expr(init);
        }
    }
    if let Some(ctor) = &class.constructor {
        visitor.visit_block(ctor);
    }
    for method in &class.methods {
        visitor.visit_function(method);
    }
}

pub fn walk_lambda<'ast, V: Visitor<'ast> + ?Sized>(visitor: &mut V, lambda: &'ast Lambda) {
    for param in &lambda.params {
        visitor.visit_param(param);
    }
    match &lambda.body {
        LambdaBody::Expr(e) => visitor.visit_expr(e),
        LambdaBody::Block(b) => visitor.visit_block(b),
    }
}

fn walk_if<'ast, V: Visitor<'ast> + ?Sized>(visitor: &mut V, if_stmt: &'ast IfStmt) {
    visitor.visit_expr(&if_stmt.cond);
    visitor.visit_block(&if_stmt.then);
    match &if_stmt.otherwise {
        Some(ElseBranch::If(next)) => walk_if(visitor, next),
        Some(ElseBranch::Block(b)) => visitor.visit_block(b),
        None => {}
    }
}

pub fn walk_stmt<'ast, V: Visitor<'ast> + ?Sized>(visitor: &mut V, stmt: &'ast Stmt) {
    match &stmt.kind {
        StmtKind::Import(_)
        | StmtKind::Interface(_)
        | StmtKind::Enum(_)
        | StmtKind::Union(_)
        | StmtKind::TypeAlias(_)
        | StmtKind::Break
        | StmtKind::Continue => {}
        StmtKind::Var(decl) => {
            if let Some(init) = &decl.init {
                visitor.visit_expr(init);
            }
        }
        StmtKind::Function(f) => visitor.visit_function(f),
        StmtKind::Class(c) => visitor.visit_class(c),
        StmtKind::If(if_stmt) => walk_if(visitor, if_stmt),
        StmtKind::While { cond, body } => {
            visitor.visit_expr(cond);
            visitor.visit_block(body);
        }
        StmtKind::For(f) => {
            visitor.visit_expr(&f.iterable);
            visitor.visit_block(&f.body);
        }
        StmtKind::Switch(s) => {
            visitor.visit_expr(&s.discriminant);
            for case in &s.cases {
                for v in &case.values {
                    visitor.visit_expr(v);
                }
                visitor.visit_block(&case.body);
            }
            if let Some(d) = &s.default {
                visitor.visit_block(d);
            }
        }
        StmtKind::Match(m) => {
            visitor.visit_expr(&m.subject);
            for arm in &m.arms {
                visitor.visit_block(&arm.body);
            }
            if let Some(d) = &m.default {
                visitor.visit_block(d);
            }
        }
        StmtKind::Guard(clauses) => {
            for clause in clauses {
                visitor.visit_expr(&clause.cond);
                visitor.visit_block(&clause.body);
            }
        }
        StmtKind::Try(t) => {
            visitor.visit_block(&t.body);
            if let Some(c) = &t.catch {
                visitor.visit_block(&c.body);
            }
            if let Some(f) = &t.finally {
                visitor.visit_block(f);
            }
        }
        StmtKind::Raise { value, .. } => visitor.visit_expr(value),
        StmtKind::Return(value) => {
            if let Some(v) = value {
                visitor.visit_expr(v);
            }
        }
        StmtKind::Block(b) | StmtKind::Entry { body: b, .. } => visitor.visit_block(b),
        StmtKind::Expr(e) => visitor.visit_expr(e),
        StmtKind::Print { args, .. } => {
            for a in args {
                visitor.visit_expr(a);
            }
        }
        StmtKind::Assert { cond, message } => {
            visitor.visit_expr(cond);
            if let Some(m) = message {
                visitor.visit_expr(m);
            }
        }
        StmtKind::Resource(r) => {
            if let ResourceKind::Acquire(e) = &r.kind {
                visitor.visit_expr(e);
            }
            visitor.visit_block(&r.body);
        }
    }
}

pub fn walk_expr<'ast, V: Visitor<'ast> + ?Sized>(visitor: &mut V, expr: &'ast Expr) {
    match &expr.kind {
        ExprKind::Literal(_) | ExprKind::Ident(_) | ExprKind::SelfRef => {}
        ExprKind::Template(parts) => {
            for part in parts {
                if let TemplatePart::Expr(e) = part {
                    visitor.visit_expr(e);
                }
            }
        }
        ExprKind::Array(items) => {
            for item in items {
                visitor.visit_expr(item);
            }
        }
        ExprKind::Object(entries) => {
            for entry in entries {
                match entry {
                    ObjectEntry::Field { value, .. } => visitor.visit_expr(value),
                    ObjectEntry::Spread(e) => visitor.visit_expr(e),
                }
            }
        }
        ExprKind::Range {
            start, end, step, ..
        } => {
            visitor.visit_expr(start);
            visitor.visit_expr(end);
            if let Some(s) = step {
                visitor.visit_expr(s);
            }
        }
        ExprKind::Binary { left, right, .. } => {
            visitor.visit_expr(left);
            visitor.visit_expr(right);
        }
        ExprKind::Assign { target, value, .. } => {
            visitor.visit_expr(target);
            visitor.visit_expr(value);
        }
        ExprKind::Conditional {
            cond,
            then,
            otherwise,
        } => {
            visitor.visit_expr(cond);
            visitor.visit_expr(then);
            visitor.visit_expr(otherwise);
        }
        ExprKind::Call { callee, args } => {
            visitor.visit_expr(callee);
            for a in args {
                visitor.visit_expr(a);
            }
        }
        ExprKind::MethodCall { receiver, args, .. } => {
            visitor.visit_expr(receiver);
            for a in args {
                visitor.visit_expr(a);
            }
        }
        ExprKind::Index { object, index } => {
            visitor.visit_expr(object);
            visitor.visit_expr(index);
        }
        ExprKind::Lambda(lambda) => visitor.visit_lambda(lambda),
        ExprKind::New { init, .. } => match init {
            NewInit::Args(args) => {
                for a in args {
                    visitor.visit_expr(a);
                }
            }
            NewInit::Fields(fields) => {
                for (_, v) in fields {
                    visitor.visit_expr(v);
                }
            }
        },
        ExprKind::Comptime(ComptimeBody::Block(b)) => visitor.visit_block(b),
        ExprKind::Comptime(ComptimeBody::Expr(e))
        | ExprKind::Unary { operand: e, .. }
        | ExprKind::Member { object: e, .. }
        | ExprKind::Cede(e)
        | ExprKind::TypeCheck { expr: e, .. }
        | ExprKind::Cast { expr: e, .. }
        | ExprKind::Native { expr: e, .. }
        | ExprKind::Spread(e)
        | ExprKind::Paren(e) => visitor.visit_expr(e),
    }
}

#[cfg(test)]
mod tests;
