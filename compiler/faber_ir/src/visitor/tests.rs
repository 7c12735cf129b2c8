use super::*;
use crate::ast::{FunctionDecl, Param, RaiseKind};

#[derive(Default)]
struct Counter {
    idents: Vec<String>,
    stmts: usize,
}

impl<'ast> Visitor<'ast> for Counter {
    fn visit_stmt(&mut self, stmt: &'ast Stmt) {
        self.stmts += 1;
        walk_stmt(self, stmt);
    }

    fn visit_expr(&mut self, expr: &'ast Expr) {
        if let ExprKind::Ident(name) = &expr.kind {
            self.idents.push(name.clone());
        }
        walk_expr(self, expr);
    }
}

#[test]
fn test_walk_visits_in_source_order() {
    let program = Program::new(vec![
        Stmt::varia("a", Expr::ident("x")),
        Stmt::expr(Expr::call(Expr::ident("f"), vec![Expr::ident("y"), Expr::ident("z")])),
    ]);
    let mut counter = Counter::default();
    counter.visit_program(&program);
    assert_eq!(counter.stmts, 2);
    assert_eq!(counter.idents, vec!["x", "f", "y", "z"]);
}

#[test]
fn test_walk_descends_into_functions() {
    let f = FunctionDecl::new(
        "f",
        vec![Param::new("p", None)],
        Block::new(vec![Stmt::raise(RaiseKind::Error, Expr::ident("e"))]),
    );
    let program = Program::new(vec![Stmt::function(f)]);
    let mut counter = Counter::default();
    counter.visit_program(&program);
    assert_eq!(counter.stmts, 2);
    assert_eq!(counter.idents, vec!["e"]);
}

struct SkipLambdas {
    seen: usize,
}

impl<'ast> Visitor<'ast> for SkipLambdas {
    fn visit_lambda(&mut self, _lambda: &'ast Lambda) {}

    fn visit_expr(&mut self, expr: &'ast Expr) {
        self.seen += 1;
        walk_expr(self, expr);
    }
}

#[test]
fn test_overriding_prunes_subtree() {
    let program = Program::new(vec![Stmt::expr(Expr::lambda(
        vec![Param::new("x", None)],
        Expr::binary(crate::BinaryOp::Add, Expr::ident("x"), Expr::int(1)),
    ))]);
    let mut v = SkipLambdas { seen: 0 };
    v.visit_program(&program);
    assert_eq!(v.seen, 1);
}
