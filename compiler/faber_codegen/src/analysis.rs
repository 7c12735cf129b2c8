//! Static pre-passes over function bodies.
//!
//! Error-union targets decide a function's return type before lowering its
//! body, so they need to know up front whether the body can raise. The walk
//! descends through nested control flow but stops at nested functions,
//! classes and lambdas: a raise inside a closure belongs to the closure.

use faber_ir::visitor::{walk_expr, walk_stmt, Visitor};
use faber_ir::{
    Block, ClassDecl, Expr, ExprKind, FunctionDecl, Lambda, Program, RaiseKind, Stmt, StmtKind,
};
use rustc_hash::FxHashSet;

use crate::registry::{find_method, CollectionKind};

/// Whether `body` contains a recoverable raise (`iace`) outside any nested
/// function literal.
pub(crate) fn body_raises(body: &Block) -> bool {
    let mut finder = RaiseFinder { found: false };
    finder.visit_block(body);
    finder.found
}

/// Whether control can leave `body` other than by falling off its end or
/// raising: a `redde`, or a `rumpe`/`perge` not enclosed by a loop inside
/// `body`. Nested function literals are skipped.
pub(crate) fn body_escapes(body: &Block) -> bool {
    let mut finder = EscapeFinder {
        loops: 0,
        found: false,
    };
    finder.visit_block(body);
    finder.found
}

/// Names of bindings the program mutates after declaring them: assignment
/// targets, roots of assigned fields or elements, and receivers of mutating
/// collection methods.
///
/// Targets with immutable-by-default bindings use this to decide whether a
/// `fixum` still needs a mutable declaration. Names are not scoped, so a
/// shadowed binding errs toward mutable.
pub(crate) fn mutated_bindings(program: &Program) -> FxHashSet<String> {
    let mut finder = MutationFinder {
        names: FxHashSet::default(),
    };
    finder.visit_program(program);
    finder.names
}

/// Whether a method body writes through `self`: assigns to one of its fields
/// or calls a mutating collection method on one. Receivers that borrow
/// `self` need a mutable borrow in that case.
pub(crate) fn body_mutates_self(body: &Block) -> bool {
    let mut finder = SelfMutationFinder { found: false };
    finder.visit_block(body);
    finder.found
}

fn rooted_at_self(expr: &Expr) -> bool {
    match &expr.unparen().kind {
        ExprKind::SelfRef => true,
        ExprKind::Member { object, .. } | ExprKind::Index { object, .. } => rooted_at_self(object),
        _ => false,
    }
}

fn mutating_method(receiver: &Expr, method: &str) -> bool {
    let kind = receiver
        .resolved
        .as_ref()
        .and_then(|ty| ty.generic_name())
        .and_then(CollectionKind::from_type_name)
        .unwrap_or(CollectionKind::Lista);
    find_method(kind, method).is_some_and(|m| m.mutates)
}

/// The identifier at the root of a place expression (`a`, `a.b`, `a[i].c`).
fn place_root(expr: &Expr) -> Option<&str> {
    match &expr.unparen().kind {
        ExprKind::Ident(name) => Some(name),
        ExprKind::Member { object, .. } | ExprKind::Index { object, .. } => place_root(object),
        _ => None,
    }
}

struct MutationFinder {
    names: FxHashSet<String>,
}

impl<'ast> Visitor<'ast> for MutationFinder {
    fn visit_expr(&mut self, expr: &'ast Expr) {
        match &expr.kind {
            ExprKind::Assign { target, .. } => {
                if let Some(root) = place_root(target) {
                    self.names.insert(root.to_string());
                }
            }
            ExprKind::MethodCall {
                receiver, method, ..
            } => {
                if let (true, Some(root)) = (mutating_method(receiver, method), place_root(receiver)) {
                    self.names.insert(root.to_string());
                }
            }
            _ => {}
        }
        walk_expr(self, expr);
    }
}

struct SelfMutationFinder {
    found: bool,
}

impl<'ast> Visitor<'ast> for SelfMutationFinder {
    fn visit_expr(&mut self, expr: &'ast Expr) {
        if self.found {
            return;
        }
        self.found = match &expr.kind {
            ExprKind::Assign { target, .. } => rooted_at_self(target),
            ExprKind::MethodCall {
                receiver, method, ..
            } => rooted_at_self(receiver) && mutating_method(receiver, method),
            _ => false,
        };
        walk_expr(self, expr);
    }

    fn visit_function(&mut self, _function: &'ast FunctionDecl) {}

    fn visit_class(&mut self, _class: &'ast ClassDecl) {}
}

struct RaiseFinder {
    found: bool,
}

impl<'ast> Visitor<'ast> for RaiseFinder {
    fn visit_stmt(&mut self, stmt: &'ast Stmt) {
        if self.found {
            return;
        }
        if let StmtKind::Raise {
            kind: RaiseKind::Error,
            ..
        } = stmt.kind
        {
            self.found = true;
            return;
        }
        walk_stmt(self, stmt);
    }

    fn visit_function(&mut self, _function: &'ast FunctionDecl) {}

    fn visit_class(&mut self, _class: &'ast ClassDecl) {}

    fn visit_lambda(&mut self, _lambda: &'ast Lambda) {}
}

struct EscapeFinder {
    loops: u32,
    found: bool,
}

impl<'ast> Visitor<'ast> for EscapeFinder {
    fn visit_stmt(&mut self, stmt: &'ast Stmt) {
        if self.found {
            return;
        }
        match stmt.kind {
            StmtKind::Return(_) => self.found = true,
            StmtKind::Break | StmtKind::Continue => self.found = self.loops == 0,
            StmtKind::While { .. } | StmtKind::For(_) => {
                self.loops += 1;
                walk_stmt(self, stmt);
                self.loops -= 1;
            }
            _ => walk_stmt(self, stmt),
        }
    }

    fn visit_function(&mut self, _function: &'ast FunctionDecl) {}

    fn visit_class(&mut self, _class: &'ast ClassDecl) {}

    fn visit_lambda(&mut self, _lambda: &'ast Lambda) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use faber_ir::{IfStmt, Param, Span};

    fn raise(kind: RaiseKind) -> Stmt {
        Stmt::raise(kind, Expr::string("fail"))
    }

    #[test]
    fn test_direct_raise() {
        assert!(body_raises(&Block::new(vec![raise(RaiseKind::Error)])));
    }

    #[test]
    fn test_fatal_raise_is_not_fallible() {
        assert!(!body_raises(&Block::new(vec![raise(RaiseKind::Fatal)])));
    }

    #[test]
    fn test_raise_nested_in_control_flow() {
        let if_stmt = Stmt::new(
            StmtKind::If(IfStmt {
                cond: Expr::bool(true),
                then: Block::new(vec![raise(RaiseKind::Error)]),
                otherwise: None,
            }),
            Span::DUMMY,
        );
        assert!(body_raises(&Block::new(vec![if_stmt])));
    }

    #[test]
    fn test_stops_at_nested_function() {
        let inner = FunctionDecl::new("inner", vec![], Block::new(vec![raise(RaiseKind::Error)]));
        assert!(!body_raises(&Block::new(vec![Stmt::function(inner)])));
    }

    #[test]
    fn test_stops_at_lambda() {
        let lambda = Expr::new(
            ExprKind::Lambda(Lambda {
                params: vec![Param::new("x", None)],
                ret: None,
                body: faber_ir::LambdaBody::Block(Block::new(vec![raise(RaiseKind::Error)])),
                is_async: false,
            }),
            Span::DUMMY,
        );
        assert!(!body_raises(&Block::new(vec![Stmt::expr(lambda)])));
    }

    #[test]
    fn test_mutated_bindings() {
        let lista = faber_ir::SemanticType::lista(faber_ir::SemanticType::primitive("numerus"));
        let program = Program::new(vec![
            Stmt::fixum("xs", Expr::array(vec![])),
            Stmt::fixum("ys", Expr::array(vec![])),
            Stmt::fixum("n", Expr::int(0)),
            Stmt::expr(Expr::method_call(
                Expr::ident("xs").with_type(lista.clone()),
                "adde",
                vec![Expr::int(1)],
            )),
            Stmt::expr(Expr::method_call(
                Expr::ident("ys").with_type(lista),
                "longitudo",
                vec![],
            )),
            Stmt::expr(Expr::assign(Expr::member(Expr::ident("p"), "x"), Expr::int(2))),
        ]);
        let names = mutated_bindings(&program);
        assert!(names.contains("xs"));
        assert!(names.contains("p"));
        assert!(!names.contains("ys"));
        assert!(!names.contains("n"));
    }

    #[test]
    fn test_body_mutates_self() {
        let this = || Expr::new(ExprKind::SelfRef, Span::DUMMY);
        let assigns = Block::new(vec![Stmt::expr(Expr::assign(
            Expr::member(this(), "n"),
            Expr::int(1),
        ))]);
        assert!(body_mutates_self(&assigns));
        let reads = Block::new(vec![Stmt::print(vec![Expr::member(this(), "n")])]);
        assert!(!body_mutates_self(&reads));
        let pushes = Block::new(vec![Stmt::expr(Expr::method_call(
            Expr::member(this(), "xs"),
            "adde",
            vec![Expr::int(1)],
        ))]);
        assert!(body_mutates_self(&pushes));
    }

    #[test]
    fn test_body_escapes() {
        let ret = Block::new(vec![Stmt::ret(Some(Expr::int(1)))]);
        assert!(body_escapes(&ret));
        let brk = Block::new(vec![Stmt::new(StmtKind::Break, Span::DUMMY)]);
        assert!(body_escapes(&brk));

        let inner_loop = Block::new(vec![Stmt::new(
            StmtKind::While {
                cond: Expr::bool(true),
                body: Block::new(vec![Stmt::new(StmtKind::Continue, Span::DUMMY)]),
            },
            Span::DUMMY,
        )]);
        assert!(!body_escapes(&inner_loop));

        let inner_fn = FunctionDecl::new("inner", vec![], ret);
        assert!(!body_escapes(&Block::new(vec![Stmt::function(inner_fn)])));
        assert!(!body_escapes(&Block::new(vec![raise(RaiseKind::Error)])));
    }
}
