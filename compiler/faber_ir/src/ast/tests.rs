use super::*;
use crate::SemanticType;

#[test]
fn test_function_mode_flags() {
    assert!(!FunctionMode::Sync.is_async());
    assert!(!FunctionMode::Sync.is_generator());
    assert!(FunctionMode::Async.is_async());
    assert!(FunctionMode::Generator.is_generator());
    assert!(FunctionMode::AsyncGenerator.is_async());
    assert!(FunctionMode::AsyncGenerator.is_generator());
}

#[test]
fn test_kind_names() {
    assert_eq!(Expr::int(1).kind.name(), "Literal");
    assert_eq!(Expr::cede(Expr::ident("x")).kind.name(), "Cede");
    assert_eq!(Stmt::ret(None).kind.name(), "Return");
    assert_eq!(Stmt::varia("x", Expr::int(5)).kind.name(), "Var");
}

#[test]
fn test_with_type() {
    let e = Expr::ident("xs").with_type(SemanticType::lista(SemanticType::primitive("numerus")));
    let Some(ty) = &e.resolved else {
        panic!("resolved type should be attached");
    };
    assert_eq!(ty.generic_name(), Some("lista"));
}

#[test]
fn test_unparen() {
    let inner = Expr::int(3);
    let wrapped = Expr::new(
        ExprKind::Paren(Box::new(Expr::new(
            ExprKind::Paren(Box::new(inner.clone())),
            crate::Span::DUMMY,
        ))),
        crate::Span::DUMMY,
    );
    assert_eq!(wrapped.unparen(), &inner);
}

#[test]
fn test_type_expr_nullable() {
    let ty = TypeExpr::generic("lista", vec![TypeExpr::named("textus")]).nullable();
    let TypeExpr::Named { nullable, args, .. } = &ty else {
        panic!("expected named type");
    };
    assert!(*nullable);
    assert_eq!(args.len(), 1);
    assert_eq!(ty.name(), Some("lista"));
}

#[test]
fn test_binary_symbols() {
    assert_eq!(BinaryOp::And.symbol(), "&&");
    assert_eq!(BinaryOp::And.faber_symbol(), "et");
    assert_eq!(BinaryOp::Coalesce.faber_symbol(), "vel");
    assert_eq!(BinaryOp::Add.faber_symbol(), "+");
    assert!(BinaryOp::LtEq.is_comparison());
    assert!(!BinaryOp::Mul.is_comparison());
}
