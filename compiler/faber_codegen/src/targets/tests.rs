use pretty_assertions::assert_eq;

use super::*;

#[test]
fn test_builtin_from_name() {
    assert_eq!(Builtin::from_name("numerus"), Some(Builtin::Numerus));
    assert_eq!(Builtin::from_name("tabula"), Some(Builtin::Tabula));
    assert_eq!(Builtin::from_name("Persona"), None);
}

#[test]
fn test_escape_string() {
    assert_eq!(escape_string("a\"b\\c\nd"), "a\\\"b\\\\c\\nd");
    assert_eq!(quoted("salve"), "\"salve\"");
}

#[test]
fn test_float_literal() {
    assert_eq!(float_literal(1.5, CodegenTarget::Zig).unwrap(), "1.5");
    assert_eq!(float_literal(2.0, CodegenTarget::Python).unwrap(), "2.0");
    assert!(float_literal(f64::NAN, CodegenTarget::Rust).is_err());
}

#[test]
fn test_brace_block() {
    assert_eq!(brace_block("", "if (x)", &[]), "if (x) {}");
    assert_eq!(brace_block("", "", &[]), "{}");
    assert_eq!(
        brace_block("  ", "while (x)", &["    f();".to_string()]),
        "  while (x) {\n    f();\n  }"
    );
}

#[test]
fn test_range_cmp() {
    assert_eq!(range_cmp(false, None), BinaryOp::Lt);
    assert_eq!(range_cmp(true, None), BinaryOp::LtEq);
    let down = Expr::int(-1);
    assert_eq!(range_cmp(false, Some(&down)), BinaryOp::Gt);
    assert_eq!(range_cmp(true, Some(&down)), BinaryOp::GtEq);
}

#[test]
fn test_error_ident() {
    assert_eq!(error_ident("not found"), "NotFound");
    assert_eq!(error_ident("bad-input!"), "BadInput");
    assert_eq!(error_ident(""), "Error");
    assert_eq!(error_ident("404"), "Error404");
}

#[test]
fn test_semantic_to_type_expr() {
    let ty = SemanticType::lista(SemanticType::primitive("numerus"));
    assert_eq!(
        semantic_to_type_expr(&ty),
        Some(TypeExpr::generic("lista", vec![TypeExpr::named("numerus")]))
    );
    assert_eq!(semantic_to_type_expr(&SemanticType::unknown()), None);
}
