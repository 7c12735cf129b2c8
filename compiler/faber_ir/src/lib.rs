//! Faber IR - the typed syntax tree handed to code generation.
//!
//! This crate contains the data the code generators consume:
//! - Spans for source locations
//! - Comments attached to statements
//! - Written type annotations and resolved semantic types
//! - Statement and expression nodes
//! - A read-only visitor
//!
//! The parser and semantic analyzer that produce these trees live outside
//! this crate. With the `serde` feature every node can be serialized so a
//! tree can cross a process boundary.

pub mod ast;
mod comment;
mod semantic;
mod span;
pub mod visitor;

pub use ast::{
    AssignOp, BinaryOp, BindingTarget, Block, CatchClause, ClassDecl, ComptimeBody, ElseBranch,
    EnumDecl, EnumMember, Expr, ExprKind, FieldDecl, ForKind, ForStmt, FunctionDecl, FunctionMode,
    GuardClause, IfStmt, ImportDecl, ImportItems, ImportName, InterfaceDecl, Lambda, LambdaBody,
    Literal, MatchArm, MatchStmt, MemberAccess, MethodSig, NewInit, ObjectEntry, Param,
    PrintLevel, Program, RaiseKind, ResourceKind, ResourceStmt, Stmt, StmtKind, SwitchCase,
    SwitchStmt, TemplatePart, TryStmt, TypeAliasDecl, TypeExpr, UnaryOp, UnionDecl, VarDecl,
    Variant, VariantBinding, VariantField,
};
pub use comment::{Comment, CommentKind, Comments};
pub use semantic::SemanticType;
pub use span::Span;
pub use visitor::Visitor;

#[cfg(all(test, feature = "serde"))]
mod serde_tests {
    use super::*;

    #[test]
    fn test_program_json_round_trip() {
        let program = Program::new(vec![Stmt::varia(
            "x",
            Expr::int(5).with_type(SemanticType::primitive("numerus")),
        )
        .with_leading(Comment::line("counter"))]);
        let json = serde_json::to_string(&program).unwrap_or_default();
        let back: Program = match serde_json::from_str(&json) {
            Ok(p) => p,
            Err(e) => panic!("deserialize failed: {e}"),
        };
        assert_eq!(back, program);
    }
}
