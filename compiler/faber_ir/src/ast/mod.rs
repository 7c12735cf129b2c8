//! Syntax tree nodes.
//!
//! The tree is produced by the parser and annotated by semantic analysis;
//! code generation treats it as immutable. Node kinds are closed enums so
//! every generator's match over them is checked for exhaustiveness.

mod expr;
mod operators;
mod stmt;
mod types;

pub use expr::{
    ComptimeBody, Expr, ExprKind, Lambda, LambdaBody, Literal, MemberAccess, NewInit, ObjectEntry,
    TemplatePart,
};
pub use operators::{AssignOp, BinaryOp, UnaryOp};
pub use stmt::{
    BindingTarget, Block, CatchClause, ClassDecl, ElseBranch, EnumDecl, EnumMember, FieldDecl,
    ForKind, ForStmt, FunctionDecl, FunctionMode, GuardClause, IfStmt, ImportDecl, ImportItems,
    ImportName, InterfaceDecl, MatchArm, MatchStmt, MethodSig, Param, PrintLevel, RaiseKind,
    ResourceKind, ResourceStmt, Stmt, StmtKind, SwitchCase, SwitchStmt, TryStmt, TypeAliasDecl,
    UnionDecl, VarDecl, Variant, VariantBinding, VariantField,
};
pub use types::TypeExpr;

/// A whole source file.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Program {
    pub body: Vec<Stmt>,
}

impl Program {
    pub fn new(body: Vec<Stmt>) -> Self {
        Program { body }
    }
}

#[cfg(test)]
mod tests;
