//! Per-target generators.
//!
//! Each target is a struct owning one [`GenContext`](crate::context::GenContext)
//! and implementing [`Generator`](crate::generator::Generator). The pieces
//! every target shares live here: built-in type classification, literal
//! spelling and block layout.

use faber_ir::{BinaryOp, Expr, ExprKind, Literal, SemanticType, TypeExpr, UnaryOp};

use crate::generator::GeneratedCode;
use crate::{CodegenError, CodegenResult, CodegenTarget, GenerateOptions};

pub(crate) mod cpp;
pub(crate) mod faber;
pub(crate) mod python;
pub(crate) mod rust;
pub(crate) mod typescript;
pub(crate) mod zig;

/// Lower `program` with the generator for `options.target`.
pub(crate) fn generate(
    program: &faber_ir::Program,
    options: &GenerateOptions,
) -> CodegenResult<GeneratedCode> {
    match options.target {
        CodegenTarget::TypeScript => typescript::generate(program, options),
        CodegenTarget::Python => python::generate(program, options),
        CodegenTarget::Zig => zig::generate(program, options),
        CodegenTarget::Rust => rust::generate(program, options),
        CodegenTarget::Cpp => cpp::generate(program, options),
        CodegenTarget::Faber => faber::generate(program, options),
    }
}

/// Built-in Faber type names.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) enum Builtin {
    Textus,
    Numerus,
    Fractus,
    Decimus,
    Bivalens,
    Nihil,
    Vacuum,
    Ignotum,
    Lista,
    Tabula,
    Copia,
    Promissum,
    Cursor,
    Fluxus,
}

impl Builtin {
    pub fn from_name(name: &str) -> Option<Self> {
        let builtin = match name {
            "textus" => Builtin::Textus,
            "numerus" => Builtin::Numerus,
            "fractus" => Builtin::Fractus,
            "decimus" => Builtin::Decimus,
            "bivalens" => Builtin::Bivalens,
            "nihil" => Builtin::Nihil,
            "vacuum" => Builtin::Vacuum,
            "ignotum" => Builtin::Ignotum,
            "lista" => Builtin::Lista,
            "tabula" => Builtin::Tabula,
            "copia" => Builtin::Copia,
            "promissum" => Builtin::Promissum,
            "cursor" => Builtin::Cursor,
            "fluxus" => Builtin::Fluxus,
            _ => return None,
        };
        Some(builtin)
    }
}

/// Built-in classification of a written type.
pub(crate) fn builtin_of(ty: &TypeExpr) -> Option<Builtin> {
    ty.name().and_then(Builtin::from_name)
}

/// Built-in classification of a resolved type.
pub(crate) fn semantic_builtin(ty: &SemanticType) -> Option<Builtin> {
    match ty {
        SemanticType::Primitive { name, .. } | SemanticType::Generic { name, .. } => {
            Builtin::from_name(name)
        }
        _ => None,
    }
}

/// Whether `expr` was resolved to the built-in `builtin`.
pub(crate) fn resolves_to(expr: &Expr, builtin: Builtin) -> bool {
    expr.resolved
        .as_ref()
        .and_then(semantic_builtin)
        .is_some_and(|b| b == builtin)
}

/// The written form of a resolved type, for targets that only map
/// annotations. Unknown, function and union types have no written form here.
pub(crate) fn semantic_to_type_expr(ty: &SemanticType) -> Option<TypeExpr> {
    match ty {
        SemanticType::Primitive { name, nullable } | SemanticType::User { name, nullable } => {
            Some(TypeExpr::Named {
                name: name.clone(),
                args: Vec::new(),
                nullable: *nullable,
            })
        }
        SemanticType::Generic {
            name,
            params,
            nullable,
        } => {
            let args = params
                .iter()
                .map(semantic_to_type_expr)
                .collect::<Option<Vec<_>>>()?;
            Some(TypeExpr::Named {
                name: name.clone(),
                args,
                nullable: *nullable,
            })
        }
        SemanticType::Function { .. } | SemanticType::Union(_) | SemanticType::Unknown { .. } => {
            None
        }
    }
}

/// Escape `text` for a double-quoted string literal.
pub(crate) fn escape_string(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out
}

/// `"text"`, escaped.
pub(crate) fn quoted(text: &str) -> String {
    format!("\"{}\"", escape_string(text))
}

/// Spelling of a float literal. Every target accepts Rust's shortest
/// round-trip form (`1.5`, `2.0`, `1e-7`).
pub(crate) fn float_literal(value: f64, target: CodegenTarget) -> CodegenResult<String> {
    if value.is_finite() {
        Ok(format!("{value:?}"))
    } else {
        Err(CodegenError::unsupported(
            format!("non-finite float literal `{value}`"),
            target,
        ))
    }
}

/// Spelling of an integer literal; identical on every target.
pub(crate) fn int_literal(value: i64) -> String {
    value.to_string()
}

/// `head {` + lines + `}` at `pad`, or `head {}` when empty. An empty head
/// gives a bare block.
pub(crate) fn brace_block(pad: &str, head: &str, lines: &[String]) -> String {
    let open = if head.is_empty() {
        "{".to_string()
    } else {
        format!("{head} {{")
    };
    if lines.is_empty() {
        format!("{pad}{open}}}")
    } else {
        format!("{pad}{open}\n{}\n{pad}}}", lines.join("\n"))
    }
}

/// Whether `expr` must be parenthesised when used as an operand.
pub(crate) fn needs_parens(expr: &Expr) -> bool {
    matches!(
        expr.kind,
        ExprKind::Binary { .. }
            | ExprKind::Assign { .. }
            | ExprKind::Conditional { .. }
            | ExprKind::Lambda(_)
            | ExprKind::Cede(_)
            | ExprKind::Cast { .. }
            | ExprKind::TypeCheck { .. }
    )
}

/// Whether a range iterates downward: its step is a negative literal.
pub(crate) fn descending(step: Option<&Expr>) -> bool {
    match step.map(|s| &s.unparen().kind) {
        Some(ExprKind::Literal(Literal::Integer(n))) => *n < 0,
        Some(ExprKind::Literal(Literal::Float(f))) => *f < 0.0,
        Some(ExprKind::Unary {
            op: UnaryOp::Neg, ..
        }) => true,
        _ => false,
    }
}

/// The comparison a counted loop continues on.
pub(crate) fn range_cmp(inclusive: bool, step: Option<&Expr>) -> BinaryOp {
    match (descending(step), inclusive) {
        (false, false) => BinaryOp::Lt,
        (false, true) => BinaryOp::LtEq,
        (true, false) => BinaryOp::Gt,
        (true, true) => BinaryOp::GtEq,
    }
}

/// `UnknownNodeKind` for a spread outside array, object or argument lists.
pub(crate) fn stray_spread() -> CodegenError {
    CodegenError::unknown("Spread", "expression position")
}

/// Identifier form of an error message: `"not found"` becomes `NotFound`.
pub(crate) fn error_ident(message: &str) -> String {
    let ident: String = message
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_ascii_uppercase().to_string() + chars.as_str()
            })
        })
        .collect();
    if ident.is_empty() || ident.starts_with(|c: char| c.is_ascii_digit()) {
        format!("Error{ident}")
    } else {
        ident
    }
}

#[cfg(test)]
mod tests;
