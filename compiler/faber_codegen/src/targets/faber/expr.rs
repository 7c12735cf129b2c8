//! Expression re-emission.

use faber_ir::{
    BinaryOp, ComptimeBody, Expr, ExprKind, Lambda, LambdaBody, Literal, MemberAccess, NewInit,
    ObjectEntry, TemplatePart, UnaryOp,
};

use super::{ty, FaberGenerator};
use crate::generator::Generator;
use crate::targets::{float_literal, int_literal, needs_parens, quoted, stray_spread};
use crate::{CodegenResult, CodegenTarget};

impl FaberGenerator {
    pub(super) fn expr(&mut self, expr: &Expr) -> CodegenResult<String> {
        match &expr.kind {
            ExprKind::Literal(lit) => self.literal(lit),
            ExprKind::Template(parts) => self.template(parts),
            ExprKind::Ident(name) => Ok(name.clone()),
            ExprKind::SelfRef => Ok("ego".to_string()),
            ExprKind::Array(items) => Ok(format!("[{}]", self.list(items)?.join(", "))),
            ExprKind::Object(entries) => {
                if entries.is_empty() {
                    return Ok("{}".to_string());
                }
                let mut out = Vec::with_capacity(entries.len());
                for entry in entries {
                    out.push(match entry {
                        ObjectEntry::Field { key, value } => format!("{key}: {}", self.lower_expr(value)?),
                        ObjectEntry::Spread(inner) => format!("sparge {}", self.lower_expr(inner)?),
                    });
                }
                Ok(format!("{{ {} }}", out.join(", ")))
            }
            ExprKind::Range {
                start,
                end,
                step,
                inclusive,
            } => {
                let start = self.operand(start)?;
                let end = self.operand(end)?;
                let mut text = if *inclusive {
                    format!("{start} usque {end}")
                } else {
                    format!("{start}..{end}")
                };
                if let Some(step) = step {
                    text.push_str(&format!(" per {}", self.operand(step)?));
                }
                Ok(text)
            }
            ExprKind::Binary { op, left, right } => {
                let l = self.binary_operand(*op, left, false)?;
                let r = self.binary_operand(*op, right, true)?;
                Ok(format!("{l} {} {r}", op.faber_symbol()))
            }
            ExprKind::Unary { op, operand } => {
                let inner = self.operand(operand)?;
                Ok(match op {
                    UnaryOp::Neg => format!("-{inner}"),
                    UnaryOp::Not => format!("non {inner}"),
                    UnaryOp::BitNot => format!("~{inner}"),
                    UnaryOp::IsNull => format!("nulla {inner}"),
                    UnaryOp::IsNotNull => format!("nonnulla {inner}"),
                })
            }
            ExprKind::Assign { op, target, value } => {
                let target = self.lower_expr(target)?;
                let value = self.lower_expr(value)?;
                Ok(format!("{target} {} {value}", op.symbol()))
            }
            ExprKind::Conditional {
                cond,
                then,
                otherwise,
            } => {
                let cond = self.operand(cond)?;
                let then = self.operand(then)?;
                let otherwise = self.operand(otherwise)?;
                Ok(format!("{cond} sic {then} secus {otherwise}"))
            }
            ExprKind::Call { callee, args } => {
                let callee = self.operand(callee)?;
                Ok(format!("{callee}({})", self.list(args)?.join(", ")))
            }
            ExprKind::MethodCall {
                receiver,
                method,
                args,
                optional,
            } => {
                let receiver = self.operand(receiver)?;
                let dot = if *optional { "?." } else { "." };
                Ok(format!("{receiver}{dot}{method}({})", self.list(args)?.join(", ")))
            }
            ExprKind::Member {
                object,
                property,
                access,
            } => {
                let object = self.operand(object)?;
                let dot = match access {
                    MemberAccess::Plain => ".",
                    MemberAccess::Optional => "?.",
                    MemberAccess::NonNull => "!.",
                };
                Ok(format!("{object}{dot}{property}"))
            }
            ExprKind::Index { object, index } => {
                let object = self.operand(object)?;
                Ok(format!("{object}[{}]", self.lower_expr(index)?))
            }
            ExprKind::Lambda(lambda) => self.lambda(lambda),
            ExprKind::New { class, init } => match init {
                NewInit::Args(args) => Ok(format!("novum {class}({})", self.list(args)?.join(", "))),
                NewInit::Fields(fields) => {
                    let mut out = Vec::with_capacity(fields.len());
                    for (name, value) in fields {
                        out.push(format!("{name}: {}", self.lower_expr(value)?));
                    }
                    Ok(format!("novum {class} {{ {} }}", out.join(", ")))
                }
            },
            ExprKind::Cede(inner) => Ok(format!("cede {}", self.operand(inner)?)),
            ExprKind::TypeCheck {
                expr,
                ty: checked,
                negated,
            } => {
                let inner = self.operand(expr)?;
                let keyword = if *negated { "non est" } else { "est" };
                Ok(format!("{inner} {keyword} {}", ty(checked)))
            }
            ExprKind::Cast { expr, ty: target } => {
                Ok(format!("{} qua {}", self.operand(expr)?, ty(target)))
            }
            ExprKind::Native { expr, ty: native } => {
                Ok(format!("{} innatum {}", self.operand(expr)?, ty(native)))
            }
            ExprKind::Comptime(ComptimeBody::Expr(inner)) => {
                Ok(format!("praefixum({})", self.lower_expr(inner)?))
            }
            ExprKind::Comptime(ComptimeBody::Block(block)) => {
                let lines = self.lower_block_lines(block)?;
                let mut out = vec!["praefixum {".to_string()];
                out.extend(lines);
                out.push(format!("{}}}", self.ctx.pad()));
                Ok(out.join("\n"))
            }
            ExprKind::Spread(_) => Err(stray_spread()),
            ExprKind::Paren(inner) => Ok(format!("({})", self.lower_expr(inner)?)),
        }
    }

    pub(super) fn literal(&self, lit: &Literal) -> CodegenResult<String> {
        Ok(match lit {
            Literal::Integer(n) => int_literal(*n),
            Literal::Float(f) => float_literal(*f, CodegenTarget::Faber)?,
            Literal::String(s) => quoted(s),
            Literal::Bool(true) => "verum".to_string(),
            Literal::Bool(false) => "falsum".to_string(),
            Literal::Nil => "nihil".to_string(),
            Literal::Decimal(digits) => digits.clone(),
        })
    }

    fn operand(&mut self, expr: &Expr) -> CodegenResult<String> {
        let text = self.lower_expr(expr)?;
        Ok(if needs_parens(expr) { format!("({text})") } else { text })
    }

    /// Operand of a binary operator, parenthesised only where precedence
    /// requires it. Operators are left-associative.
    fn binary_operand(&mut self, parent: BinaryOp, expr: &Expr, right: bool) -> CodegenResult<String> {
        if let ExprKind::Binary { op, .. } = &expr.kind {
            let text = self.lower_expr(expr)?;
            let (inner, outer) = (precedence(*op), precedence(parent));
            let wrap = inner < outer || (right && inner == outer);
            return Ok(if wrap { format!("({text})") } else { text });
        }
        self.operand(expr)
    }

    /// Array elements or call arguments; spreads are allowed here.
    fn list(&mut self, items: &[Expr]) -> CodegenResult<Vec<String>> {
        let mut out = Vec::with_capacity(items.len());
        for item in items {
            out.push(match &item.kind {
                ExprKind::Spread(inner) => format!("sparge {}", self.operand(inner)?),
                _ => self.lower_expr(item)?,
            });
        }
        Ok(out)
    }

    fn template(&mut self, parts: &[TemplatePart]) -> CodegenResult<String> {
        let mut out = String::from("`");
        for part in parts {
            match part {
                TemplatePart::Text(text) => {
                    out.push_str(
                        &text
                            .replace('\\', "\\\\")
                            .replace('`', "\\`")
                            .replace("${", "\\${"),
                    );
                }
                TemplatePart::Expr(expr) => {
                    out.push_str(&format!("${{{}}}", self.lower_expr(expr)?));
                }
            }
        }
        out.push('`');
        Ok(out)
    }

    /// `pro x, y: body`, or `pro x { ... }` with a block body.
    fn lambda(&mut self, lambda: &Lambda) -> CodegenResult<String> {
        let params = self.params(&lambda.params)?;
        let mut head = if lambda.is_async { "futura pro".to_string() } else { "pro".to_string() };
        if !params.is_empty() {
            head.push(' ');
            head.push_str(&params);
        }
        if let Some(ret) = &lambda.ret {
            head.push_str(&format!(" -> {}", ty(ret)));
        }
        match &lambda.body {
            LambdaBody::Expr(body) => Ok(format!("{head}: {}", self.lower_expr(body)?)),
            LambdaBody::Block(block) => {
                let lines = self.lower_block_lines(block)?;
                let mut out = vec![format!("{head} {{")];
                out.extend(lines);
                out.push(format!("{}}}", self.ctx.pad()));
                Ok(out.join("\n"))
            }
        }
    }
}

/// Binding strength of a binary operator; higher binds tighter.
fn precedence(op: BinaryOp) -> u8 {
    match op {
        BinaryOp::Or | BinaryOp::Coalesce => 1,
        BinaryOp::And => 2,
        BinaryOp::Eq
        | BinaryOp::NotEq
        | BinaryOp::Lt
        | BinaryOp::LtEq
        | BinaryOp::Gt
        | BinaryOp::GtEq => 3,
        BinaryOp::BitOr => 4,
        BinaryOp::BitXor => 5,
        BinaryOp::BitAnd => 6,
        BinaryOp::Shl | BinaryOp::Shr => 7,
        BinaryOp::Add | BinaryOp::Sub => 8,
        BinaryOp::Mul | BinaryOp::Div | BinaryOp::Mod => 9,
    }
}
