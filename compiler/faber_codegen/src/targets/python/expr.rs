//! Expression lowering for Python.

use faber_ir::{
    BinaryOp, Expr, ExprKind, LambdaBody, Literal, MemberAccess, NewInit, ObjectEntry,
    TemplatePart, TypeExpr, UnaryOp,
};

use super::PythonGenerator;
use crate::context::Frame;
use crate::features::Features;
use crate::generator::Generator;
use crate::registry;
use crate::targets::{
    builtin_of, descending, float_literal, int_literal, needs_parens, quoted, resolves_to,
    stray_spread, Builtin,
};
use crate::{CodegenError, CodegenResult, CodegenTarget};

const TARGET: CodegenTarget = CodegenTarget::Python;

impl PythonGenerator {
    pub(super) fn expr(&mut self, expr: &Expr) -> CodegenResult<String> {
        match &expr.kind {
            ExprKind::Literal(lit) => self.literal(lit),
            ExprKind::Template(parts) => self.template(parts),
            ExprKind::Ident(name) => Ok(name.clone()),
            ExprKind::SelfRef => Ok("self".to_string()),
            ExprKind::Array(items) => Ok(format!("[{}]", self.items(items)?.join(", "))),
            ExprKind::Object(entries) => self.dict(entries),
            ExprKind::Range {
                start,
                end,
                step,
                inclusive,
            } => {
                let start = self.lower_expr(start)?;
                let end = self.operand(end)?;
                let end = match (*inclusive, descending(step.as_deref())) {
                    (false, _) => end,
                    (true, false) => format!("{end} + 1"),
                    (true, true) => format!("{end} - 1"),
                };
                match step {
                    Some(step) => {
                        let step = self.lower_expr(step)?;
                        Ok(format!("range({start}, {end}, {step})"))
                    }
                    None => Ok(format!("range({start}, {end})")),
                }
            }
            ExprKind::Binary { op, left, right } => self.binary(*op, left, right),
            ExprKind::Unary { op, operand } => {
                let inner = self.operand(operand)?;
                Ok(match op {
                    UnaryOp::Neg => format!("-{inner}"),
                    UnaryOp::Not => format!("not {inner}"),
                    UnaryOp::BitNot => format!("~{inner}"),
                    UnaryOp::IsNull => format!("{inner} is None"),
                    UnaryOp::IsNotNull => format!("{inner} is not None"),
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
                Ok(format!("{then} if {cond} else {otherwise}"))
            }
            ExprKind::Call { callee, args } => {
                let callee = self.operand(callee)?;
                Ok(format!("{callee}({})", self.items(args)?.join(", ")))
            }
            ExprKind::MethodCall {
                receiver,
                method,
                args,
                optional,
            } => {
                let recv = self.operand(receiver)?;
                let args = self.items(args)?;
                let call = match registry::lower_call(
                    &mut self.ctx,
                    receiver.resolved.as_ref(),
                    method,
                    &recv,
                    &args,
                    None,
                )? {
                    Some(code) => code,
                    None => format!("{recv}.{method}({})", args.join(", ")),
                };
                Ok(if *optional {
                    format!("({call} if {recv} is not None else None)")
                } else {
                    call
                })
            }
            ExprKind::Member {
                object,
                property,
                access,
            } => {
                let object = self.operand(object)?;
                Ok(match access {
                    MemberAccess::Plain | MemberAccess::NonNull => format!("{object}.{property}"),
                    MemberAccess::Optional => {
                        format!("({object}.{property} if {object} is not None else None)")
                    }
                })
            }
            ExprKind::Index { object, index } => {
                let object = self.operand(object)?;
                let index = self.lower_expr(index)?;
                Ok(format!("{object}[{index}]"))
            }
            ExprKind::Lambda(lambda) => {
                if lambda.is_async {
                    return Err(CodegenError::unsupported("async lambda", TARGET));
                }
                let LambdaBody::Expr(body) = &lambda.body else {
                    return Err(CodegenError::unsupported("lambda with a block body", TARGET));
                };
                let params: Vec<&str> = lambda.params.iter().map(|p| p.name.as_str()).collect();
                let (body, _) = self.with_frame(Frame::function(faber_ir::FunctionMode::Sync, false), |g| {
                    g.lower_expr(body)
                })?;
                if params.is_empty() {
                    Ok(format!("lambda: {body}"))
                } else {
                    Ok(format!("lambda {}: {body}", params.join(", ")))
                }
            }
            ExprKind::New { class, init } => self.new_expr(class, init),
            ExprKind::Cede(inner) => {
                if !self.ctx.frame.in_function {
                    return Err(CodegenError::unsupported("cede outside a function", TARGET));
                }
                let inner = self.operand(inner)?;
                if self.ctx.in_generator() {
                    Ok(format!("(yield {inner})"))
                } else {
                    self.ctx.require(Features::ASYNC);
                    Ok(format!("await {inner}"))
                }
            }
            ExprKind::TypeCheck { expr, ty, negated } => {
                let check = self.type_check(expr, ty)?;
                Ok(if *negated { format!("not {check}") } else { check })
            }
            // Casts are annotations only; the runtime value is unchanged.
            ExprKind::Cast { expr, .. } => self.lower_expr(expr),
            ExprKind::Native { expr, ty } => self.native(expr, ty),
            ExprKind::Comptime(_) => Err(CodegenError::unsupported("praefixum", TARGET)),
            ExprKind::Spread(_) => Err(stray_spread()),
            ExprKind::Paren(inner) => Ok(format!("({})", self.lower_expr(inner)?)),
        }
    }

    fn operand(&mut self, expr: &Expr) -> CodegenResult<String> {
        let text = self.lower_expr(expr)?;
        Ok(if needs_parens(expr) { format!("({text})") } else { text })
    }

    /// Arguments or elements; spreads become `*x`.
    pub(super) fn items(&mut self, items: &[Expr]) -> CodegenResult<Vec<String>> {
        let mut out = Vec::with_capacity(items.len());
        for item in items {
            out.push(match &item.kind {
                ExprKind::Spread(inner) => format!("*{}", self.operand(inner)?),
                _ => self.lower_expr(item)?,
            });
        }
        Ok(out)
    }

    fn literal(&mut self, lit: &Literal) -> CodegenResult<String> {
        Ok(match lit {
            Literal::Integer(n) => int_literal(*n),
            Literal::Float(f) => float_literal(*f, TARGET)?,
            Literal::String(s) => quoted(s),
            Literal::Bool(true) => "True".to_string(),
            Literal::Bool(false) => "False".to_string(),
            Literal::Nil => "None".to_string(),
            Literal::Decimal(digits) => {
                self.ctx.require(Features::DECIMAL);
                format!("Decimal({})", quoted(digits))
            }
        })
    }

    fn template(&mut self, parts: &[TemplatePart]) -> CodegenResult<String> {
        let mut out = String::from("f\"");
        for part in parts {
            match part {
                TemplatePart::Text(text) => {
                    let escaped = crate::targets::escape_string(text);
                    out.push_str(&escaped.replace('{', "{{").replace('}', "}}"));
                }
                TemplatePart::Expr(expr) => {
                    let expr = self.lower_expr(expr)?;
                    out.push_str(&format!("{{{expr}}}"));
                }
            }
        }
        out.push('"');
        Ok(out)
    }

    fn dict(&mut self, entries: &[ObjectEntry]) -> CodegenResult<String> {
        let mut out = Vec::with_capacity(entries.len());
        for entry in entries {
            out.push(match entry {
                ObjectEntry::Field { key, value } => {
                    format!("{}: {}", quoted(key), self.lower_expr(value)?)
                }
                ObjectEntry::Spread(inner) => format!("**{}", self.operand(inner)?),
            });
        }
        Ok(format!("{{{}}}", out.join(", ")))
    }

    fn binary(&mut self, op: BinaryOp, left: &Expr, right: &Expr) -> CodegenResult<String> {
        let l = self.operand(left)?;
        let r = self.operand(right)?;
        Ok(match op {
            BinaryOp::And => format!("{l} and {r}"),
            BinaryOp::Or => format!("{l} or {r}"),
            BinaryOp::Coalesce => format!("({l} if {l} is not None else {r})"),
            BinaryOp::Div
                if resolves_to(left, Builtin::Numerus) && resolves_to(right, Builtin::Numerus) =>
            {
                format!("{l} // {r}")
            }
            other => format!("{l} {} {r}", other.symbol()),
        })
    }

    fn new_expr(&mut self, class: &str, init: &NewInit) -> CodegenResult<String> {
        match init {
            NewInit::Args(args) => Ok(format!("{class}({})", self.items(args)?.join(", "))),
            NewInit::Fields(fields) => {
                let mut out = Vec::with_capacity(fields.len());
                for (name, value) in fields {
                    out.push(format!("{name}={}", self.lower_expr(value)?));
                }
                Ok(format!("{class}({})", out.join(", ")))
            }
        }
    }

    fn type_check(&mut self, expr: &Expr, ty: &TypeExpr) -> CodegenResult<String> {
        let inner = self.operand(expr)?;
        let class = match builtin_of(ty) {
            Some(Builtin::Nihil) => return Ok(format!("{inner} is None")),
            Some(Builtin::Textus) => "str",
            Some(Builtin::Numerus) => "int",
            Some(Builtin::Fractus) => "float",
            Some(Builtin::Bivalens) => "bool",
            Some(Builtin::Lista) => "list",
            Some(Builtin::Tabula) => "dict",
            Some(Builtin::Copia) => "set",
            Some(Builtin::Decimus) => {
                self.ctx.require(Features::DECIMAL);
                "Decimal"
            }
            Some(other) => {
                return Err(CodegenError::unsupported(
                    format!("est check against {other:?}"),
                    TARGET,
                ))
            }
            None => match ty.name() {
                Some(name) => name,
                None => return Err(CodegenError::unsupported("est check against a structural type", TARGET)),
            },
        };
        Ok(format!("isinstance({inner}, {class})"))
    }

    fn native(&mut self, expr: &Expr, ty: &TypeExpr) -> CodegenResult<String> {
        match (&expr.unparen().kind, builtin_of(ty)) {
            (ExprKind::Array(items), Some(Builtin::Copia)) => {
                self.ctx.require(Features::COPIA);
                if items.is_empty() {
                    Ok("set()".to_string())
                } else {
                    Ok(format!("{{{}}}", self.items(items)?.join(", ")))
                }
            }
            (ExprKind::Object(_), Some(Builtin::Tabula)) => {
                self.ctx.require(Features::TABULA);
                self.lower_expr(expr)
            }
            (ExprKind::Array(_), Some(Builtin::Lista)) => {
                self.ctx.require(Features::LISTA);
                self.lower_expr(expr)
            }
            _ => self.lower_expr(expr),
        }
    }
}
