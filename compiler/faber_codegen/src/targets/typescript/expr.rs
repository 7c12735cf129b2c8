//! Expression lowering for TypeScript.

use faber_ir::{
    BinaryOp, ComptimeBody, Expr, ExprKind, FunctionMode, Lambda, LambdaBody, Literal,
    MemberAccess, NewInit, ObjectEntry, TemplatePart, TypeExpr, UnaryOp,
};

use super::TypeScriptGenerator;
use crate::context::Frame;
use crate::features::Features;
use crate::generator::Generator;
use crate::registry;
use crate::targets::{builtin_of, float_literal, int_literal, needs_parens, quoted, stray_spread, Builtin};
use crate::{CodegenError, CodegenResult, CodegenTarget};

const TARGET: CodegenTarget = CodegenTarget::TypeScript;

impl TypeScriptGenerator {
    pub(super) fn expr(&mut self, expr: &Expr) -> CodegenResult<String> {
        match &expr.kind {
            ExprKind::Literal(lit) => self.literal(lit),
            ExprKind::Template(parts) => self.template(parts),
            ExprKind::Ident(name) => Ok(name.clone()),
            ExprKind::SelfRef => Ok("this".to_string()),
            ExprKind::Array(items) => Ok(format!("[{}]", self.call_args(items)?)),
            ExprKind::Object(entries) => self.object(entries),
            ExprKind::Range { .. } => Err(CodegenError::unsupported("range expression outside a loop header", TARGET)),
            ExprKind::Binary { op, left, right } => {
                let left = self.operand(left)?;
                let right = self.operand(right)?;
                let op = match op {
                    BinaryOp::Eq => "===",
                    BinaryOp::NotEq => "!==",
                    other => other.symbol(),
                };
                Ok(format!("{left} {op} {right}"))
            }
            ExprKind::Unary { op, operand } => {
                let inner = self.operand(operand)?;
                Ok(match op {
                    UnaryOp::Neg => format!("-{inner}"),
                    UnaryOp::Not => format!("!{inner}"),
                    UnaryOp::BitNot => format!("~{inner}"),
                    UnaryOp::IsNull => format!("({inner} == null)"),
                    UnaryOp::IsNotNull => format!("({inner} != null)"),
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
                Ok(format!("{cond} ? {then} : {otherwise}"))
            }
            ExprKind::Call { callee, args } => {
                let callee = self.operand(callee)?;
                Ok(format!("{callee}({})", self.call_args(args)?))
            }
            ExprKind::MethodCall {
                receiver,
                method,
                args,
                optional,
            } => self.method_call(receiver, method, args, *optional),
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
                let index = self.lower_expr(index)?;
                Ok(format!("{object}[{index}]"))
            }
            ExprKind::Lambda(lambda) => self.lambda(lambda),
            ExprKind::New { class, init } => self.new_expr(class, init),
            ExprKind::Cede(inner) => {
                let inner = self.operand(inner)?;
                if self.ctx.in_generator() {
                    self.ctx.require(Features::GENERATOR);
                    Ok(format!("yield {inner}"))
                } else {
                    self.ctx.require(Features::ASYNC);
                    Ok(format!("await {inner}"))
                }
            }
            ExprKind::TypeCheck { expr, ty, negated } => {
                let check = self.type_check(expr, ty)?;
                Ok(if *negated { format!("!({check})") } else { check })
            }
            ExprKind::Cast { expr, ty } => {
                let inner = self.operand(expr)?;
                let ty = self.ty(ty)?;
                Ok(format!("{inner} as {ty}"))
            }
            ExprKind::Native { expr, ty } => self.native(expr, ty),
            ExprKind::Comptime(body) => {
                let construct = match body {
                    ComptimeBody::Expr(_) => "praefixum expression",
                    ComptimeBody::Block(_) => "praefixum block",
                };
                Err(CodegenError::unsupported(construct, TARGET))
            }
            ExprKind::Spread(_) => Err(stray_spread()),
            ExprKind::Paren(inner) => Ok(format!("({})", self.lower_expr(inner)?)),
        }
    }

    /// Lower `expr` for use as an operand, parenthesised when it binds loosely.
    fn operand(&mut self, expr: &Expr) -> CodegenResult<String> {
        let text = self.lower_expr(expr)?;
        Ok(if needs_parens(expr) { format!("({text})") } else { text })
    }

    /// Argument or element list, with spreads.
    pub(super) fn call_args(&mut self, args: &[Expr]) -> CodegenResult<String> {
        let mut out = Vec::with_capacity(args.len());
        for arg in args {
            out.push(match &arg.kind {
                ExprKind::Spread(inner) => format!("...{}", self.operand(inner)?),
                _ => self.lower_expr(arg)?,
            });
        }
        Ok(out.join(", "))
    }

    fn literal(&mut self, lit: &Literal) -> CodegenResult<String> {
        Ok(match lit {
            Literal::Integer(n) => int_literal(*n),
            Literal::Float(f) => float_literal(*f, TARGET)?,
            Literal::String(s) => quoted(s),
            Literal::Bool(b) => b.to_string(),
            Literal::Nil => "null".to_string(),
            Literal::Decimal(digits) => {
                self.ctx.require(Features::DECIMAL);
                format!("new Decimal({})", quoted(digits))
            }
        })
    }

    fn template(&mut self, parts: &[TemplatePart]) -> CodegenResult<String> {
        let mut out = String::from("`");
        for part in parts {
            match part {
                TemplatePart::Text(text) => {
                    out.push_str(&text.replace('\\', "\\\\").replace('`', "\\`").replace("${", "\\${"));
                }
                TemplatePart::Expr(expr) => {
                    let expr = self.lower_expr(expr)?;
                    out.push_str(&format!("${{{expr}}}"));
                }
            }
        }
        out.push('`');
        Ok(out)
    }

    fn object(&mut self, entries: &[ObjectEntry]) -> CodegenResult<String> {
        if entries.is_empty() {
            return Ok("{}".to_string());
        }
        let mut fields = Vec::with_capacity(entries.len());
        for entry in entries {
            fields.push(match entry {
                ObjectEntry::Field { key, value } => format!("{key}: {}", self.lower_expr(value)?),
                ObjectEntry::Spread(inner) => format!("...{}", self.operand(inner)?),
            });
        }
        Ok(format!("{{ {} }}", fields.join(", ")))
    }

    fn method_call(
        &mut self,
        receiver: &Expr,
        method: &str,
        args: &[Expr],
        optional: bool,
    ) -> CodegenResult<String> {
        let recv = self.operand(receiver)?;
        let lowered = args
            .iter()
            .map(|a| match &a.kind {
                ExprKind::Spread(inner) => Ok(format!("...{}", self.operand(inner)?)),
                _ => self.lower_expr(a),
            })
            .collect::<CodegenResult<Vec<_>>>()?;
        if let Some(code) =
            registry::lower_call(&mut self.ctx, receiver.resolved.as_ref(), method, &recv, &lowered, None)?
        {
            return Ok(code);
        }
        let dot = if optional { "?." } else { "." };
        Ok(format!("{recv}{dot}{method}({})", lowered.join(", ")))
    }

    fn lambda(&mut self, lambda: &Lambda) -> CodegenResult<String> {
        let mode = if lambda.is_async {
            self.ctx.require(Features::ASYNC);
            FunctionMode::Async
        } else {
            FunctionMode::Sync
        };
        let params = self.params(&lambda.params)?;
        let ret = match &lambda.ret {
            Some(ret) => format!(": {}", self.ty(ret)?),
            None => String::new(),
        };
        let prefix = if lambda.is_async { "async " } else { "" };
        let (body, _) = self.with_frame(Frame::function(mode, false), |g| match &lambda.body {
            LambdaBody::Expr(body) => {
                let text = g.lower_expr(body)?;
                Ok(if matches!(body.unparen().kind, ExprKind::Object(_)) {
                    format!("({text})")
                } else {
                    text
                })
            }
            LambdaBody::Block(block) => {
                let lines = g.lower_block_lines(block)?;
                Ok(crate::targets::brace_block(&g.ctx.pad(), "", &lines)
                    .trim_start()
                    .to_string())
            }
        })?;
        Ok(format!("{prefix}({params}){ret} => {body}"))
    }

    fn new_expr(&mut self, class: &str, init: &NewInit) -> CodegenResult<String> {
        if let Some(variant) = self.ctx.variant(class) {
            let names = variant.fields.clone();
            let mut fields = vec![format!("tag: {}", quoted(class))];
            match init {
                NewInit::Fields(values) => {
                    for (name, value) in values {
                        fields.push(format!("{name}: {}", self.lower_expr(value)?));
                    }
                }
                NewInit::Args(args) => {
                    for (name, value) in names.iter().zip(args) {
                        fields.push(format!("{name}: {}", self.lower_expr(value)?));
                    }
                }
            }
            return Ok(format!("{{ {} }}", fields.join(", ")));
        }
        match init {
            NewInit::Args(args) => Ok(format!("new {class}({})", self.call_args(args)?)),
            NewInit::Fields(values) if values.is_empty() => Ok(format!("new {class}()")),
            NewInit::Fields(values) => {
                let mut fields = Vec::with_capacity(values.len());
                for (name, value) in values {
                    fields.push(format!("{name}: {}", self.lower_expr(value)?));
                }
                Ok(format!("Object.assign(new {class}(), {{ {} }})", fields.join(", ")))
            }
        }
    }

    fn type_check(&mut self, expr: &Expr, ty: &TypeExpr) -> CodegenResult<String> {
        let inner = self.operand(expr)?;
        let typeof_check = |name: &str| format!("typeof {inner} === {}", quoted(name));
        Ok(match builtin_of(ty) {
            Some(Builtin::Textus) => typeof_check("string"),
            Some(Builtin::Numerus | Builtin::Fractus) => typeof_check("number"),
            Some(Builtin::Bivalens) => typeof_check("boolean"),
            Some(Builtin::Nihil) => format!("{inner} === null"),
            Some(Builtin::Lista) => format!("Array.isArray({inner})"),
            Some(Builtin::Tabula) => format!("{inner} instanceof Map"),
            Some(Builtin::Copia) => format!("{inner} instanceof Set"),
            Some(Builtin::Decimus) => {
                self.ctx.require(Features::DECIMAL);
                format!("{inner} instanceof Decimal")
            }
            Some(other) => {
                return Err(CodegenError::unsupported(
                    format!("est check against {other:?}"),
                    TARGET,
                ))
            }
            None => match ty.name() {
                Some(name) if self.ctx.variant(name).is_some() => {
                    format!("{inner}.tag === {}", quoted(name))
                }
                Some(name) => format!("{inner} instanceof {name}"),
                None => return Err(CodegenError::unsupported("est check against a structural type", TARGET)),
            },
        })
    }

    fn native(&mut self, expr: &Expr, ty: &TypeExpr) -> CodegenResult<String> {
        let builtin = builtin_of(ty);
        match (&expr.unparen().kind, builtin) {
            (ExprKind::Array(items), Some(Builtin::Copia)) => {
                self.ctx.require(Features::COPIA);
                if items.is_empty() {
                    Ok("new Set()".to_string())
                } else {
                    Ok(format!("new Set([{}])", self.call_args(items)?))
                }
            }
            (ExprKind::Object(entries), Some(Builtin::Tabula)) => {
                self.ctx.require(Features::TABULA);
                let mut pairs = Vec::with_capacity(entries.len());
                for entry in entries {
                    match entry {
                        ObjectEntry::Field { key, value } => {
                            pairs.push(format!("[{}, {}]", quoted(key), self.lower_expr(value)?));
                        }
                        ObjectEntry::Spread(inner) => {
                            pairs.push(format!("...{}", self.operand(inner)?));
                        }
                    }
                }
                if pairs.is_empty() {
                    Ok("new Map()".to_string())
                } else {
                    Ok(format!("new Map([{}])", pairs.join(", ")))
                }
            }
            (ExprKind::Array(_), Some(Builtin::Lista)) => {
                self.ctx.require(Features::LISTA);
                self.lower_expr(expr)
            }
            _ => {
                let inner = self.operand(expr)?;
                let ty = self.ty(ty)?;
                Ok(format!("{inner} as {ty}"))
            }
        }
    }
}
