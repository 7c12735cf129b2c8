//! Expression lowering for C++.

use faber_ir::{
    BinaryOp, ComptimeBody, Expr, ExprKind, FunctionMode, Lambda, LambdaBody, Literal,
    MemberAccess, NewInit, ObjectEntry, SemanticType, TemplatePart, TypeExpr, UnaryOp,
};

use super::CppGenerator;
use crate::context::Frame;
use crate::features::Features;
use crate::generator::Generator;
use crate::registry;
use crate::targets::{
    builtin_of, descending, escape_string, float_literal, int_literal, needs_parens, quoted,
    resolves_to, stray_spread, Builtin,
};
use crate::{CodegenError, CodegenResult, CodegenTarget};

const TARGET: CodegenTarget = CodegenTarget::Cpp;

impl CppGenerator<'_> {
    pub(super) fn expr(&mut self, expr: &Expr) -> CodegenResult<String> {
        match &expr.kind {
            ExprKind::Literal(lit) => self.literal(lit),
            ExprKind::Template(parts) => self.template(parts),
            ExprKind::Ident(name) => Ok(name.clone()),
            ExprKind::SelfRef => Ok("*this".to_string()),
            ExprKind::Array(items) => {
                if items.iter().any(|i| matches!(i.kind, ExprKind::Spread(_))) {
                    return Err(CodegenError::unsupported("sparge in a lista literal", TARGET));
                }
                self.ctx.require(Features::LISTA);
                let items = self.lower_exprs(items)?;
                if items.is_empty() {
                    let elem = self.element_ty(expr.resolved.as_ref(), 0);
                    return Ok(format!("std::vector<{elem}>{{}}"));
                }
                Ok(format!("std::vector{{{}}}", items.join(", ")))
            }
            ExprKind::Object(entries) => self.designated_init(entries, expr.resolved.as_ref()),
            ExprKind::Range {
                start,
                end,
                step,
                inclusive,
            } => {
                if descending(step.as_deref()) {
                    return Err(CodegenError::unsupported("descending range value", TARGET));
                }
                self.ctx.require(Features::RANGES);
                let start = self.lower_expr(start)?;
                let end = self.operand(end)?;
                let end = if *inclusive { format!("{end} + 1") } else { end };
                let mut range = format!("std::views::iota({start}, {end})");
                if let Some(step) = step {
                    range.push_str(&format!(" | std::views::stride({})", self.lower_expr(step)?));
                }
                Ok(range)
            }
            ExprKind::Binary { op, left, right } => self.binary(*op, left, right),
            ExprKind::Unary { op, operand } => {
                let inner = self.operand(operand)?;
                let sized = [Builtin::Textus, Builtin::Lista, Builtin::Tabula, Builtin::Copia]
                    .into_iter()
                    .any(|b| resolves_to(operand, b));
                Ok(match op {
                    UnaryOp::Neg => format!("-{inner}"),
                    UnaryOp::Not => format!("!{inner}"),
                    UnaryOp::BitNot => format!("~{inner}"),
                    UnaryOp::IsNull if sized => format!("{inner}.empty()"),
                    UnaryOp::IsNotNull if sized => format!("!{inner}.empty()"),
                    UnaryOp::IsNull => format!("!{inner}.has_value()"),
                    UnaryOp::IsNotNull => format!("{inner}.has_value()"),
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
                let args = self.args(args)?;
                Ok(format!("{callee}({})", args.join(", ")))
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
                match &object.unparen().kind {
                    ExprKind::Ident(name) if self.ctx.is_enum(name) => {
                        return Ok(format!("{name}::{property}"));
                    }
                    ExprKind::SelfRef => return Ok(format!("this->{property}")),
                    _ => {}
                }
                let object = self.operand(object)?;
                Ok(match access {
                    MemberAccess::Plain => format!("{object}.{property}"),
                    MemberAccess::NonNull => format!("{object}.value().{property}"),
                    MemberAccess::Optional => {
                        self.ctx.require(Features::OPTIONAL);
                        format!("{object}.transform([](const auto& v) {{ return v.{property}; }})")
                    }
                })
            }
            ExprKind::Index { object, index } => {
                let lowered = self.operand(object)?;
                let index = self.lower_expr(index)?;
                if resolves_to(object, Builtin::Tabula) {
                    Ok(format!("{lowered}.at({index})"))
                } else {
                    Ok(format!("{lowered}[{index}]"))
                }
            }
            ExprKind::Lambda(lambda) => self.lambda(lambda),
            ExprKind::New { class, init } => self.new_expr(class, init),
            ExprKind::Cede(inner) => {
                let inner = self.operand(inner)?;
                if self.ctx.in_generator() {
                    Ok(format!("co_yield {inner}"))
                } else if self.ctx.in_async() {
                    self.ctx.require(Features::ASYNC);
                    Ok(format!("{inner}.get()"))
                } else {
                    Err(CodegenError::unsupported("cede outside a futura function", TARGET))
                }
            }
            ExprKind::TypeCheck { expr, ty, negated } => {
                let check = self.type_check(expr, ty)?;
                Ok(if *negated { format!("!{check}") } else { check })
            }
            ExprKind::Cast { expr, ty } => {
                let inner = self.lower_expr(expr)?;
                match builtin_of(ty) {
                    Some(Builtin::Numerus | Builtin::Fractus | Builtin::Bivalens) => {
                        Ok(format!("static_cast<{}>({inner})", self.ty(ty)?))
                    }
                    Some(Builtin::Textus) => {
                        self.ctx.require(Features::STRING);
                        Ok(format!("std::to_string({inner})"))
                    }
                    _ => Ok(format!("{}({inner})", self.ty(ty)?)),
                }
            }
            ExprKind::Native { expr, ty } => self.native(expr, ty),
            ExprKind::Comptime(body) => self.comptime(body),
            ExprKind::Spread(_) => Err(stray_spread()),
            ExprKind::Paren(inner) => Ok(format!("({})", self.lower_expr(inner)?)),
        }
    }

    fn literal(&mut self, lit: &Literal) -> CodegenResult<String> {
        Ok(match lit {
            Literal::Integer(n) => int_literal(*n),
            Literal::Float(f) => float_literal(*f, TARGET)?,
            Literal::String(s) => quoted(s),
            Literal::Bool(b) => b.to_string(),
            Literal::Nil => {
                self.ctx.require(Features::OPTIONAL);
                "std::nullopt".to_string()
            }
            Literal::Decimal(_) => return Err(CodegenError::unsupported("decimus literal", TARGET)),
        })
    }

    fn operand(&mut self, expr: &Expr) -> CodegenResult<String> {
        let text = self.lower_expr(expr)?;
        Ok(if needs_parens(expr) { format!("({text})") } else { text })
    }

    fn args(&mut self, args: &[Expr]) -> CodegenResult<Vec<String>> {
        let mut out = Vec::with_capacity(args.len());
        for arg in args {
            if let ExprKind::Spread(_) = arg.kind {
                return Err(CodegenError::unsupported("sparge in a call", TARGET));
            }
            out.push(self.lower_expr(arg)?);
        }
        Ok(out)
    }

    /// The C++ spelling of type argument `index` of a resolved container,
    /// `std::any` when unknown.
    fn element_ty(&mut self, resolved: Option<&SemanticType>, index: usize) -> String {
        resolved
            .and_then(|t| t.type_params().get(index).cloned())
            .and_then(|t| self.semantic_ty(&t))
            .unwrap_or_else(|| {
                self.ctx.require(Features::ANY);
                "std::any".to_string()
            })
    }

    fn method_call(
        &mut self,
        receiver: &Expr,
        method: &str,
        args: &[Expr],
        optional: bool,
    ) -> CodegenResult<String> {
        let args = self.args(args)?;
        if let ExprKind::SelfRef = receiver.unparen().kind {
            return Ok(format!("this->{method}({})", args.join(", ")));
        }
        let recv = self.operand(receiver)?;
        let elem = receiver
            .resolved
            .as_ref()
            .and_then(|t| t.type_params().first().cloned())
            .and_then(|t| self.semantic_ty(&t));
        if let Some(code) = registry::lower_call(
            &mut self.ctx,
            receiver.resolved.as_ref(),
            method,
            &recv,
            &args,
            elem.as_deref(),
        )? {
            return Ok(code);
        }
        if optional {
            self.ctx.require(Features::OPTIONAL);
            return Ok(format!(
                "{recv}.transform([&](auto& v) {{ return v.{method}({}); }})",
                args.join(", ")
            ));
        }
        Ok(format!("{recv}.{method}({})", args.join(", ")))
    }

    fn template(&mut self, parts: &[TemplatePart]) -> CodegenResult<String> {
        let mut format = String::new();
        let mut values = Vec::new();
        for part in parts {
            match part {
                TemplatePart::Text(text) => {
                    format.push_str(&escape_string(text).replace('{', "{{").replace('}', "}}"));
                }
                TemplatePart::Expr(expr) => {
                    format.push_str("{}");
                    values.push(self.lower_expr(expr)?);
                }
            }
        }
        self.ctx.require(Features::FORMAT | Features::STRING);
        let mut text = format!("std::format(\"{format}\"");
        for value in values {
            text.push_str(", ");
            text.push_str(&value);
        }
        text.push(')');
        Ok(text)
    }

    /// `Name{.a = 1, .b = 2}`; needs a resolved class type.
    fn designated_init(
        &mut self,
        entries: &[ObjectEntry],
        resolved: Option<&SemanticType>,
    ) -> CodegenResult<String> {
        let Some(SemanticType::User { name, .. }) = resolved else {
            return Err(CodegenError::unsupported(
                "object literal without a declared type",
                TARGET,
            ));
        };
        let mut fields = Vec::with_capacity(entries.len());
        for entry in entries {
            match entry {
                ObjectEntry::Field { key, value } => {
                    fields.push(format!(".{key} = {}", self.lower_expr(value)?));
                }
                ObjectEntry::Spread(_) => {
                    return Err(CodegenError::unsupported("sparge in an object literal", TARGET))
                }
            }
        }
        Ok(format!("{name}{{{}}}", fields.join(", ")))
    }

    fn binary(&mut self, op: BinaryOp, left: &Expr, right: &Expr) -> CodegenResult<String> {
        match op {
            BinaryOp::Coalesce => {
                self.ctx.require(Features::OPTIONAL);
                let l = self.operand(left)?;
                let r = self.lower_expr(right)?;
                Ok(format!("{l}.value_or({r})"))
            }
            BinaryOp::Add
                if matches!(left.unparen().kind, ExprKind::Literal(Literal::String(_))) =>
            {
                self.ctx.require(Features::STRING);
                let l = self.lower_expr(left)?;
                let r = self.operand(right)?;
                Ok(format!("std::string({l}) + {r}"))
            }
            other => {
                let l = self.operand(left)?;
                let r = self.operand(right)?;
                Ok(format!("{l} {} {r}", other.symbol()))
            }
        }
    }

    /// `[&](auto x) { return e; }`. Lambdas capture by reference.
    fn lambda(&mut self, lambda: &Lambda) -> CodegenResult<String> {
        if lambda.is_async {
            return Err(CodegenError::unsupported("futura lambda", TARGET));
        }
        let mut params = Vec::with_capacity(lambda.params.len());
        for param in &lambda.params {
            let ty = match &param.ty {
                Some(ty) => self.ty(ty)?,
                None => "auto".to_string(),
            };
            params.push(format!("{ty} {}", param.name));
        }
        let ret = match &lambda.ret {
            Some(ret) => format!(" -> {}", self.ty(ret)?),
            None => String::new(),
        };
        let head = format!("[&]({}){ret}", params.join(", "));
        let frame = Frame::function(FunctionMode::Sync, false);
        match &lambda.body {
            LambdaBody::Expr(body) => {
                let (body, _) = self.with_frame(frame, |g| g.lower_expr(body))?;
                Ok(format!("{head} {{ return {body}; }}"))
            }
            LambdaBody::Block(block) => {
                let (lines, _) = self.with_frame(frame, |g| g.lower_block_lines(block))?;
                let mut out = vec![format!("{head} {{")];
                out.extend(lines);
                out.push(format!("{}}}", self.ctx.pad()));
                Ok(out.join("\n"))
            }
        }
    }

    fn new_expr(&mut self, class: &str, init: &NewInit) -> CodegenResult<String> {
        let is_variant = self.ctx.variant(class).is_some();
        match init {
            NewInit::Args(args) if is_variant => {
                Ok(format!("{class}{{{}}}", self.args(args)?.join(", ")))
            }
            NewInit::Args(args) => Ok(format!("{class}({})", self.args(args)?.join(", "))),
            NewInit::Fields(fields) => {
                let mut out = Vec::with_capacity(fields.len());
                for (name, value) in fields {
                    out.push(format!(".{name} = {}", self.lower_expr(value)?));
                }
                Ok(format!("{class}{{{}}}", out.join(", ")))
            }
        }
    }

    fn type_check(&mut self, expr: &Expr, ty: &TypeExpr) -> CodegenResult<String> {
        let inner = self.lower_expr(expr)?;
        if let Some(name) = ty.name().filter(|n| self.ctx.variant(n).is_some()) {
            self.ctx.require(Features::VARIANT);
            return Ok(format!("std::holds_alternative<{name}>({inner})"));
        }
        if builtin_of(ty) == Some(Builtin::Nihil) {
            return Ok(format!("!{inner}.has_value()"));
        }
        let ty = self.ty(ty)?;
        if resolves_to(expr, Builtin::Ignotum) {
            return Ok(format!("{inner}.type() == typeid({ty})"));
        }
        Ok(format!("std::is_same_v<std::decay_t<decltype({inner})>, {ty}>"))
    }

    /// Container literals spelled with their full type.
    fn native(&mut self, expr: &Expr, ty: &TypeExpr) -> CodegenResult<String> {
        match (&expr.unparen().kind, builtin_of(ty)) {
            (ExprKind::Array(items), Some(Builtin::Lista | Builtin::Copia)) => {
                let ty = self.ty(ty)?;
                let items = self.args(items)?;
                Ok(format!("{ty}{{{}}}", items.join(", ")))
            }
            (ExprKind::Object(entries), Some(Builtin::Tabula)) => {
                let ty = self.ty(ty)?;
                let mut pairs = Vec::with_capacity(entries.len());
                for entry in entries {
                    match entry {
                        ObjectEntry::Field { key, value } => {
                            pairs.push(format!("{{{}, {}}}", quoted(key), self.lower_expr(value)?));
                        }
                        ObjectEntry::Spread(_) => {
                            return Err(CodegenError::unsupported("sparge in a tabula literal", TARGET))
                        }
                    }
                }
                Ok(format!("{ty}{{{}}}", pairs.join(", ")))
            }
            _ => self.lower_expr(expr),
        }
    }

    /// An immediately invoked `consteval` lambda.
    fn comptime(&mut self, body: &ComptimeBody) -> CodegenResult<String> {
        self.ctx.require(Features::COMPTIME);
        let frame = Frame::function(FunctionMode::Sync, false);
        match body {
            ComptimeBody::Expr(inner) => {
                let (inner, _) = self.with_frame(frame, |g| g.lower_expr(inner))?;
                Ok(format!("[]() consteval {{ return {inner}; }}()"))
            }
            ComptimeBody::Block(block) => {
                let (lines, _) = self.with_frame(frame, |g| g.lower_block_lines(block))?;
                let mut out = vec!["[]() consteval {".to_string()];
                out.extend(lines);
                out.push(format!("{}}}()", self.ctx.pad()));
                Ok(out.join("\n"))
            }
        }
    }
}
