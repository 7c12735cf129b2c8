//! Expression lowering for Zig.

use faber_ir::{
    BinaryOp, ComptimeBody, Expr, ExprKind, FunctionMode, Lambda, LambdaBody, Literal,
    MemberAccess, NewInit, ObjectEntry, SemanticType, TemplatePart, TypeExpr, UnaryOp,
};

use super::stmt::format_spec;
use super::ZigGenerator;
use crate::analysis::body_raises;
use crate::context::Frame;
use crate::features::Features;
use crate::generator::Generator;
use crate::registry;
use crate::targets::{
    builtin_of, escape_string, float_literal, int_literal, needs_parens, quoted, resolves_to,
    stray_spread, Builtin,
};
use crate::{CodegenError, CodegenResult, CodegenTarget};

const TARGET: CodegenTarget = CodegenTarget::Zig;

impl ZigGenerator<'_> {
    pub(super) fn expr(&mut self, expr: &Expr) -> CodegenResult<String> {
        match &expr.kind {
            ExprKind::Literal(lit) => literal(lit),
            ExprKind::Template(parts) => self.template(parts),
            ExprKind::Ident(name) => Ok(name.clone()),
            ExprKind::SelfRef => Ok("self".to_string()),
            ExprKind::Array(items) => {
                let items = self.args(items)?;
                Ok(anonymous_literal(&items))
            }
            ExprKind::Object(entries) => {
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
                Ok(anonymous_literal(&fields))
            }
            ExprKind::Range { .. } => Err(CodegenError::unsupported(
                "range expression outside a loop header",
                TARGET,
            )),
            ExprKind::Binary { op, left, right } => self.binary(*op, left, right),
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
                let cond = self.lower_expr(cond)?;
                let then = self.operand(then)?;
                let otherwise = self.operand(otherwise)?;
                Ok(format!("if ({cond}) {then} else {otherwise}"))
            }
            ExprKind::Call { callee, args } => self.call(callee, args),
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
                Ok(match access {
                    MemberAccess::Plain => format!("{object}.{property}"),
                    MemberAccess::NonNull => format!("{object}.?.{property}"),
                    MemberAccess::Optional => {
                        let value = self.ctx.fresh_label("value");
                        format!("if ({object}) |{value}| {value}.{property} else null")
                    }
                })
            }
            ExprKind::Index { object, index } => {
                let lowered = self.operand(object)?;
                let index = self.lower_expr(index)?;
                if resolves_to(object, Builtin::Lista) {
                    Ok(format!("{lowered}.items[@intCast({index})]"))
                } else if resolves_to(object, Builtin::Tabula) {
                    Ok(format!("{lowered}.get({index}).?"))
                } else {
                    Ok(format!("{lowered}[@intCast({index})]"))
                }
            }
            ExprKind::Lambda(lambda) => self.lambda(lambda, expr.resolved.as_ref()),
            ExprKind::New { class, init } => self.new_expr(class, init),
            ExprKind::Cede(inner) => self.cede(inner),
            ExprKind::TypeCheck { expr, ty, negated } => self.type_check(expr, ty, *negated),
            ExprKind::Cast { expr, ty } => {
                let ty = self.ty(ty)?;
                let inner = self.lower_expr(expr)?;
                Ok(format!("@as({ty}, {inner})"))
            }
            ExprKind::Native { expr, ty } => self.native(expr, ty),
            ExprKind::Comptime(body) => self.comptime(body),
            ExprKind::Spread(_) => Err(stray_spread()),
            ExprKind::Paren(inner) => Ok(format!("({})", self.lower_expr(inner)?)),
        }
    }

    fn operand(&mut self, expr: &Expr) -> CodegenResult<String> {
        let text = self.lower_expr(expr)?;
        Ok(if needs_parens(expr) { format!("({text})") } else { text })
    }

    /// Call arguments; Zig has no variadic spread.
    fn args(&mut self, args: &[Expr]) -> CodegenResult<Vec<String>> {
        let mut out = Vec::with_capacity(args.len());
        for arg in args {
            if let ExprKind::Spread(_) = arg.kind {
                return Err(CodegenError::unsupported("sparge", TARGET));
            }
            out.push(self.lower_expr(arg)?);
        }
        Ok(out)
    }

    /// Unwrap the error union of a fallible call: `try` inside a function,
    /// a panic at module level where there is no caller to propagate to.
    fn propagate(&mut self, call: String) -> String {
        if self.ctx.frame.in_function {
            self.ctx.frame.fallible = true;
            format!("try {call}")
        } else {
            self.ctx.require(Features::PANIC);
            format!("{call} catch |err| @panic(@errorName(err))")
        }
    }

    fn is_fallible_call(&self, expr: &Expr) -> bool {
        match &expr.unparen().kind {
            ExprKind::Call { callee, .. } => matches!(
                &callee.unparen().kind,
                ExprKind::Ident(name) if self.fallible_fns.contains(name)
            ),
            ExprKind::MethodCall { method, .. } => self.fallible_fns.contains(method),
            _ => false,
        }
    }

    fn call(&mut self, callee: &Expr, args: &[Expr]) -> CodegenResult<String> {
        let mut lowered = self.args(args)?;
        let name = match &callee.unparen().kind {
            ExprKind::Ident(name) => Some(name.as_str()),
            _ => None,
        };
        if name.is_some_and(|n| self.ctx.takes_allocator(n)) {
            lowered.insert(0, self.ctx.alloc_handle());
        }
        let callee_text = self.operand(callee)?;
        let call = format!("{callee_text}({})", lowered.join(", "));
        Ok(match name {
            Some(n) if self.fallible_fns.contains(n) => self.propagate(call),
            _ => call,
        })
    }

    fn method_call(
        &mut self,
        receiver: &Expr,
        method: &str,
        args: &[Expr],
        optional: bool,
    ) -> CodegenResult<String> {
        let recv = self.operand(receiver)?;
        let mut args = self.args(args)?;
        let elem = self.elem_ty(receiver.resolved.as_ref());
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
        if self.ctx.takes_allocator(method) {
            args.insert(0, self.ctx.alloc_handle());
        }
        let call = if optional {
            let value = self.ctx.fresh_label("value");
            format!("if ({recv}) |{value}| {value}.{method}({}) else null", args.join(", "))
        } else {
            format!("{recv}.{method}({})", args.join(", "))
        };
        Ok(if self.fallible_fns.contains(method) {
            self.propagate(call)
        } else {
            call
        })
    }

    /// `cede` has no scheduler to yield to; it unwraps the awaited error union.
    fn cede(&mut self, inner: &Expr) -> CodegenResult<String> {
        if self.ctx.in_generator() {
            return Err(CodegenError::unsupported("cede in a cursor function", TARGET));
        }
        self.ctx.require(Features::ASYNC);
        if self.is_fallible_call(inner) {
            return self.lower_expr(inner);
        }
        let lowered = self.operand(inner)?;
        Ok(self.propagate(lowered))
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
                    format.push_str(format_spec(expr));
                    values.push(self.lower_expr(expr)?);
                }
            }
        }
        Ok(self.alloc_print(&format, &values))
    }

    /// `std.fmt.allocPrint` with the in-scope allocator.
    fn alloc_print(&mut self, format: &str, values: &[String]) -> String {
        self.ctx.require(Features::STD | Features::STRING);
        let handle = self.ctx.alloc_handle();
        format!(
            "std.fmt.allocPrint({handle}, \"{format}\", {}) catch @panic(\"OOM\")",
            anonymous_literal(values)
        )
    }

    fn binary(&mut self, op: BinaryOp, left: &Expr, right: &Expr) -> CodegenResult<String> {
        let l = self.operand(left)?;
        let r = self.operand(right)?;
        let numeric = resolves_to(left, Builtin::Numerus) && resolves_to(right, Builtin::Numerus);
        let textual = resolves_to(left, Builtin::Textus) || resolves_to(right, Builtin::Textus);
        Ok(match op {
            BinaryOp::And => format!("{l} and {r}"),
            BinaryOp::Or => format!("{l} or {r}"),
            BinaryOp::Coalesce => format!("{l} orelse {r}"),
            BinaryOp::Div if numeric => format!("@divTrunc({l}, {r})"),
            BinaryOp::Mod if numeric => format!("@mod({l}, {r})"),
            BinaryOp::Eq if textual => {
                self.ctx.require(Features::STD);
                format!("std.mem.eql(u8, {l}, {r})")
            }
            BinaryOp::NotEq if textual => {
                self.ctx.require(Features::STD);
                format!("!std.mem.eql(u8, {l}, {r})")
            }
            BinaryOp::Add if textual => self.alloc_print("{s}{s}", &[l, r]),
            other => format!("{l} {} {r}", other.symbol()),
        })
    }

    /// Zig has no closures; a lambda becomes a function in an anonymous
    /// struct and cannot capture locals.
    fn lambda(&mut self, lambda: &Lambda, resolved: Option<&SemanticType>) -> CodegenResult<String> {
        let mut params = Vec::with_capacity(lambda.params.len());
        for param in &lambda.params {
            let ty = match &param.ty {
                Some(ty) => self.ty(ty)?,
                None => "anytype".to_string(),
            };
            params.push(format!("{}: {ty}", param.name));
        }
        let ret = match (&lambda.ret, resolved) {
            (Some(ret), _) => Some(self.ty(ret)?),
            (None, Some(SemanticType::Function { ret, .. })) => self.semantic_ty(ret),
            (None, _) => None,
        };
        let mode = if lambda.is_async {
            FunctionMode::Async
        } else {
            FunctionMode::Sync
        };
        let fallible = lambda.is_async
            || matches!(&lambda.body, LambdaBody::Block(block) if body_raises(block));
        let params = params.join(", ");
        let pad = self.ctx.pad();

        match &lambda.body {
            LambdaBody::Expr(body) => {
                let Some(ret) = ret else {
                    return Err(CodegenError::unsupported(
                        "lambda without a known return type",
                        TARGET,
                    ));
                };
                let (body, frame) = self.with_frame(Frame::function(mode, fallible), |g| g.lower_expr(body))?;
                let ret = if frame.fallible { format!("!{ret}") } else { ret };
                Ok(format!("struct {{ fn call({params}) {ret} {{ return {body}; }} }}.call"))
            }
            LambdaBody::Block(block) => {
                let ret = ret.unwrap_or_else(|| "void".to_string());
                let (lines, frame) = self.with_frame(Frame::function(mode, fallible), |g| {
                    g.indented(|g| g.lower_block_lines(block))
                })?;
                let ret = if frame.fallible { format!("!{ret}") } else { ret };
                let unit = self.indented(|g| Ok(g.ctx.pad()))?;
                let mut out = vec!["struct {".to_string()];
                if lines.is_empty() {
                    out.push(format!("{unit}fn call({params}) {ret} {{}}"));
                } else {
                    out.push(format!("{unit}fn call({params}) {ret} {{"));
                    out.extend(lines);
                    out.push(format!("{unit}}}"));
                }
                out.push(format!("{pad}}}.call"));
                Ok(out.join("\n"))
            }
        }
    }

    fn new_expr(&mut self, class: &str, init: &NewInit) -> CodegenResult<String> {
        if let Some(info) = self.ctx.variant(class) {
            let union = info.union.clone();
            let field_names = info.fields.clone();
            let fields = match init {
                NewInit::Args(args) => {
                    let args = self.args(args)?;
                    field_names
                        .iter()
                        .zip(args)
                        .map(|(name, value)| format!(".{name} = {value}"))
                        .collect::<Vec<_>>()
                }
                NewInit::Fields(fields) => {
                    let mut out = Vec::with_capacity(fields.len());
                    for (name, value) in fields {
                        out.push(format!(".{name} = {}", self.lower_expr(value)?));
                    }
                    out
                }
            };
            let payload = if field_names.is_empty() {
                "{}".to_string()
            } else {
                anonymous_literal(&fields)
            };
            return Ok(format!("{union}{{ .{class} = {payload} }}"));
        }
        match init {
            NewInit::Args(args) if args.is_empty() => Ok(format!("{class}{{}}")),
            NewInit::Args(args) => {
                let args = self.args(args)?;
                Ok(format!("{class}.init({})", args.join(", ")))
            }
            NewInit::Fields(fields) => {
                let mut out = Vec::with_capacity(fields.len());
                for (name, value) in fields {
                    out.push(format!(".{name} = {}", self.lower_expr(value)?));
                }
                Ok(format!("{class}{{ {} }}", out.join(", ")))
            }
        }
    }

    fn type_check(&mut self, expr: &Expr, ty: &TypeExpr, negated: bool) -> CodegenResult<String> {
        let inner = self.operand(expr)?;
        let cmp = if negated { "!=" } else { "==" };
        if let Some(name) = ty.name().filter(|n| self.ctx.variant(n).is_some()) {
            self.ctx.require(Features::STD);
            return Ok(format!("std.meta.activeTag({inner}) {cmp} .{name}"));
        }
        if builtin_of(ty) == Some(Builtin::Nihil) {
            return Ok(format!("{inner} {cmp} null"));
        }
        let ty = self.ty(ty)?;
        Ok(format!("@TypeOf({inner}) {cmp} {ty}"))
    }

    /// Container literals built on the heap with the in-scope allocator.
    fn native(&mut self, expr: &Expr, ty: &TypeExpr) -> CodegenResult<String> {
        let kind = builtin_of(ty);
        match (&expr.unparen().kind, kind) {
            (ExprKind::Array(items), Some(Builtin::Lista)) => {
                let container = self.ty(ty)?;
                let elem = match ty.args().first() {
                    Some(elem) => self.ty(elem)?,
                    None => return Err(CodegenError::unsupported("lista without element type", TARGET)),
                };
                let handle = self.ctx.alloc_handle();
                let init = format!("{container}.init({handle})");
                if items.is_empty() {
                    return Ok(init);
                }
                let items = self.args(items)?;
                let label = self.ctx.fresh_label("blk");
                Ok(format!(
                    "{label}: {{ var list = {init}; list.appendSlice(&[_]{elem}{{ {} }}) catch @panic(\"OOM\"); break :{label} list; }}",
                    items.join(", ")
                ))
            }
            (ExprKind::Object(entries), Some(Builtin::Tabula)) => {
                let container = self.ty(ty)?;
                let handle = self.ctx.alloc_handle();
                let init = format!("{container}.init({handle})");
                if entries.is_empty() {
                    return Ok(init);
                }
                let mut puts = Vec::with_capacity(entries.len());
                for entry in entries {
                    match entry {
                        ObjectEntry::Field { key, value } => {
                            let value = self.lower_expr(value)?;
                            puts.push(format!("map.put({}, {value}) catch @panic(\"OOM\");", quoted(key)));
                        }
                        ObjectEntry::Spread(_) => {
                            return Err(CodegenError::unsupported("sparge in a tabula literal", TARGET))
                        }
                    }
                }
                let label = self.ctx.fresh_label("blk");
                Ok(format!(
                    "{label}: {{ var map = {init}; {} break :{label} map; }}",
                    puts.join(" ")
                ))
            }
            (ExprKind::Array(items), Some(Builtin::Copia)) => {
                let container = self.ty(ty)?;
                let handle = self.ctx.alloc_handle();
                let init = format!("{container}.init({handle})");
                if items.is_empty() {
                    return Ok(init);
                }
                let puts: Vec<String> = self
                    .args(items)?
                    .into_iter()
                    .map(|item| format!("set.put({item}, {{}}) catch @panic(\"OOM\");"))
                    .collect();
                let label = self.ctx.fresh_label("blk");
                Ok(format!(
                    "{label}: {{ var set = {init}; {} break :{label} set; }}",
                    puts.join(" ")
                ))
            }
            _ => self.lower_expr(expr),
        }
    }

    fn comptime(&mut self, body: &ComptimeBody) -> CodegenResult<String> {
        self.ctx.require(Features::COMPTIME);
        match body {
            ComptimeBody::Expr(expr) => Ok(format!("comptime {}", self.operand(expr)?)),
            ComptimeBody::Block(block) => {
                let label = self.ctx.fresh_label("blk");
                let saved = self.ctx.frame.comptime_label.replace(label.clone());
                let lines = self.lower_block_lines(block);
                self.ctx.frame.comptime_label = saved;
                let lines = lines?;
                let pad = self.ctx.pad();
                if lines.is_empty() {
                    return Ok(format!("comptime {label}: {{}}"));
                }
                Ok(format!("comptime {label}: {{\n{}\n{pad}}}", lines.join("\n")))
            }
        }
    }
}

fn literal(lit: &Literal) -> CodegenResult<String> {
    Ok(match lit {
        Literal::Integer(n) => int_literal(*n),
        Literal::Float(f) => float_literal(*f, TARGET)?,
        Literal::String(s) => quoted(s),
        Literal::Bool(b) => b.to_string(),
        Literal::Nil => "null".to_string(),
        Literal::Decimal(_) => return Err(CodegenError::unsupported("decimus literal", TARGET)),
    })
}

/// `.{ a, b }`, or `.{}` when empty.
fn anonymous_literal(items: &[String]) -> String {
    if items.is_empty() {
        ".{}".to_string()
    } else {
        format!(".{{ {} }}", items.join(", "))
    }
}
