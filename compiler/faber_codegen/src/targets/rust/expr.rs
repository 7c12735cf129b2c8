//! Expression lowering for Rust.

use faber_ir::{
    AssignOp, BinaryOp, ComptimeBody, Expr, ExprKind, FunctionMode, Lambda, LambdaBody, Literal,
    MemberAccess, NewInit, ObjectEntry, SemanticType, TemplatePart, TypeExpr, UnaryOp,
};

use super::{RustGenerator, ERROR_TY};
use crate::context::Frame;
use crate::features::Features;
use crate::generator::Generator;
use crate::registry;
use crate::targets::{
    builtin_of, escape_string, float_literal, int_literal, needs_parens, quoted, resolves_to,
    stray_spread, Builtin,
};
use crate::{CodegenError, CodegenResult, CodegenTarget};

const TARGET: CodegenTarget = CodegenTarget::Rust;

impl RustGenerator<'_> {
    pub(super) fn expr(&mut self, expr: &Expr) -> CodegenResult<String> {
        match &expr.kind {
            ExprKind::Literal(lit) => literal(lit),
            ExprKind::Template(parts) => self.template(parts),
            ExprKind::Ident(name) => Ok(name.clone()),
            ExprKind::SelfRef => Ok("self".to_string()),
            ExprKind::Array(items) => self.vec_literal(items),
            ExprKind::Object(entries) => self.struct_literal(entries, expr.resolved.as_ref()),
            ExprKind::Range {
                start,
                end,
                step,
                inclusive,
            } => {
                let range = self.loop_range(start, end, step.as_deref(), *inclusive)?;
                Ok(if range.starts_with('(') {
                    range
                } else {
                    format!("({range})")
                })
            }
            ExprKind::Binary { op, left, right } => self.binary(*op, left, right),
            ExprKind::Unary { op, operand } => {
                let inner = self.operand(operand)?;
                let sized = [Builtin::Textus, Builtin::Lista, Builtin::Tabula, Builtin::Copia]
                    .into_iter()
                    .any(|b| resolves_to(operand, b));
                Ok(match op {
                    UnaryOp::Neg => format!("-{inner}"),
                    UnaryOp::Not | UnaryOp::BitNot => format!("!{inner}"),
                    UnaryOp::IsNull if sized => format!("{inner}.is_empty()"),
                    UnaryOp::IsNotNull if sized => format!("!{inner}.is_empty()"),
                    UnaryOp::IsNull => format!("{inner}.is_none()"),
                    UnaryOp::IsNotNull => format!("{inner}.is_some()"),
                })
            }
            ExprKind::Assign { op, target, value } => {
                let lowered = self.lower_expr(target)?;
                let value = match op {
                    AssignOp::Add if resolves_to(target, Builtin::Textus) => self.borrowed_str(value)?,
                    _ => self.lower_expr(value)?,
                };
                Ok(format!("{lowered} {} {value}", op.symbol()))
            }
            ExprKind::Conditional {
                cond,
                then,
                otherwise,
            } => {
                let cond = self.lower_expr(cond)?;
                let then = self.lower_expr(then)?;
                let otherwise = self.lower_expr(otherwise)?;
                Ok(format!("if {cond} {{ {then} }} else {{ {otherwise} }}"))
            }
            ExprKind::Call { .. } | ExprKind::MethodCall { .. } => {
                let (call, fallible) = self.call_site(expr)?;
                Ok(if fallible { self.propagate(call) } else { call })
            }
            ExprKind::Member {
                object,
                property,
                access,
            } => {
                if let ExprKind::Ident(name) = &object.unparen().kind {
                    if self.ctx.is_enum(name) {
                        return Ok(format!("{name}::{property}"));
                    }
                    let payload_field = self
                        .payload_aliases
                        .get(name)
                        .is_some_and(|fields| fields.contains(property));
                    if payload_field && *access == MemberAccess::Plain {
                        return Ok(format!("{name}_{property}"));
                    }
                }
                let object = self.operand(object)?;
                Ok(match access {
                    MemberAccess::Plain => format!("{object}.{property}"),
                    MemberAccess::NonNull => format!("{object}.as_ref().unwrap().{property}"),
                    MemberAccess::Optional => {
                        self.ctx.require(Features::OPTIONAL);
                        format!("{object}.as_ref().map(|v| v.{property}.clone())")
                    }
                })
            }
            ExprKind::Index { object, index } => {
                let lowered = self.operand(object)?;
                if resolves_to(object, Builtin::Tabula) {
                    let key = self.lower_expr(index)?;
                    return Ok(format!("{lowered}[&{key}]"));
                }
                let index = match &index.unparen().kind {
                    ExprKind::Literal(Literal::Integer(n)) if *n >= 0 => int_literal(*n),
                    _ => format!("{} as usize", self.operand(index)?),
                };
                Ok(format!("{lowered}[{index}]"))
            }
            ExprKind::Lambda(lambda) => self.lambda(lambda),
            ExprKind::New { class, init } => self.new_expr(class, init),
            ExprKind::Cede(inner) => self.cede(inner),
            ExprKind::TypeCheck { expr, ty, negated } => {
                let check = self.type_check(expr, ty)?;
                Ok(if *negated { format!("!{check}") } else { check })
            }
            ExprKind::Cast { expr, ty } => {
                let inner = self.operand(expr)?;
                match builtin_of(ty) {
                    Some(Builtin::Numerus | Builtin::Fractus | Builtin::Bivalens) => {
                        Ok(format!("{inner} as {}", self.ty(ty)?))
                    }
                    Some(Builtin::Textus) => Ok(format!("{inner}.to_string()")),
                    _ => Ok(format!("{}::from({inner})", self.ty(ty)?)),
                }
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

    /// A value used where `&str` or `impl Display` suffices: string literals
    /// stay literals instead of becoming owned `String`s.
    pub(super) fn str_arg(&mut self, expr: &Expr) -> CodegenResult<String> {
        match &expr.unparen().kind {
            ExprKind::Literal(Literal::String(s)) => Ok(quoted(s)),
            _ => self.lower_expr(expr),
        }
    }

    /// A string operand for `+=` or `push_str`: literals as-is, otherwise
    /// borrowed.
    fn borrowed_str(&mut self, expr: &Expr) -> CodegenResult<String> {
        match &expr.unparen().kind {
            ExprKind::Literal(Literal::String(s)) => Ok(quoted(s)),
            _ => Ok(format!("&{}", self.operand(expr)?)),
        }
    }

    /// Call arguments; Rust has no variadic spread.
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

    /// `?` inside a function; at module level there is no caller to
    /// propagate to, so the error aborts.
    fn propagate(&mut self, call: String) -> String {
        if self.ctx.frame.in_function {
            self.ctx.frame.fallible = true;
            format!("{call}?")
        } else {
            self.ctx.require(Features::PANIC);
            format!("{call}.expect(\"unhandled error\")")
        }
    }

    /// A call without its error handling, and whether the callee returns
    /// `Result`. Other expressions pass through as operands.
    fn call_site(&mut self, expr: &Expr) -> CodegenResult<(String, bool)> {
        match &expr.unparen().kind {
            ExprKind::Call { callee, args } => {
                let args = self.args(args)?;
                let fallible = matches!(
                    &callee.unparen().kind,
                    ExprKind::Ident(name) if self.fallible_fns.contains(name)
                );
                let callee = self.operand(callee)?;
                Ok((format!("{callee}({})", args.join(", ")), fallible))
            }
            ExprKind::MethodCall {
                receiver,
                method,
                args,
                optional,
            } => {
                let recv = self.operand(receiver)?;
                let args = self.args(args)?;
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
                    return Ok((code, false));
                }
                let call = if *optional {
                    self.ctx.require(Features::OPTIONAL);
                    format!("{recv}.as_ref().map(|v| v.{method}({}))", args.join(", "))
                } else {
                    format!("{recv}.{method}({})", args.join(", "))
                };
                Ok((call, self.fallible_fns.contains(method)))
            }
            _ => Ok((self.operand(expr)?, false)),
        }
    }

    /// `.await`, then `?` when the awaited call is fallible.
    fn cede(&mut self, inner: &Expr) -> CodegenResult<String> {
        if self.ctx.in_generator() {
            return Err(CodegenError::unsupported("cede in a cursor function", TARGET));
        }
        if !self.ctx.in_async() {
            return Err(CodegenError::unsupported("cede outside a futura function", TARGET));
        }
        self.ctx.require(Features::ASYNC);
        let (awaited, fallible) = self.call_site(inner)?;
        let awaited = format!("{awaited}.await");
        Ok(if fallible { self.propagate(awaited) } else { awaited })
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
        self.ctx.require(Features::FORMAT);
        if values.is_empty() {
            Ok(format!("format!(\"{format}\")"))
        } else {
            Ok(format!("format!(\"{format}\", {})", values.join(", ")))
        }
    }

    /// `vec![..]`; spreads splice in clones of their source.
    fn vec_literal(&mut self, items: &[Expr]) -> CodegenResult<String> {
        if !items.iter().any(|i| matches!(i.kind, ExprKind::Spread(_))) {
            return Ok(format!("vec![{}]", self.lower_exprs(items)?.join(", ")));
        }
        let mut groups = Vec::new();
        let mut run = Vec::new();
        for item in items {
            if let ExprKind::Spread(inner) = &item.kind {
                if !run.is_empty() {
                    groups.push(format!("vec![{}]", std::mem::take(&mut run).join(", ")));
                }
                groups.push(format!("{}.clone()", self.operand(inner)?));
            } else {
                run.push(self.lower_expr(item)?);
            }
        }
        if !run.is_empty() {
            groups.push(format!("vec![{}]", run.join(", ")));
        }
        Ok(format!("[{}].concat()", groups.join(", ")))
    }

    /// An object literal needs a resolved struct type. A leading spread
    /// becomes struct update syntax.
    fn struct_literal(
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
        let mut base = None;
        for (i, entry) in entries.iter().enumerate() {
            match entry {
                ObjectEntry::Field { key, value } => {
                    fields.push(format!("{key}: {}", self.lower_expr(value)?));
                }
                ObjectEntry::Spread(inner) if i == 0 => {
                    base = Some(format!("..{}.clone()", self.operand(inner)?));
                }
                ObjectEntry::Spread(_) => {
                    return Err(CodegenError::unsupported(
                        "sparge after the first field of an object literal",
                        TARGET,
                    ))
                }
            }
        }
        fields.extend(base);
        Ok(format!("{name} {{ {} }}", fields.join(", ")))
    }

    fn binary(&mut self, op: BinaryOp, left: &Expr, right: &Expr) -> CodegenResult<String> {
        let textual = resolves_to(left, Builtin::Textus) || resolves_to(right, Builtin::Textus);
        match op {
            BinaryOp::Coalesce => {
                self.ctx.require(Features::OPTIONAL);
                let l = self.operand(left)?;
                let r = self.lower_expr(right)?;
                Ok(format!("{l}.unwrap_or({r})"))
            }
            BinaryOp::Add if textual => {
                let l = self.str_arg(left)?;
                let r = self.str_arg(right)?;
                self.ctx.require(Features::FORMAT);
                Ok(format!("format!(\"{{}}{{}}\", {l}, {r})"))
            }
            BinaryOp::Eq | BinaryOp::NotEq => {
                let l = self.str_operand(left)?;
                let r = self.str_operand(right)?;
                Ok(format!("{l} {} {r}", op.symbol()))
            }
            other => {
                let l = self.operand(left)?;
                let r = self.operand(right)?;
                Ok(format!("{l} {} {r}", other.symbol()))
            }
        }
    }

    /// Operand form that keeps string literals borrowed, since `String`
    /// compares with `&str` directly.
    fn str_operand(&mut self, expr: &Expr) -> CodegenResult<String> {
        match &expr.unparen().kind {
            ExprKind::Literal(Literal::String(s)) => Ok(quoted(s)),
            _ => self.operand(expr),
        }
    }

    /// Closures. A body that propagates errors makes the closure return
    /// `Result`.
    fn lambda(&mut self, lambda: &Lambda) -> CodegenResult<String> {
        let mut params = Vec::with_capacity(lambda.params.len());
        for param in &lambda.params {
            params.push(match &param.ty {
                Some(ty) => format!("{}: {}", param.name, self.ty(ty)?),
                None => param.name.clone(),
            });
        }
        let params = format!("|{}|", params.join(", "));
        let ret = match &lambda.ret {
            Some(ret) => Some(self.ty(ret)?),
            None => None,
        };
        let mode = if lambda.is_async {
            self.ctx.require(Features::ASYNC);
            FunctionMode::Async
        } else {
            FunctionMode::Sync
        };

        match &lambda.body {
            LambdaBody::Expr(body) => {
                let (body, frame) = self.with_frame(Frame::function(mode, false), |g| g.lower_expr(body))?;
                Ok(match (lambda.is_async, frame.fallible, ret) {
                    (true, false, _) => format!("{params} async move {{ {body} }}"),
                    (true, true, _) => format!("{params} async move {{ Ok::<_, {ERROR_TY}>({body}) }}"),
                    (false, true, ret) => {
                        let ret = ret.unwrap_or_else(|| "_".to_string());
                        format!("{params} -> Result<{ret}, {ERROR_TY}> {{ Ok({body}) }}")
                    }
                    (false, false, Some(ret)) => format!("{params} -> {ret} {{ {body} }}"),
                    (false, false, None) => format!("{params} {body}"),
                })
            }
            LambdaBody::Block(block) => {
                let (mut lines, frame) = self.with_frame(Frame::function(mode, false), |g| {
                    g.lower_block_lines(block)
                })?;
                if frame.fallible && ret.is_none() {
                    lines.push(self.indented(|g| Ok(g.ctx.line("Ok(())")))?);
                }
                let head = match (lambda.is_async, frame.fallible, ret) {
                    (true, _, _) => format!("{params} async move {{"),
                    (false, true, ret) => format!(
                        "{params} -> Result<{}, {ERROR_TY}> {{",
                        ret.unwrap_or_else(|| "()".to_string())
                    ),
                    (false, false, Some(ret)) => format!("{params} -> {ret} {{"),
                    (false, false, None) => format!("{params} {{"),
                };
                let mut out = vec![head];
                out.extend(lines);
                out.push(format!("{}}}", self.ctx.pad()));
                Ok(out.join("\n"))
            }
        }
    }

    fn new_expr(&mut self, class: &str, init: &NewInit) -> CodegenResult<String> {
        if let Some(info) = self.ctx.variant(class).cloned() {
            let path = format!("{}::{class}", info.union);
            let values = match init {
                NewInit::Args(args) => {
                    let args = self.args(args)?;
                    info.fields.iter().cloned().zip(args).collect::<Vec<_>>()
                }
                NewInit::Fields(fields) => {
                    let mut out = Vec::with_capacity(fields.len());
                    for (name, value) in fields {
                        out.push((name.clone(), self.lower_expr(value)?));
                    }
                    out
                }
            };
            if values.is_empty() {
                return Ok(path);
            }
            let fields: Vec<String> = values
                .into_iter()
                .map(|(name, value)| {
                    if name == value {
                        name
                    } else {
                        format!("{name}: {value}")
                    }
                })
                .collect();
            return Ok(format!("{path} {{ {} }}", fields.join(", ")));
        }
        match init {
            NewInit::Args(args) => Ok(format!("{class}::new({})", self.args(args)?.join(", "))),
            NewInit::Fields(fields) => {
                let mut out = Vec::with_capacity(fields.len());
                for (name, value) in fields {
                    out.push(format!("{name}: {}", self.lower_expr(value)?));
                }
                Ok(format!("{class} {{ {} }}", out.join(", ")))
            }
        }
    }

    fn type_check(&mut self, expr: &Expr, ty: &TypeExpr) -> CodegenResult<String> {
        let inner = self.lower_expr(expr)?;
        if let Some(info) = ty.name().and_then(|n| self.ctx.variant(n)) {
            let name = ty.name().unwrap_or_default();
            let pattern = if info.fields.is_empty() {
                format!("{}::{name}", info.union)
            } else {
                format!("{}::{name} {{ .. }}", info.union)
            };
            return Ok(format!("matches!({inner}, {pattern})"));
        }
        if builtin_of(ty) == Some(Builtin::Nihil) {
            return Ok(format!("{inner}.is_none()"));
        }
        self.ctx.require(Features::ANY);
        let ty = self.ty(ty)?;
        Ok(format!("(&{inner} as &dyn std::any::Any).is::<{ty}>()"))
    }

    /// Native container construction.
    fn native(&mut self, expr: &Expr, ty: &TypeExpr) -> CodegenResult<String> {
        match (&expr.unparen().kind, builtin_of(ty)) {
            (ExprKind::Array(items), Some(Builtin::Lista)) => {
                self.ctx.require(Features::LISTA);
                if items.is_empty() {
                    Ok(format!("{}::new()", self.ty(ty)?.replacen('<', "::<", 1)))
                } else {
                    self.vec_literal(items)
                }
            }
            (ExprKind::Array(items), Some(Builtin::Copia)) => {
                self.ctx.require(Features::COPIA);
                if items.is_empty() {
                    return Ok("HashSet::new()".to_string());
                }
                let items = self.args(items)?;
                Ok(format!("HashSet::from([{}])", items.join(", ")))
            }
            (ExprKind::Object(entries), Some(Builtin::Tabula)) => {
                self.ctx.require(Features::TABULA);
                if entries.is_empty() {
                    return Ok("HashMap::new()".to_string());
                }
                let mut pairs = Vec::with_capacity(entries.len());
                for entry in entries {
                    match entry {
                        ObjectEntry::Field { key, value } => {
                            let value = self.lower_expr(value)?;
                            pairs.push(format!("({}.to_string(), {value})", quoted(key)));
                        }
                        ObjectEntry::Spread(_) => {
                            return Err(CodegenError::unsupported("sparge in a tabula literal", TARGET))
                        }
                    }
                }
                Ok(format!("HashMap::from([{}])", pairs.join(", ")))
            }
            _ => self.lower_expr(expr),
        }
    }

    /// `const { e }`, or a labelled block inside `const { }` whose `redde`
    /// statements break out with the value.
    fn comptime(&mut self, body: &ComptimeBody) -> CodegenResult<String> {
        self.ctx.require(Features::COMPTIME);
        match body {
            ComptimeBody::Expr(inner) => Ok(format!("const {{ {} }}", self.lower_expr(inner)?)),
            ComptimeBody::Block(block) => {
                let label = format!("'{}", self.ctx.fresh_label("blk"));
                let saved = self.ctx.frame.comptime_label.replace(label.clone());
                let lines = self.indented(|g| g.lower_block_lines(block));
                self.ctx.frame.comptime_label = saved;
                let lines = lines?;
                let pad = self.ctx.pad();
                let inner = self.indented(|g| Ok(g.ctx.pad()))?;
                let mut out = vec!["const {".to_string(), format!("{inner}{label}: {{")];
                out.extend(lines);
                out.push(format!("{inner}}}"));
                out.push(format!("{pad}}}"));
                Ok(out.join("\n"))
            }
        }
    }
}

fn literal(lit: &Literal) -> CodegenResult<String> {
    Ok(match lit {
        Literal::Integer(n) => int_literal(*n),
        Literal::Float(f) => float_literal(*f, TARGET)?,
        Literal::String(s) => format!("{}.to_string()", quoted(s)),
        Literal::Bool(b) => b.to_string(),
        Literal::Nil => "None".to_string(),
        Literal::Decimal(_) => return Err(CodegenError::unsupported("decimus literal", TARGET)),
    })
}
