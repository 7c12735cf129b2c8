//! Statement lowering for Rust.

use faber_ir::{
    BindingTarget, Block, ClassDecl, ElseBranch, EnumDecl, Expr, ExprKind, ForKind, ForStmt,
    FunctionDecl, FunctionMode, IfStmt, ImportDecl, ImportItems, InterfaceDecl, Literal,
    MatchStmt, Param, PrintLevel, RaiseKind, ResourceKind, ResourceStmt, Stmt, StmtKind,
    SwitchStmt, TryStmt, UnionDecl, VarDecl, VariantBinding,
};

use super::{RustGenerator, ERROR_TY};
use crate::analysis::{body_escapes, body_mutates_self, body_raises};
use crate::context::Frame;
use crate::features::Features;
use crate::generator::Generator;
use crate::targets::{brace_block, descending, resolves_to, Builtin};
use crate::{CodegenError, CodegenResult, CodegenTarget};

const TARGET: CodegenTarget = CodegenTarget::Rust;

/// How a method borrows its receiver.
#[derive(Copy, Clone, PartialEq, Eq)]
enum SelfParam {
    None,
    /// `&mut self` when the body writes through `self`, else `&self`.
    Inferred,
    Mutable,
}

/// How a lowered function is attached to its surroundings.
#[derive(Copy, Clone)]
struct FnShape<'s> {
    /// `pub ` for inherent methods, empty otherwise.
    visibility: &'s str,
    receiver: SelfParam,
}

const FREE_FN: FnShape<'static> = FnShape {
    visibility: "",
    receiver: SelfParam::None,
};

impl RustGenerator<'_> {
    pub(super) fn stmt(&mut self, stmt: &Stmt) -> CodegenResult<String> {
        match &stmt.kind {
            StmtKind::Import(decl) => Ok(self.import(decl)),
            StmtKind::Var(decl) => self.var(decl),
            StmtKind::Function(decl) => self.function(decl, FREE_FN),
            StmtKind::Class(decl) => self.class(decl),
            StmtKind::Interface(decl) => self.interface(decl),
            StmtKind::Enum(decl) => self.enumeration(decl),
            StmtKind::Union(decl) => self.union(decl),
            StmtKind::TypeAlias(decl) => {
                let ty = self.ty(&decl.ty)?;
                Ok(self.ctx.stmt_line(&format!("type {} = {ty}", decl.name)))
            }
            StmtKind::If(if_stmt) => self.if_chain(if_stmt),
            StmtKind::While { cond, body } => {
                let cond = self.lower_expr(cond)?;
                let lines = self.lower_block_lines(body)?;
                Ok(brace_block(&self.ctx.pad(), &format!("while {cond}"), &lines))
            }
            StmtKind::For(for_stmt) => self.for_loop(for_stmt),
            StmtKind::Switch(switch) => self.switch(switch),
            StmtKind::Match(match_stmt) => self.match_stmt(match_stmt),
            StmtKind::Guard(clauses) => {
                let mut out = Vec::with_capacity(clauses.len());
                for clause in clauses {
                    let cond = self.lower_expr(&clause.cond)?;
                    let lines = self.lower_block_lines(&clause.body)?;
                    out.push(brace_block(&self.ctx.pad(), &format!("if {cond}"), &lines));
                }
                Ok(out.join("\n"))
            }
            StmtKind::Try(try_stmt) => self.try_stmt(try_stmt),
            StmtKind::Raise { kind, value } => {
                let text = self.raise(*kind, value)?;
                Ok(self.ctx.stmt_line(&text))
            }
            StmtKind::Return(value) => {
                let value = match value {
                    Some(value) => Some(self.lower_expr(value)?),
                    None => None,
                };
                let frame = &self.ctx.frame;
                let text = match (&frame.comptime_label, value) {
                    (Some(label), Some(value)) => format!("break {label} {value}"),
                    (Some(label), None) => format!("break {label}"),
                    (None, Some(value)) if frame.fallible => format!("return Ok({value})"),
                    (None, None) if frame.fallible => "return Ok(())".to_string(),
                    (None, Some(value)) => format!("return {value}"),
                    (None, None) => "return".to_string(),
                };
                Ok(self.ctx.stmt_line(&text))
            }
            StmtKind::Break => Ok(self.ctx.stmt_line("break")),
            StmtKind::Continue => Ok(self.ctx.stmt_line("continue")),
            StmtKind::Block(block) => {
                let lines = self.lower_block_lines(block)?;
                Ok(brace_block(&self.ctx.pad(), "", &lines))
            }
            StmtKind::Expr(expr) => {
                let text = self.lower_expr(expr)?;
                Ok(self.ctx.stmt_line(&text))
            }
            StmtKind::Print { level, args } => self.print(*level, args),
            StmtKind::Assert { cond, message } => {
                let cond = self.lower_expr(cond)?;
                let text = match message {
                    Some(message) => {
                        let message = self.str_arg(message)?;
                        format!("assert!({cond}, \"{{}}\", {message})")
                    }
                    None => format!("assert!({cond})"),
                };
                Ok(self.ctx.stmt_line(&text))
            }
            StmtKind::Resource(resource) => self.resource(resource),
            StmtKind::Entry { is_async, body } => self.entry(*is_async, body),
        }
    }

    fn import(&self, decl: &ImportDecl) -> String {
        let path = module_path(&decl.source);
        match &decl.items {
            ImportItems::Namespace(alias) => self.ctx.stmt_line(&format!("use {path} as {alias}")),
            ImportItems::Named(names) => {
                let names: Vec<String> = names
                    .iter()
                    .map(|n| match &n.alias {
                        Some(alias) => format!("{} as {alias}", n.name),
                        None => n.name.clone(),
                    })
                    .collect();
                let text = match names.as_slice() {
                    [single] => format!("use {path}::{single}"),
                    _ => format!("use {path}::{{{}}}", names.join(", ")),
                };
                self.ctx.stmt_line(&text)
            }
        }
    }

    fn let_keyword(&self, mutable: bool, name: &str) -> &'static str {
        if mutable || self.mutated.contains(name) {
            "let mut"
        } else {
            "let"
        }
    }

    fn var(&mut self, decl: &VarDecl) -> CodegenResult<String> {
        match &decl.target {
            BindingTarget::Ident(name) => {
                let keyword = self.let_keyword(decl.mutable, name);
                let annotation = match &decl.ty {
                    Some(ty) => format!(": {}", self.ty(ty)?),
                    None => String::new(),
                };
                let text = match &decl.init {
                    Some(init) => {
                        let init = self.lower_expr(init)?;
                        format!("{keyword} {name}{annotation} = {init}")
                    }
                    None => format!("{keyword} {name}{annotation}"),
                };
                Ok(self.ctx.stmt_line(&text))
            }
            BindingTarget::Object(fields) => {
                let (mut lines, source) = self.destructure_source(decl)?;
                for (field, alias) in fields {
                    let local = alias.as_deref().unwrap_or(field);
                    let keyword = self.let_keyword(decl.mutable, local);
                    lines.push(
                        self.ctx
                            .stmt_line(&format!("{keyword} {local} = {source}.{field}.clone()")),
                    );
                }
                Ok(lines.join("\n"))
            }
            BindingTarget::Array(names) => {
                let (mut lines, source) = self.destructure_source(decl)?;
                for (i, name) in names.iter().enumerate() {
                    let keyword = self.let_keyword(decl.mutable, name);
                    lines.push(
                        self.ctx
                            .stmt_line(&format!("{keyword} {name} = {source}[{i}].clone()")),
                    );
                }
                Ok(lines.join("\n"))
            }
        }
    }

    /// The name a destructuring reads from, binding a temporary when the
    /// initializer is not already a name.
    fn destructure_source(&mut self, decl: &VarDecl) -> CodegenResult<(Vec<String>, String)> {
        let Some(init) = &decl.init else {
            return Err(CodegenError::unsupported(
                "destructuring declaration without initializer",
                TARGET,
            ));
        };
        let lowered = self.lower_expr(init)?;
        if matches!(init.unparen().kind, ExprKind::Ident(_) | ExprKind::SelfRef) {
            return Ok((Vec::new(), lowered));
        }
        let temp = self.ctx.fresh_label("source");
        let line = self.ctx.stmt_line(&format!("let {temp} = {lowered}"));
        Ok((vec![line], temp))
    }

    fn params(&mut self, fn_name: &str, params: &[Param]) -> CodegenResult<Vec<String>> {
        let mut out = Vec::with_capacity(params.len());
        for param in params {
            if param.default.is_some() {
                return Err(CodegenError::unsupported(
                    format!("default parameter in `{fn_name}`"),
                    TARGET,
                ));
            }
            let Some(ty) = &param.ty else {
                return Err(CodegenError::unsupported(
                    format!("untyped parameter `{}` in `{fn_name}`", param.name),
                    TARGET,
                ));
            };
            let ty = self.ty(ty)?;
            out.push(if param.rest {
                format!("{}: Vec<{ty}>", param.name)
            } else {
                format!("{}: {ty}", param.name)
            });
        }
        Ok(out)
    }

    /// A free function, or a method when `shape` takes a receiver.
    ///
    /// Whether the function returns `Result` is only settled after its body
    /// is lowered, so the signature is assembled last.
    fn function(&mut self, decl: &FunctionDecl, shape: FnShape<'_>) -> CodegenResult<String> {
        if decl.mode.is_generator() {
            return Err(CodegenError::unsupported(
                format!("cursor function `{}`", decl.name),
                TARGET,
            ));
        }
        let Some(body) = &decl.body else {
            return Err(CodegenError::unsupported(
                format!("abstract function `{}`", decl.name),
                TARGET,
            ));
        };
        let is_async = decl.mode.is_async();
        if is_async {
            self.ctx.require(Features::ASYNC);
        }

        let fallible = self.fallible_fns.contains(&decl.name) || body_raises(body);
        let (mut lines, frame) = self.with_frame(Frame::function(decl.mode, fallible), |g| {
            g.lower_block_lines(body)
        })?;
        if frame.fallible {
            self.fallible_fns.insert(decl.name.clone());
        }

        let mut params = Vec::with_capacity(decl.params.len() + 1);
        match shape.receiver {
            SelfParam::None => {}
            SelfParam::Mutable => params.push("&mut self".to_string()),
            SelfParam::Inferred if body_mutates_self(body) => params.push("&mut self".to_string()),
            SelfParam::Inferred => params.push("&self".to_string()),
        }
        params.extend(self.params(&decl.name, &decl.params)?);
        let ret = self.ret_ty(decl.ret.as_ref(), is_async)?;
        if frame.fallible && ret == "()" && !ends_with_return(body) {
            lines.push(self.indented(|g| Ok(g.ctx.line("Ok(())")))?);
        }
        let head = format!(
            "{}{}fn {}{}({}){}",
            shape.visibility,
            if is_async { "async " } else { "" },
            decl.name,
            generics(&decl.type_params),
            params.join(", "),
            signature_ret(&ret, frame.fallible),
        );
        Ok(brace_block(&self.ctx.pad(), &head, &lines))
    }

    /// `struct` with public fields, then an inherent impl holding `new` and
    /// the methods, then one impl per implemented trait.
    fn class(&mut self, decl: &ClassDecl) -> CodegenResult<String> {
        let pad = self.ctx.pad();
        let generics = generics(&decl.type_params);
        let self_ty = format!("{}{generics}", decl.name);

        let fields = self.indented(|g| {
            let mut out = Vec::with_capacity(decl.fields.len());
            for field in &decl.fields {
                let ty = g.ty(&field.ty)?;
                out.push(g.ctx.line(&format!("pub {}: {ty},", field.name)));
            }
            Ok(out)
        })?;
        let mut out = vec![
            format!("{pad}#[derive(Debug, Clone)]"),
            brace_block(&pad, &format!("pub struct {self_ty}"), &fields),
        ];

        let trait_methods: Vec<(&str, Vec<String>)> = decl
            .implements
            .iter()
            .filter_map(|t| Some((t.as_str(), self.traits.get(t)?.clone())))
            .collect();
        let in_trait = |name: &str| trait_methods.iter().any(|(_, names)| names.iter().any(|n| n == name));

        let inherent = self.indented(|g| {
            let mut members = vec![g.constructor(decl)?];
            if let Some(ctor) = &decl.constructor {
                let creo = FunctionDecl::new("creo", Vec::new(), ctor.clone());
                members.push(g.function(
                    &creo,
                    FnShape {
                        visibility: "",
                        receiver: SelfParam::Mutable,
                    },
                )?);
            }
            for method in decl.methods.iter().filter(|m| !in_trait(&m.name)) {
                members.push(g.function(
                    method,
                    FnShape {
                        visibility: "pub ",
                        receiver: SelfParam::Inferred,
                    },
                )?);
            }
            Ok(members)
        })?;
        out.push(brace_block(&pad, &format!("impl{generics} {self_ty}"), &inherent));

        for (trait_name, names) in &trait_methods {
            let members = self.indented(|g| {
                let mut members = Vec::new();
                for method in decl.methods.iter().filter(|m| names.contains(&m.name)) {
                    members.push(g.function(
                        method,
                        FnShape {
                            visibility: "",
                            receiver: SelfParam::Inferred,
                        },
                    )?);
                }
                Ok(members)
            })?;
            out.push(brace_block(
                &pad,
                &format!("impl{generics} {trait_name} for {self_ty}"),
                &members,
            ));
        }
        Ok(out.join("\n"))
    }

    /// `pub fn new(..) -> Self`: fields without an initializer become
    /// parameters, and `creo` runs on the fresh value.
    fn constructor(&mut self, decl: &ClassDecl) -> CodegenResult<String> {
        let mut params = Vec::new();
        let mut inits = Vec::with_capacity(decl.fields.len());
        for field in &decl.fields {
            match &field.init {
                Some(init) => inits.push(format!("{}: {}", field.name, self.lower_expr(init)?)),
                None => {
                    params.push(format!("{}: {}", field.name, self.ty(&field.ty)?));
                    inits.push(field.name.clone());
                }
            }
        }
        let value = if inits.is_empty() {
            "Self {}".to_string()
        } else {
            format!("Self {{ {} }}", inits.join(", "))
        };
        let lines = self.indented(|g| {
            Ok(if decl.constructor.is_some() {
                vec![
                    g.ctx.stmt_line(&format!("let mut this = {value}")),
                    g.ctx.stmt_line("this.creo()"),
                    g.ctx.line("this"),
                ]
            } else {
                vec![g.ctx.line(&value)]
            })
        })?;
        let head = format!("pub fn new({}) -> Self", params.join(", "));
        Ok(brace_block(&self.ctx.pad(), &head, &lines))
    }

    fn interface(&mut self, decl: &InterfaceDecl) -> CodegenResult<String> {
        self.traits.insert(
            decl.name.clone(),
            decl.methods.iter().map(|m| m.name.clone()).collect(),
        );
        let lines = self.indented(|g| {
            let mut out = Vec::with_capacity(decl.methods.len());
            for sig in &decl.methods {
                if sig.mode.is_generator() {
                    return Err(CodegenError::unsupported(
                        format!("cursor method `{}`", sig.name),
                        TARGET,
                    ));
                }
                let is_async = sig.mode.is_async();
                let mut params = vec!["&self".to_string()];
                params.extend(g.params(&sig.name, &sig.params)?);
                let ret = g.ret_ty(sig.ret.as_ref(), is_async)?;
                out.push(g.ctx.stmt_line(&format!(
                    "{}fn {}({}){}",
                    if is_async { "async " } else { "" },
                    sig.name,
                    params.join(", "),
                    signature_ret(&ret, false),
                )));
            }
            Ok(out)
        })?;
        let head = format!("pub trait {}{}", decl.name, generics(&decl.type_params));
        Ok(brace_block(&self.ctx.pad(), &head, &lines))
    }

    fn enumeration(&mut self, decl: &EnumDecl) -> CodegenResult<String> {
        self.ctx.require(Features::ENUM);
        let lines = self.indented(|g| {
            let mut out = Vec::with_capacity(decl.members.len());
            for member in &decl.members {
                out.push(match &member.value {
                    None => g.ctx.line(&format!("{},", member.name)),
                    Some(Literal::Integer(n)) => g.ctx.line(&format!("{} = {n},", member.name)),
                    Some(_) => {
                        return Err(CodegenError::unsupported(
                            format!("non-integer value for ordo member `{}`", member.name),
                            TARGET,
                        ))
                    }
                });
            }
            Ok(out)
        })?;
        let pad = self.ctx.pad();
        Ok(format!(
            "{pad}#[derive(Debug, Clone, Copy, PartialEq, Eq)]\n{}",
            brace_block(&pad, &format!("pub enum {}", decl.name), &lines)
        ))
    }

    fn union(&mut self, decl: &UnionDecl) -> CodegenResult<String> {
        let lines = self.indented(|g| {
            let mut out = Vec::with_capacity(decl.variants.len());
            for variant in &decl.variants {
                if variant.fields.is_empty() {
                    out.push(g.ctx.line(&format!("{},", variant.name)));
                    continue;
                }
                let mut fields = Vec::with_capacity(variant.fields.len());
                for field in &variant.fields {
                    fields.push(format!("{}: {}", field.name, g.ty(&field.ty)?));
                }
                out.push(g.ctx.line(&format!("{} {{ {} }},", variant.name, fields.join(", "))));
            }
            Ok(out)
        })?;
        let pad = self.ctx.pad();
        let head = format!("pub enum {}{}", decl.name, generics(&decl.type_params));
        Ok(format!(
            "{pad}#[derive(Debug, Clone)]\n{}",
            brace_block(&pad, &head, &lines)
        ))
    }

    fn if_chain(&mut self, if_stmt: &IfStmt) -> CodegenResult<String> {
        let pad = self.ctx.pad();
        let mut out = Vec::new();
        let mut current = if_stmt;
        let mut opener = format!("{pad}if");
        loop {
            let cond = self.lower_expr(&current.cond)?;
            out.push(format!("{opener} {cond} {{"));
            out.extend(self.lower_block_lines(&current.then)?);
            match &current.otherwise {
                Some(ElseBranch::If(next)) => {
                    opener = format!("{pad}}} else if");
                    current = next.as_ref();
                }
                Some(ElseBranch::Block(block)) => {
                    out.push(format!("{pad}}} else {{"));
                    out.extend(self.lower_block_lines(block)?);
                    break;
                }
                None => break,
            }
        }
        out.push(format!("{pad}}}"));
        Ok(out.join("\n"))
    }

    fn for_loop(&mut self, for_stmt: &ForStmt) -> CodegenResult<String> {
        let binding = &for_stmt.binding;
        let pad = self.ctx.pad();
        let iterable = &for_stmt.iterable;

        if for_stmt.is_async {
            self.ctx.require(Features::ASYNC | Features::STREAM);
            let stream = self.lower_expr(iterable)?;
            let lines = self.lower_block_lines(&for_stmt.body)?;
            let head = format!("while let Some({binding}) = {stream}.next().await");
            return Ok(brace_block(&pad, &head, &lines));
        }

        let source = match &iterable.unparen().kind {
            ExprKind::Range {
                start,
                end,
                step,
                inclusive,
            } => self.loop_range(start, end, step.as_deref(), *inclusive)?,
            _ => {
                let lowered = self.lower_expr(iterable)?;
                let tabula = resolves_to(iterable, Builtin::Tabula);
                let copia = resolves_to(iterable, Builtin::Copia);
                let lista = resolves_to(iterable, Builtin::Lista);
                match for_stmt.kind {
                    ForKind::Keys if tabula => format!("{lowered}.keys()"),
                    ForKind::Keys if copia => format!("{lowered}.iter()"),
                    ForKind::Keys => format!("0..{lowered}.len()"),
                    ForKind::Values if tabula => format!("{lowered}.values()"),
                    ForKind::Values if copia || lista => format!("{lowered}.iter()"),
                    ForKind::Values => lowered,
                }
            }
        };
        let lines = self.lower_block_lines(&for_stmt.body)?;
        Ok(brace_block(&pad, &format!("for {binding} in {source}"), &lines))
    }

    /// Loop-header range. Descending ranges are spelled ascending and
    /// reversed; a step becomes `step_by` over its magnitude.
    pub(super) fn loop_range(
        &mut self,
        start: &Expr,
        end: &Expr,
        step: Option<&Expr>,
        inclusive: bool,
    ) -> CodegenResult<String> {
        let start = self.lower_expr(start)?;
        let end = self.lower_expr(end)?;
        if descending(step) {
            let low = if inclusive { end } else { format!("({end} + 1)") };
            let mut source = format!("({low}..={start}).rev()");
            match step.map(|s| &s.unparen().kind) {
                Some(ExprKind::Literal(Literal::Integer(-1))) | None => {}
                Some(ExprKind::Literal(Literal::Integer(n))) => {
                    source.push_str(&format!(".step_by({})", n.unsigned_abs()));
                }
                Some(ExprKind::Unary { operand, .. }) => {
                    let magnitude = self.lower_expr(operand)?;
                    source.push_str(&format!(".step_by({magnitude} as usize)"));
                }
                Some(_) => return Err(CodegenError::unsupported("non-integer range step", TARGET)),
            }
            return Ok(source);
        }
        let op = if inclusive { "..=" } else { ".." };
        match step {
            Some(step) => {
                let step = self.lower_expr(step)?;
                Ok(format!("({start}{op}{end}).step_by({step} as usize)"))
            }
            None => Ok(format!("{start}{op}{end}")),
        }
    }

    fn switch(&mut self, switch: &SwitchStmt) -> CodegenResult<String> {
        let subject = self.lower_expr(&switch.discriminant)?;
        let subject = if resolves_to(&switch.discriminant, Builtin::Textus) {
            format!("{subject}.as_str()")
        } else {
            subject
        };
        let pad = self.ctx.pad();
        let arms = self.indented(|g| {
            let arm_pad = g.ctx.pad();
            let mut out = Vec::with_capacity(switch.cases.len() + 1);
            for case in &switch.cases {
                let mut values = Vec::with_capacity(case.values.len());
                for value in &case.values {
                    values.push(g.str_arg(value)?);
                }
                let lines = g.lower_block_lines(&case.body)?;
                out.push(brace_block(&arm_pad, &format!("{} =>", values.join(" | ")), &lines));
            }
            let default = match &switch.default {
                Some(block) => g.lower_block_lines(block)?,
                None => Vec::new(),
            };
            out.push(brace_block(&arm_pad, "_ =>", &default));
            Ok(out)
        })?;
        Ok(brace_block(&pad, &format!("match {subject}"), &arms))
    }

    fn match_stmt(&mut self, match_stmt: &MatchStmt) -> CodegenResult<String> {
        let subject = self.lower_expr(&match_stmt.subject)?;
        let pad = self.ctx.pad();
        let mut union = None;
        let arms = self.indented(|g| {
            let arm_pad = g.ctx.pad();
            let mut out = Vec::with_capacity(match_stmt.arms.len() + 1);
            for arm in &match_stmt.arms {
                let Some(info) = g.ctx.variant(&arm.variant) else {
                    return Err(CodegenError::unsupported(
                        format!("discerne arm for undeclared variant `{}`", arm.variant),
                        TARGET,
                    ));
                };
                let path = format!("{}::{}", info.union, arm.variant);
                let has_fields = !info.fields.is_empty();
                let pattern = match &arm.binding {
                    VariantBinding::None if has_fields => format!("{path} {{ .. }}"),
                    VariantBinding::None => path,
                    VariantBinding::Alias(alias) if has_fields => {
                        let bound: Vec<String> = info
                            .fields
                            .iter()
                            .map(|field| format!("{field}: {alias}_{field}"))
                            .collect();
                        format!("{alias} @ {path} {{ {} }}", bound.join(", "))
                    }
                    VariantBinding::Alias(alias) => format!("{alias} @ {path}"),
                    VariantBinding::Fields(names) => {
                        let mut bound: Vec<String> = info
                            .fields
                            .iter()
                            .zip(names)
                            .map(|(field, local)| {
                                if field == local {
                                    field.clone()
                                } else {
                                    format!("{field}: {local}")
                                }
                            })
                            .collect();
                        if names.len() < info.fields.len() {
                            bound.push("..".to_string());
                        }
                        format!("{path} {{ {} }}", bound.join(", "))
                    }
                };
                union = Some(info.union.clone());
                let payload = match &arm.binding {
                    VariantBinding::Alias(alias) if has_fields => {
                        Some((alias.clone(), info.fields.clone()))
                    }
                    _ => None,
                };
                let lines = match payload {
                    Some((alias, fields)) => {
                        let shadowed = g.payload_aliases.insert(alias.clone(), fields);
                        let lines = g.lower_block_lines(&arm.body);
                        match shadowed {
                            Some(fields) => g.payload_aliases.insert(alias, fields),
                            None => g.payload_aliases.remove(&alias),
                        };
                        lines?
                    }
                    None => g.lower_block_lines(&arm.body)?,
                };
                out.push(brace_block(&arm_pad, &format!("{pattern} =>"), &lines));
            }
            let exhaustive = union
                .as_deref()
                .is_some_and(|u| match_stmt.arms.len() >= g.ctx.variant_count(u));
            match &match_stmt.default {
                Some(block) => {
                    let lines = g.lower_block_lines(block)?;
                    out.push(brace_block(&arm_pad, "_ =>", &lines));
                }
                None if !exhaustive => out.push(brace_block(&arm_pad, "_ =>", &[])),
                None => {}
            }
            Ok(out)
        })?;
        Ok(brace_block(&pad, &format!("match &{subject}"), &arms))
    }

    /// A `cape` handler runs the body in an immediately-invoked fallible
    /// closure (an async block inside async functions) and matches on its
    /// result. `demum` runs after the attempt as a plain block.
    ///
    /// Inside the closure `return`, `break` and `continue` would target the
    /// closure, so a body that leaves early is rejected.
    fn try_stmt(&mut self, try_stmt: &TryStmt) -> CodegenResult<String> {
        let pad = self.ctx.pad();
        let mut out = Vec::new();
        match &try_stmt.catch {
            None => {
                let lines = self.lower_block_lines(&try_stmt.body)?;
                out.push(brace_block(&pad, "", &lines));
            }
            Some(catch) => {
                if body_escapes(&try_stmt.body) {
                    return Err(CodegenError::unsupported(
                        "redde, rumpe or perge leaving a tempta with cape",
                        TARGET,
                    ));
                }
                let is_async = self.ctx.in_async();
                let frame = Frame {
                    fallible: true,
                    comptime_label: None,
                    ..self.ctx.frame.clone()
                };
                let (mut lines, _) = self.with_frame(frame, |g| g.lower_block_lines(&try_stmt.body))?;
                if is_async {
                    lines.push(self.indented(|g| Ok(g.ctx.line(&format!("Ok::<(), {ERROR_TY}>(())"))))?);
                    out.push(format!("{pad}match async {{"));
                    out.extend(lines);
                    out.push(format!("{pad}}}.await {{"));
                } else {
                    lines.push(self.indented(|g| Ok(g.ctx.line("Ok(())")))?);
                    out.push(format!("{pad}match (|| -> Result<(), {ERROR_TY}> {{"));
                    out.extend(lines);
                    out.push(format!("{pad}}})() {{"));
                }
                let handler = self.indented(|g| {
                    let ok = g.ctx.line("Ok(()) => {}");
                    let lines = g.lower_block_lines(&catch.body)?;
                    let err = brace_block(&g.ctx.pad(), &format!("Err({}) =>", catch.param), &lines);
                    Ok(vec![ok, err])
                })?;
                out.extend(handler);
                out.push(format!("{pad}}}"));
            }
        }
        if let Some(finally) = &try_stmt.finally {
            let lines = self.lower_block_lines(finally)?;
            out.push(brace_block(&pad, "", &lines));
        }
        Ok(out.join("\n"))
    }

    fn raise(&mut self, kind: RaiseKind, value: &Expr) -> CodegenResult<String> {
        match kind {
            RaiseKind::Fatal => {
                self.ctx.require(Features::PANIC);
                match &value.unparen().kind {
                    ExprKind::Literal(Literal::String(s)) if !s.contains(['{', '}']) => {
                        Ok(format!("panic!({})", self.str_arg(value)?))
                    }
                    _ => Ok(format!("panic!(\"{{}}\", {})", self.str_arg(value)?)),
                }
            }
            RaiseKind::Error => {
                if !self.ctx.frame.in_function {
                    return Err(CodegenError::unsupported("iace outside a function", TARGET));
                }
                self.ctx.require(Features::RAISE);
                self.ctx.frame.fallible = true;
                let value = self.str_arg(value)?;
                Ok(format!("return Err({value}.into())"))
            }
        }
    }

    fn print(&mut self, level: PrintLevel, args: &[Expr]) -> CodegenResult<String> {
        self.ctx.require(Features::PRINT);
        let (mac, placeholder) = match level {
            PrintLevel::Log => ("println!", "{}"),
            PrintLevel::Debug => ("println!", "{:?}"),
            PrintLevel::Warn => ("eprintln!", "{}"),
        };
        if args.is_empty() {
            return Ok(self.ctx.stmt_line(&format!("{mac}()")));
        }
        let mut lowered = Vec::with_capacity(args.len());
        for arg in args {
            lowered.push(self.str_arg(arg)?);
        }
        let format = vec![placeholder; args.len()].join(" ");
        Ok(self
            .ctx
            .stmt_line(&format!("{mac}(\"{format}\", {})", lowered.join(", "))))
    }

    /// Arena and page blocks are plain scopes; an acquired resource is bound
    /// at the top of the scope and dropped at its end.
    fn resource(&mut self, resource: &ResourceStmt) -> CodegenResult<String> {
        let pad = self.ctx.pad();
        let mut lines = Vec::new();
        if let ResourceKind::Acquire(init) = &resource.kind {
            let init = self.lower_expr(init)?;
            lines.push(self.indented(|g| Ok(g.ctx.stmt_line(&format!("let {} = {init}", resource.binding))))?);
        }
        lines.extend(self.lower_block_lines(&resource.body)?);
        Ok(brace_block(&pad, "", &lines))
    }

    fn entry(&mut self, is_async: bool, body: &Block) -> CodegenResult<String> {
        let mode = if is_async {
            self.ctx.require(Features::ASYNC);
            FunctionMode::Async
        } else {
            FunctionMode::Sync
        };
        let (mut lines, frame) = self.with_frame(Frame::function(mode, body_raises(body)), |g| {
            g.lower_block_lines(body)
        })?;
        if frame.fallible && !ends_with_return(body) {
            lines.push(self.indented(|g| Ok(g.ctx.line("Ok(())")))?);
        }
        let pad = self.ctx.pad();
        let head = format!("fn main(){}", signature_ret("()", frame.fallible));
        if is_async {
            Ok(format!(
                "{pad}#[tokio::main]\n{}",
                brace_block(&pad, &format!("async {head}"), &lines)
            ))
        } else {
            Ok(brace_block(&pad, &head, &lines))
        }
    }
}

/// `<T, U>`, or nothing.
fn generics(params: &[String]) -> String {
    if params.is_empty() {
        String::new()
    } else {
        format!("<{}>", params.join(", "))
    }
}

/// ` -> R` part of a signature; omitted for a plain unit return.
fn signature_ret(ret: &str, fallible: bool) -> String {
    match (fallible, ret) {
        (true, ret) => format!(" -> Result<{ret}, {ERROR_TY}>"),
        (false, "()") => String::new(),
        (false, ret) => format!(" -> {ret}"),
    }
}

/// Whether the last statement leaves the function, so no trailing `Ok(())`
/// is reachable.
fn ends_with_return(body: &Block) -> bool {
    matches!(
        body.stmts.last().map(|s| &s.kind),
        Some(StmtKind::Return(_) | StmtKind::Raise { .. })
    )
}

/// `./util/strings` as a Rust path: `crate::util::strings`.
fn module_path(source: &str) -> String {
    let trimmed = source.strip_suffix(".fab").unwrap_or(source);
    trimmed
        .split('/')
        .filter(|s| !s.is_empty())
        .map(|segment| match segment {
            "." => "crate",
            ".." => "super",
            other => other,
        })
        .collect::<Vec<_>>()
        .join("::")
}
