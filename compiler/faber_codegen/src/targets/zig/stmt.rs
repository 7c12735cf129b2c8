//! Statement lowering for Zig.

use faber_ir::{
    BindingTarget, Block, ClassDecl, ElseBranch, EnumDecl, Expr, ExprKind, ForKind, ForStmt,
    FunctionDecl, IfStmt, ImportDecl, ImportItems, Literal, MatchStmt, PrintLevel, RaiseKind,
    ResourceKind, ResourceStmt, SemanticType, Stmt, StmtKind, SwitchStmt, TryStmt, UnionDecl,
    VarDecl, VariantBinding,
};

use super::types::literal_ty;
use super::ZigGenerator;
use crate::analysis::body_raises;
use crate::context::{Frame, DEFAULT_ALLOCATOR};
use crate::features::Features;
use crate::generator::Generator;
use crate::targets::{brace_block, error_ident, quoted, range_cmp, resolves_to, Builtin};
use crate::{CodegenError, CodegenResult, CodegenTarget};

const TARGET: CodegenTarget = CodegenTarget::Zig;

impl ZigGenerator<'_> {
    pub(super) fn stmt(&mut self, stmt: &Stmt) -> CodegenResult<String> {
        match &stmt.kind {
            StmtKind::Import(decl) => Ok(self.import(decl)),
            StmtKind::Var(decl) => self.var(decl),
            StmtKind::Function(decl) => {
                if self.ctx.frame.in_function {
                    return Err(CodegenError::unsupported("nested function declaration", TARGET));
                }
                self.function(decl, None)
            }
            StmtKind::Class(decl) => self.class(decl),
            StmtKind::Interface(decl) => Err(CodegenError::unsupported(
                format!("pactum `{}`", decl.name),
                TARGET,
            )),
            StmtKind::Enum(decl) => self.enumeration(decl),
            StmtKind::Union(decl) => self.union(decl),
            StmtKind::TypeAlias(decl) => {
                let ty = self.ty(&decl.ty)?;
                Ok(self.ctx.stmt_line(&format!("const {} = {ty}", decl.name)))
            }
            StmtKind::If(if_stmt) => self.if_chain(if_stmt),
            StmtKind::While { cond, body } => {
                let cond = self.lower_expr(cond)?;
                let lines = self.lower_block_lines(body)?;
                Ok(brace_block(&self.ctx.pad(), &format!("while ({cond})"), &lines))
            }
            StmtKind::For(for_stmt) => self.for_loop(for_stmt),
            StmtKind::Switch(switch) => self.switch(switch),
            StmtKind::Match(match_stmt) => self.match_stmt(match_stmt),
            StmtKind::Guard(clauses) => {
                let mut out = Vec::with_capacity(clauses.len());
                for clause in clauses {
                    let cond = self.lower_expr(&clause.cond)?;
                    let lines = self.lower_block_lines(&clause.body)?;
                    out.push(brace_block(&self.ctx.pad(), &format!("if ({cond})"), &lines));
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
                let text = match (&self.ctx.frame.comptime_label, value) {
                    (Some(label), Some(value)) => format!("break :{label} {value}"),
                    (Some(label), None) => format!("break :{label}"),
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
                let text = if discards_value(expr) {
                    format!("_ = {text}")
                } else {
                    text
                };
                Ok(self.ctx.stmt_line(&text))
            }
            StmtKind::Print { level, args } => self.print(*level, args),
            StmtKind::Assert { cond, message } => {
                self.ctx.require(Features::STD);
                let cond = self.lower_expr(cond)?;
                let text = match message {
                    Some(message) => {
                        self.ctx.require(Features::PANIC);
                        let message = self.lower_expr(message)?;
                        format!("if (!({cond})) @panic({message})")
                    }
                    None => format!("std.debug.assert({cond})"),
                };
                Ok(self.ctx.stmt_line(&text))
            }
            StmtKind::Resource(resource) => self.resource(resource),
            StmtKind::Entry { body, .. } => self.entry(body),
        }
    }

    /// Statements of `block` at the current depth.
    fn flat_lines(&mut self, block: &Block) -> CodegenResult<Vec<String>> {
        block.stmts.iter().map(|s| self.lower_stmt(s)).collect()
    }

    fn import(&self, decl: &ImportDecl) -> String {
        let path = if decl.source.starts_with('.') && !decl.source.ends_with(".zig") {
            format!("{}.zig", decl.source)
        } else {
            decl.source.clone()
        };
        let module = format!("@import({})", quoted(&path));
        match &decl.items {
            ImportItems::Namespace(alias) => self.ctx.stmt_line(&format!("const {alias} = {module}")),
            ImportItems::Named(names) => names
                .iter()
                .map(|n| {
                    let local = n.alias.as_deref().unwrap_or(&n.name);
                    self.ctx
                        .stmt_line(&format!("const {local} = {module}.{}", n.name))
                })
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }

    fn binding_keyword(&self, mutable: bool, name: &str) -> &'static str {
        if mutable || self.mutated.contains(name) {
            "var"
        } else {
            "const"
        }
    }

    fn var(&mut self, decl: &VarDecl) -> CodegenResult<String> {
        match &decl.target {
            BindingTarget::Ident(name) => {
                let keyword = self.binding_keyword(decl.mutable, name);
                let ty = match &decl.ty {
                    Some(ty) => Some(self.ty(ty)?),
                    None if keyword == "var" || decl.init.is_none() => {
                        self.inferred_ty(decl.init.as_ref())
                    }
                    None => None,
                };
                let init = match &decl.init {
                    Some(init) => self.lower_expr(init)?,
                    None => "undefined".to_string(),
                };
                let text = match ty {
                    Some(ty) => format!("{keyword} {name}: {ty} = {init}"),
                    None if decl.init.is_none() => {
                        return Err(CodegenError::unsupported(
                            format!("declaration of `{name}` with neither type nor initializer"),
                            TARGET,
                        ))
                    }
                    None => format!("{keyword} {name} = {init}"),
                };
                Ok(self.ctx.stmt_line(&text))
            }
            BindingTarget::Object(fields) => {
                let (mut lines, source) = self.destructure_source(decl)?;
                for (field, alias) in fields {
                    let local = alias.as_deref().unwrap_or(field);
                    let keyword = self.binding_keyword(decl.mutable, local);
                    lines.push(self.ctx.stmt_line(&format!("{keyword} {local} = {source}.{field}")));
                }
                Ok(lines.join("\n"))
            }
            BindingTarget::Array(names) => {
                let (mut lines, source) = self.destructure_source(decl)?;
                let is_lista = decl
                    .init
                    .as_ref()
                    .is_some_and(|init| resolves_to(init, Builtin::Lista));
                let elements = if is_lista {
                    format!("{source}.items")
                } else {
                    source
                };
                for (i, name) in names.iter().enumerate() {
                    let keyword = self.binding_keyword(decl.mutable, name);
                    lines.push(self.ctx.stmt_line(&format!("{keyword} {name} = {elements}[{i}]")));
                }
                Ok(lines.join("\n"))
            }
        }
    }

    /// Declared type for a binding with no annotation: the resolved type,
    /// then the literal kind of the initializer.
    fn inferred_ty(&mut self, init: Option<&Expr>) -> Option<String> {
        let init = init?;
        if let Some(ty) = init.resolved.as_ref().and_then(|t| self.semantic_ty(t)) {
            return Some(ty);
        }
        match &init.unparen().kind {
            ExprKind::Literal(lit) => literal_ty(lit).map(str::to_string),
            ExprKind::Template(_) => Some("[]const u8".to_string()),
            ExprKind::Native { ty, .. } => self.ty(ty).ok(),
            _ => None,
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
        let line = self.ctx.stmt_line(&format!("const {temp} = {lowered}"));
        Ok((vec![line], temp))
    }

    /// A function or, with `self_ty`, a method of that struct.
    ///
    /// Whether the function is fallible or takes an allocator is only known
    /// after its body is lowered, so the signature is assembled last.
    fn function(&mut self, decl: &FunctionDecl, self_ty: Option<&str>) -> CodegenResult<String> {
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
        if decl.params.iter().any(|p| p.default.is_some()) {
            return Err(CodegenError::unsupported(
                format!("default parameter in `{}`", decl.name),
                TARGET,
            ));
        }
        if decl.mode.is_async() {
            self.ctx.require(Features::ASYNC);
        }

        let fallible = self.fallible_fns.contains(&decl.name)
            || decl.mode.is_async()
            || body_raises(body);
        let (lines, frame) = self.with_frame(Frame::function(decl.mode, fallible), |g| {
            g.lower_block_lines(body)
        })?;
        if frame.fallible {
            self.fallible_fns.insert(decl.name.clone());
        }
        if frame.wants_allocator {
            self.ctx.alloc_fns.insert(decl.name.clone());
        }

        let mut params: Vec<String> = decl
            .type_params
            .iter()
            .map(|t| format!("comptime {t}: type"))
            .collect();
        if let Some(self_ty) = self_ty {
            params.push(format!("self: *{self_ty}"));
        }
        if self.ctx.takes_allocator(&decl.name) {
            self.ctx.require(Features::STD);
            params.push(format!("{DEFAULT_ALLOCATOR}: std.mem.Allocator"));
        }
        for param in &decl.params {
            let ty = match &param.ty {
                Some(ty) => self.ty(ty)?,
                None => "anytype".to_string(),
            };
            params.push(if param.rest {
                format!("{}: []const {ty}", param.name)
            } else {
                format!("{}: {ty}", param.name)
            });
        }
        let ret = match &decl.ret {
            Some(ret) => self.ty(ret)?,
            None => "void".to_string(),
        };
        let ret = if frame.fallible { format!("!{ret}") } else { ret };
        let visibility = if self_ty.is_some() { "pub fn" } else { "fn" };
        let head = format!("{visibility} {}({}) {ret}", decl.name, params.join(", "));
        Ok(brace_block(&self.ctx.pad(), &head, &lines))
    }

    fn struct_members(&mut self, decl: &ClassDecl, self_ty: &str) -> CodegenResult<Vec<String>> {
        let mut members = Vec::new();
        for field in &decl.fields {
            let ty = self.ty(&field.ty)?;
            members.push(match &field.init {
                Some(init) => {
                    let init = self.lower_expr(init)?;
                    self.ctx.line(&format!("{}: {ty} = {init},", field.name))
                }
                None => self.ctx.line(&format!("{}: {ty},", field.name)),
            });
        }
        if let Some(ctor) = &decl.constructor {
            let creo = FunctionDecl::new("creo", Vec::new(), ctor.clone());
            members.push(self.function(&creo, Some(self_ty))?);
        }
        for method in &decl.methods {
            members.push(self.function(method, Some(self_ty))?);
        }
        Ok(members)
    }

    fn class(&mut self, decl: &ClassDecl) -> CodegenResult<String> {
        let pad = self.ctx.pad();
        if decl.type_params.is_empty() {
            let members = self.indented(|g| g.struct_members(decl, &decl.name))?;
            let block = brace_block(&pad, &format!("const {} = struct", decl.name), &members);
            return Ok(format!("{block};"));
        }
        let comptime: Vec<String> = decl
            .type_params
            .iter()
            .map(|t| format!("comptime {t}: type"))
            .collect();
        let inner = self.indented(|g| {
            let members = g.indented(|g| g.struct_members(decl, "@This()"))?;
            let block = brace_block(&g.ctx.pad(), "return struct", &members);
            Ok(vec![format!("{block};")])
        })?;
        Ok(brace_block(
            &pad,
            &format!("fn {}({}) type", decl.name, comptime.join(", ")),
            &inner,
        ))
    }

    fn enumeration(&mut self, decl: &EnumDecl) -> CodegenResult<String> {
        self.ctx.require(Features::ENUM);
        let lines = self.indented(|g| {
            Ok(decl
                .members
                .iter()
                .map(|m| match &m.value {
                    Some(Literal::Integer(n)) => g.ctx.line(&format!("{} = {n},", m.name)),
                    _ => g.ctx.line(&format!("{},", m.name)),
                })
                .collect::<Vec<_>>())
        })?;
        let tag = if decl.members.iter().any(|m| m.value.is_some()) {
            "enum(i64)"
        } else {
            "enum"
        };
        let block = brace_block(&self.ctx.pad(), &format!("const {} = {tag}", decl.name), &lines);
        Ok(format!("{block};"))
    }

    fn union(&mut self, decl: &UnionDecl) -> CodegenResult<String> {
        let variants = |g: &mut Self| -> CodegenResult<Vec<String>> {
            let mut out = Vec::with_capacity(decl.variants.len());
            for variant in &decl.variants {
                if variant.fields.is_empty() {
                    out.push(g.ctx.line(&format!("{}: void,", variant.name)));
                    continue;
                }
                let mut fields = Vec::with_capacity(variant.fields.len());
                for field in &variant.fields {
                    fields.push(format!("{}: {}", field.name, g.ty(&field.ty)?));
                }
                out.push(g.ctx.line(&format!(
                    "{}: struct {{ {} }},",
                    variant.name,
                    fields.join(", ")
                )));
            }
            Ok(out)
        };
        let pad = self.ctx.pad();
        if decl.type_params.is_empty() {
            let lines = self.indented(variants)?;
            let block = brace_block(&pad, &format!("const {} = union(enum)", decl.name), &lines);
            return Ok(format!("{block};"));
        }
        let comptime: Vec<String> = decl
            .type_params
            .iter()
            .map(|t| format!("comptime {t}: type"))
            .collect();
        let inner = self.indented(|g| {
            let lines = g.indented(variants)?;
            let block = brace_block(&g.ctx.pad(), "return union(enum)", &lines);
            Ok(vec![format!("{block};")])
        })?;
        Ok(brace_block(
            &pad,
            &format!("fn {}({}) type", decl.name, comptime.join(", ")),
            &inner,
        ))
    }

    fn if_chain(&mut self, if_stmt: &IfStmt) -> CodegenResult<String> {
        let pad = self.ctx.pad();
        let mut out = Vec::new();
        let mut current = if_stmt;
        let mut opener = format!("{pad}if");
        loop {
            let cond = self.lower_expr(&current.cond)?;
            out.push(format!("{opener} ({cond}) {{"));
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
        if for_stmt.is_async {
            return Err(CodegenError::unsupported("async iteration", TARGET));
        }
        let binding = &for_stmt.binding;
        let pad = self.ctx.pad();
        let iterable = &for_stmt.iterable;

        if let ExprKind::Range {
            start,
            end,
            step,
            inclusive,
        } = &iterable.unparen().kind
        {
            let start = self.lower_expr(start)?;
            let end = self.lower_expr(end)?;
            let step_text = match step {
                Some(step) => self.lower_expr(step)?,
                None => "1".to_string(),
            };
            let cmp = range_cmp(*inclusive, step.as_deref()).symbol();
            let inner = self.indented(|g| {
                let counter = g.ctx.stmt_line(&format!("var {binding}: i64 = {start}"));
                let lines = g.lower_block_lines(&for_stmt.body)?;
                let head = format!("while ({binding} {cmp} {end}) : ({binding} += {step_text})");
                Ok(vec![counter, brace_block(&g.ctx.pad(), &head, &lines)])
            })?;
            return Ok(brace_block(&pad, "", &inner));
        }

        let lowered = self.lower_expr(iterable)?;
        let is_lista = resolves_to(iterable, Builtin::Lista);
        let iterator = match for_stmt.kind {
            ForKind::Keys if resolves_to(iterable, Builtin::Tabula) => "keyIterator",
            ForKind::Values if resolves_to(iterable, Builtin::Tabula) => "valueIterator",
            ForKind::Values if resolves_to(iterable, Builtin::Copia) => "keyIterator",
            ForKind::Keys if resolves_to(iterable, Builtin::Copia) => {
                return Err(CodegenError::unsupported("de over a copia", TARGET));
            }
            ForKind::Keys => {
                let items = if is_lista {
                    format!("{lowered}.items")
                } else {
                    lowered
                };
                let lines = self.lower_block_lines(&for_stmt.body)?;
                let head = format!("for ({items}, 0..) |_, {binding}|");
                return Ok(brace_block(&pad, &head, &lines));
            }
            ForKind::Values => {
                let items = if is_lista {
                    format!("{lowered}.items")
                } else {
                    lowered
                };
                let lines = self.lower_block_lines(&for_stmt.body)?;
                return Ok(brace_block(&pad, &format!("for ({items}) |{binding}|"), &lines));
            }
        };

        let it = self.ctx.fresh_label("it");
        let entry = self.ctx.fresh_label("entry");
        let inner = self.indented(|g| {
            let init = g.ctx.stmt_line(&format!("var {it} = {lowered}.{iterator}()"));
            let body = g.indented(|g| {
                let mut lines = vec![g.ctx.stmt_line(&format!("const {binding} = {entry}.*"))];
                lines.extend(g.flat_lines(&for_stmt.body)?);
                Ok(lines)
            })?;
            let head = format!("while ({it}.next()) |{entry}|");
            Ok(vec![init, brace_block(&g.ctx.pad(), &head, &body)])
        })?;
        Ok(brace_block(&pad, "", &inner))
    }

    fn switch(&mut self, switch: &SwitchStmt) -> CodegenResult<String> {
        if resolves_to(&switch.discriminant, Builtin::Textus) {
            return self.string_switch(switch);
        }
        let discriminant = self.lower_expr(&switch.discriminant)?;
        let is_enum = matches!(
            &switch.discriminant.resolved,
            Some(SemanticType::User { name, .. }) if self.ctx.is_enum(name)
        );
        let prongs = self.indented(|g| {
            let pad = g.ctx.pad();
            let mut out = Vec::new();
            for case in &switch.cases {
                let values = g.lower_exprs(&case.values)?;
                let lines = g.lower_block_lines(&case.body)?;
                out.push(format!("{},", brace_block(&pad, &format!("{} =>", values.join(", ")), &lines)));
            }
            match &switch.default {
                Some(default) => {
                    let lines = g.lower_block_lines(default)?;
                    out.push(format!("{},", brace_block(&pad, "else =>", &lines)));
                }
                None if !is_enum => out.push(g.ctx.line("else => {},")),
                None => {}
            }
            Ok(out)
        })?;
        Ok(brace_block(&self.ctx.pad(), &format!("switch ({discriminant})"), &prongs))
    }

    /// Zig cannot switch on slices; string cases become an `if` chain.
    fn string_switch(&mut self, switch: &SwitchStmt) -> CodegenResult<String> {
        self.ctx.require(Features::STD);
        let subject = self.lower_expr(&switch.discriminant)?;
        let pad = self.ctx.pad();
        let mut out = Vec::new();
        for (i, case) in switch.cases.iter().enumerate() {
            let values = self.lower_exprs(&case.values)?;
            let cond = values
                .iter()
                .map(|v| format!("std.mem.eql(u8, {subject}, {v})"))
                .collect::<Vec<_>>()
                .join(" or ");
            let opener = if i == 0 {
                format!("{pad}if")
            } else {
                format!("{pad}}} else if")
            };
            out.push(format!("{opener} ({cond}) {{"));
            out.extend(self.lower_block_lines(&case.body)?);
        }
        if let Some(default) = &switch.default {
            if out.is_empty() {
                return Ok(brace_block(&pad, "", &self.lower_block_lines(default)?));
            }
            out.push(format!("{pad}}} else {{"));
            out.extend(self.lower_block_lines(default)?);
        }
        if out.is_empty() {
            return Ok(String::new());
        }
        out.push(format!("{pad}}}"));
        Ok(out.join("\n"))
    }

    fn match_stmt(&mut self, match_stmt: &MatchStmt) -> CodegenResult<String> {
        let subject = self.lower_expr(&match_stmt.subject)?;
        let union = match_stmt
            .arms
            .first()
            .and_then(|arm| self.ctx.variant(&arm.variant))
            .map(|info| info.union.clone());
        let exhaustive = union
            .as_deref()
            .is_some_and(|u| self.ctx.variant_count(u) <= match_stmt.arms.len());
        let prongs = self.indented(|g| {
            let pad = g.ctx.pad();
            let mut out = Vec::new();
            for arm in &match_stmt.arms {
                let (capture, mut lines) = match &arm.binding {
                    VariantBinding::None => (String::new(), Vec::new()),
                    VariantBinding::Alias(alias) => (format!(" |{alias}|"), Vec::new()),
                    VariantBinding::Fields(names) => {
                        let payload = g.ctx.fresh_label("payload");
                        let fields = g.ctx.variant(&arm.variant).map(|v| v.fields.clone());
                        let lines = g.indented(|g| {
                            Ok(names
                                .iter()
                                .enumerate()
                                .map(|(i, name)| {
                                    let field = fields
                                        .as_ref()
                                        .and_then(|f| f.get(i))
                                        .map_or(name.as_str(), String::as_str);
                                    g.ctx.stmt_line(&format!("const {name} = {payload}.{field}"))
                                })
                                .collect::<Vec<_>>())
                        })?;
                        (format!(" |{payload}|"), lines)
                    }
                };
                lines.extend(g.lower_block_lines(&arm.body)?);
                let head = format!(".{} =>{capture}", arm.variant);
                out.push(format!("{},", brace_block(&pad, &head, &lines)));
            }
            match &match_stmt.default {
                Some(default) => {
                    let lines = g.lower_block_lines(default)?;
                    out.push(format!("{},", brace_block(&pad, "else =>", &lines)));
                }
                None if !exhaustive => out.push(g.ctx.line("else => {},")),
                None => {}
            }
            Ok(out)
        })?;
        Ok(brace_block(&self.ctx.pad(), &format!("switch ({subject})"), &prongs))
    }

    fn try_stmt(&mut self, try_stmt: &TryStmt) -> CodegenResult<String> {
        if try_stmt.catch.is_some() {
            return Err(CodegenError::unsupported("tempta with cape", TARGET));
        }
        let pad = self.ctx.pad();
        let inner = self.indented(|g| {
            let mut lines = Vec::new();
            if let Some(finally) = &try_stmt.finally {
                let cleanup = g.lower_block_lines(finally)?;
                lines.push(brace_block(&g.ctx.pad(), "defer", &cleanup));
            }
            lines.extend(g.flat_lines(&try_stmt.body)?);
            Ok(lines)
        })?;
        Ok(brace_block(&pad, "", &inner))
    }

    fn raise(&mut self, kind: RaiseKind, value: &Expr) -> CodegenResult<String> {
        match kind {
            RaiseKind::Fatal => {
                self.ctx.require(Features::PANIC);
                let message = self.lower_expr(value)?;
                Ok(format!("@panic({message})"))
            }
            RaiseKind::Error => {
                if !self.ctx.frame.in_function {
                    return Err(CodegenError::unsupported("iace outside a function", TARGET));
                }
                self.ctx.require(Features::RAISE);
                self.ctx.frame.fallible = true;
                let name = match &value.unparen().kind {
                    ExprKind::Literal(Literal::String(message)) => error_ident(message),
                    ExprKind::New { class, .. } => class.clone(),
                    ExprKind::Ident(name) => error_ident(name),
                    _ => error_ident(""),
                };
                Ok(format!("return error.{name}"))
            }
        }
    }

    fn print(&mut self, level: PrintLevel, args: &[Expr]) -> CodegenResult<String> {
        self.ctx.require(Features::STD | Features::PRINT);
        let mut specs = Vec::with_capacity(args.len());
        let mut values = Vec::with_capacity(args.len());
        for arg in args {
            specs.push(if level == PrintLevel::Debug {
                "{any}"
            } else {
                format_spec(arg)
            });
            values.push(self.lower_expr(arg)?);
        }
        let tuple = if values.is_empty() {
            ".{}".to_string()
        } else {
            format!(".{{ {} }}", values.join(", "))
        };
        let text = match level {
            PrintLevel::Warn => format!("std.log.warn(\"{}\", {tuple})", specs.join(" ")),
            PrintLevel::Log | PrintLevel::Debug => {
                format!("std.debug.print(\"{}\\n\", {tuple})", specs.join(" "))
            }
        };
        Ok(self.ctx.stmt_line(&text))
    }

    fn resource(&mut self, resource: &ResourceStmt) -> CodegenResult<String> {
        let name = &resource.binding;
        let acquired = match &resource.kind {
            ResourceKind::Acquire(expr) => Some(self.lower_expr(expr)?),
            ResourceKind::Arena | ResourceKind::Page => None,
        };
        self.ctx.require(Features::STD);
        let inner = self.indented(|g| {
            let mut lines = match (&resource.kind, acquired) {
                (ResourceKind::Arena, _) => vec![
                    g.ctx.stmt_line(&format!(
                        "var {name}_arena = std.heap.ArenaAllocator.init(std.heap.page_allocator)"
                    )),
                    g.ctx.stmt_line(&format!("defer {name}_arena.deinit()")),
                    g.ctx.stmt_line(&format!("const {name} = {name}_arena.allocator()")),
                ],
                (ResourceKind::Page, _) => {
                    vec![g.ctx.stmt_line(&format!("const {name} = std.heap.page_allocator"))]
                }
                (ResourceKind::Acquire(_), acquired) => vec![
                    g.ctx
                        .stmt_line(&format!("var {name} = {}", acquired.unwrap_or_default())),
                    g.ctx.stmt_line(&format!("defer {name}.deinit()")),
                ],
            };
            lines.extend(g.with_resource(name, |g| g.flat_lines(&resource.body))?);
            Ok(lines)
        })?;
        Ok(brace_block(&self.ctx.pad(), "", &inner))
    }

    /// `pub fn main`. Zig has no event loop, so `incipiet` lowers the same
    /// way; an allocator the body asked for comes from a general-purpose
    /// allocator set up here.
    fn entry(&mut self, body: &Block) -> CodegenResult<String> {
        let (lines, frame) = self.with_frame(Frame::function(faber_ir::FunctionMode::Sync, false), |g| {
            g.lower_block_lines(body)
        })?;
        let mut out = Vec::new();
        if frame.wants_allocator {
            self.ctx.require(Features::STD);
            let setup = self.indented(|g| {
                Ok(vec![
                    g.ctx
                        .stmt_line("var gpa = std.heap.GeneralPurposeAllocator(.{}){}"),
                    g.ctx.stmt_line("defer _ = gpa.deinit()"),
                    g.ctx
                        .stmt_line(&format!("const {DEFAULT_ALLOCATOR} = gpa.allocator()")),
                ])
            })?;
            out.extend(setup);
        }
        out.extend(lines);
        let ret = if frame.fallible { "!void" } else { "void" };
        Ok(brace_block(&self.ctx.pad(), &format!("pub fn main() {ret}"), &out))
    }
}

/// Zig rejects ignored non-void results; calls with a known value type are
/// discarded explicitly.
fn discards_value(expr: &Expr) -> bool {
    if !matches!(expr.kind, ExprKind::Call { .. }) {
        return false;
    }
    match &expr.resolved {
        Some(ty) => {
            !ty.is_unknown() && !ty.is_primitive("vacuum") && !ty.is_primitive("nihil")
        }
        None => false,
    }
}

/// `std.fmt` placeholder for a value of `expr`'s type.
pub(super) fn format_spec(expr: &Expr) -> &'static str {
    let by_type = expr
        .resolved
        .as_ref()
        .and_then(crate::targets::semantic_builtin);
    match by_type {
        Some(Builtin::Textus) => return "{s}",
        Some(Builtin::Numerus | Builtin::Fractus) => return "{d}",
        Some(Builtin::Bivalens) => return "{}",
        Some(_) => return "{any}",
        None => {}
    }
    match &expr.unparen().kind {
        ExprKind::Literal(Literal::String(_)) | ExprKind::Template(_) => "{s}",
        ExprKind::Literal(Literal::Integer(_) | Literal::Float(_)) => "{d}",
        ExprKind::Literal(Literal::Bool(_)) => "{}",
        _ => "{any}",
    }
}
