//! Statement lowering for TypeScript.

use faber_ir::{
    BindingTarget, Block, ClassDecl, ElseBranch, EnumDecl, ExprKind, ForKind, ForStmt,
    FunctionDecl, FunctionMode, GuardClause, IfStmt, ImportDecl, ImportItems, InterfaceDecl,
    Literal, MatchStmt, Param, PrintLevel, RaiseKind, ResourceKind, ResourceStmt, Stmt, StmtKind,
    SwitchStmt, TryStmt, TypeExpr, UnionDecl, VarDecl, VariantBinding,
};

use super::TypeScriptGenerator;
use crate::context::Frame;
use crate::features::Features;
use crate::generator::Generator;
use crate::targets::{brace_block, quoted, range_cmp};
use crate::CodegenResult;

impl TypeScriptGenerator {
    pub(super) fn stmt(&mut self, stmt: &Stmt) -> CodegenResult<String> {
        match &stmt.kind {
            StmtKind::Import(decl) => Ok(self.import(decl)),
            StmtKind::Var(decl) => self.var(decl),
            StmtKind::Function(decl) => self.function(decl),
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
                Ok(brace_block(&self.ctx.pad(), &format!("while ({cond})"), &lines))
            }
            StmtKind::For(for_stmt) => self.for_loop(for_stmt),
            StmtKind::Switch(switch) => self.switch(switch),
            StmtKind::Match(match_stmt) => self.match_stmt(match_stmt),
            StmtKind::Guard(clauses) => self.guard(clauses),
            StmtKind::Try(try_stmt) => self.try_stmt(try_stmt),
            StmtKind::Raise { kind, value } => {
                let text = self.raise(*kind, value)?;
                Ok(self.ctx.stmt_line(&text))
            }
            StmtKind::Return(value) => {
                let text = match value {
                    Some(value) => format!("return {}", self.lower_expr(value)?),
                    None => "return".to_string(),
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
            StmtKind::Print { level, args } => {
                let args = self.call_args(args)?;
                let method = match level {
                    PrintLevel::Log => "log",
                    PrintLevel::Debug => "debug",
                    PrintLevel::Warn => "warn",
                };
                Ok(self.ctx.stmt_line(&format!("console.{method}({args})")))
            }
            StmtKind::Assert { cond, message } => {
                let cond = self.lower_expr(cond)?;
                let message = match message {
                    Some(message) => self.lower_expr(message)?,
                    None => quoted(&format!("assertion failed: {cond}")),
                };
                Ok(self
                    .ctx
                    .stmt_line(&format!("if (!({cond})) throw new Error({message})")))
            }
            StmtKind::Resource(resource) => self.resource(resource),
            StmtKind::Entry { is_async, body } => self.entry(*is_async, body),
        }
    }

    fn import(&self, decl: &ImportDecl) -> String {
        let source = quoted(&decl.source);
        let text = match &decl.items {
            ImportItems::Named(names) => {
                let names: Vec<String> = names
                    .iter()
                    .map(|n| match &n.alias {
                        Some(alias) => format!("{} as {alias}", n.name),
                        None => n.name.clone(),
                    })
                    .collect();
                format!("import {{ {} }} from {source}", names.join(", "))
            }
            ImportItems::Namespace(alias) => format!("import * as {alias} from {source}"),
        };
        self.ctx.stmt_line(&text)
    }

    fn var(&mut self, decl: &VarDecl) -> CodegenResult<String> {
        let keyword = if decl.mutable { "let" } else { "const" };
        let binding = match &decl.target {
            BindingTarget::Ident(name) => name.clone(),
            BindingTarget::Object(fields) => {
                let fields: Vec<String> = fields
                    .iter()
                    .map(|(field, alias)| match alias {
                        Some(alias) => format!("{field}: {alias}"),
                        None => field.clone(),
                    })
                    .collect();
                format!("{{ {} }}", fields.join(", "))
            }
            BindingTarget::Array(names) => format!("[{}]", names.join(", ")),
        };
        let annotation = match &decl.ty {
            Some(ty) if matches!(decl.target, BindingTarget::Ident(_)) => {
                format!(": {}", self.ty(ty)?)
            }
            _ => String::new(),
        };
        let text = match &decl.init {
            Some(init) => {
                let init = self.lower_expr(init)?;
                format!("{keyword} {binding}{annotation} = {init}")
            }
            None => format!("{keyword} {binding}{annotation}"),
        };
        Ok(self.ctx.stmt_line(&text))
    }

    pub(super) fn params(&mut self, params: &[Param]) -> CodegenResult<String> {
        let mut out = Vec::with_capacity(params.len());
        for param in params {
            let mut text = if param.rest {
                format!("...{}", param.name)
            } else {
                param.name.clone()
            };
            if let Some(ty) = &param.ty {
                text.push_str(&format!(": {}", self.ty(ty)?));
            }
            if let Some(default) = &param.default {
                text.push_str(&format!(" = {}", self.lower_expr(default)?));
            }
            out.push(text);
        }
        Ok(out.join(", "))
    }

    /// `: Promise<R>` and friends; empty when there is no declared return type.
    fn return_annotation(&mut self, mode: FunctionMode, ret: Option<&TypeExpr>) -> CodegenResult<String> {
        let Some(ret) = ret else {
            return Ok(String::new());
        };
        let ret = self.ty(ret)?;
        Ok(match mode {
            FunctionMode::Sync => format!(": {ret}"),
            FunctionMode::Async => format!(": Promise<{ret}>"),
            FunctionMode::Generator => format!(": Generator<{ret}>"),
            FunctionMode::AsyncGenerator => format!(": AsyncGenerator<{ret}>"),
        })
    }

    fn record_mode(&mut self, mode: FunctionMode) {
        if mode.is_async() {
            self.ctx.require(Features::ASYNC);
        }
        if mode.is_generator() {
            self.ctx.require(Features::GENERATOR);
        }
    }

    fn type_params(type_params: &[String]) -> String {
        if type_params.is_empty() {
            String::new()
        } else {
            format!("<{}>", type_params.join(", "))
        }
    }

    fn function(&mut self, decl: &FunctionDecl) -> CodegenResult<String> {
        self.record_mode(decl.mode);
        let keyword = match decl.mode {
            FunctionMode::Sync => "function",
            FunctionMode::Async => "async function",
            FunctionMode::Generator => "function*",
            FunctionMode::AsyncGenerator => "async function*",
        };
        let head = self.signature(decl, &format!("{keyword} {}", decl.name))?;
        match &decl.body {
            Some(body) => {
                let lines = self.function_body(decl.mode, body)?;
                Ok(brace_block(&self.ctx.pad(), &head, &lines))
            }
            None => Ok(self.ctx.stmt_line(&format!("declare {head}"))),
        }
    }

    /// `prefix<T>(params): R`
    fn signature(&mut self, decl: &FunctionDecl, prefix: &str) -> CodegenResult<String> {
        let params = self.params(&decl.params)?;
        let ret = self.return_annotation(decl.mode, decl.ret.as_ref())?;
        Ok(format!(
            "{prefix}{}({params}){ret}",
            Self::type_params(&decl.type_params)
        ))
    }

    fn function_body(&mut self, mode: FunctionMode, body: &Block) -> CodegenResult<Vec<String>> {
        let (lines, _) = self.with_frame(Frame::function(mode, false), |g| g.lower_block_lines(body))?;
        Ok(lines)
    }

    fn class(&mut self, decl: &ClassDecl) -> CodegenResult<String> {
        let is_abstract = decl.methods.iter().any(|m| m.body.is_none());
        let mut head = format!(
            "{}class {}{}",
            if is_abstract { "abstract " } else { "" },
            decl.name,
            Self::type_params(&decl.type_params)
        );
        if !decl.implements.is_empty() {
            head.push_str(&format!(" implements {}", decl.implements.join(", ")));
        }

        let members = self.indented(|g| {
            let mut members = Vec::new();
            for field in &decl.fields {
                let ty = g.ty(&field.ty)?;
                let text = match &field.init {
                    Some(init) => format!("{}: {ty} = {}", field.name, g.lower_expr(init)?),
                    None => format!("{}!: {ty}", field.name),
                };
                members.push(g.ctx.stmt_line(&text));
            }
            if let Some(ctor) = &decl.constructor {
                let lines = g.function_body(FunctionMode::Sync, ctor)?;
                members.push(brace_block(&g.ctx.pad(), "constructor()", &lines));
            }
            for method in &decl.methods {
                members.push(g.method(method)?);
            }
            Ok(members)
        })?;
        Ok(brace_block(&self.ctx.pad(), &head, &members))
    }

    fn method(&mut self, decl: &FunctionDecl) -> CodegenResult<String> {
        self.record_mode(decl.mode);
        let prefix = match decl.mode {
            FunctionMode::Sync => decl.name.clone(),
            FunctionMode::Async => format!("async {}", decl.name),
            FunctionMode::Generator => format!("*{}", decl.name),
            FunctionMode::AsyncGenerator => format!("async *{}", decl.name),
        };
        match &decl.body {
            Some(body) => {
                let head = self.signature(decl, &prefix)?;
                let lines = self.function_body(decl.mode, body)?;
                Ok(brace_block(&self.ctx.pad(), &head, &lines))
            }
            None => {
                let head = self.signature(decl, &format!("abstract {}", decl.name))?;
                Ok(self.ctx.stmt_line(&head))
            }
        }
    }

    fn interface(&mut self, decl: &InterfaceDecl) -> CodegenResult<String> {
        let head = format!("interface {}{}", decl.name, Self::type_params(&decl.type_params));
        let members = self.indented(|g| {
            let mut members = Vec::new();
            for sig in &decl.methods {
                let params = g.params(&sig.params)?;
                let ret = match g.return_annotation(sig.mode, sig.ret.as_ref())? {
                    r if r.is_empty() => ": void".to_string(),
                    r => r,
                };
                members.push(g.ctx.stmt_line(&format!("{}({params}){ret}", sig.name)));
            }
            Ok(members)
        })?;
        Ok(brace_block(&self.ctx.pad(), &head, &members))
    }

    fn enumeration(&mut self, decl: &EnumDecl) -> CodegenResult<String> {
        self.ctx.require(Features::ENUM);
        let members = self.indented(|g| {
            Ok(decl
                .members
                .iter()
                .map(|m| match &m.value {
                    Some(Literal::Integer(n)) => g.ctx.line(&format!("{} = {n},", m.name)),
                    Some(Literal::String(s)) => g.ctx.line(&format!("{} = {},", m.name, quoted(s))),
                    _ => g.ctx.line(&format!("{},", m.name)),
                })
                .collect::<Vec<_>>())
        })?;
        Ok(brace_block(&self.ctx.pad(), &format!("enum {}", decl.name), &members))
    }

    fn union(&mut self, decl: &UnionDecl) -> CodegenResult<String> {
        let pad = self.ctx.pad();
        let mut lines = vec![format!(
            "{pad}type {}{} =",
            decl.name,
            Self::type_params(&decl.type_params)
        )];
        let variants = self.indented(|g| {
            let mut out = Vec::new();
            for variant in &decl.variants {
                let mut fields = vec![format!("tag: {}", quoted(&variant.name))];
                for field in &variant.fields {
                    fields.push(format!("{}: {}", field.name, g.ty(&field.ty)?));
                }
                out.push(g.ctx.line(&format!("| {{ {} }}", fields.join("; "))));
            }
            Ok(out)
        })?;
        lines.extend(variants);
        if let Some(last) = lines.last_mut() {
            last.push_str(self.ctx.terminator());
        }
        Ok(lines.join("\n"))
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
        let binding = &for_stmt.binding;
        let head = match (&for_stmt.iterable.unparen().kind, for_stmt.kind) {
            (
                ExprKind::Range {
                    start,
                    end,
                    step,
                    inclusive,
                },
                _,
            ) => {
                let start = self.lower_expr(start)?;
                let end = self.lower_expr(end)?;
                let cmp = range_cmp(*inclusive, step.as_deref()).symbol();
                let advance = match step {
                    Some(step) => format!("{binding} += {}", self.lower_expr(step)?),
                    None => format!("{binding}++"),
                };
                format!("for (let {binding} = {start}; {binding} {cmp} {end}; {advance})")
            }
            (_, ForKind::Keys) => {
                let iterable = self.lower_expr(&for_stmt.iterable)?;
                if crate::targets::resolves_to(&for_stmt.iterable, crate::targets::Builtin::Tabula) {
                    format!("for (const {binding} of {iterable}.keys())")
                } else {
                    format!("for (const {binding} in {iterable})")
                }
            }
            (_, ForKind::Values) => {
                let iterable = self.lower_expr(&for_stmt.iterable)?;
                if for_stmt.is_async {
                    self.ctx.require(Features::STREAM | Features::ASYNC);
                    format!("for await (const {binding} of {iterable})")
                } else {
                    format!("for (const {binding} of {iterable})")
                }
            }
        };
        let lines = self.lower_block_lines(&for_stmt.body)?;
        Ok(brace_block(&self.ctx.pad(), &head, &lines))
    }

    /// One `case`/`default` clause body, closed with `break`.
    fn case_body(&mut self, body: &Block) -> CodegenResult<Vec<String>> {
        let mut lines = self.lower_block_lines(body)?;
        let exits = matches!(
            body.stmts.last().map(|s| &s.kind),
            Some(StmtKind::Return(_) | StmtKind::Raise { .. } | StmtKind::Break | StmtKind::Continue)
        );
        if !exits {
            lines.push(self.indented(|g| Ok(g.ctx.stmt_line("break")))?);
        }
        Ok(lines)
    }

    fn switch(&mut self, switch: &SwitchStmt) -> CodegenResult<String> {
        let discriminant = self.lower_expr(&switch.discriminant)?;
        let clauses = self.indented(|g| {
            let pad = g.ctx.pad();
            let mut out = Vec::new();
            for case in &switch.cases {
                let values = g.lower_exprs(&case.values)?;
                if let Some((last, rest)) = values.split_last() {
                    out.extend(rest.iter().map(|v| format!("{pad}case {v}:")));
                    let body = g.case_body(&case.body)?;
                    out.push(brace_block(&pad, &format!("case {last}:"), &body));
                }
            }
            if let Some(default) = &switch.default {
                let body = g.case_body(default)?;
                out.push(brace_block(&pad, "default:", &body));
            }
            Ok(out)
        })?;
        Ok(brace_block(&self.ctx.pad(), &format!("switch ({discriminant})"), &clauses))
    }

    fn match_stmt(&mut self, match_stmt: &MatchStmt) -> CodegenResult<String> {
        let subject = self.lower_expr(&match_stmt.subject)?;
        let clauses = self.indented(|g| {
            let pad = g.ctx.pad();
            let mut out = Vec::new();
            for arm in &match_stmt.arms {
                let binding = match &arm.binding {
                    VariantBinding::None => None,
                    VariantBinding::Alias(alias) => Some(format!("const {alias} = {subject}")),
                    VariantBinding::Fields(names) => {
                        let fields = g.ctx.variant(&arm.variant).map(|v| v.fields.clone());
                        let parts: Vec<String> = names
                            .iter()
                            .enumerate()
                            .map(|(i, name)| {
                                match fields.as_ref().and_then(|f| f.get(i)) {
                                    Some(field) if field != name => format!("{field}: {name}"),
                                    _ => name.clone(),
                                }
                            })
                            .collect();
                        Some(format!("const {{ {} }} = {subject}", parts.join(", ")))
                    }
                };
                let mut body = Vec::new();
                if let Some(binding) = binding {
                    body.push(g.indented(|g| Ok(g.ctx.stmt_line(&binding)))?);
                }
                body.extend(g.case_body(&arm.body)?);
                out.push(brace_block(&pad, &format!("case {}:", quoted(&arm.variant)), &body));
            }
            if let Some(default) = &match_stmt.default {
                let body = g.case_body(default)?;
                out.push(brace_block(&pad, "default:", &body));
            }
            Ok(out)
        })?;
        Ok(brace_block(&self.ctx.pad(), &format!("switch ({subject}.tag)"), &clauses))
    }

    fn guard(&mut self, clauses: &[GuardClause]) -> CodegenResult<String> {
        let mut out = Vec::with_capacity(clauses.len());
        for clause in clauses {
            let cond = self.lower_expr(&clause.cond)?;
            let lines = self.lower_block_lines(&clause.body)?;
            out.push(brace_block(&self.ctx.pad(), &format!("if ({cond})"), &lines));
        }
        Ok(out.join("\n"))
    }

    fn try_stmt(&mut self, try_stmt: &TryStmt) -> CodegenResult<String> {
        let pad = self.ctx.pad();
        let mut out = vec![format!("{pad}try {{")];
        out.extend(self.lower_block_lines(&try_stmt.body)?);
        if let Some(catch) = &try_stmt.catch {
            out.push(format!("{pad}}} catch ({}) {{", catch.param));
            out.extend(self.lower_block_lines(&catch.body)?);
        }
        if let Some(finally) = &try_stmt.finally {
            out.push(format!("{pad}}} finally {{"));
            out.extend(self.lower_block_lines(finally)?);
        } else if try_stmt.catch.is_none() {
            out.push(format!("{pad}}} finally {{"));
        }
        out.push(format!("{pad}}}"));
        Ok(out.join("\n"))
    }

    fn raise(&mut self, kind: RaiseKind, value: &faber_ir::Expr) -> CodegenResult<String> {
        let lowered = self.lower_expr(value)?;
        Ok(match kind {
            RaiseKind::Error => {
                self.ctx.require(Features::RAISE);
                if matches!(value.unparen().kind, ExprKind::New { .. }) {
                    format!("throw {lowered}")
                } else {
                    format!("throw new Error({lowered})")
                }
            }
            RaiseKind::Fatal => {
                self.ctx.require(Features::PANIC);
                format!("throw new Panic({lowered})")
            }
        })
    }

    fn resource(&mut self, resource: &ResourceStmt) -> CodegenResult<String> {
        let mut lines = Vec::new();
        if let ResourceKind::Acquire(expr) = &resource.kind {
            let acquired = self.lower_expr(expr)?;
            lines.push(self.indented(|g| {
                Ok(g.ctx
                    .stmt_line(&format!("using {} = {acquired}", resource.binding)))
            })?);
        }
        lines.extend(self.lower_block_lines(&resource.body)?);
        Ok(brace_block(&self.ctx.pad(), "", &lines))
    }

    fn entry(&mut self, is_async: bool, body: &Block) -> CodegenResult<String> {
        if !is_async {
            let lines = body
                .stmts
                .iter()
                .map(|s| self.lower_stmt(s))
                .collect::<CodegenResult<Vec<_>>>()?;
            return Ok(lines.join("\n"));
        }
        self.ctx.require(Features::ASYNC);
        let lines = self.function_body(FunctionMode::Async, body)?;
        let pad = self.ctx.pad();
        let mut out = vec![format!("{pad}(async () => {{")];
        out.extend(lines);
        out.push(format!("{pad}}})(){}", self.ctx.terminator()));
        Ok(out.join("\n"))
    }
}
