//! Statement lowering for C++.

use faber_ir::{
    BindingTarget, Block, ClassDecl, ElseBranch, EnumDecl, Expr, ExprKind, ForKind, ForStmt,
    FunctionDecl, FunctionMode, IfStmt, ImportDecl, ImportItems, InterfaceDecl, Literal,
    MatchStmt, Param, PrintLevel, RaiseKind, ResourceKind, ResourceStmt, Span, Stmt, StmtKind,
    SwitchStmt, TryStmt, TypeExpr, UnionDecl, VarDecl, VariantBinding,
};

use super::CppGenerator;
use crate::analysis::body_mutates_self;
use crate::context::Frame;
use crate::features::Features;
use crate::generator::Generator;
use crate::targets::{brace_block, quoted, range_cmp, resolves_to, Builtin};
use crate::{CodegenError, CodegenResult, CodegenTarget};

const TARGET: CodegenTarget = CodegenTarget::Cpp;

/// Where a function is declared.
#[derive(Copy, Clone, PartialEq, Eq)]
enum Member {
    Free,
    /// A method; `const` unless it writes through `this`.
    Method,
    /// A method declared by an implemented `pactum`.
    Override,
}

impl CppGenerator<'_> {
    pub(super) fn stmt(&mut self, stmt: &Stmt) -> CodegenResult<String> {
        match &stmt.kind {
            StmtKind::Import(decl) => self.import(decl),
            StmtKind::Var(decl) => self.var(decl),
            StmtKind::Function(decl) => self.function(decl, Member::Free),
            StmtKind::Class(decl) => self.class(decl),
            StmtKind::Interface(decl) => self.interface(decl),
            StmtKind::Enum(decl) => self.enumeration(decl),
            StmtKind::Union(decl) => self.union(decl),
            StmtKind::TypeAlias(decl) => {
                let ty = self.ty(&decl.ty)?;
                Ok(self.ctx.stmt_line(&format!("using {} = {ty}", decl.name)))
            }
            StmtKind::If(if_stmt) => self.if_chain(if_stmt),
            StmtKind::While { cond, body } => {
                let cond = self.lower_expr(cond)?;
                let lines = self.lower_block_lines(body)?;
                Ok(brace_block(&self.ctx.pad(), &format!("while ({cond})"), &lines))
            }
            StmtKind::For(for_stmt) => self.for_loop(for_stmt),
            StmtKind::Switch(switch) => self.switch(switch),
            StmtKind::Match(match_stmt) => self.match_placeholder(match_stmt, stmt.span),
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
                let keyword = if self.ctx.in_generator() { "co_return" } else { "return" };
                let text = match value {
                    Some(value) => format!("{keyword} {}", self.lower_expr(value)?),
                    None => keyword.to_string(),
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
                self.ctx.require(Features::CASSERT);
                let cond = self.lower_expr(cond)?;
                let text = match message.as_ref().map(|m| &m.unparen().kind) {
                    Some(ExprKind::Literal(Literal::String(s))) => {
                        format!("assert(({cond}) && {})", quoted(s))
                    }
                    _ => format!("assert({cond})"),
                };
                Ok(self.ctx.stmt_line(&text))
            }
            StmtKind::Resource(resource) => self.resource(resource),
            StmtKind::Entry { is_async, body } => self.entry(*is_async, body),
        }
    }

    /// `#include "path.hpp"`; a namespace import also aliases the module's
    /// namespace.
    fn import(&self, decl: &ImportDecl) -> CodegenResult<String> {
        let path = header_path(&decl.source);
        let include = format!("{}#include \"{path}.hpp\"", self.ctx.pad());
        match &decl.items {
            ImportItems::Namespace(alias) => {
                let module = path.rsplit('/').next().unwrap_or(&path);
                let alias = self.ctx.stmt_line(&format!("namespace {alias} = {module}"));
                Ok(format!("{include}\n{alias}"))
            }
            ImportItems::Named(names) => {
                if let Some(aliased) = names.iter().find(|n| n.alias.is_some()) {
                    return Err(CodegenError::unsupported(
                        format!("aliased import of `{}`", aliased.name),
                        TARGET,
                    ));
                }
                Ok(include)
            }
        }
    }

    fn const_prefix(&self, mutable: bool, name: &str) -> &'static str {
        if mutable || self.mutated.contains(name) {
            ""
        } else {
            "const "
        }
    }

    fn var(&mut self, decl: &VarDecl) -> CodegenResult<String> {
        match &decl.target {
            BindingTarget::Ident(name) => {
                let prefix = self.const_prefix(decl.mutable, name);
                let ty = match (&decl.ty, &decl.init) {
                    (Some(ty), _) => self.ty(ty)?,
                    (None, Some(init)) if matches!(init.unparen().kind, ExprKind::Literal(Literal::String(_))) => {
                        self.ctx.require(Features::STRING);
                        "std::string".to_string()
                    }
                    (None, Some(_)) => "auto".to_string(),
                    (None, None) => {
                        return Err(CodegenError::unsupported(
                            format!("untyped declaration of `{name}` without initializer"),
                            TARGET,
                        ))
                    }
                };
                let text = match &decl.init {
                    Some(init) => format!("{prefix}{ty} {name} = {}", self.lower_expr(init)?),
                    None => format!("{ty} {name}"),
                };
                Ok(self.ctx.stmt_line(&text))
            }
            BindingTarget::Object(fields) => {
                let Some(init) = &decl.init else {
                    return Err(destructure_without_init());
                };
                let (mut lines, source) = match &init.unparen().kind {
                    ExprKind::Ident(_) => (Vec::new(), self.lower_expr(init)?),
                    _ => {
                        let temp = self.ctx.fresh_label("source");
                        let value = self.lower_expr(init)?;
                        (vec![self.ctx.stmt_line(&format!("const auto {temp} = {value}"))], temp)
                    }
                };
                for (field, alias) in fields {
                    let local = alias.as_deref().unwrap_or(field);
                    let prefix = self.const_prefix(decl.mutable, local);
                    lines.push(self.ctx.stmt_line(&format!("{prefix}auto {local} = {source}.{field}")));
                }
                Ok(lines.join("\n"))
            }
            BindingTarget::Array(names) => {
                let Some(init) = &decl.init else {
                    return Err(destructure_without_init());
                };
                let mutable = decl.mutable || names.iter().any(|n| self.mutated.contains(n));
                let prefix = if mutable { "" } else { "const " };
                let value = self.lower_expr(init)?;
                Ok(self
                    .ctx
                    .stmt_line(&format!("{prefix}auto [{}] = {value}", names.join(", "))))
            }
        }
    }

    fn params(&mut self, params: &[Param]) -> CodegenResult<Vec<String>> {
        let mut out = Vec::with_capacity(params.len());
        for param in params {
            let ty = match &param.ty {
                Some(ty) => self.ty(ty)?,
                None => "auto".to_string(),
            };
            let mut text = if param.rest {
                self.ctx.require(Features::LISTA);
                format!("std::vector<{ty}> {}", param.name)
            } else {
                format!("{ty} {}", param.name)
            };
            if let Some(default) = &param.default {
                text.push_str(&format!(" = {}", self.lower_expr(default)?));
            }
            out.push(text);
        }
        Ok(out)
    }

    /// Declared return type: `std::generator<T>` for a cursor function,
    /// `std::future<T>` for an async one, `void` when absent.
    fn fn_ret(&mut self, name: &str, mode: FunctionMode, ret: Option<&TypeExpr>) -> CodegenResult<String> {
        let inner = match ret {
            Some(TypeExpr::Named { name, args, nullable: false })
                if matches!(name.as_str(), "promissum" | "cursor") && args.len() == 1 =>
            {
                self.ty(&args[0])?
            }
            Some(ret) => self.ty(ret)?,
            None => "void".to_string(),
        };
        match mode {
            FunctionMode::Sync => Ok(inner),
            FunctionMode::Async => {
                self.ctx.require(Features::ASYNC | Features::FUTURE);
                Ok(format!("std::future<{inner}>"))
            }
            FunctionMode::Generator => {
                self.ctx.require(Features::GENERATOR);
                Ok(format!("std::generator<{inner}>"))
            }
            FunctionMode::AsyncGenerator => Err(CodegenError::unsupported(
                format!("futura cursor function `{name}`"),
                TARGET,
            )),
        }
    }

    /// A free function or method. Async bodies run on `std::async`; a
    /// bodiless function is a declaration.
    fn function(&mut self, decl: &FunctionDecl, member: Member) -> CodegenResult<String> {
        let pad = self.ctx.pad();
        let ret = self.fn_ret(&decl.name, decl.mode, decl.ret.as_ref())?;
        let params = self.params(&decl.params)?;
        let template = template_line(&pad, &decl.type_params);
        let signature = format!("{ret} {}({})", decl.name, params.join(", "));

        let Some(body) = &decl.body else {
            let text = match member {
                Member::Free => self.ctx.stmt_line(&signature),
                Member::Method | Member::Override => {
                    self.ctx.stmt_line(&format!("virtual {signature} = 0"))
                }
            };
            return Ok(format!("{template}{text}"));
        };

        let suffix = match member {
            Member::Free => "",
            Member::Method if body_mutates_self(body) => "",
            Member::Method => " const",
            Member::Override => " override",
        };
        let frame = Frame::function(decl.mode, false);
        let lines = if decl.mode.is_async() {
            let capture = if member == Member::Free { "[=]" } else { "[=, this]" };
            let inner_ret = ret
                .strip_prefix("std::future<")
                .and_then(|r| r.strip_suffix('>'))
                .unwrap_or("void")
                .to_string();
            let (body_lines, _) = self.with_frame(frame, |g| g.indented(|g| g.lower_block_lines(body)))?;
            self.indented(|g| {
                let inner_pad = g.ctx.pad();
                let mut out = vec![format!(
                    "{inner_pad}return std::async(std::launch::async, {capture}() -> {inner_ret} {{"
                )];
                out.extend(body_lines);
                out.push(format!("{inner_pad}}});"));
                Ok(out)
            })?
        } else {
            self.with_frame(frame, |g| g.lower_block_lines(body))?.0
        };
        Ok(format!(
            "{template}{}",
            brace_block(&pad, &format!("{signature}{suffix}"), &lines)
        ))
    }

    /// A `struct` with default member initializers. Fields without one
    /// become constructor parameters, and `creo` is the constructor body.
    fn class(&mut self, decl: &ClassDecl) -> CodegenResult<String> {
        let pad = self.ctx.pad();
        let overridden: Vec<String> = decl
            .implements
            .iter()
            .filter_map(|i| self.interfaces.get(i))
            .flatten()
            .cloned()
            .collect();

        let members = self.indented(|g| {
            let mut out = Vec::with_capacity(decl.fields.len() + decl.methods.len() + 1);
            let mut ctor_params = Vec::new();
            let mut ctor_inits = Vec::new();
            for field in &decl.fields {
                let ty = g.ty(&field.ty)?;
                match &field.init {
                    Some(init) => {
                        let init = g.lower_expr(init)?;
                        out.push(g.ctx.stmt_line(&format!("{ty} {} = {init}", field.name)));
                    }
                    None => {
                        out.push(g.ctx.stmt_line(&format!("{ty} {}", field.name)));
                        ctor_params.push(format!("{ty} {}", field.name));
                        ctor_inits.push(format!("{0}({0})", field.name));
                    }
                }
            }
            if decl.constructor.is_some() || !ctor_params.is_empty() {
                let body = match &decl.constructor {
                    Some(block) => {
                        g.with_frame(Frame::function(FunctionMode::Sync, false), |g| {
                            g.lower_block_lines(block)
                        })?
                        .0
                    }
                    None => Vec::new(),
                };
                let mut head = format!("{}({})", decl.name, ctor_params.join(", "));
                if !ctor_inits.is_empty() {
                    head.push_str(&format!(" : {}", ctor_inits.join(", ")));
                }
                out.push(brace_block(&g.ctx.pad(), &head, &body));
            }
            for method in &decl.methods {
                let member = if overridden.contains(&method.name) {
                    Member::Override
                } else {
                    Member::Method
                };
                out.push(g.function(method, member)?);
            }
            Ok(out)
        })?;

        let bases: Vec<String> = decl.implements.iter().map(|i| format!("public {i}")).collect();
        let head = if bases.is_empty() {
            format!("struct {}", decl.name)
        } else {
            format!("struct {} : {}", decl.name, bases.join(", "))
        };
        Ok(format!(
            "{}{};",
            template_line(&pad, &decl.type_params),
            brace_block(&pad, &head, &members)
        ))
    }

    /// An abstract struct of pure virtual methods.
    fn interface(&mut self, decl: &InterfaceDecl) -> CodegenResult<String> {
        self.interfaces.insert(
            decl.name.clone(),
            decl.methods.iter().map(|m| m.name.clone()).collect(),
        );
        let pad = self.ctx.pad();
        let lines = self.indented(|g| {
            let mut out = vec![g.ctx.stmt_line(&format!("virtual ~{}() = default", decl.name))];
            for sig in &decl.methods {
                let ret = g.fn_ret(&sig.name, sig.mode, sig.ret.as_ref())?;
                let params = g.params(&sig.params)?;
                out.push(g.ctx.stmt_line(&format!(
                    "virtual {ret} {}({}) = 0",
                    sig.name,
                    params.join(", ")
                )));
            }
            Ok(out)
        })?;
        Ok(format!(
            "{}{};",
            template_line(&pad, &decl.type_params),
            brace_block(&pad, &format!("struct {}", decl.name), &lines)
        ))
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
            "{};",
            brace_block(&pad, &format!("enum class {}", decl.name), &lines)
        ))
    }

    /// One struct per variant, then the union as a `std::variant` alias.
    fn union(&mut self, decl: &UnionDecl) -> CodegenResult<String> {
        if !decl.type_params.is_empty() {
            return Err(CodegenError::unsupported(
                format!("generic discretio `{}`", decl.name),
                TARGET,
            ));
        }
        self.ctx.require(Features::VARIANT);
        let pad = self.ctx.pad();
        let mut out = Vec::with_capacity(decl.variants.len() + 1);
        for variant in &decl.variants {
            let fields = self.indented(|g| {
                let mut fields = Vec::with_capacity(variant.fields.len());
                for field in &variant.fields {
                    let ty = g.ty(&field.ty)?;
                    fields.push(g.ctx.stmt_line(&format!("{ty} {}", field.name)));
                }
                Ok(fields)
            })?;
            out.push(format!(
                "{};",
                brace_block(&pad, &format!("struct {}", variant.name), &fields)
            ));
        }
        let names: Vec<&str> = decl.variants.iter().map(|v| v.name.as_str()).collect();
        out.push(self.ctx.stmt_line(&format!(
            "using {} = std::variant<{}>",
            decl.name,
            names.join(", ")
        )));
        Ok(out.join("\n"))
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
            return Err(CodegenError::unsupported("async stream iteration", TARGET));
        }
        let binding = &for_stmt.binding;
        let pad = self.ctx.pad();
        let iterable = &for_stmt.iterable;

        let head = match &iterable.unparen().kind {
            ExprKind::Range {
                start,
                end,
                step,
                inclusive,
            } => {
                self.ctx.require(Features::CSTDINT);
                let cmp = range_cmp(*inclusive, step.as_deref()).symbol();
                let start = self.lower_expr(start)?;
                let end = self.lower_expr(end)?;
                let advance = match step {
                    Some(step) => format!("{binding} += {}", self.lower_expr(step)?),
                    None => format!("++{binding}"),
                };
                format!("for (std::int64_t {binding} = {start}; {binding} {cmp} {end}; {advance})")
            }
            _ => {
                let lowered = self.lower_expr(iterable)?;
                let tabula = resolves_to(iterable, Builtin::Tabula);
                let copia = resolves_to(iterable, Builtin::Copia);
                match for_stmt.kind {
                    ForKind::Keys if tabula => format!("for (const auto& [{binding}, _] : {lowered})"),
                    ForKind::Keys if copia => format!("for (const auto& {binding} : {lowered})"),
                    ForKind::Keys => format!(
                        "for (std::size_t {binding} = 0; {binding} < {lowered}.size(); ++{binding})"
                    ),
                    ForKind::Values if tabula => format!("for (const auto& [_, {binding}] : {lowered})"),
                    ForKind::Values => format!("for (const auto& {binding} : {lowered})"),
                }
            }
        };
        let lines = self.lower_block_lines(&for_stmt.body)?;
        Ok(brace_block(&pad, &head, &lines))
    }

    /// `switch` on integral subjects. Strings cannot be switched on, so a
    /// `textus` subject becomes an `if` chain.
    fn switch(&mut self, switch: &SwitchStmt) -> CodegenResult<String> {
        let subject = self.lower_expr(&switch.discriminant)?;
        let pad = self.ctx.pad();

        if resolves_to(&switch.discriminant, Builtin::Textus) {
            let mut out = Vec::new();
            for (i, case) in switch.cases.iter().enumerate() {
                let mut tests = Vec::with_capacity(case.values.len());
                for value in &case.values {
                    tests.push(format!("{subject} == {}", self.lower_expr(value)?));
                }
                let opener = if i == 0 { format!("{pad}if") } else { format!("{pad}}} else if") };
                out.push(format!("{opener} ({}) {{", tests.join(" || ")));
                out.extend(self.lower_block_lines(&case.body)?);
            }
            if let Some(default) = &switch.default {
                let lines = self.lower_block_lines(default)?;
                if out.is_empty() {
                    return Ok(brace_block(&pad, "", &lines));
                }
                out.push(format!("{pad}}} else {{"));
                out.extend(lines);
            }
            if !out.is_empty() {
                out.push(format!("{pad}}}"));
            }
            return Ok(out.join("\n"));
        }

        let cases = self.indented(|g| {
            let case_pad = g.ctx.pad();
            let mut out = Vec::new();
            for case in &switch.cases {
                let mut labels = Vec::with_capacity(case.values.len());
                for value in &case.values {
                    labels.push(format!("case {}:", g.lower_expr(value)?));
                }
                let last = labels.pop().unwrap_or_default();
                out.extend(labels.into_iter().map(|l| format!("{case_pad}{l}")));
                let mut lines = g.lower_block_lines(&case.body)?;
                lines.push(g.indented(|g| Ok(g.ctx.stmt_line("break")))?);
                out.push(brace_block(&case_pad, &last, &lines));
            }
            if let Some(default) = &switch.default {
                let lines = g.lower_block_lines(default)?;
                out.push(brace_block(&case_pad, "default:", &lines));
            }
            Ok(out)
        })?;
        Ok(brace_block(&pad, &format!("switch ({subject})"), &cases))
    }

    /// `discerne` has no C++ lowering yet. Every arm pattern is kept in a
    /// marked comment block and the construct is reported on the result.
    fn match_placeholder(&mut self, match_stmt: &MatchStmt, span: Span) -> CodegenResult<String> {
        let subject = self.lower_expr(&match_stmt.subject)?;
        self.ctx.mark_unimplemented("discerne", span);
        let pad = self.ctx.pad();
        let mut out = vec![format!("{pad}// UNIMPLEMENTED(discerne): {subject}")];
        for arm in &match_stmt.arms {
            let pattern = match &arm.binding {
                VariantBinding::None => arm.variant.clone(),
                VariantBinding::Alias(alias) => format!("{} ut {alias}", arm.variant),
                VariantBinding::Fields(names) => format!("{} pro {}", arm.variant, names.join(", ")),
            };
            out.push(format!("{pad}//   casu {pattern}"));
        }
        if match_stmt.default.is_some() {
            out.push(format!("{pad}//   ceterum"));
        }
        Ok(out.join("\n"))
    }

    fn try_stmt(&mut self, try_stmt: &TryStmt) -> CodegenResult<String> {
        if try_stmt.finally.is_some() {
            return Err(CodegenError::unsupported("demum", TARGET));
        }
        let pad = self.ctx.pad();
        let body = self.lower_block_lines(&try_stmt.body)?;
        let Some(catch) = &try_stmt.catch else {
            return Ok(brace_block(&pad, "", &body));
        };
        self.ctx.require(Features::STDEXCEPT);
        let handler = self.lower_block_lines(&catch.body)?;
        let mut out = vec![format!("{pad}try {{")];
        out.extend(body);
        out.push(format!("{pad}}} catch (const std::exception& {}) {{", catch.param));
        out.extend(handler);
        out.push(format!("{pad}}}"));
        Ok(out.join("\n"))
    }

    fn raise(&mut self, kind: RaiseKind, value: &Expr) -> CodegenResult<String> {
        let textual = matches!(
            value.unparen().kind,
            ExprKind::Literal(Literal::String(_)) | ExprKind::Template(_)
        ) || resolves_to(value, Builtin::Textus);
        let lowered = self.lower_expr(value)?;
        match kind {
            RaiseKind::Fatal => {
                self.ctx
                    .require(Features::PANIC | Features::PRINT | Features::CSTDLIB | Features::STRING);
                Ok(format!("panic({lowered})"))
            }
            RaiseKind::Error if textual => {
                self.ctx.require(Features::RAISE | Features::STDEXCEPT);
                Ok(format!("throw std::runtime_error({lowered})"))
            }
            RaiseKind::Error => {
                self.ctx.require(Features::RAISE);
                Ok(format!("throw {lowered}"))
            }
        }
    }

    fn print(&mut self, level: PrintLevel, args: &[Expr]) -> CodegenResult<String> {
        self.ctx.require(Features::PRINT);
        let stream = match level {
            PrintLevel::Log | PrintLevel::Debug => "",
            PrintLevel::Warn => "stderr, ",
        };
        let format = vec!["{}"; args.len()].join(" ");
        let mut text = format!("std::println({stream}\"{format}\"");
        for arg in self.lower_exprs(args)? {
            text.push_str(", ");
            text.push_str(&arg);
        }
        text.push(')');
        Ok(self.ctx.stmt_line(&text))
    }

    /// Every `cura` is a scope; an acquired resource is released by its
    /// destructor at the closing brace.
    fn resource(&mut self, resource: &ResourceStmt) -> CodegenResult<String> {
        let pad = self.ctx.pad();
        let mut lines = Vec::new();
        if let ResourceKind::Acquire(init) = &resource.kind {
            let init = self.lower_expr(init)?;
            lines.push(self.indented(|g| Ok(g.ctx.stmt_line(&format!("auto {} = {init}", resource.binding))))?);
        }
        lines.extend(self.lower_block_lines(&resource.body)?);
        Ok(brace_block(&pad, "", &lines))
    }

    /// `int main()`. An async entry blocks on each awaited future in turn.
    fn entry(&mut self, is_async: bool, body: &Block) -> CodegenResult<String> {
        let mode = if is_async {
            self.ctx.require(Features::ASYNC | Features::FUTURE);
            FunctionMode::Async
        } else {
            FunctionMode::Sync
        };
        let (lines, _) = self.with_frame(Frame::function(mode, false), |g| g.lower_block_lines(body))?;
        Ok(brace_block(&self.ctx.pad(), "int main()", &lines))
    }

}

/// `template <typename T, typename U>` on its own line, or nothing.
fn template_line(pad: &str, params: &[String]) -> String {
    if params.is_empty() {
        return String::new();
    }
    let params: Vec<String> = params.iter().map(|p| format!("typename {p}")).collect();
    format!("{pad}template <{}>\n", params.join(", "))
}

/// `./util/strings.fab` as a header path: `util/strings`.
fn header_path(source: &str) -> String {
    let trimmed = source.strip_suffix(".fab").unwrap_or(source);
    trimmed.strip_prefix("./").unwrap_or(trimmed).to_string()
}

fn destructure_without_init() -> CodegenError {
    CodegenError::unsupported("destructuring declaration without initializer", TARGET)
}
