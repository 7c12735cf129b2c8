//! Statement lowering for Python.

use faber_ir::{
    BindingTarget, Block, ClassDecl, ElseBranch, EnumDecl, Expr, ExprKind, ForKind, ForStmt,
    FunctionDecl, FunctionMode, IfStmt, ImportDecl, ImportItems, InterfaceDecl, Literal,
    MatchStmt, Param, PrintLevel, RaiseKind, ResourceKind, ResourceStmt, Stmt, StmtKind,
    SwitchStmt, TryStmt, TypeExpr, UnionDecl, VarDecl, VariantBinding,
};

use super::PythonGenerator;
use crate::context::Frame;
use crate::features::Features;
use crate::generator::Generator;
use crate::targets::{quoted, resolves_to, Builtin};
use crate::CodegenResult;

impl PythonGenerator {
    pub(super) fn stmt(&mut self, stmt: &Stmt) -> CodegenResult<String> {
        match &stmt.kind {
            StmtKind::Import(decl) => Ok(self.import(decl)),
            StmtKind::Var(decl) => self.var(decl),
            StmtKind::Function(decl) => self.function(decl, false),
            StmtKind::Class(decl) => self.class(decl),
            StmtKind::Interface(decl) => self.interface(decl),
            StmtKind::Enum(decl) => self.enumeration(decl),
            StmtKind::Union(decl) => self.union(decl),
            StmtKind::TypeAlias(decl) => {
                let ty = self.ty(&decl.ty)?;
                Ok(self.ctx.line(&format!("type {} = {ty}", decl.name)))
            }
            StmtKind::If(if_stmt) => self.if_chain(if_stmt),
            StmtKind::While { cond, body } => {
                let cond = self.lower_expr(cond)?;
                self.suite(&format!("while {cond}"), body)
            }
            StmtKind::For(for_stmt) => self.for_loop(for_stmt),
            StmtKind::Switch(switch) => self.switch(switch),
            StmtKind::Match(match_stmt) => self.match_stmt(match_stmt),
            StmtKind::Guard(clauses) => {
                let mut out = Vec::with_capacity(clauses.len());
                for clause in clauses {
                    let cond = self.lower_expr(&clause.cond)?;
                    out.push(self.suite(&format!("if {cond}"), &clause.body)?);
                }
                Ok(out.join("\n"))
            }
            StmtKind::Try(try_stmt) => self.try_stmt(try_stmt),
            StmtKind::Raise { kind, value } => {
                let lowered = self.lower_expr(value)?;
                let text = match kind {
                    RaiseKind::Error => {
                        self.ctx.require(Features::RAISE);
                        if matches!(value.unparen().kind, ExprKind::New { .. }) {
                            format!("raise {lowered}")
                        } else {
                            format!("raise Exception({lowered})")
                        }
                    }
                    RaiseKind::Fatal => {
                        self.ctx.require(Features::PANIC);
                        format!("raise Panic({lowered})")
                    }
                };
                Ok(self.ctx.line(&text))
            }
            StmtKind::Return(value) => {
                let text = match value {
                    Some(value) => format!("return {}", self.lower_expr(value)?),
                    None => "return".to_string(),
                };
                Ok(self.ctx.line(&text))
            }
            StmtKind::Break => Ok(self.ctx.line("break")),
            StmtKind::Continue => Ok(self.ctx.line("continue")),
            StmtKind::Block(block) => {
                if block.is_empty() {
                    return Ok(self.ctx.line("pass"));
                }
                let lines = block
                    .stmts
                    .iter()
                    .map(|s| self.lower_stmt(s))
                    .collect::<CodegenResult<Vec<_>>>()?;
                Ok(lines.join("\n"))
            }
            StmtKind::Expr(expr) => {
                let text = self.lower_expr(expr)?;
                Ok(self.ctx.line(&text))
            }
            StmtKind::Print { level, args } => self.print(*level, args),
            StmtKind::Assert { cond, message } => {
                let cond = self.lower_expr(cond)?;
                let text = match message {
                    Some(message) => format!("assert {cond}, {}", self.lower_expr(message)?),
                    None => format!("assert {cond}"),
                };
                Ok(self.ctx.line(&text))
            }
            StmtKind::Resource(resource) => self.resource(resource),
            StmtKind::Entry { is_async, body } => self.entry(*is_async, body),
        }
    }

    /// `./util/strings` becomes `util.strings`.
    fn module_path(source: &str) -> String {
        let trimmed = source.trim_start_matches("./");
        let trimmed = trimmed.strip_suffix(".fab").unwrap_or(trimmed);
        trimmed.replace('/', ".")
    }

    fn import(&self, decl: &ImportDecl) -> String {
        let module = Self::module_path(&decl.source);
        let text = match &decl.items {
            ImportItems::Named(names) => {
                let names: Vec<String> = names
                    .iter()
                    .map(|n| match &n.alias {
                        Some(alias) => format!("{} as {alias}", n.name),
                        None => n.name.clone(),
                    })
                    .collect();
                format!("from {module} import {}", names.join(", "))
            }
            ImportItems::Namespace(alias) => format!("import {module} as {alias}"),
        };
        self.ctx.line(&text)
    }

    fn var(&mut self, decl: &VarDecl) -> CodegenResult<String> {
        let init = match &decl.init {
            Some(init) => self.lower_expr(init)?,
            None => "None".to_string(),
        };
        match &decl.target {
            BindingTarget::Ident(name) => {
                let text = match &decl.ty {
                    Some(ty) => format!("{name}: {} = {init}", self.ty(ty)?),
                    None => format!("{name} = {init}"),
                };
                Ok(self.ctx.line(&text))
            }
            BindingTarget::Array(names) => {
                Ok(self.ctx.line(&format!("{} = {init}", names.join(", "))))
            }
            BindingTarget::Object(fields) => {
                // Attribute access needs a single evaluation of the source.
                let source_is_name = decl
                    .init
                    .as_ref()
                    .is_some_and(|e| matches!(e.unparen().kind, ExprKind::Ident(_) | ExprKind::SelfRef));
                let mut lines = Vec::with_capacity(fields.len() + 1);
                let source = if source_is_name {
                    init
                } else {
                    lines.push(self.ctx.line(&format!("_source = {init}")));
                    "_source".to_string()
                };
                for (field, alias) in fields {
                    let local = alias.as_deref().unwrap_or(field);
                    lines.push(self.ctx.line(&format!("{local} = {source}.{field}")));
                }
                Ok(lines.join("\n"))
            }
        }
    }

    pub(super) fn params(&mut self, params: &[Param]) -> CodegenResult<Vec<String>> {
        let mut out = Vec::with_capacity(params.len());
        for param in params {
            let mut text = if param.rest {
                format!("*{}", param.name)
            } else {
                param.name.clone()
            };
            if let Some(ty) = &param.ty {
                // A rest parameter annotates its element type.
                let ty = match (param.rest, ty.name()) {
                    (true, Some("lista")) => ty.args().first().cloned().unwrap_or_else(|| ty.clone()),
                    _ => ty.clone(),
                };
                text.push_str(&format!(": {}", self.ty(&ty)?));
            }
            if let Some(default) = &param.default {
                let default = self.lower_expr(default)?;
                text.push_str(&format!(" = {default}"));
            }
            out.push(text);
        }
        Ok(out)
    }

    fn return_annotation(&mut self, mode: FunctionMode, ret: Option<&TypeExpr>) -> CodegenResult<String> {
        let Some(ret) = ret else {
            return Ok(String::new());
        };
        let ret = self.ty(ret)?;
        Ok(match mode {
            FunctionMode::Sync | FunctionMode::Async => format!(" -> {ret}"),
            FunctionMode::Generator => {
                self.ctx.require(Features::ITERATOR);
                format!(" -> Iterator[{ret}]")
            }
            FunctionMode::AsyncGenerator => {
                self.ctx.require(Features::ITERATOR);
                format!(" -> AsyncIterator[{ret}]")
            }
        })
    }

    fn type_params(type_params: &[String]) -> String {
        if type_params.is_empty() {
            String::new()
        } else {
            format!("[{}]", type_params.join(", "))
        }
    }

    /// A `def`. Methods take `self` first; a bodiless function is a stub.
    fn function(&mut self, decl: &FunctionDecl, method: bool) -> CodegenResult<String> {
        if decl.mode.is_async() {
            self.ctx.require(Features::ASYNC);
        }
        if decl.mode.is_generator() {
            self.ctx.require(Features::GENERATOR);
        }
        let mut params = self.params(&decl.params)?;
        if method {
            params.insert(0, "self".to_string());
        }
        let ret = self.return_annotation(decl.mode, decl.ret.as_ref())?;
        let keyword = if decl.mode.is_async() { "async def" } else { "def" };
        let head = format!(
            "{keyword} {}{}({}){ret}",
            decl.name,
            Self::type_params(&decl.type_params),
            params.join(", ")
        );
        match &decl.body {
            Some(body) => {
                let (text, _) =
                    self.with_frame(Frame::function(decl.mode, false), |g| g.suite(&head, body))?;
                Ok(text)
            }
            None => Ok(self.ctx.line(&format!("{head}: ..."))),
        }
    }

    /// A field default; mutable containers go through `default_factory`.
    fn field_default(&mut self, init: &Expr) -> CodegenResult<String> {
        let lowered = self.lower_expr(init)?;
        let mutable = matches!(
            init.unparen().kind,
            ExprKind::Array(_) | ExprKind::Object(_) | ExprKind::Native { .. } | ExprKind::New { .. }
        );
        Ok(if mutable {
            format!("field(default_factory=lambda: {lowered})")
        } else {
            lowered
        })
    }

    fn class(&mut self, decl: &ClassDecl) -> CodegenResult<String> {
        self.ctx.require(Features::DATACLASS);
        let bases = if decl.implements.is_empty() {
            String::new()
        } else {
            format!("({})", decl.implements.join(", "))
        };
        let pad = self.ctx.pad();
        let head = format!(
            "{pad}@dataclass\n{pad}class {}{}{bases}:",
            decl.name,
            Self::type_params(&decl.type_params)
        );
        let members = self.indented(|g| {
            let mut members = Vec::new();
            for field in &decl.fields {
                let ty = g.ty(&field.ty)?;
                let text = match &field.init {
                    Some(init) => format!("{}: {ty} = {}", field.name, g.field_default(init)?),
                    None => format!("{}: {ty}", field.name),
                };
                members.push(g.ctx.line(&text));
            }
            if let Some(ctor) = &decl.constructor {
                let (text, _) = g.with_frame(Frame::function(FunctionMode::Sync, false), |g| {
                    g.suite("def __post_init__(self) -> None", ctor)
                })?;
                members.push(text);
            }
            for method in &decl.methods {
                members.push(g.function(method, true)?);
            }
            if members.is_empty() {
                members.push(g.ctx.line("pass"));
            }
            Ok(members)
        })?;
        Ok(format!("{head}\n{}", members.join("\n")))
    }

    fn interface(&mut self, decl: &InterfaceDecl) -> CodegenResult<String> {
        self.ctx.require(Features::PROTOCOL);
        let head = self.ctx.line(&format!(
            "class {}{}(Protocol):",
            decl.name,
            Self::type_params(&decl.type_params)
        ));
        let members = self.indented(|g| {
            let mut members = Vec::new();
            for sig in &decl.methods {
                let mut params = g.params(&sig.params)?;
                params.insert(0, "self".to_string());
                let ret = g.return_annotation(sig.mode, sig.ret.as_ref())?;
                let keyword = if sig.mode.is_async() { "async def" } else { "def" };
                members.push(g.ctx.line(&format!("{keyword} {}({}){ret}: ...", sig.name, params.join(", "))));
            }
            if members.is_empty() {
                members.push(g.ctx.line("pass"));
            }
            Ok(members)
        })?;
        Ok(format!("{head}\n{}", members.join("\n")))
    }

    fn enumeration(&mut self, decl: &EnumDecl) -> CodegenResult<String> {
        self.ctx.require(Features::ENUM);
        let head = self.ctx.line(&format!("class {}(Enum):", decl.name));
        let members = self.indented(|g| {
            let mut members: Vec<String> = decl
                .members
                .iter()
                .map(|m| match &m.value {
                    Some(Literal::Integer(n)) => g.ctx.line(&format!("{} = {n}", m.name)),
                    Some(Literal::String(s)) => g.ctx.line(&format!("{} = {}", m.name, quoted(s))),
                    _ => g.ctx.line(&format!("{} = auto()", m.name)),
                })
                .collect();
            if members.is_empty() {
                members.push(g.ctx.line("pass"));
            }
            Ok(members)
        })?;
        Ok(format!("{head}\n{}", members.join("\n")))
    }

    fn union(&mut self, decl: &UnionDecl) -> CodegenResult<String> {
        self.ctx.require(Features::DATACLASS);
        let pad = self.ctx.pad();
        let type_params = Self::type_params(&decl.type_params);
        let mut out = Vec::new();
        for variant in &decl.variants {
            let fields = self.indented(|g| {
                let mut fields = Vec::new();
                for field in &variant.fields {
                    let ty = g.ty(&field.ty)?;
                    fields.push(g.ctx.line(&format!("{}: {ty}", field.name)));
                }
                if fields.is_empty() {
                    fields.push(g.ctx.line("pass"));
                }
                Ok(fields)
            })?;
            out.push(format!(
                "{pad}@dataclass\n{pad}class {}{type_params}:\n{}",
                variant.name,
                fields.join("\n")
            ));
        }
        let names: Vec<&str> = decl.variants.iter().map(|v| v.name.as_str()).collect();
        let alias = if names.is_empty() {
            "None".to_string()
        } else {
            names.join(" | ")
        };
        out.push(format!("{pad}type {}{type_params} = {alias}", decl.name));
        Ok(out.join("\n"))
    }

    fn if_chain(&mut self, if_stmt: &IfStmt) -> CodegenResult<String> {
        let mut out = Vec::new();
        let mut current = if_stmt;
        let mut keyword = "if";
        loop {
            let cond = self.lower_expr(&current.cond)?;
            out.push(self.suite(&format!("{keyword} {cond}"), &current.then)?);
            match &current.otherwise {
                Some(ElseBranch::If(next)) => {
                    keyword = "elif";
                    current = next.as_ref();
                }
                Some(ElseBranch::Block(block)) => {
                    out.push(self.suite("else", block)?);
                    break;
                }
                None => break,
            }
        }
        Ok(out.join("\n"))
    }

    fn for_loop(&mut self, for_stmt: &ForStmt) -> CodegenResult<String> {
        let binding = &for_stmt.binding;
        let iterable = &for_stmt.iterable;
        let head = match (&iterable.unparen().kind, for_stmt.kind) {
            (ExprKind::Range { .. }, _) => {
                let range = self.lower_expr(iterable)?;
                format!("for {binding} in {range}")
            }
            (_, ForKind::Keys) => {
                let source = self.lower_expr(iterable)?;
                format!("for {binding} in {source}")
            }
            (_, ForKind::Values) => {
                let source = self.lower_expr(iterable)?;
                if for_stmt.is_async {
                    self.ctx.require(Features::STREAM);
                    format!("async for {binding} in {source}")
                } else if resolves_to(iterable, Builtin::Tabula) {
                    format!("for {binding} in {source}.values()")
                } else {
                    format!("for {binding} in {source}")
                }
            }
        };
        self.suite(&head, &for_stmt.body)
    }

    fn switch(&mut self, switch: &SwitchStmt) -> CodegenResult<String> {
        let subject = self.lower_expr(&switch.discriminant)?;
        let head = self.ctx.line(&format!("match {subject}:"));
        let cases = self.indented(|g| {
            let mut cases = Vec::new();
            for case in &switch.cases {
                let values = g.lower_exprs(&case.values)?;
                // Bare names in a case pattern capture instead of comparing.
                let literal_patterns = case.values.iter().all(|v| {
                    matches!(v.unparen().kind, ExprKind::Literal(_) | ExprKind::Member { .. })
                });
                let pattern = if literal_patterns {
                    values.join(" | ")
                } else {
                    format!("_ if {subject} in ({},)", values.join(", "))
                };
                cases.push(g.suite(&format!("case {pattern}"), &case.body)?);
            }
            if let Some(default) = &switch.default {
                cases.push(g.suite("case _", default)?);
            }
            Ok(cases)
        })?;
        Ok(format!("{head}\n{}", cases.join("\n")))
    }

    fn match_stmt(&mut self, match_stmt: &MatchStmt) -> CodegenResult<String> {
        let subject = self.lower_expr(&match_stmt.subject)?;
        let head = self.ctx.line(&format!("match {subject}:"));
        let arms = self.indented(|g| {
            let mut arms = Vec::new();
            for arm in &match_stmt.arms {
                let pattern = match &arm.binding {
                    VariantBinding::None => format!("{}()", arm.variant),
                    VariantBinding::Alias(alias) => format!("{}() as {alias}", arm.variant),
                    VariantBinding::Fields(names) => {
                        let fields = g.ctx.variant(&arm.variant).map(|v| v.fields.clone());
                        let parts: Vec<String> = names
                            .iter()
                            .enumerate()
                            .map(|(i, name)| {
                                let field = fields.as_ref().and_then(|f| f.get(i)).unwrap_or(name);
                                format!("{field}={name}")
                            })
                            .collect();
                        format!("{}({})", arm.variant, parts.join(", "))
                    }
                };
                arms.push(g.suite(&format!("case {pattern}"), &arm.body)?);
            }
            if let Some(default) = &match_stmt.default {
                arms.push(g.suite("case _", default)?);
            }
            Ok(arms)
        })?;
        Ok(format!("{head}\n{}", arms.join("\n")))
    }

    fn try_stmt(&mut self, try_stmt: &TryStmt) -> CodegenResult<String> {
        let mut out = vec![self.suite("try", &try_stmt.body)?];
        if let Some(catch) = &try_stmt.catch {
            out.push(self.suite(&format!("except Exception as {}", catch.param), &catch.body)?);
        }
        match &try_stmt.finally {
            Some(finally) => out.push(self.suite("finally", finally)?),
            None if try_stmt.catch.is_none() => {
                out.push(self.suite("finally", &Block::default())?);
            }
            None => {}
        }
        Ok(out.join("\n"))
    }

    fn print(&mut self, level: PrintLevel, args: &[Expr]) -> CodegenResult<String> {
        let mut lowered = self.lower_exprs(args)?;
        match level {
            PrintLevel::Log => {}
            PrintLevel::Debug => {
                lowered = lowered.into_iter().map(|a| format!("repr({a})")).collect();
            }
            PrintLevel::Warn => {
                self.ctx.require(Features::SYS);
                lowered.push("file=sys.stderr".to_string());
            }
        }
        Ok(self.ctx.line(&format!("print({})", lowered.join(", "))))
    }

    fn resource(&mut self, resource: &ResourceStmt) -> CodegenResult<String> {
        let acquired = match &resource.kind {
            ResourceKind::Acquire(expr) => self.lower_expr(expr)?,
            ResourceKind::Arena | ResourceKind::Page => {
                self.ctx.require(Features::CONTEXT);
                "contextlib.nullcontext()".to_string()
            }
        };
        self.suite(&format!("with {acquired} as {}", resource.binding), &resource.body)
    }

    fn entry(&mut self, is_async: bool, body: &Block) -> CodegenResult<String> {
        if !is_async {
            return self.suite("if __name__ == \"__main__\"", body);
        }
        self.ctx.require(Features::ASYNC | Features::ASYNCIO);
        let (main, _) = self.with_frame(Frame::function(FunctionMode::Async, false), |g| {
            g.suite("async def main() -> None", body)
        })?;
        let guard = self.ctx.line("if __name__ == \"__main__\":");
        let run = self.indented(|g| Ok(g.ctx.line("asyncio.run(main())")))?;
        Ok(format!("{main}\n\n{guard}\n{run}"))
    }
}
