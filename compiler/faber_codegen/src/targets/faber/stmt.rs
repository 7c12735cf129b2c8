//! Statement re-emission.

use faber_ir::{
    BindingTarget, Block, ClassDecl, ElseBranch, EnumDecl, ForKind, ForStmt, FunctionDecl,
    FunctionMode, IfStmt, ImportDecl, ImportItems, InterfaceDecl, MatchStmt, Param, RaiseKind,
    ResourceKind, ResourceStmt, Stmt, StmtKind, SwitchStmt, TryStmt, TypeExpr, UnionDecl, VarDecl,
    VariantBinding,
};

use super::{ty, FaberGenerator};
use crate::generator::Generator;
use crate::targets::{brace_block, quoted};
use crate::CodegenResult;

impl FaberGenerator {
    pub(super) fn stmt(&mut self, stmt: &Stmt) -> CodegenResult<String> {
        match &stmt.kind {
            StmtKind::Import(decl) => Ok(self.import(decl)),
            StmtKind::Var(decl) => self.var(decl),
            StmtKind::Function(decl) => self.function(decl),
            StmtKind::Class(decl) => self.class(decl),
            StmtKind::Interface(decl) => self.interface(decl),
            StmtKind::Enum(decl) => self.enumeration(decl),
            StmtKind::Union(decl) => Ok(self.union(decl)),
            StmtKind::TypeAlias(decl) => {
                Ok(self.ctx.line(&format!("typus {} = {}", decl.name, ty(&decl.ty))))
            }
            StmtKind::If(if_stmt) => self.if_chain(if_stmt),
            StmtKind::While { cond, body } => {
                let cond = self.lower_expr(cond)?;
                self.braced(&format!("dum {cond}"), body)
            }
            StmtKind::For(for_stmt) => self.for_loop(for_stmt),
            StmtKind::Switch(switch) => self.switch(switch),
            StmtKind::Match(match_stmt) => self.match_stmt(match_stmt),
            StmtKind::Guard(clauses) => {
                let pad = self.ctx.pad();
                let lines = self.indented(|g| {
                    let mut out = Vec::with_capacity(clauses.len());
                    for clause in clauses {
                        let cond = g.lower_expr(&clause.cond)?;
                        out.push(g.braced(&format!("si {cond}"), &clause.body)?);
                    }
                    Ok(out)
                })?;
                Ok(brace_block(&pad, "custodi", &lines))
            }
            StmtKind::Try(try_stmt) => self.try_stmt(try_stmt),
            StmtKind::Raise { kind, value } => {
                let keyword = match kind {
                    RaiseKind::Error => "iace",
                    RaiseKind::Fatal => "mori",
                };
                let value = self.lower_expr(value)?;
                Ok(self.ctx.line(&format!("{keyword} {value}")))
            }
            StmtKind::Return(value) => Ok(match value {
                Some(value) => {
                    let value = self.lower_expr(value)?;
                    self.ctx.line(&format!("redde {value}"))
                }
                None => self.ctx.line("redde"),
            }),
            StmtKind::Break => Ok(self.ctx.line("rumpe")),
            StmtKind::Continue => Ok(self.ctx.line("perge")),
            StmtKind::Block(block) => self.braced("", block),
            StmtKind::Expr(expr) => {
                let text = self.lower_expr(expr)?;
                Ok(self.ctx.line(&text))
            }
            StmtKind::Print { level, args } => {
                let args = self.lower_exprs(args)?;
                if args.is_empty() {
                    Ok(self.ctx.line(level.keyword()))
                } else {
                    Ok(self.ctx.line(&format!("{} {}", level.keyword(), args.join(", "))))
                }
            }
            StmtKind::Assert { cond, message } => {
                let cond = self.lower_expr(cond)?;
                Ok(match message {
                    Some(message) => {
                        let message = self.lower_expr(message)?;
                        self.ctx.line(&format!("adfirma {cond}, {message}"))
                    }
                    None => self.ctx.line(&format!("adfirma {cond}")),
                })
            }
            StmtKind::Resource(resource) => self.resource(resource),
            StmtKind::Entry { is_async, body } => {
                self.braced(if *is_async { "incipiet" } else { "incipit" }, body)
            }
        }
    }

    /// `head { body }` at the current depth.
    fn braced(&mut self, head: &str, body: &Block) -> CodegenResult<String> {
        let lines = self.lower_block_lines(body)?;
        Ok(brace_block(&self.ctx.pad(), head, &lines))
    }

    fn import(&self, decl: &ImportDecl) -> String {
        let items = match &decl.items {
            ImportItems::Namespace(alias) => format!("* ut {alias}"),
            ImportItems::Named(names) => {
                let names: Vec<String> = names
                    .iter()
                    .map(|n| match &n.alias {
                        Some(alias) => format!("{} ut {alias}", n.name),
                        None => n.name.clone(),
                    })
                    .collect();
                format!("{{ {} }}", names.join(", "))
            }
        };
        self.ctx
            .line(&format!("importa {items} ex {}", quoted(&decl.source)))
    }

    fn var(&mut self, decl: &VarDecl) -> CodegenResult<String> {
        let keyword = if decl.mutable { "varia" } else { "fixum" };
        let target = match &decl.target {
            BindingTarget::Ident(name) => name.clone(),
            BindingTarget::Object(fields) => {
                let fields: Vec<String> = fields
                    .iter()
                    .map(|(field, alias)| match alias {
                        Some(alias) => format!("{field} ut {alias}"),
                        None => field.clone(),
                    })
                    .collect();
                format!("{{ {} }}", fields.join(", "))
            }
            BindingTarget::Array(names) => format!("[{}]", names.join(", ")),
        };
        let mut text = match &decl.ty {
            Some(t) => format!("{keyword} {} {target}", ty(t)),
            None => format!("{keyword} {target}"),
        };
        if let Some(init) = &decl.init {
            text.push_str(&format!(" = {}", self.lower_expr(init)?));
        }
        Ok(self.ctx.line(&text))
    }

    pub(super) fn params(&mut self, params: &[Param]) -> CodegenResult<String> {
        let mut out = Vec::with_capacity(params.len());
        for param in params {
            let mut text = String::new();
            if param.rest {
                text.push_str("ceteri ");
            }
            if let Some(t) = &param.ty {
                text.push_str(&ty(t));
                text.push(' ');
            }
            text.push_str(&param.name);
            if let Some(default) = &param.default {
                text.push_str(&format!(" = {}", self.lower_expr(default)?));
            }
            out.push(text);
        }
        Ok(out.join(", "))
    }

    fn signature(
        &mut self,
        name: &str,
        type_params: &[String],
        params: &[Param],
        ret: Option<&TypeExpr>,
        mode: FunctionMode,
    ) -> CodegenResult<String> {
        let ret = ret.map(|r| format!(" -> {}", ty(r))).unwrap_or_default();
        Ok(format!(
            "{}functio {name}{}({}){ret}",
            mode_prefix(mode),
            generics(type_params),
            self.params(params)?
        ))
    }

    fn function(&mut self, decl: &FunctionDecl) -> CodegenResult<String> {
        let signature = self.signature(
            &decl.name,
            &decl.type_params,
            &decl.params,
            decl.ret.as_ref(),
            decl.mode,
        )?;
        match &decl.body {
            Some(body) => self.braced(&signature, body),
            None => Ok(self.ctx.line(&signature)),
        }
    }

    fn class(&mut self, decl: &ClassDecl) -> CodegenResult<String> {
        let mut head = format!("genus {}{}", decl.name, generics(&decl.type_params));
        if !decl.implements.is_empty() {
            head.push_str(&format!(" implet {}", decl.implements.join(", ")));
        }
        let pad = self.ctx.pad();
        let members = self.indented(|g| {
            let mut out = Vec::with_capacity(decl.fields.len() + decl.methods.len() + 1);
            for field in &decl.fields {
                let text = match &field.init {
                    Some(init) => format!("{} {} = {}", ty(&field.ty), field.name, g.lower_expr(init)?),
                    None => format!("{} {}", ty(&field.ty), field.name),
                };
                out.push(g.ctx.line(&text));
            }
            if let Some(ctor) = &decl.constructor {
                out.push(g.braced("creo", ctor)?);
            }
            for method in &decl.methods {
                out.push(g.function(method)?);
            }
            Ok(out)
        })?;
        Ok(brace_block(&pad, &head, &members))
    }

    fn interface(&mut self, decl: &InterfaceDecl) -> CodegenResult<String> {
        let pad = self.ctx.pad();
        let lines = self.indented(|g| {
            let mut out = Vec::with_capacity(decl.methods.len());
            for sig in &decl.methods {
                let text = g.signature(&sig.name, &[], &sig.params, sig.ret.as_ref(), sig.mode)?;
                out.push(g.ctx.line(&text));
            }
            Ok(out)
        })?;
        let head = format!("pactum {}{}", decl.name, generics(&decl.type_params));
        Ok(brace_block(&pad, &head, &lines))
    }

    fn enumeration(&mut self, decl: &EnumDecl) -> CodegenResult<String> {
        let pad = self.ctx.pad();
        let lines = self.indented(|g| {
            let mut out = Vec::with_capacity(decl.members.len());
            for member in &decl.members {
                let text = match &member.value {
                    Some(value) => format!("{} = {},", member.name, g.literal(value)?),
                    None => format!("{},", member.name),
                };
                out.push(g.ctx.line(&text));
            }
            Ok(out)
        })?;
        Ok(brace_block(&pad, &format!("ordo {}", decl.name), &lines))
    }

    fn union(&mut self, decl: &UnionDecl) -> String {
        let pad = self.ctx.pad();
        self.ctx.indent();
        let lines: Vec<String> = decl
            .variants
            .iter()
            .map(|variant| {
                if variant.fields.is_empty() {
                    return self.ctx.line(&variant.name);
                }
                let fields: Vec<String> = variant
                    .fields
                    .iter()
                    .map(|f| format!("{} {}", ty(&f.ty), f.name))
                    .collect();
                self.ctx.line(&format!("{} {{ {} }}", variant.name, fields.join(", ")))
            })
            .collect();
        self.ctx.dedent();
        let head = format!("discretio {}{}", decl.name, generics(&decl.type_params));
        brace_block(&pad, &head, &lines)
    }

    fn if_chain(&mut self, if_stmt: &IfStmt) -> CodegenResult<String> {
        let pad = self.ctx.pad();
        let mut out = Vec::new();
        let mut current = if_stmt;
        let mut opener = format!("{pad}si");
        loop {
            let cond = self.lower_expr(&current.cond)?;
            out.push(format!("{opener} {cond} {{"));
            out.extend(self.lower_block_lines(&current.then)?);
            match &current.otherwise {
                Some(ElseBranch::If(next)) => {
                    opener = format!("{pad}}} sin");
                    current = next.as_ref();
                }
                Some(ElseBranch::Block(block)) => {
                    out.push(format!("{pad}}} secus {{"));
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
        let iterable = self.lower_expr(&for_stmt.iterable)?;
        let binding = &for_stmt.binding;
        let head = match (for_stmt.kind, for_stmt.is_async) {
            (_, true) => format!("ex {iterable} fiet {binding}"),
            (ForKind::Values, false) => format!("ex {iterable} pro {binding}"),
            (ForKind::Keys, false) => format!("de {iterable} pro {binding}"),
        };
        self.braced(&head, &for_stmt.body)
    }

    fn switch(&mut self, switch: &SwitchStmt) -> CodegenResult<String> {
        let subject = self.lower_expr(&switch.discriminant)?;
        let pad = self.ctx.pad();
        let cases = self.indented(|g| {
            let mut out = Vec::with_capacity(switch.cases.len() + 1);
            for case in &switch.cases {
                let values = g.lower_exprs(&case.values)?;
                out.push(g.braced(&format!("casu {}", values.join(", ")), &case.body)?);
            }
            if let Some(default) = &switch.default {
                out.push(g.braced("ceterum", default)?);
            }
            Ok(out)
        })?;
        Ok(brace_block(&pad, &format!("elige {subject}"), &cases))
    }

    fn match_stmt(&mut self, match_stmt: &MatchStmt) -> CodegenResult<String> {
        let subject = self.lower_expr(&match_stmt.subject)?;
        let pad = self.ctx.pad();
        let arms = self.indented(|g| {
            let mut out = Vec::with_capacity(match_stmt.arms.len() + 1);
            for arm in &match_stmt.arms {
                let head = match &arm.binding {
                    VariantBinding::None => format!("casu {}", arm.variant),
                    VariantBinding::Alias(alias) => format!("casu {} ut {alias}", arm.variant),
                    VariantBinding::Fields(names) => {
                        format!("casu {} pro {}", arm.variant, names.join(", "))
                    }
                };
                out.push(g.braced(&head, &arm.body)?);
            }
            if let Some(default) = &match_stmt.default {
                out.push(g.braced("ceterum", default)?);
            }
            Ok(out)
        })?;
        Ok(brace_block(&pad, &format!("discerne {subject}"), &arms))
    }

    fn try_stmt(&mut self, try_stmt: &TryStmt) -> CodegenResult<String> {
        let pad = self.ctx.pad();
        let mut out = vec![format!("{pad}tempta {{")];
        out.extend(self.lower_block_lines(&try_stmt.body)?);
        if let Some(catch) = &try_stmt.catch {
            out.push(format!("{pad}}} cape {} {{", catch.param));
            out.extend(self.lower_block_lines(&catch.body)?);
        }
        if let Some(finally) = &try_stmt.finally {
            out.push(format!("{pad}}} demum {{"));
            out.extend(self.lower_block_lines(finally)?);
        }
        out.push(format!("{pad}}}"));
        Ok(out.join("\n"))
    }

    fn resource(&mut self, resource: &ResourceStmt) -> CodegenResult<String> {
        let source = match &resource.kind {
            ResourceKind::Arena => "arena".to_string(),
            ResourceKind::Page => "page".to_string(),
            ResourceKind::Acquire(init) => self.lower_expr(init)?,
        };
        self.braced(&format!("cura {source} fit {}", resource.binding), &resource.body)
    }
}

/// `futura `, `cursor ` or both, before `functio`.
fn mode_prefix(mode: FunctionMode) -> &'static str {
    match mode {
        FunctionMode::Sync => "",
        FunctionMode::Async => "futura ",
        FunctionMode::Generator => "cursor ",
        FunctionMode::AsyncGenerator => "futura cursor ",
    }
}

fn generics(params: &[String]) -> String {
    if params.is_empty() {
        String::new()
    } else {
        format!("<{}>", params.join(", "))
    }
}
