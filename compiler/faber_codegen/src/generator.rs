//! The contract every target generator implements, and the two-pass
//! pipeline that drives it.
//!
//! Pass one lowers the program body statement by statement, populating the
//! feature tracker as a side effect. Pass two hands the finished tracker to
//! the target's preamble emitter. Output is `preamble ++ body`.

use faber_ir::{Block, Expr, Program, Stmt};

use crate::comments::{render_leading, render_trailing};
use crate::context::{Frame, GenContext, Unimplemented};
use crate::features::RequiredFeatures;
use crate::stack::ensure_sufficient_stack;
use crate::{CodegenResult, CodegenTarget};

/// Per-target lowering rules.
///
/// `gen_stmt` and `gen_expr` are exhaustive matches over the node kinds.
/// The provided methods implement the discipline shared by all targets:
/// comment re-emission, balanced indentation and frame save/restore.
pub(crate) trait Generator {
    fn ctx(&self) -> &GenContext;

    fn ctx_mut(&mut self) -> &mut GenContext;

    /// Lower one statement to indented source lines, without comments.
    fn gen_stmt(&mut self, stmt: &Stmt) -> CodegenResult<String>;

    /// Lower one expression to source text.
    fn gen_expr(&mut self, expr: &Expr) -> CodegenResult<String>;

    /// Imports and support definitions required by the recorded features.
    ///
    /// Must be a pure function of `features`.
    fn preamble(&self, features: &RequiredFeatures) -> Vec<String>;

    /// Lower a statement including its attached comments.
    fn lower_stmt(&mut self, stmt: &Stmt) -> CodegenResult<String> {
        tracing::trace!(kind = stmt.kind.name(), depth = self.ctx().depth(), "lowering statement");
        let code = ensure_sufficient_stack(|| self.gen_stmt(stmt))?;
        if stmt.comments.is_empty() {
            return Ok(code);
        }

        let target = self.ctx().target();
        let mut lines = render_leading(&stmt.comments.leading, target, &self.ctx().pad());
        let trailing = render_trailing(&stmt.comments.trailing, target);
        let mut code_lines = code.lines();
        if let Some(first) = code_lines.next() {
            lines.push(format!("{first}{trailing}"));
        }
        lines.extend(code_lines.map(str::to_string));
        Ok(lines.join("\n"))
    }

    /// Lower an expression, growing the stack if needed.
    fn lower_expr(&mut self, expr: &Expr) -> CodegenResult<String> {
        ensure_sufficient_stack(|| self.gen_expr(expr))
    }

    /// Lower every expression in `exprs`.
    fn lower_exprs(&mut self, exprs: &[Expr]) -> CodegenResult<Vec<String>> {
        exprs.iter().map(|e| self.lower_expr(e)).collect()
    }

    /// Run `f` one indentation level deeper.
    ///
    /// Depth is restored before any error from `f` propagates.
    fn indented<T>(&mut self, f: impl FnOnce(&mut Self) -> CodegenResult<T>) -> CodegenResult<T>
    where
        Self: Sized,
    {
        self.ctx_mut().indent();
        let result = f(self);
        self.ctx_mut().dedent();
        result
    }

    /// Lower the statements of `block` one level deeper, one per line.
    fn lower_block_lines(&mut self, block: &Block) -> CodegenResult<Vec<String>>
    where
        Self: Sized,
    {
        self.indented(|g| block.stmts.iter().map(|s| g.lower_stmt(s)).collect())
    }

    /// Run `f` inside a fresh function frame, returning its result and the
    /// frame as `f` left it. The previous frame is restored on every path.
    fn with_frame<T>(
        &mut self,
        frame: Frame,
        f: impl FnOnce(&mut Self) -> CodegenResult<T>,
    ) -> CodegenResult<(T, Frame)>
    where
        Self: Sized,
    {
        let saved = self.ctx_mut().swap_frame(frame);
        let result = f(self);
        let inner = self.ctx_mut().swap_frame(saved);
        result.map(|value| (value, inner))
    }

    /// Run `f` with `handle` on top of the resource stack.
    fn with_resource<T>(
        &mut self,
        handle: &str,
        f: impl FnOnce(&mut Self) -> CodegenResult<T>,
    ) -> CodegenResult<T>
    where
        Self: Sized,
    {
        self.ctx_mut().push_resource(handle);
        let result = f(self);
        self.ctx_mut().pop_resource();
        result
    }
}

/// Output of one generation run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeneratedCode {
    pub target: CodegenTarget,
    /// Imports and support definitions, followed by a blank line when
    /// non-empty; empty otherwise.
    pub preamble: String,
    /// Top-level statements in source order.
    pub body: String,
    /// Everything the body used.
    pub features: RequiredFeatures,
    /// Constructs emitted as explicit placeholders.
    pub unimplemented: Vec<Unimplemented>,
}

impl GeneratedCode {
    /// The complete source file: preamble followed by body.
    pub fn source(&self) -> String {
        format!("{}{}", self.preamble, self.body)
    }
}

/// Drive `generator` over `program`: body first, then preamble.
pub(crate) fn run<G: Generator>(generator: &mut G, program: &Program) -> CodegenResult<GeneratedCode> {
    generator.ctx_mut().collect_declarations(program);

    let mut statements = Vec::with_capacity(program.body.len());
    for stmt in &program.body {
        statements.push(generator.lower_stmt(stmt)?);
    }
    debug_assert_eq!(generator.ctx().depth(), 0, "indentation leaked");

    let preamble = preamble_text(&generator.preamble(generator.ctx().features()));
    let ctx = generator.ctx_mut();

    Ok(GeneratedCode {
        target: ctx.target(),
        preamble,
        body: statements.join("\n"),
        features: ctx.features().clone(),
        unimplemented: ctx.take_unimplemented(),
    })
}

/// Join preamble lines, terminated by a blank line when non-empty.
fn preamble_text(lines: &[String]) -> String {
    if lines.is_empty() {
        String::new()
    } else {
        format!("{}\n\n", lines.join("\n"))
    }
}
