//! Python generator.
//!
//! Emits Python 3.12: PEP 695 type parameters and `type` aliases, `match`
//! for tagged unions, dataclasses for `genus` and `discretio` variants, and
//! `Protocol` for `pactum`. Blocks are indentation-delimited, so an empty
//! body is spelled `pass`.

mod expr;
mod preamble;
mod stmt;
mod types;

use faber_ir::{Block, Expr, Program, Stmt};

use crate::context::GenContext;
use crate::features::RequiredFeatures;
use crate::generator::{self, GeneratedCode, Generator};
use crate::{CodegenResult, GenerateOptions};

pub(crate) fn generate(program: &Program, options: &GenerateOptions) -> CodegenResult<GeneratedCode> {
    let mut generator = PythonGenerator::new(options);
    generator::run(&mut generator, program)
}

pub(crate) struct PythonGenerator {
    ctx: GenContext,
}

impl PythonGenerator {
    pub fn new(options: &GenerateOptions) -> Self {
        PythonGenerator {
            ctx: GenContext::new(options),
        }
    }

    /// `head:` followed by the block one level deeper, or `pass` when empty.
    fn suite(&mut self, head: &str, block: &Block) -> CodegenResult<String> {
        let lines = self.suite_lines(block)?;
        Ok(format!("{}{head}:\n{}", self.ctx.pad(), lines.join("\n")))
    }

    /// Body lines of a block, never empty.
    fn suite_lines(&mut self, block: &Block) -> CodegenResult<Vec<String>> {
        let lines = self.lower_block_lines(block)?;
        if lines.is_empty() {
            Ok(vec![self.indented(|g| Ok(g.ctx.line("pass")))?])
        } else {
            Ok(lines)
        }
    }
}

impl Generator for PythonGenerator {
    fn ctx(&self) -> &GenContext {
        &self.ctx
    }

    fn ctx_mut(&mut self) -> &mut GenContext {
        &mut self.ctx
    }

    fn gen_stmt(&mut self, stmt: &Stmt) -> CodegenResult<String> {
        self.stmt(stmt)
    }

    fn gen_expr(&mut self, expr: &Expr) -> CodegenResult<String> {
        self.expr(expr)
    }

    fn preamble(&self, features: &RequiredFeatures) -> Vec<String> {
        preamble::preamble(features)
    }
}

#[cfg(test)]
mod tests;
