//! TypeScript generator.
//!
//! The most permissive target and the default. Function modes map 1:1 onto
//! `async`, `function*` and `async function*`; `cede` becomes `yield` or
//! `await` by the enclosing frame. Recoverable raises throw `Error`, fatal
//! raises throw a `Panic` subclass defined in the preamble.

mod expr;
mod preamble;
mod stmt;
mod types;

use faber_ir::{Expr, Program, Stmt};

use crate::context::GenContext;
use crate::features::RequiredFeatures;
use crate::generator::{self, GeneratedCode, Generator};
use crate::{CodegenResult, GenerateOptions};

pub(crate) fn generate(program: &Program, options: &GenerateOptions) -> CodegenResult<GeneratedCode> {
    let mut generator = TypeScriptGenerator::new(options);
    generator::run(&mut generator, program)
}

pub(crate) struct TypeScriptGenerator {
    ctx: GenContext,
}

impl TypeScriptGenerator {
    pub fn new(options: &GenerateOptions) -> Self {
        TypeScriptGenerator {
            ctx: GenContext::new(options),
        }
    }
}

impl Generator for TypeScriptGenerator {
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
