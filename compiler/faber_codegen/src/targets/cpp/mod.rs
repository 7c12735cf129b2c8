//! C++ generator.
//!
//! Emits C++23. Recoverable raises are exceptions, `cura` blocks are RAII
//! scopes, async functions run their body through `std::async` and `cede`
//! waits on the resulting future, and `cursor` functions are
//! `std::generator` coroutines. Headers are included only for the library
//! units the program actually used.
//!
//! `discerne` has no lowering yet: it is emitted as an
//! `UNIMPLEMENTED(discerne)` comment block and reported on the result.

mod expr;
mod preamble;
mod stmt;
mod types;

use faber_ir::{Expr, Program, Stmt};
use rustc_hash::{FxHashMap, FxHashSet};

use crate::analysis::mutated_bindings;
use crate::context::GenContext;
use crate::features::RequiredFeatures;
use crate::generator::{self, GeneratedCode, Generator};
use crate::{CodegenResult, GenerateOptions};

pub(crate) fn generate(program: &Program, options: &GenerateOptions) -> CodegenResult<GeneratedCode> {
    let mutated = mutated_bindings(program);
    let mut generator = CppGenerator::new(options, &mutated);
    generator::run(&mut generator, program)
}

pub(crate) struct CppGenerator<'a> {
    ctx: GenContext,
    /// Bindings assigned after declaration; a `fixum` among them loses `const`.
    mutated: &'a FxHashSet<String>,
    /// Method names per declared `pactum`, for `override`.
    interfaces: FxHashMap<String, Vec<String>>,
}

impl<'a> CppGenerator<'a> {
    pub fn new(options: &GenerateOptions, mutated: &'a FxHashSet<String>) -> Self {
        CppGenerator {
            ctx: GenContext::new(options),
            mutated,
            interfaces: FxHashMap::default(),
        }
    }
}

impl Generator for CppGenerator<'_> {
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
