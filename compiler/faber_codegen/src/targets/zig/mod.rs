//! Zig generator.
//!
//! Zig has no exceptions, no async runtime and no implicit allocator, so this
//! target carries the most lowering logic:
//!
//! - Recoverable raises become `return error.X` and the enclosing function
//!   gets an error-union return type. Calls to such functions are wrapped in
//!   `try`, which in turn makes the caller fallible.
//! - Allocating operations use the innermost `cura` handle. A function that
//!   allocates with no handle in scope gains an `alloc: std.mem.Allocator`
//!   first parameter, and its callers pass their own handle.
//!
//! Both facts flow from callee to caller, and callers may precede callees in
//! source order, so generation repeats until the sets of fallible and
//! allocator-taking functions stop growing. Functions and methods share one
//! namespace in these sets, keyed by name.

mod expr;
mod preamble;
mod stmt;
mod types;

use faber_ir::{Expr, Program, Stmt};
use rustc_hash::FxHashSet;

use crate::analysis::mutated_bindings;
use crate::context::GenContext;
use crate::features::RequiredFeatures;
use crate::generator::{self, GeneratedCode, Generator};
use crate::{CodegenResult, GenerateOptions};

pub(crate) fn generate(program: &Program, options: &GenerateOptions) -> CodegenResult<GeneratedCode> {
    let mutated = mutated_bindings(program);
    let mut alloc_fns = FxHashSet::default();
    let mut fallible_fns = FxHashSet::default();
    let mut round = 0_u32;
    loop {
        round += 1;
        let mut generator = ZigGenerator::new(options, &mutated, alloc_fns.clone(), fallible_fns.clone());
        let code = generator::run(&mut generator, program)?;
        if generator.ctx.alloc_fns == alloc_fns && generator.fallible_fns == fallible_fns {
            tracing::trace!(round, "zig signatures settled");
            return Ok(code);
        }
        tracing::debug!(
            round,
            alloc_fns = generator.ctx.alloc_fns.len(),
            fallible_fns = generator.fallible_fns.len(),
            "zig signatures changed; regenerating"
        );
        alloc_fns = generator.ctx.alloc_fns;
        fallible_fns = generator.fallible_fns;
    }
}

pub(crate) struct ZigGenerator<'a> {
    ctx: GenContext,
    /// Bindings assigned after declaration; a `fixum` among them needs `var`.
    mutated: &'a FxHashSet<String>,
    /// Functions whose return type is an error union.
    fallible_fns: FxHashSet<String>,
}

impl<'a> ZigGenerator<'a> {
    pub fn new(
        options: &GenerateOptions,
        mutated: &'a FxHashSet<String>,
        alloc_fns: FxHashSet<String>,
        fallible_fns: FxHashSet<String>,
    ) -> Self {
        let mut ctx = GenContext::new(options);
        ctx.alloc_fns = alloc_fns;
        ZigGenerator {
            ctx,
            mutated,
            fallible_fns,
        }
    }
}

impl Generator for ZigGenerator<'_> {
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
