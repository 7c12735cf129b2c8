//! Rust generator.
//!
//! Faber's recoverable raises map onto `Result`: a function that can raise
//! returns `Result<T, Box<dyn std::error::Error>>`, its returns are wrapped
//! in `Ok`, and calls to it end in `?`, which makes the caller fallible in
//! turn. Callers may precede callees, so generation repeats until the set of
//! fallible functions stops growing (functions and methods share one
//! namespace, keyed by name).
//!
//! `fixum` bindings stay immutable unless the program mutates them later;
//! async functions are native `async fn` and an async entry runs on tokio.

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

/// Error half of every fallible signature.
const ERROR_TY: &str = "Box<dyn std::error::Error>";

pub(crate) fn generate(program: &Program, options: &GenerateOptions) -> CodegenResult<GeneratedCode> {
    let mutated = mutated_bindings(program);
    let mut fallible_fns = FxHashSet::default();
    let mut round = 0_u32;
    loop {
        round += 1;
        let mut generator = RustGenerator::new(options, &mutated, fallible_fns.clone());
        let code = generator::run(&mut generator, program)?;
        if generator.fallible_fns == fallible_fns {
            tracing::trace!(round, "rust signatures settled");
            return Ok(code);
        }
        tracing::debug!(
            round,
            fallible_fns = generator.fallible_fns.len(),
            "rust signatures changed; regenerating"
        );
        fallible_fns = generator.fallible_fns;
    }
}

pub(crate) struct RustGenerator<'a> {
    ctx: GenContext,
    mutated: &'a FxHashSet<String>,
    /// Functions returning `Result`.
    fallible_fns: FxHashSet<String>,
    /// Method names per declared `pactum`, for splitting trait impls out of
    /// inherent impls.
    traits: FxHashMap<String, Vec<String>>,
    /// `discerne` aliases in scope, with the payload fields bound beside
    /// them as `{alias}_{field}`.
    payload_aliases: FxHashMap<String, Vec<String>>,
}

impl<'a> RustGenerator<'a> {
    pub fn new(
        options: &GenerateOptions,
        mutated: &'a FxHashSet<String>,
        fallible_fns: FxHashSet<String>,
    ) -> Self {
        RustGenerator {
            ctx: GenContext::new(options),
            mutated,
            fallible_fns,
            traits: FxHashMap::default(),
            payload_aliases: FxHashMap::default(),
        }
    }
}

impl Generator for RustGenerator<'_> {
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
