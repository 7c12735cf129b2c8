//! Faber generator.
//!
//! Re-emits canonical Faber source. Nothing is translated: collection
//! vocabulary, modes and keywords come back as written, so the output is a
//! formatted copy of the input program. Declarations are type-first
//! (`fixum textus nomen = "x"`), blocks are braced and statements carry no
//! terminator. No feature is ever recorded and the preamble is always empty.

mod expr;
mod stmt;

use faber_ir::{Expr, Program, Stmt, TypeExpr};

use crate::context::GenContext;
use crate::features::RequiredFeatures;
use crate::generator::{self, GeneratedCode, Generator};
use crate::{CodegenResult, GenerateOptions};

pub(crate) fn generate(program: &Program, options: &GenerateOptions) -> CodegenResult<GeneratedCode> {
    let mut generator = FaberGenerator::new(options);
    generator::run(&mut generator, program)
}

pub(crate) struct FaberGenerator {
    ctx: GenContext,
}

impl FaberGenerator {
    pub fn new(options: &GenerateOptions) -> Self {
        FaberGenerator {
            ctx: GenContext::new(options),
        }
    }
}

impl Generator for FaberGenerator {
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

    fn preamble(&self, _features: &RequiredFeatures) -> Vec<String> {
        Vec::new()
    }
}

/// A type annotation as written.
fn ty(ty: &TypeExpr) -> String {
    match ty {
        TypeExpr::Named {
            name,
            args,
            nullable,
        } => {
            let mut out = name.clone();
            if !args.is_empty() {
                let args: Vec<String> = args.iter().map(self::ty).collect();
                out.push_str(&format!("<{}>", args.join(", ")));
            }
            if *nullable {
                out.push('?');
            }
            out
        }
        TypeExpr::Function { params, ret } => {
            let params: Vec<String> = params.iter().map(self::ty).collect();
            format!("({}) -> {}", params.join(", "), self::ty(ret))
        }
        TypeExpr::Union(members) => members.iter().map(self::ty).collect::<Vec<_>>().join(" | "),
    }
}

#[cfg(test)]
mod tests;
