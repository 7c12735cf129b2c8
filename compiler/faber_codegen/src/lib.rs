//! Retargetable code generation for Faber.
//!
//! Lowers a typed Faber tree ([`faber_ir::Program`]) to source text in one of
//! six targets: TypeScript, Python, Zig, Rust, C++ and Faber itself.
//!
//! # Pipeline
//!
//! Every call runs two passes over a fresh, unshared generator context:
//!
//! 1. The target's generator lowers each top-level statement in source
//!    order, recording every runtime construct it relies on in the feature
//!    tracker.
//! 2. The target's preamble emitter reads the final feature set and emits
//!    exactly the imports, helpers and support definitions the body used.
//!
//! Output is `preamble ++ body`. Any error aborts the call; partial output
//! is never returned.
//!
//! # Key Types
//!
//! - [`GenerateOptions`]: target selection plus formatting knobs
//! - [`GeneratedCode`]: structured result (preamble, body, features, markers)
//! - [`CodegenError`]: the three failure kinds
//!
//! # Debugging
//!
//! - `RUST_LOG=faber_codegen=debug`: heuristic fallbacks and unimplemented markers
//! - `RUST_LOG=faber_codegen=trace`: per-statement dispatch (very verbose)
//!
//! Call [`init_tracing`] once to install a subscriber.

mod analysis;
mod comments;
mod context;
mod error;
mod features;
mod generator;
mod options;
mod registry;
mod runtime;
mod stack;
mod target;
mod targets;

use std::sync::Once;

use faber_ir::Program;
use rayon::prelude::*;

pub use context::Unimplemented;
pub use error::{CodegenError, CodegenResult};
pub use features::{Features, RequiredFeatures};
pub use generator::GeneratedCode;
pub use options::GenerateOptions;
pub use registry::CollectionKind;
pub use runtime::Helper;
pub use target::{CodegenTarget, CommentSyntax, Terminator};

/// Lower `program` to complete source text for `options.target`.
pub fn generate(program: &Program, options: &GenerateOptions) -> CodegenResult<String> {
    generate_code(program, options).map(|code| code.source())
}

/// Lower `program`, keeping preamble, body and recorded features apart.
#[tracing::instrument(
    level = "debug",
    skip_all,
    fields(target = %options.target, statements = program.body.len())
)]
pub fn generate_code(program: &Program, options: &GenerateOptions) -> CodegenResult<GeneratedCode> {
    let code = targets::generate(program, options)?;
    tracing::debug!(
        preamble_bytes = code.preamble.len(),
        body_bytes = code.body.len(),
        unimplemented = code.unimplemented.len(),
        "generated"
    );
    Ok(code)
}

/// Lower independent programs in parallel.
///
/// Each program gets its own generator context; results are in input order.
pub fn generate_many(programs: &[Program], options: &GenerateOptions) -> Vec<CodegenResult<String>> {
    programs
        .par_iter()
        .map(|program| generate(program, options))
        .collect()
}

/// Lower `program` for the target named `target` (`"ts"`, `"zig"`, `"c++"`, ...).
pub fn generate_for(program: &Program, target: &str) -> CodegenResult<String> {
    let target: CodegenTarget = target.parse()?;
    generate(program, &GenerateOptions::new(target))
}

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for debug output.
///
/// Safe to call multiple times. Does nothing unless `RUST_LOG` is set.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .init();
        }
    });
}
