//! Code generation errors.
//!
//! Every error aborts the current `generate()` call; no partial output is
//! ever returned.

use thiserror::Error;

use crate::CodegenTarget;

/// Code generation failure.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodegenError {
    /// A node appeared where the generator has no rule for its kind.
    #[error("unknown node kind `{kind}` in {context}")]
    UnknownNodeKind { kind: &'static str, context: String },
    /// The node is understood but this target cannot express it.
    #[error("`{construct}` is not supported on target {target}")]
    UnsupportedConstruct {
        construct: String,
        target: CodegenTarget,
    },
    /// The requested target is not one of the known targets.
    #[error("unsupported target `{name}`")]
    UnsupportedTarget { name: String },
}

impl CodegenError {
    pub(crate) fn unsupported(construct: impl Into<String>, target: CodegenTarget) -> Self {
        CodegenError::UnsupportedConstruct {
            construct: construct.into(),
            target,
        }
    }

    pub(crate) fn unknown(kind: &'static str, context: impl Into<String>) -> Self {
        CodegenError::UnknownNodeKind {
            kind,
            context: context.into(),
        }
    }
}

pub type CodegenResult<T> = Result<T, CodegenError>;
