//! Generation options.

use crate::{CodegenTarget, Terminator};

/// Options for one `generate()` call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerateOptions {
    /// Output language. Defaults to TypeScript.
    pub target: CodegenTarget,
    /// Indentation unit. `None` uses the target's default.
    pub indent: Option<String>,
    /// Whether to terminate statements with `;` where the target leaves it
    /// optional. Ignored by targets where the terminator is mandatory or absent.
    pub semicolons: Option<bool>,
    /// Reject collection method calls whose receiver has no resolved type
    /// instead of assuming an ordered list.
    pub strict_receiver_types: bool,
}

impl GenerateOptions {
    /// Options selecting `target` with every other setting at its default.
    pub fn new(target: CodegenTarget) -> Self {
        GenerateOptions {
            target,
            ..GenerateOptions::default()
        }
    }

    #[must_use]
    pub fn with_indent(mut self, indent: impl Into<String>) -> Self {
        self.indent = Some(indent.into());
        self
    }

    #[must_use]
    pub fn with_semicolons(mut self, semicolons: bool) -> Self {
        self.semicolons = Some(semicolons);
        self
    }

    #[must_use]
    pub fn with_strict_receiver_types(mut self, strict: bool) -> Self {
        self.strict_receiver_types = strict;
        self
    }

    /// The indentation unit in effect.
    pub fn indent_unit(&self) -> &str {
        self.indent
            .as_deref()
            .unwrap_or_else(|| self.target.default_indent())
    }

    /// Whether simple statements end in `;`.
    pub fn emits_semicolons(&self) -> bool {
        match self.target.terminator() {
            Terminator::Required => true,
            Terminator::None => false,
            Terminator::Optional => self.semicolons.unwrap_or(true),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_semicolon_policy() {
        assert!(GenerateOptions::new(CodegenTarget::TypeScript).emits_semicolons());
        assert!(!GenerateOptions::new(CodegenTarget::TypeScript)
            .with_semicolons(false)
            .emits_semicolons());
        assert!(GenerateOptions::new(CodegenTarget::Zig)
            .with_semicolons(false)
            .emits_semicolons());
        assert!(!GenerateOptions::new(CodegenTarget::Python)
            .with_semicolons(true)
            .emits_semicolons());
    }

    #[test]
    fn test_indent_unit() {
        assert_eq!(GenerateOptions::new(CodegenTarget::TypeScript).indent_unit(), "  ");
        assert_eq!(GenerateOptions::new(CodegenTarget::Python).indent_unit(), "    ");
        assert_eq!(
            GenerateOptions::new(CodegenTarget::Rust)
                .with_indent("\t")
                .indent_unit(),
            "\t"
        );
    }
}
