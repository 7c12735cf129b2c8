//! The closed set of output languages.

use std::fmt;
use std::str::FromStr;

use crate::CodegenError;

/// A supported output language.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub enum CodegenTarget {
    /// Dynamic, garbage collected, event loop. The most permissive target.
    #[default]
    TypeScript,
    /// Reference-counted scripting with significant indentation.
    Python,
    /// Manual memory, error unions, explicit allocators.
    Zig,
    /// Ownership, `Result` error unions, native async.
    Rust,
    /// C++23 with exceptions, RAII, futures and `std::generator`.
    Cpp,
    /// Canonical Faber source.
    Faber,
}

/// How a target terminates simple statements.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Terminator {
    /// Semicolons are stylistic and follow `GenerateOptions::semicolons`.
    Optional,
    /// Semicolons are part of the grammar.
    Required,
    /// The language has no statement terminator.
    None,
}

/// Comment tokens for a target.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct CommentSyntax {
    pub line: &'static str,
    /// Block start and end, for languages that have block comments.
    pub block: Option<(&'static str, &'static str)>,
}

impl CodegenTarget {
    /// Every target, in declaration order.
    pub const ALL: [CodegenTarget; 6] = [
        CodegenTarget::TypeScript,
        CodegenTarget::Python,
        CodegenTarget::Zig,
        CodegenTarget::Rust,
        CodegenTarget::Cpp,
        CodegenTarget::Faber,
    ];

    /// Canonical lower-case name.
    pub const fn name(self) -> &'static str {
        match self {
            CodegenTarget::TypeScript => "ts",
            CodegenTarget::Python => "py",
            CodegenTarget::Zig => "zig",
            CodegenTarget::Rust => "rs",
            CodegenTarget::Cpp => "cpp",
            CodegenTarget::Faber => "fab",
        }
    }

    /// File extension for generated sources, without the dot.
    pub const fn extension(self) -> &'static str {
        self.name()
    }

    pub const fn comment_syntax(self) -> CommentSyntax {
        match self {
            CodegenTarget::Python | CodegenTarget::Faber => CommentSyntax {
                line: "#",
                block: None,
            },
            CodegenTarget::Zig => CommentSyntax {
                line: "//",
                block: None,
            },
            CodegenTarget::TypeScript | CodegenTarget::Rust | CodegenTarget::Cpp => {
                CommentSyntax {
                    line: "//",
                    block: Some(("/*", "*/")),
                }
            }
        }
    }

    pub const fn terminator(self) -> Terminator {
        match self {
            CodegenTarget::TypeScript => Terminator::Optional,
            CodegenTarget::Zig | CodegenTarget::Rust | CodegenTarget::Cpp => Terminator::Required,
            CodegenTarget::Python | CodegenTarget::Faber => Terminator::None,
        }
    }

    /// Indentation unit used when the options do not override it.
    pub const fn default_indent(self) -> &'static str {
        match self {
            CodegenTarget::TypeScript => "  ",
            _ => "    ",
        }
    }
}

impl fmt::Display for CodegenTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CodegenTarget::TypeScript => "TypeScript",
            CodegenTarget::Python => "Python",
            CodegenTarget::Zig => "Zig",
            CodegenTarget::Rust => "Rust",
            CodegenTarget::Cpp => "C++",
            CodegenTarget::Faber => "Faber",
        };
        f.write_str(name)
    }
}

impl FromStr for CodegenTarget {
    type Err = CodegenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ts" | "typescript" => Ok(CodegenTarget::TypeScript),
            "py" | "python" => Ok(CodegenTarget::Python),
            "zig" => Ok(CodegenTarget::Zig),
            "rs" | "rust" => Ok(CodegenTarget::Rust),
            "cpp" | "c++" | "cxx" => Ok(CodegenTarget::Cpp),
            "fab" | "faber" => Ok(CodegenTarget::Faber),
            _ => Err(CodegenError::UnsupportedTarget { name: s.to_string() }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_aliases() {
        assert_eq!("ts".parse::<CodegenTarget>(), Ok(CodegenTarget::TypeScript));
        assert_eq!("Python".parse::<CodegenTarget>(), Ok(CodegenTarget::Python));
        assert_eq!("c++".parse::<CodegenTarget>(), Ok(CodegenTarget::Cpp));
        assert_eq!("rust".parse::<CodegenTarget>(), Ok(CodegenTarget::Rust));
        assert_eq!("fab".parse::<CodegenTarget>(), Ok(CodegenTarget::Faber));
    }

    #[test]
    fn test_parse_unknown() {
        let Err(CodegenError::UnsupportedTarget { name }) = "cobol".parse::<CodegenTarget>() else {
            panic!("cobol should not parse");
        };
        assert_eq!(name, "cobol");
    }

    #[test]
    fn test_names_round_trip() {
        for target in CodegenTarget::ALL {
            assert_eq!(target.name().parse::<CodegenTarget>(), Ok(target));
        }
    }

    #[test]
    fn test_line_only_targets() {
        assert!(CodegenTarget::Python.comment_syntax().block.is_none());
        assert!(CodegenTarget::Faber.comment_syntax().block.is_none());
        assert!(CodegenTarget::Cpp.comment_syntax().block.is_some());
    }

    #[test]
    fn test_default_is_typescript() {
        assert_eq!(CodegenTarget::default(), CodegenTarget::TypeScript);
    }
}
