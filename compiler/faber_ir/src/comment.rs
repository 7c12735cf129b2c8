//! Source comments carried through to generated code.
//!
//! The parser attaches comments to the nearest statement, either before it
//! (leading) or on the same line after it (trailing). Comments that appear
//! inside an expression are hoisted onto the enclosing statement.

use crate::Span;

/// A source comment with its span and text.
///
/// `text` excludes the comment delimiters. Block comments keep their
/// interior newlines so targets without block syntax can reflow them.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Comment {
    pub kind: CommentKind,
    pub text: String,
    pub span: Span,
}

impl Comment {
    /// Create a new comment.
    #[inline]
    pub fn new(kind: CommentKind, text: impl Into<String>, span: Span) -> Self {
        Comment {
            kind,
            text: text.into(),
            span,
        }
    }

    /// Create a line comment with no source location.
    pub fn line(text: impl Into<String>) -> Self {
        Comment::new(CommentKind::Line, text, Span::DUMMY)
    }

    /// Create a block comment with no source location.
    pub fn block(text: impl Into<String>) -> Self {
        Comment::new(CommentKind::Block, text, Span::DUMMY)
    }

    /// Create a doc comment with no source location.
    pub fn doc(text: impl Into<String>) -> Self {
        Comment::new(CommentKind::Doc, text, Span::DUMMY)
    }

    /// Lines of the comment body, trimmed of surrounding whitespace.
    ///
    /// Block comments written in the `* continued` style lose their
    /// leading asterisk.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.text.lines().map(|line| {
            let line = line.trim();
            line.strip_prefix("* ")
                .or_else(|| line.strip_prefix('*'))
                .unwrap_or(line)
        })
    }
}

/// The syntactic form of a comment.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CommentKind {
    /// `# text`
    Line,
    /// `/* text */`, possibly spanning lines.
    Block,
    /// `/** text */` documentation attached to a declaration.
    Doc,
}

/// Comments attached to a statement.
#[derive(Clone, Debug, Default, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Comments {
    pub leading: Vec<Comment>,
    pub trailing: Vec<Comment>,
}

impl Comments {
    /// No attached comments.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.leading.is_empty() && self.trailing.is_empty()
    }
}
