//! Comment re-emission.
//!
//! Source comments are rendered with the active target's comment syntax.
//! Targets without block comments get multi-line block comments reflowed
//! into consecutive line comments.

use faber_ir::{Comment, CommentKind};

use crate::CodegenTarget;

/// Render leading comments as whole lines, each prefixed with `indent`.
pub(crate) fn render_leading(comments: &[Comment], target: CodegenTarget, indent: &str) -> Vec<String> {
    let mut out = Vec::new();
    for comment in comments {
        render_one(comment, target, indent, &mut out);
    }
    out
}

/// Render trailing comments as a suffix for the first line of the statement,
/// which for a block statement is its header.
pub(crate) fn render_trailing(comments: &[Comment], target: CodegenTarget) -> String {
    let syntax = target.comment_syntax();
    let mut out = String::new();
    for comment in comments {
        let text = comment.lines().filter(|l| !l.is_empty()).collect::<Vec<_>>().join(" ");
        match (comment.kind, syntax.block) {
            (CommentKind::Block, Some((open, close))) => {
                out.push_str(&format!("  {open} {text} {close}"));
            }
            _ => out.push_str(&format!("  {} {text}", syntax.line)),
        }
    }
    out
}

fn render_one(comment: &Comment, target: CodegenTarget, indent: &str, out: &mut Vec<String>) {
    let syntax = target.comment_syntax();
    let lines: Vec<&str> = comment.lines().collect();

    match comment.kind {
        CommentKind::Line => {
            for line in &lines {
                out.push(line_comment(indent, syntax.line, line));
            }
        }
        CommentKind::Doc => {
            let marker = match target {
                CodegenTarget::Rust | CodegenTarget::Zig => "///",
                _ => syntax.line,
            };
            match (target, syntax.block) {
                (CodegenTarget::TypeScript | CodegenTarget::Cpp, Some(_)) => {
                    star_block(indent, "/**", &lines, out);
                }
                _ => {
                    for line in &lines {
                        out.push(line_comment(indent, marker, line));
                    }
                }
            }
        }
        CommentKind::Block => match syntax.block {
            Some((open, close)) if lines.len() <= 1 => {
                let text = lines.first().copied().unwrap_or("");
                out.push(format!("{indent}{open} {text} {close}"));
            }
            Some((open, _)) => star_block(indent, open, &lines, out),
            None => {
                for line in &lines {
                    out.push(line_comment(indent, syntax.line, line));
                }
            }
        },
    }
}

fn line_comment(indent: &str, token: &str, text: &str) -> String {
    if text.is_empty() {
        format!("{indent}{token}")
    } else {
        format!("{indent}{token} {text}")
    }
}

fn star_block(indent: &str, open: &str, lines: &[&str], out: &mut Vec<String>) {
    out.push(format!("{indent}{open}"));
    for line in lines {
        out.push(line_comment(indent, " *", line));
    }
    out.push(format!("{indent} */"));
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_line_comment_per_target() {
        let c = [Comment::line("hello")];
        assert_eq!(render_leading(&c, CodegenTarget::TypeScript, ""), vec!["// hello"]);
        assert_eq!(render_leading(&c, CodegenTarget::Python, "    "), vec!["    # hello"]);
        assert_eq!(render_leading(&c, CodegenTarget::Faber, ""), vec!["# hello"]);
    }

    #[test]
    fn test_block_comment_reflows_on_line_only_targets() {
        let c = [Comment::block("first\n * second")];
        assert_eq!(
            render_leading(&c, CodegenTarget::Python, ""),
            vec!["# first", "# second"]
        );
        assert_eq!(
            render_leading(&c, CodegenTarget::Zig, ""),
            vec!["// first", "// second"]
        );
    }

    #[test]
    fn test_block_comment_kept_where_supported() {
        let single = [Comment::block("note")];
        assert_eq!(render_leading(&single, CodegenTarget::Cpp, ""), vec!["/* note */"]);

        let multi = [Comment::block("a\nb")];
        assert_eq!(
            render_leading(&multi, CodegenTarget::Rust, "  "),
            vec!["  /*", "   * a", "   * b", "   */"]
        );
    }

    #[test]
    fn test_doc_comments() {
        let c = [Comment::doc("Adds numbers.")];
        assert_eq!(render_leading(&c, CodegenTarget::Rust, ""), vec!["/// Adds numbers."]);
        assert_eq!(render_leading(&c, CodegenTarget::Zig, ""), vec!["/// Adds numbers."]);
        assert_eq!(
            render_leading(&c, CodegenTarget::TypeScript, ""),
            vec!["/**", " * Adds numbers.", " */"]
        );
        assert_eq!(render_leading(&c, CodegenTarget::Python, ""), vec!["# Adds numbers."]);
    }

    #[test]
    fn test_trailing() {
        let c = [Comment::line("why")];
        assert_eq!(render_trailing(&c, CodegenTarget::Zig), "  // why");
        assert_eq!(render_trailing(&c, CodegenTarget::Python), "  # why");
        let b = [Comment::block("x\ny")];
        assert_eq!(render_trailing(&b, CodegenTarget::TypeScript), "  /* x y */");
        assert_eq!(render_trailing(&b, CodegenTarget::Faber), "  # x y");
    }
}
