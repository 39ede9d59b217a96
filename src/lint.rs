//! Linter for IDL source: enforces layout style on the token stream.
//!
//! ## Rules
//!
//! - **Indentation**: Use exactly one tab per depth level (no spaces). Depth increases after `{`, decreases at `}`.
//! - **One param per line**: At most one `;` per line.
//! - **Closing brace alone**: A line containing `}` must not also end a param (`;`).
//! - **No trailing whitespace**: Lines must not end with spaces, tabs or carriage returns.
//!
//! Source that does not tokenize is not linted; the lexer error is returned instead.
//! Run the linter via the `lint_idl` binary: `lint_idl file.idl` or `lint_idl < file.idl`.
//! Exit code 1 if any error-level findings.

use crate::lexer::LexError;
use crate::token::{Token, TokenKind};

/// Severity of a lint finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

/// Identifies which rule produced the message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LintRule {
    /// Indentation must use tabs only (no spaces).
    IndentationTabsOnly,
    /// Indentation must be exactly N tabs at depth N.
    IndentationDepth,
    /// At most one `;` terminator per line.
    OneParamPerLine,
    /// Closing `}` should not share its line with a param.
    ClosingBraceAlone,
    /// Trailing whitespace is not allowed.
    NoTrailingWhitespace,
}

impl LintRule {
    /// Stable kebab-case id used in compact output.
    pub fn id(self) -> &'static str {
        match self {
            LintRule::IndentationTabsOnly => "indentation-tabs-only",
            LintRule::IndentationDepth => "indentation-depth",
            LintRule::OneParamPerLine => "one-param-per-line",
            LintRule::ClosingBraceAlone => "closing-brace-alone",
            LintRule::NoTrailingWhitespace => "no-trailing-whitespace",
        }
    }
}

/// A single lint message with location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LintMessage {
    pub line: usize,
    pub column: usize,
    pub rule: LintRule,
    pub severity: Severity,
    pub message: String,
}

/// Run all lint rules on IDL source. Returns messages in line order.
pub fn lint(source: &str) -> Result<Vec<LintMessage>, LexError> {
    let tokens = crate::tokenize(source)?;
    let mut out = Vec::new();
    let mut depth: usize = 0;

    let lines = tokens
        .split_inclusive(|t| t.kind == TokenKind::Newline)
        .map(|line| {
            let line = match line.split_last() {
                Some((last, rest)) if last.kind == TokenKind::Newline => match rest.split_last() {
                    // CRLF line ending
                    Some((cr, body)) if cr.text == "\r" => body,
                    _ => rest,
                },
                _ => line,
            };
            line.iter()
                .take_while(|t| t.kind != TokenKind::Eof)
                .cloned()
                .collect::<Vec<_>>()
        });
    for (i, line) in lines.enumerate() {
        let line_no = i + 1;
        let Some(first) = line.first() else {
            continue;
        };
        let line_start = first.span.start;
        let column = |t: &Token<'_>| t.span.start - line_start + 1;

        let indent_len = line.iter().take_while(|t| t.kind == TokenKind::Whitespace).count();
        let (indent, content) = line.split_at(indent_len);

        // Trailing whitespace
        if !content.is_empty() {
            let trailing = content
                .iter()
                .rev()
                .take_while(|t| t.kind == TokenKind::Whitespace)
                .count();
            if trailing > 0 {
                out.push(LintMessage {
                    line: line_no,
                    column: column(&content[content.len() - trailing]),
                    rule: LintRule::NoTrailingWhitespace,
                    severity: Severity::Warning,
                    message: "trailing whitespace not allowed".to_string(),
                });
            }
        } else if !indent.is_empty() {
            out.push(LintMessage {
                line: line_no,
                column: 1,
                rule: LintRule::NoTrailingWhitespace,
                severity: Severity::Warning,
                message: "whitespace-only line".to_string(),
            });
        }

        if content.is_empty() {
            continue;
        }

        // Tabs only for indentation
        if indent.iter().any(|t| t.text != "\t") {
            out.push(LintMessage {
                line: line_no,
                column: 1,
                rule: LintRule::IndentationTabsOnly,
                severity: Severity::Error,
                message: "indentation must use tabs only (no spaces)".to_string(),
            });
        }

        // A line opening with `}` sits at the depth it closes back to
        let expected = if content[0].kind == TokenKind::RBrace {
            depth.saturating_sub(1)
        } else {
            depth
        };
        let tab_count = indent.iter().filter(|t| t.text == "\t").count();
        if tab_count != expected {
            out.push(LintMessage {
                line: line_no,
                column: 1,
                rule: LintRule::IndentationDepth,
                severity: Severity::Error,
                message: format!(
                    "expected {} tab(s) at depth {} (found {})",
                    expected, depth, tab_count
                ),
            });
        }

        let semicolons: Vec<&Token<'_>> = content
            .iter()
            .filter(|t| t.kind == TokenKind::Semicolon)
            .collect();
        if semicolons.len() > 1 {
            out.push(LintMessage {
                line: line_no,
                column: column(semicolons[1]),
                rule: LintRule::OneParamPerLine,
                severity: Severity::Error,
                message: format!("one param per line (found {} semicolons)", semicolons.len()),
            });
        }

        if let Some(rbrace) = content.iter().find(|t| t.kind == TokenKind::RBrace) {
            if !semicolons.is_empty() {
                out.push(LintMessage {
                    line: line_no,
                    column: column(rbrace),
                    rule: LintRule::ClosingBraceAlone,
                    severity: Severity::Warning,
                    message: "closing `}` should not share its line with a param".to_string(),
                });
            }
        }

        for t in content {
            match t.kind {
                TokenKind::LBrace => depth += 1,
                TokenKind::RBrace => depth = depth.saturating_sub(1),
                _ => {}
            }
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rules(source: &str) -> Vec<(usize, LintRule)> {
        lint(source)
            .expect("lex")
            .into_iter()
            .map(|m| (m.line, m.rule))
            .collect()
    }

    #[test]
    fn clean_source_has_no_findings() {
        let src = "MESSAGE /a {\n\tGET REQUEST {\n\t\tINT32 x = x;\n\t}\n}\n\nSTRUCT S {\n}\n";
        assert_eq!(lint(src).expect("lex"), vec![]);
    }

    #[test]
    fn trailing_whitespace_column() {
        let msgs = lint("STRUCT S { } \t\n").expect("lex");
        assert_eq!(msgs.len(), 1);
        assert_eq!(msgs[0].rule, LintRule::NoTrailingWhitespace);
        assert_eq!(msgs[0].severity, Severity::Warning);
        assert_eq!(msgs[0].column, 13);
    }

    #[test]
    fn crlf_line_endings_are_not_trailing_whitespace() {
        let src = "MESSAGE /a {\r\n\tGET REQUEST {\r\n\t\tINT32 x = x;\r\n\t}\r\n}\r\n";
        assert_eq!(lint(src).expect("lex"), vec![]);

        let msgs = lint("STRUCT S { } \r\n").expect("lex");
        assert_eq!(msgs.len(), 1);
        assert_eq!(msgs[0].column, 13);
        assert_eq!(rules("STRUCT S { }\r"), vec![(1, LintRule::NoTrailingWhitespace)]);
    }

    #[test]
    fn whitespace_only_line() {
        assert_eq!(
            rules("STRUCT S {\n  \n}"),
            vec![(2, LintRule::NoTrailingWhitespace)]
        );
    }

    #[test]
    fn spaces_in_indentation() {
        assert_eq!(
            rules("STRUCT S {\n    INT32 a = b;\n}"),
            vec![
                (2, LintRule::IndentationTabsOnly),
                (2, LintRule::IndentationDepth)
            ]
        );
    }

    #[test]
    fn wrong_depth() {
        assert_eq!(
            rules("STRUCT S {\n\t\tINT32 a = b;\n\t}"),
            vec![(2, LintRule::IndentationDepth), (3, LintRule::IndentationDepth)]
        );
    }

    #[test]
    fn params_sharing_a_line() {
        let msgs = lint("STRUCT S {\n\tINT32 a = b; BOOL c = d;\n}").expect("lex");
        assert_eq!(msgs.len(), 1);
        assert_eq!(msgs[0].rule, LintRule::OneParamPerLine);
        assert_eq!(msgs[0].column, 25);
    }

    #[test]
    fn brace_after_param() {
        assert_eq!(
            rules("STRUCT S {\n\tINT32 a = b; }"),
            vec![(2, LintRule::ClosingBraceAlone)]
        );
    }

    #[test]
    fn lex_errors_are_returned() {
        let err = lint("STRUCT S { # }").unwrap_err();
        assert_eq!(err.offset(), 11);
    }

    #[test]
    fn lints_source_that_does_not_parse() {
        assert_eq!(rules("STRUCT {  \n"), vec![(1, LintRule::NoTrailingWhitespace)]);
    }
}
