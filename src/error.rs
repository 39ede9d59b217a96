//! Crate-level error for running the whole front end over a source text.

use crate::lexer::LexError;
use crate::parser::ParseError;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdlError {
    #[error("lex error: {0}")]
    Lex(#[from] LexError),
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),
}

impl IdlError {
    /// Byte offset into the source the error points at.
    pub fn offset(&self) -> usize {
        match self {
            IdlError::Lex(e) => e.offset(),
            IdlError::Parse(e) => e.offset,
        }
    }

    /// 1-based line and column of [`IdlError::offset`] in `source`.
    pub fn line_col(&self, source: &str) -> (usize, usize) {
        line_col(source, self.offset())
    }
}

/// 1-based line and column (in characters) of a byte offset. Offsets past the end
/// are clamped to the end of the source.
pub fn line_col(source: &str, offset: usize) -> (usize, usize) {
    let mut offset = offset.min(source.len());
    while !source.is_char_boundary(offset) {
        offset -= 1;
    }
    let before = &source[..offset];
    let line = before.matches('\n').count() + 1;
    let line_start = before.rfind('\n').map_or(0, |i| i + 1);
    let column = before[line_start..].chars().count() + 1;
    (line, column)
}
