//! Parse error type.
//!
//! A failed reduction yields exactly one [`ParseError`]: the first
//! diagnostic encountered. No partial tree is returned alongside it.

use std::fmt;

use rill_diagnostic::{Diagnostic, ErrorCode};
use rill_ir::Span;

#[cfg(test)]
mod tests;

/// A parse diagnostic together with the source line of the offending token.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseError {
    pub diagnostic: Diagnostic,
    /// 1-based source line.
    pub line: u32,
}

impl ParseError {
    /// Attach the line of the offending token. The line is also recorded as
    /// a note so rendered diagnostics carry it.
    pub fn new(diagnostic: Diagnostic, line: u32) -> Self {
        ParseError {
            diagnostic: diagnostic.with_note(format!("on line {line}")),
            line,
        }
    }

    #[inline]
    pub fn code(&self) -> ErrorCode {
        self.diagnostic.code
    }

    #[inline]
    pub fn message(&self) -> &str {
        &self.diagnostic.message
    }

    pub fn span(&self) -> Span {
        self.diagnostic.primary_span().unwrap_or(Span::DUMMY)
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.diagnostic)
    }
}

impl std::error::Error for ParseError {}
