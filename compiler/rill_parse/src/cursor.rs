//! Token cursor for navigating the token stream.
//!
//! The reducer only ever moves forward. Lookahead is bounded (a cast is
//! recognised from three tokens) and never reads past the trailing `Eof`.

use rill_diagnostic::{unclosed_delimiter, unexpected_token};
use rill_ir::{Span, StringInterner, Token, TokenKind, TokenList};

use crate::ParseError;

#[cfg(test)]
mod tests;

/// Cursor over a [`TokenList`].
pub struct Cursor<'a> {
    tokens: &'a TokenList,
    pos: usize,
}

impl<'a> Cursor<'a> {
    /// Create a new cursor at the start of the token stream.
    pub fn new(tokens: &'a TokenList) -> Self {
        Cursor { tokens, pos: 0 }
    }

    /// Current position in the token stream.
    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Get the current token.
    ///
    /// Invariant: the position never passes the trailing `Eof`.
    #[inline]
    pub fn current(&self) -> &'a Token {
        self.tokens.get(self.pos).unwrap_or_else(|| self.tokens.eof())
    }

    #[inline]
    pub fn current_kind(&self) -> &'a TokenKind {
        &self.current().kind
    }

    #[inline]
    pub fn current_span(&self) -> Span {
        self.current().span
    }

    #[inline]
    pub fn current_line(&self) -> u32 {
        self.current().line
    }

    /// Kind of the token `n` positions ahead; `Eof` past the end.
    #[inline]
    pub fn peek_kind_at(&self, n: usize) -> &'a TokenKind {
        self.tokens
            .get(self.pos + n)
            .map_or(&self.tokens.eof().kind, |t| &t.kind)
    }

    #[inline]
    pub fn is_at_end(&self) -> bool {
        matches!(self.current_kind(), TokenKind::Eof)
    }

    /// Whether the current token is a terminator the reducer must not consume.
    #[inline]
    pub fn at_terminator(&self) -> bool {
        self.current_kind().is_terminator()
    }

    /// Check the current token against a payload-free kind.
    #[inline]
    pub fn check(&self, kind: &TokenKind) -> bool {
        std::mem::discriminant(self.current_kind()) == std::mem::discriminant(kind)
    }

    /// Consume the current token and return it. Stays on `Eof`.
    pub fn advance(&mut self) -> &'a Token {
        let token = self.current();
        if !self.is_at_end() {
            self.pos += 1;
        }
        token
    }

    /// Consume the current token if it matches.
    pub fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Consume the current token or fail with an "unexpected token" error.
    pub fn expect(
        &mut self,
        kind: &TokenKind,
        interner: &StringInterner,
    ) -> Result<&'a Token, ParseError> {
        if self.check(kind) {
            return Ok(self.advance());
        }
        let expected = kind.as_symbol().map_or_else(
            || kind.display(interner),
            |s| format!("`{s}`"),
        );
        Err(self.unexpected(&expected, interner))
    }

    /// Consume the closing delimiter matching `open`, or report it unclosed.
    pub fn expect_close(
        &mut self,
        open: &Token,
        close: &TokenKind,
        delimiter: char,
    ) -> Result<&'a Token, ParseError> {
        if self.check(close) {
            return Ok(self.advance());
        }
        Err(ParseError::new(
            unclosed_delimiter(open.span, self.current_span(), delimiter),
            self.current_line(),
        ))
    }

    /// An "unexpected token" error at the current token.
    pub fn unexpected(&self, expected: &str, interner: &StringInterner) -> ParseError {
        let token = self.current();
        ParseError::new(
            unexpected_token(token.span, expected, &token.kind.display(interner)),
            token.line,
        )
    }
}
