//! Token model.
//!
//! Tokens are produced by an external lexer and consumed strictly left to
//! right by the reducer. Each token carries its byte span and the 1-based
//! source line used in diagnostics.

use std::fmt;

use crate::{Name, ParsedType, Span, StringInterner};

/// A token with its location in the source.
#[derive(Clone, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
    /// 1-based source line.
    pub line: u32,
}

impl Token {
    #[inline]
    pub fn new(kind: TokenKind, span: Span, line: u32) -> Self {
        Token { kind, span, line }
    }

    /// Create a token without location, for tests and synthesized input.
    pub fn dummy(kind: TokenKind) -> Self {
        Token {
            kind,
            span: Span::DUMMY,
            line: 1,
        }
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} @ {} (line {})", self.kind, self.span, self.line)
    }
}

/// Token kinds.
///
/// Float literals store bits as u64 for Hash compatibility.
/// String literals and identifiers use interned `Name`s.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TokenKind {
    /// Integer literal: `42`
    Int(i64),
    /// Floating literal: `3.5` (stored as bits)
    Double(u64),
    /// String literal (interned): `"hello"`
    Str(Name),
    True,
    False,

    /// Identifier with optional generic type arguments: `x`, `Get<int>`
    Ident(Name, Vec<ParsedType>),
    /// Type reference recognised by the lexer: `int`, `List<double>`, `Math`
    Type(ParsedType),

    /// `new`
    New,

    Plus,       // +
    Minus,      // -
    Star,       // *
    StarStar,   // **
    Slash,      // /
    Percent,    // %
    Shl,        // <<
    Shr,        // >>
    Lt,         // <
    Gt,         // >
    LtEq,       // <=
    GtEq,       // >=
    EqEq,       // ==
    NotEq,      // !=
    Amp,        // &
    Pipe,       // |
    Caret,      // ^
    AmpAmp,     // &&
    PipePipe,   // ||
    Bang,       // !
    Tilde,      // ~
    PlusPlus,   // ++
    MinusMinus, // --

    Eq,        // =
    PlusEq,    // +=
    MinusEq,   // -=
    StarEq,    // *=
    SlashEq,   // /=
    PercentEq, // %=
    AmpEq,     // &=
    PipeEq,    // |=
    CaretEq,   // ^=
    ShlEq,     // <<=
    ShrEq,     // >>=

    Question, // ?
    Dot,      // .

    LParen,    // (
    RParen,    // )
    LBracket,  // [
    RBracket,  // ]
    LBrace,    // {
    RBrace,    // }
    Comma,     // ,
    Semicolon, // ;
    Colon,     // :

    Eof,
}

impl TokenKind {
    /// Create a double literal token.
    pub fn double(value: f64) -> Self {
        TokenKind::Double(value.to_bits())
    }

    /// Identifier without generic arguments.
    pub fn ident(name: Name) -> Self {
        TokenKind::Ident(name, Vec::new())
    }

    /// Tokens that end an expression without being consumed by it.
    pub fn is_terminator(&self) -> bool {
        matches!(
            self,
            TokenKind::Semicolon
                | TokenKind::Comma
                | TokenKind::RParen
                | TokenKind::RBracket
                | TokenKind::RBrace
                | TokenKind::Colon
                | TokenKind::Eof
        )
    }

    /// Literal tokens: numbers, strings, `true`, `false`.
    pub fn is_literal(&self) -> bool {
        matches!(
            self,
            TokenKind::Int(_)
                | TokenKind::Double(_)
                | TokenKind::Str(_)
                | TokenKind::True
                | TokenKind::False
        )
    }

    /// Fixed source text of punctuation and keyword tokens.
    pub fn as_symbol(&self) -> Option<&'static str> {
        let symbol = match self {
            TokenKind::True => "true",
            TokenKind::False => "false",
            TokenKind::New => "new",
            TokenKind::Plus => "+",
            TokenKind::Minus => "-",
            TokenKind::Star => "*",
            TokenKind::StarStar => "**",
            TokenKind::Slash => "/",
            TokenKind::Percent => "%",
            TokenKind::Shl => "<<",
            TokenKind::Shr => ">>",
            TokenKind::Lt => "<",
            TokenKind::Gt => ">",
            TokenKind::LtEq => "<=",
            TokenKind::GtEq => ">=",
            TokenKind::EqEq => "==",
            TokenKind::NotEq => "!=",
            TokenKind::Amp => "&",
            TokenKind::Pipe => "|",
            TokenKind::Caret => "^",
            TokenKind::AmpAmp => "&&",
            TokenKind::PipePipe => "||",
            TokenKind::Bang => "!",
            TokenKind::Tilde => "~",
            TokenKind::PlusPlus => "++",
            TokenKind::MinusMinus => "--",
            TokenKind::Eq => "=",
            TokenKind::PlusEq => "+=",
            TokenKind::MinusEq => "-=",
            TokenKind::StarEq => "*=",
            TokenKind::SlashEq => "/=",
            TokenKind::PercentEq => "%=",
            TokenKind::AmpEq => "&=",
            TokenKind::PipeEq => "|=",
            TokenKind::CaretEq => "^=",
            TokenKind::ShlEq => "<<=",
            TokenKind::ShrEq => ">>=",
            TokenKind::Question => "?",
            TokenKind::Dot => ".",
            TokenKind::LParen => "(",
            TokenKind::RParen => ")",
            TokenKind::LBracket => "[",
            TokenKind::RBracket => "]",
            TokenKind::LBrace => "{",
            TokenKind::RBrace => "}",
            TokenKind::Comma => ",",
            TokenKind::Semicolon => ";",
            TokenKind::Colon => ":",
            TokenKind::Int(_)
            | TokenKind::Double(_)
            | TokenKind::Str(_)
            | TokenKind::Ident(..)
            | TokenKind::Type(_)
            | TokenKind::Eof => return None,
        };
        Some(symbol)
    }

    /// Render the token for diagnostics.
    pub fn display(&self, interner: &StringInterner) -> String {
        if let Some(symbol) = self.as_symbol() {
            return symbol.to_owned();
        }
        match self {
            TokenKind::Int(v) => v.to_string(),
            TokenKind::Double(bits) => f64::from_bits(*bits).to_string(),
            TokenKind::Str(name) => format!("\"{}\"", interner.lookup(*name)),
            TokenKind::Ident(name, _) => interner.lookup(*name).to_owned(),
            TokenKind::Type(ty) => ty.display(interner),
            _ => "end of input".to_owned(),
        }
    }
}

/// Owned token sequence. The last token is always [`TokenKind::Eof`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TokenList {
    tokens: Vec<Token>,
}

impl TokenList {
    /// Wrap lexer output, appending an `Eof` token if it is missing.
    pub fn new(mut tokens: Vec<Token>) -> Self {
        if !matches!(tokens.last(), Some(t) if t.kind == TokenKind::Eof) {
            let (end, line) = tokens
                .last()
                .map_or((0, 1), |t| (t.span.end, t.line));
            tokens.push(Token::new(TokenKind::Eof, Span::new(end, end), line));
        }
        TokenList { tokens }
    }

    /// Build a list from bare kinds with dummy locations.
    pub fn from_kinds(kinds: impl IntoIterator<Item = TokenKind>) -> Self {
        Self::new(kinds.into_iter().map(Token::dummy).collect())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&Token> {
        self.tokens.get(index)
    }

    /// The trailing `Eof` token.
    pub fn eof(&self) -> &Token {
        // `new` guarantees at least the Eof token.
        &self.tokens[self.tokens.len() - 1]
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Token> {
        self.tokens.iter()
    }

    pub fn as_slice(&self) -> &[Token] {
        &self.tokens
    }
}

impl std::ops::Index<usize> for TokenList {
    type Output = Token;

    fn index(&self, index: usize) -> &Token {
        &self.tokens[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_list_always_ends_with_eof() {
        let list = TokenList::from_kinds([TokenKind::Int(1), TokenKind::Plus, TokenKind::Int(2)]);
        assert_eq!(list.len(), 4);
        assert_eq!(list.eof().kind, TokenKind::Eof);

        let empty = TokenList::new(Vec::new());
        assert_eq!(empty.len(), 1);

        let explicit = TokenList::from_kinds([TokenKind::Int(1), TokenKind::Eof]);
        assert_eq!(explicit.len(), 2);
    }

    #[test]
    fn eof_inherits_last_location() {
        let list = TokenList::new(vec![Token::new(TokenKind::Int(7), Span::new(3, 4), 2)]);
        assert_eq!(list.eof().span, Span::new(4, 4));
        assert_eq!(list.eof().line, 2);
    }

    #[test]
    fn terminators_match_reducer_contract() {
        for kind in [
            TokenKind::Semicolon,
            TokenKind::Comma,
            TokenKind::RParen,
            TokenKind::RBracket,
            TokenKind::RBrace,
            TokenKind::Colon,
            TokenKind::Eof,
        ] {
            assert!(kind.is_terminator(), "{kind:?}");
        }
        assert!(!TokenKind::Question.is_terminator());
        assert!(!TokenKind::LParen.is_terminator());
    }

    #[test]
    fn display_uses_source_text() {
        let interner = StringInterner::new();
        let name = interner.intern("gain");
        assert_eq!(TokenKind::ident(name).display(&interner), "gain");
        assert_eq!(TokenKind::ShlEq.display(&interner), "<<=");
        assert_eq!(TokenKind::double(2.5).display(&interner), "2.5");
        assert_eq!(TokenKind::Eof.display(&interner), "end of input");
    }
}
