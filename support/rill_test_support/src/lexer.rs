//! A small scanner producing Rill token streams from source text.
//!
//! The expression core never tokenizes; hosts bring their own lexer. Tests
//! use this one. It recognises registered type names, so `int`, `List<int>`
//! and `int[]` become single [`TokenKind::Type`] tokens, and attaches
//! explicit type arguments to generic calls such as `Repeat<int>(`.

use logos::Logos;
use rill_ir::{Name, ParsedType, Span, Token, TokenKind, TokenList};
use rill_types::TypeRegistry;


/// Raw token from logos (before interning and type recognition).
#[derive(Logos, Debug, Clone, Copy, PartialEq)]
#[logos(skip r"[ \t\r]+")]
enum RawToken {
    #[token("\n")]
    Newline,
    #[regex(r"//[^\n]*")]
    Comment,

    #[token("true")]
    True,
    #[token("false")]
    False,
    #[token("new")]
    New,
    #[regex(r"[A-Za-z_][A-Za-z0-9_]*")]
    Ident,

    #[regex(r"[0-9]+", |lex| lex.slice().parse::<i64>().ok())]
    Int(i64),
    #[regex(r"[0-9]+\.[0-9]+([eE][+-]?[0-9]+)?", |lex| lex.slice().parse::<f64>().ok())]
    Double(f64),
    #[regex(r#""([^"\\\n]|\\.)*""#)]
    Str,

    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("**")]
    StarStar,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("<<")]
    Shl,
    #[token(">>")]
    Shr,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,
    #[token("<=")]
    LtEq,
    #[token(">=")]
    GtEq,
    #[token("==")]
    EqEq,
    #[token("!=")]
    NotEq,
    #[token("&")]
    Amp,
    #[token("|")]
    Pipe,
    #[token("^")]
    Caret,
    #[token("&&")]
    AmpAmp,
    #[token("||")]
    PipePipe,
    #[token("!")]
    Bang,
    #[token("~")]
    Tilde,
    #[token("++")]
    PlusPlus,
    #[token("--")]
    MinusMinus,

    #[token("=")]
    Eq,
    #[token("+=")]
    PlusEq,
    #[token("-=")]
    MinusEq,
    #[token("*=")]
    StarEq,
    #[token("/=")]
    SlashEq,
    #[token("%=")]
    PercentEq,
    #[token("&=")]
    AmpEq,
    #[token("|=")]
    PipeEq,
    #[token("^=")]
    CaretEq,
    #[token("<<=")]
    ShlEq,
    #[token(">>=")]
    ShrEq,

    #[token("?")]
    Question,
    #[token(".")]
    Dot,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token(",")]
    Comma,
    #[token(";")]
    Semicolon,
    #[token(":")]
    Colon,
}

/// Input the scanner does not recognise.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unrecognised input `{text}` on line {line}")]
pub struct LexError {
    pub text: String,
    pub line: u32,
}

#[derive(Copy, Clone, Debug)]
struct Raw<'s> {
    tok: RawToken,
    span: Span,
    line: u32,
    text: &'s str,
}

/// Scan `source`, panicking on unrecognised input.
pub fn tokens(source: &str, registry: &TypeRegistry) -> TokenList {
    try_tokens(source, registry).unwrap_or_else(|e| panic!("{e}"))
}

/// Scan `source` into a token list whose names live in the registry's
/// interner.
pub fn try_tokens(source: &str, registry: &TypeRegistry) -> Result<TokenList, LexError> {
    let mut raw = Vec::new();
    let mut line = 1;
    let mut lexer = RawToken::lexer(source);
    while let Some(result) = lexer.next() {
        let text = lexer.slice();
        let span = Span::try_from_range(lexer.span()).unwrap_or_default();
        match result {
            Ok(RawToken::Newline) => line += 1,
            Ok(RawToken::Comment) => {}
            Ok(tok) => raw.push(Raw {
                tok,
                span,
                line,
                text,
            }),
            Err(()) => {
                return Err(LexError {
                    text: text.to_owned(),
                    line,
                })
            }
        }
    }
    let mut scanner = Scanner {
        raw,
        pos: 0,
        registry,
        out: Vec::new(),
    };
    scanner.run();
    Ok(TokenList::new(scanner.out))
}

struct Scanner<'s, 'r> {
    raw: Vec<Raw<'s>>,
    pos: usize,
    registry: &'r TypeRegistry,
    out: Vec<Token>,
}

impl Scanner<'_, '_> {
    fn tok(&self, i: usize) -> Option<RawToken> {
        self.raw.get(i).map(|r| r.tok)
    }

    fn intern(&self, text: &str) -> Name {
        self.registry.interner().intern(text)
    }

    fn run(&mut self) {
        while let Some(raw) = self.raw.get(self.pos).copied() {
            if raw.tok == RawToken::Ident {
                self.ident(raw);
                continue;
            }
            let kind = self.convert(raw);
            self.out.push(Token::new(kind, raw.span, raw.line));
            self.pos += 1;
        }
    }

    fn ident(&mut self, raw: Raw<'_>) {
        if let Some((parsed, next)) = self.type_at(self.pos) {
            let end = self.raw[next - 1].span;
            self.out
                .push(Token::new(TokenKind::Type(parsed), raw.span.merge(end), raw.line));
            self.pos = next;
            return;
        }
        let name = self.intern(raw.text);
        // `Name<T, ..>(` is a generic call; anything else is a comparison.
        if self.tok(self.pos + 1) == Some(RawToken::Lt) {
            let saved = self.raw.clone();
            if let Some((args, next)) = self.type_args(self.pos + 1) {
                if self.tok(next) == Some(RawToken::LParen) {
                    let end = self.raw[next - 1].span;
                    self.out.push(Token::new(
                        TokenKind::Ident(name, args),
                        raw.span.merge(end),
                        raw.line,
                    ));
                    self.pos = next;
                    return;
                }
            }
            self.raw = saved;
        }
        self.out
            .push(Token::new(TokenKind::ident(name), raw.span, raw.line));
        self.pos += 1;
    }

    /// A type starting at `i`: a type name, its type arguments and any
    /// `[]` suffixes. Returns the type and the index after it.
    fn type_at(&mut self, i: usize) -> Option<(ParsedType, usize)> {
        let raw = self.raw.get(i).copied()?;
        if raw.tok != RawToken::Ident {
            return None;
        }
        let name = self.intern(raw.text);
        if !self.registry.is_type_name(name) {
            return None;
        }
        let mut next = i + 1;
        let mut parsed = ParsedType::named(name);
        if self.registry.generic_arity(name).is_some() && self.tok(next) == Some(RawToken::Lt) {
            let (args, after) = self.type_args(next)?;
            parsed = ParsedType::generic(name, args);
            next = after;
        }
        while self.tok(next) == Some(RawToken::LBracket)
            && self.tok(next + 1) == Some(RawToken::RBracket)
        {
            parsed = parsed.array_of();
            next += 2;
        }
        Some((parsed, next))
    }

    /// `<T, ..>` starting at the `<` at `i`. A closing `>>` is split so
    /// nested argument lists close correctly.
    fn type_args(&mut self, i: usize) -> Option<(Vec<ParsedType>, usize)> {
        let mut args = Vec::new();
        let mut next = i + 1;
        loop {
            let (arg, after) = self.type_at(next)?;
            args.push(arg);
            next = after;
            match self.tok(next)? {
                RawToken::Comma => next += 1,
                RawToken::Gt => return Some((args, next + 1)),
                RawToken::Shr => {
                    let raw = &mut self.raw[next];
                    raw.tok = RawToken::Gt;
                    raw.span = Span::new(raw.span.start + 1, raw.span.end);
                    raw.text = ">";
                    return Some((args, next));
                }
                _ => return None,
            }
        }
    }

    fn convert(&self, raw: Raw<'_>) -> TokenKind {
        match raw.tok {
            RawToken::Int(n) => TokenKind::Int(n),
            RawToken::Double(d) => TokenKind::double(d),
            RawToken::Str => {
                let content = &raw.text[1..raw.text.len() - 1];
                TokenKind::Str(self.intern(&unescape(content)))
            }
            RawToken::True => TokenKind::True,
            RawToken::False => TokenKind::False,
            RawToken::New => TokenKind::New,
            RawToken::Ident => TokenKind::ident(self.intern(raw.text)),
            RawToken::Plus => TokenKind::Plus,
            RawToken::Minus => TokenKind::Minus,
            RawToken::Star => TokenKind::Star,
            RawToken::StarStar => TokenKind::StarStar,
            RawToken::Slash => TokenKind::Slash,
            RawToken::Percent => TokenKind::Percent,
            RawToken::Shl => TokenKind::Shl,
            RawToken::Shr => TokenKind::Shr,
            RawToken::Lt => TokenKind::Lt,
            RawToken::Gt => TokenKind::Gt,
            RawToken::LtEq => TokenKind::LtEq,
            RawToken::GtEq => TokenKind::GtEq,
            RawToken::EqEq => TokenKind::EqEq,
            RawToken::NotEq => TokenKind::NotEq,
            RawToken::Amp => TokenKind::Amp,
            RawToken::Pipe => TokenKind::Pipe,
            RawToken::Caret => TokenKind::Caret,
            RawToken::AmpAmp => TokenKind::AmpAmp,
            RawToken::PipePipe => TokenKind::PipePipe,
            RawToken::Bang => TokenKind::Bang,
            RawToken::Tilde => TokenKind::Tilde,
            RawToken::PlusPlus => TokenKind::PlusPlus,
            RawToken::MinusMinus => TokenKind::MinusMinus,
            RawToken::Eq => TokenKind::Eq,
            RawToken::PlusEq => TokenKind::PlusEq,
            RawToken::MinusEq => TokenKind::MinusEq,
            RawToken::StarEq => TokenKind::StarEq,
            RawToken::SlashEq => TokenKind::SlashEq,
            RawToken::PercentEq => TokenKind::PercentEq,
            RawToken::AmpEq => TokenKind::AmpEq,
            RawToken::PipeEq => TokenKind::PipeEq,
            RawToken::CaretEq => TokenKind::CaretEq,
            RawToken::ShlEq => TokenKind::ShlEq,
            RawToken::ShrEq => TokenKind::ShrEq,
            RawToken::Question => TokenKind::Question,
            RawToken::Dot => TokenKind::Dot,
            RawToken::LParen => TokenKind::LParen,
            RawToken::RParen => TokenKind::RParen,
            RawToken::LBracket => TokenKind::LBracket,
            RawToken::RBracket => TokenKind::RBracket,
            RawToken::LBrace => TokenKind::LBrace,
            RawToken::RBrace => TokenKind::RBrace,
            RawToken::Comma => TokenKind::Comma,
            RawToken::Semicolon => TokenKind::Semicolon,
            RawToken::Colon => TokenKind::Colon,
            // Trivia never reaches the scanner.
            RawToken::Newline | RawToken::Comment => TokenKind::Eof,
        }
    }
}

/// Process string escape sequences.
fn unescape(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            result.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => result.push('\n'),
            Some('t') => result.push('\t'),
            Some('r') => result.push('\r'),
            Some(other) => result.push(other),
            None => result.push('\\'),
        }
    }
    result
}
