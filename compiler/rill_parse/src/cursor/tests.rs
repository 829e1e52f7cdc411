use pretty_assertions::assert_eq;
use rill_diagnostic::ErrorCode;
use rill_ir::{StringInterner, Token, TokenKind, TokenList};

use super::Cursor;

fn list() -> TokenList {
    TokenList::from_kinds([TokenKind::Int(1), TokenKind::Plus, TokenKind::Int(2)])
}

#[test]
fn advance_stops_at_eof() {
    let tokens = list();
    let mut cursor = Cursor::new(&tokens);
    cursor.advance();
    cursor.advance();
    cursor.advance();
    assert!(cursor.is_at_end());
    cursor.advance();
    assert_eq!(cursor.position(), 3);
    assert_eq!(cursor.current_kind(), &TokenKind::Eof);
}

#[test]
fn peek_past_end_is_eof() {
    let tokens = list();
    let cursor = Cursor::new(&tokens);
    assert_eq!(cursor.peek_kind_at(1), &TokenKind::Plus);
    assert_eq!(cursor.peek_kind_at(10), &TokenKind::Eof);
}

#[test]
fn check_ignores_payload() {
    let tokens = list();
    let cursor = Cursor::new(&tokens);
    assert!(cursor.check(&TokenKind::Int(0)));
    assert!(!cursor.check(&TokenKind::Plus));
}

#[test]
fn expect_reports_found_token() {
    let interner = StringInterner::new();
    let tokens = list();
    let mut cursor = Cursor::new(&tokens);
    let err = cursor.expect(&TokenKind::LParen, &interner).unwrap_err();
    assert_eq!(err.code(), ErrorCode::E1001);
    assert!(err.message().contains("`(`"), "{}", err.message());
    assert_eq!(cursor.position(), 0);
}

#[test]
fn expect_close_reports_unclosed() {
    let tokens = list();
    let mut cursor = Cursor::new(&tokens);
    let open = Token::dummy(TokenKind::LParen);
    let err = cursor
        .expect_close(&open, &TokenKind::RParen, '(')
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::E1003);
}
