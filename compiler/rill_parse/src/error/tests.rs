use pretty_assertions::assert_eq;
use rill_diagnostic::{unknown_identifier, ErrorCode};
use rill_ir::Span;

use super::ParseError;

#[test]
fn line_is_recorded_as_note() {
    let err = ParseError::new(unknown_identifier(Span::new(4, 9), "speed"), 3);
    assert_eq!(err.line, 3);
    assert_eq!(err.code(), ErrorCode::E2003);
    assert_eq!(err.span(), Span::new(4, 9));
    assert!(err.diagnostic.notes.iter().any(|n| n == "on line 3"));
}

#[test]
fn display_renders_diagnostic() {
    let err = ParseError::new(unknown_identifier(Span::new(0, 1), "q"), 1);
    let text = err.to_string();
    assert!(text.starts_with("error [E2003]: unknown identifier `q`"));
    assert!(text.contains("on line 1"));
}
