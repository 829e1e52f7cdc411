use pretty_assertions::assert_eq;

use super::*;

#[test]
fn test_diagnostic_builder() {
    let diag = Diagnostic::error(ErrorCode::E1001)
        .with_message("test error")
        .with_label(Span::new(0, 5), "here")
        .with_note("some context")
        .with_suggestion("try this");

    assert_eq!(diag.code, ErrorCode::E1001);
    assert_eq!(diag.message, "test error");
    assert_eq!(diag.labels.len(), 1);
    assert!(diag.labels[0].is_primary);
    assert_eq!(diag.notes.len(), 1);
    assert_eq!(diag.suggestions.len(), 1);
}

#[test]
fn test_type_mismatch_helper() {
    let diag = type_mismatch(Span::new(10, 15), "int", "bool", "left operand of `+`");

    assert_eq!(diag.code, ErrorCode::E2001);
    assert!(diag.message.contains("int"));
    assert!(diag.message.contains("bool"));
    assert_eq!(diag.primary_span(), Some(Span::new(10, 15)));
}

#[test]
fn test_missing_operand() {
    let diag = missing_operand(Span::new(2, 3), "+", "right");

    assert_eq!(diag.code, ErrorCode::E1002);
    assert_eq!(diag.message, "missing right operand for `+`");
}

#[test]
fn test_unclosed_delimiter() {
    let diag = unclosed_delimiter(Span::new(0, 1), Span::new(10, 10), '[');

    assert_eq!(diag.code, ErrorCode::E1003);
    assert_eq!(diag.labels.len(), 2);
    assert!(diag.labels[0].is_primary);
    assert_eq!(diag.labels[0].message, "expected `]`");
    assert!(!diag.labels[1].is_primary);
}

#[test]
fn test_ambiguous_overload_lists_candidates() {
    let candidates = vec!["Max(int, double)".to_string(), "Max(double, int)".to_string()];
    let diag = ambiguous_overload(Span::new(0, 3), "Max", &candidates);

    assert_eq!(diag.code, ErrorCode::E2005);
    assert_eq!(
        diag.notes,
        vec![
            "candidate: Max(int, double)".to_string(),
            "candidate: Max(double, int)".to_string()
        ]
    );
}

#[test]
fn test_diagnostic_display_format() {
    let diag = Diagnostic::error(ErrorCode::E2001)
        .with_message("test error")
        .with_label(Span::new(0, 5), "primary")
        .with_secondary_label(Span::new(10, 15), "secondary")
        .with_note("a note")
        .with_suggestion("a suggestion");

    let output = diag.to_string();
    assert!(output.contains("error [E2001]: test error"));
    assert!(output.contains("--> "));
    assert!(output.contains("primary"));
    assert!(output.contains("secondary"));
    assert!(output.contains("= note: a note"));
    assert!(output.contains("= help: a suggestion"));
}
