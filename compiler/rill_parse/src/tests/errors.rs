use pretty_assertions::assert_eq;
use rill_diagnostic::ErrorCode;
use rill_ir::Span;

use super::Harness;
use crate::ParseOptions;

fn code(source: &str) -> ErrorCode {
    Harness::new().error(source).code()
}

#[test]
fn operand_types_are_checked() {
    let h = Harness::new();
    let err = h.error("true + 1");
    assert_eq!(err.code(), ErrorCode::E2001);
    assert_eq!(
        err.message(),
        "type mismatch: `+` cannot be applied to `bool` and `int`"
    );
    assert_eq!(code("s++"), ErrorCode::E2001);
    assert_eq!(code("-s"), ErrorCode::E2001);
    assert_eq!(code("x += 1.5"), ErrorCode::E2001);
    assert_eq!(code("x && flag"), ErrorCode::E2001);
}

#[test]
fn user_types_without_an_operator() {
    assert_eq!(code("v + 1"), ErrorCode::E2008);
    assert_eq!(code("!v"), ErrorCode::E2008);
    assert_eq!(code("v < v"), ErrorCode::E2008);
}

#[test]
fn missing_operands() {
    let h = Harness::new();
    let err = h.error("1 +");
    assert_eq!(err.code(), ErrorCode::E1002);
    assert_eq!(err.message(), "missing right operand for `+`");

    let err = h.error("* 2");
    assert_eq!(err.message(), "missing left operand for `*`");

    assert_eq!(code("x ="), ErrorCode::E1002);
    assert_eq!(code("(int)"), ErrorCode::E1002);
    // `!` reduces after the multiplicative pass.
    assert_eq!(code("x * !flag"), ErrorCode::E1002);
}

#[test]
fn operator_neighbours_are_labelled() {
    let h = Harness::new();
    let err = h.error("x * !flag");
    assert_eq!(err.message(), "missing right operand for `*`");
    assert_eq!(err.span(), Span::new(4, 5));

    let err = h.error("x = = 1");
    assert_eq!(err.message(), "missing left operand for `=`");
    assert_eq!(err.span(), Span::new(2, 3));
}

#[test]
fn adjacent_operands() {
    let h = Harness::new();
    let err = h.error("1 2");
    assert_eq!(err.code(), ErrorCode::E1007);
    assert_eq!(err.span(), Span::new(2, 3));
    assert_eq!(code("x y + 1"), ErrorCode::E1007);
}

#[test]
fn unknown_names() {
    let h = Harness::new();
    let err = h.error("foo + 1");
    assert_eq!(err.code(), ErrorCode::E2003);
    assert_eq!(err.message(), "unknown identifier `foo`");
    assert_eq!(err.span(), Span::new(0, 3));

    let err = h.error("v.Nope");
    assert_eq!(err.code(), ErrorCode::E2006);
    assert_eq!(err.message(), "type `Vec2` has no member `Nope`");
}

#[test]
fn method_used_as_property_suggests_a_call() {
    let h = Harness::new();
    let err = h.error("v.Length");
    assert_eq!(err.code(), ErrorCode::E2006);
    assert_eq!(
        err.diagnostic.suggestions,
        vec!["`Length` is a method; call it with `Length()`".to_owned()]
    );
}

#[test]
fn targets_must_be_modifiable() {
    assert_eq!(code("5 = 3"), ErrorCode::E1006);
    assert_eq!(code("5++"), ErrorCode::E1006);
    assert_eq!(code("++5"), ErrorCode::E1006);
    assert_eq!(code("x + 1 = 3"), ErrorCode::E1006);
    assert_eq!(code("Math.PI = 3"), ErrorCode::E1006);
    assert_eq!(code("s.Length++"), ErrorCode::E1006);
}

#[test]
fn malformed_syntax() {
    assert_eq!(code("(1 + 2"), ErrorCode::E1003);
    assert_eq!(code("nums[0"), ErrorCode::E1003);
    assert_eq!(code("v."), ErrorCode::E1004);
    assert_eq!(code("v.5"), ErrorCode::E1004);
    assert_eq!(code("flag ? 1"), ErrorCode::E1001);
    assert_eq!(code("[0]"), ErrorCode::E1002);
}

#[test]
fn functions_need_an_argument_list() {
    assert_eq!(code("abs"), ErrorCode::E1009);
    assert_eq!(code("abs + 1"), ErrorCode::E1009);
}

#[test]
fn type_names_are_not_values() {
    let h = Harness::new();
    let err = h.error("Math");
    assert_eq!(err.code(), ErrorCode::E1002);
    assert_eq!(err.message(), "expected expression, found type `Math`");
    assert_eq!(code("int + 1"), ErrorCode::E1002);
}

#[test]
fn void_results_are_not_values() {
    assert_eq!(code("list.Add(1) + 1"), ErrorCode::E2011);
    assert_eq!(code("x = list.Add(1)"), ErrorCode::E2011);
    assert_eq!(code("flag ? 1 : list.Add(1)"), ErrorCode::E2011);
    assert_eq!(code("abs(list.Add(1))"), ErrorCode::E2011);
}

#[test]
fn overload_failures() {
    let h = Harness::new();
    let err = h.error("Math.Max(true, 1)");
    assert_eq!(err.code(), ErrorCode::E2004);
    assert!(err.diagnostic.notes.len() >= 2, "{:?}", err.diagnostic.notes);
    assert_eq!(code("abs(\"a\")"), ErrorCode::E2004);
}

#[test]
fn indexing_errors() {
    assert_eq!(code("x[0]"), ErrorCode::E2007);
    assert_eq!(code("nums[\"a\"]"), ErrorCode::E2001);
}

#[test]
fn casts_and_conditions() {
    assert_eq!(code("(int)true"), ErrorCode::E2009);
    assert_eq!(code("(Circle)v"), ErrorCode::E2009);
    assert_eq!(code("(Nope)x"), ErrorCode::E2003);
    assert_eq!(code("x ? 1 : 2"), ErrorCode::E2001);
    assert_eq!(code("flag ? 1 : \"a\""), ErrorCode::E2001);
}

#[test]
fn errors_carry_the_line_of_the_offending_token() {
    let h = Harness::new();
    let err = h.error("1 +\n\nfoo");
    assert_eq!(err.line, 3);
    assert!(err.diagnostic.notes.contains(&"on line 3".to_owned()));
    assert!(err.to_string().contains("E2003"), "{err}");
}

#[test]
fn nesting_is_bounded() {
    let h = Harness::new();
    let deep = format!("{}1{}", "(".repeat(300), ")".repeat(300));
    assert_eq!(h.error(&deep).code(), ErrorCode::E1010);

    let mut h = Harness::new();
    h.options = ParseOptions {
        max_depth: 3,
        ..ParseOptions::default()
    };
    assert!(h.parse("((1))").is_ok());
    assert_eq!(h.error("(((1)))").code(), ErrorCode::E1010);
    assert_eq!(h.error("abs(abs(abs(1)))").code(), ErrorCode::E1010);
}
