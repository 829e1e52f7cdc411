use pretty_assertions::assert_eq;
use rill_diagnostic::ErrorCode;
use rill_test_support::fixtures::{vec2_of, Vec2};
use rill_types::{EvalErrorKind, Value};

use super::{string, Harness};

fn ints(value: &Value) -> Vec<i64> {
    let Value::Array(array) = value else {
        panic!("expected an array, got {value:?}");
    };
    array
        .to_vec()
        .iter()
        .map(|v| v.to_int().unwrap())
        .collect()
}

#[test]
fn sized_array_is_default_filled() {
    let mut h = Harness::new();
    assert_eq!(ints(&h.eval("new int[3]")), vec![0, 0, 0]);
    assert_eq!(h.eval("new int[x].Length"), Value::Int(10));
    assert_eq!(h.eval("new string[2][1]"), Value::Null);
    assert_eq!(h.type_of("new double[2]"), "double[]");
}

#[test]
fn array_initializers() {
    let mut h = Harness::new();
    assert_eq!(ints(&h.eval("new int[] { 1, 2, 3, }")), vec![1, 2, 3]);
    assert_eq!(ints(&h.eval("new int[] { }")), Vec::<i64>::new());
    assert_eq!(ints(&h.eval("new int[5] { 1, 2 }")), vec![1, 2, 0, 0, 0]);
    assert_eq!(h.eval("new double[] { 1, 2.5 }[0]"), Value::Double(1.0));
    assert_eq!(h.eval("new int[] { x, y * 2 }[1]"), Value::Int(6));
}

#[test]
fn initializer_longer_than_a_literal_length() {
    let h = Harness::new();
    let err = h.error("new int[2] { 1, 2, 3 }");
    assert_eq!(err.code(), ErrorCode::E1008);
}

#[test]
fn initializer_longer_than_a_computed_length_fails_at_runtime() {
    let mut h = Harness::new();
    let err = h.try_eval("new int[y - 2] { 1, 2 }").unwrap_err();
    assert!(
        matches!(err.kind, EvalErrorKind::IndexOutOfRange { .. }),
        "{err:?}"
    );
}

#[test]
fn negative_length_fails_at_runtime() {
    let mut h = Harness::new();
    assert!(h.try_eval("new int[-1]").is_err());
}

#[test]
fn array_element_types_are_checked() {
    let h = Harness::new();
    assert_eq!(h.error("new int[] { 1, \"two\" }").code(), ErrorCode::E2001);
    assert_eq!(h.error("new int[2.5]").code(), ErrorCode::E2001);
}

#[test]
fn objects_through_constructors() {
    let mut h = Harness::new();
    assert_eq!(
        vec2_of(&h.eval("new Vec2(3, 4)")),
        Some(Vec2 { x: 3.0, y: 4.0 })
    );
    assert_eq!(h.eval("new Vec2(3, 4).Length()"), Value::Double(5.0));
    assert_eq!(h.type_of("new Circle(1)"), "Circle");
}

#[test]
fn collection_initializers_insert_each_item() {
    let mut h = Harness::new();
    assert_eq!(h.eval("new List<int>() { 1, 2, 3 }.Count"), Value::Int(3));
    assert_eq!(h.eval("new List<double> { 1, 2 }[0]"), Value::Double(1.0));
    assert_eq!(h.eval("new Stack<string> { \"a\", \"b\" }.Peek()"), string("b"));
    assert_eq!(h.eval("new List<int>().Count"), Value::Int(0));
}

#[test]
fn nested_generic_collections() {
    let mut h = Harness::new();
    assert_eq!(h.type_of("new List<List<int>>()"), "List<List<int>>");
    assert_eq!(
        h.eval("new List<List<int>> { new List<int> { 7 } }[0][0]"),
        Value::Int(7)
    );
}

#[test]
fn constructor_overload_mismatch_lists_candidates() {
    let h = Harness::new();
    let err = h.error("new Vec2(1)");
    assert_eq!(err.code(), ErrorCode::E2004);
    assert!(
        err.diagnostic.notes.iter().any(|n| n.starts_with("candidate")),
        "{:?}",
        err.diagnostic.notes
    );
}

#[test]
fn types_without_constructors() {
    let h = Harness::new();
    let err = h.error("new Math()");
    assert_eq!(err.code(), ErrorCode::E2004);
    assert!(err.message().contains("cannot be constructed"), "{}", err.message());
}

#[test]
fn initializer_requires_an_insertion_member() {
    let h = Harness::new();
    assert_eq!(h.error("new Vec2(1, 2) { 3 }").code(), ErrorCode::E2010);
}

#[test]
fn new_requires_a_type() {
    let h = Harness::new();
    assert_eq!(h.error("new 5").code(), ErrorCode::E1005);
    assert_eq!(h.error("new List<int, int>()").code(), ErrorCode::E2002);
    assert_eq!(h.error("new Vec2").code(), ErrorCode::E1001);
}
