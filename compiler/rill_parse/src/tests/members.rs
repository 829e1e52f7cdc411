use std::f64::consts::PI;

use pretty_assertions::assert_eq;
use rill_test_support::fixtures::{vec2_of, Vec2};
use rill_types::{EvalErrorKind, Value};

use super::{string, Harness};

#[test]
fn properties_and_methods_on_values() {
    let mut h = Harness::new();
    assert_eq!(h.eval("v.X + v.Y"), Value::Double(3.0));
    assert_eq!(h.eval("v.Length()"), Value::Double(5f64.sqrt()));
    assert_eq!(h.eval("s.Length"), Value::Int(3));
    assert_eq!(h.eval("s.ToUpper()"), string("ABC"));
    assert_eq!(h.eval("s.ToUpper().Length + 1"), Value::Int(4));
    assert_eq!(h.eval("(s + \"def\").Substring(2)"), string("cdef"));
}

#[test]
fn property_assignment_writes_through_the_setter() {
    let mut h = Harness::new();
    assert_eq!(h.eval("v.X = 7"), Value::Double(7.0));
    assert_eq!(h.eval("v.X"), Value::Double(7.0));
    assert_eq!(h.eval("v.Y += 0.5"), Value::Double(2.5));
    assert_eq!(vec2_of(&h.var("v")), Some(Vec2 { x: 7.0, y: 2.5 }));
}

#[test]
fn static_members_through_a_type_name() {
    let mut h = Harness::new();
    assert_eq!(h.eval("Math.PI"), Value::Double(PI));
    assert_eq!(h.eval("Math.Max(3, 7)"), Value::Int(7));
    assert_eq!(h.eval("Math.Max(3, 7.5)"), Value::Double(7.5));
    assert_eq!(h.eval("Vec2.Zero.Length()"), Value::Double(0.0));
    assert_eq!(h.type_of("Math.Abs(-2)"), "int");
}

#[test]
fn global_functions() {
    let mut h = Harness::new();
    assert_eq!(h.eval("abs(-4)"), Value::Int(4));
    assert_eq!(h.eval("max(2, 9) + min(2, 9)"), Value::Int(11));
    assert_eq!(h.eval("max(x, d)"), Value::Double(10.0));
}

#[test]
fn generic_method_with_explicit_type_arguments() {
    let mut h = Harness::new();
    assert_eq!(h.eval("Enumerable.Repeat<int>(7, 3).Length"), Value::Int(3));
    assert_eq!(
        h.eval("Enumerable.Repeat<string>(\"a\", 2)[1]"),
        string("a")
    );
    assert_eq!(h.type_of("Enumerable.Repeat<double>(1, 2)"), "double[]");
}

#[test]
fn operator_overloads() {
    let mut h = Harness::new();
    let sum = h.eval("v + v * 2");
    assert_eq!(vec2_of(&sum), Some(Vec2 { x: 3.0, y: 6.0 }));
    assert_eq!(vec2_of(&h.eval("2 * v")), Some(Vec2 { x: 2.0, y: 4.0 }));
    assert_eq!(vec2_of(&h.eval("-v")), Some(Vec2 { x: -1.0, y: -2.0 }));
    assert_eq!(h.eval("(v - v).Length()"), Value::Double(0.0));
    assert_eq!(h.eval("v == v"), Value::Bool(true));
    assert_eq!(h.eval("v == new Vec2(1, 2)"), Value::Bool(true));
}

#[test]
fn indexing() {
    let mut h = Harness::new();
    assert_eq!(h.eval("nums[1]"), Value::Int(2));
    assert_eq!(h.eval("nums[1 + 1] * 2"), Value::Int(6));
    assert_eq!(h.eval("nums[0] = 9"), Value::Int(9));
    assert_eq!(h.eval("nums[0]"), Value::Int(9));
    assert_eq!(h.eval("list[1]"), Value::Int(5));
    assert_eq!(h.eval("nums.Length"), Value::Int(3));
}

#[test]
fn indexing_out_of_range_fails_at_runtime() {
    let mut h = Harness::new();
    let err = h.try_eval("nums[3]").unwrap_err();
    assert_eq!(
        err.kind,
        EvalErrorKind::IndexOutOfRange { index: 3, len: 3 }
    );
}

#[test]
fn member_access_after_an_index() {
    let mut h = Harness::new();
    h.define("words", "new string[] { \"ab\", \"cde\" }");
    assert_eq!(h.eval("words[1].Length"), Value::Int(3));
    assert_eq!(h.eval("words[0].ToUpper()"), string("AB"));
}

#[test]
fn void_methods_execute() {
    let mut h = Harness::new();
    let parsed = h.parse("list.Add(6)").unwrap();
    assert!(parsed.is_executable());
    assert_eq!(h.eval("list.Add(6)"), Value::Void);
    assert_eq!(h.eval("list.Count"), Value::Int(3));
}

#[test]
fn inherited_members() {
    let mut h = Harness::new();
    assert_eq!(h.eval("circle.Area()"), Value::Double(PI));
    assert_eq!(h.eval("shape.Area()"), Value::Double(4.0 * PI));
    assert_eq!(h.type_of("shape"), "Shape");
}

#[test]
fn checked_downcasts() {
    let mut h = Harness::new();
    assert_eq!(h.eval("((Circle)shape).Radius"), Value::Double(2.0));
    let err = h.try_eval("(Square)shape").unwrap_err();
    assert!(
        matches!(err.kind, EvalErrorKind::InvalidCast { ref from, ref to } if from == "Circle" && to == "Square"),
        "{err:?}"
    );
}

#[test]
fn object_accepts_anything() {
    let mut h = Harness::new();
    h.define("o", "(object)v");
    assert_eq!(h.type_of("o"), "object");
    assert_eq!(h.eval("((Vec2)o).Y"), Value::Double(2.0));
    assert_eq!(h.eval("o = 5"), Value::Int(5));
}
