use pretty_assertions::assert_eq;
use rill_types::Value;

use super::{string, Harness};

#[test]
fn multiplicative_binds_tighter_than_additive() {
    let mut h = Harness::new();
    assert_eq!(h.eval("1 + 2 * 3"), Value::Int(7));
    assert_eq!(h.eval("(1 + 2) * 3"), Value::Int(9));
    assert_eq!(h.eval("20 - 6 % 4"), Value::Int(18));
}

#[test]
fn left_associative_chains() {
    let mut h = Harness::new();
    assert_eq!(h.eval("10 - 4 - 3"), Value::Int(3));
    assert_eq!(h.eval("100 / 10 / 5"), Value::Int(2));
    assert_eq!(h.eval("1 + 2 + \"a\""), string("3a"));
    assert_eq!(h.eval("\"a\" + 1 + 2"), string("a12"));
}

#[test]
fn power_is_right_associative() {
    let mut h = Harness::new();
    assert_eq!(h.eval("2 ** 3 ** 2"), Value::Int(512));
    assert_eq!(h.eval("2 * 3 ** 2"), Value::Int(18));
    assert_eq!(h.eval("2.0 ** -1"), Value::Double(0.5));
}

#[test]
fn unary_binds_tighter_than_power() {
    let mut h = Harness::new();
    assert_eq!(h.eval("-2 ** 2"), Value::Int(4));
    assert_eq!(h.eval("1 - -2"), Value::Int(3));
    assert_eq!(h.eval("- -3"), Value::Int(3));
    assert_eq!(h.eval("~5"), Value::Int(-6));
    assert_eq!(h.eval("-d"), Value::Double(-2.5));
}

#[test]
fn shifts_bind_looser_than_additive() {
    let mut h = Harness::new();
    assert_eq!(h.eval("1 << 2 + 1"), Value::Int(8));
    assert_eq!(h.eval("-16 >> 2"), Value::Int(-4));
    assert_eq!(h.eval("1 << 65"), Value::Int(2));
}

#[test]
fn comparison_then_equality_then_bitwise_then_logical() {
    let mut h = Harness::new();
    assert_eq!(h.eval("1 + 2 < 4 == true"), Value::Bool(true));
    assert_eq!(h.eval("5 & 3 | 8"), Value::Int(9));
    assert_eq!(h.eval("1 < 2 && 3 > 4 || true"), Value::Bool(true));
    // `&&` and `||` share one pass, left to right.
    assert_eq!(h.eval("true || false && false"), Value::Bool(false));
}

#[test]
fn not_binds_looser_than_shifts() {
    let mut h = Harness::new();
    assert_eq!(h.eval("!true == false"), Value::Bool(true));
    assert_eq!(h.eval("!flag || x > 5"), Value::Bool(true));
    assert_eq!(h.eval("!!flag"), Value::Bool(true));
}

#[test]
fn casts_apply_before_binary_operators() {
    let mut h = Harness::new();
    assert_eq!(h.eval("(double)7 / 2"), Value::Double(3.5));
    assert_eq!(h.eval("(int)d * 2"), Value::Int(4));
    assert_eq!(h.eval("(int)-2.7"), Value::Int(-2));
    assert_eq!(h.eval("-(int)2.7"), Value::Int(-2));
    assert_eq!(h.eval("(int)(double)x"), Value::Int(10));
}

#[test]
fn mixed_arithmetic_promotes_to_double() {
    let mut h = Harness::new();
    assert_eq!(h.eval("x + d"), Value::Double(12.5));
    assert_eq!(h.eval("7 / 2"), Value::Int(3));
    assert_eq!(h.eval("7 / 2.0"), Value::Double(3.5));
    assert_eq!(h.eval("x == 10.0"), Value::Bool(true));
    assert_eq!(h.type_of("x * d"), "double");
    assert_eq!(h.type_of("x < d"), "bool");
}

#[test]
fn string_concatenation_renders_operands() {
    let mut h = Harness::new();
    assert_eq!(h.eval("s + x"), string("abc10"));
    assert_eq!(h.eval("\"n=\" + d"), string("n=2.5"));
    assert_eq!(h.eval("\"b\" + flag"), string("bTrue"));
    assert_eq!(h.eval("\"v\" + v"), string("v(1, 2)"));
    assert_eq!(h.eval("s == \"abc\""), Value::Bool(true));
}

#[test]
fn ternary_selects_a_branch() {
    let mut h = Harness::new();
    assert_eq!(h.eval("x > 5 ? \"big\" : \"small\""), string("big"));
    assert_eq!(h.eval("false ? 1 : true ? 2 : 3"), Value::Int(2));
    assert_eq!(h.eval("true ? 1 : 2.5"), Value::Double(1.0));
    assert_eq!(h.type_of("flag ? 1 : 2.5"), "double");
    assert_eq!(h.eval("(x > 5 ? 1 : 2) + 10"), Value::Int(11));
}

#[test]
fn ternary_binds_looser_than_logical() {
    let mut h = Harness::new();
    assert_eq!(h.eval("x > 5 && y > 5 ? 1 : 0"), Value::Int(0));
    assert_eq!(h.eval("x = flag ? 1 : 2"), Value::Int(1));
    assert_eq!(h.var("x"), Value::Int(1));
}

#[test]
fn only_the_chosen_branch_is_evaluated() {
    let mut h = Harness::new();
    assert_eq!(h.eval("flag ? 1 : x++"), Value::Int(1));
    assert_eq!(h.var("x"), Value::Int(10));
}

#[test]
fn assignment_is_right_associative() {
    let mut h = Harness::new();
    assert_eq!(h.eval("x = y = 4"), Value::Int(4));
    assert_eq!(h.var("x"), Value::Int(4));
    assert_eq!(h.var("y"), Value::Int(4));
}

#[test]
fn assignment_converts_the_value() {
    let mut h = Harness::new();
    assert_eq!(h.eval("d = 4"), Value::Double(4.0));
    assert_eq!(h.var("d"), Value::Double(4.0));
    assert_eq!(h.eval("(x) = 5"), Value::Int(5));
}

#[test]
fn compound_assignment() {
    let mut h = Harness::new();
    assert_eq!(h.eval("x += 5"), Value::Int(15));
    assert_eq!(h.eval("x -= y * 2"), Value::Int(9));
    assert_eq!(h.eval("d *= 2"), Value::Double(5.0));
    assert_eq!(h.eval("s += 1"), string("abc1"));
    assert_eq!(h.eval("x <<= 1"), Value::Int(18));
    assert_eq!(h.var("x"), Value::Int(18));
}

#[test]
fn increment_and_decrement() {
    let mut h = Harness::new();
    assert_eq!(h.eval("x++"), Value::Int(10));
    assert_eq!(h.var("x"), Value::Int(11));
    assert_eq!(h.eval("++x"), Value::Int(12));
    assert_eq!(h.eval("--d"), Value::Double(1.5));
    assert_eq!(h.eval("x++ + ++x"), Value::Int(26));
    assert_eq!(h.var("x"), Value::Int(14));
}

#[test]
fn increment_through_a_member_or_index() {
    let mut h = Harness::new();
    assert_eq!(h.eval("nums[0]++"), Value::Int(1));
    assert_eq!(h.eval("nums[0]"), Value::Int(2));
    assert_eq!(h.eval("++v.X"), Value::Double(2.0));
    assert_eq!(h.eval("v.X"), Value::Double(2.0));
}

#[test]
fn logical_operators_short_circuit() {
    let mut h = Harness::new();
    assert_eq!(h.eval("false && x++ > 0"), Value::Bool(false));
    assert_eq!(h.eval("true || x++ > 0"), Value::Bool(true));
    assert_eq!(h.var("x"), Value::Int(10));
}
