//! Binary operator implementations for the evaluator.
//!
//! The plan chosen at parse time fixes the operand representation, so each
//! plan has its own function and the operator is matched inside it.

use rill_ir::{BinaryOp, BinaryPlan, CastPlan, TypeId};
use rill_types::{
    coerce, division_by_zero, integer_overflow, modulo_by_zero, type_mismatch, EvalError,
    EvalResult, TypeRegistry, Value,
};

/// Checked arithmetic operation with overflow handling.
#[inline]
fn checked_arith(result: Option<i64>, op_name: &'static str) -> EvalResult {
    result.map(Value::Int).ok_or_else(|| integer_overflow(op_name))
}

/// Evaluate a binary operation according to its plan.
///
/// `&&` and `||` arriving here have both operands evaluated already;
/// short-circuiting is the evaluator's job. `ty` is the node's result type,
/// passed through to overload callables.
pub fn evaluate_binary(
    reg: &TypeRegistry,
    op: BinaryOp,
    plan: BinaryPlan,
    left: Value,
    right: Value,
    ty: TypeId,
) -> EvalResult {
    match plan {
        BinaryPlan::Int => eval_int_binary(reg, left.to_int()?, right.to_int()?, op),
        BinaryPlan::Double => eval_double_binary(left.to_double()?, right.to_double()?, op),
        BinaryPlan::Bool => eval_bool_binary(left.to_bool()?, right.to_bool()?, op),
        BinaryPlan::Str => match op {
            BinaryOp::Eq => Ok(Value::Bool(left == right)),
            BinaryOp::NotEq => Ok(Value::Bool(left != right)),
            _ => Err(invalid_binary_op("string", op)),
        },
        BinaryPlan::Concat => {
            let mut text = reg.to_text(&left)?;
            text.push_str(&reg.to_text(&right)?);
            Ok(Value::from(text))
        }
        BinaryPlan::Reference => match op {
            BinaryOp::Eq => Ok(Value::Bool(left.loose_eq(&right))),
            BinaryOp::NotEq => Ok(Value::Bool(!left.loose_eq(&right))),
            _ => Err(invalid_binary_op("reference", op)),
        },
        BinaryPlan::Overload(callable) => reg.call(callable, &[left, right], ty),
    }
}

/// Binary operations on integers.
///
/// Division and remainder truncate toward zero. Shift counts use their low
/// six bits. `**` computes a floating power and truncates it.
fn eval_int_binary(reg: &TypeRegistry, a: i64, b: i64, op: BinaryOp) -> EvalResult {
    match op {
        BinaryOp::Add => checked_arith(a.checked_add(b), "addition"),
        BinaryOp::Sub => checked_arith(a.checked_sub(b), "subtraction"),
        BinaryOp::Mul => checked_arith(a.checked_mul(b), "multiplication"),
        BinaryOp::Div if b == 0 => Err(division_by_zero()),
        BinaryOp::Div => checked_arith(a.checked_div(b), "division"),
        BinaryOp::Mod if b == 0 => Err(modulo_by_zero()),
        BinaryOp::Mod => checked_arith(a.checked_rem(b), "remainder"),
        BinaryOp::Pow => {
            #[expect(clippy::cast_precision_loss, reason = "power is computed in double")]
            let power = (a as f64).powf(b as f64);
            coerce::apply_cast(reg, CastPlan::DoubleToInt, Value::Double(power), TypeId::INT)
                .map_err(|_| integer_overflow("power"))
        }
        BinaryOp::Shl => Ok(Value::Int(a.wrapping_shl(shift_count(b)))),
        BinaryOp::Shr => Ok(Value::Int(a.wrapping_shr(shift_count(b)))),
        BinaryOp::BitAnd => Ok(Value::Int(a & b)),
        BinaryOp::BitOr => Ok(Value::Int(a | b)),
        BinaryOp::BitXor => Ok(Value::Int(a ^ b)),
        BinaryOp::Eq => Ok(Value::Bool(a == b)),
        BinaryOp::NotEq => Ok(Value::Bool(a != b)),
        BinaryOp::Lt => Ok(Value::Bool(a < b)),
        BinaryOp::Gt => Ok(Value::Bool(a > b)),
        BinaryOp::LtEq => Ok(Value::Bool(a <= b)),
        BinaryOp::GtEq => Ok(Value::Bool(a >= b)),
        BinaryOp::And | BinaryOp::Or => Err(invalid_binary_op("int", op)),
    }
}

#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "masked to 0..=63"
)]
fn shift_count(b: i64) -> u32 {
    (b & 63) as u32
}

/// Binary operations on doubles. Division by zero yields an infinity or NaN.
fn eval_double_binary(a: f64, b: f64, op: BinaryOp) -> EvalResult {
    let value = match op {
        BinaryOp::Add => Value::Double(a + b),
        BinaryOp::Sub => Value::Double(a - b),
        BinaryOp::Mul => Value::Double(a * b),
        BinaryOp::Div => Value::Double(a / b),
        BinaryOp::Mod => Value::Double(a % b),
        BinaryOp::Pow => Value::Double(a.powf(b)),
        #[expect(clippy::float_cmp, reason = "language equality is exact")]
        BinaryOp::Eq => Value::Bool(a == b),
        #[expect(clippy::float_cmp, reason = "language equality is exact")]
        BinaryOp::NotEq => Value::Bool(a != b),
        BinaryOp::Lt => Value::Bool(a < b),
        BinaryOp::Gt => Value::Bool(a > b),
        BinaryOp::LtEq => Value::Bool(a <= b),
        BinaryOp::GtEq => Value::Bool(a >= b),
        _ => return Err(invalid_binary_op("double", op)),
    };
    Ok(value)
}

fn eval_bool_binary(a: bool, b: bool, op: BinaryOp) -> EvalResult {
    match op {
        BinaryOp::And | BinaryOp::BitAnd => Ok(Value::Bool(a & b)),
        BinaryOp::Or | BinaryOp::BitOr => Ok(Value::Bool(a | b)),
        BinaryOp::BitXor | BinaryOp::NotEq => Ok(Value::Bool(a ^ b)),
        BinaryOp::Eq => Ok(Value::Bool(a == b)),
        _ => Err(invalid_binary_op("bool", op)),
    }
}

#[cold]
fn invalid_binary_op(operands: &str, op: BinaryOp) -> EvalError {
    type_mismatch(format!("operands for `{op}`"), operands)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use pretty_assertions::assert_eq;
    use rill_ir::StringInterner;
    use rill_types::{EvalErrorKind, RegistryBuilder};

    use super::*;

    fn reg() -> TypeRegistry {
        RegistryBuilder::new(Arc::new(StringInterner::new())).build()
    }

    fn int(op: BinaryOp, a: i64, b: i64) -> EvalResult {
        evaluate_binary(&reg(), op, BinaryPlan::Int, Value::Int(a), Value::Int(b), TypeId::INT)
    }

    #[test]
    fn integer_division_truncates_toward_zero() {
        assert_eq!(int(BinaryOp::Div, 7, 2), Ok(Value::Int(3)));
        assert_eq!(int(BinaryOp::Div, -7, 2), Ok(Value::Int(-3)));
        assert_eq!(int(BinaryOp::Mod, -7, 2), Ok(Value::Int(-1)));
    }

    #[test]
    fn integer_faults() {
        assert_eq!(
            int(BinaryOp::Div, 1, 0).unwrap_err().kind,
            EvalErrorKind::DivisionByZero
        );
        assert_eq!(
            int(BinaryOp::Mod, 1, 0).unwrap_err().kind,
            EvalErrorKind::ModuloByZero
        );
        assert_eq!(
            int(BinaryOp::Add, i64::MAX, 1).unwrap_err().kind,
            EvalErrorKind::IntegerOverflow {
                operation: "addition"
            }
        );
        assert_eq!(
            int(BinaryOp::Div, i64::MIN, -1).unwrap_err().kind,
            EvalErrorKind::IntegerOverflow {
                operation: "division"
            }
        );
    }

    #[test]
    fn power_and_shifts() {
        assert_eq!(int(BinaryOp::Pow, 2, 10), Ok(Value::Int(1024)));
        assert_eq!(int(BinaryOp::Pow, 2, -1), Ok(Value::Int(0)));
        assert!(int(BinaryOp::Pow, 10, 30).is_err());
        assert_eq!(int(BinaryOp::Shl, 1, 65), Ok(Value::Int(2)));
        assert_eq!(int(BinaryOp::Shr, -8, 1), Ok(Value::Int(-4)));
    }

    #[test]
    fn double_division_by_zero_is_infinite() {
        let r = evaluate_binary(
            &reg(),
            BinaryOp::Div,
            BinaryPlan::Double,
            Value::Int(1),
            Value::Double(0.0),
            TypeId::DOUBLE,
        );
        assert_eq!(r, Ok(Value::Double(f64::INFINITY)));
    }

    #[test]
    fn concatenation_uses_text_forms() {
        let r = evaluate_binary(
            &reg(),
            BinaryOp::Add,
            BinaryPlan::Concat,
            Value::string("x="),
            Value::Double(0.5),
            TypeId::STRING,
        );
        assert_eq!(r, Ok(Value::string("x=0.5")));
        let r = evaluate_binary(
            &reg(),
            BinaryOp::Add,
            BinaryPlan::Concat,
            Value::Bool(false),
            Value::Null,
            TypeId::STRING,
        );
        assert_eq!(r, Ok(Value::string("False")));
    }

    #[test]
    fn string_equality_handles_null() {
        let eq = |a: Value, b: Value| {
            evaluate_binary(&reg(), BinaryOp::Eq, BinaryPlan::Str, a, b, TypeId::BOOL)
        };
        assert_eq!(eq(Value::string("a"), Value::string("a")), Ok(Value::Bool(true)));
        assert_eq!(eq(Value::string("a"), Value::Null), Ok(Value::Bool(false)));
    }
}
