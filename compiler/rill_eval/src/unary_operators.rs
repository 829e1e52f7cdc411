//! Unary operator implementations for the evaluator.

use rill_ir::{IncDecOp, TypeId, UnaryOp, UnaryPlan};
use rill_types::{integer_overflow, type_mismatch, EvalResult, TypeRegistry, Value};

/// Evaluate a unary operation according to its plan.
pub fn evaluate_unary(
    reg: &TypeRegistry,
    op: UnaryOp,
    plan: UnaryPlan,
    value: Value,
    ty: TypeId,
) -> EvalResult {
    match (plan, op) {
        (UnaryPlan::Int, UnaryOp::Neg) => value
            .to_int()?
            .checked_neg()
            .map(Value::Int)
            .ok_or_else(|| integer_overflow("negation")),
        (UnaryPlan::Int, UnaryOp::BitNot) => Ok(Value::Int(!value.to_int()?)),
        (UnaryPlan::Double, UnaryOp::Neg) => Ok(Value::Double(-value.to_double()?)),
        (UnaryPlan::Bool, UnaryOp::Not) => Ok(Value::Bool(!value.to_bool()?)),
        (UnaryPlan::Overload(callable), _) => reg.call(callable, &[value], ty),
        _ => Err(type_mismatch(format!("operand for `{op}`"), value.kind_name())),
    }
}

/// The value after `++` or `--`.
pub fn step(op: IncDecOp, value: &Value) -> EvalResult {
    match (value, op) {
        (Value::Int(n), IncDecOp::Increment) => n
            .checked_add(1)
            .map(Value::Int)
            .ok_or_else(|| integer_overflow("increment")),
        (Value::Int(n), IncDecOp::Decrement) => n
            .checked_sub(1)
            .map(Value::Int)
            .ok_or_else(|| integer_overflow("decrement")),
        (Value::Double(d), IncDecOp::Increment) => Ok(Value::Double(d + 1.0)),
        (Value::Double(d), IncDecOp::Decrement) => Ok(Value::Double(d - 1.0)),
        (other, _) => Err(type_mismatch("int or double", other.kind_name())),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use pretty_assertions::assert_eq;
    use rill_ir::StringInterner;
    use rill_types::{EvalErrorKind, RegistryBuilder};

    use super::*;

    #[test]
    fn negation_and_complement() {
        let reg = RegistryBuilder::new(Arc::new(StringInterner::new())).build();
        let un = |op, plan, v| evaluate_unary(&reg, op, plan, v, TypeId::INT);
        assert_eq!(un(UnaryOp::Neg, UnaryPlan::Int, Value::Int(5)), Ok(Value::Int(-5)));
        assert_eq!(un(UnaryOp::BitNot, UnaryPlan::Int, Value::Int(0)), Ok(Value::Int(-1)));
        assert_eq!(
            un(UnaryOp::Neg, UnaryPlan::Double, Value::Double(1.5)),
            Ok(Value::Double(-1.5))
        );
        assert_eq!(
            un(UnaryOp::Not, UnaryPlan::Bool, Value::Bool(true)),
            Ok(Value::Bool(false))
        );
        assert_eq!(
            un(UnaryOp::Neg, UnaryPlan::Int, Value::Int(i64::MIN))
                .unwrap_err()
                .kind,
            EvalErrorKind::IntegerOverflow {
                operation: "negation"
            }
        );
    }

    #[test]
    fn increment_and_decrement() {
        assert_eq!(step(IncDecOp::Increment, &Value::Int(1)), Ok(Value::Int(2)));
        assert_eq!(
            step(IncDecOp::Decrement, &Value::Double(0.5)),
            Ok(Value::Double(-0.5))
        );
        assert!(step(IncDecOp::Increment, &Value::Int(i64::MAX)).is_err());
        assert!(step(IncDecOp::Increment, &Value::string("a")).is_err());
    }
}
