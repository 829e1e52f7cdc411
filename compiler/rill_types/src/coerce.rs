//! Implicit and explicit conversion rules.
//!
//! Implicit conversions are ranked so that overload selection can prefer
//! the closest match:
//!
//! | Cost | Conversion |
//! |------|------------|
//! | 0 | identity |
//! | 1 | `int` → `double` |
//! | 2 | derived → base |
//! | 3 | anything → `object` |
//!
//! `void` converts to nothing. Explicit casts add `double` → `int`
//! (truncating), runtime-checked downcasts from `object` or a base type,
//! and host-registered casts.

use rill_ir::{CastPlan, TypeId};

use crate::{integer_overflow, invalid_cast, EvalResult, TypeRegistry, Value};

#[cfg(test)]
mod tests;

/// Rank of the implicit conversion from `from` to `to`, `None` if there is
/// none.
pub fn implicit_cost(reg: &TypeRegistry, from: TypeId, to: TypeId) -> Option<u8> {
    if from == TypeId::VOID || to == TypeId::VOID {
        return None;
    }
    if from == to {
        return Some(0);
    }
    if from == TypeId::INT && to == TypeId::DOUBLE {
        return Some(1);
    }
    if reg.is_subtype(from, to) {
        return Some(2);
    }
    if to == TypeId::OBJECT {
        return Some(3);
    }
    None
}

pub fn is_assignable(reg: &TypeRegistry, from: TypeId, to: TypeId) -> bool {
    implicit_cost(reg, from, to).is_some()
}

/// How `(to) value` is carried out for a value of static type `from`.
pub fn explicit_cast(reg: &TypeRegistry, from: TypeId, to: TypeId) -> Option<CastPlan> {
    match implicit_cost(reg, from, to) {
        Some(1) => return Some(CastPlan::IntToDouble),
        Some(_) => return Some(CastPlan::Identity),
        None => {}
    }
    if from == TypeId::DOUBLE && to == TypeId::INT {
        return Some(CastPlan::DoubleToInt);
    }
    if let Some(callable) = reg.cast(from, to) {
        return Some(CastPlan::Host(callable));
    }
    if to != TypeId::VOID && (from == TypeId::OBJECT || reg.is_subtype(to, from)) {
        return Some(CastPlan::Checked(to));
    }
    None
}

/// Whether a runtime value may be stored where `ty` is expected.
pub fn value_conforms(reg: &TypeRegistry, value: &Value, ty: TypeId) -> bool {
    if ty == TypeId::OBJECT {
        return !matches!(value, Value::Void);
    }
    match value.runtime_type() {
        Some(actual) => reg.is_subtype(actual, ty),
        None => reg.is_reference(ty),
    }
}

/// Source-level name of a value's dynamic type.
pub fn runtime_type_name(reg: &TypeRegistry, value: &Value) -> String {
    value
        .runtime_type()
        .map_or_else(|| "null".to_string(), |ty| reg.type_name(ty))
}

/// Bounds of `i64` as `f64`; `2^63` itself is out of range.
const I64_LIMIT: f64 = 9_223_372_036_854_775_808.0;

/// Carry out a cast chosen by [`explicit_cast`].
pub fn apply_cast(reg: &TypeRegistry, plan: CastPlan, value: Value, to: TypeId) -> EvalResult {
    match plan {
        CastPlan::Identity => Ok(value),
        CastPlan::IntToDouble => Ok(Value::Double(value.to_double()?)),
        CastPlan::DoubleToInt => {
            let d = value.to_double()?;
            if d.is_nan() || d >= I64_LIMIT || d < -I64_LIMIT {
                return Err(integer_overflow("conversion"));
            }
            #[expect(
                clippy::cast_possible_truncation,
                reason = "range checked above, truncation toward zero is the cast"
            )]
            let n = d.trunc() as i64;
            Ok(Value::Int(n))
        }
        CastPlan::Checked(target) => {
            let value = value.promote(target);
            if value_conforms(reg, &value, target) {
                Ok(value)
            } else {
                Err(invalid_cast(
                    runtime_type_name(reg, &value),
                    reg.type_name(target),
                ))
            }
        }
        CastPlan::Host(callable) => reg.call(callable, std::slice::from_ref(&value), to),
    }
}
