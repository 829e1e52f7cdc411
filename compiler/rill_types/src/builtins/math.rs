//! `Math`, `Enumerable`, and the global numeric functions.

use rill_ir::TypeId;

use super::arg;
use crate::{host_failure, integer_overflow, ArrayRef, EvalResult, RegistryBuilder, TypeSig, Value};

const INT: TypeSig = TypeSig::INT;
const DOUBLE: TypeSig = TypeSig::DOUBLE;

pub(super) fn install(b: &mut RegistryBuilder) {
    let math = b.declare_type("Math");
    b.members(math)
        .static_property("PI", DOUBLE, |_, _| Ok(Value::Double(std::f64::consts::PI)))
        .static_property("E", DOUBLE, |_, _| Ok(Value::Double(std::f64::consts::E)))
        .static_method("Abs", &[INT], INT, abs_int)
        .static_method("Abs", &[DOUBLE], DOUBLE, abs_double)
        .static_method("Max", &[INT, INT], INT, max_int)
        .static_method("Max", &[DOUBLE, DOUBLE], DOUBLE, max_double)
        .static_method("Min", &[INT, INT], INT, min_int)
        .static_method("Min", &[DOUBLE, DOUBLE], DOUBLE, min_double)
        .static_method("Pow", &[DOUBLE, DOUBLE], DOUBLE, |args, _| {
            let (x, y) = doubles("Math.Pow", args)?;
            Ok(Value::Double(x.powf(y)))
        })
        .static_method("Sqrt", &[DOUBLE], DOUBLE, |args, _| {
            unary_double("Math.Sqrt", args, f64::sqrt)
        })
        .static_method("Floor", &[DOUBLE], DOUBLE, |args, _| {
            unary_double("Math.Floor", args, f64::floor)
        })
        .static_method("Ceiling", &[DOUBLE], DOUBLE, |args, _| {
            unary_double("Math.Ceiling", args, f64::ceil)
        })
        .static_method("Round", &[DOUBLE], DOUBLE, |args, _| {
            unary_double("Math.Round", args, f64::round_ties_even)
        })
        .static_method("Clamp", &[INT, INT, INT], INT, |args, _| {
            let value = arg("Math.Clamp", args, 0)?.to_int()?;
            let (lo, hi) = (
                arg("Math.Clamp", args, 1)?.to_int()?,
                arg("Math.Clamp", args, 2)?.to_int()?,
            );
            if lo > hi {
                return Err(host_failure("Math.Clamp", "minimum exceeds maximum"));
            }
            Ok(Value::Int(value.clamp(lo, hi)))
        })
        .static_method("Clamp", &[DOUBLE, DOUBLE, DOUBLE], DOUBLE, |args, _| {
            let value = arg("Math.Clamp", args, 0)?.to_double()?;
            let (lo, hi) = (
                arg("Math.Clamp", args, 1)?.to_double()?,
                arg("Math.Clamp", args, 2)?.to_double()?,
            );
            if lo > hi || lo.is_nan() || hi.is_nan() {
                return Err(host_failure("Math.Clamp", "minimum exceeds maximum"));
            }
            Ok(Value::Double(value.clamp(lo, hi)))
        });

    let enumerable = b.declare_type("Enumerable");
    b.members(enumerable).generic_method(
        "Repeat",
        1,
        true,
        &[TypeSig::Param(0), INT],
        TypeSig::ArrayOfParam(0),
        |args, ret| {
            let item = arg("Enumerable.Repeat", args, 0)?;
            let count = arg("Enumerable.Repeat", args, 1)?.to_int()?;
            let count = usize::try_from(count)
                .map_err(|_| host_failure("Enumerable.Repeat", "count is negative"))?;
            Ok(Value::Array(ArrayRef::new(ret, vec![item.clone(); count])))
        },
    );

    b.function("abs", &[INT], INT, abs_int);
    b.function("abs", &[DOUBLE], DOUBLE, abs_double);
    b.function("max", &[INT, INT], INT, max_int);
    b.function("max", &[DOUBLE, DOUBLE], DOUBLE, max_double);
    b.function("min", &[INT, INT], INT, min_int);
    b.function("min", &[DOUBLE, DOUBLE], DOUBLE, min_double);
}

fn ints(function: &str, args: &[Value]) -> Result<(i64, i64), crate::EvalError> {
    Ok((arg(function, args, 0)?.to_int()?, arg(function, args, 1)?.to_int()?))
}

fn doubles(function: &str, args: &[Value]) -> Result<(f64, f64), crate::EvalError> {
    Ok((
        arg(function, args, 0)?.to_double()?,
        arg(function, args, 1)?.to_double()?,
    ))
}

fn unary_double(function: &str, args: &[Value], f: fn(f64) -> f64) -> EvalResult {
    Ok(Value::Double(f(arg(function, args, 0)?.to_double()?)))
}

fn abs_int(args: &[Value], _: TypeId) -> EvalResult {
    arg("abs", args, 0)?
        .to_int()?
        .checked_abs()
        .map(Value::Int)
        .ok_or_else(|| integer_overflow("abs"))
}

fn abs_double(args: &[Value], _: TypeId) -> EvalResult {
    unary_double("abs", args, f64::abs)
}

fn max_int(args: &[Value], _: TypeId) -> EvalResult {
    let (a, b) = ints("max", args)?;
    Ok(Value::Int(a.max(b)))
}

fn max_double(args: &[Value], _: TypeId) -> EvalResult {
    let (a, b) = doubles("max", args)?;
    Ok(Value::Double(a.max(b)))
}

fn min_int(args: &[Value], _: TypeId) -> EvalResult {
    let (a, b) = ints("min", args)?;
    Ok(Value::Int(a.min(b)))
}

fn min_double(args: &[Value], _: TypeId) -> EvalResult {
    let (a, b) = doubles("min", args)?;
    Ok(Value::Double(a.min(b)))
}
