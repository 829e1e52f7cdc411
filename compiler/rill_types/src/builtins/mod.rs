//! Built-in binding tables.
//!
//! Installed by [`RegistryBuilder::with_builtins`]: members of `string`
//! and arrays, the `Math` and `Enumerable` static classes, the global
//! functions `abs`/`min`/`max`, and the generic collections `List<T>`,
//! `Stack<T>`, `Queue<T>` and `HashSet<T>`.

mod array;
mod collections;
mod math;
mod string;


use std::any::Any;

use crate::{host_failure, EvalError, RegistryBuilder, Value};

pub(crate) fn install(b: &mut RegistryBuilder) {
    string::install(b);
    array::install(b);
    math::install(b);
    collections::install(b);
}

/// Argument `i` of a host call. Missing arguments are a host failure.
fn arg<'a>(function: &str, args: &'a [Value], i: usize) -> Result<&'a Value, EvalError> {
    args.get(i)
        .ok_or_else(|| host_failure(function, format!("missing argument {i}")))
}

/// Run `f` on the receiver's host payload.
fn with_payload<T: Any, R>(
    function: &str,
    args: &[Value],
    f: impl FnOnce(&mut T) -> R,
) -> Result<R, EvalError> {
    arg(function, args, 0)?
        .to_object()?
        .write(f)
        .ok_or_else(|| host_failure(function, "receiver has an unexpected payload"))
}

fn len_to_value(len: usize) -> Value {
    Value::Int(i64::try_from(len).unwrap_or(i64::MAX))
}
