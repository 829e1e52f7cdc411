//! Members of `string`.
//!
//! Lengths and positions count characters.

use rill_ir::TypeId;

use super::{arg, len_to_value};
use crate::{index_out_of_range, EvalResult, RegistryBuilder, TypeSig, Value};

pub(super) fn install(b: &mut RegistryBuilder) {
    b.members(TypeId::STRING)
        .property("Length", TypeSig::INT, |args, _| {
            let s = arg("string.Length", args, 0)?.to_str()?;
            Ok(len_to_value(s.chars().count()))
        })
        .method("ToUpper", &[], TypeSig::STRING, |args, _| {
            let s = arg("string.ToUpper", args, 0)?.to_str()?;
            Ok(Value::from(s.to_uppercase()))
        })
        .method("ToLower", &[], TypeSig::STRING, |args, _| {
            let s = arg("string.ToLower", args, 0)?.to_str()?;
            Ok(Value::from(s.to_lowercase()))
        })
        .method("Contains", &[TypeSig::STRING], TypeSig::BOOL, |args, _| {
            let s = arg("string.Contains", args, 0)?.to_str()?;
            let needle = arg("string.Contains", args, 1)?.to_str()?;
            Ok(Value::Bool(s.contains(&**needle)))
        })
        .method("IndexOf", &[TypeSig::STRING], TypeSig::INT, |args, _| {
            let s = arg("string.IndexOf", args, 0)?.to_str()?;
            let needle = arg("string.IndexOf", args, 1)?.to_str()?;
            Ok(match s.find(&**needle) {
                Some(byte) => len_to_value(s[..byte].chars().count()),
                None => Value::Int(-1),
            })
        })
        .method("Substring", &[TypeSig::INT], TypeSig::STRING, |args, _| {
            let s = arg("string.Substring", args, 0)?.to_str()?;
            let start = arg("string.Substring", args, 1)?.to_int()?;
            let len = i64::try_from(s.chars().count()).unwrap_or(i64::MAX);
            substring(s, start, len - start)
        })
        .method(
            "Substring",
            &[TypeSig::INT, TypeSig::INT],
            TypeSig::STRING,
            |args, _| {
                let s = arg("string.Substring", args, 0)?.to_str()?;
                let start = arg("string.Substring", args, 1)?.to_int()?;
                let count = arg("string.Substring", args, 2)?.to_int()?;
                substring(s, start, count)
            },
        );
}

fn substring(s: &str, start: i64, count: i64) -> EvalResult {
    let total = s.chars().count();
    let end = start.checked_add(count).unwrap_or(i64::MAX);
    let in_range = |i: i64| usize::try_from(i).is_ok_and(|i| i <= total);
    if !in_range(start) {
        return Err(index_out_of_range(start, total));
    }
    if count < 0 || !in_range(end) {
        return Err(index_out_of_range(end, total));
    }
    let (start, count) = (
        usize::try_from(start).unwrap_or(0),
        usize::try_from(count).unwrap_or(0),
    );
    Ok(Value::from(s.chars().skip(start).take(count).collect::<String>()))
}
