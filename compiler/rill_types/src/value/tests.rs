use pretty_assertions::assert_eq;

use super::*;
use crate::EvalErrorKind;

#[test]
fn text_forms() {
    assert_eq!(Value::Int(-5).to_string(), "-5");
    assert_eq!(Value::Double(3.5).to_string(), "3.5");
    assert_eq!(Value::Double(2.0).to_string(), "2");
    assert_eq!(Value::Double(0.1).to_string(), "0.1");
    assert_eq!(Value::Bool(true).to_string(), "True");
    assert_eq!(Value::Bool(false).to_string(), "False");
    assert_eq!(Value::string("hi").to_string(), "hi");
    assert_eq!(Value::Null.to_string(), "");
}

#[test]
fn defaults() {
    assert_eq!(Value::default_for(TypeId::INT), Value::Int(0));
    assert_eq!(Value::default_for(TypeId::DOUBLE), Value::Double(0.0));
    assert_eq!(Value::default_for(TypeId::BOOL), Value::Bool(false));
    assert_eq!(Value::default_for(TypeId::STRING), Value::Null);
}

#[test]
fn promotion_only_widens_ints() {
    assert_eq!(Value::Int(3).promote(TypeId::DOUBLE), Value::Double(3.0));
    assert_eq!(Value::Int(3).promote(TypeId::INT), Value::Int(3));
    assert_eq!(Value::Bool(true).promote(TypeId::DOUBLE), Value::Bool(true));
}

#[test]
fn loose_equality() {
    assert!(Value::Int(2).loose_eq(&Value::Double(2.0)));
    assert!(Value::string("a").loose_eq(&Value::string("a")));
    assert!(!Value::Int(1).loose_eq(&Value::Bool(true)));
    assert!(Value::Null.loose_eq(&Value::Null));

    let ty = TypeId::from_raw(TypeId::FIRST_COMPOUND);
    let a = ArrayRef::new(ty, vec![Value::Int(1)]);
    let b = ArrayRef::new(ty, vec![Value::Int(1)]);
    assert!(Value::Array(a.clone()).loose_eq(&Value::Array(a.clone())));
    assert!(!Value::Array(a).loose_eq(&Value::Array(b)));
}

#[test]
fn array_bounds() {
    let arr = ArrayRef::new(TypeId::from_raw(TypeId::FIRST_COMPOUND), vec![Value::Int(0); 3]);
    arr.set(2, Value::Int(7)).unwrap();
    assert_eq!(arr.get(2).unwrap(), Value::Int(7));

    let err = arr.get(3).unwrap_err();
    assert_eq!(err.kind, EvalErrorKind::IndexOutOfRange { index: 3, len: 3 });
    let err = arr.set(-1, Value::Int(1)).unwrap_err();
    assert_eq!(err.kind, EvalErrorKind::IndexOutOfRange { index: -1, len: 3 });
}

#[test]
fn arrays_alias_through_clones() {
    let arr = ArrayRef::new(TypeId::from_raw(TypeId::FIRST_COMPOUND), vec![Value::Int(0)]);
    let alias = arr.clone();
    alias.set(0, Value::Int(9)).unwrap();
    assert_eq!(arr.get(0).unwrap(), Value::Int(9));
}

#[test]
fn object_payload_downcast() {
    let obj = ObjectRef::new(TypeId::from_raw(TypeId::FIRST_COMPOUND), vec![1_i64, 2]);
    assert!(obj.is::<Vec<i64>>());
    assert_eq!(obj.read(|v: &Vec<i64>| v.len()), Some(2));
    assert_eq!(obj.write(|v: &mut Vec<i64>| v.push(3)), Some(()));
    assert_eq!(obj.read(|v: &Vec<i64>| v.clone()), Some(vec![1, 2, 3]));
    assert_eq!(obj.read(|s: &String| s.len()), None);
}

#[test]
fn conversions_report_mismatch() {
    let err = Value::Bool(true).to_int().unwrap_err();
    assert_eq!(
        err.kind,
        EvalErrorKind::TypeMismatch {
            expected: "int".into(),
            found: "bool".into()
        }
    );
    assert_eq!(Value::Int(4).to_double().unwrap(), 4.0);
    assert!(matches!(
        Value::Null.to_str().unwrap_err().kind,
        EvalErrorKind::NullReference { .. }
    ));
}
