use std::sync::Arc;

use pretty_assertions::assert_eq;
use rill_ir::{StringInterner, TypeId};
use rill_types::{EvalErrorKind, Value};

use super::*;

fn env() -> (Environment, Name) {
    let interner = Arc::new(StringInterner::new());
    let x = interner.intern("x");
    let mut env = Environment::new(interner);
    env.define(x, TypeId::INT, Value::Int(1));
    (env, x)
}

#[test]
fn get_and_set_declared_variable() {
    let (mut env, x) = env();
    assert_eq!(env.get(x, TypeId::INT), Ok(Value::Int(1)));
    env.set(x, TypeId::INT, Value::Int(5)).unwrap();
    assert_eq!(env.value("x"), Some(&Value::Int(5)));
    assert_eq!(env.len(), 1);
}

#[test]
fn undeclared_variable_is_named() {
    let (env, _) = env();
    let y = env.interner.intern("y");
    let err = env.get(y, TypeId::INT).unwrap_err();
    assert_eq!(err.kind, EvalErrorKind::UndefinedVariable { name: "y".into() });
}

#[test]
fn access_with_another_type_is_rejected() {
    let (mut env, x) = env();
    assert!(env.get(x, TypeId::DOUBLE).is_err());
    assert!(env.set(x, TypeId::STRING, Value::string("s")).is_err());
    assert_eq!(env.value("x"), Some(&Value::Int(1)));
}
