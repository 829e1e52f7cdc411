use std::sync::Arc;

use pretty_assertions::assert_eq;
use rill_ir::{CastPlan, StringInterner, TypeId};

use super::*;
use crate::{EvalErrorKind, ObjectRef, RegistryBuilder};

struct Fixture {
    reg: TypeRegistry,
    animal: TypeId,
    dog: TypeId,
}

fn fixture() -> Fixture {
    let mut b = RegistryBuilder::with_builtins(Arc::new(StringInterner::new()));
    let animal = b.declare_type("Animal");
    let dog = b.declare_type("Dog");
    b.members(dog).base(animal);
    b.cast(TypeId::STRING, TypeId::INT, |args, _| {
        let s = args[0].to_str()?;
        s.trim()
            .parse::<i64>()
            .map(Value::Int)
            .map_err(|e| crate::host_failure("int.Parse", e.to_string()))
    });
    Fixture {
        reg: b.build(),
        animal,
        dog,
    }
}

#[test]
fn implicit_costs_rank_conversions() {
    let f = fixture();
    assert_eq!(implicit_cost(&f.reg, TypeId::INT, TypeId::INT), Some(0));
    assert_eq!(implicit_cost(&f.reg, TypeId::INT, TypeId::DOUBLE), Some(1));
    assert_eq!(implicit_cost(&f.reg, f.dog, f.animal), Some(2));
    assert_eq!(implicit_cost(&f.reg, TypeId::BOOL, TypeId::OBJECT), Some(3));
    assert_eq!(implicit_cost(&f.reg, TypeId::DOUBLE, TypeId::INT), None);
    assert_eq!(implicit_cost(&f.reg, f.animal, f.dog), None);
    assert_eq!(implicit_cost(&f.reg, TypeId::VOID, TypeId::OBJECT), None);
}

#[test]
fn explicit_cast_plans() {
    let f = fixture();
    let plan = |from, to| explicit_cast(&f.reg, from, to);
    assert_eq!(plan(TypeId::INT, TypeId::INT), Some(CastPlan::Identity));
    assert_eq!(plan(TypeId::INT, TypeId::DOUBLE), Some(CastPlan::IntToDouble));
    assert_eq!(plan(TypeId::DOUBLE, TypeId::INT), Some(CastPlan::DoubleToInt));
    assert_eq!(plan(f.dog, f.animal), Some(CastPlan::Identity));
    assert_eq!(plan(f.animal, f.dog), Some(CastPlan::Checked(f.dog)));
    assert_eq!(plan(TypeId::OBJECT, TypeId::STRING), Some(CastPlan::Checked(TypeId::STRING)));
    assert!(matches!(plan(TypeId::STRING, TypeId::INT), Some(CastPlan::Host(_))));
    assert_eq!(plan(TypeId::BOOL, TypeId::INT), None);
    assert_eq!(plan(TypeId::INT, TypeId::VOID), None);
}

#[test]
fn double_to_int_truncates_toward_zero() {
    let f = fixture();
    let cast = |d: f64| apply_cast(&f.reg, CastPlan::DoubleToInt, Value::Double(d), TypeId::INT);
    assert_eq!(cast(3.9), Ok(Value::Int(3)));
    assert_eq!(cast(-3.9), Ok(Value::Int(-3)));
    for bad in [f64::NAN, f64::INFINITY, 1e19, -1e19] {
        let err = cast(bad).unwrap_err();
        assert_eq!(err.kind, EvalErrorKind::IntegerOverflow { operation: "conversion" });
    }
}

#[test]
fn checked_casts_verify_the_runtime_type() {
    let f = fixture();
    let rex = Value::Object(ObjectRef::new(f.dog, ()));
    let generic = Value::Object(ObjectRef::new(f.animal, ()));

    let ok = apply_cast(&f.reg, CastPlan::Checked(f.dog), rex.clone(), f.dog);
    assert_eq!(ok, Ok(rex));

    let err = apply_cast(&f.reg, CastPlan::Checked(f.dog), generic, f.dog).unwrap_err();
    assert_eq!(
        err.kind,
        EvalErrorKind::InvalidCast {
            from: "Animal".into(),
            to: "Dog".into()
        }
    );

    let boxed_int = apply_cast(&f.reg, CastPlan::Checked(TypeId::DOUBLE), Value::Int(2), TypeId::DOUBLE);
    assert_eq!(boxed_int, Ok(Value::Double(2.0)));

    let null = apply_cast(&f.reg, CastPlan::Checked(TypeId::STRING), Value::Null, TypeId::STRING);
    assert_eq!(null, Ok(Value::Null));
}

#[test]
fn host_casts_run_the_registered_callable() {
    let f = fixture();
    let Some(plan) = explicit_cast(&f.reg, TypeId::STRING, TypeId::INT) else {
        panic!("string to int cast is registered");
    };
    assert_eq!(
        apply_cast(&f.reg, plan, Value::string(" 42 "), TypeId::INT),
        Ok(Value::Int(42))
    );
    let err = apply_cast(&f.reg, plan, Value::string("x"), TypeId::INT).unwrap_err();
    assert!(matches!(err.kind, EvalErrorKind::Host { .. }));
}

#[test]
fn conformance() {
    let f = fixture();
    assert!(value_conforms(&f.reg, &Value::Int(1), TypeId::OBJECT));
    assert!(value_conforms(&f.reg, &Value::Null, TypeId::STRING));
    assert!(!value_conforms(&f.reg, &Value::Null, TypeId::INT));
    assert!(!value_conforms(&f.reg, &Value::Int(1), TypeId::DOUBLE));
    assert_eq!(runtime_type_name(&f.reg, &Value::Null), "null");
}
