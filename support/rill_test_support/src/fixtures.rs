//! User types registered on top of the built-in tables.
//!
//! - `Vec2`: a value-like type with operator overloads
//! - `Shape` with derived `Circle` and `Square`: inheritance and checked casts

use std::f64::consts::PI;
use std::sync::Arc;

use rill_ir::{BinaryOp, StringInterner, TypeId, UnaryOp};
use rill_types::{
    host_failure, EvalError, EvalResult, ObjectRef, RegistryBuilder, TypeRegistry, TypeSig,
    Value,
};

/// Host payload of a `Vec2` object.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Circle {
    pub radius: f64,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Square {
    pub side: f64,
}

/// A registry with the built-ins plus every fixture type.
pub struct Fixtures {
    pub registry: TypeRegistry,
    pub vec2: TypeId,
    pub shape: TypeId,
    pub circle: TypeId,
    pub square: TypeId,
}

pub fn registry() -> Fixtures {
    let mut b = RegistryBuilder::with_builtins(Arc::new(StringInterner::new()));
    let vec2 = install_vec2(&mut b);
    let (shape, circle, square) = install_shapes(&mut b);
    Fixtures {
        registry: b.build(),
        vec2,
        shape,
        circle,
        square,
    }
}

fn arg<'a>(function: &str, args: &'a [Value], i: usize) -> Result<&'a Value, EvalError> {
    args.get(i)
        .ok_or_else(|| host_failure(function, format!("missing argument {i}")))
}

fn read<T: Copy + 'static>(function: &str, args: &[Value], i: usize) -> Result<T, EvalError> {
    arg(function, args, i)?
        .to_object()?
        .read(|payload: &T| *payload)
        .ok_or_else(|| host_failure(function, "unexpected payload"))
}

/// The `Vec2` payload of a value, if it is one.
pub fn vec2_of(value: &Value) -> Option<Vec2> {
    match value {
        Value::Object(obj) => obj.read(|v: &Vec2| *v),
        _ => None,
    }
}

fn new_vec2(ty: TypeId, x: f64, y: f64) -> Value {
    Value::Object(ObjectRef::new(ty, Vec2 { x, y }))
}

fn set_vec2(args: &[Value], f: impl FnOnce(&mut Vec2, f64)) -> EvalResult {
    let value = arg("Vec2.set", args, 1)?.to_double()?;
    arg("Vec2.set", args, 0)?
        .to_object()?
        .write(|v: &mut Vec2| f(v, value))
        .ok_or_else(|| host_failure("Vec2.set", "unexpected payload"))?;
    Ok(Value::Void)
}

/// Register `Vec2` with a `(double, double)` constructor, read-write `X`
/// and `Y`, `Length()`, `ToString()`, a static `Zero`, and the operators
/// `+`, `-`, `*` (by a scalar on either side), unary `-` and `==`.
pub fn install_vec2(b: &mut RegistryBuilder) -> TypeId {
    let vec2 = b.declare_type("Vec2");
    let sig = TypeSig::from(vec2);
    b.members(vec2)
        .constructor(&[TypeSig::DOUBLE, TypeSig::DOUBLE], |args, ty| {
            let x = arg("Vec2.ctor", args, 0)?.to_double()?;
            let y = arg("Vec2.ctor", args, 1)?.to_double()?;
            Ok(new_vec2(ty, x, y))
        })
        .property_rw(
            "X",
            TypeSig::DOUBLE,
            |args, _| Ok(Value::Double(read::<Vec2>("Vec2.X", args, 0)?.x)),
            |args, _| set_vec2(args, |v, x| v.x = x),
        )
        .property_rw(
            "Y",
            TypeSig::DOUBLE,
            |args, _| Ok(Value::Double(read::<Vec2>("Vec2.Y", args, 0)?.y)),
            |args, _| set_vec2(args, |v, y| v.y = y),
        )
        .method("Length", &[], TypeSig::DOUBLE, |args, _| {
            let v = read::<Vec2>("Vec2.Length", args, 0)?;
            Ok(Value::Double(v.x.hypot(v.y)))
        })
        .method("ToString", &[], TypeSig::STRING, |args, _| {
            let v = read::<Vec2>("Vec2.ToString", args, 0)?;
            Ok(Value::string(&format!("({}, {})", v.x, v.y)))
        })
        .static_property("Zero", sig, |_, ty| Ok(new_vec2(ty, 0.0, 0.0)))
        .binary_operator(BinaryOp::Add, sig, sig, sig, |args, ty| {
            let (a, b) = (read::<Vec2>("+", args, 0)?, read::<Vec2>("+", args, 1)?);
            Ok(new_vec2(ty, a.x + b.x, a.y + b.y))
        })
        .binary_operator(BinaryOp::Sub, sig, sig, sig, |args, ty| {
            let (a, b) = (read::<Vec2>("-", args, 0)?, read::<Vec2>("-", args, 1)?);
            Ok(new_vec2(ty, a.x - b.x, a.y - b.y))
        })
        .binary_operator(BinaryOp::Mul, sig, TypeSig::DOUBLE, sig, |args, ty| {
            let v = read::<Vec2>("*", args, 0)?;
            let k = arg("*", args, 1)?.to_double()?;
            Ok(new_vec2(ty, v.x * k, v.y * k))
        })
        .binary_operator(BinaryOp::Mul, TypeSig::DOUBLE, sig, sig, |args, ty| {
            let k = arg("*", args, 0)?.to_double()?;
            let v = read::<Vec2>("*", args, 1)?;
            Ok(new_vec2(ty, v.x * k, v.y * k))
        })
        .binary_operator(BinaryOp::Eq, sig, sig, TypeSig::BOOL, |args, _| {
            let (a, b) = (read::<Vec2>("==", args, 0)?, read::<Vec2>("==", args, 1)?);
            Ok(Value::Bool(a == b))
        })
        .unary_operator(UnaryOp::Neg, sig, sig, |args, ty| {
            let v = read::<Vec2>("-", args, 0)?;
            Ok(new_vec2(ty, -v.x, -v.y))
        });
    vec2
}

/// Register `Shape` (with `Area()`) and the derived `Circle(double)` with
/// read-write `Radius` and `Square(double)` with `Side`.
pub fn install_shapes(b: &mut RegistryBuilder) -> (TypeId, TypeId, TypeId) {
    let shape = b.declare_type("Shape");
    let circle = b.declare_type("Circle");
    let square = b.declare_type("Square");

    b.members(shape).method("Area", &[], TypeSig::DOUBLE, |args, _| {
        let obj = arg("Shape.Area", args, 0)?.to_object()?;
        obj.read(|c: &Circle| PI * c.radius * c.radius)
            .or_else(|| obj.read(|s: &Square| s.side * s.side))
            .map(Value::Double)
            .ok_or_else(|| host_failure("Shape.Area", "unknown shape"))
    });
    b.members(circle)
        .base(shape)
        .constructor(&[TypeSig::DOUBLE], |args, ty| {
            let radius = arg("Circle.ctor", args, 0)?.to_double()?;
            Ok(Value::Object(ObjectRef::new(ty, Circle { radius })))
        })
        .property_rw(
            "Radius",
            TypeSig::DOUBLE,
            |args, _| Ok(Value::Double(read::<Circle>("Circle.Radius", args, 0)?.radius)),
            |args, _| {
                let radius = arg("Circle.Radius", args, 1)?.to_double()?;
                arg("Circle.Radius", args, 0)?
                    .to_object()?
                    .write(|c: &mut Circle| c.radius = radius)
                    .ok_or_else(|| host_failure("Circle.Radius", "unexpected payload"))?;
                Ok(Value::Void)
            },
        );
    b.members(square)
        .base(shape)
        .constructor(&[TypeSig::DOUBLE], |args, ty| {
            let side = arg("Square.ctor", args, 0)?.to_double()?;
            Ok(Value::Object(ObjectRef::new(ty, Square { side })))
        })
        .property("Side", TypeSig::DOUBLE, |args, _| {
            Ok(Value::Double(read::<Square>("Square.Side", args, 0)?.side))
        });
    (shape, circle, square)
}
