//! Runtime values.
//!
//! Primitives are stored inline. Strings are shared immutable `Arc<str>`.
//! Arrays and host objects are shared handles with interior locking, so a
//! value copied out of one variable aliases the same storage as the
//! original, and an element or property write through either handle is
//! visible through both.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use rill_ir::TypeId;

use crate::{index_out_of_range, null_reference, type_mismatch, EvalError};

#[cfg(test)]
mod tests;

/// A runtime value.
#[derive(Clone)]
pub enum Value {
    Int(i64),
    Double(f64),
    Bool(bool),
    Str(Arc<str>),
    Array(ArrayRef),
    Object(ObjectRef),
    /// Absent reference. Convertible into any reference type.
    Null,
    /// Result of an executable node that produces nothing.
    Void,
}

impl Value {
    pub fn string(s: &str) -> Self {
        Value::Str(Arc::from(s))
    }

    /// Default value of a type: zero for numbers, `false`, null otherwise.
    pub fn default_for(ty: TypeId) -> Self {
        match ty {
            TypeId::INT => Value::Int(0),
            TypeId::DOUBLE => Value::Double(0.0),
            TypeId::BOOL => Value::Bool(false),
            _ => Value::Null,
        }
    }

    /// The dynamic type of the value. `None` for null.
    pub fn runtime_type(&self) -> Option<TypeId> {
        match self {
            Value::Int(_) => Some(TypeId::INT),
            Value::Double(_) => Some(TypeId::DOUBLE),
            Value::Bool(_) => Some(TypeId::BOOL),
            Value::Str(_) => Some(TypeId::STRING),
            Value::Array(a) => Some(a.ty()),
            Value::Object(o) => Some(o.ty()),
            Value::Null => None,
            Value::Void => Some(TypeId::VOID),
        }
    }

    /// Short name of the value's variant, for error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Int(_) => "int",
            Value::Double(_) => "double",
            Value::Bool(_) => "bool",
            Value::Str(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
            Value::Null => "null",
            Value::Void => "void",
        }
    }

    /// Apply implicit `int` to `double` promotion when `ty` asks for it.
    #[must_use]
    pub fn promote(self, ty: TypeId) -> Self {
        match self {
            Value::Int(n) if ty == TypeId::DOUBLE => Value::Double(n as f64),
            other => other,
        }
    }

    pub fn to_int(&self) -> Result<i64, EvalError> {
        match self {
            Value::Int(n) => Ok(*n),
            other => Err(type_mismatch("int", other.kind_name())),
        }
    }

    /// Read a double, promoting an int.
    pub fn to_double(&self) -> Result<f64, EvalError> {
        match self {
            Value::Double(d) => Ok(*d),
            Value::Int(n) => Ok(*n as f64),
            other => Err(type_mismatch("double", other.kind_name())),
        }
    }

    pub fn to_bool(&self) -> Result<bool, EvalError> {
        match self {
            Value::Bool(b) => Ok(*b),
            other => Err(type_mismatch("bool", other.kind_name())),
        }
    }

    pub fn to_str(&self) -> Result<&Arc<str>, EvalError> {
        match self {
            Value::Str(s) => Ok(s),
            Value::Null => Err(null_reference("string access")),
            other => Err(type_mismatch("string", other.kind_name())),
        }
    }

    pub fn to_array(&self) -> Result<&ArrayRef, EvalError> {
        match self {
            Value::Array(a) => Ok(a),
            Value::Null => Err(null_reference("array access")),
            other => Err(type_mismatch("array", other.kind_name())),
        }
    }

    pub fn to_object(&self) -> Result<&ObjectRef, EvalError> {
        match self {
            Value::Object(o) => Ok(o),
            Value::Null => Err(null_reference("member access")),
            other => Err(type_mismatch("object", other.kind_name())),
        }
    }

    /// Default equality: value equality for primitives (with numeric
    /// promotion) and strings, identity for arrays and objects.
    pub fn loose_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Int(a), Value::Double(b)) | (Value::Double(b), Value::Int(a)) => {
                (*a as f64) == *b
            }
            _ => self == other,
        }
    }
}

/// Structural for primitives, identity for shared handles.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Double(a), Value::Double(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a.ptr_eq(b),
            (Value::Object(a), Value::Object(b)) => a.ptr_eq(b),
            (Value::Null, Value::Null) | (Value::Void, Value::Void) => true,
            _ => false,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "Int({n})"),
            Value::Double(d) => write!(f, "Double({d:?})"),
            Value::Bool(b) => write!(f, "Bool({b})"),
            Value::Str(s) => write!(f, "Str({s:?})"),
            Value::Array(a) => write!(f, "{a:?}"),
            Value::Object(o) => write!(f, "{o:?}"),
            Value::Null => write!(f, "Null"),
            Value::Void => write!(f, "Void"),
        }
    }
}

/// Natural text form used by string concatenation.
///
/// Arrays and objects render by type name, which needs the registry; see
/// `TypeRegistry::to_text`.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "{n}"),
            Value::Double(d) => write!(f, "{d}"),
            Value::Bool(true) => write!(f, "True"),
            Value::Bool(false) => write!(f, "False"),
            Value::Str(s) => f.write_str(s),
            Value::Array(_) => f.write_str("array"),
            Value::Object(_) => f.write_str("object"),
            Value::Null | Value::Void => Ok(()),
        }
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<f64> for Value {
    fn from(d: f64) -> Self {
        Value::Double(d)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::string(s)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(Arc::from(s))
    }
}

/// Shared, interior-mutable array storage tagged with its array type.
#[derive(Clone)]
pub struct ArrayRef {
    ty: TypeId,
    elems: Arc<RwLock<Vec<Value>>>,
}

impl ArrayRef {
    /// `ty` is the array type (`T[]`), not the element type.
    pub fn new(ty: TypeId, elems: Vec<Value>) -> Self {
        ArrayRef {
            ty,
            elems: Arc::new(RwLock::new(elems)),
        }
    }

    pub fn ty(&self) -> TypeId {
        self.ty
    }

    pub fn len(&self) -> usize {
        self.elems.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.elems.read().is_empty()
    }

    pub fn get(&self, index: i64) -> Result<Value, EvalError> {
        let elems = self.elems.read();
        usize::try_from(index)
            .ok()
            .and_then(|i| elems.get(i))
            .cloned()
            .ok_or_else(|| index_out_of_range(index, elems.len()))
    }

    pub fn set(&self, index: i64, value: Value) -> Result<(), EvalError> {
        let mut elems = self.elems.write();
        let len = elems.len();
        let slot = usize::try_from(index)
            .ok()
            .and_then(|i| elems.get_mut(i))
            .ok_or_else(|| index_out_of_range(index, len))?;
        *slot = value;
        Ok(())
    }

    /// Copy of the current elements.
    pub fn to_vec(&self) -> Vec<Value> {
        self.elems.read().clone()
    }

    pub fn ptr_eq(&self, other: &ArrayRef) -> bool {
        Arc::ptr_eq(&self.elems, &other.elems)
    }
}

impl fmt::Debug for ArrayRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Array")
            .field("ty", &self.ty)
            .field("elems", &*self.elems.read())
            .finish()
    }
}

type Payload = Box<dyn Any + Send + Sync>;

/// Shared handle to a host object, tagged with its registered type.
///
/// The payload is any `Send + Sync` Rust value; host callables downcast it
/// with [`read`](Self::read) and [`write`](Self::write).
#[derive(Clone)]
pub struct ObjectRef {
    ty: TypeId,
    data: Arc<RwLock<Payload>>,
}

impl ObjectRef {
    pub fn new<T: Any + Send + Sync>(ty: TypeId, payload: T) -> Self {
        ObjectRef {
            ty,
            data: Arc::new(RwLock::new(Box::new(payload))),
        }
    }

    pub fn ty(&self) -> TypeId {
        self.ty
    }

    /// Whether the payload is a `T`.
    pub fn is<T: Any>(&self) -> bool {
        self.data.read().is::<T>()
    }

    /// Borrow the payload as `T`. `None` if it is some other type.
    pub fn read<T: Any, R>(&self, f: impl FnOnce(&T) -> R) -> Option<R> {
        let guard = self.data.read();
        guard.downcast_ref::<T>().map(f)
    }

    /// Mutably borrow the payload as `T`. `None` if it is some other type.
    pub fn write<T: Any, R>(&self, f: impl FnOnce(&mut T) -> R) -> Option<R> {
        let mut guard = self.data.write();
        guard.downcast_mut::<T>().map(f)
    }

    pub fn ptr_eq(&self, other: &ObjectRef) -> bool {
        Arc::ptr_eq(&self.data, &other.data)
    }
}

impl fmt::Debug for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Object({:?} @ {:p})", self.ty, Arc::as_ptr(&self.data))
    }
}
