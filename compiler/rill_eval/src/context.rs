//! The storage contract between the evaluator and its host.

use rill_ir::{Name, TypeId};
use rill_types::{undefined_variable, EvalError, EvalResult, Value};

/// Typed access to identifier storage.
///
/// `ty` is the type the identifier was declared with at parse time. The
/// evaluator has already converted a stored value to that type.
pub trait RuntimeContext {
    fn get(&self, name: Name, ty: TypeId) -> EvalResult;

    fn set(&mut self, name: Name, ty: TypeId, value: Value) -> Result<(), EvalError>;
}

/// A context with no variables. Used when folding literal sub-expressions.
#[derive(Copy, Clone, Debug, Default)]
pub struct EmptyContext;

impl RuntimeContext for EmptyContext {
    fn get(&self, name: Name, _ty: TypeId) -> EvalResult {
        Err(undefined_variable(format!("{name:?}")))
    }

    fn set(&mut self, name: Name, _ty: TypeId, _value: Value) -> Result<(), EvalError> {
        Err(undefined_variable(format!("{name:?}")))
    }
}
