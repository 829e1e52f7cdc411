//! Runtime diagnostics.
//!
//! Parse-time validation is meant to be exhaustive, so a `TypeMismatch`
//! reaching the evaluator indicates a defect in validation rather than bad
//! input. The remaining kinds are genuine runtime conditions: arithmetic
//! faults, bad indices, nulls and failures reported by host callables.

use rill_ir::Span;

use crate::Value;

/// Result of evaluation.
pub type EvalResult = Result<Value, EvalError>;

/// Typed runtime error category.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EvalErrorKind {
    #[error("type mismatch: expected `{expected}`, found `{found}`")]
    TypeMismatch { expected: String, found: String },

    #[error("division by zero")]
    DivisionByZero,

    #[error("modulo by zero")]
    ModuloByZero,

    #[error("integer overflow in {operation}")]
    IntegerOverflow { operation: &'static str },

    #[error("index {index} is out of range for length {len}")]
    IndexOutOfRange { index: i64, len: usize },

    #[error("null reference in {context}")]
    NullReference { context: String },

    #[error("cannot cast `{from}` to `{to}`")]
    InvalidCast { from: String, to: String },

    #[error("{function}: {message}")]
    Host { function: String, message: String },

    #[error("undefined variable `{name}`")]
    UndefinedVariable { name: String },
}

/// Runtime error with the span of the node that raised it.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{kind}")]
pub struct EvalError {
    pub kind: EvalErrorKind,
    pub span: Option<Span>,
}

impl EvalError {
    pub fn new(kind: EvalErrorKind) -> Self {
        EvalError { kind, span: None }
    }

    /// Attach a span unless one is already recorded.
    ///
    /// The innermost node that fails keeps its location as the error
    /// propagates outwards.
    #[must_use]
    pub fn with_span(mut self, span: Span) -> Self {
        if self.span.is_none() {
            self.span = Some(span);
        }
        self
    }
}

impl From<EvalErrorKind> for EvalError {
    fn from(kind: EvalErrorKind) -> Self {
        EvalError::new(kind)
    }
}

pub fn type_mismatch(expected: impl Into<String>, found: impl Into<String>) -> EvalError {
    EvalError::new(EvalErrorKind::TypeMismatch {
        expected: expected.into(),
        found: found.into(),
    })
}

pub fn division_by_zero() -> EvalError {
    EvalError::new(EvalErrorKind::DivisionByZero)
}

pub fn modulo_by_zero() -> EvalError {
    EvalError::new(EvalErrorKind::ModuloByZero)
}

pub fn integer_overflow(operation: &'static str) -> EvalError {
    EvalError::new(EvalErrorKind::IntegerOverflow { operation })
}

pub fn index_out_of_range(index: i64, len: usize) -> EvalError {
    EvalError::new(EvalErrorKind::IndexOutOfRange { index, len })
}

pub fn null_reference(context: impl Into<String>) -> EvalError {
    EvalError::new(EvalErrorKind::NullReference {
        context: context.into(),
    })
}

pub fn invalid_cast(from: impl Into<String>, to: impl Into<String>) -> EvalError {
    EvalError::new(EvalErrorKind::InvalidCast {
        from: from.into(),
        to: to.into(),
    })
}

/// Failure reported by a host callable.
pub fn host_failure(function: impl Into<String>, message: impl Into<String>) -> EvalError {
    EvalError::new(EvalErrorKind::Host {
        function: function.into(),
        message: message.into(),
    })
}

pub fn undefined_variable(name: impl Into<String>) -> EvalError {
    EvalError::new(EvalErrorKind::UndefinedVariable { name: name.into() })
}
