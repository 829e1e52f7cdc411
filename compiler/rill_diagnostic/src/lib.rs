//! Diagnostics for malformed expressions.
//!
//! Every parse-time failure is a [`Diagnostic`]:
//! - an [`ErrorCode`] for searchability
//! - a message saying what went wrong
//! - a primary label at the offending token
//! - notes carrying context (the source line, candidate overloads)
//!
//! Runtime failures are a separate kind and live with the value model in
//! `rill_types`.

mod diagnostic;
mod error_code;

pub use diagnostic::{
    ambiguous_overload, expected_expression, missing_operand, not_modifiable, type_mismatch,
    unclosed_delimiter, unexpected_token, unknown_identifier, unknown_member,
    unsupported_operator, Diagnostic, Label,
};
pub use error_code::ErrorCode;
