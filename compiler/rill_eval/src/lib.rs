//! Rill evaluator.
//!
//! Walks an immutable [`ExprArena`](rill_ir::ExprArena) produced by the
//! reducer. Every type check and dispatch decision was made when the tree
//! was built, so evaluation is a direct interpretation of each node's
//! recorded plan. Variables live in a caller-supplied [`RuntimeContext`];
//! [`Environment`] is the default map-backed implementation.
//!
//! Evaluation is reentrant: an arena and registry may be evaluated from
//! any number of threads at once, each with its own context.

mod context;
mod environment;
mod evaluator;
mod operators;
mod unary_operators;

pub use context::{EmptyContext, RuntimeContext};
pub use environment::{Binding, Environment};
pub use evaluator::Evaluator;
pub use operators::evaluate_binary;
pub use unary_operators::{evaluate_unary, step};
