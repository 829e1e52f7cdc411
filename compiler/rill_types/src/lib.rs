//! Value model and static type system for the Rill expression core.
//!
//! - [`Value`]: runtime values, including shared arrays and host objects
//! - [`EvalError`]: runtime diagnostics, distinct from parse diagnostics
//! - [`TypePool`]: interning of array types and generic instances
//! - [`TypeRegistry`]: the statically built table of types, members,
//!   operators, constructors, casts and global functions
//! - [`coerce`]: implicit and explicit conversion rules
//! - [`operators`]: choosing a dispatch plan for an operator application
//! - built-in binding tables (`string`, arrays, `Math`,
//!   generic collections)
//!
//! The registry is immutable once built and is shared by reference between
//! the reducer and any number of evaluating threads.

mod builtins;
pub mod coerce;
mod error;
pub mod operators;
mod pool;
mod registry;
mod value;

pub use error::{
    division_by_zero, host_failure, index_out_of_range, integer_overflow, invalid_cast,
    modulo_by_zero, null_reference, type_mismatch, undefined_variable, EvalError,
    EvalErrorKind, EvalResult,
};
pub use pool::{TypeData, TypePool};
pub use registry::{
    Callable, DefBuilder, DefId, HostFn, InsertKind, RegistryBuilder, ResolveError,
    ResolvedCall, ResolvedIndexer, ResolvedInsertion, ResolvedProperty, TypeRegistry, TypeSig,
};
pub use value::{ArrayRef, ObjectRef, Value};
