//! Rill IR - core data structures for the expression core.
//!
//! This crate contains the types shared by every other Rill crate:
//! - Spans for source locations
//! - Names for interned identifiers
//! - Tokens and `TokenList` (the lexer boundary)
//! - Parsed (syntactic) type references
//! - `TypeId`, the fixed value-type tag every node carries
//! - Operator enums and the static dispatch plans chosen at parse time
//! - The flat expression arena (`ExprArena`, `ExprId`, `ExprKind`)
//!
//! # Design Philosophy
//!
//! - **Intern Everything**: Strings → Name(u32), Types → TypeId(u32)
//! - **Flatten Everything**: No Box<Expr>, use ExprId(u32) indices
//! - **Decide Once**: every type check and operator dispatch decision is
//!   recorded in the node at construction; evaluation never re-checks.
//!
//! Types that contain floats store them as u64 bits for Hash compatibility.

/// Compile-time assertion that a type has a specific size.
///
/// Used to prevent accidental size regressions in frequently-allocated types.
#[macro_export]
macro_rules! static_assert_size {
    ($ty:ty, $size:expr) => {
        const _: [(); $size] = [(); ::std::mem::size_of::<$ty>()];
    };
}

mod expr;
mod interner;
mod name;
mod ops;
mod parsed_type;
mod span;
mod token;
mod type_id;

pub use expr::{CallableId, ExprArena, ExprId, ExprKind, ExprRange};
pub use interner::{InternError, StringInterner};
pub use name::Name;
pub use ops::{
    AssignOp, BinaryOp, BinaryPlan, CastPlan, IncDecOp, UnaryOp, UnaryPlan,
};
pub use parsed_type::ParsedType;
pub use span::{Span, SpanError};
pub use token::{Token, TokenKind, TokenList};
pub use type_id::TypeId;
