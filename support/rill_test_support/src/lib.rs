//! Shared helpers for Rill tests.
//!
//! - [`tokens`]: scan source text into a [`TokenList`](rill_ir::TokenList)
//! - [`fixtures`]: user-defined types layered over the built-in registry

pub mod fixtures;
mod lexer;

pub use fixtures::{registry, Fixtures};
pub use lexer::{tokens, try_tokens, LexError};
