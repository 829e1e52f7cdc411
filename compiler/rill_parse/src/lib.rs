//! Rill reducer.
//!
//! Turns an already-lexed [`TokenList`] into a typed expression tree in a
//! flat [`ExprArena`]. Parsing is a collection scan followed by one
//! reduction pass per operator category; see [`Parser`].
//!
//! ```text
//! tokens ──collect──▶ units ──16 passes──▶ one node
//! ```
//!
//! Identifiers are classified by the host's [`CompilationContext`]; types,
//! members, operators and conversions come from the
//! [`TypeRegistry`](rill_types::TypeRegistry).

mod context;
mod cursor;
mod error;
mod options;
mod parser;
mod unit;

#[cfg(test)]
mod tests;

pub use context::{CompilationContext, Constant, Identifier, Scope};
pub use error::ParseError;
pub use options::ParseOptions;
pub use parser::Parser;
pub use unit::UnitFlags;

use rill_ir::{ExprArena, ExprId, TokenList, TypeId};
use rill_types::TypeRegistry;

/// A reduced expression: the arena holding its nodes and the root, if the
/// expression was not empty.
#[derive(Clone, Debug)]
pub struct ParsedExpr {
    pub arena: ExprArena,
    pub root: Option<ExprId>,
}

impl ParsedExpr {
    /// The root's static type; `void` for an empty expression.
    pub fn ty(&self) -> TypeId {
        self.root.map_or(TypeId::VOID, |root| self.arena.ty(root))
    }

    pub fn capabilities(&self) -> UnitFlags {
        self.root
            .map_or(UnitFlags::empty(), |root| UnitFlags::of_node(&self.arena, root))
    }

    pub fn is_gettable(&self) -> bool {
        self.capabilities().contains(UnitFlags::GETTABLE)
    }

    pub fn is_settable(&self) -> bool {
        self.capabilities().contains(UnitFlags::SETTABLE)
    }

    pub fn is_executable(&self) -> bool {
        self.capabilities().contains(UnitFlags::EXECUTABLE)
    }
}

/// Reduce a whole token stream to one expression.
///
/// Unlike [`Parser::parse_expression`], every token must be consumed.
pub fn parse_expression(
    tokens: &TokenList,
    registry: &TypeRegistry,
    context: &dyn CompilationContext,
    options: ParseOptions,
) -> Result<ParsedExpr, ParseError> {
    let mut parser = Parser::new(tokens, registry, context, options);
    let root = parser.parse_expression()?;
    parser.expect_end()?;
    Ok(ParsedExpr {
        arena: parser.finish(),
        root,
    })
}
