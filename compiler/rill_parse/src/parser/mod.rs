//! The reducer.
//!
//! One expression is reduced in two phases. Collection scans tokens left
//! to right into a list of [`Unit`]s, resolving everything that binds
//! tighter than any operator on the spot: literals, identifiers, groups,
//! member access, calls and `new`. Reduction then runs one pass per
//! operator category, tightest first, each replacing operator units and
//! their operands with a single typed node.
//!
//! Every node is type-checked when it is built. Implicit conversions are
//! inserted as explicit cast nodes so evaluation never has to decide
//! anything.

mod build;
mod collect;
mod construct;
mod fold;
mod member;
mod reduce;

use rill_diagnostic::{expected_expression, Diagnostic, ErrorCode};
use rill_ir::{ExprArena, ExprId, ParsedType, Span, StringInterner, Token, TokenList, TypeId};
use rill_stack::ensure_sufficient_stack;
use rill_types::{ResolveError, TypeRegistry};
use smallvec::SmallVec;

use crate::cursor::Cursor;
use crate::{CompilationContext, ParseError, ParseOptions};

type TypeArgs = SmallVec<[TypeId; 2]>;

/// Reducer state for one token stream.
///
/// The token stream's names must come from the registry's interner.
pub struct Parser<'a> {
    cursor: Cursor<'a>,
    registry: &'a TypeRegistry,
    context: &'a dyn CompilationContext,
    options: ParseOptions,
    arena: ExprArena,
    depth: usize,
}

impl<'a> Parser<'a> {
    pub fn new(
        tokens: &'a TokenList,
        registry: &'a TypeRegistry,
        context: &'a dyn CompilationContext,
        options: ParseOptions,
    ) -> Self {
        Parser {
            cursor: Cursor::new(tokens),
            registry,
            context,
            options,
            arena: ExprArena::with_capacity(tokens.len()),
            depth: 0,
        }
    }

    /// Reduce the expression starting at the current token.
    ///
    /// Returns `None` for an empty expression. The cursor is left on the
    /// first token not consumed, which is always a terminator.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn parse_expression(&mut self) -> Result<Option<ExprId>, ParseError> {
        let root = self.expression()?;
        if let Some(root) = root {
            tracing::debug!(
                ty = %self.type_name(self.arena.ty(root)),
                nodes = self.arena.len(),
                "reduced expression"
            );
        }
        Ok(root)
    }

    /// The token the cursor is on.
    pub fn current(&self) -> &'a Token {
        self.cursor.current()
    }

    /// Step over the current token, typically a `;` or `,` separating
    /// expressions.
    pub fn skip(&mut self) {
        self.cursor.advance();
    }

    pub fn position(&self) -> usize {
        self.cursor.position()
    }

    pub fn is_at_end(&self) -> bool {
        self.cursor.is_at_end()
    }

    /// Fail unless every token has been consumed.
    pub fn expect_end(&self) -> Result<(), ParseError> {
        if self.cursor.is_at_end() {
            Ok(())
        } else {
            Err(self.cursor.unexpected("end of input", self.interner()))
        }
    }

    pub fn arena(&self) -> &ExprArena {
        &self.arena
    }

    /// Consume the parser, yielding every node built so far.
    pub fn finish(self) -> ExprArena {
        self.arena
    }

    // Sub-expressions

    /// Collect and reduce one (sub-)expression.
    fn expression(&mut self) -> Result<Option<ExprId>, ParseError> {
        if self.depth >= self.options.max_depth {
            let token = self.cursor.current();
            return Err(ParseError::new(
                Diagnostic::error(ErrorCode::E1010)
                    .with_message(format!(
                        "expression nests deeper than {} levels",
                        self.options.max_depth
                    ))
                    .with_label(token.span, "nesting limit reached here"),
                token.line,
            ));
        }
        self.depth += 1;
        let result = ensure_sufficient_stack(|| {
            let units = self.collect()?;
            self.reduce(units)
        });
        self.depth -= 1;
        result
    }

    /// A sub-expression that must not be empty.
    fn required_expression(&mut self) -> Result<ExprId, ParseError> {
        let token = self.cursor.current();
        match self.expression()? {
            Some(id) => Ok(id),
            None => Err(ParseError::new(
                expected_expression(token.span, &token.kind.display(self.interner())),
                token.line,
            )),
        }
    }

    /// A sub-expression that must yield a value.
    fn value_expression(&mut self) -> Result<ExprId, ParseError> {
        let line = self.cursor.current_line();
        let id = self.required_expression()?;
        self.require_value(id, line)?;
        Ok(id)
    }

    fn require_value(&self, id: ExprId, line: u32) -> Result<(), ParseError> {
        if self.arena.ty(id) == TypeId::VOID {
            return Err(self.no_value(self.arena.span(id), line));
        }
        Ok(())
    }

    // Shared helpers

    fn interner(&self) -> &'a StringInterner {
        self.registry.interner()
    }

    fn type_name(&self, ty: TypeId) -> String {
        self.registry.type_name(ty)
    }

    fn no_value(&self, span: Span, line: u32) -> ParseError {
        ParseError::new(
            Diagnostic::error(ErrorCode::E2011)
                .with_message("expression does not produce a value")
                .with_label(span, "this has type `void`"),
            line,
        )
    }

    fn resolve_type(&self, parsed: &ParsedType, at: &Token) -> Result<TypeId, ParseError> {
        self.registry.resolve_type(parsed).map_err(|err| {
            let shown = parsed.display(self.interner());
            let message = match err {
                ResolveError::WrongTypeArity { expected, found } => format!(
                    "type `{shown}` takes {expected} type argument(s) but {found} were given"
                ),
                _ => format!("unknown type `{shown}`"),
            };
            ParseError::new(
                Diagnostic::error(ErrorCode::E2002)
                    .with_message(message)
                    .with_label(at.span, "not a known type"),
                at.line,
            )
        })
    }

    fn resolve_types(&self, parsed: &[ParsedType], at: &Token) -> Result<TypeArgs, ParseError> {
        parsed.iter().map(|p| self.resolve_type(p, at)).collect()
    }

    /// Map a failed member, function or constructor lookup to a diagnostic.
    ///
    /// `owner` is the type searched, `None` for global functions.
    fn resolve_failure(
        &self,
        err: ResolveError,
        at: &Token,
        owner: Option<TypeId>,
        member: &str,
    ) -> ParseError {
        let diagnostic = match err {
            ResolveError::NotFound => match owner {
                Some(ty) => rill_diagnostic::unknown_member(at.span, &self.type_name(ty), member),
                None => rill_diagnostic::unknown_identifier(at.span, member),
            },
            ResolveError::NoMatch { candidates } => {
                let mut diag = Diagnostic::error(ErrorCode::E2004)
                    .with_message(format!("no overload of `{member}` accepts these arguments"))
                    .with_label(at.span, "no matching overload");
                for candidate in candidates {
                    diag = diag.with_note(format!("candidate: {candidate}"));
                }
                diag
            }
            ResolveError::Ambiguous { candidates } => {
                rill_diagnostic::ambiguous_overload(at.span, member, &candidates)
            }
            ResolveError::WrongTypeArity { expected, found } => {
                Diagnostic::error(ErrorCode::E2002)
                    .with_message(format!(
                        "`{member}` takes {expected} type argument(s) but {found} were given"
                    ))
                    .with_label(at.span, "wrong number of type arguments")
            }
            ResolveError::UnknownType => Diagnostic::error(ErrorCode::E2002)
                .with_message(format!("unknown type in `{member}`"))
                .with_label(at.span, "not a known type"),
        };
        ParseError::new(diagnostic, at.line)
    }
}
