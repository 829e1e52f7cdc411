//! `new` expressions: arrays, objects and collection initializers.

use rill_diagnostic::{Diagnostic, ErrorCode};
use rill_ir::{ExprId, ExprKind, ParsedType, Span, Token, TokenKind, TypeId};
use rill_types::ResolveError;
use smallvec::SmallVec;

use super::Parser;
use crate::unit::{Unit, UnitKind};
use crate::ParseError;

type Items = SmallVec<[ExprId; 8]>;

impl<'a> Parser<'a> {
    /// `new T[n]`, `new T[] { .. }`, `new T[n] { .. }`, `new T(args)` and
    /// `new T(args) { .. }`.
    pub(super) fn construct(&mut self) -> Result<Unit, ParseError> {
        let new_token = self.cursor.advance();
        let type_token = self.cursor.current();
        let TokenKind::Type(parsed) = &type_token.kind else {
            return Err(ParseError::new(
                Diagnostic::error(ErrorCode::E1005)
                    .with_message(format!(
                        "expected a type after `new`, found `{}`",
                        type_token.kind.display(self.interner())
                    ))
                    .with_label(type_token.span, "expected a type"),
                type_token.line,
            ));
        };
        self.cursor.advance();

        match parsed {
            ParsedType::Array(elem) => {
                let elem = self.resolve_type(elem, type_token)?;
                self.new_array(new_token, elem, None, type_token.span)
            }
            ParsedType::Named { .. } => {
                let ty = self.resolve_type(parsed, type_token)?;
                if self.cursor.check(&TokenKind::LBracket) {
                    let open = self.cursor.advance();
                    let count = if self.cursor.check(&TokenKind::RBracket) {
                        None
                    } else {
                        let line = self.cursor.current_line();
                        let count = self.value_expression()?;
                        Some(self.convert(count, TypeId::INT, "array length", line)?)
                    };
                    let close = self.cursor.expect_close(open, &TokenKind::RBracket, '[')?;
                    self.new_array(new_token, ty, count, close.span)
                } else {
                    self.new_object(new_token, type_token, ty)
                }
            }
        }
    }

    fn new_array(
        &mut self,
        new_token: &Token,
        elem: TypeId,
        count: Option<ExprId>,
        mut end: Span,
    ) -> Result<Unit, ParseError> {
        let items = if self.cursor.check(&TokenKind::LBrace) {
            let (items, close) = self.initializer()?;
            end = close.span;
            items
        } else if count.is_none() {
            return Err(self.cursor.unexpected("`{` or an array length", self.interner()));
        } else {
            Items::new()
        };

        let items = items
            .iter()
            .map(|&item| self.convert(item, elem, "array element", new_token.line))
            .collect::<Result<Items, _>>()?;

        if let Some(count) = count {
            if let ExprKind::Int(n) = *self.arena.kind(count) {
                let len = i64::try_from(items.len()).unwrap_or(i64::MAX);
                if !items.is_empty() && n < len {
                    return Err(ParseError::new(
                        Diagnostic::error(ErrorCode::E1008)
                            .with_message(format!(
                                "array initializer has {len} elements but the array length is {n}"
                            ))
                            .with_label(new_token.span.merge(end), "too many elements"),
                        new_token.line,
                    ));
                }
            }
        }

        let span = new_token.span.merge(end);
        let items = self.arena.push_expr_list(&items);
        let id = self.arena.push(
            ExprKind::NewArray { elem, count, items },
            span,
            self.registry.array_of(elem),
        );
        Ok(Unit::new(UnitKind::Expr(id), span, new_token.line))
    }

    fn new_object(
        &mut self,
        new_token: &Token,
        type_token: &Token,
        ty: TypeId,
    ) -> Result<Unit, ParseError> {
        let (args, mut end) = if self.cursor.check(&TokenKind::LParen) {
            let (args, close) = self.arguments()?;
            (args, close.span)
        } else if self.cursor.check(&TokenKind::LBrace) {
            (SmallVec::new(), type_token.span)
        } else {
            return Err(self.cursor.unexpected("`(`, `[` or `{`", self.interner()));
        };

        let arg_types: SmallVec<[TypeId; 4]> = args.iter().map(|&a| self.arena.ty(a)).collect();
        let ctor = self
            .registry
            .resolve_constructor(ty, &arg_types)
            .map_err(|err| match err {
                ResolveError::NotFound => ParseError::new(
                    Diagnostic::error(ErrorCode::E2004)
                        .with_message(format!(
                            "type `{}` cannot be constructed",
                            self.type_name(ty)
                        ))
                        .with_label(type_token.span, "no constructor"),
                    type_token.line,
                ),
                err => self.resolve_failure(err, type_token, Some(ty), &self.type_name(ty)),
            })?;
        let args = self.convert_args(&args, &ctor.params, type_token.line)?;

        let (items, insert) = if self.cursor.check(&TokenKind::LBrace) {
            let insertion = self.registry.resolve_insertion(ty).map_err(|_| {
                ParseError::new(
                    Diagnostic::error(ErrorCode::E2010)
                        .with_message(format!(
                            "type `{}` does not support collection initializers",
                            self.type_name(ty)
                        ))
                        .with_label(self.cursor.current_span(), "initializer not allowed here"),
                    self.cursor.current_line(),
                )
            })?;
            let (items, close) = self.initializer()?;
            end = close.span;
            let items = items
                .iter()
                .map(|&item| self.convert(item, insertion.elem, "collection element", new_token.line))
                .collect::<Result<Items, _>>()?;
            let insert = (!items.is_empty()).then_some(insertion.callable);
            (items, insert)
        } else {
            (Items::new(), None)
        };

        let span = new_token.span.merge(end);
        let args = self.arena.push_expr_list(&args);
        let items = self.arena.push_expr_list(&items);
        let id = self.arena.push(
            ExprKind::New {
                ctor: ctor.callable,
                args,
                items,
                insert,
            },
            span,
            ty,
        );
        Ok(Unit::new(UnitKind::Expr(id), span, new_token.line))
    }

    /// `{ item, ... }`, trailing comma allowed.
    fn initializer(&mut self) -> Result<(Items, &'a Token), ParseError> {
        let open = self.cursor.expect(&TokenKind::LBrace, self.interner())?;
        let mut items = Items::new();
        loop {
            if self.cursor.check(&TokenKind::RBrace) {
                return Ok((items, self.cursor.advance()));
            }
            items.push(self.value_expression()?);
            if !self.cursor.eat(&TokenKind::Comma) {
                let close = self.cursor.expect_close(open, &TokenKind::RBrace, '{')?;
                return Ok((items, close));
            }
        }
    }
}
