//! Collection phase: tokens to units.

use rill_diagnostic::{expected_expression, Diagnostic, ErrorCode};
use rill_ir::{ExprId, ExprKind, Name, ParsedType, Token, TokenKind, TypeId};

use super::Parser;
use crate::unit::{Op, Unit, UnitKind};
use crate::{Constant, Identifier, ParseError};

impl Parser<'_> {
    /// Scan one expression's tokens into units, stopping at a terminator.
    pub(super) fn collect(&mut self) -> Result<Vec<Unit>, ParseError> {
        let mut units: Vec<Unit> = Vec::new();
        while !self.cursor.at_terminator() {
            let token = self.cursor.current();
            match &token.kind {
                TokenKind::LParen => self.collect_group(&mut units)?,
                TokenKind::LBracket => self.collect_index(&mut units)?,
                TokenKind::Dot => self.collect_member(&mut units)?,
                TokenKind::Question => self.collect_ternary(&mut units)?,
                TokenKind::New => {
                    let unit = self.construct()?;
                    units.push(unit);
                }
                TokenKind::Int(_)
                | TokenKind::Double(_)
                | TokenKind::Str(_)
                | TokenKind::True
                | TokenKind::False => {
                    self.cursor.advance();
                    let id = self.literal(token);
                    units.push(Unit::new(UnitKind::Expr(id), token.span, token.line));
                }
                TokenKind::Ident(name, type_args) => {
                    self.cursor.advance();
                    let unit = self.identifier(*name, type_args, token)?;
                    units.push(unit);
                }
                TokenKind::Type(parsed) => {
                    self.cursor.advance();
                    let ty = self.resolve_type(parsed, token)?;
                    units.push(Unit::new(UnitKind::TypeRef(ty), token.span, token.line));
                }
                kind => {
                    let Some(op) = Op::from_token(kind) else {
                        return Err(self.cursor.unexpected("an operand or operator", self.interner()));
                    };
                    self.cursor.advance();
                    units.push(Unit::new(UnitKind::Op(op), token.span, token.line));
                }
            }
        }
        tracing::trace!(units = units.len(), "collected");
        Ok(units)
    }

    fn literal(&mut self, token: &Token) -> ExprId {
        let (kind, ty) = match token.kind {
            TokenKind::Int(n) => (ExprKind::Int(n), TypeId::INT),
            TokenKind::Double(bits) => (ExprKind::Double(bits), TypeId::DOUBLE),
            TokenKind::Str(name) => (ExprKind::Str(name), TypeId::STRING),
            TokenKind::True => (ExprKind::Bool(true), TypeId::BOOL),
            _ => (ExprKind::Bool(false), TypeId::BOOL),
        };
        self.arena.push(kind, token.span, ty)
    }

    fn constant(&mut self, value: &Constant, token: &Token) -> ExprId {
        let kind = match value {
            Constant::Int(n) => ExprKind::Int(*n),
            Constant::Double(d) => ExprKind::Double(d.to_bits()),
            Constant::Bool(b) => ExprKind::Bool(*b),
            Constant::Str(s) => ExprKind::Str(self.interner().intern(s)),
        };
        self.arena.push(kind, token.span, value.ty())
    }

    fn identifier(
        &mut self,
        name: Name,
        type_args: &[ParsedType],
        token: &Token,
    ) -> Result<Unit, ParseError> {
        let id = match self.context.classify(name) {
            Identifier::Constant(value) => self.constant(&value, token),
            Identifier::Variable(ty) => self.arena.push(ExprKind::Ident(name), token.span, ty),
            Identifier::Function => return self.global_call(name, type_args, token),
            Identifier::Unidentified if self.registry.has_function(name) => {
                return self.global_call(name, type_args, token);
            }
            Identifier::Unidentified if self.registry.is_type_name(name) => {
                let ty = self.resolve_type(&ParsedType::generic(name, type_args.to_vec()), token)?;
                return Ok(Unit::new(UnitKind::TypeRef(ty), token.span, token.line));
            }
            Identifier::Unidentified => {
                return Err(ParseError::new(
                    rill_diagnostic::unknown_identifier(
                        token.span,
                        self.interner().lookup(name),
                    ),
                    token.line,
                ));
            }
        };
        Ok(Unit::new(UnitKind::Expr(id), token.span, token.line))
    }

    /// `( expr )`, or `( T )` which is a pending cast.
    fn collect_group(&mut self, units: &mut Vec<Unit>) -> Result<(), ParseError> {
        let open = self.cursor.advance();
        if let TokenKind::Type(parsed) = self.cursor.peek_kind_at(0) {
            if matches!(self.cursor.peek_kind_at(1), TokenKind::RParen) {
                let type_token = self.cursor.advance();
                let ty = self.resolve_type(parsed, type_token)?;
                let close = self.cursor.advance();
                units.push(Unit::new(
                    UnitKind::Cast(ty),
                    open.span.merge(close.span),
                    open.line,
                ));
                return Ok(());
            }
        }
        let inner = self.required_expression()?;
        let close = self.cursor.expect_close(open, &TokenKind::RParen, '(')?;
        units.push(Unit::new(
            UnitKind::Expr(inner),
            open.span.merge(close.span),
            open.line,
        ));
        Ok(())
    }

    /// `[ index ]` after a value; materialised by the indexing pass.
    fn collect_index(&mut self, units: &mut Vec<Unit>) -> Result<(), ParseError> {
        let open = self.cursor.current();
        let follows_value = units
            .last()
            .is_some_and(|u| matches!(u.kind, UnitKind::Expr(_) | UnitKind::PendingIndex { .. }));
        if !follows_value {
            return Err(ParseError::new(
                expected_expression(open.span, "["),
                open.line,
            ));
        }
        self.cursor.advance();
        let index = self.value_expression()?;
        let close = self.cursor.expect_close(open, &TokenKind::RBracket, '[')?;
        units.push(Unit::new(
            UnitKind::PendingIndex { index },
            open.span.merge(close.span),
            open.line,
        ));
        Ok(())
    }

    /// `cond ? a : b`. Both branches are reduced here and appended as units
    /// after the `?`, which the ternary pass combines with the condition.
    fn collect_ternary(&mut self, units: &mut Vec<Unit>) -> Result<(), ParseError> {
        let question = self.cursor.advance();
        units.push(Unit::new(
            UnitKind::Op(Op::Question),
            question.span,
            question.line,
        ));

        let then_branch = self.value_expression()?;
        if !self.cursor.eat(&TokenKind::Colon) {
            return Err(ParseError::new(
                Diagnostic::error(ErrorCode::E1001)
                    .with_message(format!(
                        "expected `:` in conditional expression, found `{}`",
                        self.cursor.current_kind().display(self.interner())
                    ))
                    .with_label(self.cursor.current_span(), "expected `:`")
                    .with_secondary_label(question.span, "conditional starts here"),
                self.cursor.current_line(),
            ));
        }
        let else_branch = self.value_expression()?;

        for branch in [then_branch, else_branch] {
            let span = self.arena.span(branch);
            units.push(Unit::new(UnitKind::Expr(branch), span, question.line));
        }
        Ok(())
    }
}
