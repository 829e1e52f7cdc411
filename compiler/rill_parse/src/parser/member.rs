//! Member access, method calls and global function calls.
//!
//! These bind tighter than every operator, so they are resolved during
//! collection against the unit immediately before the `.`.

use rill_diagnostic::{expected_expression, Diagnostic, ErrorCode};
use rill_ir::{ExprId, ExprKind, Name, ParsedType, Token, TokenKind, TypeId};
use smallvec::SmallVec;

use super::Parser;
use crate::unit::{Unit, UnitKind};
use crate::ParseError;

pub(super) type Args = SmallVec<[ExprId; 4]>;

impl<'a> Parser<'a> {
    /// `.name`, `.name(args)` or `.name<T>(args)` on the preceding unit.
    pub(super) fn collect_member(&mut self, units: &mut Vec<Unit>) -> Result<(), ParseError> {
        let dot = self.cursor.advance();
        self.materialize_pending(units)?;

        let (receiver_unit, receiver, ty) = match units.last().copied() {
            Some(unit @ Unit { kind: UnitKind::Expr(id), .. }) => {
                self.require_value(id, unit.line)?;
                (unit, Some(id), self.arena.ty(id))
            }
            Some(unit @ Unit { kind: UnitKind::TypeRef(ty), .. }) => (unit, None, ty),
            _ => {
                return Err(ParseError::new(
                    expected_expression(dot.span, "."),
                    dot.line,
                ))
            }
        };

        let name_token = self.cursor.current();
        let TokenKind::Ident(name, type_args) = &name_token.kind else {
            return Err(ParseError::new(
                Diagnostic::error(ErrorCode::E1004)
                    .with_message(format!(
                        "expected member name after `.`, found `{}`",
                        name_token.kind.display(self.interner())
                    ))
                    .with_label(name_token.span, "expected a member name"),
                name_token.line,
            ));
        };
        self.cursor.advance();

        let unit = if self.cursor.check(&TokenKind::LParen) {
            self.method_call(receiver_unit, receiver, ty, *name, type_args, name_token)?
        } else {
            self.property(receiver_unit, receiver, ty, *name, name_token)?
        };
        units.pop();
        units.push(unit);
        Ok(())
    }

    fn method_call(
        &mut self,
        receiver_unit: Unit,
        receiver: Option<ExprId>,
        ty: TypeId,
        name: Name,
        type_args: &[ParsedType],
        name_token: &Token,
    ) -> Result<Unit, ParseError> {
        let type_args = self.resolve_types(type_args, name_token)?;
        let (args, close) = self.arguments()?;
        let arg_types: SmallVec<[TypeId; 4]> = args.iter().map(|&a| self.arena.ty(a)).collect();
        let member = self.interner().lookup(name);
        let call = self
            .registry
            .resolve_method(ty, name, &type_args, &arg_types, receiver.is_none())
            .map_err(|e| self.resolve_failure(e, name_token, Some(ty), member))?;

        let args = self.convert_args(&args, &call.params, name_token.line)?;
        let args = self.arena.push_expr_list(&args);
        let span = receiver_unit.span.merge(close.span);
        let kind = match receiver {
            Some(receiver) => ExprKind::MethodCall {
                receiver,
                callable: call.callable,
                args,
            },
            None => ExprKind::Call {
                callable: call.callable,
                args,
            },
        };
        let id = self.arena.push(kind, span, call.ret);
        Ok(Unit::new(UnitKind::Expr(id), span, receiver_unit.line))
    }

    fn property(
        &mut self,
        receiver_unit: Unit,
        receiver: Option<ExprId>,
        ty: TypeId,
        name: Name,
        name_token: &Token,
    ) -> Result<Unit, ParseError> {
        let member = self.interner().lookup(name);
        let is_static = receiver.is_none();
        let prop = self
            .registry
            .resolve_property(ty, name, is_static)
            .map_err(|e| {
                let err = self.resolve_failure(e, name_token, Some(ty), member);
                if self.registry.has_method(ty, name, is_static) {
                    ParseError {
                        line: err.line,
                        diagnostic: err.diagnostic.with_suggestion(format!(
                            "`{member}` is a method; call it with `{member}()`"
                        )),
                    }
                } else {
                    err
                }
            })?;

        let span = receiver_unit.span.merge(name_token.span);
        let id = self.arena.push(
            ExprKind::Property {
                receiver,
                get: prop.get,
                set: prop.set,
            },
            span,
            prop.ty,
        );
        Ok(Unit::new(UnitKind::Expr(id), span, receiver_unit.line))
    }

    /// A global function call: the identifier must be followed by `(`.
    pub(super) fn global_call(
        &mut self,
        name: Name,
        type_args: &[ParsedType],
        token: &Token,
    ) -> Result<Unit, ParseError> {
        let function = self.interner().lookup(name);
        if !self.cursor.check(&TokenKind::LParen) {
            return Err(ParseError::new(
                Diagnostic::error(ErrorCode::E1009)
                    .with_message(format!("function `{function}` must be called with an argument list"))
                    .with_label(token.span, "missing `(...)`"),
                token.line,
            ));
        }
        let type_args = self.resolve_types(type_args, token)?;
        let (args, close) = self.arguments()?;
        let arg_types: SmallVec<[TypeId; 4]> = args.iter().map(|&a| self.arena.ty(a)).collect();
        let call = self
            .registry
            .resolve_function(name, &type_args, &arg_types)
            .map_err(|e| self.resolve_failure(e, token, None, function))?;

        let args = self.convert_args(&args, &call.params, token.line)?;
        let args = self.arena.push_expr_list(&args);
        let span = token.span.merge(close.span);
        let id = self.arena.push(
            ExprKind::Call {
                callable: call.callable,
                args,
            },
            span,
            call.ret,
        );
        Ok(Unit::new(UnitKind::Expr(id), span, token.line))
    }

    /// `( arg, ... )`. Returns the argument nodes and the closing token.
    pub(super) fn arguments(&mut self) -> Result<(Args, &'a Token), ParseError> {
        let open = self.cursor.expect(&TokenKind::LParen, self.interner())?;
        let mut args = Args::new();
        if self.cursor.check(&TokenKind::RParen) {
            return Ok((args, self.cursor.advance()));
        }
        loop {
            args.push(self.value_expression()?);
            if !self.cursor.eat(&TokenKind::Comma) {
                let close = self.cursor.expect_close(open, &TokenKind::RParen, '(')?;
                return Ok((args, close));
            }
        }
    }

    /// Convert each argument to its parameter type.
    pub(super) fn convert_args(
        &mut self,
        args: &[ExprId],
        params: &[TypeId],
        line: u32,
    ) -> Result<Args, ParseError> {
        args.iter()
            .zip(params)
            .map(|(&arg, &param)| self.convert(arg, param, "argument", line))
            .collect()
    }

    /// Apply any `[index]` units trailing the unit list to their container,
    /// so a following `.` sees the indexed value.
    pub(super) fn materialize_pending(&mut self, units: &mut Vec<Unit>) -> Result<(), ParseError> {
        let start = units
            .iter()
            .rposition(|u| !matches!(u.kind, UnitKind::PendingIndex { .. }))
            .map_or(0, |p| p + 1);
        if start == units.len() {
            return Ok(());
        }
        let pending: SmallVec<[Unit; 2]> = units.drain(start..).collect();
        let Some(mut target) = units.pop() else {
            let first = pending[0];
            return Err(ParseError::new(
                expected_expression(first.span, "["),
                first.line,
            ));
        };
        for index in pending {
            target = self.build_index(target, index)?;
        }
        units.push(target);
        Ok(())
    }
}
