//! Node construction with validation.
//!
//! Every builder checks operand types against the operator or member,
//! chooses the dispatch plan and inserts implicit conversions. A node that
//! reaches the arena is well typed.

use rill_diagnostic::{type_mismatch, unsupported_operator, Diagnostic, ErrorCode};
use rill_ir::{
    BinaryOp, CastPlan, ExprId, ExprKind, IncDecOp, Span, TypeId, UnaryOp,
};
use rill_types::coerce;
use rill_types::operators::{self, OperatorError};

use super::Parser;
use crate::unit::{Unit, UnitKind};
use crate::ParseError;

impl Parser<'_> {
    /// Convert `id` to `to`, inserting an `int` to `double` cast when needed.
    pub(super) fn convert(
        &mut self,
        id: ExprId,
        to: TypeId,
        context: &str,
        line: u32,
    ) -> Result<ExprId, ParseError> {
        let from = self.arena.ty(id);
        if from == to {
            return Ok(id);
        }
        if coerce::implicit_cost(self.registry, from, to).is_none() {
            return Err(ParseError::new(
                type_mismatch(
                    self.arena.span(id),
                    &self.type_name(to),
                    &self.type_name(from),
                    context,
                ),
                line,
            ));
        }
        if from == TypeId::INT && to == TypeId::DOUBLE {
            let cast = self.arena.push(
                ExprKind::Cast {
                    operand: id,
                    plan: CastPlan::IntToDouble,
                },
                self.arena.span(id),
                TypeId::DOUBLE,
            );
            return Ok(self.fold(cast));
        }
        // Reference conversions need no node.
        Ok(id)
    }

    fn operator_error(
        &self,
        err: OperatorError,
        at: &Unit,
        symbol: &str,
        operands: &[TypeId],
    ) -> ParseError {
        let names: Vec<String> = operands.iter().map(|&t| self.type_name(t)).collect();
        let shown = names
            .iter()
            .map(|n| format!("`{n}`"))
            .collect::<Vec<_>>()
            .join(" and ");
        let diagnostic = match err {
            OperatorError::TypeMismatch => Diagnostic::error(ErrorCode::E2001)
                .with_message(format!(
                    "type mismatch: `{symbol}` cannot be applied to {shown}"
                ))
                .with_label(at.span, "invalid operand types"),
            OperatorError::Unsupported => match names.as_slice() {
                [left, right] => unsupported_operator(at.span, symbol, left, right),
                _ => Diagnostic::error(ErrorCode::E2008)
                    .with_message(format!("operator `{symbol}` cannot be applied to {shown}"))
                    .with_label(at.span, "no built-in or registered operator"),
            },
            OperatorError::Ambiguous { candidates } => {
                rill_diagnostic::ambiguous_overload(at.span, symbol, &candidates)
            }
        };
        ParseError::new(diagnostic, at.line)
    }

    /// `container[index]`, where `pending` is the deferred `[index]` unit.
    pub(super) fn build_index(&mut self, target: Unit, pending: Unit) -> Result<Unit, ParseError> {
        let UnitKind::PendingIndex { index } = pending.kind else {
            return Ok(target);
        };
        let container = match target.kind {
            UnitKind::Expr(id) => {
                self.require_value(id, target.line)?;
                id
            }
            _ => {
                return Err(ParseError::new(
                    rill_diagnostic::expected_expression(pending.span, "["),
                    pending.line,
                ))
            }
        };
        let ty = self.arena.ty(container);
        let indexer = self.registry.resolve_indexer(ty).map_err(|_| {
            ParseError::new(
                Diagnostic::error(ErrorCode::E2007)
                    .with_message(format!("type `{}` cannot be indexed", self.type_name(ty)))
                    .with_label(pending.span, "no indexer"),
                pending.line,
            )
        })?;
        let index = self.convert(index, indexer.index, "index", pending.line)?;
        let span = target.span.merge(pending.span);
        let id = self.arena.push(
            ExprKind::Index {
                target: container,
                index,
                get: indexer.get,
                set: indexer.set,
            },
            span,
            indexer.elem,
        );
        Ok(Unit::new(UnitKind::Expr(id), span, target.line))
    }

    pub(super) fn build_inc_dec(
        &mut self,
        op: IncDecOp,
        postfix: bool,
        target: ExprId,
        at: &Unit,
        span: Span,
    ) -> Result<ExprId, ParseError> {
        let ty = self.arena.ty(target);
        if operators::inc_dec(ty).is_none() {
            return Err(self.operator_error(
                OperatorError::TypeMismatch,
                at,
                op.as_symbol(),
                &[ty],
            ));
        }
        Ok(self
            .arena
            .push(ExprKind::IncDec { op, postfix, target }, span, ty))
    }

    pub(super) fn build_unary(
        &mut self,
        op: UnaryOp,
        operand: ExprId,
        at: &Unit,
        span: Span,
    ) -> Result<ExprId, ParseError> {
        let ty = self.arena.ty(operand);
        let typed = operators::unary(self.registry, op, ty)
            .map_err(|e| self.operator_error(e, at, op.as_symbol(), &[ty]))?;
        let operand = self.convert(operand, typed.operand_to, "operand", at.line)?;
        let id = self.arena.push(
            ExprKind::Unary {
                op,
                plan: typed.plan,
                operand,
            },
            span,
            typed.result,
        );
        Ok(self.fold(id))
    }

    pub(super) fn build_cast(
        &mut self,
        operand: ExprId,
        to: TypeId,
        at: &Unit,
        span: Span,
    ) -> Result<ExprId, ParseError> {
        let from = self.arena.ty(operand);
        let Some(plan) = coerce::explicit_cast(self.registry, from, to) else {
            return Err(ParseError::new(
                Diagnostic::error(ErrorCode::E2009)
                    .with_message(format!(
                        "cannot cast `{}` to `{}`",
                        self.type_name(from),
                        self.type_name(to)
                    ))
                    .with_label(at.span, "invalid cast"),
                at.line,
            ));
        };
        let id = self
            .arena
            .push(ExprKind::Cast { operand, plan }, span, to);
        Ok(self.fold(id))
    }

    pub(super) fn build_binary(
        &mut self,
        op: BinaryOp,
        left: ExprId,
        right: ExprId,
        at: &Unit,
        span: Span,
    ) -> Result<ExprId, ParseError> {
        let (lt, rt) = (self.arena.ty(left), self.arena.ty(right));
        let typed = operators::binary(self.registry, op, lt, rt)
            .map_err(|e| self.operator_error(e, at, op.as_symbol(), &[lt, rt]))?;
        let left = self.convert(left, typed.left_to, "left operand", at.line)?;
        let right = self.convert(right, typed.right_to, "right operand", at.line)?;
        let id = self.arena.push(
            ExprKind::Binary {
                op,
                plan: typed.plan,
                left,
                right,
            },
            span,
            typed.result,
        );
        Ok(self.fold(id))
    }

    /// The result type is whichever branch type the other converts to.
    pub(super) fn build_ternary(
        &mut self,
        cond: ExprId,
        then_branch: ExprId,
        else_branch: ExprId,
        at: &Unit,
        span: Span,
    ) -> Result<ExprId, ParseError> {
        let cond = self.convert(cond, TypeId::BOOL, "condition", at.line)?;
        let (tt, et) = (self.arena.ty(then_branch), self.arena.ty(else_branch));
        let ty = if coerce::is_assignable(self.registry, et, tt) {
            tt
        } else if coerce::is_assignable(self.registry, tt, et) {
            et
        } else {
            return Err(ParseError::new(
                type_mismatch(
                    self.arena.span(else_branch),
                    &self.type_name(tt),
                    &self.type_name(et),
                    "branches of a conditional must have compatible types",
                ),
                at.line,
            ));
        };
        let then_branch = self.convert(then_branch, ty, "branch", at.line)?;
        let else_branch = self.convert(else_branch, ty, "branch", at.line)?;
        Ok(self.arena.push(
            ExprKind::Ternary {
                cond,
                then_branch,
                else_branch,
            },
            span,
            ty,
        ))
    }

    pub(super) fn build_assign(
        &mut self,
        target: ExprId,
        value: ExprId,
        at: &Unit,
        span: Span,
    ) -> Result<ExprId, ParseError> {
        let ty = self.arena.ty(target);
        let value = self.convert(value, ty, "assigned value", at.line)?;
        Ok(self
            .arena
            .push(ExprKind::Assign { target, value }, span, ty))
    }

    pub(super) fn build_compound(
        &mut self,
        op: BinaryOp,
        target: ExprId,
        value: ExprId,
        at: &Unit,
        span: Span,
    ) -> Result<ExprId, ParseError> {
        let (tt, vt) = (self.arena.ty(target), self.arena.ty(value));
        let symbol = rill_ir::AssignOp::Compound(op).as_symbol();
        let typed = operators::compound(self.registry, op, tt, vt)
            .map_err(|e| self.operator_error(e, at, symbol, &[tt, vt]))?;
        let value = self.convert(value, typed.right_to, "right operand", at.line)?;
        Ok(self.arena.push(
            ExprKind::CompoundAssign {
                op,
                plan: typed.plan,
                target,
                value,
            },
            span,
            tt,
        ))
    }
}
