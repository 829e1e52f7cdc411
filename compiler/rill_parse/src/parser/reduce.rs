//! Reduction phase: one pass per operator category, tightest first.
//!
//! | Pass | Operators |
//! |---|---|
//! | 1 | indexing |
//! | 2 | postfix `++` `--` |
//! | 3 | prefix `++` `--` |
//! | 4 | unary `-` `~` |
//! | 5 | cast `(T)` |
//! | 6 | `**` (right-associative) |
//! | 7 | `*` `/` `%` |
//! | 8 | `+` `-` |
//! | 9 | `<<` `>>` |
//! | 10 | `!` |
//! | 11 | `<` `>` `<=` `>=` |
//! | 12 | `==` `!=` |
//! | 13 | `&` `\|` `^` |
//! | 14 | `&&` `\|\|` |
//! | 15 | ternary |
//! | 16 | assignment family (right-associative) |
//!
//! Each pass splices the node it builds into the slot of its leftmost
//! operand, so the unit list only ever shrinks.

use rill_diagnostic::{missing_operand, not_modifiable, Diagnostic, ErrorCode};
use rill_ir::{AssignOp, BinaryOp, ExprId, TypeId, UnaryOp};

use super::Parser;
use crate::unit::{Op, Unit, UnitFlags, UnitKind};
use crate::ParseError;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Assoc {
    Left,
    Right,
}

#[derive(Copy, Clone, Debug)]
enum Pass {
    Indexing,
    Postfix,
    PrefixIncDec,
    Unary,
    Cast,
    Binary(&'static [BinaryOp], Assoc),
    Not,
    Ternary,
    Assignment,
}

const PASSES: [Pass; 16] = [
    Pass::Indexing,
    Pass::Postfix,
    Pass::PrefixIncDec,
    Pass::Unary,
    Pass::Cast,
    Pass::Binary(&[BinaryOp::Pow], Assoc::Right),
    Pass::Binary(&[BinaryOp::Mul, BinaryOp::Div, BinaryOp::Mod], Assoc::Left),
    Pass::Binary(&[BinaryOp::Add, BinaryOp::Sub], Assoc::Left),
    Pass::Binary(&[BinaryOp::Shl, BinaryOp::Shr], Assoc::Left),
    Pass::Not,
    Pass::Binary(
        &[BinaryOp::Lt, BinaryOp::Gt, BinaryOp::LtEq, BinaryOp::GtEq],
        Assoc::Left,
    ),
    Pass::Binary(&[BinaryOp::Eq, BinaryOp::NotEq], Assoc::Left),
    Pass::Binary(
        &[BinaryOp::BitAnd, BinaryOp::BitOr, BinaryOp::BitXor],
        Assoc::Left,
    ),
    Pass::Binary(&[BinaryOp::And, BinaryOp::Or], Assoc::Left),
    Pass::Ternary,
    Pass::Assignment,
];

fn unary_op(op: Op) -> Option<UnaryOp> {
    match op {
        Op::Binary(BinaryOp::Sub) => Some(UnaryOp::Neg),
        Op::Tilde => Some(UnaryOp::BitNot),
        Op::Bang => Some(UnaryOp::Not),
        _ => None,
    }
}

/// Whether the unit at `i` is in prefix position: nothing before it ends
/// an operand.
fn is_prefix_position(units: &[Unit], i: usize) -> bool {
    i == 0 || !units[i - 1].ends_operand()
}

fn symbol(unit: &Unit) -> &'static str {
    match unit.kind {
        UnitKind::Op(op) => op.as_symbol(),
        UnitKind::Cast(_) => "cast",
        _ => "",
    }
}

impl Parser<'_> {
    /// Run every pass, then require exactly one unit (or none).
    pub(super) fn reduce(&mut self, mut units: Vec<Unit>) -> Result<Option<ExprId>, ParseError> {
        for pass in PASSES {
            if units.is_empty() || matches!(units.as_slice(), [Unit { kind: UnitKind::Expr(_), .. }])
            {
                break;
            }
            match pass {
                Pass::Indexing => self.reduce_indexing(&mut units)?,
                Pass::Postfix => self.reduce_postfix(&mut units)?,
                Pass::PrefixIncDec => self.reduce_prefix_inc_dec(&mut units)?,
                Pass::Unary => self.reduce_unary(&mut units)?,
                Pass::Cast => self.reduce_casts(&mut units)?,
                Pass::Binary(ops, assoc) => self.reduce_binary(&mut units, ops, assoc)?,
                Pass::Not => self.reduce_not(&mut units)?,
                Pass::Ternary => self.reduce_ternary(&mut units)?,
                Pass::Assignment => self.reduce_assignment(&mut units)?,
            }
            tracing::trace!(?pass, remaining = units.len(), "reduction pass");
        }
        self.finish_units(&units)
    }

    fn finish_units(&self, units: &[Unit]) -> Result<Option<ExprId>, ParseError> {
        // A leftover operator is missing an operand on one side.
        if let Some((i, unit)) = units
            .iter()
            .enumerate()
            .find(|(_, u)| matches!(u.kind, UnitKind::Op(_) | UnitKind::Cast(_)))
        {
            let side = if i + 1 == units.len() { "right" } else { "left" };
            return Err(ParseError::new(
                missing_operand(unit.span, symbol(unit), side),
                unit.line,
            ));
        }
        match units {
            [] => Ok(None),
            [unit] => match unit.kind {
                UnitKind::Expr(id) => Ok(Some(id)),
                _ => Err(self.not_a_value(unit)),
            },
            [first, second, ..] => Err(ParseError::new(
                Diagnostic::error(ErrorCode::E1007)
                    .with_message("expected an operator between operands")
                    .with_label(second.span, "unexpected operand")
                    .with_secondary_label(first.span, "after this operand"),
                second.line,
            )),
        }
    }

    fn not_a_value(&self, unit: &Unit) -> ParseError {
        let found = match unit.kind {
            UnitKind::TypeRef(ty) => format!("type `{}`", self.type_name(ty)),
            _ => "this".to_owned(),
        };
        ParseError::new(
            Diagnostic::error(ErrorCode::E1002)
                .with_message(format!("expected expression, found {found}"))
                .with_label(unit.span, "not a value"),
            unit.line,
        )
    }

    /// The node of a unit used as an operand of `at`, or why it cannot be one.
    fn operand(&self, unit: Option<&Unit>, at: &Unit, side: &str) -> Result<ExprId, ParseError> {
        let Some(unit) = unit else {
            return Err(ParseError::new(
                missing_operand(at.span, symbol(at), side),
                at.line,
            ));
        };
        match unit.kind {
            UnitKind::Expr(id) if self.arena.ty(id) == TypeId::VOID => {
                Err(self.no_value(unit.span, unit.line))
            }
            UnitKind::Expr(id) => Ok(id),
            UnitKind::TypeRef(_) => Err(self.not_a_value(unit)),
            _ => Err(ParseError::new(
                Diagnostic::error(ErrorCode::E1002)
                    .with_message(format!("missing {side} operand for `{}`", symbol(at)))
                    .with_label(unit.span, "not a value")
                    .with_secondary_label(at.span, "operator here"),
                unit.line,
            )),
        }
    }

    /// A modifiable operand of `at`.
    fn place(&self, unit: Option<&Unit>, at: &Unit, side: &str) -> Result<ExprId, ParseError> {
        let id = self.operand(unit, at, side)?;
        if let Some(unit) = unit {
            if !unit.flags(&self.arena).contains(UnitFlags::MODIFIABLE) {
                return Err(ParseError::new(
                    not_modifiable(unit.span, symbol(at)),
                    unit.line,
                ));
            }
        }
        Ok(id)
    }

    // Pass 1

    fn reduce_indexing(&mut self, units: &mut Vec<Unit>) -> Result<(), ParseError> {
        let mut i = 0;
        while i < units.len() {
            if matches!(units[i].kind, UnitKind::PendingIndex { .. }) {
                // Collection only records `[` after a value.
                let target = units[i - 1];
                units[i - 1] = self.build_index(target, units[i])?;
                units.remove(i);
            } else {
                i += 1;
            }
        }
        Ok(())
    }

    // Pass 2

    fn reduce_postfix(&mut self, units: &mut Vec<Unit>) -> Result<(), ParseError> {
        let mut i = 1;
        while i < units.len() {
            if let Some(Op::IncDec(op)) = units[i].op() {
                let target = units[i - 1];
                if target.flags(&self.arena).contains(UnitFlags::MODIFIABLE) {
                    let id = self.operand(Some(&target), &units[i], "left")?;
                    let span = target.span.merge(units[i].span);
                    let node = self.build_inc_dec(op, true, id, &units[i], span)?;
                    units[i - 1] = Unit::new(UnitKind::Expr(node), span, target.line);
                    units.remove(i);
                    continue;
                }
            }
            i += 1;
        }
        Ok(())
    }

    // Pass 3

    fn reduce_prefix_inc_dec(&mut self, units: &mut Vec<Unit>) -> Result<(), ParseError> {
        let mut i = units.len();
        while i > 0 {
            i -= 1;
            let Some(Op::IncDec(op)) = units[i].op() else {
                continue;
            };
            let at = units[i];
            let next = units.get(i + 1).filter(|u| u.expr().is_some());
            if next.is_none() && !is_prefix_position(units, i) {
                // `5++`: a postfix operator whose operand cannot be modified.
                return Err(ParseError::new(
                    not_modifiable(units[i - 1].span, op.as_symbol()),
                    at.line,
                ));
            }
            let target = self.place(next, &at, "right")?;
            let span = at.span.merge(units[i + 1].span);
            let node = self.build_inc_dec(op, false, target, &at, span)?;
            units[i] = Unit::new(UnitKind::Expr(node), span, at.line);
            units.remove(i + 1);
        }
        Ok(())
    }

    // Pass 4

    fn reduce_unary(&mut self, units: &mut Vec<Unit>) -> Result<(), ParseError> {
        let mut i = units.len();
        while i > 0 {
            i -= 1;
            let Some(op) = units[i].op().filter(|op| op.is_prefix_arithmetic()) else {
                continue;
            };
            if !is_prefix_position(units, i) {
                continue;
            }
            match units.get(i + 1).map(|u| u.kind) {
                // Applied by the cast pass once the cast is built.
                Some(UnitKind::Cast(_)) => continue,
                Some(UnitKind::Op(next)) if next.is_prefix_arithmetic() => continue,
                _ => {}
            }
            self.apply_unary(units, i, op)?;
        }
        Ok(())
    }

    /// Replace `units[i]` (a prefix operator) and its operand by one node.
    fn apply_unary(&mut self, units: &mut Vec<Unit>, i: usize, op: Op) -> Result<(), ParseError> {
        let at = units[i];
        let operand = self.operand(units.get(i + 1), &at, "right")?;
        let span = at.span.merge(units[i + 1].span);
        let unary = unary_op(op).unwrap_or(UnaryOp::Neg);
        let node = self.build_unary(unary, operand, &at, span)?;
        units[i] = Unit::new(UnitKind::Expr(node), span, at.line);
        units.remove(i + 1);
        Ok(())
    }

    // Pass 5

    fn reduce_casts(&mut self, units: &mut Vec<Unit>) -> Result<(), ParseError> {
        let mut i = units.len();
        while i > 0 {
            i -= 1;
            let UnitKind::Cast(to) = units[i].kind else {
                continue;
            };
            let at = units[i];
            let operand = self.operand(units.get(i + 1), &at, "right")?;
            let span = at.span.merge(units[i + 1].span);
            let node = self.build_cast(operand, to, &at, span)?;
            units[i] = Unit::new(UnitKind::Expr(node), span, at.line);
            units.remove(i + 1);

            // `-(int)x`: prefix operators that were waiting for this cast.
            while i > 0 {
                let Some(op) = units[i - 1].op().filter(|op| op.is_prefix_arithmetic()) else {
                    break;
                };
                if !is_prefix_position(units, i - 1) {
                    break;
                }
                i -= 1;
                self.apply_unary(units, i, op)?;
            }
        }
        Ok(())
    }

    // Passes 6-9 and 11-14

    fn reduce_binary(
        &mut self,
        units: &mut Vec<Unit>,
        ops: &[BinaryOp],
        assoc: Assoc,
    ) -> Result<(), ParseError> {
        let matches_pass = |unit: &Unit| matches!(unit.op(), Some(Op::Binary(op)) if ops.contains(&op));
        match assoc {
            Assoc::Left => {
                let mut i = 0;
                while i < units.len() {
                    if matches_pass(&units[i]) {
                        // The merged node lands at `i - 1`; the next
                        // operator, if any, is now at `i`.
                        self.merge_binary(units, i)?;
                    } else {
                        i += 1;
                    }
                }
            }
            Assoc::Right => {
                let mut i = units.len();
                while i > 0 {
                    i -= 1;
                    if matches_pass(&units[i]) {
                        self.merge_binary(units, i)?;
                        i -= 1;
                    }
                }
            }
        }
        Ok(())
    }

    fn merge_binary(&mut self, units: &mut Vec<Unit>, i: usize) -> Result<(), ParseError> {
        let at = units[i];
        let Some(Op::Binary(op)) = at.op() else {
            return Ok(());
        };
        let left_unit = i.checked_sub(1).map(|j| units[j]);
        let left = self.operand(left_unit.as_ref(), &at, "left")?;
        let right = self.operand(units.get(i + 1), &at, "right")?;
        let (left_unit, right_unit) = (units[i - 1], units[i + 1]);
        let span = left_unit.span.merge(right_unit.span);
        let node = self.build_binary(op, left, right, &at, span)?;
        units[i - 1] = Unit::new(UnitKind::Expr(node), span, left_unit.line);
        units.drain(i..=i + 1);
        Ok(())
    }

    // Pass 10

    fn reduce_not(&mut self, units: &mut Vec<Unit>) -> Result<(), ParseError> {
        let mut i = units.len();
        while i > 0 {
            i -= 1;
            if units[i].op() == Some(Op::Bang) {
                self.apply_unary(units, i, Op::Bang)?;
            }
        }
        Ok(())
    }

    // Pass 15

    fn reduce_ternary(&mut self, units: &mut Vec<Unit>) -> Result<(), ParseError> {
        let mut i = units.len();
        while i > 0 {
            i -= 1;
            if units[i].op() != Some(Op::Question) {
                continue;
            }
            let at = units[i];
            let cond_unit = i.checked_sub(1).map(|j| units[j]);
            let cond = self.operand(cond_unit.as_ref(), &at, "left")?;
            // Collection appends both branches right after the `?`.
            let then_branch = self.operand(units.get(i + 1), &at, "right")?;
            let else_branch = self.operand(units.get(i + 2), &at, "right")?;
            let span = units[i - 1].span.merge(units[i + 2].span);
            let line = units[i - 1].line;
            let node = self.build_ternary(cond, then_branch, else_branch, &at, span)?;
            units[i - 1] = Unit::new(UnitKind::Expr(node), span, line);
            units.drain(i..=i + 2);
            i -= 1;
        }
        Ok(())
    }

    // Pass 16

    fn reduce_assignment(&mut self, units: &mut Vec<Unit>) -> Result<(), ParseError> {
        let mut i = units.len();
        while i > 0 {
            i -= 1;
            let Some(Op::Assign(op)) = units[i].op() else {
                continue;
            };
            let at = units[i];
            let target_unit = i.checked_sub(1).map(|j| units[j]);
            let target = self.place(target_unit.as_ref(), &at, "left")?;
            let value = self.operand(units.get(i + 1), &at, "right")?;
            let span = units[i - 1].span.merge(units[i + 1].span);
            let line = units[i - 1].line;
            let node = match op {
                AssignOp::Assign => self.build_assign(target, value, &at, span)?,
                AssignOp::Compound(op) => self.build_compound(op, target, value, &at, span)?,
            };
            units[i - 1] = Unit::new(UnitKind::Expr(node), span, line);
            units.drain(i..=i + 1);
            i -= 1;
        }
        Ok(())
    }
}
