//! Constant folding of operations whose operands are all literals.
//!
//! The node is evaluated with the ordinary evaluator, so folded and
//! unfolded trees agree by construction. A node whose evaluation fails is
//! kept as is and fails again at evaluation time.

use rill_eval::{EmptyContext, Evaluator};
use rill_ir::{BinaryPlan, CastPlan, ExprId, ExprKind, TypeId, UnaryPlan};
use rill_types::Value;

use super::Parser;

impl Parser<'_> {
    pub(super) fn fold(&mut self, id: ExprId) -> ExprId {
        if !self.options.fold_constants || !self.is_foldable(id) {
            return id;
        }
        let value = match Evaluator::new(&self.arena, self.registry).evaluate(id, &mut EmptyContext)
        {
            Ok(value) => value,
            Err(err) => {
                tracing::trace!(%err, "left unfolded");
                return id;
            }
        };
        let ty = self.arena.ty(id);
        let kind = match value {
            Value::Int(n) if ty == TypeId::INT => ExprKind::Int(n),
            Value::Double(d) if ty == TypeId::DOUBLE => ExprKind::Double(d.to_bits()),
            Value::Bool(b) if ty == TypeId::BOOL => ExprKind::Bool(b),
            Value::Str(s) if ty == TypeId::STRING => ExprKind::Str(self.interner().intern(&s)),
            _ => return id,
        };
        tracing::trace!(?kind, "folded");
        self.arena.push(kind, self.arena.span(id), ty)
    }

    fn is_foldable(&self, id: ExprId) -> bool {
        let literal = |id: ExprId| self.arena.kind(id).is_literal();
        match *self.arena.kind(id) {
            ExprKind::Unary { plan, operand, .. } => {
                !matches!(plan, UnaryPlan::Overload(_)) && literal(operand)
            }
            ExprKind::Binary {
                plan, left, right, ..
            } => !matches!(plan, BinaryPlan::Overload(_)) && literal(left) && literal(right),
            ExprKind::Cast { plan, operand } => {
                matches!(
                    plan,
                    CastPlan::Identity | CastPlan::IntToDouble | CastPlan::DoubleToInt
                ) && literal(operand)
            }
            _ => false,
        }
    }
}
