//! Choosing how an operator application is computed.
//!
//! Primitive operand pairs map onto a fixed plan (`Int`, `Double`, ...).
//! Any `object` or non-primitive operand goes through the registry's
//! operator tables first; `==`/`!=` then fall back to reference equality
//! and everything else is unsupported.

use rill_ir::{BinaryOp, BinaryPlan, TypeId, UnaryOp, UnaryPlan};

use crate::coerce::is_assignable;
use crate::{ResolveError, TypeRegistry};


/// Plan and conversions for a binary operator application.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct BinaryTyping {
    pub plan: BinaryPlan,
    /// Type the left operand is converted to before the operator runs.
    pub left_to: TypeId,
    pub right_to: TypeId,
    pub result: TypeId,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct UnaryTyping {
    pub plan: UnaryPlan,
    pub operand_to: TypeId,
    pub result: TypeId,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OperatorError {
    /// Primitive operands the operator does not accept (`true + 1`).
    TypeMismatch,
    /// Non-primitive operands with no registered overload.
    Unsupported,
    Ambiguous { candidates: Vec<String> },
}

impl From<ResolveError> for OperatorError {
    fn from(err: ResolveError) -> Self {
        match err {
            ResolveError::Ambiguous { candidates } => OperatorError::Ambiguous { candidates },
            _ => OperatorError::Unsupported,
        }
    }
}

fn is_builtin_value(ty: TypeId) -> bool {
    matches!(
        ty,
        TypeId::INT | TypeId::DOUBLE | TypeId::BOOL | TypeId::STRING
    )
}

fn typing(plan: BinaryPlan, left_to: TypeId, right_to: TypeId, result: TypeId) -> BinaryTyping {
    BinaryTyping {
        plan,
        left_to,
        right_to,
        result,
    }
}

/// Numeric plan for two numeric operands: `int` if both are, else both
/// promote to `double`.
fn numeric(left: TypeId, right: TypeId) -> (BinaryPlan, TypeId) {
    if left == TypeId::INT && right == TypeId::INT {
        (BinaryPlan::Int, TypeId::INT)
    } else {
        (BinaryPlan::Double, TypeId::DOUBLE)
    }
}

pub fn binary(
    reg: &TypeRegistry,
    op: BinaryOp,
    left: TypeId,
    right: TypeId,
) -> Result<BinaryTyping, OperatorError> {
    if left == TypeId::VOID || right == TypeId::VOID {
        return Err(OperatorError::TypeMismatch);
    }
    if !is_builtin_value(left) || !is_builtin_value(right) {
        return user_binary(reg, op, left, right);
    }

    let both_numeric = left.is_numeric() && right.is_numeric();
    let both = |ty: TypeId| left == ty && right == ty;

    if op == BinaryOp::Add && (left == TypeId::STRING || right == TypeId::STRING) {
        return Ok(typing(BinaryPlan::Concat, left, right, TypeId::STRING));
    }
    let typed = if op.is_arithmetic() && both_numeric {
        let (plan, ty) = numeric(left, right);
        typing(plan, ty, ty, ty)
    } else if op.is_shift() && both(TypeId::INT) {
        typing(BinaryPlan::Int, TypeId::INT, TypeId::INT, TypeId::INT)
    } else if op.is_bitwise() && both(TypeId::INT) {
        typing(BinaryPlan::Int, TypeId::INT, TypeId::INT, TypeId::INT)
    } else if (op.is_bitwise() || op.is_short_circuit()) && both(TypeId::BOOL) {
        typing(BinaryPlan::Bool, TypeId::BOOL, TypeId::BOOL, TypeId::BOOL)
    } else if op.is_relational() && both_numeric {
        typing(BinaryPlan::Double, TypeId::DOUBLE, TypeId::DOUBLE, TypeId::BOOL)
    } else if op.is_equality() && both_numeric {
        let (plan, ty) = numeric(left, right);
        typing(plan, ty, ty, TypeId::BOOL)
    } else if op.is_equality() && both(TypeId::BOOL) {
        typing(BinaryPlan::Bool, TypeId::BOOL, TypeId::BOOL, TypeId::BOOL)
    } else if op.is_equality() && both(TypeId::STRING) {
        typing(BinaryPlan::Str, TypeId::STRING, TypeId::STRING, TypeId::BOOL)
    } else {
        return Err(OperatorError::TypeMismatch);
    };
    Ok(typed)
}

fn user_binary(
    reg: &TypeRegistry,
    op: BinaryOp,
    left: TypeId,
    right: TypeId,
) -> Result<BinaryTyping, OperatorError> {
    if let Some(call) = reg.resolve_binary_operator(op, left, right)? {
        return Ok(typing(
            BinaryPlan::Overload(call.callable),
            call.params[0],
            call.params[1],
            call.ret,
        ));
    }
    if op == BinaryOp::Add && (left == TypeId::STRING || right == TypeId::STRING) {
        return Ok(typing(BinaryPlan::Concat, left, right, TypeId::STRING));
    }
    if op.is_equality() && (is_assignable(reg, left, right) || is_assignable(reg, right, left)) {
        return Ok(typing(BinaryPlan::Reference, left, right, TypeId::BOOL));
    }
    Err(OperatorError::Unsupported)
}

pub fn unary(reg: &TypeRegistry, op: UnaryOp, operand: TypeId) -> Result<UnaryTyping, OperatorError> {
    let plan = match (op, operand) {
        (UnaryOp::Neg | UnaryOp::BitNot, TypeId::INT) => Some(UnaryPlan::Int),
        (UnaryOp::Neg, TypeId::DOUBLE) => Some(UnaryPlan::Double),
        (UnaryOp::Not, TypeId::BOOL) => Some(UnaryPlan::Bool),
        _ => None,
    };
    if let Some(plan) = plan {
        return Ok(UnaryTyping {
            plan,
            operand_to: operand,
            result: operand,
        });
    }
    if is_builtin_value(operand) || operand == TypeId::VOID {
        return Err(OperatorError::TypeMismatch);
    }
    match reg.resolve_unary_operator(op, operand)? {
        Some(call) => Ok(UnaryTyping {
            plan: UnaryPlan::Overload(call.callable),
            operand_to: call.params[0],
            result: call.ret,
        }),
        None => Err(OperatorError::Unsupported),
    }
}

/// `target op= value`: the operator's result must convert back into the
/// target's type.
pub fn compound(
    reg: &TypeRegistry,
    op: BinaryOp,
    target: TypeId,
    value: TypeId,
) -> Result<BinaryTyping, OperatorError> {
    if op.is_short_circuit() {
        return Err(OperatorError::Unsupported);
    }
    let typed = binary(reg, op, target, value)?;
    if is_assignable(reg, typed.result, target) {
        Ok(typed)
    } else {
        Err(OperatorError::TypeMismatch)
    }
}

/// `++`/`--` apply to numeric targets only.
pub fn inc_dec(target: TypeId) -> Option<UnaryPlan> {
    match target {
        TypeId::INT => Some(UnaryPlan::Int),
        TypeId::DOUBLE => Some(UnaryPlan::Double),
        _ => None,
    }
}
