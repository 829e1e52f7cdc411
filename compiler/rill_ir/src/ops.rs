//! Operators and the dispatch plans chosen for them at parse time.
//!
//! The reducer resolves every operator application to a plan once, when the
//! node is built. Evaluation then dispatches on the plan alone and never
//! inspects operand types again.

use std::fmt;

use crate::{CallableId, TypeId};

/// Binary operators.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BinaryOp {
    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Pow,

    // Shift
    Shl,
    Shr,

    // Relational
    Lt,
    Gt,
    LtEq,
    GtEq,

    // Equality
    Eq,
    NotEq,

    // Bitwise (logical, non-short-circuit, on bool)
    BitAnd,
    BitOr,
    BitXor,

    // Short-circuit logical
    And,
    Or,
}

impl BinaryOp {
    pub fn as_symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Mod => "%",
            BinaryOp::Pow => "**",
            BinaryOp::Shl => "<<",
            BinaryOp::Shr => ">>",
            BinaryOp::Lt => "<",
            BinaryOp::Gt => ">",
            BinaryOp::LtEq => "<=",
            BinaryOp::GtEq => ">=",
            BinaryOp::Eq => "==",
            BinaryOp::NotEq => "!=",
            BinaryOp::BitAnd => "&",
            BinaryOp::BitOr => "|",
            BinaryOp::BitXor => "^",
            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
        }
    }

    /// Conventional name under which user types register an overload.
    pub fn overload_name(self) -> &'static str {
        match self {
            BinaryOp::Add => "op_Addition",
            BinaryOp::Sub => "op_Subtraction",
            BinaryOp::Mul => "op_Multiply",
            BinaryOp::Div => "op_Division",
            BinaryOp::Mod => "op_Modulus",
            BinaryOp::Pow => "op_Power",
            BinaryOp::Shl => "op_LeftShift",
            BinaryOp::Shr => "op_RightShift",
            BinaryOp::Lt => "op_LessThan",
            BinaryOp::Gt => "op_GreaterThan",
            BinaryOp::LtEq => "op_LessThanOrEqual",
            BinaryOp::GtEq => "op_GreaterThanOrEqual",
            BinaryOp::Eq => "op_Equality",
            BinaryOp::NotEq => "op_Inequality",
            BinaryOp::BitAnd => "op_BitwiseAnd",
            BinaryOp::BitOr => "op_BitwiseOr",
            BinaryOp::BitXor => "op_ExclusiveOr",
            BinaryOp::And => "op_LogicalAnd",
            BinaryOp::Or => "op_LogicalOr",
        }
    }

    pub fn is_arithmetic(self) -> bool {
        matches!(
            self,
            BinaryOp::Add
                | BinaryOp::Sub
                | BinaryOp::Mul
                | BinaryOp::Div
                | BinaryOp::Mod
                | BinaryOp::Pow
        )
    }

    pub fn is_shift(self) -> bool {
        matches!(self, BinaryOp::Shl | BinaryOp::Shr)
    }

    pub fn is_relational(self) -> bool {
        matches!(
            self,
            BinaryOp::Lt | BinaryOp::Gt | BinaryOp::LtEq | BinaryOp::GtEq
        )
    }

    pub fn is_equality(self) -> bool {
        matches!(self, BinaryOp::Eq | BinaryOp::NotEq)
    }

    pub fn is_bitwise(self) -> bool {
        matches!(self, BinaryOp::BitAnd | BinaryOp::BitOr | BinaryOp::BitXor)
    }

    pub fn is_short_circuit(self) -> bool {
        matches!(self, BinaryOp::And | BinaryOp::Or)
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_symbol())
    }
}

/// Prefix operators producing a new value.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum UnaryOp {
    /// `-x`
    Neg,
    /// `~x`
    BitNot,
    /// `!x`
    Not,
}

impl UnaryOp {
    pub fn as_symbol(self) -> &'static str {
        match self {
            UnaryOp::Neg => "-",
            UnaryOp::BitNot => "~",
            UnaryOp::Not => "!",
        }
    }

    pub fn overload_name(self) -> &'static str {
        match self {
            UnaryOp::Neg => "op_UnaryNegation",
            UnaryOp::BitNot => "op_OnesComplement",
            UnaryOp::Not => "op_LogicalNot",
        }
    }
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_symbol())
    }
}

/// `++` / `--`.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum IncDecOp {
    Increment,
    Decrement,
}

impl IncDecOp {
    pub fn as_symbol(self) -> &'static str {
        match self {
            IncDecOp::Increment => "++",
            IncDecOp::Decrement => "--",
        }
    }
}

/// Assignment family: `=` and the compound forms.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AssignOp {
    Assign,
    Compound(BinaryOp),
}

impl AssignOp {
    pub fn as_symbol(self) -> &'static str {
        match self {
            AssignOp::Assign => "=",
            AssignOp::Compound(BinaryOp::Add) => "+=",
            AssignOp::Compound(BinaryOp::Sub) => "-=",
            AssignOp::Compound(BinaryOp::Mul) => "*=",
            AssignOp::Compound(BinaryOp::Div) => "/=",
            AssignOp::Compound(BinaryOp::Mod) => "%=",
            AssignOp::Compound(BinaryOp::BitAnd) => "&=",
            AssignOp::Compound(BinaryOp::BitOr) => "|=",
            AssignOp::Compound(BinaryOp::BitXor) => "^=",
            AssignOp::Compound(BinaryOp::Shl) => "<<=",
            AssignOp::Compound(BinaryOp::Shr) => ">>=",
            AssignOp::Compound(_) => "op=",
        }
    }
}

/// How a binary node computes its value.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum BinaryPlan {
    /// Both operands `int`; arithmetic, bitwise, shift or comparison on i64.
    Int,
    /// Operands promoted to `double`. Relational operators always use this.
    Double,
    /// Both operands `bool`.
    Bool,
    /// String equality.
    Str,
    /// `+` with at least one string operand: textual concatenation.
    Concat,
    /// Default equality for non-primitive operands without an overload.
    Reference,
    /// Host-registered operator implementation, called with `[left, right]`.
    Overload(CallableId),
}

/// How a unary node computes its value.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum UnaryPlan {
    Int,
    Double,
    Bool,
    Overload(CallableId),
}

/// How a conversion node computes its value.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum CastPlan {
    /// Static type changes, runtime value does not (upcasts, `T` to `object`).
    Identity,
    /// Implicit numeric promotion.
    IntToDouble,
    /// Explicit truncation toward zero.
    DoubleToInt,
    /// Downcast: verify the runtime type of the value is assignable to the target.
    Checked(TypeId),
    /// Host-registered cast function.
    Host(CallableId),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn categories_are_disjoint() {
        let all = [
            BinaryOp::Add,
            BinaryOp::Sub,
            BinaryOp::Mul,
            BinaryOp::Div,
            BinaryOp::Mod,
            BinaryOp::Pow,
            BinaryOp::Shl,
            BinaryOp::Shr,
            BinaryOp::Lt,
            BinaryOp::Gt,
            BinaryOp::LtEq,
            BinaryOp::GtEq,
            BinaryOp::Eq,
            BinaryOp::NotEq,
            BinaryOp::BitAnd,
            BinaryOp::BitOr,
            BinaryOp::BitXor,
            BinaryOp::And,
            BinaryOp::Or,
        ];
        for op in all {
            let hits = [
                op.is_arithmetic(),
                op.is_shift(),
                op.is_relational(),
                op.is_equality(),
                op.is_bitwise(),
                op.is_short_circuit(),
            ]
            .iter()
            .filter(|b| **b)
            .count();
            assert_eq!(hits, 1, "{op:?}");
            assert!(op.overload_name().starts_with("op_"));
        }
    }

    #[test]
    fn compound_symbols() {
        assert_eq!(AssignOp::Assign.as_symbol(), "=");
        assert_eq!(AssignOp::Compound(BinaryOp::Shr).as_symbol(), ">>=");
        assert_eq!(AssignOp::Compound(BinaryOp::BitXor).as_symbol(), "^=");
    }
}
