//! Parsing units: the transient list the reduction passes rewrite.
//!
//! The collection phase turns tokens into units. Each reduction pass
//! replaces operator units and their operands with one resolved node,
//! until one unit (or none) is left.

use bitflags::bitflags;
use rill_ir::{AssignOp, BinaryOp, ExprArena, ExprId, ExprKind, IncDecOp, Span, TokenKind, TypeId};

bitflags! {
    /// What a unit can be used for.
    #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
    pub struct UnitFlags: u8 {
        /// Yields a value.
        const GETTABLE = 1 << 0;
        /// Can be assigned through.
        const SETTABLE = 1 << 1;
        const MODIFIABLE = Self::GETTABLE.bits() | Self::SETTABLE.bits();
        /// Has an effect when evaluated for its own sake.
        const EXECUTABLE = 1 << 2;
        /// Names a type rather than a value (`Math`, `string`).
        const TYPE_REF = 1 << 3;
    }
}

impl UnitFlags {
    /// Capabilities of a finished node.
    pub fn of_node(arena: &ExprArena, id: ExprId) -> Self {
        let kind = arena.kind(id);
        let returns_value = arena.ty(id) != TypeId::VOID;
        let mut flags = UnitFlags::empty();
        if returns_value {
            flags |= UnitFlags::GETTABLE;
        }
        if kind.is_settable() {
            flags |= UnitFlags::SETTABLE;
        }
        // A call is either a value or an effect, never both.
        let executable = match kind {
            ExprKind::Assign { .. }
            | ExprKind::CompoundAssign { .. }
            | ExprKind::IncDec { .. }
            | ExprKind::New { .. } => true,
            ExprKind::MethodCall { .. } | ExprKind::Call { .. } => !returns_value,
            _ => false,
        };
        if executable {
            flags |= UnitFlags::EXECUTABLE;
        }
        flags
    }
}

/// An operator token awaiting its pass.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Op {
    /// Every binary operator. `-` in prefix position is reduced as negation.
    Binary(BinaryOp),
    Bang,
    Tilde,
    IncDec(IncDecOp),
    Assign(AssignOp),
    Question,
}

impl Op {
    pub(crate) fn from_token(kind: &TokenKind) -> Option<Self> {
        let op = match kind {
            TokenKind::Plus => Op::Binary(BinaryOp::Add),
            TokenKind::Minus => Op::Binary(BinaryOp::Sub),
            TokenKind::Star => Op::Binary(BinaryOp::Mul),
            TokenKind::Slash => Op::Binary(BinaryOp::Div),
            TokenKind::Percent => Op::Binary(BinaryOp::Mod),
            TokenKind::StarStar => Op::Binary(BinaryOp::Pow),
            TokenKind::Shl => Op::Binary(BinaryOp::Shl),
            TokenKind::Shr => Op::Binary(BinaryOp::Shr),
            TokenKind::Lt => Op::Binary(BinaryOp::Lt),
            TokenKind::Gt => Op::Binary(BinaryOp::Gt),
            TokenKind::LtEq => Op::Binary(BinaryOp::LtEq),
            TokenKind::GtEq => Op::Binary(BinaryOp::GtEq),
            TokenKind::EqEq => Op::Binary(BinaryOp::Eq),
            TokenKind::NotEq => Op::Binary(BinaryOp::NotEq),
            TokenKind::Amp => Op::Binary(BinaryOp::BitAnd),
            TokenKind::Pipe => Op::Binary(BinaryOp::BitOr),
            TokenKind::Caret => Op::Binary(BinaryOp::BitXor),
            TokenKind::AmpAmp => Op::Binary(BinaryOp::And),
            TokenKind::PipePipe => Op::Binary(BinaryOp::Or),
            TokenKind::Bang => Op::Bang,
            TokenKind::Tilde => Op::Tilde,
            TokenKind::PlusPlus => Op::IncDec(IncDecOp::Increment),
            TokenKind::MinusMinus => Op::IncDec(IncDecOp::Decrement),
            TokenKind::Eq => Op::Assign(AssignOp::Assign),
            TokenKind::PlusEq => Op::Assign(AssignOp::Compound(BinaryOp::Add)),
            TokenKind::MinusEq => Op::Assign(AssignOp::Compound(BinaryOp::Sub)),
            TokenKind::StarEq => Op::Assign(AssignOp::Compound(BinaryOp::Mul)),
            TokenKind::SlashEq => Op::Assign(AssignOp::Compound(BinaryOp::Div)),
            TokenKind::PercentEq => Op::Assign(AssignOp::Compound(BinaryOp::Mod)),
            TokenKind::AmpEq => Op::Assign(AssignOp::Compound(BinaryOp::BitAnd)),
            TokenKind::PipeEq => Op::Assign(AssignOp::Compound(BinaryOp::BitOr)),
            TokenKind::CaretEq => Op::Assign(AssignOp::Compound(BinaryOp::BitXor)),
            TokenKind::ShlEq => Op::Assign(AssignOp::Compound(BinaryOp::Shl)),
            TokenKind::ShrEq => Op::Assign(AssignOp::Compound(BinaryOp::Shr)),
            TokenKind::Question => Op::Question,
            _ => return None,
        };
        Some(op)
    }

    pub(crate) fn as_symbol(self) -> &'static str {
        match self {
            Op::Binary(op) => op.as_symbol(),
            Op::Bang => "!",
            Op::Tilde => "~",
            Op::IncDec(op) => op.as_symbol(),
            Op::Assign(op) => op.as_symbol(),
            Op::Question => "?",
        }
    }

    /// Operators that may start an operand: `-x`, `~x`.
    pub(crate) fn is_prefix_arithmetic(self) -> bool {
        matches!(self, Op::Binary(BinaryOp::Sub) | Op::Tilde)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum UnitKind {
    Op(Op),
    Expr(ExprId),
    /// A static type reference, only meaningful before `.`.
    TypeRef(TypeId),
    /// `[index]` whose container is the preceding unit.
    PendingIndex { index: ExprId },
    /// `(T)` waiting for its operand.
    Cast(TypeId),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) struct Unit {
    pub kind: UnitKind,
    pub span: Span,
    pub line: u32,
}

impl Unit {
    pub(crate) fn new(kind: UnitKind, span: Span, line: u32) -> Self {
        Unit { kind, span, line }
    }

    pub(crate) fn op(&self) -> Option<Op> {
        match self.kind {
            UnitKind::Op(op) => Some(op),
            _ => None,
        }
    }

    pub(crate) fn expr(&self) -> Option<ExprId> {
        match self.kind {
            UnitKind::Expr(id) => Some(id),
            _ => None,
        }
    }

    /// Whether this unit ends an operand, so a following `-` is binary.
    pub(crate) fn ends_operand(&self) -> bool {
        matches!(
            self.kind,
            UnitKind::Expr(_) | UnitKind::TypeRef(_) | UnitKind::PendingIndex { .. }
        )
    }

    pub(crate) fn flags(&self, arena: &ExprArena) -> UnitFlags {
        match self.kind {
            UnitKind::Expr(id) => UnitFlags::of_node(arena, id),
            UnitKind::TypeRef(_) => UnitFlags::TYPE_REF,
            UnitKind::Op(_) | UnitKind::PendingIndex { .. } | UnitKind::Cast(_) => {
                UnitFlags::empty()
            }
        }
    }
}
