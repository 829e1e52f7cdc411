//! Flat expression arena.
//!
//! Every node the reducer builds lives in an [`ExprArena`] and is referred
//! to by [`ExprId`]. The arena uses struct-of-arrays layout: parallel
//! `kinds`, `spans` and `types` arrays indexed by `ExprId`, plus a flat
//! `expr_lists` pool addressed by [`ExprRange`] for argument and
//! initializer lists.
//!
//! Nodes are immutable once pushed. The static type recorded for a node is
//! the type its evaluation produces, and every operator or member node
//! carries the dispatch decision made when it was built.

use std::fmt;
use std::fmt::Write as _;

use crate::{
    BinaryOp, BinaryPlan, CastPlan, IncDecOp, Name, Span, StringInterner, TypeId, UnaryOp,
    UnaryPlan,
};


/// Index into an [`ExprArena`].
#[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct ExprId(u32);

impl ExprId {
    #[inline]
    pub const fn new(index: u32) -> Self {
        ExprId(index)
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for ExprId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ExprId({})", self.0)
    }
}

/// Range of expressions in the arena's flattened list pool.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[repr(C)]
pub struct ExprRange {
    pub start: u32,
    pub len: u16,
}

impl ExprRange {
    pub const EMPTY: ExprRange = ExprRange { start: 0, len: 0 };

    #[inline]
    pub const fn new(start: u32, len: u16) -> Self {
        ExprRange { start, len }
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub const fn len(&self) -> usize {
        self.len as usize
    }
}

/// Index of a host callable in the type registry.
#[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct CallableId(u32);

impl CallableId {
    #[inline]
    pub const fn new(index: u32) -> Self {
        CallableId(index)
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for CallableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Expression node kinds.
///
/// Child expressions are `ExprId`s into the same arena. The node's static
/// type is stored alongside it, not in the kind.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ExprKind {
    /// Integer literal.
    Int(i64),
    /// Double literal (stored as bits).
    Double(u64),
    Bool(bool),
    /// String literal (interned).
    Str(Name),

    /// Reference to a variable in the runtime context. Gettable and settable.
    Ident(Name),

    /// `-x`, `~x`, `!x`
    Unary {
        op: UnaryOp,
        plan: UnaryPlan,
        operand: ExprId,
    },

    /// Every binary operator including `&&`, `||` and string `+`.
    /// Operands have already been converted to the types `plan` expects.
    Binary {
        op: BinaryOp,
        plan: BinaryPlan,
        left: ExprId,
        right: ExprId,
    },

    /// `cond ? then : else`
    Ternary {
        cond: ExprId,
        then_branch: ExprId,
        else_branch: ExprId,
    },

    /// `target = value`. `value` already has the target's type.
    Assign { target: ExprId, value: ExprId },

    /// `target op= value`. The operation reads `target`, applies `plan`
    /// and stores the result back through `target`.
    CompoundAssign {
        op: BinaryOp,
        plan: BinaryPlan,
        target: ExprId,
        value: ExprId,
    },

    /// `++x`, `x++`, `--x`, `x--` on a numeric modifiable target.
    IncDec {
        op: IncDecOp,
        postfix: bool,
        target: ExprId,
    },

    /// Explicit cast or an implicit conversion inserted by the reducer.
    Cast { operand: ExprId, plan: CastPlan },

    /// `target[index]`, routed through the container's indexer callables.
    Index {
        target: ExprId,
        index: ExprId,
        get: CallableId,
        set: Option<CallableId>,
    },

    /// Property access. `receiver` is `None` for static properties.
    Property {
        receiver: Option<ExprId>,
        get: CallableId,
        set: Option<CallableId>,
    },

    /// Instance method call; the receiver is passed as the first argument.
    MethodCall {
        receiver: ExprId,
        callable: CallableId,
        args: ExprRange,
    },

    /// Static method or global function call.
    Call { callable: CallableId, args: ExprRange },

    /// `new T(args) { items }`. `insert` is set when `items` is non-empty.
    New {
        ctor: CallableId,
        args: ExprRange,
        items: ExprRange,
        insert: Option<CallableId>,
    },

    /// `new T[count] { items }`. Slots past the initializer hold the
    /// element type's default value.
    NewArray {
        elem: TypeId,
        count: Option<ExprId>,
        items: ExprRange,
    },
}

impl ExprKind {
    pub fn is_literal(&self) -> bool {
        matches!(
            self,
            ExprKind::Int(_) | ExprKind::Double(_) | ExprKind::Bool(_) | ExprKind::Str(_)
        )
    }

    /// Whether the node can be the target of an assignment.
    pub fn is_settable(&self) -> bool {
        match self {
            ExprKind::Ident(_) => true,
            ExprKind::Index { set, .. } | ExprKind::Property { set, .. } => set.is_some(),
            _ => false,
        }
    }
}

fn to_u32(value: usize, what: &str) -> u32 {
    u32::try_from(value).unwrap_or_else(|_| panic!("too many {what}: {value} exceeds u32::MAX"))
}

fn to_u16(value: usize, what: &str) -> u16 {
    u16::try_from(value).unwrap_or_else(|_| panic!("{what} too long: {value} exceeds u16::MAX"))
}

/// Arena for expression nodes.
///
/// # Index Spaces
///
/// - `kinds`/`spans`/`types`: parallel arrays indexed by [`ExprId`]
/// - `expr_lists`: flat `Vec<ExprId>` indexed by [`ExprRange`]
#[derive(Clone, Debug, Default)]
pub struct ExprArena {
    kinds: Vec<ExprKind>,
    spans: Vec<Span>,
    types: Vec<TypeId>,
    expr_lists: Vec<ExprId>,
}

impl ExprArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-allocate for roughly one node per token.
    pub fn with_capacity(tokens: usize) -> Self {
        ExprArena {
            kinds: Vec::with_capacity(tokens),
            spans: Vec::with_capacity(tokens),
            types: Vec::with_capacity(tokens),
            expr_lists: Vec::new(),
        }
    }

    /// Allocate a node, returning its ID.
    pub fn push(&mut self, kind: ExprKind, span: Span, ty: TypeId) -> ExprId {
        let id = ExprId::new(to_u32(self.kinds.len(), "expressions"));
        self.kinds.push(kind);
        self.spans.push(span);
        self.types.push(ty);
        id
    }

    #[inline]
    pub fn kind(&self, id: ExprId) -> &ExprKind {
        &self.kinds[id.index()]
    }

    #[inline]
    pub fn span(&self, id: ExprId) -> Span {
        self.spans[id.index()]
    }

    /// Static type of a node's value.
    #[inline]
    pub fn ty(&self, id: ExprId) -> TypeId {
        self.types[id.index()]
    }

    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }

    /// Allocate a contiguous range of expression IDs.
    pub fn push_expr_list(&mut self, ids: &[ExprId]) -> ExprRange {
        if ids.is_empty() {
            return ExprRange::EMPTY;
        }
        let start = to_u32(self.expr_lists.len(), "expression lists");
        self.expr_lists.extend_from_slice(ids);
        ExprRange::new(start, to_u16(ids.len(), "expression list"))
    }

    pub fn get_expr_list(&self, range: ExprRange) -> &[ExprId] {
        if range.is_empty() {
            return &[];
        }
        let start = range.start as usize;
        &self.expr_lists[start..start + range.len()]
    }

    /// Render a node as an s-expression, mostly for tests and trace output.
    ///
    /// Implicit conversions are shown as `(as <type> x)`; callables by id.
    pub fn dump(&self, id: ExprId, interner: &StringInterner) -> String {
        let mut out = String::new();
        self.dump_into(id, interner, &mut out);
        out
    }

    fn dump_into(&self, id: ExprId, interner: &StringInterner, out: &mut String) {
        match *self.kind(id) {
            ExprKind::Int(v) => {
                let _ = write!(out, "{v}");
            }
            ExprKind::Double(bits) => {
                let _ = write!(out, "{:?}", f64::from_bits(bits));
            }
            ExprKind::Bool(b) => {
                let _ = write!(out, "{b}");
            }
            ExprKind::Str(name) => {
                let _ = write!(out, "{:?}", interner.lookup(name));
            }
            ExprKind::Ident(name) => out.push_str(interner.lookup(name)),
            ExprKind::Unary { op, operand, .. } => {
                let _ = write!(out, "({op} ");
                self.dump_into(operand, interner, out);
                out.push(')');
            }
            ExprKind::Binary {
                op, left, right, ..
            } => {
                let _ = write!(out, "({op} ");
                self.dump_into(left, interner, out);
                out.push(' ');
                self.dump_into(right, interner, out);
                out.push(')');
            }
            ExprKind::Ternary {
                cond,
                then_branch,
                else_branch,
            } => {
                out.push_str("(? ");
                self.dump_into(cond, interner, out);
                out.push(' ');
                self.dump_into(then_branch, interner, out);
                out.push(' ');
                self.dump_into(else_branch, interner, out);
                out.push(')');
            }
            ExprKind::Assign { target, value } => {
                out.push_str("(= ");
                self.dump_into(target, interner, out);
                out.push(' ');
                self.dump_into(value, interner, out);
                out.push(')');
            }
            ExprKind::CompoundAssign {
                op, target, value, ..
            } => {
                let _ = write!(out, "({op}= ");
                self.dump_into(target, interner, out);
                out.push(' ');
                self.dump_into(value, interner, out);
                out.push(')');
            }
            ExprKind::IncDec {
                op,
                postfix,
                target,
            } => {
                let fix = if postfix { "post" } else { "pre" };
                let _ = write!(out, "({fix}{} ", op.as_symbol());
                self.dump_into(target, interner, out);
                out.push(')');
            }
            ExprKind::Cast { operand, .. } => {
                let ty = self.ty(id);
                match ty.primitive_name() {
                    Some(name) => {
                        let _ = write!(out, "(as {name} ");
                    }
                    None => {
                        let _ = write!(out, "(as {ty:?} ");
                    }
                }
                self.dump_into(operand, interner, out);
                out.push(')');
            }
            ExprKind::Index { target, index, .. } => {
                out.push_str("(index ");
                self.dump_into(target, interner, out);
                out.push(' ');
                self.dump_into(index, interner, out);
                out.push(')');
            }
            ExprKind::Property { receiver, get, .. } => {
                let _ = write!(out, "(prop {get:?}");
                if let Some(receiver) = receiver {
                    out.push(' ');
                    self.dump_into(receiver, interner, out);
                }
                out.push(')');
            }
            ExprKind::MethodCall {
                receiver,
                callable,
                args,
            } => {
                let _ = write!(out, "(call {callable:?} ");
                self.dump_into(receiver, interner, out);
                self.dump_list(args, interner, out);
                out.push(')');
            }
            ExprKind::Call { callable, args } => {
                let _ = write!(out, "(call {callable:?}");
                self.dump_list(args, interner, out);
                out.push(')');
            }
            ExprKind::New { args, items, .. } => {
                let _ = write!(out, "(new {:?}", self.ty(id));
                self.dump_list(args, interner, out);
                if !items.is_empty() {
                    out.push_str(" {");
                    self.dump_list(items, interner, out);
                    out.push_str(" }");
                }
                out.push(')');
            }
            ExprKind::NewArray { elem, count, items } => {
                let _ = write!(out, "(new-array {elem:?}");
                if let Some(count) = count {
                    out.push(' ');
                    self.dump_into(count, interner, out);
                }
                if !items.is_empty() {
                    out.push_str(" {");
                    self.dump_list(items, interner, out);
                    out.push_str(" }");
                }
                out.push(')');
            }
        }
    }

    fn dump_list(&self, range: ExprRange, interner: &StringInterner, out: &mut String) {
        for &item in self.get_expr_list(range) {
            out.push(' ');
            self.dump_into(item, interner, out);
        }
    }
}
