//! Tree-walking evaluation of a built expression.
//!
//! Nodes are interpreted exactly as recorded: operator plans, conversions
//! and member callables were all chosen by the reducer. The only checks
//! left are the genuinely dynamic ones (arithmetic faults, nulls, indices,
//! checked casts) plus a conformance check on values coming back from host
//! callables.

mod place;


use rill_ir::{BinaryOp, BinaryPlan, CallableId, ExprArena, ExprId, ExprKind, ExprRange, TypeId};
use rill_stack::ensure_sufficient_stack;
use rill_types::{
    coerce, index_out_of_range, null_reference, type_mismatch, ArrayRef, EvalError, EvalResult,
    TypeRegistry, Value,
};
use smallvec::SmallVec;

use crate::{evaluate_binary, evaluate_unary, step, RuntimeContext};

type Args = SmallVec<[Value; 4]>;

/// Evaluates nodes of one arena against a registry.
///
/// Holds only shared references; cheap to create per evaluation.
#[derive(Copy, Clone)]
pub struct Evaluator<'a> {
    arena: &'a ExprArena,
    registry: &'a TypeRegistry,
}

impl<'a> Evaluator<'a> {
    pub fn new(arena: &'a ExprArena, registry: &'a TypeRegistry) -> Self {
        Evaluator { arena, registry }
    }

    /// Evaluate a node to its value.
    #[tracing::instrument(level = "debug", skip(self, ctx))]
    pub fn evaluate(&self, id: ExprId, ctx: &mut dyn RuntimeContext) -> EvalResult {
        self.eval(id, ctx)
    }

    /// Typed get: the node's value as `ty`, promoting `int` to `double`.
    pub fn eval_as(&self, id: ExprId, ty: TypeId, ctx: &mut dyn RuntimeContext) -> EvalResult {
        let node_ty = self.arena.ty(id);
        if !coerce::is_assignable(self.registry, node_ty, ty) {
            return Err(type_mismatch(
                self.registry.type_name(ty),
                self.registry.type_name(node_ty),
            )
            .with_span(self.arena.span(id)));
        }
        Ok(self.eval(id, ctx)?.promote(ty))
    }

    /// Typed set: store `value` through a settable node. Returns the stored
    /// value.
    pub fn assign(&self, id: ExprId, value: Value, ctx: &mut dyn RuntimeContext) -> EvalResult {
        let ty = self.arena.ty(id);
        let value = self.conform(value.promote(ty), ty)?;
        let place = self.place(id, ctx)?;
        self.store(&place, value.clone(), ctx)
            .map_err(|e| e.with_span(self.arena.span(id)))?;
        Ok(value)
    }

    /// Evaluate for effect only.
    pub fn execute(&self, id: ExprId, ctx: &mut dyn RuntimeContext) -> Result<(), EvalError> {
        self.eval(id, ctx).map(|_| ())
    }

    fn eval(&self, id: ExprId, ctx: &mut dyn RuntimeContext) -> EvalResult {
        ensure_sufficient_stack(|| self.eval_inner(id, ctx))
            .map_err(|e| e.with_span(self.arena.span(id)))
    }

    fn eval_inner(&self, id: ExprId, ctx: &mut dyn RuntimeContext) -> EvalResult {
        let ty = self.arena.ty(id);
        match *self.arena.kind(id) {
            ExprKind::Int(n) => Ok(Value::Int(n)),
            ExprKind::Double(bits) => Ok(Value::Double(f64::from_bits(bits))),
            ExprKind::Bool(b) => Ok(Value::Bool(b)),
            ExprKind::Str(name) => Ok(Value::string(self.registry.interner().lookup(name))),
            ExprKind::Ident(name) => ctx.get(name, ty),

            ExprKind::Unary { op, plan, operand } => {
                let value = self.eval(operand, ctx)?;
                evaluate_unary(self.registry, op, plan, value, ty)
            }
            ExprKind::Binary {
                op,
                plan,
                left,
                right,
            } => {
                let left = self.eval(left, ctx)?;
                if op.is_short_circuit() && plan == BinaryPlan::Bool {
                    let l = left.to_bool()?;
                    // `false && _` and `true || _` never evaluate the right side.
                    if l == (op == BinaryOp::Or) {
                        return Ok(Value::Bool(l));
                    }
                    return Ok(Value::Bool(self.eval(right, ctx)?.to_bool()?));
                }
                let right = self.eval(right, ctx)?;
                evaluate_binary(self.registry, op, plan, left, right, ty)
            }
            ExprKind::Ternary {
                cond,
                then_branch,
                else_branch,
            } => {
                if self.eval(cond, ctx)?.to_bool()? {
                    self.eval(then_branch, ctx)
                } else {
                    self.eval(else_branch, ctx)
                }
            }

            ExprKind::Assign { target, value } => {
                let place = self.place(target, ctx)?;
                let value = self.eval(value, ctx)?;
                self.store(&place, value.clone(), ctx)?;
                Ok(value)
            }
            ExprKind::CompoundAssign {
                op,
                plan,
                target,
                value,
            } => {
                let place = self.place(target, ctx)?;
                let current = self.load(&place, ctx)?;
                let rhs = self.eval(value, ctx)?;
                let result = evaluate_binary(self.registry, op, plan, current, rhs, ty)?
                    .promote(place.ty());
                self.store(&place, result.clone(), ctx)?;
                Ok(result)
            }
            ExprKind::IncDec {
                op,
                postfix,
                target,
            } => {
                let place = self.place(target, ctx)?;
                let old = self.load(&place, ctx)?;
                let new = step(op, &old)?;
                self.store(&place, new.clone(), ctx)?;
                Ok(if postfix { old } else { new })
            }

            ExprKind::Cast { operand, plan } => {
                let value = self.eval(operand, ctx)?;
                coerce::apply_cast(self.registry, plan, value, ty)
            }

            ExprKind::Index {
                target, index, get, ..
            } => {
                let container = self.receiver(target, "indexer", ctx)?;
                let index = self.eval(index, ctx)?;
                self.call(get, &[container, index], ty)
            }
            ExprKind::Property { receiver, get, .. } => match receiver {
                Some(receiver) => {
                    let receiver = self.receiver(receiver, "property access", ctx)?;
                    self.call(get, &[receiver], ty)
                }
                None => self.call(get, &[], ty),
            },
            ExprKind::MethodCall {
                receiver,
                callable,
                args,
            } => {
                let mut values = Args::new();
                values.push(self.receiver(receiver, "method call", ctx)?);
                self.eval_list(args, &mut values, ctx)?;
                self.call(callable, &values, ty)
            }
            ExprKind::Call { callable, args } => {
                let mut values = Args::new();
                self.eval_list(args, &mut values, ctx)?;
                self.call(callable, &values, ty)
            }

            ExprKind::New {
                ctor,
                args,
                items,
                insert,
            } => {
                let mut values = Args::new();
                self.eval_list(args, &mut values, ctx)?;
                let object = self.call(ctor, &values, ty)?;
                if let Some(insert) = insert {
                    for &item in self.arena.get_expr_list(items) {
                        let item = self.eval(item, ctx)?;
                        self.registry
                            .call(insert, &[object.clone(), item], TypeId::VOID)?;
                    }
                }
                Ok(object)
            }
            ExprKind::NewArray { elem, count, items } => {
                let items = self.arena.get_expr_list(items);
                let len = match count {
                    Some(count) => {
                        let n = self.eval(count, ctx)?.to_int()?;
                        let len = usize::try_from(n).map_err(|_| index_out_of_range(n, 0))?;
                        if items.len() > len {
                            return Err(index_out_of_range(
                                i64::try_from(items.len()).unwrap_or(i64::MAX),
                                len,
                            ));
                        }
                        len
                    }
                    None => items.len(),
                };
                let mut elems = Vec::with_capacity(len);
                for &item in items {
                    elems.push(self.eval(item, ctx)?);
                }
                elems.resize(len, Value::default_for(elem));
                Ok(Value::Array(ArrayRef::new(ty, elems)))
            }
        }
    }

    fn eval_list(
        &self,
        range: ExprRange,
        out: &mut Args,
        ctx: &mut dyn RuntimeContext,
    ) -> Result<(), EvalError> {
        for &id in self.arena.get_expr_list(range) {
            out.push(self.eval(id, ctx)?);
        }
        Ok(())
    }

    /// Evaluate a member receiver, rejecting null.
    fn receiver(
        &self,
        id: ExprId,
        context: &str,
        ctx: &mut dyn RuntimeContext,
    ) -> EvalResult {
        match self.eval(id, ctx)? {
            Value::Null => Err(null_reference(context).with_span(self.arena.span(id))),
            value => Ok(value),
        }
    }

    /// Invoke a host callable and check its result against the node type.
    fn call(&self, callable: CallableId, args: &[Value], ty: TypeId) -> EvalResult {
        let value = self.registry.call(callable, args, ty)?;
        if ty == TypeId::VOID {
            return Ok(value);
        }
        self.conform(value.promote(ty), ty)
    }

    fn conform(&self, value: Value, ty: TypeId) -> EvalResult {
        if coerce::value_conforms(self.registry, &value, ty) {
            Ok(value)
        } else {
            Err(type_mismatch(
                self.registry.type_name(ty),
                coerce::runtime_type_name(self.registry, &value),
            ))
        }
    }
}
