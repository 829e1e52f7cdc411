//! Assignable locations.
//!
//! A place is evaluated once: the receiver and index of `a[i()] += 1` are
//! computed a single time, then read and written through.

use rill_ir::{CallableId, ExprId, ExprKind, Name, TypeId};
use rill_types::{type_mismatch, EvalError, EvalResult, Value};

use super::Evaluator;
use crate::RuntimeContext;

pub(super) enum Place {
    Variable {
        name: Name,
        ty: TypeId,
    },
    Element {
        container: Value,
        index: Value,
        get: CallableId,
        set: CallableId,
        ty: TypeId,
    },
    Property {
        receiver: Option<Value>,
        get: CallableId,
        set: CallableId,
        ty: TypeId,
    },
}

impl Place {
    pub(super) fn ty(&self) -> TypeId {
        match self {
            Place::Variable { ty, .. } | Place::Element { ty, .. } | Place::Property { ty, .. } => {
                *ty
            }
        }
    }
}

impl Evaluator<'_> {
    pub(super) fn place(
        &self,
        id: ExprId,
        ctx: &mut dyn RuntimeContext,
    ) -> Result<Place, EvalError> {
        let ty = self.arena.ty(id);
        match *self.arena.kind(id) {
            ExprKind::Ident(name) => Ok(Place::Variable { name, ty }),
            ExprKind::Index {
                target,
                index,
                get,
                set: Some(set),
            } => {
                let container = self.receiver(target, "indexer", ctx)?;
                let index = self.eval(index, ctx)?;
                Ok(Place::Element {
                    container,
                    index,
                    get,
                    set,
                    ty,
                })
            }
            ExprKind::Property {
                receiver,
                get,
                set: Some(set),
            } => {
                let receiver = match receiver {
                    Some(r) => Some(self.receiver(r, "property access", ctx)?),
                    None => None,
                };
                Ok(Place::Property {
                    receiver,
                    get,
                    set,
                    ty,
                })
            }
            _ => Err(type_mismatch("settable expression", "value")
                .with_span(self.arena.span(id))),
        }
    }

    pub(super) fn load(&self, place: &Place, ctx: &mut dyn RuntimeContext) -> EvalResult {
        match place {
            Place::Variable { name, ty } => ctx.get(*name, *ty),
            Place::Element {
                container,
                index,
                get,
                ty,
                ..
            } => self.call(*get, &[container.clone(), index.clone()], *ty),
            Place::Property {
                receiver, get, ty, ..
            } => match receiver {
                Some(r) => self.call(*get, std::slice::from_ref(r), *ty),
                None => self.call(*get, &[], *ty),
            },
        }
    }

    pub(super) fn store(
        &self,
        place: &Place,
        value: Value,
        ctx: &mut dyn RuntimeContext,
    ) -> Result<(), EvalError> {
        match place {
            Place::Variable { name, ty } => ctx.set(*name, *ty, value),
            Place::Element {
                container,
                index,
                set,
                ..
            } => self
                .registry
                .call(*set, &[container.clone(), index.clone(), value], TypeId::VOID)
                .map(|_| ()),
            Place::Property { receiver, set, .. } => {
                let result = match receiver {
                    Some(r) => self.registry.call(*set, &[r.clone(), value], TypeId::VOID),
                    None => self.registry.call(*set, &[value], TypeId::VOID),
                };
                result.map(|_| ())
            }
        }
    }
}
