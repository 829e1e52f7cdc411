//! Generic collections: `List<T>`, `Stack<T>`, `Queue<T>`, `HashSet<T>`.
//!
//! Each instance is a host object whose payload is the Rust collection
//! below. Constructors tag the object with the instantiated type they are
//! called for, so `new List<int>()` yields a value of type `List<int>`.

use std::any::Any;
use std::collections::VecDeque;
use std::sync::Arc;

use rill_ir::TypeId;
use rustc_hash::FxHashSet;

use super::{arg, len_to_value, with_payload};
use crate::{
    host_failure, index_out_of_range, DefBuilder, EvalResult, InsertKind, ObjectRef,
    RegistryBuilder, TypeSig, Value,
};

const T: TypeSig = TypeSig::Param(0);

trait Collection: Any + Send + Sync + Default {
    const NAME: &'static str;

    fn len(&self) -> usize;
    fn clear(&mut self);
    fn contains(&self, item: &Value) -> bool;
}

#[derive(Default)]
struct ListData(Vec<Value>);

#[derive(Default)]
struct StackData(Vec<Value>);

#[derive(Default)]
struct QueueData(VecDeque<Value>);

/// Hashable form of a primitive or string element.
#[derive(Clone, PartialEq, Eq, Hash)]
enum SetKey {
    Int(i64),
    Double(u64),
    Bool(bool),
    Str(Arc<str>),
    Null,
}

impl SetKey {
    fn of(value: &Value) -> Option<Self> {
        Some(match value {
            Value::Int(n) => SetKey::Int(*n),
            // -0.0 and 0.0 are one element; all NaNs are one element.
            Value::Double(d) if *d == 0.0 => SetKey::Double(0),
            Value::Double(d) if d.is_nan() => SetKey::Double(f64::NAN.to_bits()),
            Value::Double(d) => SetKey::Double(d.to_bits()),
            Value::Bool(b) => SetKey::Bool(*b),
            Value::Str(s) => SetKey::Str(Arc::clone(s)),
            Value::Null => SetKey::Null,
            Value::Array(_) | Value::Object(_) | Value::Void => return None,
        })
    }
}

/// Primitive elements hash by value; arrays and objects compare by
/// identity.
#[derive(Default)]
struct SetData {
    keys: FxHashSet<SetKey>,
    handles: Vec<Value>,
}

impl SetData {
    fn insert(&mut self, item: Value) -> bool {
        match SetKey::of(&item) {
            Some(key) => self.keys.insert(key),
            None if self.handles.contains(&item) => false,
            None => {
                self.handles.push(item);
                true
            }
        }
    }
}

impl Collection for ListData {
    const NAME: &'static str = "List";
    fn len(&self) -> usize {
        self.0.len()
    }
    fn clear(&mut self) {
        self.0.clear();
    }
    fn contains(&self, item: &Value) -> bool {
        self.0.iter().any(|v| v.loose_eq(item))
    }
}

impl Collection for StackData {
    const NAME: &'static str = "Stack";
    fn len(&self) -> usize {
        self.0.len()
    }
    fn clear(&mut self) {
        self.0.clear();
    }
    fn contains(&self, item: &Value) -> bool {
        self.0.iter().any(|v| v.loose_eq(item))
    }
}

impl Collection for QueueData {
    const NAME: &'static str = "Queue";
    fn len(&self) -> usize {
        self.0.len()
    }
    fn clear(&mut self) {
        self.0.clear();
    }
    fn contains(&self, item: &Value) -> bool {
        self.0.iter().any(|v| v.loose_eq(item))
    }
}

impl Collection for SetData {
    const NAME: &'static str = "HashSet";
    fn len(&self) -> usize {
        self.keys.len() + self.handles.len()
    }
    fn clear(&mut self) {
        self.keys.clear();
        self.handles.clear();
    }
    fn contains(&self, item: &Value) -> bool {
        match SetKey::of(item) {
            Some(key) => self.keys.contains(&key),
            None => self.handles.contains(item),
        }
    }
}

/// Constructor, `Count`, `Clear` and `Contains`.
fn common<C: Collection>(def: &mut DefBuilder<'_>) {
    def.constructor(&[], |_, ty| Ok(Value::Object(ObjectRef::new(ty, C::default()))))
        .property("Count", TypeSig::INT, |args, _| {
            with_payload::<C, _>(C::NAME, args, |c| len_to_value(c.len()))
        })
        .method("Clear", &[], TypeSig::VOID, |args, _| {
            with_payload::<C, _>(C::NAME, args, C::clear)?;
            Ok(Value::Void)
        })
        .method("Contains", &[T], TypeSig::BOOL, |args, _| {
            let item = arg(C::NAME, args, 1)?;
            with_payload::<C, _>(C::NAME, args, |c| Value::Bool(c.contains(item)))
        });
}

fn item(function: &str, args: &[Value]) -> Result<Value, crate::EvalError> {
    arg(function, args, 1).cloned()
}

fn list_add(args: &[Value], _: TypeId) -> EvalResult {
    let item = item("List.Add", args)?;
    with_payload::<ListData, _>("List.Add", args, |list| list.0.push(item))?;
    Ok(Value::Void)
}

fn stack_push(args: &[Value], _: TypeId) -> EvalResult {
    let item = item("Stack.Push", args)?;
    with_payload::<StackData, _>("Stack.Push", args, |stack| stack.0.push(item))?;
    Ok(Value::Void)
}

fn queue_enqueue(args: &[Value], _: TypeId) -> EvalResult {
    let item = item("Queue.Enqueue", args)?;
    with_payload::<QueueData, _>("Queue.Enqueue", args, |queue| queue.0.push_back(item))?;
    Ok(Value::Void)
}

fn set_add(args: &[Value], _: TypeId) -> EvalResult {
    let item = item("HashSet.Add", args)?;
    with_payload::<SetData, _>("HashSet.Add", args, |set| Value::Bool(set.insert(item)))
}

fn list_index(function: &str, args: &[Value]) -> Result<i64, crate::EvalError> {
    arg(function, args, 1)?.to_int()
}

pub(super) fn install(b: &mut RegistryBuilder) {
    let list = b.declare_generic("List", 1);
    let mut def = b.generic_members(list);
    common::<ListData>(&mut def);
    def.method("Add", &[T], TypeSig::VOID, list_add)
        .insertion(InsertKind::ListAppend, T, "Add", list_add)
        .indexer_rw(
            TypeSig::INT,
            T,
            |args, _| {
                let index = list_index("List.get_Item", args)?;
                with_payload::<ListData, _>("List.get_Item", args, |list| {
                    usize::try_from(index)
                        .ok()
                        .and_then(|i| list.0.get(i))
                        .cloned()
                        .ok_or_else(|| index_out_of_range(index, list.0.len()))
                })?
            },
            |args, _| {
                let index = list_index("List.set_Item", args)?;
                let value = arg("List.set_Item", args, 2)?.clone();
                with_payload::<ListData, _>("List.set_Item", args, |list| {
                    let len = list.0.len();
                    let slot = usize::try_from(index)
                        .ok()
                        .and_then(|i| list.0.get_mut(i))
                        .ok_or_else(|| index_out_of_range(index, len))?;
                    *slot = value;
                    Ok(Value::Void)
                })?
            },
        );

    let stack = b.declare_generic("Stack", 1);
    let mut def = b.generic_members(stack);
    common::<StackData>(&mut def);
    def.method("Push", &[T], TypeSig::VOID, stack_push)
        .insertion(InsertKind::StackPush, T, "Push", stack_push)
        .method("Pop", &[], T, |args, _| {
            with_payload::<StackData, _>("Stack.Pop", args, |stack| stack.0.pop())?
                .ok_or_else(|| host_failure("Stack.Pop", "stack is empty"))
        })
        .method("Peek", &[], T, |args, _| {
            with_payload::<StackData, _>("Stack.Peek", args, |stack| stack.0.last().cloned())?
                .ok_or_else(|| host_failure("Stack.Peek", "stack is empty"))
        });

    let queue = b.declare_generic("Queue", 1);
    let mut def = b.generic_members(queue);
    common::<QueueData>(&mut def);
    def.method("Enqueue", &[T], TypeSig::VOID, queue_enqueue)
        .insertion(InsertKind::QueueEnqueue, T, "Enqueue", queue_enqueue)
        .method("Dequeue", &[], T, |args, _| {
            with_payload::<QueueData, _>("Queue.Dequeue", args, |queue| queue.0.pop_front())?
                .ok_or_else(|| host_failure("Queue.Dequeue", "queue is empty"))
        })
        .method("Peek", &[], T, |args, _| {
            with_payload::<QueueData, _>("Queue.Peek", args, |queue| queue.0.front().cloned())?
                .ok_or_else(|| host_failure("Queue.Peek", "queue is empty"))
        });

    let set = b.declare_generic("HashSet", 1);
    let mut def = b.generic_members(set);
    common::<SetData>(&mut def);
    def.method("Add", &[T], TypeSig::BOOL, set_add)
        .insertion(InsertKind::GenericAdd, T, "Add", set_add);
}
