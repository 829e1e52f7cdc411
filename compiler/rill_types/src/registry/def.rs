//! Definition records stored in the registry.

use std::fmt;
use std::sync::Arc;

use rill_ir::{BinaryOp, CallableId, Name, TypeId, UnaryOp};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::{EvalResult, TypePool, Value};

/// Host implementation of a member, operator, constructor, cast or function.
///
/// Receives the evaluated arguments (an instance member's receiver first)
/// and the static result type of the call site. Most callables ignore the
/// latter; generic constructors use it to tag the object they create.
pub type HostFn = Arc<dyn Fn(&[Value], TypeId) -> EvalResult + Send + Sync>;

/// A registered callable.
#[derive(Clone)]
pub struct Callable {
    /// Qualified display name, e.g. `Math.Max` or `List.Add`.
    pub name: String,
    pub func: HostFn,
}

impl Callable {
    #[inline]
    pub fn call(&self, args: &[Value], ret: TypeId) -> EvalResult {
        (self.func)(args, ret)
    }
}

impl fmt::Debug for Callable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Callable({})", self.name)
    }
}

/// Index of a type definition in the registry.
#[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord, Debug)]
pub struct DefId(u32);

impl DefId {
    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        DefId(raw)
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// A type in a member signature.
///
/// `Param(i)` refers to the i-th type argument: first the definition's own
/// parameters (`T` in `List<T>`), then the member's (`T` in `Repeat<T>`).
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum TypeSig {
    Fixed(TypeId),
    Param(u8),
    ArrayOfParam(u8),
}

impl TypeSig {
    pub const INT: TypeSig = TypeSig::Fixed(TypeId::INT);
    pub const DOUBLE: TypeSig = TypeSig::Fixed(TypeId::DOUBLE);
    pub const BOOL: TypeSig = TypeSig::Fixed(TypeId::BOOL);
    pub const STRING: TypeSig = TypeSig::Fixed(TypeId::STRING);
    pub const OBJECT: TypeSig = TypeSig::Fixed(TypeId::OBJECT);
    pub const VOID: TypeSig = TypeSig::Fixed(TypeId::VOID);

    /// Substitute type arguments.
    pub(crate) fn resolve(self, args: &[TypeId], pool: &TypePool) -> TypeId {
        match self {
            TypeSig::Fixed(ty) => ty,
            TypeSig::Param(i) => args.get(usize::from(i)).copied().unwrap_or(TypeId::OBJECT),
            TypeSig::ArrayOfParam(i) => {
                let elem = args.get(usize::from(i)).copied().unwrap_or(TypeId::OBJECT);
                pool.array_of(elem)
            }
        }
    }
}

impl From<TypeId> for TypeSig {
    fn from(ty: TypeId) -> Self {
        TypeSig::Fixed(ty)
    }
}

#[derive(Clone, Debug)]
pub(crate) struct Signature {
    pub params: SmallVec<[TypeSig; 4]>,
    pub ret: TypeSig,
    /// Member-level type parameters, appended after the definition's.
    pub type_params: u8,
}

#[derive(Clone, Debug)]
pub(crate) struct Overload {
    pub callable: CallableId,
    pub sig: Signature,
}

#[derive(Clone, Debug)]
pub(crate) struct MethodDef {
    pub overload: Overload,
    pub is_static: bool,
}

#[derive(Clone, Debug)]
pub(crate) struct PropertyDef {
    pub ty: TypeSig,
    pub get: CallableId,
    pub set: Option<CallableId>,
    pub is_static: bool,
}

#[derive(Clone, Debug)]
pub(crate) struct IndexerDef {
    pub index: TypeSig,
    pub elem: TypeSig,
    pub get: CallableId,
    pub set: Option<CallableId>,
}

/// How a collection accepts initializer items, in resolution priority
/// order: the first kind a type supports wins.
#[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord, Debug)]
pub enum InsertKind {
    ListAppend,
    StackPush,
    QueueEnqueue,
    GenericAdd,
}

#[derive(Clone, Debug)]
pub(crate) struct InsertionDef {
    pub kind: InsertKind,
    pub elem: TypeSig,
    pub callable: CallableId,
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub(crate) enum OperatorKey {
    Binary(BinaryOp),
    Unary(UnaryOp),
}

/// A registered type: user type, static class, generic collection, or the
/// member table behind `string` and arrays.
#[derive(Clone, Debug)]
pub(crate) struct TypeDef {
    pub name: Name,
    pub arity: u8,
    pub base: Option<TypeId>,
    pub constructors: Vec<Overload>,
    pub methods: FxHashMap<Name, Vec<MethodDef>>,
    pub properties: FxHashMap<Name, PropertyDef>,
    pub indexer: Option<IndexerDef>,
    pub operators: Vec<(OperatorKey, Overload)>,
    pub insertions: Vec<InsertionDef>,
}

impl TypeDef {
    pub fn new(name: Name, arity: u8) -> Self {
        TypeDef {
            name,
            arity,
            base: None,
            constructors: Vec::new(),
            methods: FxHashMap::default(),
            properties: FxHashMap::default(),
            indexer: None,
            operators: Vec::new(),
            insertions: Vec::new(),
        }
    }
}
