//! Assembling a registry from binding tables.
//!
//! Types are declared first and populated afterwards so that member
//! signatures can mention any declared type, including the one being
//! populated (`Vec2 + Vec2 -> Vec2`).
//!
//! ```text
//! let mut b = RegistryBuilder::with_builtins(interner);
//! let vec2 = b.declare_type("Vec2");
//! b.members(vec2)
//!     .constructor(&[TypeSig::DOUBLE, TypeSig::DOUBLE], new_vec2)
//!     .property("X", TypeSig::DOUBLE, get_x)
//!     .binary_operator(BinaryOp::Add, vec2.into(), vec2.into(), vec2.into(), add);
//! let registry = b.build();
//! ```

use std::sync::Arc;

use rill_ir::{BinaryOp, CallableId, Name, StringInterner, TypeId, UnaryOp};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use super::def::{
    IndexerDef, InsertionDef, MethodDef, OperatorKey, Overload, PropertyDef, Signature, TypeDef,
};
use super::{Callable, DefId, HostFn, InsertKind, TypeRegistry, TypeSig};
use crate::{builtins, EvalResult, TypeData, TypePool, Value};

/// Mutable registry under construction.
pub struct RegistryBuilder {
    pub(super) interner: Arc<StringInterner>,
    pub(super) pool: TypePool,
    pub(super) defs: Vec<TypeDef>,
    pub(super) defs_by_name: FxHashMap<Name, DefId>,
    pub(super) string_def: DefId,
    pub(super) array_def: DefId,
    pub(super) callables: Vec<Callable>,
    pub(super) functions: FxHashMap<Name, Vec<Overload>>,
    pub(super) casts: FxHashMap<(TypeId, TypeId), CallableId>,
}

impl RegistryBuilder {
    /// An empty registry: primitives only, no members.
    pub fn new(interner: Arc<StringInterner>) -> Self {
        let string_name = interner.intern("string");
        let array_name = interner.intern("[]");
        RegistryBuilder {
            interner,
            pool: TypePool::new(),
            defs: vec![TypeDef::new(string_name, 0), TypeDef::new(array_name, 1)],
            defs_by_name: FxHashMap::default(),
            string_def: DefId::from_raw(0),
            array_def: DefId::from_raw(1),
            callables: Vec::new(),
            functions: FxHashMap::default(),
            casts: FxHashMap::default(),
        }
    }

    /// A registry with the built-in binding tables installed.
    pub fn with_builtins(interner: Arc<StringInterner>) -> Self {
        let mut builder = Self::new(interner);
        builtins::install(&mut builder);
        builder
    }

    pub fn interner(&self) -> &StringInterner {
        &self.interner
    }

    pub fn pool(&self) -> &TypePool {
        &self.pool
    }

    fn declare(&mut self, name: &str, arity: u8) -> DefId {
        let name = self.interner.intern(name);
        let def = DefId::from_raw(
            u32::try_from(self.defs.len())
                .unwrap_or_else(|_| panic!("type registry exceeded u32::MAX definitions")),
        );
        self.defs.push(TypeDef::new(name, arity));
        self.defs_by_name.insert(name, def);
        def
    }

    /// Declare a non-generic type (user type or static class).
    pub fn declare_type(&mut self, name: &str) -> TypeId {
        let def = self.declare(name, 0);
        self.pool.instance(def, &[])
    }

    /// Declare a generic type definition with `arity` type parameters.
    pub fn declare_generic(&mut self, name: &str, arity: u8) -> DefId {
        self.declare(name, arity)
    }

    /// Instantiate a generic definition.
    pub fn instantiate(&self, def: DefId, args: &[TypeId]) -> TypeId {
        self.pool.instance(def, args)
    }

    /// Populate the members of a declared type, or of `string`.
    ///
    /// # Panics
    /// Panics if `ty` is neither `string` nor a type returned by
    /// [`declare_type`](Self::declare_type).
    pub fn members(&mut self, ty: TypeId) -> DefBuilder<'_> {
        let def = if ty == TypeId::STRING {
            self.string_def
        } else {
            match self.pool.data(ty) {
                TypeData::Instance { def, args } if args.is_empty() => def,
                other => panic!("cannot add members to {other:?}"),
            }
        };
        DefBuilder { builder: self, def }
    }

    /// Populate the members of a generic definition. `TypeSig::Param(i)`
    /// refers to its i-th type parameter.
    pub fn generic_members(&mut self, def: DefId) -> DefBuilder<'_> {
        DefBuilder { builder: self, def }
    }

    /// Populate the members shared by every array type. `TypeSig::Param(0)`
    /// is the element type.
    pub fn array_members(&mut self) -> DefBuilder<'_> {
        let def = self.array_def;
        DefBuilder { builder: self, def }
    }

    fn add_callable(&mut self, name: String, func: HostFn) -> CallableId {
        let id = CallableId::new(
            u32::try_from(self.callables.len())
                .unwrap_or_else(|_| panic!("type registry exceeded u32::MAX callables")),
        );
        self.callables.push(Callable { name, func });
        id
    }

    /// Register a global function.
    pub fn function(
        &mut self,
        name: &str,
        params: &[TypeSig],
        ret: TypeSig,
        f: impl Fn(&[Value], TypeId) -> EvalResult + Send + Sync + 'static,
    ) -> CallableId {
        self.generic_function(name, 0, params, ret, f)
    }

    /// Register a global function with its own type parameters.
    pub fn generic_function(
        &mut self,
        name: &str,
        type_params: u8,
        params: &[TypeSig],
        ret: TypeSig,
        f: impl Fn(&[Value], TypeId) -> EvalResult + Send + Sync + 'static,
    ) -> CallableId {
        let callable = self.add_callable(name.to_string(), Arc::new(f));
        let key = self.interner.intern(name);
        self.functions.entry(key).or_default().push(Overload {
            callable,
            sig: signature(params, ret, type_params),
        });
        callable
    }

    /// Register an explicit cast from `from` to `to`.
    pub fn cast(
        &mut self,
        from: TypeId,
        to: TypeId,
        f: impl Fn(&[Value], TypeId) -> EvalResult + Send + Sync + 'static,
    ) -> CallableId {
        let name = format!("cast<{}, {}>", from.raw(), to.raw());
        let callable = self.add_callable(name, Arc::new(f));
        self.casts.insert((from, to), callable);
        callable
    }

    pub fn build(self) -> TypeRegistry {
        tracing::debug!(
            types = self.defs.len(),
            callables = self.callables.len(),
            functions = self.functions.len(),
            "type registry built"
        );
        TypeRegistry::from_builder(self)
    }
}

fn signature(params: &[TypeSig], ret: TypeSig, type_params: u8) -> Signature {
    Signature {
        params: SmallVec::from_slice(params),
        ret,
        type_params,
    }
}

/// Adds members to one type definition.
pub struct DefBuilder<'a> {
    builder: &'a mut RegistryBuilder,
    def: DefId,
}

impl DefBuilder<'_> {
    pub fn id(&self) -> DefId {
        self.def
    }

    fn def_mut(&mut self) -> &mut TypeDef {
        &mut self.builder.defs[self.def.index()]
    }

    fn qualified(&self, member: &str) -> String {
        let ty = self.builder.interner.lookup(self.builder.defs[self.def.index()].name);
        format!("{ty}.{member}")
    }

    fn callable(
        &mut self,
        member: &str,
        f: impl Fn(&[Value], TypeId) -> EvalResult + Send + Sync + 'static,
    ) -> CallableId {
        let name = self.qualified(member);
        self.builder.add_callable(name, Arc::new(f))
    }

    /// Declare the base type. Values of this type convert implicitly to it
    /// and inherit its members.
    pub fn base(&mut self, base: TypeId) -> &mut Self {
        self.def_mut().base = Some(base);
        self
    }

    pub fn constructor(
        &mut self,
        params: &[TypeSig],
        f: impl Fn(&[Value], TypeId) -> EvalResult + Send + Sync + 'static,
    ) -> &mut Self {
        let callable = self.callable("ctor", f);
        self.def_mut().constructors.push(Overload {
            callable,
            sig: signature(params, TypeSig::VOID, 0),
        });
        self
    }

    fn add_method(
        &mut self,
        name: &str,
        is_static: bool,
        sig: Signature,
        f: impl Fn(&[Value], TypeId) -> EvalResult + Send + Sync + 'static,
    ) -> &mut Self {
        let callable = self.callable(name, f);
        let key = self.builder.interner.intern(name);
        self.def_mut()
            .methods
            .entry(key)
            .or_default()
            .push(MethodDef {
                overload: Overload { callable, sig },
                is_static,
            });
        self
    }

    /// Instance method. The receiver arrives as `args[0]`.
    pub fn method(
        &mut self,
        name: &str,
        params: &[TypeSig],
        ret: TypeSig,
        f: impl Fn(&[Value], TypeId) -> EvalResult + Send + Sync + 'static,
    ) -> &mut Self {
        self.add_method(name, false, signature(params, ret, 0), f)
    }

    pub fn static_method(
        &mut self,
        name: &str,
        params: &[TypeSig],
        ret: TypeSig,
        f: impl Fn(&[Value], TypeId) -> EvalResult + Send + Sync + 'static,
    ) -> &mut Self {
        self.add_method(name, true, signature(params, ret, 0), f)
    }

    /// Method with its own type parameters, called as `x.Name<T>(args)`.
    pub fn generic_method(
        &mut self,
        name: &str,
        type_params: u8,
        is_static: bool,
        params: &[TypeSig],
        ret: TypeSig,
        f: impl Fn(&[Value], TypeId) -> EvalResult + Send + Sync + 'static,
    ) -> &mut Self {
        self.add_method(name, is_static, signature(params, ret, type_params), f)
    }

    fn add_property(
        &mut self,
        name: &str,
        ty: TypeSig,
        get: CallableId,
        set: Option<CallableId>,
        is_static: bool,
    ) -> &mut Self {
        let key = self.builder.interner.intern(name);
        self.def_mut().properties.insert(
            key,
            PropertyDef {
                ty,
                get,
                set,
                is_static,
            },
        );
        self
    }

    /// Read-only instance property.
    pub fn property(
        &mut self,
        name: &str,
        ty: TypeSig,
        get: impl Fn(&[Value], TypeId) -> EvalResult + Send + Sync + 'static,
    ) -> &mut Self {
        let get = self.callable(name, get);
        self.add_property(name, ty, get, None, false)
    }

    /// Read-write instance property. The setter receives `[receiver, value]`.
    pub fn property_rw(
        &mut self,
        name: &str,
        ty: TypeSig,
        get: impl Fn(&[Value], TypeId) -> EvalResult + Send + Sync + 'static,
        set: impl Fn(&[Value], TypeId) -> EvalResult + Send + Sync + 'static,
    ) -> &mut Self {
        let get = self.callable(name, get);
        let set = self.callable(&format!("set_{name}"), set);
        self.add_property(name, ty, get, Some(set), false)
    }

    pub fn static_property(
        &mut self,
        name: &str,
        ty: TypeSig,
        get: impl Fn(&[Value], TypeId) -> EvalResult + Send + Sync + 'static,
    ) -> &mut Self {
        let get = self.callable(name, get);
        self.add_property(name, ty, get, None, true)
    }

    /// Read-only indexer. The getter receives `[container, index]`.
    pub fn indexer(
        &mut self,
        index: TypeSig,
        elem: TypeSig,
        get: impl Fn(&[Value], TypeId) -> EvalResult + Send + Sync + 'static,
    ) -> &mut Self {
        let get = self.callable("get_Item", get);
        self.def_mut().indexer = Some(IndexerDef {
            index,
            elem,
            get,
            set: None,
        });
        self
    }

    /// Read-write indexer. The setter receives `[container, index, value]`.
    pub fn indexer_rw(
        &mut self,
        index: TypeSig,
        elem: TypeSig,
        get: impl Fn(&[Value], TypeId) -> EvalResult + Send + Sync + 'static,
        set: impl Fn(&[Value], TypeId) -> EvalResult + Send + Sync + 'static,
    ) -> &mut Self {
        let get = self.callable("get_Item", get);
        let set = self.callable("set_Item", set);
        self.def_mut().indexer = Some(IndexerDef {
            index,
            elem,
            get,
            set: Some(set),
        });
        self
    }

    pub fn binary_operator(
        &mut self,
        op: BinaryOp,
        left: TypeSig,
        right: TypeSig,
        ret: TypeSig,
        f: impl Fn(&[Value], TypeId) -> EvalResult + Send + Sync + 'static,
    ) -> &mut Self {
        let callable = self.callable(op.overload_name(), f);
        self.def_mut().operators.push((
            OperatorKey::Binary(op),
            Overload {
                callable,
                sig: signature(&[left, right], ret, 0),
            },
        ));
        self
    }

    pub fn unary_operator(
        &mut self,
        op: UnaryOp,
        operand: TypeSig,
        ret: TypeSig,
        f: impl Fn(&[Value], TypeId) -> EvalResult + Send + Sync + 'static,
    ) -> &mut Self {
        let callable = self.callable(op.overload_name(), f);
        self.def_mut().operators.push((
            OperatorKey::Unary(op),
            Overload {
                callable,
                sig: signature(&[operand], ret, 0),
            },
        ));
        self
    }

    /// Declare how initializer items are added. The callable receives
    /// `[collection, item]`.
    pub fn insertion(
        &mut self,
        kind: InsertKind,
        elem: TypeSig,
        name: &str,
        f: impl Fn(&[Value], TypeId) -> EvalResult + Send + Sync + 'static,
    ) -> &mut Self {
        let callable = self.callable(name, f);
        self.def_mut().insertions.push(InsertionDef {
            kind,
            elem,
            callable,
        });
        self
    }
}
