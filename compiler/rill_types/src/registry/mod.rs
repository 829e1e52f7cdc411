//! The static binding registry.
//!
//! Maps (type, member name, argument types) to a host callable. Built once
//! from binding tables by [`RegistryBuilder`], then shared immutably by
//! the reducer and every evaluating thread.
//!
//! # Lookup
//!
//! Member lookup walks the type's definition, then its base chain. Generic
//! instances (`List<int>`) share their definition's member table; member
//! signatures are written against type parameters and substituted with the
//! instance's arguments at resolution time. Arrays and `string` have
//! hidden definitions holding their built-in members.
//!
//! # Overloads
//!
//! Candidates must match arity and accept every argument by implicit
//! conversion. Each argument is ranked (exact, promotion, upcast, object);
//! a candidate wins if it is at least as good on every argument as every
//! other viable candidate. No winner is an ambiguity.

mod builder;
mod def;
mod overload;


use std::sync::Arc;

use rill_ir::{BinaryOp, CallableId, Name, ParsedType, StringInterner, TypeId, UnaryOp};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

pub use builder::{DefBuilder, RegistryBuilder};
pub use def::{Callable, DefId, HostFn, InsertKind, TypeSig};

use def::{OperatorKey, Overload, TypeDef};

use crate::{EvalResult, TypeData, TypePool, Value};

/// Why a type or member could not be resolved.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ResolveError {
    UnknownType,
    WrongTypeArity { expected: usize, found: usize },
    /// No member of that name and kind.
    NotFound,
    /// Members exist but none accepts the argument types.
    NoMatch { candidates: Vec<String> },
    /// Several overloads match equally well.
    Ambiguous { candidates: Vec<String> },
}

/// A selected overload with its parameter types after substitution.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedCall {
    pub callable: CallableId,
    pub params: SmallVec<[TypeId; 4]>,
    pub ret: TypeId,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ResolvedProperty {
    pub get: CallableId,
    pub set: Option<CallableId>,
    pub ty: TypeId,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ResolvedIndexer {
    pub get: CallableId,
    pub set: Option<CallableId>,
    pub index: TypeId,
    pub elem: TypeId,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ResolvedInsertion {
    pub kind: InsertKind,
    pub callable: CallableId,
    pub elem: TypeId,
}

type TypeArgs = SmallVec<[TypeId; 2]>;

/// Immutable registry of types, members, operators, casts and functions.
pub struct TypeRegistry {
    interner: Arc<StringInterner>,
    pool: TypePool,
    defs: Vec<TypeDef>,
    defs_by_name: FxHashMap<Name, DefId>,
    string_def: DefId,
    array_def: DefId,
    callables: Vec<Callable>,
    functions: FxHashMap<Name, Vec<Overload>>,
    casts: FxHashMap<(TypeId, TypeId), CallableId>,
}

impl TypeRegistry {
    fn from_builder(b: RegistryBuilder) -> Self {
        TypeRegistry {
            interner: b.interner,
            pool: b.pool,
            defs: b.defs,
            defs_by_name: b.defs_by_name,
            string_def: b.string_def,
            array_def: b.array_def,
            callables: b.callables,
            functions: b.functions,
            casts: b.casts,
        }
    }

    pub fn interner(&self) -> &StringInterner {
        &self.interner
    }

    pub fn shared_interner(&self) -> Arc<StringInterner> {
        Arc::clone(&self.interner)
    }

    pub fn pool(&self) -> &TypePool {
        &self.pool
    }

    // Types

    fn primitive(name: &str) -> Option<TypeId> {
        match name {
            "int" => Some(TypeId::INT),
            "double" => Some(TypeId::DOUBLE),
            "bool" => Some(TypeId::BOOL),
            "string" => Some(TypeId::STRING),
            "object" => Some(TypeId::OBJECT),
            "void" => Some(TypeId::VOID),
            _ => None,
        }
    }

    /// Whether `name` names a primitive or a registered type.
    pub fn is_type_name(&self, name: Name) -> bool {
        Self::primitive(self.interner.lookup(name)).is_some() || self.defs_by_name.contains_key(&name)
    }

    /// Number of type parameters of a registered generic definition.
    pub fn generic_arity(&self, name: Name) -> Option<u8> {
        self.defs_by_name
            .get(&name)
            .map(|def| self.defs[def.index()].arity)
            .filter(|&arity| arity > 0)
    }

    /// Resolve a syntactic type reference.
    pub fn resolve_type(&self, parsed: &ParsedType) -> Result<TypeId, ResolveError> {
        match parsed {
            ParsedType::Array(elem) => {
                let elem = self.resolve_type(elem)?;
                Ok(self.pool.array_of(elem))
            }
            ParsedType::Named { name, args } => {
                if let Some(ty) = Self::primitive(self.interner.lookup(*name)) {
                    if !args.is_empty() {
                        return Err(ResolveError::WrongTypeArity {
                            expected: 0,
                            found: args.len(),
                        });
                    }
                    return Ok(ty);
                }
                let def = *self
                    .defs_by_name
                    .get(name)
                    .ok_or(ResolveError::UnknownType)?;
                let arity = usize::from(self.defs[def.index()].arity);
                if arity != args.len() {
                    return Err(ResolveError::WrongTypeArity {
                        expected: arity,
                        found: args.len(),
                    });
                }
                let args = args
                    .iter()
                    .map(|arg| self.resolve_type(arg))
                    .collect::<Result<TypeArgs, _>>()?;
                Ok(self.pool.instance(def, &args))
            }
        }
    }

    pub fn array_of(&self, elem: TypeId) -> TypeId {
        self.pool.array_of(elem)
    }

    pub fn elem_of(&self, array: TypeId) -> Option<TypeId> {
        if array.is_primitive() {
            return None;
        }
        self.pool.elem_of(array)
    }

    /// Types whose values are shared handles and may be null.
    pub fn is_reference(&self, ty: TypeId) -> bool {
        !matches!(ty, TypeId::INT | TypeId::DOUBLE | TypeId::BOOL | TypeId::VOID)
    }

    /// Member table and type arguments behind a type.
    fn def_of(&self, ty: TypeId) -> Option<(DefId, TypeArgs)> {
        if ty == TypeId::STRING {
            return Some((self.string_def, TypeArgs::new()));
        }
        if ty.is_primitive() {
            return None;
        }
        match self.pool.data(ty) {
            TypeData::Array(elem) => Some((self.array_def, smallvec::smallvec![elem])),
            TypeData::Instance { def, args } => Some((def, args)),
            _ => None,
        }
    }

    pub fn base_of(&self, ty: TypeId) -> Option<TypeId> {
        let (def, _) = self.def_of(ty)?;
        self.defs[def.index()].base
    }

    /// `ty` is `ancestor` or derives from it.
    pub fn is_subtype(&self, ty: TypeId, ancestor: TypeId) -> bool {
        let mut current = Some(ty);
        while let Some(t) = current {
            if t == ancestor {
                return true;
            }
            current = self.base_of(t);
        }
        false
    }

    /// The type followed by its base chain, each with its member table.
    fn lineage(&self, ty: TypeId) -> SmallVec<[(DefId, TypeArgs); 2]> {
        let mut out = SmallVec::new();
        let mut current = Some(ty);
        while let Some(t) = current {
            match self.def_of(t) {
                Some((def, args)) => {
                    current = self.defs[def.index()].base;
                    out.push((def, args));
                }
                None => break,
            }
        }
        out
    }

    /// Source-level name of a type: `int`, `Vec2`, `List<int>`, `double[]`.
    pub fn type_name(&self, ty: TypeId) -> String {
        if let Some(name) = ty.primitive_name() {
            return name.to_string();
        }
        match self.pool.data(ty) {
            TypeData::Array(elem) => format!("{}[]", self.type_name(elem)),
            TypeData::Instance { def, args } => {
                let name = self.interner.lookup(self.defs[def.index()].name);
                if args.is_empty() {
                    name.to_string()
                } else {
                    let args: Vec<String> = args.iter().map(|&a| self.type_name(a)).collect();
                    format!("{name}<{}>", args.join(", "))
                }
            }
            other => format!("{other:?}"),
        }
    }

    // Members

    /// Whether the type (or a base) has a method of that name and kind.
    pub fn has_method(&self, ty: TypeId, name: Name, is_static: bool) -> bool {
        self.lineage(ty).iter().any(|(def, _)| {
            self.defs[def.index()]
                .methods
                .get(&name)
                .is_some_and(|methods| methods.iter().any(|m| m.is_static == is_static))
        })
    }

    #[tracing::instrument(level = "trace", skip(self, type_args, args))]
    pub fn resolve_method(
        &self,
        ty: TypeId,
        name: Name,
        type_args: &[TypeId],
        args: &[TypeId],
        is_static: bool,
    ) -> Result<ResolvedCall, ResolveError> {
        let lineage = self.lineage(ty);
        let candidates: Vec<(&Overload, &[TypeId])> = lineage
            .iter()
            .filter_map(|(def, def_args)| {
                self.defs[def.index()]
                    .methods
                    .get(&name)
                    .map(|methods| (methods, def_args))
            })
            .flat_map(|(methods, def_args)| {
                methods
                    .iter()
                    .filter(|m| m.is_static == is_static)
                    .map(move |m| (&m.overload, def_args.as_slice()))
            })
            .collect();
        if candidates.is_empty() {
            return Err(ResolveError::NotFound);
        }
        overload::select(self, &candidates, type_args, args)
    }

    pub fn resolve_property(
        &self,
        ty: TypeId,
        name: Name,
        is_static: bool,
    ) -> Result<ResolvedProperty, ResolveError> {
        for (def, args) in self.lineage(ty) {
            if let Some(prop) = self.defs[def.index()].properties.get(&name) {
                if prop.is_static != is_static {
                    continue;
                }
                return Ok(ResolvedProperty {
                    get: prop.get,
                    set: prop.set,
                    ty: prop.ty.resolve(&args, &self.pool),
                });
            }
        }
        Err(ResolveError::NotFound)
    }

    pub fn resolve_indexer(&self, ty: TypeId) -> Result<ResolvedIndexer, ResolveError> {
        for (def, args) in self.lineage(ty) {
            if let Some(indexer) = &self.defs[def.index()].indexer {
                return Ok(ResolvedIndexer {
                    get: indexer.get,
                    set: indexer.set,
                    index: indexer.index.resolve(&args, &self.pool),
                    elem: indexer.elem.resolve(&args, &self.pool),
                });
            }
        }
        Err(ResolveError::NotFound)
    }

    /// Constructors are not inherited.
    pub fn resolve_constructor(
        &self,
        ty: TypeId,
        args: &[TypeId],
    ) -> Result<ResolvedCall, ResolveError> {
        let (def, def_args) = self.def_of(ty).ok_or(ResolveError::NotFound)?;
        let candidates: Vec<(&Overload, &[TypeId])> = self.defs[def.index()]
            .constructors
            .iter()
            .map(|ctor| (ctor, def_args.as_slice()))
            .collect();
        if candidates.is_empty() {
            return Err(ResolveError::NotFound);
        }
        let mut call = overload::select(self, &candidates, &[], args)?;
        call.ret = ty;
        Ok(call)
    }

    /// The highest-priority insertion capability of a collection type.
    pub fn resolve_insertion(&self, ty: TypeId) -> Result<ResolvedInsertion, ResolveError> {
        self.lineage(ty)
            .iter()
            .flat_map(|(def, args)| {
                self.defs[def.index()]
                    .insertions
                    .iter()
                    .map(move |ins| (ins, args))
            })
            .min_by_key(|(ins, _)| ins.kind)
            .map(|(ins, args)| ResolvedInsertion {
                kind: ins.kind,
                callable: ins.callable,
                elem: ins.elem.resolve(args, &self.pool),
            })
            .ok_or(ResolveError::NotFound)
    }

    fn operator_candidates(&self, ty: TypeId, key: OperatorKey) -> Vec<(&Overload, TypeArgs)> {
        self.lineage(ty)
            .into_iter()
            .flat_map(|(def, args)| {
                self.defs[def.index()]
                    .operators
                    .iter()
                    .filter(move |(k, _)| *k == key)
                    .map(move |(_, ov)| (ov, args.clone()))
            })
            .collect()
    }

    fn select_operator(
        &self,
        candidates: &[(&Overload, TypeArgs)],
        args: &[TypeId],
    ) -> Result<Option<ResolvedCall>, ResolveError> {
        if candidates.is_empty() {
            return Ok(None);
        }
        let borrowed: Vec<(&Overload, &[TypeId])> = candidates
            .iter()
            .map(|(ov, def_args)| (*ov, def_args.as_slice()))
            .collect();
        match overload::select(self, &borrowed, &[], args) {
            Ok(call) => Ok(Some(call)),
            Err(ResolveError::NoMatch { .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Look for a registered binary operator: the left operand's type
    /// first, then the right's.
    pub fn resolve_binary_operator(
        &self,
        op: BinaryOp,
        left: TypeId,
        right: TypeId,
    ) -> Result<Option<ResolvedCall>, ResolveError> {
        let key = OperatorKey::Binary(op);
        let args = [left, right];
        if let Some(call) = self.select_operator(&self.operator_candidates(left, key), &args)? {
            return Ok(Some(call));
        }
        if right == left {
            return Ok(None);
        }
        self.select_operator(&self.operator_candidates(right, key), &args)
    }

    pub fn resolve_unary_operator(
        &self,
        op: UnaryOp,
        operand: TypeId,
    ) -> Result<Option<ResolvedCall>, ResolveError> {
        let key = OperatorKey::Unary(op);
        self.select_operator(&self.operator_candidates(operand, key), &[operand])
    }

    pub fn has_function(&self, name: Name) -> bool {
        self.functions.contains_key(&name)
    }

    pub fn resolve_function(
        &self,
        name: Name,
        type_args: &[TypeId],
        args: &[TypeId],
    ) -> Result<ResolvedCall, ResolveError> {
        let overloads = self.functions.get(&name).ok_or(ResolveError::NotFound)?;
        let candidates: Vec<(&Overload, &[TypeId])> =
            overloads.iter().map(|ov| (ov, &[] as &[TypeId])).collect();
        overload::select(self, &candidates, type_args, args)
    }

    /// Host-registered explicit cast.
    pub fn cast(&self, from: TypeId, to: TypeId) -> Option<CallableId> {
        self.casts.get(&(from, to)).copied()
    }

    // Calls

    pub fn callable(&self, id: CallableId) -> &Callable {
        &self.callables[id.index()]
    }

    /// Invoke a callable. `ret` is the static result type of the call site.
    pub fn call(&self, id: CallableId, args: &[Value], ret: TypeId) -> EvalResult {
        let callable = self.callable(id);
        tracing::trace!(callable = %callable.name, argc = args.len(), "host call");
        callable.call(args, ret)
    }

    /// Natural text form of a value, as used by string concatenation.
    ///
    /// Objects whose type defines a parameterless `ToString` method render
    /// through it; other arrays and objects render as their type name.
    pub fn to_text(&self, value: &Value) -> Result<String, crate::EvalError> {
        match value {
            Value::Array(a) => Ok(self.type_name(a.ty())),
            Value::Object(o) => {
                let name = self.interner.intern("ToString");
                match self.resolve_method(o.ty(), name, &[], &[], false) {
                    Ok(call) if call.ret == TypeId::STRING => {
                        let text = self.call(call.callable, std::slice::from_ref(value), call.ret)?;
                        Ok(text.to_string())
                    }
                    _ => Ok(self.type_name(o.ty())),
                }
            }
            other => Ok(other.to_string()),
        }
    }

    pub(crate) fn render_signature(&self, callable: CallableId, params: &[TypeId]) -> String {
        let params: Vec<String> = params.iter().map(|&p| self.type_name(p)).collect();
        format!("{}({})", self.callable(callable).name, params.join(", "))
    }
}

impl std::fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypeRegistry")
            .field("types", &self.defs.len())
            .field("callables", &self.callables.len())
            .field("functions", &self.functions.len())
            .field("pool", &self.pool)
            .finish_non_exhaustive()
    }
}
