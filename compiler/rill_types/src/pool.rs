//! Type interner for compound types.
//!
//! Follows the same pattern as `StringInterner` in `rill_ir`: a single
//! `RwLock`-guarded map from structural data to a dense index. Primitives
//! are pre-interned at the indices fixed by the `TypeId` constants, so
//! `TypeId::INT` and the pool agree without a lookup.
//!
//! Interning takes `&self`. The reducer instantiates `List<int>` or `int[]`
//! on first mention while the registry is shared immutably.

use parking_lot::RwLock;
use rill_ir::TypeId;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::DefId;

#[cfg(test)]
mod tests;

/// Structural description of an interned type.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum TypeData {
    Int,
    Double,
    Bool,
    Str,
    Object,
    Void,
    /// `T[]`
    Array(TypeId),
    /// A registered type definition, with type arguments when generic.
    Instance {
        def: DefId,
        args: SmallVec<[TypeId; 2]>,
    },
}

struct Inner {
    map: FxHashMap<TypeData, TypeId>,
    types: Vec<TypeData>,
}

/// Thread-safe type interner.
pub struct TypePool {
    inner: RwLock<Inner>,
}

impl TypePool {
    pub fn new() -> Self {
        let primitives = [
            TypeData::Int,    // 0 = TypeId::INT
            TypeData::Double, // 1 = TypeId::DOUBLE
            TypeData::Bool,   // 2 = TypeId::BOOL
            TypeData::Str,    // 3 = TypeId::STRING
            TypeData::Object, // 4 = TypeId::OBJECT
            TypeData::Void,   // 5 = TypeId::VOID
        ];
        let mut inner = Inner {
            map: FxHashMap::default(),
            types: Vec::with_capacity(64),
        };
        for data in primitives {
            let id = TypeId::from_raw(inner.types.len() as u32);
            inner.map.insert(data.clone(), id);
            inner.types.push(data);
        }
        debug_assert_eq!(inner.types.len() as u32, TypeId::FIRST_COMPOUND);
        TypePool {
            inner: RwLock::new(inner),
        }
    }

    /// Intern a type, returning its ID.
    pub fn intern(&self, data: TypeData) -> TypeId {
        if let Some(&id) = self.inner.read().map.get(&data) {
            return id;
        }
        let mut inner = self.inner.write();
        if let Some(&id) = inner.map.get(&data) {
            return id;
        }
        let raw = u32::try_from(inner.types.len())
            .unwrap_or_else(|_| panic!("type pool exceeded u32::MAX types"));
        let id = TypeId::from_raw(raw);
        inner.map.insert(data.clone(), id);
        inner.types.push(data);
        id
    }

    pub fn array_of(&self, elem: TypeId) -> TypeId {
        self.intern(TypeData::Array(elem))
    }

    pub fn instance(&self, def: DefId, args: &[TypeId]) -> TypeId {
        self.intern(TypeData::Instance {
            def,
            args: SmallVec::from_slice(args),
        })
    }

    /// Structural data for an interned type.
    ///
    /// # Panics
    /// Panics if `id` was not produced by this pool.
    pub fn data(&self, id: TypeId) -> TypeData {
        self.inner.read().types[id.index()].clone()
    }

    /// Element type of an array type.
    pub fn elem_of(&self, id: TypeId) -> Option<TypeId> {
        match self.inner.read().types.get(id.index()) {
            Some(TypeData::Array(elem)) => Some(*elem),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.inner.read().types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for TypePool {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for TypePool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypePool")
            .field("types", &self.len())
            .finish()
    }
}
