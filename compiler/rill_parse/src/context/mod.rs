//! The compilation context: how the reducer learns what an identifier is.
//!
//! The host owns scoping. The reducer only asks, once per identifier
//! token, whether the name is a constant (inlined as a literal), a variable
//! of a known type, a global function, or nothing at all.

use rill_ir::{Name, TypeId};
use rustc_hash::FxHashMap;

#[cfg(test)]
mod tests;

/// A compile-time constant. Inlined as a literal node.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Constant {
    Int(i64),
    Double(f64),
    Bool(bool),
    Str(String),
}

impl Constant {
    pub fn ty(&self) -> TypeId {
        match self {
            Constant::Int(_) => TypeId::INT,
            Constant::Double(_) => TypeId::DOUBLE,
            Constant::Bool(_) => TypeId::BOOL,
            Constant::Str(_) => TypeId::STRING,
        }
    }
}

/// Classification of an identifier.
#[derive(Clone, Debug, PartialEq)]
pub enum Identifier {
    Constant(Constant),
    /// A variable the runtime context will hold, with its declared type.
    Variable(TypeId),
    /// A global function in the registry.
    Function,
    Unidentified,
}

/// Identifier classification supplied by the host.
pub trait CompilationContext {
    fn classify(&self, name: Name) -> Identifier;
}

/// Map-backed [`CompilationContext`].
///
/// Later declarations of a name replace earlier ones.
#[derive(Clone, Debug, Default)]
pub struct Scope {
    entries: FxHashMap<Name, Identifier>,
}

impl Scope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn declare_variable(&mut self, name: Name, ty: TypeId) {
        self.entries.insert(name, Identifier::Variable(ty));
    }

    pub fn declare_constant(&mut self, name: Name, value: Constant) {
        self.entries.insert(name, Identifier::Constant(value));
    }

    pub fn declare_function(&mut self, name: Name) {
        self.entries.insert(name, Identifier::Function);
    }

    pub fn remove(&mut self, name: Name) -> bool {
        self.entries.remove(&name).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl CompilationContext for Scope {
    fn classify(&self, name: Name) -> Identifier {
        self.entries
            .get(&name)
            .cloned()
            .unwrap_or(Identifier::Unidentified)
    }
}
