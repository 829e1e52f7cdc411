//! Map-backed variable storage.
//!
//! A flat table of typed bindings. Scoping and lifetimes belong to the
//! host; the expression core only reads and writes existing bindings.

use std::sync::Arc;

use rill_ir::{Name, StringInterner, TypeId};
use rill_types::{type_mismatch, undefined_variable, EvalError, EvalResult, Value};
use rustc_hash::FxHashMap;

use crate::RuntimeContext;

#[cfg(test)]
mod tests;

/// A declared variable.
#[derive(Clone, Debug, PartialEq)]
pub struct Binding {
    pub ty: TypeId,
    pub value: Value,
}

/// Default [`RuntimeContext`].
#[derive(Clone)]
pub struct Environment {
    interner: Arc<StringInterner>,
    bindings: FxHashMap<Name, Binding>,
}

impl Environment {
    pub fn new(interner: Arc<StringInterner>) -> Self {
        Environment {
            interner,
            bindings: FxHashMap::default(),
        }
    }

    /// Declare or redeclare a variable.
    pub fn define(&mut self, name: Name, ty: TypeId, value: Value) {
        self.bindings.insert(name, Binding { ty, value });
    }

    pub fn lookup(&self, name: Name) -> Option<&Binding> {
        self.bindings.get(&name)
    }

    /// Current value of a variable by source name.
    pub fn value(&self, name: &str) -> Option<&Value> {
        let name = self.interner.get(name)?;
        self.bindings.get(&name).map(|b| &b.value)
    }

    pub fn remove(&mut self, name: Name) -> Option<Binding> {
        self.bindings.remove(&name)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Name, &Binding)> {
        self.bindings.iter().map(|(&name, binding)| (name, binding))
    }

    fn binding(&self, name: Name, ty: TypeId) -> Result<&Binding, EvalError> {
        let binding = self
            .bindings
            .get(&name)
            .ok_or_else(|| undefined_variable(self.interner.lookup(name)))?;
        if binding.ty == ty {
            Ok(binding)
        } else {
            Err(type_mismatch(
                format!("{ty:?}"),
                format!("{:?} for `{}`", binding.ty, self.interner.lookup(name)),
            ))
        }
    }
}

impl RuntimeContext for Environment {
    fn get(&self, name: Name, ty: TypeId) -> EvalResult {
        self.binding(name, ty).map(|b| b.value.clone())
    }

    fn set(&mut self, name: Name, ty: TypeId, value: Value) -> Result<(), EvalError> {
        self.binding(name, ty)?;
        if let Some(binding) = self.bindings.get_mut(&name) {
            binding.value = value;
        }
        Ok(())
    }
}

impl std::fmt::Debug for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut map = f.debug_map();
        for (name, binding) in &self.bindings {
            map.entry(&self.interner.lookup(*name), binding);
        }
        map.finish()
    }
}
