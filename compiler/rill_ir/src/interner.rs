//! String interner for identifiers and string literals.
//!
//! Interning takes `&self` so a single interner can be shared by the
//! token producer, the reducer (which interns folded string constants)
//! and any number of evaluating threads.

use super::Name;
use parking_lot::RwLock;
use rustc_hash::FxHashMap;

/// Error when interning a string fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InternError {
    /// More than `u32::MAX` distinct strings were interned.
    Overflow { count: usize },
}

impl std::fmt::Display for InternError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InternError::Overflow { count } => {
                write!(f, "interner exceeded capacity: {count} strings")
            }
        }
    }
}

impl std::error::Error for InternError {}

#[derive(Default)]
struct Storage {
    /// Map from string content to index.
    map: FxHashMap<&'static str, Name>,
    /// Contents, indexed by `Name`.
    strings: Vec<&'static str>,
}

/// Thread-safe string interner.
///
/// Interned strings are leaked and live for the rest of the process, which
/// lets [`lookup`](Self::lookup) hand out `&'static str` without holding the
/// lock.
pub struct StringInterner {
    storage: RwLock<Storage>,
}

impl StringInterner {
    /// Create a new interner with the empty string pre-interned as [`Name::EMPTY`].
    pub fn new() -> Self {
        let mut storage = Storage::default();
        storage.map.insert("", Name::EMPTY);
        storage.strings.push("");
        StringInterner {
            storage: RwLock::new(storage),
        }
    }

    /// Try to intern a string, returning its Name or an error on overflow.
    pub fn try_intern(&self, s: &str) -> Result<Name, InternError> {
        if let Some(&name) = self.storage.read().map.get(s) {
            return Ok(name);
        }

        let mut storage = self.storage.write();
        // Another writer may have won the race between the two locks.
        if let Some(&name) = storage.map.get(s) {
            return Ok(name);
        }
        let index = u32::try_from(storage.strings.len()).map_err(|_| InternError::Overflow {
            count: storage.strings.len(),
        })?;
        let leaked: &'static str = Box::leak(s.to_owned().into_boxed_str());
        let name = Name::from_raw(index);
        storage.map.insert(leaked, name);
        storage.strings.push(leaked);
        Ok(name)
    }

    /// Intern a string.
    ///
    /// # Panics
    /// Panics if more than `u32::MAX` strings are interned.
    pub fn intern(&self, s: &str) -> Name {
        self.try_intern(s).unwrap_or_else(|e| panic!("{e}"))
    }

    /// Look up the string for a Name.
    ///
    /// Unknown names resolve to the empty string.
    pub fn lookup(&self, name: Name) -> &'static str {
        self.storage
            .read()
            .strings
            .get(name.index())
            .copied()
            .unwrap_or("")
    }

    /// Get a Name for an already-interned string without interning it.
    pub fn get(&self, s: &str) -> Option<Name> {
        self.storage.read().map.get(s).copied()
    }

    /// Number of interned strings, including the empty string.
    pub fn len(&self) -> usize {
        self.storage.read().strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for StringInterner {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for StringInterner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StringInterner")
            .field("len", &self.len())
            .finish()
    }
}
