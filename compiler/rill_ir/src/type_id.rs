//! Interned type identifier.
//!
//! Every expression node declares exactly one `TypeId` at construction.
//! The primitive value types are pre-interned at fixed indices; array
//! types, user types and generic instances are allocated by the type pool
//! in `rill_types`.

use std::fmt;

/// Interned value-type identifier.
///
/// # Pre-interned Types
/// `INT`, `DOUBLE`, `BOOL`, `STRING`, `OBJECT` and `VOID` occupy indices
/// 0-5. Everything at or above [`TypeId::FIRST_COMPOUND`] is owned by the
/// type pool.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(transparent)]
pub struct TypeId(u32);

impl TypeId {
    pub const INT: TypeId = TypeId(0);
    pub const DOUBLE: TypeId = TypeId(1);
    pub const BOOL: TypeId = TypeId(2);
    pub const STRING: TypeId = TypeId(3);
    /// Top type: every value converts to `object` implicitly.
    pub const OBJECT: TypeId = TypeId(4);
    /// Type of executable nodes that produce no value.
    pub const VOID: TypeId = TypeId(5);

    /// First ID for pool-allocated types.
    pub const FIRST_COMPOUND: u32 = 6;

    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        TypeId(raw)
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Check if this is one of the pre-interned primitive types.
    #[inline]
    pub const fn is_primitive(self) -> bool {
        self.0 < Self::FIRST_COMPOUND
    }

    /// `int` or `double`.
    #[inline]
    pub const fn is_numeric(self) -> bool {
        self.0 == Self::INT.0 || self.0 == Self::DOUBLE.0
    }

    /// Name of a primitive type, `None` for pool-allocated types.
    pub const fn primitive_name(self) -> Option<&'static str> {
        match self.0 {
            0 => Some("int"),
            1 => Some("double"),
            2 => Some("bool"),
            3 => Some("string"),
            4 => Some("object"),
            5 => Some("void"),
            _ => None,
        }
    }
}

impl fmt::Debug for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.primitive_name() {
            Some(name) => write!(f, "TypeId::{}", name.to_uppercase()),
            None => write!(f, "TypeId({})", self.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primitives_are_distinct_and_named() {
        let all = [
            TypeId::INT,
            TypeId::DOUBLE,
            TypeId::BOOL,
            TypeId::STRING,
            TypeId::OBJECT,
            TypeId::VOID,
        ];
        for (i, ty) in all.iter().enumerate() {
            assert!(ty.is_primitive());
            assert_eq!(ty.index(), i);
            assert!(ty.primitive_name().is_some());
        }
        assert!(!TypeId::from_raw(TypeId::FIRST_COMPOUND).is_primitive());
        assert_eq!(TypeId::from_raw(TypeId::FIRST_COMPOUND).primitive_name(), None);
    }

    #[test]
    fn only_int_and_double_are_numeric() {
        assert!(TypeId::INT.is_numeric());
        assert!(TypeId::DOUBLE.is_numeric());
        assert!(!TypeId::BOOL.is_numeric());
        assert!(!TypeId::STRING.is_numeric());
    }
}
