//! Syntactic type references.
//!
//! The lexer recognises type names (built-in keywords such as `int`, and
//! host-registered names such as `List<int>`) and hands them over as
//! `ParsedType`. Resolution to a [`TypeId`](crate::TypeId) happens in the
//! registry, which owns generic instantiation.

use crate::{Name, StringInterner};

/// A type as written in source.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ParsedType {
    /// `name` or `name<args…>`.
    Named { name: Name, args: Vec<ParsedType> },
    /// `elem[]`.
    Array(Box<ParsedType>),
}

impl ParsedType {
    /// Non-generic named type.
    pub fn named(name: Name) -> Self {
        ParsedType::Named {
            name,
            args: Vec::new(),
        }
    }

    /// Generic instance `name<args…>`.
    pub fn generic(name: Name, args: Vec<ParsedType>) -> Self {
        ParsedType::Named { name, args }
    }

    #[must_use]
    pub fn array_of(self) -> Self {
        ParsedType::Array(Box::new(self))
    }

    /// Render the type the way it was written, for diagnostics.
    pub fn display(&self, interner: &StringInterner) -> String {
        match self {
            ParsedType::Named { name, args } if args.is_empty() => {
                interner.lookup(*name).to_owned()
            }
            ParsedType::Named { name, args } => {
                let args: Vec<String> = args.iter().map(|a| a.display(interner)).collect();
                format!("{}<{}>", interner.lookup(*name), args.join(", "))
            }
            ParsedType::Array(elem) => format!("{}[]", elem.display(interner)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_renders_generics_and_arrays() {
        let interner = StringInterner::new();
        let list = ParsedType::generic(
            interner.intern("List"),
            vec![ParsedType::named(interner.intern("int"))],
        );
        assert_eq!(list.display(&interner), "List<int>");
        assert_eq!(list.array_of().display(&interner), "List<int>[]");
    }
}
