//! Reducer configuration.

/// Options for one reduction.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ParseOptions {
    /// Replace unary and binary operations on literals by their value.
    pub fold_constants: bool,
    /// Maximum nesting of parentheses, index arguments, call arguments,
    /// initializers and ternary branches.
    pub max_depth: usize,
}

impl ParseOptions {
    pub const DEFAULT_MAX_DEPTH: usize = 256;

    #[must_use]
    pub fn without_folding(mut self) -> Self {
        self.fold_constants = false;
        self
    }
}

impl Default for ParseOptions {
    fn default() -> Self {
        ParseOptions {
            fold_constants: true,
            max_depth: Self::DEFAULT_MAX_DEPTH,
        }
    }
}
