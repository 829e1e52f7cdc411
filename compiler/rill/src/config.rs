//! Engine configuration.

use rill_parse::ParseOptions;

/// Settings an [`Engine`](crate::Engine) applies to every compilation.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EngineConfig {
    pub parse: ParseOptions,
}

impl EngineConfig {
    #[must_use]
    pub fn with_parse_options(mut self, parse: ParseOptions) -> Self {
        self.parse = parse;
        self
    }

    /// Keep literal sub-expressions as written instead of folding them.
    #[must_use]
    pub fn without_folding(mut self) -> Self {
        self.parse = self.parse.without_folding();
        self
    }
}
