//! Rill: an embeddable expression language.
//!
//! The host lexes source text into a [`TokenList`], compiles it once with
//! an [`Engine`] and evaluates the resulting [`CompiledExpr`] as often as
//! it likes:
//!
//! ```text
//! tokens ──Engine::compile──▶ CompiledExpr ──evaluate(ctx)──▶ Value
//! ```
//!
//! Types, members, operators and conversions come from a
//! [`TypeRegistry`] built once at startup; see [`RegistryBuilder`].
//!
//! # Tracing
//!
//! Call [`init_tracing`] and set `RUST_LOG=rill_parse=trace` to watch the
//! reduction passes.

mod config;
mod engine;

pub use config::EngineConfig;
pub use engine::{CompiledExpr, Engine, EngineError};

pub use rill_diagnostic::{Diagnostic, ErrorCode};
pub use rill_eval::{Environment, RuntimeContext};
pub use rill_ir::{Name, Span, StringInterner, Token, TokenKind, TokenList, TypeId};
pub use rill_parse::{CompilationContext, Constant, Identifier, ParseError, ParseOptions, Scope};
pub use rill_types::{
    EvalError, EvalErrorKind, EvalResult, ObjectRef, RegistryBuilder, TypeRegistry, TypeSig,
    Value,
};

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Install a hierarchical tracing subscriber filtered by `RUST_LOG`.
///
/// Does nothing unless `RUST_LOG` is set. Safe to call more than once.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    tracing_tree::HierarchicalLayer::new(2)
                        .with_targets(true)
                        .with_bracketed_fields(true),
                )
                .init();
        }
    });
}
