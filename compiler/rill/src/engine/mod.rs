//! The engine: one registry, the host's declarations and a default
//! variable store.

use std::sync::Arc;

use rill_eval::{Environment, Evaluator, RuntimeContext};
use rill_ir::{ExprArena, ExprId, StringInterner, TokenList, TypeId};
use rill_parse::{parse_expression, Constant, ParseError, ParsedExpr, Scope};
use rill_types::{EvalError, EvalResult, RegistryBuilder, TypeRegistry, Value};

use crate::EngineConfig;

#[cfg(test)]
mod tests;

/// Either phase of running an expression failed.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Eval(#[from] EvalError),
}

/// A reduced expression ready for evaluation.
///
/// Holds its own handle to the registry, so it can be sent to and
/// evaluated on other threads, each with its own context.
#[derive(Clone, Debug)]
pub struct CompiledExpr {
    parsed: ParsedExpr,
    registry: Arc<TypeRegistry>,
}

impl CompiledExpr {
    /// Static type of the result; `void` for an empty expression.
    pub fn ty(&self) -> TypeId {
        self.parsed.ty()
    }

    pub fn type_name(&self) -> String {
        self.registry.type_name(self.ty())
    }

    pub fn is_empty(&self) -> bool {
        self.parsed.root.is_none()
    }

    pub fn is_gettable(&self) -> bool {
        self.parsed.is_gettable()
    }

    pub fn is_settable(&self) -> bool {
        self.parsed.is_settable()
    }

    pub fn is_executable(&self) -> bool {
        self.parsed.is_executable()
    }

    pub fn arena(&self) -> &ExprArena {
        &self.parsed.arena
    }

    pub fn root(&self) -> Option<ExprId> {
        self.parsed.root
    }

    /// Evaluate against `ctx`. An empty expression yields `void`.
    #[tracing::instrument(level = "debug", skip_all, fields(ty = %self.type_name()))]
    pub fn evaluate(&self, ctx: &mut dyn RuntimeContext) -> EvalResult {
        match self.parsed.root {
            Some(root) => Evaluator::new(&self.parsed.arena, &self.registry).evaluate(root, ctx),
            None => Ok(Value::Void),
        }
    }

    /// Evaluate for effect only.
    pub fn execute(&self, ctx: &mut dyn RuntimeContext) -> Result<(), EvalError> {
        match self.parsed.root {
            Some(root) => Evaluator::new(&self.parsed.arena, &self.registry).execute(root, ctx),
            None => Ok(()),
        }
    }

    /// Store `value` through a settable expression.
    pub fn assign(&self, value: Value, ctx: &mut dyn RuntimeContext) -> EvalResult {
        match self.parsed.root {
            Some(root) => {
                Evaluator::new(&self.parsed.arena, &self.registry).assign(root, value, ctx)
            }
            None => Ok(Value::Void),
        }
    }
}

/// Compiles token streams against a registry and evaluates them against a
/// built-in [`Environment`].
///
/// Every declared variable lives in both the compile-time [`Scope`] and the
/// runtime environment, so the two never disagree about a name's type.
pub struct Engine {
    registry: Arc<TypeRegistry>,
    scope: Scope,
    env: Environment,
    config: EngineConfig,
}

impl Engine {
    pub fn new(registry: TypeRegistry) -> Self {
        Self::with_config(registry, EngineConfig::default())
    }

    pub fn with_config(registry: TypeRegistry, config: EngineConfig) -> Self {
        let env = Environment::new(registry.shared_interner());
        Engine {
            registry: Arc::new(registry),
            scope: Scope::new(),
            env,
            config,
        }
    }

    /// An engine over the built-in binding tables only.
    pub fn with_builtins() -> Self {
        Self::new(RegistryBuilder::with_builtins(Arc::new(StringInterner::new())).build())
    }

    pub fn registry(&self) -> &Arc<TypeRegistry> {
        &self.registry
    }

    /// The interner token streams for this engine must be built with.
    pub fn interner(&self) -> &StringInterner {
        self.registry.interner()
    }

    pub fn config(&self) -> EngineConfig {
        self.config
    }

    pub fn environment(&self) -> &Environment {
        &self.env
    }

    pub fn environment_mut(&mut self) -> &mut Environment {
        &mut self.env
    }

    /// Declare (or redeclare) a variable with its static type and value.
    pub fn declare(&mut self, name: &str, ty: TypeId, value: Value) {
        tracing::debug!(name, ty = %self.registry.type_name(ty), "declared variable");
        let name = self.registry.interner().intern(name);
        self.scope.declare_variable(name, ty);
        self.env.define(name, ty, value);
    }

    /// Declare a constant, inlined into every expression that names it.
    pub fn declare_constant(&mut self, name: &str, value: Constant) {
        let name = self.registry.interner().intern(name);
        self.env.remove(name);
        self.scope.declare_constant(name, value);
    }

    /// Forget a variable or constant.
    pub fn undeclare(&mut self, name: &str) -> bool {
        let name = self.registry.interner().intern(name);
        self.env.remove(name);
        self.scope.remove(name)
    }

    pub fn variable(&self, name: &str) -> Option<&Value> {
        self.env.value(name)
    }

    /// Reduce a whole token stream to one expression.
    #[tracing::instrument(level = "debug", skip_all, fields(tokens = tokens.len()))]
    pub fn compile(&self, tokens: &TokenList) -> Result<CompiledExpr, ParseError> {
        let parsed = parse_expression(tokens, &self.registry, &self.scope, self.config.parse)?;
        Ok(CompiledExpr {
            parsed,
            registry: Arc::clone(&self.registry),
        })
    }

    /// Evaluate against the engine's own environment.
    pub fn evaluate(&mut self, expr: &CompiledExpr) -> EvalResult {
        expr.evaluate(&mut self.env)
    }

    pub fn execute(&mut self, expr: &CompiledExpr) -> Result<(), EvalError> {
        expr.execute(&mut self.env)
    }

    pub fn assign(&mut self, expr: &CompiledExpr, value: Value) -> EvalResult {
        expr.assign(value, &mut self.env)
    }

    /// Compile and evaluate in one step.
    pub fn run(&mut self, tokens: &TokenList) -> Result<Value, EngineError> {
        let expr = self.compile(tokens)?;
        Ok(self.evaluate(&expr)?)
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("variables", &self.env.len())
            .field("declarations", &self.scope.len())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
