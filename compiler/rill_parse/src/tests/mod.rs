//! Reducer tests over scanned source text.
//!
//! Each test builds a [`Harness`]: the fixture registry, a scope with a few
//! declared variables and a matching runtime environment.

mod construct;
mod errors;
mod members;
mod operators;

use pretty_assertions::assert_eq;
use rill_eval::{Environment, Evaluator};
use rill_ir::TypeId;
use rill_test_support::{registry, tokens, Fixtures};
use rill_types::{EvalResult, Value};

use crate::{parse_expression, ParseError, ParseOptions, ParsedExpr, Parser, Scope, UnitFlags};

struct Harness {
    fx: Fixtures,
    scope: Scope,
    env: Environment,
    options: ParseOptions,
}

impl Harness {
    fn new() -> Self {
        let fx = registry();
        let env = Environment::new(fx.registry.shared_interner());
        let mut h = Harness {
            fx,
            scope: Scope::new(),
            env,
            options: ParseOptions::default(),
        };
        h.define("x", "10");
        h.define("y", "3");
        h.define("d", "2.5");
        h.define("s", r#""abc""#);
        h.define("flag", "true");
        h.define("v", "new Vec2(1, 2)");
        h.define("nums", "new int[] { 1, 2, 3 }");
        h.define("list", "new List<int>() { 4, 5 }");
        h.define("circle", "new Circle(1.0)");
        h.define("shape", "(Shape)new Circle(2.0)");
        h
    }

    fn without_folding() -> Self {
        let mut h = Self::new();
        h.options = h.options.without_folding();
        h
    }

    /// Declare `name` with the type and value of `source`.
    fn define(&mut self, name: &str, source: &str) {
        let parsed = self.parse(source).unwrap();
        let value = self.eval_parsed(&parsed).unwrap();
        let name = self.fx.registry.interner().intern(name);
        self.scope.declare_variable(name, parsed.ty());
        self.env.define(name, parsed.ty(), value);
    }

    fn parse(&self, source: &str) -> Result<ParsedExpr, ParseError> {
        let tokens = tokens(source, &self.fx.registry);
        parse_expression(&tokens, &self.fx.registry, &self.scope, self.options)
    }

    fn eval_parsed(&mut self, parsed: &ParsedExpr) -> EvalResult {
        let root = parsed.root.unwrap();
        Evaluator::new(&parsed.arena, &self.fx.registry).evaluate(root, &mut self.env)
    }

    fn try_eval(&mut self, source: &str) -> EvalResult {
        let parsed = self.parse(source).unwrap();
        self.eval_parsed(&parsed)
    }

    fn eval(&mut self, source: &str) -> Value {
        self.try_eval(source)
            .unwrap_or_else(|e| panic!("`{source}` failed: {e}"))
    }

    fn error(&self, source: &str) -> ParseError {
        match self.parse(source) {
            Ok(parsed) => panic!("`{source}` reduced to {:?}", parsed.root),
            Err(err) => err,
        }
    }

    fn type_of(&self, source: &str) -> String {
        let parsed = self.parse(source).unwrap();
        self.fx.registry.type_name(parsed.ty())
    }

    fn var(&self, name: &str) -> Value {
        self.env.value(name).cloned().unwrap()
    }
}

fn string(s: &str) -> Value {
    Value::string(s)
}

#[test]
fn empty_input_has_no_root() {
    let h = Harness::new();
    let parsed = h.parse("").unwrap();
    assert_eq!(parsed.root, None);
    assert_eq!(parsed.ty(), TypeId::VOID);
    assert_eq!(parsed.capabilities(), UnitFlags::empty());
}

#[test]
fn capabilities_of_the_root() {
    let h = Harness::new();

    let var = h.parse("x").unwrap();
    assert!(var.is_gettable() && var.is_settable() && !var.is_executable());

    let sum = h.parse("x + 1").unwrap();
    assert!(sum.is_gettable() && !sum.is_settable());

    let assign = h.parse("x = 1").unwrap();
    assert!(assign.is_executable() && assign.is_gettable());

    let add = h.parse("list.Add(1)").unwrap();
    assert!(add.is_executable() && !add.is_gettable());

    let upper = h.parse("s.ToUpper()").unwrap();
    assert!(upper.is_gettable() && !upper.is_executable());

    let call = h.parse("abs(x)").unwrap();
    assert!(call.is_gettable() && !call.is_executable());

    assert!(h.parse("v.X").unwrap().is_settable());
    assert!(!h.parse("Math.PI").unwrap().is_settable());
    assert!(h.parse("nums[0]").unwrap().is_settable());
}

#[test]
fn parser_stops_at_separators() {
    let h = Harness::new();
    let tokens = tokens("x = 1; y = x + 1", &h.fx.registry);
    let mut parser = Parser::new(&tokens, &h.fx.registry, &h.scope, h.options);

    let first = parser.parse_expression().unwrap();
    assert!(first.is_some());
    assert_eq!(parser.current().kind, rill_ir::TokenKind::Semicolon);
    parser.skip();

    let second = parser.parse_expression().unwrap();
    assert!(second.is_some());
    assert!(parser.is_at_end());
    parser.expect_end().unwrap();

    let arena = parser.finish();
    let mut env = h.env;
    let eval = Evaluator::new(&arena, &h.fx.registry);
    eval.execute(first.unwrap(), &mut env).unwrap();
    assert_eq!(eval.evaluate(second.unwrap(), &mut env).unwrap(), Value::Int(2));
    assert_eq!(env.value("y"), Some(&Value::Int(2)));
}

#[test]
fn whole_stream_must_be_consumed() {
    let h = Harness::new();
    let err = h.error("1; 2");
    assert_eq!(err.code(), rill_diagnostic::ErrorCode::E1001);
}

#[test]
fn constants_are_inlined() {
    let mut h = Harness::new();
    let limit = h.fx.registry.interner().intern("LIMIT");
    h.scope
        .declare_constant(limit, crate::Constant::Int(40));
    let parsed = h.parse("LIMIT + 2").unwrap();
    assert_eq!(
        parsed.arena.kind(parsed.root.unwrap()),
        &rill_ir::ExprKind::Int(42)
    );
    assert_eq!(h.eval("LIMIT * 2"), Value::Int(80));
}

#[test]
fn declared_functions_resolve_through_the_registry() {
    let mut h = Harness::new();
    let abs = h.fx.registry.interner().intern("abs");
    h.scope.declare_function(abs);
    assert_eq!(h.eval("abs(-4)"), Value::Int(4));
    assert_eq!(h.eval("abs(-1.5)"), Value::Double(1.5));
}
