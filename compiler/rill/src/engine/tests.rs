use pretty_assertions::assert_eq;
use rill_diagnostic::ErrorCode;
use rill_test_support::tokens;

use super::*;

fn compile(engine: &Engine, source: &str) -> CompiledExpr {
    engine.compile(&tokens(source, engine.registry())).unwrap()
}

#[test]
fn declared_variables_are_visible_to_both_phases() {
    let mut engine = Engine::with_builtins();
    engine.declare("speed", TypeId::DOUBLE, Value::Double(2.0));
    let expr = compile(&engine, "speed * 3");
    assert_eq!(expr.type_name(), "double");
    assert_eq!(engine.evaluate(&expr).unwrap(), Value::Double(6.0));
}

#[test]
fn redeclaring_a_constant_hides_the_variable() {
    let mut engine = Engine::with_builtins();
    engine.declare("limit", TypeId::INT, Value::Int(1));
    engine.declare_constant("limit", Constant::Int(5));
    assert_eq!(engine.variable("limit"), None);
    let expr = compile(&engine, "limit + 1");
    assert_eq!(engine.evaluate(&expr).unwrap(), Value::Int(6));

    assert!(engine.undeclare("limit"));
    let err = engine.compile(&tokens("limit", engine.registry())).unwrap_err();
    assert_eq!(err.code(), ErrorCode::E2003);
}

#[test]
fn empty_expressions_evaluate_to_void() {
    let mut engine = Engine::with_builtins();
    let expr = compile(&engine, "");
    assert!(expr.is_empty());
    assert_eq!(expr.ty(), TypeId::VOID);
    assert_eq!(engine.evaluate(&expr).unwrap(), Value::Void);
    engine.execute(&expr).unwrap();
}

#[test]
fn assign_through_a_settable_expression() {
    let mut engine = Engine::with_builtins();
    engine.declare("total", TypeId::DOUBLE, Value::Double(0.0));
    let target = compile(&engine, "total");
    assert!(target.is_settable());
    assert_eq!(engine.assign(&target, Value::Int(3)).unwrap(), Value::Double(3.0));
    assert_eq!(engine.variable("total"), Some(&Value::Double(3.0)));
}

#[test]
fn run_reports_either_phase() {
    let mut engine = Engine::with_builtins();
    let registry = Arc::clone(engine.registry());
    assert_eq!(engine.run(&tokens("1 + 1", &registry)).unwrap(), Value::Int(2));
    assert!(matches!(
        engine.run(&tokens("1 +", &registry)),
        Err(EngineError::Parse(_))
    ));
    let err = engine.run(&tokens("1 / (1 - 1)", &registry)).unwrap_err();
    let EngineError::Eval(err) = err else {
        panic!("expected a runtime error, got {err:?}");
    };
    assert_eq!(err.kind, rill_types::EvalErrorKind::DivisionByZero);
}

#[test]
fn config_controls_folding() {
    let engine = Engine::with_config(
        RegistryBuilder::with_builtins(Arc::new(StringInterner::new())).build(),
        EngineConfig::default().without_folding(),
    );
    assert!(!engine.config().parse.fold_constants);
    let expr = compile(&engine, "1 + 2");
    assert!(matches!(
        expr.arena().kind(expr.root().unwrap()),
        rill_ir::ExprKind::Binary { .. }
    ));
}

#[test]
fn tracing_can_be_initialised_repeatedly() {
    crate::init_tracing();
    crate::init_tracing();
}
