use pretty_assertions::assert_eq;
use rill_ir::{StringInterner, TypeId};

use super::{CompilationContext, Constant, Identifier, Scope};

#[test]
fn undeclared_names_are_unidentified() {
    let interner = StringInterner::new();
    let scope = Scope::new();
    assert_eq!(
        scope.classify(interner.intern("speed")),
        Identifier::Unidentified
    );
}

#[test]
fn later_declaration_wins() {
    let interner = StringInterner::new();
    let name = interner.intern("limit");
    let mut scope = Scope::new();
    scope.declare_variable(name, TypeId::INT);
    scope.declare_constant(name, Constant::Double(2.5));
    assert_eq!(scope.len(), 1);
    assert_eq!(
        scope.classify(name),
        Identifier::Constant(Constant::Double(2.5))
    );
    assert!(scope.remove(name));
    assert!(scope.is_empty());
}

#[test]
fn constant_types() {
    assert_eq!(Constant::Int(1).ty(), TypeId::INT);
    assert_eq!(Constant::Str("a".into()).ty(), TypeId::STRING);
}
