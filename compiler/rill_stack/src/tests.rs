use super::*;

enum Nested {
    Leaf(i64),
    Neg(Box<Nested>),
}

fn eval(node: &Nested) -> i64 {
    ensure_sufficient_stack(|| match node {
        Nested::Leaf(v) => *v,
        Nested::Neg(inner) => -eval(inner),
    })
}

#[test]
fn evaluates_shallow_tree() {
    let tree = Nested::Neg(Box::new(Nested::Neg(Box::new(Nested::Leaf(7)))));
    assert_eq!(eval(&tree), 7);
}

#[test]
fn survives_deep_nesting() {
    let mut tree = Nested::Leaf(1);
    for _ in 0..100_001 {
        tree = Nested::Neg(Box::new(tree));
    }
    assert_eq!(eval(&tree), -1);

    // Drop iteratively; the default recursive drop would overflow.
    let mut cursor = tree;
    while let Nested::Neg(inner) = cursor {
        cursor = *inner;
    }
}

#[test]
fn passes_results_through() {
    let ok: Result<u8, String> = ensure_sufficient_stack(|| Ok(3));
    assert_eq!(ok, Ok(3));
}
