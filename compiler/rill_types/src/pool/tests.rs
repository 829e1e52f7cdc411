use pretty_assertions::assert_eq;

use super::*;

#[test]
fn primitives_are_pre_interned() {
    let pool = TypePool::new();
    assert_eq!(pool.intern(TypeData::Int), TypeId::INT);
    assert_eq!(pool.intern(TypeData::Str), TypeId::STRING);
    assert_eq!(pool.intern(TypeData::Void), TypeId::VOID);
    assert_eq!(pool.len(), TypeId::FIRST_COMPOUND as usize);
}

#[test]
fn arrays_intern_once() {
    let pool = TypePool::new();
    let a = pool.array_of(TypeId::INT);
    let b = pool.array_of(TypeId::INT);
    let c = pool.array_of(TypeId::DOUBLE);
    assert_eq!(a, b);
    assert_ne!(a, c);
    assert_eq!(pool.elem_of(a), Some(TypeId::INT));
    assert_eq!(pool.elem_of(TypeId::INT), None);

    let nested = pool.array_of(a);
    assert_eq!(pool.data(nested), TypeData::Array(a));
}

#[test]
fn instances_keyed_by_args() {
    let pool = TypePool::new();
    let list = DefId::from_raw(3);
    let ints = pool.instance(list, &[TypeId::INT]);
    assert_eq!(pool.instance(list, &[TypeId::INT]), ints);
    assert_ne!(pool.instance(list, &[TypeId::STRING]), ints);
}

#[test]
fn concurrent_interning_agrees() {
    let pool = TypePool::new();
    let ids: Vec<TypeId> = std::thread::scope(|s| {
        let handles: Vec<_> = (0..4)
            .map(|_| s.spawn(|| pool.array_of(TypeId::BOOL)))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });
    assert!(ids.windows(2).all(|w| w[0] == w[1]));
}
