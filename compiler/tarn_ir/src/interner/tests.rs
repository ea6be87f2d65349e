use super::*;
use pretty_assertions::assert_eq;

#[test]
fn intern_and_lookup() {
    let interner = StringInterner::new();

    let foo = interner.intern("foo");
    let bar = interner.intern("bar");
    let foo2 = interner.intern("foo");

    assert_eq!(foo, foo2);
    assert_ne!(foo, bar);
    assert_eq!(interner.lookup(foo), "foo");
    assert_eq!(interner.lookup(bar), "bar");
}

#[test]
fn empty_string_is_name_empty() {
    let interner = StringInterner::new();
    assert_eq!(interner.intern(""), Name::EMPTY);
    assert_eq!(interner.lookup(Name::EMPTY), "");
}

#[test]
fn interning_from_several_threads_agrees() {
    let interner = StringInterner::new();
    let names: Vec<Name> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let interner = &interner;
                scope.spawn(move || interner.intern(&format!("method_{}", i % 2)))
            })
            .collect();
        handles
            .into_iter()
            .map(|h| h.join().unwrap_or(Name::EMPTY))
            .collect()
    });
    assert_eq!(names[0], names[2]);
    assert_eq!(names[1], names[3]);
    assert_ne!(names[0], names[1]);
}
