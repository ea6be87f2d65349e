use super::*;
use crate::fixture::Fixture;
use crate::CandidateKind;
use pretty_assertions::assert_eq;
use tarn_types::{ImplEntry, MethodSig, SelfShape};

#[test]
fn by_value_beats_autoref() {
    let mut f = Fixture::new();
    let point = f.adt("Point", &[]);
    let by_ref = f.inherent(0, point, "get", SelfShape::ByRef);
    let by_value = f.inherent(0, point, "get", SelfShape::ByValue);

    let Ok(pick) = f.lookup(point, "get", &[]) else {
        panic!("expected a pick");
    };
    assert_eq!(pick.candidate.source, CandidateSource::Impl(by_value));
    assert_eq!(pick.autoref, None);

    // Through a reference, `&self` matches the receiver as it is.
    let ref_point = f.pool.reference(point);
    let Ok(pick) = f.lookup(ref_point, "get", &[]) else {
        panic!("expected a pick");
    };
    assert_eq!(pick.candidate.source, CandidateSource::Impl(by_ref));
    assert_eq!(pick.autoderefs, 0);
    assert_eq!(pick.autoref, None);
}

#[test]
fn distinct_inherent_impls_are_ambiguous() {
    let mut f = Fixture::new();
    let point = f.adt("Point", &[]);
    let ref_point = f.pool.reference(point);
    let on_value = f.inherent(0, point, "get", SelfShape::ByRef);
    let on_ref = f.inherent(0, ref_point, "get", SelfShape::ByValue);

    // Both want `&Point`, found at the same autoref.
    let result = f.lookup(point, "get", &[]);
    let Err(MethodError::Ambiguous { candidates, .. }) = result else {
        panic!("expected ambiguity, got {result:?}");
    };
    let sources: Vec<_> = candidates.iter().map(|c| c.source).collect();
    assert_eq!(
        sources,
        vec![CandidateSource::Impl(on_value), CandidateSource::Impl(on_ref)]
    );
}

#[test]
fn autoref_beats_mut_autoref() {
    let mut f = Fixture::new();
    let point = f.adt("Point", &[]);
    let show = f.trait_with_method("Show", "go", SelfShape::ByRef);
    let edit = f.trait_with_method("Edit", "go", SelfShape::ByMutRef);
    f.trait_impl(show, 0, point);
    f.trait_impl(edit, 0, point);

    let Ok(pick) = f.lookup(point, "go", &[show, edit]) else {
        panic!("expected a pick");
    };
    assert_eq!(pick.autoref, Some(AutoRef::Ref));
    assert_eq!(pick.candidate.kind, CandidateKind::Extension(show));
}

#[test]
fn inherent_beats_extension_at_the_same_step() {
    let mut f = Fixture::new();
    let point = f.adt("Point", &[]);
    let tr = f.trait_with_method("Tr", "go", SelfShape::ByRef);
    f.trait_impl(tr, 0, point);
    let inherent = f.inherent(0, point, "go", SelfShape::ByRef);

    let Ok(pick) = f.lookup(point, "go", &[tr]) else {
        panic!("expected a pick");
    };
    assert_eq!(pick.candidate.source, CandidateSource::Impl(inherent));
    assert_eq!(pick.candidate.kind, CandidateKind::Inherent);
}

#[test]
fn extension_by_value_beats_inherent_autoref() {
    let mut f = Fixture::new();
    let point = f.adt("Point", &[]);
    let tr = f.trait_with_method("Tr", "go", SelfShape::ByValue);
    let ext = f.trait_impl(tr, 0, point);
    f.inherent(0, point, "go", SelfShape::ByRef);

    let Ok(pick) = f.lookup(point, "go", &[tr]) else {
        panic!("expected a pick");
    };
    assert_eq!(pick.candidate.source, CandidateSource::Impl(ext));
    assert_eq!(pick.autoref, None);
}

#[test]
fn earlier_step_beats_later_step() {
    let mut f = Fixture::with_smart_pointers();
    let point = f.adt("Point", &[]);
    let boxed = f.adt("Box", &[point]);
    let tr = f.trait_with_method("Tr", "go", SelfShape::ByMutRef);
    let on_box = f.trait_impl(tr, 0, boxed);
    f.inherent(0, point, "go", SelfShape::ByValue);

    let Ok(pick) = f.lookup(boxed, "go", &[tr]) else {
        panic!("expected a pick");
    };
    assert_eq!(pick.candidate.source, CandidateSource::Impl(on_box));
    assert_eq!(pick.autoderefs, 0);
    assert_eq!(pick.autoref, Some(AutoRef::MutRef));
}

#[test]
fn impls_of_one_trait_merge() {
    let mut f = Fixture::new();
    let tr = f.trait_with_method("Tr", "go", SelfShape::ByRef);
    let p0 = f.param(0);
    let vec_t = f.adt("Vec", &[p0]);
    let vec_i32 = f.adt("Vec", &[Idx::I32]);
    f.trait_impl(tr, 0, vec_i32);
    f.trait_impl(tr, 1, vec_t);
    let var = f.pool.fresh_var();
    let receiver = f.adt("Vec", &[var]);

    let Ok(pick) = f.lookup(receiver, "go", &[tr]) else {
        panic!("expected a pick");
    };
    assert!(pick.trait_dispatch);
    assert_eq!(pick.candidate.trait_id(), Some(tr));
    // Probing left the receiver's variable alone.
    assert_eq!(f.pool.resolved(var), var);
}

#[test]
fn distinct_traits_are_ambiguous() {
    let mut f = Fixture::new();
    let a = f.trait_with_method("A", "go", SelfShape::ByRef);
    let b = f.trait_with_method("B", "go", SelfShape::ByRef);
    f.trait_impl(a, 0, Idx::I32);
    f.trait_impl(b, 0, Idx::I32);

    let result = f.lookup(Idx::I32, "go", &[a, b]);
    let Err(MethodError::Ambiguous { candidates, .. }) = result else {
        panic!("expected ambiguity, got {result:?}");
    };
    let traits: Vec<_> = candidates.iter().map(Candidate::trait_id).collect();
    assert_eq!(traits, vec![Some(a), Some(b)]);

    // Only one of them in scope: no conflict.
    assert!(f.lookup(Idx::I32, "go", &[b]).is_ok());
}

#[test]
fn ambiguity_does_not_fall_through() {
    let mut f = Fixture::with_smart_pointers();
    let point = f.adt("Point", &[]);
    let boxed = f.adt("Box", &[point]);
    let a = f.trait_with_method("A", "go", SelfShape::ByRef);
    let b = f.trait_with_method("B", "go", SelfShape::ByRef);
    f.trait_impl(a, 0, boxed);
    f.trait_impl(b, 0, boxed);
    f.inherent(0, point, "go", SelfShape::ByRef);

    assert!(matches!(
        f.lookup(boxed, "go", &[a, b]),
        Err(MethodError::Ambiguous { .. })
    ));
}

#[test]
fn refuted_where_clause_skips_candidate() {
    let mut f = Fixture::new();
    let show = f.trait_with_method("Show", "show", SelfShape::ByRef);
    let tr = f.trait_with_method("Tr", "go", SelfShape::ByRef);
    f.trait_impl(show, 0, Idx::I32);
    let p0 = f.param(0);
    let vec_t = f.adt("Vec", &[p0]);
    let entry = ImplEntry::of_trait(tr, vec![f.name("T")], vec_t).with_where(p0, vec![show]);
    f.registry.register_impl(&f.pool, entry);

    let vec_i32 = f.adt("Vec", &[Idx::I32]);
    let vec_bool = f.adt("Vec", &[Idx::BOOL]);
    assert!(f.lookup(vec_i32, "go", &[tr]).is_ok());
    assert!(matches!(
        f.lookup(vec_bool, "go", &[tr]),
        Err(MethodError::NoMethodFound { .. })
    ));
}

#[test]
fn unsized_step_reports_its_deref_count() {
    let mut f = Fixture::with_smart_pointers();
    let slice = f.pool.slice(Idx::U8);
    f.inherent(0, slice, "first", SelfShape::ByRef);
    let arr = f.pool.array(Idx::U8, 4);
    let boxed = f.adt("Box", &[arr]);

    let Ok(pick) = f.lookup(boxed, "first", &[]) else {
        panic!("expected a pick");
    };
    assert_eq!(pick.autoderefs, 1);
    assert!(pick.unsize);
    assert_eq!(pick.autoref, Some(AutoRef::Ref));
}

#[test]
fn failure_lists_steps_and_associated_functions() {
    let mut f = Fixture::with_smart_pointers();
    let point = f.adt("Point", &[]);
    let boxed = f.adt("Box", &[point]);
    let entry = ImplEntry::inherent(Vec::new(), point)
        .with_method(MethodSig::associated(f.name("origin")));
    let imp = f.registry.register_impl(&f.pool, entry);

    assert_eq!(
        f.lookup(boxed, "origin", &[]),
        Err(MethodError::NoMethodFound {
            method: f.name("origin"),
            receiver: boxed,
            steps_tried: vec![boxed, point],
            static_candidates: vec![CandidateSource::Impl(imp)],
            unimported_traits: Vec::new(),
        })
    );
}

#[test]
fn autoref_prefix() {
    assert_eq!(AutoRef::Ref.prefix(), "&");
    assert_eq!(AutoRef::MutRef.prefix(), "&mut ");
}
