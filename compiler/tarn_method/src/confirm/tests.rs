use super::*;
use crate::fixture::Fixture;
use crate::RegistryOracle;
use pretty_assertions::assert_eq;

fn pick_for(f: &mut Fixture, receiver: Idx, method: &str, visible: &[TraitId]) -> Pick {
    match f.lookup(receiver, method, visible) {
        Ok(pick) => pick,
        Err(err) => panic!("lookup failed: {err:?}"),
    }
}

fn run_confirm(f: &mut Fixture, receiver: Idx, pick: &Pick) -> Result<ConfirmedCall, ConfirmError> {
    let oracle = RegistryOracle::new(&f.registry);
    let cx = ProbeContext::new(&f.registry, &oracle, &f.config, &f.env);
    let mut engine = UnifyEngine::new(&mut f.pool);
    confirm(&mut engine, &cx, receiver, pick)
}

#[test]
fn boxed_array_to_mut_slice() {
    let mut f = Fixture::with_smart_pointers();
    let slice = f.pool.slice(Idx::I32);
    let imp = f.inherent(0, slice, "foo", SelfShape::ByMutRef);
    let arr = f.pool.array(Idx::I32, 2);
    let boxed = f.adt("Box", &[arr]);

    let pick = pick_for(&mut f, boxed, "foo", &[]);
    assert_eq!(
        pick.adjustments().to_vec(),
        vec![
            Adjustment::Deref,
            Adjustment::Unsize,
            Adjustment::Borrow(AutoRef::MutRef)
        ]
    );
    assert_eq!(pick.callee(), Callee::Inherent { impl_id: imp });

    let Ok(call) = run_confirm(&mut f, boxed, &pick) else {
        panic!("confirmation failed");
    };
    assert_eq!(f.render(call.self_ty), "&mut [i32]");
    assert_eq!(call.callee, Callee::Inherent { impl_id: imp });
    assert!(call.impl_args.is_empty());
}

#[test]
fn confirmation_commits_receiver_bindings() {
    let mut f = Fixture::new();
    let tr = f.trait_with_method("Tr", "go", SelfShape::ByRef);
    let vec_i32 = f.adt("Vec", &[Idx::I32]);
    let imp = f.trait_impl(tr, 0, vec_i32);
    let var = f.pool.fresh_var();
    let receiver = f.adt("Vec", &[var]);

    let pick = pick_for(&mut f, receiver, "go", &[tr]);
    assert!(!pick.trait_dispatch);
    assert_eq!(f.pool.resolved(var), var);

    let Ok(call) = run_confirm(&mut f, receiver, &pick) else {
        panic!("confirmation failed");
    };
    assert_eq!(f.pool.resolved(var), Idx::I32);
    assert_eq!(f.render(call.self_ty), "&Vec<i32>");
    assert_eq!(
        call.callee,
        Callee::Trait {
            trait_id: tr,
            impl_id: Some(imp)
        }
    );
}

#[test]
fn impl_arguments_are_inferred() {
    let mut f = Fixture::new();
    let p0 = f.param(0);
    let vec_t = f.adt("Vec", &[p0]);
    f.inherent(1, vec_t, "len", SelfShape::ByRef);
    let receiver = f.adt("Vec", &[Idx::BOOL]);

    let pick = pick_for(&mut f, receiver, "len", &[]);
    let Ok(call) = run_confirm(&mut f, receiver, &pick) else {
        panic!("confirmation failed");
    };
    assert_eq!(call.impl_args.to_vec(), vec![Idx::BOOL]);
    assert_eq!(call.adjustments.to_vec(), vec![Adjustment::Borrow(AutoRef::Ref)]);
}

#[test]
fn merged_impls_dispatch_through_the_trait() {
    let mut f = Fixture::new();
    let tr = f.trait_with_method("Tr", "go", SelfShape::ByRef);
    let p0 = f.param(0);
    let vec_t = f.adt("Vec", &[p0]);
    let vec_i32 = f.adt("Vec", &[Idx::I32]);
    f.trait_impl(tr, 0, vec_i32);
    f.trait_impl(tr, 1, vec_t);
    let var = f.pool.fresh_var();
    let receiver = f.adt("Vec", &[var]);

    let pick = pick_for(&mut f, receiver, "go", &[tr]);
    assert_eq!(
        pick.callee(),
        Callee::Trait {
            trait_id: tr,
            impl_id: None
        }
    );
}

#[test]
fn merged_impls_leave_the_receiver_unbound() {
    let mut f = Fixture::new();
    let tr = f.trait_with_method("Tr", "go", SelfShape::ByRef);
    let vec_i32 = f.adt("Vec", &[Idx::I32]);
    let vec_bool = f.adt("Vec", &[Idx::BOOL]);
    f.trait_impl(tr, 0, vec_i32);
    f.trait_impl(tr, 0, vec_bool);
    let var = f.pool.fresh_var();
    let receiver = f.adt("Vec", &[var]);

    let pick = pick_for(&mut f, receiver, "go", &[tr]);
    assert!(pick.trait_dispatch);

    let Ok(call) = run_confirm(&mut f, receiver, &pick) else {
        panic!("confirmation failed");
    };
    assert_eq!(f.pool.resolved(var), var);
    assert!(call.impl_args.is_empty());
    assert_eq!(call.adjustments.to_vec(), vec![Adjustment::Borrow(AutoRef::Ref)]);
    assert_eq!(
        call.callee,
        Callee::Trait {
            trait_id: tr,
            impl_id: None
        }
    );
}

#[test]
fn bound_methods_dispatch_through_the_trait() {
    let mut f = Fixture::new();
    let show = f.trait_with_method("Show", "show", SelfShape::ByRef);
    let t = f.rigid("T");
    f.env.add_bound(t, show);

    let pick = pick_for(&mut f, t, "show", &[]);
    assert_eq!(pick.candidate.source, CandidateSource::ParamBound(show));
    assert_eq!(
        pick.callee(),
        Callee::Trait {
            trait_id: show,
            impl_id: None
        }
    );
    assert!(run_confirm(&mut f, t, &pick).is_ok());
}

#[test]
fn replay_fails_without_the_deref() {
    let mut f = Fixture::with_smart_pointers();
    let point = f.adt("Point", &[]);
    f.inherent(0, point, "norm", SelfShape::ByRef);
    let boxed = f.adt("Box", &[point]);
    let pick = pick_for(&mut f, boxed, "norm", &[]);
    assert_eq!(pick.autoderefs, 1);

    // A receiver the oracle cannot dereference.
    let other = f.adt("Other", &[]);
    assert_eq!(
        run_confirm(&mut f, other, &pick),
        Err(ConfirmError::Deref { ty: other })
    );
}

#[test]
fn qualified_call_paths() {
    let mut f = Fixture::new();
    let point = f.adt("Point", &[]);
    let slice = f.pool.slice(Idx::I32);
    assert_eq!(type_path(&f.pool, &f.interner, point), "Point");
    assert_eq!(type_path(&f.pool, &f.interner, slice), "<[i32]>");

    let show = f.trait_with_method("Show", "show", SelfShape::ByRef);
    f.trait_impl(show, 0, point);
    f.inherent(0, slice, "sum", SelfShape::ByValue);

    let by_trait = pick_for(&mut f, point, "show", &[show]);
    let call = render_qualified_call(&f.pool, &f.interner, &f.registry, &by_trait.candidate, "p");
    assert_eq!(call, "Show::show(&p)");

    let inherent = pick_for(&mut f, slice, "sum", &[]);
    let call = render_qualified_call(&f.pool, &f.interner, &f.registry, &inherent.candidate, "s");
    assert_eq!(call, "<[i32]>::sum(s)");
}
