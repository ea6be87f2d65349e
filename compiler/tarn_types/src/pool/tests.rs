use super::*;
use pretty_assertions::assert_eq;
use tarn_ir::StringInterner;

#[test]
fn primitives_have_fixed_indices() {
    let pool = Pool::new();
    assert_eq!(pool.tag(Idx::I32), Tag::I32);
    assert_eq!(pool.tag(Idx::STR), Tag::Str);
    assert_eq!(pool.tag(Idx::ERROR), Tag::Error);
    assert!(pool.flags(Idx::STR).contains(TypeFlags::IS_UNSIZED));
    assert!(pool.flags(Idx::ERROR).has_errors());
    assert_eq!(pool.len(), Idx::FIRST_DYNAMIC as usize);
}

#[test]
fn interning_deduplicates_structure() {
    let mut pool = Pool::new();
    let interner = StringInterner::new();
    let vec_name = interner.intern("Vec");

    let a = pool.applied(vec_name, &[Idx::I32]);
    let b = pool.applied(vec_name, &[Idx::I32]);
    let c = pool.applied(vec_name, &[Idx::I64]);
    assert_eq!(a, b);
    assert_ne!(a, c);

    let r1 = pool.reference(a);
    let r2 = pool.reference(b);
    assert_eq!(r1, r2);
    assert_ne!(r1, pool.mut_reference(a));

    assert_ne!(pool.array(Idx::I32, 2), pool.array(Idx::I32, 3));
}

#[test]
fn accessors_round_trip_structure() {
    let mut pool = Pool::new();
    let interner = StringInterner::new();
    let rc = interner.intern("Rc");

    let arr = pool.array(Idx::U8, 3);
    assert_eq!(pool.array_elem(arr), Idx::U8);
    assert_eq!(pool.array_len(arr), 3);

    let applied = pool.applied(rc, &[arr, Idx::BOOL]);
    assert_eq!(pool.applied_name(applied), rc);
    assert_eq!(pool.applied_args(applied).as_slice(), &[arr, Idx::BOOL]);

    let slice = pool.slice(Idx::CHAR);
    assert_eq!(pool.inner(slice), Idx::CHAR);
}

#[test]
fn flags_propagate_from_children() {
    let mut pool = Pool::new();
    let interner = StringInterner::new();
    let var = pool.fresh_var();
    let param = pool.bound_var(0);

    let r = pool.reference(var);
    assert!(pool.flags(r).has_vars());
    assert!(pool.flags(r).contains(TypeFlags::IS_REFERENCE));

    let boxed = pool.applied(interner.intern("Box"), &[param]);
    assert!(pool.flags(boxed).needs_subst());
    assert!(pool.flags(boxed).contains(TypeFlags::IS_NOMINAL));

    let arr = pool.array(var, 4);
    assert!(pool.flags(arr).has_vars());
    assert!(!pool.flags(arr).contains(TypeFlags::IS_UNSIZED));
}

#[test]
fn substitute_bound_replaces_params() {
    let mut pool = Pool::new();
    let interner = StringInterner::new();
    let boxed = interner.intern("Box");

    let p0 = pool.bound_var(0);
    let p1 = pool.bound_var(1);
    let arr = pool.array(p0, 2);
    let generic = pool.applied(boxed, &[arr, p1]);

    let result = pool.substitute_bound(generic, &[Idx::I32, Idx::STR]);
    let i32_arr = pool.array(Idx::I32, 2);
    let expected = pool.applied(boxed, &[i32_arr, Idx::STR]);
    assert_eq!(result, expected);

    // Missing arguments leave the parameter in place.
    assert_eq!(pool.substitute_bound(p1, &[Idx::I32]), p1);
    // Types without parameters come back unchanged.
    assert_eq!(pool.substitute_bound(Idx::BOOL, &[Idx::I32]), Idx::BOOL);
}

#[test]
fn snapshot_rollback_restores_var_state() {
    let mut pool = Pool::new();
    let var = pool.fresh_var();
    let id = pool.data(var);

    let snapshot = pool.start_snapshot();
    pool.set_var_state(id, VarState::Link { target: Idx::I32 });
    assert_eq!(pool.resolved(var), Idx::I32);
    pool.rollback_to(snapshot);

    assert_eq!(pool.resolved(var), var);
}

#[test]
fn nested_commit_is_undone_by_outer_rollback() {
    let mut pool = Pool::new();
    let var = pool.fresh_var();
    let id = pool.data(var);

    let outer = pool.start_snapshot();
    let inner = pool.start_snapshot();
    pool.set_var_state(id, VarState::Link { target: Idx::BOOL });
    pool.commit(inner);
    assert_eq!(pool.resolved(var), Idx::BOOL);
    pool.rollback_to(outer);

    assert_eq!(pool.resolved(var), var);
}

#[test]
fn commit_keeps_writes() {
    let mut pool = Pool::new();
    let var = pool.fresh_var();
    let id = pool.data(var);

    let snapshot = pool.start_snapshot();
    pool.set_var_state(id, VarState::Link { target: Idx::CHAR });
    pool.commit(snapshot);

    assert_eq!(pool.resolved(var), Idx::CHAR);
}

#[test]
fn format_types() {
    let mut pool = Pool::new();
    let interner = StringInterner::new();
    let rc = interner.intern("Rc");
    let boxed = interner.intern("Box");
    let show = interner.intern("Show");
    let t = interner.intern("T");

    let arr = pool.array(Idx::I32, 3);
    let inner = pool.applied(boxed, &[arr]);
    let outer = pool.applied(rc, &[inner]);
    assert_eq!(pool.format_type(outer, &interner), "Rc<Box<[i32; 3]>>");

    let s = pool.slice(Idx::U8);
    let r = pool.mut_reference(s);
    assert_eq!(pool.format_type(r, &interner), "&mut [u8]");

    let d = pool.dyn_trait_object(show);
    let rd = pool.reference(d);
    assert_eq!(pool.format_type(rd, &interner), "&dyn Show");

    let rigid = pool.rigid_var(t);
    assert_eq!(pool.format_type(rigid, &interner), "T");

    let var = pool.fresh_var();
    let id = pool.data(var);
    assert_eq!(pool.format_type(var, &interner), format!("?{id}"));
    pool.set_var_state(id, VarState::Link { target: Idx::BOOL });
    assert_eq!(pool.format_type(var, &interner), "bool");

    let p = pool.bound_var(0);
    assert_eq!(pool.format_type(p, &interner), "_");
}

#[test]
fn rigid_vars_are_distinct() {
    let mut pool = Pool::new();
    let interner = StringInterner::new();
    let t = interner.intern("T");
    let a = pool.rigid_var(t);
    let b = pool.rigid_var(t);
    assert_ne!(a, b);
    assert_eq!(pool.rigid_name(a), Some(t));
    assert_eq!(pool.rigid_name(Idx::I32), None);
}

#[test]
fn import_from_a_clone() {
    let mut pool = Pool::new();
    let interner = StringInterner::new();
    let vec = interner.intern("Vec");
    let outer_var = pool.fresh_var();

    let mut clone = pool.clone();
    let linked = clone.fresh_var();
    clone.set_var_state(clone.data(linked), VarState::Link { target: Idx::I32 });
    let new_var = clone.fresh_var();
    let arr = clone.array(linked, 2);
    let ty = clone.applied(vec, &[arr, outer_var]);
    let r = clone.mut_reference(ty);

    let imported = pool.import(&clone, r);
    let expected = format!("&mut Vec<[i32; 2], ?{}>", pool.data(outer_var));
    assert_eq!(pool.format_type(imported, &interner), expected);

    // Variables created in the clone have no counterpart.
    let fresh = pool.import(&clone, new_var);
    assert_eq!(pool.tag(fresh), Tag::Var);
    assert_ne!(pool.data(fresh), clone.data(new_var));
}
