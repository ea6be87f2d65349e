use super::*;
use crate::fixture::Fixture;
use crate::RegistryOracle;
use pretty_assertions::assert_eq;

fn steps_of(f: &mut Fixture, receiver: Idx) -> Result<Vec<String>, MethodError> {
    let oracle = RegistryOracle::new(&f.registry);
    let cx = ProbeContext::new(&f.registry, &oracle, &f.config, &f.env);
    let mut engine = UnifyEngine::new(&mut f.pool);
    let steps = build_steps(&mut engine, &cx, receiver)?;
    Ok(steps
        .iter()
        .map(|s| {
            let ty = f.render(s.self_ty);
            if s.from_unsize {
                format!("{ty} (unsize)")
            } else {
                ty
            }
        })
        .collect())
}

#[test]
fn smart_pointers_then_unsize() {
    let mut f = Fixture::with_smart_pointers();
    let t = f.rigid("T");
    let arr = f.pool.array(t, 3);
    let boxed = f.adt("Box", &[arr]);
    let rc = f.adt("Rc", &[boxed]);

    assert_eq!(
        steps_of(&mut f, rc),
        Ok(vec![
            "Rc<Box<[T; 3]>>".to_string(),
            "Box<[T; 3]>".to_string(),
            "[T; 3]".to_string(),
            "[T] (unsize)".to_string(),
        ])
    );
}

#[test]
fn plain_type_is_its_only_step() {
    let mut f = Fixture::with_smart_pointers();
    assert_eq!(steps_of(&mut f, Idx::I32), Ok(vec!["i32".to_string()]));
}

#[test]
fn references_are_stripped_one_at_a_time() {
    let mut f = Fixture::new();
    let inner = f.pool.reference(Idx::STR);
    let outer = f.pool.mut_reference(inner);
    assert_eq!(
        steps_of(&mut f, outer),
        Ok(vec![
            "&mut &str".to_string(),
            "&str".to_string(),
            "str".to_string(),
        ])
    );
}

#[test]
fn resolved_variables_are_followed() {
    let mut f = Fixture::with_smart_pointers();
    let var = f.pool.fresh_var();
    let boxed = f.adt("Box", &[var]);
    let arr = f.pool.array(Idx::U8, 2);
    {
        let mut engine = UnifyEngine::new(&mut f.pool);
        assert!(engine.unify(var, arr).is_ok());
    }
    assert_eq!(
        steps_of(&mut f, boxed),
        Ok(vec![
            "Box<[u8; 2]>".to_string(),
            "[u8; 2]".to_string(),
            "[u8] (unsize)".to_string(),
        ])
    );
}

#[test]
fn deref_cycle_is_reported() {
    let mut f = Fixture::new();
    let a = f.adt("A", &[]);
    let b = f.adt("B", &[]);
    f.registry.register_deref_rule(0, a, b);
    f.registry.register_deref_rule(0, b, a);

    assert_eq!(
        steps_of(&mut f, a),
        Err(MethodError::InfiniteDeref {
            receiver: a,
            ty: a,
            cycle: true
        })
    );
}

#[test]
fn deref_limit_is_enforced() {
    let mut f = Fixture::with_smart_pointers();
    f.config = f.config.clone().with_deref_limit(1);
    let inner = f.adt("Box", &[Idx::I32]);
    let outer = f.adt("Box", &[inner]);

    assert!(steps_of(&mut f, inner).is_ok());
    assert_eq!(
        steps_of(&mut f, outer),
        Err(MethodError::InfiniteDeref {
            receiver: outer,
            ty: Idx::I32,
            cycle: false
        })
    );
}

#[test]
fn unsized_step_shares_its_source_deref_count() {
    let plain = Step {
        self_ty: Idx::I32,
        from_unsize: false,
    };
    let unsized_step = Step {
        self_ty: Idx::I32,
        from_unsize: true,
    };
    assert_eq!(plain.autoderefs(2), 2);
    assert_eq!(unsized_step.autoderefs(2), 1);
}
