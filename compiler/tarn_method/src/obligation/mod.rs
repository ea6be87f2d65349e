//! Where-clause evaluation for candidate filtering.
//!
//! Probing only needs to know whether an impl's constraints are definitively
//! refuted. Anything that might still hold once inference finishes counts as
//! a match:
//!
//! | Self type            | `ty: Trait` evaluates to                                  |
//! |----------------------|-----------------------------------------------------------|
//! | `<error>`            | holds                                                     |
//! | inference variable   | ambiguous                                                 |
//! | rigid parameter `T`  | holds if a bound of `T` implies `Trait`, else impl search |
//! | `dyn Tr`             | holds if `Tr` implies `Trait`, else impl search           |
//! | anything else        | holds iff some impl unifies and its clauses hold          |
//!
//! Nested clauses are evaluated up to `ProbeConfig::obligation_depth`;
//! beyond that they are ambiguous.

use rustc_hash::FxHashMap;
use tarn_types::{Idx, ImplId, Tag, TraitId, UnifyEngine, WhereConstraint};

use crate::ProbeContext;

/// Bounds on the caller's generic parameters (`fn f<T: Show>(..)`).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ParamEnv {
    bounds: FxHashMap<Idx, Vec<TraitId>>,
}

impl ParamEnv {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare `param: bound`. `param` is a rigid variable.
    pub fn add_bound(&mut self, param: Idx, bound: TraitId) {
        let bounds = self.bounds.entry(param).or_default();
        if !bounds.contains(&bound) {
            bounds.push(bound);
        }
    }

    #[must_use]
    pub fn with_bound(mut self, param: Idx, bound: TraitId) -> Self {
        self.add_bound(param, bound);
        self
    }

    /// Declared bounds of `param`, in declaration order.
    pub fn bounds_of(&self, param: Idx) -> &[TraitId] {
        self.bounds.get(&param).map_or(&[], Vec::as_slice)
    }

    pub fn is_empty(&self) -> bool {
        self.bounds.is_empty()
    }
}

/// Outcome of evaluating an obligation.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Evaluation {
    Holds,
    /// Might hold once more is known about the types involved.
    Ambiguous,
    Refuted,
}

impl Evaluation {
    /// Whether a candidate with this obligation is still a match.
    #[inline]
    pub fn may_hold(self) -> bool {
        self != Evaluation::Refuted
    }

    /// Both obligations must hold.
    #[must_use]
    fn and(self, other: Evaluation) -> Evaluation {
        match (self, other) {
            (Evaluation::Refuted, _) | (_, Evaluation::Refuted) => Evaluation::Refuted,
            (Evaluation::Holds, Evaluation::Holds) => Evaluation::Holds,
            _ => Evaluation::Ambiguous,
        }
    }

    /// Either obligation suffices.
    #[must_use]
    fn or(self, other: Evaluation) -> Evaluation {
        match (self, other) {
            (Evaluation::Holds, _) | (_, Evaluation::Holds) => Evaluation::Holds,
            (Evaluation::Refuted, Evaluation::Refuted) => Evaluation::Refuted,
            _ => Evaluation::Ambiguous,
        }
    }
}

/// Evaluate `ty: trait_id`. Leaves no bindings behind.
pub fn evaluate_obligation(
    engine: &mut UnifyEngine<'_>,
    cx: &ProbeContext<'_>,
    ty: Idx,
    trait_id: TraitId,
) -> Evaluation {
    evaluate(engine, cx, ty, trait_id, cx.config.obligation_depth)
}

/// Evaluate the where-clauses of `impl_id` with its parameters set to `args`.
///
/// Called inside the probe that unified the impl's self type, so the
/// clauses see those bindings.
pub fn evaluate_impl_where_clause(
    engine: &mut UnifyEngine<'_>,
    cx: &ProbeContext<'_>,
    impl_id: ImplId,
    args: &[Idx],
) -> Evaluation {
    let Some(entry) = cx.db.impl_entry(impl_id) else {
        return Evaluation::Refuted;
    };
    evaluate_clauses(
        engine,
        cx,
        &entry.where_clause,
        args,
        cx.config.obligation_depth,
    )
}

fn evaluate_clauses(
    engine: &mut UnifyEngine<'_>,
    cx: &ProbeContext<'_>,
    clauses: &[WhereConstraint],
    args: &[Idx],
    depth: u32,
) -> Evaluation {
    let mut result = Evaluation::Holds;
    for clause in clauses {
        let ty = engine.instantiate(clause.ty, args);
        for &bound in &clause.bounds {
            result = result.and(evaluate(engine, cx, ty, bound, depth));
            if result == Evaluation::Refuted {
                return result;
            }
        }
    }
    result
}

fn evaluate(
    engine: &mut UnifyEngine<'_>,
    cx: &ProbeContext<'_>,
    ty: Idx,
    trait_id: TraitId,
    depth: u32,
) -> Evaluation {
    let ty = engine.resolve(ty);
    let pool = engine.pool();

    if pool.flags(ty).has_errors() {
        return Evaluation::Holds;
    }

    match pool.tag(ty) {
        Tag::Var => return Evaluation::Ambiguous,
        Tag::RigidVar => {
            let implied = cx
                .env
                .bounds_of(ty)
                .iter()
                .any(|&bound| cx.db.implies(bound, trait_id));
            if implied {
                return Evaluation::Holds;
            }
        }
        Tag::Dyn => {
            let object_trait = cx.db.trait_by_name(pool.dyn_trait(ty));
            if object_trait.is_some_and(|obj| cx.db.implies(obj, trait_id)) {
                return Evaluation::Holds;
            }
        }
        _ => {}
    }

    if depth == 0 {
        return Evaluation::Ambiguous;
    }

    let mut result = Evaluation::Refuted;
    for &impl_id in cx.db.impls_of_trait(trait_id) {
        let outcome = engine.probe(|e| impl_satisfies(e, cx, impl_id, ty, depth - 1));
        result = result.or(outcome);
        if result == Evaluation::Holds {
            break;
        }
    }
    tracing::trace!(?ty, ?trait_id, ?result, "evaluated obligation");
    result
}

fn impl_satisfies(
    engine: &mut UnifyEngine<'_>,
    cx: &ProbeContext<'_>,
    impl_id: ImplId,
    ty: Idx,
    depth: u32,
) -> Evaluation {
    let Some(entry) = cx.db.impl_entry(impl_id) else {
        return Evaluation::Refuted;
    };
    let args = engine.fresh_args(entry.type_params.len());
    let self_ty = engine.instantiate(entry.self_type, &args);
    if engine.unify(self_ty, ty).is_err() {
        return Evaluation::Refuted;
    }
    evaluate_clauses(engine, cx, &entry.where_clause, &args, depth)
}
