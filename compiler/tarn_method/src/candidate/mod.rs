//! Candidate assembly.
//!
//! For a method name and the autoderef steps of a receiver, collect every
//! definition that could be the callee:
//!
//! - inherent methods from inherent impls whose self type matches a step
//! - methods of `Tr` and its super-traits when a step is `dyn Tr`
//! - methods of a generic parameter's bounds when a step is that parameter
//! - extension methods from impls of traits in scope
//!
//! Associated functions (no `self`) are kept aside for diagnostics.
//! Assembly is pure: every applicability check runs inside a probe.

use std::collections::BTreeSet;

use rustc_hash::FxHashSet;
use smallvec::SmallVec;
use tarn_ir::Name;
use tarn_types::{Idx, ImplId, SelfShape, Tag, TraitId, TypeHead, UnifyEngine};

use crate::{ImplDatabase, ProbeContext, Step};

/// Where a candidate's definition lives.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum CandidateSource {
    /// A method in an inherent or trait impl.
    Impl(ImplId),
    /// A trait method called on `dyn Trait`.
    Object(TraitId),
    /// A trait method available through a bound on a generic parameter.
    ParamBound(TraitId),
}

/// Which precedence group a candidate belongs to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum CandidateKind {
    Inherent,
    /// Provided by an impl of a trait in scope.
    Extension(TraitId),
}

/// A method definition that might be the callee.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct Candidate {
    pub source: CandidateSource,
    pub kind: CandidateKind,
    pub method: Name,
    pub self_shape: SelfShape,
    /// Self type of the defining impl, written with its parameters.
    pub impl_self_ty: Idx,
    /// Number of impl parameters (`BoundVar`s) in the self types.
    pub param_count: usize,
    /// `self_shape` applied to `impl_self_ty`: the type the receiver must
    /// be adjusted to.
    pub xform_self_ty: Idx,
}

impl Candidate {
    pub fn new(
        engine: &mut UnifyEngine<'_>,
        source: CandidateSource,
        kind: CandidateKind,
        method: Name,
        self_shape: SelfShape,
        impl_self_ty: Idx,
        param_count: usize,
    ) -> Self {
        let xform_self_ty = self_shape.apply(engine.pool_mut(), impl_self_ty);
        Candidate {
            source,
            kind,
            method,
            self_shape,
            impl_self_ty,
            param_count,
            xform_self_ty,
        }
    }

    /// The trait this method belongs to, if any.
    pub fn trait_id(&self) -> Option<TraitId> {
        match (self.kind, self.source) {
            (CandidateKind::Extension(trait_id), _)
            | (_, CandidateSource::Object(trait_id) | CandidateSource::ParamBound(trait_id)) => {
                Some(trait_id)
            }
            (CandidateKind::Inherent, CandidateSource::Impl(_)) => None,
        }
    }

    /// Fresh arguments for the impl parameters and the transformed self type
    /// instantiated with them.
    pub fn instantiate(&self, engine: &mut UnifyEngine<'_>) -> (Idx, SmallVec<[Idx; 4]>) {
        let args = engine.fresh_args(self.param_count);
        let xform = engine.instantiate(self.xform_self_ty, &args);
        (xform, args)
    }

    /// Whether the transformed self type unifies with `step`, `&step` or
    /// `&mut step` for some step. Constraints are not checked.
    fn may_apply(&self, engine: &mut UnifyEngine<'_>, steps: &[Step]) -> bool {
        steps.iter().any(|step| {
            receiver_variants(engine, step.self_ty)
                .into_iter()
                .any(|variant| {
                    engine.probe(|e| {
                        let (xform, _) = self.instantiate(e);
                        e.unify(xform, variant).is_ok()
                    })
                })
        })
    }
}

/// Candidates partitioned by precedence group.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CandidateGroup {
    pub inherent: Vec<Candidate>,
    pub extension: Vec<Candidate>,
    /// Associated functions with the requested name, for diagnostics.
    pub static_candidates: Vec<CandidateSource>,
}

impl CandidateGroup {
    pub fn is_empty(&self) -> bool {
        self.inherent.is_empty() && self.extension.is_empty()
    }

    pub fn len(&self) -> usize {
        self.inherent.len() + self.extension.len()
    }

    fn push(&mut self, candidate: Candidate) {
        match candidate.kind {
            CandidateKind::Inherent => self.inherent.push(candidate),
            CandidateKind::Extension(_) => self.extension.push(candidate),
        }
    }
}

/// `ty`, `&ty` and `&mut ty`: the shapes a receiver is tried in.
pub(crate) fn receiver_variants(engine: &mut UnifyEngine<'_>, ty: Idx) -> [Idx; 3] {
    let pool = engine.pool_mut();
    [ty, pool.reference(ty), pool.mut_reference(ty)]
}

/// Collect the candidates for `method` on the given steps.
#[tracing::instrument(level = "debug", skip_all, fields(method = ?method, steps = steps.len()))]
pub fn assemble_candidates(
    engine: &mut UnifyEngine<'_>,
    cx: &ProbeContext<'_>,
    method: Name,
    steps: &[Step],
    visible_traits: &BTreeSet<TraitId>,
) -> CandidateGroup {
    let mut group = CandidateGroup::default();

    assemble_bound_candidates(engine, cx, method, steps, &mut group);

    for impl_id in reachable_impls(engine, cx.db, steps) {
        let Some(entry) = cx.db.impl_entry(impl_id) else {
            continue;
        };
        let Some(sig) = cx.db.impl_method(impl_id, method) else {
            continue;
        };
        let kind = match entry.trait_id {
            None => CandidateKind::Inherent,
            Some(trait_id) if visible_traits.contains(&trait_id) => {
                CandidateKind::Extension(trait_id)
            }
            Some(_) => continue,
        };
        let source = CandidateSource::Impl(impl_id);
        let shape = sig.receiver;
        let (self_type, param_count) = (entry.self_type, entry.type_params.len());

        match shape {
            Some(shape) => {
                let candidate = Candidate::new(
                    engine,
                    source,
                    kind,
                    method,
                    shape,
                    self_type,
                    param_count,
                );
                if candidate.may_apply(engine, steps) {
                    group.push(candidate);
                }
            }
            None => {
                if self_type_matches_step(engine, self_type, param_count, steps) {
                    group.static_candidates.push(source);
                }
            }
        }
    }

    tracing::debug!(
        inherent = group.inherent.len(),
        extension = group.extension.len(),
        statics = group.static_candidates.len(),
        "assembled candidates"
    );
    group
}

/// Traits outside `visible_traits` that would have supplied an applicable
/// `method`, in id order.
pub fn unimported_traits(
    engine: &mut UnifyEngine<'_>,
    cx: &ProbeContext<'_>,
    method: Name,
    steps: &[Step],
    visible_traits: &BTreeSet<TraitId>,
) -> Vec<TraitId> {
    let mut found = BTreeSet::new();

    for impl_id in reachable_impls(engine, cx.db, steps) {
        let Some(entry) = cx.db.impl_entry(impl_id) else {
            continue;
        };
        let Some(trait_id) = entry.trait_id else {
            continue;
        };
        if visible_traits.contains(&trait_id) || found.contains(&trait_id) {
            continue;
        }
        let Some(shape) = cx.db.trait_method(trait_id, method).and_then(|sig| sig.receiver)
        else {
            continue;
        };
        let candidate = Candidate::new(
            engine,
            CandidateSource::Impl(impl_id),
            CandidateKind::Extension(trait_id),
            method,
            shape,
            entry.self_type,
            entry.type_params.len(),
        );
        if candidate.may_apply(engine, steps) {
            found.insert(trait_id);
        }
    }

    found.into_iter().collect()
}

/// Trait methods on `dyn Tr` steps and on bounded generic parameters.
fn assemble_bound_candidates(
    engine: &mut UnifyEngine<'_>,
    cx: &ProbeContext<'_>,
    method: Name,
    steps: &[Step],
    group: &mut CandidateGroup,
) {
    let mut seen: FxHashSet<(CandidateSource, Idx)> = FxHashSet::default();

    for step in steps {
        let self_ty = engine.resolve(step.self_ty);
        let (bounds, is_object) = match engine.pool().tag(self_ty) {
            Tag::Dyn if cx.config.object_candidates => {
                let object_trait = cx.db.trait_by_name(engine.pool().dyn_trait(self_ty));
                (object_trait.into_iter().collect::<Vec<_>>(), true)
            }
            Tag::RigidVar if cx.config.param_bound_candidates => {
                (cx.env.bounds_of(self_ty).to_vec(), false)
            }
            _ => continue,
        };

        for bound in bounds {
            for trait_id in cx.db.trait_and_supers(bound) {
                let Some(sig) = cx.db.trait_method(trait_id, method) else {
                    continue;
                };
                let source = if is_object {
                    CandidateSource::Object(trait_id)
                } else {
                    CandidateSource::ParamBound(trait_id)
                };
                if !seen.insert((source, self_ty)) {
                    continue;
                }
                match sig.receiver {
                    Some(shape) => group.push(Candidate::new(
                        engine,
                        source,
                        CandidateKind::Inherent,
                        method,
                        shape,
                        self_ty,
                        0,
                    )),
                    None => group.static_candidates.push(source),
                }
            }
        }
    }
}

/// Impls whose self type could match a step or an autoref of one, in id
/// order.
fn reachable_impls(
    engine: &mut UnifyEngine<'_>,
    db: &dyn ImplDatabase,
    steps: &[Step],
) -> BTreeSet<ImplId> {
    let mut heads: BTreeSet<Option<TypeHead>> = BTreeSet::new();
    heads.insert(Some(TypeHead::Ref));
    heads.insert(Some(TypeHead::MutRef));
    for step in steps {
        heads.insert(engine.pool().type_head(step.self_ty));
    }

    heads
        .into_iter()
        .flat_map(|head| db.impls_for_head(head))
        .collect()
}

/// Whether an impl self type unifies with some step, by value.
fn self_type_matches_step(
    engine: &mut UnifyEngine<'_>,
    self_type: Idx,
    param_count: usize,
    steps: &[Step],
) -> bool {
    steps.iter().any(|step| {
        engine.probe(|e| {
            let args = e.fresh_args(param_count);
            let self_ty = e.instantiate(self_type, &args);
            e.unify(self_ty, step.self_ty).is_ok()
        })
    })
}
