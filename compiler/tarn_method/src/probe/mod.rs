//! Probe search: pick the callee from the assembled candidates.
//!
//! Steps are walked in order. At each step the receiver is tried by value,
//! then as `&T`, then as `&mut T`; for each of those the inherent group is
//! tested before the extension group. The first (step, autoref, group) with
//! any match decides the outcome:
//!
//! - one match: that candidate is picked
//! - several impls of one trait: picked, dispatched through the trait
//! - distinct inherent candidates or distinct traits: ambiguous, no
//!   fall-through to later groups or steps
//!
//! Every applicability test runs inside a probe, so nothing is bound until
//! the pick is confirmed.

use tarn_ir::Name;
use tarn_types::{Idx, Pool, UnifyEngine};

use crate::candidate::receiver_variants;
use crate::obligation::evaluate_impl_where_clause;
use crate::{Candidate, CandidateGroup, CandidateSource, MethodError, ProbeContext, Step};

/// Implicit borrow applied to the adjusted receiver.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum AutoRef {
    Ref,
    MutRef,
}

impl AutoRef {
    /// `&ty` or `&mut ty`.
    pub fn apply(self, pool: &mut Pool, ty: Idx) -> Idx {
        match self {
            AutoRef::Ref => pool.reference(ty),
            AutoRef::MutRef => pool.mut_reference(ty),
        }
    }

    /// Source prefix of the borrow.
    pub fn prefix(self) -> &'static str {
        match self {
            AutoRef::Ref => "&",
            AutoRef::MutRef => "&mut ",
        }
    }
}

/// The chosen method and how to adjust the receiver for it.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct Pick {
    pub candidate: Candidate,
    /// Dereferences applied to the receiver.
    pub autoderefs: usize,
    pub autoref: Option<AutoRef>,
    /// The dereferenced receiver is unsized before borrowing.
    pub unsize: bool,
    /// Several impls of the candidate's trait matched; the callee is the
    /// trait method and the impl is chosen once inference settles.
    pub trait_dispatch: bool,
}

/// Receiver shapes in preference order.
const AUTOREFS: [Option<AutoRef>; 3] = [None, Some(AutoRef::Ref), Some(AutoRef::MutRef)];

/// Search `steps` for the best candidate in `group`.
///
/// `receiver` and `method` are only used to describe a failure.
#[tracing::instrument(level = "debug", skip_all, fields(method = ?method, candidates = group.len()))]
pub fn probe(
    engine: &mut UnifyEngine<'_>,
    cx: &ProbeContext<'_>,
    method: Name,
    receiver: Idx,
    steps: &[Step],
    group: &CandidateGroup,
) -> Result<Pick, MethodError> {
    for (index, step) in steps.iter().enumerate() {
        let variants = receiver_variants(engine, step.self_ty);

        for (autoref, variant) in AUTOREFS.into_iter().zip(variants) {
            for (candidates, is_extension) in [(&group.inherent, false), (&group.extension, true)] {
                let matches: Vec<&Candidate> = candidates
                    .iter()
                    .filter(|candidate| candidate_applies(engine, cx, candidate, variant))
                    .collect();

                tracing::trace!(
                    step = index,
                    ?autoref,
                    is_extension,
                    matches = matches.len(),
                    "tested receiver variant"
                );
                if matches.is_empty() {
                    continue;
                }

                return pick_from_matches(&matches, is_extension, method, receiver).map(
                    |(candidate, trait_dispatch)| {
                        let pick = Pick {
                            candidate,
                            autoderefs: step.autoderefs(index),
                            autoref,
                            unsize: step.from_unsize,
                            trait_dispatch,
                        };
                        tracing::debug!(?pick, "picked method");
                        pick
                    },
                );
            }
        }
    }

    Err(MethodError::NoMethodFound {
        method,
        receiver,
        steps_tried: steps.iter().map(|s| s.self_ty).collect(),
        static_candidates: group.static_candidates.clone(),
        unimported_traits: Vec::new(),
    })
}

/// Whether `candidate` accepts `variant` as its receiver.
///
/// The transformed self type must unify with the variant and the impl's
/// where-clauses must not be refuted under the resulting bindings.
fn candidate_applies(
    engine: &mut UnifyEngine<'_>,
    cx: &ProbeContext<'_>,
    candidate: &Candidate,
    variant: Idx,
) -> bool {
    engine.probe(|e| {
        let (xform, args) = candidate.instantiate(e);
        if e.unify(xform, variant).is_err() {
            return false;
        }
        match candidate.source {
            CandidateSource::Impl(impl_id) => {
                evaluate_impl_where_clause(e, cx, impl_id, &args).may_hold()
            }
            CandidateSource::Object(_) | CandidateSource::ParamBound(_) => true,
        }
    })
}

/// Resolve the matches of one group at one (step, autoref) into a single
/// candidate, or report the ambiguity.
///
/// Returns the candidate and whether it stands for several impls of its
/// trait.
fn pick_from_matches(
    matches: &[&Candidate],
    is_extension: bool,
    method: Name,
    receiver: Idx,
) -> Result<(Candidate, bool), MethodError> {
    let mut distinct: Vec<&Candidate> = Vec::with_capacity(matches.len());
    for &candidate in matches {
        let duplicate = distinct.iter().any(|seen| {
            if is_extension {
                seen.trait_id() == candidate.trait_id()
            } else {
                seen.source == candidate.source
            }
        });
        if !duplicate {
            distinct.push(candidate);
        }
    }

    match distinct.as_slice() {
        [only] => Ok(((*only).clone(), is_extension && matches.len() > 1)),
        _ => {
            tracing::debug!(count = distinct.len(), "ambiguous method");
            Err(MethodError::Ambiguous {
                method,
                receiver,
                candidates: distinct.into_iter().cloned().collect(),
            })
        }
    }
}

#[cfg(test)]
mod tests;
