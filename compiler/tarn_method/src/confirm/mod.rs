//! Confirmation: turn a [`Pick`] into a resolved call.
//!
//! The pick fixes the receiver adjustments
//!
//! ```text
//! ADJ(recv) = borrow?(unsize?(deref^autoderefs(recv)))
//! ```
//!
//! and the callee (`Type::method` or `Trait::method`). Confirmation replays
//! the adjustments with the same oracles and unifies the adjusted receiver
//! with the candidate's self type for real, keeping the bindings probing
//! only tried tentatively. Picks that dispatch through a trait over several
//! impls leave the receiver's variables unbound.

use smallvec::{smallvec, SmallVec};
use tarn_ir::StringInterner;
use tarn_types::{Idx, ImplId, Pool, SelfShape, Tag, TraitId, UnifyEngine, UnifyError};
use thiserror::Error;

use crate::{AutoRef, Candidate, CandidateKind, CandidateSource, ImplDatabase, Pick, ProbeContext};

/// One implicit conversion of the receiver, applied in order.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum Adjustment {
    Deref,
    Unsize,
    Borrow(AutoRef),
}

/// The function a method call resolves to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum Callee {
    /// `Type::method` from an inherent impl.
    Inherent { impl_id: ImplId },
    /// `Trait::method`. The impl is unknown for trait objects, generic
    /// bounds and merged impls of one trait.
    Trait {
        trait_id: TraitId,
        impl_id: Option<ImplId>,
    },
}

impl Pick {
    /// The receiver adjustments: derefs, then unsize, then borrow.
    pub fn adjustments(&self) -> SmallVec<[Adjustment; 4]> {
        let mut adjustments: SmallVec<[Adjustment; 4]> =
            smallvec![Adjustment::Deref; self.autoderefs];
        if self.unsize {
            adjustments.push(Adjustment::Unsize);
        }
        if let Some(autoref) = self.autoref {
            adjustments.push(Adjustment::Borrow(autoref));
        }
        adjustments
    }

    pub fn callee(&self) -> Callee {
        let candidate = &self.candidate;
        match (candidate.kind, candidate.source) {
            (CandidateKind::Inherent, CandidateSource::Impl(impl_id)) => {
                Callee::Inherent { impl_id }
            }
            (CandidateKind::Extension(trait_id), CandidateSource::Impl(impl_id)) => {
                Callee::Trait {
                    trait_id,
                    impl_id: (!self.trait_dispatch).then_some(impl_id),
                }
            }
            (_, CandidateSource::Object(trait_id) | CandidateSource::ParamBound(trait_id)) => {
                Callee::Trait {
                    trait_id,
                    impl_id: None,
                }
            }
        }
    }
}

/// A method call after confirmation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConfirmedCall {
    pub adjustments: SmallVec<[Adjustment; 4]>,
    pub callee: Callee,
    /// The adjusted receiver type, as passed to the callee.
    pub self_ty: Idx,
    /// The impl parameters, as inferred from the receiver.
    pub impl_args: SmallVec<[Idx; 4]>,
}

/// Why a pick could not be confirmed.
///
/// Any of these means probing and confirmation disagree, which is a
/// compiler bug rather than a user error.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ConfirmError {
    #[error("could not replay dereference of {ty:?}")]
    Deref { ty: Idx },
    #[error("could not replay unsizing of {ty:?}")]
    Unsize { ty: Idx },
    #[error("adjusted receiver does not match the method: {0}")]
    Unify(#[from] UnifyError),
}

/// Apply `pick` to `receiver`, committing the receiver bindings.
#[tracing::instrument(level = "debug", skip_all, fields(receiver = ?receiver))]
pub fn confirm(
    engine: &mut UnifyEngine<'_>,
    cx: &ProbeContext<'_>,
    receiver: Idx,
    pick: &Pick,
) -> Result<ConfirmedCall, ConfirmError> {
    let mut ty = engine.resolve(receiver);
    for _ in 0..pick.autoderefs {
        ty = cx
            .deref
            .deref_target(engine, ty)
            .ok_or(ConfirmError::Deref { ty })?;
    }
    if pick.unsize {
        ty = cx
            .unsize
            .unsize_target(engine, ty)
            .ok_or(ConfirmError::Unsize { ty })?;
    }
    if let Some(autoref) = pick.autoref {
        ty = autoref.apply(engine.pool_mut(), ty);
    }

    // Merged impls of one trait: the impl is chosen once inference settles,
    // so the receiver is only checked against the candidate, never bound.
    let impl_args = if pick.trait_dispatch {
        engine.probe(|e| {
            let (expected, _) = pick.candidate.instantiate(e);
            e.unify(expected, ty)
        })?;
        SmallVec::new()
    } else {
        let (expected, args) = pick.candidate.instantiate(engine);
        engine.commit_if_ok(|e| e.unify(expected, ty))?;
        args.into_iter().map(|arg| engine.resolve_deep(arg)).collect()
    };

    let self_ty = engine.resolve_deep(ty);
    tracing::debug!(?self_ty, "confirmed method call");

    Ok(ConfirmedCall {
        adjustments: pick.adjustments(),
        callee: pick.callee(),
        self_ty,
        impl_args,
    })
}

/// Path prefix naming `self_ty` in a qualified call: `Point`, `<[_]>`.
pub fn type_path(pool: &Pool, interner: &StringInterner, self_ty: Idx) -> String {
    let self_ty = pool.resolved(self_ty);
    match pool.tag(self_ty) {
        Tag::Applied => interner.lookup(pool.applied_name(self_ty)).to_string(),
        _ => format!("<{}>", pool.format_type(self_ty, interner)),
    }
}

/// Fully-qualified call text for a candidate: `Show::show(&receiver)`.
pub fn render_qualified_call(
    pool: &Pool,
    interner: &StringInterner,
    db: &dyn ImplDatabase,
    candidate: &Candidate,
    receiver: &str,
) -> String {
    let path = match candidate.trait_id() {
        Some(trait_id) => interner.lookup(db.trait_name(trait_id)).to_string(),
        None => type_path(pool, interner, candidate.impl_self_ty),
    };
    let borrow = match candidate.self_shape {
        SelfShape::ByValue => "",
        SelfShape::ByRef => AutoRef::Ref.prefix(),
        SelfShape::ByMutRef => AutoRef::MutRef.prefix(),
    };
    format!(
        "{path}::{}({borrow}{receiver})",
        interner.lookup(candidate.method)
    )
}

#[cfg(test)]
mod tests;
