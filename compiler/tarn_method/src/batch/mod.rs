//! Parallel probing of independent call sites.
//!
//! Each request gets its own clone of the pool, so probes never observe
//! each other's variables. Types a probe interns live in its clone until
//! the result is imported back into the caller's pool, in request order.

use std::collections::BTreeSet;

use rayon::prelude::*;
use tarn_ir::Name;
use tarn_types::{Idx, Pool, TraitId, UnifyEngine};

use crate::{lookup_method, Candidate, MethodError, Pick, ProbeContext};

/// One `receiver.method(..)` call site.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProbeRequest {
    pub receiver: Idx,
    pub method: Name,
    pub visible_traits: BTreeSet<TraitId>,
}

impl ProbeRequest {
    pub fn new(receiver: Idx, method: Name, visible_traits: BTreeSet<TraitId>) -> Self {
        ProbeRequest {
            receiver,
            method,
            visible_traits,
        }
    }
}

/// Look up every request in parallel against a snapshot of `pool`.
///
/// Results come back in request order with their types interned in `pool`,
/// ready for [`confirm`](crate::confirm()).
#[tracing::instrument(level = "debug", skip_all, fields(requests = requests.len()))]
pub fn probe_batch(
    pool: &mut Pool,
    cx: &ProbeContext<'_>,
    requests: &[ProbeRequest],
) -> Vec<Result<Pick, MethodError>> {
    let frozen: &Pool = pool;
    let probed: Vec<(Result<Pick, MethodError>, Pool)> = requests
        .par_iter()
        .map(|request| {
            let mut local = frozen.clone();
            let mut engine = UnifyEngine::new(&mut local);
            let result = lookup_method(
                &mut engine,
                cx,
                request.receiver,
                request.method,
                &request.visible_traits,
            );
            (result, local)
        })
        .collect();

    probed
        .into_iter()
        .map(|(result, local)| {
            let mut import = |ty: Idx| pool.import(&local, ty);
            match result {
                Ok(pick) => Ok(import_pick(pick, &mut import)),
                Err(err) => Err(import_error(err, &mut import)),
            }
        })
        .collect()
}

fn import_candidate(candidate: Candidate, import: &mut impl FnMut(Idx) -> Idx) -> Candidate {
    Candidate {
        impl_self_ty: import(candidate.impl_self_ty),
        xform_self_ty: import(candidate.xform_self_ty),
        ..candidate
    }
}

fn import_pick(pick: Pick, import: &mut impl FnMut(Idx) -> Idx) -> Pick {
    Pick {
        candidate: import_candidate(pick.candidate, import),
        ..pick
    }
}

fn import_error(err: MethodError, import: &mut impl FnMut(Idx) -> Idx) -> MethodError {
    match err {
        MethodError::NoMethodFound {
            method,
            receiver,
            steps_tried,
            static_candidates,
            unimported_traits,
        } => MethodError::NoMethodFound {
            method,
            receiver: import(receiver),
            steps_tried: steps_tried.into_iter().map(&mut *import).collect(),
            static_candidates,
            unimported_traits,
        },
        MethodError::Ambiguous {
            method,
            receiver,
            candidates,
        } => MethodError::Ambiguous {
            method,
            receiver: import(receiver),
            candidates: candidates
                .into_iter()
                .map(|candidate| import_candidate(candidate, import))
                .collect(),
        },
        MethodError::InfiniteDeref {
            receiver,
            ty,
            cycle,
        } => MethodError::InfiniteDeref {
            receiver: import(receiver),
            ty: import(ty),
            cycle,
        },
    }
}
