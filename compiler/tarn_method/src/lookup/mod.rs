//! Method lookup entry point: steps, candidates, probe.

use std::collections::BTreeSet;

use tarn_ir::Name;
use tarn_types::{Idx, TraitId, UnifyEngine};

use crate::candidate::unimported_traits;
use crate::{assemble_candidates, build_steps, probe, MethodError, Pick, ProbeContext};

/// Resolve `receiver.method(..)`.
///
/// `visible_traits` are the traits in scope at the call site; extension
/// methods of other traits are never picked. Nothing is bound in `engine`:
/// pass the result to [`confirm`](crate::confirm()) to commit it.
#[tracing::instrument(
    level = "debug",
    skip_all,
    fields(method = ?method, receiver = ?receiver, traits = visible_traits.len())
)]
pub fn lookup_method(
    engine: &mut UnifyEngine<'_>,
    cx: &ProbeContext<'_>,
    receiver: Idx,
    method: Name,
    visible_traits: &BTreeSet<TraitId>,
) -> Result<Pick, MethodError> {
    let receiver = engine.resolve(receiver);

    // An `<error>` receiver already produced a diagnostic; fail quietly.
    if receiver.is_error() {
        return Err(MethodError::NoMethodFound {
            method,
            receiver,
            steps_tried: Vec::new(),
            static_candidates: Vec::new(),
            unimported_traits: Vec::new(),
        });
    }

    let steps = build_steps(engine, cx, receiver)?;
    let group = assemble_candidates(engine, cx, method, &steps, visible_traits);
    let mut result = probe(engine, cx, method, receiver, &steps, &group);

    if let Err(MethodError::NoMethodFound {
        unimported_traits: hints,
        ..
    }) = &mut result
    {
        if cx.config.suggest_unimported_traits {
            *hints = unimported_traits(engine, cx, method, &steps, visible_traits);
        }
    }

    result
}
