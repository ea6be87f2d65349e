//! Autoderef step construction.
//!
//! `Rc<Box<[T; 3]>>` produces
//!
//! ```text
//! 0: Rc<Box<[T; 3]>>
//! 1: Box<[T; 3]>
//! 2: [T; 3]
//! 3: [T]            (from_unsize)
//! ```
//!
//! Each step is the dereference of the previous one; when dereferencing
//! stops, a single unsized step may follow.

use rustc_hash::FxHashSet;
use smallvec::SmallVec;
use tarn_types::{Idx, UnifyEngine};

use crate::{MethodError, ProbeContext};

/// One type the receiver can be adjusted to by dereferencing.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Step {
    pub self_ty: Idx,
    /// Reached by unsizing the last dereferenced type.
    pub from_unsize: bool,
}

impl Step {
    /// Dereferences needed to reach this step from the receiver.
    ///
    /// The unsized step shares the count of the step it was unsized from.
    pub fn autoderefs(self, index: usize) -> usize {
        if self.from_unsize {
            index.saturating_sub(1)
        } else {
            index
        }
    }
}

pub type Steps = SmallVec<[Step; 8]>;

/// Build the autoderef steps for `receiver`.
///
/// Fails with [`MethodError::InfiniteDeref`] when a type repeats or the
/// chain exceeds `ProbeConfig::deref_limit`.
#[tracing::instrument(level = "debug", skip_all, fields(receiver = ?receiver))]
pub fn build_steps(
    engine: &mut UnifyEngine<'_>,
    cx: &ProbeContext<'_>,
    receiver: Idx,
) -> Result<Steps, MethodError> {
    let mut steps = Steps::new();
    let mut seen = FxHashSet::default();
    let mut current = engine.resolve_deep(receiver);

    loop {
        let cycle = !seen.insert(current);
        if cycle || steps.len() > cx.config.deref_limit {
            tracing::error!(?receiver, ty = ?current, cycle, "autoderef does not terminate");
            return Err(MethodError::InfiniteDeref {
                receiver,
                ty: current,
                cycle,
            });
        }
        steps.push(Step {
            self_ty: current,
            from_unsize: false,
        });

        match cx.deref.deref_target(engine, current) {
            Some(next) => current = engine.resolve_deep(next),
            None => break,
        }
    }

    if let Some(unsized_ty) = cx.unsize.unsize_target(engine, current) {
        steps.push(Step {
            self_ty: engine.resolve_deep(unsized_ty),
            from_unsize: true,
        });
    }

    tracing::debug!(count = steps.len(), "built autoderef steps");
    Ok(steps)
}

#[cfg(test)]
mod tests;
