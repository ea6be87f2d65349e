//! Method lookup failures and their diagnostics.
//!
//! Errors carry ids only; [`MethodError::to_diagnostic`] renders them with
//! the pool and interner. Every failure is terminal for the call expression
//! alone: [`report_method_error`] queues the diagnostic and hands back an
//! [`ErrorGuaranteed`] so checking continues with sibling expressions.

use tarn_diagnostic::{Diagnostic, DiagnosticQueue, ErrorCode, ErrorGuaranteed, Suggestion};
use tarn_ir::{Name, Span, StringInterner};
use tarn_types::{Idx, Pool, TraitId};
use thiserror::Error;

use crate::confirm::{render_qualified_call, type_path};
use crate::{Candidate, CandidateSource, ImplDatabase};

/// Why a method call could not be resolved.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum MethodError {
    #[error("no method named {method:?} found for type {receiver:?}")]
    NoMethodFound {
        method: Name,
        receiver: Idx,
        /// Every step type that was tried, in order.
        steps_tried: Vec<Idx>,
        /// Associated functions with the requested name.
        static_candidates: Vec<CandidateSource>,
        /// Traits that would supply the method if imported.
        unimported_traits: Vec<TraitId>,
    },

    #[error("multiple applicable items named {method:?} for type {receiver:?}")]
    Ambiguous {
        method: Name,
        receiver: Idx,
        /// One candidate per conflicting impl or trait.
        candidates: Vec<Candidate>,
    },

    /// Compiler invariant violation: the deref chain repeats (`cycle`) or
    /// is too long.
    #[error("dereferencing {receiver:?} does not terminate (at {ty:?})")]
    InfiniteDeref { receiver: Idx, ty: Idx, cycle: bool },
}

impl MethodError {
    /// The receiver type of the failed call.
    pub fn receiver(&self) -> Idx {
        match self {
            MethodError::NoMethodFound { receiver, .. }
            | MethodError::Ambiguous { receiver, .. }
            | MethodError::InfiniteDeref { receiver, .. } => *receiver,
        }
    }

    pub fn error_code(&self) -> ErrorCode {
        match self {
            MethodError::NoMethodFound {
                static_candidates, ..
            } if !static_candidates.is_empty() => ErrorCode::E2012,
            MethodError::NoMethodFound { .. } => ErrorCode::E2010,
            MethodError::Ambiguous { .. } => ErrorCode::E2011,
            MethodError::InfiniteDeref { .. } => ErrorCode::E9001,
        }
    }

    /// Render the error as a diagnostic at `span`, the method call.
    pub fn to_diagnostic(
        &self,
        pool: &Pool,
        interner: &StringInterner,
        db: &dyn ImplDatabase,
        span: Span,
    ) -> Diagnostic {
        let ty = |idx: Idx| pool.format_type(idx, interner);

        match self {
            MethodError::NoMethodFound {
                method,
                receiver,
                steps_tried,
                static_candidates,
                unimported_traits,
            } => {
                let method = interner.lookup(*method);
                let mut diag = Diagnostic::error(self.error_code())
                    .with_message(format!(
                        "no method named `{method}` found for type `{}`",
                        ty(*receiver)
                    ))
                    .with_label(span, format!("method not found in `{}`", ty(*receiver)));

                if steps_tried.len() > 1 {
                    let tried: Vec<String> =
                        steps_tried.iter().map(|&s| format!("`{}`", ty(s))).collect();
                    diag = diag.with_note(format!("searched the types {}", tried.join(", ")));
                }

                if !static_candidates.is_empty() {
                    diag = diag.with_note(
                        "found associated functions with this name; \
                         to be called as a method a function needs a `self` parameter",
                    );
                    for (index, source) in static_candidates.iter().enumerate() {
                        let path = source_path(pool, interner, db, *source);
                        diag = diag.with_structured_suggestion(Suggestion::text(
                            format!("use associated function syntax: `{path}::{method}(..)`"),
                            priority(index),
                        ));
                    }
                }

                for (index, &trait_id) in unimported_traits.iter().enumerate() {
                    let name = interner.lookup(db.trait_name(trait_id));
                    diag = diag.with_structured_suggestion(Suggestion::text(
                        format!("trait `{name}` provides `{method}`; consider importing it"),
                        priority(index),
                    ));
                }
                diag
            }

            MethodError::Ambiguous {
                method,
                receiver,
                candidates,
            } => {
                let method_text = interner.lookup(*method);
                let mut diag = Diagnostic::error(ErrorCode::E2011)
                    .with_message(format!(
                        "multiple applicable items named `{method_text}` for type `{}`",
                        ty(*receiver)
                    ))
                    .with_label(span, format!("multiple `{method_text}` found"));

                for (index, candidate) in candidates.iter().enumerate() {
                    let number = index + 1;
                    diag = diag.with_note(format!(
                        "candidate #{number} is defined in {}",
                        describe_source(pool, interner, db, candidate)
                    ));
                }
                for (index, candidate) in candidates.iter().enumerate() {
                    let number = index + 1;
                    let call = render_qualified_call(pool, interner, db, candidate, "receiver");
                    diag = diag.with_structured_suggestion(Suggestion::text(
                        format!("disambiguate the method for candidate #{number}: `{call}`"),
                        priority(index),
                    ));
                }
                diag
            }

            MethodError::InfiniteDeref {
                receiver,
                ty: at,
                cycle,
            } => {
                let note = if *cycle {
                    format!("`{}` dereferences back to itself", ty(*at))
                } else {
                    format!("reached the dereference limit at `{}`", ty(*at))
                };
                Diagnostic::error(ErrorCode::E9001)
                    .with_message(format!(
                        "auto-dereferencing `{}` does not terminate",
                        ty(*receiver)
                    ))
                    .with_label(span, "method receiver")
                    .with_note(note)
            }
        }
    }
}

/// Suggestion priority for the `index`-th entry of a list.
fn priority(index: usize) -> u8 {
    u8::try_from(index).unwrap_or(u8::MAX)
}

/// Queue the diagnostic for `error` and return proof it was reported.
pub fn report_method_error(
    queue: &mut DiagnosticQueue,
    error: &MethodError,
    pool: &Pool,
    interner: &StringInterner,
    db: &dyn ImplDatabase,
    span: Span,
) -> ErrorGuaranteed {
    queue.emit_error(error.to_diagnostic(pool, interner, db, span))
}

fn source_path(
    pool: &Pool,
    interner: &StringInterner,
    db: &dyn ImplDatabase,
    source: CandidateSource,
) -> String {
    match source {
        CandidateSource::Impl(impl_id) => db.impl_entry(impl_id).map_or_else(
            || "<unknown>".to_string(),
            |entry| match entry.trait_id {
                Some(trait_id) => interner.lookup(db.trait_name(trait_id)).to_string(),
                None => type_path(pool, interner, entry.self_type),
            },
        ),
        CandidateSource::Object(trait_id) | CandidateSource::ParamBound(trait_id) => {
            interner.lookup(db.trait_name(trait_id)).to_string()
        }
    }
}

fn describe_source(
    pool: &Pool,
    interner: &StringInterner,
    db: &dyn ImplDatabase,
    candidate: &Candidate,
) -> String {
    match (candidate.source, candidate.trait_id()) {
        (CandidateSource::Impl(_), None) => format!(
            "an impl for the type `{}`",
            pool.format_type(candidate.impl_self_ty, interner)
        ),
        (_, Some(trait_id)) => format!(
            "the trait `{}`",
            interner.lookup(db.trait_name(trait_id))
        ),
        (CandidateSource::Object(_) | CandidateSource::ParamBound(_), None) => {
            "a trait bound".to_string()
        }
    }
}
