//! Method call resolution for Tarn.
//!
//! Given a receiver type and a method name, decide which function a
//! `receiver.method(..)` call invokes and how the receiver is adjusted to
//! fit it.
//!
//! # Pipeline
//!
//! 1. [`build_steps`]: the receiver and everything it dereferences to,
//!    plus one optional unsized form
//! 2. [`assemble_candidates`]: inherent and in-scope extension methods
//!    that could apply to some step
//! 3. [`probe`]: walk the steps trying `T`, `&T`, `&mut T`, inherent
//!    before extension, and stop at the first match
//! 4. [`confirm()`]: replay the adjustments and commit the bindings
//!
//! [`lookup_method`] runs steps 1-3. Conversions and impls come from the
//! capabilities in [`oracle`](DerefOracle); [`RegistryOracle`] and
//! [`TraitRegistry`](tarn_types::TraitRegistry) are the standard ones.
//!
//! # Tracing
//!
//! Set `TARN_LOG` (or `RUST_LOG`) and call [`init_tracing`], e.g.
//! `TARN_LOG=tarn_method=debug` for picks and ambiguities or
//! `TARN_LOG=tarn_method=trace` for every tested receiver variant.

mod batch;
mod candidate;
mod config;
mod confirm;
mod error;
mod lookup;
mod obligation;
mod oracle;
mod probe;
mod steps;

#[cfg(test)]
mod fixture;

pub use batch::{probe_batch, ProbeRequest};
pub use candidate::{
    assemble_candidates, unimported_traits, Candidate, CandidateGroup, CandidateKind,
    CandidateSource,
};
pub use config::ProbeConfig;
pub use confirm::{
    confirm, render_qualified_call, type_path, Adjustment, Callee, ConfirmError, ConfirmedCall,
};
pub use error::{report_method_error, MethodError};
pub use lookup::lookup_method;
pub use obligation::{evaluate_impl_where_clause, evaluate_obligation, Evaluation, ParamEnv};
pub use oracle::{DerefOracle, ImplDatabase, ProbeContext, RegistryOracle, UnsizeOracle};
pub use probe::{probe, AutoRef, Pick};
pub use steps::{build_steps, Step, Steps};

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for debug output.
///
/// Safe to call multiple times. Does nothing unless `TARN_LOG` or
/// `RUST_LOG` is set; `TARN_LOG` wins when both are.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        let directives = std::env::var("TARN_LOG").or_else(|_| std::env::var("RUST_LOG"));
        if let Ok(directives) = directives {
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(EnvFilter::new(directives))
                .init();
        }
    });
}
