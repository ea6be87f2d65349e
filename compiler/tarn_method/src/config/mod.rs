//! Knobs for method probing.

/// Configuration for method lookup.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct ProbeConfig {
    /// Maximum number of dereferences before the receiver is reported as
    /// dereferencing forever.
    pub deref_limit: usize,
    /// Methods of `Tr` (and its super-traits) are inherent on `dyn Tr`.
    pub object_candidates: bool,
    /// Methods of a generic parameter's bounds are inherent on that parameter.
    pub param_bound_candidates: bool,
    /// On failure, look for traits that would have matched had they been
    /// imported.
    pub suggest_unimported_traits: bool,
    /// Nesting depth for where-clause evaluation; deeper obligations are
    /// assumed to possibly hold.
    pub obligation_depth: u32,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        ProbeConfig {
            deref_limit: 128,
            object_candidates: true,
            param_bound_candidates: true,
            suggest_unimported_traits: true,
            obligation_depth: 8,
        }
    }
}

impl ProbeConfig {
    /// Only ordinary impls produce candidates; trait objects and generic
    /// parameters get no built-in methods.
    pub fn impls_only() -> Self {
        ProbeConfig {
            object_candidates: false,
            param_bound_candidates: false,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_deref_limit(mut self, limit: usize) -> Self {
        self.deref_limit = limit;
        self
    }
}
