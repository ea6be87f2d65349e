//! Diagnostic queue for collecting, deduplicating, and sorting diagnostics.
//!
//! The queue caps the number of errors, drops a repeat of the previous
//! error at the same position, and drops errors about `<error>` types, which
//! only restate an earlier failure. Emitting hands back [`ErrorGuaranteed`].

use std::hash::{Hash, Hasher};

use crate::{Diagnostic, ErrorGuaranteed};

/// Number of characters to use for message prefix deduplication.
const MESSAGE_PREFIX_LEN: usize = 30;

/// Hash the first N characters of a message for dedup comparison.
#[inline]
fn message_prefix_hash(msg: &str) -> u64 {
    let byte_end = msg
        .char_indices()
        .nth(MESSAGE_PREFIX_LEN)
        .map_or(msg.len(), |(idx, _)| idx);
    let mut hasher = std::collections::hash_map::DefaultHasher::new();
    msg[..byte_end].hash(&mut hasher);
    hasher.finish()
}

/// Configuration for diagnostic processing.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct DiagnosticConfig {
    /// Maximum number of errors before stopping (0 = unlimited).
    pub error_limit: usize,
    /// Filter out errors that mention an already-poisoned `<error>` type.
    pub filter_follow_on: bool,
    /// Deduplicate diagnostics at the same offset with similar content.
    pub deduplicate: bool,
}

impl Default for DiagnosticConfig {
    fn default() -> Self {
        DiagnosticConfig {
            error_limit: 10,
            filter_follow_on: true,
            deduplicate: true,
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Hash)]
struct QueuedDiagnostic {
    diagnostic: Diagnostic,
    /// Byte offset of the primary span, for sorting.
    offset: u32,
}

/// Queue for collecting, deduplicating, and sorting diagnostics.
///
/// ```text
/// let mut queue = DiagnosticQueue::new();
/// let guarantee = queue.emit_error(diagnostic);
/// let sorted = queue.flush();
/// ```
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct DiagnosticQueue {
    diagnostics: Vec<QueuedDiagnostic>,
    error_count: usize,
    /// Last (offset, `message_prefix_hash`) for dedup.
    last_error: Option<(u32, u64)>,
    config: DiagnosticConfig,
}

impl Default for DiagnosticQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl DiagnosticQueue {
    /// Create a new diagnostic queue with default configuration.
    pub fn new() -> Self {
        Self::with_config(DiagnosticConfig::default())
    }

    pub fn with_config(config: DiagnosticConfig) -> Self {
        DiagnosticQueue {
            diagnostics: Vec::new(),
            error_count: 0,
            last_error: None,
            config,
        }
    }

    /// Add a diagnostic to the queue.
    ///
    /// Returns `true` if the diagnostic was added, `false` if it was filtered.
    pub fn add(&mut self, diag: Diagnostic) -> bool {
        if self.config.error_limit > 0 && self.error_count >= self.config.error_limit {
            return false;
        }

        let offset = diag.primary_span().map_or(0, |s| s.start);

        if self.config.filter_follow_on && Self::is_follow_on(&diag) {
            return false;
        }

        if self.config.deduplicate && self.is_duplicate(&diag, offset) {
            return false;
        }

        self.last_error = Some((offset, message_prefix_hash(&diag.message)));
        self.error_count += 1;

        self.diagnostics.push(QueuedDiagnostic {
            diagnostic: diag,
            offset,
        });
        true
    }

    pub fn error_count(&self) -> usize {
        self.error_count
    }

    /// Emit an error diagnostic and get proof it was emitted.
    ///
    /// The guarantee is returned even if the diagnostic was filtered as a
    /// duplicate or follow-on: an equivalent error is already queued.
    pub fn emit_error(&mut self, diag: Diagnostic) -> ErrorGuaranteed {
        self.add(diag);
        ErrorGuaranteed::new()
    }

    /// Check if any errors were emitted and get proof if so.
    pub fn has_errors(&self) -> Option<ErrorGuaranteed> {
        ErrorGuaranteed::from_error_count(self.error_count)
    }

    /// Sort diagnostics by position and return them, clearing the queue.
    pub fn flush(&mut self) -> Vec<Diagnostic> {
        let already_sorted = self
            .diagnostics
            .windows(2)
            .all(|w| w[0].offset <= w[1].offset);

        if !already_sorted {
            // Stable: diagnostics at one offset keep emission order.
            self.diagnostics.sort_by_key(|d| d.offset);
        }

        let result: Vec<Diagnostic> = self.diagnostics.drain(..).map(|d| d.diagnostic).collect();

        self.error_count = 0;
        self.last_error = None;

        result
    }

    /// Errors about `<error>` types only restate an earlier failure.
    fn is_follow_on(diag: &Diagnostic) -> bool {
        diag.message.contains("<error>")
    }

    fn is_duplicate(&self, diag: &Diagnostic, offset: u32) -> bool {
        self.last_error.is_some_and(|(last_offset, last_hash)| {
            last_offset == offset && message_prefix_hash(&diag.message) == last_hash
        })
    }
}
