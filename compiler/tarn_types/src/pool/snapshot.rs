//! Transactional checkpoints over variable state.
//!
//! Only variable-state writes are undone. Types interned inside a snapshot
//! stay in the pool; they are unreachable garbage at worst.

use crate::Pool;

/// An open checkpoint. Must be closed with [`Pool::rollback_to`] or
/// [`Pool::commit`], innermost first.
#[derive(Debug)]
#[must_use = "a snapshot must be rolled back or committed"]
pub struct Snapshot {
    undo_len: usize,
}

impl Pool {
    /// Open a checkpoint; writes from here on can be undone.
    pub fn start_snapshot(&mut self) -> Snapshot {
        self.open_snapshots += 1;
        Snapshot {
            undo_len: self.undo_log.len(),
        }
    }

    /// Undo every variable-state write made since `snapshot` was taken.
    pub fn rollback_to(&mut self, snapshot: Snapshot) {
        debug_assert!(self.open_snapshots > 0);
        while self.undo_log.len() > snapshot.undo_len {
            if let Some(entry) = self.undo_log.pop() {
                self.var_states[entry.var_id as usize] = entry.old;
            }
        }
        self.open_snapshots = self.open_snapshots.saturating_sub(1);
    }

    /// Keep the writes made since `snapshot`.
    ///
    /// Inside an enclosing snapshot the undo entries are retained so the
    /// outer checkpoint can still roll them back.
    pub fn commit(&mut self, snapshot: Snapshot) {
        debug_assert!(self.open_snapshots > 0);
        self.open_snapshots = self.open_snapshots.saturating_sub(1);
        if self.open_snapshots == 0 {
            self.undo_log.truncate(snapshot.undo_len);
        }
    }
}
