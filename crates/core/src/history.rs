//! Bounded linear undo/redo history.
//!
//! [`HistoryLog`] is an ordered snapshot buffer plus a cursor. Pushing after
//! an undo truncates the abandoned branch; once the buffer exceeds its
//! capacity the oldest snapshot is dropped and the cursor shifts with it, so
//! it keeps pointing at the same logical snapshot.

use std::collections::VecDeque;

/// Maximum number of snapshots kept in a history log.
pub const MAX_HISTORY_LEN: usize = 50;

#[derive(Debug, Clone)]
pub struct HistoryLog<T> {
    entries: VecDeque<T>,
    cursor: usize,
    capacity: usize,
}

impl<T: Clone> HistoryLog<T> {
    /// Create a log holding a single initial snapshot.
    pub fn new(initial: T) -> Self {
        Self::with_capacity(initial, MAX_HISTORY_LEN)
    }

    /// Create a log with a custom capacity (at least 1).
    pub fn with_capacity(initial: T, capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let mut entries = VecDeque::with_capacity(capacity + 1);
        entries.push_back(initial);
        Self {
            entries,
            cursor: 0,
            capacity,
        }
    }

    /// The snapshot at the cursor.
    pub fn current(&self) -> &T {
        // The cursor is always a valid index: the log is never empty and every
        // mutation re-establishes `cursor < len`.
        &self.entries[self.cursor]
    }

    /// Append a snapshot after the cursor, discarding any redo branch.
    pub fn push(&mut self, snapshot: T) {
        self.entries.truncate(self.cursor + 1);
        self.entries.push_back(snapshot);
        self.cursor = self.entries.len() - 1;

        if self.entries.len() > self.capacity {
            self.entries.pop_front();
            self.cursor -= 1;
        }
    }

    /// Step the cursor back. Returns `false` when already at the oldest snapshot.
    pub fn undo(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        true
    }

    /// Step the cursor forward. Returns `false` when already at the newest snapshot.
    pub fn redo(&mut self) -> bool {
        if self.cursor + 1 >= self.entries.len() {
            return false;
        }
        self.cursor += 1;
        true
    }

    /// Overwrite the snapshot at the cursor without adding a step. The redo
    /// branch is kept.
    pub fn replace_current(&mut self, snapshot: T) {
        self.entries[self.cursor] = snapshot;
    }

    /// Drop every snapshot and start over from `initial`.
    pub fn reset(&mut self, initial: T) {
        self.entries.clear();
        self.entries.push_back(initial);
        self.cursor = 0;
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }
}
