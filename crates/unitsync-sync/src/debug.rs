//! Bounded in-process debug log.
//!
//! Entries surface verbatim to operators, so messages must never contain
//! the API password.

use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};

use unitsync_core::{render_debug_log, DebugLogEntry};

pub const DEFAULT_CAPACITY: usize = 500;

/// Ring buffer of [`DebugLogEntry`] values. The oldest entry is evicted once
/// `capacity` is reached.
#[derive(Debug)]
pub struct DebugLog {
    capacity: usize,
    entries: Mutex<VecDeque<DebugLogEntry>>,
}

impl Default for DebugLog {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl DebugLog {
    /// Creates an empty log. A `capacity` of zero is treated as one.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            entries: Mutex::new(VecDeque::with_capacity(capacity)),
        }
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn push(&self, entry: DebugLogEntry) {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        while entries.len() >= self.capacity {
            entries.pop_front();
        }
        entries.push_back(entry);
    }

    /// Snapshot of the retained entries, oldest first.
    #[must_use]
    pub fn entries(&self) -> Vec<DebugLogEntry> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .cloned()
            .collect()
    }

    /// The retained entries as `<timestamp> - <message>` lines.
    #[must_use]
    pub fn render(&self) -> String {
        render_debug_log(&self.entries())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
