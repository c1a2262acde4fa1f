use std::sync::Arc;

use tokio::sync::{Mutex, OwnedMutexGuard};

/// Single-flight token shared by every trigger that can start a pass.
///
/// Clones share the same underlying lock.
#[derive(Debug, Clone, Default)]
pub struct SyncGuard {
    lock: Arc<Mutex<()>>,
}

/// Held for the duration of one pass; released on drop.
#[derive(Debug)]
pub struct SyncPermit {
    _guard: OwnedMutexGuard<()>,
}

impl SyncGuard {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a permit, or `None` if another pass currently holds one.
    #[must_use]
    pub fn try_acquire(&self) -> Option<SyncPermit> {
        Arc::clone(&self.lock)
            .try_lock_owned()
            .ok()
            .map(|guard| SyncPermit { _guard: guard })
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.lock.try_lock().is_err()
    }
}
