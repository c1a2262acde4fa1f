//! Database-wide single-flight lock for sync passes.
//!
//! Uses a transaction-scoped advisory lock so every process sharing the
//! database (server scheduler, HTTP triggers, CLI) contends on the same key.
//! The lock lives as long as the transaction holding it; dropping a
//! [`SyncLock`] rolls the transaction back and releases it.

use sqlx::{PgPool, Postgres, Transaction};

use crate::DbError;

/// Advisory lock key shared by every unitsync process (`"unitsync"` in ASCII).
pub const SYNC_LOCK_KEY: i64 = 0x756e_6974_7379_6e63;

/// Held for the duration of one tracked pass.
#[derive(Debug)]
pub struct SyncLock {
    tx: Transaction<'static, Postgres>,
}

impl SyncLock {
    /// Releases the lock by ending its transaction.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Sqlx`] if the commit fails. Postgres drops the lock
    /// with the session in that case.
    pub async fn release(self) -> Result<(), DbError> {
        self.tx.commit().await?;
        Ok(())
    }
}

/// Tries to take the sync lock without waiting.
///
/// Returns `None` when another session already holds it.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if a connection cannot be acquired or the lock
/// query fails.
pub async fn try_acquire_sync_lock(pool: &PgPool) -> Result<Option<SyncLock>, DbError> {
    let mut tx = pool.begin().await?;
    let acquired: bool = sqlx::query_scalar("SELECT pg_try_advisory_xact_lock($1)")
        .bind(SYNC_LOCK_KEY)
        .fetch_one(&mut *tx)
        .await?;

    if acquired {
        Ok(Some(SyncLock { tx }))
    } else {
        tx.rollback().await?;
        Ok(None)
    }
}
