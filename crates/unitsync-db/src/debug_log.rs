//! Database operations for the bounded `debug_log` table.

use std::borrow::Cow;

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use unitsync_core::DebugLogEntry;

use crate::DbError;

/// A row from the `debug_log` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct DebugLogRow {
    pub id: i64,
    pub logged_at: DateTime<Utc>,
    pub message: String,
}

impl From<DebugLogRow> for DebugLogEntry {
    fn from(row: DebugLogRow) -> Self {
        DebugLogEntry {
            timestamp: row.logged_at,
            message: row.message,
        }
    }
}

/// Postgres `text` cannot hold NUL, which raw response bodies may carry.
fn storable_message(message: &str) -> Cow<'_, str> {
    if message.contains('\0') {
        Cow::Owned(message.replace('\0', "\u{FFFD}"))
    } else {
        Cow::Borrowed(message)
    }
}

/// Appends entries in order inside a single transaction.
///
/// NUL characters are stored as U+FFFD. Returns the number of rows inserted.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if any insert fails; nothing is written in that
/// case.
pub async fn append_debug_entries(
    pool: &PgPool,
    entries: &[DebugLogEntry],
) -> Result<u64, DbError> {
    if entries.is_empty() {
        return Ok(0);
    }

    let mut tx = pool.begin().await?;
    let mut inserted = 0u64;
    for entry in entries {
        let result = sqlx::query("INSERT INTO debug_log (logged_at, message) VALUES ($1, $2)")
            .bind(entry.timestamp)
            .bind(storable_message(&entry.message).as_ref())
            .execute(&mut *tx)
            .await?;
        inserted += result.rows_affected();
    }
    tx.commit().await?;
    Ok(inserted)
}

/// Returns the newest `limit` entries in chronological order.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_debug_entries(pool: &PgPool, limit: i64) -> Result<Vec<DebugLogRow>, DbError> {
    let rows = sqlx::query_as::<_, DebugLogRow>(
        "SELECT id, logged_at, message FROM ( \
             SELECT id, logged_at, message FROM debug_log ORDER BY id DESC LIMIT $1 \
         ) newest ORDER BY id ASC",
    )
    .bind(limit)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Deletes all but the newest `keep` entries. Returns the number deleted.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the delete fails.
pub async fn trim_debug_log(pool: &PgPool, keep: i64) -> Result<u64, DbError> {
    let result = sqlx::query(
        "DELETE FROM debug_log WHERE id NOT IN ( \
             SELECT id FROM debug_log ORDER BY id DESC LIMIT $1 \
         )",
    )
    .bind(keep.max(0))
    .execute(pool)
    .await?;
    Ok(result.rows_affected())
}

/// Deletes every entry. Returns the number deleted.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the delete fails.
pub async fn clear_debug_log(pool: &PgPool) -> Result<u64, DbError> {
    let result = sqlx::query("DELETE FROM debug_log")
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}
