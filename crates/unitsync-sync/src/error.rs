use thiserror::Error;
use unitsync_lightspeed::LightspeedError;

use crate::report::AbortReason;

/// Failure raised by a [`crate::ProductStore`] implementation.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Db(#[from] unitsync_db::DbError),

    #[error("product {id} not found")]
    NotFound { id: i64 },
}

/// Errors raised while running a sync pass.
///
/// `Configuration`, `Transport`, and `Payload` abort the pass. `Record` and
/// `Persistence` skip the offending record only.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("transport error: {0}")]
    Transport(#[source] LightspeedError),

    #[error("payload error: {0}")]
    Payload(#[source] LightspeedError),

    #[error("record error: {0}")]
    Record(#[source] LightspeedError),

    #[error("persistence error: {0}")]
    Persistence(#[from] StoreError),
}

impl SyncError {
    /// The reason recorded on the report when this error ends the pass, or
    /// `None` for errors scoped to a single record.
    #[must_use]
    pub fn abort_reason(&self) -> Option<AbortReason> {
        match self {
            SyncError::Configuration(_) => Some(AbortReason::Configuration),
            SyncError::Transport(_) => Some(AbortReason::Transport),
            SyncError::Payload(_) => Some(AbortReason::Payload),
            SyncError::Record(_) | SyncError::Persistence(_) => None,
        }
    }
}
