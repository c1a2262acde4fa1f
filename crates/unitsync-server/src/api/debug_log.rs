use axum::{extract::State, Json};
use serde::Serialize;
use unitsync_core::{render_debug_log, DebugLogEntry};

use crate::middleware::RequestId;

use super::{map_db_error, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Serialize)]
pub(super) struct DebugLogData {
    /// `<timestamp> - <message>` lines, oldest first.
    text: String,
    entries: Vec<DebugLogEntry>,
}

#[derive(Debug, Serialize)]
pub(super) struct ClearedData {
    removed: u64,
}

pub(super) async fn show_debug_log(
    State(state): State<AppState>,
    req_id: RequestId,
) -> Result<Json<ApiResponse<DebugLogData>>, ApiError> {
    let limit = i64::try_from(state.service.debug_log_capacity()).unwrap_or(i64::MAX);
    let entries: Vec<DebugLogEntry> = unitsync_db::list_debug_entries(&state.pool, limit)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?
        .into_iter()
        .map(DebugLogEntry::from)
        .collect();

    Ok(Json(ApiResponse {
        data: DebugLogData {
            text: render_debug_log(&entries),
            entries,
        },
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// Empties the persisted log shared by every process.
pub(super) async fn clear_debug_log(
    State(state): State<AppState>,
    req_id: RequestId,
) -> Result<Json<ApiResponse<ClearedData>>, ApiError> {
    let removed = unitsync_db::clear_debug_log(&state.pool)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    tracing::info!(removed, "debug log cleared");
    Ok(Json(ApiResponse {
        data: ClearedData { removed },
        meta: ResponseMeta::new(req_id.0),
    }))
}
