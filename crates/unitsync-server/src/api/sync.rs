use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use unitsync_sync::{run_tracked_pass, SyncOutcome, SyncReport, TriggerSource};
use uuid::Uuid;

use crate::middleware::RequestId;

use super::{map_db_error, normalize_limit, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Deserialize)]
pub(super) struct SyncRunsQuery {
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize)]
pub(super) struct SyncRunItem {
    sync_run_id: Uuid,
    trigger_source: String,
    status: String,
    started_at: Option<DateTime<Utc>>,
    completed_at: Option<DateTime<Utc>>,
    records_processed: i32,
    error_message: Option<String>,
    created_at: DateTime<Utc>,
}

/// Runs a manual pass and returns its report once it finishes.
///
/// The pass runs on its own task, so a client that disconnects early does
/// not cancel it or leave its run row unfinished. Responds `409 conflict`
/// when another pass holds the guard or the database-wide sync lock.
pub(super) async fn trigger_sync(
    State(state): State<AppState>,
    req_id: RequestId,
) -> Result<Json<ApiResponse<SyncReport>>, ApiError> {
    let service = Arc::clone(&state.service);
    let pool = state.pool.clone();
    let pass = tokio::spawn(async move {
        run_tracked_pass(&service, &pool, TriggerSource::Manual).await
    });

    let report = pass
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "manual sync task did not complete");
            ApiError::new(req_id.0.clone(), "internal_error", "sync task failed")
        })?
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    if report.outcome == SyncOutcome::Skipped {
        return Err(ApiError::new(
            req_id.0,
            "conflict",
            "a sync pass is already running",
        ));
    }

    Ok(Json(ApiResponse {
        data: report,
        meta: ResponseMeta::new(req_id.0),
    }))
}

pub(super) async fn list_sync_runs(
    State(state): State<AppState>,
    req_id: RequestId,
    Query(query): Query<SyncRunsQuery>,
) -> Result<Json<ApiResponse<Vec<SyncRunItem>>>, ApiError> {
    let rows = unitsync_db::list_sync_runs(&state.pool, normalize_limit(query.limit))
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    let data = rows
        .into_iter()
        .map(|row| SyncRunItem {
            sync_run_id: row.public_id,
            trigger_source: row.trigger_source,
            status: row.status,
            started_at: row.started_at,
            completed_at: row.completed_at,
            records_processed: row.records_processed,
            error_message: row.error_message,
            created_at: row.created_at,
        })
        .collect();

    Ok(Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    }))
}
