use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use unitsync_core::StoredProduct;

use crate::middleware::RequestId;

use super::{map_db_error, normalize_limit, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Deserialize)]
pub(super) struct ProductsQuery {
    pub limit: Option<i64>,
}

pub(super) async fn list_products(
    State(state): State<AppState>,
    req_id: RequestId,
    Query(query): Query<ProductsQuery>,
) -> Result<Json<ApiResponse<Vec<StoredProduct>>>, ApiError> {
    let rows = unitsync_db::list_products(&state.pool, normalize_limit(query.limit))
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: rows.into_iter().map(StoredProduct::from).collect(),
        meta: ResponseMeta::new(req_id.0),
    }))
}
