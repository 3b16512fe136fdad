use axum::extract::State;
use axum::Json;

use crate::api::error::ApiError;
use crate::api::types::{ApiContext, SearchRequest, SearchResponse};

/// POST /search — semantic passage search, optionally scoped to one
/// document via `doc_id`.
pub async fn query(
    State(ctx): State<ApiContext>,
    Json(request): Json<SearchRequest>,
) -> Result<Json<SearchResponse>, ApiError> {
    if request.query.trim().is_empty() {
        return Err(ApiError::BadRequest("query is empty".into()));
    }

    let pipeline = ctx.indexing.clone();
    let hits = tokio::task::spawn_blocking(move || {
        pipeline.search(&request.query, request.top_k, request.doc_id.as_deref())
    })
    .await
    .map_err(|e| ApiError::Internal(e.to_string()))??;

    Ok(Json(SearchResponse { hits }))
}
