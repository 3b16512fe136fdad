use axum::extract::State;
use axum::Json;
use serde_json::Value;

use crate::api::error::ApiError;
use crate::api::types::{ApiContext, IndexResponse};

/// POST /index — segment a structured record (the output of /extract) into
/// passages, embed them and upsert into the vector store.
pub async fn record(
    State(ctx): State<ApiContext>,
    Json(record): Json<Value>,
) -> Result<Json<IndexResponse>, ApiError> {
    if !record.is_object() {
        return Err(ApiError::BadRequest("body must be a JSON object".into()));
    }

    let pipeline = ctx.indexing.clone();
    let report = tokio::task::spawn_blocking(move || pipeline.index_record(&record))
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))??;

    Ok(Json(IndexResponse {
        doc_id: report.doc_id,
        inserted: report.inserted,
        dimension: report.dimension,
    }))
}
