use axum::extract::{Multipart, State};
use axum::Json;

use crate::api::error::ApiError;
use crate::api::types::{ApiContext, ExtractFileResponse, ExtractRequest, ExtractResponse};
use crate::pipeline::extraction::pdf;

/// POST /extract — structure raw text into a clinical record.
pub async fn text(
    State(ctx): State<ApiContext>,
    Json(request): Json<ExtractRequest>,
) -> Result<Json<ExtractResponse>, ApiError> {
    if request.text.trim().is_empty() {
        return Err(ApiError::BadRequest("text is empty".into()));
    }

    let pipeline = ctx.extraction.clone();
    let outcome = tokio::task::spawn_blocking(move || pipeline.run(&request.text))
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))??;

    Ok(Json(ExtractResponse::from(outcome)))
}

/// POST /extract-file — extract the text layer of an uploaded PDF, then
/// structure it like /extract.
pub async fn file(
    State(ctx): State<ApiContext>,
    mut multipart: Multipart,
) -> Result<Json<ExtractFileResponse>, ApiError> {
    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(e.to_string()))?
    {
        if field.name() == Some("file") {
            let filename = field
                .file_name()
                .unwrap_or("document.pdf")
                .to_string();
            let content_type = field
                .content_type()
                .unwrap_or("application/pdf")
                .to_string();
            let data = field
                .bytes()
                .await
                .map_err(|e| ApiError::BadRequest(e.to_string()))?;
            upload = Some((filename, content_type, data));
        }
    }

    let (filename, content_type, data) =
        upload.ok_or_else(|| ApiError::BadRequest("missing 'file' field".into()))?;
    if !filename.to_lowercase().ends_with(".pdf") {
        return Err(ApiError::BadRequest("only PDF uploads are supported".into()));
    }

    let size = data.len();
    let pipeline = ctx.extraction.clone();
    let outcome = tokio::task::spawn_blocking(move || {
        let text = pdf::extract_text(&data)?;
        pipeline.run(&text)
    })
    .await
    .map_err(|e| ApiError::Internal(e.to_string()))??;

    Ok(Json(ExtractFileResponse {
        filename,
        size,
        content_type,
        record: outcome.record,
        valid: outcome.valid,
        validation_error: outcome.validation_error,
    }))
}
