use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::pipeline::extraction::ExtractionError;
use crate::pipeline::indexing::IndexingError;

/// Structured error response body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: &'static str,
    pub message: String,
}

/// API-level errors with HTTP status mapping.
///
/// Failures always carry a stable error code; a request never sees a
/// partial or ambiguous success.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Invalid request: {0}")]
    BadRequest(String),
    #[error(transparent)]
    Extraction(#[from] ExtractionError),
    #[error(transparent)]
    Indexing(#[from] IndexingError),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            ApiError::BadRequest(detail) => {
                (StatusCode::BAD_REQUEST, "BAD_REQUEST", detail.clone())
            }
            ApiError::Extraction(e) => match e {
                ExtractionError::Connection(_)
                | ExtractionError::Api { .. }
                | ExtractionError::HttpClient(_)
                | ExtractionError::ResponseDecoding(_) => {
                    (StatusCode::BAD_GATEWAY, "UPSTREAM", e.to_string())
                }
                ExtractionError::PdfParsing(_) => {
                    (StatusCode::BAD_REQUEST, "PDF_INVALID", e.to_string())
                }
                ExtractionError::MissingApiKey => {
                    (StatusCode::INTERNAL_SERVER_ERROR, "CONFIG", e.to_string())
                }
                _ => internal(&e.to_string()),
            },
            ApiError::Indexing(e) => match e {
                IndexingError::Connection(_)
                | IndexingError::Api { .. }
                | IndexingError::HttpClient(_)
                | IndexingError::ResponseDecoding(_) => {
                    (StatusCode::BAD_GATEWAY, "UPSTREAM", e.to_string())
                }
                IndexingError::NoVectors | IndexingError::CountMismatch { .. } => {
                    (StatusCode::BAD_GATEWAY, "EMBEDDING_MISMATCH", e.to_string())
                }
                IndexingError::DimensionMismatch { .. } => {
                    (StatusCode::CONFLICT, "DIMENSION_MISMATCH", e.to_string())
                }
                IndexingError::MissingApiKey => {
                    (StatusCode::INTERNAL_SERVER_ERROR, "CONFIG", e.to_string())
                }
            },
            ApiError::Internal(detail) => internal(detail),
        };

        let body = ErrorBody {
            error: ErrorDetail { code, message },
        };
        (status, Json(body)).into_response()
    }
}

fn internal(detail: &str) -> (StatusCode, &'static str, String) {
    tracing::error!(detail, "API internal error");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL",
        "An internal error occurred".to_string(),
    )
}
