use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::pipeline::extraction::{ExtractionOutcome, ExtractionPipeline};
use crate::pipeline::indexing::{IndexingPipeline, SearchHit};

/// Shared handles injected into every endpoint.
#[derive(Clone)]
pub struct ApiContext {
    pub extraction: Arc<ExtractionPipeline>,
    pub indexing: Arc<IndexingPipeline>,
}

impl ApiContext {
    pub fn new(extraction: Arc<ExtractionPipeline>, indexing: Arc<IndexingPipeline>) -> Self {
        Self {
            extraction,
            indexing,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ExtractRequest {
    /// Raw text extracted from a PDF or OCR run.
    pub text: String,
}

/// The wire field is `json` for compatibility with existing clients.
#[derive(Debug, Serialize)]
pub struct ExtractResponse {
    #[serde(rename = "json")]
    pub record: Value,
    pub valid: bool,
    pub validation_error: Option<String>,
}

impl From<ExtractionOutcome> for ExtractResponse {
    fn from(outcome: ExtractionOutcome) -> Self {
        Self {
            record: outcome.record,
            valid: outcome.valid,
            validation_error: outcome.validation_error,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ExtractFileResponse {
    pub filename: String,
    pub size: usize,
    pub content_type: String,
    #[serde(rename = "json")]
    pub record: Value,
    pub valid: bool,
    pub validation_error: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct IndexResponse {
    pub doc_id: String,
    pub inserted: usize,
    pub dimension: usize,
}

#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    pub query: String,
    #[serde(default = "default_top_k")]
    pub top_k: usize,
    pub doc_id: Option<String>,
}

fn default_top_k() -> usize {
    5
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub hits: Vec<SearchHit>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn extract_response_serializes_record_as_json_field() {
        let response = ExtractResponse {
            record: json!({"patient": {"nom": "Dupont"}}),
            valid: false,
            validation_error: Some("meta is required".into()),
        };
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["json"]["patient"]["nom"], "Dupont");
        assert_eq!(value["valid"], false);
        assert_eq!(value["validation_error"], "meta is required");
    }

    #[test]
    fn search_request_defaults_top_k_to_five() {
        let request: SearchRequest =
            serde_json::from_str(r#"{"query": "traitement"}"#).unwrap();
        assert_eq!(request.top_k, 5);
        assert!(request.doc_id.is_none());
    }
}
