use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::IndexingError;

/// One short, independently embeddable text unit derived from a record
/// fragment, plus a flat metadata map suitable for store-side filtering.
#[derive(Debug, Clone, PartialEq)]
pub struct Passage {
    pub text: String,
    pub meta: Map<String, Value>,
}

impl Passage {
    pub fn section(&self) -> &str {
        self.meta
            .get("section")
            .and_then(Value::as_str)
            .unwrap_or("")
    }
}

/// One (vector, payload) unit bound for the vector store.
#[derive(Debug, Clone, Serialize)]
pub struct PointRecord {
    pub id: u64,
    pub vector: Vec<f32>,
    pub payload: Value,
}

/// Result of one indexing run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexReport {
    pub doc_id: String,
    pub inserted: usize,
    pub dimension: usize,
}

/// One ranked result from a semantic search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchHit {
    pub score: f32,
    pub payload: Value,
}

/// Embedding service abstraction — one vector per input text, order
/// preserved. Alignment of vector `i` with text `i` is a hard invariant.
pub trait TextEmbedder {
    fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, IndexingError>;
}

/// Vector store abstraction.
///
/// `ensure_collection` is idempotent: it creates the collection when absent
/// and errors with `DimensionMismatch` when one exists at another dimension.
/// It never recreates, so concurrent provisioning cannot drop points.
pub trait VectorStore {
    fn ensure_collection(&self, dimension: usize) -> Result<(), IndexingError>;

    /// Upsert points, overwriting any existing point with the same id.
    /// Returns the number of points written.
    fn upsert(&self, points: &[PointRecord]) -> Result<usize, IndexingError>;

    fn search(
        &self,
        vector: &[f32],
        top_k: usize,
        doc_id: Option<&str>,
    ) -> Result<Vec<SearchHit>, IndexingError>;
}
