use std::sync::Arc;

use serde_json::{json, Value};
use uuid::Uuid;

use super::passages::build_passages;
use super::qdrant::point_id;
use super::types::{IndexReport, PointRecord, SearchHit, TextEmbedder, VectorStore};
use super::IndexingError;

/// Record-to-vector-store indexing pipeline.
///
/// Derives passages, embeds them (order preserved), provisions the
/// collection and upserts one point per passage under deterministic ids.
pub struct IndexingPipeline {
    embedder: Arc<dyn TextEmbedder + Send + Sync>,
    store: Arc<dyn VectorStore + Send + Sync>,
    provider: String,
    embed_model: String,
}

impl IndexingPipeline {
    pub fn new(
        embedder: Arc<dyn TextEmbedder + Send + Sync>,
        store: Arc<dyn VectorStore + Send + Sync>,
        provider: &str,
        embed_model: &str,
    ) -> Self {
        Self {
            embedder,
            store,
            provider: provider.to_string(),
            embed_model: embed_model.to_string(),
        }
    }

    /// Index one structured record under a fresh document identifier.
    pub fn index_record(&self, record: &Value) -> Result<IndexReport, IndexingError> {
        let doc_id = new_doc_id();
        let passages = build_passages(record);
        let texts: Vec<String> = passages.iter().map(|p| p.text.clone()).collect();

        let vectors = self.embedder.embed(&texts)?;
        if vectors.is_empty() {
            return Err(IndexingError::NoVectors);
        }
        if vectors.len() != passages.len() {
            return Err(IndexingError::CountMismatch {
                expected: passages.len(),
                got: vectors.len(),
            });
        }

        let dimension = vectors[0].len();
        self.store.ensure_collection(dimension)?;

        let points: Vec<PointRecord> = passages
            .iter()
            .zip(vectors)
            .enumerate()
            .map(|(i, (passage, vector))| PointRecord {
                id: point_id(&doc_id, i),
                vector,
                payload: json!({
                    "doc_id": doc_id,
                    "text": passage.text,
                    "section": passage.meta.get("section"),
                    "meta": passage.meta,
                    "record": record,
                    "provider": self.provider,
                    "embed_model": self.embed_model,
                }),
            })
            .collect();

        let inserted = self.store.upsert(&points)?;
        tracing::info!(doc_id = %doc_id, inserted, dimension, "indexed record");

        Ok(IndexReport {
            doc_id,
            inserted,
            dimension,
        })
    }

    /// Embed a query and run a ranked passage search, optionally restricted
    /// to one document.
    pub fn search(
        &self,
        query: &str,
        top_k: usize,
        doc_id: Option<&str>,
    ) -> Result<Vec<SearchHit>, IndexingError> {
        let vectors = self.embedder.embed(&[query.to_string()])?;
        let vector = vectors.first().ok_or(IndexingError::NoVectors)?;
        self.store.search(vector, top_k, doc_id)
    }
}

/// Fresh document identifier, e.g. `doc_1a2b3c4d`.
fn new_doc_id() -> String {
    let uuid = Uuid::new_v4().simple().to_string();
    format!("doc_{}", &uuid[..8])
}
