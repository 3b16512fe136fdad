use std::sync::Mutex;

use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use super::types::{PointRecord, SearchHit, VectorStore};
use super::IndexingError;

/// Qdrant's unsigned point-id space is wider than this, but ids are kept
/// under 10^12 so they stay readable in dashboards and logs. Truncating the
/// UUIDv5 admits collisions at very large scale; a known limitation.
const POINT_ID_SPACE: u128 = 1_000_000_000_000;

/// Deterministic point identifier for `(doc_id, passage_index)`.
pub fn point_id(doc_id: &str, index: usize) -> u64 {
    let name = format!("{doc_id}-{index}");
    let uuid = Uuid::new_v5(&Uuid::NAMESPACE_URL, name.as_bytes());
    (uuid.as_u128() % POINT_ID_SPACE) as u64
}

/// Qdrant vector store over its REST API.
pub struct QdrantStore {
    base_url: String,
    collection: String,
    client: reqwest::blocking::Client,
}

impl QdrantStore {
    pub fn new(
        base_url: &str,
        collection: &str,
        timeout_secs: u64,
    ) -> Result<Self, IndexingError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| IndexingError::HttpClient(e.to_string()))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            collection: collection.to_string(),
            client,
        })
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    fn send_error(&self, e: reqwest::Error) -> IndexingError {
        if e.is_connect() {
            IndexingError::Connection(self.base_url.clone())
        } else {
            IndexingError::HttpClient(e.to_string())
        }
    }

    /// Dimension of the existing collection, `None` when absent.
    fn existing_dimension(&self) -> Result<Option<usize>, IndexingError> {
        let url = format!("{}/collections/{}", self.base_url, self.collection);
        let response = self.client.get(&url).send().map_err(|e| self.send_error(e))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(IndexingError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: CollectionInfoResponse = response
            .json()
            .map_err(|e| IndexingError::ResponseDecoding(e.to_string()))?;
        Ok(Some(parsed.result.config.params.vectors.size))
    }
}

#[derive(Deserialize)]
struct CollectionInfoResponse {
    result: CollectionInfo,
}

#[derive(Deserialize)]
struct CollectionInfo {
    config: CollectionConfig,
}

#[derive(Deserialize)]
struct CollectionConfig {
    params: CollectionParams,
}

#[derive(Deserialize)]
struct CollectionParams {
    vectors: VectorParams,
}

#[derive(Deserialize)]
struct VectorParams {
    size: usize,
}

#[derive(Deserialize)]
struct SearchResponse {
    result: Vec<SearchResult>,
}

#[derive(Deserialize)]
struct SearchResult {
    score: f32,
    #[serde(default)]
    payload: Value,
}

impl VectorStore for QdrantStore {
    fn ensure_collection(&self, dimension: usize) -> Result<(), IndexingError> {
        match self.existing_dimension()? {
            Some(existing) if existing == dimension => Ok(()),
            Some(existing) => Err(IndexingError::DimensionMismatch {
                existing,
                requested: dimension,
            }),
            None => {
                let url = format!("{}/collections/{}", self.base_url, self.collection);
                let body = json!({
                    "vectors": {"size": dimension, "distance": "Cosine"}
                });
                let response = self
                    .client
                    .put(&url)
                    .json(&body)
                    .send()
                    .map_err(|e| self.send_error(e))?;
                let status = response.status();
                if !status.is_success() {
                    let body = response.text().unwrap_or_default();
                    return Err(IndexingError::Api {
                        status: status.as_u16(),
                        body,
                    });
                }
                tracing::info!(
                    collection = %self.collection,
                    dimension,
                    "created vector collection"
                );
                Ok(())
            }
        }
    }

    fn upsert(&self, points: &[PointRecord]) -> Result<usize, IndexingError> {
        let url = format!(
            "{}/collections/{}/points?wait=true",
            self.base_url, self.collection
        );
        let body = json!({ "points": points });
        let response = self
            .client
            .put(&url)
            .json(&body)
            .send()
            .map_err(|e| self.send_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(IndexingError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(points.len())
    }

    fn search(
        &self,
        vector: &[f32],
        top_k: usize,
        doc_id: Option<&str>,
    ) -> Result<Vec<SearchHit>, IndexingError> {
        let url = format!(
            "{}/collections/{}/points/search",
            self.base_url, self.collection
        );
        let mut body = json!({
            "vector": vector,
            "limit": top_k,
            "with_payload": true,
        });
        if let Some(doc_id) = doc_id {
            body["filter"] = json!({
                "must": [{"key": "doc_id", "match": {"value": doc_id}}]
            });
        }

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .map_err(|e| self.send_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(IndexingError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: SearchResponse = response
            .json()
            .map_err(|e| IndexingError::ResponseDecoding(e.to_string()))?;

        Ok(parsed
            .result
            .into_iter()
            .map(|r| SearchHit {
                score: r.score,
                payload: r.payload,
            })
            .collect())
    }
}

/// In-memory vector store for testing — cosine similarity, same overwrite
/// and dimension semantics as the Qdrant store.
pub struct InMemoryVectorStore {
    points: Mutex<Vec<PointRecord>>,
    dimension: Mutex<Option<usize>>,
}

impl InMemoryVectorStore {
    pub fn new() -> Self {
        Self {
            points: Mutex::new(Vec::new()),
            dimension: Mutex::new(None),
        }
    }

    pub fn count(&self) -> usize {
        self.points.lock().unwrap().len()
    }

    pub fn point(&self, id: u64) -> Option<PointRecord> {
        self.points
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.id == id)
            .cloned()
    }
}

impl Default for InMemoryVectorStore {
    fn default() -> Self {
        Self::new()
    }
}

impl VectorStore for InMemoryVectorStore {
    fn ensure_collection(&self, dimension: usize) -> Result<(), IndexingError> {
        let mut current = self.dimension.lock().unwrap();
        match *current {
            Some(existing) if existing != dimension => Err(IndexingError::DimensionMismatch {
                existing,
                requested: dimension,
            }),
            _ => {
                *current = Some(dimension);
                Ok(())
            }
        }
    }

    fn upsert(&self, points: &[PointRecord]) -> Result<usize, IndexingError> {
        let mut stored = self.points.lock().unwrap();
        for point in points {
            stored.retain(|p| p.id != point.id);
            stored.push(point.clone());
        }
        Ok(points.len())
    }

    fn search(
        &self,
        vector: &[f32],
        top_k: usize,
        doc_id: Option<&str>,
    ) -> Result<Vec<SearchHit>, IndexingError> {
        let stored = self.points.lock().unwrap();
        let mut scored: Vec<SearchHit> = stored
            .iter()
            .filter(|p| match doc_id {
                Some(id) => p.payload.get("doc_id").and_then(Value::as_str) == Some(id),
                None => true,
            })
            .map(|p| SearchHit {
                score: cosine_similarity(vector, &p.vector),
                payload: p.payload.clone(),
            })
            .collect();

        scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(top_k);
        Ok(scored)
    }
}

fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_point(id: u64, vector: Vec<f32>, doc_id: &str) -> PointRecord {
        PointRecord {
            id,
            vector,
            payload: json!({"doc_id": doc_id, "text": format!("point {id}")}),
        }
    }

    #[test]
    fn point_id_is_deterministic() {
        assert_eq!(point_id("doc_1a2b3c4d", 0), point_id("doc_1a2b3c4d", 0));
        assert_ne!(point_id("doc_1a2b3c4d", 0), point_id("doc_1a2b3c4d", 1));
        assert_ne!(point_id("doc_1a2b3c4d", 0), point_id("doc_ffffffff", 0));
    }

    #[test]
    fn point_id_stays_in_reduced_space() {
        for i in 0..100 {
            assert!(u128::from(point_id("doc_abc", i)) < POINT_ID_SPACE);
        }
    }

    #[test]
    fn ensure_collection_is_idempotent_at_same_dimension() {
        let store = InMemoryVectorStore::new();
        store.ensure_collection(384).unwrap();
        store.ensure_collection(384).unwrap();
    }

    #[test]
    fn ensure_collection_rejects_dimension_change() {
        let store = InMemoryVectorStore::new();
        store.ensure_collection(384).unwrap();
        store.upsert(&[make_point(1, vec![0.0; 384], "doc_a")]).unwrap();

        let result = store.ensure_collection(1024);
        assert!(matches!(
            result,
            Err(IndexingError::DimensionMismatch {
                existing: 384,
                requested: 1024
            })
        ));
        // Existing points survive the rejected provisioning
        assert_eq!(store.count(), 1);
    }

    #[test]
    fn upsert_overwrites_same_id() {
        let store = InMemoryVectorStore::new();
        store.ensure_collection(2).unwrap();
        store.upsert(&[make_point(7, vec![1.0, 0.0], "doc_a")]).unwrap();
        store.upsert(&[make_point(7, vec![0.0, 1.0], "doc_a")]).unwrap();

        assert_eq!(store.count(), 1);
        assert_eq!(store.point(7).unwrap().vector, vec![0.0, 1.0]);
    }

    #[test]
    fn search_ranks_by_cosine_and_respects_top_k() {
        let store = InMemoryVectorStore::new();
        store.ensure_collection(2).unwrap();
        store
            .upsert(&[
                make_point(1, vec![1.0, 0.0], "doc_a"),
                make_point(2, vec![0.7, 0.7], "doc_a"),
                make_point(3, vec![0.0, 1.0], "doc_a"),
            ])
            .unwrap();

        let hits = store.search(&[1.0, 0.0], 2, None).unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].payload["text"], "point 1");
        assert!(hits[0].score > hits[1].score);
    }

    #[test]
    fn search_filters_by_doc_id() {
        let store = InMemoryVectorStore::new();
        store.ensure_collection(2).unwrap();
        store
            .upsert(&[
                make_point(1, vec![1.0, 0.0], "doc_a"),
                make_point(2, vec![1.0, 0.0], "doc_b"),
            ])
            .unwrap();

        let hits = store.search(&[1.0, 0.0], 10, Some("doc_b")).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].payload["doc_id"], "doc_b");
    }

    #[test]
    fn qdrant_store_constructor_trims_slash() {
        let store = QdrantStore::new("http://localhost:6333/", "medical_records", 30).unwrap();
        assert_eq!(store.base_url, "http://localhost:6333");
        assert_eq!(store.collection(), "medical_records");
    }

    #[test]
    fn collection_info_decodes_from_api_shape() {
        let raw = r#"{
            "result": {
                "status": "green",
                "config": {
                    "params": {
                        "vectors": {"size": 1024, "distance": "Cosine"}
                    }
                }
            },
            "status": "ok",
            "time": 0.0001
        }"#;
        let parsed: CollectionInfoResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.result.config.params.vectors.size, 1024);
    }

    #[test]
    fn search_response_decodes_missing_payload_as_null() {
        let raw = r#"{"result": [{"id": 12, "version": 3, "score": 0.91}], "status": "ok"}"#;
        let parsed: SearchResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.result.len(), 1);
        assert!(parsed.result[0].payload.is_null());
    }
}
