use serde::{Deserialize, Serialize};

use super::types::TextEmbedder;
use super::IndexingError;

/// Mistral embeddings client (`POST /v1/embeddings`).
pub struct MistralEmbedder {
    base_url: String,
    api_key: String,
    model: String,
    client: reqwest::blocking::Client,
}

impl MistralEmbedder {
    pub fn new(
        base_url: &str,
        api_key: &str,
        model: &str,
        timeout_secs: u64,
    ) -> Result<Self, IndexingError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| IndexingError::HttpClient(e.to_string()))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
            client,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingItem>,
}

#[derive(Deserialize)]
struct EmbeddingItem {
    embedding: Vec<f32>,
    index: usize,
}

impl TextEmbedder for MistralEmbedder {
    fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, IndexingError> {
        if self.api_key.is_empty() {
            return Err(IndexingError::MissingApiKey);
        }
        let url = format!("{}/v1/embeddings", self.base_url);
        let body = EmbeddingRequest {
            model: &self.model,
            input: texts,
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .map_err(|e| {
                if e.is_connect() {
                    IndexingError::Connection(self.base_url.clone())
                } else {
                    IndexingError::HttpClient(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(IndexingError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: EmbeddingResponse = response
            .json()
            .map_err(|e| IndexingError::ResponseDecoding(e.to_string()))?;

        // The API tags each vector with its input index; sort so vector i
        // always corresponds to text i.
        let mut data = parsed.data;
        data.sort_by_key(|item| item.index);
        Ok(data.into_iter().map(|item| item.embedding).collect())
    }
}

/// Mock embedder for testing — deterministic vectors derived from text bytes.
pub struct MockEmbedder {
    dimension: usize,
    short_by: usize,
    return_empty: bool,
}

impl MockEmbedder {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            short_by: 0,
            return_empty: false,
        }
    }

    /// Return `n` fewer vectors than inputs, to exercise count mismatches.
    pub fn short_by(mut self, n: usize) -> Self {
        self.short_by = n;
        self
    }

    /// Return no vectors at all.
    pub fn returning_empty(mut self) -> Self {
        self.return_empty = true;
        self
    }
}

impl TextEmbedder for MockEmbedder {
    fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, IndexingError> {
        if self.return_empty {
            return Ok(Vec::new());
        }
        let count = texts.len().saturating_sub(self.short_by);
        Ok(texts[..count]
            .iter()
            .map(|text| {
                (0..self.dimension)
                    .map(|i| {
                        let byte = text.as_bytes().get(i % text.len().max(1)).copied().unwrap_or(0);
                        f32::from(byte) / 255.0
                    })
                    .collect()
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_api_key_fails_at_call_time() {
        let embedder =
            MistralEmbedder::new("https://api.mistral.ai", "", "mistral-embed", 60).unwrap();
        let result = embedder.embed(&["texte".to_string()]);
        assert!(matches!(result, Err(IndexingError::MissingApiKey)));
    }

    #[test]
    fn response_vectors_are_reordered_by_index() {
        let raw = r#"{
            "object": "list",
            "data": [
                {"object": "embedding", "embedding": [2.0], "index": 1},
                {"object": "embedding", "embedding": [1.0], "index": 0}
            ],
            "model": "mistral-embed"
        }"#;
        let mut parsed: EmbeddingResponse = serde_json::from_str(raw).unwrap();
        parsed.data.sort_by_key(|item| item.index);
        assert_eq!(parsed.data[0].embedding, vec![1.0]);
        assert_eq!(parsed.data[1].embedding, vec![2.0]);
    }

    #[test]
    fn mock_is_deterministic_and_order_preserving() {
        let embedder = MockEmbedder::new(8);
        let texts = vec!["premier".to_string(), "second".to_string()];
        let a = embedder.embed(&texts).unwrap();
        let b = embedder.embed(&texts).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 2);
        assert_eq!(a[0].len(), 8);
        assert_ne!(a[0], a[1]);
    }

    #[test]
    fn mock_short_by_drops_vectors() {
        let embedder = MockEmbedder::new(4).short_by(1);
        let texts = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        assert_eq!(embedder.embed(&texts).unwrap().len(), 2);
    }

    #[test]
    fn mock_returning_empty_yields_no_vectors() {
        let embedder = MockEmbedder::new(4).returning_empty();
        let texts = vec!["a".to_string()];
        assert!(embedder.embed(&texts).unwrap().is_empty());
    }
}
