pub mod types;
pub mod passages;
pub mod embedder;
pub mod qdrant;
pub mod orchestrator;

pub use types::*;
pub use passages::*;
pub use embedder::*;
pub use qdrant::*;
pub use orchestrator::*;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum IndexingError {
    #[error("embedding service returned no vectors")]
    NoVectors,

    #[error("embedding count {got} does not match passage count {expected}")]
    CountMismatch { expected: usize, got: usize },

    #[error(
        "collection exists with dimension {existing} but embeddings have dimension \
         {requested}; migrate the collection explicitly"
    )]
    DimensionMismatch { existing: usize, requested: usize },

    #[error("service unreachable at {0}")]
    Connection(String),

    #[error("upstream returned error (status {status}): {body}")]
    Api { status: u16, body: String },

    #[error("HTTP client error: {0}")]
    HttpClient(String),

    #[error("response decoding error: {0}")]
    ResponseDecoding(String),

    #[error("MISTRAL_API_KEY is not set")]
    MissingApiKey,
}
