pub mod types;
pub mod schema;
pub mod prompt;
pub mod parser;
pub mod validator;
pub mod mistral;
pub mod pdf;
pub mod orchestrator;

pub use types::*;
pub use schema::*;
pub use prompt::*;
pub use parser::*;
pub use validator::*;
pub use mistral::*;
pub use pdf::*;
pub use orchestrator::*;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("no valid JSON object could be recovered from the model reply: {0}")]
    NoJsonRecovered(String),

    #[error("Mistral API unreachable at {0}")]
    Connection(String),

    #[error("Mistral API returned error (status {status}): {body}")]
    Api { status: u16, body: String },

    #[error("HTTP client error: {0}")]
    HttpClient(String),

    #[error("response decoding error: {0}")]
    ResponseDecoding(String),

    #[error("MISTRAL_API_KEY is not set")]
    MissingApiKey,

    #[error("schema error: {0}")]
    Schema(String),

    #[error("PDF parsing error: {0}")]
    PdfParsing(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
