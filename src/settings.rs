use std::path::PathBuf;

use crate::pipeline::extraction::MISTRAL_BASE_URL;

/// Runtime configuration, read once from the environment at startup.
#[derive(Debug, Clone)]
pub struct Settings {
    pub bind_addr: String,
    pub mistral_base_url: String,
    pub mistral_api_key: String,
    /// Chat model used for extraction (tiny | small | medium).
    pub mistral_model: String,
    pub embed_model: String,
    pub temperature: f32,
    pub qdrant_url: String,
    pub qdrant_collection: String,
    /// Override for the built-in medical record schema.
    pub schema_path: Option<PathBuf>,
    pub http_timeout_secs: u64,
    pub repair_attempts: u32,
}

impl Settings {
    pub fn from_env() -> Self {
        Self {
            bind_addr: env_or("CARNET_BIND_ADDR", "0.0.0.0:8000"),
            mistral_base_url: env_or("MISTRAL_BASE_URL", MISTRAL_BASE_URL),
            mistral_api_key: env_or("MISTRAL_API_KEY", ""),
            mistral_model: env_or("MISTRAL_MODEL", "mistral-medium"),
            embed_model: env_or("MISTRAL_EMBED_MODEL", "mistral-embed"),
            temperature: parse_or("CARNET_TEMPERATURE", 0.0),
            qdrant_url: env_or("QDRANT_URL", "http://localhost:6333"),
            qdrant_collection: env_or("QDRANT_COLLECTION", "medical_records"),
            schema_path: std::env::var("SCHEMA_PATH").ok().map(PathBuf::from),
            http_timeout_secs: parse_or("CARNET_HTTP_TIMEOUT_SECS", 60),
            repair_attempts: parse_or("CARNET_REPAIR_ATTEMPTS", 1),
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Default tracing filter when RUST_LOG is unset.
pub fn default_log_filter() -> &'static str {
    "carnet=info,tower_http=info"
}
