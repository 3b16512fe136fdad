use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use carnet::api::{api_router, ApiContext};
use carnet::pipeline::extraction::{ExtractionPipeline, MistralClient, SchemaStore};
use carnet::pipeline::indexing::{IndexingPipeline, MistralEmbedder, QdrantStore};
use carnet::settings::{default_log_filter, Settings};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(default_log_filter())),
        )
        .init();

    let settings = Settings::from_env();

    let schema = Arc::new(match &settings.schema_path {
        Some(path) => SchemaStore::load(path)?,
        None => SchemaStore::builtin()?,
    });

    let chat = MistralClient::new(
        &settings.mistral_base_url,
        &settings.mistral_api_key,
        &settings.mistral_model,
        settings.http_timeout_secs,
    )?;
    let extraction = Arc::new(ExtractionPipeline::new(
        Arc::new(chat),
        schema,
        &settings.mistral_model,
        settings.temperature,
        settings.repair_attempts,
    ));

    let embedder = MistralEmbedder::new(
        &settings.mistral_base_url,
        &settings.mistral_api_key,
        &settings.embed_model,
        settings.http_timeout_secs,
    )?;
    let store = QdrantStore::new(
        &settings.qdrant_url,
        &settings.qdrant_collection,
        settings.http_timeout_secs,
    )?;
    let indexing = Arc::new(IndexingPipeline::new(
        Arc::new(embedder),
        Arc::new(store),
        "mistral",
        &settings.embed_model,
    ));

    let router = api_router(ApiContext::new(extraction, indexing));

    let listener = tokio::net::TcpListener::bind(&settings.bind_addr).await?;
    tracing::info!(
        addr = %settings.bind_addr,
        model = %settings.mistral_model,
        collection = %settings.qdrant_collection,
        "carnet listening"
    );
    axum::serve(listener, router).await?;

    Ok(())
}
