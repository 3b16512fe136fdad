use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::api::endpoints;
use crate::api::types::ApiContext;

/// Largest accepted upload (PDF scans can be heavy).
const MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

/// Build the service router.
pub fn api_router(ctx: ApiContext) -> Router {
    Router::new()
        .route("/", get(endpoints::root::info))
        .route("/extract", post(endpoints::extract::text))
        .route("/extract-file", post(endpoints::extract::file))
        .route("/index", post(endpoints::index::record))
        .route("/search", post(endpoints::search::query))
        .with_state(ctx)
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
