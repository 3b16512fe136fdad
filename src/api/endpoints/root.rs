use axum::Json;
use serde_json::{json, Value};

/// Service banner with the available endpoints.
pub async fn info() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "carnet",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": ["/extract", "/extract-file", "/index", "/search"],
    }))
}
