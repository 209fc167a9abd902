pub mod buzz;

use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};
use tower_http::compression::CompressionLayer;

use crate::middleware::logging::HttpLoggingExt;
use crate::services::posts::PostService;

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok", "message": "Eventa API is running" }))
}

/// The full API, mounted under `/api`.
pub fn app<S: PostService>(svc: S) -> Router {
    let api = Router::new()
        .route("/health", get(health))
        .nest("/buzz", buzz::router::<S>().with_state(svc));

    Router::new()
        .nest("/api", api)
        .layer(CompressionLayer::new())
        .with_http_logging()
}
