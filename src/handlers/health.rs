use axum::{extract::State, response::IntoResponse, routing::get, Json, Router};
use serde_json::json;

use crate::AppState;

/// Basic liveness probe - just checks if the service is running
async fn liveness_check(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "status": "up",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "movies": state.store.len(),
    }))
}

pub fn health_routes() -> Router<AppState> {
    Router::new().route("/", get(liveness_check))
}
