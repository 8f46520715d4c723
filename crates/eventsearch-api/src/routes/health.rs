//! Health check endpoint.

use axum::extract::State;
use axum::{Json, Router, routing::get};
use serde::Serialize;

use crate::state::AppState;

/// Health check response.
#[derive(Serialize)]
pub struct HealthResponse {
    /// `ok`, or `degraded` when the search engine does not answer.
    pub status: &'static str,
    /// Whether the search engine answered a ping.
    pub search_engine: &'static str,
    /// Service version.
    pub version: &'static str,
}

/// GET /health
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let reachable = state.engine.ping().await;
    Json(HealthResponse {
        status: if reachable { "ok" } else { "degraded" },
        search_engine: if reachable { "up" } else { "down" },
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Returns the health check router.
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
