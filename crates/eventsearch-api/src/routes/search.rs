//! Keyword search endpoint.
//!
//! Without `index` the request searches the events index and wraps hits as
//! `{"results": [...]}`. With `index` it searches that index and returns the
//! raw hits array.

use axum::extract::{Query, State};
use axum::{Json, Router, routing::get};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{info, instrument};

use eventsearch_indexing::application::search;

use crate::error::ApiError;
use crate::state::AppState;

/// Field searched when the request names none.
const DEFAULT_FIELD: &str = "name";

/// Query string for GET /search/.
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    /// Keywords to match.
    pub query: String,
    /// Field to match against.
    pub field: Option<String>,
    /// Target index; selects the raw-hits response shape.
    pub index: Option<String>,
    /// Maximum number of hits.
    pub size: Option<u32>,
}

/// GET /search/
#[instrument(skip(state))]
async fn search_documents(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Value>, ApiError> {
    let field = params.field.as_deref().unwrap_or(DEFAULT_FIELD);
    let index = params.index.as_deref().unwrap_or(&state.events_index);

    let hits = search::search(&*state.engine, index, field, &params.query, params.size).await?;
    info!(index, field, hits = hits.len(), "search served");

    if params.index.is_some() {
        Ok(Json(Value::Array(hits)))
    } else {
        Ok(Json(json!({ "results": hits })))
    }
}

/// Returns the search router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/search", get(search_documents))
        .route("/search/", get(search_documents))
}
