//! Ad-hoc document indexing endpoint.

use axum::extract::{Query, State};
use axum::{Json, Router, routing::post};
use serde::Deserialize;
use serde_json::Value;
use tracing::instrument;

use eventsearch_indexing::application::search;

use crate::error::ApiError;
use crate::state::AppState;

/// Query string for POST /.
#[derive(Debug, Deserialize)]
pub struct IndexDocumentParams {
    pub index: String,
    pub doc_id: String,
    pub content: String,
}

/// POST /
#[instrument(skip(state))]
async fn index_document(
    State(state): State<AppState>,
    Query(params): Query<IndexDocumentParams>,
) -> Result<Json<Value>, ApiError> {
    let result =
        search::index_document(&*state.engine, &params.index, &params.doc_id, &params.content)
            .await?;
    Ok(Json(result))
}

/// Returns the document indexing router.
pub fn router() -> Router<AppState> {
    Router::new().route("/", post(index_document))
}
