//! Startup sequence: prepare indices, run the initial sync, build the router.

use std::sync::Arc;

use axum::Router;
use eventsearch_core::engine::SearchEngine;
use eventsearch_core::error::DomainError;
use eventsearch_core::source::RecordSource;
use eventsearch_indexing::application::index_manager::{self, ManagedIndex};
use eventsearch_indexing::application::sync::{SyncReport, SyncService};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info, instrument};

use crate::routes;
use crate::state::AppState;

/// Ensures both managed indices exist, then syncs events and tickets.
///
/// A failed sync is logged and reported as an empty list so the server can
/// still answer searches from whatever the index already holds.
///
/// # Errors
///
/// Returns the `DomainError` from index preparation; without indices the
/// server cannot serve.
#[instrument(skip(source, engine))]
pub async fn prepare(
    source: Arc<dyn RecordSource>,
    engine: Arc<dyn SearchEngine>,
    events_index: &str,
    tickets_index: &str,
) -> Result<Vec<SyncReport>, DomainError> {
    index_manager::ensure_indices(
        &*engine,
        &[
            ManagedIndex::events(events_index),
            ManagedIndex::tickets(tickets_index),
        ],
    )
    .await?;

    let service = SyncService::new(source, engine, events_index, tickets_index);
    match service.sync_all().await {
        Ok(reports) => {
            for report in &reports {
                info!(
                    run_id = %report.run_id,
                    document_type = %report.document_type,
                    indexed = report.indexed,
                    skipped = report.skipped.len(),
                    "initial sync finished"
                );
            }
            Ok(reports)
        }
        Err(err) => {
            error!(error = %err, "initial sync failed; serving existing index contents");
            Ok(Vec::new())
        }
    }
}

/// Builds the application router over `state`.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(routes::health::router())
        .merge(routes::search::router())
        .merge(routes::documents::router())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
