//! Event search API server entry point.

use std::sync::Arc;

use eventsearch_api::config::Config;
use eventsearch_api::error::AppError;
use eventsearch_api::startup;
use eventsearch_api::state::AppState;
use eventsearch_core::engine::SearchEngine;
use eventsearch_elastic::ElasticsearchClient;
use eventsearch_store::sqlite_record_source::SqliteRecordSource;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // Initialize tracing subscriber.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    tracing::info!("Starting event search API server");

    let config = Config::from_env()?;

    let source = Arc::new(SqliteRecordSource::connect_lazy(&config.database_url)?);
    let engine: Arc<dyn SearchEngine> = Arc::new(ElasticsearchClient::new(&config.search_url)?);

    // Indices and the initial sync are in place before the listener binds.
    startup::prepare(
        source,
        engine.clone(),
        &config.events_index,
        &config.tickets_index,
    )
    .await?;

    let app = startup::build_router(AppState::new(engine, config.events_index));

    tracing::info!("Listening on {}", config.listen_addr);
    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;

    axum::serve(listener, app).await?;

    Ok(())
}
