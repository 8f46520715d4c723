//! Query gateway.
//!
//! Read-only keyword search plus the ad-hoc single-document write used by
//! the index endpoint.

use eventsearch_core::engine::SearchEngine;
use eventsearch_core::error::DomainError;
use serde_json::{Map, Value, json};
use tracing::{debug, instrument};

/// Builds a single match query on `field`.
#[must_use]
pub fn match_query(field: &str, query: &str, size: Option<u32>) -> Value {
    let mut clause = Map::new();
    clause.insert(field.to_owned(), Value::String(query.to_owned()));

    let mut body = json!({ "query": { "match": clause } });
    if let Some(size) = size {
        body["size"] = json!(size);
    }
    body
}

/// Searches `index` for `query` in `field`, returning hits in engine order.
///
/// # Errors
///
/// Returns `DomainError::IndexUnavailable` if the engine does not answer a
/// ping, or `DomainError::BadRequest` if the engine rejects the query.
#[instrument(skip(engine))]
pub async fn search(
    engine: &dyn SearchEngine,
    index: &str,
    field: &str,
    query: &str,
    size: Option<u32>,
) -> Result<Vec<Value>, DomainError> {
    if !engine.ping().await {
        return Err(DomainError::IndexUnavailable(
            "search engine did not respond to ping".into(),
        ));
    }

    let hits = engine
        .search(index, &match_query(field, query, size))
        .await?;
    debug!(hits = hits.len(), "search completed");
    Ok(hits)
}

/// Stores `{"content": content}` under `doc_id` and returns the engine's raw
/// result.
///
/// # Errors
///
/// Returns the engine's error if the write fails.
#[instrument(skip(engine, content))]
pub async fn index_document(
    engine: &dyn SearchEngine,
    index: &str,
    doc_id: &str,
    content: &str,
) -> Result<Value, DomainError> {
    engine
        .upsert(index, doc_id, &json!({ "content": content }))
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::sync::sync_events;
    use eventsearch_core::source::{EventBatch, EventRow, ScheduleRow};
    use eventsearch_core::timestamp::TimestampNormalizer;
    use eventsearch_test_support::{
        FixedRecordSource, InMemorySearchEngine, UnreachableSearchEngine,
    };

    async fn engine_with_concert() -> InMemorySearchEngine {
        let batch = EventBatch {
            events: vec![
                EventRow {
                    id: 1,
                    name: "Concert".into(),
                    description: None,
                    category: None,
                    ticket_open_time: "2024-05-01T10:00:00.000000Z".into(),
                    running_time: None,
                },
                EventRow {
                    id: 2,
                    name: "Lecture".into(),
                    description: None,
                    category: None,
                    ticket_open_time: "2024-05-02".into(),
                    running_time: None,
                },
            ],
            schedules: vec![ScheduleRow {
                id: 10,
                event_id: 1,
                start_time: "2024-05-01T18:00:00.000000".into(),
                end_time: "2024-05-01T20:00:00.000000".into(),
                sub_venue_id: None,
                sub_venue_name: None,
                capacity: None,
                venue_id: None,
                venue_name: None,
                location: None,
            }],
            artists: vec![],
        };
        let engine = InMemorySearchEngine::new();
        sync_events(
            &FixedRecordSource::with_events(batch),
            &engine,
            "events",
            &TimestampNormalizer::default(),
        )
        .await
        .unwrap();
        engine
    }

    #[test]
    fn test_match_query_shape() {
        assert_eq!(
            match_query("name", "Concert", Some(5)),
            json!({ "query": { "match": { "name": "Concert" } }, "size": 5 })
        );
        assert_eq!(
            match_query("venue.location", "Seoul", None),
            json!({ "query": { "match": { "venue.location": "Seoul" } } })
        );
    }

    #[tokio::test]
    async fn test_search_finds_synced_event_by_name() {
        // Arrange
        let engine = engine_with_concert().await;

        // Act
        let hits = search(&engine, "events", "name", "Concert", None)
            .await
            .unwrap();

        // Assert
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0]["_source"]["event_id"], 1);
    }

    #[tokio::test]
    async fn test_search_respects_size() {
        let engine = engine_with_concert().await;

        let all = search(&engine, "events", "name", "concert lecture", None)
            .await
            .unwrap();
        let limited = search(&engine, "events", "name", "concert lecture", Some(1))
            .await
            .unwrap();

        assert_eq!(all.len(), 2);
        assert_eq!(limited.len(), 1);
    }

    #[tokio::test]
    async fn test_search_unreachable_engine_is_index_unavailable() {
        let result = search(&UnreachableSearchEngine, "events", "name", "Concert", None).await;

        assert!(matches!(result, Err(DomainError::IndexUnavailable(_))));
    }

    #[tokio::test]
    async fn test_search_unknown_index_is_bad_request() {
        let engine = InMemorySearchEngine::new();

        let result = search(&engine, "missing", "name", "Concert", None).await;

        assert!(matches!(result, Err(DomainError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_index_document_wraps_content() {
        // Arrange
        let engine = InMemorySearchEngine::new();

        // Act
        let result = index_document(&engine, "notes", "abc", "hello world")
            .await
            .unwrap();

        // Assert
        assert_eq!(result["result"], "created");
        assert_eq!(
            engine.document("notes", "abc"),
            Some(json!({ "content": "hello world" }))
        );
    }
}
