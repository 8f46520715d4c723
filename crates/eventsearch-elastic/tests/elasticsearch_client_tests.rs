//! Integration tests for `ElasticsearchClient` against a mock HTTP server.

use eventsearch_core::engine::SearchEngine;
use eventsearch_core::error::DomainError;
use eventsearch_elastic::ElasticsearchClient;
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> ElasticsearchClient {
    ElasticsearchClient::new(&server.uri()).unwrap()
}

// --- ping ---

#[tokio::test]
async fn test_ping_is_true_when_root_answers() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "tagline": "You Know, for Search" })),
        )
        .mount(&server)
        .await;

    assert!(client_for(&server).ping().await);
}

#[tokio::test]
async fn test_ping_is_false_when_nothing_listens() {
    let port = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port();
    let client = ElasticsearchClient::new(&format!("http://127.0.0.1:{port}")).unwrap();

    assert!(!client.ping().await);
}

// --- index_exists / create_index ---

#[tokio::test]
async fn test_index_exists_maps_404_to_false() {
    let server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .and(path("/events"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let exists = client_for(&server).index_exists("events").await.unwrap();

    assert!(!exists);
}

#[tokio::test]
async fn test_index_exists_maps_200_to_true() {
    let server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .and(path("/events"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let exists = client_for(&server).index_exists("events").await.unwrap();

    assert!(exists);
}

#[tokio::test]
async fn test_create_index_puts_mapping_body() {
    let server = MockServer::start().await;
    let mapping = json!({ "mappings": { "properties": { "name": { "type": "text" } } } });
    Mock::given(method("PUT"))
        .and(path("/events"))
        .and(body_json(&mapping))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "acknowledged": true })))
        .expect(1)
        .mount(&server)
        .await;

    client_for(&server)
        .create_index("events", &mapping)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_create_index_conflict_is_bad_request() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/events"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": {
                "type": "resource_already_exists_exception",
                "reason": "index [events/abc] already exists"
            },
            "status": 400
        })))
        .mount(&server)
        .await;

    let result = client_for(&server)
        .create_index("events", &json!({}))
        .await;

    match result {
        Err(DomainError::BadRequest(reason)) => assert!(reason.contains("already exists")),
        other => panic!("expected BadRequest, got {other:?}"),
    }
}

// --- upsert ---

#[tokio::test]
async fn test_upsert_puts_document_under_id_and_returns_raw_result() {
    let server = MockServer::start().await;
    let document = json!({ "event_id": 1, "name": "Concert" });
    Mock::given(method("PUT"))
        .and(path("/events/_doc/1"))
        .and(body_json(&document))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "_index": "events",
            "_id": "1",
            "result": "created"
        })))
        .mount(&server)
        .await;

    let result = client_for(&server)
        .upsert("events", "1", &document)
        .await
        .unwrap();

    assert_eq!(result["result"], "created");
}

#[tokio::test]
async fn test_upsert_server_error_is_infrastructure() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/events/_doc/1"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let result = client_for(&server)
        .upsert("events", "1", &json!({}))
        .await;

    assert!(matches!(result, Err(DomainError::Infrastructure(_))));
}

#[tokio::test]
async fn test_unavailable_cluster_is_index_unavailable() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/events/_doc/1"))
        .respond_with(ResponseTemplate::new(503).set_body_json(json!({
            "error": { "reason": "cluster_block_exception" }
        })))
        .mount(&server)
        .await;

    let result = client_for(&server)
        .upsert("events", "1", &json!({}))
        .await;

    assert!(matches!(result, Err(DomainError::IndexUnavailable(_))));
}

#[tokio::test]
async fn test_throttled_upsert_is_index_unavailable() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/events/_doc/1"))
        .respond_with(ResponseTemplate::new(429).set_body_json(json!({
            "error": { "reason": "es_rejected_execution_exception" }
        })))
        .mount(&server)
        .await;

    let result = client_for(&server)
        .upsert("events", "1", &json!({}))
        .await;

    assert!(matches!(
        result,
        Err(DomainError::IndexUnavailable(reason)) if reason == "es_rejected_execution_exception"
    ));
}

// --- search ---

#[tokio::test]
async fn test_search_returns_hits_in_engine_order() {
    let server = MockServer::start().await;
    let query = json!({ "query": { "match": { "name": "Concert" } } });
    Mock::given(method("POST"))
        .and(path("/events/_search"))
        .and(body_json(&query))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "hits": {
                "total": { "value": 2 },
                "hits": [
                    { "_id": "2", "_score": 2.0, "_source": { "event_id": 2 } },
                    { "_id": "1", "_score": 1.0, "_source": { "event_id": 1 } }
                ]
            }
        })))
        .mount(&server)
        .await;

    let hits = client_for(&server)
        .search("events", &query)
        .await
        .unwrap();

    assert_eq!(hits.len(), 2);
    assert_eq!(hits[0]["_id"], "2");
    assert_eq!(hits[1]["_id"], "1");
}

#[tokio::test]
async fn test_search_rejected_query_is_bad_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/events/_search"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": { "type": "search_phase_execution_exception", "reason": "all shards failed" }
        })))
        .mount(&server)
        .await;

    let result = client_for(&server)
        .search("events", &json!({ "query": { "match": { "capacity": "many" } } }))
        .await;

    match result {
        Err(DomainError::BadRequest(reason)) => assert_eq!(reason, "all shards failed"),
        other => panic!("expected BadRequest, got {other:?}"),
    }
}
