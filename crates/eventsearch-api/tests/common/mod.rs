//! Shared test helpers for API integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use eventsearch_api::startup;
use eventsearch_api::state::AppState;
use eventsearch_core::engine::SearchEngine;
use eventsearch_store::sqlite_record_source::SqliteRecordSource;
use eventsearch_test_support::InMemorySearchEngine;
use http_body_util::BodyExt;
use sqlx::SqlitePool;
use tower::ServiceExt;

/// Source rows for one event with a venue-backed schedule, one artist, and
/// one booked ticket.
pub async fn seed_concert(pool: &SqlitePool) {
    sqlx::raw_sql(
        r#"
        INSERT INTO Venue (id, name, location) VALUES (1, 'Arts Center', 'Seoul');
        INSERT INTO SubVenue (id, venue_id, name, capacity) VALUES (3, 1, 'Hall A', 500);
        INSERT INTO Event (id, name, description, category, ticket_open_time, running_time)
            VALUES (1, 'Concert', 'Spring gala', 'music', '2024-05-01T10:00:00.000000Z', 120),
                   (2, 'Lecture', NULL, 'talk', '2024-05-02', NULL);
        INSERT INTO EventSchedule (id, event_id, sub_venue_id, start_time, end_time)
            VALUES (10, 1, 3, '2024-05-01T18:00:00.000000', '2024-05-01T20:00:00.000000');
        INSERT INTO Artist (id, event_schedule_id, name, company_name)
            VALUES (100, 10, 'Quartet', 'Label');
        INSERT INTO "User" (id, name, email) VALUES (7, 'Min', 'min@example.com');
        INSERT INTO SeatSection (id, class, price, row_number, column_number)
            VALUES (1, 'VIP', 150, 3, 12);
        INSERT INTO Ticket (id, user_id, event_schedule_id, section_id, book_date)
            VALUES (42, 7, 10, 1, '2024-04-20 12:30:00');
        "#,
    )
    .execute(pool)
    .await
    .unwrap();
}

/// Runs the startup sequence against `pool` into a fresh in-memory engine.
pub async fn prepare_engine(pool: SqlitePool) -> Arc<InMemorySearchEngine> {
    let engine = Arc::new(InMemorySearchEngine::new());
    startup::prepare(
        Arc::new(SqliteRecordSource::new(pool)),
        engine.clone(),
        "events",
        "tickets",
    )
    .await
    .unwrap();
    engine
}

/// Build the full app router over `engine`. Uses the same route structure as
/// `main.rs`.
pub fn build_test_app(engine: Arc<dyn SearchEngine>) -> Router {
    startup::build_router(AppState::new(engine, "events"))
}

/// Seed `pool`, run startup, and build the app over the synced engine.
pub async fn build_synced_app(pool: SqlitePool) -> (Router, Arc<InMemorySearchEngine>) {
    seed_concert(&pool).await;
    let engine = prepare_engine(pool).await;
    (build_test_app(engine.clone()), engine)
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value =
        serde_json::from_slice(&body_bytes).unwrap_or(serde_json::Value::Null);

    (status, json)
}

/// Send a GET request and return the response.
pub async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    send(app, request).await
}

/// Send a POST request without a body and return the response.
pub async fn post(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    send(app, request).await
}
