//! Index mapping bodies.
//!
//! `schedules` and `schedules.artists` are `nested` so that a query on a
//! schedule and one of its artists cannot match across different schedules
//! of the same event.

use serde_json::{Value, json};

/// Mapping for the events index.
#[must_use]
pub fn events_mapping() -> Value {
    json!({
        "mappings": {
            "properties": {
                "event_id": { "type": "integer" },
                "name": { "type": "text", "fielddata": true },
                "description": { "type": "text", "fielddata": true },
                "category": { "type": "keyword" },
                "ticket_open_time": { "type": "date" },
                "running_time": { "type": "integer" },
                "venue": {
                    "properties": {
                        "venue_id": { "type": "integer" },
                        "name": { "type": "text", "fielddata": true },
                        "location": { "type": "text", "fielddata": true }
                    }
                },
                "sub_venue": {
                    "properties": {
                        "sub_venue_id": { "type": "integer" },
                        "name": { "type": "text", "fielddata": true },
                        "capacity": { "type": "integer" }
                    }
                },
                "schedules": {
                    "type": "nested",
                    "properties": {
                        "schedule_id": { "type": "integer" },
                        "start_time": { "type": "date" },
                        "end_time": { "type": "date" },
                        "artists": {
                            "type": "nested",
                            "properties": {
                                "artist_id": { "type": "integer" },
                                "name": { "type": "text", "fielddata": true },
                                "company_name": { "type": "text", "fielddata": true }
                            }
                        }
                    }
                }
            }
        }
    })
}

/// Mapping for the tickets index.
#[must_use]
pub fn tickets_mapping() -> Value {
    json!({
        "mappings": {
            "properties": {
                "ticket_id": { "type": "integer" },
                "book_date": { "type": "date" },
                "user": {
                    "properties": {
                        "user_id": { "type": "integer" },
                        "name": { "type": "text", "fielddata": true },
                        "email": { "type": "keyword" }
                    }
                },
                "event_schedule": {
                    "properties": {
                        "schedule_id": { "type": "integer" },
                        "event_name": { "type": "text", "fielddata": true },
                        "event_category": { "type": "keyword" }
                    }
                },
                "seat": {
                    "properties": {
                        "class": { "type": "keyword" },
                        "price": { "type": "float" },
                        "row_number": { "type": "integer" },
                        "column_number": { "type": "integer" }
                    }
                }
            }
        }
    })
}
