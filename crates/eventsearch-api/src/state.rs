//! Shared application state.

use std::fmt;
use std::sync::Arc;

use eventsearch_core::engine::SearchEngine;

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Search engine client, shared by every request.
    pub engine: Arc<dyn SearchEngine>,
    /// Index queried when a search names no index.
    pub events_index: String,
}

impl AppState {
    /// Create new application state.
    #[must_use]
    pub fn new(engine: Arc<dyn SearchEngine>, events_index: impl Into<String>) -> Self {
        Self {
            engine,
            events_index: events_index.into(),
        }
    }
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("events_index", &self.events_index)
            .finish_non_exhaustive()
    }
}
