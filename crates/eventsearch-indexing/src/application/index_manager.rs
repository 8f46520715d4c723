//! Index schema manager.
//!
//! Creates an index with its mapping when it is missing. An existing index is
//! left untouched even if its mapping differs; changing the shape requires an
//! external reindex.

use eventsearch_core::engine::SearchEngine;
use eventsearch_core::error::DomainError;
use serde_json::Value;
use tracing::{info, instrument};

use crate::domain::mappings;

/// What `ensure_index` did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexOutcome {
    /// The index was missing and has been created.
    Created,
    /// The index already existed.
    AlreadyExists,
}

/// An index owned by this service.
#[derive(Debug, Clone)]
pub struct ManagedIndex {
    /// Index name.
    pub name: String,
    /// Mapping body used on creation.
    pub mapping: Value,
}

impl ManagedIndex {
    /// The events index under `name`.
    #[must_use]
    pub fn events(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            mapping: mappings::events_mapping(),
        }
    }

    /// The tickets index under `name`.
    #[must_use]
    pub fn tickets(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            mapping: mappings::tickets_mapping(),
        }
    }
}

/// Creates `name` with `mapping` unless it already exists.
///
/// # Errors
///
/// Returns `DomainError::IndexUnavailable` if the engine cannot be reached,
/// or the engine's error if creation is rejected.
#[instrument(skip(engine, mapping))]
pub async fn ensure_index(
    engine: &dyn SearchEngine,
    name: &str,
    mapping: &Value,
) -> Result<IndexOutcome, DomainError> {
    if engine.index_exists(name).await? {
        info!(index = name, "index already exists");
        return Ok(IndexOutcome::AlreadyExists);
    }

    engine.create_index(name, mapping).await?;
    info!(index = name, "created index");
    Ok(IndexOutcome::Created)
}

/// Runs `ensure_index` for every managed index, stopping at the first error.
///
/// # Errors
///
/// Returns the first error reported by `ensure_index`.
pub async fn ensure_indices(
    engine: &dyn SearchEngine,
    indices: &[ManagedIndex],
) -> Result<Vec<IndexOutcome>, DomainError> {
    let mut outcomes = Vec::with_capacity(indices.len());
    for index in indices {
        outcomes.push(ensure_index(engine, &index.name, &index.mapping).await?);
    }
    Ok(outcomes)
}
