//! Search engine abstraction.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::DomainError;

/// The subset of search engine operations the indexer relies on.
///
/// Implementations map transport failures to `DomainError::IndexUnavailable`
/// and request rejections to `DomainError::BadRequest`.
#[async_trait]
pub trait SearchEngine: Send + Sync {
    /// Returns `true` if the engine answers at all.
    async fn ping(&self) -> bool;

    /// Checks whether `index` exists.
    async fn index_exists(&self, index: &str) -> Result<bool, DomainError>;

    /// Creates `index` with the given mapping body.
    async fn create_index(&self, index: &str, mapping: &Value) -> Result<(), DomainError>;

    /// Creates or overwrites the document stored under `id`, returning the
    /// engine's raw result.
    async fn upsert(&self, index: &str, id: &str, document: &Value) -> Result<Value, DomainError>;

    /// Runs a query body against `index` and returns its hits in engine order.
    async fn search(&self, index: &str, body: &Value) -> Result<Vec<Value>, DomainError>;
}
