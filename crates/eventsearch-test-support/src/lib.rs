//! Shared test doubles for the event search indexer.

mod engine;
mod source;

pub use engine::{InMemorySearchEngine, UnreachableSearchEngine};
pub use source::{FailingRecordSource, FixedRecordSource};
