//! Application layer for the Indexing context.

pub mod index_manager;
pub mod search;
pub mod sync;
