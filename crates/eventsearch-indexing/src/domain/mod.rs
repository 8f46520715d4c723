//! Domain layer for the Indexing context.

pub mod documents;
pub mod mapper;
pub mod mappings;
