//! Event Search — Indexing bounded context.
//!
//! Responsible for shaping relational rows into search documents, keeping
//! the search engine's indices in place, running full-refresh syncs, and
//! answering keyword searches.

pub mod application;
pub mod domain;
