//! Event Search Core — shared abstractions.
//!
//! This crate defines the error taxonomy, the timestamp normalizer, and the
//! traits for the two external collaborators: the relational record source
//! and the search engine. It contains no infrastructure code.

pub mod engine;
pub mod error;
pub mod source;
pub mod timestamp;
