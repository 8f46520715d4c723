//! Event Search Elastic — `SearchEngine` over the Elasticsearch REST API.

pub mod client;

pub use client::ElasticsearchClient;
