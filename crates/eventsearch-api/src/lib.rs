//! Event Search API — HTTP surface and startup wiring.

pub mod config;
pub mod error;
pub mod routes;
pub mod startup;
pub mod state;
