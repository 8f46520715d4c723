//! Configuration read from the environment.

use std::net::SocketAddr;

use crate::error::AppError;

/// Server configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// `SQLite` URL of the relational source (`DATABASE_URL`, required).
    pub database_url: String,
    /// Base URL of the search engine (`SEARCH_URL`).
    pub search_url: String,
    /// Name of the events index (`EVENTS_INDEX`).
    pub events_index: String,
    /// Name of the tickets index (`TICKETS_INDEX`).
    pub tickets_index: String,
    /// Address to listen on (`HOST` and `PORT`).
    pub listen_addr: SocketAddr,
}

impl Config {
    /// Reads configuration from process environment variables.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if `DATABASE_URL` is missing or
    /// `HOST`/`PORT` do not form a valid socket address.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads configuration through `lookup`, which returns the value of a
    /// variable if it is set.
    ///
    /// # Errors
    ///
    /// See [`Config::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let var_or =
            |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let database_url = lookup("DATABASE_URL").ok_or_else(|| {
            AppError::Config("DATABASE_URL environment variable must be set".into())
        })?;
        let host = var_or("HOST", "0.0.0.0");
        let port: u16 = var_or("PORT", "3000")
            .parse()
            .map_err(|e| AppError::Config(format!("PORT must be a valid u16: {e}")))?;
        let listen_addr: SocketAddr = format!("{host}:{port}")
            .parse()
            .map_err(|e| AppError::Config(format!("invalid HOST:PORT combination: {e}")))?;

        Ok(Self {
            database_url,
            search_url: var_or("SEARCH_URL", "http://localhost:9200"),
            events_index: var_or("EVENTS_INDEX", "events"),
            tickets_index: var_or("TICKETS_INDEX", "tickets"),
            listen_addr,
        })
    }
}
