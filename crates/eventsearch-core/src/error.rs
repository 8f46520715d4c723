//! Domain error types.

use thiserror::Error;

/// Top-level domain error type.
#[derive(Debug, Error)]
pub enum DomainError {
    /// A timestamp string matched none of the accepted formats.
    #[error("timestamp {value:?} matches no accepted format")]
    FormatMismatch {
        /// The raw value that failed to parse.
        value: String,
    },

    /// The search engine could not be reached.
    #[error("search engine unavailable: {0}")]
    IndexUnavailable(String),

    /// The search engine rejected the request parameters.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// The relational store could not be reached or a read failed.
    #[error("storage unavailable: {0}")]
    StorageUnavailable(String),

    /// A sync of the same document type is already running.
    #[error("sync already in progress")]
    SyncInProgress,

    /// Any other infrastructure failure.
    #[error("infrastructure error: {0}")]
    Infrastructure(String),
}

impl DomainError {
    /// Returns `true` for errors that only affect a single source row or
    /// document. A sync skips and reports such rows; any other error aborts
    /// the run.
    #[must_use]
    pub fn is_row_scoped(&self) -> bool {
        matches!(self, Self::FormatMismatch { .. } | Self::BadRequest(_))
    }
}
