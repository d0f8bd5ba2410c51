//! Error types for the operadoras API client.
//!
//! # Design
//! The taxonomy follows where a call can fail: the transport never reached
//! the backend (`Network`, `Timeout`), the backend answered with a non-2xx
//! status (`Http`, carrying the raw code and body), or the answer could not
//! be read as the expected payload (`Deserialization`). Nothing here is
//! recovered locally; every variant is handed back to the caller as-is.

use thiserror::Error;

/// Errors returned by request builders, transports and `parse_*` methods.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The round trip could not be completed (connection refused, DNS
    /// failure, malformed URL, broken stream).
    #[error("network error: {0}")]
    Network(String),

    /// The request exceeded the configured timeout.
    #[error("request timed out")]
    Timeout,

    /// The backend answered with a non-success status.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// The response body could not be deserialized into the expected payload.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// An item operation was called with an empty CNPJ.
    #[error("identifier must not be empty")]
    InvalidIdentifier,
}

impl ApiError {
    /// HTTP status carried by the error, if the backend answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}
