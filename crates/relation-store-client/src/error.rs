//! Error types for store HTTP calls.

use optimistic_toggle_core::PersistError;
use thiserror::Error;

/// Error type for all client operations.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Network or transport-level HTTP error from reqwest.
    ///
    /// Includes connection failures, timeouts, and TLS errors.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The store returned a non-success HTTP status.
    #[error("Store error: {status} - {message}")]
    Rejected { status: u16, message: String },

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Bad origin, unusable base path, and similar setup problems.
    #[error("Configuration error: {0}")]
    Config(String),
}

pub type ClientResult<T> = Result<T, ClientError>;

impl From<ClientError> for PersistError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Http(e) => PersistError::Network(e.to_string()),
            ClientError::Rejected { status, message } => PersistError::Rejected { status, message },
            other => PersistError::InvalidRequest(other.to_string()),
        }
    }
}
