//! Error taxonomy for the Sunbird client.
//!
//! Every service call returns `Result<T, ApiError>`. The refresh-and-retry
//! sequence inside the gateway makes a single expired access token
//! invisible to callers; only [`ApiError::SessionExpired`] carries a global
//! side effect (the session has already been cleared when it is returned).

use thiserror::Error;

use crate::storage::StorageError;

/// Errors surfaced by the client to its callers.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport failure (DNS, connect, timeout, body read).
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The response body did not match the expected shape.
    #[error("malformed response: {0}")]
    Parse(#[from] serde_json::Error),

    /// The request was rejected as unauthorized even after the retry,
    /// or was forbidden outright.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// The refresh call itself failed. The session has been cleared;
    /// the caller must send the user back to login.
    #[error("session expired, please log in again")]
    SessionExpired,

    /// Resource not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// Any other unsuccessful response. The message comes from the
    /// response envelope when present, otherwise a generic fallback.
    #[error("server error ({status}): {message}")]
    Server {
        /// HTTP status code.
        status: u16,
        /// Human-readable message.
        message: String,
    },

    /// Local precondition failure; the backend was never contacted.
    #[error("validation error: {0}")]
    Validation(String),

    /// The persisted session or cart could not be read or written.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

impl ApiError {
    /// Fallback message for responses without a usable envelope message.
    pub(crate) const GENERIC_SERVER_MESSAGE: &'static str = "request failed, please try again";
}
