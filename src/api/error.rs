//! Error type shared by every API operation.
//!
//! `Display` is the human-readable message a caller shows to the user:
//! the server's `msg`, an operation-specific fallback, or `HTTP <status>`.

use thiserror::Error;

/// Fixed message for uploads rejected with HTTP 413.
pub const PAYLOAD_TOO_LARGE_MESSAGE: &str = "文件过大，超过10GB限制";

#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never completed (connection refused, DNS, TLS, timeout).
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Non-success status without a usable envelope, or a success status
    /// whose body was not an envelope at all.
    #[error("HTTP {0}")]
    Status(u16),

    /// Domain failure reported through the envelope.
    #[error("{message}")]
    Api { code: Option<i64>, message: String },

    /// Upload rejected by the server or a proxy as too large.
    #[error("{}", PAYLOAD_TOO_LARGE_MESSAGE)]
    PayloadTooLarge,

    /// Reading an upload source or writing a download target failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Envelope `data` did not match the declared shape, or a request body
    /// could not be encoded.
    #[error("invalid JSON payload: {0}")]
    Json(#[from] serde_json::Error),
}

impl ApiError {
    /// Envelope code carried by a domain failure, if any.
    pub fn code(&self) -> Option<i64> {
        match self {
            ApiError::Api { code, .. } => *code,
            _ => None,
        }
    }

    /// The backend could not be reached, or a gateway in front of it
    /// failed without an envelope. Says nothing about the request itself.
    pub fn is_unreachable(&self) -> bool {
        match self {
            ApiError::Network(_) => true,
            ApiError::Status(status) => *status >= 500,
            _ => false,
        }
    }
}
