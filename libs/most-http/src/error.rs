use std::time::Duration;
use thiserror::Error;

/// Transport failure
///
/// Every variant maps onto an HTTP-like status code through
/// [`status_code`](HttpClientError::status_code): the server status for
/// [`HttpClientError::Status`], `500` for everything raised on the client side.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum HttpClientError {
    /// The service answered with a non-2xx status
    #[error("[{}] {message}", .status.as_u16())]
    Status {
        status: http::StatusCode,
        /// Canonical reason phrase of `status`
        message: String,
    },

    /// Network or connection failure
    #[error("Transport error: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Target application base URL cannot be empty at this context.")]
    MissingBaseUrl,

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Response body too large: limit {limit} bytes, got at least {actual} bytes")]
    BodyTooLarge { limit: usize, actual: usize },

    #[error("Invalid header: {0}")]
    InvalidHeader(String),

    #[error("TLS error: {0}")]
    Tls(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The buffer worker stopped (runtime shut down or worker panicked)
    #[error("Service unavailable: internal failure")]
    ServiceClosed,
}

impl HttpClientError {
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            HttpClientError::Status { status, .. } => status.as_u16(),
            _ => 500,
        }
    }

    pub(crate) fn from_status(status: http::StatusCode) -> Self {
        HttpClientError::Status {
            status,
            message: status
                .canonical_reason()
                .unwrap_or("Unknown Status")
                .to_owned(),
        }
    }
}

impl From<http::header::InvalidHeaderName> for HttpClientError {
    fn from(err: http::header::InvalidHeaderName) -> Self {
        HttpClientError::InvalidHeader(err.to_string())
    }
}

impl From<http::header::InvalidHeaderValue> for HttpClientError {
    fn from(err: http::header::InvalidHeaderValue) -> Self {
        HttpClientError::InvalidHeader(err.to_string())
    }
}

impl From<http::Error> for HttpClientError {
    fn from(err: http::Error) -> Self {
        HttpClientError::Transport(Box::new(err))
    }
}
