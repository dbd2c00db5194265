use most_http::HttpClientError;
use thiserror::Error;

/// Errors surfaced by the client facade.
///
/// Query-building failures and transport failures stay distinct so callers
/// can tell a malformed chain from an unreachable service.
#[derive(Error, Debug)]
pub enum ClientError {
    /// The query chain was invalid; nothing was sent.
    #[error(transparent)]
    Query(#[from] most_odata::Error),

    #[error(transparent)]
    Transport(#[from] HttpClientError),

    #[error("configuration error: {0}")]
    Config(#[from] Box<figment::Error>),

    /// The response did not match the requested type.
    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl From<figment::Error> for ClientError {
    fn from(err: figment::Error) -> Self {
        ClientError::Config(Box::new(err))
    }
}

impl ClientError {
    /// Status code in the `[code] message` convention of the data service:
    /// the server status for HTTP failures, `500` for other transport
    /// failures, `None` for failures raised before anything was sent.
    #[must_use]
    pub fn status_code(&self) -> Option<u16> {
        match self {
            ClientError::Transport(e) => Some(e.status_code()),
            ClientError::Query(_) | ClientError::Config(_) | ClientError::Decode(_) => None,
        }
    }
}
