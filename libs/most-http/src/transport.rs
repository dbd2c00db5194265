use async_trait::async_trait;
use serde_json::Value;

use crate::auth::Authorization;
use crate::error::HttpClientError;

/// Request methods the data service understands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }
}

impl From<Method> for http::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => http::Method::GET,
            Method::Post => http::Method::POST,
            Method::Put => http::Method::PUT,
            Method::Delete => http::Method::DELETE,
        }
    }
}

/// Executes requests against a data service rooted at some base URL.
///
/// `path` is relative to that base and already carries any query string.
/// Successful responses come back as dynamic JSON.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send one request.
    ///
    /// # Errors
    /// Returns `HttpClientError::Status` for non-2xx answers and the other
    /// variants for failures raised before a status was received.
    async fn execute(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<Value, HttpClientError>;

    /// Replace (or with `None` remove) the `Authorization` header sent with
    /// every later request.
    ///
    /// # Errors
    /// Returns `HttpClientError::InvalidHeader` if the credential cannot be
    /// sent as a header.
    fn set_authorization(&self, authorization: Option<Authorization>)
    -> Result<(), HttpClientError>;

    /// # Errors
    /// See [`execute`](Transport::execute).
    async fn get(&self, path: &str) -> Result<Value, HttpClientError> {
        self.execute(Method::Get, path, None).await
    }

    /// # Errors
    /// See [`execute`](Transport::execute).
    async fn post(&self, path: &str, body: &Value) -> Result<Value, HttpClientError> {
        self.execute(Method::Post, path, Some(body)).await
    }

    /// # Errors
    /// See [`execute`](Transport::execute).
    async fn put(&self, path: &str, body: &Value) -> Result<Value, HttpClientError> {
        self.execute(Method::Put, path, Some(body)).await
    }

    /// `DELETE` with an optional body describing what to remove.
    ///
    /// # Errors
    /// See [`execute`](Transport::execute).
    async fn remove(&self, path: &str, body: Option<&Value>) -> Result<Value, HttpClientError> {
        self.execute(Method::Delete, path, body).await
    }
}
