use crate::auth::Authorization;
use crate::builder::HttpTransportBuilder;
use crate::error::HttpClientError;
use crate::transport::{Method, Transport};
use async_trait::async_trait;
use bytes::Bytes;
use http::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use http::{HeaderMap, HeaderName, HeaderValue, Request, Response};
use http_body_util::{BodyExt, Full};
use parking_lot::RwLock;
use serde_json::Value;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use tower::buffer::Buffer;
use tower::{Service, ServiceExt};
use tracing::Instrument;

/// Boxed, possibly decompressed response body
pub type ResponseBody =
    http_body_util::combinators::BoxBody<Bytes, Box<dyn std::error::Error + Send + Sync>>;

pub type ServiceFuture =
    Pin<Box<dyn Future<Output = Result<Response<ResponseBody>, HttpClientError>> + Send>>;

pub type BufferedService = Buffer<Request<Full<Bytes>>, ServiceFuture>;

/// [`Transport`] over hyper with rustls.
///
/// `HttpTransport` is `Clone + Send + Sync`; clones share the connection pool
/// and the default headers, so an `Authorization` set through one clone is
/// sent by all of them.
///
/// A request goes to `base_url + path`. JSON bodies are sent with
/// `Content-Type: application/json`. A 2xx answer is decoded as JSON when it
/// is labelled as such (or not labelled at all); any other 2xx payload yields
/// an empty object.
#[derive(Clone)]
pub struct HttpTransport {
    pub(crate) service: BufferedService,
    pub(crate) base_url: Option<String>,
    pub(crate) allow_insecure_http: bool,
    pub(crate) max_body_size: usize,
    pub(crate) headers: Arc<RwLock<HeaderMap>>,
}

impl HttpTransport {
    /// Transport with default settings rooted at `base_url`.
    ///
    /// # Errors
    /// Returns an error if TLS initialization fails.
    pub fn new(base_url: impl Into<String>) -> Result<Self, HttpClientError> {
        HttpTransportBuilder::new().base_url(base_url).build()
    }

    #[must_use]
    pub fn builder() -> HttpTransportBuilder {
        HttpTransportBuilder::new()
    }

    #[must_use]
    pub fn base_url(&self) -> Option<&str> {
        self.base_url.as_deref()
    }

    /// Add a header sent with every request, replacing any previous value.
    ///
    /// # Errors
    /// Returns `HttpClientError::InvalidHeader` for an invalid name or value.
    pub fn set_header(&self, name: &str, value: &str) -> Result<(), HttpClientError> {
        let name = HeaderName::try_from(name)?;
        let value = HeaderValue::try_from(value)?;
        self.headers.write().insert(name, value);
        Ok(())
    }

    pub fn remove_header(&self, name: &str) {
        if let Ok(name) = HeaderName::try_from(name) {
            self.headers.write().remove(name);
        }
    }

    /// Snapshot of the default headers.
    #[must_use]
    pub fn headers(&self) -> HeaderMap {
        self.headers.read().clone()
    }

    pub fn clear_authorization(&self) {
        self.headers.write().remove(AUTHORIZATION);
    }

    fn resolve_url(&self, path: &str) -> Result<http::Uri, HttpClientError> {
        let base = self
            .base_url
            .as_deref()
            .filter(|b| !b.is_empty())
            .ok_or(HttpClientError::MissingBaseUrl)?;

        // One slash at the seam, so "http://host/api/" + "/Users" stays well formed
        let raw = if base.ends_with('/') && path.starts_with('/') {
            format!("{}{path}", base.trim_end_matches('/'))
        } else {
            format!("{base}{path}")
        };

        let invalid = |reason: String| HttpClientError::InvalidUrl {
            url: raw.clone(),
            reason,
        };

        // url::Url percent-encodes the query ($filter values carry spaces and quotes)
        let url = url::Url::parse(&raw).map_err(|e| invalid(e.to_string()))?;
        match url.scheme() {
            "https" => {}
            "http" if self.allow_insecure_http => {}
            "http" => return Err(invalid("HTTPS required".to_owned())),
            other => return Err(invalid(format!("unsupported scheme '{other}'"))),
        }

        url.as_str()
            .parse::<http::Uri>()
            .map_err(|e| invalid(e.to_string()))
    }

    async fn send(&self, request: Request<Full<Bytes>>) -> Result<Value, HttpClientError> {
        let mut service = self.service.clone();
        let response = service
            .ready()
            .await
            .map_err(map_buffer_error)?
            .call(request)
            .await
            .map_err(map_buffer_error)?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "data service returned an error status");
            return Err(HttpClientError::from_status(status));
        }

        let is_json = response
            .headers()
            .get(CONTENT_TYPE)
            .is_none_or(|ct| ct.to_str().is_ok_and(|ct| ct.contains("application/json")));

        let bytes = read_body_limited(response, self.max_body_size).await?;
        tracing::debug!(status = status.as_u16(), bytes = bytes.len(), "response received");

        if !is_json {
            return Ok(Value::Object(serde_json::Map::new()));
        }
        if bytes.is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn execute(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<Value, HttpClientError> {
        let span = tracing::debug_span!("data_request", method = method.as_str(), path);

        let uri = self.resolve_url(path)?;
        let mut builder = Request::builder()
            .method(http::Method::from(method))
            .uri(uri)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json");
        for (name, value) in &self.headers() {
            builder = builder.header(name, value);
        }

        let body = match body {
            Some(value) => Bytes::from(serde_json::to_vec(value)?),
            None => Bytes::new(),
        };
        let request = builder.body(Full::new(body))?;

        self.send(request).instrument(span).await
    }

    fn set_authorization(
        &self,
        authorization: Option<Authorization>,
    ) -> Result<(), HttpClientError> {
        match authorization {
            Some(auth) => {
                let value = auth.header_value()?;
                self.headers.write().insert(AUTHORIZATION, value);
            }
            None => self.clear_authorization(),
        }
        Ok(())
    }
}

impl std::fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTransport")
            .field("base_url", &self.base_url)
            .field("allow_insecure_http", &self.allow_insecure_http)
            .field("max_body_size", &self.max_body_size)
            .finish_non_exhaustive()
    }
}

fn map_buffer_error(err: tower::BoxError) -> HttpClientError {
    match err.downcast::<HttpClientError>() {
        Ok(e) => *e,
        Err(err) => {
            tracing::error!(error = %err, "buffer worker closed unexpectedly");
            HttpClientError::ServiceClosed
        }
    }
}

/// Read the whole body, failing once more than `limit` decoded bytes arrive.
async fn read_body_limited(
    response: Response<ResponseBody>,
    limit: usize,
) -> Result<Bytes, HttpClientError> {
    let mut body = std::pin::pin!(response.into_body());
    let mut collected = Vec::new();

    while let Some(frame) = body.frame().await {
        let frame = frame.map_err(HttpClientError::Transport)?;
        if let Some(chunk) = frame.data_ref() {
            if collected.len() + chunk.len() > limit {
                return Err(HttpClientError::BodyTooLarge {
                    limit,
                    actual: collected.len() + chunk.len(),
                });
            }
            collected.extend_from_slice(chunk);
        }
    }

    Ok(Bytes::from(collected))
}
