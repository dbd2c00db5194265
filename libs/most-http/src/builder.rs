use crate::client::{BufferedService, HttpTransport, ResponseBody};
use crate::config::HttpTransportConfig;
use crate::error::HttpClientError;
use bytes::Bytes;
use http::header::USER_AGENT;
use http::{HeaderMap, HeaderValue, Response};
use http_body_util::{BodyExt, Full};
use hyper_rustls::HttpsConnector;
use hyper_util::client::legacy::Client;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::rt::{TokioExecutor, TokioTimer};
use parking_lot::RwLock;
use std::sync::Arc;
use std::time::Duration;
use tower::buffer::Buffer;
use tower::timeout::TimeoutLayer;
use tower::{ServiceBuilder, ServiceExt};
use tower_http::decompression::DecompressionLayer;
use tower_http::set_header::SetRequestHeaderLayer;

/// Builder for an [`HttpTransport`].
///
/// ```ignore
/// let transport = HttpTransport::builder()
///     .base_url("https://example.com/api")
///     .timeout(Duration::from_secs(10))
///     .build()?;
/// ```
#[derive(Clone, Debug, Default)]
pub struct HttpTransportBuilder {
    config: HttpTransportConfig,
}

impl HttpTransportBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_config(config: HttpTransportConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.config.base_url = Some(base_url.into());
        self
    }

    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.request_timeout = timeout;
        self
    }

    #[must_use]
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    #[must_use]
    pub fn max_body_size(mut self, size: usize) -> Self {
        self.config.max_body_size = size;
        self
    }

    /// Accept `http://` base URLs.
    #[must_use]
    pub fn allow_insecure_http(mut self) -> Self {
        self.config.allow_insecure_http = true;
        self
    }

    /// Requests queued in front of the service. Clamped to at least 1.
    #[must_use]
    pub fn buffer_capacity(mut self, capacity: usize) -> Self {
        self.config.buffer_capacity = capacity.max(1);
        self
    }

    /// Build the transport. Must be called inside a tokio runtime: the
    /// request buffer spawns its worker task here.
    ///
    /// # Errors
    /// Returns an error if TLS initialization fails or the user agent is not a
    /// valid header value.
    pub fn build(self) -> Result<HttpTransport, HttpClientError> {
        if self.config.allow_insecure_http {
            tracing::warn!("insecure HTTP enabled; use only for testing with mock servers");
        }

        let timeout = self.config.request_timeout;
        let https = build_https_connector(self.config.allow_insecure_http)?;

        let mut client_builder = Client::builder(TokioExecutor::new());
        // pool_timer drives idle connection expiry
        client_builder.pool_timer(TokioTimer::new());
        let hyper_client = client_builder.build::<_, Full<Bytes>>(https);

        let user_agent = HeaderValue::from_str(&self.config.user_agent)?;

        // Request flow: Buffer → ErrorMapping → Timeout → UserAgent → Decompression → hyper
        let service = ServiceBuilder::new()
            .layer(TimeoutLayer::new(timeout))
            .layer(SetRequestHeaderLayer::if_not_present(USER_AGENT, user_agent))
            .layer(DecompressionLayer::new())
            .service(hyper_client)
            .map_response(box_response_body)
            .map_err(move |e: tower::BoxError| map_tower_error(e, timeout));

        let service: BufferedService =
            Buffer::new(service.boxed_clone(), self.config.buffer_capacity.max(1));

        Ok(HttpTransport {
            service,
            base_url: self.config.base_url,
            allow_insecure_http: self.config.allow_insecure_http,
            max_body_size: self.config.max_body_size,
            headers: Arc::new(RwLock::new(HeaderMap::new())),
        })
    }
}

fn map_tower_error(err: tower::BoxError, timeout: Duration) -> HttpClientError {
    if err.is::<tower::timeout::error::Elapsed>() {
        return HttpClientError::Timeout(timeout);
    }
    match err.downcast::<HttpClientError>() {
        Ok(e) => *e,
        Err(other) => HttpClientError::Transport(other),
    }
}

fn box_response_body<B>(response: Response<B>) -> Response<ResponseBody>
where
    B: hyper::body::Body<Data = Bytes> + Send + Sync + 'static,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let (parts, body) = response.into_parts();
    Response::from_parts(parts, body.map_err(Into::into).boxed())
}

fn build_https_connector(
    allow_http: bool,
) -> Result<HttpsConnector<HttpConnector>, HttpClientError> {
    let provider = rustls::crypto::CryptoProvider::get_default()
        .cloned()
        .unwrap_or_else(|| Arc::new(rustls::crypto::aws_lc_rs::default_provider()));
    let builder = hyper_rustls::HttpsConnectorBuilder::new()
        .with_provider_and_webpki_roots(provider)
        .map_err(|e| HttpClientError::Tls(Box::new(e)))?;
    let connector = if allow_http {
        builder.https_or_http().enable_all_versions().build()
    } else {
        builder.https_only().enable_all_versions().build()
    };
    Ok(connector)
}
