#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! HTTP transport for the MOST data client
//!
//! [`HttpTransport`] implements [`Transport`] with a hyper client:
//! - TLS via rustls with webpki roots (HTTPS only unless opted out)
//! - Connection pooling
//! - Per-request timeout
//! - User-Agent header injection
//! - Transparent response decompression
//! - Shared default headers (`Authorization` and custom ones)
//!
//! There are no retries at this layer.
//!
//! # Example
//!
//! ```ignore
//! use most_http::{Authorization, HttpTransport, Transport};
//!
//! let transport = HttpTransport::new("https://example.com/api")?;
//! transport.set_authorization(Some(Authorization::bearer(token)))?;
//!
//! let users = transport.get("/Users/index.json?$top=10").await?;
//! ```

mod auth;
mod builder;
mod client;
mod config;
mod error;
mod transport;

pub use auth::{Authorization, SecretString};
pub use builder::HttpTransportBuilder;
pub use client::HttpTransport;
pub use config::{
    DEFAULT_BUFFER_CAPACITY, DEFAULT_MAX_BODY_SIZE, DEFAULT_USER_AGENT, HttpTransportConfig,
};
pub use error::HttpClientError;
pub use transport::{Method, Transport};
