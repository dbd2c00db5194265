use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default User-Agent header value
pub const DEFAULT_USER_AGENT: &str = concat!("most-http/", env!("CARGO_PKG_VERSION"));

/// Default maximum response body size (10 MiB)
pub const DEFAULT_MAX_BODY_SIZE: usize = 10 * 1024 * 1024;

/// Default capacity of the request buffer in front of the service stack
pub const DEFAULT_BUFFER_CAPACITY: usize = 1024;

/// Configuration of an [`HttpTransport`](crate::HttpTransport).
///
/// Durations are written the humantime way (`"30s"`, `"1m 30s"`).
///
/// ```yaml
/// base_url: https://example.com/api
/// request_timeout: 10s
/// allow_insecure_http: false
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HttpTransportConfig {
    /// Base URL every request path is appended to
    pub base_url: Option<String>,

    /// Per-request timeout
    #[serde(with = "humantime_duration")]
    pub request_timeout: Duration,

    pub user_agent: String,

    /// Maximum decoded response body size in bytes
    pub max_body_size: usize,

    /// Accept plain `http://` base URLs. Meant for local mock servers.
    pub allow_insecure_http: bool,

    pub buffer_capacity: usize,
}

impl Default for HttpTransportConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            request_timeout: Duration::from_secs(30),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
            max_body_size: DEFAULT_MAX_BODY_SIZE,
            allow_insecure_http: false,
            buffer_capacity: DEFAULT_BUFFER_CAPACITY,
        }
    }
}

mod humantime_duration {
    use serde::{Deserialize, Deserializer, Serializer, de};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.collect_str(&humantime::format_duration(*value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        let raw = String::deserialize(d)?;
        humantime::parse_duration(&raw)
            .map_err(|_| de::Error::invalid_value(de::Unexpected::Str(&raw), &"a duration"))
    }
}
