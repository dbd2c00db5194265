//! Client configuration.
//!
//! Sources are layered, later ones winning:
//! 1. built-in defaults
//! 2. an optional YAML file
//! 3. environment variables prefixed with `MOST_CLIENT_`, `__` separating
//!    nested keys (`MOST_CLIENT_HTTP__REQUEST_TIMEOUT=10s`)

use std::path::Path;

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use most_http::HttpTransportConfig;
use serde::{Deserialize, Serialize};

use crate::error::ClientError;

pub const ENV_PREFIX: &str = "MOST_CLIENT_";

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClientConfig {
    /// Root of the remote data application, e.g. `https://example.com/api/`.
    /// Takes precedence over `http.base_url`.
    pub base_url: Option<String>,

    pub http: HttpTransportConfig,
}

impl ClientConfig {
    /// The layered figment used by [`load`](Self::load).
    #[must_use]
    pub fn figment(path: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(ClientConfig::default()));
        if let Some(path) = path {
            figment = figment.merge(Yaml::file(path));
        }
        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Load defaults, then `path` (if any), then the environment.
    ///
    /// # Errors
    /// Returns `ClientError::Config` if a source cannot be parsed or a value
    /// has the wrong type.
    pub fn load(path: Option<&Path>) -> Result<Self, ClientError> {
        Self::from_figment(&Self::figment(path))
    }

    /// # Errors
    /// Returns `ClientError::Config` if extraction fails.
    pub fn from_figment(figment: &Figment) -> Result<Self, ClientError> {
        Ok(figment.extract()?)
    }

    /// Transport settings with the effective base URL filled in.
    #[must_use]
    pub fn transport_config(&self) -> HttpTransportConfig {
        let mut http = self.http.clone();
        if self.base_url.is_some() {
            http.base_url.clone_from(&self.base_url);
        }
        http
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use std::io::Write;
    use std::time::Duration;

    fn yaml_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_defaults_without_sources() {
        temp_env::with_vars_unset(["MOST_CLIENT_BASE_URL"], || {
            let config = ClientConfig::load(None).unwrap();
            assert_eq!(config.base_url, None);
            assert_eq!(config.http, HttpTransportConfig::default());
        });
    }

    #[test]
    fn test_yaml_file() {
        let file = yaml_file(
            "base_url: https://example.com/api/\n\
             http:\n  request_timeout: 5s\n  max_body_size: 2048\n",
        );
        temp_env::with_vars_unset(["MOST_CLIENT_BASE_URL"], || {
            let config = ClientConfig::load(Some(file.path())).unwrap();
            assert_eq!(config.base_url.as_deref(), Some("https://example.com/api/"));
            assert_eq!(config.http.request_timeout, Duration::from_secs(5));
            assert_eq!(config.http.max_body_size, 2048);
            assert_eq!(config.http.buffer_capacity, 1024);
        });
    }

    #[test]
    fn test_env_overrides_yaml() {
        let file = yaml_file("base_url: https://from-file.example.com\n");
        temp_env::with_vars(
            [
                ("MOST_CLIENT_BASE_URL", Some("https://from-env.example.com")),
                ("MOST_CLIENT_HTTP__REQUEST_TIMEOUT", Some("2m")),
            ],
            || {
                let config = ClientConfig::load(Some(file.path())).unwrap();
                assert_eq!(
                    config.base_url.as_deref(),
                    Some("https://from-env.example.com")
                );
                assert_eq!(config.http.request_timeout, Duration::from_secs(120));
            },
        );
    }

    #[test]
    fn test_invalid_value_is_config_error() {
        let file = yaml_file("http:\n  request_timeout: whenever\n");
        let result = ClientConfig::load(Some(file.path()));
        assert!(matches!(result, Err(ClientError::Config(_))));
    }

    #[test]
    fn test_top_level_base_url_wins() {
        let config = ClientConfig {
            base_url: Some("https://a.example.com".to_owned()),
            http: HttpTransportConfig {
                base_url: Some("https://b.example.com".to_owned()),
                ..HttpTransportConfig::default()
            },
        };
        assert_eq!(
            config.transport_config().base_url.as_deref(),
            Some("https://a.example.com")
        );

        let config = ClientConfig {
            base_url: None,
            ..config
        };
        assert_eq!(
            config.transport_config().base_url.as_deref(),
            Some("https://b.example.com")
        );
    }
}
