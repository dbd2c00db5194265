use std::sync::Arc;

use most_http::{Authorization, HttpTransport, HttpTransportBuilder, SecretString, Transport};

use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::model::DataModel;

/// Entry point to a remote data application.
///
/// A context owns one transport, shared by every model and query created
/// from it. Cloning a context is cheap and keeps sharing that transport.
#[derive(Clone)]
pub struct DataContext {
    transport: Arc<dyn Transport>,
}

impl DataContext {
    /// Context over an HTTP transport with default settings.
    ///
    /// # Errors
    /// Returns `ClientError::Transport` if the HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        Ok(Self::with_transport(Arc::new(HttpTransport::new(base_url)?)))
    }

    /// # Errors
    /// Returns `ClientError::Transport` if the HTTP client cannot be built.
    pub fn from_config(config: &ClientConfig) -> Result<Self, ClientError> {
        let transport = HttpTransportBuilder::with_config(config.transport_config()).build()?;
        tracing::debug!(
            base_url = transport.base_url().unwrap_or_default(),
            "data context created"
        );
        Ok(Self::with_transport(Arc::new(transport)))
    }

    #[must_use]
    pub fn with_transport(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Model bound to this context's transport.
    ///
    /// # Errors
    /// Returns `ClientError::Query` if `name` is empty.
    pub fn model(&self, name: &str) -> Result<DataModel, ClientError> {
        DataModel::new(name, Arc::clone(&self.transport))
    }

    #[must_use]
    pub fn transport(&self) -> &Arc<dyn Transport> {
        &self.transport
    }

    /// Send `Authorization: Bearer <token>` with every later request.
    ///
    /// # Errors
    /// Returns `ClientError::Transport` if the token is not a valid header value.
    pub fn set_bearer_authorization(
        &self,
        token: impl Into<SecretString>,
    ) -> Result<(), ClientError> {
        Ok(self
            .transport
            .set_authorization(Some(Authorization::bearer(token)))?)
    }

    /// Send `Authorization: Basic <value>` with every later request.
    /// `value` is the already encoded credential.
    ///
    /// # Errors
    /// Returns `ClientError::Transport` if the value is not a valid header value.
    pub fn set_basic_authorization(
        &self,
        value: impl Into<SecretString>,
    ) -> Result<(), ClientError> {
        Ok(self
            .transport
            .set_authorization(Some(Authorization::basic(value)))?)
    }

    /// Stop sending an `Authorization` header.
    ///
    /// # Errors
    /// Returns `ClientError::Transport` if the transport rejects the change.
    pub fn clear_authorization(&self) -> Result<(), ClientError> {
        Ok(self.transport.set_authorization(None)?)
    }
}

impl std::fmt::Debug for DataContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataContext").finish_non_exhaustive()
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_model_requires_name() {
        let context = DataContext::new("https://example.com/api").unwrap();
        let err = context.model("").unwrap_err();
        assert!(matches!(
            err,
            ClientError::Query(most_odata::Error::MissingArgument("model name"))
        ));
    }

    #[tokio::test]
    async fn test_models_share_the_context_transport() {
        let context = DataContext::new("https://example.com/api").unwrap();
        let users = context.model("Users").unwrap();
        let orders = context.model("Orders").unwrap();
        assert!(Arc::ptr_eq(users.transport(), orders.transport()));
        assert!(Arc::ptr_eq(users.transport(), context.transport()));
    }

    #[tokio::test]
    async fn test_from_config() {
        let config = ClientConfig {
            base_url: Some("https://example.com/api/".to_owned()),
            ..ClientConfig::default()
        };
        let context = DataContext::from_config(&config).unwrap();
        assert_eq!(context.model("Users").unwrap().url(), "/Users/index.json");
    }

    #[tokio::test]
    async fn test_invalid_bearer_token_is_rejected() {
        let context = DataContext::new("https://example.com/api").unwrap();
        assert!(context.set_bearer_authorization("abc").is_ok());
        assert!(matches!(
            context.set_bearer_authorization("line\nbreak"),
            Err(ClientError::Transport(_))
        ));
        assert!(context.clear_authorization().is_ok());
    }
}
