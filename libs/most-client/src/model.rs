use std::sync::Arc;

use most_http::Transport;
use serde_json::Value;

use crate::error::ClientError;
use crate::queryable::DataQueryable;

/// A named model (entity set) of the remote application.
///
/// Requests go to `/{name}/index.json` unless another URL is set. Every
/// query starter returns a fresh [`DataQueryable`] over the same transport.
#[derive(Clone)]
pub struct DataModel {
    name: String,
    url: String,
    transport: Arc<dyn Transport>,
}

impl DataModel {
    /// # Errors
    /// Returns `ClientError::Query` if `name` is empty.
    pub fn new(name: &str, transport: Arc<dyn Transport>) -> Result<Self, ClientError> {
        if name.is_empty() {
            return Err(most_odata::Error::MissingArgument("model name").into());
        }
        Ok(Self {
            name: name.to_owned(),
            url: format!("/{name}/index.json"),
            transport,
        })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Path used by [`save`](Self::save) and [`remove`](Self::remove).
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Point the model at another path of the same application.
    ///
    /// A path starting with `/` is taken as is; anything else is resolved
    /// under the model, so `"active.json"` becomes `/{name}/active.json`.
    ///
    /// # Errors
    /// Returns `ClientError::Query` for an empty or absolute URL.
    pub fn set_url(&mut self, url: &str) -> Result<(), ClientError> {
        if url.is_empty() {
            return Err(most_odata::Error::MissingArgument("model URL").into());
        }
        if is_absolute(url) {
            return Err(most_odata::Error::InvalidArgument(
                "Request URL may not be an absolute URI".to_owned(),
            )
            .into());
        }
        self.url = if url.starts_with('/') {
            url.to_owned()
        } else {
            format!("/{}/{url}", self.name)
        };
        Ok(())
    }

    #[must_use]
    pub fn transport(&self) -> &Arc<dyn Transport> {
        &self.transport
    }

    /// Fetch the model schema from `/{name}/schema.json`.
    ///
    /// # Errors
    /// Returns `ClientError::Transport` if the request fails.
    pub async fn schema(&self) -> Result<Value, ClientError> {
        let path = format!("/{}/schema.json", self.name);
        Ok(self.transport.get(&path).await?)
    }

    /// `POST` one object (or an array of objects) to the model URL.
    ///
    /// # Errors
    /// Returns `ClientError::Transport` if the request fails.
    pub async fn save(&self, data: &Value) -> Result<Value, ClientError> {
        Ok(self.transport.post(&self.url, data).await?)
    }

    /// `DELETE` the objects described by `data` from the model URL.
    ///
    /// # Errors
    /// Returns `ClientError::Transport` if the request fails.
    pub async fn remove(&self, data: &Value) -> Result<Value, ClientError> {
        Ok(self.transport.remove(&self.url, Some(data)).await?)
    }

    /// Every item of the model, unfiltered.
    ///
    /// # Errors
    /// Returns `ClientError::Transport` if the request fails.
    pub async fn get_items(&self) -> Result<Value, ClientError> {
        self.query().get_items().await
    }

    /// An empty query over this model.
    pub fn query(&self) -> DataQueryable {
        DataQueryable::new(&self.name, Arc::clone(&self.transport))
    }

    pub fn where_field(&self, field: &str) -> DataQueryable {
        self.query().where_field(field)
    }

    pub fn select<I, S>(&self, fields: I) -> DataQueryable
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.query().select(fields)
    }

    pub fn expand<I, S>(&self, fields: I) -> DataQueryable
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.query().expand(fields)
    }

    pub fn order_by(&self, expr: &str) -> DataQueryable {
        self.query().order_by(expr)
    }

    pub fn order_by_descending(&self, expr: &str) -> DataQueryable {
        self.query().order_by_descending(expr)
    }

    pub fn skip(&self, n: u64) -> DataQueryable {
        self.query().skip(n)
    }

    pub fn take(&self, n: u64) -> DataQueryable {
        self.query().take(n)
    }
}

impl std::fmt::Debug for DataModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataModel")
            .field("name", &self.name)
            .field("url", &self.url)
            .finish_non_exhaustive()
    }
}

fn is_absolute(url: &str) -> bool {
    let lower = url.get(..8).unwrap_or(url).to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}
