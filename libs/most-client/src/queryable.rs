//! Queries bound to a model and a transport.

use std::sync::Arc;

use most_http::Transport;
use most_odata::{CompareOperator, Expr, IntoODataValue, QueryBuilder, ResultShape};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::ClientError;
use crate::page::DataPage;

/// Forward argument-free or plain-argument builder calls.
macro_rules! forward {
    ($($(#[$meta:meta])* $name:ident($($arg:ident: $ty:ty),*);)*) => {
        $(
            $(#[$meta])*
            pub fn $name(self, $($arg: $ty),*) -> Self {
                self.map(|b| b.$name($($arg),*))
            }
        )*
    };
}

/// A [`QueryBuilder`] that knows where to send itself.
///
/// Every builder operation is available with the same name and semantics.
/// A chain ends with one of the `get_*` calls, which serialize the query,
/// send a `GET` to `/{model}/index.json?...` and return the decoded answer.
/// Errors recorded while chaining surface there, before any request is made.
#[derive(Clone)]
#[must_use = "DataQueryable does nothing until one of its get_* methods is awaited"]
pub struct DataQueryable {
    model: String,
    transport: Arc<dyn Transport>,
    builder: QueryBuilder,
}

impl DataQueryable {
    pub fn new(model: &str, transport: Arc<dyn Transport>) -> Self {
        Self {
            model: model.to_owned(),
            transport,
            builder: QueryBuilder::new(),
        }
    }

    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    #[must_use]
    pub fn builder(&self) -> &QueryBuilder {
        &self.builder
    }

    /// Detach the builder, e.g. to reuse its options elsewhere.
    #[must_use]
    pub fn into_builder(self) -> QueryBuilder {
        self.builder
    }

    fn map(mut self, f: impl FnOnce(QueryBuilder) -> QueryBuilder) -> Self {
        self.builder = f(self.builder);
        self
    }

    forward! {
        where_field(field: &str);
        also(field: &str);
        either(field: &str);
        and_also(field: &str);
        or_else(field: &str);
        prepare();
        filter(expr: Expr);
        either_filter(expr: Expr);
        to_lower_case();
        to_upper_case();
        trim();
        length();
        round();
        floor();
        ceil();
        get_date();
        get_year();
        get_full_year();
        get_month();
        get_day();
        get_hours();
        get_minutes();
        get_seconds();
        substring(pos: i64, length: i64);
        substr(pos: i64, length: i64);
        order_by(expr: &str);
        order_by_descending(expr: &str);
        then_by(expr: &str);
        then_by_descending(expr: &str);
        top(n: i64);
        skip(n: u64);
        take(n: u64);
        shape(shape: ResultShape);
    }

    pub fn compare<V: IntoODataValue>(self, op: CompareOperator, value: V) -> Self {
        self.map(|b| b.compare(op, value))
    }

    pub fn equal<V: IntoODataValue>(self, value: V) -> Self {
        self.map(|b| b.equal(value))
    }

    pub fn not_equal<V: IntoODataValue>(self, value: V) -> Self {
        self.map(|b| b.not_equal(value))
    }

    pub fn greater_than<V: IntoODataValue>(self, value: V) -> Self {
        self.map(|b| b.greater_than(value))
    }

    pub fn greater_or_equal<V: IntoODataValue>(self, value: V) -> Self {
        self.map(|b| b.greater_or_equal(value))
    }

    pub fn lower_than<V: IntoODataValue>(self, value: V) -> Self {
        self.map(|b| b.lower_than(value))
    }

    pub fn lower_or_equal<V: IntoODataValue>(self, value: V) -> Self {
        self.map(|b| b.lower_or_equal(value))
    }

    pub fn contains<V: IntoODataValue>(self, value: V) -> Self {
        self.map(|b| b.contains(value))
    }

    pub fn between<L, H>(self, field: &str, low: L, high: H) -> Self
    where
        L: IntoODataValue,
        H: IntoODataValue,
    {
        self.map(|b| b.between(field, low, high))
    }

    pub fn starts_with<V: IntoODataValue>(self, value: V) -> Self {
        self.map(|b| b.starts_with(value))
    }

    pub fn ends_with<V: IntoODataValue>(self, value: V) -> Self {
        self.map(|b| b.ends_with(value))
    }

    pub fn index_of<V: IntoODataValue>(self, value: V) -> Self {
        self.map(|b| b.index_of(value))
    }

    pub fn select<I, S>(self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.map(|b| b.select(fields))
    }

    pub fn group_by<I, S>(self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.map(|b| b.group_by(fields))
    }

    pub fn expand<I, S>(self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.map(|b| b.expand(fields))
    }

    /// # Errors
    /// Returns the first error recorded while chaining.
    pub fn to_query_string(&self) -> Result<String, ClientError> {
        Ok(self.builder.to_query_string()?)
    }

    /// Path and percent-encoded query string the next `get_*` call would
    /// request, without the result shape that call adds.
    ///
    /// # Errors
    /// Returns the first error recorded while chaining.
    pub fn url(&self) -> Result<String, ClientError> {
        Ok(format!(
            "/{}/index.json{}",
            self.model,
            self.builder.to_encoded_query_string()?
        ))
    }

    async fn fetch(self, shape: ResultShape) -> Result<Value, ClientError> {
        let query = self.shape(shape);
        let url = query.url()?;
        tracing::debug!(model = %query.model, ?shape, url = %url, "executing query");
        Ok(query.transport.get(&url).await?)
    }

    /// The first matching item, or `null` when nothing matched.
    ///
    /// # Errors
    /// Returns `ClientError::Query` for an invalid chain and
    /// `ClientError::Transport` if the request fails.
    pub async fn get_item(self) -> Result<Value, ClientError> {
        let result = self.fetch(ResultShape::First).await?;
        Ok(match result {
            Value::Array(items) => items.into_iter().next().unwrap_or(Value::Null),
            other => other,
        })
    }

    /// Every matching item, without paging metadata.
    ///
    /// # Errors
    /// Returns `ClientError::Query` for an invalid chain and
    /// `ClientError::Transport` if the request fails.
    pub async fn get_items(self) -> Result<Value, ClientError> {
        self.fetch(ResultShape::Items).await
    }

    /// One page of items with the total count, as sent by the service
    /// (`{"value": [...], "total": n, "skip": n}`).
    ///
    /// # Errors
    /// Returns `ClientError::Query` for an invalid chain and
    /// `ClientError::Transport` if the request fails.
    pub async fn get_list(self) -> Result<Value, ClientError> {
        self.fetch(ResultShape::List).await
    }

    /// # Errors
    /// As [`get_item`](Self::get_item), plus `ClientError::Decode` if the
    /// item does not deserialize into `T`.
    pub async fn get_item_as<T: DeserializeOwned>(self) -> Result<Option<T>, ClientError> {
        match self.get_item().await? {
            Value::Null => Ok(None),
            item => Ok(Some(serde_json::from_value(item)?)),
        }
    }

    /// # Errors
    /// As [`get_items`](Self::get_items), plus `ClientError::Decode` if the
    /// answer is not an array of `T`.
    pub async fn get_items_as<T: DeserializeOwned>(self) -> Result<Vec<T>, ClientError> {
        match self.get_items().await? {
            Value::Null => Ok(Vec::new()),
            items => Ok(serde_json::from_value(items)?),
        }
    }

    /// # Errors
    /// As [`get_list`](Self::get_list), plus `ClientError::Decode` if the
    /// answer is not a page of `T`.
    pub async fn get_list_as<T: DeserializeOwned>(self) -> Result<DataPage<T>, ClientError> {
        Ok(serde_json::from_value(self.get_list().await?)?)
    }
}

impl std::fmt::Debug for DataQueryable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataQueryable")
            .field("model", &self.model)
            .field("builder", &self.builder)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use most_http::{Authorization, HttpClientError, Method};
    use parking_lot::Mutex;
    use serde::Deserialize;
    use serde_json::json;

    struct Canned {
        response: Value,
        paths: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl Transport for Canned {
        async fn execute(
            &self,
            method: Method,
            path: &str,
            _: Option<&Value>,
        ) -> Result<Value, HttpClientError> {
            assert_eq!(method, Method::Get);
            self.paths.lock().push(path.to_owned());
            Ok(self.response.clone())
        }

        fn set_authorization(&self, _: Option<Authorization>) -> Result<(), HttpClientError> {
            Ok(())
        }
    }

    fn queryable(response: Value) -> (Arc<Canned>, DataQueryable) {
        let transport = Arc::new(Canned {
            response,
            paths: Mutex::new(Vec::new()),
        });
        let query = DataQueryable::new("Users", transport.clone());
        (transport, query)
    }

    #[derive(Debug, Deserialize, PartialEq)]
    struct User {
        id: u32,
        name: String,
    }

    #[test]
    fn test_chain_renders_like_the_builder() {
        let (_, query) = queryable(Value::Null);
        let query = query
            .where_field("name")
            .to_lower_case()
            .starts_with("jo")
            .equal(true)
            .and_also("age")
            .greater_than(30)
            .select(["id", "name"])
            .order_by("name")
            .take(10);

        let expected = QueryBuilder::new()
            .where_field("name")
            .to_lower_case()
            .starts_with("jo")
            .equal(true)
            .and_also("age")
            .greater_than(30)
            .select(["id", "name"])
            .order_by("name")
            .take(10)
            .to_query_string()
            .unwrap();

        assert_eq!(query.to_query_string().unwrap(), expected);
        assert_eq!(
            query.url().unwrap(),
            "/Users/index.json?$filter=%28startswith%28tolower%28name%29%2C%27jo%27%29%20eq%20true%29\
             %20and%20%28age%20gt%2030%29&$select=id%2Cname&$orderby=name&$top=10\
             &$inlinecount=false&$first=false"
        );
    }

    #[tokio::test]
    async fn test_get_item_returns_first_element() {
        let (transport, query) = queryable(json!([{"id": 1, "name": "a"}, {"id": 2, "name": "b"}]));
        let item = query.where_field("id").equal(1).get_item().await.unwrap();

        assert_eq!(item, json!({"id": 1, "name": "a"}));
        assert_eq!(
            transport.paths.lock()[0],
            "/Users/index.json?$filter=id%20eq%201&$first=true"
        );
    }

    #[tokio::test]
    async fn test_get_item_passes_objects_and_empty_arrays() {
        let (_, query) = queryable(json!({"id": 3, "name": "c"}));
        assert_eq!(query.get_item().await.unwrap()["id"], 3);

        let (_, query) = queryable(json!([]));
        assert_eq!(query.get_item().await.unwrap(), Value::Null);
    }

    #[tokio::test]
    async fn test_get_list_requests_inline_count() {
        let (transport, query) = queryable(json!({
            "value": [{"id": 1, "name": "a"}],
            "total": 41,
            "skip": 20
        }));
        let page = query
            .skip(20)
            .take(1)
            .get_list_as::<User>()
            .await
            .unwrap();

        assert_eq!(page.total, 41);
        assert_eq!(page.skip, 20);
        assert_eq!(page.value, vec![User { id: 1, name: "a".to_owned() }]);
        assert_eq!(
            transport.paths.lock()[0],
            "/Users/index.json?$top=1&$skip=20&$inlinecount=true&$first=false"
        );
    }

    #[tokio::test]
    async fn test_typed_items() {
        let (_, query) = queryable(json!([{"id": 1, "name": "a"}]));
        let users: Vec<User> = query.get_items_as().await.unwrap();
        assert_eq!(users.len(), 1);

        let (_, query) = queryable(json!([]));
        let user: Option<User> = query.get_item_as().await.unwrap();
        assert_eq!(user, None);

        let (_, query) = queryable(json!({"unexpected": true}));
        let err = query.get_items_as::<User>().await.unwrap_err();
        assert!(matches!(err, ClientError::Decode(_)));
    }

    #[tokio::test]
    async fn test_invalid_chain_sends_nothing() {
        let (transport, query) = queryable(json!([]));
        let err = query.equal(1).get_items().await.unwrap_err();

        assert!(matches!(
            err,
            ClientError::Query(most_odata::Error::InvalidOperand)
        ));
        assert!(transport.paths.lock().is_empty());
    }
}
