#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Client for MOST data services
//!
//! A [`DataContext`] points at a remote application and hands out
//! [`DataModel`]s. Queries start from a model and chain the operations of
//! [`most_odata::QueryBuilder`]:
//!
//! ```ignore
//! use most_client::DataContext;
//!
//! let context = DataContext::new("https://example.com/api/")?;
//! context.set_bearer_authorization(token)?;
//!
//! let users = context
//!     .model("Users")?
//!     .where_field("name")
//!     .starts_with("jo")
//!     .equal(true)
//!     .order_by("name")
//!     .take(25)
//!     .get_items()
//!     .await?;
//! ```

mod config;
mod context;
mod error;
mod model;
mod page;
mod queryable;

pub use config::{ClientConfig, ENV_PREFIX};
pub use context::DataContext;
pub use error::ClientError;
pub use model::DataModel;
pub use page::DataPage;
pub use queryable::DataQueryable;

pub use most_http::{Authorization, HttpTransport, HttpTransportConfig, Transport};
pub use most_odata::{Expr, Operand, QueryBuilder, RawFilter, ResultShape};
