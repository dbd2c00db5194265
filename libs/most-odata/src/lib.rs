#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! Client-side `OData` query building.
//!
//! Fluent calls on a [`QueryBuilder`] stage a left operand, compare it with a
//! value and fold the resulting [`Expr`] into [`QueryOptions`]. The options
//! render to a query string such as
//! `?$filter=(price ge 10) and (price le 20)&$top=10`.
//!
//! ```rust,ignore
//! use most_odata::QueryBuilder;
//!
//! let query = QueryBuilder::new()
//!     .where_field("price")
//!     .greater_or_equal(10)
//!     .also("price")
//!     .lower_or_equal(20)
//!     .top(10)
//!     .to_query_string()?;
//! assert_eq!(query, "?$filter=(price ge 10) and (price le 20)&$top=10");
//! ```
pub mod ast;
pub mod builder;
pub mod escape;
pub mod operand;
pub mod options;
pub mod value;

pub use ast::{CompareOperator, Expr, LogicalOperator, RawFilter, Value};
pub use builder::QueryBuilder;
pub use escape::escape;
pub use operand::Operand;
pub use options::{QueryOptions, ResultShape};
pub use value::IntoODataValue;

/// Errors raised while building a query.
///
/// A [`QueryBuilder`] keeps the first one it hits and reports it from
/// [`QueryBuilder::build`] or [`QueryBuilder::to_query_string`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A required argument (field name, order expression, model name) was empty.
    #[error("{0} may not be empty")]
    MissingArgument(&'static str),

    /// A comparison or operand rewrite was called with no staged left operand.
    #[error("Invalid right operand assignment. Left operand cannot be empty at this context.")]
    InvalidOperand,

    #[error("Invalid argument. {0}")]
    InvalidArgument(String),
}
