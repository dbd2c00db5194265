//! Query options and their query-string rendering.

use std::borrow::Cow;
use std::fmt;

use crate::ast::{Expr, LogicalOperator};

/// The serializable parameters of one query.
///
/// `filter` and `prepared` are two tiers of the same `$filter` clause: a
/// [`prepare`](QueryOptions::prepare) seals the current `filter` into
/// `prepared`, and both are merged again when the options are rendered.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct QueryOptions {
    pub filter: Option<Expr>,
    pub prepared: Option<Expr>,
    /// Operator joining `prepared` with the group sealed after it.
    pub prepared_operator: Option<LogicalOperator>,
    pub select: Option<String>,
    pub order: Option<String>,
    pub group: Option<String>,
    pub expand: Option<String>,
    pub top: Option<u64>,
    pub skip: Option<u64>,
    pub inlinecount: Option<bool>,
    pub first: Option<bool>,
}

impl QueryOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold `expr` into the current filter: `(filter) op (expr)`, or just
    /// `expr` when no filter is set yet.
    pub fn fold(&mut self, expr: Expr, op: LogicalOperator) {
        self.filter = Expr::join(self.filter.take(), Some(expr), op);
    }

    /// Seal the current filter group into `prepared`.
    ///
    /// Does nothing while `filter` is unset, so calling it twice in a row
    /// leaves the options unchanged after the first call.
    pub fn prepare(&mut self) {
        let Some(filter) = self.filter.take() else {
            return;
        };
        let op = self.prepared_operator.unwrap_or_default();
        self.prepared = Expr::join(self.prepared.take(), Some(filter), op);
    }

    /// The single `$filter` expression: `prepared` on the left, `filter` on
    /// the right, joined by the recorded operator (`and` when none was).
    #[must_use]
    pub fn effective_filter(&self) -> Option<Expr> {
        Expr::join(
            self.prepared.clone(),
            self.filter.clone(),
            self.prepared_operator.unwrap_or_default(),
        )
    }

    /// Render as `?$filter=...&$top=...`, or `""` when nothing is set.
    ///
    /// Parameters always appear in the order `$filter`, `$select`,
    /// `$orderby`, `$top`, `$skip`, `$groupby`, `$expand`, `$inlinecount`,
    /// `$first`. Values are not percent-encoded here; see
    /// [`to_encoded_query_string`](Self::to_encoded_query_string).
    #[must_use]
    pub fn to_query_string(&self) -> String {
        self.render(|value: &str| Cow::Borrowed(value))
    }

    /// Same parameters as [`to_query_string`](Self::to_query_string), with
    /// every value percent-encoded so `&`, `#`, `+` and `%` inside a literal
    /// reach the server unchanged.
    #[must_use]
    pub fn to_encoded_query_string(&self) -> String {
        self.render(urlencoding::encode)
    }

    fn pairs(&self) -> Vec<(&'static str, String)> {
        [
            ("filter", self.effective_filter().map(|f| f.to_string())),
            ("select", self.select.clone()),
            ("orderby", self.order.clone()),
            ("top", self.top.map(|n| n.to_string())),
            ("skip", self.skip.map(|n| n.to_string())),
            ("groupby", self.group.clone()),
            ("expand", self.expand.clone()),
            ("inlinecount", self.inlinecount.map(|b| b.to_string())),
            ("first", self.first.map(|b| b.to_string())),
        ]
        .into_iter()
        .filter_map(|(name, value)| value.map(|value| (name, value)))
        .collect()
    }

    fn render<F>(&self, encode: F) -> String
    where
        F: for<'a> Fn(&'a str) -> Cow<'a, str>,
    {
        let pairs = self.pairs();
        if pairs.is_empty() {
            return String::new();
        }
        let joined = pairs
            .iter()
            .map(|(name, value)| format!("${name}={}", encode(value.as_str())))
            .collect::<Vec<_>>()
            .join("&");
        format!("?{joined}")
    }
}

impl fmt::Display for QueryOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_query_string())
    }
}

/// What a caller expects back from the service.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResultShape {
    /// Only the first matching item.
    First,
    /// Every matching item, without paging metadata.
    Items,
    /// A page of items with the total count.
    List,
}

impl ResultShape {
    pub fn apply(self, options: &mut QueryOptions) {
        match self {
            ResultShape::First => options.first = Some(true),
            ResultShape::Items => options.inlinecount = Some(false),
            ResultShape::List => {
                options.first = Some(false);
                options.inlinecount = Some(true);
            }
        }
    }
}
