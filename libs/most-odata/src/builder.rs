//! Stateful fluent query builder.
//!
//! A [`QueryBuilder`] owns one [`QueryOptions`] and a small amount of
//! transient state: the staged left [`Operand`] and the logical operator the
//! next comparison is folded with. Every comparison produces an immutable
//! [`Expr`] which is folded into the options immediately; the transient state
//! is then cleared.
//!
//! Failures do not interrupt the chain. The first error is recorded, every
//! later call is ignored, and the error surfaces from [`QueryBuilder::build`]
//! or [`QueryBuilder::to_query_string`].
//!
//! ```rust,ignore
//! let query = QueryBuilder::new()
//!     .where_field("name")
//!     .to_lower_case()
//!     .starts_with("jo")
//!     .equal(true)
//!     .and_also("age")
//!     .greater_than(30)
//!     .either("age")
//!     .lower_than(18)
//!     .order_by("name")
//!     .then_by_descending("age")
//!     .take(25)
//!     .to_query_string()?;
//! ```

use crate::ast::{CompareOperator, Expr, LogicalOperator};
use crate::operand::Operand;
use crate::options::{QueryOptions, ResultShape};
use crate::value::IntoODataValue;
use crate::Error;

#[derive(Clone, Debug, Default)]
#[must_use = "QueryBuilder does nothing until it is built or serialized"]
pub struct QueryBuilder {
    options: QueryOptions,
    left: Option<Operand>,
    lop: Option<LogicalOperator>,
    /// First error of the chain (reported by `build()`)
    error: Option<Error>,
}

impl QueryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Continue building on top of existing options.
    pub fn from_options(options: QueryOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn options(&self) -> &QueryOptions {
        &self.options
    }

    /// The staged left operand, if any.
    #[must_use]
    pub fn left(&self) -> Option<&Operand> {
        self.left.as_ref()
    }

    #[must_use]
    pub fn error(&self) -> Option<&Error> {
        self.error.as_ref()
    }

    /// Finish the chain.
    ///
    /// # Errors
    /// Returns the first error recorded while building.
    pub fn build(self) -> Result<QueryOptions, Error> {
        match self.error {
            Some(e) => Err(e),
            None => Ok(self.options),
        }
    }

    /// Serialize the options built so far.
    ///
    /// # Errors
    /// Returns the first error recorded while building.
    #[allow(clippy::wrong_self_convention)]
    pub fn to_query_string(&self) -> Result<String, Error> {
        match &self.error {
            Some(e) => Err(e.clone()),
            None => Ok(self.options.to_query_string()),
        }
    }

    /// Like [`to_query_string`](Self::to_query_string), with percent-encoded
    /// values, ready to be appended to a request path.
    ///
    /// # Errors
    /// Returns the first error recorded while building.
    #[allow(clippy::wrong_self_convention)]
    pub fn to_encoded_query_string(&self) -> Result<String, Error> {
        match &self.error {
            Some(e) => Err(e.clone()),
            None => Ok(self.options.to_encoded_query_string()),
        }
    }

    fn fail(mut self, error: Error) -> Self {
        if self.error.is_none() {
            self.error = Some(error);
        }
        self
    }

    fn fold(mut self, expr: Expr) -> Self {
        let op = self.lop.take().unwrap_or_default();
        self.options.fold(expr, op);
        self.left = None;
        self
    }

    fn stage(mut self, field: &str, lop: Option<LogicalOperator>) -> Self {
        if self.error.is_some() {
            return self;
        }
        if field.is_empty() {
            return self.fail(Error::MissingArgument("field"));
        }
        if lop.is_some() {
            self.lop = lop;
        }
        self.left = Some(Operand::field(field));
        self
    }

    fn rewrite<F>(mut self, f: F) -> Self
    where
        F: FnOnce(Operand) -> Result<Operand, Error>,
    {
        if self.error.is_some() {
            return self;
        }
        let Some(left) = self.left.take() else {
            return self.fail(Error::InvalidOperand);
        };
        match f(left) {
            Ok(left) => {
                self.left = Some(left);
                self
            }
            Err(e) => self.fail(e),
        }
    }

    fn settle<F>(mut self, f: F) -> Self
    where
        F: FnOnce(Operand) -> Expr,
    {
        if self.error.is_some() {
            return self;
        }
        match self.left.take() {
            Some(left) => self.fold(f(left)),
            None => self.fail(Error::InvalidOperand),
        }
    }

    // Staging

    /// Stage `field` as the left operand. Keeps any staged logical operator.
    pub fn where_field(self, field: &str) -> Self {
        self.stage(field, None)
    }

    /// Stage `field`; the next comparison is joined with `and`.
    pub fn also(self, field: &str) -> Self {
        self.stage(field, Some(LogicalOperator::And))
    }

    /// Stage `field`; the next comparison is joined with `or`.
    pub fn either(self, field: &str) -> Self {
        self.stage(field, Some(LogicalOperator::Or))
    }

    /// Seal the current filter group and start a new one that will be joined
    /// to it with `and`. An empty `field` leaves the builder unchanged.
    pub fn and_also(self, field: &str) -> Self {
        self.start_group(field, LogicalOperator::And)
    }

    /// Like [`and_also`](Self::and_also), joining the groups with `or`.
    pub fn or_else(self, field: &str) -> Self {
        self.start_group(field, LogicalOperator::Or)
    }

    fn start_group(mut self, field: &str, op: LogicalOperator) -> Self {
        if self.error.is_some() || field.is_empty() {
            return self;
        }
        self.options.prepare();
        self.options.prepared_operator = Some(op);
        self.left = Some(Operand::field(field));
        self
    }

    /// Seal the current filter into the prepared tier.
    pub fn prepare(mut self) -> Self {
        if self.error.is_none() {
            self.options.prepare();
        }
        self
    }

    // Comparisons

    pub fn compare<V: IntoODataValue>(self, op: CompareOperator, value: V) -> Self {
        self.settle(|left| left.compare(op, value))
    }

    pub fn equal<V: IntoODataValue>(self, value: V) -> Self {
        self.compare(CompareOperator::Eq, value)
    }

    pub fn not_equal<V: IntoODataValue>(self, value: V) -> Self {
        self.compare(CompareOperator::Ne, value)
    }

    pub fn greater_than<V: IntoODataValue>(self, value: V) -> Self {
        self.compare(CompareOperator::Gt, value)
    }

    pub fn greater_or_equal<V: IntoODataValue>(self, value: V) -> Self {
        self.compare(CompareOperator::Ge, value)
    }

    pub fn lower_than<V: IntoODataValue>(self, value: V) -> Self {
        self.compare(CompareOperator::Lt, value)
    }

    pub fn lower_or_equal<V: IntoODataValue>(self, value: V) -> Self {
        self.compare(CompareOperator::Le, value)
    }

    /// Fold `contains(left,value) ge 0`.
    pub fn contains<V: IntoODataValue>(self, value: V) -> Self {
        self.settle(|left| left.contains(value))
    }

    /// Fold `(field ge low) and (field le high)` with the staged operator.
    ///
    /// `field` replaces any staged left operand.
    pub fn between<L, H>(mut self, field: &str, low: L, high: H) -> Self
    where
        L: IntoODataValue,
        H: IntoODataValue,
    {
        if self.error.is_some() {
            return self;
        }
        if field.is_empty() {
            return self.fail(Error::MissingArgument("field"));
        }
        self.left = None;
        self.fold(Operand::field(field).between(low, high))
    }

    /// Fold a prebuilt expression with the staged operator (`and` by default).
    pub fn filter(self, expr: Expr) -> Self {
        if self.error.is_some() {
            return self;
        }
        self.fold(expr)
    }

    /// Fold a prebuilt expression with `or`.
    pub fn either_filter(mut self, expr: Expr) -> Self {
        if self.error.is_some() {
            return self;
        }
        self.lop = Some(LogicalOperator::Or);
        self.fold(expr)
    }

    // Operand rewrites

    #[allow(clippy::wrong_self_convention)]
    pub fn to_lower_case(self) -> Self {
        self.rewrite(|l| Ok(l.tolower()))
    }

    #[allow(clippy::wrong_self_convention)]
    pub fn to_upper_case(self) -> Self {
        self.rewrite(|l| Ok(l.toupper()))
    }

    pub fn trim(self) -> Self {
        self.rewrite(|l| Ok(l.trim()))
    }

    pub fn length(self) -> Self {
        self.rewrite(|l| Ok(l.length()))
    }

    pub fn round(self) -> Self {
        self.rewrite(|l| Ok(l.round()))
    }

    pub fn floor(self) -> Self {
        self.rewrite(|l| Ok(l.floor()))
    }

    pub fn ceil(self) -> Self {
        self.rewrite(|l| Ok(l.ceiling()))
    }

    pub fn get_date(self) -> Self {
        self.rewrite(|l| Ok(l.date()))
    }

    pub fn get_year(self) -> Self {
        self.rewrite(|l| Ok(l.year()))
    }

    pub fn get_full_year(self) -> Self {
        self.get_year()
    }

    pub fn get_month(self) -> Self {
        self.rewrite(|l| Ok(l.month()))
    }

    pub fn get_day(self) -> Self {
        self.rewrite(|l| Ok(l.day()))
    }

    pub fn get_hours(self) -> Self {
        self.rewrite(|l| Ok(l.hour()))
    }

    pub fn get_minutes(self) -> Self {
        self.rewrite(|l| Ok(l.minute()))
    }

    pub fn get_seconds(self) -> Self {
        self.rewrite(|l| Ok(l.second()))
    }

    pub fn starts_with<V: IntoODataValue>(self, value: V) -> Self {
        self.rewrite(|l| Ok(l.startswith(value)))
    }

    pub fn ends_with<V: IntoODataValue>(self, value: V) -> Self {
        self.rewrite(|l| Ok(l.endswith(value)))
    }

    pub fn index_of<V: IntoODataValue>(self, value: V) -> Self {
        self.rewrite(|l| Ok(l.indexof(value)))
    }

    /// Rewrite the left operand to `substring(left,pos,length)`.
    ///
    /// Records `InvalidArgument` unless `length > 0` and `pos >= 0`.
    pub fn substring(self, pos: i64, length: i64) -> Self {
        self.rewrite(|l| l.substring(pos, length))
    }

    pub fn substr(self, pos: i64, length: i64) -> Self {
        self.substring(pos, length)
    }

    // Projection and ordering

    pub fn select<I, S>(self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.set_list(fields, |o| &mut o.select)
    }

    pub fn group_by<I, S>(self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.set_list(fields, |o| &mut o.group)
    }

    pub fn expand<I, S>(self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.set_list(fields, |o| &mut o.expand)
    }

    fn set_list<I, S, F>(mut self, fields: I, slot: F) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
        F: FnOnce(&mut QueryOptions) -> &mut Option<String>,
    {
        if self.error.is_some() {
            return self;
        }
        let fields: Vec<String> = fields.into_iter().map(|f| f.as_ref().to_owned()).collect();
        if fields.is_empty() {
            return self.fail(Error::InvalidArgument("Expected string.".to_owned()));
        }
        *slot(&mut self.options) = Some(fields.join(","));
        self
    }

    /// Replace the ordering with `expr`.
    pub fn order_by(self, expr: &str) -> Self {
        self.set_order(expr, "", false)
    }

    /// Replace the ordering with `expr desc`.
    pub fn order_by_descending(self, expr: &str) -> Self {
        self.set_order(expr, " desc", false)
    }

    /// Append `expr` to the ordering.
    pub fn then_by(self, expr: &str) -> Self {
        self.set_order(expr, "", true)
    }

    /// Append `expr desc` to the ordering.
    pub fn then_by_descending(self, expr: &str) -> Self {
        self.set_order(expr, " desc", true)
    }

    fn set_order(mut self, expr: &str, suffix: &str, append: bool) -> Self {
        if self.error.is_some() {
            return self;
        }
        if expr.is_empty() {
            return self.fail(Error::MissingArgument("order expression"));
        }
        let clause = format!("{expr}{suffix}");
        self.options.order = match self.options.order.take() {
            Some(existing) if append => Some(format!("{existing},{clause}")),
            _ => Some(clause),
        };
        self
    }

    // Paging and result shape

    /// Limit the result size. A negative `n` leaves the builder unchanged.
    pub fn top(mut self, n: i64) -> Self {
        if self.error.is_none()
            && let Ok(n) = u64::try_from(n)
        {
            self.options.top = Some(n);
        }
        self
    }

    pub fn skip(mut self, n: u64) -> Self {
        if self.error.is_none() {
            self.options.skip = Some(n);
        }
        self
    }

    /// Set `top` and request a plain item collection.
    pub fn take(mut self, n: u64) -> Self {
        if self.error.is_none() {
            self.options.top = Some(n);
            self.options.first = Some(false);
            self.options.inlinecount = Some(false);
        }
        self
    }

    pub fn shape(mut self, shape: ResultShape) -> Self {
        if self.error.is_none() {
            shape.apply(&mut self.options);
        }
        self
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::ast::RawFilter;

    fn query(builder: QueryBuilder) -> String {
        builder.to_query_string().unwrap()
    }

    fn filter_of(builder: QueryBuilder) -> String {
        builder
            .build()
            .unwrap()
            .effective_filter()
            .map(|f| f.to_string())
            .unwrap_or_default()
    }

    #[test]
    fn test_where_equal() {
        assert_eq!(
            filter_of(QueryBuilder::new().where_field("name").equal("John")),
            "name eq 'John'"
        );
        assert_eq!(
            filter_of(QueryBuilder::new().where_field("active").equal(true)),
            "active eq true"
        );
        assert_eq!(
            filter_of(QueryBuilder::new().where_field("parent").equal(None::<i32>)),
            "parent eq null"
        );
    }

    #[test]
    fn test_all_comparison_operators() {
        let cases: [(fn(QueryBuilder) -> QueryBuilder, &str); 6] = [
            (|b| b.equal(1), "x eq 1"),
            (|b| b.not_equal(1), "x ne 1"),
            (|b| b.greater_than(1), "x gt 1"),
            (|b| b.greater_or_equal(1), "x ge 1"),
            (|b| b.lower_than(1), "x lt 1"),
            (|b| b.lower_or_equal(1), "x le 1"),
        ];
        for (apply, expected) in cases {
            assert_eq!(filter_of(apply(QueryBuilder::new().where_field("x"))), expected);
        }
    }

    #[test]
    fn test_also_joins_with_and() {
        let b = QueryBuilder::new()
            .where_field("price")
            .greater_or_equal(10)
            .also("price")
            .lower_or_equal(20);
        assert_eq!(filter_of(b), "(price ge 10) and (price le 20)");
    }

    #[test]
    fn test_either_joins_with_or() {
        let b = QueryBuilder::new()
            .where_field("status")
            .equal("open")
            .either("status")
            .equal("pending");
        assert_eq!(filter_of(b), "(status eq 'open') or (status eq 'pending')");
    }

    #[test]
    fn test_where_after_comparison_defaults_to_and() {
        let b = QueryBuilder::new()
            .where_field("a")
            .equal(1)
            .where_field("b")
            .equal(2);
        assert_eq!(filter_of(b), "(a eq 1) and (b eq 2)");
    }

    #[test]
    fn test_fold_is_left_deep() {
        let b = QueryBuilder::new()
            .where_field("a")
            .equal(1)
            .either("b")
            .equal(2)
            .also("c")
            .equal(3);
        assert_eq!(filter_of(b), "((a eq 1) or (b eq 2)) and (c eq 3)");
    }

    #[test]
    fn test_transient_state_resets_after_fold() {
        let b = QueryBuilder::new().either("a").equal(1);
        assert!(b.left().is_none());
        // the `or` was consumed by the first fold
        let b = b.where_field("b").equal(2);
        assert_eq!(filter_of(b), "(a eq 1) and (b eq 2)");
    }

    #[test]
    fn test_comparison_without_where_is_invalid_operand() {
        let err = QueryBuilder::new().equal(1).build().unwrap_err();
        assert_eq!(err, Error::InvalidOperand);

        let err = QueryBuilder::new()
            .where_field("a")
            .equal(1)
            .greater_than(2)
            .build()
            .unwrap_err();
        assert_eq!(err, Error::InvalidOperand);
    }

    #[test]
    fn test_rewrite_without_where_is_invalid_operand() {
        let err = QueryBuilder::new().to_lower_case().build().unwrap_err();
        assert_eq!(err, Error::InvalidOperand);
    }

    #[test]
    fn test_empty_field_is_missing_argument() {
        let err = QueryBuilder::new().where_field("").build().unwrap_err();
        assert_eq!(err, Error::MissingArgument("field"));
    }

    #[test]
    fn test_first_error_wins() {
        let b = QueryBuilder::new()
            .equal(1)
            .where_field("")
            .select(Vec::<&str>::new());
        assert_eq!(b.error(), Some(&Error::InvalidOperand));
        assert_eq!(b.to_query_string(), Err(Error::InvalidOperand));
    }

    #[test]
    fn test_calls_after_error_are_ignored() {
        let b = QueryBuilder::new().equal(1).where_field("a").equal(2).top(5);
        assert!(b.left().is_none());
        assert_eq!(b.options(), &QueryOptions::default());
    }

    #[test]
    fn test_starts_with_stages_rewrite() {
        let b = QueryBuilder::new().where_field("name").starts_with("Jo");
        assert_eq!(b.left().unwrap().to_string(), "startswith(name,'Jo')");
        assert!(b.options().filter.is_none());

        assert_eq!(filter_of(b.equal(true)), "startswith(name,'Jo') eq true");
    }

    #[test]
    fn test_rewrites_compose() {
        let b = QueryBuilder::new()
            .where_field("name")
            .trim()
            .to_upper_case()
            .length()
            .greater_than(3);
        assert_eq!(filter_of(b), "length(toupper(trim(name))) gt 3");
    }

    #[test]
    fn test_numeric_and_date_rewrites() {
        let rewrites: [(fn(QueryBuilder) -> QueryBuilder, &str); 12] = [
            (QueryBuilder::to_lower_case, "tolower(f)"),
            (QueryBuilder::round, "round(f)"),
            (QueryBuilder::floor, "floor(f)"),
            (QueryBuilder::ceil, "ceiling(f)"),
            (QueryBuilder::get_date, "date(f)"),
            (QueryBuilder::get_year, "year(f)"),
            (QueryBuilder::get_full_year, "year(f)"),
            (QueryBuilder::get_month, "month(f)"),
            (QueryBuilder::get_day, "day(f)"),
            (QueryBuilder::get_hours, "hour(f)"),
            (QueryBuilder::get_minutes, "minute(f)"),
            (QueryBuilder::get_seconds, "second(f)"),
        ];
        for (apply, expected) in rewrites {
            let b = apply(QueryBuilder::new().where_field("f"));
            assert_eq!(b.left().unwrap().to_string(), expected);
        }
    }

    #[test]
    fn test_ends_with_and_index_of() {
        let b = QueryBuilder::new()
            .where_field("email")
            .ends_with("@example.com")
            .equal(true);
        assert_eq!(filter_of(b), "endswith(email,'@example.com') eq true");

        let b = QueryBuilder::new()
            .where_field("name")
            .index_of("x")
            .greater_or_equal(0);
        assert_eq!(filter_of(b), "indexof(name,'x') ge 0");
    }

    #[test]
    fn test_contains_folds_immediately() {
        let b = QueryBuilder::new().where_field("name").contains("oh");
        assert!(b.left().is_none());
        assert_eq!(filter_of(b), "contains(name,'oh') ge 0");
    }

    #[test]
    fn test_substring() {
        let b = QueryBuilder::new()
            .where_field("code")
            .substr(1, 2)
            .equal("AB");
        assert_eq!(filter_of(b), "substring(code,1,2) eq 'AB'");

        let err = QueryBuilder::new()
            .where_field("code")
            .substring(0, 0)
            .build()
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid argument. Length must be greater than zero."
        );

        let err = QueryBuilder::new()
            .where_field("code")
            .substring(-1, 2)
            .build()
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid argument. Position must be greater or equal to zero."
        );
    }

    #[test]
    fn test_between_on_empty_filter() {
        let b = QueryBuilder::new().between("age", 18, 30);
        assert_eq!(filter_of(b), "(age ge 18) and (age le 30)");
    }

    #[test]
    fn test_between_folds_with_staged_operator() {
        let b = QueryBuilder::new()
            .where_field("vip")
            .equal(true)
            .either("ignored")
            .between("age", 18, 30);
        assert_eq!(
            filter_of(b),
            "(vip eq true) or ((age ge 18) and (age le 30))"
        );
    }

    #[test]
    fn test_prepare_twice_is_idempotent() {
        let once = QueryBuilder::new().where_field("a").equal(1).prepare();
        let twice = once.clone().prepare();
        assert_eq!(once.options(), twice.options());
        assert!(twice.options().filter.is_none());
    }

    #[test]
    fn test_and_also_combines_groups() {
        let b = QueryBuilder::new()
            .where_field("a")
            .equal(1)
            .either("b")
            .equal(2)
            .and_also("c")
            .equal(3)
            .also("d")
            .equal(4);
        assert_eq!(
            filter_of(b),
            "((a eq 1) or (b eq 2)) and ((c eq 3) and (d eq 4))"
        );
    }

    #[test]
    fn test_or_else_combines_groups() {
        let b = QueryBuilder::new()
            .where_field("a")
            .equal(1)
            .or_else("b")
            .equal(2);
        assert_eq!(b.options().prepared_operator, Some(LogicalOperator::Or));
        assert_eq!(filter_of(b), "(a eq 1) or (b eq 2)");
    }

    #[test]
    fn test_and_also_with_empty_field_is_noop() {
        let before = QueryBuilder::new().where_field("a").equal(1);
        let after = before.clone().and_also("");
        assert_eq!(before.options(), after.options());
        assert!(after.error().is_none());
    }

    #[test]
    fn test_filter_folds_prebuilt_expression() {
        let adults = Operand::field("age").ge(18);
        let b = QueryBuilder::new()
            .where_field("active")
            .equal(true)
            .filter(adults)
            .either_filter(Operand::field("role").eq("admin"));
        assert_eq!(
            filter_of(b),
            "((active eq true) and (age ge 18)) or (role eq 'admin')"
        );
    }

    #[test]
    fn test_raw_filter_is_not_quoted() {
        let b = QueryBuilder::new()
            .where_field("dateCreated")
            .greater_than(RawFilter::new("now()"));
        assert_eq!(query(b), "?$filter=dateCreated gt now()");
    }

    #[test]
    fn test_select_group_expand() {
        let b = QueryBuilder::new()
            .select(["a", "b"])
            .group_by(vec!["category".to_owned()])
            .expand(["orders"]);
        assert_eq!(b.options().select.as_deref(), Some("a,b"));
        assert_eq!(query(b), "?$select=a,b&$groupby=category&$expand=orders");
    }

    #[test]
    fn test_empty_field_list_is_invalid_argument() {
        for b in [
            QueryBuilder::new().select(Vec::<&str>::new()),
            QueryBuilder::new().group_by(Vec::<&str>::new()),
            QueryBuilder::new().expand(Vec::<&str>::new()),
        ] {
            assert_eq!(
                b.build().unwrap_err(),
                Error::InvalidArgument("Expected string.".to_owned())
            );
        }
    }

    #[test]
    fn test_ordering() {
        let b = QueryBuilder::new()
            .order_by("name")
            .then_by_descending("age")
            .then_by("id");
        assert_eq!(query(b), "?$orderby=name,age desc,id");

        let b = QueryBuilder::new().order_by("name").order_by_descending("age");
        assert_eq!(query(b), "?$orderby=age desc");

        let b = QueryBuilder::new().then_by("name");
        assert_eq!(query(b), "?$orderby=name");

        let err = QueryBuilder::new().order_by("").build().unwrap_err();
        assert_eq!(err, Error::MissingArgument("order expression"));
    }

    #[test]
    fn test_paging_order_is_fixed() {
        let b = QueryBuilder::new().skip(5).top(10);
        assert_eq!(query(b), "?$top=10&$skip=5");
    }

    #[test]
    fn test_negative_top_is_ignored() {
        let b = QueryBuilder::new().top(10).top(-1);
        assert_eq!(b.options().top, Some(10));
        assert!(b.error().is_none());
    }

    #[test]
    fn test_take_requests_plain_collection() {
        let b = QueryBuilder::new().take(25);
        assert_eq!(query(b), "?$top=25&$inlinecount=false&$first=false");
    }

    #[test]
    fn test_shape() {
        assert_eq!(
            query(QueryBuilder::new().shape(ResultShape::First)),
            "?$first=true"
        );
        assert_eq!(
            query(QueryBuilder::new().take(5).shape(ResultShape::List)),
            "?$top=5&$inlinecount=true&$first=false"
        );
    }

    #[test]
    fn test_empty_builder_renders_nothing() {
        assert_eq!(query(QueryBuilder::new()), "");
    }

    #[test]
    fn test_from_options_keeps_existing_filter() {
        let options = QueryBuilder::new()
            .where_field("a")
            .equal(1)
            .build()
            .unwrap();
        let b = QueryBuilder::from_options(options).also("b").equal(2);
        assert_eq!(filter_of(b), "(a eq 1) and (b eq 2)");
    }
}
