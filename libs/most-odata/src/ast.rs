//! Filter expression tree and its single rendering pass.
//!
//! Every filter produced by this crate is an [`Expr`]. Rendering happens once,
//! through [`Display`](std::fmt::Display), which is where the parenthesization
//! and literal escaping rules live:
//!
//! - comparisons render as `left op right`
//! - logical nodes render fully parenthesized, `(left) and (right)`
//! - function calls render as `name(arg1,arg2)` with no space after commas
//! - values render through [`escape`](crate::escape::escape)

use std::fmt;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime};
use uuid::Uuid;

use crate::escape::escape;

#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    Compare(Box<Expr>, CompareOperator, Box<Expr>),
    And(Box<Expr>, Box<Expr>),
    Or(Box<Expr>, Box<Expr>),
    Function(String, Vec<Expr>),
    Identifier(String),
    Value(Value),
}

impl Expr {
    /// Combine two expressions with AND: `(self) and (other)`
    #[must_use]
    pub fn and(self, other: Expr) -> Expr {
        Expr::And(Box::new(self), Box::new(other))
    }

    /// Combine two expressions with OR: `(self) or (other)`
    #[must_use]
    pub fn or(self, other: Expr) -> Expr {
        Expr::Or(Box::new(self), Box::new(other))
    }

    /// Join `self` (left) and `other` (right) with the given logical operator.
    #[must_use]
    pub fn logical(self, op: LogicalOperator, other: Expr) -> Expr {
        match op {
            LogicalOperator::And => self.and(other),
            LogicalOperator::Or => self.or(other),
        }
    }

    /// Join two optional expressions. The left side is kept on the left of the
    /// resulting node; a missing side yields the other one unchanged.
    #[must_use]
    pub fn join(left: Option<Expr>, right: Option<Expr>, op: LogicalOperator) -> Option<Expr> {
        match (left, right) {
            (Some(l), Some(r)) => Some(l.logical(op, r)),
            (Some(l), None) => Some(l),
            (None, r) => r,
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Compare(left, op, right) => write!(f, "{left} {op} {right}"),
            Expr::And(left, right) => write!(f, "({left}) and ({right})"),
            Expr::Or(left, right) => write!(f, "({left}) or ({right})"),
            Expr::Function(name, args) => {
                write!(f, "{name}(")?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{arg}")?;
                }
                f.write_str(")")
            }
            Expr::Identifier(name) => f.write_str(name),
            Expr::Value(value) => f.write_str(&escape(value)),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CompareOperator {
    Eq,
    Ne,
    Gt,
    Ge,
    Lt,
    Le,
}

impl CompareOperator {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            CompareOperator::Eq => "eq",
            CompareOperator::Ne => "ne",
            CompareOperator::Gt => "gt",
            CompareOperator::Ge => "ge",
            CompareOperator::Lt => "lt",
            CompareOperator::Le => "le",
        }
    }
}

impl fmt::Display for CompareOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Logical operator used when folding a new clause into an accumulated filter.
///
/// The default is [`LogicalOperator::And`]: whenever no operator has been
/// staged, folding and preparing both join with `and`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LogicalOperator {
    #[default]
    And,
    Or,
}

impl LogicalOperator {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            LogicalOperator::And => "and",
            LogicalOperator::Or => "or",
        }
    }
}

impl fmt::Display for LogicalOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Right-hand operand of a comparison or function argument.
///
/// This is a closed set; [`escape`](crate::escape::escape) matches on it
/// exhaustively.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Null,
    Array(Vec<Value>),
    DateTime(DateTime<FixedOffset>),
    Bool(bool),
    Number(serde_json::Number),
    String(String),
    Raw(RawFilter),
    Date(NaiveDate),
    Time(NaiveTime),
    Uuid(Uuid),
}

/// Renders the escaped literal, as it appears in a filter.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&escape(self))
    }
}

/// A hand-written filter fragment that is emitted verbatim, never quoted.
///
/// ```rust,ignore
/// let q = QueryBuilder::new()
///     .where_field("dateCreated")
///     .greater_than(RawFilter::new("now()"))
///     .to_query_string()?;
/// assert_eq!(q, "?$filter=dateCreated gt now()");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct RawFilter(String);

impl RawFilter {
    pub fn new(expr: impl Into<String>) -> Self {
        Self(expr.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RawFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
