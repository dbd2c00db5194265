//! Immutable left-hand operands.
//!
//! An [`Operand`] is a field name or a function call composed around one
//! (`tolower(name)`, `year(dateCreated)`, ...). Every rewrite consumes the
//! operand and returns a new one; comparisons consume it and return a finished
//! [`Expr`]. Nothing here is stateful, so a fragment can be built once and
//! folded by any [`QueryBuilder`](crate::QueryBuilder).
//!
//! ```rust,ignore
//! use most_odata::Operand;
//!
//! let adults = Operand::field("age").ge(18);
//! let smiths = Operand::field("lastName").tolower().startswith("smith").eq(true);
//! assert_eq!(
//!     adults.and(smiths).to_string(),
//!     "(age ge 18) and (startswith(tolower(lastName),'smith') eq true)"
//! );
//! ```

use std::fmt;

use crate::Error;
use crate::ast::{CompareOperator, Expr, Value};
use crate::value::IntoODataValue;

#[derive(Clone, Debug, PartialEq)]
#[must_use]
pub struct Operand(Expr);

impl Operand {
    /// Operand referring to a plain field.
    pub fn field(name: impl Into<String>) -> Self {
        Self(Expr::Identifier(name.into()))
    }

    #[must_use]
    pub fn as_expr(&self) -> &Expr {
        &self.0
    }

    #[must_use]
    pub fn into_expr(self) -> Expr {
        self.0
    }

    fn wrap(self, function: &str) -> Self {
        Self(Expr::Function(function.to_owned(), vec![self.0]))
    }

    fn call_with(self, function: &str, args: Vec<Value>) -> Self {
        let mut all = Vec::with_capacity(args.len() + 1);
        all.push(self.0);
        all.extend(args.into_iter().map(Expr::Value));
        Self(Expr::Function(function.to_owned(), all))
    }

    // String transforms

    pub fn tolower(self) -> Self {
        self.wrap("tolower")
    }

    pub fn toupper(self) -> Self {
        self.wrap("toupper")
    }

    pub fn trim(self) -> Self {
        self.wrap("trim")
    }

    pub fn length(self) -> Self {
        self.wrap("length")
    }

    /// `startswith(operand,value)`
    pub fn startswith<V: IntoODataValue>(self, value: V) -> Self {
        self.call_with("startswith", vec![value.into_odata_value()])
    }

    /// `endswith(operand,value)`
    pub fn endswith<V: IntoODataValue>(self, value: V) -> Self {
        self.call_with("endswith", vec![value.into_odata_value()])
    }

    /// `indexof(operand,value)`
    pub fn indexof<V: IntoODataValue>(self, value: V) -> Self {
        self.call_with("indexof", vec![value.into_odata_value()])
    }

    /// `substring(operand,pos,length)`
    ///
    /// # Errors
    /// Returns `Error::InvalidArgument` if `length` is not positive or `pos` is negative.
    pub fn substring(self, pos: i64, length: i64) -> Result<Self, Error> {
        if length <= 0 {
            return Err(Error::InvalidArgument(
                "Length must be greater than zero.".to_owned(),
            ));
        }
        if pos < 0 {
            return Err(Error::InvalidArgument(
                "Position must be greater or equal to zero.".to_owned(),
            ));
        }
        Ok(self.call_with(
            "substring",
            vec![pos.into_odata_value(), length.into_odata_value()],
        ))
    }

    // Arithmetic

    pub fn round(self) -> Self {
        self.wrap("round")
    }

    pub fn floor(self) -> Self {
        self.wrap("floor")
    }

    pub fn ceiling(self) -> Self {
        self.wrap("ceiling")
    }

    // Date/time accessors

    pub fn date(self) -> Self {
        self.wrap("date")
    }

    pub fn year(self) -> Self {
        self.wrap("year")
    }

    pub fn month(self) -> Self {
        self.wrap("month")
    }

    pub fn day(self) -> Self {
        self.wrap("day")
    }

    pub fn hour(self) -> Self {
        self.wrap("hour")
    }

    pub fn minute(self) -> Self {
        self.wrap("minute")
    }

    pub fn second(self) -> Self {
        self.wrap("second")
    }

    // Comparisons

    #[must_use]
    pub fn compare<V: IntoODataValue>(self, op: CompareOperator, value: V) -> Expr {
        Expr::Compare(
            Box::new(self.0),
            op,
            Box::new(Expr::Value(value.into_odata_value())),
        )
    }

    #[must_use]
    pub fn eq<V: IntoODataValue>(self, value: V) -> Expr {
        self.compare(CompareOperator::Eq, value)
    }

    #[must_use]
    pub fn ne<V: IntoODataValue>(self, value: V) -> Expr {
        self.compare(CompareOperator::Ne, value)
    }

    #[must_use]
    pub fn gt<V: IntoODataValue>(self, value: V) -> Expr {
        self.compare(CompareOperator::Gt, value)
    }

    #[must_use]
    pub fn ge<V: IntoODataValue>(self, value: V) -> Expr {
        self.compare(CompareOperator::Ge, value)
    }

    #[must_use]
    pub fn lt<V: IntoODataValue>(self, value: V) -> Expr {
        self.compare(CompareOperator::Lt, value)
    }

    #[must_use]
    pub fn le<V: IntoODataValue>(self, value: V) -> Expr {
        self.compare(CompareOperator::Le, value)
    }

    /// Containment test, expressed as `contains(operand,value) ge 0`.
    #[must_use]
    pub fn contains<V: IntoODataValue>(self, value: V) -> Expr {
        self.call_with("contains", vec![value.into_odata_value()]).ge(0)
    }

    /// Inclusive range: `(operand ge low) and (operand le high)`.
    #[must_use]
    pub fn between<L: IntoODataValue, H: IntoODataValue>(self, low: L, high: H) -> Expr {
        self.clone().ge(low).and(self.le(high))
    }
}

impl From<&str> for Operand {
    fn from(name: &str) -> Self {
        Self::field(name)
    }
}

impl From<String> for Operand {
    fn from(name: String) -> Self {
        Self::field(name)
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
