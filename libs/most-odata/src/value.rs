//! Conversions from Rust values into filter [`Value`]s.

use crate::ast::{RawFilter, Value};

/// Trait for types that can be converted to `OData` AST values.
pub trait IntoODataValue {
    /// Convert this value into an `OData` AST value.
    fn into_odata_value(self) -> Value;
}

impl IntoODataValue for Value {
    fn into_odata_value(self) -> Value {
        self
    }
}

impl IntoODataValue for bool {
    fn into_odata_value(self) -> Value {
        Value::Bool(self)
    }
}

macro_rules! impl_integer {
    ($($t:ty),* $(,)?) => {
        $(
            impl IntoODataValue for $t {
                fn into_odata_value(self) -> Value {
                    Value::Number(self.into())
                }
            }
        )*
    };
}

impl_integer!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

// NaN and infinities have no JSON form; serde_json maps them to null as well.
impl IntoODataValue for f64 {
    fn into_odata_value(self) -> Value {
        serde_json::Number::from_f64(self).map_or(Value::Null, Value::Number)
    }
}

impl IntoODataValue for f32 {
    fn into_odata_value(self) -> Value {
        f64::from(self).into_odata_value()
    }
}

impl IntoODataValue for &str {
    fn into_odata_value(self) -> Value {
        Value::String(self.to_owned())
    }
}

impl IntoODataValue for String {
    fn into_odata_value(self) -> Value {
        Value::String(self)
    }
}

impl IntoODataValue for &String {
    fn into_odata_value(self) -> Value {
        Value::String(self.clone())
    }
}

impl IntoODataValue for RawFilter {
    fn into_odata_value(self) -> Value {
        Value::Raw(self)
    }
}

impl IntoODataValue for chrono::DateTime<chrono::Utc> {
    fn into_odata_value(self) -> Value {
        Value::DateTime(self.fixed_offset())
    }
}

impl IntoODataValue for chrono::DateTime<chrono::FixedOffset> {
    fn into_odata_value(self) -> Value {
        Value::DateTime(self)
    }
}

impl IntoODataValue for chrono::NaiveDate {
    fn into_odata_value(self) -> Value {
        Value::Date(self)
    }
}

impl IntoODataValue for chrono::NaiveTime {
    fn into_odata_value(self) -> Value {
        Value::Time(self)
    }
}

impl IntoODataValue for uuid::Uuid {
    fn into_odata_value(self) -> Value {
        Value::Uuid(self)
    }
}

impl<T: IntoODataValue> IntoODataValue for Option<T> {
    fn into_odata_value(self) -> Value {
        self.map_or(Value::Null, IntoODataValue::into_odata_value)
    }
}

impl<T: IntoODataValue> IntoODataValue for Vec<T> {
    fn into_odata_value(self) -> Value {
        Value::Array(
            self.into_iter()
                .map(IntoODataValue::into_odata_value)
                .collect(),
        )
    }
}

/// Dynamic JSON values map onto the closest literal kind; objects have no
/// literal form and are sent as their JSON text, quoted.
impl IntoODataValue for serde_json::Value {
    fn into_odata_value(self) -> Value {
        match self {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => Value::Number(n),
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => items.into_odata_value(),
            obj @ serde_json::Value::Object(_) => Value::String(obj.to_string()),
        }
    }
}
