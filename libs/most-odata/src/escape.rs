//! Literal escaping for filter values.

use chrono::SecondsFormat;

use crate::ast::Value;

/// Render a value as an `OData` literal.
///
/// | Value      | Rendering                                   |
/// |------------|---------------------------------------------|
/// | `Null`     | `null`                                      |
/// | `Array`    | `[a,b,c]`, elements escaped recursively     |
/// | `DateTime` | `'2024-01-02T03:04:05+00:00'`               |
/// | `Bool`     | `true` / `false`                            |
/// | `Number`   | canonical JSON number, unquoted             |
/// | `String`   | `'text'`, embedded quotes are NOT doubled   |
/// | `Raw`      | the fragment text, unquoted                 |
/// | other      | string form, single-quoted                  |
///
/// Strings are wrapped verbatim. A value such as `a'b` renders as `'a'b'`;
/// servers that require doubled quotes must receive a pre-escaped string or a
/// [`RawFilter`](crate::ast::RawFilter).
#[must_use]
pub fn escape(value: &Value) -> String {
    match value {
        Value::Null => "null".to_owned(),
        Value::Array(items) => {
            let items: Vec<String> = items.iter().map(escape).collect();
            format!("[{}]", items.join(","))
        }
        Value::DateTime(dt) => quote(&dt.to_rfc3339_opts(SecondsFormat::Secs, false)),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => quote(s),
        Value::Raw(raw) => raw.as_str().to_owned(),
        Value::Date(d) => quote(&d.to_string()),
        Value::Time(t) => quote(&t.to_string()),
        Value::Uuid(u) => quote(&u.hyphenated().to_string()),
    }
}

fn quote(s: &str) -> String {
    format!("'{s}'")
}
