//! The typed side of the codec: filter values and filter mappings.

use chrono::{DateTime, SecondsFormat, Utc};
use indexmap::IndexMap;
use serde::ser::{Serialize, SerializeSeq, Serializer};

/// A partial filter mapping, keyed by field name in insertion order.
pub type Filters = IndexMap<String, Value>;

/// A single filter value.
///
/// `Null` stands in for both "null" and "not set": the cleaner treats them
/// identically and the builder never emits either.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Date(DateTime<Utc>),
    Array(Vec<Value>),
}

impl Value {
    /// `true` for `Null` and for strings that are empty or whitespace-only.
    ///
    /// Arrays are never empty in this sense, even with no elements.
    pub fn is_empty(&self) -> bool {
        match self {
            Value::Null => true,
            Value::String(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<&DateTime<Utc>> {
        match self {
            Value::Date(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Name of the value's type as used in validation messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Date(_) => "date",
            Value::Array(_) => "array",
        }
    }

    /// Renders the value the way it is written into a query string.
    ///
    /// Dates use ISO-8601 with millisecond precision when `encode_date` is
    /// set and RFC 2822 otherwise. Arrays are joined with `,`.
    pub fn render(&self, encode_date: bool) -> String {
        match self {
            Value::Null => String::new(),
            Value::Bool(b) => b.to_string(),
            Value::Number(n) => format_number(*n),
            Value::String(s) => s.clone(),
            Value::Date(d) if encode_date => format_iso(d),
            Value::Date(d) => d.to_rfc2822(),
            Value::Array(items) => items
                .iter()
                .map(|item| item.render(encode_date))
                .collect::<Vec<_>>()
                .join(","),
        }
    }
}

/// ISO-8601 form used for dates, e.g. `2024-01-15T10:30:00.000Z`.
pub fn format_iso(date: &DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Shortest textual form of a number; integral values carry no fraction.
pub fn format_number(n: f64) -> String {
    if let Some(i) = integral(n) {
        return itoa::Buffer::new().format(i).to_owned();
    }
    if n.is_nan() {
        return "NaN".to_owned();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity" } else { "-Infinity" }.to_owned();
    }
    ryu::Buffer::new().format_finite(n).to_owned()
}

// integers beyond 2^53 are not exact in an f64, so leave them to ryu
fn integral(n: f64) -> Option<i64> {
    const MAX_SAFE: f64 = 9_007_199_254_740_991.0;
    if n.is_finite() && n.fract() == 0.0 && n.abs() <= MAX_SAFE {
        Some(n as i64)
    } else {
        None
    }
}

/// Converts a JSON object into filters. Nested objects are kept as their
/// JSON text since filters are flat.
pub(crate) fn filters_from_json(map: serde_json::Map<String, serde_json::Value>) -> Filters {
    map.into_iter()
        .map(|(key, value)| (key, Value::from(value)))
        .collect()
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Number(n) => match integral(*n) {
                Some(i) => serializer.serialize_i64(i),
                None => serializer.serialize_f64(*n),
            },
            Value::String(s) => serializer.serialize_str(s),
            Value::Date(d) => serializer.serialize_str(&format_iso(d)),
            Value::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
        }
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => n.as_f64().map_or(Value::Null, Value::Number),
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::Array(items.into_iter().map(Value::from).collect())
            }
            object @ serde_json::Value::Object(_) => Value::String(object.to_string()),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(d: DateTime<Utc>) -> Self {
        Value::Date(d)
    }
}

macro_rules! from_number {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                fn from(n: $ty) -> Self {
                    Value::Number(n as f64)
                }
            }
        )*
    };
}

from_number!(i8, i16, i32, i64, u8, u16, u32, u64, usize, f32, f64);

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::Array(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

/// Builds a [`Filters`] mapping from `key => value` pairs.
///
/// ```
/// let filters = qs_filters::filters! { "search" => "shoes", "page" => 2 };
/// assert_eq!(filters["page"], qs_filters::Value::Number(2.0));
/// ```
#[macro_export]
macro_rules! filters {
    () => {
        $crate::Filters::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut filters = $crate::Filters::new();
        $(
            filters.insert(::std::string::String::from($key), $crate::Value::from($value));
        )+
        filters
    }};
}
