//! Best-effort conversion of raw query strings into typed values.
//!
//! Coercion never fails. A string that does not convert is returned as
//! [`Value::String`] unchanged and left for schema validation to reject.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};

use crate::schema::Kind;
use crate::value::Value;

/// Converts `raw` to the given kind, falling back to the raw string.
///
/// An array kind coerces `raw` as one of its elements.
///
/// ```
/// use qs_filters::{coerce, Kind, Value};
///
/// assert_eq!(coerce(&Kind::Number, "42".into()), Value::Number(42.0));
/// assert_eq!(coerce(&Kind::Boolean, "Yes".into()), Value::Bool(true));
/// assert_eq!(coerce(&Kind::Number, "abc".into()), Value::String("abc".into()));
/// ```
pub fn coerce(kind: &Kind, raw: String) -> Value {
    let coerced = match kind {
        Kind::String => return Value::String(raw),
        Kind::Array(element) => return coerce(element, raw),
        Kind::Number => parse_number(&raw).map(Value::Number),
        Kind::Boolean => parse_bool(&raw).map(Value::Bool),
        Kind::Date => parse_date(&raw).map(Value::Date),
    };
    coerced.unwrap_or_else(|| {
        tracing::trace!(raw = %raw, kind = kind.name(), "coercion fell back to raw string");
        Value::String(raw)
    })
}

/// Parses a finite decimal number, ignoring surrounding whitespace.
pub fn parse_number(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// `1`/`true`/`yes` and `0`/`false`/`no`, case-insensitively.
pub fn parse_bool(raw: &str) -> Option<bool> {
    const TRUE: [&str; 3] = ["1", "true", "yes"];
    const FALSE: [&str; 3] = ["0", "false", "no"];

    if TRUE.iter().any(|t| raw.eq_ignore_ascii_case(t)) {
        Some(true)
    } else if FALSE.iter().any(|f| raw.eq_ignore_ascii_case(f)) {
        Some(false)
    } else {
        None
    }
}

const NAIVE_DATE_TIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
];

/// Parses a calendar date or date-time.
///
/// Accepts RFC 3339, RFC 2822, date-times without an offset (taken as UTC)
/// and plain `YYYY-MM-DD` dates (midnight UTC).
pub fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(date) = DateTime::parse_from_rfc3339(s).or_else(|_| DateTime::parse_from_rfc2822(s)) {
        return Some(date.with_timezone(&Utc));
    }
    NAIVE_DATE_TIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(s, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
        .map(|naive| Utc.from_utc_datetime(&naive))
}
