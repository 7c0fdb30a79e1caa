//! Wire encodings for array-typed fields.
//!
//! Each encoding turns an ordered list of strings into query pairs and back.
//! Decoding never fails: malformed input yields an empty list.

use crate::config::ArrayFormat;

impl ArrayFormat {
    /// Encodes `values` as query pairs under `key`.
    ///
    /// ```
    /// use qs_filters::ArrayFormat;
    ///
    /// let values = ["a".to_owned(), "b".to_owned()];
    /// assert_eq!(
    ///     ArrayFormat::Comma.serialize("tags", &values),
    ///     [("tags".to_owned(), "a,b".to_owned())]
    /// );
    /// ```
    pub fn serialize(self, key: &str, values: &[String]) -> Vec<(String, String)> {
        match self {
            ArrayFormat::Repeat => repeat::serialize(key, values),
            ArrayFormat::Comma => comma::serialize(key, values),
            ArrayFormat::Json => json::serialize(key, values),
        }
    }

    /// Decodes the raw values collected for one key.
    pub fn deserialize(self, entries: &[&str]) -> Vec<String> {
        match self {
            ArrayFormat::Repeat => repeat::deserialize(entries),
            ArrayFormat::Comma => comma::deserialize(entries),
            ArrayFormat::Json => json::deserialize(entries),
        }
    }
}

/// One pair per value: `tags=a&tags=b`.
pub mod repeat {
    pub fn serialize(key: &str, values: &[String]) -> Vec<(String, String)> {
        values
            .iter()
            .map(|value| (key.to_owned(), value.clone()))
            .collect()
    }

    pub fn deserialize(entries: &[&str]) -> Vec<String> {
        entries.iter().map(|&entry| entry.to_owned()).collect()
    }
}

/// A single pair with values joined by a delimiter.
///
/// Only the first raw entry is read back; an empty entry is an empty list.
pub mod delimited {
    pub fn serialize<const DELIM: char>(key: &str, values: &[String]) -> Vec<(String, String)> {
        let mut buf = [0; 4];
        let delim: &str = DELIM.encode_utf8(&mut buf);
        vec![(key.to_owned(), values.join(delim))]
    }

    pub fn deserialize<const DELIM: char>(entries: &[&str]) -> Vec<String> {
        match entries.first() {
            None | Some(&"") => vec![],
            Some(first) => first.split(DELIM).map(str::to_owned).collect(),
        }
    }
}

/// A single pair with values joined by commas: `tags=a,b`.
pub mod comma {
    pub fn serialize(key: &str, values: &[String]) -> Vec<(String, String)> {
        super::delimited::serialize::<','>(key, values)
    }

    pub fn deserialize(entries: &[&str]) -> Vec<String> {
        super::delimited::deserialize::<','>(entries)
    }
}

/// A single pair holding a JSON array literal: `tags=["a","b"]`.
pub mod json {
    pub fn serialize(key: &str, values: &[String]) -> Vec<(String, String)> {
        // a slice of strings always serializes
        let literal = serde_json::to_string(values).unwrap_or_else(|_| "[]".to_owned());
        vec![(key.to_owned(), literal)]
    }

    /// Parses the first entry as a JSON array.
    ///
    /// String elements are taken as-is and other scalars as their JSON text,
    /// so `[1,true]` decodes to `["1", "true"]`. Anything that is not a JSON
    /// array decodes to an empty list.
    pub fn deserialize(entries: &[&str]) -> Vec<String> {
        let Some(first) = entries.first() else {
            return vec![];
        };
        match serde_json::from_str::<serde_json::Value>(first) {
            Ok(serde_json::Value::Array(items)) => items
                .into_iter()
                .map(|item| match item {
                    serde_json::Value::String(s) => s,
                    other => other.to_string(),
                })
                .collect(),
            Ok(other) => {
                tracing::debug!(payload = %other, "JSON array payload is not an array");
                vec![]
            }
            Err(error) => {
                tracing::debug!(%error, "malformed JSON array payload");
                vec![]
            }
        }
    }
}
