use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Wire encoding for array-typed fields.
///
/// ```
/// use qs_filters::ArrayFormat;
///
/// assert_eq!(ArrayFormat::from("comma"), ArrayFormat::Comma);
/// // unknown names fall back to the default
/// assert_eq!(ArrayFormat::from("brackets"), ArrayFormat::Repeat);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum ArrayFormat {
    /// Use the `a=1&a=2` format.
    #[default]
    Repeat,
    /// Use the `a=1,2` format.
    Comma,
    /// Use the `a=["1","2"]` format.
    Json,
}

impl From<&str> for ArrayFormat {
    fn from(name: &str) -> Self {
        match name {
            "repeat" => ArrayFormat::Repeat,
            "comma" => ArrayFormat::Comma,
            "json" => ArrayFormat::Json,
            other => {
                tracing::debug!(format = other, "unknown array format, using repeat");
                ArrayFormat::Repeat
            }
        }
    }
}

impl From<String> for ArrayFormat {
    fn from(name: String) -> Self {
        Self::from(name.as_str())
    }
}

/// Array format selection: a per-field override, else the call-level
/// default, else [`ArrayFormat::Repeat`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ArrayFormats {
    array_format: Option<ArrayFormat>,
    array_key_format: BTreeMap<String, ArrayFormat>,
}

impl ArrayFormats {
    pub fn format_for(&self, key: &str) -> ArrayFormat {
        self.array_key_format
            .get(key)
            .copied()
            .or(self.array_format)
            .unwrap_or_default()
    }
}

/// Options for [`clean_object`](crate::clean_object).
///
/// Both flags default to `true`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CleanOptions {
    pub drop_empty: bool,
    pub trim_strings: bool,
}

impl Default for CleanOptions {
    fn default() -> Self {
        Self {
            drop_empty: true,
            trim_strings: true,
        }
    }
}

/// Options for [`merge_filters`](crate::merge_filters).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MergeOptions {
    /// Drop empty values from the merged result. Default is `true`.
    pub drop_empty: bool,
}

impl Default for MergeOptions {
    fn default() -> Self {
        Self { drop_empty: true }
    }
}

/// Configuration for turning a query string into filters.
///
/// ```
/// use qs_filters::{ArrayFormat, ParseOptions};
///
/// let options = ParseOptions::new()
///     .array_format(ArrayFormat::Comma)
///     .array_key_format("ids", ArrayFormat::Json)
///     .coerce_types(false);
/// assert_eq!(options.formats().format_for("ids"), ArrayFormat::Json);
/// assert_eq!(options.formats().format_for("tags"), ArrayFormat::Comma);
/// ```
///
/// Options can also be loaded from configuration files:
///
/// ```
/// let options: qs_filters::ParseOptions =
///     serde_json::from_str(r#"{ "arrayFormat": "json", "stripUnknown": true }"#).unwrap();
/// assert!(options.strips_unknown());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ParseOptions {
    drop_empty: bool,
    trim_strings: bool,
    strip_unknown: bool,
    coerce_types: bool,
    #[serde(flatten)]
    formats: ArrayFormats,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl ParseOptions {
    pub fn new() -> Self {
        Self {
            drop_empty: true,
            trim_strings: true,
            strip_unknown: false,
            coerce_types: true,
            formats: ArrayFormats::default(),
        }
    }

    /// Omit entries whose value is empty after cleaning. Default is `true`.
    #[must_use]
    pub fn drop_empty(mut self, drop_empty: bool) -> Self {
        self.drop_empty = drop_empty;
        self
    }

    /// Trim string values before the emptiness check. Default is `true`.
    #[must_use]
    pub fn trim_strings(mut self, trim_strings: bool) -> Self {
        self.trim_strings = trim_strings;
        self
    }

    /// Drop keys the schema does not declare. Default is `false`.
    #[must_use]
    pub fn strip_unknown(mut self, strip_unknown: bool) -> Self {
        self.strip_unknown = strip_unknown;
        self
    }

    /// Convert raw strings to each field's declared kind. Default is `true`.
    #[must_use]
    pub fn coerce_types(mut self, coerce_types: bool) -> Self {
        self.coerce_types = coerce_types;
        self
    }

    /// Default wire format for every array field.
    #[must_use]
    pub fn array_format(mut self, array_format: ArrayFormat) -> Self {
        self.formats.array_format = Some(array_format);
        self
    }

    /// Wire format for a single field, overriding [`Self::array_format`].
    #[must_use]
    pub fn array_key_format(mut self, key: impl Into<String>, format: ArrayFormat) -> Self {
        self.formats.array_key_format.insert(key.into(), format);
        self
    }

    pub fn clean_options(&self) -> CleanOptions {
        CleanOptions {
            drop_empty: self.drop_empty,
            trim_strings: self.trim_strings,
        }
    }

    pub fn strips_unknown(&self) -> bool {
        self.strip_unknown
    }

    pub fn coerces_types(&self) -> bool {
        self.coerce_types
    }

    pub fn formats(&self) -> &ArrayFormats {
        &self.formats
    }
}

/// Configuration for turning filters into a query string.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BuildOptions {
    drop_empty: bool,
    trim_strings: bool,
    strip_unknown: bool,
    encode_date: bool,
    #[serde(flatten)]
    formats: ArrayFormats,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl BuildOptions {
    pub fn new() -> Self {
        Self {
            drop_empty: true,
            trim_strings: true,
            strip_unknown: false,
            encode_date: true,
            formats: ArrayFormats::default(),
        }
    }

    /// Omit entries whose value is empty after cleaning. Default is `true`.
    #[must_use]
    pub fn drop_empty(mut self, drop_empty: bool) -> Self {
        self.drop_empty = drop_empty;
        self
    }

    /// Trim string values before the emptiness check. Default is `true`.
    #[must_use]
    pub fn trim_strings(mut self, trim_strings: bool) -> Self {
        self.trim_strings = trim_strings;
        self
    }

    /// Leave out keys the schema does not declare. Default is `false`.
    #[must_use]
    pub fn strip_unknown(mut self, strip_unknown: bool) -> Self {
        self.strip_unknown = strip_unknown;
        self
    }

    /// Write dates as ISO-8601 rather than RFC 2822. Default is `true`.
    #[must_use]
    pub fn encode_date(mut self, encode_date: bool) -> Self {
        self.encode_date = encode_date;
        self
    }

    /// Default wire format for every array field.
    #[must_use]
    pub fn array_format(mut self, array_format: ArrayFormat) -> Self {
        self.formats.array_format = Some(array_format);
        self
    }

    /// Wire format for a single field, overriding [`Self::array_format`].
    #[must_use]
    pub fn array_key_format(mut self, key: impl Into<String>, format: ArrayFormat) -> Self {
        self.formats.array_key_format.insert(key.into(), format);
        self
    }

    pub fn clean_options(&self) -> CleanOptions {
        CleanOptions {
            drop_empty: self.drop_empty,
            trim_strings: self.trim_strings,
        }
    }

    pub fn strips_unknown(&self) -> bool {
        self.strip_unknown
    }

    pub fn encodes_date(&self) -> bool {
        self.encode_date
    }

    pub fn formats(&self) -> &ArrayFormats {
        &self.formats
    }

    /// The merge settings implied by these options.
    pub fn merge_options(&self) -> MergeOptions {
        MergeOptions {
            drop_empty: self.drop_empty,
        }
    }
}
