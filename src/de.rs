//! Turning query strings into validated filters.
//!
//! Parsing runs in fixed stages over an interim mapping:
//!
//! 1. the input is read into a [`Query`] (unless it already is one) and its
//!    values are grouped by key, keeping encounter order;
//! 2. every key is classified against the schema. Unknown keys are carried
//!    through or dropped, array fields are decoded with their
//!    [`ArrayFormat`](crate::ArrayFormat) and scalar fields take their *last*
//!    occurrence. Values are coerced to the field's kind when asked;
//! 3. the interim mapping is cleaned;
//! 4. the cleaned mapping is handed to [`Schema::validate`], whose verdict is
//!    final.
//!
//! Nothing before stage 4 can fail. Malformed array payloads decode to empty
//! lists and unconvertible strings stay strings.

use std::borrow::Cow;

use serde::de::DeserializeOwned;

use crate::clean::clean_object;
use crate::coerce::coerce;
use crate::config::ParseOptions;
use crate::error::{Error, ValidationError};
use crate::query::Query;
use crate::schema::{Kind, Schema};
use crate::value::{Filters, Value};

/// Input accepted by [`parse_query`]: an encoded query string, with or
/// without the leading `?`, or an already parsed [`Query`].
#[derive(Clone, Copy, Debug)]
pub enum QueryInput<'a> {
    Str(&'a str),
    Query(&'a Query),
}

impl<'a> From<&'a str> for QueryInput<'a> {
    fn from(s: &'a str) -> Self {
        QueryInput::Str(s)
    }
}

impl<'a> From<&'a String> for QueryInput<'a> {
    fn from(s: &'a String) -> Self {
        QueryInput::Str(s)
    }
}

impl<'a> From<&'a Query> for QueryInput<'a> {
    fn from(query: &'a Query) -> Self {
        QueryInput::Query(query)
    }
}

impl<'a> QueryInput<'a> {
    fn into_query(self) -> Cow<'a, Query> {
        match self {
            QueryInput::Str(s) => Cow::Owned(Query::parse(s)),
            QueryInput::Query(query) => Cow::Borrowed(query),
        }
    }
}

/// Parses a query string into filters validated by `schema`.
///
/// ```
/// use qs_filters::{parse_query, Field, FieldType, ObjectSchema, ParseOptions, Value};
///
/// let schema = ObjectSchema::new()
///     .field("search", Field::string().optional())
///     .field("page", Field::number().optional())
///     .field("tags", Field::array(FieldType::String).optional());
///
/// let filters = parse_query(&schema, "?search=shoes&page=2&tags=a&tags=b", &ParseOptions::new())
///     .unwrap();
/// assert_eq!(filters["page"], Value::Number(2.0));
/// assert_eq!(filters["tags"], Value::from(vec!["a", "b"]));
///
/// let err = parse_query(&schema, "page=two", &ParseOptions::new()).unwrap_err();
/// assert_eq!(err.fields(), vec!["page"]);
/// ```
pub fn parse_query<'a, S>(
    schema: &S,
    input: impl Into<QueryInput<'a>>,
    options: &ParseOptions,
) -> Result<Filters, ValidationError>
where
    S: Schema + ?Sized,
{
    let query = input.into().into_query();
    let interim = decode_fields(schema, &query, options);
    let cleaned = clean_object(interim, &options.clean_options());
    schema.validate(cleaned).inspect_err(|err| {
        tracing::debug!(error = %err, "query failed schema validation");
    })
}

/// Parses a query string and deserializes the validated filters into `T`.
///
/// Dates arrive as ISO-8601 strings, so `T` can use any type that
/// deserializes from one (e.g. `chrono::DateTime<Utc>`).
pub fn parse_query_as<'a, T, S>(
    schema: &S,
    input: impl Into<QueryInput<'a>>,
    options: &ParseOptions,
) -> Result<T, Error>
where
    T: DeserializeOwned,
    S: Schema + ?Sized,
{
    let filters = parse_query(schema, input, options)?;
    Ok(serde_json::from_value(serde_json::to_value(&filters)?)?)
}

/// Stage 2: builds the interim mapping from grouped raw values.
fn decode_fields<S: Schema + ?Sized>(schema: &S, query: &Query, options: &ParseOptions) -> Filters {
    let mut interim = Filters::new();
    for (key, raw) in query.grouped() {
        let value = match schema.field_kind(key) {
            None if options.strips_unknown() => {
                tracing::trace!(key, "dropping unknown query key");
                continue;
            }
            None => unknown_value(raw),
            Some(Kind::Array(element)) => {
                let format = options.formats().format_for(key);
                let items = format.deserialize(&raw);
                Value::Array(
                    items
                        .into_iter()
                        .map(|item| scalar_value(&element, item, options))
                        .collect(),
                )
            }
            Some(kind) => {
                // last write wins for repeated scalar keys
                let last = raw.last().copied().unwrap_or_default();
                scalar_value(&kind, last.to_owned(), options)
            }
        };
        interim.insert(key.to_owned(), value);
    }
    interim
}

fn scalar_value(kind: &Kind, raw: String, options: &ParseOptions) -> Value {
    if options.coerces_types() {
        coerce(kind, raw)
    } else {
        Value::String(raw)
    }
}

fn unknown_value(raw: Vec<&str>) -> Value {
    match raw.as_slice() {
        [single] => Value::from(*single),
        _ => Value::Array(raw.iter().map(|s| Value::from(*s)).collect()),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::config::ArrayFormat;
    use crate::schema::{Field, FieldType, ObjectSchema, UnknownKeys};
    use crate::filters;

    fn schema() -> ObjectSchema {
        ObjectSchema::new()
            .field("q", Field::string().optional())
            .field("n", Field::number().optional())
            .field("ids", Field::array(FieldType::Number.optional()).optional())
            .unknown_keys(UnknownKeys::Passthrough)
    }

    #[test]
    fn last_scalar_occurrence_wins() {
        let out = parse_query(&schema(), "n=1&n=2&n=3", &ParseOptions::new()).unwrap();
        assert_eq!(out, filters! { "n" => 3 });
    }

    #[test]
    fn unknown_keys_single_or_list() {
        let out = parse_query(&schema(), "x=1&y=a&y=b", &ParseOptions::new()).unwrap();
        assert_eq!(out, filters! { "x" => "1", "y" => vec!["a", "b"] });

        let stripped = ParseOptions::new().strip_unknown(true);
        assert!(parse_query(&schema(), "x=1&y=a&y=b", &stripped).unwrap().is_empty());
    }

    #[test]
    fn array_elements_unwrap_before_coercion() {
        let options = ParseOptions::new().array_key_format("ids", ArrayFormat::Comma);
        let out = parse_query(&schema(), "ids=1,2,3", &options).unwrap();
        assert_eq!(out, filters! { "ids" => vec![1, 2, 3] });
    }

    #[test]
    fn accepts_parsed_query() {
        let mut query = Query::new();
        query.append("q", " shoes ");
        let out = parse_query(&schema(), &query, &ParseOptions::new()).unwrap();
        assert_eq!(out, filters! { "q" => "shoes" });
    }

    #[test]
    fn without_coercion_values_stay_strings() {
        let options = ParseOptions::new().coerce_types(false);
        let err = parse_query(&schema(), "n=5", &options).unwrap_err();
        assert_eq!(err.issues()[0].message, "expected number, received string");
    }
}
