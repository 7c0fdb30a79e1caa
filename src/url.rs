//! Joining built query strings onto URLs, and reading them back out.

use crate::config::{BuildOptions, ParseOptions};
use crate::de::parse_query;
use crate::error::ValidationError;
use crate::schema::Schema;
use crate::ser::build_query;
use crate::value::Filters;

/// Appends an encoded query string to `base_url`.
///
/// An empty query leaves `base_url` untouched. Otherwise the query is joined
/// with `?`, or with `&` when `base_url` already carries a query, and with
/// nothing when `base_url` already ends in `?` or `&`.
///
/// ```
/// use qs_filters::compose_url;
///
/// assert_eq!(compose_url("/items", ""), "/items");
/// assert_eq!(compose_url("/items", "a=1"), "/items?a=1");
/// assert_eq!(compose_url("/items?x=1", "a=1"), "/items?x=1&a=1");
/// assert_eq!(compose_url("/items?", "a=1"), "/items?a=1");
/// assert_eq!(compose_url("/items?x=1&", "a=1"), "/items?x=1&a=1");
/// ```
pub fn compose_url(base_url: &str, query: &str) -> String {
    if query.is_empty() {
        return base_url.to_owned();
    }
    let separator = if base_url.contains('?') {
        if base_url.ends_with('?') || base_url.ends_with('&') {
            ""
        } else {
            "&"
        }
    } else {
        "?"
    };
    let mut url = String::with_capacity(base_url.len() + separator.len() + query.len());
    url.push_str(base_url);
    url.push_str(separator);
    url.push_str(query);
    url
}

/// Builds the query for `filters` and appends it to `base_url`.
///
/// ```
/// use qs_filters::{build_url, filters, ArrayFormat, BuildOptions, Field, FieldType, ObjectSchema};
///
/// let schema = ObjectSchema::new().field("tags", Field::array(FieldType::String).optional());
/// let filters = filters! { "tags" => vec!["a", "b"] };
///
/// let url = build_url("/api/items", &schema, &filters, &BuildOptions::new());
/// assert_eq!(url, "/api/items?tags=a&tags=b");
/// ```
pub fn build_url<S>(base_url: &str, schema: &S, filters: &Filters, options: &BuildOptions) -> String
where
    S: Schema + ?Sized,
{
    let query = build_query(schema, filters, options);
    compose_url(base_url, &query.to_string())
}

/// Splits a URL into the part before the query and the query itself.
///
/// Any `#fragment` is discarded. The query excludes the `?`.
///
/// ```
/// use qs_filters::split_url;
///
/// assert_eq!(split_url("/items?page=2#top"), ("/items", "page=2"));
/// assert_eq!(split_url("/items#top"), ("/items", ""));
/// ```
pub fn split_url(url: &str) -> (&str, &str) {
    let url = url.split_once('#').map_or(url, |(before, _)| before);
    url.split_once('?').unwrap_or((url, ""))
}

/// Parses the filters carried by a full URL, e.g. a request URI during
/// server-side rendering.
pub fn parse_url<S>(schema: &S, url: &str, options: &ParseOptions) -> Result<Filters, ValidationError>
where
    S: Schema + ?Sized,
{
    let (_, query) = split_url(url);
    parse_query(schema, query, options)
}
