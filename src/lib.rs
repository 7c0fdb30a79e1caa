//! Schema-driven querystring codec for filter objects
//!
//! Filters such as `search`, `page` or `tags` live in URLs as flat strings
//! (`?search=shoes&page=2&tags=a&tags=b`) but are used as typed values. This
//! crate translates between the two, guided by a schema that declares each
//! field's kind once.
//!
//! * [`parse_query`] reads a query string (or a parsed [`Query`]) into
//!   [`Filters`]: repeated keys are grouped, array fields are decoded with
//!   their [`ArrayFormat`], strings are coerced to each field's kind, the
//!   result is cleaned and finally validated by the [`Schema`].
//! * [`build_query`] goes the other way, and [`build_url`] appends the result
//!   to a base URL.
//! * [`clean_object`], [`merge_filters`] and [`reset_filters`] are the small
//!   mapping helpers the rest is built from.
//!
//! ## Error handling
//!
//! Parsing only ever fails with the schema's own [`ValidationError`]. Values
//! that do not coerce stay strings and malformed array payloads decode to
//! empty lists; the schema then decides whether that is acceptable.
//!
//! ## Usage
//!
//! ```
//! use qs_filters::{
//!     build_url, filters, parse_query, ArrayFormat, BuildOptions, Field, FieldType,
//!     ObjectSchema, ParseOptions,
//! };
//!
//! let schema = ObjectSchema::new()
//!     .field("search", Field::string().optional())
//!     .field("page", Field::number().integer().min(1.0).default_value(1))
//!     .field("inStock", Field::boolean().optional())
//!     .field("tags", Field::array(FieldType::String).optional());
//!
//! let filters = parse_query(
//!     &schema,
//!     "?search=red+shoes&inStock=yes&tags=a,b",
//!     &ParseOptions::new().array_format(ArrayFormat::Comma),
//! )
//! .unwrap();
//! assert_eq!(
//!     filters,
//!     filters! {
//!         "search" => "red shoes",
//!         "page" => 1,
//!         "inStock" => true,
//!         "tags" => vec!["a", "b"],
//!     }
//! );
//!
//! let url = build_url(
//!     "/api/items",
//!     &schema,
//!     &filters! { "page" => 2, "tags" => vec!["a", "b"], "search" => "  " },
//!     &BuildOptions::new(),
//! );
//! assert_eq!(url, "/api/items?page=2&tags=a&tags=b");
//! ```

mod array;
mod clean;
mod coerce;
mod config;
mod de;
#[cfg(feature = "debounce")]
pub mod debounce;
mod error;
mod location;
mod merge;
pub mod query;
mod schema;
mod ser;
mod url;
mod value;

#[doc(inline)]
pub use clean::clean_object;
#[doc(inline)]
pub use coerce::{coerce, parse_bool, parse_date, parse_number};
#[doc(inline)]
pub use config::{ArrayFormat, ArrayFormats, BuildOptions, CleanOptions, MergeOptions, ParseOptions};
#[doc(inline)]
pub use de::{QueryInput, parse_query, parse_query_as};
#[doc(inline)]
pub use error::{Error, Issue, IssueCode, Result, ValidationError};
#[doc(inline)]
pub use location::{FilterSync, Location, MemoryLocation};
#[doc(inline)]
pub use merge::{merge_filters, reset_filters};
#[doc(inline)]
pub use query::Query;
#[doc(inline)]
pub use schema::{Check, Field, FieldType, Kind, ObjectSchema, Schema, UnknownKeys};
#[doc(inline)]
pub use ser::{build_query, build_query_from, to_filters};
#[doc(inline)]
pub use url::{build_url, compose_url, parse_url, split_url};
#[doc(inline)]
pub use value::{Filters, Value, format_iso, format_number};
