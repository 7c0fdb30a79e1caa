//! Keeping filters in sync with a URL held somewhere else.
//!
//! The codec does not know where the current URL lives. A host supplies a
//! [`Location`] that can read the current path and query and navigate to a
//! new URL; [`FilterSync`] layers parsing, merging and building on top of it.

use crate::config::{BuildOptions, ParseOptions};
use crate::de::parse_query;
use crate::error::ValidationError;
use crate::merge::{merge_filters, reset_filters};
use crate::schema::Schema;
use crate::url::{build_url, split_url};
use crate::value::Filters;

/// Read/write access to the current URL.
pub trait Location {
    /// Path of the current URL, without the query.
    fn path(&self) -> String;

    /// Query of the current URL, with or without the leading `?`.
    fn search(&self) -> String;

    /// Navigates to `url`.
    fn push_url(&mut self, url: &str);
}

/// A [`Location`] held in memory, recording every URL pushed to it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MemoryLocation {
    path: String,
    search: String,
    history: Vec<String>,
}

impl MemoryLocation {
    /// Starts at `url`, which may carry a query.
    pub fn new(url: &str) -> Self {
        let (path, search) = split_url(url);
        Self {
            path: path.to_owned(),
            search: search.to_owned(),
            history: vec![url.to_owned()],
        }
    }

    /// Every URL visited, oldest first.
    pub fn history(&self) -> &[String] {
        &self.history
    }

    /// The current URL.
    pub fn url(&self) -> &str {
        self.history.last().map_or("", String::as_str)
    }
}

impl Location for MemoryLocation {
    fn path(&self) -> String {
        self.path.clone()
    }

    fn search(&self) -> String {
        self.search.clone()
    }

    fn push_url(&mut self, url: &str) {
        let (path, search) = split_url(url);
        self.path = path.to_owned();
        self.search = search.to_owned();
        self.history.push(url.to_owned());
    }
}

/// Filters read from, and written back to, a [`Location`].
///
/// ```
/// use qs_filters::{filters, Field, FilterSync, Location, MemoryLocation, ObjectSchema};
///
/// let schema = ObjectSchema::new()
///     .field("q", Field::string().optional())
///     .field("page", Field::number().optional());
/// let mut sync = FilterSync::new(&schema, MemoryLocation::new("/items?q=shoes"));
///
/// sync.set_filters(&filters! { "page" => 2 }, true).unwrap();
/// assert_eq!(sync.location().url(), "/items?q=shoes&page=2");
///
/// sync.reset(None);
/// assert_eq!(sync.location().url(), "/items");
/// ```
pub struct FilterSync<'s, S: ?Sized, L> {
    schema: &'s S,
    location: L,
    parse_options: ParseOptions,
    build_options: BuildOptions,
}

impl<'s, S, L> FilterSync<'s, S, L>
where
    S: Schema + ?Sized,
    L: Location,
{
    pub fn new(schema: &'s S, location: L) -> Self {
        Self {
            schema,
            location,
            parse_options: ParseOptions::default(),
            build_options: BuildOptions::default(),
        }
    }

    #[must_use]
    pub fn parse_options(mut self, options: ParseOptions) -> Self {
        self.parse_options = options;
        self
    }

    #[must_use]
    pub fn build_options(mut self, options: BuildOptions) -> Self {
        self.build_options = options;
        self
    }

    /// The filters in the current URL.
    pub fn filters(&self) -> Result<Filters, ValidationError> {
        parse_query(self.schema, self.location.search().as_str(), &self.parse_options)
    }

    /// Navigates to the URL for `next`.
    ///
    /// With `merge`, `next` is merged over the current filters first, so only
    /// the keys it names change; this fails if the current URL does not
    /// validate. Without `merge`, `next` replaces the filters outright.
    pub fn set_filters(&mut self, next: &Filters, merge: bool) -> Result<(), ValidationError> {
        let filters = if merge {
            merge_filters(&self.filters()?, next, &self.build_options.merge_options())
        } else {
            next.clone()
        };
        self.navigate(&filters);
        Ok(())
    }

    /// Navigates to the URL for `defaults`, or to the bare path.
    pub fn reset(&mut self, defaults: Option<&Filters>) {
        let filters = reset_filters(defaults);
        self.navigate(&filters);
    }

    pub fn location(&self) -> &L {
        &self.location
    }

    pub fn into_location(self) -> L {
        self.location
    }

    fn navigate(&mut self, filters: &Filters) {
        let url = build_url(&self.location.path(), self.schema, filters, &self.build_options);
        tracing::debug!(url = %url, "pushing filter url");
        self.location.push_url(&url);
    }
}
