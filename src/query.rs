//! The flat, string-only side of the codec.
//!
//! A [`Query`] is an ordered multimap of `(key, value)` pairs, matching the
//! URL query-string model: a key may appear more than once, distinct keys
//! keep their first-seen order and repeated values keep their order too.
//! Percent-encoding lives here and nowhere else; everything above this
//! module works with decoded strings.

mod decode;
mod encode;

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;

pub use decode::decode;
pub use encode::encode;

/// An ordered query-string multimap.
///
/// ```
/// use qs_filters::Query;
///
/// let mut query: Query = "?tags=a&tags=b&page=1".parse().unwrap();
/// assert_eq!(query.get_all("tags").collect::<Vec<_>>(), ["a", "b"]);
///
/// query.set("page", "2");
/// query.append("sort", "name asc");
/// assert_eq!(query.to_string(), "tags=a&tags=b&page=2&sort=name+asc");
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Query {
    pairs: Vec<(String, String)>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses an encoded query string.
    ///
    /// A leading `?` is optional. Empty segments (`a=1&&b=2`) are skipped and
    /// a key without `=` gets an empty value.
    pub fn parse(input: &str) -> Self {
        let input = input.strip_prefix('?').unwrap_or(input);
        let pairs = input
            .split('&')
            .filter(|segment| !segment.is_empty())
            .map(|segment| {
                let (key, value) = segment.split_once('=').unwrap_or((segment, ""));
                (decode(key).into_owned(), decode(value).into_owned())
            })
            .collect();
        Self { pairs }
    }

    /// Adds a pair after all existing pairs.
    pub fn append(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.pairs.push((key.into(), value.into()));
    }

    /// Sets `key` to a single value.
    ///
    /// The first existing occurrence is overwritten in place and any others
    /// are removed; otherwise the pair is appended.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let mut value = Some(value.into());
        self.pairs.retain_mut(|(k, v)| {
            if *k != key {
                return true;
            }
            match value.take() {
                Some(new) => {
                    *v = new;
                    true
                }
                None => false,
            }
        });
        if let Some(value) = value {
            self.pairs.push((key, value));
        }
    }

    /// The first value stored under `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Every value stored under `key`, in order.
    pub fn get_all<'a, 'k>(&'a self, key: &'k str) -> impl Iterator<Item = &'a str> + use<'a, 'k> {
        self.pairs
            .iter()
            .filter(move |(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.pairs.iter().any(|(k, _)| k == key)
    }

    /// Removes every pair stored under `key`.
    pub fn remove(&mut self, key: &str) {
        self.pairs.retain(|(k, _)| k != key);
    }

    /// Distinct keys in first-seen order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.grouped().into_keys()
    }

    /// Groups values by key: distinct keys in first-seen order, each with its
    /// values in encounter order.
    pub fn grouped(&self) -> IndexMap<&str, Vec<&str>> {
        let mut groups: IndexMap<&str, Vec<&str>> = IndexMap::new();
        for (key, value) in &self.pairs {
            groups.entry(key.as_str()).or_default().push(value.as_str());
        }
        groups
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of pairs, counting repeated keys.
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (key, value)) in self.pairs.iter().enumerate() {
            if i > 0 {
                f.write_str("&")?;
            }
            write!(f, "{}={}", encode(key), encode(value))?;
        }
        Ok(())
    }
}

impl FromStr for Query {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Query {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut query = Self::new();
        query.extend(iter);
        query
    }
}

impl<K: Into<String>, V: Into<String>> Extend<(K, V)> for Query {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        self.pairs
            .extend(iter.into_iter().map(|(k, v)| (k.into(), v.into())));
    }
}

impl IntoIterator for Query {
    type Item = (String, String);
    type IntoIter = std::vec::IntoIter<(String, String)>;

    fn into_iter(self) -> Self::IntoIter {
        self.pairs.into_iter()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parse_with_and_without_prefix() {
        assert_eq!(Query::parse("?a=1&b=2"), Query::parse("a=1&b=2"));
        assert!(Query::parse("").is_empty());
        assert!(Query::parse("?").is_empty());
    }

    #[test]
    fn parse_bare_keys_and_empty_segments() {
        let query = Query::parse("flag&&a=&b=x=y");
        let pairs: Vec<_> = query.iter().collect();
        assert_eq!(pairs, vec![("flag", ""), ("a", ""), ("b", "x=y")]);
    }

    #[test]
    fn set_overwrites_first_and_removes_rest() {
        let mut query = Query::parse("a=1&b=2&a=3");
        query.set("a", "9");
        assert_eq!(query.to_string(), "a=9&b=2");
        query.set("c", "x");
        assert_eq!(query.to_string(), "a=9&b=2&c=x");
    }

    #[test]
    fn get_outlives_key() {
        let query = Query::parse("a=1&b=2&a=3");
        let first = {
            let key = String::from("a");
            query.get(&key)
        };
        assert_eq!(first, Some("1"));
        assert_eq!(query.get("missing"), None);
        assert_eq!(query.get_all("a").collect::<Vec<_>>(), ["1", "3"]);
    }

    #[test]
    fn grouped_keeps_order() {
        let query = Query::parse("b=1&a=2&b=3");
        let grouped = query.grouped();
        let keys: Vec<_> = grouped.keys().copied().collect();
        assert_eq!(keys, ["b", "a"]);
        assert_eq!(grouped["b"], ["1", "3"]);
        assert_eq!(query.keys().collect::<Vec<_>>(), ["b", "a"]);
    }

    #[test]
    fn display_encodes() {
        let query: Query = [("tags", "a,b"), ("q", "red shoes")].into_iter().collect();
        assert_eq!(query.to_string(), "tags=a%2Cb&q=red+shoes");
        assert_eq!(Query::parse(&query.to_string()), query);
    }
}
