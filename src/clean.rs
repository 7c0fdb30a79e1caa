use crate::config::CleanOptions;
use crate::value::{Filters, Value};

/// Trims and/or drops empty entries of a filter mapping.
///
/// Each entry is handled on its own: a string value is trimmed when
/// `trim_strings` is set, then the entry is omitted if the value is empty
/// and `drop_empty` is set. Only `Null` and blank strings count as empty;
/// `false`, `0` and empty arrays are kept.
///
/// ```
/// use qs_filters::{clean_object, filters, CleanOptions, Value};
///
/// let cleaned = clean_object(
///     filters! { "name" => " John ", "age" => "", "city" => Value::Null, "active" => false },
///     &CleanOptions::default(),
/// );
/// assert_eq!(cleaned, filters! { "name" => "John", "active" => false });
/// ```
pub fn clean_object(filters: Filters, options: &CleanOptions) -> Filters {
    filters
        .into_iter()
        .filter_map(|(key, value)| {
            let value = match value {
                Value::String(s) if options.trim_strings => Value::String(trim_owned(s)),
                value => value,
            };
            if options.drop_empty && value.is_empty() {
                tracing::trace!(key = %key, "dropping empty value");
                None
            } else {
                Some((key, value))
            }
        })
        .collect()
}

fn trim_owned(s: String) -> String {
    let trimmed = s.trim();
    if trimmed.len() == s.len() {
        s
    } else {
        trimmed.to_owned()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::filters;

    #[test]
    fn flags_are_independent() {
        let input = filters! { "a" => "  x  ", "b" => "   ", "c" => Value::Null };

        let trim_only = CleanOptions { drop_empty: false, trim_strings: true };
        assert_eq!(
            clean_object(input.clone(), &trim_only),
            filters! { "a" => "x", "b" => "", "c" => Value::Null }
        );

        let drop_only = CleanOptions { drop_empty: true, trim_strings: false };
        assert_eq!(clean_object(input.clone(), &drop_only), filters! { "a" => "  x  " });

        let neither = CleanOptions { drop_empty: false, trim_strings: false };
        assert_eq!(clean_object(input.clone(), &neither), input);
    }

    #[test]
    fn empty_arrays_survive() {
        let input = filters! { "tags" => Vec::<String>::new(), "n" => 0 };
        assert_eq!(clean_object(input.clone(), &CleanOptions::default()), input);
    }

    #[test]
    fn keeps_key_order() {
        let cleaned = clean_object(
            filters! { "z" => "1", "y" => "", "a" => "2" },
            &CleanOptions::default(),
        );
        let keys: Vec<_> = cleaned.keys().map(String::as_str).collect();
        assert_eq!(keys, ["z", "a"]);
    }
}
