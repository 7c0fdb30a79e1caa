use crate::clean::clean_object;
use crate::config::{CleanOptions, MergeOptions};
use crate::value::Filters;

/// Shallow merge where `next` overwrites `current` key by key.
///
/// Keys already in `current` keep their position. With `drop_empty` set,
/// empty values are removed afterwards (strings are not trimmed), which is
/// how a field is cleared: merge in `Value::Null`.
///
/// ```
/// use qs_filters::{filters, merge_filters, MergeOptions, Value};
///
/// let merged = merge_filters(
///     &filters! { "name" => "John", "age" => 25 },
///     &filters! { "age" => Value::Null, "active" => true },
///     &MergeOptions { drop_empty: true },
/// );
/// assert_eq!(merged, filters! { "name" => "John", "active" => true });
/// ```
pub fn merge_filters(current: &Filters, next: &Filters, options: &MergeOptions) -> Filters {
    let mut merged = current.clone();
    merged.extend(next.iter().map(|(key, value)| (key.clone(), value.clone())));
    if options.drop_empty {
        let clean = CleanOptions {
            drop_empty: true,
            trim_strings: false,
        };
        clean_object(merged, &clean)
    } else {
        merged
    }
}

/// A fresh copy of `defaults`, or an empty mapping.
pub fn reset_filters(defaults: Option<&Filters>) -> Filters {
    defaults.cloned().unwrap_or_default()
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{filters, Value};

    #[test]
    fn keeps_nulls_without_drop_empty() {
        let merged = merge_filters(
            &filters! { "a" => 1, "b" => 2 },
            &filters! { "b" => Value::Null, "c" => " " },
            &MergeOptions { drop_empty: false },
        );
        assert_eq!(merged, filters! { "a" => 1, "b" => Value::Null, "c" => " " });
        let keys: Vec<_> = merged.keys().map(String::as_str).collect();
        assert_eq!(keys, ["a", "b", "c"]);
    }

    #[test]
    fn drop_empty_does_not_trim() {
        let merged = merge_filters(
            &Filters::new(),
            &filters! { "q" => " shoes " },
            &MergeOptions::default(),
        );
        assert_eq!(merged["q"], Value::from(" shoes "));
    }

    #[test]
    fn reset() {
        assert!(reset_filters(None).is_empty());
        let defaults = filters! { "page" => 1 };
        assert_eq!(reset_filters(Some(&defaults)), defaults);
    }
}
