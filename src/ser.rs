//! Turning filters into query strings.

use serde::Serialize;

use crate::clean::clean_object;
use crate::config::BuildOptions;
use crate::error::{Error, Result};
use crate::query::Query;
use crate::schema::Schema;
use crate::value::{Filters, Value, filters_from_json};

/// Builds a [`Query`] from a partial filter mapping.
///
/// The filters are cleaned first, so a value that will be dropped never
/// reaches array or date encoding. Then, key by key:
///
/// * keys the schema does not declare are written as a single string, unless
///   `strip_unknown` is set;
/// * array fields are written with their [`ArrayFormat`](crate::ArrayFormat),
///   item order preserved;
/// * scalar fields are written once, replacing any earlier value.
///
/// `Null` values are never written.
///
/// ```
/// use qs_filters::{build_query, filters, ArrayFormat, BuildOptions, Field, FieldType, ObjectSchema};
///
/// let schema = ObjectSchema::new()
///     .field("search", Field::string().optional())
///     .field("tags", Field::array(FieldType::String).optional());
///
/// let query = build_query(
///     &schema,
///     &filters! { "search" => "red shoes", "tags" => vec!["a", "b"] },
///     &BuildOptions::new().array_format(ArrayFormat::Comma),
/// );
/// assert_eq!(query.to_string(), "search=red+shoes&tags=a%2Cb");
/// ```
pub fn build_query<S>(schema: &S, filters: &Filters, options: &BuildOptions) -> Query
where
    S: Schema + ?Sized,
{
    let cleaned = clean_object(filters.clone(), &options.clean_options());
    let encode_date = options.encodes_date();
    let mut query = Query::new();

    for (key, value) in &cleaned {
        if value.is_null() {
            continue;
        }
        if schema.field_kind(key).is_none() {
            if options.strips_unknown() {
                tracing::trace!(key = %key, "leaving out unknown filter");
            } else {
                query.set(key.as_str(), value.render(encode_date));
            }
        } else if schema.is_array(key) {
            let items: Vec<String> = match value {
                Value::Array(items) => items.iter().map(|item| item.render(encode_date)).collect(),
                scalar => vec![scalar.render(encode_date)],
            };
            let format = options.formats().format_for(key);
            query.extend(format.serialize(key, &items));
        } else {
            query.set(key.as_str(), value.render(encode_date));
        }
    }

    query
}

/// Serializes `input` into filters and builds a [`Query`] from them.
///
/// `input` must serialize to a struct or map.
pub fn build_query_from<T, S>(schema: &S, input: &T, options: &BuildOptions) -> Result<Query>
where
    T: Serialize + ?Sized,
    S: Schema + ?Sized,
{
    let filters = to_filters(input)?;
    Ok(build_query(schema, &filters, options))
}

/// Serializes `input` into a filter mapping.
pub fn to_filters<T: Serialize + ?Sized>(input: &T) -> Result<Filters> {
    match serde_json::to_value(input)? {
        serde_json::Value::Object(map) => Ok(filters_from_json(map)),
        serde_json::Value::Array(_) => Err(Error::NotAMap("a sequence")),
        serde_json::Value::Null => Err(Error::NotAMap("null")),
        _ => Err(Error::NotAMap("a primitive")),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::config::ArrayFormat;
    use crate::filters;
    use crate::schema::{Field, FieldType, ObjectSchema};

    fn schema() -> ObjectSchema {
        ObjectSchema::new()
            .field("q", Field::string().optional())
            .field("n", Field::number().optional())
            .field("tags", Field::array(FieldType::String).optional())
    }

    #[test]
    fn scalars_and_unknowns() {
        let query = build_query(
            &schema(),
            &filters! { "q" => "x", "n" => 2.5, "other" => vec!["a", "b"], "gone" => Value::Null },
            &BuildOptions::new().drop_empty(false),
        );
        assert_eq!(query.to_string(), "q=x&n=2.5&other=a%2Cb");

        let stripped = BuildOptions::new().strip_unknown(true);
        let query = build_query(&schema(), &filters! { "q" => "x", "other" => "y" }, &stripped);
        assert_eq!(query.to_string(), "q=x");
    }

    #[test]
    fn scalar_in_array_field_becomes_single_item() {
        let options = BuildOptions::new().array_format(ArrayFormat::Json);
        let query = build_query(&schema(), &filters! { "tags" => "solo" }, &options);
        assert_eq!(query.get("tags"), Some(r#"["solo"]"#));
    }

    #[test]
    fn empty_array_per_format() {
        let input = filters! { "tags" => Vec::<String>::new() };
        let repeat = build_query(&schema(), &input, &BuildOptions::new());
        assert!(repeat.is_empty());
        let comma = BuildOptions::new().array_format(ArrayFormat::Comma);
        assert_eq!(build_query(&schema(), &input, &comma).to_string(), "tags=");
        let json = BuildOptions::new().array_format(ArrayFormat::Json);
        assert_eq!(build_query(&schema(), &input, &json).to_string(), "tags=%5B%5D");
    }

    #[test]
    fn rejects_non_maps() {
        assert!(matches!(to_filters(&[1, 2]), Err(Error::NotAMap("a sequence"))));
        assert!(matches!(to_filters(&3), Err(Error::NotAMap("a primitive"))));
    }
}
