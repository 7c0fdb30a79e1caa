use pretty_assertions::assert_eq;
use qs_filters::{
    filters, parse_query, parse_query_as, ArrayFormat, Field, FieldType, IssueCode, ObjectSchema,
    ParseOptions, Query, UnknownKeys, Value,
};
use serde::Deserialize;

fn schema() -> ObjectSchema {
    ObjectSchema::new()
        .field("search", Field::string().optional())
        .field("age", Field::number().optional())
        .field("active", Field::boolean().optional())
        .field("tags", Field::array(FieldType::String).optional())
        .field("ids", Field::array(FieldType::Number).optional())
}

#[test]
fn deserialize_scalars() {
    let filters = parse_query(
        &schema(),
        "?search=Carrot+City&age=42&active=false",
        &ParseOptions::new(),
    )
    .unwrap();
    assert_eq!(
        filters,
        filters! { "search" => "Carrot City", "age" => 42, "active" => false }
    );
}

#[test]
fn leading_question_mark_is_optional() {
    let options = ParseOptions::new();
    assert_eq!(
        parse_query(&schema(), "search=x&tags=a", &options).unwrap(),
        parse_query(&schema(), "?search=x&tags=a", &options).unwrap(),
    );
}

#[test]
fn empty_input_validates_empty_mapping() {
    assert!(parse_query(&schema(), "", &ParseOptions::new()).unwrap().is_empty());
    assert!(parse_query(&schema(), "?", &ParseOptions::new()).unwrap().is_empty());

    let required = ObjectSchema::new().field("page", Field::number());
    let err = parse_query(&required, "", &ParseOptions::new()).unwrap_err();
    assert_eq!(err.issues()[0].code, IssueCode::Required);
}

#[test]
fn deserialize_comma_arrays() {
    let options = ParseOptions::new().array_format(ArrayFormat::Comma);
    let filters = parse_query(&schema(), "?tags=a,b", &options).unwrap();
    assert_eq!(filters["tags"], Value::from(vec!["a", "b"]));

    let encoded = parse_query(&schema(), "?tags=a%2Cb", &options).unwrap();
    assert_eq!(encoded["tags"], Value::from(vec!["a", "b"]));

    let empty = parse_query(&schema(), "?tags=", &options).unwrap();
    assert_eq!(empty["tags"], Value::Array(vec![]));
}

#[test]
fn deserialize_repeat_arrays_in_order() {
    let filters = parse_query(&schema(), "tags=c&search=x&tags=a&tags=b", &ParseOptions::new())
        .unwrap();
    assert_eq!(filters["tags"], Value::from(vec!["c", "a", "b"]));

    let single = parse_query(&schema(), "tags=only", &ParseOptions::new()).unwrap();
    assert_eq!(single["tags"], Value::from(vec!["only"]));
}

#[test]
fn deserialize_json_arrays() {
    let options = ParseOptions::new().array_format(ArrayFormat::Json);
    let filters = parse_query(&schema(), r#"tags=["a","b"]&ids=[1,2]"#, &options).unwrap();
    assert_eq!(filters["tags"], Value::from(vec!["a", "b"]));
    assert_eq!(filters["ids"], Value::from(vec![1, 2]));
}

#[test]
fn malformed_json_degrades_to_empty() {
    let options = ParseOptions::new().array_format(ArrayFormat::Json);
    let filters = parse_query(&schema(), "?tags=[invalid-json", &options).unwrap();
    assert_eq!(filters, filters! { "tags" => Vec::<String>::new() });
}

#[test]
fn per_key_format_overrides_default() {
    let options = ParseOptions::new()
        .array_format(ArrayFormat::Json)
        .array_key_format("tags", ArrayFormat::Comma);
    let filters = parse_query(&schema(), "tags=a,b&ids=[3]", &options).unwrap();
    assert_eq!(filters["tags"], Value::from(vec!["a", "b"]));
    assert_eq!(filters["ids"], Value::from(vec![3]));
}

#[test]
fn bad_number_is_a_validation_error() {
    let options = ParseOptions::new().coerce_types(true);
    let err = parse_query(&schema(), "age=not-a-number", &options).unwrap_err();
    assert_eq!(err.fields(), vec!["age"]);
    insta::assert_snapshot!(err, @"validation failed: age: expected number, received string");
}

#[test]
fn bad_array_element_reports_its_index() {
    let err = parse_query(&schema(), "ids=1&ids=x&ids=3", &ParseOptions::new()).unwrap_err();
    assert_eq!(err.issues()[0].path, "ids.1");
    assert_eq!(err.fields(), vec!["ids"]);
}

#[test]
fn bad_boolean_is_a_validation_error() {
    let err = parse_query(&schema(), "active=maybe", &ParseOptions::new()).unwrap_err();
    assert_eq!(err.fields(), vec!["active"]);
}

#[test]
fn cleaning_happens_before_validation() {
    // the blank number is dropped before the schema sees it
    let filters = parse_query(&schema(), "age=+++&search=%20x%20", &ParseOptions::new()).unwrap();
    assert_eq!(filters, filters! { "search" => "x" });

    let keep = ParseOptions::new().drop_empty(false).trim_strings(false);
    let err = parse_query(&schema(), "age=", &keep).unwrap_err();
    assert_eq!(err.fields(), vec!["age"]);
}

#[test]
fn unknown_keys() {
    let passthrough = schema().unknown_keys(UnknownKeys::Passthrough);
    let filters = parse_query(&passthrough, "x=1&y=a&y=b", &ParseOptions::new()).unwrap();
    assert_eq!(filters, filters! { "x" => "1", "y" => vec!["a", "b"] });

    let options = ParseOptions::new().strip_unknown(true);
    let strict = schema().unknown_keys(UnknownKeys::Strict);
    assert!(parse_query(&strict, "x=1", &options).unwrap().is_empty());
    assert!(parse_query(&strict, "x=1", &ParseOptions::new()).is_err());
}

#[test]
fn deserialize_prebuilt_query() {
    let query: Query = [("tags", "a"), ("tags", "b"), ("age", "7")].into_iter().collect();
    let filters = parse_query(&schema(), &query, &ParseOptions::new()).unwrap();
    assert_eq!(filters, filters! { "tags" => vec!["a", "b"], "age" => 7 });
}

#[test]
fn deserialize_into_struct() {
    #[derive(Debug, PartialEq, Deserialize)]
    struct Search {
        search: String,
        age: u8,
        #[serde(default)]
        tags: Vec<String>,
    }

    let search: Search = parse_query_as(&schema(), "search=Acme&age=24", &ParseOptions::new())
        .unwrap();
    assert_eq!(
        search,
        Search {
            search: "Acme".to_owned(),
            age: 24,
            tags: vec![],
        }
    );
}

#[test]
fn dotted_field_names_in_errors() {
    let schema = ObjectSchema::new()
        .field("price.min", Field::number().optional())
        .field("filter.tags", Field::array(FieldType::Number).optional());

    let err = parse_query(&schema, "price.min=abc", &ParseOptions::new()).unwrap_err();
    assert_eq!(err.fields(), vec!["price.min"]);

    let err = parse_query(&schema, "filter.tags=x", &ParseOptions::new()).unwrap_err();
    assert_eq!(err.fields(), vec!["filter.tags"]);
    assert_eq!(err.issues()[0].path, "filter.tags.0");
}
