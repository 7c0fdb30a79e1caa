use criterion::{black_box, criterion_group, criterion_main, Criterion};
use qs_filters::{
    build_query, clean_object, filters, parse_query, ArrayFormat, BuildOptions, CleanOptions,
    Field, FieldType, Filters, ObjectSchema, ParseOptions,
};

fn schema() -> ObjectSchema {
    ObjectSchema::new()
        .field("search", Field::string().optional())
        .field("page", Field::number().integer().min(1.0).default_value(1))
        .field("active", Field::boolean().optional())
        .field("from", Field::date().optional())
        .field("tags", Field::array(FieldType::String).optional())
        .field("ids", Field::array(FieldType::Number).optional())
}

fn simple_filters() -> Filters {
    filters! {
        "search" => "test_user",
        "page" => 42,
        "active" => true,
    }
}

fn large_filters() -> Filters {
    filters! {
        "search" => "Hello, world! 你好世界",
        "tags" => (0..100).map(|i| format!("tag{i}")).collect::<Vec<_>>(),
        "ids" => (0..100).collect::<Vec<i32>>(),
    }
}

fn serialize_simple(c: &mut Criterion) {
    let schema = schema();
    let data = simple_filters();
    let options = BuildOptions::new();

    c.bench_function("serialize_simple", |b| {
        b.iter(|| build_query(&schema, black_box(&data), &options).to_string())
    });
}

fn serialize_large(c: &mut Criterion) {
    let schema = schema();
    let data = large_filters();

    for format in [ArrayFormat::Repeat, ArrayFormat::Comma, ArrayFormat::Json] {
        let options = BuildOptions::new().array_format(format);
        c.bench_function(&format!("serialize_large_{format:?}"), |b| {
            b.iter(|| build_query(&schema, black_box(&data), &options).to_string())
        });
    }
}

fn deserialize_simple(c: &mut Criterion) {
    let schema = schema();
    let query = "search=test_user&page=42&active=true&from=2024-01-15T10%3A30%3A00.000Z";
    let options = ParseOptions::new();

    c.bench_function("deserialize_simple", |b| {
        b.iter(|| parse_query(&schema, black_box(query), &options).unwrap())
    });
}

fn deserialize_large(c: &mut Criterion) {
    let schema = schema();
    let data = large_filters();

    for format in [ArrayFormat::Repeat, ArrayFormat::Comma, ArrayFormat::Json] {
        let query = build_query(&schema, &data, &BuildOptions::new().array_format(format))
            .to_string();
        let options = ParseOptions::new().array_format(format);
        c.bench_function(&format!("deserialize_large_{format:?}"), |b| {
            b.iter(|| parse_query(&schema, black_box(query.as_str()), &options).unwrap())
        });
    }
}

fn clean(c: &mut Criterion) {
    let data = filters! {
        "a" => "  padded  ",
        "b" => "",
        "c" => 1,
        "d" => vec!["x", "y"],
        "e" => Option::<String>::None,
    };
    let options = CleanOptions::default();

    c.bench_function("clean_object", |b| {
        b.iter(|| clean_object(black_box(data.clone()), &options))
    });
}

criterion_group!(serialize, serialize_simple, serialize_large);

criterion_group!(deserialize, deserialize_simple, deserialize_large);

criterion_group!(helpers, clean);

criterion_main!(serialize, deserialize, helpers);
