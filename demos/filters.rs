use qs_filters::{
    build_url, parse_query, ArrayFormat, BuildOptions, Field, FieldType, FilterSync,
    MemoryLocation, ObjectSchema, ParseOptions, Value, filters,
};

fn main() {
    let schema = ObjectSchema::new()
        .field("search", Field::string().optional())
        .field("page", Field::number().integer().min(1.0).default_value(1))
        .field("inStock", Field::boolean().optional())
        .field("tags", Field::array(FieldType::String).optional());

    let options = ParseOptions::new().array_format(ArrayFormat::Comma);
    let filters = parse_query(&schema, "?search=red+shoes&tags=sale,new&inStock=1", &options)
        .unwrap();
    println!("{:?}", filters);

    let url = build_url(
        "/api/items",
        &schema,
        &filters,
        &BuildOptions::new().array_format(ArrayFormat::Json),
    );
    println!("{}", url);

    let mut sync = FilterSync::new(&schema, MemoryLocation::new("/items?search=shoes&page=3"))
        .parse_options(options)
        .build_options(BuildOptions::new().array_format(ArrayFormat::Comma));
    sync.set_filters(&filters! { "page" => Value::Null, "tags" => vec!["sale"] }, true)
        .unwrap();
    sync.reset(Some(&schema.defaults()));
    for url in sync.location().history() {
        println!("{}", url);
    }

    match parse_query(&schema, "page=0", &ParseOptions::new()) {
        Ok(filters) => println!("{:?}", filters),
        Err(err) => println!("{}", err),
    }
}
