//! Benchmarks for schema validation and field remapping.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use fieldgate::parse::{RenameParser, RequestParser};
use fieldgate::schema::{FieldConstraint, FieldMap, FieldSpec, FieldType, Schema};

fn order_schema() -> Schema {
    Schema::builder("order")
        .field(
            FieldSpec::required("symbol", FieldType::String)
                .with_constraint(FieldConstraint::pattern("^[A-Z]{3,6}$")),
        )
        .field(
            FieldSpec::required("amount", FieldType::Number)
                .with_constraint(FieldConstraint::min_number(0.0)),
        )
        .optional("note", FieldType::String)
        .build()
        .expect("static schema")
}

fn order_fields() -> FieldMap {
    let mut fields = FieldMap::new();
    fields.insert("symbol".to_string(), serde_json::json!("BTCUSD"));
    fields.insert("amount".to_string(), serde_json::json!(1.5));
    fields
}

fn validation_benchmark(c: &mut Criterion) {
    let schema = order_schema();
    let fields = order_fields();

    c.bench_function("validate_ok", |b| {
        b.iter(|| black_box(schema.validate(black_box(&fields))))
    });

    let mut bad = order_fields();
    bad.insert("amount".to_string(), serde_json::json!("a lot"));
    bad.remove("symbol");

    c.bench_function("validate_err", |b| {
        b.iter(|| black_box(schema.validate(black_box(&bad))))
    });
}

fn parser_benchmark(c: &mut Criterion) {
    let schema = order_schema();
    let validated = schema.validate(&order_fields()).expect("valid fields");
    let parser = RenameParser::new().rename("symbol", "sym").rename("amount", "qty");

    c.bench_function("rename_parse", |b| {
        b.iter(|| black_box(parser.parse(black_box(&validated))))
    });
}

criterion_group!(benches, validation_benchmark, parser_benchmark);
criterion_main!(benches);
