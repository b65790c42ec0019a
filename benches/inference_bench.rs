//! Benchmarks for schema inference operations
//!
//! Run with: cargo bench --bench inference_bench

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use schema_inference::inference::{
    ChronoTimestampParser, FieldSchema, InferOptions, InferenceConfig, SchemaInferrer, Size,
    TypeTag, Value, classify,
};
use serde_json::json;

/// Generate sample records for benchmarking
fn generate_sample_records(count: usize) -> Vec<Value> {
    (0..count)
        .map(|i| {
            Value::from(json!({
                "id": i,
                "name": format!("User {}", i),
                "age": (20 + (i % 60)).to_string(),
                "balance": 1000.0 + (i as f64 * 10.5),
                "is_active": if i % 2 == 0 { "true" } else { "false" },
                "created_at": "2024-01-15T10:30:00Z",
                "tags": (0..(i % 5)).map(|t| format!("tag-{}", t)).collect::<Vec<_>>(),
                "address": {"city": "Berlin", "zip": format!("{:05}", i % 100000)},
                "notes": if i % 3 == 0 { serde_json::Value::Null } else { json!("n/a") }
            }))
        })
        .collect()
}

/// Benchmark classification of text literals
fn bench_classification(c: &mut Criterion) {
    let mut group = c.benchmark_group("classification");
    let parser = ChronoTimestampParser;

    let test_cases = vec![
        ("integer", "12345"),
        ("decimal", "-12.5"),
        ("boolean", "TRUE"),
        ("datetime", "2024-01-15T10:30:00Z"),
        ("date", "2024-01-15"),
        ("plain_text", "hello world"),
    ];

    for (name, text) in test_cases {
        let value = Value::Text(text.to_string());
        group.bench_with_input(BenchmarkId::new("classify", name), &value, |b, value| {
            b.iter(|| black_box(classify(value, &parser)));
        });
    }

    group.finish();
}

/// Benchmark end-to-end inference with varying record counts
fn bench_schema_inference(c: &mut Criterion) {
    let mut group = c.benchmark_group("schema_inference");
    let parallel = SchemaInferrer::new();
    let sequential = SchemaInferrer::with_config(InferenceConfig::builder().sequential().build());

    for count in [100, 1000, 10000].iter() {
        let records = generate_sample_records(*count);
        group.throughput(Throughput::Elements(*count as u64));

        group.bench_with_input(BenchmarkId::new("parallel", count), &records, |b, records| {
            b.iter(|| black_box(parallel.infer_records(records, InferOptions::new())));
        });

        group.bench_with_input(
            BenchmarkId::new("sequential", count),
            &records,
            |b, records| {
                b.iter(|| black_box(sequential.infer_records(records, InferOptions::new())));
            },
        );
    }

    group.finish();
}

/// Benchmark field merging
fn bench_field_merging(c: &mut Criterion) {
    let mut group = c.benchmark_group("field_merging");

    let mut integers = FieldSchema::new(TypeTag::Integer);
    let mut numbers = FieldSchema::new(TypeTag::Number);
    for i in 0..100_i64 {
        integers.observe(TypeTag::Integer, Some(Size::Integer(i)));
        numbers.observe(TypeTag::Number, Some(Size::Number(i as f64 / 3.0)));
    }

    group.bench_function("merge_numeric", |b| {
        b.iter(|| {
            let mut merged = integers.clone();
            merged.merge_with(&numbers);
            black_box(merged)
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_classification,
    bench_schema_inference,
    bench_field_merging
);
criterion_main!(benches);
