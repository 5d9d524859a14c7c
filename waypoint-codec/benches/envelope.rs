//! Envelope codec benchmarks.
//!
//! These benchmarks measure request encoding and reply decoding
//! for service records of increasing size.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use serde_json::json;
use waypoint_codec::{ResponseEnvelope, decode_response, encode_find_request};
use waypoint_core::ServiceRecord;

fn create_reply(instances: usize) -> Vec<u8> {
    let record = ServiceRecord::new(json!({
        "name": "orders-service",
        "instances": (0..instances)
            .map(|i| json!({"host": format!("10.0.{}.{}", i / 256, i % 256), "port": 8080}))
            .collect::<Vec<_>>(),
    }));
    ResponseEnvelope::new("bench", record).to_bytes().unwrap()
}

/// Benchmark building and serializing a `find` request.
fn bench_encode_find(c: &mut Criterion) {
    c.bench_function("encode_find", |b| {
        b.iter(|| {
            let bytes = encode_find_request(black_box("orders-service"))
                .to_bytes()
                .unwrap();
            black_box(bytes)
        });
    });
}

/// Benchmark decoding replies at various record sizes.
fn bench_decode_response(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode_response");

    for instances in [1, 16, 256, 4096] {
        let payload = create_reply(instances);
        group.throughput(Throughput::Bytes(payload.len() as u64));

        group.bench_with_input(
            BenchmarkId::from_parameter(instances),
            &payload,
            |b, payload| {
                b.iter(|| black_box(decode_response(black_box(payload)).unwrap()));
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_encode_find, bench_decode_response);
criterion_main!(benches);
