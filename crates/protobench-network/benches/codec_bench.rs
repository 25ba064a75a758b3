//! protobench-network 직렬화 성능 벤치마크
//!
//! 실행: cargo bench -p protobench-network
//!
//! 벤치마크 대상:
//! - 페이로드 생성 (레코드 1건 / 1,000건)
//! - 배치 인코딩 (JSON vs Protobuf)
//! - 배치 디코딩 (JSON vs Protobuf)

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use prost::Message;
use protobench_core::generator::{generate_record, generate_records};
use protobench_core::models::batch::BatchRequest;
use protobench_network::proto::{BatchDataRequest, DataItem};
use std::hint::black_box;

const BATCH_SIZES: [usize; 3] = [10, 100, 1_000];

fn proto_batch(size: usize) -> BatchDataRequest {
    BatchDataRequest {
        items: generate_records(size).into_iter().map(DataItem::from).collect(),
    }
}

/// 페이로드 생성 벤치마크
fn bench_generate(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate");

    group.bench_function("record", |b| b.iter(|| black_box(generate_record())));

    group.throughput(Throughput::Elements(1_000));
    group.bench_function("batch_1000", |b| {
        b.iter(|| black_box(generate_records(1_000)))
    });

    group.finish();
}

/// 배치 인코딩 벤치마크
fn bench_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode_batch");

    for size in BATCH_SIZES {
        let json_batch = BatchRequest {
            items: generate_records(size),
        };
        let proto = proto_batch(size);
        group.throughput(Throughput::Elements(size as u64));

        group.bench_with_input(BenchmarkId::new("json", size), &json_batch, |b, batch| {
            b.iter(|| black_box(serde_json::to_vec(batch).unwrap()));
        });
        group.bench_with_input(BenchmarkId::new("protobuf", size), &proto, |b, batch| {
            b.iter(|| black_box(batch.encode_to_vec()));
        });
    }

    group.finish();
}

/// 배치 디코딩 벤치마크
fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode_batch");

    for size in BATCH_SIZES {
        let json_bytes = serde_json::to_vec(&BatchRequest {
            items: generate_records(size),
        })
        .unwrap();
        let proto_bytes = proto_batch(size).encode_to_vec();
        group.throughput(Throughput::Elements(size as u64));

        group.bench_with_input(BenchmarkId::new("json", size), &json_bytes, |b, bytes| {
            b.iter(|| black_box(serde_json::from_slice::<BatchRequest>(bytes).unwrap()));
        });
        group.bench_with_input(
            BenchmarkId::new("protobuf", size),
            &proto_bytes,
            |b, bytes| {
                b.iter(|| black_box(BatchDataRequest::decode(bytes.as_slice()).unwrap()));
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_generate, bench_encode, bench_decode);
criterion_main!(benches);
