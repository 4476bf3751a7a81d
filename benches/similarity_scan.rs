//! Benchmark for the brute-force similarity scan, across store sizes and
//! vector widths.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use corral::domain::models::UpsertRecord;
use corral::domain::ports::VectorIndex;
use corral::infrastructure::vector::MemoryVectorIndex;

fn seeded_index(records: usize, dim: usize) -> MemoryVectorIndex {
    let index = MemoryVectorIndex::new();
    let batch: Vec<UpsertRecord> = (0..records)
        .map(|i| {
            // Deterministic pseudo-random-ish vectors, no rng dependency.
            let vector: Vec<f32> = (0..dim)
                .map(|j| (((i * 31 + j * 17) % 97) as f32 / 97.0) - 0.5)
                .collect();
            UpsertRecord {
                id: Some(format!("rec-{i}")),
                vector,
                text: format!("record number {i}"),
                ..UpsertRecord::default()
            }
        })
        .collect();
    index.upsert_many("bench", batch);
    index
}

fn bench_query(c: &mut Criterion) {
    let mut group = c.benchmark_group("similarity_scan");

    for &records in &[1_000usize, 10_000, 50_000] {
        let dim = 384;
        let index = seeded_index(records, dim);
        let query: Vec<f32> = (0..dim).map(|j| ((j % 13) as f32 / 13.0) - 0.5).collect();

        group.bench_with_input(
            BenchmarkId::new("top10", records),
            &records,
            |b, _| {
                b.iter(|| index.query(black_box("bench"), black_box(&query), 10, false));
            },
        );
    }

    group.finish();
}

fn bench_upsert(c: &mut Criterion) {
    c.bench_function("upsert_1k_records", |b| {
        b.iter(|| {
            let index = seeded_index(black_box(1_000), 384);
            black_box(index.len("bench"))
        });
    });
}

criterion_group!(benches, bench_query, bench_upsert);
criterion_main!(benches);
