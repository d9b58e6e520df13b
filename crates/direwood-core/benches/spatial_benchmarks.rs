//! Spatial-index and entity-store benchmarks.
//!
//! Run with: `cargo bench --bench spatial_benchmarks`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use direwood_core::prelude::*;

fn build_store(entity_count: usize) -> EntityStore {
    let mut store = EntityStore::new();
    for i in 0..entity_count {
        let x = (i % 200) as f64 * 10.0;
        let y = (i / 200) as f64 * 10.0;
        store.create(
            EntityHeader::new(Vec2::new(x, y), 0.5, 50.0, 0),
            EntityKind::Enemy(EnemyData::default()),
        );
    }
    store
}

fn bench_rebuild(c: &mut Criterion) {
    let mut group = c.benchmark_group("spatial_rebuild");
    for &count in &[100usize, 1_000, MAX_ENTITIES] {
        let store = build_store(count);
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, _| {
            let mut index = SpatialIndex::new();
            b.iter(|| {
                index.rebuild(black_box(&store));
            });
        });
    }
    group.finish();
}

fn bench_query_near(c: &mut Criterion) {
    let mut group = c.benchmark_group("spatial_query_near");
    for &count in &[100usize, 1_000, MAX_ENTITIES] {
        let store = build_store(count);
        let mut index = SpatialIndex::new();
        index.rebuild(&store);
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, _| {
            b.iter(|| {
                black_box(index.query_near(Vec2::new(500.0, 500.0), DETECTION_RANGE));
            });
        });
    }
    group.finish();
}

fn bench_compact(c: &mut Criterion) {
    c.bench_function("entity_store_compact_half_dead", |b| {
        b.iter_batched(
            || {
                let mut store = build_store(1_000);
                let ids: Vec<EntityId> = store.iter_active().map(|(id, _)| id).collect();
                for id in ids.iter().step_by(2) {
                    store.mark_removed(*id);
                }
                store
            },
            |mut store| {
                black_box(store.compact());
            },
            criterion::BatchSize::SmallInput,
        );
    });
}

criterion_group!(benches, bench_rebuild, bench_query_near, bench_compact);
criterion_main!(benches);
