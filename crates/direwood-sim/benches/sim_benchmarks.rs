//! Collision and physics benchmarks.
//!
//! Run with: `cargo bench --bench sim_benchmarks`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use direwood_core::prelude::*;
use direwood_sim::physics::{self, WorldBounds};
use direwood_sim::{collision, vfx::VfxBuffer};

fn build_store(entity_count: usize) -> EntityStore {
    let mut store = EntityStore::new();
    for i in 0..entity_count {
        let x = (i % 200) as f64 * 2.0;
        let y = (i / 200) as f64 * 2.0;
        let mut header = EntityHeader::new(Vec2::new(x, y), 0.5, 50.0, 0);
        header.velocity = Vec2::new(1.0, 0.5);
        store.create(header, EntityKind::Enemy(EnemyData::default()));
    }
    store
}

fn bench_physics_step(c: &mut Criterion) {
    let mut group = c.benchmark_group("physics_step");
    let bounds = WorldBounds {
        width: 2000.0,
        height: 2000.0,
    };
    for &count in &[100usize, 1_000, MAX_ENTITIES] {
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, &count| {
            let mut store = build_store(count);
            b.iter(|| {
                physics::step(black_box(&mut store), bounds, 1.0 / 60.0);
            });
        });
    }
    group.finish();
}

fn bench_collision_resolve(c: &mut Criterion) {
    let mut group = c.benchmark_group("collision_resolve");
    for &count in &[100usize, 1_000] {
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, &count| {
            let mut store = build_store(count);
            let mut spatial = SpatialIndex::new();
            spatial.rebuild(&store);
            b.iter(|| {
                let mut vfx = VfxBuffer::new();
                black_box(collision::resolve(&mut store, &spatial, &mut vfx));
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_physics_step, bench_collision_resolve);
criterion_main!(benches);
