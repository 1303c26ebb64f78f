//! Simulation benchmarks for bout_core.
//!
//! Run with: `cargo bench -p bout_core`

// Benchmark binaries don't need docs on macro-generated functions
#![allow(missing_docs)]

use bout_core::exchange::ExchangeResolver;
use bout_core::prelude::*;
use bout_core::spatial::RingModel;
use bout_core::state::CombatantState;
use bout_test_utils::fixtures::{demo_bout, fighter, nong_o, somchai};
use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Full five-round bouts, end to end.
pub fn bout_benchmark(c: &mut Criterion) {
    c.bench_function("full_bout", |b| {
        b.iter_batched(
            || demo_bout(black_box(42)),
            |bout| bout.count(),
            BatchSize::SmallInput,
        );
    });
}

/// One exchange resolution against fresh state.
pub fn exchange_benchmark(c: &mut Criterion) {
    let fighters = [fighter(somchai()), fighter(nong_o())];
    let config = BoutConfig::default();
    let resolver = ExchangeResolver::new(&fighters, &config);
    let positions = config.spatial.combat_positions();
    let mut rng = ChaCha8Rng::seed_from_u64(7);

    c.bench_function("exchange", |b| {
        b.iter_batched(
            || positions.map(CombatantState::new),
            |mut states| resolver.resolve(&mut states, &mut rng),
            BatchSize::SmallInput,
        );
    });
}

/// Capsule proximity over all part pairs.
pub fn spatial_benchmark(c: &mut Criterion) {
    let config = SpatialConfig::default();
    let ring = RingModel::new([175.0, 172.0], config.clone());
    let positions = config.combat_positions();
    let mut rng = ChaCha8Rng::seed_from_u64(7);

    c.bench_function("min_distance", |b| {
        b.iter(|| ring.min_distance(black_box(&positions)));
    });

    c.bench_function("ring_step", |b| {
        b.iter(|| {
            let mut step = positions;
            ring.step(&mut step, false, &mut rng);
            step
        });
    });
}

criterion_group!(benches, bout_benchmark, exchange_benchmark, spatial_benchmark);
criterion_main!(benches);
