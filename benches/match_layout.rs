//! Criterion benchmarks for matching and zone layout.
//!
//! Benchmarks:
//!   - filter + name rank over a 2,000 plant catalog
//!   - A–Z library index over the same catalog
//!   - layout of a full 18-plant zone under each overflow policy
//!
//! Run with: cargo bench --bench match_layout

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use pocket_gardener::layout::{GardenZoneState, OverflowPolicy, ZONE_CAPACITY};
use pocket_gardener::{
    alphabetical_index, filter_catalog, rank_by_name, Plant, SiteConditions, SizeBand, Soil, Sun, Water,
    ZoneConditions,
};

fn pick<T: Copy>(rng: &mut StdRng, options: &[T], max: usize) -> Vec<T> {
    let count = rng.gen_range(1..=max);
    options.choose_multiple(rng, count).copied().collect()
}

fn catalog(len: usize) -> Vec<Plant> {
    let mut rng = StdRng::seed_from_u64(2024);
    (0..len)
        .map(|n| {
            Plant::new(n.to_string(), format!("Plant {:04}", rng.gen_range(0..1500)))
                .with_sun(pick(&mut rng, Sun::ALL, 3))
                .with_soil(pick(&mut rng, Soil::ALL, 4))
                .with_water(pick(&mut rng, Water::ALL, 4))
                .with_sizes(pick(&mut rng, SizeBand::ALL, 2))
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Benchmark: matchmaker
// ---------------------------------------------------------------------------

fn bench_matching(c: &mut Criterion) {
    let mut group = c.benchmark_group("matching");
    let plants = catalog(2_000);
    let conditions = SiteConditions::default();

    group.bench_function("filter_and_rank_2000", |b| {
        b.iter(|| {
            let mut matches = filter_catalog(black_box(&plants), &conditions);
            rank_by_name(&mut matches);
            black_box(matches.len())
        });
    });

    group.bench_function("library_index_2000", |b| {
        b.iter(|| black_box(alphabetical_index(black_box(&plants)).len()));
    });

    group.finish();
}

// ---------------------------------------------------------------------------
// Benchmark: zone layout
// ---------------------------------------------------------------------------

fn bench_layout(c: &mut Criterion) {
    let mut group = c.benchmark_group("zone_layout");
    let plants = catalog(ZONE_CAPACITY);
    let mut zone = GardenZoneState::new(
        1,
        ZoneConditions {
            sun: Sun::FullSun,
            soil: Soil::Loam,
            water: Water::DrainsWell,
        },
    );
    for plant in plants {
        zone.add_plant(plant);
    }

    for policy in [OverflowPolicy::Cascade, OverflowPolicy::ClassifiedOnly, OverflowPolicy::Qualifying] {
        group.bench_function(policy.as_str(), |b| {
            b.iter(|| black_box(zone.layout(black_box(policy))));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_matching, bench_layout);
criterion_main!(benches);
