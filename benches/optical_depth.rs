use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use hcnm::cross_section::TabulatedCrossSection;
use hcnm::horizon_crossing::HorizonCrossing;
use hcnm::optical_depth::adaptive::AdaptiveParams;
use hcnm::optical_depth::OpticalDepthMethod;
use hcnm::orbit_geometry::OrbitGeometry;
use hcnm::planet::PlanetBody;

fn iss_crossing() -> HorizonCrossing {
    let geometry = OrbitGeometry::grazing(PlanetBody::earth(), 420.0).unwrap();
    HorizonCrossing::new(geometry, TabulatedCrossSection::new())
}

/// Single LOS at t = 40 s, 4 keV.
fn bench_single_los(c: &mut Criterion) {
    let crossing = iss_crossing();
    let mut group = c.benchmark_group("optical_depth/single_los");

    group.bench_function("fixed_grid", |b| {
        b.iter(|| crossing.optical_depth_fixed(black_box(4.0), black_box(40.0)))
    });

    for tol in [1e-6, 1e-9, 1e-12] {
        group.bench_function(format!("adaptive_tol={tol:.0e}"), |b| {
            b.iter(|| crossing.optical_depth_adaptive(black_box(4.0), black_box(40.0), tol))
        });
    }
    group.finish();
}

/// Random instants over the first 100 s of the crossing.
fn bench_random_instants(c: &mut Criterion) {
    let crossing = iss_crossing();
    let mut rng = StdRng::seed_from_u64(0xC0FFEE);
    let method = OpticalDepthMethod::Adaptive(AdaptiveParams::with_tolerance(1e-10).unwrap());

    c.bench_function("optical_depth/adaptive_random_t", |b| {
        b.iter_batched(
            || {
                (0..64)
                    .map(|_| rng.random_range(10.0..100.0))
                    .collect::<Vec<f64>>()
            },
            |times| {
                for t in times {
                    black_box(crossing.transmittance(4.0, t, &method).unwrap());
                }
            },
            BatchSize::SmallInput,
        )
    });
}

/// Energy × time grid, serial curves against the rayon batch.
fn bench_batch(c: &mut Criterion) {
    let crossing = iss_crossing();
    let energies: Vec<f64> = (0..8).map(|k| 1.5 + 0.5 * k as f64).collect();
    let times: Vec<f64> = (0..32).map(|k| 20.0 + 2.0 * k as f64).collect();
    let method = OpticalDepthMethod::Adaptive(AdaptiveParams::with_tolerance(1e-9).unwrap());

    let mut group = c.benchmark_group("optical_depth/grid_8x32");
    group.sample_size(20);

    group.bench_function("serial", |b| {
        b.iter(|| {
            energies
                .iter()
                .map(|&e| crossing.transmittance_curve(e, &times, &method).unwrap())
                .collect::<Vec<_>>()
        })
    });
    group.bench_function("rayon", |b| {
        b.iter(|| {
            crossing
                .transmittance_batch(&energies, &times, &method)
                .unwrap()
        })
    });
    group.finish();
}

criterion_group!(benches, bench_single_los, bench_random_instants, bench_batch);
criterion_main!(benches);
