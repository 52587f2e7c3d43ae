//! # Lattice Optimizer Benchmark

use criterion::{criterion_group, criterion_main, Criterion};

use nalgebra::Vector3;
use traj_lib::{
    energy::{EnergyModel, EnergyParams},
    lattice::{LatticeOptimizer, LatticeParams},
    track::{TrackIndex, TrackIndexParams, TrackModel},
};

/// The trial circular track, unit-circle inner boundary and radius 6 outer
/// boundary sampled twice as densely.
fn trial_index() -> TrackIndex {
    let inner: Vec<_> = (0..=360)
        .step_by(10)
        .map(|deg| {
            let a = (deg as f64).to_radians();
            Vector3::new(a.cos(), a.sin(), 0.1 * a.sin())
        })
        .collect();
    let outer: Vec<_> = (0..=360)
        .step_by(5)
        .map(|deg| {
            let a = (deg as f64).to_radians();
            Vector3::new(6.0 * a.cos(), 6.0 * a.sin(), 0.1 * a.cos())
        })
        .collect();

    TrackIndex::new(
        TrackModel::build(&inner, &outer).unwrap(),
        TrackIndexParams::default(),
    )
    .unwrap()
}

fn lattice_benchmark(c: &mut Criterion) {
    let index = trial_index();

    c.bench_function("TrackIndex::vertical_angle_rad", |b| {
        b.iter(|| index.vertical_angle_rad(3.5, 0.2))
    });

    c.bench_function("TrackIndex::within_bounds", |b| {
        b.iter(|| index.within_bounds(3.5, 0.2))
    });

    // A reduced lattice so a single optimisation stays in benchable territory
    let params = LatticeParams {
        num_time_steps: 10,
        num_speed_levels: 8,
        num_steer_samples: 12,
        steer_limit_rad: std::f64::consts::FRAC_PI_2,
    };
    let optimizer = LatticeOptimizer::new(params, EnergyModel::new(EnergyParams::default()));

    c.bench_function("LatticeOptimizer::optimise", |b| {
        b.iter(|| optimizer.optimise(&index).unwrap())
    });
}

criterion_group!(benches, lattice_benchmark);
criterion_main!(benches);
