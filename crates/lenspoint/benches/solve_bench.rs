//! Criterion benchmarks for full point solves against reference lenses.
//! Focus: precision in {0.05, 0.01, 0.002} for a point lens and a lens + shear.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use lenspoint::api::{Limits, PointSolver, Profile, SolverCfg, Tracer};
use nalgebra::vector;

fn bench_solve(c: &mut Criterion) {
    let mut group = c.benchmark_group("solve");
    let point = Tracer::single_lens(0.5, 1.0, vec![Profile::point_mass(vector![0.0, 0.0], 1.0)]);
    let sheared = Tracer::single_lens(
        0.5,
        1.0,
        vec![
            Profile::isothermal(vector![0.0, 0.0], 1.0),
            Profile::ExternalShear {
                gamma_1: 0.08,
                gamma_2: -0.03,
            },
        ],
    );
    let source = vector![0.1, 0.05];
    for &precision in &[0.05f64, 0.01, 0.002] {
        let solver = PointSolver::new(SolverCfg::new(Limits::square(3.0), 0.5, precision)).unwrap();
        group.bench_with_input(
            BenchmarkId::new("point_mass", precision),
            &precision,
            |b, _| b.iter(|| solver.solve(&point, source, None).unwrap()),
        );
        group.bench_with_input(
            BenchmarkId::new("isothermal_shear", precision),
            &precision,
            |b, _| b.iter(|| solver.solve(&sheared, source, None).unwrap()),
        );
    }
    group.finish();
}

criterion_group!(benches, bench_solve);
criterion_main!(benches);
