//! Criterion benchmarks for the lattice mesh.
//! Focus sizes: coarse scale in {0.5, 0.2, 0.1} over a 6″ × 6″ box.
//! Results: by default under target/criterion.

use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use lenspoint::api::{LatticeTriangles, Limits, TriangleMesh};
use nalgebra::Vector2;
use rand::{rngs::StdRng, Rng, SeedableRng};

fn bench_mesh(c: &mut Criterion) {
    let mut group = c.benchmark_group("mesh");
    let limits = Limits::square(3.0);
    for &scale in &[0.5f64, 0.2, 0.1] {
        group.bench_with_input(BenchmarkId::new("build", scale), &scale, |b, &s| {
            b.iter(|| LatticeTriangles::for_limits_and_scale(&limits, s).unwrap())
        });

        group.bench_with_input(BenchmarkId::new("up_sample", scale), &scale, |b, &s| {
            b.iter_batched(
                || LatticeTriangles::for_limits_and_scale(&limits, s).unwrap(),
                |mesh| {
                    let _up = mesh.up_sample().unwrap();
                },
                BatchSize::SmallInput,
            )
        });

        group.bench_with_input(
            BenchmarkId::new("containing_indices", scale),
            &scale,
            |b, &s| {
                let mesh = LatticeTriangles::for_limits_and_scale(&limits, s).unwrap();
                let mapped = mesh.with_mapped_vertices(mesh.vertices()).unwrap();
                let mut rng = StdRng::seed_from_u64(9);
                b.iter_batched(
                    || Vector2::new(rng.gen_range(-3.0..3.0), rng.gen_range(-3.0..3.0)),
                    |p| {
                        let _hits = mapped.containing_indices(p);
                    },
                    BatchSize::SmallInput,
                )
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_mesh);
criterion_main!(benches);
