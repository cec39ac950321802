//! Images of an offset source behind a point lens.
//!
//! Purpose
//! - Show a full solve next to the analytic answer, and print the refinement
//!   trace (triangle counts per generation).
//!
//! Run: `cargo run -p lenspoint --example point_mass_images`

use lenspoint::api::{point_mass_images, Limits, PointSolver, Profile, SolverCfg, Tracer, TriangleMesh};
use nalgebra::vector;

fn main() -> lenspoint::Result<()> {
    let lens = Tracer::single_lens(0.5, 1.0, vec![Profile::point_mass(vector![0.0, 0.0], 1.0)]);
    let source = vector![0.25, 0.1];
    let solver = PointSolver::new(SolverCfg::new(Limits::square(3.0), 0.5, 0.001))?;

    println!(
        "steps={} image_scale={:.6} final_scale={:.6}",
        solver.step_count(),
        solver.image_scale(),
        solver.final_scale()
    );
    for step in solver.steps(&lens, source, None)? {
        let step = step?;
        println!(
            "step={} initial={} filtered={} neighbourhood={} up_sampled={}",
            step.number,
            step.initial_triangles.len(),
            step.filtered_triangles.len(),
            step.neighbourhood.len(),
            step.up_sampled.len()
        );
    }

    let found = solver.solve(&lens, source, None)?;
    for (p, mu) in found.points.iter().zip(&found.magnifications) {
        println!("image x={:.6} y={:.6} magnification={mu:.4}", p.x, p.y);
    }
    println!("rejected={}", found.rejected);
    if let Some(expected) = point_mass_images(source, 1.0) {
        for e in expected {
            println!("analytic x={:.6} y={:.6}", e.x, e.y);
        }
    }
    Ok(())
}
