//! Curated API surface (UNSTABLE).
//!
//! Re-exports for the CLI, benches and experiments. Breaking changes are allowed.

// Meshes
pub use crate::mesh::{
    triangle_contains, LatticeTriangles, Limits, MappedTriangles, Node, TriangleMesh,
};
// Lens models
pub use crate::lens::{Identity, LensMap, Plane, Profile, TraceError, Tracer};
// Solver
pub use crate::solver::{
    halvings, source_plane_index, Merge, PointSolver, Solutions, SolverCfg, Step, Steps,
};

use nalgebra::Vector2;

/// Analytic image positions of a point lens of Einstein radius `einstein_radius`
/// centred on the origin, for a source at `source` (non-zero).
///
/// Returns `(outer, inner)`: the image outside the Einstein ring and the one
/// inside it, on the opposite side of the lens.
pub fn point_mass_images(source: Vector2<f64>, einstein_radius: f64) -> Option<[Vector2<f64>; 2]> {
    let b = source.norm();
    if b == 0.0 || !b.is_finite() {
        return None;
    }
    let u = source / b;
    let disc = (b * b + 4.0 * einstein_radius * einstein_radius).sqrt();
    Some([u * ((b + disc) / 2.0), u * ((b - disc) / 2.0)])
}
