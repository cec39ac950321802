//! Deflection collaborators: the image-plane → source-plane map the solver inverts.
//!
//! Purpose
//! - `LensMap` is the only capability the solver consumes: trace points between
//!   planes, report plane redshifts, and evaluate magnification.
//! - `Tracer`, `Plane`, `Profile` and `Identity` are small reference models used
//!   by tests, benches and the CLI. The physics is minimal: planes
//!   are traced with unit distance-ratio scaling, `θ_{k+1} = θ_k − Σ α(θ_k)`.
//!
//! Conventions
//! - Points are `Vector2` with `.x` horizontal and `.y` vertical (arcseconds).
//! - Plane 0 is the image plane; the last plane is the default source plane.

mod profiles;
mod tracer;

pub use profiles::Profile;
pub use tracer::{Identity, Plane, TraceError, Tracer};

use nalgebra::{Matrix2, Vector2};

/// Image-plane → source-plane mapping.
///
/// Implementations must be deterministic for the duration of a solve. The solver
/// only calls `&self` methods and never retains returned buffers.
pub trait LensMap {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Redshift of each plane, ordered from the image plane outwards.
    fn plane_redshifts(&self) -> Vec<f64>;

    /// Trace `points` from plane `plane_from` to plane `plane_to`; one output per input.
    fn map_points(
        &self,
        points: &[Vector2<f64>],
        plane_from: usize,
        plane_to: usize,
    ) -> Result<Vec<Vector2<f64>>, Self::Error>;

    /// Signed magnification `1 / det(∂β/∂θ)` of the map plane 0 → `plane_index` at
    /// each point.
    ///
    /// The Jacobian uses central differences with step `buffer`, which also keeps
    /// the estimate finite next to singular points. Override when an analytic
    /// expression exists.
    fn magnification(
        &self,
        points: &[Vector2<f64>],
        plane_index: usize,
        buffer: f64,
    ) -> Result<Vec<f64>, Self::Error> {
        let probes = stencil(points, buffer);
        let traced = self.map_points(&probes, 0, plane_index)?;
        Ok(traced
            .chunks_exact(4)
            .map(|q| 1.0 / jacobian_from_stencil(q, buffer).determinant())
            .collect())
    }
}

/// Four probes per point: `+x, −x, +y, −y` at distance `buffer`.
fn stencil(points: &[Vector2<f64>], buffer: f64) -> Vec<Vector2<f64>> {
    let dx = Vector2::new(buffer, 0.0);
    let dy = Vector2::new(0.0, buffer);
    let mut out = Vec::with_capacity(points.len() * 4);
    for &p in points {
        out.extend_from_slice(&[p + dx, p - dx, p + dy, p - dy]);
    }
    out
}

/// Central-difference Jacobian; columns are ∂β/∂x and ∂β/∂y.
fn jacobian_from_stencil(q: &[Vector2<f64>], buffer: f64) -> Matrix2<f64> {
    let h2 = 2.0 * buffer;
    Matrix2::from_columns(&[(q[0] - q[1]) / h2, (q[2] - q[3]) / h2])
}
