//! Adaptive triangle-subdivision solver for the lens equation.
//!
//! Purpose
//! - Invert a deflection map without an analytic inverse: find every image-plane
//!   point whose traced position is a given source-plane point, to a requested
//!   precision, including multiple images.
//!
//! Pieces
//! - `Steps`: one generation per item (trace vertices, containment, neighbourhood,
//!   up-sample). Forward-only and consumed once.
//! - `PointSolver`: step count from precision, runs `Steps` to completion, merges
//!   duplicate centroids, drops low-magnification candidates.
//!
//! Notes
//! - The number of generations depends only on `scale / pixel_scale_precision`,
//!   never on convergence, so a solve always terminates.
//! - Code cross-refs: `mesh::{TriangleMesh, LatticeTriangles}`, `lens::LensMap`

mod point;
mod steps;
mod types;

pub use point::{halvings, PointSolver};
pub use steps::{source_plane_index, Steps};
pub use types::{
    Merge, Solutions, SolverCfg, Step, DEFAULT_MAGNIFICATION_THRESHOLD, MAX_HALVINGS,
};
