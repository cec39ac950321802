//! Triangle-subdivision point solver for the gravitational-lens equation.
//!
//! Given a deflection map from the image plane to a source plane, find every
//! image-plane position that traces to a chosen source-plane point.
//!
//! API Policy
//! - The crate is young; prefer clarity over compatibility. Breaking changes are
//!   fine when they improve the design.
//! - `api` is the curated import surface for downstream code (CLI, benches).

pub mod api;
pub mod error;
pub mod lens;
pub mod mesh;
pub mod solver;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use error::{Result, SolverError};
pub use nalgebra::Vector2 as Vec2;

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::error::{Result, SolverError};
    pub use crate::lens::{Identity, LensMap, Plane, Profile, Tracer};
    pub use crate::mesh::{LatticeTriangles, Limits, TriangleMesh};
    pub use crate::solver::{Merge, PointSolver, Solutions, SolverCfg, Step};
    pub use nalgebra::Vector2 as Vec2;
}
