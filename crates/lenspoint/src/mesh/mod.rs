//! Triangle meshes over the image plane.
//!
//! Purpose
//! - Tile a rectangular image-plane box with triangles of a nominal edge scale,
//!   trace their vertices, test which traced triangles contain a source-plane
//!   point, and refine the survivors.
//!
//! Design
//! - `TriangleMesh` is the capability set the solver needs (build, vertices,
//!   containment via `MappedTriangles`, neighbourhood, up-sample, means).
//! - `LatticeTriangles` stores vertices as exact lattice indices, so adjacency and
//!   deduplication never compare floats.
//! - Code cross-refs: `solver::Steps`, `solver::PointSolver`

mod lattice;
mod mapped;
mod traits;
mod types;

pub use lattice::{LatticeTriangles, MAX_TRIANGLES};
pub use mapped::{triangle_contains, MappedTriangles};
pub use traits::TriangleMesh;
pub use types::{lattice_orientation, signed_area2, Limits, Node, HEIGHT_FACTOR};
