use nalgebra::Vector2;

use super::mapped::MappedTriangles;
use super::types::Limits;
use crate::error::Result;

/// One generation of image-plane triangles.
///
/// Implementations are immutable: every operation returns a new mesh. Triangle
/// indices are stable within a generation and are what `containing_indices`,
/// `for_indices` and `neighbourhood` speak about.
pub trait TriangleMesh: Clone + Sized {
    /// Coarsest mesh with nominal edge length `scale` covering `limits`.
    fn for_limits_and_scale(limits: &Limits, scale: f64) -> Result<Self>;

    /// Number of triangles.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Nominal edge length of this generation.
    fn scale(&self) -> f64;

    /// Distinct vertices in image-plane coordinates. Shared corners appear once.
    fn vertices(&self) -> Vec<Vector2<f64>>;

    /// Same connectivity with vertex coordinates replaced by `mapped`, which must be
    /// indexed like `vertices()`.
    fn with_mapped_vertices(&self, mapped: Vec<Vector2<f64>>) -> Result<MappedTriangles>;

    /// Sub-mesh with only the listed triangles.
    fn for_indices(&self, indices: &[usize]) -> Self;

    /// Listed triangles plus every triangle of `self` sharing a vertex with one of them.
    fn neighbourhood(&self, indices: &[usize]) -> Self;

    /// Quadrisection of every triangle at half the edge scale.
    fn up_sample(&self) -> Result<Self>;

    /// Centroid of each triangle.
    fn means(&self) -> Vec<Vector2<f64>>;

    /// Corner coordinates of each triangle.
    fn triangles(&self) -> Vec<[Vector2<f64>; 3]>;
}
