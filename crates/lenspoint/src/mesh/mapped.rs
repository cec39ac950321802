//! Triangles with floating-point (traced) vertex coordinates.
//!
//! A `MappedTriangles` shares its connectivity with the image-plane mesh it was
//! built from, so its triangle indices address the same triangles.

use nalgebra::Vector2;

use super::types::signed_area2;
use crate::error::{Result, SolverError};

#[derive(Clone, Debug)]
pub struct MappedTriangles {
    vertices: Vec<Vector2<f64>>,
    triangles: Vec<[usize; 3]>,
}

impl MappedTriangles {
    /// Build from explicit vertices and index triples; every index must be in range.
    pub fn new(vertices: Vec<Vector2<f64>>, triangles: Vec<[usize; 3]>) -> Result<Self> {
        let n = vertices.len();
        if let Some(bad) = triangles.iter().find(|t| t.iter().any(|&i| i >= n)) {
            return Err(SolverError::GeometryInvariant(format!(
                "triangle {bad:?} indexes past {n} vertices"
            )));
        }
        Ok(Self {
            vertices,
            triangles,
        })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.triangles.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    #[inline]
    pub fn vertices(&self) -> &[Vector2<f64>] {
        &self.vertices
    }

    #[inline]
    pub fn triangle(&self, i: usize) -> [Vector2<f64>; 3] {
        self.triangles[i].map(|v| self.vertices[v])
    }

    /// Indices of the triangles containing `point` (edges and corners included).
    pub fn containing_indices(&self, point: Vector2<f64>) -> Vec<usize> {
        (0..self.triangles.len())
            .filter(|&i| {
                let [a, b, c] = self.triangle(i);
                triangle_contains(a, b, c, point)
            })
            .collect()
    }
}

/// Barycentric sign test for either orientation; boundary counts as inside.
///
/// Triangles with non-finite corners contain nothing. A collapsed (zero-area)
/// triangle contains only points on its segment.
pub fn triangle_contains(
    a: Vector2<f64>,
    b: Vector2<f64>,
    c: Vector2<f64>,
    p: Vector2<f64>,
) -> bool {
    let d = signed_area2(a, b, c);
    let wa = signed_area2(p, b, c);
    let wb = signed_area2(a, p, c);
    let wc = signed_area2(a, b, p);
    if d > 0.0 {
        wa >= 0.0 && wb >= 0.0 && wc >= 0.0
    } else if d < 0.0 {
        wa <= 0.0 && wb <= 0.0 && wc <= 0.0
    } else if d == 0.0 {
        wa == 0.0
            && wb == 0.0
            && wc == 0.0
            && p.x >= a.x.min(b.x).min(c.x)
            && p.x <= a.x.max(b.x).max(c.x)
            && p.y >= a.y.min(b.y).min(c.y)
            && p.y <= a.y.max(b.y).max(c.y)
    } else {
        false
    }
}
