//! Equilateral triangle mesh on an exact integer lattice.
//!
//! Vertices are `Node { row, col }` indices; positions are derived from the box
//! corner and the current edge scale:
//! `x = x_min + col * scale / 2`, `y = y_min + row * scale * sqrt(3) / 2`.
//! Halving the scale doubles every index, so edge midpoints of one generation are
//! exact nodes of the next and vertex identity never depends on float equality.

use std::collections::{HashMap, HashSet};

use nalgebra::Vector2;

use super::mapped::MappedTriangles;
use super::traits::TriangleMesh;
use super::types::{lattice_orientation, Limits, Node, HEIGHT_FACTOR};
use crate::error::{Result, SolverError};

/// Upper bound on the triangle count of a freshly built mesh.
pub const MAX_TRIANGLES: usize = 20_000_000;

/// Triangles on the equilateral lattice.
///
/// Invariants:
/// - `nodes` are distinct; `triangles` index into `nodes`.
/// - Every triangle has non-zero lattice orientation.
#[derive(Clone, Debug)]
pub struct LatticeTriangles {
    origin: Vector2<f64>,
    scale: f64,
    nodes: Vec<Node>,
    triangles: Vec<[usize; 3]>,
}

/// Collects triangles and deduplicates their nodes.
struct Builder {
    index: HashMap<Node, usize>,
    nodes: Vec<Node>,
    triangles: Vec<[usize; 3]>,
}

impl Builder {
    fn with_capacity(n: usize) -> Self {
        Self {
            index: HashMap::with_capacity(n),
            nodes: Vec::with_capacity(n),
            triangles: Vec::with_capacity(n),
        }
    }

    fn node(&mut self, n: Node) -> usize {
        let nodes = &mut self.nodes;
        *self.index.entry(n).or_insert_with(|| {
            nodes.push(n);
            nodes.len() - 1
        })
    }

    fn push(&mut self, tri: [Node; 3]) {
        let idx = tri.map(|n| self.node(n));
        self.triangles.push(idx);
    }

    fn push_checked(&mut self, tri: [Node; 3]) -> Result<()> {
        if !tri.iter().all(|n| n.is_lattice()) || lattice_orientation(tri[0], tri[1], tri[2]) == 0
        {
            return Err(SolverError::GeometryInvariant(format!(
                "degenerate triangle {tri:?}"
            )));
        }
        self.push(tri);
        Ok(())
    }

    fn finish(self, origin: Vector2<f64>, scale: f64) -> LatticeTriangles {
        LatticeTriangles {
            origin,
            scale,
            nodes: self.nodes,
            triangles: self.triangles,
        }
    }
}

impl LatticeTriangles {
    #[inline]
    pub fn position(&self, n: Node) -> Vector2<f64> {
        Vector2::new(
            self.origin.x + n.col as f64 * self.scale * 0.5,
            self.origin.y + n.row as f64 * self.scale * HEIGHT_FACTOR,
        )
    }

    #[inline]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Node index triples of each triangle.
    #[inline]
    pub fn indices(&self) -> &[[usize; 3]] {
        &self.triangles
    }

    #[inline]
    pub fn corner_nodes(&self, i: usize) -> [Node; 3] {
        self.triangles[i].map(|v| self.nodes[v])
    }

    /// Area of triangle `i` in image-plane units.
    pub fn area(&self, i: usize) -> f64 {
        let [a, b, c] = self.corner_nodes(i);
        let unit = self.scale * 0.5 * self.scale * HEIGHT_FACTOR;
        (lattice_orientation(a, b, c) as f64).abs() * unit * 0.5
    }

    fn rebuild(&self, keep: impl Iterator<Item = usize>) -> Self {
        let mut b = Builder::with_capacity(self.triangles.len());
        for i in keep {
            b.push(self.corner_nodes(i));
        }
        b.finish(self.origin, self.scale)
    }
}

/// Strip `row` holds the triangles between lattice rows `row` and `row + 1`; the
/// node at half-column `col` lies on whichever of the two rows keeps `row + col` even.
#[inline]
fn strip_node(row: i64, col: i64) -> Node {
    if (row + col).rem_euclid(2) == 0 {
        Node::new(row, col)
    } else {
        Node::new(row + 1, col)
    }
}

impl TriangleMesh for LatticeTriangles {
    fn for_limits_and_scale(limits: &Limits, scale: f64) -> Result<Self> {
        limits.validate()?;
        if !(scale.is_finite() && scale > 0.0) {
            return Err(SolverError::InvalidConfig(format!(
                "scale must be finite and positive, got {scale}"
            )));
        }
        let mut rows = (limits.height() / (scale * HEIGHT_FACTOR)).ceil().max(1.0);
        if limits.y_min + rows * scale * HEIGHT_FACTOR < limits.y_max {
            rows += 1.0;
        }
        // Strip triangle k spans half-columns k..k+2; starting at k = -1 and ending
        // at last_col puts x_min and x_max inside every strip.
        let mut last_col = (limits.width() / (scale * 0.5)).ceil().max(1.0) + 1.0;
        if limits.x_min + (last_col - 1.0) * scale * 0.5 < limits.x_max {
            last_col += 1.0;
        }
        if rows * last_col > MAX_TRIANGLES as f64 {
            return Err(SolverError::InvalidConfig(format!(
                "scale {scale} needs {} triangles (max {MAX_TRIANGLES})",
                rows * last_col
            )));
        }
        let (rows, last_col) = (rows as i64, last_col as i64);

        let mut b = Builder::with_capacity((rows * last_col) as usize);
        for row in 0..rows {
            for k in -1..=(last_col - 2) {
                b.push_checked([
                    strip_node(row, k),
                    strip_node(row, k + 1),
                    strip_node(row, k + 2),
                ])?;
            }
        }
        Ok(b.finish(Vector2::new(limits.x_min, limits.y_min), scale))
    }

    #[inline]
    fn len(&self) -> usize {
        self.triangles.len()
    }

    #[inline]
    fn scale(&self) -> f64 {
        self.scale
    }

    fn vertices(&self) -> Vec<Vector2<f64>> {
        self.nodes.iter().map(|&n| self.position(n)).collect()
    }

    fn with_mapped_vertices(&self, mapped: Vec<Vector2<f64>>) -> Result<MappedTriangles> {
        if mapped.len() != self.nodes.len() {
            return Err(SolverError::GeometryInvariant(format!(
                "{} mapped vertices for {} mesh vertices",
                mapped.len(),
                self.nodes.len()
            )));
        }
        MappedTriangles::new(mapped, self.triangles.clone())
    }

    fn for_indices(&self, indices: &[usize]) -> Self {
        let mut seen = HashSet::with_capacity(indices.len());
        let keep = indices
            .iter()
            .copied()
            .filter(|&i| i < self.triangles.len() && seen.insert(i))
            .collect::<Vec<_>>();
        self.rebuild(keep.into_iter())
    }

    fn neighbourhood(&self, indices: &[usize]) -> Self {
        let touched: HashSet<usize> = indices
            .iter()
            .filter_map(|&i| self.triangles.get(i))
            .flat_map(|t| t.iter().copied())
            .collect();
        let keep = (0..self.triangles.len())
            .filter(|&i| self.triangles[i].iter().any(|v| touched.contains(v)))
            .collect::<Vec<_>>();
        self.rebuild(keep.into_iter())
    }

    fn up_sample(&self) -> Result<Self> {
        let overflow = || SolverError::GeometryInvariant("lattice index overflow".to_string());
        let mut b = Builder::with_capacity(self.triangles.len() * 4);
        for i in 0..self.triangles.len() {
            let [p, q, r] = self.corner_nodes(i);
            let pp = p.doubled().ok_or_else(overflow)?;
            let qq = q.doubled().ok_or_else(overflow)?;
            let rr = r.doubled().ok_or_else(overflow)?;
            let pq = p.midpoint(q).ok_or_else(overflow)?;
            let qr = q.midpoint(r).ok_or_else(overflow)?;
            let rp = r.midpoint(p).ok_or_else(overflow)?;
            b.push_checked([pp, pq, rp])?;
            b.push_checked([pq, qq, qr])?;
            b.push_checked([rp, qr, rr])?;
            b.push_checked([pq, qr, rp])?;
        }
        Ok(b.finish(self.origin, self.scale * 0.5))
    }

    fn means(&self) -> Vec<Vector2<f64>> {
        self.triangles()
            .into_iter()
            .map(|[a, b, c]| (a + b + c) / 3.0)
            .collect()
    }

    fn triangles(&self) -> Vec<[Vector2<f64>; 3]> {
        self.triangles
            .iter()
            .map(|t| t.map(|v| self.position(self.nodes[v])))
            .collect()
    }
}
