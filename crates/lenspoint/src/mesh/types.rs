//! Bounding box and lattice index types shared by mesh implementations.
//!
//! - `Limits`: axis-aligned image-plane box `(y_min, y_max, x_min, x_max)`.
//! - `Node`: exact integer index of a vertex on the equilateral lattice.

use nalgebra::Vector2;

use crate::error::{Result, SolverError};

/// Row spacing of the equilateral lattice in units of the edge length.
pub const HEIGHT_FACTOR: f64 = 0.866_025_403_784_438_6; // sqrt(3) / 2

/// Axis-aligned bounding box in image-plane units (arcseconds).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Limits {
    pub y_min: f64,
    pub y_max: f64,
    pub x_min: f64,
    pub x_max: f64,
}

impl Limits {
    #[inline]
    pub fn new(y_min: f64, y_max: f64, x_min: f64, x_max: f64) -> Self {
        Self {
            y_min,
            y_max,
            x_min,
            x_max,
        }
    }

    /// Square box `[-half, half]²` centred on the origin.
    #[inline]
    pub fn square(half: f64) -> Self {
        Self::new(-half, half, -half, half)
    }

    /// Smallest box enclosing `points`. None for an empty slice.
    pub fn enclosing(points: &[Vector2<f64>]) -> Option<Self> {
        let first = points.first()?;
        let mut out = Self::new(first.y, first.y, first.x, first.x);
        for p in &points[1..] {
            out.y_min = out.y_min.min(p.y);
            out.y_max = out.y_max.max(p.y);
            out.x_min = out.x_min.min(p.x);
            out.x_max = out.x_max.max(p.x);
        }
        Some(out)
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.y_max - self.y_min
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.x_max - self.x_min
    }

    #[inline]
    pub fn contains(&self, p: Vector2<f64>) -> bool {
        p.y >= self.y_min && p.y <= self.y_max && p.x >= self.x_min && p.x <= self.x_max
    }

    /// Reject boxes with zero, negative or non-finite extent.
    pub fn validate(&self) -> Result<()> {
        let finite = [self.y_min, self.y_max, self.x_min, self.x_max]
            .iter()
            .all(|v| v.is_finite());
        if !finite {
            return Err(SolverError::InvalidDomain(format!(
                "non-finite bounds {self:?}"
            )));
        }
        if self.height() <= 0.0 {
            return Err(SolverError::InvalidDomain(format!(
                "y extent {} <= 0",
                self.height()
            )));
        }
        if self.width() <= 0.0 {
            return Err(SolverError::InvalidDomain(format!(
                "x extent {} <= 0",
                self.width()
            )));
        }
        Ok(())
    }
}

/// Vertex index on the equilateral lattice.
///
/// Invariants:
/// - `row + col` is even.
/// - `col` counts half edges, `row` counts lattice rows.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Node {
    pub row: i64,
    pub col: i64,
}

impl Node {
    #[inline]
    pub fn new(row: i64, col: i64) -> Self {
        Self { row, col }
    }

    /// Same vertex expressed on the lattice of the next (half-scale) generation.
    #[inline]
    pub fn doubled(self) -> Option<Node> {
        Some(Node {
            row: self.row.checked_mul(2)?,
            col: self.col.checked_mul(2)?,
        })
    }

    /// Midpoint of the edge `self`–`other` on the next generation's lattice.
    #[inline]
    pub fn midpoint(self, other: Node) -> Option<Node> {
        Some(Node {
            row: self.row.checked_add(other.row)?,
            col: self.col.checked_add(other.col)?,
        })
    }

    #[inline]
    pub fn is_lattice(self) -> bool {
        (self.row + self.col).rem_euclid(2) == 0
    }
}

/// Twice the signed area of triangle `(a, b, c)` in lattice units.
/// Zero iff the triangle is degenerate.
#[inline]
pub fn lattice_orientation(a: Node, b: Node, c: Node) -> i128 {
    let (abr, abc) = ((b.row - a.row) as i128, (b.col - a.col) as i128);
    let (acr, acc) = ((c.row - a.row) as i128, (c.col - a.col) as i128);
    abc * acr - abr * acc
}

/// Twice the signed area of a triangle in the plane (positive when counterclockwise).
#[inline]
pub fn signed_area2(a: Vector2<f64>, b: Vector2<f64>, c: Vector2<f64>) -> f64 {
    let ab = b - a;
    let ac = c - a;
    ab.x * ac.y - ab.y * ac.x
}
