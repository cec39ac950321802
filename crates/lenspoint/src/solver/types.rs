//! Solver configuration, trace records and results.

use nalgebra::Vector2;

use super::point::halvings;
use crate::error::{Result, SolverError};
use crate::mesh::Limits;

/// Default lower bound on |magnification| for a kept image.
pub const DEFAULT_MAGNIFICATION_THRESHOLD: f64 = 0.1;

/// Most refinement steps a configuration may ask for. Lattice indices double per
/// step; 32 halvings of a capped initial mesh stay well inside `i64`.
pub const MAX_HALVINGS: usize = 32;

/// Policy for final-generation centroids that belong to the same image.
///
/// Adjacent triangles that all contain the source (a root on a shared edge or
/// vertex) otherwise report one physical image several times.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Merge {
    /// Report every centroid.
    Keep,
    /// Single-linkage clusters of centroids closer than `factor` final edge
    /// lengths collapse to their mean.
    Cluster { factor: f64 },
}

impl Default for Merge {
    fn default() -> Self {
        Merge::Cluster { factor: 2.0 }
    }
}

impl Merge {
    /// Apply the policy to `points` at final edge length `scale`. Output order
    /// follows the first member of each cluster.
    pub fn apply(&self, points: &[Vector2<f64>], scale: f64) -> Vec<Vector2<f64>> {
        let radius = match *self {
            Merge::Keep => return points.to_vec(),
            Merge::Cluster { factor } => factor * scale,
        };
        let n = points.len();
        let mut parent: Vec<usize> = (0..n).collect();
        fn root(parent: &mut [usize], mut i: usize) -> usize {
            while parent[i] != i {
                parent[i] = parent[parent[i]];
                i = parent[i];
            }
            i
        }
        for i in 0..n {
            for j in (i + 1)..n {
                if (points[i] - points[j]).norm() <= radius {
                    let (ri, rj) = (root(&mut parent, i), root(&mut parent, j));
                    if ri != rj {
                        parent[ri.max(rj)] = ri.min(rj);
                    }
                }
            }
        }
        let mut order: Vec<usize> = Vec::new();
        let mut sums: Vec<(Vector2<f64>, usize)> = vec![(Vector2::zeros(), 0); n];
        for (i, p) in points.iter().enumerate() {
            let r = root(&mut parent, i);
            if sums[r].1 == 0 {
                order.push(r);
            }
            sums[r].0 += p;
            sums[r].1 += 1;
        }
        order
            .into_iter()
            .map(|r| sums[r].0 / sums[r].1 as f64)
            .collect()
    }

    fn validate(&self) -> Result<()> {
        match *self {
            Merge::Cluster { factor } if !(factor.is_finite() && factor >= 0.0) => Err(
                SolverError::InvalidConfig(format!("merge factor must be >= 0, got {factor}")),
            ),
            _ => Ok(()),
        }
    }
}

/// Point solver configuration.
///
/// - `limits`: image-plane box searched for images.
/// - `scale`: edge length of the coarsest mesh.
/// - `pixel_scale_precision`: edge length the refinement must reach.
/// - `magnification_threshold`: images with |μ| at or below this are dropped.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SolverCfg {
    pub limits: Limits,
    pub scale: f64,
    pub pixel_scale_precision: f64,
    pub magnification_threshold: f64,
    pub merge: Merge,
}

impl SolverCfg {
    pub fn new(limits: Limits, scale: f64, pixel_scale_precision: f64) -> Self {
        Self {
            limits,
            scale,
            pixel_scale_precision,
            magnification_threshold: DEFAULT_MAGNIFICATION_THRESHOLD,
            merge: Merge::default(),
        }
    }

    #[inline]
    pub fn with_magnification_threshold(mut self, threshold: f64) -> Self {
        self.magnification_threshold = threshold;
        self
    }

    #[inline]
    pub fn with_merge(mut self, merge: Merge) -> Self {
        self.merge = merge;
        self
    }

    pub fn validate(&self) -> Result<()> {
        self.limits.validate()?;
        if !(self.scale.is_finite() && self.scale > 0.0) {
            return Err(SolverError::InvalidConfig(format!(
                "scale must be finite and positive, got {}",
                self.scale
            )));
        }
        if !(self.pixel_scale_precision.is_finite() && self.pixel_scale_precision > 0.0) {
            return Err(SolverError::InvalidConfig(format!(
                "pixel scale precision must be finite and positive, got {}",
                self.pixel_scale_precision
            )));
        }
        let n = halvings(self.scale, self.pixel_scale_precision);
        if n > MAX_HALVINGS {
            return Err(SolverError::InvalidConfig(format!(
                "scale {} / precision {} needs {n} halvings (max {MAX_HALVINGS})",
                self.scale, self.pixel_scale_precision
            )));
        }
        if !(self.magnification_threshold.is_finite() && self.magnification_threshold >= 0.0) {
            return Err(SolverError::InvalidConfig(format!(
                "magnification threshold must be >= 0, got {}",
                self.magnification_threshold
            )));
        }
        self.merge.validate()
    }
}

/// Snapshot of one refinement iteration.
#[derive(Clone, Debug)]
pub struct Step<M> {
    pub number: usize,
    /// Generation fed into this iteration.
    pub initial_triangles: M,
    /// Triangles whose traced image contains the source.
    pub filtered_triangles: M,
    /// Filtered triangles plus their vertex neighbours.
    pub neighbourhood: M,
    /// Neighbourhood at half scale; the next iteration's input.
    pub up_sampled: M,
}

/// Images found by a solve.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Solutions {
    /// Image-plane positions, one per image.
    pub points: Vec<Vector2<f64>>,
    /// Signed magnification at each point.
    pub magnifications: Vec<f64>,
    /// Candidates dropped by the magnification threshold.
    pub rejected: usize,
}

impl Solutions {
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    #[inline]
    pub fn points(&self) -> &[Vector2<f64>] {
        &self.points
    }

    #[inline]
    pub fn into_points(self) -> Vec<Vector2<f64>> {
        self.points
    }
}
