//! Point solver façade: precision → step count → refinement → filtered images.

use std::marker::PhantomData;

use nalgebra::Vector2;

use super::steps::{source_plane_index, Steps};
use super::types::{Solutions, SolverCfg};
use crate::error::{Result, SolverError};
use crate::lens::LensMap;
use crate::mesh::{LatticeTriangles, Limits, TriangleMesh};

/// Smallest `n` with `scale / 2^n <= precision` (zero when `precision >= scale`).
///
/// Saturates at 2048 halvings, past which `scale / 2^n` is zero for every finite
/// `scale`; `SolverCfg::validate` rejects anything above `MAX_HALVINGS`.
pub fn halvings(scale: f64, precision: f64) -> usize {
    let est = (scale / precision).log2().ceil();
    let mut n = if est > 0.0 { est.min(2048.0) as usize } else { 0 };
    // Settle rounding in log2 against the defining inequality.
    while n > 0 && scale / 2f64.powi(n as i32 - 1) <= precision {
        n -= 1;
    }
    while n < 2048 && scale / 2f64.powi(n as i32) > precision {
        n += 1;
    }
    n
}

/// Finds every image-plane position that traces to a source-plane point.
///
/// The image plane is tiled with triangles of edge `scale`; each generation keeps
/// the triangles whose traced corners enclose the source, widens them to their
/// vertex neighbours and quarters them, until the edge length reaches
/// `pixel_scale_precision`. Centroids of the last kept triangles are the images,
/// minus those whose |magnification| does not exceed the threshold.
#[derive(Clone, Debug)]
pub struct PointSolver<M: TriangleMesh = LatticeTriangles> {
    cfg: SolverCfg,
    _mesh: PhantomData<M>,
}

impl PointSolver {
    pub fn new(cfg: SolverCfg) -> Result<Self> {
        Self::with_mesh(cfg)
    }

    /// Box from the extents of `grid`, coarse scale from its pixel scale.
    pub fn for_grid(
        grid: &[Vector2<f64>],
        pixel_scale: f64,
        pixel_scale_precision: f64,
    ) -> Result<Self> {
        let limits = Limits::enclosing(grid)
            .ok_or_else(|| SolverError::InvalidDomain("empty grid".to_string()))?;
        Self::new(SolverCfg::new(limits, pixel_scale, pixel_scale_precision))
    }
}

impl<M: TriangleMesh> PointSolver<M> {
    /// Solver over an explicit mesh implementation.
    pub fn with_mesh(cfg: SolverCfg) -> Result<Self> {
        cfg.validate()?;
        Ok(Self {
            cfg,
            _mesh: PhantomData,
        })
    }

    #[inline]
    pub fn cfg(&self) -> &SolverCfg {
        &self.cfg
    }

    /// Number of halvings from `scale` down to `pixel_scale_precision`.
    #[inline]
    pub fn step_count(&self) -> usize {
        halvings(self.cfg.scale, self.cfg.pixel_scale_precision)
    }

    /// Edge length of the mesh up-sampled by the last step, `scale / 2^step_count`.
    #[inline]
    pub fn final_scale(&self) -> f64 {
        self.cfg.scale / 2f64.powi(self.step_count() as i32)
    }

    /// Edge length of the triangles the images are read from: the last step's
    /// filtered generation, twice `final_scale()`.
    #[inline]
    pub fn image_scale(&self) -> f64 {
        self.cfg.scale / 2f64.powi(self.step_count().saturating_sub(1) as i32)
    }

    /// Lazy refinement trace for `source`.
    pub fn steps<'a, L: LensMap + ?Sized>(
        &self,
        lens: &'a L,
        source: Vector2<f64>,
        source_redshift: Option<f64>,
    ) -> Result<Steps<'a, L, M>> {
        let plane_index = source_plane_index(&lens.plane_redshifts(), source_redshift)?;
        let initial = M::for_limits_and_scale(&self.cfg.limits, self.cfg.scale)?;
        Ok(Steps::new(
            lens,
            initial,
            source,
            plane_index,
            self.step_count(),
        ))
    }

    /// Image-plane positions tracing to `source`, with their magnifications.
    pub fn solve<L: LensMap + ?Sized>(
        &self,
        lens: &L,
        source: Vector2<f64>,
        source_redshift: Option<f64>,
    ) -> Result<Solutions> {
        let n_steps = self.step_count();
        if n_steps == 0 {
            return Err(SolverError::PrecisionTooCoarse {
                scale: self.cfg.scale,
                precision: self.cfg.pixel_scale_precision,
            });
        }
        let steps = self.steps(lens, source, source_redshift)?;
        let plane_index = steps.plane_index();
        let mut last = None;
        for step in steps {
            last = Some(step?);
        }
        let last = last.ok_or_else(|| {
            SolverError::GeometryInvariant(format!("{n_steps} steps produced no trace"))
        })?;

        let scale = last.initial_triangles.scale();
        let raw = last.filtered_triangles.means();
        let candidates = self.cfg.merge.apply(&raw, scale);
        let magnifications = if candidates.is_empty() {
            Vec::new()
        } else {
            lens.magnification(&candidates, plane_index, scale)
                .map_err(SolverError::lens)?
        };
        if magnifications.len() != candidates.len() {
            return Err(SolverError::GeometryInvariant(format!(
                "{} magnifications for {} candidates",
                magnifications.len(),
                candidates.len()
            )));
        }

        let mut out = Solutions::default();
        for (p, mu) in candidates.iter().zip(&magnifications) {
            if mu.abs() > self.cfg.magnification_threshold {
                out.points.push(*p);
                out.magnifications.push(*mu);
            } else {
                out.rejected += 1;
            }
        }
        match out.rejected {
            0 => {}
            1 => tracing::debug!("filtered one multiple image with magnification below threshold"),
            n => tracing::warn!(
                rejected = n,
                "filtered multiple images with magnification below threshold"
            ),
        }
        tracing::debug!(
            steps = n_steps,
            triangles = raw.len(),
            candidates = candidates.len(),
            images = out.len(),
            "point solve finished"
        );
        Ok(out)
    }

    /// `solve`, keeping only the positions.
    pub fn solve_points<L: LensMap + ?Sized>(
        &self,
        lens: &L,
        source: Vector2<f64>,
        source_redshift: Option<f64>,
    ) -> Result<Vec<Vector2<f64>>> {
        Ok(self.solve(lens, source, source_redshift)?.into_points())
    }
}
