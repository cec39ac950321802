//! Multi-plane reference tracer and the zero-deflection map.

use std::convert::Infallible;

use nalgebra::Vector2;
use thiserror::Error;

use super::profiles::Profile;
use super::LensMap;

#[derive(Debug, Error, PartialEq)]
pub enum TraceError {
    #[error("cannot trace from plane {from} to plane {to} with {planes} planes")]
    PlaneOutOfRange {
        from: usize,
        to: usize,
        planes: usize,
    },
    #[error("traced position is not finite for ({x}, {y})")]
    NonFinite { x: f64, y: f64 },
}

/// A lens plane: profiles sharing one redshift.
#[derive(Clone, Debug, PartialEq)]
pub struct Plane {
    pub redshift: f64,
    pub profiles: Vec<Profile>,
}

impl Plane {
    #[inline]
    pub fn new(redshift: f64, profiles: Vec<Profile>) -> Self {
        Self { redshift, profiles }
    }

    /// Plane without mass, e.g. the source plane.
    #[inline]
    pub fn empty(redshift: f64) -> Self {
        Self::new(redshift, Vec::new())
    }

    #[inline]
    pub fn deflection(&self, p: Vector2<f64>) -> Vector2<f64> {
        self.profiles
            .iter()
            .fold(Vector2::zeros(), |acc, prof| acc + prof.deflection(p))
    }
}

/// Ordered planes, image plane first.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Tracer {
    pub planes: Vec<Plane>,
}

impl Tracer {
    #[inline]
    pub fn new(planes: Vec<Plane>) -> Self {
        Self { planes }
    }

    /// One lens plane at `lens_redshift` and an empty source plane behind it.
    pub fn single_lens(lens_redshift: f64, source_redshift: f64, profiles: Vec<Profile>) -> Self {
        Self::new(vec![
            Plane::new(lens_redshift, profiles),
            Plane::empty(source_redshift),
        ])
    }

    fn trace_one(
        &self,
        p: Vector2<f64>,
        from: usize,
        to: usize,
    ) -> Result<Vector2<f64>, TraceError> {
        let mut theta = p;
        for plane in &self.planes[from..to] {
            theta -= plane.deflection(theta);
        }
        if theta.x.is_finite() && theta.y.is_finite() {
            Ok(theta)
        } else {
            Err(TraceError::NonFinite { x: p.x, y: p.y })
        }
    }
}

impl LensMap for Tracer {
    type Error = TraceError;

    fn plane_redshifts(&self) -> Vec<f64> {
        self.planes.iter().map(|p| p.redshift).collect()
    }

    fn map_points(
        &self,
        points: &[Vector2<f64>],
        plane_from: usize,
        plane_to: usize,
    ) -> Result<Vec<Vector2<f64>>, TraceError> {
        if plane_from > plane_to || plane_to >= self.planes.len() {
            return Err(TraceError::PlaneOutOfRange {
                from: plane_from,
                to: plane_to,
                planes: self.planes.len(),
            });
        }
        points
            .iter()
            .map(|&p| self.trace_one(p, plane_from, plane_to))
            .collect()
    }
}

/// Zero deflection: every plane sees the image-plane coordinates unchanged.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Identity {
    pub redshift: f64,
}

impl Default for Identity {
    fn default() -> Self {
        Self { redshift: 1.0 }
    }
}

impl LensMap for Identity {
    type Error = Infallible;

    fn plane_redshifts(&self) -> Vec<f64> {
        vec![self.redshift]
    }

    fn map_points(
        &self,
        points: &[Vector2<f64>],
        _plane_from: usize,
        _plane_to: usize,
    ) -> Result<Vec<Vector2<f64>>, Infallible> {
        Ok(points.to_vec())
    }

    fn magnification(
        &self,
        points: &[Vector2<f64>],
        _plane_index: usize,
        _buffer: f64,
    ) -> Result<Vec<f64>, Infallible> {
        Ok(vec![1.0; points.len()])
    }
}
