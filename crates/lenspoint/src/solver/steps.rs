//! Generation-by-generation refinement as a lazy, forward-only iterator.

use nalgebra::Vector2;

use super::types::Step;
use crate::error::{Result, SolverError};
use crate::lens::LensMap;
use crate::mesh::TriangleMesh;

/// Index of the plane that holds the source.
///
/// No redshift selects the last plane; otherwise the first plane whose redshift
/// equals `source_redshift` exactly.
pub fn source_plane_index(redshifts: &[f64], source_redshift: Option<f64>) -> Result<usize> {
    if redshifts.is_empty() {
        return Err(SolverError::InvalidConfig(
            "lens model has no planes".to_string(),
        ));
    }
    match source_redshift {
        None => Ok(redshifts.len() - 1),
        Some(z) => redshifts
            .iter()
            .position(|&r| r == z)
            .ok_or(SolverError::UnknownSourcePlane { redshift: z }),
    }
}

/// Refinement trace: yields exactly `n_steps` steps unless the lens fails, after
/// which the iterator is exhausted.
pub struct Steps<'a, L: LensMap + ?Sized, M: TriangleMesh> {
    lens: &'a L,
    source: Vector2<f64>,
    plane_index: usize,
    pending: Option<M>,
    number: usize,
    n_steps: usize,
}

impl<'a, L: LensMap + ?Sized, M: TriangleMesh> Steps<'a, L, M> {
    pub fn new(
        lens: &'a L,
        initial: M,
        source: Vector2<f64>,
        plane_index: usize,
        n_steps: usize,
    ) -> Self {
        Self {
            lens,
            source,
            plane_index,
            pending: Some(initial),
            number: 0,
            n_steps,
        }
    }

    #[inline]
    pub fn plane_index(&self) -> usize {
        self.plane_index
    }

    fn refine(&self, initial: M) -> Result<Step<M>> {
        let traced = self
            .lens
            .map_points(&initial.vertices(), 0, self.plane_index)
            .map_err(SolverError::lens)?;
        let mapped = initial.with_mapped_vertices(traced)?;
        let indices = mapped.containing_indices(self.source);
        let filtered_triangles = initial.for_indices(&indices);
        let neighbourhood = initial.neighbourhood(&indices);
        let up_sampled = neighbourhood.up_sample()?;
        tracing::trace!(
            step = self.number,
            scale = initial.scale(),
            initial = initial.len(),
            filtered = filtered_triangles.len(),
            neighbourhood = neighbourhood.len(),
            up_sampled = up_sampled.len(),
            "refine"
        );
        if filtered_triangles.is_empty() {
            tracing::debug!(step = self.number, "no traced triangle contains the source");
        }
        Ok(Step {
            number: self.number,
            initial_triangles: initial,
            filtered_triangles,
            neighbourhood,
            up_sampled,
        })
    }
}

impl<'a, L: LensMap + ?Sized, M: TriangleMesh> Iterator for Steps<'a, L, M> {
    type Item = Result<Step<M>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.number >= self.n_steps {
            self.pending = None;
            return None;
        }
        let initial = self.pending.take()?;
        match self.refine(initial) {
            Ok(step) => {
                self.pending = Some(step.up_sampled.clone());
                self.number += 1;
                Some(Ok(step))
            }
            Err(e) => Some(Err(e)),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.pending.is_none() {
            return (0, Some(0));
        }
        let left = self.n_steps - self.number;
        (0, Some(left))
    }
}

impl<'a, L: LensMap + ?Sized, M: TriangleMesh> std::iter::FusedIterator for Steps<'a, L, M> {}
