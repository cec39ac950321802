//! Error taxonomy for mesh construction and point solving.

use thiserror::Error;

/// Errors surfaced by the mesh and the point solver.
///
/// Magnification rejections are not errors; they are reported through logs.
#[derive(Debug, Error)]
pub enum SolverError {
    /// Bounding box with zero, negative or non-finite extent.
    #[error("invalid domain: {0}")]
    InvalidDomain(String),
    /// Solver or mesh parameter outside its valid range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    /// The requested precision is not finer than the coarse scale, so no
    /// refinement step would run.
    #[error("pixel scale precision {precision} is not finer than scale {scale}")]
    PrecisionTooCoarse { scale: f64, precision: f64 },
    /// Internal invariant violated (degenerate triangle, inconsistent vertex
    /// indexing, lattice overflow). Indicates a bug, never retried.
    #[error("geometry invariant violated: {0}")]
    GeometryInvariant(String),
    /// A source-plane redshift was requested that no plane carries.
    #[error("no plane at source redshift {redshift}")]
    UnknownSourcePlane { redshift: f64 },
    /// Failure raised by the deflection collaborator, forwarded unchanged.
    #[error(transparent)]
    Lens(Box<dyn std::error::Error + Send + Sync + 'static>),
}

impl SolverError {
    /// Wrap a collaborator error.
    pub fn lens<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        SolverError::Lens(Box::new(err))
    }
}

pub type Result<T> = std::result::Result<T, SolverError>;
