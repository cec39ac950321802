use nalgebra::Vector2;

/// Deflection profiles of a single lens plane.
///
/// Centres are in image-plane arcseconds. Exactly at a singular centre the
/// deflection is taken as zero (the symmetric limit).
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Profile {
    /// `α(θ) = θ_E² d / |d|²`, `d = θ − centre`.
    PointMass {
        centre: Vector2<f64>,
        einstein_radius: f64,
    },
    /// Singular isothermal sphere, `α(θ) = θ_E d / |d|`.
    Isothermal {
        centre: Vector2<f64>,
        einstein_radius: f64,
    },
    /// Constant external shear `(γ₁, γ₂)`.
    ExternalShear { gamma_1: f64, gamma_2: f64 },
}

impl Profile {
    #[inline]
    pub fn point_mass(centre: Vector2<f64>, einstein_radius: f64) -> Self {
        Profile::PointMass {
            centre,
            einstein_radius,
        }
    }

    #[inline]
    pub fn isothermal(centre: Vector2<f64>, einstein_radius: f64) -> Self {
        Profile::Isothermal {
            centre,
            einstein_radius,
        }
    }

    pub fn deflection(&self, p: Vector2<f64>) -> Vector2<f64> {
        match *self {
            Profile::PointMass {
                centre,
                einstein_radius,
            } => {
                let d = p - centre;
                let r2 = d.norm_squared();
                if r2 == 0.0 {
                    Vector2::zeros()
                } else {
                    d * (einstein_radius * einstein_radius / r2)
                }
            }
            Profile::Isothermal {
                centre,
                einstein_radius,
            } => {
                let d = p - centre;
                let r = d.norm();
                if r == 0.0 {
                    Vector2::zeros()
                } else {
                    d * (einstein_radius / r)
                }
            }
            Profile::ExternalShear { gamma_1, gamma_2 } => Vector2::new(
                gamma_1 * p.x + gamma_2 * p.y,
                gamma_2 * p.x - gamma_1 * p.y,
            ),
        }
    }
}
