//! JSON run configuration: solver settings, lens planes and the source.

use std::path::Path;

use anyhow::{Context, Result};
use lenspoint::api::{Limits, Merge, Plane, Profile, SolverCfg, Tracer};
use lenspoint::solver::DEFAULT_MAGNIFICATION_THRESHOLD;
use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct RunConfig {
    pub solver: SolverSection,
    pub planes: Vec<PlaneSection>,
    /// Source-plane position `[x, y]`.
    pub source: [f64; 2],
    /// Redshift of the source plane; the last plane when absent.
    #[serde(default)]
    pub source_redshift: Option<f64>,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct SolverSection {
    pub limits: LimitsSection,
    pub scale: f64,
    pub pixel_scale_precision: f64,
    #[serde(default = "default_threshold")]
    pub magnification_threshold: f64,
    #[serde(default)]
    pub merge: MergeSection,
}

#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq)]
pub struct LimitsSection {
    pub y_min: f64,
    pub y_max: f64,
    pub x_min: f64,
    pub x_max: f64,
}

#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MergeSection {
    Keep,
    Cluster { factor: f64 },
}

impl Default for MergeSection {
    fn default() -> Self {
        match Merge::default() {
            Merge::Keep => MergeSection::Keep,
            Merge::Cluster { factor } => MergeSection::Cluster { factor },
        }
    }
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct PlaneSection {
    pub redshift: f64,
    #[serde(default)]
    pub profiles: Vec<ProfileSection>,
}

#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ProfileSection {
    PointMass {
        centre: [f64; 2],
        einstein_radius: f64,
    },
    Isothermal {
        centre: [f64; 2],
        einstein_radius: f64,
    },
    Shear {
        gamma_1: f64,
        gamma_2: f64,
    },
}

fn default_threshold() -> f64 {
    DEFAULT_MAGNIFICATION_THRESHOLD
}

fn vec2(p: [f64; 2]) -> Vector2<f64> {
    Vector2::new(p[0], p[1])
}

impl RunConfig {
    pub fn from_path(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    pub fn solver_cfg(&self) -> SolverCfg {
        let s = &self.solver;
        let l = s.limits;
        let merge = match s.merge {
            MergeSection::Keep => Merge::Keep,
            MergeSection::Cluster { factor } => Merge::Cluster { factor },
        };
        SolverCfg::new(
            Limits::new(l.y_min, l.y_max, l.x_min, l.x_max),
            s.scale,
            s.pixel_scale_precision,
        )
        .with_magnification_threshold(s.magnification_threshold)
        .with_merge(merge)
    }

    pub fn tracer(&self) -> Tracer {
        let planes = self
            .planes
            .iter()
            .map(|p| {
                let profiles = p
                    .profiles
                    .iter()
                    .map(|prof| match *prof {
                        ProfileSection::PointMass {
                            centre,
                            einstein_radius,
                        } => Profile::point_mass(vec2(centre), einstein_radius),
                        ProfileSection::Isothermal {
                            centre,
                            einstein_radius,
                        } => Profile::isothermal(vec2(centre), einstein_radius),
                        ProfileSection::Shear { gamma_1, gamma_2 } => {
                            Profile::ExternalShear { gamma_1, gamma_2 }
                        }
                    })
                    .collect();
                Plane::new(p.redshift, profiles)
            })
            .collect();
        Tracer::new(planes)
    }

    #[inline]
    pub fn source(&self) -> Vector2<f64> {
        vec2(self.source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lenspoint::api::LensMap;

    const SAMPLE: &str = r#"{
        "solver": {
            "limits": {"y_min": -3.0, "y_max": 3.0, "x_min": -3.0, "x_max": 3.0},
            "scale": 0.5,
            "pixel_scale_precision": 0.05
        },
        "planes": [
            {"redshift": 0.5, "profiles": [
                {"kind": "point_mass", "centre": [0.0, 0.0], "einstein_radius": 1.0},
                {"kind": "shear", "gamma_1": 0.01, "gamma_2": 0.0}
            ]},
            {"redshift": 1.0}
        ],
        "source": [0.4, 0.3]
    }"#;

    #[test]
    fn parses_defaults() {
        let cfg: RunConfig = serde_json::from_str(SAMPLE).unwrap();
        assert_eq!(cfg.source_redshift, None);
        assert_eq!(cfg.solver.magnification_threshold, 0.1);
        assert_eq!(cfg.solver.merge, MergeSection::Cluster { factor: 2.0 });
        let sc = cfg.solver_cfg();
        assert_eq!(sc.limits, Limits::square(3.0));
        assert_eq!(sc.merge, Merge::default());
        assert_eq!(cfg.source(), Vector2::new(0.4, 0.3));
    }

    #[test]
    fn builds_tracer_planes() {
        let cfg: RunConfig = serde_json::from_str(SAMPLE).unwrap();
        let t = cfg.tracer();
        assert_eq!(t.plane_redshifts(), vec![0.5, 1.0]);
        assert_eq!(t.planes[0].profiles.len(), 2);
        assert!(t.planes[1].profiles.is_empty());
    }

    #[test]
    fn rejects_unknown_profile_kind() {
        let bad = SAMPLE.replace("\"shear\"", "\"sersic\"");
        assert!(serde_json::from_str::<RunConfig>(&bad).is_err());
    }

    #[test]
    fn merge_keep_round_trips() {
        let mut cfg: RunConfig = serde_json::from_str(SAMPLE).unwrap();
        cfg.solver.merge = MergeSection::Keep;
        let text = serde_json::to_string(&cfg).unwrap();
        assert!(text.contains("\"kind\":\"keep\""));
        let back: RunConfig = serde_json::from_str(&text).unwrap();
        assert_eq!(back.solver_cfg().merge, Merge::Keep);
    }
}
