use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use lenspoint::api::{PointSolver, Solutions, TriangleMesh};
use polars::prelude::*;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing_subscriber::fmt::SubscriberBuilder;

mod config;
mod provenance;

use config::RunConfig;
use provenance::{ensure_parent, write_sidecar, Payload};

#[derive(Parser)]
#[command(name = "cli")]
#[command(about = "Lens-equation point solver runner")]
struct Cmd {
    /// Optional VK ticket UUID; propagated to outputs and logs
    #[arg(long)]
    vk: Option<String>,

    /// Log per-step refinement detail
    #[arg(long)]
    verbose: bool,

    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Solve for the images of one source and write them as JSON
    Solve {
        #[arg(long)]
        config: PathBuf,
        #[arg(long)]
        out: PathBuf,
    },
    /// Write per-step triangle counts of the refinement as CSV
    Trace {
        #[arg(long)]
        config: PathBuf,
        #[arg(long)]
        out: PathBuf,
    },
    /// Print a small provenance JSON block
    Report,
}

/// Solve output as written to disk.
#[derive(Debug, Serialize)]
struct SolveOutput {
    points: Vec<[f64; 2]>,
    magnifications: Vec<f64>,
    rejected: usize,
    step_count: usize,
    final_scale: f64,
    image_scale: f64,
}

impl SolveOutput {
    fn new(solutions: &Solutions, solver: &PointSolver) -> Self {
        Self {
            points: solutions.points.iter().map(|p| [p.x, p.y]).collect(),
            magnifications: solutions.magnifications.clone(),
            rejected: solutions.rejected,
            step_count: solver.step_count(),
            final_scale: solver.final_scale(),
            image_scale: solver.image_scale(),
        }
    }
}

fn main() -> Result<()> {
    let cmd = Cmd::parse();
    let level = if cmd.verbose {
        tracing::Level::TRACE
    } else {
        tracing::Level::INFO
    };
    SubscriberBuilder::default()
        .with_target(false)
        .with_max_level(level)
        .init();
    match cmd.action {
        Action::Solve { config, out } => solve(&config, &out, cmd.vk),
        Action::Trace { config, out } => trace(&config, &out, cmd.vk),
        Action::Report => report(cmd.vk),
    }
}

fn solve(config: &Path, out: &Path, vk: Option<String>) -> Result<()> {
    tracing::info!(config = %config.display(), out = %out.display(), vk = ?vk, "solve");
    let cfg = RunConfig::from_path(config)?;
    let output = solve_config(&cfg)?;
    tracing::info!(
        images = output.points.len(),
        rejected = output.rejected,
        steps = output.step_count,
        "solved"
    );

    ensure_parent(out)?;
    std::fs::write(out, serde_json::to_vec_pretty(&output)?)
        .with_context(|| format!("writing {}", out.display()))?;
    write_sidecar(out, Payload::new(serde_json::to_value(&cfg)?, vk))?;
    Ok(())
}

fn solve_config(cfg: &RunConfig) -> Result<SolveOutput> {
    let solver = PointSolver::new(cfg.solver_cfg())?;
    let lens = cfg.tracer();
    let solutions = solver.solve(&lens, cfg.source(), cfg.source_redshift)?;
    Ok(SolveOutput::new(&solutions, &solver))
}

fn trace(config: &Path, out: &Path, vk: Option<String>) -> Result<()> {
    tracing::info!(config = %config.display(), out = %out.display(), vk = ?vk, "trace");
    let cfg = RunConfig::from_path(config)?;
    let mut df = trace_frame(&cfg)?;
    tracing::info!(rows = df.height(), cols = df.width(), "trace_frame_shape");

    ensure_parent(out)?;
    let mut file =
        std::fs::File::create(out).with_context(|| format!("creating {}", out.display()))?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .finish(&mut df)?;
    write_sidecar(out, Payload::new(serde_json::to_value(&cfg)?, vk))?;
    Ok(())
}

/// One row per refinement step: the edge length fed in and the four triangle counts.
fn trace_frame(cfg: &RunConfig) -> Result<DataFrame> {
    let solver = PointSolver::new(cfg.solver_cfg())?;
    let lens = cfg.tracer();
    let mut step = Vec::new();
    let mut scale = Vec::new();
    let mut initial = Vec::new();
    let mut filtered = Vec::new();
    let mut neighbourhood = Vec::new();
    let mut up_sampled = Vec::new();
    for s in solver.steps(&lens, cfg.source(), cfg.source_redshift)? {
        let s = s?;
        step.push(s.number as u32);
        scale.push(s.initial_triangles.scale());
        initial.push(s.initial_triangles.len() as u64);
        filtered.push(s.filtered_triangles.len() as u64);
        neighbourhood.push(s.neighbourhood.len() as u64);
        up_sampled.push(s.up_sampled.len() as u64);
    }
    let df = df!(
        "step" => step,
        "scale" => scale,
        "initial" => initial,
        "filtered" => filtered,
        "neighbourhood" => neighbourhood,
        "up_sampled" => up_sampled
    )?;
    Ok(df)
}

fn report(vk: Option<String>) -> Result<()> {
    let obj = serde_json::json!({
        "code_rev": provenance::current_git_rev(),
        "lenspoint": lenspoint::VERSION,
        "vk": vk,
        "params": {},
        "outputs": []
    });
    println!("{}", serde_json::to_string_pretty(&obj)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use lenspoint::api::point_mass_images;
    use nalgebra::Vector2;
    use tempfile::tempdir;

    const POINT_MASS: &str = r#"{
        "solver": {
            "limits": {"y_min": -3.0, "y_max": 3.0, "x_min": -3.0, "x_max": 3.0},
            "scale": 0.5,
            "pixel_scale_precision": 0.01
        },
        "planes": [
            {"redshift": 0.5, "profiles": [
                {"kind": "point_mass", "centre": [0.0, 0.0], "einstein_radius": 1.0}
            ]},
            {"redshift": 1.0}
        ],
        "source": [0.4, 0.3]
    }"#;

    fn sample() -> RunConfig {
        serde_json::from_str(POINT_MASS).unwrap()
    }

    #[test]
    fn solve_config_finds_both_point_mass_images() {
        let out = solve_config(&sample()).unwrap();
        assert_eq!(out.step_count, 6);
        assert_eq!(out.points.len(), 2);
        let expected = point_mass_images(Vector2::new(0.4, 0.3), 1.0).unwrap();
        for e in expected {
            let nearest = out
                .points
                .iter()
                .map(|p| (Vector2::new(p[0], p[1]) - e).norm())
                .fold(f64::INFINITY, f64::min);
            assert!(nearest < out.image_scale, "no image near {e:?}");
        }
    }

    #[test]
    fn solve_rejects_unknown_source_plane() {
        let mut cfg = sample();
        cfg.source_redshift = Some(2.0);
        assert!(solve_config(&cfg).is_err());
    }

    #[test]
    fn trace_frame_has_one_row_per_step() {
        let cfg = sample();
        let df = trace_frame(&cfg).unwrap();
        assert_eq!(df.height(), 6);
        assert_eq!(df.width(), 6);
        let scale = df.column("scale").unwrap().f64().unwrap();
        assert_eq!(scale.get(0), Some(0.5));
        assert_eq!(scale.get(5), Some(0.5 / 32.0));
        let filtered = df.column("filtered").unwrap().u64().unwrap();
        assert!(filtered.get(5).unwrap() >= 2);
    }

    #[test]
    fn solve_writes_output_and_sidecar() {
        let dir = tempdir().unwrap();
        let config = dir.path().join("run.json");
        std::fs::write(&config, POINT_MASS).unwrap();
        let out = dir.path().join("out").join("images.json");
        solve(&config, &out, None).unwrap();

        let parsed: serde_json::Value =
            serde_json::from_slice(&std::fs::read(&out).unwrap()).unwrap();
        assert_eq!(parsed["points"].as_array().unwrap().len(), 2);
        assert_eq!(parsed["step_count"], 6);
        assert_eq!(parsed["image_scale"], 0.5 / 32.0);
        assert_eq!(parsed["final_scale"], 0.5 / 64.0);
        assert!(dir.path().join("out").join("images.provenance.json").exists());
    }

    #[test]
    fn trace_writes_csv_header() {
        let dir = tempdir().unwrap();
        let config = dir.path().join("run.json");
        std::fs::write(&config, POINT_MASS).unwrap();
        let out = dir.path().join("trace.csv");
        trace(&config, &out, Some("t-1".into())).unwrap();
        let text = std::fs::read_to_string(&out).unwrap();
        let header = text.lines().next().unwrap();
        assert_eq!(header, "step,scale,initial,filtered,neighbourhood,up_sampled");
        assert_eq!(text.lines().count(), 7);
        assert!(dir.path().join("trace.provenance.json").exists());
    }
}
