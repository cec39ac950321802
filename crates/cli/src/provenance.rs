use anyhow::{Context, Result};
use serde_json::{json, Value};
use std::ffi::OsString;
use std::fs;
use std::panic::Location;
use std::path::{Path, PathBuf};
use std::process::Command;

/// What produced an artifact: run parameters plus an optional ticket id.
pub struct Payload {
    pub params: Value,
    pub vk: Option<String>,
}

impl Payload {
    pub fn new(params: Value, vk: Option<String>) -> Self {
        Self { params, vk }
    }
}

/// Write `<artifact>.provenance.json` next to `artifact`.
///
/// Records the code revision, library version, callsite, run parameters and the
/// artifact path.
#[track_caller]
pub fn write_sidecar<P: AsRef<Path>>(artifact: P, payload: Payload) -> Result<PathBuf> {
    let artifact = artifact.as_ref();
    let path = provenance_path(artifact);
    ensure_parent(&path)?;

    let callsite = Location::caller();
    let doc = json!({
        "code_rev": current_git_rev(),
        "lenspoint": lenspoint::VERSION,
        "callsite": {
            "file": callsite.file(),
            "line": callsite.line()
        },
        "vk": payload.vk,
        "params": payload.params,
        "outputs": [artifact.to_string_lossy()]
    });
    fs::write(&path, serde_json::to_vec_pretty(&doc)?)
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(path)
}

/// Create the parent directory of `path` if it has one.
pub fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating dir {}", parent.display()))?;
        }
    }
    Ok(())
}

fn provenance_path(artifact: &Path) -> PathBuf {
    let mut name = artifact
        .file_stem()
        .map(|s| s.to_os_string())
        .unwrap_or_else(|| OsString::from("artifact"));
    name.push(".provenance.json");
    artifact.with_file_name(name)
}

/// Git revision from `GIT_COMMIT` (build or run time), else `git rev-parse HEAD`.
pub fn current_git_rev() -> String {
    let from_env = option_env!("GIT_COMMIT")
        .map(str::to_string)
        .or_else(|| std::env::var("GIT_COMMIT").ok())
        .filter(|s| !s.is_empty());
    if let Some(rev) = from_env {
        return rev;
    }
    Command::new("git")
        .args(["rev-parse", "HEAD"])
        .output()
        .ok()
        .filter(|out| out.status.success())
        .and_then(|out| String::from_utf8(out.stdout).ok())
        .map(|s| s.trim().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn provenance_path_replaces_extension() {
        let derived = provenance_path(Path::new("/tmp/runs/images.json"));
        assert_eq!(derived, Path::new("/tmp/runs/images.provenance.json"));
    }

    #[test]
    fn sidecar_records_params_and_output() {
        let dir = tempdir().unwrap();
        let artifact = dir.path().join("nested").join("trace.csv");
        let payload = Payload::new(json!({"source": [0.4, 0.3]}), Some("t-17".into()));
        let path = write_sidecar(&artifact, payload).unwrap();
        assert!(path.exists());
        let parsed: Value = serde_json::from_slice(&fs::read(path).unwrap()).unwrap();
        assert_eq!(parsed["outputs"][0], artifact.to_string_lossy().as_ref());
        assert_eq!(parsed["vk"], "t-17");
        assert_eq!(parsed["params"]["source"][1], 0.3);
        assert_eq!(parsed["lenspoint"], lenspoint::VERSION);
    }
}
