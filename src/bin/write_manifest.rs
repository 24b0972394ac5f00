//! Writes `manifest.json` for an artifact directory.
//!
//! Hashes every artifact file present (schema, imputer, scaler, model and
//! the optional dilemma thresholds) so the loader can detect tampering or a
//! partially updated deployment.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin write_manifest -- <artifact_dir>
//! ```

use std::env;
use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use art_insight::adapters::artifacts::{build_manifest, MANIFEST_FILE};

fn unix_now() -> Option<i64> {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .ok()
        .and_then(|d| i64::try_from(d.as_secs()).ok())
}

fn usage() -> String {
    "Usage: write_manifest <artifact_dir>".to_string()
}

fn parse_args() -> Result<PathBuf, String> {
    let mut dir: Option<PathBuf> = None;
    for arg in env::args().skip(1) {
        match arg.as_str() {
            "-h" | "--help" => return Err(usage()),
            _ if dir.is_some() => return Err(usage()),
            _ => dir = Some(PathBuf::from(arg)),
        }
    }
    dir.ok_or_else(usage)
}

fn main() -> Result<(), String> {
    let dir = parse_args()?;
    if !dir.is_dir() {
        return Err(format!("{} is not a directory", dir.display()));
    }

    let manifest = build_manifest(&dir, unix_now()).map_err(|e| e.to_string())?;
    let json = serde_json::to_string_pretty(&manifest)
        .map_err(|e| format!("Failed to serialize manifest: {e}"))?;

    let path = dir.join(MANIFEST_FILE);
    fs::write(&path, format!("{json}\n"))
        .map_err(|e| format!("Failed to write {}: {e}", path.display()))?;

    println!("Wrote {}", path.display());
    for (name, hash) in &manifest.files {
        println!("  {name}  {hash}");
    }
    Ok(())
}
