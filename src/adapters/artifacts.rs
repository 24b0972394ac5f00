//! Artifact loader: reads the fitted schema, transforms and model from disk.
//!
//! Expected layout of an artifact directory:
//!
//! | File | Content |
//! |---|---|
//! | `feature_columns.csv` | ordered feature names, one per line |
//! | `imputer.json` | `{ "statistics": [..], "feature_names"?: [..] }` |
//! | `scaler.json` | `{ "center": [..], "scale": [..] }` |
//! | `model.json` | a [`ModelArtifact`] |
//! | `dilemma_thresholds.json` | optional [`DilemmaThresholds`] override |
//! | `manifest.json` | optional SHA-256 binding of the files above |
//!
//! # Integrity
//!
//! When `manifest.json` is present every file it lists must hash to the
//! recorded value, and it must bind every artifact that is loaded. With
//! `require_manifest` set, a missing manifest is an error.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::model::ModelArtifact;
use crate::application::{DilemmaThresholds, FittedArtifacts};
use crate::domain::{ArtifactError, FeatureSchema, ImputerState, ScalerState};

pub const SCHEMA_FILE: &str = "feature_columns.csv";
pub const IMPUTER_FILE: &str = "imputer.json";
pub const SCALER_FILE: &str = "scaler.json";
pub const MODEL_FILE: &str = "model.json";
pub const THRESHOLDS_FILE: &str = "dilemma_thresholds.json";
pub const MANIFEST_FILE: &str = "manifest.json";

/// Supported manifest format version.
pub const MANIFEST_VERSION: u32 = 1;

/// Files hashed into a manifest, when present.
pub const BOUND_FILES: [&str; 5] = [
    SCHEMA_FILE,
    IMPUTER_FILE,
    SCALER_FILE,
    MODEL_FILE,
    THRESHOLDS_FILE,
];

/// SHA-256 binding of artifact files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactManifest {
    pub version: u32,
    #[serde(default)]
    pub created_at: Option<i64>,
    /// File name → lowercase hex SHA-256
    pub files: BTreeMap<String, String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ImputerExport {
    statistics: Vec<f64>,
    #[serde(default)]
    feature_names: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ScalerExport {
    center: Vec<f64>,
    scale: Vec<f64>,
}

/// Lowercase hex SHA-256 of `bytes`.
#[must_use]
pub fn sha256_hex(bytes: &[u8]) -> String {
    Sha256::digest(bytes)
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect()
}

fn read_bytes(path: &Path) -> Result<Vec<u8>, ArtifactError> {
    if !path.exists() {
        return Err(ArtifactError::NotFound(path.display().to_string()));
    }
    fs::read(path).map_err(|e| ArtifactError::Read {
        path: path.display().to_string(),
        reason: e.to_string(),
    })
}

fn parse_json<T: serde::de::DeserializeOwned>(
    artifact: &'static str,
    bytes: &[u8],
) -> Result<T, ArtifactError> {
    serde_json::from_slice(bytes).map_err(|e| ArtifactError::Invalid {
        artifact,
        reason: e.to_string(),
    })
}

/// Loads every artifact once; the result is handed to the service.
struct Loader<'a> {
    dir: &'a Path,
    manifest: Option<ArtifactManifest>,
}

impl<'a> Loader<'a> {
    fn open(dir: &'a Path, require_manifest: bool) -> Result<Self, ArtifactError> {
        if !dir.is_dir() {
            return Err(ArtifactError::NotFound(dir.display().to_string()));
        }

        let manifest_path = dir.join(MANIFEST_FILE);
        let manifest = if manifest_path.exists() {
            let manifest: ArtifactManifest = parse_json("manifest", &read_bytes(&manifest_path)?)?;
            if manifest.version != MANIFEST_VERSION {
                return Err(ArtifactError::Invalid {
                    artifact: "manifest",
                    reason: format!("unsupported version {}", manifest.version),
                });
            }
            tracing::debug!(files = manifest.files.len(), "Loaded artifact manifest");
            Some(manifest)
        } else if require_manifest {
            return Err(ArtifactError::ManifestRequired(dir.display().to_string()));
        } else {
            tracing::warn!("No {MANIFEST_FILE} in {:?}; artifact hashes not verified", dir);
            None
        };

        Ok(Self { dir, manifest })
    }

    /// Read a file and check it against the manifest, if there is one.
    fn read_verified(&self, name: &str) -> Result<Vec<u8>, ArtifactError> {
        let bytes = read_bytes(&self.dir.join(name))?;

        if let Some(manifest) = &self.manifest {
            let expected = manifest.files.get(name).ok_or_else(|| ArtifactError::Invalid {
                artifact: "manifest",
                reason: format!("{name} is not bound by the manifest"),
            })?;
            if !sha256_hex(&bytes).eq_ignore_ascii_case(expected.trim()) {
                return Err(ArtifactError::HashMismatch(name.to_string()));
            }
        }
        Ok(bytes)
    }

    fn schema(&self) -> Result<FeatureSchema, ArtifactError> {
        let bytes = self.read_verified(SCHEMA_FILE)?;
        let text = String::from_utf8(bytes).map_err(|e| ArtifactError::Invalid {
            artifact: "feature schema",
            reason: e.to_string(),
        })?;
        FeatureSchema::parse(&text)
    }

    fn imputer(&self) -> Result<ImputerState, ArtifactError> {
        let export: ImputerExport = parse_json("imputer", &self.read_verified(IMPUTER_FILE)?)?;
        ImputerState::new(export.statistics, export.feature_names)
    }

    fn scaler(&self) -> Result<ScalerState, ArtifactError> {
        let export: ScalerExport = parse_json("scaler", &self.read_verified(SCALER_FILE)?)?;
        ScalerState::new(export.center, export.scale)
    }

    fn model(&self) -> Result<ModelArtifact, ArtifactError> {
        let model: ModelArtifact = parse_json("model", &self.read_verified(MODEL_FILE)?)?;
        model.validate()?;
        Ok(model)
    }

    /// Optional on disk, but once a manifest binds it the file must be present.
    fn thresholds(&self) -> Result<DilemmaThresholds, ArtifactError> {
        let bound = self
            .manifest
            .as_ref()
            .is_some_and(|m| m.files.contains_key(THRESHOLDS_FILE));
        if !bound && !self.dir.join(THRESHOLDS_FILE).exists() {
            return Ok(DilemmaThresholds::default());
        }
        let thresholds = parse_json("dilemma thresholds", &self.read_verified(THRESHOLDS_FILE)?)?;
        tracing::info!(?thresholds, "Loaded dilemma threshold override");
        Ok(thresholds)
    }
}

/// Load all fitted artifacts from `dir`.
///
/// Cross-artifact consistency (lengths, feature names) is checked when the
/// result is passed to [`crate::InsightService::new`].
///
/// # Errors
/// Returns `ArtifactError` if a file is missing, unreadable, malformed,
/// fails its manifest hash, or a manifest is required but absent.
pub fn load_artifacts(
    dir: &Path,
    require_manifest: bool,
) -> Result<FittedArtifacts<ModelArtifact>, ArtifactError> {
    let loader = Loader::open(dir, require_manifest)?;

    let artifacts = FittedArtifacts {
        schema: loader.schema()?,
        imputer: loader.imputer()?,
        scaler: loader.scaler()?,
        classifier: loader.model()?,
        thresholds: loader.thresholds()?,
    };

    tracing::info!(
        "Loaded artifacts from {:?} (model={}, n_features={}, verified={})",
        dir,
        artifacts.classifier.kind(),
        artifacts.schema.len(),
        loader.manifest.is_some()
    );

    Ok(artifacts)
}

/// Build a manifest binding whichever [`BOUND_FILES`] exist in `dir`.
///
/// # Errors
/// Returns `ArtifactError` if a present file cannot be read or none exist.
pub fn build_manifest(dir: &Path, created_at: Option<i64>) -> Result<ArtifactManifest, ArtifactError> {
    let mut files = BTreeMap::new();
    for name in BOUND_FILES {
        let path = dir.join(name);
        if path.exists() {
            files.insert(name.to_string(), sha256_hex(&read_bytes(&path)?));
        }
    }
    if files.is_empty() {
        return Err(ArtifactError::NotFound(format!(
            "no artifact files in {}",
            dir.display()
        )));
    }
    Ok(ArtifactManifest {
        version: MANIFEST_VERSION,
        created_at,
        files,
    })
}
