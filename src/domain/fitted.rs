//! Pre-fitted numeric transform parameters.
//!
//! Fitted offline, loaded once, read-only thereafter. Constructors validate
//! the invariants the transform relies on.

use serde::Serialize;

/// Error type for artifact loading and fitted-state validation.
#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    #[error("Artifact not found: {0}")]
    NotFound(String),

    #[error("Failed to read {path}: {reason}")]
    Read { path: String, reason: String },

    #[error("Invalid {artifact}: {reason}")]
    Invalid {
        artifact: &'static str,
        reason: String,
    },

    #[error("File hash mismatch for {0}")]
    HashMismatch(String),

    #[error("Manifest required but not found in {0}")]
    ManifestRequired(String),
}

/// Fitted imputer: one fill statistic per feature position.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImputerState {
    statistics: Vec<f64>,
    feature_names: Option<Vec<String>>,
}

impl ImputerState {
    /// # Errors
    /// Returns `ArtifactError::Invalid` if a statistic is not finite or the
    /// optional feature names disagree in length.
    pub fn new(
        statistics: Vec<f64>,
        feature_names: Option<Vec<String>>,
    ) -> Result<Self, ArtifactError> {
        if let Some(i) = statistics.iter().position(|s| !s.is_finite()) {
            return Err(ArtifactError::Invalid {
                artifact: "imputer",
                reason: format!("statistic at position {i} is not finite"),
            });
        }
        if let Some(names) = &feature_names {
            if names.len() != statistics.len() {
                return Err(ArtifactError::Invalid {
                    artifact: "imputer",
                    reason: format!(
                        "{} feature names for {} statistics",
                        names.len(),
                        statistics.len()
                    ),
                });
            }
        }
        Ok(Self {
            statistics,
            feature_names,
        })
    }

    #[must_use]
    pub fn statistics(&self) -> &[f64] {
        &self.statistics
    }

    /// Feature names seen at fit time, when the export recorded them.
    #[must_use]
    pub fn feature_names(&self) -> Option<&[String]> {
        self.feature_names.as_deref()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.statistics.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.statistics.is_empty()
    }
}

/// Fitted scaler: per-feature affine transform `(x - center) / scale`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScalerState {
    center: Vec<f64>,
    scale: Vec<f64>,
}

impl ScalerState {
    /// # Errors
    /// Returns `ArtifactError::Invalid` if lengths differ, a center is not
    /// finite, or a scale is zero or not finite.
    pub fn new(center: Vec<f64>, scale: Vec<f64>) -> Result<Self, ArtifactError> {
        if center.len() != scale.len() {
            return Err(ArtifactError::Invalid {
                artifact: "scaler",
                reason: format!("{} centers for {} scales", center.len(), scale.len()),
            });
        }
        if let Some(i) = center.iter().position(|c| !c.is_finite()) {
            return Err(ArtifactError::Invalid {
                artifact: "scaler",
                reason: format!("center at position {i} is not finite"),
            });
        }
        if let Some(i) = scale.iter().position(|s| !s.is_finite() || *s == 0.0) {
            return Err(ArtifactError::Invalid {
                artifact: "scaler",
                reason: format!("scale at position {i} must be finite and non-zero"),
            });
        }
        Ok(Self { center, scale })
    }

    #[must_use]
    pub fn center(&self) -> &[f64] {
        &self.center
    }

    #[must_use]
    pub fn scale(&self) -> &[f64] {
        &self.scale
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.center.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.center.is_empty()
    }
}
