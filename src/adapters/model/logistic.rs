//! Logistic regression classifier.

use serde::{Deserialize, Serialize};

use crate::domain::ArtifactError;
use crate::ports::{Classifier, ClassifierError};

fn default_threshold() -> f64 {
    0.5
}

/// Linear model with a sigmoid link, thresholded to a class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticClassifier {
    pub coefficients: Vec<f64>,
    pub intercept: f64,
    /// Probability at or above which class 1 is predicted.
    #[serde(default = "default_threshold")]
    pub threshold: f64,
}

impl LogisticClassifier {
    /// # Errors
    /// Returns `ArtifactError::Invalid` for empty or non-finite parameters or
    /// a threshold outside (0, 1).
    pub fn validate(&self) -> Result<(), ArtifactError> {
        let invalid = |reason: String| ArtifactError::Invalid {
            artifact: "logistic model",
            reason,
        };

        if self.coefficients.is_empty() {
            return Err(invalid("no coefficients".into()));
        }
        if let Some(i) = self.coefficients.iter().position(|c| !c.is_finite()) {
            return Err(invalid(format!("coefficient {i} is not finite")));
        }
        if !self.intercept.is_finite() {
            return Err(invalid("intercept is not finite".into()));
        }
        if !(self.threshold > 0.0 && self.threshold < 1.0) {
            return Err(invalid(format!("threshold {} outside (0, 1)", self.threshold)));
        }
        Ok(())
    }

    /// Probability of class 1.
    ///
    /// # Errors
    /// Returns `FeatureCount` if the input width differs from the coefficients.
    pub fn probability(&self, features: &[f64]) -> Result<f64, ClassifierError> {
        if features.len() != self.coefficients.len() {
            return Err(ClassifierError::FeatureCount {
                expected: self.coefficients.len(),
                actual: features.len(),
            });
        }
        let z: f64 = self
            .coefficients
            .iter()
            .zip(features)
            .map(|(w, x)| w * x)
            .sum::<f64>()
            + self.intercept;
        Ok(1.0 / (1.0 + (-z).exp()))
    }
}

impl Classifier for LogisticClassifier {
    fn predict(&self, features: &[f64]) -> Result<f64, ClassifierError> {
        let p = self.probability(features)?;
        if p.is_nan() {
            return Err(ClassifierError::Evaluation("probability is NaN".into()));
        }
        Ok(if p >= self.threshold { 1.0 } else { 0.0 })
    }

    fn n_features(&self) -> Option<usize> {
        Some(self.coefficients.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model() -> LogisticClassifier {
        LogisticClassifier {
            coefficients: vec![2.0, -1.0],
            intercept: 0.0,
            threshold: 0.5,
        }
    }

    #[test]
    fn test_predicts_by_threshold() {
        let m = model();
        assert_eq!(m.predict(&[1.0, 0.0]).expect("ok"), 1.0);
        assert_eq!(m.predict(&[-1.0, 0.0]).expect("ok"), 0.0);
        // z = 0 gives p = 0.5, which is at the threshold.
        assert_eq!(m.predict(&[0.5, 1.0]).expect("ok"), 1.0);
    }

    #[test]
    fn test_width_mismatch() {
        assert!(matches!(
            model().predict(&[1.0]),
            Err(ClassifierError::FeatureCount { expected: 2, actual: 1 })
        ));
    }

    #[test]
    fn test_threshold_defaults_when_absent() {
        let m: LogisticClassifier =
            serde_json::from_str(r#"{"coefficients":[1.0],"intercept":-0.5}"#).expect("parse");
        assert_eq!(m.threshold, 0.5);
        m.validate().expect("valid");
    }

    #[test]
    fn test_validate_rejects_bad_threshold() {
        let m = LogisticClassifier {
            threshold: 1.0,
            ..model()
        };
        assert!(m.validate().is_err());
    }

    #[test]
    fn test_nan_input_is_an_error() {
        assert!(model().predict(&[f64::NAN, 0.0]).is_err());
    }
}
