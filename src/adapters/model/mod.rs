//! Model adapters: Concrete `Classifier` implementations for exported models.
//!
//! `model.json` carries a `kind` tag selecting the model family.

mod forest;
mod logistic;

use serde::{Deserialize, Serialize};

use crate::domain::ArtifactError;
use crate::ports::{Classifier, ClassifierError};

pub use forest::{DecisionTree, RandomForestClassifier};
pub use logistic::LogisticClassifier;

/// A fitted classifier as exported by the training pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelArtifact {
    RandomForest(RandomForestClassifier),
    Logistic(LogisticClassifier),
}

impl ModelArtifact {
    /// # Errors
    /// Returns `ArtifactError::Invalid` if the model is structurally unusable.
    pub fn validate(&self) -> Result<(), ArtifactError> {
        match self {
            Self::RandomForest(m) => m.validate(),
            Self::Logistic(m) => m.validate(),
        }
    }

    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::RandomForest(_) => "random_forest",
            Self::Logistic(_) => "logistic",
        }
    }
}

impl Classifier for ModelArtifact {
    fn predict(&self, features: &[f64]) -> Result<f64, ClassifierError> {
        match self {
            Self::RandomForest(m) => m.predict(features),
            Self::Logistic(m) => m.predict(features),
        }
    }

    fn n_features(&self) -> Option<usize> {
        match self {
            Self::RandomForest(m) => m.n_features(),
            Self::Logistic(m) => m.n_features(),
        }
    }
}
