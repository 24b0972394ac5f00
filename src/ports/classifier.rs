//! Classifier port: Trait for the opaque adherence model.
//!
//! This trait abstracts the fitted model (random forest, logistic, or a test
//! fake) from the pipeline.

/// Errors raised by a classifier implementation.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ClassifierError {
    #[error("Expected {expected} features, got {actual}")]
    FeatureCount { expected: usize, actual: usize },

    #[error("Model evaluation failed: {0}")]
    Evaluation(String),
}

/// Trait for binary classifiers over a scaled feature vector.
///
/// Implementations are loaded once and shared read-only across requests.
pub trait Classifier: Send + Sync {
    /// Predict the class for one scaled feature vector.
    ///
    /// Returns the raw class value; the pipeline accepts only `0` and `1`.
    ///
    /// # Errors
    /// Returns `ClassifierError` if the model cannot evaluate the input.
    fn predict(&self, features: &[f64]) -> Result<f64, ClassifierError>;

    /// Number of input features the model was fitted on, if known.
    fn n_features(&self) -> Option<usize> {
        None
    }
}

impl<C: Classifier + ?Sized> Classifier for Box<C> {
    fn predict(&self, features: &[f64]) -> Result<f64, ClassifierError> {
        (**self).predict(features)
    }

    fn n_features(&self) -> Option<usize> {
        (**self).n_features()
    }
}
