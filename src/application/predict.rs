//! Prediction adapter: coerces classifier output into a [`Label`].

use crate::domain::{Label, ScaledVector};
use crate::ports::Classifier;
use crate::{InsightError, Result};

/// Run the classifier on a scaled vector.
///
/// # Errors
/// Returns `Prediction` if the classifier fails or its output is not
/// exactly 0 or 1.
pub fn predict<C>(scaled: &ScaledVector, classifier: &C) -> Result<Label>
where
    C: Classifier + ?Sized,
{
    let raw = classifier
        .predict(scaled.as_slice())
        .map_err(|e| InsightError::Prediction(e.to_string()))?;

    Label::from_class(raw).ok_or_else(|| {
        InsightError::Prediction(format!("classifier returned {raw}, expected 0 or 1"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::ClassifierError;

    struct Constant(f64);

    impl Classifier for Constant {
        fn predict(&self, _features: &[f64]) -> std::result::Result<f64, ClassifierError> {
            Ok(self.0)
        }
    }

    struct Failing;

    impl Classifier for Failing {
        fn predict(&self, _features: &[f64]) -> std::result::Result<f64, ClassifierError> {
            Err(ClassifierError::Evaluation("tree walk diverged".into()))
        }
    }

    fn scaled() -> ScaledVector {
        ScaledVector::new(vec![0.0, 1.0])
    }

    #[test]
    fn test_coerces_binary_output() {
        assert_eq!(predict(&scaled(), &Constant(1.0)).expect("ok"), Label::Adherent);
        assert_eq!(predict(&scaled(), &Constant(0.0)).expect("ok"), Label::NonAdherent);
    }

    #[test]
    fn test_out_of_range_output_is_prediction_error() {
        for bad in [2.0, -1.0, 0.5, f64::NAN] {
            let err = predict(&scaled(), &Constant(bad)).expect_err("must fail");
            assert!(matches!(err, InsightError::Prediction(_)));
        }
    }

    #[test]
    fn test_classifier_failure_is_prediction_error() {
        let err = predict(&scaled(), &Failing).expect_err("must fail");
        assert!(err.to_string().contains("tree walk diverged"));
    }

    #[test]
    fn test_boxed_classifier() {
        let boxed: Box<dyn Classifier> = Box::new(Constant(1.0));
        assert_eq!(predict(&scaled(), &boxed).expect("ok"), Label::Adherent);
    }
}
