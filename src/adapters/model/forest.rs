//! Random forest classifier over scikit-learn's flat tree layout.

use serde::{Deserialize, Serialize};

use crate::domain::ArtifactError;
use crate::ports::{Classifier, ClassifierError};

/// Marker scikit-learn uses for "no child" on leaf nodes.
const TREE_LEAF: i64 = -1;

/// One fitted CART tree, stored as parallel per-node arrays.
///
/// Internal node `i` sends a sample left when
/// `x[feature[i]] <= threshold[i]`; leaves carry per-class weights in
/// `value[i]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTree {
    pub children_left: Vec<i64>,
    pub children_right: Vec<i64>,
    pub feature: Vec<i64>,
    pub threshold: Vec<f64>,
    pub value: Vec<Vec<f64>>,
}

impl DecisionTree {
    fn node_count(&self) -> usize {
        self.children_left.len()
    }

    fn invalid(tree: usize, reason: String) -> ArtifactError {
        ArtifactError::Invalid {
            artifact: "random forest",
            reason: format!("tree {tree}: {reason}"),
        }
    }

    /// Check structure against the feature and class counts.
    ///
    /// Children must have a higher index than their parent (as scikit-learn
    /// emits them), which also rules out cycles.
    fn validate(&self, tree: usize, n_features: usize, n_classes: usize) -> Result<(), ArtifactError> {
        let n = self.node_count();
        if n == 0 {
            return Err(Self::invalid(tree, "no nodes".into()));
        }
        if self.children_right.len() != n
            || self.feature.len() != n
            || self.threshold.len() != n
            || self.value.len() != n
        {
            return Err(Self::invalid(tree, "node arrays differ in length".into()));
        }

        for node in 0..n {
            let (left, right) = (self.children_left[node], self.children_right[node]);
            if left == TREE_LEAF || right == TREE_LEAF {
                if left != right {
                    return Err(Self::invalid(tree, format!("node {node} has one child")));
                }
                let weights = &self.value[node];
                if weights.len() != n_classes {
                    return Err(Self::invalid(
                        tree,
                        format!("leaf {node} has {} class weights, expected {n_classes}", weights.len()),
                    ));
                }
                if weights.iter().any(|w| !w.is_finite() || *w < 0.0)
                    || weights.iter().sum::<f64>() <= 0.0
                {
                    return Err(Self::invalid(tree, format!("leaf {node} has invalid weights")));
                }
                continue;
            }

            for child in [left, right] {
                if child <= node as i64 || child >= n as i64 {
                    return Err(Self::invalid(
                        tree,
                        format!("node {node} has out-of-order child {child}"),
                    ));
                }
            }
            let f = self.feature[node];
            if f < 0 || f as usize >= n_features {
                return Err(Self::invalid(tree, format!("node {node} splits on feature {f}")));
            }
            if !self.threshold[node].is_finite() {
                return Err(Self::invalid(tree, format!("node {node} has a non-finite threshold")));
            }
        }
        Ok(())
    }

    /// Walk to a leaf and return its normalised class distribution.
    fn leaf_distribution(&self, features: &[f64]) -> Result<Vec<f64>, ClassifierError> {
        let broken = |node: usize| ClassifierError::Evaluation(format!("malformed tree at node {node}"));

        let mut node = 0usize;
        for _ in 0..self.node_count() {
            let left = *self.children_left.get(node).ok_or_else(|| broken(node))?;
            if left == TREE_LEAF {
                let weights = self.value.get(node).ok_or_else(|| broken(node))?;
                let total: f64 = weights.iter().sum();
                if total <= 0.0 {
                    return Err(broken(node));
                }
                return Ok(weights.iter().map(|w| w / total).collect());
            }

            let f = *self.feature.get(node).ok_or_else(|| broken(node))?;
            let x = usize::try_from(f)
                .ok()
                .and_then(|f| features.get(f))
                .ok_or_else(|| broken(node))?;
            let threshold = *self.threshold.get(node).ok_or_else(|| broken(node))?;
            let next = if *x <= threshold {
                left
            } else {
                *self.children_right.get(node).ok_or_else(|| broken(node))?
            };
            node = usize::try_from(next).map_err(|_| broken(node))?;
        }
        Err(ClassifierError::Evaluation("tree walk did not reach a leaf".into()))
    }
}

/// Ensemble of decision trees voting by mean class probability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomForestClassifier {
    pub n_features: usize,
    /// Class values in column order of each leaf's weights.
    pub classes: Vec<f64>,
    pub trees: Vec<DecisionTree>,
}

impl RandomForestClassifier {
    /// # Errors
    /// Returns `ArtifactError::Invalid` describing the first structural problem.
    pub fn validate(&self) -> Result<(), ArtifactError> {
        if self.n_features == 0 {
            return Err(ArtifactError::Invalid {
                artifact: "random forest",
                reason: "n_features is 0".into(),
            });
        }
        if self.classes.len() < 2 {
            return Err(ArtifactError::Invalid {
                artifact: "random forest",
                reason: format!("expected at least 2 classes, got {}", self.classes.len()),
            });
        }
        if self.trees.is_empty() {
            return Err(ArtifactError::Invalid {
                artifact: "random forest",
                reason: "no trees".into(),
            });
        }
        for (i, tree) in self.trees.iter().enumerate() {
            tree.validate(i, self.n_features, self.classes.len())?;
        }
        Ok(())
    }

    /// Mean class probability across trees.
    ///
    /// # Errors
    /// Returns `ClassifierError` on a feature count mismatch or a malformed tree.
    pub fn predict_proba(&self, features: &[f64]) -> Result<Vec<f64>, ClassifierError> {
        if features.len() != self.n_features {
            return Err(ClassifierError::FeatureCount {
                expected: self.n_features,
                actual: features.len(),
            });
        }
        if self.trees.is_empty() {
            return Err(ClassifierError::Evaluation("forest has no trees".into()));
        }

        let mut mean = vec![0.0; self.classes.len()];
        for tree in &self.trees {
            let dist = tree.leaf_distribution(features)?;
            if dist.len() != mean.len() {
                return Err(ClassifierError::Evaluation(format!(
                    "leaf has {} classes, forest has {}",
                    dist.len(),
                    mean.len()
                )));
            }
            for (m, p) in mean.iter_mut().zip(dist) {
                *m += p;
            }
        }
        let n_trees = self.trees.len() as f64;
        Ok(mean.into_iter().map(|m| m / n_trees).collect())
    }
}

impl Classifier for RandomForestClassifier {
    fn predict(&self, features: &[f64]) -> Result<f64, ClassifierError> {
        let proba = self.predict_proba(features)?;

        // First maximum wins, so ties go to the lower class.
        let mut best = 0usize;
        for (i, p) in proba.iter().enumerate().skip(1) {
            if *p > proba[best] {
                best = i;
            }
        }
        self.classes
            .get(best)
            .copied()
            .ok_or_else(|| ClassifierError::Evaluation("no class for winning column".into()))
    }

    fn n_features(&self) -> Option<usize> {
        Some(self.n_features)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Splits on feature 0 at 0.0: left favours class 0, right class 1.
    fn stump(left: [f64; 2], right: [f64; 2]) -> DecisionTree {
        DecisionTree {
            children_left: vec![1, -1, -1],
            children_right: vec![2, -1, -1],
            feature: vec![0, -2, -2],
            threshold: vec![0.0, -2.0, -2.0],
            value: vec![vec![50.0, 50.0], left.to_vec(), right.to_vec()],
        }
    }

    fn forest(trees: Vec<DecisionTree>) -> RandomForestClassifier {
        RandomForestClassifier {
            n_features: 2,
            classes: vec![0.0, 1.0],
            trees,
        }
    }

    #[test]
    fn test_majority_by_mean_probability() {
        let f = forest(vec![stump([9.0, 1.0], [1.0, 9.0]), stump([6.0, 4.0], [3.0, 7.0])]);
        f.validate().expect("valid forest");

        assert_eq!(f.predict(&[-1.0, 0.0]).expect("left"), 0.0);
        assert_eq!(f.predict(&[1.0, 0.0]).expect("right"), 1.0);
        // Threshold itself goes left.
        assert_eq!(f.predict(&[0.0, 0.0]).expect("boundary"), 0.0);
    }

    #[test]
    fn test_tie_goes_to_lower_class() {
        let f = forest(vec![stump([5.0, 5.0], [5.0, 5.0])]);
        assert_eq!(f.predict(&[1.0, 0.0]).expect("tie"), 0.0);
    }

    #[test]
    fn test_probabilities_are_normalised_per_tree() {
        // Unequal leaf sample counts must not outweigh other trees.
        let f = forest(vec![stump([900.0, 100.0], [0.0, 1.0]), stump([0.0, 2.0], [1.0, 0.0])]);
        let proba = f.predict_proba(&[-1.0, 0.0]).expect("proba");
        assert!((proba[0] - 0.45).abs() < 1e-12);
        assert!((proba[1] - 0.55).abs() < 1e-12);
    }

    #[test]
    fn test_feature_count_mismatch() {
        let f = forest(vec![stump([1.0, 0.0], [0.0, 1.0])]);
        assert!(matches!(
            f.predict(&[1.0]),
            Err(ClassifierError::FeatureCount { expected: 2, actual: 1 })
        ));
    }

    #[test]
    fn test_validate_rejects_cycles_and_bad_features() {
        let mut cyclic = stump([1.0, 0.0], [0.0, 1.0]);
        cyclic.children_left[0] = 0;
        assert!(forest(vec![cyclic]).validate().is_err());

        let mut bad_feature = stump([1.0, 0.0], [0.0, 1.0]);
        bad_feature.feature[0] = 7;
        assert!(forest(vec![bad_feature]).validate().is_err());

        let mut bad_leaf = stump([1.0, 0.0], [0.0, 1.0]);
        bad_leaf.value[2] = vec![0.0, 0.0];
        assert!(forest(vec![bad_leaf]).validate().is_err());
    }

    #[test]
    fn test_unvalidated_cycle_errors_instead_of_looping() {
        let mut cyclic = stump([1.0, 0.0], [0.0, 1.0]);
        cyclic.children_right[0] = 0;
        let f = forest(vec![cyclic]);
        assert!(f.predict(&[1.0, 0.0]).is_err());
    }
}
