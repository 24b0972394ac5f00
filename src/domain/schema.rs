//! Feature schema and the positional vectors aligned to it.

use serde::Serialize;

use super::ArtifactError;

/// Ordered list of canonical feature names expected by the fitted transform.
///
/// Order is load-bearing: imputer, scaler and classifier are all positional.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeatureSchema {
    names: Vec<String>,
}

impl FeatureSchema {
    /// Create a schema from ordered names.
    ///
    /// # Errors
    /// Returns `ArtifactError::Invalid` if the list is empty or has duplicates.
    pub fn new(names: Vec<String>) -> Result<Self, ArtifactError> {
        if names.is_empty() {
            return Err(ArtifactError::Invalid {
                artifact: "feature schema",
                reason: "no feature names".into(),
            });
        }
        for (i, name) in names.iter().enumerate() {
            if names[..i].contains(name) {
                return Err(ArtifactError::Invalid {
                    artifact: "feature schema",
                    reason: format!("duplicate feature name {name:?}"),
                });
            }
        }
        Ok(Self { names })
    }

    /// Parse a newline-separated schema file (one name per line).
    ///
    /// Surrounding whitespace, double quotes and blank lines are ignored so a
    /// single-column CSV export parses the same as a plain list.
    ///
    /// # Errors
    /// Same as [`FeatureSchema::new`].
    pub fn parse(text: &str) -> Result<Self, ArtifactError> {
        let names = text
            .lines()
            .map(|line| line.trim().trim_matches('"').trim())
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();
        Self::new(names)
    }

    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Encoded features, one value per schema name, in schema order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureVector(Vec<f64>);

impl FeatureVector {
    #[must_use]
    pub fn new(values: Vec<f64>) -> Self {
        Self(values)
    }

    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Feature vector after imputation and scaling.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScaledVector(Vec<f64>);

impl ScaledVector {
    #[must_use]
    pub fn new(values: Vec<f64>) -> Self {
        Self(values)
    }

    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_single_column_csv() {
        let text = "Awareness_Status\n\"CD4_Count\"\r\n\n  Viral_Load  \n";
        let schema = FeatureSchema::parse(text).expect("Should parse");
        assert_eq!(schema.names(), ["Awareness_Status", "CD4_Count", "Viral_Load"]);
    }

    #[test]
    fn test_rejects_empty_and_duplicates() {
        assert!(FeatureSchema::parse("\n\n").is_err());
        assert!(FeatureSchema::parse("Age\nCD4_Count\nAge\n").is_err());
    }
}
