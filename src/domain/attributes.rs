//! Raw patient attributes for ART adherence assessment.
//!
//! Categorical inputs are closed two-valued enums so an unrecognized value
//! can only be rejected at the intake boundary, never inside the pipeline.

use serde::{Deserialize, Serialize};

/// Canonical feature names, as they appear in a feature schema file.
pub mod field {
    pub const AWARENESS_STATUS: &str = "Awareness_Status";
    pub const SUPPORT_AWARENESS_INTERACTION: &str = "Support_Awareness_Interaction";
    pub const PEER_SUPPORT: &str = "Peer_Support";
    pub const CD4_COUNT: &str = "CD4_Count";
    pub const VIRAL_LOAD: &str = "Viral_Load";
    pub const TREATMENT_DURATION: &str = "Treatment_Duration";
    pub const TREATMENT_COMPLEXITY_SCORE: &str = "Treatment_Complexity_Score";
    pub const LOCATION_DISTANCE_INTERACTION: &str = "Location_Distance_Interaction";
    pub const GENDER_MALE: &str = "Gender_Male";
    pub const LOCATION_URBAN: &str = "Location_Urban";
    pub const SIDE_EFFECTS_SEVERE: &str = "Side_Effects_Severe";
    pub const AGE_GROUP_14_16: &str = "Age_Group_14-16";
    pub const AGE_GROUP_17_19: &str = "Age_Group_17-19";
    pub const VIRAL_SUPPRESSION_UNSUPPRESSED: &str = "Viral_Suppression_Status_Unsuppressed";
    pub const AGE: &str = "Age";
}

/// A categorical attribute with one "positive" branch that encodes to 1.
pub trait BinaryAttribute: Copy {
    /// Whether this value is the branch that encodes to 1.
    fn is_positive(self) -> bool;

    /// Binary encoding (1.0 on the positive branch, 0.0 otherwise).
    fn encode(self) -> f64 {
        if self.is_positive() {
            1.0
        } else {
            0.0
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum YesNo {
    Yes,
    No,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Residence {
    Urban,
    Rural,
}

/// Viral suppression status as recorded at the last viral load test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SuppressionStatus {
    Suppressed,
    Unsuppressed,
}

impl BinaryAttribute for YesNo {
    fn is_positive(self) -> bool {
        self == Self::Yes
    }
}

impl BinaryAttribute for Gender {
    fn is_positive(self) -> bool {
        self == Self::Male
    }
}

impl BinaryAttribute for Residence {
    fn is_positive(self) -> bool {
        self == Self::Urban
    }
}

impl BinaryAttribute for SuppressionStatus {
    fn is_positive(self) -> bool {
        self == Self::Unsuppressed
    }
}

/// Clinical and psychosocial attributes of one adolescent patient.
///
/// Two intake variants exist: one records peer support, the other records
/// age in years. Both optional fields are schema gaps when absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawAttributes {
    /// Patient is aware of their HIV status
    pub awareness: YesNo,

    /// Psychosocial support combined with status awareness
    pub support_awareness: YesNo,

    /// Peer support present (only some intake variants record it)
    #[serde(default)]
    pub peer_support: Option<YesNo>,

    /// CD4 count in cells/mm³, [0, 2000]
    pub cd4_count: u32,

    /// Viral load in copies/mL, [0, 120000]
    pub viral_load: u32,

    /// Months on ART, [0, 60]
    pub treatment_duration: u32,

    /// Regimen complexity, [0, 5]
    pub complexity_score: u32,

    /// Location-distance interaction score, [0.0, 200.0]
    pub distance_score: f64,

    pub gender: Gender,

    pub location: Residence,

    /// Severe side effects reported
    pub severe_side_effects: YesNo,

    /// Age band 14-16
    pub age_14_16: YesNo,

    /// Age band 17-19
    pub age_17_19: YesNo,

    pub suppression: SuppressionStatus,

    /// Age in years, [10, 19] (only some intake variants record it)
    #[serde(default)]
    pub age: Option<u32>,
}

impl RawAttributes {
    /// Check every bounded field against its declared domain.
    ///
    /// Returns one `(field, reason)` pair per violation, in field order.
    #[must_use]
    pub fn violations(&self) -> Vec<(&'static str, String)> {
        let mut errors = Vec::new();

        let mut check_int = |name: &'static str, value: u32, max: u32| {
            if value > max {
                errors.push((name, format!("{value} out of range [0, {max}]")));
            }
        };
        check_int(field::CD4_COUNT, self.cd4_count, 2000);
        check_int(field::VIRAL_LOAD, self.viral_load, 120_000);
        check_int(field::TREATMENT_DURATION, self.treatment_duration, 60);
        check_int(field::TREATMENT_COMPLEXITY_SCORE, self.complexity_score, 5);

        if !(0.0..=200.0).contains(&self.distance_score) {
            errors.push((
                field::LOCATION_DISTANCE_INTERACTION,
                format!("{} out of range [0.0, 200.0]", self.distance_score),
            ));
        }

        if let Some(age) = self.age {
            if !(10..=19).contains(&age) {
                errors.push((field::AGE, format!("{age} out of range [10, 19]")));
            }
        }

        errors
    }

    /// Validate that all bounded fields are within their declared domains.
    ///
    /// # Errors
    /// Returns `MalformedAttribute` naming the first offending field.
    pub fn validate(&self) -> crate::Result<()> {
        match self.violations().into_iter().next() {
            None => Ok(()),
            Some((field, reason)) => Err(crate::InsightError::MalformedAttribute {
                field: field.to_string(),
                reason,
            }),
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binary_encoding_positive_branches() {
        assert_eq!(YesNo::Yes.encode(), 1.0);
        assert_eq!(YesNo::No.encode(), 0.0);
        assert_eq!(Gender::Male.encode(), 1.0);
        assert_eq!(Gender::Female.encode(), 0.0);
        assert_eq!(Residence::Urban.encode(), 1.0);
        assert_eq!(Residence::Rural.encode(), 0.0);
        assert_eq!(SuppressionStatus::Unsuppressed.encode(), 1.0);
        assert_eq!(SuppressionStatus::Suppressed.encode(), 0.0);
    }

    #[test]
    fn test_validation() {
        let valid = fixtures::nominal();
        assert!(valid.validate().is_ok());

        let invalid = RawAttributes {
            cd4_count: 2500,
            distance_score: 250.0,
            age: Some(9),
            ..fixtures::nominal()
        };
        let violations = invalid.violations();
        assert_eq!(violations.len(), 3);
        assert_eq!(violations[0].0, field::CD4_COUNT);

        match invalid.validate() {
            Err(crate::InsightError::MalformedAttribute { field, .. }) => {
                assert_eq!(field, "CD4_Count");
            }
            other => panic!("expected MalformedAttribute, got {other:?}"),
        }
    }

    #[test]
    fn test_nan_distance_is_rejected() {
        let raw = RawAttributes {
            distance_score: f64::NAN,
            ..fixtures::nominal()
        };
        assert!(raw.validate().is_err());
    }

    #[test]
    fn test_deserialize_rejects_unknown_category() {
        let json = r#"{"awareness":"Maybe"}"#;
        assert!(serde_json::from_str::<RawAttributes>(json).is_err());
    }
}
