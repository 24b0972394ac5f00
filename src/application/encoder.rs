//! Feature encoder: raw attributes to a schema-aligned numeric vector.

use std::collections::HashMap;

use crate::domain::{field, BinaryAttribute, FeatureSchema, FeatureVector, RawAttributes};

/// Encoded value for every feature the raw record can source.
///
/// Optional attributes contribute only when recorded.
fn source_values(raw: &RawAttributes) -> HashMap<&'static str, f64> {
    let mut values = HashMap::from([
        (field::AWARENESS_STATUS, raw.awareness.encode()),
        (field::SUPPORT_AWARENESS_INTERACTION, raw.support_awareness.encode()),
        (field::CD4_COUNT, f64::from(raw.cd4_count)),
        (field::VIRAL_LOAD, f64::from(raw.viral_load)),
        (field::TREATMENT_DURATION, f64::from(raw.treatment_duration)),
        (field::TREATMENT_COMPLEXITY_SCORE, f64::from(raw.complexity_score)),
        (field::LOCATION_DISTANCE_INTERACTION, raw.distance_score),
        (field::GENDER_MALE, raw.gender.encode()),
        (field::LOCATION_URBAN, raw.location.encode()),
        (field::SIDE_EFFECTS_SEVERE, raw.severe_side_effects.encode()),
        (field::AGE_GROUP_14_16, raw.age_14_16.encode()),
        (field::AGE_GROUP_17_19, raw.age_17_19.encode()),
        (field::VIRAL_SUPPRESSION_UNSUPPRESSED, raw.suppression.encode()),
    ]);

    if let Some(peer) = raw.peer_support {
        values.insert(field::PEER_SUPPORT, peer.encode());
    }
    if let Some(age) = raw.age {
        values.insert(field::AGE, f64::from(age));
    }

    values
}

/// Encode raw attributes in schema order.
///
/// Total: schema names with no source in `raw` are filled with 0, numeric
/// values pass through without range checks.
#[must_use]
pub fn encode(raw: &RawAttributes, schema: &FeatureSchema) -> FeatureVector {
    let sources = source_values(raw);

    let mut gaps = 0usize;
    let values = schema
        .names()
        .iter()
        .map(|name| match sources.get(name.as_str()) {
            Some(v) => *v,
            None => {
                gaps += 1;
                0.0
            }
        })
        .collect();

    if gaps > 0 {
        tracing::debug!(gaps, "Schema entries without a raw source defaulted to 0");
    }

    FeatureVector::new(values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{fixtures, SuppressionStatus, YesNo};

    fn schema(names: &[&str]) -> FeatureSchema {
        FeatureSchema::new(names.iter().map(|s| s.to_string()).collect()).expect("valid schema")
    }

    #[test]
    fn test_encode_follows_schema_order() {
        let raw = RawAttributes {
            cd4_count: 600,
            viral_load: 800,
            suppression: SuppressionStatus::Unsuppressed,
            ..fixtures::nominal()
        };
        let s = schema(&[
            field::VIRAL_SUPPRESSION_UNSUPPRESSED,
            field::CD4_COUNT,
            field::AWARENESS_STATUS,
            field::VIRAL_LOAD,
        ]);

        let v = encode(&raw, &s);
        assert_eq!(v.as_slice(), &[1.0, 600.0, 1.0, 800.0]);
    }

    #[test]
    fn test_schema_permutation_permutes_output() {
        let raw = fixtures::nominal();
        let names = [
            field::AWARENESS_STATUS,
            field::CD4_COUNT,
            field::LOCATION_DISTANCE_INTERACTION,
            field::GENDER_MALE,
            field::AGE_GROUP_14_16,
            "Unknown_Feature",
        ];
        let forward = encode(&raw, &schema(&names));

        let mut reversed_names = names;
        reversed_names.reverse();
        let backward = encode(&raw, &schema(&reversed_names));

        assert_eq!(forward.len(), names.len());
        let mut expected = forward.as_slice().to_vec();
        expected.reverse();
        assert_eq!(backward.as_slice(), expected.as_slice());
    }

    #[test]
    fn test_missing_fields_encode_to_zero() {
        let raw = RawAttributes {
            peer_support: None,
            age: None,
            ..fixtures::nominal()
        };
        let s = schema(&[field::PEER_SUPPORT, field::AGE, "Clinic_Code", field::CD4_COUNT]);

        let v = encode(&raw, &s);
        assert_eq!(v.as_slice(), &[0.0, 0.0, 0.0, 450.0]);
    }

    #[test]
    fn test_optional_fields_encode_when_present() {
        let raw = RawAttributes {
            peer_support: Some(YesNo::Yes),
            age: Some(16),
            ..fixtures::nominal()
        };
        let s = schema(&[field::AGE, field::PEER_SUPPORT]);
        assert_eq!(encode(&raw, &s).as_slice(), &[16.0, 1.0]);
    }

    #[test]
    fn test_out_of_range_values_pass_through() {
        let raw = RawAttributes {
            cd4_count: 5000,
            distance_score: -3.5,
            ..fixtures::nominal()
        };
        let s = schema(&[field::CD4_COUNT, field::LOCATION_DISTANCE_INTERACTION]);
        assert_eq!(encode(&raw, &s).as_slice(), &[5000.0, -3.5]);
    }
}
