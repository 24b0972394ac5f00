//! Patient record intake from JSON.
//!
//! This is the only place a raw categorical string or out-of-range number is
//! turned into an error. Errors name the offending key.

use std::io::Read;

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::domain::{Gender, RawAttributes, Residence, SuppressionStatus, YesNo};
use crate::{InsightError, Result};

#[derive(Clone, Copy)]
enum Kind {
    YesNo,
    Gender,
    Residence,
    Suppression,
    Count,
    Score,
}

/// Record keys with their value kind and whether they may be omitted.
const KEYS: [(&str, Kind, bool); 15] = [
    ("awareness", Kind::YesNo, false),
    ("support_awareness", Kind::YesNo, false),
    ("peer_support", Kind::YesNo, true),
    ("cd4_count", Kind::Count, false),
    ("viral_load", Kind::Count, false),
    ("treatment_duration", Kind::Count, false),
    ("complexity_score", Kind::Count, false),
    ("distance_score", Kind::Score, false),
    ("gender", Kind::Gender, false),
    ("location", Kind::Residence, false),
    ("severe_side_effects", Kind::YesNo, false),
    ("age_14_16", Kind::YesNo, false),
    ("age_17_19", Kind::YesNo, false),
    ("suppression", Kind::Suppression, false),
    ("age", Kind::Count, true),
];

fn malformed(field: &str, reason: impl Into<String>) -> InsightError {
    InsightError::MalformedAttribute {
        field: field.to_string(),
        reason: reason.into(),
    }
}

fn check_as<T: DeserializeOwned>(key: &str, value: &Value) -> Result<()> {
    serde_json::from_value::<T>(value.clone())
        .map(drop)
        .map_err(|e| malformed(key, e.to_string()))
}

fn check_value(key: &str, kind: Kind, optional: bool, value: &Value) -> Result<()> {
    if value.is_null() {
        return if optional {
            Ok(())
        } else {
            Err(malformed(key, "must not be null"))
        };
    }
    match kind {
        Kind::YesNo => check_as::<YesNo>(key, value),
        Kind::Gender => check_as::<Gender>(key, value),
        Kind::Residence => check_as::<Residence>(key, value),
        Kind::Suppression => check_as::<SuppressionStatus>(key, value),
        Kind::Count => check_as::<u32>(key, value),
        Kind::Score => check_as::<f64>(key, value),
    }
}

fn check_keys(map: &Map<String, Value>) -> Result<()> {
    let known = |key: &str| KEYS.iter().any(|(name, _, _)| *name == key);
    if let Some(unknown) = map.keys().find(|k| !known(k.as_str())) {
        return Err(malformed(unknown, "unknown field"));
    }
    for (name, kind, optional) in KEYS {
        match map.get(name) {
            Some(value) => check_value(name, kind, optional, value)?,
            None if optional => {}
            None => return Err(malformed(name, "missing")),
        }
    }
    Ok(())
}

/// Parse and validate one patient record.
///
/// # Errors
/// Returns `Serialization` if the text is not JSON, and `MalformedAttribute`
/// for an unknown, missing, mistyped or out-of-range field.
pub fn parse_patient_record(json: &str) -> Result<RawAttributes> {
    let value: Value = serde_json::from_str(json)?;
    let Value::Object(map) = value else {
        return Err(malformed("record", "expected a JSON object"));
    };
    check_keys(&map)?;

    let raw: RawAttributes = serde_json::from_value(Value::Object(map))?;
    raw.validate()?;

    tracing::debug!(
        peer_support = raw.peer_support.is_some(),
        age = raw.age.is_some(),
        "Parsed patient record"
    );
    Ok(raw)
}

/// Read a whole record from `reader` and parse it.
///
/// # Errors
/// As [`parse_patient_record`], plus `Io` if reading fails.
pub fn read_patient_record<R: Read>(mut reader: R) -> Result<RawAttributes> {
    let mut text = String::new();
    reader.read_to_string(&mut text)?;
    parse_patient_record(&text)
}

#[cfg(test)]
mod tests {
    use super::*;

    const RECORD: &str = r#"{
        "awareness": "Yes",
        "support_awareness": "No",
        "peer_support": "No",
        "cd4_count": 950,
        "viral_load": 800,
        "treatment_duration": 20,
        "complexity_score": 3,
        "distance_score": 150.0,
        "gender": "Male",
        "location": "Rural",
        "severe_side_effects": "No",
        "age_14_16": "No",
        "age_17_19": "Yes",
        "suppression": "Suppressed"
    }"#;

    fn with(key: &str, value: Value) -> String {
        let mut map: Map<String, Value> = serde_json::from_str(RECORD).expect("fixture");
        map.insert(key.to_string(), value);
        Value::Object(map).to_string()
    }

    fn field_of(err: InsightError) -> String {
        match err {
            InsightError::MalformedAttribute { field, .. } => field,
            other => panic!("expected MalformedAttribute, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_valid_record() {
        let raw = parse_patient_record(RECORD).expect("Should parse");
        assert_eq!(raw.cd4_count, 950);
        assert_eq!(raw.gender, Gender::Male);
        assert_eq!(raw.peer_support, Some(YesNo::No));
        assert_eq!(raw.age, None);
    }

    #[test]
    fn test_age_variant_without_peer_support() {
        let mut map: Map<String, Value> = serde_json::from_str(RECORD).expect("fixture");
        map.remove("peer_support");
        map.insert("age".into(), Value::from(17));

        let raw = parse_patient_record(&Value::Object(map).to_string()).expect("Should parse");
        assert_eq!(raw.peer_support, None);
        assert_eq!(raw.age, Some(17));
    }

    #[test]
    fn test_unknown_enum_value_names_field() {
        let err = parse_patient_record(&with("gender", Value::from("Other"))).expect_err("reject");
        assert_eq!(field_of(err), "gender");
    }

    #[test]
    fn test_unknown_key_rejected() {
        let err = parse_patient_record(&with("name", Value::from("Jane"))).expect_err("reject");
        assert_eq!(field_of(err), "name");
    }

    #[test]
    fn test_missing_required_key() {
        let mut map: Map<String, Value> = serde_json::from_str(RECORD).expect("fixture");
        map.remove("viral_load");
        let err = parse_patient_record(&Value::Object(map).to_string()).expect_err("reject");
        assert_eq!(field_of(err), "viral_load");
    }

    #[test]
    fn test_negative_count_rejected() {
        let err = parse_patient_record(&with("cd4_count", Value::from(-5))).expect_err("reject");
        assert_eq!(field_of(err), "cd4_count");
    }

    #[test]
    fn test_out_of_range_uses_canonical_name() {
        let err =
            parse_patient_record(&with("viral_load", Value::from(150_000))).expect_err("reject");
        assert_eq!(field_of(err), "Viral_Load");
    }

    #[test]
    fn test_not_json() {
        assert!(matches!(
            parse_patient_record("awareness=Yes"),
            Err(InsightError::Serialization(_))
        ));
        assert_eq!(field_of(parse_patient_record("[1, 2]").expect_err("reject")), "record");
    }

    #[test]
    fn test_read_from_reader() {
        let raw = read_patient_record(RECORD.as_bytes()).expect("Should read");
        assert_eq!(raw.distance_score, 150.0);
    }
}
