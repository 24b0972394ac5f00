//! Numeric transform: imputation followed by scaling.

use crate::domain::{FeatureVector, ImputerState, ScalerState, ScaledVector};
use crate::{InsightError, Result};

/// Impute missing values (NaN) and scale each position.
///
/// Pure function of its inputs; the fitted states are only read.
///
/// # Errors
/// Returns `SchemaMismatch` if the vector length differs from either fitted
/// state's length.
pub fn transform(
    vector: &FeatureVector,
    imputer: &ImputerState,
    scaler: &ScalerState,
) -> Result<ScaledVector> {
    if vector.len() != imputer.len() {
        return Err(InsightError::SchemaMismatch(format!(
            "feature vector has {} values, imputer was fitted on {}",
            vector.len(),
            imputer.len()
        )));
    }
    if vector.len() != scaler.len() {
        return Err(InsightError::SchemaMismatch(format!(
            "feature vector has {} values, scaler was fitted on {}",
            vector.len(),
            scaler.len()
        )));
    }

    let scaled = vector
        .as_slice()
        .iter()
        .zip(imputer.statistics())
        .zip(scaler.center().iter().zip(scaler.scale()))
        .map(|((&value, &fill), (&center, &scale))| {
            let imputed = if value.is_nan() { fill } else { value };
            (imputed - center) / scale
        })
        .collect();

    Ok(ScaledVector::new(scaled))
}
