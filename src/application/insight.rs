//! Insight service: Orchestrates the assessment pipeline.
//!
//! This service coordinates:
//! - Feature encoding against the deployment schema
//! - Imputation and scaling
//! - Prediction
//! - Rule findings and dilemma detection
//! - Report composition

use std::sync::Arc;

use crate::domain::{
    FeatureSchema, FeatureVector, ImputerState, RawAttributes, Report, ScalerState,
};
use crate::ports::Classifier;
use crate::{InsightError, Result};

use super::dilemma::{detect_dilemma, DilemmaThresholds};
use super::{compose, derive_findings, encode, predict, transform};

/// Everything fitted offline, loaded once at start-up.
#[derive(Debug, Clone)]
pub struct FittedArtifacts<C> {
    pub schema: FeatureSchema,
    pub imputer: ImputerState,
    pub scaler: ScalerState,
    pub classifier: C,
    pub thresholds: DilemmaThresholds,
}

/// Service for assessing ART adherence.
///
/// Artifacts are immutable after construction and shared by `Arc`, so
/// clones of the service can serve concurrent requests without locking.
pub struct InsightService<C>
where
    C: Classifier,
{
    artifacts: Arc<FittedArtifacts<C>>,
}

impl<C> Clone for InsightService<C>
where
    C: Classifier,
{
    fn clone(&self) -> Self {
        Self {
            artifacts: Arc::clone(&self.artifacts),
        }
    }
}

impl<C> InsightService<C>
where
    C: Classifier,
{
    /// Create a new insight service after checking the artifacts agree.
    ///
    /// # Errors
    /// Returns `SchemaMismatch` if the imputer, scaler or classifier expect
    /// a different number of features than the schema, or if the imputer's
    /// recorded feature names differ from the schema.
    pub fn new(artifacts: FittedArtifacts<C>) -> Result<Self> {
        check_consistency(&artifacts)?;

        tracing::info!(
            n_features = artifacts.schema.len(),
            "Initialized insight service"
        );

        Ok(Self {
            artifacts: Arc::new(artifacts),
        })
    }

    #[must_use]
    pub fn schema(&self) -> &FeatureSchema {
        &self.artifacts.schema
    }

    #[must_use]
    pub fn thresholds(&self) -> &DilemmaThresholds {
        &self.artifacts.thresholds
    }

    /// Run the full pipeline for one patient.
    ///
    /// 1. Encode raw attributes against the schema
    /// 2. Impute and scale
    /// 3. Predict the label
    /// 4. Derive findings and detect a dilemma from the raw attributes
    /// 5. Compose the report
    ///
    /// # Errors
    /// Returns `SchemaMismatch` or `Prediction`; no partial report is produced.
    pub fn assess(&self, raw: &RawAttributes) -> Result<Report> {
        let a = &*self.artifacts;

        tracing::debug!("Step 1: Encoding attributes...");
        let features = encode(raw, &a.schema);
        tracing::debug!(input = %describe_input(&a.schema, &features), "Model input");

        tracing::debug!("Step 2: Imputing and scaling...");
        let scaled = transform(&features, &a.imputer, &a.scaler)?;

        tracing::debug!("Step 3: Predicting...");
        let label = predict(&scaled, &a.classifier)?;

        tracing::debug!("Step 4: Interpreting...");
        let findings = derive_findings(raw);
        let dilemma = detect_dilemma(raw, label, &a.thresholds);

        let report = compose(label, findings.strengths, findings.weaknesses, dilemma);

        tracing::info!(
            %label,
            class = label.class(),
            strengths = report.strengths().len(),
            weaknesses = report.weaknesses().len(),
            dilemma = report.dilemma().is_some(),
            "Assessment complete"
        );

        Ok(report)
    }
}

/// Schema-aligned `name=value` pairs, in schema order.
fn describe_input(schema: &FeatureSchema, features: &FeatureVector) -> String {
    schema
        .names()
        .iter()
        .zip(features.as_slice())
        .map(|(name, value)| format!("{name}={value}"))
        .collect::<Vec<_>>()
        .join(", ")
}

fn check_consistency<C: Classifier>(a: &FittedArtifacts<C>) -> Result<()> {
    let n = a.schema.len();

    if a.imputer.len() != n {
        return Err(InsightError::SchemaMismatch(format!(
            "schema has {n} features, imputer was fitted on {}",
            a.imputer.len()
        )));
    }
    if a.scaler.len() != n {
        return Err(InsightError::SchemaMismatch(format!(
            "schema has {n} features, scaler was fitted on {}",
            a.scaler.len()
        )));
    }
    if let Some(expected) = a.classifier.n_features() {
        if expected != n {
            return Err(InsightError::SchemaMismatch(format!(
                "schema has {n} features, classifier was fitted on {expected}"
            )));
        }
    }
    if let Some(names) = a.imputer.feature_names() {
        if let Some((i, (fitted, schema))) = names
            .iter()
            .zip(a.schema.names())
            .enumerate()
            .find(|(_, (fitted, schema))| fitted != schema)
        {
            return Err(InsightError::SchemaMismatch(format!(
                "feature {i} is {schema:?} in the schema but {fitted:?} at fit time"
            )));
        }
    }

    Ok(())
}
