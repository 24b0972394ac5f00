//! # ART Insight
//!
//! Antiretroviral-therapy adherence prediction with a clinician-facing
//! explanation.
//!
//! This crate provides:
//! - Encoding of raw patient attributes against a deployment's feature schema
//! - Imputation and scaling with pre-fitted parameters
//! - Binary adherence prediction through a pluggable classifier
//! - Strengths/weaknesses rationale and dilemma detection
//!
//! ## Architecture
//!
//! The crate follows Hexagonal Architecture:
//! - `domain`: Core types (attributes, schema, vectors, label, report)
//! - `ports`: Trait definitions for external collaborators (the classifier)
//! - `adapters`: Concrete implementations (artifact loading, forest/logistic models, log sanitizing)
//! - `application`: The pipeline stages and the service orchestrating them
//! - `config`: Environment-driven settings

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;

pub use application::InsightService;
pub use domain::{Label, RawAttributes, Report};

/// Result type for ART Insight operations
pub type Result<T> = std::result::Result<T, InsightError>;

/// Main error type for ART Insight
#[derive(Debug, thiserror::Error)]
pub enum InsightError {
    #[error("Schema mismatch: {0}")]
    SchemaMismatch(String),

    #[error("Prediction failed: {0}")]
    Prediction(String),

    #[error("Malformed attribute {field}: {reason}")]
    MalformedAttribute { field: String, reason: String },

    #[error("Artifact error: {0}")]
    Artifact(#[from] domain::ArtifactError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
