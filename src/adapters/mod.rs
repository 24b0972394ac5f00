//! Adapters layer: Concrete implementations of ports and I/O boundaries.
//!
//! - `artifacts`: loading fitted artifacts from a directory, manifest hashing
//! - `model`: random forest and logistic `Classifier` implementations
//! - `intake`: parsing patient records from JSON
//! - `sanitize`: PII filtering for logs

pub mod artifacts;
pub mod intake;
pub mod model;
pub mod sanitize;
