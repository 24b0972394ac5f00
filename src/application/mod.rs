//! Application layer: Pipeline stages and the service orchestrating them.
//!
//! The encoding path (encode → transform → predict) and the interpretation
//! path (findings, dilemma) both read the same raw attributes; only the
//! composer joins them with the label.

mod compose;
mod dilemma;
mod encoder;
mod insight;
mod predict;
mod rules;
mod transform;

pub use compose::{compose, logic_summary, ADHERENT_SUMMARY, NON_ADHERENT_SUMMARY};
pub use dilemma::{detect_dilemma, DilemmaThresholds};
pub use encoder::encode;
pub use insight::{FittedArtifacts, InsightService};
pub use predict::predict;
pub use rules::{derive_findings, Findings};
pub use transform::transform;
