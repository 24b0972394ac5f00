//! Domain layer: Core types.
//!
//! Pure Rust types with no I/O. Invariants are enforced by constructors.

mod attributes;
mod fitted;
mod label;
mod report;
mod schema;

pub use attributes::{
    field, BinaryAttribute, Gender, RawAttributes, Residence, SuppressionStatus, YesNo,
};
pub use fitted::{ArtifactError, ImputerState, ScalerState};
pub use label::Label;
pub use report::{
    DilemmaKind, DilemmaNote, FindingKind, Report, RuleFinding, CAPTION, NONE_IDENTIFIED,
};
pub use schema::{FeatureSchema, FeatureVector, ScaledVector};

#[cfg(test)]
pub(crate) use attributes::fixtures;
