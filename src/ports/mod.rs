//! Ports layer: Trait definitions for external collaborators.
//!
//! Following Hexagonal Architecture, these traits define the boundary
//! between the pipeline and the fitted model it consumes.

mod classifier;

pub use classifier::{Classifier, ClassifierError};
