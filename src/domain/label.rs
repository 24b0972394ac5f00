//! Adherence label produced by the classifier.

use serde::{Deserialize, Serialize};

/// Binary adherence outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Label {
    /// Class 0
    NonAdherent,
    /// Class 1
    Adherent,
}

impl Label {
    /// Interpret a raw classifier output.
    ///
    /// Only exactly `0` and `1` are accepted; anything else (including NaN
    /// and fractional values) yields `None`.
    #[must_use]
    pub fn from_class(value: f64) -> Option<Self> {
        if value == 0.0 {
            Some(Self::NonAdherent)
        } else if value == 1.0 {
            Some(Self::Adherent)
        } else {
            None
        }
    }

    #[must_use]
    pub fn class(self) -> u8 {
        match self {
            Self::NonAdherent => 0,
            Self::Adherent => 1,
        }
    }

    /// Badge shown above the explanation.
    #[must_use]
    pub fn badge(self) -> &'static str {
        match self {
            Self::Adherent => "🟢 Adherent",
            Self::NonAdherent => "🔴 Non-Adherent",
        }
    }
}

impl std::fmt::Display for Label {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Adherent => write!(f, "Adherent"),
            Self::NonAdherent => write!(f, "Non-Adherent"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_class() {
        assert_eq!(Label::from_class(0.0), Some(Label::NonAdherent));
        assert_eq!(Label::from_class(1.0), Some(Label::Adherent));
        assert_eq!(Label::from_class(0.5), None);
        assert_eq!(Label::from_class(2.0), None);
        assert_eq!(Label::from_class(f64::NAN), None);
    }

    #[test]
    fn test_class_and_display() {
        assert_eq!(Label::Adherent.class(), 1);
        assert_eq!(Label::NonAdherent.class(), 0);
        assert_eq!(Label::NonAdherent.to_string(), "Non-Adherent");
    }
}
