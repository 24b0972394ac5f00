//! Dilemma detector: explains predictions that look contradictory.
//!
//! Patterns are checked in table order and the first match wins. The
//! detector never changes the label.

use serde::{Deserialize, Serialize};

use crate::domain::{
    DilemmaKind, DilemmaNote, Label, RawAttributes, SuppressionStatus, YesNo,
};

/// Numeric cut-offs used by the dilemma patterns.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DilemmaThresholds {
    /// Viral load above which patterns 1 and 2 consider it very high
    pub high_viral_load: u32,
    /// CD4 count below which pattern 1 considers it low
    pub low_cd4: u32,
    /// CD4 count at or above which pattern 3 considers labs excellent
    pub excellent_cd4: u32,
    /// Viral load at or below which pattern 3 considers it controlled
    pub controlled_viral_load: u32,
    /// Distance score above which pattern 3 considers the clinic remote
    pub remote_distance: f64,
}

impl Default for DilemmaThresholds {
    fn default() -> Self {
        Self {
            high_viral_load: 80_000,
            low_cd4: 400,
            excellent_cd4: 900,
            controlled_viral_load: 1000,
            remote_distance: 100.0,
        }
    }
}

struct Pattern {
    kind: DilemmaKind,
    matches: fn(&RawAttributes, &DilemmaThresholds) -> bool,
    heading: &'static str,
    body: &'static str,
}

impl Pattern {
    fn note(&self) -> DilemmaNote {
        DilemmaNote {
            kind: self.kind,
            heading: self.heading,
            body: self.body,
        }
    }
}

// Patterns 1 and 2 split on awareness; pattern 3 needs a controlled viral
// load that neither of the first two allows.
const PATTERNS: [Pattern; 3] = [
    Pattern {
        kind: DilemmaKind::EarlyInCare,
        matches: |r, t| {
            r.awareness == YesNo::No
                && r.viral_load > t.high_viral_load
                && r.cd4_count < t.low_cd4
                && r.suppression == SuppressionStatus::Unsuppressed
        },
        heading: "🤔 Why was this flagged as Adherent?",
        body: "Although the patient shows high viral load and low CD4 count, being *unaware* of their status suggests they may be **newly diagnosed** or **early in care**. \
The model sometimes interprets this as a transitional phase, where non-adherence is not yet evident — like a student who's just enrolled but hasn’t taken the exam yet.",
    },
    Pattern {
        kind: DilemmaKind::SuspectedTreatmentFailure,
        matches: |r, t| {
            r.awareness == YesNo::Yes
                && r.viral_load > t.high_viral_load
                && r.suppression == SuppressionStatus::Unsuppressed
        },
        heading: "🤔 Why was this flagged as Non-Adherent?",
        body: "Despite being aware and in a supportive setting, the model treats **high viral load in an aware patient** as a sign of treatment failure. \
It’s like a student who's attended classes (aware) but keeps failing — a deeper issue may be present, like lack of follow-through or drug resistance.",
    },
    Pattern {
        kind: DilemmaKind::LabValuesDominate,
        matches: |r, t| {
            r.cd4_count >= t.excellent_cd4
                && r.viral_load <= t.controlled_viral_load
                && r.support_awareness == YesNo::No
                && r.peer_support == Some(YesNo::No)
                && r.distance_score > t.remote_distance
                && r.suppression == SuppressionStatus::Suppressed
        },
        heading: "🤔 Why was this still flagged as Adherent despite several challenges?",
        body: "The model places **immense weight on CD4 and viral load**, which are clinical gold standards. \
Even without social support, strong lab values pull the prediction toward adherence — like a student passing every exam despite never joining a study group.",
    },
];

/// Return the note of the first matching pattern, if any.
///
/// The note is chosen from the raw attributes alone; `label` is carried for
/// tracing so a note can be correlated with the prediction it explains.
#[must_use]
pub fn detect_dilemma(
    raw: &RawAttributes,
    label: Label,
    thresholds: &DilemmaThresholds,
) -> Option<DilemmaNote> {
    let note = PATTERNS
        .iter()
        .find(|p| (p.matches)(raw, thresholds))
        .map(Pattern::note);

    if let Some(n) = &note {
        tracing::debug!(kind = ?n.kind, %label, "Dilemma pattern matched");
    }
    note
}

/// Every pattern the record satisfies, ignoring first-match ordering.
#[cfg(test)]
fn matching_kinds(raw: &RawAttributes, thresholds: &DilemmaThresholds) -> Vec<DilemmaKind> {
    PATTERNS
        .iter()
        .filter(|p| (p.matches)(raw, thresholds))
        .map(|p| p.kind)
        .collect()
}
