//! Clinical rule engine: strengths and weaknesses from threshold rules.
//!
//! Rules read raw attributes in clinical units. Each rule is evaluated
//! independently; output order is the table order below.

use crate::domain::{
    FindingKind, RawAttributes, Residence, RuleFinding, SuppressionStatus, YesNo,
};

/// CD4 count (cells/mm³) at or above which immune recovery is strong.
pub const STRONG_CD4: u32 = 500;
/// Viral load (copies/mL) at or below which it counts as low.
pub const LOW_VIRAL_LOAD: u32 = 1000;
/// Months on treatment for an established regimen.
pub const ESTABLISHED_DURATION_MONTHS: u32 = 12;
/// Distance score above which travel is a barrier.
pub const FAR_DISTANCE_SCORE: f64 = 50.0;
/// Complexity score at or above which a regimen is complex.
pub const COMPLEX_REGIMEN_SCORE: u32 = 4;

struct Rule {
    text: &'static str,
    applies: fn(&RawAttributes) -> bool,
}

const STRENGTH_RULES: [Rule; 7] = [
    Rule {
        text: "Strong immune recovery (CD4 ≥ 500)",
        applies: |r| r.cd4_count >= STRONG_CD4,
    },
    Rule {
        text: "Low viral load",
        applies: |r| r.viral_load <= LOW_VIRAL_LOAD,
    },
    Rule {
        text: "Patient is aware of their HIV status",
        applies: |r| r.awareness == YesNo::Yes,
    },
    Rule {
        text: "Receives psychosocial support",
        applies: |r| r.support_awareness == YesNo::Yes,
    },
    Rule {
        text: "Has been on treatment for over 1 year",
        applies: |r| r.treatment_duration >= ESTABLISHED_DURATION_MONTHS,
    },
    Rule {
        text: "Viral load clinically suppressed",
        applies: |r| r.suppression == SuppressionStatus::Suppressed,
    },
    Rule {
        text: "Urban residence — better access to care",
        applies: |r| r.location == Residence::Urban,
    },
];

const WEAKNESS_RULES: [Rule; 5] = [
    Rule {
        text: "Experiencing severe side effects",
        applies: |r| r.severe_side_effects == YesNo::Yes,
    },
    Rule {
        text: "Significant travel distance to clinic",
        applies: |r| r.distance_score > FAR_DISTANCE_SCORE,
    },
    Rule {
        text: "On a complex treatment regimen",
        applies: |r| r.complexity_score >= COMPLEX_REGIMEN_SCORE,
    },
    Rule {
        text: "Viral load not suppressed — risk of treatment failure",
        applies: |r| r.suppression == SuppressionStatus::Unsuppressed,
    },
    Rule {
        text: "Patient unaware of HIV status",
        applies: |r| r.awareness == YesNo::No,
    },
];

/// Strengths and weaknesses, each in rule declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Findings {
    pub strengths: Vec<RuleFinding>,
    pub weaknesses: Vec<RuleFinding>,
}

fn evaluate(rules: &[Rule], kind: FindingKind, raw: &RawAttributes) -> Vec<RuleFinding> {
    rules
        .iter()
        .filter(|rule| (rule.applies)(raw))
        .map(|rule| RuleFinding {
            kind,
            text: rule.text,
        })
        .collect()
}

/// Derive every matching strength and weakness for a patient.
#[must_use]
pub fn derive_findings(raw: &RawAttributes) -> Findings {
    let findings = Findings {
        strengths: evaluate(&STRENGTH_RULES, FindingKind::Strength, raw),
        weaknesses: evaluate(&WEAKNESS_RULES, FindingKind::Weakness, raw),
    };
    tracing::debug!(
        strengths = findings.strengths.len(),
        weaknesses = findings.weaknesses.len(),
        "Derived clinical findings"
    );
    findings
}
