//! Explanation composer.

use crate::domain::{DilemmaNote, Label, Report, RuleFinding};

pub const ADHERENT_SUMMARY: &str = "Model flagged patient as **Adherent**. Clinical indicators (like immune status, awareness, suppression) outweighed the risks.";

pub const NON_ADHERENT_SUMMARY: &str = "Model flagged patient as **Non-Adherent**. Several clinical or behavioral risks elevated concern for poor adherence.";

/// Logic summary sentence for a label. Independent of which findings fired.
#[must_use]
pub fn logic_summary(label: Label) -> &'static str {
    match label {
        Label::Adherent => ADHERENT_SUMMARY,
        Label::NonAdherent => NON_ADHERENT_SUMMARY,
    }
}

/// Assemble the final report.
#[must_use]
pub fn compose(
    label: Label,
    strengths: Vec<RuleFinding>,
    weaknesses: Vec<RuleFinding>,
    dilemma: Option<DilemmaNote>,
) -> Report {
    Report::new(label, strengths, weaknesses, logic_summary(label), dilemma)
}
