//! Explanation report types.
//!
//! A [`Report`] is built once per assessment and never mutated. Its text is
//! consumed verbatim by presentation layers, so every string here is fixed.

use std::fmt;

use serde::{Serialize, Serializer};

use super::Label;

/// Placeholder rendered for an empty findings list.
pub const NONE_IDENTIFIED: &str = "None identified";

/// Caption closing every rendered report.
pub const CAPTION: &str = "This summary helps explain prediction and guide follow-up. Final decisions should include clinical judgment.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FindingKind {
    Strength,
    Weakness,
}

/// One narrative item derived from a threshold rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RuleFinding {
    pub kind: FindingKind,
    pub text: &'static str,
}

/// Which contradiction pattern produced a dilemma note.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DilemmaKind {
    /// Unaware, high viral load, low CD4: likely newly diagnosed
    EarlyInCare,
    /// Aware but unsuppressed with high viral load: suspected treatment failure
    SuspectedTreatmentFailure,
    /// Strong labs despite absent support and long distance
    LabValuesDominate,
}

/// Narrative explaining an apparent contradiction between inputs and label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DilemmaNote {
    pub kind: DilemmaKind,
    pub heading: &'static str,
    pub body: &'static str,
}

/// Complete explanation for one prediction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    label: Label,
    #[serde(serialize_with = "serialize_lines")]
    strengths: Vec<RuleFinding>,
    #[serde(serialize_with = "serialize_lines")]
    weaknesses: Vec<RuleFinding>,
    logic_summary: &'static str,
    dilemma: Option<DilemmaNote>,
}

impl Report {
    pub(crate) fn new(
        label: Label,
        strengths: Vec<RuleFinding>,
        weaknesses: Vec<RuleFinding>,
        logic_summary: &'static str,
        dilemma: Option<DilemmaNote>,
    ) -> Self {
        Self {
            label,
            strengths,
            weaknesses,
            logic_summary,
            dilemma,
        }
    }

    #[must_use]
    pub fn label(&self) -> Label {
        self.label
    }

    #[must_use]
    pub fn strengths(&self) -> &[RuleFinding] {
        &self.strengths
    }

    #[must_use]
    pub fn weaknesses(&self) -> &[RuleFinding] {
        &self.weaknesses
    }

    #[must_use]
    pub fn logic_summary(&self) -> &'static str {
        self.logic_summary
    }

    #[must_use]
    pub fn dilemma(&self) -> Option<&DilemmaNote> {
        self.dilemma.as_ref()
    }

    /// Strength lines as rendered (placeholder when empty).
    #[must_use]
    pub fn strength_lines(&self) -> Vec<&'static str> {
        display_lines(&self.strengths)
    }

    /// Weakness lines as rendered (placeholder when empty).
    #[must_use]
    pub fn weakness_lines(&self) -> Vec<&'static str> {
        display_lines(&self.weaknesses)
    }

    /// Render the report as Markdown, sections in fixed order.
    #[must_use]
    pub fn to_markdown(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "### 🔍 Prediction:")?;
        writeln!(f, "{}", self.label.badge())?;
        writeln!(f)?;
        writeln!(f, "---")?;
        writeln!(f, "### 🧠 Clinical Insight Summary")?;
        writeln!(f)?;

        writeln!(f, "#### ✅ Patient Strengths")?;
        for line in self.strength_lines() {
            writeln!(f, "- {line}")?;
        }
        writeln!(f)?;

        writeln!(f, "#### ⚠️ Risk Factors / Weaknesses")?;
        for line in self.weakness_lines() {
            writeln!(f, "- {line}")?;
        }
        writeln!(f)?;

        writeln!(f, "#### 💡 Prediction Logic")?;
        writeln!(f, "{}", self.logic_summary)?;

        if let Some(note) = &self.dilemma {
            writeln!(f)?;
            writeln!(f, "---")?;
            writeln!(f, "### 🧠 Advanced Clinical Interpretation")?;
            writeln!(f, "**{}**", note.heading)?;
            writeln!(f)?;
            writeln!(f, "{}", note.body)?;
        }

        writeln!(f)?;
        writeln!(f, "_{CAPTION}_")
    }
}

/// Findings serialize as their rendered lines, placeholder included.
fn serialize_lines<S>(findings: &[RuleFinding], serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    display_lines(findings).serialize(serializer)
}

fn display_lines(findings: &[RuleFinding]) -> Vec<&'static str> {
    if findings.is_empty() {
        vec![NONE_IDENTIFIED]
    } else {
        findings.iter().map(|f| f.text).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strength(text: &'static str) -> RuleFinding {
        RuleFinding {
            kind: FindingKind::Strength,
            text,
        }
    }

    #[test]
    fn test_empty_lists_render_placeholder() {
        let report = Report::new(Label::Adherent, vec![], vec![], "summary", None);
        assert_eq!(report.strength_lines(), vec![NONE_IDENTIFIED]);
        assert_eq!(report.weakness_lines(), vec![NONE_IDENTIFIED]);
        assert!(report.to_markdown().contains("- None identified"));
    }

    #[test]
    fn test_markdown_section_order() {
        let note = DilemmaNote {
            kind: DilemmaKind::EarlyInCare,
            heading: "Heading",
            body: "Body",
        };
        let report = Report::new(
            Label::NonAdherent,
            vec![strength("Low viral load")],
            vec![],
            "summary",
            Some(note),
        );
        let md = report.to_markdown();

        let positions: Vec<usize> = [
            "🔴 Non-Adherent",
            "Patient Strengths",
            "Risk Factors / Weaknesses",
            "Prediction Logic",
            "Advanced Clinical Interpretation",
            CAPTION,
        ]
        .iter()
        .map(|s| md.find(s).expect("section present"))
        .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_json_lists_match_rendered_lines() {
        let report = Report::new(
            Label::Adherent,
            vec![strength("Low viral load")],
            vec![],
            "summary",
            None,
        );
        let json = serde_json::to_value(&report).expect("serialize");
        assert_eq!(json["strengths"], serde_json::json!(["Low viral load"]));
        assert_eq!(json["weaknesses"], serde_json::json!([NONE_IDENTIFIED]));
        assert_eq!(json["label"], serde_json::json!("Adherent"));
    }

    #[test]
    fn test_markdown_matches_display() {
        let report = Report::new(Label::NonAdherent, vec![], vec![], "summary", None);
        let md = report.to_markdown();
        assert_eq!(md, format!("{report}"));
        assert!(md.starts_with("### 🔍 Prediction:\n🔴 Non-Adherent\n"));
        assert!(md.ends_with(&format!("_{CAPTION}_\n")));
    }

    #[test]
    fn test_no_dilemma_section_when_absent() {
        let report = Report::new(Label::Adherent, vec![], vec![], "summary", None);
        assert!(!report.to_markdown().contains("Advanced Clinical Interpretation"));
    }
}
