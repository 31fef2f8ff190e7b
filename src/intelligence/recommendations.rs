use crate::models::enums::{BleedingRisk, OverallStatus, PanelTier};

use super::types::ItpAssessment;

enum Condition {
    Overall(OverallStatus),
    PlateletTier(PanelTier),
    BleedingRisk(BleedingRisk),
}

impl Condition {
    fn holds(&self, overall: OverallStatus, itp: &ItpAssessment) -> bool {
        match *self {
            Self::Overall(status) => overall == status,
            Self::PlateletTier(tier) => itp.platelet_tier == tier,
            Self::BleedingRisk(risk) => itp.bleeding_risk == risk,
        }
    }
}

/// Advisory rules in output order; every matching rule contributes its lines.
const RULES: &[(Condition, &[&str])] = &[
    (
        Condition::Overall(OverallStatus::Abnormal),
        &["Seek medical care promptly for further examination and diagnosis"],
    ),
    (
        Condition::Overall(OverallStatus::Attention),
        &["Re-check regularly and keep a close watch on indicator changes"],
    ),
    (
        Condition::PlateletTier(PanelTier::Severe),
        &[
            "Platelets severely reduced: seek medical care immediately and avoid strenuous exercise and injury",
            "Watch for bleeding signs such as skin petechiae, nosebleeds or gum bleeding",
        ],
    ),
    (
        Condition::PlateletTier(PanelTier::Moderate),
        &["Platelets moderately reduced: avoid strenuous exercise and monitor regularly"],
    ),
    (
        Condition::PlateletTier(PanelTier::Mild),
        &["Platelets mildly reduced: moderate exercise is fine, re-check regularly"],
    ),
    (
        Condition::BleedingRisk(BleedingRisk::High),
        &[
            "High bleeding risk: avoid aspirin and other antiplatelet drugs",
            "Keep good oral hygiene, use a soft toothbrush and avoid hard foods",
        ],
    ),
];

const GENERAL_ADVICE: [&str; 2] = [
    "Keep a regular routine, a balanced diet and moderate exercise",
    "Have a routine blood count regularly and keep a health record",
];

pub fn generate_recommendations(overall: OverallStatus, itp: &ItpAssessment) -> Vec<String> {
    RULES
        .iter()
        .filter(|(condition, _)| condition.holds(overall, itp))
        .flat_map(|(_, lines)| lines.iter())
        .chain(GENERAL_ADVICE.iter())
        .map(|line| line.to_string())
        .collect()
}
