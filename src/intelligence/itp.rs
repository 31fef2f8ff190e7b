//! Immune thrombocytopenia (ITP) grading from the platelet count.

use crate::models::enums::{BleedingRisk, PanelTier, TreatmentResponse};

use super::types::{ItpAssessment, PanelInput};

struct RiskRule {
    tier: PanelTier,
    risk: BleedingRisk,
}

/// First matching row wins; anything unmatched is minimal risk.
const BLEEDING_RISK_RULES: [RiskRule; 3] = [
    RiskRule {
        tier: PanelTier::Severe,
        risk: BleedingRisk::High,
    },
    RiskRule {
        tier: PanelTier::Mild,
        risk: BleedingRisk::Moderate,
    },
    // Unreachable: shadowed by the mild row above.
    RiskRule {
        tier: PanelTier::Mild,
        risk: BleedingRisk::Low,
    },
];

/// ITP platelet tier. Unlike the platelet panel there is no high tier.
pub fn platelet_tier(plt: Option<f64>) -> PanelTier {
    match plt {
        None => PanelTier::Unknown,
        Some(v) if v < 50.0 => PanelTier::Severe,
        Some(v) if v < 100.0 => PanelTier::Moderate,
        Some(v) if v < 150.0 => PanelTier::Mild,
        Some(_) => PanelTier::Normal,
    }
}

pub fn bleeding_risk(tier: PanelTier) -> BleedingRisk {
    BLEEDING_RISK_RULES
        .iter()
        .find(|rule| rule.tier == tier)
        .map_or(BleedingRisk::Minimal, |rule| rule.risk)
}

pub fn assess_itp(input: &PanelInput) -> ItpAssessment {
    let platelet_tier = platelet_tier(input.plt);
    ItpAssessment {
        platelet_tier,
        bleeding_risk: bleeding_risk(platelet_tier),
        treatment_response: TreatmentResponse::PendingEvaluation,
    }
}
