//! Panel scoring for caller-supplied blood-count values.
//!
//! Each panel is keyed on one value (platelet count, hemoglobin, white
//! cell count) and graded by an ordered cutoff table; the first cutoff
//! that applies sets the tier. The abnormal flag comes from the panel's
//! reference band and is evaluated separately from the tier.

use crate::models::enums::{OverallStatus, PanelTier};

use super::types::{PanelAssessment, PanelInput, PanelReport};

#[derive(Debug, Clone, Copy)]
enum Cutoff {
    Below(f64),
    Above(f64),
}

impl Cutoff {
    fn applies(self, value: f64) -> bool {
        match self {
            Self::Below(limit) => value < limit,
            Self::Above(limit) => value > limit,
        }
    }
}

#[derive(Debug)]
struct TierRule {
    cutoff: Cutoff,
    tier: PanelTier,
    /// `{value}` is replaced with the measured value.
    message: &'static str,
}

/// Grading table for one panel.
#[derive(Debug)]
pub struct PanelGrading {
    pub name: &'static str,
    band_min: f64,
    band_max: f64,
    reference_range: &'static str,
    rules: &'static [TierRule],
    normal_message: &'static str,
    missing_message: &'static str,
}

pub static PLATELET_PANEL: PanelGrading = PanelGrading {
    name: "platelet",
    band_min: 100.0,
    band_max: 300.0,
    reference_range: "100-300 ×10^9/L",
    rules: &[
        TierRule {
            cutoff: Cutoff::Below(50.0),
            tier: PanelTier::Severe,
            message: "Platelets severely reduced ({value} ×10^9/L), very high bleeding risk",
        },
        TierRule {
            cutoff: Cutoff::Below(100.0),
            tier: PanelTier::Moderate,
            message: "Platelets moderately reduced ({value} ×10^9/L), needs attention",
        },
        TierRule {
            cutoff: Cutoff::Below(150.0),
            tier: PanelTier::Mild,
            message: "Platelets mildly reduced ({value} ×10^9/L)",
        },
        TierRule {
            cutoff: Cutoff::Above(300.0),
            tier: PanelTier::High,
            message: "Platelet count elevated ({value} ×10^9/L)",
        },
    ],
    normal_message: "Platelet count normal ({value} ×10^9/L)",
    missing_message: "Platelet count missing",
};

pub static RED_CELL_PANEL: PanelGrading = PanelGrading {
    name: "red_cell",
    band_min: 130.0,
    band_max: 175.0,
    reference_range: "130-175 g/L",
    rules: &[
        TierRule {
            cutoff: Cutoff::Below(80.0),
            tier: PanelTier::Severe,
            message: "Severe anemia (Hb: {value} g/L)",
        },
        TierRule {
            cutoff: Cutoff::Below(110.0),
            tier: PanelTier::Moderate,
            message: "Moderate anemia (Hb: {value} g/L)",
        },
        TierRule {
            cutoff: Cutoff::Below(130.0),
            tier: PanelTier::Mild,
            message: "Mild anemia (Hb: {value} g/L)",
        },
        TierRule {
            cutoff: Cutoff::Above(175.0),
            tier: PanelTier::High,
            message: "Hemoglobin elevated (Hb: {value} g/L)",
        },
    ],
    normal_message: "Hemoglobin normal (Hb: {value} g/L)",
    missing_message: "Hemoglobin missing",
};

pub static WHITE_CELL_PANEL: PanelGrading = PanelGrading {
    name: "white_cell",
    band_min: 3.5,
    band_max: 9.5,
    reference_range: "3.5-9.5 ×10^9/L",
    rules: &[
        TierRule {
            cutoff: Cutoff::Below(3.5),
            tier: PanelTier::Low,
            message: "White cells reduced (WBC: {value} ×10^9/L)",
        },
        TierRule {
            cutoff: Cutoff::Above(9.5),
            tier: PanelTier::High,
            message: "White cells elevated (WBC: {value} ×10^9/L)",
        },
    ],
    normal_message: "White cell count normal (WBC: {value} ×10^9/L)",
    missing_message: "White cell count missing",
};

/// Grade one panel. A missing value yields [`PanelTier::Unknown`].
pub fn assess_panel(grading: &PanelGrading, value: Option<f64>) -> PanelAssessment {
    let Some(value) = value else {
        return PanelAssessment {
            tier: PanelTier::Unknown,
            message: grading.missing_message.to_string(),
            value: None,
            reference_range: grading.reference_range.to_string(),
            is_abnormal: false,
        };
    };

    let (tier, template) = grading
        .rules
        .iter()
        .find(|rule| rule.cutoff.applies(value))
        .map(|rule| (rule.tier, rule.message))
        .unwrap_or((PanelTier::Normal, grading.normal_message));

    PanelAssessment {
        tier,
        message: template.replace("{value}", &value.to_string()),
        value: Some(value),
        reference_range: grading.reference_range.to_string(),
        is_abnormal: !(grading.band_min..=grading.band_max).contains(&value),
    }
}

pub fn assess_panels(input: &PanelInput) -> PanelReport {
    PanelReport {
        platelet: assess_panel(&PLATELET_PANEL, input.plt),
        red_cell: assess_panel(&RED_CELL_PANEL, input.hgb),
        white_cell: assess_panel(&WHITE_CELL_PANEL, input.wbc),
    }
}

/// Aggregate by the number of panels not graded normal (unknown counts).
pub fn overall_status(report: &PanelReport) -> OverallStatus {
    let non_normal = report
        .panels()
        .iter()
        .filter(|p| p.tier != PanelTier::Normal)
        .count();

    match non_normal {
        0 => OverallStatus::Normal,
        1..=2 => OverallStatus::Attention,
        _ => OverallStatus::Abnormal,
    }
}
