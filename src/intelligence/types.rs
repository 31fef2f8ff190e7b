use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::models::enums::{BleedingRisk, OverallStatus, PanelTier, TreatmentResponse, TrendLabel};

// ---------------------------------------------------------------------------
// Trends
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub date: NaiveDateTime,
    pub value: f64,
}

/// Trajectory of one indicator across history plus the current report.
/// Points are in ascending test-date order; the last point is the current
/// report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendRecord {
    pub name: String,
    pub values: Vec<TrendPoint>,
    pub trend: TrendLabel,
}

impl TrendRecord {
    pub fn latest(&self) -> Option<&TrendPoint> {
        self.values.last()
    }
}

/// A large jump between the two most recent points of a trend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AbnormalChange {
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrendAnalysis {
    /// In current-report item order.
    pub trends: Vec<TrendRecord>,
    pub abnormal_changes: Vec<AbnormalChange>,
}

impl TrendAnalysis {
    pub fn trend(&self, name: &str) -> Option<&TrendRecord> {
        self.trends.iter().find(|t| t.name == name)
    }

    pub fn is_empty(&self) -> bool {
        self.trends.is_empty()
    }
}

/// Outcome of comparing a report with the patient's history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum HistoryComparison {
    NoHistory {
        message: String,
    },
    Compared {
        trends: Vec<TrendRecord>,
        abnormal_changes: Vec<AbnormalChange>,
        summary: String,
    },
}

// ---------------------------------------------------------------------------
// Panel assessment
// ---------------------------------------------------------------------------

/// Numeric panel values supplied directly by a caller (all optional).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelInput {
    pub patient_id: Option<String>,
    pub plt: Option<f64>,
    pub mpv: Option<f64>,
    pub pdw: Option<f64>,
    pub hgb: Option<f64>,
    pub rbc: Option<f64>,
    pub hct: Option<f64>,
    pub wbc: Option<f64>,
    pub neut_percent: Option<f64>,
    pub lymph_percent: Option<f64>,
}

/// Scoring of one panel against its key value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PanelAssessment {
    pub tier: PanelTier,
    pub message: String,
    /// `None` when the key value was missing.
    pub value: Option<f64>,
    pub reference_range: String,
    /// From the panel's reference band, independent of `tier`.
    pub is_abnormal: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PanelReport {
    pub platelet: PanelAssessment,
    pub red_cell: PanelAssessment,
    pub white_cell: PanelAssessment,
}

impl PanelReport {
    pub fn panels(&self) -> [&PanelAssessment; 3] {
        [&self.platelet, &self.red_cell, &self.white_cell]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItpAssessment {
    pub platelet_tier: PanelTier,
    pub bleeding_risk: BleedingRisk,
    pub treatment_response: TreatmentResponse,
}

/// Full analysis of one set of panel values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BloodTestAnalysis {
    pub patient_id: String,
    pub analysis_date: NaiveDateTime,
    pub overall_status: OverallStatus,
    pub key_findings: Vec<String>,
    pub itp_assessment: ItpAssessment,
    pub recommendations: Vec<String>,
    pub detailed_analysis: PanelReport,
}
