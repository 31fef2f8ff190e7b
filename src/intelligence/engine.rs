use chrono::{NaiveDateTime, Utc};

use crate::models::enums::PanelTier;
use crate::models::Report;

use super::itp::assess_itp;
use super::panels::{assess_panels, overall_status};
use super::recommendations::generate_recommendations;
use super::summary::comparison_summary;
use super::trends::analyze_trends;
use super::types::{BloodTestAnalysis, HistoryComparison, PanelInput};

pub const NO_HISTORY_MESSAGE: &str = "No historical data to compare";

/// Compare `current` with the given historical reports.
pub fn compare_with_history(current: &Report, history: &[Report]) -> HistoryComparison {
    if history.is_empty() {
        return HistoryComparison::NoHistory {
            message: NO_HISTORY_MESSAGE.to_string(),
        };
    }

    let analysis = analyze_trends(current, history);
    let summary = comparison_summary(current, history);

    tracing::info!(
        report_id = %current.id(),
        history = history.len(),
        trends = analysis.trends.len(),
        abnormal_changes = analysis.abnormal_changes.len(),
        "History comparison complete"
    );

    HistoryComparison::Compared {
        trends: analysis.trends,
        abnormal_changes: analysis.abnormal_changes,
        summary,
    }
}

/// Full analysis of caller-supplied panel values.
pub fn analyze_blood_test_data(input: &PanelInput) -> BloodTestAnalysis {
    analyze_blood_test_data_at(input, Utc::now().naive_utc())
}

/// As [`analyze_blood_test_data`], with an explicit analysis time.
pub fn analyze_blood_test_data_at(input: &PanelInput, now: NaiveDateTime) -> BloodTestAnalysis {
    let patient_id = input
        .patient_id
        .clone()
        .unwrap_or_else(|| format!("patient_{}", now.format("%Y%m%d%H%M%S")));

    let panels = assess_panels(input);

    let key_findings: Vec<String> = [
        ("Platelet count abnormal", &panels.platelet),
        ("Red cell indicators abnormal", &panels.red_cell),
        ("White cell indicators abnormal", &panels.white_cell),
    ]
    .into_iter()
    .filter(|(_, panel)| panel.tier != PanelTier::Normal)
    .map(|(label, panel)| format!("{label}: {}", panel.message))
    .collect();

    let overall = overall_status(&panels);
    let itp = assess_itp(input);
    let recommendations = generate_recommendations(overall, &itp);

    tracing::info!(
        patient_id = %patient_id,
        overall = overall.as_str(),
        findings = key_findings.len(),
        bleeding_risk = itp.bleeding_risk.as_str(),
        "Blood test analysis complete"
    );

    BloodTestAnalysis {
        patient_id,
        analysis_date: now,
        overall_status: overall,
        key_findings,
        itp_assessment: itp,
        recommendations,
        detailed_analysis: panels,
    }
}
