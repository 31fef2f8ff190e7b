//! Indicator trajectories across a patient's reports.
//!
//! For each indicator of the current report the first matching item of
//! every historical report (ascending test date) is collected and the
//! current value appended. Indicators with no history are skipped.

use std::collections::HashSet;

use crate::models::enums::TrendLabel;
use crate::models::Report;

use super::types::{AbnormalChange, TrendAnalysis, TrendPoint, TrendRecord};

/// Slope magnitude (value units per report) below which a series is stable.
const STABLE_SLOPE: f64 = 0.1;

/// Relative change between the last two points that is flagged, in percent.
const ABNORMAL_CHANGE_PERCENT: f64 = 20.0;

pub fn analyze_trends(current: &Report, history: &[Report]) -> TrendAnalysis {
    let mut sorted: Vec<&Report> = history.iter().collect();
    sorted.sort_by_key(|r| r.test_date());

    let mut analysis = TrendAnalysis::default();
    let mut seen = HashSet::new();

    for item in current.items() {
        if !seen.insert(item.name()) {
            continue;
        }

        let mut points: Vec<TrendPoint> = sorted
            .iter()
            .filter_map(|report| {
                report.item(item.name()).map(|hist| TrendPoint {
                    date: report.test_date(),
                    value: hist.value(),
                })
            })
            .collect();

        if points.is_empty() {
            continue;
        }

        points.push(TrendPoint {
            date: current.test_date(),
            value: item.value(),
        });

        let values: Vec<f64> = points.iter().map(|p| p.value).collect();
        if let Some(description) = describe_abnormal_change(item.name(), &values) {
            analysis.abnormal_changes.push(AbnormalChange {
                name: item.name().to_string(),
                description,
            });
        }

        analysis.trends.push(TrendRecord {
            name: item.name().to_string(),
            trend: calculate_trend(&values),
            values: points,
        });
    }

    tracing::debug!(
        report_id = %current.id(),
        history = history.len(),
        trends = analysis.trends.len(),
        abnormal_changes = analysis.abnormal_changes.len(),
        "Trend analysis complete"
    );

    analysis
}

/// Least-squares slope of `values` against their index.
/// `None` for fewer than two points.
pub fn trend_slope(values: &[f64]) -> Option<f64> {
    let n = values.len();
    if n < 2 {
        return None;
    }

    let n_f = n as f64;
    let (mut sum_x, mut sum_y, mut sum_xy, mut sum_x2) = (0.0, 0.0, 0.0, 0.0);
    for (i, &y) in values.iter().enumerate() {
        let x = i as f64;
        sum_x += x;
        sum_y += y;
        sum_xy += x * y;
        sum_x2 += x * x;
    }

    let denominator = n_f * sum_x2 - sum_x * sum_x;
    if denominator == 0.0 {
        return None;
    }
    Some((n_f * sum_xy - sum_x * sum_y) / denominator)
}

pub fn calculate_trend(values: &[f64]) -> TrendLabel {
    match trend_slope(values) {
        None => TrendLabel::NoTrend,
        Some(slope) if slope > STABLE_SLOPE => TrendLabel::Rising,
        Some(slope) if slope < -STABLE_SLOPE => TrendLabel::Falling,
        Some(_) => TrendLabel::Stable,
    }
}

/// Flag a jump between the last two values.
fn describe_abnormal_change(name: &str, values: &[f64]) -> Option<String> {
    let [.., prior, last] = values else {
        return None;
    };

    if *prior != 0.0 {
        let change = (last - prior).abs() / prior * 100.0;
        (change > ABNORMAL_CHANGE_PERCENT).then(|| format!("{name}: {change:.1}% change"))
    } else if *last != 0.0 {
        Some(format!("{name}: changed from 0 to {last}"))
    } else {
        None
    }
}
