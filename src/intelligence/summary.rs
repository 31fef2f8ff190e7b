//! Comparison summary and history selection for report comparisons.

use crate::models::Report;

pub const FIRST_TEST_MESSAGE: &str = "First test, no earlier report to compare with";

/// Most recent report by test date; ties go to the earliest in input order.
pub fn latest_report(reports: &[Report]) -> Option<&Report> {
    reports.iter().fold(None, |latest: Option<&Report>, report| match latest {
        Some(current) if report.test_date() <= current.test_date() => Some(current),
        _ => Some(report),
    })
}

/// One-line summary of `current` against the most recent historical report.
pub fn comparison_summary(current: &Report, history: &[Report]) -> String {
    let Some(latest) = latest_report(history) else {
        return FIRST_TEST_MESSAGE.to_string();
    };

    let total = current.items().len();
    let abnormal = current.abnormal_count();
    let previous_abnormal = latest.abnormal_count();

    let delta = match abnormal.cmp(&previous_abnormal) {
        std::cmp::Ordering::Less => "abnormal items decreased",
        std::cmp::Ordering::Greater => "abnormal items increased",
        std::cmp::Ordering::Equal => "abnormal item count unchanged",
    };

    let noun = if total == 1 { "item" } else { "items" };
    format!("{total} {noun} tested, {abnormal} abnormal. Compared with the last test, {delta}.")
}

/// Pick the reports that belong to the same patient as `current`.
///
/// Names are compared lowercased: containment in either direction, or an
/// equal first word when either name has more than one word. `current`
/// itself (same id) is never selected; blank names match nothing.
pub fn select_history(current: &Report, candidates: &[Report]) -> Vec<Report> {
    let name = current.patient_name().trim().to_lowercase();
    if name.is_empty() {
        return Vec::new();
    }

    candidates
        .iter()
        .filter(|r| r.id() != current.id())
        .filter(|r| same_patient(&name, &r.patient_name().trim().to_lowercase()))
        .cloned()
        .collect()
}

fn same_patient(a: &str, b: &str) -> bool {
    if a.is_empty() || b.is_empty() {
        return false;
    }
    if a.contains(b) || b.contains(a) {
        return true;
    }
    let multi_word = a.contains(char::is_whitespace) || b.contains(char::is_whitespace);
    multi_word && a.split_whitespace().next() == b.split_whitespace().next()
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::models::{BloodTestItem, ItemStatus, ReportMetadata};

    fn report(name: &str, day: u32, abnormal: usize) -> Report {
        let items = (0..3)
            .map(|i| {
                let status = if i < abnormal {
                    ItemStatus::Low
                } else {
                    ItemStatus::Normal
                };
                BloodTestItem::new("Platelets", 100.0, "10^9/L", "125-350", status)
            })
            .collect();
        Report::new(
            ReportMetadata {
                patient_name: name.into(),
                hospital: "General Hospital".into(),
                test_date: NaiveDate::from_ymd_opt(2024, 1, day)
                    .unwrap()
                    .and_hms_opt(0, 0, 0)
                    .unwrap(),
                notes: None,
                image_path: None,
            },
            items,
        )
    }

    #[test]
    fn empty_history_is_first_test() {
        let current = report("Li Wei", 10, 1);
        assert_eq!(comparison_summary(&current, &[]), FIRST_TEST_MESSAGE);
    }

    #[test]
    fn summary_compares_with_latest() {
        let current = report("Li Wei", 20, 1);
        let history = [report("Li Wei", 15, 2), report("Li Wei", 5, 0)];
        assert_eq!(
            comparison_summary(&current, &history),
            "3 items tested, 1 abnormal. Compared with the last test, abnormal items decreased."
        );
    }

    #[test]
    fn single_item_summary_is_singular() {
        let current = Report::new(
            ReportMetadata {
                patient_name: "Li Wei".into(),
                hospital: "General Hospital".into(),
                test_date: NaiveDate::from_ymd_opt(2024, 2, 1)
                    .unwrap()
                    .and_hms_opt(0, 0, 0)
                    .unwrap(),
                notes: None,
                image_path: None,
            },
            vec![BloodTestItem::new("Platelets", 45.0, "10^9/L", "125-350", ItemStatus::Low)],
        );
        assert_eq!(
            comparison_summary(&current, &[report("Li Wei", 1, 1)]),
            "1 item tested, 1 abnormal. Compared with the last test, abnormal item count unchanged."
        );
    }

    #[test]
    fn summary_increase_and_same() {
        let current = report("Li Wei", 20, 2);
        assert!(comparison_summary(&current, &[report("Li Wei", 1, 0)]).ends_with("abnormal items increased."));
        assert!(comparison_summary(&current, &[report("Li Wei", 1, 2)]).ends_with("abnormal item count unchanged."));
    }

    #[test]
    fn latest_tie_goes_to_first_in_input_order() {
        let history = [report("A", 10, 0), report("B", 10, 1), report("C", 3, 2)];
        assert_eq!(latest_report(&history).unwrap().patient_name(), "A");
        assert!(latest_report(&[]).is_none());
    }

    #[test]
    fn selects_by_name_containment() {
        let current = report("Li Wei", 20, 0);
        let candidates = [
            report("li wei", 1, 0),
            report("Li Wei Jr", 2, 0),
            report("Wei", 3, 0),
            report("Zhang San", 4, 0),
        ];
        let names: Vec<String> = select_history(&current, &candidates)
            .iter()
            .map(|r| r.patient_name().to_string())
            .collect();
        assert_eq!(names, ["li wei", "Li Wei Jr", "Wei"]);
    }

    #[test]
    fn selects_by_surname() {
        let current = report("Li Wei", 20, 0);
        let candidates = [report("Li Na", 1, 0), report("Lin", 2, 0)];
        let selected = select_history(&current, &candidates);
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].patient_name(), "Li Na");
    }

    #[test]
    fn excludes_current_report() {
        let current = report("Li Wei", 20, 0);
        let candidates = [current.clone(), report("Li Wei", 1, 0)];
        let selected = select_history(&current, &candidates);
        assert_eq!(selected.len(), 1);
        assert_ne!(selected[0].id(), current.id());
    }

    #[test]
    fn blank_names_match_nothing() {
        let current = report("  ", 20, 0);
        assert!(select_history(&current, &[report("Li Wei", 1, 0)]).is_empty());

        let current = report("Li Wei", 20, 0);
        assert!(select_history(&current, &[report("", 1, 0)]).is_empty());
    }
}
