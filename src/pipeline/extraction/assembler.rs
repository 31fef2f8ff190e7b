//! Report assembly: line parser → name normalizer → range classifier.
//!
//! Lines are processed in order; anything that does not parse, resolve or
//! classify is skipped. A report with zero items is valid.

use super::classify::{classify, Classification};
use super::line_parser::parse_line;
use super::normalize::normalize_indicator_name;
use crate::intelligence::reference::IndicatorCatalog;
use crate::models::{BloodTestItem, Report, ReportMetadata};

/// Extract classified items from recognized text, in line order.
pub fn parse_blood_test_items(catalog: &IndicatorCatalog, text: &str) -> Vec<BloodTestItem> {
    let mut items = Vec::new();

    for (line_no, line) in text.lines().enumerate() {
        let Some(raw) = parse_line(line) else {
            continue;
        };

        let Some(def) = normalize_indicator_name(catalog, &raw.name) else {
            tracing::debug!(line = line_no + 1, label = %raw.name, "Unrecognized indicator label, line dropped");
            continue;
        };

        match classify(catalog, def.name, raw.value) {
            Classification::Classified(verdict) => {
                let printed_unit = raw.unit.as_deref().filter(|u| *u != verdict.unit);
                let printed_range = raw.range.as_deref().filter(|r| *r != verdict.reference_range);
                if printed_unit.is_some() || printed_range.is_some() {
                    tracing::debug!(
                        line = line_no + 1,
                        indicator = def.name,
                        printed_unit,
                        printed_range,
                        "Printed unit or range differs from catalog, catalog kept"
                    );
                }

                items.push(BloodTestItem::new(
                    def.name,
                    raw.value,
                    verdict.unit,
                    verdict.reference_range,
                    verdict.status,
                ));
            }
            Classification::UnknownIndicator => {
                tracing::debug!(line = line_no + 1, indicator = def.name, "Indicator missing from catalog, line dropped");
            }
        }
    }

    items
}

/// Build a [`Report`] from recognized text and caller metadata.
pub fn assemble_report(
    catalog: &IndicatorCatalog,
    text: &str,
    metadata: ReportMetadata,
) -> Report {
    let items = parse_blood_test_items(catalog, text);
    let report = Report::new(metadata, items);

    tracing::info!(
        report_id = %report.id(),
        items = report.items().len(),
        abnormal = report.abnormal_count(),
        "Report assembled"
    );

    report
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::models::ItemStatus;

    fn metadata() -> ReportMetadata {
        ReportMetadata {
            patient_name: "Li Wei".into(),
            hospital: "General Hospital".into(),
            test_date: NaiveDate::from_ymd_opt(2024, 5, 1)
                .unwrap()
                .and_hms_opt(8, 30, 0)
                .unwrap(),
            notes: None,
            image_path: None,
        }
    }

    #[test]
    fn assembles_end_to_end_report() {
        let text = "PLT 45 10^9/L 125-350\nHGB 140 g/L 115-175";
        let report = assemble_report(IndicatorCatalog::standard(), text, metadata());

        assert_eq!(report.items().len(), 2);

        let plt = &report.items()[0];
        assert_eq!(plt.name(), "Platelets");
        assert_eq!(plt.value(), 45.0);
        assert_eq!(plt.unit(), "10^9/L");
        assert_eq!(plt.reference_range(), "125-350");
        assert_eq!(plt.status(), ItemStatus::Low);
        assert!(plt.is_abnormal());

        let hgb = &report.items()[1];
        assert_eq!(hgb.name(), "Hemoglobin");
        assert_eq!(hgb.value(), 140.0);
        assert_eq!(hgb.status(), ItemStatus::Normal);
        assert!(!hgb.is_abnormal());

        assert_eq!(report.patient_name(), "Li Wei");
        assert_eq!(report.abnormal_count(), 1);
    }

    #[test]
    fn empty_text_gives_empty_report() {
        let report = assemble_report(IndicatorCatalog::standard(), "", metadata());
        assert!(report.items().is_empty());
    }

    #[test]
    fn unknown_labels_are_skipped() {
        let items = parse_blood_test_items(IndicatorCatalog::standard(), "Foobar 42");
        assert!(items.is_empty());
    }

    #[test]
    fn noise_lines_are_skipped_and_order_kept() {
        let text = "Complete Blood Count\n\
                    WBC 5.6 10^9/L 3.5-9.5\n\
                    Sample: venous\n\
                    血小板计数 88 10^9/L\n\
                    RBC 4.5";
        let items = parse_blood_test_items(IndicatorCatalog::standard(), text);
        let names: Vec<&str> = items.iter().map(|i| i.name()).collect();
        assert_eq!(names, ["White blood cells", "Platelets", "Red blood cells"]);
        assert_eq!(items[0].value(), 5.6);
        assert_eq!(items[1].status(), ItemStatus::Low);
    }

    #[test]
    fn numbered_report_rows_are_extracted() {
        let text = "1 PLT 45\n3 PLT 45 10^9/L 125-350\n12 HGB 140 g/L 115-175";
        let items = parse_blood_test_items(IndicatorCatalog::standard(), text);
        let names: Vec<&str> = items.iter().map(|i| i.name()).collect();
        assert_eq!(names, ["Platelets", "Platelets", "Hemoglobin"]);
        assert_eq!(items[2].value(), 140.0);
    }

    #[test]
    fn repeated_indicator_is_kept_twice() {
        let items = parse_blood_test_items(IndicatorCatalog::standard(), "PLT 45\nPLT 50");
        assert_eq!(items.len(), 2);
    }
}
