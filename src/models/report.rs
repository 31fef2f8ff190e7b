use chrono::{NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::ItemStatus;

/// One classified indicator extracted from a report.
///
/// The abnormal flag is derived from `status` and has no setter; on the
/// wire it is still emitted as `is_abnormal` for consumers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "BloodTestItemRecord", from = "BloodTestItemRecord")]
pub struct BloodTestItem {
    name: String,
    value: f64,
    unit: String,
    reference_range: String,
    status: ItemStatus,
}

/// Wire/storage shape of [`BloodTestItem`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BloodTestItemRecord {
    pub name: String,
    pub value: f64,
    pub unit: String,
    pub reference_range: String,
    pub status: ItemStatus,
    #[serde(default)]
    pub is_abnormal: bool,
}

impl BloodTestItem {
    pub fn new(
        name: impl Into<String>,
        value: f64,
        unit: impl Into<String>,
        reference_range: impl Into<String>,
        status: ItemStatus,
    ) -> Self {
        Self {
            name: name.into(),
            value,
            unit: unit.into(),
            reference_range: reference_range.into(),
            status,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn unit(&self) -> &str {
        &self.unit
    }

    pub fn reference_range(&self) -> &str {
        &self.reference_range
    }

    pub fn status(&self) -> ItemStatus {
        self.status
    }

    pub fn is_abnormal(&self) -> bool {
        self.status.is_abnormal()
    }
}

impl From<BloodTestItem> for BloodTestItemRecord {
    fn from(item: BloodTestItem) -> Self {
        let is_abnormal = item.is_abnormal();
        Self {
            name: item.name,
            value: item.value,
            unit: item.unit,
            reference_range: item.reference_range,
            status: item.status,
            is_abnormal,
        }
    }
}

impl From<BloodTestItemRecord> for BloodTestItem {
    fn from(record: BloodTestItemRecord) -> Self {
        Self::new(
            record.name,
            record.value,
            record.unit,
            record.reference_range,
            record.status,
        )
    }
}

/// Caller-supplied metadata for a new report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportMetadata {
    pub patient_name: String,
    pub hospital: String,
    pub test_date: NaiveDateTime,
    pub notes: Option<String>,
    pub image_path: Option<String>,
}

/// A blood-count report.
///
/// Identity, items and test metadata are fixed at creation. Only the
/// notes (and with them `updated_at`) change afterwards; a corrected
/// report is a new `Report`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    id: Uuid,
    patient_name: String,
    hospital: String,
    test_date: NaiveDateTime,
    items: Vec<BloodTestItem>,
    notes: Option<String>,
    image_path: Option<String>,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

impl Report {
    /// New report with a fresh v4 id and current timestamps.
    pub fn new(metadata: ReportMetadata, items: Vec<BloodTestItem>) -> Self {
        let now = Utc::now().naive_utc();
        Self {
            id: Uuid::new_v4(),
            patient_name: metadata.patient_name,
            hospital: metadata.hospital,
            test_date: metadata.test_date,
            items,
            notes: metadata.notes,
            image_path: metadata.image_path,
            created_at: now,
            updated_at: now,
        }
    }

    /// Rehydrate a persisted report (storage layer only).
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn restore(
        id: Uuid,
        patient_name: String,
        hospital: String,
        test_date: NaiveDateTime,
        items: Vec<BloodTestItem>,
        notes: Option<String>,
        image_path: Option<String>,
        created_at: NaiveDateTime,
        updated_at: NaiveDateTime,
    ) -> Self {
        Self {
            id,
            patient_name,
            hospital,
            test_date,
            items,
            notes,
            image_path,
            created_at,
            updated_at,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn patient_name(&self) -> &str {
        &self.patient_name
    }

    pub fn hospital(&self) -> &str {
        &self.hospital
    }

    pub fn test_date(&self) -> NaiveDateTime {
        self.test_date
    }

    pub fn items(&self) -> &[BloodTestItem] {
        &self.items
    }

    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    pub fn image_path(&self) -> Option<&str> {
        self.image_path.as_deref()
    }

    pub fn created_at(&self) -> NaiveDateTime {
        self.created_at
    }

    pub fn updated_at(&self) -> NaiveDateTime {
        self.updated_at
    }

    /// First item carrying `name`, if any.
    pub fn item(&self, name: &str) -> Option<&BloodTestItem> {
        self.items.iter().find(|i| i.name() == name)
    }

    pub fn abnormal_count(&self) -> usize {
        self.items.iter().filter(|i| i.is_abnormal()).count()
    }

    pub fn set_notes(&mut self, notes: Option<String>) {
        self.notes = notes;
        self.touch();
    }

    /// Refresh the update timestamp.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now().naive_utc();
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn metadata() -> ReportMetadata {
        ReportMetadata {
            patient_name: "Li Wei".into(),
            hospital: "General Hospital".into(),
            test_date: NaiveDate::from_ymd_opt(2024, 5, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
            notes: None,
            image_path: None,
        }
    }

    #[test]
    fn abnormal_is_derived_from_status() {
        let low = BloodTestItem::new("Platelets", 45.0, "10^9/L", "125-350", ItemStatus::Low);
        let ok = BloodTestItem::new("Hemoglobin", 140.0, "g/L", "115-175", ItemStatus::Normal);
        assert!(low.is_abnormal());
        assert!(!ok.is_abnormal());
    }

    #[test]
    fn item_json_carries_flag() {
        let item = BloodTestItem::new("Platelets", 45.0, "10^9/L", "125-350", ItemStatus::Low);
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["name"], "Platelets");
        assert_eq!(json["status"], "low");
        assert_eq!(json["is_abnormal"], true);
    }

    #[test]
    fn inconsistent_wire_flag_is_ignored() {
        let json = r#"{"name":"Platelets","value":200.0,"unit":"10^9/L",
            "reference_range":"125-350","status":"normal","is_abnormal":true}"#;
        let item: BloodTestItem = serde_json::from_str(json).unwrap();
        assert!(!item.is_abnormal());
    }

    #[test]
    fn new_report_has_matching_timestamps() {
        let report = Report::new(metadata(), Vec::new());
        assert_eq!(report.created_at(), report.updated_at());
        assert!(report.items().is_empty());
        assert_eq!(report.abnormal_count(), 0);
    }

    #[test]
    fn ids_are_unique() {
        let a = Report::new(metadata(), Vec::new());
        let b = Report::new(metadata(), Vec::new());
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn set_notes_touches_updated_at() {
        let mut report = Report::new(metadata(), Vec::new());
        let created = report.created_at();
        report.set_notes(Some("fasting sample".into()));
        assert_eq!(report.notes(), Some("fasting sample"));
        assert!(report.updated_at() >= created);
        assert_eq!(report.created_at(), created);
    }

    #[test]
    fn item_lookup_returns_first_match() {
        let items = vec![
            BloodTestItem::new("Lymphocytes", 1.5, "10^9/L", "1.1-3.2", ItemStatus::Normal),
            BloodTestItem::new("Lymphocytes", 0.5, "10^9/L", "1.1-3.2", ItemStatus::Low),
        ];
        let report = Report::new(metadata(), items);
        assert_eq!(report.item("Lymphocytes").unwrap().value(), 1.5);
        assert!(report.item("Platelets").is_none());
    }
}
