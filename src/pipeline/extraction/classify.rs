use crate::intelligence::reference::{IndicatorCatalog, IndicatorDefinition};
use crate::models::ItemStatus;

/// Range verdict for a known indicator.
#[derive(Debug, Clone, PartialEq)]
pub struct RangeVerdict {
    pub status: ItemStatus,
    pub is_abnormal: bool,
    /// Display form, e.g. `125-350`.
    pub reference_range: String,
    pub unit: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Classification {
    Classified(RangeVerdict),
    /// Not in the catalog.
    UnknownIndicator,
}

/// Classify `value` for the canonical indicator `name`.
///
/// The verdict always carries the catalog unit, whatever unit the line
/// was printed with.
pub fn classify(catalog: &IndicatorCatalog, name: &str, value: f64) -> Classification {
    match catalog.get(name) {
        Some(def) => Classification::Classified(classify_against(def, value)),
        None => Classification::UnknownIndicator,
    }
}

/// Inclusive range check against one definition.
pub fn classify_against(def: &IndicatorDefinition, value: f64) -> RangeVerdict {
    let status = ItemStatus::from_range(value, def.reference_min, def.reference_max);
    RangeVerdict {
        status,
        is_abnormal: status.is_abnormal(),
        reference_range: def.reference_display(),
        unit: def.unit.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn verdict(name: &str, value: f64) -> RangeVerdict {
        match classify(IndicatorCatalog::standard(), name, value) {
            Classification::Classified(v) => v,
            other => panic!("expected a verdict, got {other:?}"),
        }
    }

    #[test]
    fn bounds_are_normal() {
        assert_eq!(verdict("Platelets", 125.0).status, ItemStatus::Normal);
        assert_eq!(verdict("Platelets", 350.0).status, ItemStatus::Normal);
        assert!(!verdict("Platelets", 350.0).is_abnormal);
    }

    #[test]
    fn below_range_is_low() {
        let v = verdict("Platelets", 45.0);
        assert_eq!(v.status, ItemStatus::Low);
        assert!(v.is_abnormal);
        assert_eq!(v.reference_range, "125-350");
        assert_eq!(v.unit, "10^9/L");
    }

    #[test]
    fn above_range_is_high() {
        let v = verdict("White blood cells", 12.4);
        assert_eq!(v.status, ItemStatus::High);
        assert!(v.is_abnormal);
    }

    #[test]
    fn verdict_carries_catalog_unit() {
        assert_eq!(verdict("Hemoglobin", 140.0).unit, "g/L");
    }

    #[test]
    fn unknown_indicator_is_distinct() {
        let outcome = classify(IndicatorCatalog::standard(), "Ferritin", 30.0);
        assert_eq!(outcome, Classification::UnknownIndicator);
    }

    #[test]
    fn every_catalog_indicator_honours_its_bounds() {
        const EPS: f64 = 1e-6;
        for def in IndicatorCatalog::standard().entries() {
            let (min, max) = (def.reference_min, def.reference_max);
            for value in [min, max, (min + max) / 2.0] {
                let v = verdict(def.name, value);
                assert_eq!(v.status, ItemStatus::Normal, "{} at {value}", def.name);
                assert!(!v.is_abnormal, "{} at {value}", def.name);
                assert_eq!(v.unit, def.unit);
                assert_eq!(v.reference_range, def.reference_display());
            }

            if min > 0.0 {
                let v = verdict(def.name, min - EPS);
                assert_eq!(v.status, ItemStatus::Low, "{} below min", def.name);
                assert!(v.is_abnormal);
            }

            let v = verdict(def.name, max + EPS);
            assert_eq!(v.status, ItemStatus::High, "{} above max", def.name);
            assert!(v.is_abnormal);
        }
    }
}
