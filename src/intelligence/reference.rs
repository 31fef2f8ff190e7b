use serde::Serialize;

/// Reference definition for one blood-count indicator.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndicatorDefinition {
    /// Canonical name carried by every extracted item.
    pub name: &'static str,
    /// Short analyzer code printed on most reports.
    pub code: &'static str,
    /// Full Chinese indicator name; matched exactly like `name`.
    pub canonical_label: &'static str,
    /// Labels that resolve to this indicator, in match order.
    pub aliases: &'static [&'static str],
    pub reference_min: f64,
    pub reference_max: f64,
    pub unit: &'static str,
}

impl IndicatorDefinition {
    /// Display form of the reference range, e.g. `125-350`.
    pub fn reference_display(&self) -> String {
        format!("{}-{}", self.reference_min, self.reference_max)
    }
}

/// Ordered, immutable indicator table.
///
/// Order is part of the contract: name resolution returns the first
/// entry (in this order) whose aliases match, so `White blood cells`
/// shadows later entries for ambiguous fragments.
#[derive(Debug, Serialize)]
#[serde(transparent)]
pub struct IndicatorCatalog {
    entries: &'static [IndicatorDefinition],
}

/// Adult blood-count reference data.
pub static BLOOD_COUNT_CATALOG: IndicatorCatalog = IndicatorCatalog {
    entries: &[
        IndicatorDefinition {
            name: "White blood cells",
            code: "WBC",
            canonical_label: "白细胞",
            aliases: &["WBC", "白细胞计数", "白细胞数"],
            reference_min: 3.5,
            reference_max: 9.5,
            unit: "10^9/L",
        },
        IndicatorDefinition {
            name: "Red blood cells",
            code: "RBC",
            canonical_label: "红细胞",
            aliases: &["RBC", "红细胞计数", "红细胞数"],
            reference_min: 3.8,
            reference_max: 5.8,
            unit: "10^12/L",
        },
        IndicatorDefinition {
            name: "Hemoglobin",
            code: "HGB",
            canonical_label: "血红蛋白",
            aliases: &["HGB", "Hb", "血红蛋白", "血色素"],
            reference_min: 115.0,
            reference_max: 175.0,
            unit: "g/L",
        },
        IndicatorDefinition {
            name: "Hematocrit",
            code: "HCT",
            canonical_label: "红细胞压积",
            aliases: &["HCT", "红细胞压积", "红细胞比容"],
            reference_min: 0.35,
            reference_max: 0.50,
            unit: "L/L",
        },
        IndicatorDefinition {
            name: "Mean corpuscular volume",
            code: "MCV",
            canonical_label: "平均红细胞体积",
            aliases: &["MCV", "平均红细胞体积"],
            reference_min: 80.0,
            reference_max: 100.0,
            unit: "fL",
        },
        IndicatorDefinition {
            name: "Mean corpuscular hemoglobin",
            code: "MCH",
            canonical_label: "平均红细胞血红蛋白含量",
            aliases: &["MCH", "平均红细胞血红蛋白含量"],
            reference_min: 27.0,
            reference_max: 34.0,
            unit: "pg",
        },
        IndicatorDefinition {
            name: "Mean corpuscular hemoglobin concentration",
            code: "MCHC",
            canonical_label: "平均红细胞血红蛋白浓度",
            aliases: &["MCHC", "平均红细胞血红蛋白浓度"],
            reference_min: 320.0,
            reference_max: 360.0,
            unit: "g/L",
        },
        IndicatorDefinition {
            name: "Platelets",
            code: "PLT",
            canonical_label: "血小板",
            aliases: &["PLT", "血小板计数", "血小板数"],
            reference_min: 125.0,
            reference_max: 350.0,
            unit: "10^9/L",
        },
        IndicatorDefinition {
            name: "Lymphocytes",
            code: "LYM",
            canonical_label: "淋巴细胞",
            aliases: &["LYM", "淋巴细胞", "淋巴细胞计数"],
            reference_min: 1.1,
            reference_max: 3.2,
            unit: "10^9/L",
        },
        IndicatorDefinition {
            name: "Neutrophils",
            code: "NEU",
            canonical_label: "中性粒细胞",
            aliases: &["NEU", "中性粒细胞", "中性粒细胞计数"],
            reference_min: 1.8,
            reference_max: 6.3,
            unit: "10^9/L",
        },
        IndicatorDefinition {
            name: "Eosinophils",
            code: "EOS",
            canonical_label: "嗜酸性粒细胞",
            aliases: &["EOS", "嗜酸性粒细胞", "嗜酸性粒细胞计数"],
            reference_min: 0.02,
            reference_max: 0.52,
            unit: "10^9/L",
        },
        IndicatorDefinition {
            name: "Basophils",
            code: "BAS",
            canonical_label: "嗜碱性粒细胞",
            aliases: &["BAS", "嗜碱性粒细胞", "嗜碱性粒细胞计数"],
            reference_min: 0.0,
            reference_max: 0.06,
            unit: "10^9/L",
        },
        IndicatorDefinition {
            name: "Monocytes",
            code: "MON",
            canonical_label: "单核细胞",
            aliases: &["MON", "单核细胞", "单核细胞计数"],
            reference_min: 0.10,
            reference_max: 0.60,
            unit: "10^9/L",
        },
    ],
};

impl IndicatorCatalog {
    /// Build a catalog over a custom static table (tests, regional ranges).
    pub const fn new(entries: &'static [IndicatorDefinition]) -> Self {
        Self { entries }
    }

    /// The bundled adult catalog.
    pub fn standard() -> &'static IndicatorCatalog {
        &BLOOD_COUNT_CATALOG
    }

    /// Entries in definition order.
    pub fn entries(&self) -> &'static [IndicatorDefinition] {
        self.entries
    }

    /// Look up an entry by canonical name (exact).
    pub fn get(&self, name: &str) -> Option<&'static IndicatorDefinition> {
        self.entries.iter().find(|d| d.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
