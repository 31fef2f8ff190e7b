use crate::db::DatabaseError;
use serde::{Deserialize, Serialize};

/// Macro to generate enum with as_str + std::str::FromStr pattern.
/// The string form doubles as the serde representation.
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $s)] $variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = DatabaseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(DatabaseError::InvalidEnum {
                        field: stringify!($name).into(),
                        value: s.into(),
                    }),
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

// Range classification of a single extracted indicator.
str_enum!(ItemStatus {
    Normal => "normal",
    Low => "low",
    High => "high",
});

str_enum!(TrendLabel {
    NoTrend => "no-trend",
    Rising => "rising",
    Falling => "falling",
    Stable => "stable",
});

// Severity tier shared by the panel assessor and the ITP layer.
str_enum!(PanelTier {
    Severe => "severe",
    Moderate => "moderate",
    Mild => "mild",
    Low => "low",
    High => "high",
    Normal => "normal",
    Unknown => "unknown",
});

str_enum!(BleedingRisk {
    High => "high",
    Moderate => "moderate",
    Low => "low",
    Minimal => "minimal",
});

str_enum!(OverallStatus {
    Normal => "normal",
    Attention => "attention",
    Abnormal => "abnormal",
});

str_enum!(TreatmentResponse {
    PendingEvaluation => "pending_evaluation",
});

impl ItemStatus {
    /// Inclusive range check: `min` and `max` themselves are normal.
    pub fn from_range(value: f64, min: f64, max: f64) -> Self {
        if value < min {
            Self::Low
        } else if value > max {
            Self::High
        } else {
            Self::Normal
        }
    }

    pub fn is_abnormal(&self) -> bool {
        *self != Self::Normal
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn item_status_round_trip() {
        for (variant, s) in [
            (ItemStatus::Normal, "normal"),
            (ItemStatus::Low, "low"),
            (ItemStatus::High, "high"),
        ] {
            assert_eq!(variant.as_str(), s);
            assert_eq!(ItemStatus::from_str(s).unwrap(), variant);
        }
    }

    #[test]
    fn trend_label_uses_hyphenated_no_trend() {
        assert_eq!(TrendLabel::NoTrend.as_str(), "no-trend");
        assert_eq!(TrendLabel::from_str("no-trend").unwrap(), TrendLabel::NoTrend);
        let json = serde_json::to_string(&TrendLabel::NoTrend).unwrap();
        assert_eq!(json, "\"no-trend\"");
    }

    #[test]
    fn panel_tier_serializes_as_str() {
        let json = serde_json::to_string(&PanelTier::Severe).unwrap();
        assert_eq!(json, "\"severe\"");
        let back: PanelTier = serde_json::from_str("\"unknown\"").unwrap();
        assert_eq!(back, PanelTier::Unknown);
    }

    #[test]
    fn from_range_is_inclusive() {
        assert_eq!(ItemStatus::from_range(125.0, 125.0, 350.0), ItemStatus::Normal);
        assert_eq!(ItemStatus::from_range(350.0, 125.0, 350.0), ItemStatus::Normal);
        assert_eq!(ItemStatus::from_range(124.9, 125.0, 350.0), ItemStatus::Low);
        assert_eq!(ItemStatus::from_range(350.1, 125.0, 350.0), ItemStatus::High);
    }

    #[test]
    fn abnormal_follows_status() {
        assert!(!ItemStatus::Normal.is_abnormal());
        assert!(ItemStatus::Low.is_abnormal());
        assert!(ItemStatus::High.is_abnormal());
    }

    #[test]
    fn display_matches_as_str() {
        assert_eq!(BleedingRisk::Minimal.to_string(), "minimal");
        assert_eq!(OverallStatus::Attention.to_string(), "attention");
    }

    #[test]
    fn invalid_enum_returns_error() {
        assert!(ItemStatus::from_str("abnormal").is_err());
        assert!(TrendLabel::from_str("").is_err());
        assert!(BleedingRisk::from_str("HIGH").is_err());
    }
}
