use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid value for {field}: {value}")]
pub struct InvalidEnum {
    pub field: String,
    pub value: String,
}

/// Macro to generate enum with as_str + std::str::FromStr pattern
macro_rules! str_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = InvalidEnum;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(InvalidEnum {
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

str_enum!(
    /// Ordinal risk tier of an interaction. Declared low-to-high so `Ord` ranks risk.
    #[derive(PartialOrd, Ord)]
    Severity {
        Low => "low",
        Moderate => "moderate",
        High => "high",
    }
);

str_enum!(Trend {
    Improved => "improved",
    Degraded => "degraded",
    Stable => "stable",
});

str_enum!(BetterDirection {
    Lower => "lower",
    Higher => "higher",
});

str_enum!(
    /// Which stored edge of an interaction pair produced a conflict.
    EdgeDirection {
        Forward => "forward",
        Reciprocal => "reciprocal",
    }
);

str_enum!(DedupPolicy {
    KeepFirst => "keep_first",
    KeepDistinctDosage => "keep_distinct_dosage",
});

str_enum!(ConflictOrder {
    Input => "input",
    Severity => "severity",
});

str_enum!(DocumentKind {
    Prescription => "prescription",
    LabReport => "lab_report",
});

impl Default for DedupPolicy {
    fn default() -> Self {
        Self::KeepFirst
    }
}

impl Default for ConflictOrder {
    fn default() -> Self {
        Self::Input
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn severity_round_trips_through_str() {
        for s in ["high", "moderate", "low"] {
            assert_eq!(Severity::from_str(s).unwrap().as_str(), s);
        }
    }

    #[test]
    fn severity_ordering_ranks_risk() {
        assert!(Severity::High > Severity::Moderate);
        assert!(Severity::Moderate > Severity::Low);
    }

    #[test]
    fn unknown_value_is_rejected() {
        let err = Severity::from_str("critical").unwrap_err();
        assert_eq!(err.field, "Severity");
        assert_eq!(err.value, "critical");
    }

    #[test]
    fn serde_uses_snake_case() {
        assert_eq!(serde_json::to_string(&Trend::Improved).unwrap(), "\"improved\"");
        assert_eq!(
            serde_json::to_string(&DedupPolicy::KeepDistinctDosage).unwrap(),
            "\"keep_distinct_dosage\""
        );
        let parsed: Severity = serde_json::from_str("\"moderate\"").unwrap();
        assert_eq!(parsed, Severity::Moderate);
    }

    #[test]
    fn defaults() {
        assert_eq!(DedupPolicy::default(), DedupPolicy::KeepFirst);
        assert_eq!(ConflictOrder::default(), ConflictOrder::Input);
    }
}
