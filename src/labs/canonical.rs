use serde::{Deserialize, Serialize};

use crate::models::enums::BetterDirection;

/// Lab test concept that differently-labelled results are grouped under.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CanonicalTest {
    Glucose,
    HbA1c,
    Cholesterol,
    Creatinine,
    Hemoglobin,
    Tsh,
    /// Unrecognised test, kept under its own trimmed name.
    Other(String),
}

impl CanonicalTest {
    pub fn display_name(&self) -> &str {
        match self {
            Self::Glucose => "Glucose",
            Self::HbA1c => "HbA1c",
            Self::Cholesterol => "Cholesterol",
            Self::Creatinine => "Creatinine",
            Self::Hemoglobin => "Hemoglobin",
            Self::Tsh => "TSH",
            Self::Other(name) => name,
        }
    }

    /// Which direction of change counts as an improvement.
    pub fn direction(&self) -> BetterDirection {
        match self {
            Self::Glucose | Self::HbA1c | Self::Cholesterol | Self::Creatinine | Self::Tsh => {
                BetterDirection::Lower
            }
            Self::Hemoglobin | Self::Other(_) => BetterDirection::Higher,
        }
    }
}

/// Keyword containment on the lowercased raw name. First rule wins, so
/// "Hemoglobin A1c" lands in HbA1c rather than Hemoglobin.
pub fn canonicalize_test_name(raw: &str) -> CanonicalTest {
    let lower = raw.to_lowercase();
    let has = |kw: &str| lower.contains(kw);

    if has("glucose") || has("sugar") {
        CanonicalTest::Glucose
    } else if has("hba1c") || has("a1c") {
        CanonicalTest::HbA1c
    } else if has("cholesterol") {
        CanonicalTest::Cholesterol
    } else if has("creatinine") {
        CanonicalTest::Creatinine
    } else if has("hemoglobin") {
        CanonicalTest::Hemoglobin
    } else if has("tsh") || has("thyroid") {
        CanonicalTest::Tsh
    } else {
        CanonicalTest::Other(raw.trim().to_string())
    }
}

/// Keep digits and dots, then parse. "95 mg/dL" -> 95.0, "6.2%" -> 6.2.
pub fn parse_numeric(value: &str) -> Option<f64> {
    let digits: String = value
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    digits.parse::<f64>().ok()
}
