use crate::models::enums::DocumentKind;
use crate::models::{LabTest, OcrCandidate};

const PLACEHOLDER_NAME: &str = "Pending Review";

/// Route a scan by its raw text: any lab keyword makes it a lab report.
pub fn classify_document<S: AsRef<str>>(raw_text: &str, lab_keywords: &[S]) -> DocumentKind {
    let lower = raw_text.to_lowercase();
    let is_lab = lab_keywords
        .iter()
        .map(|k| k.as_ref().trim().to_lowercase())
        .any(|k| !k.is_empty() && lower.contains(&k));
    if is_lab {
        DocumentKind::LabReport
    } else {
        DocumentKind::Prescription
    }
}

/// Turn OCR name/dose pairs from a lab report into test rows.
///
/// The digits and dots of the dose become the value and the trimmed
/// remainder the unit. A candidate without any dose gets value "0" and unit
/// "unit". When nothing usable was extracted a single placeholder row is
/// returned so the report still reaches manual review.
pub fn lab_tests_from_candidates(candidates: &[OcrCandidate]) -> Vec<LabTest> {
    let rows: Vec<LabTest> = candidates
        .iter()
        .filter(|c| !c.name.trim().is_empty())
        .map(|c| {
            let name = c.name.trim().to_string();
            if c.dose.is_empty() {
                return LabTest {
                    name,
                    value: "0".into(),
                    unit: "unit".into(),
                };
            }
            let value: String = c.dose.chars().filter(|ch| ch.is_ascii_digit() || *ch == '.').collect();
            let unit: String = c.dose.chars().filter(|ch| !ch.is_ascii_digit() && *ch != '.').collect();
            LabTest {
                name,
                value,
                unit: unit.trim().to_string(),
            }
        })
        .collect();

    if rows.is_empty() {
        tracing::debug!("No lab rows extracted, adding placeholder");
        return vec![LabTest {
            name: PLACEHOLDER_NAME.into(),
            value: "0".into(),
            unit: "n/a".into(),
        }];
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LAB_KEYWORDS;

    fn candidate(name: &str, dose: &str) -> OcrCandidate {
        OcrCandidate {
            name: name.into(),
            dose: dose.into(),
        }
    }

    #[test]
    fn lab_keywords_mark_lab_reports() {
        assert_eq!(
            classify_document("FASTING GLUCOSE 98 mg/dL", LAB_KEYWORDS),
            DocumentKind::LabReport
        );
        assert_eq!(
            classify_document("Thyroid panel\nTSH 2.1", LAB_KEYWORDS),
            DocumentKind::LabReport
        );
    }

    #[test]
    fn plain_prescription_stays_prescription() {
        assert_eq!(
            classify_document("Amoxicillin 500mg twice daily", LAB_KEYWORDS),
            DocumentKind::Prescription
        );
        assert_eq!(classify_document("", LAB_KEYWORDS), DocumentKind::Prescription);
    }

    #[test]
    fn blank_keywords_never_match() {
        assert_eq!(
            classify_document("anything", &["", "  "]),
            DocumentKind::Prescription
        );
    }

    #[test]
    fn dose_splits_into_value_and_unit() {
        let rows = lab_tests_from_candidates(&[
            candidate("Glucose", "98 mg/dL"),
            candidate("HbA1c", "6.4%"),
        ]);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].value, "98");
        assert_eq!(rows[0].unit, "mg/dL");
        assert_eq!(rows[1].value, "6.4");
        assert_eq!(rows[1].unit, "%");
    }

    #[test]
    fn missing_dose_gets_defaults() {
        let rows = lab_tests_from_candidates(&[candidate("Creatinine", "")]);
        assert_eq!(rows[0].value, "0");
        assert_eq!(rows[0].unit, "unit");
    }

    #[test]
    fn partial_dose_keeps_empty_parts() {
        let rows = lab_tests_from_candidates(&[candidate("TSH", "2.5"), candidate("Glucose", "pending")]);
        assert_eq!(rows[0].value, "2.5");
        assert_eq!(rows[0].unit, "");
        assert_eq!(rows[1].value, "");
        assert_eq!(rows[1].unit, "pending");
    }

    #[test]
    fn no_candidates_yields_placeholder() {
        let rows = lab_tests_from_candidates(&[]);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].name, "Pending Review");
        assert_eq!(rows[0].value, "0");
        assert_eq!(rows[0].unit, "n/a");

        let rows = lab_tests_from_candidates(&[candidate("  ", "5 mg")]);
        assert_eq!(rows[0].name, "Pending Review");
    }
}
