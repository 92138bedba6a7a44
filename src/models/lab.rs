use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single test row as stored inside a lab report document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabTest {
    pub name: String,
    pub value: String,
    #[serde(default)]
    pub unit: String,
}

/// Lab report document snapshot from the document store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabReport {
    pub id: Uuid,
    pub date: NaiveDateTime,
    #[serde(default)]
    pub tests: Vec<LabTest>,
}

/// One measurement with the date of the report it came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabTestResult {
    pub raw_name: String,
    pub value: String,
    pub unit: String,
    pub report_date: NaiveDateTime,
    pub report_id: Uuid,
}

impl LabTestResult {
    /// Value as shown to the patient, e.g. "95 mg/dL".
    /// The unit is appended only when the raw value does not already carry it.
    pub fn display_value(&self) -> String {
        let value = self.value.trim();
        let unit = self.unit.trim();
        if unit.is_empty() || value.contains(unit) {
            value.to_string()
        } else {
            format!("{value} {unit}")
        }
    }
}

impl LabReport {
    /// Flatten the report into dated results.
    pub fn results(&self) -> impl Iterator<Item = LabTestResult> + '_ {
        self.tests.iter().map(move |t| LabTestResult {
            raw_name: t.name.clone(),
            value: t.value.clone(),
            unit: t.unit.clone(),
            report_date: self.date,
            report_id: self.id,
        })
    }
}
