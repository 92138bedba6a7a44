use serde::{Deserialize, Serialize};

use crate::knowledge::Interaction;
use crate::models::enums::{EdgeDirection, Severity};

/// One known interaction between two medications on the list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConflictRecord {
    pub drug_a: String,
    pub drug_b: String,
    pub severity: Severity,
    pub description: String,
    /// Whether `drug_a`'s own edge or the reciprocal one from `drug_b` matched.
    pub direction: EdgeDirection,
}

impl ConflictRecord {
    pub(crate) fn from_edge(
        drug_a: &str,
        drug_b: &str,
        edge: &Interaction,
        direction: EdgeDirection,
    ) -> Self {
        Self {
            drug_a: drug_a.to_string(),
            drug_b: drug_b.to_string(),
            severity: edge.severity,
            description: edge.description.clone(),
            direction,
        }
    }

    /// True when this record is about the unordered pair {a, b}.
    pub fn involves(&self, a: &str, b: &str) -> bool {
        let (x, y) = (self.drug_a.to_lowercase(), self.drug_b.to_lowercase());
        let (a, b) = (a.to_lowercase(), b.to_lowercase());
        (x == a && y == b) || (x == b && y == a)
    }
}

/// Conflict counts per severity tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ConflictSummary {
    pub high: usize,
    pub moderate: usize,
    pub low: usize,
}

impl ConflictSummary {
    pub fn from_records(records: &[ConflictRecord]) -> Self {
        records.iter().fold(Self::default(), |mut acc, r| {
            match r.severity {
                Severity::High => acc.high += 1,
                Severity::Moderate => acc.moderate += 1,
                Severity::Low => acc.low += 1,
            }
            acc
        })
    }

    pub fn total(&self) -> usize {
        self.high + self.moderate + self.low
    }

    pub fn has_high_risk(&self) -> bool {
        self.high > 0
    }
}

/// High-severity conflicts only, order preserved.
pub fn high_risk(records: &[ConflictRecord]) -> Vec<&ConflictRecord> {
    records
        .iter()
        .filter(|r| r.severity == Severity::High)
        .collect()
}
