use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::enums::Severity;

/// A documented interaction, stored from one drug's point of view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interaction {
    /// Free text, matched case-insensitively against canonical names.
    pub counterpart_drug: String,
    pub severity: Severity,
    pub description: String,
}

/// Canonical drug entry keyed by its (case-insensitive) name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrugRecord {
    pub name: String,
    pub description: String,
    pub category: String,
    #[serde(default)]
    pub interactions: Vec<Interaction>,
}

impl DrugRecord {
    /// Find the stored edge pointing at `other`, if this record has one.
    pub fn interaction_with(&self, other: &str) -> Option<&Interaction> {
        let other = other.trim().to_lowercase();
        self.interactions
            .iter()
            .find(|i| i.counterpart_drug.trim().to_lowercase() == other)
    }
}

/// Descriptive catalogue entry used for enrichment display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MedicineDetails {
    pub name: String,
    pub uses: Vec<String>,
    pub side_effects: Vec<String>,
    pub category: String,
}

impl MedicineDetails {
    /// Placeholder returned when nothing in the catalogue matches.
    pub fn not_found(name: &str) -> Self {
        Self {
            name: name.to_string(),
            uses: vec!["Information not found in database".to_string()],
            side_effects: Vec::new(),
            category: "Unknown".to_string(),
        }
    }
}

#[derive(Error, Debug)]
pub enum KnowledgeError {
    #[error("Reference data load failed ({0}): {1}")]
    ReferenceDataLoad(String, String),

    #[error("Reference data parse failed ({0}): {1}")]
    ReferenceDataParse(String, String),

    #[error("Duplicate drug name in knowledge base: {0}")]
    DuplicateDrug(String),

    #[error("Knowledge base entry with empty name")]
    EmptyDrugName,
}
