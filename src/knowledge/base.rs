use std::collections::HashMap;
use std::path::Path;

use super::types::{DrugRecord, KnowledgeError};

const BUNDLED_INTERACTIONS: &str = include_str!("../../resources/drug_interactions.json");
const INTERACTIONS_FILE: &str = "drug_interactions.json";

/// Closed set of known drugs with their interaction edges.
///
/// Records keep insertion order; that order is the stable iteration order
/// every containment-style lookup relies on for reproducible results.
#[derive(Debug, Clone)]
pub struct KnowledgeBase {
    records: Vec<DrugRecord>,
    index: HashMap<String, usize>,
}

impl KnowledgeBase {
    /// Build from records, rejecting empty or case-insensitively duplicated names.
    pub fn from_records(records: Vec<DrugRecord>) -> Result<Self, KnowledgeError> {
        let mut index = HashMap::with_capacity(records.len());
        for (pos, rec) in records.iter().enumerate() {
            let key = rec.name.trim().to_lowercase();
            if key.is_empty() {
                return Err(KnowledgeError::EmptyDrugName);
            }
            if index.insert(key, pos).is_some() {
                return Err(KnowledgeError::DuplicateDrug(rec.name.clone()));
            }
        }
        Ok(Self { records, index })
    }

    /// The interaction table shipped with the crate.
    pub fn bundled() -> Result<Self, KnowledgeError> {
        Self::from_json(BUNDLED_INTERACTIONS, INTERACTIONS_FILE)
    }

    /// Load `drug_interactions.json` from a resources directory.
    pub fn load(resources_dir: &Path) -> Result<Self, KnowledgeError> {
        let path = resources_dir.join(INTERACTIONS_FILE);
        let json = std::fs::read_to_string(&path).map_err(|e| {
            KnowledgeError::ReferenceDataLoad(path.display().to_string(), e.to_string())
        })?;
        Self::from_json(&json, INTERACTIONS_FILE)
    }

    fn from_json(json: &str, source: &str) -> Result<Self, KnowledgeError> {
        let records: Vec<DrugRecord> = serde_json::from_str(json)
            .map_err(|e| KnowledgeError::ReferenceDataParse(source.into(), e.to_string()))?;
        let kb = Self::from_records(records)?;
        tracing::debug!(drugs = kb.len(), source, "Knowledge base loaded");
        Ok(kb)
    }

    /// Case-insensitive exact lookup on the canonical name.
    /// Absence means "no structured data", never an error.
    pub fn lookup(&self, name: &str) -> Option<&DrugRecord> {
        let key = name.trim().to_lowercase();
        self.index.get(&key).map(|&pos| &self.records[pos])
    }

    pub fn records(&self) -> &[DrugRecord] {
        &self.records
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.records.iter().map(|r| r.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Small fixture with deliberately one-directional and conflicting edges.
    #[cfg(test)]
    pub(crate) fn load_test() -> Self {
        use super::types::Interaction;
        use crate::models::enums::Severity;

        fn edge(drug: &str, severity: Severity, description: &str) -> Interaction {
            Interaction {
                counterpart_drug: drug.into(),
                severity,
                description: description.into(),
            }
        }
        fn drug(name: &str, category: &str, interactions: Vec<Interaction>) -> DrugRecord {
            DrugRecord {
                name: name.into(),
                description: format!("{name} test record."),
                category: category.into(),
                interactions,
            }
        }

        let records = vec![
            drug(
                "Warfarin",
                "Anticoagulant",
                vec![
                    edge("Aspirin", Severity::High, "Major bleeding risk."),
                    edge("Ibuprofen", Severity::Moderate, "Bleeding risk (warfarin view)."),
                ],
            ),
            // Aspirin stores no edge back to Warfarin.
            drug("Aspirin", "Antiplatelet", vec![]),
            drug("Metformin", "Antidiabetic", vec![]),
            drug(
                "Lisinopril",
                "Cardiovascular",
                vec![edge("Metformin", Severity::Low, "Monitor renal function.")],
            ),
            drug(
                "Ibuprofen",
                "Pain Relief",
                vec![edge("Warfarin", Severity::High, "Bleeding risk (ibuprofen view).")],
            ),
            drug(
                "Atorvastatin",
                "Statin",
                vec![edge("Clarithromycin", Severity::High, "Rhabdomyolysis risk.")],
            ),
            drug("Amoxicillin", "Antibiotic", vec![]),
        ];
        match Self::from_records(records) {
            Ok(kb) => kb,
            Err(e) => panic!("test fixture invalid: {e}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::enums::Severity;

    #[test]
    fn bundled_table_parses() {
        let kb = KnowledgeBase::bundled().unwrap();
        assert_eq!(kb.len(), 7);
        let warfarin = kb.lookup("Warfarin").unwrap();
        assert_eq!(warfarin.category, "Anticoagulant");
        assert_eq!(warfarin.interaction_with("aspirin").unwrap().severity, Severity::High);
    }

    #[test]
    fn lookup_is_case_insensitive_exact() {
        let kb = KnowledgeBase::load_test();
        for rec in kb.records() {
            assert_eq!(kb.lookup(&rec.name.to_uppercase()).unwrap().name, rec.name);
            assert_eq!(kb.lookup(&rec.name.to_lowercase()).unwrap().name, rec.name);
        }
    }

    #[test]
    fn lookup_does_not_do_substring_matching() {
        let kb = KnowledgeBase::load_test();
        assert!(kb.lookup("warf").is_none());
        assert!(kb.lookup("Warfarin 5mg").is_none());
    }

    #[test]
    fn lookup_unknown_is_none() {
        let kb = KnowledgeBase::load_test();
        assert!(kb.lookup("Levothyroxine").is_none());
        assert!(kb.lookup("").is_none());
    }

    #[test]
    fn duplicate_names_rejected() {
        let mut records = KnowledgeBase::load_test().records().to_vec();
        let mut dup = records[0].clone();
        dup.name = "WARFARIN".into();
        records.push(dup);
        let err = KnowledgeBase::from_records(records).unwrap_err();
        assert!(matches!(err, KnowledgeError::DuplicateDrug(name) if name == "WARFARIN"));
    }

    #[test]
    fn empty_name_rejected() {
        let mut records = KnowledgeBase::load_test().records().to_vec();
        records[0].name = "  ".into();
        assert!(matches!(
            KnowledgeBase::from_records(records),
            Err(KnowledgeError::EmptyDrugName)
        ));
    }

    #[test]
    fn load_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(INTERACTIONS_FILE), BUNDLED_INTERACTIONS).unwrap();
        let kb = KnowledgeBase::load(dir.path()).unwrap();
        assert_eq!(kb.len(), 7);
    }

    #[test]
    fn load_missing_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let err = KnowledgeBase::load(dir.path()).unwrap_err();
        match err {
            KnowledgeError::ReferenceDataLoad(path, _) => {
                assert!(path.ends_with(INTERACTIONS_FILE))
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn load_malformed_file_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(INTERACTIONS_FILE), "[{\"name\": 1}]").unwrap();
        assert!(matches!(
            KnowledgeBase::load(dir.path()),
            Err(KnowledgeError::ReferenceDataParse(..))
        ));
    }

    #[test]
    fn names_follow_insertion_order() {
        let kb = KnowledgeBase::load_test();
        let names: Vec<&str> = kb.names().take(3).collect();
        assert_eq!(names, vec!["Warfarin", "Aspirin", "Metformin"]);
    }
}
