use std::path::Path;

use super::types::{KnowledgeError, MedicineDetails};

const BUNDLED_CATALOGUE: &str = include_str!("../../resources/medicine_catalogue.json");
const CATALOGUE_FILE: &str = "medicine_catalogue.json";

/// Larger descriptive table (uses, side effects) used for enrichment display.
#[derive(Debug, Clone)]
pub struct MedicineCatalogue {
    entries: Vec<MedicineDetails>,
}

impl MedicineCatalogue {
    pub fn new(entries: Vec<MedicineDetails>) -> Self {
        Self { entries }
    }

    pub fn bundled() -> Result<Self, KnowledgeError> {
        Self::from_json(BUNDLED_CATALOGUE)
    }

    /// Load `medicine_catalogue.json` from a resources directory.
    pub fn load(resources_dir: &Path) -> Result<Self, KnowledgeError> {
        let path = resources_dir.join(CATALOGUE_FILE);
        let json = std::fs::read_to_string(&path).map_err(|e| {
            KnowledgeError::ReferenceDataLoad(path.display().to_string(), e.to_string())
        })?;
        Self::from_json(&json)
    }

    fn from_json(json: &str) -> Result<Self, KnowledgeError> {
        let entries: Vec<MedicineDetails> = serde_json::from_str(json)
            .map_err(|e| KnowledgeError::ReferenceDataParse(CATALOGUE_FILE.into(), e.to_string()))?;
        Ok(Self::new(entries))
    }

    /// Exact (case-insensitive) match first, then the first entry whose name
    /// contains the query or is contained in it.
    pub fn find(&self, name: &str) -> Option<&MedicineDetails> {
        let query = name.trim().to_lowercase();
        if query.is_empty() {
            return None;
        }
        self.entries
            .iter()
            .find(|e| e.name.to_lowercase() == query)
            .or_else(|| {
                self.entries.iter().find(|e| {
                    let entry = e.name.to_lowercase();
                    query.contains(&entry) || entry.contains(&query)
                })
            })
    }

    /// Like [`find`](Self::find) but always returns something displayable.
    pub fn describe(&self, name: &str) -> MedicineDetails {
        match self.find(name) {
            Some(details) => details.clone(),
            None => {
                tracing::debug!(name, "No catalogue entry for medicine");
                MedicineDetails::not_found(name)
            }
        }
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
