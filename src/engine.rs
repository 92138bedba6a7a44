use std::path::Path;

use crate::config::EngineConfig;
use crate::extraction::{
    self, classify_document, lab_tests_from_candidates, parse_prescription_text,
    pending_prescription_entry,
};
use crate::interactions::{ConflictRecord, ConflictResolver, ConflictSummary, InteractionMatrix};
use crate::knowledge::{DrugRecord, KnowledgeBase, KnowledgeError, MedicineCatalogue, MedicineDetails};
use crate::labs::{self, TrendResult};
use crate::models::enums::DocumentKind;
use crate::models::{LabReport, LabTest, MedicationEntry, OcrCandidate};
use crate::resolver::{scan_tokens, NameResolver, TokenMatch};

/// Entry point for callers: owns the reference tables and configuration
/// and exposes every operation through `&self`.
///
/// Holds no interior mutability, so one instance can be shared across
/// threads behind an `Arc`.
#[derive(Debug, Clone)]
pub struct InteractionEngine {
    knowledge: KnowledgeBase,
    catalogue: MedicineCatalogue,
    config: EngineConfig,
}

impl InteractionEngine {
    pub fn new(knowledge: KnowledgeBase, catalogue: MedicineCatalogue, config: EngineConfig) -> Self {
        tracing::info!(
            drugs = knowledge.len(),
            catalogue = catalogue.len(),
            "Interaction engine ready"
        );
        Self {
            knowledge,
            catalogue,
            config,
        }
    }

    /// Engine over the bundled reference data with default configuration.
    pub fn bundled() -> Result<Self, KnowledgeError> {
        Ok(Self::new(
            KnowledgeBase::bundled()?,
            MedicineCatalogue::bundled()?,
            EngineConfig::default(),
        ))
    }

    /// Engine over reference data read from `resources_dir`.
    pub fn load(resources_dir: &Path, config: EngineConfig) -> Result<Self, KnowledgeError> {
        Ok(Self::new(
            KnowledgeBase::load(resources_dir)?,
            MedicineCatalogue::load(resources_dir)?,
            config,
        ))
    }

    pub fn knowledge(&self) -> &KnowledgeBase {
        &self.knowledge
    }

    pub fn catalogue(&self) -> &MedicineCatalogue {
        &self.catalogue
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    fn resolver(&self) -> NameResolver<'_> {
        NameResolver::new(&self.knowledge)
    }

    fn conflict_resolver(&self) -> ConflictResolver<'_> {
        ConflictResolver::new(&self.knowledge)
            .with_order(self.config.conflict_order)
            .with_min_name_len(self.config.min_name_len)
    }

    /// Exact case-insensitive lookup by canonical name.
    pub fn lookup(&self, name: &str) -> Option<&DrugRecord> {
        self.knowledge.lookup(name)
    }

    /// Free-text resolution: exact match first, then containment.
    pub fn resolve(&self, input: &str) -> Option<&DrugRecord> {
        let record = self.resolver().resolve(input);
        tracing::debug!(
            input,
            resolved = record.map(|r| r.name.as_str()),
            "Resolved medication name"
        );
        record
    }

    /// Patient-facing description, with a placeholder for unknown names.
    pub fn describe(&self, name: &str) -> MedicineDetails {
        self.catalogue.describe(name)
    }

    pub fn find_conflicts<S: AsRef<str>>(&self, names: &[S]) -> Vec<ConflictRecord> {
        let conflicts = self.conflict_resolver().find_conflicts(names);
        log_conflicts(names.len(), &conflicts);
        conflicts
    }

    pub fn conflicts_for_medications(&self, medications: &[MedicationEntry]) -> Vec<ConflictRecord> {
        let conflicts = self.conflict_resolver().conflicts_for_medications(medications);
        log_conflicts(medications.len(), &conflicts);
        conflicts
    }

    pub fn interaction_matrix<S: AsRef<str>>(&self, names: &[S]) -> InteractionMatrix {
        let matrix = self.conflict_resolver().interaction_matrix(names);
        tracing::debug!(size = matrix.names.len(), "Built interaction matrix");
        matrix
    }

    pub fn analyze_trends(&self, reports: &[LabReport]) -> Vec<TrendResult> {
        let trends = labs::analyze_trends(reports);
        tracing::info!(
            reports = reports.len(),
            tests = trends.len(),
            "Lab trends computed"
        );
        trends
    }

    /// Collapse repeated entries with the configured policy.
    pub fn dedup(&self, entries: Vec<MedicationEntry>) -> Vec<MedicationEntry> {
        extraction::dedup(entries, &self.resolver(), self.config.dedup_policy)
    }

    /// Structured entries from a prescription scan. When no line yields a
    /// medication but the scan has text, a single manual-review entry is
    /// returned instead.
    pub fn parse_prescription(&self, text: &str) -> Vec<MedicationEntry> {
        let entries = parse_prescription_text(text, &self.resolver(), &self.config);
        if entries.is_empty() {
            let pending: Vec<MedicationEntry> = pending_prescription_entry(text).into_iter().collect();
            tracing::info!(pending = pending.len(), "Prescription needs manual review");
            return pending;
        }
        tracing::info!(medications = entries.len(), "Prescription parsed");
        entries
    }

    /// Scan raw OCR text against both the interaction table and the catalogue.
    pub fn scan_ocr_text(&self, text: &str) -> Vec<TokenMatch> {
        let names = self.knowledge.names().chain(self.catalogue.names());
        let matches = scan_tokens(text, names, self.config.fuzzy_cutoff);
        tracing::info!(matches = matches.len(), "OCR text scanned");
        matches
    }

    pub fn classify(&self, raw_text: &str) -> DocumentKind {
        let kind = classify_document(raw_text, &self.config.lab_keywords);
        tracing::debug!(kind = kind.as_str(), "Classified scanned document");
        kind
    }

    pub fn lab_tests(&self, candidates: &[OcrCandidate]) -> Vec<LabTest> {
        lab_tests_from_candidates(candidates)
    }
}

fn log_conflicts(medications: usize, conflicts: &[ConflictRecord]) {
    let summary = ConflictSummary::from_records(conflicts);
    tracing::info!(
        medications,
        conflicts = summary.total(),
        high = summary.high,
        "Conflict check complete"
    );
}
