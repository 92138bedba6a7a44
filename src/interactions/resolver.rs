use std::collections::HashSet;

use crate::config::MIN_MEDICATION_NAME_LEN;
use crate::knowledge::KnowledgeBase;
use crate::models::enums::{ConflictOrder, EdgeDirection};
use crate::models::MedicationEntry;
use crate::resolver::{ContainmentMatcher, NameMatcher, NameResolver};

use super::types::ConflictRecord;

/// Drop noise tokens and case-insensitive repeats, keeping first-seen casing.
pub fn dedup_names<S: AsRef<str>>(names: &[S], min_len: usize) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for name in names {
        let trimmed = name.as_ref().trim();
        if trimmed.is_empty() || trimmed.chars().count() < min_len {
            tracing::debug!(name = trimmed, "Dropping medication name as noise");
            continue;
        }
        if seen.insert(trimmed.to_lowercase()) {
            out.push(trimmed.to_string());
        }
    }
    out
}

/// Finds known interactions among a set of medication names.
///
/// The knowledge base stores most edges from one side only, so every pair
/// is checked forward (A lists B) and then reciprocally (B lists A). When
/// both edges exist and disagree, the forward one is reported.
#[derive(Debug, Clone)]
pub struct ConflictResolver<'kb, M = ContainmentMatcher> {
    resolver: NameResolver<'kb, M>,
    min_name_len: usize,
    order: ConflictOrder,
}

impl<'kb> ConflictResolver<'kb> {
    pub fn new(kb: &'kb KnowledgeBase) -> Self {
        Self::with_resolver(NameResolver::new(kb))
    }
}

impl<'kb, M: NameMatcher> ConflictResolver<'kb, M> {
    pub fn with_resolver(resolver: NameResolver<'kb, M>) -> Self {
        Self {
            resolver,
            min_name_len: MIN_MEDICATION_NAME_LEN,
            order: ConflictOrder::default(),
        }
    }

    pub fn with_order(mut self, order: ConflictOrder) -> Self {
        self.order = order;
        self
    }

    pub fn with_min_name_len(mut self, min_name_len: usize) -> Self {
        self.min_name_len = min_name_len;
        self
    }

    /// All unique pairwise conflicts. Output follows the i<j pair scan over
    /// the deduplicated input unless severity ordering was requested.
    pub fn find_conflicts<S: AsRef<str>>(&self, names: &[S]) -> Vec<ConflictRecord> {
        let names = dedup_names(names, self.min_name_len);
        let mut seen_pairs: HashSet<(String, String)> = HashSet::new();
        let mut conflicts = Vec::new();

        for (i, a) in names.iter().enumerate() {
            for b in &names[i + 1..] {
                let Some(record) = self.resolve_pair(a, b) else {
                    continue;
                };
                if seen_pairs.insert(pair_key(&record.drug_a, &record.drug_b)) {
                    conflicts.push(record);
                }
            }
        }

        if self.order == ConflictOrder::Severity {
            sort_by_severity(&mut conflicts);
        }

        tracing::debug!(
            medications = names.len(),
            conflicts = conflicts.len(),
            "Conflict scan complete"
        );
        conflicts
    }

    /// Conflicts for medication documents, keyed on their `name` field.
    pub fn conflicts_for_medications(&self, medications: &[MedicationEntry]) -> Vec<ConflictRecord> {
        let names: Vec<&str> = medications.iter().map(|m| m.name.as_str()).collect();
        self.find_conflicts(&names)
    }

    /// Conflict for one unordered pair, forward edge first.
    pub fn resolve_pair(&self, a: &str, b: &str) -> Option<ConflictRecord> {
        let rec_a = self.resolver.resolve(a);
        let rec_b = self.resolver.resolve(b);
        let name_a = rec_a.map_or_else(|| a.trim(), |r| r.name.as_str());
        let name_b = rec_b.map_or_else(|| b.trim(), |r| r.name.as_str());

        if name_a.to_lowercase() == name_b.to_lowercase() {
            return None;
        }

        if let Some(edge) = rec_a.and_then(|r| r.interaction_with(name_b)) {
            return Some(ConflictRecord::from_edge(
                name_a,
                name_b,
                edge,
                EdgeDirection::Forward,
            ));
        }
        rec_b
            .and_then(|r| r.interaction_with(name_a))
            .map(|edge| ConflictRecord::from_edge(name_a, name_b, edge, EdgeDirection::Reciprocal))
    }

    pub(crate) fn min_name_len(&self) -> usize {
        self.min_name_len
    }
}

fn pair_key(a: &str, b: &str) -> (String, String) {
    let (a, b) = (a.to_lowercase(), b.to_lowercase());
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Severity descending, then drug names alphabetically (case-insensitive).
fn sort_by_severity(conflicts: &mut [ConflictRecord]) {
    conflicts.sort_by(|x, y| {
        y.severity
            .cmp(&x.severity)
            .then_with(|| x.drug_a.to_lowercase().cmp(&y.drug_a.to_lowercase()))
            .then_with(|| x.drug_b.to_lowercase().cmp(&y.drug_b.to_lowercase()))
    });
}
