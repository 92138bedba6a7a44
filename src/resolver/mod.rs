//! Name resolution: noisy free text to at most one canonical drug record.
//!
//! Matching is a heuristic and sits behind [`NameMatcher`] so it can be
//! replaced without touching conflict or trend logic. Resolution order:
//! normalize (trim + lowercase), exact canonical match, then the matcher.
//!
//! The default [`ContainmentMatcher`] returns the first record, in knowledge
//! base order, whose name contains the input or is contained in it. When a
//! short token matches several drugs the earliest one wins. That keeps
//! results reproducible at the cost of precision.

pub mod ocr;
pub mod similarity;

use crate::knowledge::{DrugRecord, KnowledgeBase};

pub use ocr::{scan_tokens, TokenMatch};
pub use similarity::SimilarityMatcher;

/// Fallback strategy applied after exact lookup fails.
pub trait NameMatcher {
    /// `normalized` is already trimmed, lowercased and non-empty.
    fn find<'kb>(&self, normalized: &str, kb: &'kb KnowledgeBase) -> Option<&'kb DrugRecord>;
}

/// Substring containment in either direction, first record wins.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContainmentMatcher;

impl NameMatcher for ContainmentMatcher {
    fn find<'kb>(&self, normalized: &str, kb: &'kb KnowledgeBase) -> Option<&'kb DrugRecord> {
        kb.records().iter().find(|rec| {
            let canonical = rec.name.to_lowercase();
            canonical.contains(normalized) || normalized.contains(&canonical)
        })
    }
}

/// Lowercase and trim, the normal form every lookup key uses.
pub fn normalize_name(input: &str) -> String {
    input.trim().to_lowercase()
}

/// Resolves arbitrary input against a borrowed knowledge base.
#[derive(Debug, Clone)]
pub struct NameResolver<'kb, M = ContainmentMatcher> {
    kb: &'kb KnowledgeBase,
    matcher: M,
}

impl<'kb> NameResolver<'kb> {
    pub fn new(kb: &'kb KnowledgeBase) -> Self {
        Self {
            kb,
            matcher: ContainmentMatcher,
        }
    }
}

impl<'kb, M: NameMatcher> NameResolver<'kb, M> {
    pub fn with_matcher(kb: &'kb KnowledgeBase, matcher: M) -> Self {
        Self { kb, matcher }
    }

    pub fn knowledge(&self) -> &'kb KnowledgeBase {
        self.kb
    }

    /// Best-matching record, or `None` when nothing matches.
    /// Empty or whitespace-only input never matches.
    pub fn resolve(&self, input: &str) -> Option<&'kb DrugRecord> {
        let normalized = normalize_name(input);
        if normalized.is_empty() {
            return None;
        }
        if let Some(rec) = self.kb.lookup(&normalized) {
            return Some(rec);
        }
        self.matcher.find(&normalized, self.kb)
    }

    /// Canonical name when the input resolves, otherwise the trimmed input.
    pub fn canonical_or_raw(&self, input: &str) -> String {
        match self.resolve(input) {
            Some(rec) => rec.name.clone(),
            None => input.trim().to_string(),
        }
    }
}
