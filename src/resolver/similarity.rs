//! Edit-distance matching for OCR-garbled names ("Metfonnin" for "Metformin").

use crate::config::DEFAULT_FUZZY_CUTOFF;
use crate::knowledge::{DrugRecord, KnowledgeBase};

use super::NameMatcher;

/// Accepts the closest canonical name whose similarity ratio reaches `cutoff`.
/// Equal ratios resolve to the earlier record.
#[derive(Debug, Clone, Copy)]
pub struct SimilarityMatcher {
    pub cutoff: f64,
}

impl Default for SimilarityMatcher {
    fn default() -> Self {
        Self {
            cutoff: DEFAULT_FUZZY_CUTOFF,
        }
    }
}

impl NameMatcher for SimilarityMatcher {
    fn find<'kb>(&self, normalized: &str, kb: &'kb KnowledgeBase) -> Option<&'kb DrugRecord> {
        best_match(normalized, kb.records(), |r| r.name.to_lowercase(), self.cutoff)
    }
}

/// Pick the candidate with the highest ratio at or above `cutoff`.
pub(crate) fn best_match<'a, T>(
    query: &str,
    candidates: &'a [T],
    key: impl Fn(&T) -> String,
    cutoff: f64,
) -> Option<&'a T> {
    let mut best: Option<(&T, f64)> = None;
    for candidate in candidates {
        let ratio = similarity_ratio(query, &key(candidate));
        if ratio < cutoff {
            continue;
        }
        match best {
            Some((_, best_ratio)) if ratio <= best_ratio => {}
            _ => best = Some((candidate, ratio)),
        }
    }
    best.map(|(c, _)| c)
}

/// `1 - distance / longer length`; 1.0 for identical strings.
pub fn similarity_ratio(a: &str, b: &str) -> f64 {
    let longest = a.chars().count().max(b.chars().count());
    if longest == 0 {
        return 1.0;
    }
    1.0 - f64::from(edit_distance(a, b)) / longest as f64
}

/// Compute Levenshtein edit distance between two strings.
pub fn edit_distance(a: &str, b: &str) -> u32 {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();
    let m = a_chars.len();
    let n = b_chars.len();

    if m == 0 {
        return n as u32;
    }
    if n == 0 {
        return m as u32;
    }

    let mut prev: Vec<u32> = (0..=n as u32).collect();
    let mut curr = vec![0u32; n + 1];

    for (i, &a_ch) in a_chars.iter().enumerate() {
        curr[0] = (i + 1) as u32;
        for (j, &b_ch) in b_chars.iter().enumerate() {
            let cost = u32::from(a_ch != b_ch);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[n]
}
