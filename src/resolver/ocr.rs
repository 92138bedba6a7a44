//! Token-level scan of raw OCR text for known medicine names.
//!
//! Handles the usual scan damage: a leading "8" read for "S", punctuation
//! noise, and names fused to their dose ("Acyclovir800mg"). Two-word names
//! are tried before single words; exact vocabulary hits before similarity.

use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::similarity::best_match;

const DEFAULT_DOSE: &str = "As directed";
const DOSE_CONTEXT_CHARS: usize = 40;
const MIN_TOKEN_LEN: usize = 3;

/// Words that look drug-like to a fuzzy matcher but never are.
const STOPWORDS: &[&str] = &[
    "doctor", "patient", "hospital", "clinic", "date", "morning", "afternoon", "evening",
    "night", "before", "after", "food", "daily", "days", "weeks", "years", "yrs", "male",
    "female", "age", "weight", "height", "address", "report", "result", "normal", "range",
    "medicine", "prescription", "name", "sex", "dr.", "hosp", "med", "total", "count", "value",
];

static RE_LEADING_EIGHT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b8\s*([a-z])").unwrap());
static RE_NOISE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-zA-Z0-9\s/.\-]").unwrap());
static RE_WORD_THEN_DIGITS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([a-zA-Z]{3,})(\d+)").unwrap());
static RE_DIGITS_THEN_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)([a-zA-Z]{2,})").unwrap());
static RE_TOKEN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\S+").unwrap());
static RE_DOSE_STOP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)[\r\n]|\b(?:tab|cap|syp|injection)\b").unwrap());
static RE_GENERIC_DOSE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\d*\.?\d+\s*(?:mg|g|mcg|ml|iu|tab|caps|cap))").unwrap()
});

/// A known medicine found in OCR text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenMatch {
    /// Vocabulary spelling of the medicine.
    pub name: String,
    /// Text as it appeared after cleanup.
    pub matched_text: String,
    pub dose: String,
}

/// Lowercased vocabulary with first-character buckets for similarity search.
struct Vocabulary {
    display: HashMap<String, String>,
    buckets: HashMap<char, Vec<String>>,
}

impl Vocabulary {
    fn new<'a>(names: impl IntoIterator<Item = &'a str>) -> Self {
        let mut display = HashMap::new();
        let mut buckets: HashMap<char, Vec<String>> = HashMap::new();
        for name in names {
            let lower = name.trim().to_lowercase();
            let Some(first) = lower.chars().next() else {
                continue;
            };
            if STOPWORDS.contains(&lower.as_str()) || display.contains_key(&lower) {
                continue;
            }
            display.insert(lower.clone(), name.trim().to_string());
            buckets.entry(first).or_default().push(lower);
        }
        Self { display, buckets }
    }

    fn exact(&self, key: &str) -> Option<&str> {
        self.display.get(key).map(String::as_str)
    }

    fn similar(&self, word: &str, cutoff: f64) -> Option<&str> {
        let first = word.chars().next()?;
        let bucket = self.buckets.get(&first)?;
        let hit = best_match(word, bucket, |s| s.clone(), cutoff)?;
        self.exact(hit)
    }
}

/// Undo common OCR damage before tokenizing.
pub fn clean_ocr_text(text: &str) -> String {
    let text = RE_LEADING_EIGHT.replace_all(text, "S$1");
    let text = RE_NOISE.replace_all(&text, " ");
    let text = RE_WORD_THEN_DIGITS.replace_all(&text, "$1 $2");
    RE_DIGITS_THEN_WORD.replace_all(&text, "$1 $2").into_owned()
}

/// Find known medicines in `text`, one match per medicine, in reading order.
pub fn scan_tokens<'a>(
    text: &str,
    known_names: impl IntoIterator<Item = &'a str>,
    cutoff: f64,
) -> Vec<TokenMatch> {
    let vocab = Vocabulary::new(known_names);
    let clean = clean_ocr_text(text);
    let tokens: Vec<(usize, usize, &str)> = RE_TOKEN
        .find_iter(&clean)
        .map(|m| (m.start(), m.end(), m.as_str()))
        .collect();

    // (vocabulary name, matched text, byte span in `clean`)
    let mut hits: Vec<(String, String, usize, usize)> = Vec::new();
    let mut i = 0;
    while i < tokens.len() {
        let (start, end, word) = tokens[i];
        let lower = word.to_lowercase();
        if lower.chars().count() < MIN_TOKEN_LEN || STOPWORDS.contains(&lower.as_str()) {
            i += 1;
            continue;
        }

        if let Some(&(_, next_end, next)) = tokens.get(i + 1) {
            let pair = format!("{lower} {}", next.to_lowercase());
            if let Some(name) = vocab.exact(&pair) {
                hits.push((name.to_string(), clean[start..next_end].to_string(), start, next_end));
                i += 2;
                continue;
            }
        }

        if let Some(name) = vocab.exact(&lower).or_else(|| vocab.similar(&lower, cutoff)) {
            hits.push((name.to_string(), word.to_string(), start, end));
        } else {
            tracing::trace!(token = word, "OCR token not recognised");
        }
        i += 1;
    }

    let mut seen = HashSet::new();
    let mut matches = Vec::new();
    for (idx, (name, matched_text, _, end)) in hits.iter().enumerate() {
        if !seen.insert(name.clone()) {
            continue;
        }
        // Dose context stops where the next recognised medicine begins.
        let limit = hits.get(idx + 1).map_or(clean.len(), |next| next.2);
        let context = clean.get(*end..limit.max(*end)).unwrap_or("");
        matches.push(TokenMatch {
            name: name.clone(),
            matched_text: matched_text.clone(),
            dose: extract_dose(context),
        });
    }
    matches
}

fn extract_dose(context: &str) -> String {
    let after: String = context.chars().take(DOSE_CONTEXT_CHARS).collect();
    let after = after.trim();
    let part = RE_DOSE_STOP.split(after).next().unwrap_or("").trim();

    if part.chars().any(|c| c.is_ascii_digit()) {
        return part.to_string();
    }
    RE_GENERIC_DOSE
        .captures(after)
        .and_then(|c| c.get(1))
        .map_or_else(|| DEFAULT_DOSE.to_string(), |m| m.as_str().to_string())
}
