use std::sync::LazyLock;

use regex::Regex;
use uuid::Uuid;

use crate::config::EngineConfig;
use crate::models::MedicationEntry;
use crate::resolver::{NameMatcher, NameResolver};

use super::dedup::dedup;

const DEFAULT_FREQUENCY: &str = "As directed";
const PENDING_NAME: &str = "New Prescription Entry";
const PENDING_DETAIL: &str = "See image";
const PENDING_CATEGORY: &str = "Manual Review";
const PENDING_DESCRIPTION_CHARS: usize = 500;

static RE_DOSAGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\d+\s*(?:mg|g|mcg|ml|iu)").unwrap());
static RE_FREQUENCY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:once|twice|thrice|daily|bid|tid|od|q\d+h|1-0-1|0-1-0|1-1-1)\b").unwrap()
});

/// Extract medication entries from the raw text of a prescription scan.
///
/// Each line is one candidate. Header lines (doctor, clinic, patient
/// demographics) are skipped by keyword. A line is kept when it carries a
/// dosage or resolves to a known drug; resolved lines take the canonical
/// name and its description and category. Output is deduplicated with the
/// configured policy.
pub fn parse_prescription_text<M: NameMatcher>(
    text: &str,
    resolver: &NameResolver<'_, M>,
    config: &EngineConfig,
) -> Vec<MedicationEntry> {
    let header_keywords: Vec<String> = config
        .header_keywords
        .iter()
        .map(|k| k.to_lowercase())
        .collect();

    let mut entries = Vec::new();
    for line in text.lines().map(str::trim) {
        if line.chars().count() <= 3 {
            continue;
        }
        let lower = line.to_lowercase();
        if header_keywords.iter().any(|k| lower.contains(k.as_str())) {
            tracing::trace!(line, "Skipping prescription header line");
            continue;
        }

        let dosage = RE_DOSAGE.find(line);
        let record = resolver.resolve(line);

        let raw_name = match (record, dosage) {
            (Some(rec), _) => rec.name.as_str(),
            (None, Some(m)) => &line[..m.start()],
            (None, None) => continue,
        };
        let name = letters_only(raw_name);
        if name.chars().count() < config.min_name_len {
            tracing::trace!(line, "Prescription line has no usable name");
            continue;
        }

        let dosage = dosage.map(|m| m.as_str().to_string());
        let frequency = RE_FREQUENCY
            .find(line)
            .map_or(DEFAULT_FREQUENCY, |m| m.as_str());

        entries.push(MedicationEntry {
            id: Some(entry_id(&name, dosage.as_deref())),
            name,
            dosage,
            frequency: Some(frequency.to_string()),
            description: record.map(|r| r.description.clone()),
            category: record.map(|r| r.category.clone()),
        });
    }

    let found = entries.len();
    let entries = dedup(entries, resolver, config.dedup_policy);
    tracing::debug!(found, kept = entries.len(), "Parsed prescription text");
    entries
}

/// Placeholder for a scan that produced text but no recognisable medication,
/// so the raw text still reaches manual review. Blank text gives `None`.
pub fn pending_prescription_entry(raw_text: &str) -> Option<MedicationEntry> {
    if raw_text.trim().is_empty() {
        return None;
    }
    let mut description: String = raw_text.chars().take(PENDING_DESCRIPTION_CHARS).collect();
    if raw_text.chars().count() > PENDING_DESCRIPTION_CHARS {
        description.push_str("...");
    }
    Some(MedicationEntry {
        id: None,
        name: PENDING_NAME.into(),
        dosage: Some(PENDING_DETAIL.into()),
        frequency: Some(PENDING_DETAIL.into()),
        description: Some(description),
        category: Some(PENDING_CATEGORY.into()),
    })
}

fn letters_only(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_alphabetic() || c.is_whitespace())
        .collect::<String>()
        .trim()
        .to_string()
}

/// Stable id so re-scanning the same prescription yields the same entries.
fn entry_id(name: &str, dosage: Option<&str>) -> Uuid {
    let key = format!("{}|{}", name.to_lowercase(), dosage.unwrap_or_default());
    Uuid::new_v5(&Uuid::NAMESPACE_OID, key.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::knowledge::KnowledgeBase;
    use crate::models::enums::DedupPolicy;

    const SCAN: &str = "\
City Care Clinic
Dr. A. Mehta
Date: 05/01/2026
Warfarin 5mg once daily
Aspirin 81 mg OD
Paracetamol 500mg twice
Take with food

Warfarin 2mg 1-0-1
12
";

    fn parse(text: &str, config: &EngineConfig) -> Vec<MedicationEntry> {
        let kb = KnowledgeBase::load_test();
        let resolver = NameResolver::new(&kb);
        parse_prescription_text(text, &resolver, config)
    }

    #[test]
    fn parses_typical_scan() {
        let meds = parse(SCAN, &EngineConfig::default());
        let names: Vec<&str> = meds.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["Warfarin", "Aspirin", "Paracetamol"]);

        assert_eq!(meds[0].dosage.as_deref(), Some("5mg"));
        assert_eq!(meds[0].frequency.as_deref(), Some("once"));
        assert_eq!(meds[1].dosage.as_deref(), Some("81 mg"));
        assert_eq!(meds[1].frequency.as_deref(), Some("OD"));
        assert_eq!(meds[2].frequency.as_deref(), Some("twice"));
    }

    #[test]
    fn resolved_entries_are_enriched() {
        let meds = parse(SCAN, &EngineConfig::default());
        assert_eq!(meds[0].category.as_deref(), Some("Anticoagulant"));
        assert_eq!(meds[0].description.as_deref(), Some("Warfarin test record."));
        // Paracetamol is not in the knowledge base.
        assert!(meds[2].category.is_none());
        assert!(meds[2].description.is_none());
    }

    #[test]
    fn missing_frequency_defaults_to_as_directed() {
        let meds = parse("Amoxicillin 250mg", &EngineConfig::default());
        assert_eq!(meds.len(), 1);
        assert_eq!(meds[0].frequency.as_deref(), Some("As directed"));
    }

    #[test]
    fn known_drug_without_dosage_is_kept() {
        let meds = parse("metformin after meals", &EngineConfig::default());
        assert_eq!(meds.len(), 1);
        assert_eq!(meds[0].name, "Metformin");
        assert!(meds[0].dosage.is_none());
    }

    #[test]
    fn frequency_needs_whole_word() {
        // "food" must not read as "od"
        let meds = parse("Paracetamol 500mg with food", &EngineConfig::default());
        assert_eq!(meds[0].frequency.as_deref(), Some("As directed"));
    }

    #[test]
    fn unresolved_name_is_stripped_to_letters() {
        let meds = parse("Vit-D3 1000 IU weekly", &EngineConfig::default());
        assert_eq!(meds.len(), 1);
        assert_eq!(meds[0].name, "VitD");
        assert_eq!(meds[0].dosage.as_deref(), Some("1000 IU"));
    }

    #[test]
    fn short_or_empty_names_are_dropped() {
        assert!(parse("B12 500mcg", &EngineConfig::default()).is_empty());
        assert!(parse("500mg tablets", &EngineConfig::default()).is_empty());
    }

    #[test]
    fn header_lines_are_skipped_even_with_drug_names() {
        assert!(parse("Rx: Warfarin 5mg", &EngineConfig::default()).is_empty());
        assert!(parse("Patient: R. Das, Age 61", &EngineConfig::default()).is_empty());
    }

    #[test]
    fn empty_and_noise_only_text() {
        assert!(parse("", &EngineConfig::default()).is_empty());
        assert!(parse("\n\n  \nab\n", &EngineConfig::default()).is_empty());
        assert!(parse("Take with food", &EngineConfig::default()).is_empty());
    }

    #[test]
    fn distinct_dosage_policy_keeps_both_warfarin_lines() {
        let config = EngineConfig {
            dedup_policy: DedupPolicy::KeepDistinctDosage,
            ..EngineConfig::default()
        };
        let meds = parse(SCAN, &config);
        let warfarin: Vec<_> = meds.iter().filter(|m| m.name == "Warfarin").collect();
        assert_eq!(warfarin.len(), 2);
        assert_ne!(warfarin[0].id, warfarin[1].id);
    }

    #[test]
    fn pending_entry_carries_raw_text() {
        let entry = pending_prescription_entry("Take with food\nSee overleaf").unwrap();
        assert_eq!(entry.name, "New Prescription Entry");
        assert_eq!(entry.dosage.as_deref(), Some("See image"));
        assert_eq!(entry.frequency.as_deref(), Some("See image"));
        assert_eq!(entry.category.as_deref(), Some("Manual Review"));
        assert_eq!(entry.description.as_deref(), Some("Take with food\nSee overleaf"));
    }

    #[test]
    fn pending_entry_truncates_long_text() {
        let raw = "x".repeat(501);
        let description = pending_prescription_entry(&raw).unwrap().description.unwrap();
        assert_eq!(description, format!("{}...", "x".repeat(500)));

        let exact = "y".repeat(500);
        let description = pending_prescription_entry(&exact).unwrap().description.unwrap();
        assert_eq!(description, exact);
    }

    #[test]
    fn blank_text_has_no_pending_entry() {
        assert!(pending_prescription_entry("").is_none());
        assert!(pending_prescription_entry(" \n\t ").is_none());
    }

    #[test]
    fn ids_are_stable_across_scans() {
        let first = parse(SCAN, &EngineConfig::default());
        let second = parse(SCAN, &EngineConfig::default());
        let ids = |meds: &[MedicationEntry]| meds.iter().map(|m| m.id).collect::<Vec<_>>();
        assert_eq!(ids(&first), ids(&second));
        assert!(first.iter().all(|m| m.id.is_some()));
    }
}
