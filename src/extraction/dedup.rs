use std::collections::HashSet;

use crate::models::enums::DedupPolicy;
use crate::models::MedicationEntry;
use crate::resolver::{NameMatcher, NameResolver};

/// Normalize a dosage string for comparison ("500 Milligrams" == "500mg").
pub fn normalize_dose(dose: &str) -> String {
    dose.to_lowercase()
        .replace(' ', "")
        .replace("milligrams", "mg")
        .replace("micrograms", "mcg")
        .replace("grams", "g")
}

/// Collapse repeated detections of the same medication.
///
/// The key is the canonical name when the entry resolves, otherwise the
/// trimmed raw name, compared case-sensitively. With `KeepFirst` the first
/// entry per key survives and later ones are dropped whatever their dosage.
/// `KeepDistinctDosage` also keys on the normalized dosage. Surviving
/// entries keep their input order and are returned unmodified.
pub fn dedup<M: NameMatcher>(
    entries: Vec<MedicationEntry>,
    resolver: &NameResolver<'_, M>,
    policy: DedupPolicy,
) -> Vec<MedicationEntry> {
    let before = entries.len();
    let mut seen: HashSet<(String, Option<String>)> = HashSet::new();
    let kept: Vec<MedicationEntry> = entries
        .into_iter()
        .filter(|entry| {
            let name = resolver.canonical_or_raw(&entry.name);
            let dose = match policy {
                DedupPolicy::KeepFirst => None,
                DedupPolicy::KeepDistinctDosage => {
                    Some(entry.dosage.as_deref().map(normalize_dose).unwrap_or_default())
                }
            };
            seen.insert((name, dose))
        })
        .collect();

    tracing::debug!(
        policy = policy.as_str(),
        before,
        after = kept.len(),
        "Deduplicated medication entries"
    );
    kept
}
