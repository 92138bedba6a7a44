//! Turning noisy extraction output into clean medication and lab entries.

pub mod dedup;
pub mod documents;
pub mod prescription;

pub use dedup::{dedup, normalize_dose};
pub use documents::{classify_document, lab_tests_from_candidates};
pub use prescription::{parse_prescription_text, pending_prescription_entry};
