use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::enums::{ConflictOrder, DedupPolicy};

/// Application-level constants
pub const APP_NAME: &str = "MedInsight";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Names shorter than this are OCR noise, never medications.
pub const MIN_MEDICATION_NAME_LEN: usize = 3;

/// Similarity ratio an OCR token needs to be accepted as a known drug.
pub const DEFAULT_FUZZY_CUTOFF: f64 = 0.82;

/// Provider/header noise on prescription scans (doctor, clinic, demographics).
pub const HEADER_KEYWORDS: &[&str] = &[
    "dr.", "hospital", "clinic", "date", "rx", "patient", "age", "sex",
];

/// Raw-text keywords that mark a scanned document as a lab report.
pub const LAB_KEYWORDS: &[&str] = &[
    "glucose",
    "hba1c",
    "cholesterol",
    "tsh",
    "creatinine",
    "hemoglobin",
    "blood",
    "report",
    "lab",
    "test",
];

/// Default tracing filter when RUST_LOG is unset.
pub fn default_log_filter() -> &'static str {
    "medinsight_lib=info"
}

/// Per-user engine config location (`<config dir>/medinsight/engine.json`).
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("medinsight").join("engine.json"))
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config load failed ({0}): {1}")]
    Load(String, String),

    #[error("Config parse failed ({0}): {1}")]
    Parse(String, String),
}

/// Tunables for the resolution engine. Every field has a default, so a
/// partial JSON file only overrides what it names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub min_name_len: usize,
    pub header_keywords: Vec<String>,
    pub lab_keywords: Vec<String>,
    pub dedup_policy: DedupPolicy,
    pub conflict_order: ConflictOrder,
    pub fuzzy_cutoff: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            min_name_len: MIN_MEDICATION_NAME_LEN,
            header_keywords: HEADER_KEYWORDS.iter().map(|s| s.to_string()).collect(),
            lab_keywords: LAB_KEYWORDS.iter().map(|s| s.to_string()).collect(),
            dedup_policy: DedupPolicy::default(),
            conflict_order: ConflictOrder::default(),
            fuzzy_cutoff: DEFAULT_FUZZY_CUTOFF,
        }
    }
}

impl EngineConfig {
    /// Read a JSON config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Load(path.display().to_string(), e.to_string()))?;
        serde_json::from_str(&json)
            .map_err(|e| ConfigError::Parse(path.display().to_string(), e.to_string()))
    }

    /// Load from the per-user location, falling back to defaults when the
    /// file is missing. A present but malformed file is still an error.
    pub fn load_or_default() -> Result<Self, ConfigError> {
        match default_config_path() {
            Some(path) if path.exists() => Self::load(&path),
            _ => {
                tracing::debug!("No engine config file, using defaults");
                Ok(Self::default())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn app_name_is_medinsight() {
        assert_eq!(APP_NAME, "MedInsight");
    }

    #[test]
    fn app_version_matches_cargo() {
        assert_eq!(APP_VERSION, "0.3.0");
    }

    #[test]
    fn default_config_path_is_namespaced() {
        if let Some(path) = default_config_path() {
            assert!(path.ends_with("medinsight/engine.json"));
        }
    }

    #[test]
    fn defaults_match_constants() {
        let config = EngineConfig::default();
        assert_eq!(config.min_name_len, 3);
        assert_eq!(config.header_keywords.len(), HEADER_KEYWORDS.len());
        assert_eq!(config.dedup_policy, DedupPolicy::KeepFirst);
        assert_eq!(config.conflict_order, ConflictOrder::Input);
        assert_eq!(config.fuzzy_cutoff, 0.82);
    }

    #[test]
    fn partial_file_overrides_only_named_fields() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "conflict_order": "severity", "min_name_len": 4 }}"#).unwrap();

        let config = EngineConfig::load(file.path()).unwrap();
        assert_eq!(config.conflict_order, ConflictOrder::Severity);
        assert_eq!(config.min_name_len, 4);
        assert_eq!(config.dedup_policy, DedupPolicy::KeepFirst);
        assert_eq!(config.lab_keywords.len(), LAB_KEYWORDS.len());
    }

    #[test]
    fn missing_file_is_load_error() {
        let err = EngineConfig::load(Path::new("/nonexistent/medinsight.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Load(..)));
    }

    #[test]
    fn malformed_file_is_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();
        let err = EngineConfig::load(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(..)));
    }
}
