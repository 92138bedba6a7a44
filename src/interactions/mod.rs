//! Drug-drug conflict resolution over a patient's active medication list.

pub mod matrix;
pub mod resolver;
pub mod types;

pub use matrix::InteractionMatrix;
pub use resolver::{dedup_names, ConflictResolver};
pub use types::{high_risk, ConflictRecord, ConflictSummary};
