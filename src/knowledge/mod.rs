//! Drug knowledge base: interaction table plus the descriptive catalogue.
//!
//! Both tables are immutable once built. They are passed around by
//! reference rather than held in process-wide statics, so tests can build
//! their own fixtures and several versions can coexist.

pub mod base;
pub mod catalogue;
pub mod types;

pub use base::KnowledgeBase;
pub use catalogue::MedicineCatalogue;
pub use types::{DrugRecord, Interaction, KnowledgeError, MedicineDetails};
