//! Lab trend analytics: canonical test grouping and direction of change.

pub mod canonical;
pub mod trends;

pub use canonical::{canonicalize_test_name, parse_numeric, CanonicalTest};
pub use trends::{analyze_trends, history, TrendResult};
