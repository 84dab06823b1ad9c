//! Triage — priority scoring and categorization.

pub mod categorizer;
pub mod scorer;

pub use categorizer::categorize;
pub use scorer::{PrioritizationCriteria, PriorityScorer};
