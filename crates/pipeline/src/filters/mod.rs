//! Compatibility filters for the candidate pipeline.
//!
//! This module contains all the concrete filter implementations
//! that can be composed into a FilterPipeline.

pub mod budget;
pub mod mood_tolerance;
pub mod place_rules;

// Re-export for convenience
pub use budget::BudgetFilter;
pub use mood_tolerance::MoodToleranceFilter;
pub use place_rules::{PlaceRule, PlaceRuleFilter, PlaceRuleSet};
