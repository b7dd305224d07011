//! Core traits for the compatibility pipeline.
//!
//! This module defines the Filter trait that allows composable,
//! extensible filters to be applied to scored candidates.

use anyhow::Result;
use place_data::{ScoredCandidate, ValidatedProfile};

/// Core trait for filtering scored candidates.
///
/// All filters must implement this trait to be used in the FilterPipeline.
///
/// ## Design Note
/// - `Send + Sync` lets a pipeline be shared by a session across await points
/// - Filters take ownership of the Vec and return the survivors in order
pub trait Filter: Send + Sync {
    /// Returns the name of this filter (for logging/debugging)
    fn name(&self) -> &str;

    /// Apply this filter to a set of candidates.
    ///
    /// # Arguments
    /// * `candidates` - The candidates to filter (takes ownership)
    /// * `profile` - The validated preference profile of the session
    fn apply(
        &self,
        candidates: Vec<ScoredCandidate>,
        profile: &ValidatedProfile,
    ) -> Result<Vec<ScoredCandidate>>;
}
