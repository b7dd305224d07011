//! Keeps candidates whose scored mood is close to the requested mood.

use crate::traits::Filter;
use anyhow::Result;
use place_data::{ScoredCandidate, ValidatedProfile};

/// Removes candidates with `|mood_score - profile.mood| > tolerance`.
pub struct MoodToleranceFilter {
    tolerance: u8,
}

impl MoodToleranceFilter {
    pub fn new(tolerance: u8) -> Self {
        Self { tolerance }
    }
}

impl Filter for MoodToleranceFilter {
    fn name(&self) -> &str {
        "MoodToleranceFilter"
    }

    fn apply(
        &self,
        candidates: Vec<ScoredCandidate>,
        profile: &ValidatedProfile,
    ) -> Result<Vec<ScoredCandidate>> {
        Ok(candidates
            .into_iter()
            .filter(|c| c.mood_score.abs_diff(profile.mood) <= self.tolerance)
            .collect())
    }
}
