//! The FilterPipeline chains compatibility filters.

use crate::filters::{BudgetFilter, MoodToleranceFilter, PlaceRuleFilter};
use crate::traits::Filter;
use anyhow::Result;
use place_data::{ScoredCandidate, ValidatedProfile};

/// Chains multiple filters together into a processing pipeline.
///
/// ## Usage
/// ```ignore
/// let pipeline = FilterPipeline::new()
///     .add_filter(PlaceRuleFilter::default())
///     .add_filter(BudgetFilter);
///
/// let compatible = pipeline.apply(scored, &profile)?;
/// ```
pub struct FilterPipeline {
    filters: Vec<Box<dyn Filter>>,
}

impl FilterPipeline {
    /// Create a new empty FilterPipeline.
    pub fn new() -> Self {
        Self {
            filters: Vec::new(),
        }
    }

    /// The standard compatibility stages: place-type rules, budget, and
    /// mood tolerance when one is configured.
    pub fn compatibility(mood_tolerance: Option<u8>) -> Self {
        let pipeline = Self::new()
            .add_filter(PlaceRuleFilter::default())
            .add_filter(BudgetFilter);
        match mood_tolerance {
            Some(tolerance) => pipeline.add_filter(MoodToleranceFilter::new(tolerance)),
            None => pipeline,
        }
    }

    /// Add a filter to the pipeline (builder pattern).
    pub fn add_filter(mut self, filter: impl Filter + 'static) -> Self {
        self.filters.push(Box::new(filter));
        self
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Apply all filters in sequence, stopping at the first failure.
    pub fn apply(
        &self,
        candidates: Vec<ScoredCandidate>,
        profile: &ValidatedProfile,
    ) -> Result<Vec<ScoredCandidate>> {
        let mut current = candidates;
        for filter in &self.filters {
            tracing::debug!(
                "Applying filter: {} (input count: {})",
                filter.name(),
                current.len()
            );
            current = filter.apply(current, profile)?;
            tracing::debug!(
                "Filter applied: {} (output count: {})",
                filter.name(),
                current.len()
            );
        }
        Ok(current)
    }
}

impl Default for FilterPipeline {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use place_data::{Budget, Candidate, Category, GeoPoint, PreferenceProfile};

    fn profile() -> ValidatedProfile {
        PreferenceProfile::new(Category::Food, 50, 20, GeoPoint::new(14.55, 121.02))
            .with_budget(Budget::Low)
            .validate()
            .unwrap()
    }

    fn scored(id: &str, price: u8, mood: u8) -> ScoredCandidate {
        let candidate = Candidate::new(id, id, GeoPoint::new(14.55, 121.02))
            .with_types(["restaurant"])
            .with_price_level(price);
        ScoredCandidate::new(candidate, mood)
    }

    #[test]
    fn test_empty_pipeline() {
        let pipeline = FilterPipeline::new();
        let candidates = vec![scored("a", 4, 10), scored("b", 1, 90)];

        let filtered = pipeline.apply(candidates, &profile()).unwrap();
        assert_eq!(filtered.len(), 2);
    }

    #[test]
    fn test_single_filter() {
        let pipeline = FilterPipeline::new().add_filter(BudgetFilter);
        let candidates = vec![scored("cheap", 1, 50), scored("pricey", 3, 50)];

        let filtered = pipeline.apply(candidates, &profile()).unwrap();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].id(), "cheap");
    }

    #[test]
    fn test_compatibility_stages() {
        assert_eq!(FilterPipeline::compatibility(None).len(), 2);

        let pipeline = FilterPipeline::compatibility(Some(10));
        assert_eq!(pipeline.len(), 3);

        let candidates = vec![scored("close", 1, 55), scored("far", 1, 90)];
        let filtered = pipeline.apply(candidates, &profile()).unwrap();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].id(), "close");
    }
}
