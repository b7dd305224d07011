//! Budget filter.
//!
//! Maps the P / PP / PPP tier onto the upstream 0-4 price level. Places with
//! no price information are kept.

use crate::traits::Filter;
use anyhow::Result;
use place_data::{ScoredCandidate, ValidatedProfile};

/// Removes candidates priced above the profile's budget tier.
pub struct BudgetFilter;

impl Filter for BudgetFilter {
    fn name(&self) -> &str {
        "BudgetFilter"
    }

    fn apply(
        &self,
        candidates: Vec<ScoredCandidate>,
        profile: &ValidatedProfile,
    ) -> Result<Vec<ScoredCandidate>> {
        let Some(budget) = profile.budget else {
            return Ok(candidates);
        };
        let max_level = budget.max_price_level();

        Ok(candidates
            .into_iter()
            .filter(|c| c.candidate.price_level.is_none_or(|level| level <= max_level))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use place_data::{Budget, Candidate, Category, GeoPoint, PreferenceProfile};

    fn candidates() -> Vec<ScoredCandidate> {
        let here = GeoPoint::new(14.55, 121.02);
        vec![
            ScoredCandidate::new(Candidate::new("free", "Free", here).with_price_level(0), 50),
            ScoredCandidate::new(Candidate::new("mid", "Mid", here).with_price_level(2), 50),
            ScoredCandidate::new(Candidate::new("lux", "Lux", here).with_price_level(4), 50),
            ScoredCandidate::new(Candidate::new("unknown", "Unknown", here), 50),
        ]
    }

    fn ids_for(budget: Option<Budget>) -> Vec<String> {
        let mut profile = PreferenceProfile::new(Category::Food, 50, 20, GeoPoint::new(14.55, 121.02));
        profile.budget = budget;
        BudgetFilter
            .apply(candidates(), &profile.validate().unwrap())
            .unwrap()
            .iter()
            .map(|c| c.id().to_string())
            .collect()
    }

    #[test]
    fn test_budget_tiers() {
        assert_eq!(ids_for(Some(Budget::Low)), vec!["free", "unknown"]);
        assert_eq!(ids_for(Some(Budget::Mid)), vec!["free", "mid", "unknown"]);
        assert_eq!(ids_for(Some(Budget::High)).len(), 4);
    }

    #[test]
    fn test_no_budget_keeps_everything() {
        assert_eq!(ids_for(None).len(), 4);
    }
}
