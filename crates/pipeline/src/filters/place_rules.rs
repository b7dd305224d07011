//! Place-type compatibility rules.
//!
//! Each ruled place type carries a flat record of optional predicates. One
//! generic matcher evaluates whichever predicates are present against the
//! profile; a predicate whose profile value is unset always passes.

use crate::traits::Filter;
use anyhow::Result;
use place_data::{Budget, ScoredCandidate, SocialContext, TimeOfDay, ValidatedProfile};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Optional compatibility predicates for one place type
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PlaceRule {
    /// Inclusive `(min, max)` range of profile moods this type suits
    pub mood: Option<(u8, u8)>,
    pub social: Option<Vec<SocialContext>>,
    pub budget: Option<Vec<Budget>>,
    pub time: Option<Vec<TimeOfDay>>,
}

impl PlaceRule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_mood(mut self, min: u8, max: u8) -> Self {
        self.mood = Some((min, max));
        self
    }

    pub fn with_social(mut self, social: impl Into<Vec<SocialContext>>) -> Self {
        self.social = Some(social.into());
        self
    }

    pub fn with_budget(mut self, budget: impl Into<Vec<Budget>>) -> Self {
        self.budget = Some(budget.into());
        self
    }

    pub fn with_time(mut self, time: impl Into<Vec<TimeOfDay>>) -> Self {
        self.time = Some(time.into());
        self
    }

    /// True when every present predicate accepts the profile
    pub fn matches(&self, profile: &ValidatedProfile) -> bool {
        let mood_ok = self
            .mood
            .is_none_or(|(min, max)| (min..=max).contains(&profile.mood));
        mood_ok
            && allows(&self.social, profile.social_context)
            && allows(&self.budget, profile.budget)
            && allows(&self.time, profile.time_of_day)
    }
}

fn allows<T: PartialEq>(allowed: &Option<Vec<T>>, value: Option<T>) -> bool {
    match (allowed, value) {
        (Some(allowed), Some(value)) => allowed.contains(&value),
        _ => true,
    }
}

/// Rules keyed by upstream place type
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlaceRuleSet {
    rules: HashMap<String, PlaceRule>,
}

impl PlaceRuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rule(mut self, place_type: impl Into<String>, rule: PlaceRule) -> Self {
        self.rules.insert(place_type.into(), rule);
        self
    }

    pub fn rule(&self, place_type: &str) -> Option<&PlaceRule> {
        self.rules.get(place_type)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Built-in rules for types whose suitability clearly depends on the outing
    pub fn standard() -> Self {
        use Budget::*;
        use SocialContext::*;
        use TimeOfDay::*;

        Self::new()
            .with_rule(
                "night_club",
                PlaceRule::new()
                    .with_mood(55, 100)
                    .with_social([WithBae, Barkada])
                    .with_time([Night]),
            )
            .with_rule("bar", PlaceRule::new().with_mood(35, 100).with_time([Afternoon, Night]))
            .with_rule("karaoke", PlaceRule::new().with_mood(50, 100).with_social([WithBae, Barkada]))
            .with_rule("bowling_alley", PlaceRule::new().with_mood(35, 100))
            .with_rule(
                "amusement_park",
                PlaceRule::new().with_mood(45, 100).with_time([Morning, Afternoon]),
            )
            .with_rule("library", PlaceRule::new().with_mood(0, 45).with_social([Solo, WithBae]))
            .with_rule("spa", PlaceRule::new().with_mood(0, 50).with_budget([Mid, High]))
            .with_rule("museum", PlaceRule::new().with_mood(0, 70).with_time([Morning, Afternoon]))
            .with_rule("art_gallery", PlaceRule::new().with_mood(0, 70))
            .with_rule("park", PlaceRule::new().with_time([Morning, Afternoon]))
    }

    /// A place passes when none of its types are ruled, or when at least one
    /// ruled type matches the profile.
    pub fn admits(&self, types: &[String], profile: &ValidatedProfile) -> bool {
        let mut ruled = types.iter().filter_map(|t| self.rules.get(t)).peekable();
        if ruled.peek().is_none() {
            return true;
        }
        ruled.any(|rule| rule.matches(profile))
    }
}

/// Keeps candidates whose place types suit the profile.
pub struct PlaceRuleFilter {
    rules: PlaceRuleSet,
}

impl PlaceRuleFilter {
    pub fn new(rules: PlaceRuleSet) -> Self {
        Self { rules }
    }
}

impl Default for PlaceRuleFilter {
    fn default() -> Self {
        Self::new(PlaceRuleSet::standard())
    }
}

impl Filter for PlaceRuleFilter {
    fn name(&self) -> &str {
        "PlaceRuleFilter"
    }

    fn apply(
        &self,
        candidates: Vec<ScoredCandidate>,
        profile: &ValidatedProfile,
    ) -> Result<Vec<ScoredCandidate>> {
        Ok(candidates
            .into_iter()
            .filter(|c| self.rules.admits(&c.candidate.types, profile))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use place_data::{Candidate, Category, GeoPoint, PreferenceProfile};

    fn profile(mood: u8) -> PreferenceProfile {
        PreferenceProfile::new(Category::Activity, mood, 20, GeoPoint::new(14.55, 121.02))
    }

    fn scored(id: &str, types: &[&str]) -> ScoredCandidate {
        let candidate =
            Candidate::new(id, id, GeoPoint::new(14.55, 121.02)).with_types(types.iter().copied());
        ScoredCandidate::new(candidate, 50)
    }

    #[test]
    fn test_unset_profile_values_pass() {
        let rule = PlaceRule::new()
            .with_social([SocialContext::Solo])
            .with_time([TimeOfDay::Night]);
        assert!(rule.matches(&profile(50).validate().unwrap()));

        let evening = profile(50).with_time_of_day(TimeOfDay::Morning).validate().unwrap();
        assert!(!rule.matches(&evening));
    }

    #[test]
    fn test_mood_range_is_inclusive() {
        let rule = PlaceRule::new().with_mood(30, 60);
        assert!(rule.matches(&profile(30).validate().unwrap()));
        assert!(rule.matches(&profile(60).validate().unwrap()));
        assert!(!rule.matches(&profile(61).validate().unwrap()));
    }

    #[test]
    fn test_any_ruled_type_may_admit() {
        let rules = PlaceRuleSet::standard();
        let calm = profile(20).validate().unwrap();

        // Unruled types always pass
        assert!(rules.admits(&["restaurant".to_string()], &calm));
        // night_club alone is too hype for a mood of 20
        assert!(!rules.admits(&["night_club".to_string()], &calm));
        // but a place that is also an art gallery gets in
        assert!(rules.admits(&["night_club".to_string(), "art_gallery".to_string()], &calm));
    }

    #[test]
    fn test_filter_keeps_order() {
        let filter = PlaceRuleFilter::default();
        let solo_night = profile(80)
            .with_social_context(SocialContext::Solo)
            .with_time_of_day(TimeOfDay::Night)
            .validate()
            .unwrap();

        let candidates = vec![
            scored("club", &["night_club"]),
            scored("diner", &["restaurant"]),
            scored("pub", &["bar"]),
        ];
        let kept: Vec<String> = filter
            .apply(candidates, &solo_night)
            .unwrap()
            .iter()
            .map(|c| c.id().to_string())
            .collect();
        assert_eq!(kept, vec!["diner", "pub"]);
    }

    #[test]
    fn test_rules_deserialize() {
        let json = r#"{ "mood": [0, 40], "social": ["solo"], "time": ["morning", "afternoon"] }"#;
        let rule: PlaceRule = serde_json::from_str(json).unwrap();
        assert_eq!(rule.mood, Some((0, 40)));
        assert_eq!(rule.social, Some(vec![SocialContext::Solo]));
        assert!(rule.budget.is_none());
    }
}
