//! Turns a validated preference profile into upstream search parameters.
//!
//! ## Type filters
//! The category picks a base vocabulary of upstream place types; time of day
//! widens it (late food and activity searches pick up bars, mornings pick up
//! cafes). Duplicates are dropped keeping first-seen order so the request is
//! stable for a given profile.

use place_data::{Category, GeoPoint, TimeOfDay, ValidatedProfile};

const FOOD_TYPES: &[&str] = &["restaurant", "cafe", "bakery", "meal_takeaway"];

const ACTIVITY_TYPES: &[&str] = &[
    "park",
    "museum",
    "bowling_alley",
    "movie_theater",
    "amusement_park",
    "gym",
];

const SOMETHING_NEW_TYPES: &[&str] = &[
    "art_gallery",
    "tourist_attraction",
    "aquarium",
    "zoo",
    "library",
    "spa",
];

const NIGHT_TYPES: &[&str] = &["bar", "night_club"];

const MORNING_TYPES: &[&str] = &["cafe", "bakery"];

/// Base upstream types for a category
pub fn category_types(category: Category) -> &'static [&'static str] {
    match category {
        Category::Food => FOOD_TYPES,
        Category::Activity => ACTIVITY_TYPES,
        Category::SomethingNew => SOMETHING_NEW_TYPES,
    }
}

/// Extra types a time of day adds for a category
fn time_types(category: Category, time: TimeOfDay) -> &'static [&'static str] {
    match (category, time) {
        (Category::Food | Category::Activity, TimeOfDay::Night) => NIGHT_TYPES,
        (_, TimeOfDay::Morning) => MORNING_TYPES,
        _ => &[],
    }
}

/// Map a 0-100 distance preference onto meters.
///
/// `distance_range` percent of `max_meters`, clamped to `[min_meters, max_meters]`.
pub fn radius_for_distance_range(distance_range: u8, min_meters: u32, max_meters: u32) -> u32 {
    let pct = f64::from(distance_range.min(100)) / 100.0;
    let raw = (pct * f64::from(max_meters)).round() as u32;
    raw.clamp(min_meters.min(max_meters), max_meters)
}

/// One nearby-search request
#[derive(Debug, Clone, PartialEq)]
pub struct SearchParams {
    pub center: GeoPoint,
    pub radius_meters: u32,
    pub type_filters: Vec<String>,
}

impl SearchParams {
    /// Build the request for `profile` at `radius_meters`
    pub fn for_profile(profile: &ValidatedProfile, radius_meters: u32) -> Self {
        let mut type_filters: Vec<String> = Vec::new();
        let extra = profile
            .time_of_day
            .map(|t| time_types(profile.category, t))
            .unwrap_or(&[]);

        for t in category_types(profile.category).iter().chain(extra) {
            if !type_filters.iter().any(|existing| existing == t) {
                type_filters.push((*t).to_string());
            }
        }

        Self {
            center: profile.user_location,
            radius_meters,
            type_filters,
        }
    }

    /// Same request at a different radius
    pub fn at_radius(&self, radius_meters: u32) -> Self {
        Self {
            radius_meters,
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use place_data::PreferenceProfile;

    fn profile(category: Category, time: Option<TimeOfDay>) -> ValidatedProfile {
        let mut p = PreferenceProfile::new(category, 50, 25, GeoPoint::new(14.55, 121.02));
        p.time_of_day = time;
        p.validate().unwrap()
    }

    #[test]
    fn test_radius_mapping() {
        assert_eq!(radius_for_distance_range(25, 500, 20_000), 5_000);
        assert_eq!(radius_for_distance_range(100, 500, 20_000), 20_000);
        // Clamped up to the minimum
        assert_eq!(radius_for_distance_range(0, 500, 20_000), 500);
        assert_eq!(radius_for_distance_range(1, 500, 20_000), 500);
    }

    #[test]
    fn test_food_at_night_adds_bars() {
        let params = SearchParams::for_profile(&profile(Category::Food, Some(TimeOfDay::Night)), 1_000);
        assert_eq!(params.radius_meters, 1_000);
        assert!(params.type_filters.contains(&"restaurant".to_string()));
        assert!(params.type_filters.contains(&"night_club".to_string()));
    }

    #[test]
    fn test_morning_types_are_deduplicated() {
        let params = SearchParams::for_profile(&profile(Category::Food, Some(TimeOfDay::Morning)), 1_000);
        let cafes = params.type_filters.iter().filter(|t| *t == "cafe").count();
        assert_eq!(cafes, 1);
        assert_eq!(params.type_filters.len(), FOOD_TYPES.len());
    }

    #[test]
    fn test_something_new_ignores_night() {
        let params =
            SearchParams::for_profile(&profile(Category::SomethingNew, Some(TimeOfDay::Night)), 1_000);
        assert_eq!(params.type_filters.len(), SOMETHING_NEW_TYPES.len());
        assert!(!params.type_filters.contains(&"bar".to_string()));
    }

    #[test]
    fn test_at_radius_keeps_filters() {
        let params = SearchParams::for_profile(&profile(Category::Activity, None), 1_000);
        let wider = params.at_radius(1_500);
        assert_eq!(wider.radius_meters, 1_500);
        assert_eq!(wider.type_filters, params.type_filters);
    }
}
