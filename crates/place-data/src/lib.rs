//! # Place Data Crate
//!
//! Domain types and offline place storage for the discovery engine.
//!
//! ## Main Components
//!
//! - **types**: Preference profile, candidates, mood labels, `PlaceIndex`
//! - **geo**: Haversine distance and coordinate checks
//! - **parser**: JSON fixture/profile parsing and enum `FromStr` impls
//! - **index**: Fixture loading and radius queries over `PlaceIndex`
//! - **error**: Error types for loading and validation
//!
//! ## Example Usage
//!
//! ```ignore
//! use place_data::{Category, GeoPoint, PlaceIndex, PreferenceProfile};
//! use std::path::Path;
//!
//! let index = PlaceIndex::load_from_file(Path::new("data/sample_places.json"))?;
//! let here = GeoPoint::new(14.5547, 121.0244);
//! let nearby = index.search(here, 1_500.0, &["cafe".to_string()]);
//!
//! let profile = PreferenceProfile::new(Category::Food, 30, 20, here).validate()?;
//! ```

// Public modules
pub mod error;
pub mod geo;
pub mod index;
pub mod parser;
pub mod types;

// Re-export commonly used types for convenience
pub use error::{DataError, Result};
pub use geo::haversine_meters;
pub use types::{
    // Type aliases & constants
    PlaceId,
    CHILL_MAX_SCORE,
    HYPE_MIN_SCORE,
    // Core types
    GeoPoint,
    PreferenceProfile,
    ValidatedProfile,
    Candidate,
    ScoredCandidate,
    PlaceIndex,
    // Enums
    Category,
    SocialContext,
    Budget,
    TimeOfDay,
    MoodLabel,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_place_index_creation() {
        let index = PlaceIndex::new();
        assert_eq!(index.counts(), (0, 0));
        assert!(index.get_place("missing").is_none());
        assert!(index.get_places_by_type("cafe").is_empty());
    }

    #[test]
    fn test_candidate_builder() {
        let candidate = Candidate::new("p1", "Sunset Rooftop", GeoPoint::new(14.55, 121.02))
            .with_types(["bar", "restaurant"])
            .with_price_level(3)
            .with_busyness(60);

        assert!(candidate.has_type("bar"));
        assert!(!candidate.has_type("cafe"));
        assert_eq!(candidate.price_level, Some(3));
        assert_eq!(candidate.busyness, Some(60));
    }
}
