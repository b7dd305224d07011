//! Core domain types for place discovery.
//!
//! This module defines the data structures shared by every stage of the engine:
//! - The caller's preference profile and its enums
//! - Raw place candidates as returned by a search collaborator
//! - Mood-annotated candidates produced by scoring
//! - `PlaceIndex`, an in-memory place store used by offline search

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::fmt;

use crate::error::{DataError, Result};

// =============================================================================
// Type Aliases & Constants
// =============================================================================

/// Stable identifier of a place (the upstream place id)
pub type PlaceId = String;

/// Scores at or below this are labelled chill
pub const CHILL_MAX_SCORE: u8 = 30;

/// Scores at or above this are labelled hype
pub const HYPE_MIN_SCORE: u8 = 70;

// =============================================================================
// Geography
// =============================================================================

/// A WGS84 coordinate pair
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

// =============================================================================
// Preference Enums
// =============================================================================

/// What kind of outing the user is looking for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    Food,
    Activity,
    SomethingNew,
}

/// Who the user is going out with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SocialContext {
    Solo,
    WithBae,
    Barkada,
}

/// Spending tier, written P / PP / PPP in the app
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Budget {
    #[serde(rename = "P")]
    Low,
    #[serde(rename = "PP")]
    Mid,
    #[serde(rename = "PPP")]
    High,
}

impl Budget {
    /// Highest upstream price level (0-4 scale) this tier accepts
    pub fn max_price_level(&self) -> u8 {
        match self {
            Budget::Low => 1,
            Budget::Mid => 2,
            Budget::High => 4,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TimeOfDay {
    Morning,
    Afternoon,
    Night,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Category::Food => "food",
            Category::Activity => "activity",
            Category::SomethingNew => "something-new",
        })
    }
}

impl fmt::Display for SocialContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SocialContext::Solo => "solo",
            SocialContext::WithBae => "with-bae",
            SocialContext::Barkada => "barkada",
        })
    }
}

impl fmt::Display for Budget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Budget::Low => "P",
            Budget::Mid => "PP",
            Budget::High => "PPP",
        })
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TimeOfDay::Morning => "morning",
            TimeOfDay::Afternoon => "afternoon",
            TimeOfDay::Night => "night",
        })
    }
}

// =============================================================================
// Preference Profile
// =============================================================================

/// The filters a user picked, exactly as received from the caller.
///
/// Required fields are still `Option` here because callers (JSON, forms)
/// can omit them; `validate` turns this into a `ValidatedProfile` or
/// rejects it before any network activity.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreferenceProfile {
    pub category: Option<Category>,
    /// 0 (chill) to 100 (hype)
    pub mood: Option<u8>,
    pub social_context: Option<SocialContext>,
    pub budget: Option<Budget>,
    pub time_of_day: Option<TimeOfDay>,
    /// Percentage (0-100) of the configured maximum search radius
    pub distance_range: Option<u8>,
    pub user_location: Option<GeoPoint>,
}

impl PreferenceProfile {
    /// Profile with every required field set and no optional preferences.
    pub fn new(category: Category, mood: u8, distance_range: u8, user_location: GeoPoint) -> Self {
        Self {
            category: Some(category),
            mood: Some(mood),
            distance_range: Some(distance_range),
            user_location: Some(user_location),
            ..Self::default()
        }
    }

    pub fn with_social_context(mut self, social: SocialContext) -> Self {
        self.social_context = Some(social);
        self
    }

    pub fn with_budget(mut self, budget: Budget) -> Self {
        self.budget = Some(budget);
        self
    }

    pub fn with_time_of_day(mut self, time: TimeOfDay) -> Self {
        self.time_of_day = Some(time);
        self
    }

    /// Check required fields and ranges.
    pub fn validate(&self) -> Result<ValidatedProfile> {
        let category = self
            .category
            .ok_or_else(|| DataError::MissingField("category".to_string()))?;
        let mood = self
            .mood
            .ok_or_else(|| DataError::MissingField("mood".to_string()))?;
        let distance_range = self
            .distance_range
            .ok_or_else(|| DataError::MissingField("distanceRange".to_string()))?;
        let user_location = self
            .user_location
            .ok_or_else(|| DataError::MissingField("userLocation".to_string()))?;

        if mood > 100 {
            return Err(DataError::OutOfRange {
                field: "mood".to_string(),
                value: mood.to_string(),
                expected: "0-100".to_string(),
            });
        }
        if distance_range > 100 {
            return Err(DataError::OutOfRange {
                field: "distanceRange".to_string(),
                value: distance_range.to_string(),
                expected: "0-100".to_string(),
            });
        }
        if !user_location.is_valid() {
            return Err(DataError::OutOfRange {
                field: "userLocation".to_string(),
                value: format!("({}, {})", user_location.lat, user_location.lng),
                expected: "lat in [-90, 90], lng in [-180, 180]".to_string(),
            });
        }

        Ok(ValidatedProfile {
            category,
            mood,
            social_context: self.social_context,
            budget: self.budget,
            time_of_day: self.time_of_day,
            distance_range,
            user_location,
            identity: self.identity_key(),
        })
    }

    /// Deterministic SHA-256 (hex) of every field of the profile.
    ///
    /// Two profiles share a key exactly when all fields are equal, so the key
    /// doubles as the discovery session identity and the cache key prefix.
    pub fn identity_key(&self) -> String {
        fn field<T: fmt::Display>(value: &Option<T>) -> String {
            value
                .as_ref()
                .map(|v| v.to_string())
                .unwrap_or_else(|| "-".to_string())
        }

        let location = self
            .user_location
            // + 0.0 folds -0.0 into 0.0
            .map(|p| format!("{},{}", p.lat + 0.0, p.lng + 0.0))
            .unwrap_or_else(|| "-".to_string());
        let canonical = format!(
            "category={};mood={};social={};budget={};time={};distance={};location={}",
            field(&self.category),
            field(&self.mood),
            field(&self.social_context),
            field(&self.budget),
            field(&self.time_of_day),
            field(&self.distance_range),
            location,
        );

        let mut hasher = Sha256::new();
        hasher.update(canonical.as_bytes());
        format!("{:x}", hasher.finalize())
    }
}

/// A profile that passed validation; required fields are guaranteed present.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedProfile {
    pub category: Category,
    pub mood: u8,
    pub social_context: Option<SocialContext>,
    pub budget: Option<Budget>,
    pub time_of_day: Option<TimeOfDay>,
    pub distance_range: u8,
    pub user_location: GeoPoint,
    identity: String,
}

impl ValidatedProfile {
    /// Identity key of the profile this was validated from
    pub fn identity_key(&self) -> &str {
        &self.identity
    }
}

// =============================================================================
// Candidates
// =============================================================================

/// A raw place record returned by a search collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub id: PlaceId,
    pub name: String,
    pub location: GeoPoint,
    /// Upstream place types, e.g. "cafe", "night_club"
    #[serde(default)]
    pub types: Vec<String>,
    /// Upstream price level on a 0-4 scale
    #[serde(default)]
    pub price_level: Option<u8>,
    #[serde(default)]
    pub rating: Option<f32>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub review: Option<String>,
    /// Real-time crowd level, 0 (empty) to 100 (packed)
    #[serde(default)]
    pub busyness: Option<u8>,
}

impl Candidate {
    pub fn new(id: impl Into<PlaceId>, name: impl Into<String>, location: GeoPoint) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            location,
            types: Vec::new(),
            price_level: None,
            rating: None,
            description: None,
            review: None,
            busyness: None,
        }
    }

    pub fn with_types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.types = types.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_price_level(mut self, level: u8) -> Self {
        self.price_level = Some(level);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_review(mut self, review: impl Into<String>) -> Self {
        self.review = Some(review.into());
        self
    }

    pub fn with_busyness(mut self, busyness: u8) -> Self {
        self.busyness = Some(busyness);
        self
    }

    pub fn has_type(&self, place_type: &str) -> bool {
        self.types.iter().any(|t| t == place_type)
    }
}

/// Mood bucket derived from a 0-100 mood score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoodLabel {
    Chill,
    Neutral,
    Hype,
}

impl MoodLabel {
    pub fn from_score(score: u8) -> Self {
        if score <= CHILL_MAX_SCORE {
            MoodLabel::Chill
        } else if score >= HYPE_MIN_SCORE {
            MoodLabel::Hype
        } else {
            MoodLabel::Neutral
        }
    }
}

impl fmt::Display for MoodLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MoodLabel::Chill => "chill",
            MoodLabel::Neutral => "neutral",
            MoodLabel::Hype => "hype",
        })
    }
}

/// A candidate annotated with its mood. Built once by the scorer, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredCandidate {
    #[serde(flatten)]
    pub candidate: Candidate,
    pub mood_score: u8,
    pub mood_label: MoodLabel,
}

impl ScoredCandidate {
    /// Annotate `candidate`; the label always follows from the (clamped) score.
    pub fn new(candidate: Candidate, mood_score: u8) -> Self {
        let mood_score = mood_score.min(100);
        Self {
            candidate,
            mood_score,
            mood_label: MoodLabel::from_score(mood_score),
        }
    }

    pub fn id(&self) -> &str {
        &self.candidate.id
    }
}

// =============================================================================
// PlaceIndex - In-Memory Place Store
// =============================================================================

/// In-memory place store with a per-type secondary index.
///
/// Backs the offline search collaborator; queries live in `index.rs`.
#[derive(Debug, Default)]
pub struct PlaceIndex {
    pub(crate) places: HashMap<PlaceId, Candidate>,
    /// Place ids grouped by upstream type, sorted for deterministic scans
    pub(crate) type_index: HashMap<String, Vec<PlaceId>>,
}

impl PlaceIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_place(&self, id: &str) -> Option<&Candidate> {
        self.places.get(id)
    }

    /// All places tagged with `place_type`
    pub fn get_places_by_type(&self, place_type: &str) -> &[PlaceId] {
        self.type_index
            .get(place_type)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Insert a place; returns false (and leaves the index untouched) if the id exists.
    pub fn insert_place(&mut self, place: Candidate) -> bool {
        if self.places.contains_key(&place.id) {
            return false;
        }
        self.places.insert(place.id.clone(), place);
        true
    }

    /// (places, distinct types)
    pub fn counts(&self) -> (usize, usize) {
        (self.places.len(), self.type_index.len())
    }
}
