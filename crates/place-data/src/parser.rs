//! Parsers for place fixtures, profiles, and the textual forms of profile enums.
//!
//! Fixture files are JSON, either a bare array of places or an object with a
//! `places` array:
//! - `[{"id": "...", "name": "...", "location": {"lat": .., "lng": ..}, "types": [..]}]`
//! - `{"places": [ ... ]}`

use crate::error::{DataError, Result};
use crate::types::*;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::str::FromStr;

#[derive(Deserialize)]
#[serde(untagged)]
enum PlaceFile {
    List(Vec<Candidate>),
    Wrapped { places: Vec<Candidate> },
}

fn read_file(path: &Path) -> Result<String> {
    if !path.exists() {
        return Err(DataError::FileNotFound {
            path: path.display().to_string(),
        });
    }
    Ok(fs::read_to_string(path)?)
}

/// Parse a places fixture file
pub fn parse_places(path: &Path) -> Result<Vec<Candidate>> {
    let content = read_file(path)?;
    parse_places_str(&content, &path.display().to_string())
}

/// Parse fixture JSON already in memory. `source` names it in error messages.
pub fn parse_places_str(content: &str, source: &str) -> Result<Vec<Candidate>> {
    let file: PlaceFile = serde_json::from_str(content).map_err(|e| DataError::JsonError {
        file: source.to_string(),
        source: e,
    })?;

    let places = match file {
        PlaceFile::List(places) => places,
        PlaceFile::Wrapped { places } => places,
    };

    for place in &places {
        validate_place(place)?;
    }
    Ok(places)
}

/// Parse a JSON preference profile. Validation is left to the caller.
pub fn parse_profile(path: &Path) -> Result<PreferenceProfile> {
    let content = read_file(path)?;
    serde_json::from_str(&content).map_err(|e| DataError::JsonError {
        file: path.display().to_string(),
        source: e,
    })
}

/// Check a single place record for values upstream never produces
pub fn validate_place(place: &Candidate) -> Result<()> {
    if place.id.trim().is_empty() {
        return Err(DataError::ValidationError(format!(
            "place '{}' has an empty id",
            place.name
        )));
    }
    if !place.location.is_valid() {
        return Err(DataError::OutOfRange {
            field: format!("location of {}", place.id),
            value: format!("({}, {})", place.location.lat, place.location.lng),
            expected: "lat in [-90, 90], lng in [-180, 180]".to_string(),
        });
    }
    if let Some(level) = place.price_level {
        if level > 4 {
            return Err(DataError::OutOfRange {
                field: format!("priceLevel of {}", place.id),
                value: level.to_string(),
                expected: "0-4".to_string(),
            });
        }
    }
    if let Some(busyness) = place.busyness {
        if busyness > 100 {
            return Err(DataError::OutOfRange {
                field: format!("busyness of {}", place.id),
                value: busyness.to_string(),
                expected: "0-100".to_string(),
            });
        }
    }
    Ok(())
}

fn invalid(field: &str, value: &str) -> DataError {
    DataError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
    }
}

/// Lowercase and fold `_`/space into `-` so "Something New" == "something-new"
fn normalize(s: &str) -> String {
    s.trim()
        .to_lowercase()
        .chars()
        .map(|c| if c == '_' || c == ' ' { '-' } else { c })
        .collect()
}

impl FromStr for Category {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self> {
        match normalize(s).as_str() {
            "food" => Ok(Category::Food),
            "activity" | "activities" => Ok(Category::Activity),
            "something-new" | "somethingnew" | "new" => Ok(Category::SomethingNew),
            _ => Err(invalid("category", s)),
        }
    }
}

impl FromStr for SocialContext {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self> {
        match normalize(s).as_str() {
            "solo" => Ok(SocialContext::Solo),
            "with-bae" | "bae" | "date" => Ok(SocialContext::WithBae),
            "barkada" | "group" => Ok(SocialContext::Barkada),
            _ => Err(invalid("socialContext", s)),
        }
    }
}

impl FromStr for Budget {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_uppercase().as_str() {
            "P" | "$" => Ok(Budget::Low),
            "PP" | "$$" => Ok(Budget::Mid),
            "PPP" | "$$$" => Ok(Budget::High),
            _ => Err(invalid("budget", s)),
        }
    }
}

impl FromStr for TimeOfDay {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self> {
        match normalize(s).as_str() {
            "morning" => Ok(TimeOfDay::Morning),
            "afternoon" => Ok(TimeOfDay::Afternoon),
            "night" | "evening" => Ok(TimeOfDay::Night),
            _ => Err(invalid("timeOfDay", s)),
        }
    }
}
