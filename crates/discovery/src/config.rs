//! Session tuning.

use crate::error::{DiscoveryError, Result};
use pipeline::mood::DEFAULT_SENTIMENT_CONCURRENCY;
use serde::{Deserialize, Serialize};
use sources::radius_for_distance_range;
use std::fs;
use std::path::Path;

/// Knobs for one orchestrator. Missing JSON keys fall back to the defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DiscoveryConfig {
    /// Compatible places a session wants before it stops expanding
    pub min_results: usize,
    pub page_size: usize,
    pub max_expansions: u32,
    pub step_meters: u32,
    pub min_radius_meters: u32,
    /// Radius at distanceRange = 100
    pub max_radius_meters: u32,
    pub sentiment_concurrency: usize,
    /// Drop places whose mood score is further than this from the requested mood
    pub mood_tolerance: Option<u8>,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            min_results: 5,
            page_size: 10,
            max_expansions: 3,
            step_meters: 500,
            min_radius_meters: 500,
            max_radius_meters: 20_000,
            sentiment_concurrency: DEFAULT_SENTIMENT_CONCURRENCY,
            mood_tolerance: None,
        }
    }
}

impl DiscoveryConfig {
    /// Read a JSON config file and validate it
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| DiscoveryError::Config(format!("{}: {}", path.display(), e)))?;
        let config: Self = serde_json::from_str(&content)
            .map_err(|e| DiscoveryError::Config(format!("{}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.page_size == 0 {
            return Err(DiscoveryError::Config("pageSize must be at least 1".into()));
        }
        if self.step_meters == 0 {
            return Err(DiscoveryError::Config("stepMeters must be at least 1".into()));
        }
        if self.min_radius_meters > self.max_radius_meters {
            return Err(DiscoveryError::Config(format!(
                "minRadiusMeters ({}) exceeds maxRadiusMeters ({})",
                self.min_radius_meters, self.max_radius_meters
            )));
        }
        if self.mood_tolerance.is_some_and(|t| t > 100) {
            return Err(DiscoveryError::Config("moodTolerance must be 0-100".into()));
        }
        Ok(())
    }

    /// First search radius for a 0-100 distance preference
    pub fn initial_radius(&self, distance_range: u8) -> u32 {
        radius_for_distance_range(distance_range, self.min_radius_meters, self.max_radius_meters)
    }

    pub fn with_min_results(mut self, min_results: usize) -> Self {
        self.min_results = min_results;
        self
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn with_max_expansions(mut self, max_expansions: u32) -> Self {
        self.max_expansions = max_expansions;
        self
    }

    pub fn with_step_meters(mut self, step_meters: u32) -> Self {
        self.step_meters = step_meters;
        self
    }

    pub fn with_radius_bounds(mut self, min_meters: u32, max_meters: u32) -> Self {
        self.min_radius_meters = min_meters;
        self.max_radius_meters = max_meters;
        self
    }

    pub fn with_sentiment_concurrency(mut self, concurrency: usize) -> Self {
        self.sentiment_concurrency = concurrency;
        self
    }

    pub fn with_mood_tolerance(mut self, tolerance: u8) -> Self {
        self.mood_tolerance = Some(tolerance);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = DiscoveryConfig::default();
        assert_eq!(config.min_results, 5);
        assert_eq!(config.max_expansions, 3);
        assert_eq!(config.step_meters, 500);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_initial_radius() {
        let config = DiscoveryConfig::default();
        assert_eq!(config.initial_radius(10), 2_000);
        assert_eq!(config.initial_radius(0), 500);
        assert_eq!(config.initial_radius(100), 20_000);
    }

    #[test]
    fn test_partial_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "pageSize": 4, "moodTolerance": 25 }}"#).unwrap();

        let config = DiscoveryConfig::from_file(file.path()).unwrap();
        assert_eq!(config.page_size, 4);
        assert_eq!(config.mood_tolerance, Some(25));
        assert_eq!(config.min_results, 5);
    }

    #[test]
    fn test_rejects_inverted_bounds() {
        let config = DiscoveryConfig::default().with_radius_bounds(5_000, 1_000);
        assert!(matches!(config.validate(), Err(DiscoveryError::Config(_))));
    }

    #[test]
    fn test_missing_file() {
        let result = DiscoveryConfig::from_file(Path::new("nope/discovery.json"));
        assert!(matches!(result, Err(DiscoveryError::Config(_))));
    }
}
