//! Collaborator seams: the place-search client and the optional result cache.
//!
//! The engine only ever sees these traits. Network resilience (retries,
//! fallbacks, timeouts) belongs to the implementations, which report a plain
//! success or `SearchError`.

use async_trait::async_trait;
use place_data::{Candidate, GeoPoint};
use thiserror::Error;

/// Errors a search collaborator can report
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SearchError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Search quota exceeded: {0}")]
    Quota(String),

    #[error("Search timed out after {0} ms")]
    Timeout(u64),

    #[error("Malformed search response: {0}")]
    Malformed(String),
}

/// Nearby place search over a geographic circle.
#[async_trait]
pub trait SearchClient: Send + Sync {
    /// Candidates within `radius_meters` of `center` carrying any of
    /// `type_filters` (all types when empty).
    async fn search_nearby(
        &self,
        center: GeoPoint,
        radius_meters: u32,
        type_filters: &[String],
    ) -> Result<Vec<Candidate>, SearchError>;
}

/// Key-value cache of raw search results.
///
/// Purely an optimization: a miss (or no cache at all) must give the same
/// session outcome as a hit.
#[async_trait]
pub trait PlaceCache: Send + Sync {
    async fn get(&self, key: &str) -> Option<Vec<Candidate>>;

    async fn set(&self, key: &str, places: Vec<Candidate>);
}

/// Cache key for one profile at one radius
pub fn cache_key(identity: &str, radius_meters: u32) -> String {
    format!("{}:{}", identity, radius_meters)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_key_separates_radii() {
        assert_eq!(cache_key("abc", 500), "abc:500");
        assert_ne!(cache_key("abc", 500), cache_key("abc", 1000));
    }

    #[test]
    fn test_search_error_display() {
        assert_eq!(
            SearchError::Timeout(3000).to_string(),
            "Search timed out after 3000 ms"
        );
        assert!(SearchError::Quota("daily".into()).to_string().contains("quota"));
    }
}
