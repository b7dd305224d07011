//! Offline search collaborator backed by a `PlaceIndex`.
//!
//! Behaves like the upstream nearby-search endpoint: nearest first, at most
//! `max_results` per call, optional simulated latency.

use crate::client::{SearchClient, SearchError};
use async_trait::async_trait;
use place_data::{Candidate, GeoPoint, PlaceIndex};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument};

/// Upstream nearby search caps a single page at this many results
pub const DEFAULT_MAX_RESULTS: usize = 20;

pub struct FixtureSearchClient {
    /// Shared, read-only place store
    index: Arc<PlaceIndex>,
    max_results: usize,
    latency: Option<Duration>,
}

impl FixtureSearchClient {
    pub fn new(index: Arc<PlaceIndex>) -> Self {
        Self {
            index,
            max_results: DEFAULT_MAX_RESULTS,
            latency: None,
        }
    }

    /// Configure the per-call result cap (default: 20)
    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }

    /// Sleep this long before answering each call
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    pub fn index(&self) -> &PlaceIndex {
        &self.index
    }
}

#[async_trait]
impl SearchClient for FixtureSearchClient {
    #[instrument(skip(self, type_filters), fields(types = type_filters.len()))]
    async fn search_nearby(
        &self,
        center: GeoPoint,
        radius_meters: u32,
        type_filters: &[String],
    ) -> Result<Vec<Candidate>, SearchError> {
        if !center.is_valid() {
            return Err(SearchError::Malformed(format!(
                "invalid center ({}, {})",
                center.lat, center.lng
            )));
        }
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        let mut places = self
            .index
            .search(center, f64::from(radius_meters), type_filters);
        places.truncate(self.max_results);

        debug!("Fixture search returned {} places", places.len());
        Ok(places)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn center() -> GeoPoint {
        GeoPoint::new(14.5547, 121.0244)
    }

    fn create_test_client() -> FixtureSearchClient {
        let places = (0..30)
            .map(|i| {
                let loc = GeoPoint::new(center().lat + f64::from(i) * 0.0005, center().lng);
                let kind = if i % 2 == 0 { "cafe" } else { "bar" };
                Candidate::new(format!("p{:02}", i), format!("Place {}", i), loc).with_types([kind])
            })
            .collect();
        FixtureSearchClient::new(Arc::new(PlaceIndex::from_places(places).unwrap()))
    }

    #[tokio::test]
    async fn test_caps_results_nearest_first() {
        let client = create_test_client();
        let places = client.search_nearby(center(), 50_000, &[]).await.unwrap();
        assert_eq!(places.len(), DEFAULT_MAX_RESULTS);
        assert_eq!(places[0].id, "p00");
        assert_eq!(places[1].id, "p01");
    }

    #[tokio::test]
    async fn test_type_filters_apply() {
        let client = create_test_client().with_max_results(100);
        let bars = client
            .search_nearby(center(), 50_000, &["bar".to_string()])
            .await
            .unwrap();
        assert_eq!(bars.len(), 15);
        assert!(bars.iter().all(|p| p.has_type("bar")));
    }

    #[tokio::test]
    async fn test_radius_limits_results() {
        let client = create_test_client();
        // 0.0005 deg lat is ~55 m, so 120 m covers p00..p02
        let places = client.search_nearby(center(), 120, &[]).await.unwrap();
        assert_eq!(places.len(), 3);
    }

    #[tokio::test]
    async fn test_invalid_center_is_malformed() {
        let client = create_test_client();
        let result = client.search_nearby(GeoPoint::new(95.0, 0.0), 500, &[]).await;
        assert!(matches!(result, Err(SearchError::Malformed(_))));
    }
}
