//! In-memory `PlaceCache`.

use crate::client::PlaceCache;
use async_trait::async_trait;
use place_data::Candidate;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// Process-local search result cache, shareable across sessions
#[derive(Clone, Default)]
pub struct InMemoryPlaceCache {
    entries: Arc<RwLock<HashMap<String, Vec<Candidate>>>>,
}

impl InMemoryPlaceCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    pub async fn clear(&self) {
        self.entries.write().await.clear();
    }
}

#[async_trait]
impl PlaceCache for InMemoryPlaceCache {
    async fn get(&self, key: &str) -> Option<Vec<Candidate>> {
        let entries = self.entries.read().await;
        let hit = entries.get(key).cloned();
        debug!(key, hit = hit.is_some(), "place cache lookup");
        hit
    }

    async fn set(&self, key: &str, places: Vec<Candidate>) {
        let mut entries = self.entries.write().await;
        entries.insert(key.to_string(), places);
    }
}
