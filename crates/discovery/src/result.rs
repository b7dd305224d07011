//! What each orchestrator call hands back.

use crate::expansion::LoadingState;
use place_data::ScoredCandidate;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpansionInfo {
    pub expansion_count: u32,
    pub final_radius: u32,
    /// Compatible places admitted this session, served or not
    pub total_places_found: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolInfo {
    pub remaining_places: usize,
    pub needs_refresh: bool,
}

/// One page of results plus the session status needed to render progress
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscoveryResult {
    pub places: Vec<ScoredCandidate>,
    pub loading_state: LoadingState,
    pub expansion_info: Option<ExpansionInfo>,
    pub pool_info: Option<PoolInfo>,
    /// Most recent search failure in the session, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
}

impl DiscoveryResult {
    /// Empty result for a session that no longer exists
    pub fn idle() -> Self {
        Self {
            places: Vec::new(),
            loading_state: LoadingState::Idle,
            expansion_info: None,
            pool_info: None,
            last_error: None,
        }
    }

    pub fn is_limit_reached(&self) -> bool {
        self.loading_state == LoadingState::LimitReached
    }

    pub fn is_unavailable(&self) -> bool {
        self.loading_state == LoadingState::SearchUnavailable
    }
}
