//! # Discovery Orchestrator
//!
//! Drives one discovery session at a time:
//! 1. Validate the filters and derive the session identity
//! 2. Map the distance preference to an initial radius
//! 3. Search -> score -> filter -> pool, expanding the radius while the pool
//!    holds fewer compatible places than `min_results`
//! 4. Rank the pool by mood compatibility and serve a page
//!
//! Later pages come from the pool. A page request that finds the pool low
//! spends one more expansion to top it up; once the budget is gone and the
//! pool is empty the session reports `limitReached`.
//!
//! There is no internal locking: callers serialize calls on one orchestrator.
//! `ResetHandle` is the one exception, usable from any task to cancel the
//! session; results from searches in flight at that moment are discarded.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tracing::{debug, info, instrument, warn};

use pipeline::{CandidatePool, FilterPipeline, MoodScorer};
use place_data::{Candidate, PreferenceProfile, ValidatedProfile};
use sources::{cache_key, PlaceCache, SearchClient, SearchError, SearchParams};

use crate::config::DiscoveryConfig;
use crate::error::Result;
use crate::expansion::{ExpansionController, LoadingState};
use crate::result::{DiscoveryResult, ExpansionInfo, PoolInfo};

/// Cancels the orchestrator's current session from anywhere.
#[derive(Debug, Clone)]
pub struct ResetHandle {
    epoch: Arc<AtomicU64>,
}

impl ResetHandle {
    pub fn reset(&self) {
        self.epoch.fetch_add(1, Ordering::SeqCst);
    }
}

/// State owned by one discovery session
struct Session {
    profile: ValidatedProfile,
    params: SearchParams,
    pool: CandidatePool,
    expansion: ExpansionController,
    /// Orchestrator epoch when the session started
    epoch: u64,
    searches_succeeded: usize,
    last_error: Option<String>,
}

impl Session {
    fn key(&self) -> &str {
        self.pool.session_key()
    }
}

enum CycleOutcome {
    Absorbed,
    Failed,
    Cancelled,
}

enum LoopEnd {
    Settled,
    Cancelled,
}

pub struct DiscoveryOrchestrator {
    search: Arc<dyn SearchClient>,
    scorer: MoodScorer,
    cache: Option<Arc<dyn PlaceCache>>,
    /// Custom admission filters; the standard compatibility set when `None`
    filters: Option<Arc<FilterPipeline>>,
    config: DiscoveryConfig,
    session: Option<Session>,
    epoch: Arc<AtomicU64>,
}

impl DiscoveryOrchestrator {
    pub fn new(search: Arc<dyn SearchClient>, scorer: MoodScorer) -> Self {
        Self {
            search,
            scorer,
            cache: None,
            filters: None,
            config: DiscoveryConfig::default(),
            session: None,
            epoch: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Replace the configuration; applies to the next session.
    /// `page_size` and `step_meters` are raised to at least 1.
    pub fn with_config(mut self, mut config: DiscoveryConfig) -> Self {
        config.page_size = config.page_size.max(1);
        config.step_meters = config.step_meters.max(1);
        self.scorer = self.scorer.with_concurrency(config.sentiment_concurrency);
        self.config = config;
        self
    }

    pub fn with_cache(mut self, cache: Arc<dyn PlaceCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Use `filters` instead of the standard compatibility pipeline
    pub fn with_filters(mut self, filters: FilterPipeline) -> Self {
        self.filters = Some(Arc::new(filters));
        self
    }

    pub fn config(&self) -> &DiscoveryConfig {
        &self.config
    }

    pub fn reset_handle(&self) -> ResetHandle {
        ResetHandle {
            epoch: self.epoch.clone(),
        }
    }

    /// Start (or continue) discovery for `filters`.
    ///
    /// Invalid filters fail before any search. Filters identical to the
    /// active session's serve that session's next page; anything else
    /// replaces the session.
    #[instrument(skip(self, filters), fields(category = ?filters.category, mood = ?filters.mood))]
    pub async fn discover_places(&mut self, filters: &PreferenceProfile) -> Result<DiscoveryResult> {
        let profile = filters.validate()?;
        if self.has_live_session(profile.identity_key()) {
            debug!("Filters unchanged, continuing the active session");
            return self.next_page().await;
        }
        self.start_session(profile).await
    }

    /// Next page of the session for `filters`, starting one if needed.
    #[instrument(skip(self, filters))]
    pub async fn get_next_batch(&mut self, filters: &PreferenceProfile) -> Result<DiscoveryResult> {
        let profile = filters.validate()?;
        if !self.has_live_session(profile.identity_key()) {
            return self.start_session(profile).await;
        }
        self.next_page().await
    }

    /// Drop the session (pool and expansion state). Idempotent.
    pub fn reset(&mut self) {
        self.epoch.fetch_add(1, Ordering::SeqCst);
        if let Some(session) = self.session.take() {
            info!(
                served = session.pool.served_count(),
                remaining = session.pool.remaining_count(),
                "Discovery session reset"
            );
        }
    }

    pub fn loading_state(&self) -> LoadingState {
        self.live_session()
            .map(|s| s.expansion.phase())
            .unwrap_or(LoadingState::Idle)
    }

    pub fn expansion_info(&self) -> Option<ExpansionInfo> {
        self.live_session().map(expansion_info)
    }

    pub fn pool_info(&self) -> Option<PoolInfo> {
        let min_results = self.config.min_results;
        self.live_session().map(|s| pool_info(s, min_results))
    }

    /// Identity key of the active session
    pub fn session_key(&self) -> Option<&str> {
        self.live_session().map(Session::key)
    }

    fn live_session(&self) -> Option<&Session> {
        let current = self.epoch.load(Ordering::SeqCst);
        self.session.as_ref().filter(|s| s.epoch == current)
    }

    /// Drops a session invalidated through a `ResetHandle`, then reports
    /// whether a session for `key` is active.
    fn has_live_session(&mut self, key: &str) -> bool {
        let current = self.epoch.load(Ordering::SeqCst);
        if self.session.as_ref().is_some_and(|s| s.epoch != current) {
            debug!("Dropping session cancelled by reset handle");
            self.session = None;
        }
        self.session.as_ref().is_some_and(|s| s.key() == key)
    }

    fn is_stale(&self, session: &Session) -> bool {
        self.epoch.load(Ordering::SeqCst) != session.epoch
    }

    async fn start_session(&mut self, profile: ValidatedProfile) -> Result<DiscoveryResult> {
        // A previous session for other filters ends here
        self.session = None;

        let radius = self.config.initial_radius(profile.distance_range);
        let filters = self
            .filters
            .clone()
            .unwrap_or_else(|| Arc::new(FilterPipeline::compatibility(self.config.mood_tolerance)));
        let mut expansion =
            ExpansionController::new(self.config.max_expansions, self.config.step_meters);
        expansion.begin(radius);

        let mut session = Session {
            params: SearchParams::for_profile(&profile, radius),
            pool: CandidatePool::new(profile.identity_key()).with_admission(filters, profile.clone()),
            profile,
            expansion,
            epoch: self.epoch.load(Ordering::SeqCst),
            searches_succeeded: 0,
            last_error: None,
        };
        info!(
            radius,
            types = session.params.type_filters.len(),
            "Starting discovery session"
        );

        match self.run_expansion(&mut session).await? {
            LoopEnd::Cancelled => Ok(DiscoveryResult::idle()),
            LoopEnd::Settled => Ok(self.settle(session)),
        }
    }

    async fn next_page(&mut self) -> Result<DiscoveryResult> {
        let Some(mut session) = self.session.take() else {
            return Ok(DiscoveryResult::idle());
        };
        let min_results = self.config.min_results;

        let end = match session.expansion.phase() {
            LoadingState::SearchUnavailable => {
                info!(
                    radius = session.expansion.current_radius(),
                    "Retrying search after the data source was unavailable"
                );
                session.expansion.resume();
                self.run_expansion(&mut session).await?
            }
            LoadingState::LimitReached => LoopEnd::Settled,
            _ if session.pool.needs_refresh(min_results) && session.expansion.can_expand() => {
                self.top_up(&mut session).await?
            }
            _ => LoopEnd::Settled,
        };

        match end {
            LoopEnd::Cancelled => Ok(DiscoveryResult::idle()),
            LoopEnd::Settled => Ok(self.settle(session)),
        }
    }

    /// Search at the current radius, expanding while results are short.
    async fn run_expansion(&self, session: &mut Session) -> Result<LoopEnd> {
        loop {
            if let CycleOutcome::Cancelled = self.search_cycle(session).await? {
                return Ok(LoopEnd::Cancelled);
            }

            let compatible = session.pool.total_admitted();
            match session.expansion.on_result(compatible, self.config.min_results) {
                LoadingState::Expanding => {
                    if let Some(radius) = session.expansion.expand() {
                        info!(
                            radius,
                            compatible,
                            expansion = session.expansion.expansion_count(),
                            "Too few results, expanding search radius"
                        );
                    }
                }
                _ => break,
            }
        }

        if session.searches_succeeded == 0 {
            warn!(
                radius = session.expansion.current_radius(),
                "Every search in this session failed"
            );
            session.expansion.suspend();
        }
        Ok(LoopEnd::Settled)
    }

    /// The pool is low: spend one expansion on a single wider search. An
    /// empty result leaves the rest of the budget to later pages.
    async fn top_up(&self, session: &mut Session) -> Result<LoopEnd> {
        if let Some(radius) = session.expansion.expand() {
            info!(
                radius,
                remaining = session.pool.remaining_count(),
                expansion = session.expansion.expansion_count(),
                "Pool running low, topping up at a wider radius"
            );
            if let CycleOutcome::Cancelled = self.search_cycle(session).await? {
                return Ok(LoopEnd::Cancelled);
            }
        }
        session.expansion.settle_complete();
        Ok(LoopEnd::Settled)
    }

    /// One search/absorb cycle at the session's current radius.
    #[instrument(skip(self, session), fields(radius = session.expansion.current_radius()))]
    async fn search_cycle(&self, session: &mut Session) -> Result<CycleOutcome> {
        let params = session.params.at_radius(session.expansion.current_radius());
        let fetched = self.fetch(session.key(), &params).await;

        if self.is_stale(session) {
            info!("Session reset during search, discarding results");
            return Ok(CycleOutcome::Cancelled);
        }

        let places = match fetched {
            Ok(places) => places,
            Err(e) => {
                warn!(radius = params.radius_meters, "Search failed: {}", e);
                session.last_error = Some(e.to_string());
                return Ok(CycleOutcome::Failed);
            }
        };
        session.searches_succeeded += 1;
        session.last_error = None;

        let fetched_count = places.len();
        let added = session.pool.absorb(places, &self.scorer).await?;

        if self.is_stale(session) {
            info!("Session reset while scoring, discarding results");
            return Ok(CycleOutcome::Cancelled);
        }

        info!(
            radius = params.radius_meters,
            fetched = fetched_count,
            added,
            expansion = session.expansion.expansion_count(),
            remaining = session.pool.remaining_count(),
            "Search cycle complete"
        );
        Ok(CycleOutcome::Absorbed)
    }

    /// Search through the cache when one is configured
    async fn fetch(
        &self,
        identity: &str,
        params: &SearchParams,
    ) -> std::result::Result<Vec<Candidate>, SearchError> {
        let key = cache_key(identity, params.radius_meters);
        if let Some(cache) = &self.cache {
            if let Some(places) = cache.get(&key).await {
                debug!(radius = params.radius_meters, places = places.len(), "Serving search from cache");
                return Ok(places);
            }
        }

        let places = self
            .search
            .search_nearby(params.center, params.radius_meters, &params.type_filters)
            .await?;

        if let Some(cache) = &self.cache {
            cache.set(&key, places.clone()).await;
        }
        Ok(places)
    }

    /// Serve a page from `session`, store it, and describe the outcome.
    fn settle(&mut self, mut session: Session) -> DiscoveryResult {
        let min_results = self.config.min_results;

        session.pool.rank_by_compatibility(session.profile.mood);
        let places = session.pool.withdraw(self.config.page_size);

        if places.is_empty()
            && session.expansion.phase() == LoadingState::Complete
            && !session.expansion.can_expand()
        {
            info!("Pool exhausted with no expansion budget left");
            session.expansion.declare_limit();
        }

        let result = DiscoveryResult {
            places,
            loading_state: session.expansion.phase(),
            expansion_info: Some(expansion_info(&session)),
            pool_info: Some(pool_info(&session, min_results)),
            last_error: session.last_error.clone(),
        };
        self.session = Some(session);
        result
    }
}

fn expansion_info(session: &Session) -> ExpansionInfo {
    ExpansionInfo {
        expansion_count: session.expansion.expansion_count(),
        final_radius: session.expansion.current_radius(),
        total_places_found: session.pool.total_admitted(),
    }
}

fn pool_info(session: &Session, min_results: usize) -> PoolInfo {
    PoolInfo {
        remaining_places: session.pool.remaining_count(),
        needs_refresh: session.pool.needs_refresh(min_results),
    }
}
