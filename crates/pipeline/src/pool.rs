//! Session-scoped candidate pool.
//!
//! ## Bookkeeping
//! - `seen`: every id ever offered to `absorb` this session, admitted or not
//! - `available`: scored, compatible candidates not yet served, in absorption order
//! - `served`: ids already handed out by `withdraw`
//!
//! An id enters `seen` exactly once, so re-absorbing a known place is a no-op.

use crate::filter_pipeline::FilterPipeline;
use crate::mood::{compatibility, MoodScorer};
use anyhow::Result;
use place_data::{Candidate, PlaceId, ScoredCandidate, ValidatedProfile};
use std::cmp::Reverse;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::debug;

/// Admission stage applied to newly scored candidates
struct Admission {
    pipeline: Arc<FilterPipeline>,
    profile: ValidatedProfile,
}

pub struct CandidatePool {
    session_key: String,
    seen: HashSet<PlaceId>,
    available: Vec<ScoredCandidate>,
    served: HashSet<PlaceId>,
    admission: Option<Admission>,
}

impl CandidatePool {
    pub fn new(session_key: impl Into<String>) -> Self {
        Self {
            session_key: session_key.into(),
            seen: HashSet::new(),
            available: Vec::new(),
            served: HashSet::new(),
            admission: None,
        }
    }

    /// Only admit candidates that survive `pipeline` for `profile`
    pub fn with_admission(mut self, pipeline: Arc<FilterPipeline>, profile: ValidatedProfile) -> Self {
        self.admission = Some(Admission { pipeline, profile });
        self
    }

    pub fn session_key(&self) -> &str {
        &self.session_key
    }

    /// Merge a search result into the pool.
    ///
    /// Unknown ids are marked seen, scored as one concurrent batch, passed
    /// through the admission filters and appended. Returns how many were
    /// added to `available`.
    pub async fn absorb(&mut self, candidates: Vec<Candidate>, scorer: &MoodScorer) -> Result<usize> {
        let offered = candidates.len();
        let fresh: Vec<Candidate> = candidates
            .into_iter()
            .filter(|c| self.seen.insert(c.id.clone()))
            .collect();
        let fresh_count = fresh.len();

        if fresh.is_empty() {
            debug!("Absorbed 0 of {} offered (all previously seen)", offered);
            return Ok(0);
        }

        let scored = scorer.score_batch(fresh).await;
        let admitted = match &self.admission {
            Some(admission) => admission.pipeline.apply(scored, &admission.profile)?,
            None => scored,
        };

        let added = admitted.len();
        self.available.extend(admitted);
        debug!(
            "Absorbed {} of {} offered ({} new, {} incompatible)",
            added,
            offered,
            fresh_count,
            fresh_count - added
        );
        Ok(added)
    }

    /// Move up to `n` candidates from the front of `available` to `served`.
    pub fn withdraw(&mut self, n: usize) -> Vec<ScoredCandidate> {
        let take = n.min(self.available.len());
        let batch: Vec<ScoredCandidate> = self.available.drain(..take).collect();
        for candidate in &batch {
            self.served.insert(candidate.candidate.id.clone());
        }
        batch
    }

    pub fn remaining_count(&self) -> usize {
        self.available.len()
    }

    pub fn needs_refresh(&self, min_threshold: usize) -> bool {
        self.remaining_count() < min_threshold
    }

    pub fn served_count(&self) -> usize {
        self.served.len()
    }

    pub fn seen_count(&self) -> usize {
        self.seen.len()
    }

    /// Compatible candidates admitted this session (remaining + served)
    pub fn total_admitted(&self) -> usize {
        self.available.len() + self.served.len()
    }

    pub fn has_seen(&self, id: &str) -> bool {
        self.seen.contains(id)
    }

    pub fn is_served(&self, id: &str) -> bool {
        self.served.contains(id)
    }

    /// Peek at the unserved candidates in serving order
    pub fn available(&self) -> &[ScoredCandidate] {
        &self.available
    }

    /// Reorder `available` by compatibility with `target_mood`, best first.
    /// Stable, so equally compatible places keep absorption order.
    pub fn rank_by_compatibility(&mut self, target_mood: u8) {
        self.available
            .sort_by_key(|c| Reverse(compatibility(c.mood_score, target_mood)));
    }

    /// Forget everything absorbed and served; the session key is kept.
    pub fn reset(&mut self) {
        self.seen.clear();
        self.available.clear();
        self.served.clear();
    }
}
