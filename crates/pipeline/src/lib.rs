//! Scoring, compatibility filtering and pooling of place candidates.
//!
//! This crate provides:
//! - Filter trait and compatibility filters (place-type rules, budget, mood tolerance)
//! - FilterPipeline for composing filters
//! - MoodScorer for 0-100 mood scores and chill/neutral/hype labels
//! - CandidatePool, the deduplicating per-session store of scored places
//!
//! ## Architecture
//! Raw search results flow through the pool:
//! 1. Ids the session has already seen are dropped
//! 2. MoodScorer annotates the rest (sentiment calls fan out concurrently)
//! 3. The FilterPipeline removes places that don't suit the profile
//! 4. Survivors wait in the pool until withdrawn a page at a time
//!
//! ## Example Usage
//! ```ignore
//! use pipeline::{CandidatePool, FilterPipeline, MoodConfig, MoodScorer};
//! use std::sync::Arc;
//!
//! let scorer = MoodScorer::new(MoodConfig::default());
//! let filters = Arc::new(FilterPipeline::compatibility(None));
//! let mut pool = CandidatePool::new(profile.identity_key())
//!     .with_admission(filters, profile.clone());
//!
//! let added = pool.absorb(search_results, &scorer).await?;
//! pool.rank_by_compatibility(profile.mood);
//! let page = pool.withdraw(10);
//! ```

pub mod filter_pipeline;
pub mod filters;
pub mod mood;
pub mod pool;
pub mod traits;

// Re-export main types
pub use filter_pipeline::FilterPipeline;
pub use mood::{compatibility, MoodBreakdown, MoodConfig, MoodScorer};
pub use pool::CandidatePool;
pub use traits::Filter;
