//! # Discovery Crate
//!
//! Progressive place discovery: given a preference profile, find compatible
//! places near the user, widening the search radius a bounded number of
//! times, and serve them page by page.
//!
//! ## Main Components
//!
//! - **orchestrator**: `DiscoveryOrchestrator` (`discover_places`,
//!   `get_next_batch`, `reset`) and `ResetHandle`
//! - **expansion**: `ExpansionController` and `LoadingState`
//! - **config**: `DiscoveryConfig`
//! - **result**: `DiscoveryResult`, `ExpansionInfo`, `PoolInfo`
//! - **error**: `DiscoveryError`
//!
//! ## Example Usage
//!
//! ```ignore
//! use discovery::{DiscoveryConfig, DiscoveryOrchestrator};
//! use pipeline::{MoodConfig, MoodScorer};
//! use std::sync::Arc;
//!
//! let mut orchestrator = DiscoveryOrchestrator::new(search_client, MoodScorer::new(MoodConfig::default()))
//!     .with_config(DiscoveryConfig::default().with_page_size(5));
//!
//! let first = orchestrator.discover_places(&filters).await?;
//! let second = orchestrator.get_next_batch(&filters).await?;
//! ```

pub mod config;
pub mod error;
pub mod expansion;
pub mod orchestrator;
pub mod result;

pub use config::DiscoveryConfig;
pub use error::{DiscoveryError, Result};
pub use expansion::{ExpansionController, ExpansionState, LoadingState};
pub use orchestrator::{DiscoveryOrchestrator, ResetHandle};
pub use result::{DiscoveryResult, ExpansionInfo, PoolInfo};
