//! Error types for discovery sessions.

use place_data::DataError;
use thiserror::Error;

/// Errors surfaced by the orchestrator.
///
/// Search failures are not errors here: they drive expansion and, when every
/// search failed, show up as `LoadingState::SearchUnavailable`.
#[derive(Error, Debug)]
pub enum DiscoveryError {
    #[error("Invalid filters: {0}")]
    InvalidFilters(#[from] DataError),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Pipeline(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, DiscoveryError>;
