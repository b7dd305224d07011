//! # Sources Crate
//!
//! Where candidate places come from.
//!
//! ## Components
//!
//! ### Collaborator seams
//! - `SearchClient`: nearby search over a circle with type filters
//! - `PlaceCache`: optional key-value cache of raw search results
//!
//! ### Search parameters
//! Profile -> upstream type filters and the initial radius mapping.
//!
//! ### Offline implementations
//! - `FixtureSearchClient`: radius scan over a loaded `PlaceIndex`
//! - `InMemoryPlaceCache`: tokio `RwLock` map, cloneable handle
//!
//! ## Example Usage
//!
//! ```ignore
//! use sources::{FixtureSearchClient, SearchClient, SearchParams};
//! use place_data::PlaceIndex;
//! use std::sync::Arc;
//!
//! let index = Arc::new(PlaceIndex::load_from_file(path)?);
//! let client = FixtureSearchClient::new(index);
//!
//! let params = SearchParams::for_profile(&profile, 1_500);
//! let places = client
//!     .search_nearby(params.center, params.radius_meters, &params.type_filters)
//!     .await?;
//! ```

// Public modules
pub mod cache;
pub mod client;
pub mod fixture;
pub mod params;

// Re-export commonly used types
pub use cache::InMemoryPlaceCache;
pub use client::{cache_key, PlaceCache, SearchClient, SearchError};
pub use fixture::FixtureSearchClient;
pub use params::{radius_for_distance_range, SearchParams};
