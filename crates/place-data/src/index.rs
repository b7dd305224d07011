//! PlaceIndex building and radius queries.
//!
//! - Load a fixture into the primary id map
//! - Build the per-type secondary index
//! - Answer "places within R meters of here, optionally of these types"

use crate::error::{DataError, Result};
use crate::geo::haversine_meters;
use crate::parser;
use crate::types::*;
use rayon::prelude::*;
use std::cmp::Ordering;
use std::path::Path;
use tracing::info;

impl PlaceIndex {
    /// Load and index a places fixture file.
    ///
    /// Steps:
    /// 1. Parse the JSON fixture
    /// 2. Insert places, rejecting duplicate ids
    /// 3. Build the type index
    /// 4. Validate
    pub fn load_from_file(path: &Path) -> Result<Self> {
        info!("Loading places fixture from {:?}", path);
        let places = parser::parse_places(path)?;
        let index = Self::from_places(places)?;

        let (places, types) = index.counts();
        info!("Indexed {} places across {} types", places, types);
        Ok(index)
    }

    /// Build an index from already-parsed places
    pub fn from_places(places: Vec<Candidate>) -> Result<Self> {
        let mut index = PlaceIndex::new();
        for place in places {
            let id = place.id.clone();
            if !index.insert_place(place) {
                return Err(DataError::DuplicatePlace(id));
            }
        }
        index.build_type_index();
        index.validate()?;
        Ok(index)
    }

    /// Rebuild the type -> ids index from the primary map
    pub fn build_type_index(&mut self) {
        self.type_index.clear();
        for (id, place) in &self.places {
            for place_type in &place.types {
                self.type_index
                    .entry(place_type.clone())
                    .or_default()
                    .push(id.clone());
            }
        }
        for ids in self.type_index.values_mut() {
            ids.sort();
            ids.dedup();
        }
    }

    /// Validate every stored place
    pub fn validate(&self) -> Result<()> {
        for place in self.places.values() {
            parser::validate_place(place)?;
        }
        Ok(())
    }

    /// All places within `radius_meters` of `center`, nearest first.
    ///
    /// Distance ties are broken by id so results are reproducible.
    pub fn within_radius(&self, center: GeoPoint, radius_meters: f64) -> Vec<(f64, &Candidate)> {
        let mut hits: Vec<(f64, &Candidate)> = self
            .places
            .par_iter()
            .filter_map(|(_, place)| {
                let distance = haversine_meters(center, place.location);
                (distance <= radius_meters).then_some((distance, place))
            })
            .collect();

        hits.sort_by(|a, b| {
            a.0.partial_cmp(&b.0)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.1.id.cmp(&b.1.id))
        });
        hits
    }

    /// Places within the radius that carry at least one of `type_filters`.
    /// An empty filter list matches every type.
    pub fn search(&self, center: GeoPoint, radius_meters: f64, type_filters: &[String]) -> Vec<Candidate> {
        self.within_radius(center, radius_meters)
            .into_iter()
            .filter(|(_, place)| {
                type_filters.is_empty() || type_filters.iter().any(|t| place.has_type(t))
            })
            .map(|(_, place)| place.clone())
            .collect()
    }

    /// Every place id, sorted
    pub fn all_place_ids(&self) -> Vec<PlaceId> {
        let mut ids: Vec<PlaceId> = self.places.keys().cloned().collect();
        ids.sort();
        ids
    }
}
