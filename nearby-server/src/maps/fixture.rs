//! Fixture-backed maps provider for running without an API key.
//!
//! Loads a JSON file of places and serves both nearby searches and driving
//! times from it, as if they were live API responses.

use std::collections::HashMap;
use std::collections::hash_map;
use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;
use tracing::warn;

use crate::domain::{CandidateRecord, Coordinate, CoordinateKey, TravelTime};
use crate::pipeline::{
    DistanceMatrix, ElementStatus, MatrixElement, NearbyRequest, PlaceSearch, ProviderError,
};

use super::convert::convert_place;
use super::error::MapsError;
use super::types::PlaceResult;

#[derive(Debug, Deserialize)]
struct FixtureFile {
    places: Vec<FixturePlace>,
}

/// A place as the nearby search would return it, plus what the fixture
/// needs to answer searches and matrix requests.
#[derive(Debug, Deserialize)]
struct FixturePlace {
    #[serde(flatten)]
    place: PlaceResult,

    /// Extra search terms this place answers to besides its name.
    #[serde(default)]
    keywords: Vec<String>,

    /// Driving time from anywhere; absent means unreachable by car.
    drive_seconds: Option<u64>,
}

#[derive(Debug)]
struct Entry {
    record: CandidateRecord,
    keywords: Vec<String>,
    drive_seconds: Option<u64>,
}

impl Entry {
    fn matches(&self, keyword: &str) -> bool {
        let keyword = keyword.to_lowercase();
        self.record.name.to_lowercase().contains(&keyword)
            || self.keywords.iter().any(|k| k.to_lowercase() == keyword)
    }
}

/// Provider that serves places from a JSON fixture.
#[derive(Debug, Clone)]
pub struct FixtureProvider {
    entries: Arc<Vec<Entry>>,
    by_location: Arc<HashMap<CoordinateKey, Option<u64>>>,
}

impl FixtureProvider {
    /// Load a fixture file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, MapsError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| MapsError::Fixture(format!("failed to read {}: {e}", path.display())))?;
        Self::from_json(&json)
    }

    /// Parse fixture JSON. Places with invalid coordinates are skipped.
    pub fn from_json(json: &str) -> Result<Self, MapsError> {
        let file: FixtureFile = serde_json::from_str(json).map_err(|e| MapsError::Json {
            message: e.to_string(),
            body: Some(json.chars().take(500).collect()),
        })?;

        let mut entries = Vec::with_capacity(file.places.len());
        let mut by_location = HashMap::new();

        for fixture in file.places {
            let place_id = fixture.place.place_id.clone();
            let record = match convert_place(fixture.place) {
                Ok(record) => record,
                Err(e) => {
                    warn!(place_id = %place_id, error = %e, "skipping fixture place");
                    continue;
                }
            };

            match by_location.entry(record.location.key()) {
                hash_map::Entry::Vacant(slot) => {
                    slot.insert(fixture.drive_seconds);
                }
                hash_map::Entry::Occupied(existing) => {
                    warn!(
                        place_id = %place_id,
                        location = %record.location,
                        kept = ?existing.get(),
                        ignored = ?fixture.drive_seconds,
                        "fixture places share a location; keeping the first drive time"
                    );
                }
            }
            entries.push(Entry {
                record,
                keywords: fixture.keywords,
                drive_seconds: fixture.drive_seconds,
            });
        }

        if entries.is_empty() {
            return Err(MapsError::Fixture("fixture contains no usable places".to_string()));
        }

        Ok(Self {
            entries: Arc::new(entries),
            by_location: Arc::new(by_location),
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Places matching the keyword and type hint within the radius, in
    /// fixture order.
    pub fn search(&self, request: &NearbyRequest) -> Vec<CandidateRecord> {
        self.entries
            .iter()
            .filter(|e| e.matches(&request.keyword))
            .filter(|e| {
                request
                    .type_hint
                    .as_ref()
                    .is_none_or(|t| e.record.types.contains(t))
            })
            .filter(|e| {
                request.origin.distance_m(&e.record.location) <= f64::from(request.radius_m)
            })
            .map(|e| e.record.clone())
            .collect()
    }

    /// Driving time to one destination.
    pub fn drive_time(&self, destination: &Coordinate) -> MatrixElement {
        match self.by_location.get(&destination.key()) {
            Some(Some(seconds)) => Ok(TravelTime::from_seconds(*seconds)),
            Some(None) => Err(ElementStatus::ZeroResults),
            None => Err(ElementStatus::NotFound),
        }
    }

    /// Number of places reachable by car.
    pub fn reachable(&self) -> usize {
        self.entries.iter().filter(|e| e.drive_seconds.is_some()).count()
    }
}

impl PlaceSearch for FixtureProvider {
    async fn nearby(&self, request: &NearbyRequest) -> Result<Vec<CandidateRecord>, ProviderError> {
        Ok(self.search(request))
    }
}

impl DistanceMatrix for FixtureProvider {
    async fn driving_times(
        &self,
        _origin: Coordinate,
        destinations: &[Coordinate],
    ) -> Result<Vec<MatrixElement>, ProviderError> {
        Ok(destinations.iter().map(|d| self.drive_time(d)).collect())
    }
}
