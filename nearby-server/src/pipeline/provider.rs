//! External collaborators the pipeline calls: place search and the
//! driving-time matrix.
//!
//! These traits let the pipeline be tested with scripted providers and run
//! against either the live mapping service or a fixture file.

use std::fmt;
use std::future::Future;

use crate::domain::{CandidateRecord, Coordinate, TravelTime};

/// A provider call that did not succeed.
///
/// The pipeline never propagates these: a failed search contributes no
/// candidates and a failed batch contributes no results.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProviderError {
    /// The provider answered with a non-success status
    #[error("provider status {status}: {message}")]
    Status { status: String, message: String },

    /// The provider could not be reached or refused the credentials
    #[error("provider unavailable: {0}")]
    Unavailable(String),

    /// The response could not be understood
    #[error("malformed provider response: {0}")]
    Malformed(String),
}

/// A single keyword search around the origin.
#[derive(Debug, Clone, PartialEq)]
pub struct NearbyRequest {
    pub origin: Coordinate,
    pub radius_m: u32,
    pub keyword: String,
    /// Provider place type to restrict results to.
    pub type_hint: Option<String>,
}

/// Why a single destination in a matrix response has no duration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ElementStatus {
    /// Origin or destination could not be geocoded
    NotFound,
    /// No driving route exists
    ZeroResults,
    /// Route too long for the provider to compute
    MaxRouteLengthExceeded,
    Other(String),
}

impl ElementStatus {
    /// Map a provider status string. `"OK"` is not an element failure and
    /// maps to `Other`; callers check for it first.
    pub fn from_status(status: &str) -> Self {
        match status {
            "NOT_FOUND" => ElementStatus::NotFound,
            "ZERO_RESULTS" => ElementStatus::ZeroResults,
            "MAX_ROUTE_LENGTH_EXCEEDED" => ElementStatus::MaxRouteLengthExceeded,
            other => ElementStatus::Other(other.to_string()),
        }
    }
}

impl fmt::Display for ElementStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElementStatus::NotFound => f.write_str("NOT_FOUND"),
            ElementStatus::ZeroResults => f.write_str("ZERO_RESULTS"),
            ElementStatus::MaxRouteLengthExceeded => f.write_str("MAX_ROUTE_LENGTH_EXCEEDED"),
            ElementStatus::Other(s) => f.write_str(s),
        }
    }
}

/// Driving time to one destination, or why there is none.
pub type MatrixElement = Result<TravelTime, ElementStatus>;

/// Searches for places near a coordinate.
pub trait PlaceSearch {
    /// Run one keyword search.
    ///
    /// "No results" is `Ok(vec![])`; any other non-success status is an
    /// error. Returned records are unlabelled.
    fn nearby(
        &self,
        request: &NearbyRequest,
    ) -> impl Future<Output = Result<Vec<CandidateRecord>, ProviderError>> + Send;
}

/// Computes driving times from one origin to many destinations.
pub trait DistanceMatrix {
    /// Returns one element per destination, in destination order.
    fn driving_times(
        &self,
        origin: Coordinate,
        destinations: &[Coordinate],
    ) -> impl Future<Output = Result<Vec<MatrixElement>, ProviderError>> + Send;
}
