//! Maps web-service response DTOs.
//!
//! These types map directly to the Nearby Search and Distance Matrix JSON
//! responses. Fields the service omits on error statuses are optional or
//! defaulted.

use serde::Deserialize;

/// Response from `place/nearbysearch/json`.
#[derive(Debug, Clone, Deserialize)]
pub struct NearbySearchResponse {
    /// `OK`, `ZERO_RESULTS`, `OVER_QUERY_LIMIT`, `REQUEST_DENIED`, ...
    pub status: String,

    #[serde(default)]
    pub results: Vec<PlaceResult>,

    pub error_message: Option<String>,

    /// Present when more than one page of results exists. Not followed.
    pub next_page_token: Option<String>,
}

/// One place in a nearby search response.
#[derive(Debug, Clone, Deserialize)]
pub struct PlaceResult {
    pub place_id: String,

    pub name: String,

    /// Short address; nearby search returns this instead of a full one.
    pub vicinity: Option<String>,

    pub formatted_address: Option<String>,

    pub geometry: Geometry,

    #[serde(default)]
    pub types: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Geometry {
    pub location: LatLng,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

/// Response from `distancematrix/json`.
#[derive(Debug, Clone, Deserialize)]
pub struct DistanceMatrixResponse {
    pub status: String,

    /// One row per origin; we always send a single origin.
    #[serde(default)]
    pub rows: Vec<MatrixRow>,

    pub error_message: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MatrixRow {
    /// One element per destination, in request order.
    #[serde(default)]
    pub elements: Vec<MatrixCell>,
}

/// Origin/destination pair result.
#[derive(Debug, Clone, Deserialize)]
pub struct MatrixCell {
    pub status: String,

    pub duration: Option<TextValue>,

    pub distance: Option<TextValue>,
}

/// A quantity with its human-readable form, e.g. `{ "value": 610, "text": "10 mins" }`.
#[derive(Debug, Clone, Deserialize)]
pub struct TextValue {
    pub value: Option<u64>,
    pub text: Option<String>,
}
