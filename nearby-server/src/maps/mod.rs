//! Maps web-service providers.
//!
//! This module binds the pipeline's provider traits to the Google Maps
//! web services (Nearby Search and Distance Matrix), and to a JSON fixture
//! for running without credentials.
//!
//! Key characteristics of the web services:
//! - Every response carries a `status` field; HTTP 200 does not mean success
//! - `ZERO_RESULTS` is a normal, empty answer
//! - Distance Matrix accepts at most 25 destinations per request and reports
//!   a status per destination

mod backend;
mod client;
mod convert;
mod error;
mod fixture;
mod types;

pub use backend::MapsBackend;
pub use client::{MapsClient, MapsConfig};
pub use convert::{convert_cell, convert_matrix, convert_nearby, convert_place};
pub use error::MapsError;
pub use fixture::FixtureProvider;
pub use types::{
    DistanceMatrixResponse, Geometry, LatLng, MatrixCell, MatrixRow, NearbySearchResponse,
    PlaceResult, TextValue,
};
