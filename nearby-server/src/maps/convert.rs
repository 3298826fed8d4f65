//! Conversion from maps DTOs to domain types.

use tracing::warn;

use crate::domain::{CandidateRecord, Coordinate, InvalidCoordinate, TravelTime};
use crate::pipeline::{ElementStatus, MatrixElement};

use super::error::MapsError;
use super::types::{DistanceMatrixResponse, MatrixCell, NearbySearchResponse, PlaceResult};

const STATUS_OK: &str = "OK";
const STATUS_ZERO_RESULTS: &str = "ZERO_RESULTS";

/// Convert a nearby search response into candidate records.
///
/// `ZERO_RESULTS` is an empty list. Places with unusable coordinates are
/// skipped.
pub fn convert_nearby(response: NearbySearchResponse) -> Result<Vec<CandidateRecord>, MapsError> {
    match response.status.as_str() {
        STATUS_OK => {}
        STATUS_ZERO_RESULTS => return Ok(Vec::new()),
        _ => {
            return Err(MapsError::Status {
                status: response.status,
                message: response.error_message.unwrap_or_default(),
            });
        }
    }

    let mut records = Vec::with_capacity(response.results.len());
    for place in response.results {
        let place_id = place.place_id.clone();
        match convert_place(place) {
            Ok(record) => records.push(record),
            Err(e) => warn!(place_id = %place_id, error = %e, "skipping place"),
        }
    }
    Ok(records)
}

/// Convert a single place. The vicinity is preferred over the formatted
/// address; blank addresses count as missing.
pub fn convert_place(place: PlaceResult) -> Result<CandidateRecord, InvalidCoordinate> {
    let location = Coordinate::new(place.geometry.location.lat, place.geometry.location.lng)?;
    let address = place
        .vicinity
        .or(place.formatted_address)
        .filter(|a| !a.trim().is_empty());

    let mut record =
        CandidateRecord::new(place.place_id, place.name, location).with_types(place.types);
    record.address = address;
    Ok(record)
}

/// Convert a distance matrix response for a single origin.
///
/// The element count is not checked here; the batcher rejects responses
/// that do not match the request.
pub fn convert_matrix(response: DistanceMatrixResponse) -> Result<Vec<MatrixElement>, MapsError> {
    if response.status != STATUS_OK {
        return Err(MapsError::Status {
            status: response.status,
            message: response.error_message.unwrap_or_default(),
        });
    }

    let elements = response
        .rows
        .into_iter()
        .next()
        .map(|row| row.elements)
        .unwrap_or_default();

    Ok(elements.into_iter().map(convert_cell).collect())
}

/// Duration seconds win; the display text is parsed only when seconds are
/// missing.
pub fn convert_cell(cell: MatrixCell) -> MatrixElement {
    if cell.status != STATUS_OK {
        return Err(ElementStatus::from_status(&cell.status));
    }

    let duration = cell
        .duration
        .ok_or_else(|| ElementStatus::Other("MISSING_DURATION".to_string()))?;

    if let Some(seconds) = duration.value {
        return Ok(TravelTime::from_seconds(seconds));
    }

    duration
        .text
        .as_deref()
        .and_then(TravelTime::parse_text)
        .ok_or_else(|| ElementStatus::Other("UNPARSEABLE_DURATION".to_string()))
}
