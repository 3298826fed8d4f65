//! Geographic coordinate type.

use std::fmt;

use geo::{Distance, Haversine, Point};
use serde::Serialize;

/// Decimal places kept when a coordinate is used as a lookup key.
///
/// Seven places is the precision users paste from map apps
/// (e.g. "22.2898675,113.9412633"), roughly a centimetre on the ground.
const KEY_SCALE: f64 = 1e7;

/// Error returned when a coordinate is malformed or out of range.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid coordinate: {reason}")]
pub struct InvalidCoordinate {
    reason: &'static str,
}

impl InvalidCoordinate {
    fn new(reason: &'static str) -> Self {
        Self { reason }
    }
}

/// A WGS84 position in decimal degrees.
///
/// Both components are finite, latitude is within [-90, 90] and longitude
/// within [-180, 180]. A `Coordinate` can only be obtained through
/// [`Coordinate::new`] or [`Coordinate::parse`], so holders can trust it.
///
/// # Examples
///
/// ```
/// use nearby_server::domain::Coordinate;
///
/// let origin = Coordinate::parse("22.2898675, 113.9412633").unwrap();
/// assert_eq!(origin.lat(), 22.2898675);
/// assert_eq!(origin.lng(), 113.9412633);
///
/// assert!(Coordinate::parse("22.28,abc").is_err());
/// assert!(Coordinate::parse("95.0,113.9").is_err());
/// ```
#[derive(Clone, Copy, PartialEq, Serialize)]
pub struct Coordinate {
    lat: f64,
    lng: f64,
}

impl Coordinate {
    /// Build a coordinate from latitude and longitude in degrees.
    pub fn new(lat: f64, lng: f64) -> Result<Self, InvalidCoordinate> {
        if !lat.is_finite() || !lng.is_finite() {
            return Err(InvalidCoordinate::new("components must be finite numbers"));
        }
        if !(-90.0..=90.0).contains(&lat) {
            return Err(InvalidCoordinate::new("latitude must be within [-90, 90]"));
        }
        if !(-180.0..=180.0).contains(&lng) {
            return Err(InvalidCoordinate::new(
                "longitude must be within [-180, 180]",
            ));
        }
        Ok(Self { lat, lng })
    }

    /// Parse a `"lat,lng"` string.
    ///
    /// Whitespace around either half is ignored. Exactly one comma is allowed.
    pub fn parse(s: &str) -> Result<Self, InvalidCoordinate> {
        let (lat, lng) = s
            .split_once(',')
            .ok_or_else(|| InvalidCoordinate::new("expected \"lat,lng\""))?;

        if lng.contains(',') {
            return Err(InvalidCoordinate::new("expected exactly one comma"));
        }

        let lat: f64 = lat
            .trim()
            .parse()
            .map_err(|_| InvalidCoordinate::new("latitude is not a number"))?;
        let lng: f64 = lng
            .trim()
            .parse()
            .map_err(|_| InvalidCoordinate::new("longitude is not a number"))?;

        Self::new(lat, lng)
    }

    /// Latitude in degrees.
    pub fn lat(&self) -> f64 {
        self.lat
    }

    /// Longitude in degrees.
    pub fn lng(&self) -> f64 {
        self.lng
    }

    /// Great-circle distance to `other` in metres.
    pub fn distance_m(&self, other: &Coordinate) -> f64 {
        Haversine.distance(self.to_point(), other.to_point())
    }

    /// Canonical key with the coordinate rounded to seven decimal places.
    ///
    /// Numerically equal inputs produce equal keys regardless of how
    /// they were written.
    pub fn key(&self) -> CoordinateKey {
        CoordinateKey {
            lat_e7: (self.lat * KEY_SCALE).round() as i64,
            lng_e7: (self.lng * KEY_SCALE).round() as i64,
        }
    }

    fn to_point(self) -> Point<f64> {
        Point::new(self.lng, self.lat)
    }
}

impl fmt::Debug for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Coordinate({}, {})", self.lat, self.lng)
    }
}

/// Formats as `"lat,lng"`, the form the mapping web services accept.
impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.lat, self.lng)
    }
}

/// A coordinate rounded to a fixed precision, usable as a hash key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CoordinateKey {
    lat_e7: i64,
    lng_e7: i64,
}
