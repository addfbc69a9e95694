//! Geographic points.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Error returned when a malformed point reaches a distance computation.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
#[error("invalid coordinate: {0}")]
pub struct InvalidCoordinate(pub Point);

/// A `(longitude, latitude)` pair in degrees.
///
/// Construction is unchecked: points are read from stored documents and may
/// be out of range. Use [`Point::is_valid`] (or [`Point::validated`]) before
/// handing a point to anything that computes with it.
///
/// Serializes as a GeoJSON position, `[longitude, latitude]`.
///
/// # Examples
///
/// ```
/// use transit_server::domain::Point;
///
/// let zocalo = Point::new(-99.1332, 19.4326);
/// assert!(zocalo.is_valid());
///
/// assert!(!Point::new(181.0, 0.0).is_valid());
/// assert!(!Point::new(0.0, f64::NAN).is_valid());
/// ```
#[derive(Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Point {
    pub longitude: f64,
    pub latitude: f64,
}

impl Point {
    /// Create a point without validating it.
    pub const fn new(longitude: f64, latitude: f64) -> Self {
        Self {
            longitude,
            latitude,
        }
    }

    /// Build a point from a raw GeoJSON position.
    ///
    /// Returns `None` unless the position has exactly two elements.
    pub fn from_position(position: &[f64]) -> Option<Self> {
        match position {
            [longitude, latitude] => Some(Self::new(*longitude, *latitude)),
            _ => None,
        }
    }

    /// True if both components are finite, `|longitude| <= 180` and
    /// `|latitude| <= 90`.
    pub fn is_valid(&self) -> bool {
        self.longitude.is_finite()
            && self.latitude.is_finite()
            && self.longitude.abs() <= 180.0
            && self.latitude.abs() <= 90.0
    }
}

impl From<[f64; 2]> for Point {
    fn from([longitude, latitude]: [f64; 2]) -> Self {
        Self::new(longitude, latitude)
    }
}

impl From<Point> for [f64; 2] {
    fn from(point: Point) -> Self {
        [point.longitude, point.latitude]
    }
}

impl fmt::Debug for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Point({}, {})", self.longitude, self.latitude)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.longitude, self.latitude)
    }
}
