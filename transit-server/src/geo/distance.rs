//! Great-circle distance between points.

use std::cmp::Ordering;
use std::fmt;

use serde::Serialize;

use crate::domain::{InvalidCoordinate, Point};

/// Mean Earth radius in meters.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// A non-negative distance in meters.
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct Distance(f64);

impl Distance {
    pub const ZERO: Distance = Distance(0.0);

    pub const fn from_meters(meters: f64) -> Self {
        Self(meters)
    }

    pub const fn as_meters(&self) -> f64 {
        self.0
    }

    /// Total order over distances, for sorting.
    pub fn total_cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl fmt::Display for Distance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1} m", self.0)
    }
}

/// Haversine distance between two points on a sphere of radius
/// [`EARTH_RADIUS_M`].
///
/// Both points must pass [`Point::is_valid`]; the first one that does not
/// is returned as the error. The result is exactly symmetric and exactly
/// zero for coincident points.
///
/// # Examples
///
/// ```
/// use transit_server::domain::Point;
/// use transit_server::geo::distance;
///
/// let a = Point::new(0.0, 0.0);
/// let b = Point::new(0.0, 1.0);
/// let d = distance(a, b).unwrap();
/// assert!((d.as_meters() - 111_195.0).abs() < 50.0);
/// assert_eq!(distance(a, a).unwrap().as_meters(), 0.0);
/// ```
pub fn distance(a: Point, b: Point) -> Result<Distance, InvalidCoordinate> {
    if !a.is_valid() {
        return Err(InvalidCoordinate(a));
    }
    if !b.is_valid() {
        return Err(InvalidCoordinate(b));
    }

    let (a, b) = (normalized(a), normalized(b));

    // Evaluate in a fixed argument order so that swapping a and b yields
    // bit-identical results.
    let (p, q) = if canonical_order(&a, &b) == Ordering::Greater {
        (b, a)
    } else {
        (a, b)
    };

    let lat1 = p.latitude.to_radians();
    let lat2 = q.latitude.to_radians();
    let d_lat = lat2 - lat1;
    let d_lon = (q.longitude - p.longitude).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
    // Rounding can push h just outside [0, 1]
    let h = h.clamp(0.0, 1.0);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    Ok(Distance(EARTH_RADIUS_M * c))
}

/// One spelling per place: longitude -180 is 180, and every longitude at
/// a pole is 0.
fn normalized(p: Point) -> Point {
    if p.latitude.abs() == 90.0 {
        Point::new(0.0, p.latitude)
    } else if p.longitude == -180.0 {
        Point::new(180.0, p.latitude)
    } else {
        p
    }
}

fn canonical_order(a: &Point, b: &Point) -> Ordering {
    a.longitude
        .total_cmp(&b.longitude)
        .then(a.latitude.total_cmp(&b.latitude))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meters(a: Point, b: Point) -> f64 {
        distance(a, b).unwrap().as_meters()
    }

    #[test]
    fn coincident_points_are_zero() {
        assert_eq!(meters(Point::new(0.0, 0.0), Point::new(0.0, 0.0)), 0.0);
        let zocalo = Point::new(-99.1332, 19.4326);
        assert_eq!(meters(zocalo, zocalo), 0.0);
    }

    #[test]
    fn same_place_written_twice_is_zero() {
        assert_eq!(meters(Point::new(180.0, 0.0), Point::new(-180.0, 0.0)), 0.0);
        assert_eq!(meters(Point::new(-180.0, 45.0), Point::new(180.0, 45.0)), 0.0);
        assert_eq!(meters(Point::new(0.0, 90.0), Point::new(90.0, 90.0)), 0.0);
        assert_eq!(meters(Point::new(-120.0, -90.0), Point::new(33.0, -90.0)), 0.0);
    }

    #[test]
    fn one_degree_of_latitude_at_equator() {
        let d = meters(Point::new(0.0, 0.0), Point::new(0.0, 1.0));
        assert!((d - 111_195.0).abs() < 50.0, "got {d}");
    }

    #[test]
    fn nearby_stops_in_mexico_city() {
        let d = meters(Point::new(-99.1332, 19.4326), Point::new(-99.1340, 19.4330));
        assert!((90.0..=100.0).contains(&d), "got {d}");
    }

    #[test]
    fn nyc_to_la() {
        // Approximately 3,936 km
        let nyc = Point::new(-74.0060, 40.7128);
        let la = Point::new(-118.2437, 34.0522);
        assert!((meters(nyc, la) - 3_936_000.0).abs() < 50_000.0);
    }

    #[test]
    fn antipodes_do_not_produce_nan() {
        let d = meters(Point::new(0.0, 0.0), Point::new(180.0, 0.0));
        assert!(d.is_finite());
        assert!((d - std::f64::consts::PI * EARTH_RADIUS_M).abs() < 1.0);

        let d = meters(Point::new(0.0, 90.0), Point::new(0.0, -90.0));
        assert!(d.is_finite());
    }

    #[test]
    fn symmetric() {
        let a = Point::new(2.3514, 48.8580);
        let b = Point::new(-0.1249, 51.5052);
        assert_eq!(meters(a, b), meters(b, a));
    }

    #[test]
    fn invalid_inputs_rejected() {
        let ok = Point::new(0.0, 0.0);
        let bad = Point::new(0.0, 91.0);
        assert_eq!(distance(bad, ok).unwrap_err(), InvalidCoordinate(bad));
        assert_eq!(distance(ok, bad).unwrap_err(), InvalidCoordinate(bad));
        assert!(distance(ok, Point::new(f64::NAN, 0.0)).is_err());
    }

    #[test]
    fn distance_ordering_and_display() {
        assert!(Distance::from_meters(1000.0) > Distance::from_meters(500.0));
        assert_eq!(Distance::from_meters(92.345).to_string(), "92.3 m");
        assert_eq!(
            Distance::from_meters(1.0).total_cmp(&Distance::from_meters(1.0)),
            Ordering::Equal
        );
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn valid_point() -> impl Strategy<Value = Point> {
        (-180.0f64..=180.0, -90.0f64..=90.0).prop_map(|(lon, lat)| Point::new(lon, lat))
    }

    proptest! {
        /// distance(A, B) == distance(B, A), bit for bit
        #[test]
        fn symmetric(a in valid_point(), b in valid_point()) {
            prop_assert_eq!(distance(a, b).unwrap(), distance(b, a).unwrap());
        }

        /// distance(A, A) == 0
        #[test]
        fn identity(a in valid_point()) {
            prop_assert_eq!(distance(a, a).unwrap().as_meters(), 0.0);
        }

        /// Never negative, never more than half the circumference
        #[test]
        fn bounded(a in valid_point(), b in valid_point()) {
            let d = distance(a, b).unwrap().as_meters();
            prop_assert!(d >= 0.0);
            prop_assert!(d <= std::f64::consts::PI * EARTH_RADIUS_M + 1e-6);
        }

        /// Triangle inequality holds up to floating point error
        #[test]
        fn triangle_inequality(a in valid_point(), b in valid_point(), c in valid_point()) {
            let ab = distance(a, b).unwrap().as_meters();
            let bc = distance(b, c).unwrap().as_meters();
            let ac = distance(a, c).unwrap().as_meters();
            prop_assert!(ac <= ab + bc + 1.0, "ac={} ab={} bc={}", ac, ab, bc);
        }
    }
}
