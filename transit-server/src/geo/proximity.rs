//! Radius search over a set of candidate points.
//!
//! The search is a linear scan: every candidate is measured against the
//! origin, so a request costs one distance computation per candidate plus a
//! sort of the matches. At the size of a city's bus network that is cheaper
//! than building and maintaining an index. A spatial index can replace the
//! scan behind [`find_nearby`] without changing its contract.

use std::fmt;
use std::str::FromStr;

use crate::domain::{InvalidCoordinate, Point};

use super::distance::{Distance, distance};

/// Error returned for a search radius that is not a positive number.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid radius {0:?}: must be a positive number of meters")]
pub struct InvalidRadius(pub String);

/// A positive, finite search radius.
///
/// # Examples
///
/// ```
/// use transit_server::geo::Radius;
///
/// assert_eq!(Radius::default().as_meters(), 500.0);
/// assert_eq!("250".parse::<Radius>().unwrap().as_meters(), 250.0);
///
/// assert!(Radius::from_meters(0.0).is_err());
/// assert!("-5".parse::<Radius>().is_err());
/// assert!("far".parse::<Radius>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Radius(f64);

impl Radius {
    /// Radius used when a caller does not give one.
    pub const DEFAULT: Radius = Radius(500.0);

    pub fn from_meters(meters: f64) -> Result<Self, InvalidRadius> {
        if meters.is_finite() && meters > 0.0 {
            Ok(Self(meters))
        } else {
            Err(InvalidRadius(meters.to_string()))
        }
    }

    pub fn as_meters(&self) -> f64 {
        self.0
    }

    /// True if `d` is within the radius. The boundary is inclusive.
    pub fn contains(&self, d: Distance) -> bool {
        d.as_meters() <= self.0
    }
}

impl Default for Radius {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl FromStr for Radius {
    type Err = InvalidRadius;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let meters: f64 = s
            .trim()
            .parse()
            .map_err(|_| InvalidRadius(s.to_string()))?;
        Self::from_meters(meters).map_err(|_| InvalidRadius(s.to_string()))
    }
}

impl fmt::Display for Radius {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} m", self.0)
    }
}

/// A candidate that fell within the search radius.
#[derive(Debug, Clone, PartialEq)]
pub struct Nearby<T> {
    pub item: T,
    pub distance: Distance,
}

/// Find the candidates within `radius` of `origin`, nearest first.
///
/// Candidates whose point fails [`Point::is_valid`] are skipped; one bad
/// point never fails the search. An invalid `origin` does.
///
/// The sort is stable, so candidates at equal distance keep their input
/// order.
pub fn find_nearby<T>(
    origin: Point,
    candidates: impl IntoIterator<Item = (T, Point)>,
    radius: Radius,
) -> Result<Vec<Nearby<T>>, InvalidCoordinate> {
    if !origin.is_valid() {
        return Err(InvalidCoordinate(origin));
    }

    let mut matches: Vec<Nearby<T>> = candidates
        .into_iter()
        .filter_map(|(item, point)| {
            let d = distance(origin, point).ok()?;
            radius.contains(d).then_some(Nearby { item, distance: d })
        })
        .collect();

    matches.sort_by(|a, b| a.distance.total_cmp(&b.distance));

    Ok(matches)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ORIGIN: Point = Point::new(-99.1332, 19.4326);

    fn items<T: Clone>(found: &[Nearby<T>]) -> Vec<T> {
        found.iter().map(|n| n.item.clone()).collect()
    }

    #[test]
    fn includes_close_candidate() {
        let found = find_nearby(ORIGIN, [("near", Point::new(-99.1340, 19.4330))], Radius::DEFAULT)
            .unwrap();
        assert_eq!(found.len(), 1);
        let d = found[0].distance.as_meters();
        assert!((90.0..=100.0).contains(&d), "got {d}");
    }

    #[test]
    fn excludes_candidate_beyond_default_radius() {
        // ~600 m due north: 600 / 111_195 degrees of latitude
        let north = Point::new(ORIGIN.longitude, ORIGIN.latitude + 600.0 / 111_195.0);
        let d = distance(ORIGIN, north).unwrap().as_meters();
        assert!((595.0..605.0).contains(&d), "got {d}");

        let found = find_nearby(ORIGIN, [("far", north)], Radius::default()).unwrap();
        assert!(found.is_empty());
    }

    #[test]
    fn sorted_nearest_first() {
        let candidates = [
            ("c", Point::new(-99.1332, 19.4350)),
            ("a", Point::new(-99.1332, 19.4327)),
            ("b", Point::new(-99.1332, 19.4336)),
        ];
        let found = find_nearby(ORIGIN, candidates, Radius::DEFAULT).unwrap();
        assert_eq!(items(&found), vec!["a", "b", "c"]);
    }

    #[test]
    fn ties_keep_input_order() {
        let spot = Point::new(-99.1335, 19.4329);
        let candidates = [("first", spot), ("second", spot), ("third", spot)];
        let found = find_nearby(ORIGIN, candidates, Radius::DEFAULT).unwrap();
        assert_eq!(items(&found), vec!["first", "second", "third"]);
    }

    #[test]
    fn malformed_candidates_are_skipped() {
        let candidates = [
            ("nan", Point::new(f64::NAN, 19.4326)),
            ("swapped", Point::new(19.4326, -99.1332)),
            ("ok", Point::new(-99.1333, 19.4326)),
        ];
        let found = find_nearby(ORIGIN, candidates, Radius::DEFAULT).unwrap();
        assert_eq!(items(&found), vec!["ok"]);
    }

    #[test]
    fn invalid_origin_fails() {
        let bad = Point::new(0.0, 100.0);
        let err = find_nearby(bad, [("x", ORIGIN)], Radius::DEFAULT).unwrap_err();
        assert_eq!(err, InvalidCoordinate(bad));
    }

    #[test]
    fn boundary_is_inclusive() {
        let target = Point::new(-99.1340, 19.4330);
        let exact = distance(ORIGIN, target).unwrap().as_meters();
        let radius = Radius::from_meters(exact).unwrap();
        let found = find_nearby(ORIGIN, [((), target)], radius).unwrap();
        assert_eq!(found.len(), 1);
    }

    #[test]
    fn origin_itself_is_a_match() {
        let found = find_nearby(ORIGIN, [("same", ORIGIN)], Radius::DEFAULT).unwrap();
        assert_eq!(found[0].distance, Distance::ZERO);
    }

    #[test]
    fn radius_validation() {
        assert!(Radius::from_meters(1.0).is_ok());
        assert!(Radius::from_meters(0.0).is_err());
        assert!(Radius::from_meters(-10.0).is_err());
        assert!(Radius::from_meters(f64::NAN).is_err());
        assert!(Radius::from_meters(f64::INFINITY).is_err());

        assert_eq!(" 750 ".parse::<Radius>().unwrap().as_meters(), 750.0);
        let err = "abc".parse::<Radius>().unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid radius \"abc\": must be a positive number of meters"
        );
        assert!("NaN".parse::<Radius>().is_err());
        assert!("inf".parse::<Radius>().is_err());
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    /// Points around Mexico City, plus some that are out of range.
    fn candidate_point() -> impl Strategy<Value = Point> {
        prop_oneof![
            8 => (-99.20f64..-99.05, 19.35f64..19.50).prop_map(|(lon, lat)| Point::new(lon, lat)),
            1 => (-400.0f64..400.0, -200.0f64..200.0).prop_map(|(lon, lat)| Point::new(lon, lat)),
            1 => Just(Point::new(f64::NAN, 19.4)),
        ]
    }

    proptest! {
        /// No match exceeds the radius, matches are sorted, malformed points never appear
        #[test]
        fn results_within_radius_and_sorted(
            points in prop::collection::vec(candidate_point(), 0..60),
            radius_m in 1.0f64..5_000.0
        ) {
            let origin = Point::new(-99.1332, 19.4326);
            let radius = Radius::from_meters(radius_m).unwrap();
            let candidates: Vec<(usize, Point)> = points.iter().copied().enumerate().collect();

            let found = find_nearby(origin, candidates, radius).unwrap();

            for n in &found {
                prop_assert!(n.distance.as_meters() <= radius_m);
                prop_assert!(points[n.item].is_valid());
            }
            for pair in found.windows(2) {
                prop_assert!(pair[0].distance <= pair[1].distance);
                if pair[0].distance == pair[1].distance {
                    prop_assert!(pair[0].item < pair[1].item);
                }
            }
        }

        /// Every valid candidate inside the radius is returned
        #[test]
        fn nothing_inside_is_lost(
            points in prop::collection::vec(candidate_point(), 0..60),
            radius_m in 1.0f64..5_000.0
        ) {
            let origin = Point::new(-99.1332, 19.4326);
            let radius = Radius::from_meters(radius_m).unwrap();
            let expected = points
                .iter()
                .filter(|p| distance(origin, **p).is_ok_and(|d| radius.contains(d)))
                .count();

            let found = find_nearby(origin, points.iter().map(|p| ((), *p)), radius).unwrap();
            prop_assert_eq!(found.len(), expected);
        }
    }
}
