//! Geometry: coordinate validation, great-circle distance and radius
//! search.
//!
//! Everything here is pure and synchronous.

mod distance;
mod proximity;

pub use distance::{Distance, EARTH_RADIUS_M, distance};
pub use proximity::{InvalidRadius, Nearby, Radius, find_nearby};
