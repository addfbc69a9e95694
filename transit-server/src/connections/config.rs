//! Configuration for connection search.

use crate::geo::Radius;

/// Configuration parameters for connection search.
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectionConfig {
    /// Radius used when a request does not name one.
    pub default_radius: Radius,
}

impl ConnectionConfig {
    /// Create a new configuration with the given parameters.
    pub fn new(default_radius: Radius) -> Self {
        Self { default_radius }
    }

    /// Replace the default radius.
    pub fn with_default_radius(mut self, radius: Radius) -> Self {
        self.default_radius = radius;
        self
    }
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            default_radius: Radius::DEFAULT,
        }
    }
}
