//! Routes, their features and sub-routes.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::{DomainError, FeatureId, Point, RouteId, StopId, SubRouteId};

/// Direction of travel of a sub-route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[serde(alias = "ida")]
    Outbound,
    #[serde(alias = "vuelta")]
    Return,
    #[serde(alias = "circular")]
    Loop,
}

/// A directional or variant branch of a route.
///
/// Sub-routes are owned by exactly one route; their ids are only unique
/// within that route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubRoute {
    pub id: SubRouteId,
    #[serde(alias = "nombre")]
    pub name: String,
    #[serde(default, alias = "descripcion", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(alias = "direccion")]
    pub direction: Direction,
}

/// A point feature of a route: the place a stop sits.
#[derive(Debug, Clone, PartialEq)]
pub struct StopFeature {
    /// Id of the feature itself.
    pub feature_id: FeatureId,
    /// Public id of the stop. Falls back to the feature id when the stored
    /// feature carries none.
    pub stop_id: StopId,
    pub name: String,
    /// Not validated; stored documents may hold out-of-range positions.
    pub coordinates: Point,
}

/// A geometric feature of a route.
#[derive(Debug, Clone, PartialEq)]
pub enum Feature {
    /// A piece of the route's path.
    Line { id: FeatureId, path: Vec<Point> },
    /// A stop on the route.
    Point(StopFeature),
}

impl Feature {
    /// Id of the feature.
    pub fn id(&self) -> &FeatureId {
        match self {
            Feature::Line { id, .. } => id,
            Feature::Point(stop) => &stop.feature_id,
        }
    }
}

/// A stop, as seen from outside its route.
///
/// Stops have no lifecycle of their own; they are read off a route's point
/// features and tagged with the owning route.
#[derive(Debug, Clone, PartialEq)]
pub struct Stop {
    pub id: StopId,
    pub feature_id: FeatureId,
    pub name: String,
    pub coordinates: Point,
    pub route_id: RouteId,
}

/// A bus route.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    pub id: RouteId,
    pub name: String,
    pub company: Option<String>,
    pub active: bool,
    /// Path segments and stops, in stored order.
    pub features: Vec<Feature>,
    pub sub_routes: Vec<SubRoute>,
}

impl Route {
    /// Create an active route with no company.
    ///
    /// Fails if two sub-routes share an id.
    pub fn new(
        id: RouteId,
        name: impl Into<String>,
        features: Vec<Feature>,
        sub_routes: Vec<SubRoute>,
    ) -> Result<Self, DomainError> {
        let mut seen = HashSet::new();
        for sub_route in &sub_routes {
            if !seen.insert(&sub_route.id) {
                return Err(DomainError::DuplicateSubRoute {
                    route: id,
                    sub_route: sub_route.id.clone(),
                });
            }
        }

        Ok(Self {
            id,
            name: name.into(),
            company: None,
            active: true,
            features,
            sub_routes,
        })
    }

    /// Set the operating company.
    pub fn with_company(mut self, company: impl Into<String>) -> Self {
        self.company = Some(company.into());
        self
    }

    /// Set the active flag.
    pub fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    /// Iterate over the route's stops in feature order.
    pub fn stops(&self) -> impl Iterator<Item = Stop> + '_ {
        self.features.iter().filter_map(|feature| match feature {
            Feature::Point(stop) => Some(self.stop_from(stop)),
            Feature::Line { .. } => None,
        })
    }

    /// Find a stop by its stop id or by the id of its feature.
    ///
    /// Line features never match, even when their id is `key`.
    pub fn find_stop(&self, key: &str) -> Option<Stop> {
        self.features.iter().find_map(|feature| match feature {
            Feature::Point(stop)
                if stop.stop_id.as_str() == key || stop.feature_id.as_str() == key =>
            {
                Some(self.stop_from(stop))
            }
            _ => None,
        })
    }

    /// Look up one of this route's sub-routes.
    pub fn sub_route(&self, id: &SubRouteId) -> Option<&SubRoute> {
        self.sub_routes.iter().find(|s| &s.id == id)
    }

    fn stop_from(&self, stop: &StopFeature) -> Stop {
        Stop {
            id: stop.stop_id.clone(),
            feature_id: stop.feature_id.clone(),
            name: stop.name.clone(),
            coordinates: stop.coordinates,
            route_id: self.id.clone(),
        }
    }
}
