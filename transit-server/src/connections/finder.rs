//! Connection search: which stops of other routes are within walking
//! distance of a stop, and when do those routes run.

use std::sync::Arc;

use tracing::debug;

use crate::domain::{InvalidCoordinate, Route, RouteId, Schedule, Stop};
use crate::geo::{Distance, InvalidRadius, Radius, find_nearby};
use crate::store::{RouteStore, StoreError};

use super::config::ConnectionConfig;

/// Error from connection search.
#[derive(Debug, thiserror::Error)]
pub enum ConnectionError {
    /// The requested radius is not a positive number
    #[error(transparent)]
    InvalidRadius(#[from] InvalidRadius),

    /// The origin stop has an unusable position
    #[error("origin stop has {0}")]
    InvalidCoordinate(#[from] InvalidCoordinate),

    /// The origin route does not exist
    #[error("route not found: {0}")]
    RouteNotFound(RouteId),

    /// The origin route has no stop with the given id
    #[error("stop {stop:?} not found on route {route}")]
    StopNotFound { route: RouteId, stop: String },

    /// The store failed
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

/// Request for connection search.
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectionRequest {
    /// Route the traveller is on.
    pub route_id: RouteId,

    /// Stop id or feature id of the origin stop on that route.
    pub stop_key: String,

    /// Search radius in meters. `None` uses the configured default.
    pub radius_m: Option<f64>,
}

impl ConnectionRequest {
    /// Create a new request using the default radius.
    pub fn new(route_id: RouteId, stop_key: impl Into<String>) -> Self {
        Self {
            route_id,
            stop_key: stop_key.into(),
            radius_m: None,
        }
    }

    /// Use an explicit radius.
    pub fn with_radius(mut self, meters: f64) -> Self {
        self.radius_m = Some(meters);
        self
    }

    /// Validate the request and resolve its radius.
    pub fn radius(&self, config: &ConnectionConfig) -> Result<Radius, ConnectionError> {
        match self.radius_m {
            Some(meters) => Ok(Radius::from_meters(meters)?),
            None => Ok(config.default_radius),
        }
    }
}

/// The origin stop and the schedules of the route it belongs to.
#[derive(Debug, Clone, PartialEq)]
pub struct StopWithSchedules {
    pub stop: Stop,
    pub schedules: Vec<Schedule>,
}

/// A stop of another route within the search radius.
#[derive(Debug, Clone, PartialEq)]
pub struct Connection {
    pub route_id: RouteId,
    pub route_name: String,
    pub stop: Stop,
    pub distance: Distance,
    /// All schedules of the connecting route. Shared between connections
    /// to the same route.
    pub schedules: Arc<[Schedule]>,
}

/// Result of connection search.
#[derive(Debug, Clone, PartialEq)]
pub struct Connections {
    pub origin: StopWithSchedules,

    /// Nearest first. Equal distances keep route order, then stop order.
    pub connections: Vec<Connection>,
}

/// Connection finder over a route store.
pub struct ConnectionFinder<'a, S: RouteStore> {
    store: &'a S,
    config: &'a ConnectionConfig,
}

impl<'a, S: RouteStore> ConnectionFinder<'a, S> {
    /// Create a new finder.
    pub fn new(store: &'a S, config: &'a ConnectionConfig) -> Self {
        Self { store, config }
    }

    /// Find the stops of other routes within the radius of the origin stop.
    ///
    /// Stops of the origin route itself are never returned, however close.
    /// Candidate stops with unusable coordinates are skipped. The origin
    /// route is loaded before anything else, so an unknown route or stop
    /// fails without reading the rest of the network.
    pub async fn find_connections(
        &self,
        request: &ConnectionRequest,
    ) -> Result<Connections, ConnectionError> {
        let radius = request.radius(self.config)?;
        let route_id = &request.route_id;

        let (route, schedules) = futures::try_join!(
            self.store.get_route(route_id),
            self.store.get_schedules_for_route(route_id),
        )?;

        let route = route.ok_or_else(|| ConnectionError::RouteNotFound(route_id.clone()))?;
        let stop = route
            .find_stop(&request.stop_key)
            .ok_or_else(|| ConnectionError::StopNotFound {
                route: route_id.clone(),
                stop: request.stop_key.clone(),
            })?;

        if !stop.coordinates.is_valid() {
            return Err(InvalidCoordinate(stop.coordinates).into());
        }

        let others = self.store.list_routes_excluding(route_id).await?;

        let shared: Vec<(Route, Arc<[Schedule]>)> = others
            .into_iter()
            .filter(|other| &other.route.id != route_id)
            .map(|other| (other.route, Arc::from(other.schedules)))
            .collect();

        let candidates = shared.iter().enumerate().flat_map(|(index, (route, _))| {
            route.stops().map(move |stop| {
                let at = stop.coordinates;
                ((index, stop), at)
            })
        });

        let nearby = find_nearby(stop.coordinates, candidates, radius)?;

        debug!(
            route = %route_id,
            stop = %stop.id,
            radius = %radius,
            routes_scanned = shared.len(),
            found = nearby.len(),
            "connection search complete"
        );

        let connections = nearby
            .into_iter()
            .map(|found| {
                let (index, candidate) = found.item;
                let (route, schedules) = &shared[index];
                Connection {
                    route_id: route.id.clone(),
                    route_name: route.name.clone(),
                    stop: candidate,
                    distance: found.distance,
                    schedules: Arc::clone(schedules),
                }
            })
            .collect();

        Ok(Connections {
            origin: StopWithSchedules { stop, schedules },
            connections,
        })
    }
}
