//! Data transfer objects for web requests and responses.

use serde::{Deserialize, Serialize};

use crate::catalog::{RouteDetail, RouteStops, ScheduleListing, SubRouteSchedules};
use crate::connections::{Connection, Connections, ScheduleGroups, StopWithSchedules};
use crate::domain::{
    Direction, Point, Route, RouteId, Schedule, ScheduleId, Stop, SubRoute, SubRouteId,
};
use crate::store::RouteDocument;

/// Query string of the connections endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct ConnectionsQuery {
    /// Search radius in meters (defaults to the configured radius)
    #[serde(alias = "distancia")]
    pub radius: Option<String>,
}

/// A route in the route listing.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteSummary {
    pub id: RouteId,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    pub active: bool,
    pub stop_count: usize,
    pub sub_routes: Vec<SubRoute>,
}

/// Response for the route listing.
#[derive(Debug, Serialize)]
pub struct RouteListResponse {
    pub routes: Vec<RouteSummary>,
}

/// A route as a feature collection, with its grouped schedules.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteDetailResponse {
    #[serde(flatten)]
    pub route: RouteDocument,
    pub schedules_by_sub_route: ScheduleGroups,
}

/// A stop of a route with the route's timetable.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StopTimetable {
    pub id: String,
    pub name: String,
    pub coordinates: Point,
    pub schedules_by_sub_route: Vec<SubRouteTimetable>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub unassigned_schedules: Vec<Schedule>,
}

/// The schedules of one sub-route, labelled with its current name.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubRouteTimetable {
    pub sub_route_id: SubRouteId,
    pub sub_route_name: String,
    pub direction: Direction,
    pub schedules: Vec<Schedule>,
}

/// Response for the stops of a route.
#[derive(Debug, Serialize)]
pub struct RouteStopsResponse {
    pub stops: Vec<StopTimetable>,
}

/// Response for the sub-routes of a route.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubRoutesResponse {
    pub sub_routes: Vec<SubRouteTimetable>,
}

/// The stop a connection search started from.
#[derive(Debug, Serialize)]
pub struct OriginStopResult {
    pub id: String,
    pub name: String,
    pub coordinates: Point,
    pub schedules: Vec<Schedule>,
}

/// A nearby stop on another route.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionResult {
    pub route_id: RouteId,
    pub route_name: String,
    pub stop_id: String,
    pub stop_name: String,
    pub distance_meters: f64,
    pub coordinates: Point,
    pub schedules: Vec<Schedule>,
}

/// Response for connection search.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionsResponse {
    pub origin_stop: OriginStopResult,
    pub connections: Vec<ConnectionResult>,
}

/// Response for schedule listings.
#[derive(Debug, Serialize)]
pub struct SchedulesResponse {
    pub schedules: Vec<Schedule>,
}

/// A schedule with the name of its route.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListedSchedule {
    pub route_name: String,
    #[serde(flatten)]
    pub schedule: Schedule,
}

/// Response for the listing of every schedule.
#[derive(Debug, Serialize)]
pub struct ScheduleListResponse {
    pub schedules: Vec<ListedSchedule>,
}

/// Response for a deleted schedule.
#[derive(Debug, Serialize)]
pub struct DeletedResponse {
    pub deleted: ScheduleId,
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl RouteSummary {
    /// Create from a domain Route.
    pub fn from_route(route: &Route) -> Self {
        Self {
            id: route.id.clone(),
            name: route.name.clone(),
            company: route.company.clone(),
            active: route.active,
            stop_count: route.stops().count(),
            sub_routes: route.sub_routes.clone(),
        }
    }
}

impl ListedSchedule {
    pub fn from_listing(listing: ScheduleListing) -> Self {
        Self {
            route_name: listing.route_name,
            schedule: listing.schedule,
        }
    }
}

impl RouteDetailResponse {
    pub fn from_detail(detail: RouteDetail) -> Self {
        Self {
            route: RouteDocument::from_route(&detail.route),
            schedules_by_sub_route: detail.schedules,
        }
    }
}

impl SubRouteTimetable {
    pub fn from_sub_route(entry: SubRouteSchedules) -> Self {
        Self {
            sub_route_id: entry.sub_route.id,
            sub_route_name: entry.sub_route.name,
            direction: entry.sub_route.direction,
            schedules: entry.schedules,
        }
    }
}

impl RouteStopsResponse {
    /// Create from the stops of a route. Every stop carries the same
    /// timetable.
    pub fn from_route_stops(route_stops: RouteStops) -> Self {
        let timetable: Vec<SubRouteTimetable> = route_stops
            .by_sub_route
            .into_iter()
            .map(SubRouteTimetable::from_sub_route)
            .collect();

        let stops = route_stops
            .stops
            .into_iter()
            .map(|stop| StopTimetable {
                id: stop.id.to_string(),
                name: stop.name,
                coordinates: stop.coordinates,
                schedules_by_sub_route: timetable.clone(),
                unassigned_schedules: route_stops.unassigned.clone(),
            })
            .collect();

        Self { stops }
    }
}

impl OriginStopResult {
    pub fn from_origin(origin: StopWithSchedules) -> Self {
        let StopWithSchedules { stop, schedules } = origin;
        Self {
            id: stop.id.to_string(),
            name: stop.name,
            coordinates: stop.coordinates,
            schedules,
        }
    }
}

impl ConnectionResult {
    /// Create from a found connection.
    pub fn from_connection(connection: Connection) -> Self {
        let Connection {
            route_id,
            route_name,
            stop,
            distance,
            schedules,
        } = connection;
        let Stop {
            id, name, coordinates, ..
        } = stop;

        Self {
            route_id,
            route_name,
            stop_id: id.to_string(),
            stop_name: name,
            distance_meters: distance.as_meters(),
            coordinates,
            schedules: schedules.to_vec(),
        }
    }
}

impl ConnectionsResponse {
    pub fn from_connections(found: Connections) -> Self {
        Self {
            origin_stop: OriginStopResult::from_origin(found.origin),
            connections: found
                .connections
                .into_iter()
                .map(ConnectionResult::from_connection)
                .collect(),
        }
    }
}
