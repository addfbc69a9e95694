//! Read-side queries over routes and schedules.
//!
//! Everything here is a thin join over [`RouteStore`] reads: which route,
//! which of its schedules, grouped or sorted for display.

use crate::connections::{GroupKey, ScheduleGroups, group_by_sub_route};
use crate::domain::{Route, RouteId, Schedule, Stop, SubRoute, SubRouteId, Weekday};
use crate::store::{RouteStore, StoreError};

/// Error from a catalog query.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// The route does not exist
    #[error("route not found: {0}")]
    RouteNotFound(RouteId),

    /// The route has no sub-route with this id
    #[error("sub-route {sub_route} not found on route {route}")]
    SubRouteNotFound { route: RouteId, sub_route: SubRouteId },

    /// The store failed
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

/// A route with its schedules grouped by sub-route.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteDetail {
    pub route: Route,
    pub schedules: ScheduleGroups,
}

/// A sub-route of a route and the schedules assigned to it.
#[derive(Debug, Clone, PartialEq)]
pub struct SubRouteSchedules {
    pub sub_route: SubRoute,
    pub schedules: Vec<Schedule>,
}

/// A schedule labelled with the name of its route.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleListing {
    pub route_name: String,
    pub schedule: Schedule,
}

/// The stops of a route and the route's timetable.
///
/// Stops are not timetabled individually, so every stop shares the same
/// schedules.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteStops {
    pub route: Route,
    pub stops: Vec<Stop>,
    /// Sub-routes that have at least one schedule, in route order.
    pub by_sub_route: Vec<SubRouteSchedules>,
    /// Schedules assigned to no sub-route.
    pub unassigned: Vec<Schedule>,
}

/// Every route, sorted by name.
pub async fn list_routes<S: RouteStore>(store: &S) -> Result<Vec<Route>, CatalogError> {
    let mut routes = store.list_routes().await?;
    routes.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(routes)
}

/// A route with its schedules grouped by sub-route.
pub async fn route_detail<S: RouteStore>(
    store: &S,
    id: &RouteId,
) -> Result<RouteDetail, CatalogError> {
    let (route, schedules) = load(store, id).await?;
    Ok(RouteDetail {
        route,
        schedules: group_by_sub_route(schedules),
    })
}

/// The stops of a route with the route's schedules grouped by sub-route.
///
/// Groups are labelled with the sub-route as it is now, not with the name
/// stored on the schedule.
pub async fn route_stops<S: RouteStore>(
    store: &S,
    id: &RouteId,
) -> Result<RouteStops, CatalogError> {
    let (route, schedules) = load(store, id).await?;
    let groups = group_by_sub_route(schedules);

    let by_sub_route = joined(&route, &groups)
        .into_iter()
        .filter(|entry| !entry.schedules.is_empty())
        .collect();
    let unassigned = groups
        .get(&GroupKey::Unassigned)
        .map(<[Schedule]>::to_vec)
        .unwrap_or_default();

    Ok(RouteStops {
        stops: route.stops().collect(),
        route,
        by_sub_route,
        unassigned,
    })
}

/// Every sub-route of a route with its schedules, including sub-routes
/// that have none.
pub async fn sub_routes_with_schedules<S: RouteStore>(
    store: &S,
    id: &RouteId,
) -> Result<Vec<SubRouteSchedules>, CatalogError> {
    let (route, schedules) = load(store, id).await?;
    Ok(joined(&route, &group_by_sub_route(schedules)))
}

/// A route's schedules ordered by first weekday, then first departure.
pub async fn schedules_for_route<S: RouteStore>(
    store: &S,
    id: &RouteId,
) -> Result<Vec<Schedule>, CatalogError> {
    let (_, mut schedules) = load(store, id).await?;
    schedules.sort_by_key(Schedule::listing_key);
    Ok(schedules)
}

/// The schedules assigned to one sub-route of a route, in stored order.
pub async fn schedules_for_sub_route<S: RouteStore>(
    store: &S,
    route_id: &RouteId,
    sub_route_id: &SubRouteId,
) -> Result<Vec<Schedule>, CatalogError> {
    let (route, schedules) = load(store, route_id).await?;
    if route.sub_route(sub_route_id).is_none() {
        return Err(CatalogError::SubRouteNotFound {
            route: route.id,
            sub_route: sub_route_id.clone(),
        });
    }

    Ok(schedules
        .into_iter()
        .filter(|s| s.sub_route_id.as_ref() == Some(sub_route_id))
        .collect())
}

/// Every schedule of every route, ordered by route name, then first
/// weekday, then first departure.
pub async fn list_schedules<S: RouteStore>(store: &S) -> Result<Vec<ScheduleListing>, CatalogError> {
    let routes = store.list_routes().await?;
    let per_route = futures::future::try_join_all(
        routes.iter().map(|route| store.get_schedules_for_route(&route.id)),
    )
    .await?;

    let mut listings: Vec<ScheduleListing> = routes
        .iter()
        .zip(per_route)
        .flat_map(|(route, schedules)| {
            schedules.into_iter().map(|schedule| ScheduleListing {
                route_name: route.name.clone(),
                schedule,
            })
        })
        .collect();

    listings.sort_by(|a, b| {
        a.route_name
            .cmp(&b.route_name)
            .then_with(|| a.schedule.listing_key().cmp(&b.schedule.listing_key()))
    });
    Ok(listings)
}

/// A route's schedules that run on `day`, ordered by first departure.
pub async fn schedules_for_day<S: RouteStore>(
    store: &S,
    day: Weekday,
    id: &RouteId,
) -> Result<Vec<Schedule>, CatalogError> {
    let (_, schedules) = load(store, id).await?;
    let mut running: Vec<Schedule> = schedules.into_iter().filter(|s| s.runs_on(day)).collect();
    running.sort_by_key(Schedule::first_departure);
    Ok(running)
}

async fn load<S: RouteStore>(
    store: &S,
    id: &RouteId,
) -> Result<(Route, Vec<Schedule>), CatalogError> {
    let (route, schedules) =
        futures::try_join!(store.get_route(id), store.get_schedules_for_route(id))?;
    let route = route.ok_or_else(|| CatalogError::RouteNotFound(id.clone()))?;
    Ok((route, schedules))
}

fn joined(route: &Route, groups: &ScheduleGroups) -> Vec<SubRouteSchedules> {
    route
        .sub_routes
        .iter()
        .map(|sub_route| SubRouteSchedules {
            sub_route: sub_route.clone(),
            schedules: groups.for_sub_route(&sub_route.id).to_vec(),
        })
        .collect()
}
