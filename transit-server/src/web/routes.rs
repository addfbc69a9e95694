//! HTTP route handlers.

use axum::body::Bytes;
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, patch, post},
};
use serde::de::DeserializeOwned;
use tracing::{info, warn};

use crate::catalog::{self, CatalogError};
use crate::connections::{ConnectionError, ConnectionFinder, ConnectionRequest};
use crate::domain::{
    InvalidId, InvalidWeekday, RouteId, ScheduleDraft, ScheduleId, SchedulePatch, SubRouteId,
    Weekday,
};
use crate::geo::{InvalidRadius, Radius};
use crate::store::StoreError;

use super::dto::*;
use super::state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/routes", get(list_routes))
        .route("/api/routes/:id", get(route_detail))
        .route("/api/routes/:id/stops", get(route_stops))
        .route("/api/routes/:id/sub-routes", get(sub_routes))
        .route(
            "/api/routes/:route_id/connections/:stop_id",
            get(find_connections),
        )
        .route("/api/schedules", get(list_schedules).post(create_schedule))
        .route(
            "/api/schedules/:id",
            patch(update_schedule).delete(delete_schedule),
        )
        .route("/api/schedules/route/:route_id", get(schedules_for_route))
        .route(
            "/api/schedules/route/:route_id/sub-route/:sub_route_id",
            get(schedules_for_sub_route),
        )
        .route(
            "/api/schedules/day/:day/route/:route_id",
            get(schedules_for_day),
        )
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Every route, sorted by name.
async fn list_routes(State(state): State<AppState>) -> Result<Json<RouteListResponse>, AppError> {
    let routes = catalog::list_routes(state.store.as_ref()).await?;
    Ok(Json(RouteListResponse {
        routes: routes.iter().map(RouteSummary::from_route).collect(),
    }))
}

/// A route as a feature collection with its grouped schedules.
async fn route_detail(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<RouteDetailResponse>, AppError> {
    let id = RouteId::parse(id)?;
    let detail = catalog::route_detail(state.store.as_ref(), &id).await?;
    Ok(Json(RouteDetailResponse::from_detail(detail)))
}

/// The stops of a route, each with the route's timetable.
async fn route_stops(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<RouteStopsResponse>, AppError> {
    let id = RouteId::parse(id)?;
    let stops = catalog::route_stops(state.store.as_ref(), &id).await?;
    Ok(Json(RouteStopsResponse::from_route_stops(stops)))
}

/// The sub-routes of a route with their schedules.
async fn sub_routes(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SubRoutesResponse>, AppError> {
    let id = RouteId::parse(id)?;
    let entries = catalog::sub_routes_with_schedules(state.store.as_ref(), &id).await?;
    Ok(Json(SubRoutesResponse {
        sub_routes: entries
            .into_iter()
            .map(SubRouteTimetable::from_sub_route)
            .collect(),
    }))
}

/// Stops on other routes near a stop.
async fn find_connections(
    State(state): State<AppState>,
    Path((route_id, stop_id)): Path<(String, String)>,
    Query(query): Query<ConnectionsQuery>,
) -> Result<Json<ConnectionsResponse>, AppError> {
    let mut request = ConnectionRequest::new(RouteId::parse(route_id)?, stop_id);
    if let Some(radius) = &query.radius {
        request = request.with_radius(radius.parse::<Radius>()?.as_meters());
    }

    let finder = ConnectionFinder::new(state.store.as_ref(), &state.config);
    let found = finder.find_connections(&request).await?;

    info!(
        route = %request.route_id,
        stop = %request.stop_key,
        connections = found.connections.len(),
        "found connections"
    );
    Ok(Json(ConnectionsResponse::from_connections(found)))
}

/// A route's schedules ordered by weekday, then departure.
async fn schedules_for_route(
    State(state): State<AppState>,
    Path(route_id): Path<String>,
) -> Result<Json<SchedulesResponse>, AppError> {
    let id = RouteId::parse(route_id)?;
    let schedules = catalog::schedules_for_route(state.store.as_ref(), &id).await?;
    Ok(Json(SchedulesResponse { schedules }))
}

/// Every schedule, labelled with its route's name.
async fn list_schedules(
    State(state): State<AppState>,
) -> Result<Json<ScheduleListResponse>, AppError> {
    let listings = catalog::list_schedules(state.store.as_ref()).await?;
    Ok(Json(ScheduleListResponse {
        schedules: listings.into_iter().map(ListedSchedule::from_listing).collect(),
    }))
}

/// Schedules assigned to one sub-route of a route.
async fn schedules_for_sub_route(
    State(state): State<AppState>,
    Path((route_id, sub_route_id)): Path<(String, String)>,
) -> Result<Json<SchedulesResponse>, AppError> {
    let route_id = RouteId::parse(route_id)?;
    let sub_route_id = SubRouteId::parse(sub_route_id)?;
    let schedules =
        catalog::schedules_for_sub_route(state.store.as_ref(), &route_id, &sub_route_id).await?;
    Ok(Json(SchedulesResponse { schedules }))
}

/// A route's schedules running on a weekday.
async fn schedules_for_day(
    State(state): State<AppState>,
    Path((day, route_id)): Path<(String, String)>,
) -> Result<Json<SchedulesResponse>, AppError> {
    let day: Weekday = day.parse()?;
    let id = RouteId::parse(route_id)?;
    let schedules = catalog::schedules_for_day(state.store.as_ref(), day, &id).await?;
    Ok(Json(SchedulesResponse { schedules }))
}

/// Create a schedule.
async fn create_schedule(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<impl IntoResponse, AppError> {
    let draft: ScheduleDraft = parse_body(&body)?;
    let schedule = state.store.create_schedule(draft).await?;
    Ok((StatusCode::CREATED, Json(schedule)))
}

/// Apply a partial update to a schedule.
async fn update_schedule(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<impl IntoResponse, AppError> {
    let id = ScheduleId::parse(id)?;
    let patch: SchedulePatch = parse_body(&body)?;
    let schedule = state.store.update_schedule(&id, patch).await?;
    Ok(Json(schedule))
}

/// Delete a schedule.
async fn delete_schedule(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = ScheduleId::parse(id)?;
    let deleted = state.store.delete_schedule(&id).await?;
    Ok(Json(DeletedResponse { deleted: deleted.id }))
}

/// Parse a JSON body, reporting malformed input as a bad request.
fn parse_body<T: DeserializeOwned>(body: &[u8]) -> Result<T, AppError> {
    serde_json::from_slice(body).map_err(|e| AppError::BadRequest {
        message: format!("Invalid JSON: {e}"),
    })
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
    Internal { message: String },
}

impl AppError {
    fn bad_request(e: impl ToString) -> Self {
        AppError::BadRequest {
            message: e.to_string(),
        }
    }

    fn not_found(e: impl ToString) -> Self {
        AppError::NotFound {
            message: e.to_string(),
        }
    }
}

impl From<InvalidId> for AppError {
    fn from(e: InvalidId) -> Self {
        AppError::bad_request(e)
    }
}

impl From<InvalidWeekday> for AppError {
    fn from(e: InvalidWeekday) -> Self {
        AppError::bad_request(e)
    }
}

impl From<InvalidRadius> for AppError {
    fn from(e: InvalidRadius) -> Self {
        AppError::bad_request(e)
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Domain(_) => AppError::bad_request(e),
            StoreError::ScheduleNotFound(_) | StoreError::RouteNotFound(_) => {
                AppError::not_found(e)
            }
            StoreError::Io { .. } | StoreError::Json { .. } | StoreError::InvalidDocument { .. } => {
                AppError::Internal {
                    message: e.to_string(),
                }
            }
        }
    }
}

impl From<CatalogError> for AppError {
    fn from(e: CatalogError) -> Self {
        match e {
            CatalogError::RouteNotFound(_) | CatalogError::SubRouteNotFound { .. } => {
                AppError::not_found(e)
            }
            CatalogError::Store(e) => e.into(),
        }
    }
}

impl From<ConnectionError> for AppError {
    fn from(e: ConnectionError) -> Self {
        match e {
            ConnectionError::InvalidRadius(e) => e.into(),
            ConnectionError::InvalidCoordinate(_) => AppError::bad_request(e),
            ConnectionError::RouteNotFound(_) | ConnectionError::StopNotFound { .. } => {
                AppError::not_found(e)
            }
            ConnectionError::Store(e) => e.into(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, message),
            AppError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        warn!(%status, %message, "request failed");

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}
