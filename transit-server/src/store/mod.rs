//! Storage of routes and schedules.
//!
//! [`RouteStore`] is the read interface the rest of the crate depends on.
//! [`MemoryRouteStore`] holds everything in memory after loading it from
//! JSON documents, and [`CachedRouteStore`] puts a TTL cache in front of
//! any store.

mod cache;
mod document;
mod error;
mod memory;

use std::future::Future;

use crate::domain::{Route, RouteId, Schedule};

pub use cache::{CacheConfig, CachedRouteStore};
pub use document::{FeatureDocument, GeometryDocument, RouteDocument};
pub use error::StoreError;
pub use memory::MemoryRouteStore;

/// A route together with all of its schedules.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteWithSchedules {
    pub route: Route,
    pub schedules: Vec<Schedule>,
}

/// Read access to routes and schedules.
///
/// This abstraction allows connection search to be tested with mock data.
pub trait RouteStore: Send + Sync {
    /// Get a route by id. `Ok(None)` if it does not exist.
    fn get_route(
        &self,
        id: &RouteId,
    ) -> impl Future<Output = Result<Option<Route>, StoreError>> + Send;

    /// Get every schedule of a route, in stored order.
    fn get_schedules_for_route(
        &self,
        id: &RouteId,
    ) -> impl Future<Output = Result<Vec<Schedule>, StoreError>> + Send;

    /// Get every route except `id`, each with its schedules.
    fn list_routes_excluding(
        &self,
        id: &RouteId,
    ) -> impl Future<Output = Result<Vec<RouteWithSchedules>, StoreError>> + Send;

    /// Get every route, in stored order.
    fn list_routes(&self) -> impl Future<Output = Result<Vec<Route>, StoreError>> + Send;
}
