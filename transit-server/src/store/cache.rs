//! Caching layer over a route store.
//!
//! Connection search reads the whole network on every request. The three
//! reads it makes are cached with a short TTL, which is also how stale a
//! read may be after a write made through another handle to the store.
//! Writes made through this wrapper invalidate everything at once.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache as MokaCache;

use crate::domain::{Route, RouteId, Schedule, ScheduleDraft, ScheduleId, SchedulePatch};

use super::error::StoreError;
use super::memory::MemoryRouteStore;
use super::{RouteStore, RouteWithSchedules};

/// Configuration for the cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// TTL for cached entries.
    pub ttl: Duration,

    /// Maximum number of cached entries, per kind of read.
    pub max_capacity: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(30),
            max_capacity: 1000,
        }
    }
}

/// Route store with caching.
///
/// Wraps any [`RouteStore`]. Misses are not cached, so a route created
/// in the inner store becomes visible on the next read.
pub struct CachedRouteStore<S> {
    inner: S,
    routes: MokaCache<RouteId, Route>,
    schedules: MokaCache<RouteId, Arc<Vec<Schedule>>>,
    others: MokaCache<RouteId, Arc<Vec<RouteWithSchedules>>>,
}

impl<S: RouteStore> CachedRouteStore<S> {
    /// Create a new cached store.
    pub fn new(inner: S, config: &CacheConfig) -> Self {
        Self {
            inner,
            routes: build(config),
            schedules: build(config),
            others: build(config),
        }
    }

    /// Access the underlying store for operations that bypass the cache.
    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// Invalidate all cached entries.
    pub fn invalidate_cache(&self) {
        self.routes.invalidate_all();
        self.schedules.invalidate_all();
        self.others.invalidate_all();
    }
}

fn build<V: Clone + Send + Sync + 'static>(config: &CacheConfig) -> MokaCache<RouteId, V> {
    MokaCache::builder()
        .time_to_live(config.ttl)
        .max_capacity(config.max_capacity)
        .build()
}

impl CachedRouteStore<MemoryRouteStore> {
    /// Create a schedule, then drop cached reads.
    pub async fn create_schedule(&self, draft: ScheduleDraft) -> Result<Schedule, StoreError> {
        let created = self.inner.create_schedule(draft).await?;
        self.invalidate_cache();
        Ok(created)
    }

    /// Update a schedule, then drop cached reads.
    pub async fn update_schedule(
        &self,
        id: &ScheduleId,
        patch: SchedulePatch,
    ) -> Result<Schedule, StoreError> {
        let updated = self.inner.update_schedule(id, patch).await?;
        self.invalidate_cache();
        Ok(updated)
    }

    /// Delete a schedule, then drop cached reads.
    pub async fn delete_schedule(&self, id: &ScheduleId) -> Result<Schedule, StoreError> {
        let deleted = self.inner.delete_schedule(id).await?;
        self.invalidate_cache();
        Ok(deleted)
    }
}

impl<S: RouteStore> RouteStore for CachedRouteStore<S> {
    async fn get_route(&self, id: &RouteId) -> Result<Option<Route>, StoreError> {
        if let Some(cached) = self.routes.get(id).await {
            return Ok(Some(cached));
        }

        let route = self.inner.get_route(id).await?;
        if let Some(route) = &route {
            self.routes.insert(id.clone(), route.clone()).await;
        }
        Ok(route)
    }

    async fn get_schedules_for_route(&self, id: &RouteId) -> Result<Vec<Schedule>, StoreError> {
        if let Some(cached) = self.schedules.get(id).await {
            return Ok(cached.as_ref().clone());
        }

        let schedules = self.inner.get_schedules_for_route(id).await?;
        self.schedules
            .insert(id.clone(), Arc::new(schedules.clone()))
            .await;
        Ok(schedules)
    }

    async fn list_routes_excluding(
        &self,
        id: &RouteId,
    ) -> Result<Vec<RouteWithSchedules>, StoreError> {
        if let Some(cached) = self.others.get(id).await {
            return Ok(cached.as_ref().clone());
        }

        let others = self.inner.list_routes_excluding(id).await?;
        self.others.insert(id.clone(), Arc::new(others.clone())).await;
        Ok(others)
    }

    async fn list_routes(&self) -> Result<Vec<Route>, StoreError> {
        self.inner.list_routes().await
    }
}
