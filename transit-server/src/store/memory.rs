//! In-memory route store loaded from JSON files.

use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::domain::{Route, RouteId, Schedule, ScheduleDraft, ScheduleId, SchedulePatch};

use super::document::RouteDocument;
use super::error::StoreError;
use super::{RouteStore, RouteWithSchedules};

/// File holding the route documents, a JSON array.
pub const ROUTES_FILE: &str = "routes.json";

/// File holding the schedules, a JSON array. Optional.
pub const SCHEDULES_FILE: &str = "schedules.json";

const SCHEDULE_ID_PREFIX: &str = "sch-";

#[derive(Debug, Default)]
struct Tables {
    routes: Vec<Route>,
    schedules: Vec<Schedule>,
    next_schedule: u64,
}

impl Tables {
    fn route(&self, id: &RouteId) -> Option<&Route> {
        self.routes.iter().find(|r| &r.id == id)
    }

    fn schedules_for(&self, id: &RouteId) -> Vec<Schedule> {
        self.schedules
            .iter()
            .filter(|s| &s.route_id == id)
            .cloned()
            .collect()
    }

    fn position(&self, id: &ScheduleId) -> Option<usize> {
        self.schedules.iter().position(|s| &s.id == id)
    }

    /// Id the next created schedule will get.
    fn next_id(&self) -> Result<ScheduleId, StoreError> {
        let n = self.next_schedule;
        ScheduleId::parse(format!("{SCHEDULE_ID_PREFIX}{n}")).map_err(|e| {
            StoreError::InvalidDocument {
                id: n.to_string(),
                message: e.to_string(),
            }
        })
    }
}

/// Route store that keeps every route and schedule in memory.
///
/// Cloning is cheap; clones share the same data. Writes are not persisted
/// back to disk.
#[derive(Debug, Clone, Default)]
pub struct MemoryRouteStore {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryRouteStore {
    /// Create a store from already converted routes and schedules.
    ///
    /// Fails on duplicate route or schedule ids. Schedules of unknown
    /// routes, and schedules their route would not accept as written, are
    /// dropped with a warning. A stale sub-route name is kept.
    pub fn new(routes: Vec<Route>, schedules: Vec<Schedule>) -> Result<Self, StoreError> {
        let mut by_id = HashMap::new();
        for route in &routes {
            if by_id.insert(&route.id, route).is_some() {
                return Err(StoreError::InvalidDocument {
                    id: route.id.to_string(),
                    message: "duplicate route id".to_string(),
                });
            }
        }

        let mut schedule_ids = HashSet::new();
        let mut kept = Vec::with_capacity(schedules.len());
        for schedule in schedules {
            if !schedule_ids.insert(schedule.id.clone()) {
                return Err(StoreError::InvalidDocument {
                    id: schedule.id.to_string(),
                    message: "duplicate schedule id".to_string(),
                });
            }
            let Some(route) = by_id.get(&schedule.route_id) else {
                warn!(
                    schedule = %schedule.id,
                    route = %schedule.route_id,
                    "dropping schedule of unknown route"
                );
                continue;
            };
            if let Err(e) = Schedule::from_draft(schedule.id.clone(), schedule.to_draft(), route) {
                warn!(schedule = %schedule.id, error = %e, "dropping invalid schedule");
                continue;
            }
            kept.push(schedule);
        }

        let highest = kept
            .iter()
            .filter_map(|s| s.id.as_str().strip_prefix(SCHEDULE_ID_PREFIX)?.parse::<u64>().ok())
            .max();
        let next_schedule = match highest {
            Some(n) => successor(n)?,
            None => 1,
        };

        Ok(Self {
            tables: Arc::new(RwLock::new(Tables {
                routes,
                schedules: kept,
                next_schedule,
            })),
        })
    }

    /// Load `routes.json` and, if present, `schedules.json` from a directory.
    pub fn load(data_dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        let data_dir = data_dir.as_ref();

        let documents: Vec<RouteDocument> = read_json(&data_dir.join(ROUTES_FILE))?;
        let routes = documents
            .into_iter()
            .map(RouteDocument::into_route)
            .collect::<Result<Vec<_>, _>>()?;

        let schedules_path = data_dir.join(SCHEDULES_FILE);
        let schedules: Vec<Schedule> = if schedules_path.exists() {
            read_json(&schedules_path)?
        } else {
            warn!(path = ?schedules_path, "no schedules file, starting empty");
            Vec::new()
        };

        info!(
            dir = ?data_dir,
            routes = routes.len(),
            schedules = schedules.len(),
            "loaded route documents"
        );
        Self::new(routes, schedules)
    }

    /// Create a schedule from a draft.
    ///
    /// The draft is validated against the route's current sub-routes.
    pub async fn create_schedule(&self, draft: ScheduleDraft) -> Result<Schedule, StoreError> {
        let mut tables = self.tables.write().await;

        let route = tables
            .route(&draft.route_id)
            .ok_or_else(|| StoreError::RouteNotFound(draft.route_id.clone()))?;
        let schedule = Schedule::from_draft(tables.next_id()?, draft, route)?;

        tables.next_schedule = successor(tables.next_schedule)?;
        tables.schedules.push(schedule.clone());
        info!(schedule = %schedule.id, route = %schedule.route_id, "created schedule");
        Ok(schedule)
    }

    /// Apply a partial update to a schedule.
    ///
    /// The result is validated as a whole, and the stored sub-route name is
    /// refreshed from the route.
    pub async fn update_schedule(
        &self,
        id: &ScheduleId,
        patch: SchedulePatch,
    ) -> Result<Schedule, StoreError> {
        let mut tables = self.tables.write().await;

        let index = tables
            .position(id)
            .ok_or_else(|| StoreError::ScheduleNotFound(id.clone()))?;
        let draft = patch.apply(tables.schedules[index].to_draft());
        let route = tables
            .route(&draft.route_id)
            .ok_or_else(|| StoreError::RouteNotFound(draft.route_id.clone()))?;
        let schedule = Schedule::from_draft(id.clone(), draft, route)?;

        tables.schedules[index] = schedule.clone();
        info!(schedule = %id, "updated schedule");
        Ok(schedule)
    }

    /// Delete a schedule, returning it.
    pub async fn delete_schedule(&self, id: &ScheduleId) -> Result<Schedule, StoreError> {
        let mut tables = self.tables.write().await;

        let index = tables
            .position(id)
            .ok_or_else(|| StoreError::ScheduleNotFound(id.clone()))?;
        let schedule = tables.schedules.remove(index);
        info!(schedule = %id, "deleted schedule");
        Ok(schedule)
    }
}

impl RouteStore for MemoryRouteStore {
    async fn get_route(&self, id: &RouteId) -> Result<Option<Route>, StoreError> {
        Ok(self.tables.read().await.route(id).cloned())
    }

    async fn get_schedules_for_route(&self, id: &RouteId) -> Result<Vec<Schedule>, StoreError> {
        Ok(self.tables.read().await.schedules_for(id))
    }

    async fn list_routes_excluding(
        &self,
        id: &RouteId,
    ) -> Result<Vec<RouteWithSchedules>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .routes
            .iter()
            .filter(|r| &r.id != id)
            .map(|r| RouteWithSchedules {
                route: r.clone(),
                schedules: tables.schedules_for(&r.id),
            })
            .collect())
    }

    async fn list_routes(&self) -> Result<Vec<Route>, StoreError> {
        Ok(self.tables.read().await.routes.clone())
    }
}

/// The schedule number after `n`.
fn successor(n: u64) -> Result<u64, StoreError> {
    n.checked_add(1).ok_or_else(|| StoreError::InvalidDocument {
        id: format!("{SCHEDULE_ID_PREFIX}{n}"),
        message: "no schedule ids left after this one".to_string(),
    })
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, StoreError> {
    let json = std::fs::read_to_string(path).map_err(|source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&json).map_err(|source| StoreError::Json {
        path: path.to_path_buf(),
        source,
    })
}
