//! Domain types for the transit backend.
//!
//! This module contains the validated data model: routes with their
//! geometric features and sub-routes, stops read off those features, and
//! timetabled schedules. Types enforce their invariants at construction
//! time, so code that receives them can trust their validity. Points are
//! the one exception: stored coordinates are carried unchecked and
//! validated where they are used.

mod error;
mod ids;
mod point;
mod route;
mod schedule;
mod time;
mod weekday;

pub use error::DomainError;
pub use ids::{FeatureId, InvalidId, RouteId, ScheduleId, StopId, SubRouteId};
pub use point::{InvalidCoordinate, Point};
pub use route::{Direction, Feature, Route, Stop, StopFeature, SubRoute};
pub use schedule::{Schedule, ScheduleDraft, ScheduleKind, SchedulePatch};
pub use time::{DepartureTime, TimeError};
pub use weekday::{InvalidWeekday, Weekday};
