//! Transfer discovery between bus routes.
//!
//! Given a stop on one route, finds the stops of every other route within
//! walking distance and attaches the schedules of the routes involved.

mod aggregate;
mod config;
mod finder;


pub use aggregate::{GroupKey, ScheduleGroup, ScheduleGroups, group_by_sub_route};
pub use config::ConnectionConfig;
pub use finder::{
    Connection, ConnectionError, ConnectionFinder, ConnectionRequest, Connections,
    StopWithSchedules,
};
