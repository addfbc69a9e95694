//! Web layer for the transit backend.
//!
//! JSON endpoints over the route catalog, schedule writes and connection
//! search.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::{AppState, SharedStore};
