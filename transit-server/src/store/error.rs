//! Store error types.

use std::path::PathBuf;

use crate::domain::{DomainError, RouteId, ScheduleId};

/// Errors that can occur when reading or writing the route store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Reading a data file failed
    #[error("failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A data file was not valid JSON for its document type
    #[error("failed to parse {path:?}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A document parsed but does not describe a usable record
    #[error("invalid document {id}: {message}")]
    InvalidDocument { id: String, message: String },

    /// A write broke a domain rule
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// The schedule to update or delete does not exist
    #[error("schedule not found: {0}")]
    ScheduleNotFound(ScheduleId),

    /// A schedule names a route that does not exist
    #[error("route not found: {0}")]
    RouteNotFound(RouteId),
}
