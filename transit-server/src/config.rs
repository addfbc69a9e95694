//! Server configuration read from the environment.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use tracing::warn;

use crate::connections::ConnectionConfig;
use crate::geo::Radius;
use crate::store::CacheConfig;

/// Directory holding `routes.json` and `schedules.json`.
pub const DATA_DIR_VAR: &str = "TRANSIT_DATA_DIR";

/// Address to listen on.
pub const BIND_VAR: &str = "TRANSIT_BIND";

/// Cache TTL in whole seconds.
pub const CACHE_TTL_VAR: &str = "TRANSIT_CACHE_TTL_SECS";

/// Default connection search radius in meters.
pub const DEFAULT_RADIUS_VAR: &str = "TRANSIT_DEFAULT_RADIUS_M";

/// Everything the binary needs to start.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub data_dir: PathBuf,
    pub bind: SocketAddr,
    pub cache: CacheConfig,
    pub connections: ConnectionConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            bind: SocketAddr::from(([127, 0, 0, 1], 3000)),
            cache: CacheConfig::default(),
            connections: ConnectionConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Read the configuration from process environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read the configuration through `lookup`. Unset variables keep their
    /// defaults; malformed ones are logged and ignored.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(dir) = lookup(DATA_DIR_VAR) {
            config.data_dir = PathBuf::from(dir);
        }
        if let Some(bind) = parsed::<SocketAddr>(&lookup, BIND_VAR) {
            config.bind = bind;
        }
        if let Some(secs) = parsed::<u64>(&lookup, CACHE_TTL_VAR) {
            config.cache.ttl = Duration::from_secs(secs);
        }
        if let Some(radius) = parsed::<Radius>(&lookup, DEFAULT_RADIUS_VAR) {
            config.connections = config.connections.with_default_radius(radius);
        }

        config
    }
}

fn parsed<T>(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Option<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let raw = lookup(name)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(var = name, value = %raw, error = %e, "ignoring malformed setting");
            None
        }
    }
}
