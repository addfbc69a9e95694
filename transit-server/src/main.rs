use tracing::info;
use tracing_subscriber::EnvFilter;

use transit_server::config::ServerConfig;
use transit_server::store::{CachedRouteStore, MemoryRouteStore};
use transit_server::web::{AppState, create_router};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = ServerConfig::from_env();

    // Load routes and schedules (fail fast if unreadable)
    let store = MemoryRouteStore::load(&config.data_dir).expect("Failed to load route data");
    let cached = CachedRouteStore::new(store, &config.cache);

    let state = AppState::new(cached, config.connections.clone());
    let app = create_router(state);

    info!(addr = %config.bind, "transit server listening");
    info!("API Endpoints:");
    info!("  GET    /health");
    info!("  GET    /api/routes[/:id[/stops|/sub-routes]]");
    info!("  GET    /api/routes/:route_id/connections/:stop_id?radius=<meters>");
    info!("  GET    /api/schedules/{{route|sub-route}}/:id, /api/schedules/day/:day/route/:id");
    info!("  POST   /api/schedules, PATCH|DELETE /api/schedules/:id");

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .expect("Failed to bind listen address");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}
