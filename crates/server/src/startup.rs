use std::{future::Future, net::SocketAddr};

use axum::Router;
use configs::AppConfig;
use service::{connect_store, status::StatusService};
use tracing::info;

use crate::errors::StartupError;
use crate::observability;
use crate::routes::{self, AppState};

/// Resolve the bind address from the validated config.
fn bind_addr(cfg: &AppConfig) -> Result<SocketAddr, StartupError> {
    let s = &cfg.server;
    format!("{}:{}", s.host, s.port)
        .parse()
        .map_err(|e| StartupError::InvalidConfig(format!("server address {}:{}: {e}", s.host, s.port)))
}

/// Create the store handle and assemble the router. The handle is created
/// here, once, and shared by every request through `AppState`. An unreachable
/// Redis does not fail startup; store routes answer 500 until it is reachable.
pub async fn build_app(cfg: &AppConfig) -> Result<Router, StartupError> {
    let store = connect_store(&cfg.store).await?;
    let state = AppState::new(StatusService::new(store));
    observability::init_metrics();
    let prefix = cfg.server.route_prefix();
    Ok(routes::build_router(state, prefix.as_deref()))
}

/// Public entry: build the app and serve until `shutdown` resolves.
pub async fn run<F>(cfg: AppConfig, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = bind_addr(&cfg)?;
    let app = build_app(&cfg).await?;

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(
        service = "status",
        event = "listening",
        %addr,
        prefix = cfg.server.route_prefix().as_deref().unwrap_or(""),
        backend = ?cfg.store.backend,
        "adapter status server listening"
    );
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;
    Ok(())
}
