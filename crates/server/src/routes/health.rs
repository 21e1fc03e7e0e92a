use common::types::Health;
use tracing::debug;

/// Liveness probe; never touches the store.
pub async fn health() -> &'static str {
    debug!("status health check");
    Health::OK.status
}
