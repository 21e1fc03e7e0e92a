//! Status tracking for asynchronous import/export/extension requests.
//! - `status`: key scheme, inbound records, and the service that ties them to a store.
//! - `store`: the `StatusStore` contract with Redis and in-memory backends.
//! - `errors`: store and service error types.

pub mod errors;
pub mod status;
pub mod store;

use std::sync::Arc;

use configs::{StoreBackend, StoreConfig};
use tracing::info;

use crate::errors::StoreError;
use crate::store::{MemoryStatusStore, RedisStatusStore, StatusStore};

/// Open the store selected by configuration. Called once at startup; the
/// returned handle is shared by every request. Fails only on an invalid
/// Redis address, never because the server is down.
pub async fn connect_store(cfg: &StoreConfig) -> Result<Arc<dyn StatusStore>, StoreError> {
    let store: Arc<dyn StatusStore> = match cfg.backend {
        StoreBackend::Redis => Arc::new(RedisStatusStore::connect(&cfg.redis).await?),
        StoreBackend::Memory => MemoryStatusStore::new(),
    };
    info!(service = "status", event = "store_ready", backend = store.backend(), "status store initialized");
    Ok(store)
}
