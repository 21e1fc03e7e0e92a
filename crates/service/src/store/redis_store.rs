use std::sync::Arc;

use async_trait::async_trait;
use configs::RedisConfig;
use redis::aio::ConnectionManager;
use redis::{ConnectionAddr, ConnectionInfo, RedisConnectionInfo, Value};
use tokio::sync::OnceCell;
use tracing::{debug, error, info};

use crate::errors::StoreError;
use crate::store::StatusStore;

/// Redis-backed store sharing one multiplexed connection across requests.
///
/// The connection is opened on first use and kept in a `OnceCell`; until it
/// succeeds every command fails with `StoreError::Transport` and the next
/// command makes a fresh single attempt. Once open, `ConnectionManager` is a
/// cheap handle; cloning it per command lets concurrent requests pipeline
/// without a lock. If the connection drops, the failing command returns an
/// error and the manager reconnects for the next one. Nothing is retried.
#[derive(Clone)]
pub struct RedisStatusStore {
    client: redis::Client,
    conn: Arc<OnceCell<ConnectionManager>>,
}

pub fn connection_info(cfg: &RedisConfig) -> ConnectionInfo {
    ConnectionInfo {
        addr: ConnectionAddr::Tcp(cfg.host.clone(), cfg.port),
        redis: RedisConnectionInfo {
            db: cfg.db,
            password: cfg.password.clone(),
            ..Default::default()
        },
    }
}

impl RedisStatusStore {
    /// Build the client without touching the network.
    pub fn new(cfg: &RedisConfig) -> Result<Self, StoreError> {
        Ok(Self::from_client(redis::Client::open(connection_info(cfg))?))
    }

    pub fn from_client(client: redis::Client) -> Self {
        Self { client, conn: Arc::new(OnceCell::new()) }
    }

    /// Build the client and try once to open the shared connection. An
    /// unreachable server is logged and the next command attempts the connection;
    /// only an invalid address is an error.
    pub async fn connect(cfg: &RedisConfig) -> Result<Self, StoreError> {
        let store = Self::new(cfg)?;
        let _ = store.connection().await;
        Ok(store)
    }

    pub fn is_connected(&self) -> bool {
        self.conn.initialized()
    }

    async fn connection(&self) -> Result<ConnectionManager, StoreError> {
        let conn = self
            .conn
            .get_or_try_init(|| async {
                // zero retries: one connect attempt per call
                let conn = ConnectionManager::new_with_backoff(self.client.clone(), 2, 100, 0).await?;
                info!(service = "status", event = "redis_ready", addr = %self.client.get_connection_info().addr, "redis client is ready");
                Ok::<_, redis::RedisError>(conn)
            })
            .await
            .map_err(|e| {
                error!(service = "status", event = "redis_error", addr = %self.client.get_connection_info().addr, error = %e, "redis connection failed");
                StoreError::from(e)
            })?;
        Ok(conn.clone())
    }
}

fn log_transport(op: &'static str, key: &str, e: &redis::RedisError) {
    if e.is_connection_dropped() || e.is_io_error() || e.is_timeout() {
        error!(service = "status", event = "redis_error", op, %key, error = %e, "redis connection fault");
    } else {
        error!(service = "status", event = "redis_command_failed", op, %key, error = %e, "redis command failed");
    }
}

/// Whether a `SET` reply is the `+OK` acknowledgment.
fn is_ack(reply: &Value) -> bool {
    match reply {
        Value::Okay => true,
        Value::Status(s) => s == "OK",
        _ => false,
    }
}

#[async_trait]
impl StatusStore for RedisStatusStore {
    async fn set_status(&self, key: &str, timeseries_id: &str) -> Result<bool, StoreError> {
        let mut conn = self.connection().await?;
        let reply: Value = redis::cmd("SET")
            .arg(key)
            .arg(timeseries_id)
            .query_async(&mut conn)
            .await
            .map_err(|e| {
                log_transport("set", key, &e);
                StoreError::from(e)
            })?;
        let acked = is_ack(&reply);
        debug!(%key, acked, "redis SET");
        Ok(acked)
    }

    async fn get_status(&self, key: &str) -> Result<Option<String>, StoreError> {
        let mut conn = self.connection().await?;
        let value: Option<String> = redis::cmd("GET")
            .arg(key)
            .query_async(&mut conn)
            .await
            .map_err(|e| {
                log_transport("get", key, &e);
                StoreError::from(e)
            })?;
        debug!(%key, hit = value.is_some(), "redis GET");
        Ok(value)
    }

    fn backend(&self) -> &'static str { "redis" }
}
