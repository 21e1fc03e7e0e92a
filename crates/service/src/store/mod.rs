//! Key-value backends holding status slots.
//!
//! Every backend honours the same contract: `set_status` overwrites
//! unconditionally and reports whether the write was acknowledged;
//! `get_status` returns `None` for a slot that was never written. Only
//! transport faults surface as `Err`.

use async_trait::async_trait;

use crate::errors::StoreError;

pub mod memory_store;
pub mod redis_store;

pub use memory_store::MemoryStatusStore;
pub use redis_store::RedisStatusStore;

#[async_trait]
pub trait StatusStore: Send + Sync {
    async fn set_status(&self, key: &str, timeseries_id: &str) -> Result<bool, StoreError>;
    async fn get_status(&self, key: &str) -> Result<Option<String>, StoreError>;
    /// Short backend name for logs.
    fn backend(&self) -> &'static str;
}
