use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;

use crate::errors::StoreError;
use crate::store::StatusStore;

/// Process-local store for development and tests. Never fails and always
/// acknowledges writes.
#[derive(Clone, Default)]
pub struct MemoryStatusStore {
    slots: Arc<DashMap<String, String>>,
}

impl MemoryStatusStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

#[async_trait]
impl StatusStore for MemoryStatusStore {
    async fn set_status(&self, key: &str, timeseries_id: &str) -> Result<bool, StoreError> {
        self.slots.insert(key.to_string(), timeseries_id.to_string());
        Ok(true)
    }

    async fn get_status(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.slots.get(key).map(|v| v.value().clone()))
    }

    fn backend(&self) -> &'static str { "memory" }
}
