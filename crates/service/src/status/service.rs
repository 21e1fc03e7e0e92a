use std::sync::Arc;

use tracing::{info, warn};

use crate::errors::ServiceError;
use crate::status::record::{StatusQuery, StatusRecord};
use crate::store::StatusStore;

/// Result of recording a status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetOutcome {
    Stored,
    /// The store answered without acknowledging the write.
    Rejected,
}

/// Records and looks up statuses through a shared store handle.
#[derive(Clone)]
pub struct StatusService {
    store: Arc<dyn StatusStore>,
}

impl StatusService {
    pub fn new(store: Arc<dyn StatusStore>) -> Self {
        Self { store }
    }

    /// Validate `record` and write `timeseries_id` to its slot, replacing any
    /// previous value.
    pub async fn record(
        &self,
        record: &StatusRecord,
        timeseries_id: &str,
    ) -> Result<SetOutcome, ServiceError> {
        record.validate()?;
        if timeseries_id.is_empty() {
            return Err(ServiceError::validation("timeseriesId must not be empty"));
        }
        let key = record.key();
        if self.store.set_status(&key, timeseries_id).await? {
            info!(service = "status", event = "status_set", %key, %timeseries_id, "status recorded");
            Ok(SetOutcome::Stored)
        } else {
            warn!(service = "status", event = "status_set_rejected", %key, request_id = %record.request_id, "store did not acknowledge write");
            Ok(SetOutcome::Rejected)
        }
    }

    /// Fetch the value stored for `query`, `None` if it was never recorded.
    pub async fn lookup(&self, query: &StatusQuery) -> Result<Option<String>, ServiceError> {
        let key = query.key();
        let value = self.store.get_status(&key).await?;
        if value.is_none() {
            info!(service = "status", event = "status_miss", %key, "status not found");
        }
        Ok(value)
    }
}
