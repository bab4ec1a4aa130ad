//! In-memory status registry for tests and single-process deployments.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::status::{
    domain::{IngestionStatus, StatusRecord},
    ports::{StatusRegistry, StatusRegistryError, StatusRegistryResult},
};
use crate::tenant::TenantId;

/// Thread-safe in-memory status registry.
///
/// `set_done` deletes the record, so the map only holds tenants whose last
/// transition was not a clean finish.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStatusRegistry {
    records: Arc<RwLock<HashMap<TenantId, StatusRecord>>>,
}

impl InMemoryStatusRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn write(&self, tenant_id: &TenantId, record: StatusRecord) -> StatusRegistryResult<()> {
        let mut records = self.records.write().map_err(|err| {
            StatusRegistryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        records.insert(tenant_id.clone(), record);
        Ok(())
    }

    fn remove(&self, tenant_id: &TenantId) -> StatusRegistryResult<()> {
        let mut records = self.records.write().map_err(|err| {
            StatusRegistryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        records.remove(tenant_id);
        Ok(())
    }
}

#[async_trait]
impl StatusRegistry for InMemoryStatusRegistry {
    async fn set_in_progress(&self, tenant_id: &TenantId) -> StatusRegistryResult<()> {
        self.write(
            tenant_id,
            StatusRecord::new(IngestionStatus::InProgress, None),
        )
    }

    async fn set_done(&self, tenant_id: &TenantId) -> StatusRegistryResult<()> {
        self.remove(tenant_id)
    }

    async fn set_error(&self, tenant_id: &TenantId, message: &str) -> StatusRegistryResult<()> {
        self.write(
            tenant_id,
            StatusRecord::new(IngestionStatus::Error, Some(message.to_owned())),
        )
    }

    async fn set_warn(&self, tenant_id: &TenantId, message: &str) -> StatusRegistryResult<()> {
        self.write(
            tenant_id,
            StatusRecord::new(IngestionStatus::Warn, Some(message.to_owned())),
        )
    }

    async fn get(&self, tenant_id: &TenantId) -> StatusRegistryResult<StatusRecord> {
        let records = self.records.read().map_err(|err| {
            StatusRegistryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        Ok(records.get(tenant_id).cloned().unwrap_or_default())
    }

    async fn clear(&self, tenant_id: &TenantId) -> StatusRegistryResult<()> {
        self.remove(tenant_id)
    }
}
