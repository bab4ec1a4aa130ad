//! Registry port for per-tenant ingestion status.

use crate::status::domain::StatusRecord;
use crate::tenant::TenantId;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for status registry operations.
pub type StatusRegistryResult<T> = Result<T, StatusRegistryError>;

/// Last-writer-wins status store keyed by tenant.
///
/// Every setter is an idempotent upsert. Storage failures surface directly;
/// implementations do not retry.
#[async_trait]
pub trait StatusRegistry: Send + Sync {
    /// Marks ingestion as running.
    async fn set_in_progress(&self, tenant_id: &TenantId) -> StatusRegistryResult<()>;

    /// Marks ingestion as finished. Implementations may delete the record.
    async fn set_done(&self, tenant_id: &TenantId) -> StatusRegistryResult<()>;

    /// Marks ingestion as failed with a diagnostic message.
    async fn set_error(&self, tenant_id: &TenantId, message: &str) -> StatusRegistryResult<()>;

    /// Marks ingestion as finished with an advisory message.
    async fn set_warn(&self, tenant_id: &TenantId, message: &str) -> StatusRegistryResult<()>;

    /// Reads the tenant's record.
    ///
    /// A tenant without a record is reported as `DONE` with no message.
    async fn get(&self, tenant_id: &TenantId) -> StatusRegistryResult<StatusRecord>;

    /// Removes the tenant's record.
    async fn clear(&self, tenant_id: &TenantId) -> StatusRegistryResult<()>;
}

/// Errors returned by status registry implementations.
#[derive(Debug, Clone, Error)]
pub enum StatusRegistryError {
    /// The stored status could not be decoded.
    #[error("invalid persisted status data: {0}")]
    InvalidPersistedData(Arc<dyn std::error::Error + Send + Sync>),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl StatusRegistryError {
    /// Wraps persisted-data decoding failures.
    pub fn invalid_persisted_data(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::InvalidPersistedData(Arc::new(err))
    }

    /// Wraps a persistence-layer failure.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
