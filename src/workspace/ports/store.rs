//! Persistence port for workspace records.

use crate::tenant::TenantId;
use crate::workspace::domain::Workspace;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for workspace store operations.
pub type WorkspaceStoreResult<T> = Result<T, WorkspaceStoreError>;

/// Workspace persistence contract.
///
/// The backing location is adapter configuration; `connect` and `close` are
/// readiness and teardown hooks.
#[async_trait]
pub trait WorkspaceStore: Send + Sync {
    /// Verifies the store is reachable.
    async fn connect(&self) -> WorkspaceStoreResult<()>;

    /// Releases resources held by the store.
    async fn close(&self) -> WorkspaceStoreResult<()>;

    /// Finds a workspace by tenant.
    ///
    /// Returns `None` when the tenant has no workspace.
    async fn find_by_tenant_id(
        &self,
        tenant_id: &TenantId,
    ) -> WorkspaceStoreResult<Option<Workspace>>;

    /// Returns every workspace ordered by tenant identifier.
    async fn list_all(&self) -> WorkspaceStoreResult<Vec<Workspace>>;

    /// Inserts or replaces the workspace keyed by its tenant.
    async fn upsert(&self, workspace: &Workspace) -> WorkspaceStoreResult<()>;

    /// Deletes the tenant's workspace, returning whether one existed.
    async fn delete_by_tenant_id(&self, tenant_id: &TenantId) -> WorkspaceStoreResult<bool>;
}

/// Errors returned by workspace store implementations.
#[derive(Debug, Clone, Error)]
pub enum WorkspaceStoreError {
    /// Persisted data could not be reconstructed into domain types.
    #[error("invalid persisted workspace data: {0}")]
    InvalidPersistedData(Arc<dyn std::error::Error + Send + Sync>),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl WorkspaceStoreError {
    /// Wraps a data-quality error from persisted rows.
    pub fn invalid_persisted_data(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::InvalidPersistedData(Arc::new(err))
    }

    /// Wraps a persistence-layer failure.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
