//! Schema synchronization and workspace lifecycle service.

use crate::cancellation::{CancellationExt, Cancelled};
use crate::error::{ApiError, STATUS_CLIENT_CLOSED_REQUEST, STATUS_INTERNAL};
use crate::ingestion::ports::{VectorStore, VectorStoreError};
use crate::status::{
    domain::StatusRecord,
    ports::{StatusRegistry, StatusRegistryError},
};
use crate::tenant::{DbUrl, TenantId};
use crate::workspace::{
    domain::{IngestionTask, SyncOutcome, USE_EXISTING_SCHEMA_WARNING, Workspace},
    ports::{
        ClientDatabase, ClientDatabaseError, SchemaHasher, SchemaHasherError, TaskQueue,
        TaskQueueError, UrlCipher, UrlCipherError, WorkspaceStore, WorkspaceStoreError,
    },
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Service-level errors for workspace operations.
#[derive(Debug, Error)]
pub enum WorkspaceServiceError {
    /// Ingestion is running for the tenant.
    #[error("workspace ingestion is in progress for {0}")]
    StatusInProgress(TenantId),
    /// Workspace store operation failed.
    #[error(transparent)]
    Store(#[from] WorkspaceStoreError),
    /// Schema extraction from the client database failed.
    #[error(transparent)]
    ClientDatabase(#[from] ClientDatabaseError),
    /// Status registry operation failed.
    #[error(transparent)]
    Status(#[from] StatusRegistryError),
    /// Schema checksum computation failed.
    #[error(transparent)]
    Hasher(#[from] SchemaHasherError),
    /// URL encryption failed.
    #[error(transparent)]
    Cipher(#[from] UrlCipherError),
    /// The ingestion task could not be enqueued.
    #[error(transparent)]
    TaskQueue(#[from] TaskQueueError),
    /// Vector cleanup failed.
    #[error(transparent)]
    VectorStore(#[from] VectorStoreError),
    /// The caller cancelled the operation.
    #[error(transparent)]
    Cancelled(#[from] Cancelled),
}

/// Result type for workspace service operations.
pub type WorkspaceServiceResult<T> = Result<T, WorkspaceServiceError>;

impl From<&WorkspaceServiceError> for ApiError {
    fn from(err: &WorkspaceServiceError) -> Self {
        match err {
            WorkspaceServiceError::StatusInProgress(tenant_id) => {
                Self::status_in_progress().with_info(tenant_id.as_str())
            }
            WorkspaceServiceError::Cancelled(cancelled) => {
                Self::new(STATUS_CLIENT_CLOSED_REQUEST, "Request cancelled")
                    .with_info(cancelled.to_string())
            }
            other => Self::new(STATUS_INTERNAL, "Workspace operation failed")
                .with_info(other.to_string()),
        }
    }
}

/// Collaborators required by [`WorkspaceService`].
#[derive(Clone)]
pub struct WorkspacePorts {
    /// Workspace persistence.
    pub store: Arc<dyn WorkspaceStore>,
    /// Ingestion status registry.
    pub status: Arc<dyn StatusRegistry>,
    /// Client database connector.
    pub client_database: Arc<dyn ClientDatabase>,
    /// Tenant and checksum derivation.
    pub hasher: Arc<dyn SchemaHasher>,
    /// URL encryption.
    pub cipher: Arc<dyn UrlCipher>,
    /// Ingestion task queue.
    pub task_queue: Arc<dyn TaskQueue>,
    /// Per-tenant vector index, cleaned up on delete.
    pub vector_store: Arc<dyn VectorStore>,
}

/// Registers workspaces and keeps their ingested schema current.
#[derive(Clone)]
pub struct WorkspaceService<C>
where
    C: Clock + Send + Sync,
{
    ports: WorkspacePorts,
    clock: Arc<C>,
}

impl<C> WorkspaceService<C>
where
    C: Clock + Send + Sync,
{
    /// Creates a workspace service.
    #[must_use]
    pub const fn new(ports: WorkspacePorts, clock: Arc<C>) -> Self {
        Self { ports, clock }
    }

    /// Re-extracts the client schema and enqueues ingestion when it drifted.
    ///
    /// The ingestion task is enqueued before the workspace is upserted, so a
    /// stored checksum always belongs to a schema handed to ingestion. A
    /// matching checksum is only trusted while the last ingestion did not
    /// fail; after an `ERROR` status the schema is enqueued again. An
    /// unreachable client database is not an error: the stored schema stays
    /// in use and [`SyncOutcome::ClientUnreachable`] is returned.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceServiceError::StatusInProgress`] while the tenant is
    /// being ingested, the failing collaborator's error otherwise, or
    /// [`WorkspaceServiceError::Cancelled`] when `cancel` fires.
    pub async fn sync_client_database(
        &self,
        cancel: &CancellationToken,
        db_url: &DbUrl,
    ) -> WorkspaceServiceResult<SyncOutcome> {
        cancel.ensure_active()?;
        let tenant_id = self.ports.hasher.tenant_id(db_url);
        let record = self.reject_in_progress(cancel, &tenant_id).await?;

        let encrypted = self.ports.cipher.encrypt(db_url)?;
        cancel.guard(self.ports.store.connect()).await??;
        let existing = cancel
            .guard(self.ports.store.find_by_tenant_id(&tenant_id))
            .await??;

        let connection = match cancel.guard(self.ports.client_database.connect(db_url)).await? {
            Ok(connection) => connection,
            Err(err) => {
                warn!(tenant_id = %tenant_id, error = %err, "{USE_EXISTING_SCHEMA_WARNING}");
                return Ok(SyncOutcome::ClientUnreachable);
            }
        };
        let extracted = cancel.guard(connection.database_metadata()).await;
        if let Err(close_err) = connection.close().await {
            warn!(tenant_id = %tenant_id, error = %close_err, "failed to close client database session");
        }
        let metadata = extracted??;
        let checksum = self.ports.hasher.checksum(&metadata)?;

        if !record.is_error()
            && existing
                .as_ref()
                .is_some_and(|workspace| workspace.checksum() == &checksum)
        {
            info!(tenant_id = %tenant_id, checksum = %checksum, "schema unchanged");
            return Ok(SyncOutcome::Unchanged);
        }

        let task = IngestionTask::new(tenant_id.clone(), db_url.clone());
        cancel
            .guard(self.ports.task_queue.enqueue_ingestion(task))
            .await??;

        let mut workspace = existing.unwrap_or_else(|| {
            Workspace::new(
                tenant_id.clone(),
                encrypted.clone(),
                checksum.clone(),
                &*self.clock,
            )
        });
        workspace.record_schema(encrypted, checksum.clone(), &*self.clock);
        cancel.guard(self.ports.store.upsert(&workspace)).await??;
        info!(
            tenant_id = %tenant_id,
            checksum = %checksum,
            tables = metadata.tables.len(),
            "schema drift detected, ingestion enqueued"
        );

        Ok(SyncOutcome::Enqueued(
            metadata.with_tenant_id(tenant_id).with_checksum(checksum),
        ))
    }

    /// Retrieves a workspace by tenant.
    ///
    /// Returns `Ok(None)` when the tenant was never synced.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceServiceError::Store`] when the lookup fails.
    pub async fn get_by_tenant_id(
        &self,
        cancel: &CancellationToken,
        tenant_id: &TenantId,
    ) -> WorkspaceServiceResult<Option<Workspace>> {
        Ok(cancel
            .guard(self.ports.store.find_by_tenant_id(tenant_id))
            .await??)
    }

    /// Lists every workspace in tenant order.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceServiceError::Store`] when the listing fails.
    pub async fn list_all(
        &self,
        cancel: &CancellationToken,
    ) -> WorkspaceServiceResult<Vec<Workspace>> {
        Ok(cancel.guard(self.ports.store.list_all()).await??)
    }

    /// Reads the tenant's ingestion status.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceServiceError::Status`] when the registry fails.
    pub async fn status(
        &self,
        cancel: &CancellationToken,
        tenant_id: &TenantId,
    ) -> WorkspaceServiceResult<StatusRecord> {
        Ok(cancel.guard(self.ports.status.get(tenant_id)).await??)
    }

    /// Removes a workspace together with its vectors and status record.
    ///
    /// Returns whether a workspace record existed.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceServiceError::StatusInProgress`] while the tenant is
    /// being ingested, or the failing collaborator's error.
    pub async fn delete(
        &self,
        cancel: &CancellationToken,
        tenant_id: &TenantId,
    ) -> WorkspaceServiceResult<bool> {
        self.reject_in_progress(cancel, tenant_id).await?;

        let deleted = cancel
            .guard(self.ports.store.delete_by_tenant_id(tenant_id))
            .await??;
        cancel
            .guard(self.ports.vector_store.delete(tenant_id))
            .await??;
        cancel.guard(self.ports.status.clear(tenant_id)).await??;
        info!(tenant_id = %tenant_id, deleted, "workspace removed");
        Ok(deleted)
    }

    async fn reject_in_progress(
        &self,
        cancel: &CancellationToken,
        tenant_id: &TenantId,
    ) -> WorkspaceServiceResult<StatusRecord> {
        let record = cancel.guard(self.ports.status.get(tenant_id)).await??;
        if record.is_in_progress() {
            return Err(WorkspaceServiceError::StatusInProgress(tenant_id.clone()));
        }
        Ok(record)
    }
}
