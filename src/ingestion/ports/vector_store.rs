//! Vector store port.

use crate::ingestion::domain::Vector;
use crate::tenant::TenantId;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for vector store operations.
pub type VectorStoreResult<T> = Result<T, VectorStoreError>;

/// Per-tenant similarity index over schema vectors.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Replaces the tenant's vectors with `vectors`.
    async fn upsert(&self, tenant_id: &TenantId, vectors: Vec<Vector>) -> VectorStoreResult<()>;

    /// Returns up to `limit` vectors most similar to `embedding`, best first.
    async fn search(
        &self,
        tenant_id: &TenantId,
        embedding: &[f32],
        limit: usize,
    ) -> VectorStoreResult<Vec<Vector>>;

    /// Removes every vector of the tenant.
    async fn delete(&self, tenant_id: &TenantId) -> VectorStoreResult<()>;

    /// Returns whether the tenant has any vectors.
    async fn exists(&self, tenant_id: &TenantId) -> VectorStoreResult<bool>;
}

/// Errors returned by vector store implementations.
#[derive(Debug, Clone, Error)]
pub enum VectorStoreError {
    /// A vector does not belong to the tenant it was written for.
    #[error("vector owned by {vector_tenant} written under tenant {tenant_id}")]
    TenantMismatch {
        /// Tenant the write targeted.
        tenant_id: TenantId,
        /// Tenant recorded on the vector.
        vector_tenant: TenantId,
    },

    /// Persistence-layer failure.
    #[error("vector store error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl VectorStoreError {
    /// Wraps a persistence-layer failure.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
