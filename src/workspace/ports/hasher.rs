//! Port deriving tenant identity and schema checksums.

use crate::tenant::{DbUrl, TenantId};
use crate::workspace::domain::{Checksum, SchemaMetadata};
use std::sync::Arc;
use thiserror::Error;

/// Deterministic digests over URLs and schemas.
pub trait SchemaHasher: Send + Sync {
    /// Derives the tenant identifier for a client database URL.
    fn tenant_id(&self, url: &DbUrl) -> TenantId;

    /// Computes the checksum of the canonical serialization of `metadata`.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaHasherError`] when the metadata cannot be serialized.
    fn checksum(&self, metadata: &SchemaMetadata) -> Result<Checksum, SchemaHasherError>;
}

/// Errors returned by schema hasher implementations.
#[derive(Debug, Clone, Error)]
#[error("schema serialization failed: {0}")]
pub struct SchemaHasherError(pub Arc<dyn std::error::Error + Send + Sync>);

impl SchemaHasherError {
    /// Wraps a serialization failure.
    pub fn new(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self(Arc::new(err))
    }
}
