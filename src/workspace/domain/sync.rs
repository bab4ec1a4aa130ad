//! Values exchanged between synchronization and ingestion.

use super::SchemaMetadata;
use crate::tenant::{DbUrl, TenantId};
use serde::{Deserialize, Serialize};

/// Logged when sync falls back to the stored schema.
pub const USE_EXISTING_SCHEMA_WARNING: &str = "Will using existing stored schema because connection to client database could not be established.";

/// Job asking a worker to re-ingest a tenant's schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestionTask {
    /// Tenant whose schema is ingested.
    pub tenant_id: TenantId,
    /// Client database to extract the schema from.
    pub db_url: DbUrl,
}

impl IngestionTask {
    /// Creates a task.
    #[must_use]
    pub const fn new(tenant_id: TenantId, db_url: DbUrl) -> Self {
        Self { tenant_id, db_url }
    }
}

/// Result of a workspace sync.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// The schema changed (or is new) and re-ingestion was enqueued.
    Enqueued(SchemaMetadata),
    /// The live schema matches the stored checksum.
    Unchanged,
    /// The client database could not be reached; stored state is kept.
    ClientUnreachable,
}

impl SyncOutcome {
    /// Returns the freshly extracted metadata when ingestion was enqueued.
    #[must_use]
    pub const fn metadata(&self) -> Option<&SchemaMetadata> {
        match self {
            Self::Enqueued(metadata) => Some(metadata),
            Self::Unchanged | Self::ClientUnreachable => None,
        }
    }

    /// Consumes the outcome, yielding enqueued metadata if any.
    #[must_use]
    pub fn into_metadata(self) -> Option<SchemaMetadata> {
        match self {
            Self::Enqueued(metadata) => Some(metadata),
            Self::Unchanged | Self::ClientUnreachable => None,
        }
    }
}
