//! Workspace aggregate root.

use super::{Checksum, EncryptedDbUrl};
use crate::tenant::TenantId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Registration record binding a tenant to its client database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workspace {
    tenant_id: TenantId,
    encrypted_db_url: EncryptedDbUrl,
    checksum: Checksum,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted workspace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedWorkspaceData {
    /// Persisted tenant identifier.
    pub tenant_id: TenantId,
    /// Persisted URL ciphertext.
    pub encrypted_db_url: EncryptedDbUrl,
    /// Persisted schema checksum.
    pub checksum: Checksum,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted last update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Workspace {
    /// Registers a new workspace.
    #[must_use]
    pub fn new(
        tenant_id: TenantId,
        encrypted_db_url: EncryptedDbUrl,
        checksum: Checksum,
        clock: &impl Clock,
    ) -> Self {
        let timestamp = clock.utc();
        Self {
            tenant_id,
            encrypted_db_url,
            checksum,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Reconstructs a workspace from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedWorkspaceData) -> Self {
        Self {
            tenant_id: data.tenant_id,
            encrypted_db_url: data.encrypted_db_url,
            checksum: data.checksum,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the tenant identifier.
    #[must_use]
    pub const fn tenant_id(&self) -> &TenantId {
        &self.tenant_id
    }

    /// Returns the URL ciphertext.
    #[must_use]
    pub const fn encrypted_db_url(&self) -> &EncryptedDbUrl {
        &self.encrypted_db_url
    }

    /// Returns the checksum of the last schema handed to ingestion.
    #[must_use]
    pub const fn checksum(&self) -> &Checksum {
        &self.checksum
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the last update timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Records a drifted schema, keeping the creation timestamp.
    pub fn record_schema(
        &mut self,
        encrypted_db_url: EncryptedDbUrl,
        checksum: Checksum,
        clock: &impl Clock,
    ) {
        self.encrypted_db_url = encrypted_db_url;
        self.checksum = checksum;
        self.updated_at = clock.utc();
    }
}
