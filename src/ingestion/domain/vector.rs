//! Embedded schema descriptors.

use crate::tenant::TenantId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use uuid::Uuid;

/// Metadata attached to a vector, keyed by field name.
pub type VectorMetadata = BTreeMap<String, String>;

/// Stable identifier of a column vector.
///
/// Derived as a UUIDv5 of `tenant/table/column`, so re-ingesting an
/// unchanged column yields the same identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VectorId(Uuid);

impl VectorId {
    /// Derives the identifier for a tenant column.
    #[must_use]
    pub fn for_column(tenant_id: &TenantId, table: &str, column: &str) -> Self {
        let name = format!("{tenant_id}/{table}/{column}");
        Self(Uuid::new_v5(&Uuid::NAMESPACE_OID, name.as_bytes()))
    }

    /// Wraps a persisted identifier.
    #[must_use]
    pub const fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Returns the inner UUID.
    #[must_use]
    pub const fn into_inner(self) -> Uuid {
        self.0
    }
}

impl fmt::Display for VectorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// An embedded schema descriptor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vector {
    /// Stable identifier.
    pub id: VectorId,
    /// Owning tenant.
    pub tenant_id: TenantId,
    /// Embedding of `content`.
    pub embedding: Vec<f32>,
    /// Canonical text the embedding was computed from.
    pub content: String,
    /// Descriptive fields such as table and column names.
    pub metadata: VectorMetadata,
}
