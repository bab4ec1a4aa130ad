//! SHA-256 tenant and schema hashing.
//!
//! The checksum covers a canonical JSON rendering of the schema: tables
//! sorted by name, indexes and constraints sorted by name, relations sorted
//! by `(source table, source column, target table, target column)`. Columns
//! keep their ordinal order. Tenant identifier and any previous checksum are
//! excluded, so the digest depends on structure alone.

use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::tenant::{DbUrl, TenantId};
use crate::workspace::{
    domain::{Checksum, Column, Constraint, Index, Relation, SchemaMetadata, Table},
    ports::{SchemaHasher, SchemaHasherError},
};

/// [`SchemaHasher`] backed by SHA-256.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha256SchemaHasher;

impl Sha256SchemaHasher {
    /// Creates a hasher.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

#[derive(Serialize)]
struct CanonicalSchema<'a> {
    tables: Vec<CanonicalTable<'a>>,
    relations: Vec<&'a Relation>,
}

#[derive(Serialize)]
struct CanonicalTable<'a> {
    name: &'a str,
    columns: &'a [Column],
    indexes: Vec<&'a Index>,
    constraints: Vec<&'a Constraint>,
    comment: Option<&'a str>,
}

impl<'a> CanonicalTable<'a> {
    fn from_table(table: &'a Table) -> Self {
        let mut indexes: Vec<&Index> = table.indexes.iter().collect();
        indexes.sort_by(|a, b| a.name.cmp(&b.name));
        let mut constraints: Vec<&Constraint> = table.constraints.iter().collect();
        constraints.sort_by(|a, b| a.name.cmp(&b.name));
        Self {
            name: &table.name,
            columns: &table.columns,
            indexes,
            constraints,
            comment: table.comment.as_deref(),
        }
    }
}

fn canonical_bytes(metadata: &SchemaMetadata) -> Result<Vec<u8>, serde_json::Error> {
    let mut tables: Vec<CanonicalTable<'_>> =
        metadata.tables.iter().map(CanonicalTable::from_table).collect();
    tables.sort_by(|a, b| a.name.cmp(b.name));
    let mut relations: Vec<&Relation> = metadata.relations.iter().collect();
    relations.sort();
    serde_json::to_vec(&CanonicalSchema { tables, relations })
}

impl SchemaHasher for Sha256SchemaHasher {
    fn tenant_id(&self, url: &DbUrl) -> TenantId {
        let digest = Sha256::digest(url.expose().as_bytes());
        let mut prefix = [0_u8; 8];
        for (slot, byte) in prefix.iter_mut().zip(digest.iter()) {
            *slot = *byte;
        }
        TenantId::from_digest_prefix(prefix)
    }

    fn checksum(&self, metadata: &SchemaMetadata) -> Result<Checksum, SchemaHasherError> {
        let bytes = canonical_bytes(metadata).map_err(SchemaHasherError::new)?;
        Ok(Checksum::from_digest(Sha256::digest(&bytes).into()))
    }
}
