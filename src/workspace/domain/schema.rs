//! Schema metadata extracted from a client database.

use super::Checksum;
use crate::tenant::TenantId;
use serde::{Deserialize, Serialize};

/// One result row, keyed by column name.
pub type Row = serde_json::Map<String, serde_json::Value>;

/// Snapshot of a client database schema.
///
/// Adapters fill `tables` and `relations`; the sync service stamps
/// `tenant_id` and `checksum` once they are known.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaMetadata {
    /// Tenant owning the schema, once derived.
    pub tenant_id: Option<TenantId>,
    /// Tables in extraction order.
    pub tables: Vec<Table>,
    /// Foreign-key relations between tables.
    pub relations: Vec<Relation>,
    /// Checksum of the canonical serialization, once computed.
    pub checksum: Option<Checksum>,
}

impl SchemaMetadata {
    /// Creates metadata from extracted tables and relations.
    #[must_use]
    pub const fn new(tables: Vec<Table>, relations: Vec<Relation>) -> Self {
        Self {
            tenant_id: None,
            tables,
            relations,
            checksum: None,
        }
    }

    /// Stamps the owning tenant.
    #[must_use]
    pub fn with_tenant_id(mut self, tenant_id: TenantId) -> Self {
        self.tenant_id = Some(tenant_id);
        self
    }

    /// Stamps the computed checksum.
    #[must_use]
    pub fn with_checksum(mut self, checksum: Checksum) -> Self {
        self.checksum = Some(checksum);
        self
    }

    /// Total number of columns across all tables.
    #[must_use]
    pub fn column_count(&self) -> usize {
        self.tables.iter().map(|table| table.columns.len()).sum()
    }
}

/// A base table and its structure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    /// Table name.
    pub name: String,
    /// Columns in ordinal order.
    pub columns: Vec<Column>,
    /// Indexes defined on the table.
    pub indexes: Vec<Index>,
    /// Constraints defined on the table.
    pub constraints: Vec<Constraint>,
    /// Table comment.
    pub comment: Option<String>,
}

impl Table {
    /// Creates a table without indexes, constraints, or comment.
    #[must_use]
    pub fn new(name: impl Into<String>, columns: Vec<Column>) -> Self {
        Self {
            name: name.into(),
            columns,
            ..Self::default()
        }
    }
}

/// A table column.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    /// Column name.
    pub name: String,
    /// Database type name as reported by the catalog.
    pub data_type: String,
    /// Whether the column accepts `NULL`.
    pub nullable: bool,
    /// Default expression.
    pub default: Option<String>,
    /// Part of the primary key.
    pub is_primary_key: bool,
    /// Part of a foreign key.
    pub is_foreign_key: bool,
    /// Column comment.
    pub comment: Option<String>,
}

impl Column {
    /// Creates a nullable, non-key column.
    #[must_use]
    pub fn new(name: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into(),
            nullable: true,
            ..Self::default()
        }
    }

    /// Marks the column as primary key, which also makes it non-nullable.
    #[must_use]
    pub const fn primary_key(mut self) -> Self {
        self.is_primary_key = true;
        self.nullable = false;
        self
    }

    /// Marks the column as a foreign key.
    #[must_use]
    pub const fn foreign_key(mut self) -> Self {
        self.is_foreign_key = true;
        self
    }

    /// Sets the column comment.
    #[must_use]
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }
}

/// A table index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Index {
    /// Index name.
    pub name: String,
    /// Indexed columns in key order.
    pub columns: Vec<String>,
    /// Whether the index enforces uniqueness.
    pub is_unique: bool,
}

/// Kind of a table constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConstraintKind {
    /// `PRIMARY KEY`.
    PrimaryKey,
    /// `FOREIGN KEY`.
    ForeignKey,
    /// `UNIQUE`.
    Unique,
    /// `CHECK`.
    Check,
}

impl ConstraintKind {
    /// Maps an `information_schema` constraint type.
    #[must_use]
    pub fn from_catalog(value: &str) -> Option<Self> {
        match value {
            "PRIMARY KEY" => Some(Self::PrimaryKey),
            "FOREIGN KEY" => Some(Self::ForeignKey),
            "UNIQUE" => Some(Self::Unique),
            "CHECK" => Some(Self::Check),
            _ => None,
        }
    }
}

/// A table constraint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Constraint {
    /// Constraint name.
    pub name: String,
    /// Constraint kind.
    pub kind: ConstraintKind,
    /// Constrained columns.
    pub columns: Vec<String>,
}

/// A foreign-key edge from one column to another.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Relation {
    /// Referencing table.
    pub source_table: String,
    /// Referencing column.
    pub source_column: String,
    /// Referenced table.
    pub target_table: String,
    /// Referenced column.
    pub target_column: String,
}
