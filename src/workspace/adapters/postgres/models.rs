//! Diesel row models for workspace persistence and catalog introspection.

use super::schema::workspaces;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::sql_types::{Bool, Integer, Json, Nullable, Text};

/// Stored workspace row; also the upsert payload.
#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = workspaces)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct WorkspaceRow {
    /// Tenant identifier.
    pub tenant_id: String,
    /// URL ciphertext.
    pub encrypted_db_url: String,
    /// Schema checksum.
    pub checksum: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Aggregated JSON result of a client query.
#[derive(Debug, QueryableByName)]
pub struct JsonRowsResult {
    /// Rows as a JSON array of objects.
    #[diesel(sql_type = Json)]
    pub rows: serde_json::Value,
}

/// Catalog row for a base table.
#[derive(Debug, Clone, QueryableByName)]
pub struct TableCatalogRow {
    /// Table name.
    #[diesel(sql_type = Text)]
    pub table_name: String,
    /// Table comment.
    #[diesel(sql_type = Nullable<Text>)]
    pub comment: Option<String>,
}

/// Catalog row for a column.
#[derive(Debug, Clone, QueryableByName)]
pub struct ColumnCatalogRow {
    /// Owning table.
    #[diesel(sql_type = Text)]
    pub table_name: String,
    /// Column name.
    #[diesel(sql_type = Text)]
    pub column_name: String,
    /// Reported data type.
    #[diesel(sql_type = Text)]
    pub data_type: String,
    /// Whether `NULL` is accepted.
    #[diesel(sql_type = Bool)]
    pub nullable: bool,
    /// Default expression.
    #[diesel(sql_type = Nullable<Text>)]
    pub column_default: Option<String>,
    /// Column comment.
    #[diesel(sql_type = Nullable<Text>)]
    pub comment: Option<String>,
    /// One-based ordinal position.
    #[diesel(sql_type = Integer)]
    pub ordinal_position: i32,
}

/// Catalog row for one column of a constraint.
#[derive(Debug, Clone, QueryableByName)]
pub struct ConstraintCatalogRow {
    /// Owning table.
    #[diesel(sql_type = Text)]
    pub table_name: String,
    /// Constraint name.
    #[diesel(sql_type = Text)]
    pub constraint_name: String,
    /// `information_schema` constraint type.
    #[diesel(sql_type = Text)]
    pub constraint_type: String,
    /// Constrained column; absent for table-level checks.
    #[diesel(sql_type = Nullable<Text>)]
    pub column_name: Option<String>,
}

/// Catalog row for one column of an index.
#[derive(Debug, Clone, QueryableByName)]
pub struct IndexCatalogRow {
    /// Owning table.
    #[diesel(sql_type = Text)]
    pub table_name: String,
    /// Index name.
    #[diesel(sql_type = Text)]
    pub index_name: String,
    /// Whether the index is unique.
    #[diesel(sql_type = Bool)]
    pub is_unique: bool,
    /// Indexed column.
    #[diesel(sql_type = Text)]
    pub column_name: String,
}

/// Catalog row for a foreign-key column pair.
#[derive(Debug, Clone, QueryableByName)]
pub struct RelationCatalogRow {
    /// Referencing table.
    #[diesel(sql_type = Text)]
    pub source_table: String,
    /// Referencing column.
    #[diesel(sql_type = Text)]
    pub source_column: String,
    /// Referenced table.
    #[diesel(sql_type = Text)]
    pub target_table: String,
    /// Referenced column.
    #[diesel(sql_type = Text)]
    pub target_column: String,
}
