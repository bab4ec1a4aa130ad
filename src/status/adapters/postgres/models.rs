//! Diesel row models for ingestion status persistence.

use super::schema::ingestion_statuses;
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Query result row for a status record.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = ingestion_statuses)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct StatusRow {
    /// Status flag in its storage form.
    pub status: String,
    /// Optional diagnostic message.
    pub message: Option<String>,
}

/// Upsert model for a status record.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = ingestion_statuses)]
#[diesel(treat_none_as_null = true)]
pub struct StatusUpsertRow {
    /// Tenant identifier.
    pub tenant_id: String,
    /// Status flag in its storage form.
    pub status: String,
    /// Optional diagnostic message.
    pub message: Option<String>,
    /// Write timestamp.
    pub updated_at: DateTime<Utc>,
}
