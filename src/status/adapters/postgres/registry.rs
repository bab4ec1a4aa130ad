//! `PostgreSQL` status registry implementation.

use super::{
    models::{StatusRow, StatusUpsertRow},
    schema::ingestion_statuses,
};
use crate::db::PgPool;
use crate::status::{
    domain::{IngestionStatus, StatusRecord},
    ports::{StatusRegistry, StatusRegistryError, StatusRegistryResult},
};
use crate::tenant::TenantId;
use async_trait::async_trait;
use chrono::Utc;
use diesel::pg::PgConnection;
use diesel::prelude::*;

/// `PostgreSQL`-backed status registry.
///
/// Setters upsert on the tenant key; `set_done` and `clear` delete the row.
#[derive(Debug, Clone)]
pub struct PostgresStatusRegistry {
    pool: PgPool,
}

impl PostgresStatusRegistry {
    /// Creates a registry from a connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> StatusRegistryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> StatusRegistryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(StatusRegistryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(StatusRegistryError::persistence)?
    }

    async fn upsert(
        &self,
        tenant_id: &TenantId,
        status: IngestionStatus,
        message: Option<&str>,
    ) -> StatusRegistryResult<()> {
        let row = StatusUpsertRow {
            tenant_id: tenant_id.as_str().to_owned(),
            status: status.as_str().to_owned(),
            message: message.map(ToOwned::to_owned),
            updated_at: Utc::now(),
        };

        self.run_blocking(move |connection| {
            diesel::insert_into(ingestion_statuses::table)
                .values(&row)
                .on_conflict(ingestion_statuses::tenant_id)
                .do_update()
                .set(&row)
                .execute(connection)
                .map_err(StatusRegistryError::persistence)?;
            Ok(())
        })
        .await
    }

    async fn delete(&self, tenant_id: &TenantId) -> StatusRegistryResult<()> {
        let key = tenant_id.as_str().to_owned();
        self.run_blocking(move |connection| {
            diesel::delete(ingestion_statuses::table.filter(ingestion_statuses::tenant_id.eq(&key)))
                .execute(connection)
                .map_err(StatusRegistryError::persistence)?;
            Ok(())
        })
        .await
    }
}

#[async_trait]
impl StatusRegistry for PostgresStatusRegistry {
    async fn set_in_progress(&self, tenant_id: &TenantId) -> StatusRegistryResult<()> {
        self.upsert(tenant_id, IngestionStatus::InProgress, None).await
    }

    async fn set_done(&self, tenant_id: &TenantId) -> StatusRegistryResult<()> {
        self.delete(tenant_id).await
    }

    async fn set_error(&self, tenant_id: &TenantId, message: &str) -> StatusRegistryResult<()> {
        self.upsert(tenant_id, IngestionStatus::Error, Some(message))
            .await
    }

    async fn set_warn(&self, tenant_id: &TenantId, message: &str) -> StatusRegistryResult<()> {
        self.upsert(tenant_id, IngestionStatus::Warn, Some(message))
            .await
    }

    async fn get(&self, tenant_id: &TenantId) -> StatusRegistryResult<StatusRecord> {
        let key = tenant_id.as_str().to_owned();
        self.run_blocking(move |connection| {
            let row = ingestion_statuses::table
                .filter(ingestion_statuses::tenant_id.eq(&key))
                .select(StatusRow::as_select())
                .first::<StatusRow>(connection)
                .optional()
                .map_err(StatusRegistryError::persistence)?;
            row.map_or_else(|| Ok(StatusRecord::done()), row_to_record)
        })
        .await
    }

    async fn clear(&self, tenant_id: &TenantId) -> StatusRegistryResult<()> {
        self.delete(tenant_id).await
    }
}

fn row_to_record(row: StatusRow) -> StatusRegistryResult<StatusRecord> {
    let status = IngestionStatus::try_from(row.status.as_str())
        .map_err(StatusRegistryError::invalid_persisted_data)?;
    Ok(StatusRecord::new(status, row.message))
}
