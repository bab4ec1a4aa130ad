//! `PostgreSQL` workspace store.

use super::{models::WorkspaceRow, schema::workspaces};
use crate::db::PgPool;
use crate::tenant::TenantId;
use crate::workspace::{
    domain::{Checksum, EncryptedDbUrl, PersistedWorkspaceData, Workspace},
    ports::{WorkspaceStore, WorkspaceStoreError, WorkspaceStoreResult},
};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;

/// `PostgreSQL`-backed workspace store.
#[derive(Debug, Clone)]
pub struct PostgresWorkspaceStore {
    pool: PgPool,
}

impl PostgresWorkspaceStore {
    /// Creates a store from a connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> WorkspaceStoreResult<T>
    where
        F: FnOnce(&mut PgConnection) -> WorkspaceStoreResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(WorkspaceStoreError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(WorkspaceStoreError::persistence)?
    }
}

#[async_trait]
impl WorkspaceStore for PostgresWorkspaceStore {
    async fn connect(&self) -> WorkspaceStoreResult<()> {
        self.run_blocking(|connection| {
            diesel::sql_query("SELECT 1")
                .execute(connection)
                .map_err(WorkspaceStoreError::persistence)?;
            Ok(())
        })
        .await
    }

    async fn close(&self) -> WorkspaceStoreResult<()> {
        Ok(())
    }

    async fn find_by_tenant_id(
        &self,
        tenant_id: &TenantId,
    ) -> WorkspaceStoreResult<Option<Workspace>> {
        let key = tenant_id.as_str().to_owned();
        self.run_blocking(move |connection| {
            let row = workspaces::table
                .filter(workspaces::tenant_id.eq(&key))
                .select(WorkspaceRow::as_select())
                .first::<WorkspaceRow>(connection)
                .optional()
                .map_err(WorkspaceStoreError::persistence)?;
            row.map(row_to_workspace).transpose()
        })
        .await
    }

    async fn list_all(&self) -> WorkspaceStoreResult<Vec<Workspace>> {
        self.run_blocking(|connection| {
            let rows = workspaces::table
                .order(workspaces::tenant_id.asc())
                .select(WorkspaceRow::as_select())
                .load::<WorkspaceRow>(connection)
                .map_err(WorkspaceStoreError::persistence)?;
            rows.into_iter().map(row_to_workspace).collect()
        })
        .await
    }

    async fn upsert(&self, workspace: &Workspace) -> WorkspaceStoreResult<()> {
        let row = to_row(workspace);
        self.run_blocking(move |connection| {
            diesel::insert_into(workspaces::table)
                .values(&row)
                .on_conflict(workspaces::tenant_id)
                .do_update()
                .set((
                    workspaces::encrypted_db_url.eq(&row.encrypted_db_url),
                    workspaces::checksum.eq(&row.checksum),
                    workspaces::updated_at.eq(row.updated_at),
                ))
                .execute(connection)
                .map_err(WorkspaceStoreError::persistence)?;
            Ok(())
        })
        .await
    }

    async fn delete_by_tenant_id(&self, tenant_id: &TenantId) -> WorkspaceStoreResult<bool> {
        let key = tenant_id.as_str().to_owned();
        self.run_blocking(move |connection| {
            let deleted = diesel::delete(workspaces::table.filter(workspaces::tenant_id.eq(&key)))
                .execute(connection)
                .map_err(WorkspaceStoreError::persistence)?;
            Ok(deleted > 0)
        })
        .await
    }
}

fn to_row(workspace: &Workspace) -> WorkspaceRow {
    WorkspaceRow {
        tenant_id: workspace.tenant_id().as_str().to_owned(),
        encrypted_db_url: workspace.encrypted_db_url().as_str().to_owned(),
        checksum: workspace.checksum().as_str().to_owned(),
        created_at: workspace.created_at(),
        updated_at: workspace.updated_at(),
    }
}

fn row_to_workspace(row: WorkspaceRow) -> WorkspaceStoreResult<Workspace> {
    let WorkspaceRow {
        tenant_id,
        encrypted_db_url,
        checksum,
        created_at,
        updated_at,
    } = row;

    Ok(Workspace::from_persisted(PersistedWorkspaceData {
        tenant_id: TenantId::parse(tenant_id)
            .map_err(WorkspaceStoreError::invalid_persisted_data)?,
        encrypted_db_url: EncryptedDbUrl::new(encrypted_db_url)
            .map_err(WorkspaceStoreError::invalid_persisted_data)?,
        checksum: Checksum::new(checksum).map_err(WorkspaceStoreError::invalid_persisted_data)?,
        created_at,
        updated_at,
    }))
}
