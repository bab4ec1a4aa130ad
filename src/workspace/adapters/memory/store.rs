//! In-memory workspace store.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use crate::tenant::TenantId;
use crate::workspace::{
    domain::Workspace,
    ports::{WorkspaceStore, WorkspaceStoreError, WorkspaceStoreResult},
};

/// Thread-safe in-memory workspace store keyed by tenant.
#[derive(Debug, Clone, Default)]
pub struct InMemoryWorkspaceStore {
    workspaces: Arc<RwLock<BTreeMap<TenantId, Workspace>>>,
}

impl InMemoryWorkspaceStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned(err: impl ToString) -> WorkspaceStoreError {
    WorkspaceStoreError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl WorkspaceStore for InMemoryWorkspaceStore {
    async fn connect(&self) -> WorkspaceStoreResult<()> {
        Ok(())
    }

    async fn close(&self) -> WorkspaceStoreResult<()> {
        Ok(())
    }

    async fn find_by_tenant_id(
        &self,
        tenant_id: &TenantId,
    ) -> WorkspaceStoreResult<Option<Workspace>> {
        let workspaces = self.workspaces.read().map_err(poisoned)?;
        Ok(workspaces.get(tenant_id).cloned())
    }

    async fn list_all(&self) -> WorkspaceStoreResult<Vec<Workspace>> {
        let workspaces = self.workspaces.read().map_err(poisoned)?;
        Ok(workspaces.values().cloned().collect())
    }

    async fn upsert(&self, workspace: &Workspace) -> WorkspaceStoreResult<()> {
        let mut workspaces = self.workspaces.write().map_err(poisoned)?;
        workspaces.insert(workspace.tenant_id().clone(), workspace.clone());
        Ok(())
    }

    async fn delete_by_tenant_id(&self, tenant_id: &TenantId) -> WorkspaceStoreResult<bool> {
        let mut workspaces = self.workspaces.write().map_err(poisoned)?;
        Ok(workspaces.remove(tenant_id).is_some())
    }
}
