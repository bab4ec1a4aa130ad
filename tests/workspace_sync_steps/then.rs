//! Then steps for workspace sync BDD scenarios.

use super::world::{SyncWorld, run_async};
use nl2query::error::ApiError;
use nl2query::workspace::{
    adapters::hasher::Sha256SchemaHasher,
    domain::SyncOutcome,
    ports::{SchemaHasher, WorkspaceStore},
};
use rstest_bdd_macros::then;

fn last_outcome(world: &SyncWorld) -> Result<&SyncOutcome, eyre::Report> {
    world
        .last_sync_result
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing sync result in scenario world"))?
        .as_ref()
        .map_err(|err| eyre::eyre!("unexpected sync failure: {err}"))
}

#[then("{count:usize} ingestion task is enqueued")]
fn tasks_enqueued(world: &SyncWorld, count: usize) -> Result<(), eyre::Report> {
    let actual = world.queue.count();
    if actual != count {
        return Err(eyre::eyre!("expected {count} enqueued tasks, found {actual}"));
    }
    Ok(())
}

#[then("the workspace stores the returned schema checksum")]
fn workspace_stores_checksum(world: &SyncWorld) -> Result<(), eyre::Report> {
    let returned = last_outcome(world)?
        .metadata()
        .and_then(|metadata| metadata.checksum.clone())
        .ok_or_else(|| eyre::eyre!("sync returned no checksummed metadata"))?;
    let tenant_id = Sha256SchemaHasher::new().tenant_id(&world.db_url);
    let stored = run_async(world.store.find_by_tenant_id(&tenant_id))
        .map_err(|err| eyre::eyre!("workspace lookup failed: {err}"))?
        .ok_or_else(|| eyre::eyre!("workspace was not persisted"))?;

    if stored.checksum() != &returned {
        return Err(eyre::eyre!(
            "stored checksum {} differs from returned {returned}",
            stored.checksum()
        ));
    }
    Ok(())
}

#[then("the sync reports an unchanged schema")]
fn sync_unchanged(world: &SyncWorld) -> Result<(), eyre::Report> {
    let outcome = last_outcome(world)?;
    if outcome != &SyncOutcome::Unchanged {
        return Err(eyre::eyre!("expected unchanged schema, got {outcome:?}"));
    }
    Ok(())
}

#[then("the sync reports an unreachable client")]
fn sync_unreachable(world: &SyncWorld) -> Result<(), eyre::Report> {
    let outcome = last_outcome(world)?;
    if outcome != &SyncOutcome::ClientUnreachable {
        return Err(eyre::eyre!("expected unreachable client, got {outcome:?}"));
    }
    Ok(())
}

#[then("the sync is rejected with status {status:u16}")]
fn sync_rejected(world: &SyncWorld, status: u16) -> Result<(), eyre::Report> {
    let result = world
        .last_sync_result
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing sync result in scenario world"))?;
    let Err(err) = result else {
        return Err(eyre::eyre!("expected sync rejection, got {result:?}"));
    };
    let api_error = ApiError::from(err);
    if api_error.status_code() != status {
        return Err(eyre::eyre!(
            "expected status {status}, got {}",
            api_error.status_code()
        ));
    }
    Ok(())
}
