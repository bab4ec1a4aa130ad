//! Given steps for workspace sync BDD scenarios.

use super::world::{SyncWorld, run_async};
use eyre::WrapErr;
use nl2query::status::ports::StatusRegistry;
use nl2query::workspace::{
    adapters::{hasher::Sha256SchemaHasher, memory::InMemoryDatabase},
    domain::{Column, SchemaMetadata, Table},
    ports::SchemaHasher,
};
use rstest_bdd_macros::given;

fn publish_schema(world: &SyncWorld) -> Result<(), eyre::Report> {
    let metadata = SchemaMetadata::new(world.tables.clone(), Vec::new());
    world
        .client
        .insert(&world.db_url, InMemoryDatabase::new(metadata))
        .wrap_err("register client database")
}

#[given(r#"a reachable client database with a "{table}" table"#)]
fn reachable_client(world: &mut SyncWorld, table: String) -> Result<(), eyre::Report> {
    world.tables = vec![Table::new(
        table,
        vec![Column::new("id", "integer").primary_key(), Column::new("name", "text")],
    )];
    publish_schema(world)
}

#[given("an unreachable client database")]
fn unreachable_client(world: &mut SyncWorld) {
    world.tables.clear();
}

#[given("the client database has already been synced")]
fn already_synced(world: &mut SyncWorld) -> Result<(), eyre::Report> {
    let cancel = tokio_util::sync::CancellationToken::new();
    run_async(world.service.sync_client_database(&cancel, &world.db_url))
        .wrap_err("initial sync")?;
    Ok(())
}

#[given(r#"the client database gains a "{table}" table"#)]
fn schema_gains_table(world: &mut SyncWorld, table: String) -> Result<(), eyre::Report> {
    world.tables.push(Table::new(
        table,
        vec![Column::new("id", "integer").primary_key()],
    ));
    publish_schema(world)
}

#[given("ingestion is in progress for the tenant")]
fn ingestion_in_progress(world: &mut SyncWorld) -> Result<(), eyre::Report> {
    let tenant_id = Sha256SchemaHasher::new().tenant_id(&world.db_url);
    run_async(world.status.set_in_progress(&tenant_id)).wrap_err("mark tenant in progress")
}
