//! When steps for workspace sync BDD scenarios.

use super::world::{SyncWorld, run_async};
use rstest_bdd_macros::when;
use tokio_util::sync::CancellationToken;

#[when("the client database is synced")]
fn sync_client_database(world: &mut SyncWorld) {
    let cancel = CancellationToken::new();
    world.last_sync_result = Some(run_async(
        world.service.sync_client_database(&cancel, &world.db_url),
    ));
}
