//! Queue-driven ingestion through the worker loop.

use super::helpers::{System, system};
use nl2query::ingestion::ports::VectorStore;
use nl2query::status::{domain::IngestionStatus, ports::StatusRegistry};
use rstest::rstest;
use tokio_util::sync::CancellationToken;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn worker_loop_ingests_synced_tenants(system: System) {
    let sys = system.with_crm_client();
    let token = CancellationToken::new();
    let tenant_id = sys
        .workspaces
        .sync_client_database(&token, &sys.db_url)
        .await
        .expect("sync")
        .into_metadata()
        .and_then(|metadata| metadata.tenant_id)
        .expect("stamped");

    let System {
        queue,
        receiver,
        workspaces,
        worker,
        vectors,
        ..
    } = sys;
    drop(workspaces);
    drop(queue);
    worker.run(token.clone(), receiver).await;

    assert!(vectors.exists(&tenant_id).await.expect("exists"));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn failed_extraction_is_recorded_as_error(system: System) {
    let sys = system.with_crm_client();
    let token = CancellationToken::new();
    let tenant_id = sys
        .workspaces
        .sync_client_database(&token, &sys.db_url)
        .await
        .expect("sync")
        .into_metadata()
        .and_then(|metadata| metadata.tenant_id)
        .expect("stamped");
    sys.client.remove(&sys.db_url).expect("take client offline");

    let System {
        queue,
        receiver,
        workspaces,
        worker,
        status,
        ..
    } = sys;
    drop(workspaces);
    drop(queue);
    worker.run(token.clone(), receiver).await;

    let record = status.get(&tenant_id).await.expect("status");
    assert_eq!(record.status(), IngestionStatus::Error);
}
