//! Tenant lifecycle from first sync to deletion.

use super::helpers::{CUSTOMER_QUERY, ScriptedLlm, System, customer_rows, system};
use nl2query::error::ApiError;
use nl2query::ingestion::ports::VectorStore;
use nl2query::query::{domain::QueryWarning, services::QueryPipelineError};
use nl2query::status::{domain::IngestionStatus, ports::StatusRegistry};
use nl2query::workspace::domain::SyncOutcome;
use rstest::rstest;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn synced_schema_is_ingested_and_queryable(system: System) {
    let mut sys = system.with_crm_client();
    let token = CancellationToken::new();

    let outcome = sys
        .workspaces
        .sync_client_database(&token, &sys.db_url)
        .await
        .expect("sync should succeed");
    let metadata = outcome.into_metadata().expect("first sync enqueues ingestion");
    let tenant_id = metadata.tenant_id.clone().expect("metadata is stamped");

    let task = sys.receiver.recv().await.expect("task should be queued");
    assert_eq!(task.tenant_id, tenant_id);
    let written = sys.worker.process(&token, task).await.expect("ingestion");
    assert_eq!(written, metadata.column_count());

    let record = sys.workspaces.status(&token, &tenant_id).await.expect("status");
    assert_eq!(record.status(), IngestionStatus::Done);
    let stored = sys
        .vectors
        .search(&tenant_id, &[1.0; 8], 100)
        .await
        .expect("search");
    assert_eq!(stored.len(), 5);

    let llm = ScriptedLlm::new([CUSTOMER_QUERY]);
    let result = sys
        .pipeline(llm.clone())
        .prompt_to_query_data(&token, &tenant_id, "list customer names", true)
        .await
        .expect("query should succeed");

    assert_eq!(result.warning, None);
    assert_eq!(result.query.result_query(), Some(CUSTOMER_QUERY));
    assert_eq!(result.query.result_data(), Some(customer_rows().as_slice()));
    assert_eq!(llm.calls(), vec![(5, Vec::new())]);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unchanged_schema_is_not_requeued(system: System) {
    let mut sys = system.with_crm_client();
    let token = CancellationToken::new();
    sys.workspaces
        .sync_client_database(&token, &sys.db_url)
        .await
        .expect("first sync");
    sys.receiver.recv().await.expect("first task");

    let second = sys
        .workspaces
        .sync_client_database(&token, &sys.db_url)
        .await
        .expect("second sync");

    assert_eq!(second, SyncOutcome::Unchanged);
    let pending = tokio::time::timeout(Duration::from_millis(50), sys.receiver.recv()).await;
    assert!(pending.is_err(), "no task should be queued for an unchanged schema");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn failed_ingestion_is_requeued_by_the_next_sync(system: System) {
    let mut sys = system.with_crm_client();
    let token = CancellationToken::new();
    let tenant_id = sys
        .workspaces
        .sync_client_database(&token, &sys.db_url)
        .await
        .expect("first sync")
        .into_metadata()
        .and_then(|metadata| metadata.tenant_id)
        .expect("stamped");
    let task = sys.receiver.recv().await.expect("first task");
    sys.failing_worker()
        .process(&token, task)
        .await
        .expect_err("embedding should fail");
    let failed = sys.workspaces.status(&token, &tenant_id).await.expect("status");
    assert_eq!(failed.status(), IngestionStatus::Error);

    let resync = sys
        .workspaces
        .sync_client_database(&token, &sys.db_url)
        .await
        .expect("resync");

    assert!(matches!(resync, SyncOutcome::Enqueued(_)));
    let retry = tokio::time::timeout(Duration::from_millis(50), sys.receiver.recv())
        .await
        .expect("retry task should be queued")
        .expect("queue open");
    let written = sys.worker.process(&token, retry).await.expect("ingestion");
    assert_eq!(written, 5);
    let recovered = sys.workspaces.status(&token, &tenant_id).await.expect("status");
    assert_eq!(recovered.status(), IngestionStatus::Done);
    assert!(sys.vectors.exists(&tenant_id).await.expect("exists"));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn ingestion_in_progress_blocks_sync_and_query(system: System) {
    let sys = system.with_crm_client();
    let token = CancellationToken::new();
    let metadata = sys
        .workspaces
        .sync_client_database(&token, &sys.db_url)
        .await
        .expect("sync")
        .into_metadata()
        .expect("enqueued");
    let tenant_id = metadata.tenant_id.expect("stamped");
    sys.status
        .set_in_progress(&tenant_id)
        .await
        .expect("mark in progress");

    let sync_err = sys
        .workspaces
        .sync_client_database(&token, &sys.db_url)
        .await
        .expect_err("sync should be rejected");
    let query_err = sys
        .pipeline(ScriptedLlm::default())
        .prompt_to_query_data(&token, &tenant_id, "anything", true)
        .await
        .expect_err("query should be rejected");

    assert!(ApiError::from(&sync_err).is_status_in_progress());
    assert!(matches!(query_err, QueryPipelineError::StatusInProgress(_)));
    assert_eq!(
        ApiError::from(&query_err).to_string(),
        format!("Workspace ingestion is in progress: {tenant_id}")
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unreachable_client_degrades_to_query_only(system: System) {
    let mut sys = system.with_crm_client();
    let token = CancellationToken::new();
    let tenant_id = sys
        .workspaces
        .sync_client_database(&token, &sys.db_url)
        .await
        .expect("sync")
        .into_metadata()
        .and_then(|metadata| metadata.tenant_id)
        .expect("stamped");
    let task = sys.receiver.recv().await.expect("task");
    sys.worker.process(&token, task).await.expect("ingestion");
    sys.client.remove(&sys.db_url).expect("take client offline");

    let resync = sys
        .workspaces
        .sync_client_database(&token, &sys.db_url)
        .await
        .expect("resync");
    let result = sys
        .pipeline(ScriptedLlm::new([CUSTOMER_QUERY]))
        .prompt_to_query_data(&token, &tenant_id, "customers", true)
        .await
        .expect("query");

    assert_eq!(resync, SyncOutcome::ClientUnreachable);
    assert_eq!(result.warning, Some(QueryWarning::WontExecute));
    assert_eq!(result.query.result_query(), Some(CUSTOMER_QUERY));
    assert_eq!(result.query.result_data(), None);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn deleted_tenant_leaves_no_trace(system: System) {
    let mut sys = system.with_crm_client();
    let token = CancellationToken::new();
    let tenant_id = sys
        .workspaces
        .sync_client_database(&token, &sys.db_url)
        .await
        .expect("sync")
        .into_metadata()
        .and_then(|metadata| metadata.tenant_id)
        .expect("stamped");
    let task = sys.receiver.recv().await.expect("task");
    sys.worker.process(&token, task).await.expect("ingestion");

    let deleted = sys.workspaces.delete(&token, &tenant_id).await.expect("delete");

    assert!(deleted);
    assert!(sys
        .workspaces
        .get_by_tenant_id(&token, &tenant_id)
        .await
        .expect("lookup")
        .is_none());
    assert!(!sys.vectors.exists(&tenant_id).await.expect("exists"));
    assert!(sys.workspaces.list_all(&token).await.expect("list").is_empty());
}
