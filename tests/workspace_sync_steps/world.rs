//! Shared world state for workspace sync BDD scenarios.

use async_trait::async_trait;
use mockable::DefaultClock;
use nl2query::ingestion::adapters::InMemoryVectorStore;
use nl2query::status::adapters::memory::InMemoryStatusRegistry;
use nl2query::tenant::DbUrl;
use nl2query::workspace::{
    adapters::{
        cipher::{KEY_LEN, XChaChaUrlCipher},
        hasher::Sha256SchemaHasher,
        memory::{InMemoryClientDatabase, InMemoryWorkspaceStore},
    },
    domain::{IngestionTask, SyncOutcome, Table},
    ports::{TaskQueue, TaskQueueError},
    services::{WorkspacePorts, WorkspaceService, WorkspaceServiceError},
};
use rstest::fixture;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Service type used by the BDD world.
pub type TestWorkspaceService = WorkspaceService<DefaultClock>;

/// Task queue that only counts enqueued tasks.
#[derive(Default)]
pub struct CountingQueue {
    enqueued: AtomicUsize,
}

impl CountingQueue {
    /// Returns how many tasks were enqueued.
    pub fn count(&self) -> usize {
        self.enqueued.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TaskQueue for CountingQueue {
    async fn enqueue_ingestion(&self, _task: IngestionTask) -> Result<(), TaskQueueError> {
        self.enqueued.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Scenario world for workspace sync behaviour tests.
pub struct SyncWorld {
    /// The workspace service under test.
    pub service: TestWorkspaceService,
    /// Client database URL synced by every scenario.
    pub db_url: DbUrl,
    /// Tables currently published by the client database.
    pub tables: Vec<Table>,
    /// Status registry shared with the service.
    pub status: Arc<InMemoryStatusRegistry>,
    /// Workspace store shared with the service.
    pub store: Arc<InMemoryWorkspaceStore>,
    /// Client databases reachable by the service.
    pub client: Arc<InMemoryClientDatabase>,
    /// Queue counting enqueued ingestion tasks.
    pub queue: Arc<CountingQueue>,
    /// Result of the last sync attempt.
    pub last_sync_result: Option<Result<SyncOutcome, WorkspaceServiceError>>,
}

impl SyncWorld {
    /// Creates a world with no registered client database.
    #[must_use]
    pub fn new() -> Self {
        let status = Arc::new(InMemoryStatusRegistry::new());
        let store = Arc::new(InMemoryWorkspaceStore::new());
        let client = Arc::new(InMemoryClientDatabase::new());
        let queue = Arc::new(CountingQueue::default());
        let service = WorkspaceService::new(
            WorkspacePorts {
                store: store.clone(),
                status: status.clone(),
                client_database: client.clone(),
                hasher: Arc::new(Sha256SchemaHasher::new()),
                cipher: Arc::new(XChaChaUrlCipher::new(&[0x42; KEY_LEN])),
                task_queue: queue.clone(),
                vector_store: Arc::new(InMemoryVectorStore::new()),
            },
            Arc::new(DefaultClock),
        );
        Self {
            service,
            db_url: DbUrl::new("postgres://bdd@client/app").expect("valid url"),
            tables: Vec::new(),
            status,
            store,
            client,
            queue,
            last_sync_result: None,
        }
    }
}

impl Default for SyncWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> SyncWorld {
    SyncWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
