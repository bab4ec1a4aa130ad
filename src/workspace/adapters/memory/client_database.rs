//! In-memory client database for tests and local wiring.
//!
//! Databases are registered per URL with fixed metadata and canned query
//! results. Connecting to an unregistered URL fails like an unreachable
//! server would.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{
    Arc, RwLock,
    atomic::{AtomicBool, AtomicUsize, Ordering},
};

use crate::tenant::DbUrl;
use crate::workspace::{
    domain::{Row, SchemaMetadata},
    ports::{ClientConnection, ClientDatabase, ClientDatabaseError, ClientDatabaseResult},
};

/// Canned contents of one client database.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDatabase {
    metadata: SchemaMetadata,
    results: HashMap<String, Vec<Row>>,
}

impl InMemoryDatabase {
    /// Creates a database exposing `metadata` and no queryable results.
    #[must_use]
    pub fn new(metadata: SchemaMetadata) -> Self {
        Self {
            metadata,
            results: HashMap::new(),
        }
    }

    /// Registers the rows returned for an exact query text.
    #[must_use]
    pub fn with_result(mut self, query: impl Into<String>, rows: Vec<Row>) -> Self {
        self.results.insert(normalize(&query.into()), rows);
        self
    }
}

/// Registry of in-memory client databases keyed by URL.
#[derive(Debug, Clone, Default)]
pub struct InMemoryClientDatabase {
    databases: Arc<RwLock<HashMap<String, InMemoryDatabase>>>,
    executions: Arc<AtomicUsize>,
}

impl InMemoryClientDatabase {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers or replaces the database reachable at `url`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientDatabaseError::Connection`] when the registry lock is
    /// poisoned.
    pub fn insert(&self, url: &DbUrl, database: InMemoryDatabase) -> ClientDatabaseResult<()> {
        let mut databases = self.databases.write().map_err(poisoned)?;
        databases.insert(url.expose().to_owned(), database);
        Ok(())
    }

    /// Makes `url` unreachable.
    ///
    /// # Errors
    ///
    /// Returns [`ClientDatabaseError::Connection`] when the registry lock is
    /// poisoned.
    pub fn remove(&self, url: &DbUrl) -> ClientDatabaseResult<()> {
        let mut databases = self.databases.write().map_err(poisoned)?;
        databases.remove(url.expose());
        Ok(())
    }

    /// Number of `execute` calls served so far, across all sessions.
    #[must_use]
    pub fn execution_count(&self) -> usize {
        self.executions.load(Ordering::SeqCst)
    }
}

fn poisoned(err: impl ToString) -> ClientDatabaseError {
    ClientDatabaseError::connection(std::io::Error::other(err.to_string()))
}

fn normalize(query: &str) -> String {
    query.trim().trim_end_matches(';').trim().to_owned()
}

#[async_trait]
impl ClientDatabase for InMemoryClientDatabase {
    async fn connect(&self, url: &DbUrl) -> ClientDatabaseResult<Box<dyn ClientConnection>> {
        let databases = self.databases.read().map_err(poisoned)?;
        let database = databases.get(url.expose()).cloned().ok_or_else(|| {
            ClientDatabaseError::connection(std::io::Error::new(
                std::io::ErrorKind::ConnectionRefused,
                "connection refused",
            ))
        })?;
        Ok(Box::new(InMemoryConnection {
            database,
            executions: Arc::clone(&self.executions),
            closed: AtomicBool::new(false),
        }))
    }
}

struct InMemoryConnection {
    database: InMemoryDatabase,
    executions: Arc<AtomicUsize>,
    closed: AtomicBool,
}

impl InMemoryConnection {
    fn ensure_open(&self) -> ClientDatabaseResult<()> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(ClientDatabaseError::Closed);
        }
        Ok(())
    }

    fn lookup(&self, query: &str) -> ClientDatabaseResult<&Vec<Row>> {
        self.database.results.get(&normalize(query)).ok_or_else(|| {
            ClientDatabaseError::execution(std::io::Error::other(format!(
                "query is not registered: {}",
                normalize(query)
            )))
        })
    }
}

#[async_trait]
impl ClientConnection for InMemoryConnection {
    async fn execute(&self, query: &str) -> ClientDatabaseResult<Vec<Row>> {
        self.ensure_open()?;
        self.executions.fetch_add(1, Ordering::SeqCst);
        self.lookup(query).cloned()
    }

    async fn execute_dry_run(&self, query: &str) -> ClientDatabaseResult<()> {
        self.ensure_open()?;
        self.lookup(query).map(|_| ())
    }

    async fn database_metadata(&self) -> ClientDatabaseResult<SchemaMetadata> {
        self.ensure_open()?;
        Ok(self.database.metadata.clone())
    }

    async fn close(&self) -> ClientDatabaseResult<()> {
        self.closed.store(true, Ordering::SeqCst);
        Ok(())
    }
}
