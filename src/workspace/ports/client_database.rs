//! Port for tenant-owned client databases.

use crate::tenant::DbUrl;
use crate::workspace::domain::{Row, SchemaMetadata};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for client database operations.
pub type ClientDatabaseResult<T> = Result<T, ClientDatabaseError>;

/// Opens sessions against client databases.
///
/// Each call yields an independent session, so concurrent requests never
/// share a connection.
#[async_trait]
pub trait ClientDatabase: Send + Sync {
    /// Opens a session.
    ///
    /// # Errors
    ///
    /// Returns [`ClientDatabaseError::Connection`] when the database cannot
    /// be reached.
    async fn connect(&self, url: &DbUrl) -> ClientDatabaseResult<Box<dyn ClientConnection>>;
}

/// A live session on one client database.
#[async_trait]
pub trait ClientConnection: Send + Sync {
    /// Runs a read query and returns its rows.
    async fn execute(&self, query: &str) -> ClientDatabaseResult<Vec<Row>>;

    /// Plans a query without running it.
    async fn execute_dry_run(&self, query: &str) -> ClientDatabaseResult<()>;

    /// Extracts the schema of the connected database.
    async fn database_metadata(&self) -> ClientDatabaseResult<SchemaMetadata>;

    /// Ends the session.
    async fn close(&self) -> ClientDatabaseResult<()>;
}

/// Errors returned by client database implementations.
#[derive(Debug, Clone, Error)]
pub enum ClientDatabaseError {
    /// The database could not be reached.
    #[error("client database connection failed: {0}")]
    Connection(Arc<dyn std::error::Error + Send + Sync>),

    /// The database rejected a query.
    #[error("{0}")]
    Execution(Arc<dyn std::error::Error + Send + Sync>),

    /// Schema extraction failed.
    #[error("schema extraction failed: {0}")]
    Metadata(Arc<dyn std::error::Error + Send + Sync>),

    /// The session was already closed.
    #[error("client database session is closed")]
    Closed,
}

impl ClientDatabaseError {
    /// Wraps a connection failure.
    pub fn connection(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Connection(Arc::new(err))
    }

    /// Wraps a query failure.
    pub fn execution(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Execution(Arc::new(err))
    }

    /// Wraps a schema extraction failure.
    pub fn metadata(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Metadata(Arc::new(err))
    }
}
