//! Port contracts for workspace persistence and synchronization.
//!
//! Ports define infrastructure-agnostic interfaces used by the workspace
//! service and the ingestion worker.

pub mod cipher;
pub mod client_database;
pub mod hasher;
pub mod store;
pub mod task_queue;

pub use cipher::{UrlCipher, UrlCipherError};
pub use client_database::{
    ClientConnection, ClientDatabase, ClientDatabaseError, ClientDatabaseResult,
};
pub use hasher::{SchemaHasher, SchemaHasherError};
pub use store::{WorkspaceStore, WorkspaceStoreError, WorkspaceStoreResult};
pub use task_queue::{TaskQueue, TaskQueueError};
