//! In-memory workspace adapters for tests and local wiring.

mod client_database;
mod store;

pub use client_database::{InMemoryClientDatabase, InMemoryDatabase};
pub use store::InMemoryWorkspaceStore;
