//! `PostgreSQL` adapters for workspace persistence and client databases.

mod client_database;
mod introspection;
mod models;
mod schema;
mod store;

pub use client_database::PostgresClientDatabase;
pub use store::PostgresWorkspaceStore;
