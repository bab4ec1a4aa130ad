//! `PostgreSQL` adapter for the ingestion status registry.

mod models;
mod registry;
mod schema;

pub use registry::PostgresStatusRegistry;
