//! Workspace registration and schema synchronization.
//!
//! A workspace binds a tenant to its encrypted client database URL and the
//! checksum of the last schema handed to ingestion. Synchronization
//! re-extracts the live schema, compares checksums, and enqueues
//! re-ingestion only when the schema drifted.
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Application services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
