//! Schema ingestion into the per-tenant vector index.
//!
//! Each column of an extracted schema becomes one canonical text document,
//! one embedding, and one vector keyed by `(tenant, table, column)`. Workers
//! consume ingestion tasks, drive the status registry through
//! `IN_PROGRESS` to `DONE` or `ERROR`, and replace the tenant's vectors
//! wholesale.
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
