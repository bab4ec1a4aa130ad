//! Per-tenant ingestion status registry.
//!
//! The registry is the only coordination surface shared by foreground
//! services and ingestion workers: a tenant whose record reads
//! `IN_PROGRESS` rejects sync and query requests until the worker records
//! the outcome. A missing record reads as `DONE`, so freshly registered
//! tenants need no priming write.
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]

pub mod adapters;
pub mod domain;
pub mod ports;
