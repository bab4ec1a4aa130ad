//! Port contracts for ingestion status tracking.

mod registry;

pub use registry::{StatusRegistry, StatusRegistryError, StatusRegistryResult};
