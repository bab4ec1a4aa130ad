//! Domain model for ingestion status tracking.

mod error;
mod status;

pub use error::ParseIngestionStatusError;
pub use status::{IngestionStatus, StatusRecord};
