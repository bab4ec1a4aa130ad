//! Application services for schema ingestion.

mod vectorize;
mod worker;

pub use vectorize::{IngestionService, IngestionServiceError, IngestionServiceResult};
pub use worker::IngestionWorker;
