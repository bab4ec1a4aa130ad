//! Error types for status parsing.

use thiserror::Error;

/// Error returned while parsing an ingestion status from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown ingestion status: {0}")]
pub struct ParseIngestionStatusError(pub String);
