//! SQL generation port.

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

use crate::ingestion::domain::Vector;

/// Result type for LLM operations.
pub type LlmResult<T> = Result<T, LlmError>;

/// Generates SQL from a prompt grounded on schema vectors.
#[async_trait]
pub trait Llm: Send + Sync {
    /// Generates one SQL query.
    ///
    /// `additional` carries feedback from the previous attempt: the rejected
    /// query followed by the reason it was rejected. It is empty on the
    /// first attempt.
    async fn generate_query(
        &self,
        prompt: &str,
        contexts: &[Vector],
        additional: &[String],
    ) -> LlmResult<String>;
}

/// Errors returned by LLM implementations.
#[derive(Debug, Clone, Error)]
pub enum LlmError {
    /// The backend could not be reached or rejected the request.
    #[error("query generation request failed: {0}")]
    Request(Arc<dyn std::error::Error + Send + Sync>),

    /// The prompt template failed to render.
    #[error("prompt rendering failed: {0}")]
    Prompt(String),

    /// The backend answered without usable SQL.
    #[error("invalid generation response: {0}")]
    InvalidResponse(String),
}

impl LlmError {
    /// Wraps a transport or backend failure.
    pub fn request(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Request(Arc::new(err))
    }
}
