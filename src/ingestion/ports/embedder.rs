//! Text embedding port.

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for embedder operations.
pub type EmbedderResult<T> = Result<T, EmbedderError>;

/// Turns text into fixed-length vectors.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Embeds a single text.
    async fn embed(&self, text: &str) -> EmbedderResult<Vec<f32>>;

    /// Embeds several texts, returning vectors in input order.
    async fn embed_batch(&self, texts: &[String]) -> EmbedderResult<Vec<Vec<f32>>>;
}

/// Errors returned by embedder implementations.
#[derive(Debug, Clone, Error)]
pub enum EmbedderError {
    /// The embedding backend could not be reached or rejected the request.
    #[error("embedding request failed: {0}")]
    Request(Arc<dyn std::error::Error + Send + Sync>),

    /// The backend answered with an unusable payload.
    #[error("invalid embedding response: {0}")]
    InvalidResponse(String),

    /// The backend returned a different number of vectors than requested.
    #[error("embedding count mismatch: expected {expected}, got {actual}")]
    CountMismatch {
        /// Number of inputs sent.
        expected: usize,
        /// Number of vectors received.
        actual: usize,
    },
}

impl EmbedderError {
    /// Wraps a transport or backend failure.
    pub fn request(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Request(Arc::new(err))
    }
}
