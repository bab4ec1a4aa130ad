//! Port contracts for embedding and vector storage.

pub mod embedder;
pub mod vector_store;

pub use embedder::{Embedder, EmbedderError, EmbedderResult};
pub use vector_store::{VectorStore, VectorStoreError, VectorStoreResult};
