//! Adapter implementations for ingestion ports.

pub mod http;
pub mod memory;

pub use http::HttpEmbedder;
pub use memory::InMemoryVectorStore;
