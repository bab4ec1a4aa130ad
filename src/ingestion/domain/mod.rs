//! Domain model for schema vectors.

mod document;
mod vector;

pub use document::{ColumnDocument, column_documents};
pub use vector::{Vector, VectorId, VectorMetadata};
