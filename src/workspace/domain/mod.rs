//! Domain model for workspaces and extracted schema metadata.
//!
//! Schema metadata types are plain data carriers shared with ingestion and
//! the client database adapters. The [`Workspace`] aggregate keeps its
//! fields private and only changes through clock-stamped transitions.

mod error;
mod ids;
mod schema;
mod sync;
mod workspace;

pub use error::WorkspaceDomainError;
pub use ids::{Checksum, EncryptedDbUrl};
pub use schema::{
    Column, Constraint, ConstraintKind, Index, Relation, Row, SchemaMetadata, Table,
};
pub use sync::{IngestionTask, SyncOutcome, USE_EXISTING_SCHEMA_WARNING};
pub use workspace::{PersistedWorkspaceData, Workspace};
