//! Application services for workspace registration and synchronization.

mod sync;

pub use sync::{
    WorkspacePorts, WorkspaceService, WorkspaceServiceError, WorkspaceServiceResult,
};
