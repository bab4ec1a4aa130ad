//! Service tests for workspace synchronization and lifecycle.
