//! nl2query: natural-language to SQL over tenant client databases.
//!
//! This crate registers client databases as tenant workspaces, ingests
//! their schemas into a per-tenant vector index, and turns natural-language
//! prompts into validated SQL that can optionally be executed.
//!
//! # Architecture
//!
//! nl2query follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (database, HTTP, memory)
//!
//! # Modules
//!
//! - [`status`]: Per-tenant ingestion status registry
//! - [`workspace`]: Workspace persistence and schema synchronization
//! - [`ingestion`]: Schema embedding and the ingestion worker
//! - [`query`]: Prompt-to-query generation with bounded retries
//! - [`tenant`]: Tenant identity shared by every context
//! - [`config`]: Settings loaded from the environment

pub mod cancellation;
pub mod config;
pub mod db;
pub mod error;
pub mod ingestion;
pub mod query;
pub mod status;
pub mod tenant;
pub mod workspace;
