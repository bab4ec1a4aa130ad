//! Natural-language prompt to SQL query pipeline.
//!
//! A prompt is embedded, matched against the tenant's schema vectors, and
//! handed to an LLM together with the retrieved column documents. Generated
//! SQL must pass the validator before it may run; read-only queries are then
//! executed against the client database when the caller asks for data.
//! Validation failures feed an inner repair loop and execution failures an
//! outer one, both bounded by [`crate::config::QueryPipelineConfig`].
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Application services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
