//! Application services for prompt-to-query generation.

mod pipeline;

pub use pipeline::{QueryPipeline, QueryPipelineError, QueryPipelineResult, QueryPorts};
