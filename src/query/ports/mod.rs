//! Port contracts for query generation and validation.

pub mod llm;
pub mod validator;

pub use llm::{Llm, LlmError, LlmResult};
pub use validator::{QueryValidationError, QueryValidator};
