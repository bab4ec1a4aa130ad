//! Adapter implementations for query ports.

pub mod http;
pub mod validator;

pub use http::HttpLlm;
pub use validator::SqlQueryValidator;
