//! Domain model for generated queries and their advisory warnings.

mod query;
mod warning;

pub use crate::workspace::domain::Row;
pub use query::{Query, QueryOutcome};
pub use warning::{
    DDL_DML_DETECTED_WARNING, QUERY_GENERATED_UNSAFE_WARNING, QueryWarning,
    WONT_EXECUTE_WARNING,
};
