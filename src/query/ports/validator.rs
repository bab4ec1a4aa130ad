//! SQL safety validation port.

use thiserror::Error;

/// Decides whether generated SQL may be executed.
pub trait QueryValidator: Send + Sync {
    /// Returns `Ok(true)` when the query is a well-formed read-only query.
    ///
    /// # Errors
    ///
    /// Returns [`QueryValidationError`] naming the first rule the query
    /// breaks. Callers treat an error and `Ok(false)` alike.
    fn is_safe(&self, query: &str) -> Result<bool, QueryValidationError>;

    /// Returns whether the query contains a data or schema modifying
    /// statement outside comments and string literals.
    fn contains_ddl_dml(&self, query: &str) -> bool;
}

/// Reasons a query fails validation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum QueryValidationError {
    /// The query is blank.
    #[error("query is empty")]
    Empty,

    /// The query does not start with `SELECT` or `WITH`.
    #[error("query must start with SELECT or WITH")]
    NotReadOnly,

    /// A data or schema modifying keyword was found.
    #[error("query contains a DDL or DML statement: {0}")]
    DdlDml(String),

    /// Parentheses or quotes do not pair up.
    #[error("query has unbalanced parentheses or quotes")]
    Unbalanced,
}
