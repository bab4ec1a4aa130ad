//! Non-fatal advisories returned next to a generated query.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Message for a query generated without a reachable client database.
pub const WONT_EXECUTE_WARNING: &str =
    "Query won't be executed because connection to client database could not be established.";

/// Message for a query that modifies data or schema.
pub const DDL_DML_DETECTED_WARNING: &str = "DDL or DML statement detected. Query won't be executed.";

/// Message for a query that never passed validation.
pub const QUERY_GENERATED_UNSAFE_WARNING: &str = "Query could not be generated safely after retries.";

/// Reason a query was returned without result data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryWarning {
    /// Data was requested but the client database is unavailable.
    WontExecute,
    /// The query contains a DDL or DML statement.
    DdlDmlDetected,
    /// No generation passed validation within the retry budget.
    GeneratedUnsafe,
}

impl QueryWarning {
    /// Returns the stable caller-facing message.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::WontExecute => WONT_EXECUTE_WARNING,
            Self::DdlDmlDetected => DDL_DML_DETECTED_WARNING,
            Self::GeneratedUnsafe => QUERY_GENERATED_UNSAFE_WARNING,
        }
    }
}

impl fmt::Display for QueryWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}
