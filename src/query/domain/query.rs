//! Generated query aggregate.

use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

use super::{QueryWarning, Row};
use crate::tenant::TenantId;

/// A generated query and, when it ran, its result rows.
///
/// Result data is only ever attached to a query that passed validation,
/// contains no DDL or DML, and executed successfully.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Query {
    tenant_id: TenantId,
    result_query: Option<String>,
    result_data: Option<Vec<Row>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Query {
    /// Creates a query from generated SQL and its result rows, if it ran.
    #[must_use]
    pub fn new(
        tenant_id: TenantId,
        sql: impl Into<String>,
        result_data: Option<Vec<Row>>,
        clock: &impl Clock,
    ) -> Self {
        let timestamp = clock.utc();
        Self {
            tenant_id,
            result_query: Some(sql.into()),
            result_data,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Returns the owning tenant.
    #[must_use]
    pub const fn tenant_id(&self) -> &TenantId {
        &self.tenant_id
    }

    /// Returns the generated SQL.
    #[must_use]
    pub fn result_query(&self) -> Option<&str> {
        self.result_query.as_deref()
    }

    /// Returns the execution rows, if the query ran.
    #[must_use]
    pub fn result_data(&self) -> Option<&[Row]> {
        self.result_data.as_deref()
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the last update timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

/// Result of one pipeline run: the query plus an optional warning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryOutcome {
    /// The generated query.
    pub query: Query,
    /// Why no data was attached, when applicable.
    pub warning: Option<QueryWarning>,
}

impl QueryOutcome {
    /// Returns the warning message, if any.
    #[must_use]
    pub fn warning_message(&self) -> Option<&'static str> {
        self.warning.map(QueryWarning::message)
    }
}
