//! `PostgreSQL` client database sessions.

use super::{introspection::CatalogSnapshot, models::JsonRowsResult};
use crate::tenant::DbUrl;
use crate::workspace::{
    domain::{Row, SchemaMetadata},
    ports::{ClientConnection, ClientDatabase, ClientDatabaseError, ClientDatabaseResult},
};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::sql_query;
use std::sync::{Arc, Mutex};

/// Opens one dedicated `PostgreSQL` connection per session.
#[derive(Debug, Clone, Copy, Default)]
pub struct PostgresClientDatabase;

impl PostgresClientDatabase {
    /// Creates the connector.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ClientDatabase for PostgresClientDatabase {
    async fn connect(&self, url: &DbUrl) -> ClientDatabaseResult<Box<dyn ClientConnection>> {
        let raw_url = url.expose().to_owned();
        let connection = tokio::task::spawn_blocking(move || {
            PgConnection::establish(&raw_url).map_err(ClientDatabaseError::connection)
        })
        .await
        .map_err(ClientDatabaseError::connection)??;

        Ok(Box::new(PostgresClientConnection {
            connection: Arc::new(Mutex::new(Some(connection))),
        }))
    }
}

struct PostgresClientConnection {
    connection: Arc<Mutex<Option<PgConnection>>>,
}

impl PostgresClientConnection {
    async fn run_blocking<F, T>(&self, f: F) -> ClientDatabaseResult<T>
    where
        F: FnOnce(&mut PgConnection) -> ClientDatabaseResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let connection = Arc::clone(&self.connection);
        tokio::task::spawn_blocking(move || {
            let mut guard = connection.lock().map_err(|err| {
                ClientDatabaseError::execution(std::io::Error::other(err.to_string()))
            })?;
            let live = guard.as_mut().ok_or(ClientDatabaseError::Closed)?;
            f(live)
        })
        .await
        .map_err(ClientDatabaseError::execution)?
    }
}

fn statement_body(query: &str) -> &str {
    query.trim().trim_end_matches(';').trim_end()
}

/// Wraps a query so its rows come back as one JSON array.
///
/// The body ends on its own line so a trailing `--` comment cannot swallow
/// the closing parenthesis.
fn json_rows_statement(query: &str) -> String {
    format!(
        "SELECT COALESCE(json_agg(row_to_json(q)), '[]'::json) AS rows FROM (\n{}\n) AS q",
        statement_body(query)
    )
}

fn explain_statement(query: &str) -> String {
    format!("EXPLAIN\n{}\n", statement_body(query))
}

fn rows_from_json(value: serde_json::Value) -> ClientDatabaseResult<Vec<Row>> {
    let serde_json::Value::Array(items) = value else {
        return Err(ClientDatabaseError::execution(std::io::Error::other(
            "expected a JSON array of rows",
        )));
    };
    items
        .into_iter()
        .map(|item| match item {
            serde_json::Value::Object(row) => Ok(row),
            other => Err(ClientDatabaseError::execution(std::io::Error::other(
                format!("expected a JSON object row, got {other}"),
            ))),
        })
        .collect()
}

#[async_trait]
impl ClientConnection for PostgresClientConnection {
    async fn execute(&self, query: &str) -> ClientDatabaseResult<Vec<Row>> {
        let wrapped = json_rows_statement(query);
        let result = self
            .run_blocking(move |connection| {
                sql_query(wrapped)
                    .get_result::<JsonRowsResult>(connection)
                    .map_err(ClientDatabaseError::execution)
            })
            .await?;
        rows_from_json(result.rows)
    }

    async fn execute_dry_run(&self, query: &str) -> ClientDatabaseResult<()> {
        let explain = explain_statement(query);
        self.run_blocking(move |connection| {
            sql_query(explain)
                .execute(connection)
                .map_err(ClientDatabaseError::execution)?;
            Ok(())
        })
        .await
    }

    async fn database_metadata(&self) -> ClientDatabaseResult<SchemaMetadata> {
        self.run_blocking(|connection| {
            CatalogSnapshot::load(connection)
                .map(CatalogSnapshot::into_metadata)
                .map_err(ClientDatabaseError::metadata)
        })
        .await
    }

    async fn close(&self) -> ClientDatabaseResult<()> {
        let mut guard = self
            .connection
            .lock()
            .map_err(|err| ClientDatabaseError::execution(std::io::Error::other(err.to_string())))?;
        guard.take();
        Ok(())
    }
}
