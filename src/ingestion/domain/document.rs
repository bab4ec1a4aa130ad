//! Canonical per-column text documents.
//!
//! Every document is a one-row columnar block: a header naming the fields
//! followed by a single comma-separated record with quoted strings.
//!
//! ```text
//! column[1]{tenant_id,table,column,type,nullable,primary_key,foreign_key,comment}:
//!   "tenant_0123456789abcdef","users","id","integer",false,true,false,""
//! ```

use crate::tenant::TenantId;
use crate::workspace::domain::{Column, SchemaMetadata, Table};

const HEADER: &str =
    "column[1]{tenant_id,table,column,type,nullable,primary_key,foreign_key,comment}:";

/// Text descriptor for one column, with the names it was built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDocument {
    /// Table name.
    pub table: String,
    /// Column name.
    pub column: String,
    /// Column type.
    pub data_type: String,
    /// Rendered document.
    pub content: String,
}

impl ColumnDocument {
    fn render(tenant_id: &TenantId, table: &Table, column: &Column) -> Self {
        let comment = column.comment.as_deref().unwrap_or_default();
        let record = [
            quote(tenant_id.as_str()),
            quote(&table.name),
            quote(&column.name),
            quote(&column.data_type),
            column.nullable.to_string(),
            column.is_primary_key.to_string(),
            column.is_foreign_key.to_string(),
            quote(comment),
        ]
        .join(",");

        Self {
            table: table.name.clone(),
            column: column.name.clone(),
            data_type: column.data_type.clone(),
            content: format!("{HEADER}\n  {record}"),
        }
    }
}

fn quote(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for ch in value.chars() {
        match ch {
            '"' => quoted.push_str("\\\""),
            '\\' => quoted.push_str("\\\\"),
            '\n' => quoted.push_str("\\n"),
            _ => quoted.push(ch),
        }
    }
    quoted.push('"');
    quoted
}

/// Renders one document per column, tables first, columns in order.
#[must_use]
pub fn column_documents(tenant_id: &TenantId, metadata: &SchemaMetadata) -> Vec<ColumnDocument> {
    metadata
        .tables
        .iter()
        .flat_map(|table| {
            table
                .columns
                .iter()
                .map(move |column| ColumnDocument::render(tenant_id, table, column))
        })
        .collect()
}
