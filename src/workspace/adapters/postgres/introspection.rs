//! Catalog queries and assembly of [`SchemaMetadata`] for `PostgreSQL`.
//!
//! Only base tables in the `public` schema are extracted. Tables come back
//! in name order and columns in ordinal order.

use super::models::{
    ColumnCatalogRow, ConstraintCatalogRow, IndexCatalogRow, RelationCatalogRow, TableCatalogRow,
};
use crate::workspace::domain::{
    Column, Constraint, ConstraintKind, Index, Relation, SchemaMetadata, Table,
};
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::sql_query;
use std::collections::HashMap;

const TABLES_SQL: &str = "\
SELECT t.table_name::text AS table_name,
       obj_description(format('%I.%I', t.table_schema, t.table_name)::regclass, 'pg_class') AS comment
FROM information_schema.tables t
WHERE t.table_schema = 'public' AND t.table_type = 'BASE TABLE'
ORDER BY t.table_name";

const COLUMNS_SQL: &str = "\
SELECT c.table_name::text AS table_name,
       c.column_name::text AS column_name,
       c.data_type::text AS data_type,
       (c.is_nullable = 'YES') AS nullable,
       c.column_default::text AS column_default,
       col_description(a.attrelid, a.attnum) AS comment,
       c.ordinal_position::int AS ordinal_position
FROM information_schema.columns c
JOIN information_schema.tables t
  ON t.table_schema = c.table_schema AND t.table_name = c.table_name
JOIN pg_attribute a
  ON a.attrelid = format('%I.%I', c.table_schema, c.table_name)::regclass
 AND a.attname = c.column_name
WHERE c.table_schema = 'public' AND t.table_type = 'BASE TABLE'
ORDER BY c.table_name, c.ordinal_position";

const CONSTRAINTS_SQL: &str = "\
SELECT tc.table_name::text AS table_name,
       tc.constraint_name::text AS constraint_name,
       tc.constraint_type::text AS constraint_type,
       kcu.column_name::text AS column_name
FROM information_schema.table_constraints tc
LEFT JOIN information_schema.key_column_usage kcu
  ON kcu.constraint_schema = tc.constraint_schema
 AND kcu.constraint_name = tc.constraint_name
 AND kcu.table_name = tc.table_name
WHERE tc.table_schema = 'public'
  AND tc.constraint_type IN ('PRIMARY KEY', 'FOREIGN KEY', 'UNIQUE', 'CHECK')
  AND tc.constraint_name::text NOT LIKE '%_not_null'
ORDER BY tc.table_name, tc.constraint_name, kcu.ordinal_position";

const INDEXES_SQL: &str = "\
SELECT t.relname::text AS table_name,
       i.relname::text AS index_name,
       ix.indisunique AS is_unique,
       a.attname::text AS column_name
FROM pg_index ix
JOIN pg_class t ON t.oid = ix.indrelid
JOIN pg_class i ON i.oid = ix.indexrelid
JOIN pg_namespace n ON n.oid = t.relnamespace
JOIN LATERAL unnest(ix.indkey) WITH ORDINALITY AS k(attnum, position) ON true
JOIN pg_attribute a ON a.attrelid = t.oid AND a.attnum = k.attnum
WHERE n.nspname = 'public' AND t.relkind = 'r'
ORDER BY t.relname, i.relname, k.position";

const RELATIONS_SQL: &str = "\
SELECT kcu.table_name::text AS source_table,
       kcu.column_name::text AS source_column,
       ccu.table_name::text AS target_table,
       ccu.column_name::text AS target_column
FROM information_schema.table_constraints tc
JOIN information_schema.key_column_usage kcu
  ON kcu.constraint_schema = tc.constraint_schema
 AND kcu.constraint_name = tc.constraint_name
JOIN information_schema.constraint_column_usage ccu
  ON ccu.constraint_schema = tc.constraint_schema
 AND ccu.constraint_name = tc.constraint_name
WHERE tc.table_schema = 'public' AND tc.constraint_type = 'FOREIGN KEY'
ORDER BY 1, 2, 3, 4";

/// Raw catalog rows for one database.
#[derive(Debug, Default)]
pub(super) struct CatalogSnapshot {
    pub tables: Vec<TableCatalogRow>,
    pub columns: Vec<ColumnCatalogRow>,
    pub constraints: Vec<ConstraintCatalogRow>,
    pub indexes: Vec<IndexCatalogRow>,
    pub relations: Vec<RelationCatalogRow>,
}

impl CatalogSnapshot {
    /// Reads every catalog view needed to describe the schema.
    pub(super) fn load(connection: &mut PgConnection) -> QueryResult<Self> {
        Ok(Self {
            tables: sql_query(TABLES_SQL).load(connection)?,
            columns: sql_query(COLUMNS_SQL).load(connection)?,
            constraints: sql_query(CONSTRAINTS_SQL).load(connection)?,
            indexes: sql_query(INDEXES_SQL).load(connection)?,
            relations: sql_query(RELATIONS_SQL).load(connection)?,
        })
    }

    /// Groups the catalog rows into tables.
    pub(super) fn into_metadata(self) -> SchemaMetadata {
        let Self {
            tables,
            mut columns,
            constraints,
            indexes,
            relations,
        } = self;

        let mut grouped_constraints: HashMap<String, Vec<Constraint>> = HashMap::new();
        for row in constraints {
            let Some(kind) = ConstraintKind::from_catalog(&row.constraint_type) else {
                continue;
            };
            let entries = grouped_constraints.entry(row.table_name).or_default();
            let existing = entries
                .iter_mut()
                .find(|constraint| constraint.name == row.constraint_name);
            match existing {
                Some(constraint) => constraint.columns.extend(row.column_name),
                None => entries.push(Constraint {
                    name: row.constraint_name,
                    kind,
                    columns: row.column_name.into_iter().collect(),
                }),
            }
        }

        let mut grouped_indexes: HashMap<String, Vec<Index>> = HashMap::new();
        for row in indexes {
            let entries = grouped_indexes.entry(row.table_name).or_default();
            match entries.iter_mut().find(|index| index.name == row.index_name) {
                Some(index) => index.columns.push(row.column_name),
                None => entries.push(Index {
                    name: row.index_name,
                    columns: vec![row.column_name],
                    is_unique: row.is_unique,
                }),
            }
        }

        columns.sort_by(|a, b| {
            a.table_name
                .cmp(&b.table_name)
                .then(a.ordinal_position.cmp(&b.ordinal_position))
        });
        let mut grouped_columns: HashMap<String, Vec<Column>> = HashMap::new();
        for row in columns {
            grouped_columns
                .entry(row.table_name)
                .or_default()
                .push(Column {
                    name: row.column_name,
                    data_type: row.data_type,
                    nullable: row.nullable,
                    default: row.column_default,
                    is_primary_key: false,
                    is_foreign_key: false,
                    comment: row.comment,
                });
        }

        let mut assembled: Vec<Table> = tables
            .into_iter()
            .map(|row| {
                let table_constraints = grouped_constraints
                    .remove(&row.table_name)
                    .unwrap_or_default();
                let mut table_columns = grouped_columns.remove(&row.table_name).unwrap_or_default();
                flag_key_columns(&mut table_columns, &table_constraints);
                Table {
                    indexes: grouped_indexes.remove(&row.table_name).unwrap_or_default(),
                    name: row.table_name,
                    columns: table_columns,
                    constraints: table_constraints,
                    comment: row.comment,
                }
            })
            .collect();
        assembled.sort_by(|a, b| a.name.cmp(&b.name));

        let edges = relations
            .into_iter()
            .map(|row| Relation {
                source_table: row.source_table,
                source_column: row.source_column,
                target_table: row.target_table,
                target_column: row.target_column,
            })
            .collect();

        SchemaMetadata::new(assembled, edges)
    }
}

fn flag_key_columns(columns: &mut [Column], constraints: &[Constraint]) {
    for constraint in constraints {
        for name in &constraint.columns {
            let Some(column) = columns.iter_mut().find(|column| &column.name == name) else {
                continue;
            };
            match constraint.kind {
                ConstraintKind::PrimaryKey => column.is_primary_key = true,
                ConstraintKind::ForeignKey => column.is_foreign_key = true,
                ConstraintKind::Unique | ConstraintKind::Check => {}
            }
        }
    }
}
