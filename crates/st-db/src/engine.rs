//! DuckDB schema engine and revision marker implementation.

use crate::connection::SchemaDb;
use crate::error::{DbError, DbResult};
use duckdb::params;
use st_ledger::{
    ColumnDef, ColumnType, ConstraintKind, EngineError, RevisionId, RevisionStore, SchemaEngine,
};
use std::path::Path;

/// DuckDB schema backend.
///
/// Renders ledger operations to DDL. Two DuckDB limitations apply here:
/// `ALTER TABLE` supports neither `ADD CONSTRAINT` nor constraints on an
/// added column, so unique constraints are realized as uniquely-named
/// unique indexes (uniqueness is enforced and the name stays part of the
/// contract), and re-added columns carry their `DEFAULT` but not
/// `NOT NULL` — structural nullability is checked by ledger simulation
/// (`stratum verify`) instead.
pub struct DuckDbBackend {
    db: SchemaDb,
}

impl DuckDbBackend {
    /// Open (or create) a backend over the database at `path`.
    pub fn open(path: &Path) -> DbResult<Self> {
        Ok(Self {
            db: SchemaDb::open(path)?,
        })
    }

    /// Backend over an in-memory database.
    pub fn open_memory() -> DbResult<Self> {
        Ok(Self {
            db: SchemaDb::open_memory()?,
        })
    }

    /// Borrow the underlying connection wrapper.
    pub fn db(&self) -> &SchemaDb {
        &self.db
    }

    /// Execute a single DDL statement.
    fn execute(&self, sql: &str) -> DbResult<()> {
        log::debug!("DDL: {sql}");
        self.db
            .conn()
            .execute(sql, [])
            .map_err(|e| DbError::ExecutionError(format!("{e}: {sql}")))?;
        Ok(())
    }

    /// Check whether a column exists, for tests and drift inspection.
    pub fn column_exists(&self, table: &str, column: &str) -> DbResult<bool> {
        let (schema, table) = split_qualified(table);
        let count: i64 = self
            .db
            .conn()
            .query_row(
                "SELECT COUNT(*) FROM information_schema.columns
                 WHERE table_schema = ? AND table_name = ? AND column_name = ?",
                params![schema, table, column],
                |row| row.get(0),
            )
            .map_err(|e| DbError::ExecutionError(e.to_string()))?;
        Ok(count > 0)
    }

    /// Check whether a (unique) index exists by name.
    pub fn index_exists(&self, name: &str) -> DbResult<bool> {
        let count: i64 = self
            .db
            .conn()
            .query_row(
                "SELECT COUNT(*) FROM duckdb_indexes() WHERE index_name = ?",
                params![name],
                |row| row.get(0),
            )
            .map_err(|e| DbError::ExecutionError(e.to_string()))?;
        Ok(count > 0)
    }
}

/// Split a possibly schema-qualified table name, defaulting to `main`.
fn split_qualified(name: &str) -> (&str, &str) {
    match name.rfind('.') {
        Some(pos) => (&name[..pos], &name[pos + 1..]),
        None => ("main", name),
    }
}

/// Quote an identifier for DDL.
fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

/// Quote a possibly schema-qualified table name.
fn quote_table(name: &str) -> String {
    name.split('.').map(quote_ident).collect::<Vec<_>>().join(".")
}

/// SQL type name for a ledger column type.
fn type_sql(column_type: ColumnType) -> &'static str {
    match column_type {
        ColumnType::Varchar => "VARCHAR",
        ColumnType::Text => "TEXT",
        ColumnType::Integer => "INTEGER",
        ColumnType::Boolean => "BOOLEAN",
        ColumnType::Timestamp => "TIMESTAMP",
    }
}

impl SchemaEngine for DuckDbBackend {
    fn add_column(&mut self, table: &str, column: &ColumnDef) -> Result<(), EngineError> {
        let mut sql = format!(
            "ALTER TABLE {} ADD COLUMN {} {}",
            quote_table(table),
            quote_ident(&column.name),
            type_sql(column.column_type),
        );
        if let Some(default) = &column.default {
            sql.push_str(" DEFAULT ");
            sql.push_str(&default.to_sql_literal());
        }
        // NOT NULL intentionally not emitted: DuckDB rejects constraints
        // on added columns. The DEFAULT still backfills existing rows.
        self.execute(&sql)?;
        Ok(())
    }

    fn drop_column(&mut self, table: &str, column: &str) -> Result<(), EngineError> {
        self.execute(&format!(
            "ALTER TABLE {} DROP COLUMN {}",
            quote_table(table),
            quote_ident(column),
        ))?;
        Ok(())
    }

    fn add_unique_constraint(
        &mut self,
        table: &str,
        name: &str,
        columns: &[String],
    ) -> Result<(), EngineError> {
        let column_list = columns
            .iter()
            .map(|c| quote_ident(c))
            .collect::<Vec<_>>()
            .join(", ");
        self.execute(&format!(
            "CREATE UNIQUE INDEX {} ON {} ({})",
            quote_ident(name),
            quote_table(table),
            column_list,
        ))?;
        Ok(())
    }

    fn drop_constraint(
        &mut self,
        table: &str,
        name: &str,
        kind: ConstraintKind,
    ) -> Result<(), EngineError> {
        match kind {
            ConstraintKind::Unique => {
                // Realized as a unique index at creation time; the table
                // name is not part of DuckDB's DROP INDEX syntax.
                let _ = table;
                self.execute(&format!("DROP INDEX {}", quote_ident(name)))?;
                Ok(())
            }
        }
    }

    fn begin(&mut self) -> Result<(), EngineError> {
        self.db
            .conn()
            .execute_batch("BEGIN TRANSACTION")
            .map_err(|e| EngineError::Transaction(format!("BEGIN failed: {e}")))
    }

    fn commit(&mut self) -> Result<(), EngineError> {
        self.db
            .conn()
            .execute_batch("COMMIT")
            .map_err(|e| EngineError::Transaction(format!("COMMIT failed: {e}")))
    }

    fn rollback(&mut self) -> Result<(), EngineError> {
        self.db
            .conn()
            .execute_batch("ROLLBACK")
            .map_err(|e| EngineError::Transaction(format!("ROLLBACK failed: {e}")))
    }
}

impl RevisionStore for DuckDbBackend {
    fn current(&mut self) -> Result<Option<RevisionId>, EngineError> {
        let result = self.db.conn().query_row(
            "SELECT revision FROM stratum.ledger_head",
            [],
            |row| row.get::<_, String>(0),
        );
        match result {
            Ok(revision) => Ok(RevisionId::try_new(revision)),
            Err(duckdb::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(EngineError::Marker(format!(
                "failed to read ledger head: {e}"
            ))),
        }
    }

    fn set_current(&mut self, revision: Option<&RevisionId>) -> Result<(), EngineError> {
        self.db
            .transaction(|conn| {
                conn.execute("DELETE FROM stratum.ledger_head", [])
                    .map_err(|e| DbError::MarkerError(format!("failed to clear head: {e}")))?;
                if let Some(rev) = revision {
                    conn.execute(
                        "INSERT INTO stratum.ledger_head (revision) VALUES (?)",
                        params![rev.as_str()],
                    )
                    .map_err(|e| DbError::MarkerError(format!("failed to write head: {e}")))?;
                }
                Ok(())
            })
            .map_err(EngineError::from)
    }
}

#[cfg(test)]
#[path = "engine_test.rs"]
mod tests;
