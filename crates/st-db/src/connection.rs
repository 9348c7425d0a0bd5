//! Database connection wrapper.
//!
//! [`SchemaDb`] owns a DuckDB [`Connection`] and provides helpers for
//! opening the database, bootstrapping the ledger head table, and
//! transacting.

use crate::error::{DbError, DbResult};
use duckdb::Connection;
use std::path::Path;

/// Wrapper around a DuckDB connection holding the migrated schema and the
/// `stratum.ledger_head` marker table.
///
/// Single-threaded — schema application is sequential by design, so no
/// `Mutex` is needed.
pub struct SchemaDb {
    conn: Connection,
}

impl SchemaDb {
    /// Open (or create) the database at `path` and bootstrap the marker table.
    pub fn open(path: &Path) -> DbResult<Self> {
        let conn = Connection::open(path)
            .map_err(|e| DbError::ConnectionError(format!("{e}: {}", path.display())))?;
        let db = Self { conn };
        db.ensure_head_table()?;
        Ok(db)
    }

    /// Create an in-memory database with the marker table bootstrapped.
    ///
    /// Useful for unit tests that don't need persistence.
    pub fn open_memory() -> DbResult<Self> {
        let conn =
            Connection::open_in_memory().map_err(|e| DbError::ConnectionError(e.to_string()))?;
        let db = Self { conn };
        db.ensure_head_table()?;
        Ok(db)
    }

    /// Borrow the underlying DuckDB connection.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Ensure the `stratum` schema and single-row `ledger_head` table exist.
    fn ensure_head_table(&self) -> DbResult<()> {
        self.conn
            .execute_batch(
                "CREATE SCHEMA IF NOT EXISTS stratum;
                 CREATE TABLE IF NOT EXISTS stratum.ledger_head (
                     revision   VARCHAR NOT NULL,
                     updated_at TIMESTAMP NOT NULL DEFAULT now()
                 );",
            )
            .map_err(|e| {
                DbError::MarkerError(format!("failed to create ledger_head table: {e}"))
            })?;
        Ok(())
    }

    /// Execute `body` within a `BEGIN` / `COMMIT` transaction, rolling back
    /// on error.
    pub fn transaction<F, T>(&self, body: F) -> DbResult<T>
    where
        F: FnOnce(&Connection) -> DbResult<T>,
    {
        self.conn
            .execute_batch("BEGIN TRANSACTION")
            .map_err(|e| DbError::TransactionError(format!("BEGIN failed: {e}")))?;

        let result = body(&self.conn);

        match &result {
            Ok(_) => {
                if let Err(commit_err) = self.conn.execute_batch("COMMIT") {
                    let _ = self.conn.execute_batch("ROLLBACK");
                    return Err(DbError::TransactionError(format!(
                        "COMMIT failed: {commit_err}"
                    )));
                }
            }
            Err(_) => {
                let _ = self.conn.execute_batch("ROLLBACK");
            }
        }
        result
    }
}

#[cfg(test)]
#[path = "connection_test.rs"]
mod tests;
