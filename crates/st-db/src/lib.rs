//! st-db - DuckDB backend for Stratum
//!
//! Implements the ledger's `SchemaEngine` and `RevisionStore` traits over a
//! DuckDB database: schema edits render to DDL, and the current-revision
//! marker persists in a single-row `stratum.ledger_head` table. DuckDB's
//! single-writer file locking gives one process exclusive access for the
//! duration of an apply run.

pub mod connection;
pub mod engine;
pub mod error;

pub use connection::SchemaDb;
pub use engine::DuckDbBackend;
pub use error::{DbError, DbResult};
