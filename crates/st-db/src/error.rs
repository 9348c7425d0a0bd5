//! Error types for the DuckDB backend.

use st_ledger::EngineError;
use thiserror::Error;

/// DuckDB backend errors.
#[derive(Error, Debug)]
pub enum DbError {
    /// Failed to open or create the database (D001).
    #[error("[D001] Database connection failed: {0}")]
    ConnectionError(String),

    /// A DDL or query statement failed (D002).
    #[error("[D002] Statement failed: {0}")]
    ExecutionError(String),

    /// Transaction management error (D003).
    #[error("[D003] Transaction failed: {0}")]
    TransactionError(String),

    /// Reading or writing the ledger head marker failed (D004).
    #[error("[D004] Ledger head access failed: {0}")]
    MarkerError(String),
}

/// Result type alias for [`DbError`].
pub type DbResult<T> = Result<T, DbError>;

impl From<DbError> for EngineError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::ConnectionError(msg) | DbError::ExecutionError(msg) => {
                EngineError::Execution(msg)
            }
            DbError::TransactionError(msg) => EngineError::Transaction(msg),
            DbError::MarkerError(msg) => EngineError::Marker(msg),
        }
    }
}
