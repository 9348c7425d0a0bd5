//! Error types for the migration ledger.

use crate::revision::RevisionId;
use thiserror::Error;

/// Ledger errors.
#[derive(Error, Debug)]
pub enum LedgerError {
    /// L001: Two records claim the same revision id
    #[error("[L001] Duplicate revision in ledger: {revision}")]
    DuplicateRevision {
        /// The repeated id
        revision: RevisionId,
    },

    /// L002: A record's parent is not in the ledger
    #[error("[L002] Revision {revision} points at unknown parent {parent}")]
    UnknownParent {
        /// The child record
        revision: RevisionId,
        /// The missing parent id
        parent: RevisionId,
    },

    /// L003: No record marks the chain's origin
    #[error("[L003] Ledger has no root record (every record claims a parent)")]
    NoRoot,

    /// L004: More than one record marks the chain's origin
    #[error("[L004] Ledger has multiple roots: {first} and {second}")]
    MultipleRoots {
        /// First root found
        first: RevisionId,
        /// Second root found
        second: RevisionId,
    },

    /// L005: Parent links form a cycle
    #[error("[L005] Circular revision chain detected: {cycle}")]
    CircularChain {
        /// Cycle path for diagnostics
        cycle: String,
    },

    /// L006: No valid path between the requested revisions
    #[error("[L006] Cannot resolve chain from {from} to {to}: {reason}")]
    UnresolvableChain {
        /// Starting revision ("base" when uninitialized)
        from: String,
        /// Requested target
        to: String,
        /// Why resolution failed
        reason: String,
    },

    /// L007: A record's operation failed against the schema engine
    ///
    /// The schema is left at the last successfully completed record; a DDL
    /// failure is a precondition problem requiring operator intervention,
    /// not a transient fault, so nothing is retried.
    #[error("[L007] Migration {revision} failed")]
    ApplyFailed {
        /// The failing record
        revision: RevisionId,
        /// Underlying engine failure
        #[source]
        source: EngineError,
    },
}

/// Result type alias for [`LedgerError`].
pub type LedgerResult<T> = Result<T, LedgerError>;

/// Failures reported by a schema engine or revision store backend.
#[derive(Error, Debug)]
pub enum EngineError {
    /// E001: A schema-edit statement failed (column exists, unknown table, ...)
    #[error("[E001] Schema edit failed: {0}")]
    Execution(String),

    /// E002: Transaction management failed
    #[error("[E002] Transaction failed: {0}")]
    Transaction(String),

    /// E003: The backend cannot express the requested edit
    #[error("[E003] Unsupported schema edit: {0}")]
    Unsupported(String),

    /// E004: Reading or writing the current-revision marker failed
    #[error("[E004] Revision marker access failed: {0}")]
    Marker(String),
}
