//! st-ledger - Core library for Stratum
//!
//! This crate provides the migration ledger: revision-identified records
//! carrying forward/backward schema edits, chain resolution between two
//! revisions, and the sequential apply loop over abstract backend traits.
//! It has no database dependency; backends live in `st-db`.

pub mod apply;
pub mod chain;
pub mod error;
pub mod memory;
pub mod op;
pub mod record;
pub mod revision;
pub mod verify;

pub use apply::{apply, RevisionStore, SchemaEngine};
pub use chain::Ledger;
pub use error::{EngineError, LedgerError, LedgerResult};
pub use memory::{MemoryBackend, MemorySchema};
pub use op::{ColumnDef, ColumnType, ConstraintKind, DefaultValue, SchemaOp};
pub use record::{Direction, MigrationRecord, Step, Target};
pub use revision::RevisionId;
pub use verify::{verify_ledger, VerifyFinding};
