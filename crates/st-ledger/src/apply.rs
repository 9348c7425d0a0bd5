//! Sequential application of resolved chains against a schema backend.

use crate::error::{EngineError, LedgerError, LedgerResult};
use crate::op::{ColumnDef, ConstraintKind, SchemaOp};
use crate::record::{Direction, Step};
use crate::revision::RevisionId;

/// Schema mutation backend.
///
/// One method per operation kind, mirroring the edits the ledger issues.
/// Implementations must reject precondition violations loudly (adding a
/// column that already exists must fail, not silently succeed) — masking
/// drift between the ledger and the actual schema is worse than stopping.
pub trait SchemaEngine {
    /// Add a column to a table.
    fn add_column(&mut self, table: &str, column: &ColumnDef) -> Result<(), EngineError>;

    /// Drop a column from a table.
    fn drop_column(&mut self, table: &str, column: &str) -> Result<(), EngineError>;

    /// Add a named unique constraint over a column tuple.
    fn add_unique_constraint(
        &mut self,
        table: &str,
        name: &str,
        columns: &[String],
    ) -> Result<(), EngineError>;

    /// Drop a named constraint.
    fn drop_constraint(
        &mut self,
        table: &str,
        name: &str,
        kind: ConstraintKind,
    ) -> Result<(), EngineError>;

    /// Open a transactional unit scoping one record's operations.
    fn begin(&mut self) -> Result<(), EngineError>;

    /// Commit the current transactional unit.
    fn commit(&mut self) -> Result<(), EngineError>;

    /// Roll back the current transactional unit.
    fn rollback(&mut self) -> Result<(), EngineError>;
}

/// Persisted current-revision marker.
///
/// A single externally-owned value recording which revision the schema is
/// at; `None` is the uninitialized state before the root record.
pub trait RevisionStore {
    /// Read the marker.
    fn current(&mut self) -> Result<Option<RevisionId>, EngineError>;

    /// Write the marker (`None` clears it back to uninitialized).
    fn set_current(&mut self, revision: Option<&RevisionId>) -> Result<(), EngineError>;
}

/// Run one operation against the engine.
fn run_op<E: SchemaEngine + ?Sized>(engine: &mut E, op: &SchemaOp) -> Result<(), EngineError> {
    match op {
        SchemaOp::AddColumn { table, column } => engine.add_column(table, column),
        SchemaOp::DropColumn { table, column } => engine.drop_column(table, column),
        SchemaOp::AddUniqueConstraint {
            table,
            name,
            columns,
        } => engine.add_unique_constraint(table, name, columns),
        SchemaOp::DropConstraint { table, name, kind } => {
            engine.drop_constraint(table, name, *kind)
        }
    }
}

/// Apply a resolved chain in order, returning the number of records applied.
///
/// Each record's operations run inside one transactional unit; after a
/// record commits, the current-revision marker is advanced (upgrade moves
/// it to the record, downgrade moves it to the record's parent, or clears
/// it at the root). An empty chain is a no-op and never touches the marker.
///
/// On failure the record's unit is rolled back and the marker stays at the
/// last successfully completed record — there is no automatic rollback
/// across records and no retry.
pub fn apply<B>(steps: &[Step<'_>], backend: &mut B) -> LedgerResult<usize>
where
    B: SchemaEngine + RevisionStore,
{
    if steps.is_empty() {
        log::debug!("Resolved chain is empty; nothing to apply");
        return Ok(0);
    }

    for step in steps {
        let record = step.record;
        log::debug!(
            "Applying {} {} ({})",
            step.direction,
            record.revision,
            record.description
        );

        let failed = |source: EngineError| LedgerError::ApplyFailed {
            revision: record.revision.clone(),
            source,
        };

        backend.begin().map_err(&failed)?;
        for op in record.ops(step.direction) {
            if let Err(source) = run_op(backend, op) {
                let _ = backend.rollback();
                return Err(failed(source));
            }
        }
        backend.commit().map_err(&failed)?;

        let marker = match step.direction {
            Direction::Upgrade => Some(&record.revision),
            Direction::Downgrade => record.parent.as_ref(),
        };
        backend.set_current(marker).map_err(&failed)?;
    }

    Ok(steps.len())
}

#[cfg(test)]
#[path = "apply_test.rs"]
mod tests;
