//! Offline ledger verification by simulation.
//!
//! Walks the chain root-to-head against an in-memory copy of the base
//! schema, checking for each record that its downgrade restores the
//! structural schema its upgrade started from. Row contents are ignored:
//! dropped-then-readded columns losing prior cell values is the documented
//! lossy exception.

use crate::chain::Ledger;
use crate::error::LedgerResult;
use crate::memory::MemorySchema;
use crate::record::{MigrationRecord, Target};
use crate::revision::RevisionId;

/// One verification problem.
#[derive(Debug)]
pub struct VerifyFinding {
    /// The offending record
    pub revision: RevisionId,
    /// What went wrong
    pub detail: String,
}

/// Simulate every record of the (single-headed) ledger against `base`.
///
/// For each record in chain order: apply `upgrade`, snapshot, apply
/// `downgrade`, compare structure with the pre-upgrade snapshot, then
/// re-apply `upgrade` and continue down the chain. Returns the findings;
/// an empty list means every record is structurally reversible.
pub fn verify_ledger(ledger: &Ledger, base: MemorySchema) -> LedgerResult<Vec<VerifyFinding>> {
    let steps = ledger.resolve(None, &Target::head())?;

    let mut schema = base;
    let mut findings = Vec::new();

    for step in &steps {
        let record = step.record;
        let before = schema.clone();

        if let Some(finding) = simulate_round_trip(record, &mut schema, &before) {
            findings.push(finding);
            // Leave the schema at the post-upgrade state so later records
            // still verify against a plausible ancestor schema.
        }
    }

    Ok(findings)
}

/// Apply upgrade then downgrade then upgrade again, reporting the first
/// structural discrepancy. On success `schema` ends at the post-upgrade
/// state ready for the next record.
fn simulate_round_trip(
    record: &MigrationRecord,
    schema: &mut MemorySchema,
    before: &MemorySchema,
) -> Option<VerifyFinding> {
    for op in &record.upgrade {
        if let Err(e) = schema.apply_op(op) {
            return Some(VerifyFinding {
                revision: record.revision.clone(),
                detail: format!("upgrade failed at '{op}': {e}"),
            });
        }
    }

    let upgraded = schema.clone();

    for op in &record.downgrade {
        if let Err(e) = schema.apply_op(op) {
            return Some(VerifyFinding {
                revision: record.revision.clone(),
                detail: format!("downgrade failed at '{op}': {e}"),
            });
        }
    }

    if !schema.same_structure(before) {
        *schema = upgraded;
        return Some(VerifyFinding {
            revision: record.revision.clone(),
            detail: "downgrade does not restore the pre-upgrade structure".to_string(),
        });
    }

    // Round-trip held; move forward again for the next record.
    for op in &record.upgrade {
        if let Err(e) = schema.apply_op(op) {
            return Some(VerifyFinding {
                revision: record.revision.clone(),
                detail: format!("re-applying upgrade failed at '{op}': {e}"),
            });
        }
    }
    None
}

#[cfg(test)]
#[path = "verify_test.rs"]
mod tests;
