//! Migration records and resolution targets.

use crate::op::SchemaOp;
use crate::revision::RevisionId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One entry in the migration ledger.
///
/// Records are authored once and immutable thereafter: editing a record
/// after it has been applied anywhere desynchronizes the ledger from the
/// physical schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MigrationRecord {
    /// Unique revision identifier
    pub revision: RevisionId,

    /// Revision this record is chained after; `None` marks the chain's origin
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<RevisionId>,

    /// Branch labels for head disambiguation (the format permits branches)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub branch_labels: Vec<String>,

    /// Human-readable summary of the edit
    pub description: String,

    /// Forward schema edits, in application order
    pub upgrade: Vec<SchemaOp>,

    /// Reverse schema edits, restoring the prior structural state.
    ///
    /// Structurally inverse to `upgrade` at the column/constraint level;
    /// data in dropped columns is not recovered (documented lossy case).
    pub downgrade: Vec<SchemaOp>,
}

impl MigrationRecord {
    /// Operations for the given direction.
    pub fn ops(&self, direction: Direction) -> &[SchemaOp] {
        match direction {
            Direction::Upgrade => &self.upgrade,
            Direction::Downgrade => &self.downgrade,
        }
    }
}

/// Direction a resolved step moves the schema in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Apply the record's forward edits
    Upgrade,
    /// Apply the record's reverse edits
    Downgrade,
}

impl Direction {
    /// The opposite direction.
    pub fn flipped(self) -> Self {
        match self {
            Direction::Upgrade => Direction::Downgrade,
            Direction::Downgrade => Direction::Upgrade,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Upgrade => write!(f, "upgrade"),
            Direction::Downgrade => write!(f, "downgrade"),
        }
    }
}

/// One step of a resolved chain: a record tagged with the direction to
/// apply it in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Step<'a> {
    /// The record to apply
    pub record: &'a MigrationRecord,
    /// Which of its operation sequences to run
    pub direction: Direction,
}

/// Where a resolution should land.
#[derive(Debug, Clone, PartialEq)]
pub enum Target {
    /// The latest revision; with multiple heads a branch label is required
    Head {
        /// Branch label selecting among multiple heads
        branch: Option<String>,
    },
    /// A specific revision
    Revision(RevisionId),
    /// The uninitialized state before the root record
    Base,
}

impl Target {
    /// Head of the only branch (or ambiguous if there are several).
    pub fn head() -> Self {
        Target::Head { branch: None }
    }
}
