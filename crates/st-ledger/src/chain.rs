//! Ledger construction, validation, and chain resolution.
//!
//! The parent-pointer chain maps to a directed graph keyed by revision id
//! with O(1) lookup. Acyclicity is validated at construction; branches
//! (one parent, several children) are accepted by the format and resolved
//! at traversal time via branch labels.

use crate::error::{LedgerError, LedgerResult};
use crate::record::{Direction, MigrationRecord, Step, Target};
use crate::revision::RevisionId;
use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use std::collections::{HashMap, HashSet};

/// An immutable, validated migration ledger.
#[derive(Debug)]
pub struct Ledger {
    /// Records in insertion order
    records: Vec<MigrationRecord>,

    /// Map from revision id to index in `records`
    by_revision: HashMap<RevisionId, usize>,

    /// Index of the root record (absent parent)
    root: usize,
}

impl Ledger {
    /// Build a ledger from records, validating the chain invariants:
    /// unique revisions, exactly one root, every parent known, no cycles.
    pub fn new(records: Vec<MigrationRecord>) -> LedgerResult<Self> {
        let mut by_revision: HashMap<RevisionId, usize> = HashMap::with_capacity(records.len());
        for (idx, record) in records.iter().enumerate() {
            if by_revision
                .insert(record.revision.clone(), idx)
                .is_some()
            {
                return Err(LedgerError::DuplicateRevision {
                    revision: record.revision.clone(),
                });
            }
        }

        let mut root: Option<usize> = None;
        for (idx, record) in records.iter().enumerate() {
            match &record.parent {
                None => {
                    if let Some(first) = root {
                        return Err(LedgerError::MultipleRoots {
                            first: records[first].revision.clone(),
                            second: record.revision.clone(),
                        });
                    }
                    root = Some(idx);
                }
                Some(parent) => {
                    if !by_revision.contains_key(parent) {
                        return Err(LedgerError::UnknownParent {
                            revision: record.revision.clone(),
                            parent: parent.clone(),
                        });
                    }
                }
            }
        }
        let root = root.ok_or(LedgerError::NoRoot)?;

        let ledger = Self {
            records,
            by_revision,
            root,
        };
        ledger.validate_acyclic()?;
        Ok(ledger)
    }

    /// Validate the parent-link graph has no cycles.
    fn validate_acyclic(&self) -> LedgerResult<()> {
        let mut graph: DiGraph<RevisionId, ()> = DiGraph::new();
        let mut node_map: HashMap<&RevisionId, NodeIndex> =
            HashMap::with_capacity(self.records.len());

        for record in &self.records {
            let idx = graph.add_node(record.revision.clone());
            node_map.insert(&record.revision, idx);
        }
        for record in &self.records {
            if let Some(parent) = &record.parent {
                // Edge goes parent -> child, matching chain order
                graph.add_edge(node_map[parent], node_map[&record.revision], ());
            }
        }

        match toposort(&graph, None) {
            Ok(_) => Ok(()),
            Err(cycle) => Err(LedgerError::CircularChain {
                cycle: find_cycle_path(&graph, cycle.node_id()),
            }),
        }
    }

    /// Number of records in the ledger.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the ledger holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterate records in insertion order.
    pub fn records(&self) -> impl Iterator<Item = &MigrationRecord> {
        self.records.iter()
    }

    /// Look up a record by revision id.
    pub fn get(&self, revision: &RevisionId) -> Option<&MigrationRecord> {
        self.by_revision.get(revision).map(|&idx| &self.records[idx])
    }

    /// The chain's origin record.
    pub fn root(&self) -> &MigrationRecord {
        &self.records[self.root]
    }

    /// Leaf revisions: records no other record chains after.
    pub fn heads(&self) -> Vec<&MigrationRecord> {
        let parents: HashSet<&RevisionId> =
            self.records.iter().filter_map(|r| r.parent.as_ref()).collect();
        self.records
            .iter()
            .filter(|r| !parents.contains(&r.revision))
            .collect()
    }

    /// Root-to-revision lineage, inclusive on both ends.
    ///
    /// Always well-defined for a known revision: each record has exactly
    /// one parent, so the path from any revision back to the root is unique.
    fn lineage(&self, revision: &RevisionId) -> Vec<&MigrationRecord> {
        let mut path = Vec::new();
        let mut cursor = self.get(revision);
        while let Some(record) = cursor {
            path.push(record);
            cursor = record.parent.as_ref().and_then(|p| self.get(p));
        }
        path.reverse();
        path
    }

    /// Pick the head a `Target::Head` resolves to.
    fn select_head(&self, branch: Option<&str>, from: &str) -> LedgerResult<&MigrationRecord> {
        let heads = self.heads();
        match branch {
            None => {
                if heads.len() == 1 {
                    Ok(heads[0])
                } else {
                    let names: Vec<&str> =
                        heads.iter().map(|h| h.revision.as_str()).collect();
                    Err(LedgerError::UnresolvableChain {
                        from: from.to_string(),
                        to: "head".to_string(),
                        reason: format!(
                            "ledger has multiple heads ({}); pass a branch label",
                            names.join(", ")
                        ),
                    })
                }
            }
            Some(label) => {
                let matching: Vec<&MigrationRecord> = heads
                    .into_iter()
                    .filter(|h| {
                        self.lineage(&h.revision)
                            .iter()
                            .any(|r| r.branch_labels.iter().any(|l| l == label))
                    })
                    .collect();
                match matching.len() {
                    1 => Ok(matching[0]),
                    0 => Err(LedgerError::UnresolvableChain {
                        from: from.to_string(),
                        to: format!("head[{label}]"),
                        reason: format!("no head carries branch label '{label}'"),
                    }),
                    _ => Err(LedgerError::UnresolvableChain {
                        from: from.to_string(),
                        to: format!("head[{label}]"),
                        reason: format!("branch label '{label}' matches several heads"),
                    }),
                }
            }
        }
    }

    /// Walk the parent-link graph from `current` to `target`.
    ///
    /// Returns upgrade steps in child-following order when the target is a
    /// descendant, downgrade steps in parent-following order when it is an
    /// ancestor, and an empty sequence when the two coincide. Fails with
    /// [`LedgerError::UnresolvableChain`] for unknown revisions and for
    /// revisions on diverged branches — no implicit downgrade-then-upgrade
    /// across a branch point is ever planned.
    pub fn resolve(
        &self,
        current: Option<&RevisionId>,
        target: &Target,
    ) -> LedgerResult<Vec<Step<'_>>> {
        let from = current.map(|r| r.to_string()).unwrap_or_else(|| "base".to_string());

        if let Some(rev) = current {
            if self.get(rev).is_none() {
                return Err(LedgerError::UnresolvableChain {
                    from,
                    to: describe_target(target),
                    reason: format!("current revision {rev} is not in the ledger"),
                });
            }
        }

        let target_rev: Option<&RevisionId> = match target {
            Target::Base => None,
            Target::Revision(rev) => {
                if self.get(rev).is_none() {
                    return Err(LedgerError::UnresolvableChain {
                        from,
                        to: rev.to_string(),
                        reason: format!("target revision {rev} is not in the ledger"),
                    });
                }
                Some(rev)
            }
            Target::Head { branch } => Some(&self.select_head(branch.as_deref(), &from)?.revision),
        };

        let current_lineage = match current {
            Some(rev) => self.lineage(rev),
            None => Vec::new(),
        };
        let target_lineage = match target_rev {
            Some(rev) => self.lineage(rev),
            None => Vec::new(),
        };

        let is_prefix = |shorter: &[&MigrationRecord], longer: &[&MigrationRecord]| {
            shorter
                .iter()
                .zip(longer.iter())
                .all(|(a, b)| a.revision == b.revision)
        };

        if current_lineage.len() <= target_lineage.len()
            && is_prefix(&current_lineage, &target_lineage)
        {
            // Target is current or a descendant: upgrade forward
            Ok(target_lineage[current_lineage.len()..]
                .iter()
                .map(|record| Step {
                    record,
                    direction: Direction::Upgrade,
                })
                .collect())
        } else if is_prefix(&target_lineage, &current_lineage) {
            // Target is an ancestor (or base): downgrade backward
            Ok(current_lineage[target_lineage.len()..]
                .iter()
                .rev()
                .map(|record| Step {
                    record,
                    direction: Direction::Downgrade,
                })
                .collect())
        } else {
            Err(LedgerError::UnresolvableChain {
                from,
                to: describe_target(target),
                reason: "revisions lie on diverged branches".to_string(),
            })
        }
    }
}

/// Human-readable target description for error messages.
fn describe_target(target: &Target) -> String {
    match target {
        Target::Base => "base".to_string(),
        Target::Revision(rev) => rev.to_string(),
        Target::Head { branch: None } => "head".to_string(),
        Target::Head { branch: Some(label) } => format!("head[{label}]"),
    }
}

/// Find a cycle path starting from a node for error reporting.
fn find_cycle_path(graph: &DiGraph<RevisionId, ()>, start: NodeIndex) -> String {
    let mut path: Vec<String> = vec![graph[start].to_string()];
    let mut current = start;
    let mut visited = HashSet::new();
    visited.insert(current);

    while let Some(edge) = graph.edges(current).next() {
        let target = edge.target();
        path.push(graph[target].to_string());

        if target == start || visited.contains(&target) {
            break;
        }

        visited.insert(target);
        current = target;
    }

    path.join(" -> ")
}

#[cfg(test)]
#[path = "chain_test.rs"]
mod tests;
