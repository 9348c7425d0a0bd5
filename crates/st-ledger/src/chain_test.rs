//! Tests for ledger validation and chain resolution.

use super::*;
use crate::op::{ColumnDef, ColumnType, SchemaOp};

// ── Helpers ────────────────────────────────────────────────────────────

/// A minimal record: adds one nullable column, drops it on downgrade.
fn record(revision: &str, parent: Option<&str>) -> MigrationRecord {
    let column = format!("col_{revision}");
    MigrationRecord {
        revision: RevisionId::new(revision),
        parent: parent.map(RevisionId::new),
        branch_labels: Vec::new(),
        description: format!("add {column}"),
        upgrade: vec![SchemaOp::AddColumn {
            table: "t".to_string(),
            column: ColumnDef::nullable(&column, ColumnType::Text),
        }],
        downgrade: vec![SchemaOp::DropColumn {
            table: "t".to_string(),
            column,
        }],
    }
}

fn labeled(revision: &str, parent: Option<&str>, label: &str) -> MigrationRecord {
    let mut r = record(revision, parent);
    r.branch_labels.push(label.to_string());
    r
}

/// Linear four-record chain a -> b -> c -> d.
fn linear_ledger() -> Ledger {
    Ledger::new(vec![
        record("a", None),
        record("b", Some("a")),
        record("c", Some("b")),
        record("d", Some("c")),
    ])
    .unwrap()
}

fn revisions<'a>(steps: &[Step<'a>]) -> Vec<(&'a str, Direction)> {
    steps
        .iter()
        .map(|s| (s.record.revision.as_str(), s.direction))
        .collect()
}

// ── Construction validation ────────────────────────────────────────────

#[test]
fn rejects_duplicate_revisions() {
    let err = Ledger::new(vec![record("a", None), record("a", None)]).unwrap_err();
    assert!(matches!(err, LedgerError::DuplicateRevision { .. }), "{err}");
}

#[test]
fn rejects_unknown_parent() {
    let err = Ledger::new(vec![record("a", None), record("b", Some("ghost"))]).unwrap_err();
    assert!(matches!(err, LedgerError::UnknownParent { .. }), "{err}");
}

#[test]
fn rejects_missing_root() {
    // a and b point at each other, nothing marks the origin
    let err = Ledger::new(vec![record("a", Some("b")), record("b", Some("a"))]).unwrap_err();
    assert!(matches!(err, LedgerError::NoRoot), "{err}");
}

#[test]
fn rejects_multiple_roots() {
    let err = Ledger::new(vec![record("a", None), record("b", None)]).unwrap_err();
    assert!(matches!(err, LedgerError::MultipleRoots { .. }), "{err}");
}

#[test]
fn rejects_cycle_disconnected_from_root() {
    let err = Ledger::new(vec![
        record("root", None),
        record("x", Some("y")),
        record("y", Some("x")),
    ])
    .unwrap_err();
    match err {
        LedgerError::NoRoot => panic!("cycle misreported as missing root"),
        LedgerError::CircularChain { cycle } => {
            assert!(cycle.contains("x") && cycle.contains("y"), "cycle: {cycle}");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn root_and_heads() {
    let ledger = linear_ledger();
    assert_eq!(ledger.root().revision, "a");
    let heads = ledger.heads();
    assert_eq!(heads.len(), 1);
    assert_eq!(heads[0].revision, "d");
}

// ── Resolution ─────────────────────────────────────────────────────────

#[test]
fn resolves_full_upgrade_from_base() {
    let ledger = linear_ledger();
    let steps = ledger.resolve(None, &Target::head()).unwrap();
    assert_eq!(
        revisions(&steps),
        vec![
            ("a", Direction::Upgrade),
            ("b", Direction::Upgrade),
            ("c", Direction::Upgrade),
            ("d", Direction::Upgrade),
        ]
    );
}

#[test]
fn resolves_partial_upgrade() {
    let ledger = linear_ledger();
    let b = RevisionId::new("b");
    let steps = ledger
        .resolve(Some(&b), &Target::Revision(RevisionId::new("d")))
        .unwrap();
    assert_eq!(
        revisions(&steps),
        vec![("c", Direction::Upgrade), ("d", Direction::Upgrade)]
    );
}

#[test]
fn resolves_downgrade_in_parent_following_order() {
    let ledger = linear_ledger();
    let d = RevisionId::new("d");
    let steps = ledger
        .resolve(Some(&d), &Target::Revision(RevisionId::new("a")))
        .unwrap();
    assert_eq!(
        revisions(&steps),
        vec![
            ("d", Direction::Downgrade),
            ("c", Direction::Downgrade),
            ("b", Direction::Downgrade),
        ]
    );
}

#[test]
fn resolves_downgrade_to_base() {
    let ledger = linear_ledger();
    let b = RevisionId::new("b");
    let steps = ledger.resolve(Some(&b), &Target::Base).unwrap();
    assert_eq!(
        revisions(&steps),
        vec![("b", Direction::Downgrade), ("a", Direction::Downgrade)]
    );
}

#[test]
fn current_equals_target_is_empty() {
    let ledger = linear_ledger();
    let c = RevisionId::new("c");
    let steps = ledger
        .resolve(Some(&c), &Target::Revision(RevisionId::new("c")))
        .unwrap();
    assert!(steps.is_empty());

    let steps = ledger.resolve(None, &Target::Base).unwrap();
    assert!(steps.is_empty());
}

#[test]
fn forward_and_backward_are_exact_reverses() {
    let ledger = linear_ledger();
    let a = RevisionId::new("a");
    let d = RevisionId::new("d");

    let forward = ledger
        .resolve(Some(&a), &Target::Revision(d.clone()))
        .unwrap();
    let backward = ledger
        .resolve(Some(&d), &Target::Revision(a.clone()))
        .unwrap();

    let mut flipped: Vec<(&str, Direction)> = revisions(&backward)
        .into_iter()
        .map(|(rev, dir)| (rev, dir.flipped()))
        .collect();
    flipped.reverse();
    assert_eq!(revisions(&forward), flipped);
}

#[test]
fn unknown_target_fails_not_empty() {
    let ledger = linear_ledger();
    let err = ledger
        .resolve(None, &Target::Revision(RevisionId::new("nope")))
        .unwrap_err();
    assert!(matches!(err, LedgerError::UnresolvableChain { .. }), "{err}");
}

#[test]
fn unknown_current_fails() {
    let ledger = linear_ledger();
    let ghost = RevisionId::new("ghost");
    let err = ledger.resolve(Some(&ghost), &Target::head()).unwrap_err();
    assert!(matches!(err, LedgerError::UnresolvableChain { .. }), "{err}");
}

// ── Branches ───────────────────────────────────────────────────────────

/// Branched ledger: a -> b, then b -> c1 (label "maps") and b -> c2
/// (label "layers").
fn branched_ledger() -> Ledger {
    Ledger::new(vec![
        record("a", None),
        record("b", Some("a")),
        labeled("c1", Some("b"), "maps"),
        labeled("c2", Some("b"), "layers"),
    ])
    .unwrap()
}

#[test]
fn head_with_multiple_heads_requires_branch_label() {
    let ledger = branched_ledger();
    let err = ledger.resolve(None, &Target::head()).unwrap_err();
    match err {
        LedgerError::UnresolvableChain { reason, .. } => {
            assert!(reason.contains("multiple heads"), "reason: {reason}");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn branch_label_selects_head() {
    let ledger = branched_ledger();
    let steps = ledger
        .resolve(
            None,
            &Target::Head {
                branch: Some("layers".to_string()),
            },
        )
        .unwrap();
    assert_eq!(
        revisions(&steps),
        vec![
            ("a", Direction::Upgrade),
            ("b", Direction::Upgrade),
            ("c2", Direction::Upgrade),
        ]
    );
}

#[test]
fn unknown_branch_label_fails() {
    let ledger = branched_ledger();
    let err = ledger
        .resolve(
            None,
            &Target::Head {
                branch: Some("ghost".to_string()),
            },
        )
        .unwrap_err();
    assert!(matches!(err, LedgerError::UnresolvableChain { .. }), "{err}");
}

#[test]
fn diverged_branches_do_not_resolve() {
    let ledger = branched_ledger();
    let c1 = RevisionId::new("c1");
    let err = ledger
        .resolve(Some(&c1), &Target::Revision(RevisionId::new("c2")))
        .unwrap_err();
    match err {
        LedgerError::UnresolvableChain { reason, .. } => {
            assert!(reason.contains("diverged"), "reason: {reason}");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn targeting_a_specific_branch_head_works_without_label() {
    // The path to an explicit revision is always unique; labels are only
    // needed for the implicit "head" target.
    let ledger = branched_ledger();
    let b = RevisionId::new("b");
    let steps = ledger
        .resolve(Some(&b), &Target::Revision(RevisionId::new("c1")))
        .unwrap();
    assert_eq!(revisions(&steps), vec![("c1", Direction::Upgrade)]);
}
