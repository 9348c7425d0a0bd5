//! Built-in migration ledger.
//!
//! The records are authored once and immutable; new schema edits append a
//! new record chained after the current head. The chain is intentionally
//! linear — `Ledger` tolerates branches, but a branched shipped ledger
//! cannot agree with a single current-revision marker.

use st_ledger::{
    ColumnDef, ColumnType, DefaultValue, Ledger, LedgerResult, MemorySchema, MigrationRecord,
    RevisionId, SchemaOp,
};

/// All shipped migration records, in chain order.
pub fn records() -> Vec<MigrationRecord> {
    vec![
        MigrationRecord {
            revision: RevisionId::new("fad2e5b46554"),
            parent: None,
            branch_labels: Vec::new(),
            description: "drop unique layer name constraint".to_string(),
            upgrade: vec![SchemaOp::DropConstraint {
                table: "map_layers".to_string(),
                name: "map_layers_owner_name_key".to_string(),
                kind: st_ledger::ConstraintKind::Unique,
            }],
            // The constraint name and column tuple are part of the
            // contract; the reverse path restores both exactly.
            downgrade: vec![SchemaOp::AddUniqueConstraint {
                table: "map_layers".to_string(),
                name: "map_layers_owner_name_key".to_string(),
                columns: vec!["owner_uuid".to_string(), "name".to_string()],
            }],
        },
        MigrationRecord {
            revision: RevisionId::new("ad7029b411b7"),
            parent: Some(RevisionId::new("fad2e5b46554")),
            branch_labels: Vec::new(),
            description: "add project name and description".to_string(),
            upgrade: vec![
                SchemaOp::AddColumn {
                    table: "user_mundiai_projects".to_string(),
                    column: ColumnDef::nullable("name", ColumnType::Varchar),
                },
                SchemaOp::AddColumn {
                    table: "user_mundiai_projects".to_string(),
                    column: ColumnDef::nullable("description", ColumnType::Text),
                },
            ],
            downgrade: vec![
                SchemaOp::DropColumn {
                    table: "user_mundiai_projects".to_string(),
                    column: "description".to_string(),
                },
                SchemaOp::DropColumn {
                    table: "user_mundiai_projects".to_string(),
                    column: "name".to_string(),
                },
            ],
        },
        MigrationRecord {
            revision: RevisionId::new("37ef2ae77928"),
            parent: Some(RevisionId::new("ad7029b411b7")),
            branch_labels: Vec::new(),
            description: "add map link accessibility flag".to_string(),
            upgrade: vec![SchemaOp::AddColumn {
                table: "user_mundiai_maps".to_string(),
                column: ColumnDef::not_null(
                    "link_accessible",
                    ColumnType::Boolean,
                    DefaultValue::Bool(false),
                ),
            }],
            downgrade: vec![SchemaOp::DropColumn {
                table: "user_mundiai_maps".to_string(),
                column: "link_accessible".to_string(),
            }],
        },
        MigrationRecord {
            revision: RevisionId::new("a01d56f3eead"),
            parent: Some(RevisionId::new("37ef2ae77928")),
            branch_labels: Vec::new(),
            description: "drop layer path column".to_string(),
            upgrade: vec![SchemaOp::DropColumn {
                table: "map_layers".to_string(),
                column: "path".to_string(),
            }],
            // Lossy reverse: the column returns with its declared default,
            // prior cell values do not.
            downgrade: vec![SchemaOp::AddColumn {
                table: "map_layers".to_string(),
                column: ColumnDef::not_null(
                    "path",
                    ColumnType::Varchar,
                    DefaultValue::Text(String::new()),
                ),
            }],
        },
    ]
}

/// The validated shipped ledger.
pub fn ledger() -> LedgerResult<Ledger> {
    Ledger::new(records())
}

/// Structural model of the schema the root record applies against.
///
/// Used by `stratum verify` to simulate the full chain offline.
pub fn base_schema() -> MemorySchema {
    let mut schema = MemorySchema::new();
    schema.create_table(
        "user_mundiai_projects",
        vec![
            ColumnDef::nullable("id", ColumnType::Varchar),
            ColumnDef::nullable("owner_uuid", ColumnType::Varchar),
            ColumnDef::nullable("created_on", ColumnType::Timestamp),
        ],
    );
    schema.create_table(
        "user_mundiai_maps",
        vec![
            ColumnDef::nullable("id", ColumnType::Varchar),
            ColumnDef::nullable("project_id", ColumnType::Varchar),
            ColumnDef::nullable("title", ColumnType::Varchar),
        ],
    );
    schema.create_table(
        "map_layers",
        vec![
            ColumnDef::nullable("id", ColumnType::Varchar),
            ColumnDef::nullable("owner_uuid", ColumnType::Varchar),
            ColumnDef::nullable("name", ColumnType::Varchar),
            ColumnDef::not_null("path", ColumnType::Varchar, DefaultValue::Text(String::new())),
        ],
    );
    schema.declare_unique(
        "map_layers",
        "map_layers_owner_name_key",
        vec!["owner_uuid".to_string(), "name".to_string()],
    );
    schema
}

#[cfg(test)]
#[path = "revisions_test.rs"]
mod tests;
