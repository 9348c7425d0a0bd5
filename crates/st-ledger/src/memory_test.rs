//! Tests for the in-memory schema and backend.

use super::*;
use crate::op::DefaultValue;

fn layers_schema() -> MemorySchema {
    let mut schema = MemorySchema::new();
    schema.create_table(
        "map_layers",
        vec![
            ColumnDef::nullable("id", ColumnType::Integer),
            ColumnDef::not_null("path", ColumnType::Varchar, DefaultValue::Text(String::new())),
        ],
    );
    schema
}

#[test]
fn add_column_backfills_default() {
    let mut schema = layers_schema();
    schema.insert_row("map_layers", &[("id", "1"), ("path", "/a")]);

    schema
        .apply_op(&SchemaOp::AddColumn {
            table: "map_layers".to_string(),
            column: ColumnDef::not_null("flag", ColumnType::Boolean, DefaultValue::Bool(false)),
        })
        .unwrap();

    let table = schema.table("map_layers").unwrap();
    assert_eq!(table.rows()[0].get("flag"), Some(&Some("false".to_string())));
}

#[test]
fn add_existing_column_fails_loudly() {
    let mut schema = layers_schema();
    let err = schema
        .apply_op(&SchemaOp::AddColumn {
            table: "map_layers".to_string(),
            column: ColumnDef::nullable("path", ColumnType::Varchar),
        })
        .unwrap_err();
    assert!(err.to_string().contains("already exists"), "{err}");
}

#[test]
fn non_nullable_add_without_default_fails_when_rows_exist() {
    let mut schema = layers_schema();
    schema.insert_row("map_layers", &[("id", "1")]);
    let err = schema
        .apply_op(&SchemaOp::AddColumn {
            table: "map_layers".to_string(),
            column: ColumnDef {
                name: "required".to_string(),
                column_type: ColumnType::Text,
                nullable: false,
                default: None,
            },
        })
        .unwrap_err();
    assert!(err.to_string().contains("server-side default"), "{err}");
}

#[test]
fn drop_missing_column_fails() {
    let mut schema = layers_schema();
    let err = schema
        .apply_op(&SchemaOp::DropColumn {
            table: "map_layers".to_string(),
            column: "ghost".to_string(),
        })
        .unwrap_err();
    assert!(err.to_string().contains("does not exist"), "{err}");
}

#[test]
fn constraint_lifecycle() {
    let mut schema = layers_schema();
    let add = SchemaOp::AddUniqueConstraint {
        table: "map_layers".to_string(),
        name: "map_layers_path_key".to_string(),
        columns: vec!["path".to_string()],
    };
    schema.apply_op(&add).unwrap();
    assert!(schema.table("map_layers").unwrap().has_constraint("map_layers_path_key"));

    // Name collision fails
    assert!(schema.apply_op(&add).is_err());

    schema
        .apply_op(&SchemaOp::DropConstraint {
            table: "map_layers".to_string(),
            name: "map_layers_path_key".to_string(),
            kind: ConstraintKind::Unique,
        })
        .unwrap();
    assert!(!schema.table("map_layers").unwrap().has_constraint("map_layers_path_key"));
}

#[test]
fn constraint_over_missing_column_fails() {
    let mut schema = layers_schema();
    let err = schema
        .apply_op(&SchemaOp::AddUniqueConstraint {
            table: "map_layers".to_string(),
            name: "bad_key".to_string(),
            columns: vec!["ghost".to_string()],
        })
        .unwrap_err();
    assert!(err.to_string().contains("missing column"), "{err}");
}

#[test]
fn rollback_restores_snapshot() {
    let mut backend = MemoryBackend::with_schema(layers_schema());
    let before = backend.schema().clone();

    backend.begin().unwrap();
    backend
        .drop_column("map_layers", "path")
        .unwrap();
    backend.rollback().unwrap();

    assert_eq!(backend.schema(), &before);
}

#[test]
fn commit_keeps_changes() {
    let mut backend = MemoryBackend::with_schema(layers_schema());
    backend.begin().unwrap();
    backend.drop_column("map_layers", "path").unwrap();
    backend.commit().unwrap();
    assert!(backend.schema().table("map_layers").unwrap().column("path").is_none());
}

#[test]
fn same_structure_ignores_rows() {
    let mut a = layers_schema();
    let b = layers_schema();
    a.insert_row("map_layers", &[("id", "1")]);
    assert!(a.same_structure(&b));
    assert_ne!(a, b);
}

#[test]
fn marker_round_trip() {
    let mut backend = MemoryBackend::new();
    assert_eq!(backend.current().unwrap(), None);
    let rev = RevisionId::new("fad2e5b46554");
    backend.set_current(Some(&rev)).unwrap();
    assert_eq!(backend.current().unwrap(), Some(rev));
    backend.set_current(None).unwrap();
    assert_eq!(backend.current().unwrap(), None);
}
