//! Schema-edit operations carried by migration records.
//!
//! Each [`SchemaOp`] names the operation kind, the target table, and the
//! operation-specific parameters. Records carry an explicit downgrade
//! sequence rather than deriving one, because `DropColumn` is not
//! invertible without the original column definition.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Column data types the ledger can declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    /// Variable-length string
    Varchar,
    /// Unbounded text
    Text,
    /// 32-bit integer
    Integer,
    /// Boolean
    Boolean,
    /// Timestamp without time zone
    Timestamp,
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnType::Varchar => write!(f, "varchar"),
            ColumnType::Text => write!(f, "text"),
            ColumnType::Integer => write!(f, "integer"),
            ColumnType::Boolean => write!(f, "boolean"),
            ColumnType::Timestamp => write!(f, "timestamp"),
        }
    }
}

/// Server-side default value for a column.
///
/// Required when adding a non-nullable column to a table that may already
/// hold rows: existing rows need a value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DefaultValue {
    /// String default
    Text(String),
    /// Integer default
    Int(i64),
    /// Boolean default
    Bool(bool),
}

impl DefaultValue {
    /// Render as a SQL literal.
    pub fn to_sql_literal(&self) -> String {
        match self {
            DefaultValue::Text(s) => format!("'{}'", s.replace('\'', "''")),
            DefaultValue::Int(i) => i.to_string(),
            DefaultValue::Bool(b) => b.to_string(),
        }
    }

    /// Render as the plain cell value used for backfill simulation.
    pub fn to_cell_value(&self) -> String {
        match self {
            DefaultValue::Text(s) => s.clone(),
            DefaultValue::Int(i) => i.to_string(),
            DefaultValue::Bool(b) => b.to_string(),
        }
    }
}

/// Full definition of a column being added.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnDef {
    /// Column name
    pub name: String,

    /// Data type
    #[serde(rename = "type")]
    pub column_type: ColumnType,

    /// Whether NULL is permitted (default: true — observed ledger pattern
    /// is adding optional descriptive fields)
    #[serde(default = "default_nullable")]
    pub nullable: bool,

    /// Server-side default, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<DefaultValue>,
}

fn default_nullable() -> bool {
    true
}

impl ColumnDef {
    /// A nullable column with no default.
    pub fn nullable(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
            nullable: true,
            default: None,
        }
    }

    /// A non-nullable column with a server-side default.
    pub fn not_null(
        name: impl Into<String>,
        column_type: ColumnType,
        default: DefaultValue,
    ) -> Self {
        Self {
            name: name.into(),
            column_type,
            nullable: false,
            default: Some(default),
        }
    }
}

/// Table constraint kinds the ledger edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConstraintKind {
    /// Unique constraint over a column tuple
    Unique,
}

impl fmt::Display for ConstraintKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstraintKind::Unique => write!(f, "unique"),
        }
    }
}

/// A single schema-edit operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum SchemaOp {
    /// Add a column to a table
    AddColumn {
        /// Target table
        table: String,
        /// Column definition
        column: ColumnDef,
    },

    /// Drop a column from a table
    DropColumn {
        /// Target table
        table: String,
        /// Column name
        column: String,
    },

    /// Add a named unique constraint over a column tuple
    AddUniqueConstraint {
        /// Target table
        table: String,
        /// Constraint name — part of the contract, other tooling may
        /// reference it
        name: String,
        /// Covered columns, in declaration order
        columns: Vec<String>,
    },

    /// Drop a named constraint
    DropConstraint {
        /// Target table
        table: String,
        /// Constraint name
        name: String,
        /// Constraint kind
        kind: ConstraintKind,
    },
}

impl SchemaOp {
    /// Table this operation targets.
    pub fn table(&self) -> &str {
        match self {
            SchemaOp::AddColumn { table, .. }
            | SchemaOp::DropColumn { table, .. }
            | SchemaOp::AddUniqueConstraint { table, .. }
            | SchemaOp::DropConstraint { table, .. } => table,
        }
    }

    /// Structural inverse of this operation, where one is derivable.
    ///
    /// `AddColumn` inverts to `DropColumn`, and the constraint pair invert
    /// into each other. `DropColumn` returns `None`: re-adding the column
    /// requires the original definition, which the drop does not carry.
    pub fn inverse(&self) -> Option<SchemaOp> {
        match self {
            SchemaOp::AddColumn { table, column } => Some(SchemaOp::DropColumn {
                table: table.clone(),
                column: column.name.clone(),
            }),
            SchemaOp::DropColumn { .. } => None,
            SchemaOp::AddUniqueConstraint { table, name, .. } => Some(SchemaOp::DropConstraint {
                table: table.clone(),
                name: name.clone(),
                kind: ConstraintKind::Unique,
            }),
            SchemaOp::DropConstraint { .. } => None,
        }
    }
}

impl fmt::Display for SchemaOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaOp::AddColumn { table, column } => {
                write!(f, "add column {}.{} ({})", table, column.name, column.column_type)
            }
            SchemaOp::DropColumn { table, column } => {
                write!(f, "drop column {}.{}", table, column)
            }
            SchemaOp::AddUniqueConstraint { table, name, columns } => {
                write!(f, "add unique {} on {}({})", name, table, columns.join(", "))
            }
            SchemaOp::DropConstraint { table, name, kind } => {
                write!(f, "drop {} constraint {} on {}", kind, name, table)
            }
        }
    }
}

#[cfg(test)]
#[path = "op_test.rs"]
mod tests;
