//! In-memory structural schema and backend.
//!
//! Models tables as ordered columns plus named unique constraints, with
//! simulated rows so default backfill is observable. This is the test
//! double the real backends are measured against, and the substrate for
//! ledger verification — the core stays testable without a live database.

use crate::apply::{RevisionStore, SchemaEngine};
use crate::error::EngineError;
use crate::op::{ColumnDef, ColumnType, ConstraintKind, SchemaOp};
use crate::revision::RevisionId;
use std::collections::BTreeMap;

/// One column of an in-memory table.
#[derive(Debug, Clone, PartialEq)]
pub struct MemoryColumn {
    /// Column name
    pub name: String,
    /// Data type
    pub column_type: ColumnType,
    /// Whether NULL is permitted
    pub nullable: bool,
    /// Rendered default cell value, if any
    pub default: Option<String>,
}

/// One in-memory table: ordered columns, named unique constraints, and
/// simulated rows (cell values keyed by column name).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MemoryTable {
    columns: Vec<MemoryColumn>,
    constraints: BTreeMap<String, (ConstraintKind, Vec<String>)>,
    rows: Vec<BTreeMap<String, Option<String>>>,
}

impl MemoryTable {
    /// Look up a column by name.
    pub fn column(&self, name: &str) -> Option<&MemoryColumn> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Column names in declaration order.
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Whether a named constraint exists.
    pub fn has_constraint(&self, name: &str) -> bool {
        self.constraints.contains_key(name)
    }

    /// Simulated rows.
    pub fn rows(&self) -> &[BTreeMap<String, Option<String>>] {
        &self.rows
    }
}

/// Structural model of a schema.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MemorySchema {
    tables: BTreeMap<String, MemoryTable>,
}

impl MemorySchema {
    /// An empty schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a table with the given columns (test/base-schema fixture).
    pub fn create_table(&mut self, name: impl Into<String>, columns: Vec<ColumnDef>) {
        let table = MemoryTable {
            columns: columns.into_iter().map(column_from_def).collect(),
            constraints: BTreeMap::new(),
            rows: Vec::new(),
        };
        self.tables.insert(name.into(), table);
    }

    /// Declare a unique constraint on an existing table (fixture helper).
    pub fn declare_unique(&mut self, table: &str, name: impl Into<String>, columns: Vec<String>) {
        if let Some(t) = self.tables.get_mut(table) {
            t.constraints
                .insert(name.into(), (ConstraintKind::Unique, columns));
        }
    }

    /// Insert a simulated row; unnamed columns get their default (or NULL).
    pub fn insert_row(&mut self, table: &str, values: &[(&str, &str)]) {
        if let Some(t) = self.tables.get_mut(table) {
            let mut row = BTreeMap::new();
            for column in &t.columns {
                let cell = values
                    .iter()
                    .find(|(name, _)| *name == column.name)
                    .map(|(_, value)| value.to_string())
                    .or_else(|| column.default.clone());
                row.insert(column.name.clone(), cell);
            }
            t.rows.push(row);
        }
    }

    /// Look up a table by name.
    pub fn table(&self, name: &str) -> Option<&MemoryTable> {
        self.tables.get(name)
    }

    /// Structural equality: same tables, columns, and constraints,
    /// ignoring row contents.
    pub fn same_structure(&self, other: &MemorySchema) -> bool {
        if self.tables.len() != other.tables.len() {
            return false;
        }
        self.tables.iter().all(|(name, table)| {
            other.tables.get(name).is_some_and(|o| {
                table.columns == o.columns && table.constraints == o.constraints
            })
        })
    }

    fn table_mut(&mut self, name: &str) -> Result<&mut MemoryTable, EngineError> {
        self.tables
            .get_mut(name)
            .ok_or_else(|| EngineError::Execution(format!("table {name} does not exist")))
    }

    /// Apply one schema-edit operation, enforcing preconditions loudly.
    pub fn apply_op(&mut self, op: &SchemaOp) -> Result<(), EngineError> {
        match op {
            SchemaOp::AddColumn { table, column } => {
                let t = self.table_mut(table)?;
                if t.column(&column.name).is_some() {
                    return Err(EngineError::Execution(format!(
                        "column {}.{} already exists",
                        table, column.name
                    )));
                }
                if !column.nullable && column.default.is_none() && !t.rows.is_empty() {
                    return Err(EngineError::Execution(format!(
                        "cannot add non-nullable column {}.{} without a server-side default",
                        table, column.name
                    )));
                }
                let new = column_from_def(column.clone());
                for row in &mut t.rows {
                    row.insert(new.name.clone(), new.default.clone());
                }
                t.columns.push(new);
                Ok(())
            }
            SchemaOp::DropColumn { table, column } => {
                let t = self.table_mut(table)?;
                let before = t.columns.len();
                t.columns.retain(|c| c.name != *column);
                if t.columns.len() == before {
                    return Err(EngineError::Execution(format!(
                        "column {table}.{column} does not exist"
                    )));
                }
                for row in &mut t.rows {
                    row.remove(column);
                }
                Ok(())
            }
            SchemaOp::AddUniqueConstraint {
                table,
                name,
                columns,
            } => {
                let t = self.table_mut(table)?;
                if t.constraints.contains_key(name) {
                    return Err(EngineError::Execution(format!(
                        "constraint {name} already exists on {table}"
                    )));
                }
                for column in columns {
                    if t.column(column).is_none() {
                        return Err(EngineError::Execution(format!(
                            "constraint {name} covers missing column {table}.{column}"
                        )));
                    }
                }
                t.constraints
                    .insert(name.clone(), (ConstraintKind::Unique, columns.clone()));
                Ok(())
            }
            SchemaOp::DropConstraint { table, name, kind } => {
                let t = self.table_mut(table)?;
                match t.constraints.get(name) {
                    Some((found, _)) if found == kind => {
                        t.constraints.remove(name);
                        Ok(())
                    }
                    Some((found, _)) => Err(EngineError::Execution(format!(
                        "constraint {name} on {table} is {found}, not {kind}"
                    ))),
                    None => Err(EngineError::Execution(format!(
                        "constraint {name} does not exist on {table}"
                    ))),
                }
            }
        }
    }
}

fn column_from_def(def: ColumnDef) -> MemoryColumn {
    MemoryColumn {
        name: def.name,
        column_type: def.column_type,
        nullable: def.nullable,
        default: def.default.map(|d| d.to_cell_value()),
    }
}

/// In-memory backend: a [`MemorySchema`] with snapshot-based transactions
/// and an in-memory current-revision marker.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    schema: MemorySchema,
    snapshot: Option<MemorySchema>,
    current: Option<RevisionId>,
}

impl MemoryBackend {
    /// A backend over an empty schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// A backend over an existing base schema.
    pub fn with_schema(schema: MemorySchema) -> Self {
        Self {
            schema,
            snapshot: None,
            current: None,
        }
    }

    /// Borrow the schema.
    pub fn schema(&self) -> &MemorySchema {
        &self.schema
    }

    /// Mutably borrow the schema (fixture setup).
    pub fn schema_mut(&mut self) -> &mut MemorySchema {
        &mut self.schema
    }
}

impl SchemaEngine for MemoryBackend {
    fn add_column(&mut self, table: &str, column: &ColumnDef) -> Result<(), EngineError> {
        self.schema.apply_op(&SchemaOp::AddColumn {
            table: table.to_string(),
            column: column.clone(),
        })
    }

    fn drop_column(&mut self, table: &str, column: &str) -> Result<(), EngineError> {
        self.schema.apply_op(&SchemaOp::DropColumn {
            table: table.to_string(),
            column: column.to_string(),
        })
    }

    fn add_unique_constraint(
        &mut self,
        table: &str,
        name: &str,
        columns: &[String],
    ) -> Result<(), EngineError> {
        self.schema.apply_op(&SchemaOp::AddUniqueConstraint {
            table: table.to_string(),
            name: name.to_string(),
            columns: columns.to_vec(),
        })
    }

    fn drop_constraint(
        &mut self,
        table: &str,
        name: &str,
        kind: ConstraintKind,
    ) -> Result<(), EngineError> {
        self.schema.apply_op(&SchemaOp::DropConstraint {
            table: table.to_string(),
            name: name.to_string(),
            kind,
        })
    }

    fn begin(&mut self) -> Result<(), EngineError> {
        if self.snapshot.is_some() {
            return Err(EngineError::Transaction(
                "transaction already open".to_string(),
            ));
        }
        self.snapshot = Some(self.schema.clone());
        Ok(())
    }

    fn commit(&mut self) -> Result<(), EngineError> {
        if self.snapshot.take().is_none() {
            return Err(EngineError::Transaction("no open transaction".to_string()));
        }
        Ok(())
    }

    fn rollback(&mut self) -> Result<(), EngineError> {
        match self.snapshot.take() {
            Some(snapshot) => {
                self.schema = snapshot;
                Ok(())
            }
            None => Err(EngineError::Transaction("no open transaction".to_string())),
        }
    }
}

impl RevisionStore for MemoryBackend {
    fn current(&mut self) -> Result<Option<RevisionId>, EngineError> {
        Ok(self.current.clone())
    }

    fn set_current(&mut self, revision: Option<&RevisionId>) -> Result<(), EngineError> {
        self.current = revision.cloned();
        Ok(())
    }
}

#[cfg(test)]
#[path = "memory_test.rs"]
mod tests;
