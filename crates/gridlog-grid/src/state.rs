use std::sync::Arc;

use serde_json::{Map, Value};

static NULL_CELL: Value = Value::Null;

/// One entry in the column schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub name: String,
}

impl Column {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// One record; cells are positionally aligned with the column schema.
///
/// A row may carry fewer cells than the schema has columns; the missing
/// tail reads as `Value::Null`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Row {
    cells: Vec<Value>,
}

impl Row {
    pub fn new(cells: Vec<Value>) -> Self {
        Self { cells }
    }

    pub fn cells(&self) -> &[Value] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Cell at `index`, or null when the row is shorter than the schema.
    pub fn cell(&self, index: usize) -> &Value {
        self.cells.get(index).unwrap_or(&NULL_CELL)
    }

    /// New row with the cell at `index` replaced, padding with nulls when
    /// the row is shorter than `index`.
    pub fn with_cell(&self, index: usize, value: Value) -> Row {
        let mut cells = self.cells.clone();
        if cells.len() <= index {
            cells.resize(index + 1, Value::Null);
        }
        cells[index] = value;
        Row { cells }
    }

    /// New row with the cell at `index` removed; a row already shorter than
    /// `index` is returned unchanged.
    pub fn without_cell(&self, index: usize) -> Row {
        let mut cells = self.cells.clone();
        if index < cells.len() {
            cells.remove(index);
        }
        Row { cells }
    }
}

/// Immutable snapshot of a project's tabular data.
///
/// Cloning is cheap: row storage sits behind an `Arc` and is shared between
/// snapshots that differ only in schema or metadata. Equality is structural.
#[derive(Debug, Clone, PartialEq)]
pub struct GridState {
    columns: Vec<Column>,
    rows: Arc<[Row]>,
    metadata: Option<Map<String, Value>>,
}

impl GridState {
    pub fn new(columns: Vec<Column>, rows: Vec<Row>) -> Self {
        Self {
            columns,
            rows: rows.into(),
            metadata: None,
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new(), Vec::new())
    }

    /// Attaches metadata. Builder-style, intended for use before the
    /// snapshot is published.
    pub fn with_metadata(mut self, metadata: Map<String, Value>) -> Self {
        self.metadata = Some(metadata);
        self
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Cell at `(row, column)`, or `None` when the row index is out of
    /// bounds. A present row that is shorter than the schema reads as null.
    pub fn cell(&self, row: usize, column: usize) -> Option<&Value> {
        self.rows.get(row).map(|r| r.cell(column))
    }

    pub fn metadata(&self) -> Option<&Map<String, Value>> {
        self.metadata.as_ref()
    }

    /// Derives a snapshot with a new schema, sharing this snapshot's row
    /// storage. Used by changes that touch only columns.
    pub fn remap_columns(&self, columns: Vec<Column>) -> GridState {
        GridState {
            columns,
            rows: Arc::clone(&self.rows),
            metadata: self.metadata.clone(),
        }
    }

    /// Derives a snapshot with new rows under the same schema.
    pub fn remap_rows(&self, rows: Vec<Row>) -> GridState {
        GridState {
            columns: self.columns.clone(),
            rows: rows.into(),
            metadata: self.metadata.clone(),
        }
    }

    /// Derives a snapshot with both a new schema and new rows, preserving
    /// metadata.
    pub fn remap(&self, columns: Vec<Column>, rows: Vec<Row>) -> GridState {
        GridState {
            columns,
            rows: rows.into(),
            metadata: self.metadata.clone(),
        }
    }
}
