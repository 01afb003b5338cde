//! JSON codec for grid snapshots.
//!
//! Persisted form:
//!
//! ```json
//! {
//!   "columns": [{"name": "A"}, {"name": "B"}],
//!   "rows": [[1, "x"], [2, null]],
//!   "metadata": {"source": "import.csv"}
//! }
//! ```
//!
//! `metadata` is omitted when absent.

use serde_json::{Map, Value};
use thiserror::Error;

use crate::state::{Column, GridState, Row};

#[derive(Debug, Error)]
pub enum GridCodecError {
    #[error("invalid grid payload")]
    InvalidPayload,
    #[error("invalid column entry at index {0}")]
    InvalidColumn(usize),
    #[error("invalid row entry at index {0}")]
    InvalidRow(usize),
}

pub fn encode_grid(grid: &GridState) -> Value {
    let mut root = Map::new();
    root.insert(
        "columns".to_string(),
        Value::Array(
            grid.columns()
                .iter()
                .map(|c| {
                    let mut col = Map::new();
                    col.insert("name".to_string(), Value::String(c.name.clone()));
                    Value::Object(col)
                })
                .collect(),
        ),
    );
    root.insert(
        "rows".to_string(),
        Value::Array(
            grid.rows()
                .iter()
                .map(|r| Value::Array(r.cells().to_vec()))
                .collect(),
        ),
    );
    if let Some(metadata) = grid.metadata() {
        root.insert("metadata".to_string(), Value::Object(metadata.clone()));
    }
    Value::Object(root)
}

pub fn decode_grid(value: &Value) -> Result<GridState, GridCodecError> {
    let root = value.as_object().ok_or(GridCodecError::InvalidPayload)?;

    let columns = root
        .get("columns")
        .and_then(Value::as_array)
        .ok_or(GridCodecError::InvalidPayload)?
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            let name = entry
                .as_object()
                .and_then(|o| o.get("name"))
                .and_then(Value::as_str)
                .ok_or(GridCodecError::InvalidColumn(i))?;
            Ok(Column::new(name))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let rows = root
        .get("rows")
        .and_then(Value::as_array)
        .ok_or(GridCodecError::InvalidPayload)?
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            let cells = entry.as_array().ok_or(GridCodecError::InvalidRow(i))?;
            Ok(Row::new(cells.clone()))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let grid = GridState::new(columns, rows);
    match root.get("metadata") {
        None => Ok(grid),
        Some(Value::Object(metadata)) => Ok(grid.with_metadata(metadata.clone())),
        Some(_) => Err(GridCodecError::InvalidPayload),
    }
}
