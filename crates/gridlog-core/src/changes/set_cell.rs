use gridlog_grid::GridState;
use serde_json::{Map, Value};

use crate::change::{Change, ChangeError};

/// Replaces a single cell.
///
/// Fields: `row` (unsigned integer), `column` (string), `value` (any JSON
/// value; always present, setting a cell to null is `"value": null`).
/// Preconditions: the column exists and the row index is in bounds.
#[derive(Debug, Clone, PartialEq)]
pub struct SetCell {
    row: usize,
    column: String,
    value: Value,
}

impl SetCell {
    pub const TAG: &'static str = "set-cell";

    pub fn new(row: usize, column: impl Into<String>, value: Value) -> Self {
        Self {
            row,
            column: column.into(),
            value,
        }
    }
}

impl Change for SetCell {
    fn apply(&self, state: &GridState) -> Result<GridState, ChangeError> {
        let column = state
            .column_index(&self.column)
            .ok_or_else(|| ChangeError::MissingColumn(self.column.clone()))?;
        if self.row >= state.row_count() {
            return Err(ChangeError::RowOutOfBounds {
                index: self.row,
                count: state.row_count(),
            });
        }
        let mut rows = state.rows().to_vec();
        rows[self.row] = rows[self.row].with_cell(column, self.value.clone());
        Ok(state.remap_rows(rows))
    }

    fn type_tag(&self) -> &'static str {
        Self::TAG
    }

    fn to_fields(&self) -> Map<String, Value> {
        let mut fields = Map::new();
        fields.insert("row".to_string(), Value::from(self.row as u64));
        fields.insert("column".to_string(), Value::String(self.column.clone()));
        fields.insert("value".to_string(), self.value.clone());
        fields
    }
}

pub(super) fn decode(fields: &Map<String, Value>) -> Result<Box<dyn Change>, ChangeError> {
    let row = super::require_usize(fields, SetCell::TAG, "row")?;
    let column = super::require_str(fields, SetCell::TAG, "column")?;
    let value = super::require_value(fields, SetCell::TAG, "value")?;
    Ok(Box::new(SetCell::new(row, column, value)))
}
