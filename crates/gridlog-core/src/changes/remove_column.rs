use gridlog_grid::GridState;
use serde_json::{Map, Value};

use crate::change::{Change, ChangeError};

/// Drops a column and its cell in every row.
///
/// Fields: `name` (string). Precondition: the column exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoveColumn {
    name: String,
}

impl RemoveColumn {
    pub const TAG: &'static str = "remove-column";

    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Change for RemoveColumn {
    fn apply(&self, state: &GridState) -> Result<GridState, ChangeError> {
        let index = state
            .column_index(&self.name)
            .ok_or_else(|| ChangeError::MissingColumn(self.name.clone()))?;
        let mut columns = state.columns().to_vec();
        columns.remove(index);
        let rows = state
            .rows()
            .iter()
            .map(|row| row.without_cell(index))
            .collect();
        Ok(state.remap(columns, rows))
    }

    fn type_tag(&self) -> &'static str {
        Self::TAG
    }

    fn to_fields(&self) -> Map<String, Value> {
        let mut fields = Map::new();
        fields.insert("name".to_string(), Value::String(self.name.clone()));
        fields
    }
}

pub(super) fn decode(fields: &Map<String, Value>) -> Result<Box<dyn Change>, ChangeError> {
    let name = super::require_str(fields, RemoveColumn::TAG, "name")?;
    Ok(Box::new(RemoveColumn::new(name)))
}
